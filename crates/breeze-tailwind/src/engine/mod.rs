//! Built-in utility-class transform
//!
//! Scans the configured content sources for class candidates and replaces
//! the `@tailwind` layer markers with generated rules. This engine covers a
//! core utility subset; projects needing full engine fidelity can run the
//! standalone CLI installed by `breeze-cli` and feed its output through the
//! `css` option instead.

use anyhow::Result;
use std::borrow::Cow;
use tracing::debug;

use crate::pipeline::{CssTransform, TransformContext, TransformOutput};

mod rules;
mod scan;

pub use scan::extract_candidates;

/// Transform stage that expands `@tailwind` directives into utility rules
/// for the classes actually used. Always placed first in the chain so it
/// observes the final content list before any downstream rewriting.
#[derive(Debug, Default, Clone, Copy)]
pub struct UtilityTransform;

impl CssTransform for UtilityTransform {
    fn name(&self) -> Cow<'static, str> {
        "utilities".into()
    }

    fn transform(&self, css: &str, ctx: &TransformContext<'_>) -> Result<TransformOutput> {
        // Stylesheets without layer markers pass through untouched: there is
        // no place to inject generated rules.
        if !css.contains("@tailwind") {
            return Ok(TransformOutput::passthrough(css));
        }

        let candidates = scan::collect_candidates(ctx.root, &ctx.config.content)?;
        let utilities = rules::generate(&candidates);
        debug!(
            candidates = candidates.len(),
            generated_bytes = utilities.len(),
            "expanded tailwind directives"
        );

        let mut out = String::with_capacity(css.len() + utilities.len());
        for line in css.lines() {
            let trimmed = line.trim();
            if let Some(directive) = trimmed.strip_prefix("@tailwind") {
                match directive.trim().trim_end_matches(';') {
                    "base" => out.push_str(rules::PREFLIGHT_BASE),
                    // components has no built-in layer; the marker is dropped
                    "components" => {}
                    "utilities" => out.push_str(&utilities),
                    other => debug!(directive = other, "ignoring unknown tailwind directive"),
                }
            } else {
                out.push_str(line);
                out.push('\n');
            }
        }

        Ok(TransformOutput { css: out, map: None })
    }
}
