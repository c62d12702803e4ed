//! Content scanning for utility class candidates
//!
//! Expands the resolved configuration's content sources (glob patterns and
//! raw markup snippets) and extracts class candidates from them. Candidates
//! are collected into an ordered set so downstream generation is
//! deterministic.

use anyhow::{Context, Result};
use globset::GlobBuilder;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;
use walkdir::WalkDir;

use crate::options::ContentSource;

/// Directories never scanned, regardless of glob patterns.
const SKIPPED_DIRS: &[&str] = &[".git", "target", "node_modules", "dist", "vendor", ".cache"];

/// Matches `class="..."` / `class: "..."` attribute values in markup and
/// component source.
fn class_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)class(?:name)?\s*[=:]\s*["']([^"']+)["']"#).unwrap())
}

/// Matches double-quoted string literals; class lists in component code
/// usually live inside them.
fn string_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"\\]*)""#).unwrap())
}

/// Collect class candidates from every content source.
///
/// Glob patterns are matched against paths relative to `root`. Unreadable
/// files are skipped; an invalid glob pattern is an authoring error and
/// propagates.
pub fn collect_candidates(root: &Path, sources: &[ContentSource]) -> Result<BTreeSet<String>> {
    let mut candidates = BTreeSet::new();
    for source in sources {
        match source {
            ContentSource::Raw { raw, .. } => extract_candidates(raw, &mut candidates),
            ContentSource::Glob(pattern) => {
                scan_glob(root, pattern, &mut candidates)
                    .with_context(|| format!("invalid content pattern: {pattern}"))?;
            }
        }
    }
    debug!(count = candidates.len(), "collected class candidates");
    Ok(candidates)
}

fn scan_glob(root: &Path, pattern: &str, candidates: &mut BTreeSet<String>) -> Result<()> {
    let matcher = GlobBuilder::new(pattern.trim_start_matches("./"))
        .literal_separator(true)
        .build()?
        .compile_matcher();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        entry
            .file_name()
            .to_str()
            .map(|name| !SKIPPED_DIRS.contains(&name))
            .unwrap_or(true)
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        // globset matches with unix separators
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !matcher.is_match(&relative) {
            continue;
        }
        match std::fs::read_to_string(entry.path()) {
            Ok(text) => extract_candidates(&text, candidates),
            Err(err) => {
                debug!(path = %entry.path().display(), error = %err, "skipping unreadable file");
            }
        }
    }
    Ok(())
}

/// Extract class candidates from one text: class attribute values first,
/// then tokens inside string literals as a catch-all.
pub fn extract_candidates(text: &str, candidates: &mut BTreeSet<String>) {
    for capture in class_attr_re().captures_iter(text) {
        for token in capture[1].split_whitespace() {
            if is_valid_candidate(token) {
                candidates.insert(token.to_string());
            }
        }
    }
    for capture in string_literal_re().captures_iter(text) {
        for token in capture[1].split_whitespace() {
            if is_valid_candidate(token) {
                candidates.insert(token.to_string());
            }
        }
    }
}

/// Whether a token is plausibly a utility class rather than arbitrary prose
/// or an identifier from component code.
fn is_valid_candidate(token: &str) -> bool {
    if token.is_empty() || token.len() > 64 {
        return false;
    }
    if !token.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || matches!(c, '-' | '_' | ':' | '/' | '[' | ']' | '.' | '%' | '#' | '(' | ')' | ',')
    }) {
        return false;
    }
    // must contain a letter: "42" or "0.5" alone are not classes
    if !token.chars().any(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    // PascalCase tokens without utility punctuation are almost certainly
    // type or component names
    if token.starts_with(|c: char| c.is_ascii_uppercase())
        && !token.contains('-')
        && !token.contains(':')
    {
        return false;
    }
    true
}
