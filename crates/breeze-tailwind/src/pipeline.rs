//! CSS processing pipeline
//!
//! Resolves configuration, builds the ordered transform chain and executes
//! it over the stylesheet source. The chain is strictly sequential: each
//! transform receives the full output of the previous one. Order matters:
//! the utility transform must observe the final content list before any
//! downstream stage runs, and extra transforms are appended in user order so
//! a later one may rewrite an earlier one's output.
//!
//! Results are produced fresh on every call; nothing is cached, so the
//! output always reflects the current on-disk config and content sources.

use anyhow::{anyhow, Result};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use parcel_sourcemap::SourceMap;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::config::{resolve_config, ConfigError, ConfigLoader, FsConfigLoader, ResolvedConfig};
use crate::engine::UtilityTransform;
use crate::options::{is_path_source, ProcessOptions, TailwindOptions, TAILWIND_PREFLIGHT};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read stylesheet {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transform '{name}' failed")]
    Transform {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Result of one processing invocation. The map, when produced, is the JSON
/// source-map text.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub css: String,
    pub map: Option<String>,
}

/// Everything a transform stage may consult.
pub struct TransformContext<'a> {
    /// Project root; glob content sources are resolved against it.
    pub root: &'a Path,
    /// The resolved configuration (content already overridden when the
    /// plugin options supplied their own list).
    pub config: &'a ResolvedConfig,
    /// Pass-through process options.
    pub options: &'a ProcessOptions,
    /// Map source identifier; the stylesheet path for file-backed sources.
    pub from: Option<&'a str>,
    /// Map destination identifier.
    pub to: Option<&'a str>,
}

/// Output of one transform stage. A stage that produces no map leaves the
/// previous stage's map in effect.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub css: String,
    pub map: Option<String>,
}

impl TransformOutput {
    pub fn passthrough(css: &str) -> Self {
        Self {
            css: css.to_string(),
            map: None,
        }
    }
}

/// One CSS-to-CSS rewriting stage.
pub trait CssTransform: Send + Sync {
    /// Stage name, used in error reporting.
    fn name(&self) -> Cow<'static, str>;

    fn transform(&self, css: &str, ctx: &TransformContext<'_>) -> Result<TransformOutput>;
}

/// Normalization stage backed by lightningcss: parses the stylesheet,
/// optionally minifies, and reprints it (producing a source map on request).
/// A parse failure here means malformed CSS and is not recoverable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizeTransform;

impl CssTransform for NormalizeTransform {
    fn name(&self) -> Cow<'static, str> {
        "normalize".into()
    }

    fn transform(&self, css: &str, ctx: &TransformContext<'_>) -> Result<TransformOutput> {
        let filename = ctx.from.unwrap_or("stylesheet.css").to_string();
        let mut sheet = StyleSheet::parse(
            css,
            ParserOptions {
                filename,
                ..ParserOptions::default()
            },
        )
        .map_err(|err| anyhow!("failed to parse CSS: {err}"))?;

        if ctx.options.minify {
            sheet
                .minify(MinifyOptions::default())
                .map_err(|err| anyhow!("failed to minify CSS: {err}"))?;
        }

        let mut source_map = SourceMap::new("/");
        let printed = sheet
            .to_css(PrinterOptions {
                minify: ctx.options.minify,
                source_map: if ctx.options.map {
                    Some(&mut source_map)
                } else {
                    None
                },
                ..PrinterOptions::default()
            })
            .map_err(|err| anyhow!("failed to print CSS: {err}"))?;

        let map = if ctx.options.map {
            Some(
                source_map
                    .to_json(None)
                    .map_err(|err| anyhow!("failed to serialize source map: {err}"))?,
            )
        } else {
            None
        };

        Ok(TransformOutput {
            css: printed.code,
            map,
        })
    }
}

/// The configuration-resolution and CSS-processing pipeline.
pub struct Pipeline {
    root: PathBuf,
    loader: Arc<dyn ConfigLoader>,
}

impl Pipeline {
    /// Pipeline rooted at the given project directory, loading config files
    /// from disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            loader: Arc::new(FsConfigLoader),
        }
    }

    /// Replace the config loader (used to resolve configuration without a
    /// real filesystem).
    pub fn with_loader(mut self, loader: Arc<dyn ConfigLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run the full transform chain for one invocation.
    ///
    /// Re-resolves configuration and re-reads the stylesheet source every
    /// time. Transform failures propagate.
    pub async fn process(&self, options: &TailwindOptions) -> Result<ProcessingResult, PipelineError> {
        let mut config =
            resolve_config(&*self.loader, &self.root, options.config_file.as_deref())?;
        if let Some(content) = &options.content {
            config.content = content.clone();
        }

        let (stylesheet, source_path) = match &options.css {
            Some(css) if is_path_source(css) => {
                let path = self.root.join(css);
                let text =
                    tokio::fs::read_to_string(&path)
                        .await
                        .map_err(|source| PipelineError::Read {
                            path: path.clone(),
                            source,
                        })?;
                (text, Some(css.clone()))
            }
            Some(css) => (css.clone(), None),
            None => (TAILWIND_PREFLIGHT.to_string(), None),
        };

        let from = options.process.from.clone().or(source_path);
        let to = options
            .process
            .to
            .clone()
            .or_else(|| options.dest.as_ref().map(|d| d.display().to_string()));

        let ctx = TransformContext {
            root: &self.root,
            config: &config,
            options: &options.process,
            from: from.as_deref(),
            to: to.as_deref(),
        };

        let mut chain: Vec<Arc<dyn CssTransform>> =
            vec![Arc::new(UtilityTransform), Arc::new(NormalizeTransform)];
        chain.extend(options.extra_transforms.iter().cloned());

        let mut css = stylesheet;
        let mut map = None;
        for stage in &chain {
            let output = stage
                .transform(&css, &ctx)
                .map_err(|source| PipelineError::Transform {
                    name: stage.name().into_owned(),
                    source,
                })?;
            debug!(stage = %stage.name(), bytes = output.css.len(), "transform stage complete");
            css = output.css;
            if output.map.is_some() {
                map = output.map;
            }
        }

        Ok(ProcessingResult { css, map })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ContentSource;
    use tempfile::TempDir;

    fn raw_content(markup: &str) -> Vec<ContentSource> {
        vec![ContentSource::raw(markup, ".html")]
    }

    #[tokio::test]
    async fn end_to_end_generates_used_utilities() {
        let dir = TempDir::new().unwrap();
        let options = TailwindOptions::new()
            .with_content(raw_content(r#"<div class="bg-red-500">Howdy</div>"#));

        let result = Pipeline::new(dir.path()).process(&options).await.unwrap();
        assert!(result.css.contains(".bg-red-500"));
        assert!(result.map.is_none());
    }

    #[tokio::test]
    async fn literal_css_passes_through_with_scanned_classes() {
        let dir = TempDir::new().unwrap();
        let options = TailwindOptions::new()
            .with_css(".test { color: red; }")
            .with_content(raw_content(r#"<div class="test"></div>"#));

        let result = Pipeline::new(dir.path()).process(&options).await.unwrap();
        assert!(result.css.contains(".test"));
        assert!(result.css.contains("color:"));
    }

    #[tokio::test]
    async fn css_path_is_read_from_disk() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(
            dir.path().join("src/styles.css"),
            "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n.brand { color: navy; }\n",
        )
        .unwrap();

        let options = TailwindOptions::new()
            .with_css("./src/styles.css")
            .with_content(raw_content(r#"<div class="p-4"></div>"#));

        let result = Pipeline::new(dir.path()).process(&options).await.unwrap();
        assert!(result.css.contains(".p-4"));
        assert!(result.css.contains(".brand"));
    }

    #[tokio::test]
    async fn missing_css_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let options = TailwindOptions::new().with_css("./src/missing.css");

        let err = Pipeline::new(dir.path()).process(&options).await.unwrap_err();
        assert!(matches!(err, PipelineError::Read { .. }));
    }

    #[tokio::test]
    async fn identical_inputs_produce_identical_output() {
        let dir = TempDir::new().unwrap();
        let options = TailwindOptions::new().with_content(raw_content(
            r#"<div class="flex p-4 hover:bg-blue-500">x</div>"#,
        ));

        let pipeline = Pipeline::new(dir.path());
        let first = pipeline.process(&options).await.unwrap();
        let second = pipeline.process(&options).await.unwrap();
        assert_eq!(first.css, second.css);
    }

    #[tokio::test]
    async fn extra_transforms_run_last_in_user_order() {
        struct Suffix(&'static str);

        impl CssTransform for Suffix {
            fn name(&self) -> Cow<'static, str> {
                "suffix".into()
            }
            fn transform(&self, css: &str, _ctx: &TransformContext<'_>) -> Result<TransformOutput> {
                Ok(TransformOutput {
                    css: format!("{css}/* {} */\n", self.0),
                    map: None,
                })
            }
        }

        let dir = TempDir::new().unwrap();
        let mut options = TailwindOptions::new()
            .with_css(".a { color: red; }")
            .with_content(raw_content("<div></div>"));
        options.extra_transforms = vec![Arc::new(Suffix("one")), Arc::new(Suffix("two"))];

        let result = Pipeline::new(dir.path()).process(&options).await.unwrap();
        let one = result.css.find("/* one */").unwrap();
        let two = result.css.find("/* two */").unwrap();
        assert!(one < two);
    }

    #[tokio::test]
    async fn malformed_css_propagates_as_transform_failure() {
        let dir = TempDir::new().unwrap();
        let options = TailwindOptions::new()
            .with_css("} .broken { color: red; }")
            .with_content(raw_content("<div></div>"));

        let err = Pipeline::new(dir.path()).process(&options).await.unwrap_err();
        assert!(matches!(err, PipelineError::Transform { .. }));
    }

    #[tokio::test]
    async fn source_map_is_produced_on_request() {
        let dir = TempDir::new().unwrap();
        let mut options = TailwindOptions::new()
            .with_css(".a { color: red; }")
            .with_content(raw_content("<div></div>"));
        options.process.map = true;

        let result = Pipeline::new(dir.path()).process(&options).await.unwrap();
        let map = result.map.expect("map requested");
        assert!(map.contains("\"version\""));
    }

    #[tokio::test]
    async fn minify_shrinks_output() {
        let dir = TempDir::new().unwrap();
        let css = ".a {\n  color: red;\n  background: blue;\n}\n";
        let mut options = TailwindOptions::new()
            .with_css(css)
            .with_content(raw_content("<div></div>"));
        options.process.minify = true;

        let result = Pipeline::new(dir.path()).process(&options).await.unwrap();
        assert!(result.css.len() < css.len());
        assert!(result.css.contains("color"));
    }
}
