//! Plugin options and shared constants
//!
//! `TailwindOptions` is captured once at plugin construction and never
//! mutated afterwards. Render-time additions (such as scanning the freshly
//! rendered markup) operate on a locally cloned value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::pipeline::CssTransform;

/// Conventional static-assets directory of the host framework.
pub const DEFAULT_STATIC_DIR: &str = "./static";

/// File name used when no explicit destination is configured.
pub const DEFAULT_STYLE_NAME: &str = "styles.css";

/// Default destination for generated CSS in file-backed mode.
pub const DEFAULT_STYLE_DEST: &str = "./static/styles.css";

/// Base identifier for injected style elements. Generated per-render
/// identifiers append a sequence suffix to stay unique across partials.
pub const STYLE_ELEMENT_ID: &str = "__BREEZE_TAILWIND";

/// The stylesheet used when no `css` option is supplied. The three layer
/// markers are required: the utility transform injects generated rules at
/// the `utilities` marker.
pub const TAILWIND_PREFLIGHT: &str = "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n";

/// A content source scanned for utility class usage: either a glob pattern
/// relative to the project root, or a literal markup snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentSource {
    /// Glob pattern, e.g. `./routes/**/*.{rs,html}`.
    Glob(String),
    /// Literal content with an extension hint, e.g. a rendered HTML page.
    Raw { raw: String, extension: String },
}

impl ContentSource {
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob(pattern.into())
    }

    pub fn raw(raw: impl Into<String>, extension: impl Into<String>) -> Self {
        Self::Raw {
            raw: raw.into(),
            extension: extension.into(),
        }
    }
}

/// Options passed through to the transform chain.
///
/// `from`/`to` identify the map source and destination; when the stylesheet
/// comes from a file and `from` is unset, the file path is used. Fields in
/// `extra` are handed to transforms untouched.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Enable source map generation.
    pub map: bool,
    /// Minify the normalized output.
    pub minify: bool,
    /// Pass-through fields for custom transforms.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Plugin settings, immutable per plugin instance.
#[derive(Clone)]
pub struct TailwindOptions {
    /// The stylesheet source: literal CSS text, or a path to a CSS file when
    /// it starts with `./` or `/`. Absent means the default preflight.
    pub css: Option<String>,
    /// Transforms appended after the built-in utility and normalization
    /// stages, in the order supplied.
    pub extra_transforms: Vec<Arc<dyn CssTransform>>,
    /// Options handed to the transform chain.
    pub process: ProcessOptions,
    /// Overrides the resolved configuration's content list when set.
    pub content: Option<Vec<ContentSource>>,
    /// Destination for generated CSS. Must live under `static_dir` to switch
    /// the plugin into file-backed mode.
    pub dest: Option<PathBuf>,
    /// The host's static content directory. Defaults to `./static`.
    pub static_dir: PathBuf,
    /// Whether the asynchronous render hook should run even in file-backed
    /// mode. Defaults to `false`: without a destination the async hook is
    /// active anyway, and with one the build path owns processing.
    pub hook_render: bool,
    /// Overrides the generated identifier for the injected style element.
    /// Must be unique across concurrently active style blocks.
    pub style_element_id: Option<String>,
    /// Explicit path to the Tailwind configuration file.
    pub config_file: Option<PathBuf>,
}

impl Default for TailwindOptions {
    fn default() -> Self {
        Self {
            css: None,
            extra_transforms: Vec::new(),
            process: ProcessOptions::default(),
            content: None,
            dest: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            hook_render: false,
            style_element_id: None,
            config_file: None,
        }
    }
}

impl fmt::Debug for TailwindOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TailwindOptions")
            .field("css", &self.css)
            .field(
                "extra_transforms",
                &self
                    .extra_transforms
                    .iter()
                    .map(|t| t.name())
                    .collect::<Vec<_>>(),
            )
            .field("process", &self.process)
            .field("content", &self.content)
            .field("dest", &self.dest)
            .field("static_dir", &self.static_dir)
            .field("hook_render", &self.hook_render)
            .field("style_element_id", &self.style_element_id)
            .field("config_file", &self.config_file)
            .finish()
    }
}

impl TailwindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stylesheet source (literal CSS or a `./`-prefixed file path).
    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    pub fn with_dest(mut self, dest: impl Into<PathBuf>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn with_content(mut self, content: Vec<ContentSource>) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn with_style_element_id(mut self, id: impl Into<String>) -> Self {
        self.style_element_id = Some(id.into());
        self
    }

    pub fn with_hook_render(mut self, enabled: bool) -> Self {
        self.hook_render = enabled;
        self
    }

    pub fn with_transform(mut self, transform: Arc<dyn CssTransform>) -> Self {
        self.extra_transforms.push(transform);
        self
    }

    pub fn with_process_options(mut self, process: ProcessOptions) -> Self {
        self.process = process;
        self
    }
}

/// Whether a `css` option denotes a file path rather than literal CSS text.
pub(crate) fn is_path_source(css: &str) -> bool {
    css.starts_with("./") || css.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_source_detection() {
        assert!(is_path_source("./src/styles.css"));
        assert!(is_path_source("/abs/styles.css"));
        assert!(!is_path_source(".test { color: red; }"));
        assert!(!is_path_source("@tailwind base;"));
    }

    #[test]
    fn content_source_deserializes_both_shapes() {
        let sources: Vec<ContentSource> = serde_json::from_str(
            r#"["./routes/**/*.rs", {"raw": "<div class=\"flex\"></div>", "extension": ".html"}]"#,
        )
        .unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0], ContentSource::glob("./routes/**/*.rs"));
        assert!(matches!(sources[1], ContentSource::Raw { .. }));
    }

    #[test]
    fn default_options() {
        let options = TailwindOptions::default();
        assert_eq!(options.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
        assert!(!options.hook_render);
        assert!(options.dest.is_none());
    }
}
