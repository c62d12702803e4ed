//! Host framework contract
//!
//! The shapes the embedding web framework exchanges with this plugin:
//! resolved build settings, render contexts, style records, and the two
//! collaborator capabilities (asset URL resolution and native-tool
//! installation). The plugin conforms to these signatures; it does not
//! implement the host itself.

use std::future::Future;
use std::path::{Path, PathBuf};

/// One unit of CSS handed back to the host's render pipeline.
///
/// Identifier uniqueness across concurrently active style blocks is the
/// caller's responsibility; generated per-render identifiers carry a
/// sequence suffix for exactly that reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
    pub id: String,
    pub css_text: String,
}

impl StyleRecord {
    pub fn new(id: impl Into<String>, css_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            css_text: css_text.into(),
        }
    }

    /// An empty record, used where CSS processing is skipped entirely.
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, "")
    }
}

/// What a render hook returns to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedStyles {
    pub styles: Vec<StyleRecord>,
}

impl RenderedStyles {
    pub fn single(record: StyleRecord) -> Self {
        Self {
            styles: vec![record],
        }
    }
}

/// Markup produced by the host's renderer.
#[derive(Debug, Clone)]
pub struct RenderedHtml {
    pub html_text: String,
    pub requires_hydration: bool,
}

/// The host's resolved build settings, as passed to the build-start hook.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Development mode flag. Production builds minify their output.
    pub dev: bool,
    /// Build output directory, when the host separates it from static files.
    pub out_dir: Option<PathBuf>,
    /// The host's static content directory.
    pub static_dir: PathBuf,
}

/// Synchronous render context wrapped by the plugin's `render` hook.
pub trait RenderContext {
    fn render(&self) -> RenderedHtml;
}

/// Asynchronous render context wrapped by the plugin's `render_async` hook.
pub trait AsyncRenderContext: Sync {
    fn render_async(&self) -> impl Future<Output = RenderedHtml> + Send;
}

/// Maps a static-relative path to the public asset URL. Hosts typically
/// fingerprint the URL here so file-backed CSS is cache-bustable.
pub trait AssetUrlResolver: Send + Sync {
    fn asset_url(&self, path: &str) -> String;
}

/// Returns the path unchanged. The default when the host provides no
/// fingerprinting helper.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughAssets;

impl AssetUrlResolver for PassthroughAssets {
    fn asset_url(&self, path: &str) -> String {
        path.to_string()
    }
}

/// Appends a build-id query so the URL changes with every deployment.
#[derive(Debug, Clone)]
pub struct BuildIdAssets {
    build_id: String,
}

impl BuildIdAssets {
    pub fn new(build_id: impl Into<String>) -> Self {
        Self {
            build_id: build_id.into(),
        }
    }
}

impl AssetUrlResolver for BuildIdAssets {
    fn asset_url(&self, path: &str) -> String {
        format!("{path}?__bz={}", self.build_id)
    }
}

/// The binary-acquisition collaborator: ensures the native styling-engine
/// CLI is present, returning its path. The real implementation (download,
/// checksum verification, placement) lives in the installer crate.
pub trait ToolInstaller: Send + Sync {
    fn ensure_installed(
        &self,
        project_root: &Path,
    ) -> impl Future<Output = anyhow::Result<PathBuf>> + Send;
}

/// Descriptor returned by the one-shot `install` operation; the renamed
/// plugin signals that installation is not a steady-state hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub name: String,
}
