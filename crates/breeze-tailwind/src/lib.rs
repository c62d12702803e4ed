//! Tailwind-style utility CSS plugin for server-rendered Rust web hosts
//!
//! Connects a utility-class CSS engine to a host framework's plugin
//! lifecycle. The plugin resolves (or synthesizes) a stylesheet
//! configuration, runs the transform chain over a CSS source, and either
//! writes the result to a static asset location or injects it into
//! server-rendered output during development.
//!
//! ## Architecture
//!
//! ```text
//! options → config resolver → transform chain → materializer → hook result
//!              (config.rs)     (pipeline.rs,     (materialize.rs)
//!                               engine/)
//! ```
//!
//! Three hooks cover the host lifecycle:
//!
//! - `build_start`: file-backed build path; processes CSS and writes it to
//!   the destination, failing loudly on any error.
//! - `render` (sync): emits an asset-URL reference record; never reprocesses
//!   CSS synchronously.
//! - `render_async`: reprocesses per render, scanning the freshly rendered
//!   markup, and inlines the result. This is the development path.
//!
//! ## Example
//!
//! ```rust,no_run
//! use breeze_tailwind::{TailwindOptions, TailwindPlugin};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let plugin = TailwindPlugin::new(
//!     TailwindOptions::new().with_dest("./static/styles.css"),
//! );
//! plugin.build_start(None).await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub mod config;
pub mod engine;
pub mod host;
pub mod materialize;
pub mod options;
pub mod pipeline;

pub use config::{ConfigError, ConfigLoader, FsConfigLoader, LoadOutcome, PartialConfig, ResolvedConfig};
pub use host::{
    AssetUrlResolver, AsyncRenderContext, BuildConfig, BuildIdAssets, PassthroughAssets,
    PluginDescriptor, RenderContext, RenderedHtml, RenderedStyles, StyleRecord, ToolInstaller,
};
pub use options::{
    ContentSource, ProcessOptions, TailwindOptions, DEFAULT_STATIC_DIR, DEFAULT_STYLE_DEST,
    DEFAULT_STYLE_NAME, STYLE_ELEMENT_ID, TAILWIND_PREFLIGHT,
};
pub use pipeline::{
    CssTransform, NormalizeTransform, Pipeline, PipelineError, ProcessingResult, TransformContext,
    TransformOutput,
};

/// The plugin instance handed to the host. Options are captured at
/// construction and never mutated; the only state shared between hook
/// invocations is the sequence counter behind generated style identifiers.
pub struct TailwindPlugin {
    options: TailwindOptions,
    pipeline: Pipeline,
    assets: Arc<dyn AssetUrlResolver>,
    style_seq: AtomicU64,
}

impl TailwindPlugin {
    /// Plugin rooted at the current directory with passthrough asset URLs.
    pub fn new(options: TailwindOptions) -> Self {
        Self::with_root(options, ".")
    }

    /// Plugin rooted at an explicit project directory.
    pub fn with_root(options: TailwindOptions, root: impl Into<PathBuf>) -> Self {
        Self {
            options,
            pipeline: Pipeline::new(root),
            assets: Arc::new(PassthroughAssets),
            style_seq: AtomicU64::new(0),
        }
    }

    /// Replace the asset URL resolver (e.g. with the host's fingerprinting
    /// helper).
    pub fn with_assets(mut self, assets: Arc<dyn AssetUrlResolver>) -> Self {
        self.assets = assets;
        self
    }

    /// Replace the config loader used by the pipeline.
    pub fn with_loader(mut self, loader: Arc<dyn ConfigLoader>) -> Self {
        self.pipeline = Pipeline::new(self.pipeline.root().to_path_buf()).with_loader(loader);
        self
    }

    /// Plugin name for host registration and logging.
    pub fn name(&self) -> Cow<'static, str> {
        "breeze-tailwind".into()
    }

    pub fn options(&self) -> &TailwindOptions {
        &self.options
    }

    /// Whether generated CSS is persisted to disk and referenced by URL.
    /// Requires a destination that actually lives under the static root.
    pub fn file_backed(&self) -> bool {
        self.options
            .dest
            .as_deref()
            .and_then(|dest| materialize::static_relative(dest, &self.options.static_dir))
            .is_some()
    }

    /// Whether the host should invoke [`render_async`](Self::render_async).
    /// Active when explicitly requested via `hook_render`, or whenever the
    /// plugin is not file-backed (inline mode has no other way to deliver
    /// CSS).
    pub fn render_hook_enabled(&self) -> bool {
        self.options.hook_render || !self.file_backed()
    }

    /// Build-time materialization. Processes the stylesheet and writes the
    /// result to the effective destination: the configured `dest`, else the
    /// host's output (or static) directory plus the default file name.
    /// Production builds (host reports `dev: false`) are minified.
    ///
    /// Unlike the render path there is no inline fallback here: a build
    /// step is expected to fail loudly.
    pub async fn build_start(&self, host: Option<&BuildConfig>) -> Result<()> {
        let dest = match &self.options.dest {
            Some(dest) => dest.clone(),
            None => {
                let dir = host
                    .map(|config| {
                        config
                            .out_dir
                            .clone()
                            .unwrap_or_else(|| config.static_dir.clone())
                    })
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
                dir.join(DEFAULT_STYLE_NAME)
            }
        };
        let dest = self.pipeline.root().join(dest);

        let mut scoped = self.options.clone();
        if host.is_some_and(|config| !config.dev) {
            scoped.process.minify = true;
        }

        let result = self.pipeline.process(&scoped).await?;
        if result.css.trim().is_empty() {
            warn!(dest = %dest.display(), "processed CSS is empty, skipping write");
            return Ok(());
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&dest, &result.css)
            .await
            .with_context(|| format!("failed to write generated CSS to {}", dest.display()))?;

        if scoped.process.map {
            if let Some(map) = &result.map {
                let map_path = materialize::sidecar_path(&dest);
                tokio::fs::write(&map_path, map)
                    .await
                    .with_context(|| format!("failed to write source map to {}", map_path.display()))?;
            }
        }

        info!(dest = %dest.display(), bytes = result.css.len(), "generated CSS written");
        Ok(())
    }

    /// Synchronous render hook, used in file-backed mode. Delegates to the
    /// wrapped context and emits a reference import pointing at the asset
    /// URL. Processing is async-only; this hook never runs the pipeline.
    pub fn render<C: RenderContext>(&self, ctx: &C) -> RenderedStyles {
        let _ = ctx.render();

        let dest = self
            .options
            .dest
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STYLE_DEST));
        let Some(relative) = materialize::static_relative(&dest, &self.options.static_dir) else {
            warn!(dest = %dest.display(), "destination is outside the static root, no asset URL to emit");
            return RenderedStyles::default();
        };

        let url = self.assets.asset_url(&materialize::public_path(&relative));
        RenderedStyles::single(StyleRecord::new(
            self.style_element_id(),
            format!("@import url({url});"),
        ))
    }

    /// Asynchronous render hook. Obtains the rendered markup, prepends it as
    /// a content source (the caller's options are never mutated) and
    /// materializes a per-render style record. Short-circuits to empty
    /// styles in file-backed mode to avoid double-processing.
    pub async fn render_async<C: AsyncRenderContext>(&self, ctx: &C) -> Result<RenderedStyles> {
        let rendered = ctx.render_async().await;

        if self.file_backed() {
            return Ok(RenderedStyles::default());
        }

        let mut scoped = self.options.clone();
        let mut content = vec![ContentSource::raw(rendered.html_text, ".html")];
        if let Some(existing) = scoped.content.take() {
            content.extend(existing);
        }
        scoped.content = Some(content);

        let id = self.next_style_id();
        let record = materialize::render_or_write(&self.pipeline, &scoped, &id, &*self.assets)
            .await
            .context("failed to process CSS for render")?;
        Ok(RenderedStyles::single(record))
    }

    /// One-shot installation: delegates to the binary-acquisition
    /// collaborator and returns the renamed descriptor.
    pub async fn install<I: ToolInstaller>(&self, installer: &I) -> Result<PluginDescriptor> {
        let executable = installer
            .ensure_installed(self.pipeline.root())
            .await
            .context("failed to install the styling engine CLI")?;
        info!(path = %executable.display(), "styling engine CLI available");
        Ok(PluginDescriptor {
            name: format!("{}-install", self.name()),
        })
    }

    fn style_element_id(&self) -> String {
        self.options
            .style_element_id
            .clone()
            .unwrap_or_else(|| STYLE_ELEMENT_ID.to_string())
    }

    /// Identifier for a generated per-render style block. The sequence
    /// suffix keeps repeated partial injections within one render pass
    /// distinguishable.
    fn next_style_id(&self) -> String {
        match &self.options.style_element_id {
            Some(id) => id.clone(),
            None => format!(
                "{STYLE_ELEMENT_ID}-{}",
                self.style_seq.fetch_add(1, Ordering::Relaxed)
            ),
        }
    }
}
