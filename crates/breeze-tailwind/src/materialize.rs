//! Output materialization
//!
//! Decides whether a processing result is written to a static destination
//! and referenced by URL, or inlined straight into the style record. The
//! render path must never fail because a disk write failed: write failures
//! degrade to inline CSS with a warning.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use path_clean::PathClean;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::host::{AssetUrlResolver, StyleRecord};
use crate::options::TailwindOptions;
use crate::pipeline::{Pipeline, ProcessingResult};

/// The static-relative remainder of `dest`, when `dest` lives under
/// `static_dir`. Lexical prefix comparison on cleaned paths, so a sibling
/// directory like `./static-backup` never matches root `./static`.
pub(crate) fn static_relative(dest: &Path, static_dir: &Path) -> Option<PathBuf> {
    let dest = dest.clean();
    let static_dir = static_dir.clean();
    dest.strip_prefix(&static_dir)
        .ok()
        .map(|rest| rest.to_path_buf())
}

/// Root-relative URL path for a static-relative file, unix separators.
pub(crate) fn public_path(relative: &Path) -> String {
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

/// Inline CSS, appending the source map as a base64 data-URI comment when
/// one was produced.
fn inline_css(result: &ProcessingResult) -> String {
    match &result.map {
        Some(map) => format!(
            "{}\n/*# sourceMappingURL=data:application/json;base64,{} */",
            result.css,
            BASE64.encode(map)
        ),
        None => result.css.clone(),
    }
}

/// Process the stylesheet and either persist it to the destination (asset
/// reference mode) or inline it into the returned record.
///
/// Processing failures propagate; write failures do not: the record falls
/// back to inline CSS so a render never breaks on a full disk or a
/// read-only directory.
pub async fn render_or_write(
    pipeline: &Pipeline,
    options: &TailwindOptions,
    style_id: &str,
    assets: &dyn AssetUrlResolver,
) -> Result<StyleRecord> {
    // CSS processing is build/server-only
    if cfg!(target_arch = "wasm32") {
        return Ok(StyleRecord::empty(style_id));
    }

    let destination = options
        .dest
        .as_ref()
        .and_then(|dest| static_relative(dest, &options.static_dir).map(|rel| (dest.clone(), rel)));

    let result = pipeline.process(options).await?;

    let Some((dest, relative)) = destination else {
        return Ok(StyleRecord::new(style_id, inline_css(&result)));
    };

    let dest = pipeline.root().join(dest);
    match write_css(&dest, &result.css).await {
        Ok(()) => {
            if options.process.map {
                if let Some(map) = &result.map {
                    let map_path = sidecar_path(&dest);
                    if let Err(err) = tokio::fs::write(&map_path, map).await {
                        // best-effort: the primary CSS write already succeeded
                        warn!(path = %map_path.display(), error = %err, "failed to write source map sidecar");
                    }
                }
            }
            let url = assets.asset_url(&public_path(&relative));
            debug!(dest = %dest.display(), url = %url, "wrote generated CSS");
            Ok(StyleRecord::new(style_id, format!("@import url({url});")))
        }
        Err(err) => {
            warn!(dest = %dest.display(), error = %err, "failed to write generated CSS, inlining instead");
            Ok(StyleRecord::new(style_id, inline_css(&result)))
        }
    }
}

/// `<dest>.map`, next to the CSS file.
pub(crate) fn sidecar_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".map");
    dest.with_file_name(name)
}

async fn write_css(dest: &Path, css: &str) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(dest, css).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PassthroughAssets;
    use crate::options::ContentSource;
    use tempfile::TempDir;

    fn options_with_markup(markup: &str) -> TailwindOptions {
        TailwindOptions::new().with_content(vec![ContentSource::raw(markup, ".html")])
    }

    #[test]
    fn prefix_gate_accepts_children_only() {
        assert_eq!(
            static_relative(Path::new("./static/out.css"), Path::new("./static")),
            Some(PathBuf::from("out.css"))
        );
        assert_eq!(
            static_relative(Path::new("./static/css/site.css"), Path::new("./static")),
            Some(PathBuf::from("css/site.css"))
        );
        // substring of the root name is not containment
        assert_eq!(
            static_relative(Path::new("./static-backup/out.css"), Path::new("./static")),
            None
        );
    }

    #[test]
    fn sidecar_sits_next_to_css() {
        assert_eq!(
            sidecar_path(Path::new("static/styles.css")),
            PathBuf::from("static/styles.css.map")
        );
    }

    #[tokio::test]
    async fn file_backed_mode_writes_and_references() {
        let dir = TempDir::new().unwrap();
        let options = options_with_markup(r#"<div class="flex"></div>"#)
            .with_dest("./static/out.css")
            .with_static_dir("./static");

        let pipeline = Pipeline::new(dir.path());
        let record = render_or_write(&pipeline, &options, "style", &PassthroughAssets)
            .await
            .unwrap();

        assert_eq!(record.css_text, "@import url(/out.css);");
        let written = std::fs::read_to_string(dir.path().join("static/out.css")).unwrap();
        assert!(written.contains(".flex"));
    }

    #[tokio::test]
    async fn no_destination_inlines_raw_css() {
        let dir = TempDir::new().unwrap();
        let options = options_with_markup(r#"<div class="flex"></div>"#);

        let pipeline = Pipeline::new(dir.path());
        let record = render_or_write(&pipeline, &options, "style", &PassthroughAssets)
            .await
            .unwrap();

        assert!(record.css_text.contains(".flex"));
        assert!(!record.css_text.starts_with("@import"));
    }

    #[tokio::test]
    async fn destination_outside_static_root_inlines() {
        let dir = TempDir::new().unwrap();
        let options = options_with_markup(r#"<div class="flex"></div>"#)
            .with_dest("./static-backup/out.css")
            .with_static_dir("./static");

        let pipeline = Pipeline::new(dir.path());
        let record = render_or_write(&pipeline, &options, "style", &PassthroughAssets)
            .await
            .unwrap();

        assert!(record.css_text.contains(".flex"));
        assert!(!dir.path().join("static-backup/out.css").exists());
    }

    #[tokio::test]
    async fn write_failure_falls_back_to_inline() {
        let dir = TempDir::new().unwrap();
        // a plain file where the static directory should be makes
        // create_dir_all fail
        std::fs::write(dir.path().join("static"), "not a directory").unwrap();

        let options = options_with_markup(r#"<div class="flex"></div>"#)
            .with_dest("./static/out.css")
            .with_static_dir("./static");

        let pipeline = Pipeline::new(dir.path());
        let record = render_or_write(&pipeline, &options, "style", &PassthroughAssets)
            .await
            .unwrap();

        assert!(!record.css_text.is_empty());
        assert!(record.css_text.contains(".flex"));
        assert!(!record.css_text.starts_with("@import"));
    }

    #[tokio::test]
    async fn map_sidecar_is_written_when_requested() {
        let dir = TempDir::new().unwrap();
        let mut options = options_with_markup(r#"<div class="flex"></div>"#)
            .with_dest("./static/out.css")
            .with_static_dir("./static");
        options.process.map = true;

        let pipeline = Pipeline::new(dir.path());
        render_or_write(&pipeline, &options, "style", &PassthroughAssets)
            .await
            .unwrap();

        let map = std::fs::read_to_string(dir.path().join("static/out.css.map")).unwrap();
        assert!(map.contains("\"version\""));
    }

    #[tokio::test]
    async fn inline_map_is_embedded_as_data_uri() {
        let dir = TempDir::new().unwrap();
        let mut options = options_with_markup(r#"<div class="flex"></div>"#);
        options.process.map = true;

        let pipeline = Pipeline::new(dir.path());
        let record = render_or_write(&pipeline, &options, "style", &PassthroughAssets)
            .await
            .unwrap();

        assert!(record
            .css_text
            .contains("sourceMappingURL=data:application/json;base64,"));
    }
}
