//! Build command implementation.
//!
//! Drives the plugin's build-time path directly: resolve config, run the
//! transform chain, and write the output to the destination.

use breeze_tailwind::{ProcessOptions, TailwindOptions, TailwindPlugin};
use tracing::info;

use crate::cli::BuildArgs;
use crate::error::Result;

pub async fn execute(args: BuildArgs) -> Result<()> {
    let mut options = TailwindOptions::new()
        .with_static_dir(&args.static_dir)
        .with_process_options(ProcessOptions {
            minify: args.minify,
            map: args.map,
            ..ProcessOptions::default()
        });
    if let Some(css) = args.css {
        options = options.with_css(css);
    }
    if let Some(dest) = &args.dest {
        options = options.with_dest(dest);
    }
    if let Some(config) = &args.config {
        options = options.with_config_file(config);
    }

    let plugin = TailwindPlugin::with_root(options, &args.root);
    plugin.build_start(None).await?;

    info!("build complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args_for(root: &std::path::Path) -> BuildArgs {
        BuildArgs {
            root: root.to_path_buf(),
            css: None,
            dest: Some(PathBuf::from("./static/styles.css")),
            static_dir: PathBuf::from("./static"),
            config: None,
            minify: false,
            map: false,
        }
    }

    #[tokio::test]
    async fn build_writes_generated_css() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("routes")).unwrap();
        std::fs::write(
            dir.path().join("routes/index.html"),
            r#"<main class="flex p-4"></main>"#,
        )
        .unwrap();

        execute(args_for(dir.path())).await.unwrap();

        let css = std::fs::read_to_string(dir.path().join("static/styles.css")).unwrap();
        assert!(css.contains(".flex"));
        assert!(css.contains(".p-4"));
    }

    #[tokio::test]
    async fn minify_flag_is_honored() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("routes")).unwrap();
        std::fs::write(
            dir.path().join("routes/index.html"),
            r#"<main class="flex"></main>"#,
        )
        .unwrap();

        let mut args = args_for(dir.path());
        args.minify = true;
        execute(args).await.unwrap();

        let css = std::fs::read_to_string(dir.path().join("static/styles.css")).unwrap();
        assert!(!css.contains("\n  "));
    }
}
