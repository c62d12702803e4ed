//! Install command implementation.
//!
//! # Process
//!
//! 1. Skip the download when the task file already has a tailwind task
//! 2. Download and checksum-verify the release binary for this platform
//! 3. Scaffold task entries, config file, and preflight stylesheet
//!    (unless `--no-scaffold`)

use tracing::info;

use crate::cli::InstallArgs;
use crate::error::Result;
use crate::installer::TailwindInstaller;
use crate::scaffold;

pub async fn execute(args: InstallArgs) -> Result<()> {
    let executable = match scaffold::existing_tailwind_task(&args.root).await? {
        Some(task) => {
            info!(task = %task, "tailwind task already configured, skipping download");
            args.root.join("bin").join("tailwindcss")
        }
        None => TailwindInstaller::default().download(&args.root).await?,
    };

    if !args.no_scaffold {
        scaffold::scaffold(&args.root).await?;
    }

    info!(path = %executable.display(), "install complete; run the tailwind:build task for full engine output");
    Ok(())
}
