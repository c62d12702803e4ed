//! Error types for the Breeze CLI.
//!
//! `CliError` is the top-level type returned by commands; domain-specific
//! variants convert into it via `#[from]`. `to_report` turns the result into
//! a miette diagnostic for rendering at the process boundary.

use miette::{Diagnostic, Report};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failures while acquiring the standalone Tailwind CLI
    #[error("Install error: {0}")]
    Install(#[from] InstallError),

    /// Failures inside the CSS processing pipeline
    #[error("Build error: {0}")]
    Build(#[from] anyhow::Error),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Task file could not be parsed or updated
    #[error("Task file error in {}: {message}", path.display())]
    TaskFile { path: PathBuf, message: String },
}

/// Errors from downloading and verifying the Tailwind CLI binary.
#[derive(Debug, Error, Diagnostic)]
pub enum InstallError {
    #[error("no Tailwind CLI release asset for {platform}")]
    #[diagnostic(
        code(breeze::install::asset_not_found),
        help("supported platforms are macos/linux/windows on x64 and arm64; download a binary manually from the Tailwind releases page and place it in ./bin")
    )]
    AssetNotFound { platform: String },

    #[error("checksum mismatch for downloaded binary (expected {expected}, got {actual})")]
    #[diagnostic(
        code(breeze::install::checksum_mismatch),
        help("the download may be corrupt or tampered with; retry, or fetch the binary manually and verify it against sha256sums.txt")
    )]
    ChecksumMismatch { expected: String, actual: String },

    #[error("checksum manifest is missing an entry for {asset}")]
    #[diagnostic(code(breeze::install::manifest_incomplete))]
    ManifestIncomplete { asset: String },

    #[error("download failed")]
    #[diagnostic(
        code(breeze::install::http),
        help("check network access to github.com and objects.githubusercontent.com")
    )]
    Http(#[from] reqwest::Error),

    #[error("failed to write {}", path.display())]
    #[diagnostic(code(breeze::install::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convert a CLI error into a miette report for terminal rendering.
pub fn to_report(err: CliError) -> Report {
    match err {
        CliError::Install(e) => Report::new(e),
        CliError::Build(e) => miette::miette!("{e:?}"),
        other => miette::miette!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_errors_render_with_context() {
        let err = InstallError::AssetNotFound {
            platform: "solaris-sparc".to_string(),
        };
        assert!(err.to_string().contains("solaris-sparc"));
    }

    #[test]
    fn checksum_mismatch_names_both_digests() {
        let err = InstallError::ChecksumMismatch {
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("aa"));
        assert!(message.contains("bb"));
    }
}
