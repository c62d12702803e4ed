//! Standalone Tailwind CLI acquisition.
//!
//! Downloads the official release binary for the current platform, verifies
//! it against the published sha256 manifest before anything touches disk,
//! and places it under `<root>/bin`. Skips the download entirely when the
//! project's task file already wires up a tailwind task.

use reqwest::Client;
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::InstallError;
use crate::scaffold;

pub const TAILWIND_VERSION: &str = "3.3.5";

fn release_url(version: &str) -> String {
    format!("https://github.com/tailwindlabs/tailwindcss/releases/download/v{version}")
}

/// Parse the `sha256sums.txt` manifest into asset-name → digest entries.
/// Windows assets are keyed without their `.exe` suffix so lookups are
/// uniform across platforms.
fn parse_checksums(text: &str) -> FxHashMap<String, String> {
    let mut checksums = FxHashMap::default();
    for line in text.lines() {
        let mut parts = line.split_whitespace();
        let (Some(digest), Some(filename)) = (parts.next(), parts.next()) else {
            continue;
        };
        checksums.insert(
            filename.trim_end_matches(".exe").to_string(),
            digest.to_string(),
        );
    }
    checksums
}

/// Release asset name for an OS/architecture pair, in the naming scheme the
/// Tailwind releases use. Returns `None` for platforms without a published
/// binary.
fn platform_asset(os: &str, arch: &str) -> Option<String> {
    let os = match os {
        "macos" => "macos",
        "linux" => "linux",
        "windows" => "windows",
        _ => return None,
    };
    let arch = match arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "arm" => "armv7",
        _ => return None,
    };
    Some(format!("tailwindcss-{os}-{arch}"))
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Downloads and verifies the Tailwind CLI release binary.
pub struct TailwindInstaller {
    version: String,
    client: Client,
}

impl Default for TailwindInstaller {
    fn default() -> Self {
        Self::new(TAILWIND_VERSION)
    }
}

impl TailwindInstaller {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            client: Client::new(),
        }
    }

    /// Download the binary for the current platform into `<root>/bin`,
    /// verifying the sha256 digest before writing.
    pub async fn download(&self, root: &Path) -> Result<PathBuf, InstallError> {
        let platform = format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH);
        let asset =
            platform_asset(std::env::consts::OS, std::env::consts::ARCH).ok_or_else(|| {
                InstallError::AssetNotFound {
                    platform: platform.clone(),
                }
            })?;

        let repo = release_url(&self.version);
        info!(version = %self.version, "fetching Tailwind CLI checksums");
        let manifest = self
            .client
            .get(format!("{repo}/sha256sums.txt"))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let checksums = parse_checksums(&manifest);
        let expected = checksums
            .get(&asset)
            .ok_or_else(|| InstallError::ManifestIncomplete {
                asset: asset.clone(),
            })?;

        let exe_suffix = if std::env::consts::OS == "windows" {
            ".exe"
        } else {
            ""
        };
        info!(version = %self.version, platform = %platform, "downloading Tailwind CLI");
        let data = self
            .client
            .get(format!("{repo}/{asset}{exe_suffix}"))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        // verify before anything touches disk
        let actual = hex_digest(&Sha256::digest(&data));
        if &actual != expected {
            return Err(InstallError::ChecksumMismatch {
                expected: expected.clone(),
                actual,
            });
        }

        let bin_dir = root.join("bin");
        tokio::fs::create_dir_all(&bin_dir)
            .await
            .map_err(|source| InstallError::Io {
                path: bin_dir.clone(),
                source,
            })?;
        let executable = bin_dir.join(format!("tailwindcss{exe_suffix}"));
        tokio::fs::write(&executable, &data)
            .await
            .map_err(|source| InstallError::Io {
                path: executable.clone(),
                source,
            })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&executable, std::fs::Permissions::from_mode(0o755))
                .await
                .map_err(|source| InstallError::Io {
                    path: executable.clone(),
                    source,
                })?;
        }

        info!(path = %executable.display(), version = %self.version, "Tailwind CLI installed");
        Ok(executable)
    }
}

impl breeze_tailwind::ToolInstaller for TailwindInstaller {
    fn ensure_installed(
        &self,
        project_root: &Path,
    ) -> impl Future<Output = anyhow::Result<PathBuf>> + Send {
        let root = project_root.to_path_buf();
        async move {
            // an existing tailwind task means a previous install succeeded
            if let Some(task) = scaffold::existing_tailwind_task(&root).await? {
                debug!(task = %task, "tailwind task already configured, skipping download");
                return Ok(root.join("bin").join("tailwindcss"));
            }
            Ok(self.download(&root).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksums_parse_and_strip_exe_suffix() {
        let manifest = "\
abc123  tailwindcss-linux-x64
def456  tailwindcss-macos-arm64
789fed  tailwindcss-windows-x64.exe

";
        let checksums = parse_checksums(manifest);
        assert_eq!(checksums["tailwindcss-linux-x64"], "abc123");
        assert_eq!(checksums["tailwindcss-macos-arm64"], "def456");
        assert_eq!(checksums["tailwindcss-windows-x64"], "789fed");
    }

    #[test]
    fn platform_asset_maps_rust_names_to_release_names() {
        assert_eq!(
            platform_asset("macos", "aarch64").as_deref(),
            Some("tailwindcss-macos-arm64")
        );
        assert_eq!(
            platform_asset("linux", "x86_64").as_deref(),
            Some("tailwindcss-linux-x64")
        );
        assert_eq!(
            platform_asset("windows", "x86_64").as_deref(),
            Some("tailwindcss-windows-x64")
        );
        assert_eq!(platform_asset("freebsd", "x86_64"), None);
        assert_eq!(platform_asset("linux", "riscv64"), None);
    }

    #[test]
    fn digests_render_as_lowercase_hex() {
        assert_eq!(hex_digest(&[0x00, 0xff, 0x0a]), "00ff0a");
        let digest = Sha256::digest(b"hello");
        assert_eq!(
            hex_digest(&digest),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn release_url_embeds_version() {
        assert!(release_url("3.3.5").ends_with("/v3.3.5"));
    }
}
