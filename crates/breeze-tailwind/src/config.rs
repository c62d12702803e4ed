//! Tailwind configuration resolution
//!
//! Locates and loads the user's Tailwind configuration, falling back to
//! built-in defaults when no config file exists. Loading goes through the
//! [`ConfigLoader`] capability so the resolution logic is testable without a
//! real filesystem.
//!
//! Failure classes are kept distinct: a missing file (or one in a format we
//! do not load) is expected absence and falls back to defaults with a
//! warning; a file that exists but fails to parse is a user authoring error
//! and always propagates.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::options::ContentSource;

/// Conventional config file candidates probed at the project root, in order.
pub const CONFIG_CANDIDATES: &[&str] = &["tailwind.config.toml", "tailwind.config.json"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Resolved Tailwind configuration. All three keys are always present after
/// resolution; missing keys are backfilled from defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedConfig {
    /// Content sources scanned for utility class usage.
    pub content: Vec<ContentSource>,
    /// Open-ended theme mapping.
    pub theme: serde_json::Value,
    /// Opaque plugin descriptors, handed through untouched.
    pub plugins: Vec<serde_json::Value>,
    /// Any further keys from the user's config file.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            content: vec![
                ContentSource::glob("./routes/**/*.{rs,html}"),
                ContentSource::glob("./islands/**/*.{rs,html}"),
                ContentSource::glob("./components/**/*.{rs,html}"),
                ContentSource::glob("./src/**/*.css"),
            ],
            theme: serde_json::json!({ "extend": {} }),
            plugins: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl ResolvedConfig {
    /// Shallow merge: keys present in `partial` win, untouched keys keep
    /// their defaults. Nested values are replaced wholesale, not deep-merged.
    fn merge(mut self, partial: PartialConfig) -> Self {
        if let Some(content) = partial.content {
            self.content = content;
        }
        if let Some(theme) = partial.theme {
            self.theme = theme;
        }
        if let Some(plugins) = partial.plugins {
            self.plugins = plugins;
        }
        self.extra.extend(partial.extra);
        self
    }
}

/// The shape of a user-authored config file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialConfig {
    pub content: Option<Vec<ContentSource>>,
    pub theme: Option<serde_json::Value>,
    pub plugins: Option<Vec<serde_json::Value>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Outcome of probing one config candidate. A closed enum rather than error
/// downcasting keeps the expected-absence and authoring-error classes apart.
#[derive(Debug)]
pub enum LoadOutcome {
    Found(PartialConfig),
    NotFound,
}

/// Capability for loading a config candidate. Injected so tests can resolve
/// configuration without touching the filesystem.
pub trait ConfigLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<LoadOutcome, ConfigError>;
}

/// Loads config files from disk, dispatching on the file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsConfigLoader;

impl ConfigLoader for FsConfigLoader {
    fn load(&self, path: &Path) -> Result<LoadOutcome, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadOutcome::NotFound);
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let extension = path.extension().and_then(|ext| ext.to_str());
        match extension {
            Some("toml") => {
                let partial =
                    toml::from_str::<PartialConfig>(&content).map_err(|err| ConfigError::Parse {
                        path: path.to_path_buf(),
                        message: err.to_string(),
                    })?;
                Ok(LoadOutcome::Found(partial))
            }
            Some("json") => {
                let partial = serde_json::from_str::<PartialConfig>(&content).map_err(|err| {
                    ConfigError::Parse {
                        path: path.to_path_buf(),
                        message: err.to_string(),
                    }
                })?;
                Ok(LoadOutcome::Found(partial))
            }
            // Not a format we can load; treated like an absent file.
            _ => {
                debug!(path = %path.display(), "config candidate has unsupported extension");
                Ok(LoadOutcome::NotFound)
            }
        }
    }
}

/// Resolve the Tailwind configuration for one processing invocation.
///
/// Probes the explicit `config_file` when given, otherwise the conventional
/// candidates at the project root. Results are never cached: a config edit
/// is observable on the very next call.
pub fn resolve_config(
    loader: &dyn ConfigLoader,
    root: &Path,
    config_file: Option<&Path>,
) -> Result<ResolvedConfig, ConfigError> {
    let candidates: Vec<PathBuf> = match config_file {
        Some(explicit) => vec![if explicit.is_absolute() {
            explicit.to_path_buf()
        } else {
            root.join(explicit)
        }],
        None => CONFIG_CANDIDATES.iter().map(|c| root.join(c)).collect(),
    };

    for candidate in &candidates {
        match loader.load(candidate)? {
            LoadOutcome::Found(partial) => {
                debug!(path = %candidate.display(), "loaded tailwind config");
                return Ok(ResolvedConfig::default().merge(partial));
            }
            LoadOutcome::NotFound => continue,
        }
    }

    warn!("unable to load tailwind config file, using defaults");
    Ok(ResolvedConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct StaticLoader(PartialConfig);

    impl ConfigLoader for StaticLoader {
        fn load(&self, _path: &Path) -> Result<LoadOutcome, ConfigError> {
            Ok(LoadOutcome::Found(self.0.clone()))
        }
    }

    struct AbsentLoader;

    impl ConfigLoader for AbsentLoader {
        fn load(&self, _path: &Path) -> Result<LoadOutcome, ConfigError> {
            Ok(LoadOutcome::NotFound)
        }
    }

    #[test]
    fn defaults_have_all_three_keys() {
        let config = resolve_config(&AbsentLoader, Path::new("."), None).unwrap();
        assert!(!config.content.is_empty());
        assert!(config.theme.is_object());
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn user_keys_win_untouched_keys_keep_defaults() {
        let partial: PartialConfig =
            serde_json::from_str(r#"{"content": ["a"], "theme": {"x": 1}}"#).unwrap();
        let config = resolve_config(&StaticLoader(partial), Path::new("."), None).unwrap();

        assert_eq!(config.content, vec![ContentSource::glob("a")]);
        assert_eq!(config.theme, serde_json::json!({"x": 1}));
        // plugins was not in the user config, so the default survives
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn fs_loader_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let outcome = FsConfigLoader
            .load(&dir.path().join("tailwind.config.toml"))
            .unwrap();
        assert!(matches!(outcome, LoadOutcome::NotFound));
    }

    #[test]
    fn fs_loader_parses_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tailwind.config.toml");
        std::fs::write(&path, "content = [\"./pages/**/*.rs\"]\n").unwrap();

        match FsConfigLoader.load(&path).unwrap() {
            LoadOutcome::Found(partial) => {
                assert_eq!(
                    partial.content,
                    Some(vec![ContentSource::glob("./pages/**/*.rs")])
                );
            }
            LoadOutcome::NotFound => panic!("expected config to load"),
        }
    }

    #[test]
    fn fs_loader_parses_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tailwind.config.json");
        std::fs::write(&path, r#"{"plugins": ["typography"]}"#).unwrap();

        match FsConfigLoader.load(&path).unwrap() {
            LoadOutcome::Found(partial) => {
                assert_eq!(partial.plugins.unwrap().len(), 1);
            }
            LoadOutcome::NotFound => panic!("expected config to load"),
        }
    }

    #[test]
    fn malformed_config_propagates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tailwind.config.toml");
        std::fs::write(&path, "content = [unterminated\n").unwrap();

        let err = resolve_config(&FsConfigLoader, dir.path(), Some(Path::new("tailwind.config.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unsupported_extension_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tailwind.config.ts");
        std::fs::write(&path, "export default {}").unwrap();

        let config = resolve_config(&FsConfigLoader, dir.path(), Some(&path)).unwrap();
        // defaults, not an error
        assert_eq!(config.content, ResolvedConfig::default().content);
    }

    #[test]
    fn config_edits_are_visible_on_next_call() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tailwind.config.toml");
        std::fs::write(&path, "content = [\"first\"]\n").unwrap();

        let config = resolve_config(&FsConfigLoader, dir.path(), None).unwrap();
        assert_eq!(config.content, vec![ContentSource::glob("first")]);

        std::fs::write(&path, "content = [\"second\"]\n").unwrap();
        let config = resolve_config(&FsConfigLoader, dir.path(), None).unwrap();
        assert_eq!(config.content, vec![ContentSource::glob("second")]);
    }

    #[test]
    fn extra_keys_are_carried_through() {
        let partial: PartialConfig =
            serde_json::from_str(r#"{"darkMode": "class"}"#).unwrap();
        let config = resolve_config(&StaticLoader(partial), Path::new("."), None).unwrap();
        assert_eq!(config.extra.get("darkMode"), Some(&serde_json::json!("class")));
    }
}
