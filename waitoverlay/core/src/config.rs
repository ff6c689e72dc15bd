//! Configuration Loading
//!
//! The settings baseline can come from three layers, applied in order:
//!
//! 1. Built-in defaults ([`Settings::default`])
//! 2. A TOML file (`$XDG_CONFIG_HOME/waitoverlay/config.toml` unless given)
//! 3. `WAITOVERLAY_*` environment variables
//!
//! Each file layer is a [`PartialSettings`] tree, so only the keys it names
//! change. Environment variables cover the handful of leaves that are
//! commonly tuned per deployment.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::merge::{merge, PartialSettings, PartialSize};
use crate::settings::Settings;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid override tree
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// A JSON override tree is malformed
    #[error("invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where a configuration layer came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults
    Defaults,
    /// A TOML file
    File(PathBuf),
    /// `WAITOVERLAY_*` environment variables
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// Default location of the configuration file, if the platform has one
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("waitoverlay").join("config.toml"))
}

/// Read an override tree from a TOML file
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is not a valid override tree.
pub fn load_config_from_path(path: &Path) -> Result<PartialSettings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the override tree from the default location
///
/// A missing file (or a platform without a config directory) yields an empty
/// override.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<PartialSettings, ConfigError> {
    load_optional(default_config_path().as_deref())
}

fn load_optional(path: Option<&Path>) -> Result<PartialSettings, ConfigError> {
    match path {
        Some(path) if path.exists() => load_config_from_path(path),
        _ => Ok(PartialSettings::default()),
    }
}

/// Parse a JSON option tree as passed to a show call
///
/// # Errors
///
/// Returns [`ConfigError::Json`] if the JSON is malformed or mistyped.
pub fn options_from_json(json: &str) -> Result<PartialSettings, ConfigError> {
    Ok(PartialSettings::from_json(json)?)
}

/// Overrides taken from `WAITOVERLAY_*` environment variables
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Fade-in duration in milliseconds
    pub fade_in: Option<u64>,
    /// Fade-out duration in milliseconds
    pub fade_out: Option<u64>,
    /// Base size value
    pub size: Option<f64>,
    /// Stacking order; `Some(None)` clears it
    pub z_index: Option<Option<i64>>,
    /// Backdrop color
    pub background: Option<String>,
}

impl ConfigOverrides {
    /// Read overrides from the process environment
    ///
    /// Environment variables:
    /// - `WAITOVERLAY_FADE_IN`: Fade-in duration in ms
    /// - `WAITOVERLAY_FADE_OUT`: Fade-out duration in ms
    /// - `WAITOVERLAY_SIZE`: Base size value
    /// - `WAITOVERLAY_Z_INDEX`: Stacking order, or "none" to leave it unset
    /// - `WAITOVERLAY_BACKGROUND`: Backdrop color
    ///
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let z_index = parsed("WAITOVERLAY_Z_INDEX").and_then(|v| {
            if v.eq_ignore_ascii_case("none") || v.eq_ignore_ascii_case("auto") {
                Some(None)
            } else {
                v.parse().ok().map(Some)
            }
        });
        Self {
            fade_in: parsed("WAITOVERLAY_FADE_IN").and_then(|v| v.parse().ok()),
            fade_out: parsed("WAITOVERLAY_FADE_OUT").and_then(|v| v.parse().ok()),
            size: parsed("WAITOVERLAY_SIZE")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite()),
            z_index,
            background: parsed("WAITOVERLAY_BACKGROUND").filter(|v| !v.is_empty()),
        }
    }

    /// Whether no variable was set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Express the overrides as an override tree on top of `base`
    ///
    /// `fade` is replaced wholesale when merged, so a single fade variable
    /// keeps the other half from `base`.
    #[must_use]
    pub fn to_partial(&self, base: &Settings) -> PartialSettings {
        let fade = (self.fade_in.is_some() || self.fade_out.is_some()).then(|| {
            [
                self.fade_in.unwrap_or(base.fade[0]),
                self.fade_out.unwrap_or(base.fade[1]),
            ]
        });
        PartialSettings {
            fade,
            size: self.size.map(|value| PartialSize {
                value: Some(value),
                units: None,
            }),
            z_index: self.z_index,
            background: self.background.clone(),
            ..Default::default()
        }
    }
}

/// A settings baseline and the layers it was built from
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    /// Effective settings
    pub settings: Settings,
    /// Layers applied, in order
    pub sources: Vec<ConfigSource>,
}

/// Build the settings baseline from defaults, an optional file and the
/// environment
///
/// `path = None` uses [`default_config_path`] and tolerates a missing file;
/// an explicit path must exist.
///
/// # Errors
///
/// Returns an error if a config file cannot be read or parsed.
pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<LoadedConfig, ConfigError> {
    let mut sources = vec![ConfigSource::Defaults];
    let mut settings = Settings::default();

    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };
    if let Some(file) = file {
        let partial = load_config_from_path(&file)?;
        settings = merge(&settings, Some(&partial));
        tracing::debug!(path = %file.display(), "Loaded config file");
        sources.push(ConfigSource::File(file));
    }

    if !overrides.is_empty() {
        let partial = overrides.to_partial(&settings);
        settings = merge(&settings, Some(&partial));
        sources.push(ConfigSource::Environment);
    }

    Ok(LoadedConfig { settings, sources })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_config_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
background = "#000"
fade = [100, 200]

[text]
enabled = true
value = "Loading"
"##
        )
        .unwrap();

        let partial = load_config_from_path(file.path()).unwrap();
        assert_eq!(partial.background.as_deref(), Some("#000"));
        assert_eq!(partial.fade, Some([100, 200]));
        let text = partial.text.unwrap();
        assert_eq!(text.enabled, Some(true));
        assert_eq!(text.value.as_deref(), Some("Loading"));
        assert_eq!(partial.image, None);
    }

    #[test]
    fn test_load_config_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from_path(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_missing_default_file_is_empty_override() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("waitoverlay").join("config.toml");
        assert_eq!(load_optional(Some(&absent)).unwrap(), PartialSettings::default());
        assert_eq!(load_optional(None).unwrap(), PartialSettings::default());

        std::fs::create_dir_all(absent.parent().unwrap()).unwrap();
        std::fs::write(&absent, "background = \"red\"\n").unwrap();
        let partial = load_optional(Some(&absent)).unwrap();
        assert_eq!(partial.background.as_deref(), Some("red"));
    }

    #[test]
    fn test_load_config_rejects_wrong_types() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fade = \"slow\"").unwrap();
        let err = load_config_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("invalid config file"));
    }

    #[test]
    fn test_options_from_json() {
        let partial = options_from_json(r#"{"progress": {"enabled": true, "max": 10}}"#).unwrap();
        assert_eq!(partial.progress.and_then(|p| p.max), Some(10.0));

        let err = options_from_json(r#"{"fade": "slow"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let overrides = ConfigOverrides::from_lookup(lookup(&[
            ("WAITOVERLAY_FADE_OUT", " 0 "),
            ("WAITOVERLAY_SIZE", "abc"),
            ("WAITOVERLAY_Z_INDEX", "none"),
            ("WAITOVERLAY_BACKGROUND", "rgba(0,0,0,0.5)"),
        ]));
        assert_eq!(
            overrides,
            ConfigOverrides {
                fade_in: None,
                fade_out: Some(0),
                size: None,
                z_index: Some(None),
                background: Some("rgba(0,0,0,0.5)".to_string()),
            }
        );
        assert!(ConfigOverrides::from_lookup(lookup(&[])).is_empty());
    }

    #[test]
    fn test_single_fade_variable_keeps_other_half() {
        let overrides = ConfigOverrides {
            fade_out: Some(10),
            ..Default::default()
        };
        let base = Settings::default();
        let partial = overrides.to_partial(&base);
        assert_eq!(partial.fade, Some([base.fade[0], 10]));
    }

    #[test]
    fn test_resolve_layers_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "background = \"red\"\nzIndex = 5").unwrap();
        let overrides = ConfigOverrides {
            background: Some("blue".to_string()),
            ..Default::default()
        };

        let loaded = resolve(Some(file.path()), &overrides).unwrap();
        assert_eq!(loaded.settings.background, "blue");
        assert_eq!(loaded.settings.z_index, Some(5));
        assert_eq!(
            loaded.sources,
            vec![
                ConfigSource::Defaults,
                ConfigSource::File(file.path().to_path_buf()),
                ConfigSource::Environment,
            ]
        );
    }
}
