//! Configuration file handling for ascii-courier.
//!
//! Loads configuration from `~/.config/ascii-courier/config.toml` or a custom path,
//! then applies environment overrides (after `.env` has been loaded by the binary).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ascii::ConversionConfig;
use crate::messages::Locale;

/// Default socket address for `serve`.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default interval between background sweeps (30 minutes).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30 * 60;

/// Default mail relay endpoint.
pub const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com";

/// Configuration file structure for ascii-courier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Public base URL used to build download links.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            base_url: None,
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl ServerConfig {
    /// Base URL for download links, derived from the bind address when unset.
    pub fn effective_base_url(&self) -> String {
        match &self.base_url {
            Some(url) if !url.trim().is_empty() => {
                let url = url.trim().trim_end_matches('/');
                if url.starts_with("http://") || url.starts_with("https://") {
                    url.to_string()
                } else {
                    format!("https://{}", url)
                }
            }
            _ => format!("http://{}", self.bind),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory for stored artifacts. Defaults to `<tmp>/ascii-courier`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl StoreConfig {
    pub fn effective_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("ascii-courier"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_mail_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sender address.
    #[serde(default)]
    pub from: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: default_mail_api_url(),
            api_key: None,
            from: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub locale: Locale,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_sweep_interval() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}

fn default_mail_api_url() -> String {
    DEFAULT_MAIL_API_URL.to_string()
}

impl Config {
    /// Load configuration from a file path and apply environment overrides.
    ///
    /// A missing default file yields defaults. An explicitly given path must
    /// exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::load_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load only the file layer, without environment overrides.
    pub fn load_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some();
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else if explicit {
            Err(ConfigError::IoError {
                path,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            })
        } else {
            Ok(Config::default())
        }
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = get("ASCII_COURIER_BIND") {
            self.server.bind = bind;
        }
        if let Some(url) = get("ASCII_COURIER_BASE_URL").or_else(|| get("NEXT_PUBLIC_VERCEL_URL")) {
            self.server.base_url = Some(url);
        }
        if let Some(dir) = get("ASCII_COURIER_STORE_DIR") {
            self.store.dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = get("MAIL_API_URL") {
            self.mail.api_url = url;
        }
        if let Some(key) = get("MAIL_API_KEY") {
            self.mail.api_key = Some(key);
        }
        if let Some(from) = get("EMAIL_USER") {
            self.mail.from = Some(from);
        }
        if let Some(font) = get("ASCII_COURIER_FONT") {
            self.render.font_path = Some(PathBuf::from(font));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.conversion
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.server.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.sweep_interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize to TOML, as written by `config init`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }

    /// Copy with secrets masked, for `config show`.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.mail.api_key.is_some() {
            copy.mail.api_key = Some("********".to_string());
        }
        copy
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    SerializeError(toml::ser::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::SerializeError(source) => {
                write!(f, "Failed to serialize config: {}", source)
            }
            ConfigError::Invalid(reason) => write!(f, "Invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::SerializeError(source) => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ascii-courier").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-courier/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::CharSet;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.server.sweep_interval_secs, 1800);
        assert_eq!(config.mail.api_url, DEFAULT_MAIL_API_URL);
        assert_eq!(config.ui.locale, Locale::Ar);
        assert!(config.mail.api_key.is_none());
    }

    #[test]
    fn test_load_missing_explicit_path_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = Config::load_file(Some(&missing));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_load_file_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
bind = "0.0.0.0:8080"
base_url = "https://art.example.com/"
sweep_interval_secs = 60

[store]
dir = "/var/tmp/art"

[mail]
from = "art@example.com"

[conversion]
resolution = 0.2
charset = "blocks"
grayscale = false

[ui]
locale = "en"
"#,
        )
        .unwrap();

        let config = Config::load_file(Some(&path)).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.effective_base_url(), "https://art.example.com");
        assert_eq!(config.server.sweep_interval_secs, 60);
        assert_eq!(config.store.effective_dir(), PathBuf::from("/var/tmp/art"));
        assert_eq!(config.mail.from.as_deref(), Some("art@example.com"));
        assert_eq!(config.mail.api_url, DEFAULT_MAIL_API_URL);
        assert_eq!(config.conversion.resolution, 0.2);
        assert_eq!(config.conversion.charset, CharSet::Blocks);
        assert!(!config.conversion.grayscale);
        assert_eq!(config.ui.locale, Locale::En);
    }

    #[test]
    fn test_parse_error_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nbind = ").unwrap();
        let err = Config::load_file(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("ASCII_COURIER_BIND", "0.0.0.0:9000"),
            ("MAIL_API_KEY", "secret"),
            ("EMAIL_USER", "me@example.com"),
            ("ASCII_COURIER_STORE_DIR", "/tmp/x"),
            ("ASCII_COURIER_FONT", "/fonts/mono.ttf"),
        ]));
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.mail.api_key.as_deref(), Some("secret"));
        assert_eq!(config.mail.from.as_deref(), Some("me@example.com"));
        assert_eq!(config.store.dir, Some(PathBuf::from("/tmp/x")));
        assert_eq!(config.render.font_path, Some(PathBuf::from("/fonts/mono.ttf")));
    }

    #[test]
    fn test_base_url_fallback_variable() {
        let mut config = Config::default();
        config.apply_env(env(&[("NEXT_PUBLIC_VERCEL_URL", "my-app.vercel.app")]));
        assert_eq!(config.server.effective_base_url(), "https://my-app.vercel.app");

        let mut config = Config::default();
        config.apply_env(env(&[
            ("NEXT_PUBLIC_VERCEL_URL", "my-app.vercel.app"),
            ("ASCII_COURIER_BASE_URL", "http://localhost:3000"),
        ]));
        assert_eq!(config.server.effective_base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[("MAIL_API_KEY", "  ")]));
        assert!(config.mail.api_key.is_none());
    }

    #[test]
    fn test_base_url_defaults_to_bind() {
        let config = Config::default();
        assert_eq!(config.server.effective_base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn test_validate_rejects_bad_resolution() {
        let mut config = Config::default();
        config.conversion.resolution = 0.9;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_toml_roundtrip_and_redaction() {
        let mut config = Config::default();
        config.mail.api_key = Some("secret".into());
        let shown = config.redacted().to_toml().unwrap();
        assert!(!shown.contains("secret"));
        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.mail.api_key.as_deref(), Some("secret"));
    }
}
