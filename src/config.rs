//! Configuration file parser for ~/.config/scryfall-rss/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde and logged as a warning.
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid value for '{key}' in config file: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Command-line flags override whatever is loaded here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the feed is written when `--output` is not given.
    pub output: PathBuf,

    /// Base URL of the search API.
    pub api_base_url: String,

    /// Base URL of the human-facing site, used for the feed link.
    pub site_base_url: String,

    /// User-Agent sent with every API request.
    pub user_agent: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum accepted response body size in bytes.
    pub max_response_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("scryfall_feed.xml"),
            api_base_url: "https://api.scryfall.com".to_string(),
            site_base_url: "https://scryfall.com".to_string(),
            user_agent: "ScryFallRSSGenerator/1.0".to_string(),
            timeout_secs: 30,
            max_response_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "output",
        "api_base_url",
        "site_base_url",
        "user_agent",
        "timeout_secs",
        "max_response_bytes",
    ];

    /// Default location: `$HOME/.config/scryfall-rss/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("scryfall-rss")
                .join("config.toml")
        })
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing or blank file → `Ok(Config::default())`
    /// - Invalid TOML or wrong value types → `Err(ConfigError::Parse)`
    /// - Unusable values (unparseable base URL, zero timeout) → `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, reported in a single warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        // Size comes from the open handle, so it describes the bytes we read
        let size = file.metadata()?.len();
        if size > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "Config file is {} bytes (max {} bytes)",
                size,
                Self::MAX_FILE_SIZE
            )));
        }

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is blank, using defaults");
            return Ok(Self::default());
        }

        let table: toml::Table = content.parse()?;
        let unknown: Vec<&str> = table
            .keys()
            .map(String::as_str)
            .filter(|key| !Self::KNOWN_KEYS.contains(key))
            .collect();
        if !unknown.is_empty() {
            tracing::warn!(path = %path.display(), keys = ?unknown, "Ignoring unknown config keys");
        }

        let config: Config = toml::Value::Table(table).try_into()?;
        config.validate()?;

        tracing::info!(
            path = %path.display(),
            api = %config.api_base_url,
            output = %config.output.display(),
            timeout_secs = config.timeout_secs,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Rejects values that would only fail later, mid-run.
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("api_base_url", &self.api_base_url),
            ("site_base_url", &self.site_base_url),
        ] {
            Url::parse(value).map_err(|e| ConfigError::Invalid {
                key,
                reason: format!("'{value}' is not a URL: {e}"),
            })?;
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_response_bytes == 0 {
            return Err(ConfigError::Invalid {
                key: "max_response_bytes",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("scryfall_rss_config_test_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output, PathBuf::from("scryfall_feed.xml"));
        assert_eq!(config.api_base_url, "https://api.scryfall.com");
        assert_eq!(config.site_base_url, "https://scryfall.com");
        assert_eq!(config.user_agent, "ScryFallRSSGenerator/1.0");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_response_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/scryfall_rss_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("whitespace", "   \n  \n  ");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config("partial", "timeout_secs = 5\n");

        let config = Config::load(&path).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.api_base_url, "https://api.scryfall.com");
        assert_eq!(config.output, PathBuf::from("scryfall_feed.xml"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
output = "/srv/feeds/angels.xml"
api_base_url = "https://mirror.example.com/api/"
site_base_url = "https://mirror.example.com"
user_agent = "MyFeeds/2.0"
timeout_secs = 10
max_response_bytes = 2048
"#;
        let (dir, path) = write_config("full", content);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.output, PathBuf::from("/srv/feeds/angels.xml"));
        assert_eq!(config.api_base_url, "https://mirror.example.com/api/");
        assert_eq!(config.site_base_url, "https://mirror.example.com");
        assert_eq!(config.user_agent, "MyFeeds/2.0");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_response_bytes, 2048);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let (dir, path) = write_config("wrongtype", "timeout_secs = \"soon\"\n");
        assert!(Config::load(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config("unknown", "user_agent = \"X/1\"\ntheme = \"dark\"\n");

        let config = Config::load(&path).unwrap();
        assert_eq!(config.user_agent, "X/1");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unparseable_base_url_rejected() {
        let (dir, path) = write_config("bad_url", "api_base_url = \"api.example.com\"\n");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "api_base_url",
                ..
            }
        ));
        assert!(err.to_string().contains("api_base_url"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let (dir, path) = write_config("zero_timeout", "timeout_secs = 0\n");

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "timeout_secs",
                ..
            }
        ));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_mirror_base_without_trailing_slash_accepted() {
        let (dir, path) = write_config(
            "mirror_no_slash",
            "api_base_url = \"https://mirror.example.com/api\"\n",
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://mirror.example.com/api");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
