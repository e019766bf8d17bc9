//! Runtime configuration
//!
//! Values are layered: built-in defaults, then `folio.toml`, then
//! environment variables. CLI flags are applied on top by the binary.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATABASE: &str = "folio.db";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 3_600_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_TOKEN_SECRET: &str = "default-secret-change-this";

/// Contents of `folio.toml`; every key is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FolioConfig {
    pub port: Option<u16>,
    pub database: Option<String>,
    pub cors_origin: Option<String>,
    pub rate_limit_max: Option<u32>,
    pub rate_limit_window_ms: Option<u64>,
    pub trust_proxy: Option<bool>,
    pub log_level: Option<String>,
}

impl FolioConfig {
    /// A config file spelling out every default, as written by `folio init`
    pub fn with_defaults() -> Self {
        Self {
            port: Some(DEFAULT_PORT),
            database: Some(DEFAULT_DATABASE.to_string()),
            cors_origin: Some(DEFAULT_CORS_ORIGIN.to_string()),
            rate_limit_max: Some(DEFAULT_RATE_LIMIT_MAX),
            rate_limit_window_ms: Some(DEFAULT_RATE_LIMIT_WINDOW_MS),
            trust_proxy: Some(false),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window: Duration,
    /// Key clients by `X-Forwarded-For`/`X-Real-IP` instead of the socket
    /// peer. Only safe behind a proxy that overwrites those headers.
    pub trust_proxy: bool,
}

/// Fully resolved settings used by the server
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub database_path: PathBuf,
    pub cors_origin: String,
    pub rate_limit: RateLimitSettings,
    pub log_level: String,
    /// Read for parity with deployments that set it; no route checks tokens
    pub token_secret: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            rate_limit: RateLimitSettings {
                max_requests: DEFAULT_RATE_LIMIT_MAX,
                window: Duration::from_millis(DEFAULT_RATE_LIMIT_WINDOW_MS),
                trust_proxy: false,
            },
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
        }
    }
}

impl Settings {
    /// Resolve settings from an optional config file and the process environment
    pub fn from_env(file: Option<&FolioConfig>) -> anyhow::Result<Self> {
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Resolve settings with an explicit environment lookup
    pub fn resolve<F>(file: Option<&FolioConfig>, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(file) = file {
            if let Some(port) = file.port {
                settings.port = port;
            }
            if let Some(database) = &file.database {
                settings.database_path = database_path(database);
            }
            if let Some(origin) = &file.cors_origin {
                settings.cors_origin = origin.clone();
            }
            if let Some(max) = file.rate_limit_max {
                settings.rate_limit.max_requests = max;
            }
            if let Some(ms) = file.rate_limit_window_ms {
                settings.rate_limit.window = Duration::from_millis(ms);
            }
            if let Some(trust) = file.trust_proxy {
                settings.rate_limit.trust_proxy = trust;
            }
            if let Some(level) = &file.log_level {
                settings.log_level = level.clone();
            }
        }

        if let Some(port) = parse_var(&env, "PORT")? {
            settings.port = port;
        }
        if let Some(url) = env("DATABASE_URL").filter(|v| !v.is_empty()) {
            settings.database_path = database_path(&url);
        }
        if let Some(origin) = env("CORS_ORIGIN").filter(|v| !v.is_empty()) {
            settings.cors_origin = origin;
        }
        if let Some(max) = parse_var(&env, "RATE_LIMIT_MAX")? {
            settings.rate_limit.max_requests = max;
        }
        if let Some(ms) = parse_var::<u64, _>(&env, "RATE_LIMIT_WINDOW_MS")? {
            settings.rate_limit.window = Duration::from_millis(ms);
        }
        if let Some(trust) = parse_var(&env, "TRUST_PROXY")? {
            settings.rate_limit.trust_proxy = trust;
        }
        if let Some(level) = env("LOG_LEVEL").filter(|v| !v.is_empty()) {
            settings.log_level = level;
        }
        if let Some(secret) = env("JWT_SECRET").filter(|v| !v.is_empty()) {
            settings.token_secret = secret;
        }

        if settings.rate_limit.window.is_zero() {
            anyhow::bail!("rate limit window must be greater than zero");
        }

        Ok(settings)
    }
}

fn parse_var<T, F>(env: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match env(key).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}")),
    }
}

/// Accepts a bare path or a `sqlite://` / `sqlite:` URL
pub fn database_path(url: &str) -> PathBuf {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    PathBuf::from(path)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("folio.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<FolioConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: FolioConfig =
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &FolioConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let settings = Settings::resolve(None, env_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.port, 3001);
        assert_eq!(settings.rate_limit.window, Duration::from_secs(3600));
        assert!(!settings.rate_limit.trust_proxy);
    }

    #[test]
    fn test_trust_proxy_from_file_and_env() {
        let file = FolioConfig {
            trust_proxy: Some(true),
            ..Default::default()
        };
        let settings = Settings::resolve(Some(&file), env_from(&[])).unwrap();
        assert!(settings.rate_limit.trust_proxy);

        let settings = Settings::resolve(Some(&file), env_from(&[("TRUST_PROXY", "false")])).unwrap();
        assert!(!settings.rate_limit.trust_proxy);

        assert!(Settings::resolve(None, env_from(&[("TRUST_PROXY", "yes")])).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = FolioConfig {
            port: Some(4000),
            database: Some("from-file.db".to_string()),
            ..Default::default()
        };
        let env = env_from(&[
            ("PORT", "5000"),
            ("RATE_LIMIT_MAX", "5"),
            ("RATE_LIMIT_WINDOW_MS", "1000"),
            ("CORS_ORIGIN", "https://folio.dev"),
        ]);
        let settings = Settings::resolve(Some(&file), env).unwrap();

        assert_eq!(settings.port, 5000);
        assert_eq!(settings.database_path, PathBuf::from("from-file.db"));
        assert_eq!(settings.cors_origin, "https://folio.dev");
        assert_eq!(settings.rate_limit.max_requests, 5);
        assert_eq!(settings.rate_limit.window, Duration::from_millis(1000));
    }

    #[test]
    fn test_invalid_number_names_key() {
        let err = Settings::resolve(None, env_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(Settings::resolve(None, env_from(&[("RATE_LIMIT_WINDOW_MS", "0")])).is_err());
    }

    #[test]
    fn test_database_url_forms() {
        assert_eq!(database_path("sqlite://data/folio.db"), PathBuf::from("data/folio.db"));
        assert_eq!(database_path("sqlite:folio.db"), PathBuf::from("folio.db"));
        assert_eq!(database_path("/var/lib/folio.db"), PathBuf::from("/var/lib/folio.db"));
    }

    #[test]
    fn test_write_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        let config = FolioConfig::with_defaults();

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        assert_eq!(load_config(Some(path.as_path())).unwrap(), Some(config));
        let missing = dir.path().join("missing.toml");
        assert_eq!(load_config(Some(missing.as_path())).unwrap(), None);
    }
}
