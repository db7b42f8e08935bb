//! Configuration file support
//!
//! Settings come from a TOML file, then command-line flags override them.
//!
//! Search order:
//! 1. `--config <PATH>` (must exist and parse)
//! 2. `./phone-scanner.toml`
//! 3. `<config dir>/phone-scanner/config.toml`
//! 4. Built-in defaults
//!
//! ```toml
//! [server]
//! port = 5000
//! bind = "0.0.0.0"
//! upload_limit_mb = 100
//!
//! [storage]
//! upload_dir = "uploads"
//!
//! [convert]
//! dpi = 100.0
//!
//! [logging]
//! level = "info"
//!
//! [cors]
//! enabled = true
//! allowed_origins = []   # empty = any origin
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::convert::{ConvertOptions, DEFAULT_DPI};
use crate::web::{CorsConfig, ServerConfig, DEFAULT_BIND, DEFAULT_PORT, DEFAULT_UPLOAD_LIMIT};

/// Local config file name
pub const LOCAL_CONFIG_FILE: &str = "phone-scanner.toml";

/// Default upload directory, relative to the working directory
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Config error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid [convert] dpi: {0} (must be a positive number)")]
    InvalidDpi(f32),

    #[error("Failed to resolve working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub port: u16,
    pub bind: String,
    /// Maximum request body size in megabytes
    pub upload_limit_mb: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            upload_limit_mb: DEFAULT_UPLOAD_LIMIT / (1024 * 1024),
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub upload_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
        }
    }
}

/// `[convert]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSection {
    pub dpi: f32,
}

impl Default for ConvertSection {
    fn default() -> Self {
        Self { dpi: DEFAULT_DPI }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// `[cors]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSection {
    pub enabled: bool,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: Vec::new(),
        }
    }
}

impl CorsSection {
    fn to_cors_config(&self) -> CorsConfig {
        if !self.enabled {
            CorsConfig::disabled()
        } else if self.allowed_origins.is_empty() {
            CorsConfig::default()
        } else {
            CorsConfig::strict(self.allowed_origins.clone())
        }
    }
}

/// File-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSection,
    pub storage: StorageSection,
    pub convert: ConvertSection,
    pub logging: LoggingSection,
    pub cors: CorsSection,
}

/// Values given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub upload_dir: Option<PathBuf>,
    pub upload_limit_mb: Option<usize>,
    pub dpi: Option<f32>,
    pub log_level: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Config {
    /// Load from the default search locations, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        for path in Self::search_paths() {
            if path.is_file() {
                tracing::debug!("Loading config from {}", path.display());
                return Self::load_from_path(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse from TOML text
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Candidate config file locations, in priority order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(user) = Self::user_config_path() {
            paths.push(user);
        }
        paths
    }

    /// Per-user config file location
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("phone-scanner").join("config.toml"))
    }

    /// Apply command-line overrides in place
    pub fn apply_overrides(&mut self, cli: &CliOverrides) {
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(bind) = &cli.bind {
            self.server.bind = bind.clone();
        }
        if let Some(dir) = &cli.upload_dir {
            self.storage.upload_dir = dir.clone();
        }
        if let Some(limit) = cli.upload_limit_mb {
            self.server.upload_limit_mb = limit;
        }
        if let Some(dpi) = cli.dpi {
            self.convert.dpi = dpi;
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Merge with command-line overrides into a server configuration
    ///
    /// Relative upload directories are resolved against the working
    /// directory so the banner and `/status` report an absolute path.
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> Result<ServerConfig, ConfigError> {
        let mut merged = self.clone();
        merged.apply_overrides(cli);

        let dpi = merged.convert.dpi;
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(ConfigError::InvalidDpi(dpi));
        }

        let upload_dir = if merged.storage.upload_dir.is_absolute() {
            merged.storage.upload_dir.clone()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::WorkingDir)?
                .join(&merged.storage.upload_dir)
        };

        Ok(ServerConfig::default()
            .with_port(merged.server.port)
            .with_bind(merged.server.bind)
            .with_upload_dir(upload_dir)
            .with_upload_limit(merged.server.upload_limit_mb.saturating_mul(1024 * 1024))
            .with_convert_options(ConvertOptions::with_dpi(dpi))
            .with_cors(merged.cors.to_cors_config()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.upload_limit_mb, 100);
        assert_eq!(config.storage.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.convert.dpi, 100.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_partial_toml() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8000

            [storage]
            upload_dir = "/srv/scans"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.storage.upload_dir, PathBuf::from("/srv/scans"));
        assert_eq!(config.convert.dpi, 100.0);
    }

    #[test]
    fn test_config_empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_config_invalid_toml() {
        assert!(Config::from_toml("[server]\nport = \"not a number\"").is_err());
    }

    #[test]
    fn test_load_from_path() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_missing_path() {
        let tmp = tempdir().unwrap();
        let result = Config::load_from_path(&tmp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_malformed_path() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[server\n").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_search_paths_start_with_local() {
        let paths = Config::search_paths();
        assert_eq!(paths[0], PathBuf::from(LOCAL_CONFIG_FILE));
    }

    #[test]
    fn test_merge_with_cli_overrides() {
        let config = Config::from_toml("[server]\nport = 8000\nbind = \"127.0.0.1\"").unwrap();
        let mut cli = CliOverrides::new();
        cli.port = Some(9000);
        cli.upload_dir = Some(PathBuf::from("/tmp/scans"));
        cli.upload_limit_mb = Some(5);
        cli.dpi = Some(150.0);

        let server = config.merge_with_cli(&cli).unwrap();
        assert_eq!(server.port, 9000);
        assert_eq!(server.bind, "127.0.0.1");
        assert_eq!(server.upload_dir, PathBuf::from("/tmp/scans"));
        assert_eq!(server.upload_limit, 5 * 1024 * 1024);
        assert_eq!(server.convert.dpi, 150.0);
    }

    #[test]
    fn test_merge_resolves_relative_upload_dir() {
        let server = Config::default().merge_with_cli(&CliOverrides::new()).unwrap();
        assert!(server.upload_dir.is_absolute());
        assert!(server.upload_dir.ends_with("uploads"));
    }

    async fn allow_origin(server: &ServerConfig, origin: &str) -> Option<String> {
        use axum::body::Body;
        use axum::http::{header, Request};
        use tower::ServiceExt;

        let app = axum::Router::new()
            .route("/", axum::routing::get(|| async { "ok" }))
            .layer(server.cors.clone().into_layer());
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_cors_section() {
        let config = Config::from_toml("[cors]\nallowed_origins = [\"http://10.0.0.9:8081\"]").unwrap();
        let server = config.merge_with_cli(&CliOverrides::new()).unwrap();
        assert_eq!(
            allow_origin(&server, "http://10.0.0.9:8081").await.as_deref(),
            Some("http://10.0.0.9:8081")
        );
        assert!(allow_origin(&server, "http://other").await.is_none());

        let config = Config::from_toml("[cors]\nenabled = false").unwrap();
        let server = config.merge_with_cli(&CliOverrides::new()).unwrap();
        assert!(!server.cors.enabled);
        assert!(allow_origin(&server, "http://10.0.0.9:8081").await.is_none());

        let server = Config::default().merge_with_cli(&CliOverrides::new()).unwrap();
        assert_eq!(allow_origin(&server, "http://anything").await.as_deref(), Some("*"));
    }

    #[test]
    fn test_merge_saturates_huge_upload_limit() {
        let config = Config::from_toml(&format!("[server]\nupload_limit_mb = {}", i64::MAX)).unwrap();
        let server = config.merge_with_cli(&CliOverrides::new()).unwrap();
        assert_eq!(server.upload_limit, usize::MAX);
    }

    #[test]
    fn test_merge_rejects_bad_dpi() {
        for text in ["[convert]\ndpi = 0.0", "[convert]\ndpi = -72.0", "[convert]\ndpi = nan"] {
            let config = Config::from_toml(text).unwrap();
            assert!(matches!(
                config.merge_with_cli(&CliOverrides::new()),
                Err(ConfigError::InvalidDpi(_))
            ));
        }

        let cli = CliOverrides {
            dpi: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            Config::default().merge_with_cli(&cli),
            Err(ConfigError::InvalidDpi(_))
        ));
    }

    #[test]
    fn test_apply_overrides_log_level() {
        let mut config = Config::default();
        let cli = CliOverrides {
            log_level: Some("trace".to_string()),
            ..Default::default()
        };
        config.apply_overrides(&cli);
        assert_eq!(config.logging.level, "trace");
    }
}
