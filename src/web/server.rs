//! Web server implementation
//!
//! Provides the main server struct and configuration.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::cors::CorsConfig;
use super::routes::{routes, AppState};
use super::shutdown::wait_for_shutdown_signal;
use super::{DEFAULT_BIND, DEFAULT_PORT, DEFAULT_UPLOAD_LIMIT};
use crate::config::DEFAULT_UPLOAD_DIR;
use crate::convert::ConvertOptions;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Address to bind to
    pub bind: String,
    /// Directory where uploads are stored
    pub upload_dir: PathBuf,
    /// Maximum upload size in bytes
    pub upload_limit: usize,
    /// Image to PDF conversion options
    pub convert: ConvertOptions,
    /// CORS settings
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            upload_limit: DEFAULT_UPLOAD_LIMIT,
            convert: ConvertOptions::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the bind address
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Set the upload directory
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Set the upload limit in bytes
    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = limit;
        self
    }

    /// Set the conversion options
    pub fn with_convert_options(mut self, options: ConvertOptions) -> Self {
        self.convert = options;
        self
    }

    /// Set the CORS configuration
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.bind, self.port).parse()
    }
}

/// Web server instance
pub struct WebServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server with default configuration
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new web server with the given configuration
    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config.clone())),
            config,
        }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router with all middleware applied
    pub fn router(&self) -> Router {
        routes()
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.config.upload_limit))
            .layer(self.config.cors.clone().into_layer())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until Ctrl+C or SIGTERM
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.socket_addr()?;

        self.state.store.ensure_dir()?;
        self.print_banner();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
        tracing::info!("Listening on http://{}", addr);

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    fn print_banner(&self) {
        let network = self.state.network_info();
        let rule = "=".repeat(60);

        println!();
        println!("{}", rule);
        println!("PHONE SCANNER SERVER STARTING");
        println!("{}", rule);
        println!();
        println!("Documents will be saved to: {}", self.state.store.dir().display());
        println!();
        println!("Server URLs:");
        println!("  Local:   http://127.0.0.1:{}", self.config.port);
        println!("  Network: {}", network.url);
        println!();
        println!("Use the Network URL in your phone app settings");
        println!();
        println!("{}", rule);
    }
}

impl Default for WebServer {
    fn default() -> Self {
        Self::new()
    }
}
