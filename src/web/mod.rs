//! HTTP service for the phone scanner app
//!
//! Receives document uploads from the phone app on the local network and
//! reports server status.
//!
//! # Endpoints
//!
//! - `GET  /`         - HTML status page with recent uploads
//! - `GET  /discover` - Liveness probe used by the app to find the server
//! - `POST /upload`   - Multipart upload (`file` field), converted to PDF
//! - `GET  /status`   - Network info and recent uploads as JSON
//!
//! # Usage
//!
//! ```bash
//! phone-scanner serve --port 5000
//! ```

mod cors;
mod error;
mod page;
mod routes;
mod server;
mod shutdown;

pub use cors::CorsConfig;
pub use error::ApiError;
pub use page::render_status_page;
pub use routes::{routes, AppState, DiscoverResponse, StatusResponse, UploadResponse};
pub use server::{ServerConfig, WebServer};
pub use shutdown::wait_for_shutdown_signal;

/// Default server port
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address (all interfaces, so phones on the LAN can connect)
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Default upload limit in bytes (100 MB)
pub const DEFAULT_UPLOAD_LIMIT: usize = 100 * 1024 * 1024;

/// Number of uploads shown on the status page and in `/status`
pub const RECENT_FILES_LIMIT: usize = 10;

/// Multipart field carrying the uploaded document
pub const FILE_FIELD: &str = "file";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_PORT, 5000);
        assert_eq!(DEFAULT_BIND, "0.0.0.0");
        assert_eq!(DEFAULT_UPLOAD_LIMIT, 100 * 1024 * 1024);
        assert_eq!(RECENT_FILES_LIMIT, 10);
        assert_eq!(FILE_FIELD, "file");
    }
}
