//! phone-scanner - upload server for documents scanned with a phone
//!
//! A phone app on the local network finds the server through `/discover`,
//! uploads photos of documents to `/upload`, and the server stores them and
//! converts each image to a single-page PDF.
//!
//! # Modules
//!
//! - [`network`] - Local IP and hostname resolution
//! - [`store`] - Upload directory listing and saving
//! - [`convert`] - Image to PDF conversion
//! - [`web`] - HTTP endpoints and server
//! - [`config`] - Config file and CLI overrides
//! - [`cli`] - Command-line definitions

pub mod cli;
pub mod config;
pub mod convert;
pub mod network;
pub mod store;
pub mod web;

pub use cli::{exit_codes, verbosity_level, Cli, Commands, ConvertArgs, InfoArgs, ListArgs, ServeArgs};
pub use config::{CliOverrides, Config, ConfigError};
pub use convert::{ConvertError, ConvertOptions, ImageConverter};
pub use network::NetworkInfo;
pub use store::{list_uploads, StoreError, UploadStore, UploadedFile};
pub use web::{ApiError, AppState, CorsConfig, ServerConfig, WebServer};
