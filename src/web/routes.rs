//! HTTP routes for the scanner server
//!
//! Provides the status page, discovery probe, upload and status endpoints.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, ConnectInfo, Multipart, Request, State},
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use super::error::ApiError;
use super::page::render_status_page;
use super::server::ServerConfig;
use super::{FILE_FIELD, RECENT_FILES_LIMIT};
use crate::convert::{is_pdf, ImageConverter};
use crate::network::NetworkInfo;
use crate::store::{StoreError, UploadStore};

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: UploadStore,
    pub converter: ImageConverter,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            store: UploadStore::new(config.upload_dir.clone()),
            converter: ImageConverter::new(config.convert),
            config,
        }
    }

    /// Current network info for the configured port
    pub fn network_info(&self) -> NetworkInfo {
        NetworkInfo::resolve(self.config.port)
    }
}

/// Build the router for all endpoints
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(status_page))
        .route("/discover", get(discover))
        .route("/upload", post(upload))
        .route("/status", get(status))
}

/// Discovery probe response
#[derive(Debug, Serialize)]
pub struct DiscoverResponse {
    pub status: String,
    pub message: String,
}

impl DiscoverResponse {
    pub fn available() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Scanner server available".to_string(),
        }
    }
}

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub filename: String,
    pub path: String,
}

/// Status endpoint response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub network: NetworkInfo,
    pub upload_folder: String,
    pub recent_files: Vec<String>,
    pub file_count: usize,
}

/// HTML status page
async fn status_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let files = state.store.list(Some(RECENT_FILES_LIMIT)).map_err(|e| {
        tracing::error!("Error listing uploads for status page: {}", e);
        ApiError::from(e)
    })?;
    let network = state.network_info();

    Ok(Html(render_status_page(&network, state.store.dir(), &files)))
}

/// Discovery endpoint for the app to find this server on the network
async fn discover(request: Request) -> Json<DiscoverResponse> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::info!("Discovery request received from {}", peer);

    Json(DiscoverResponse::available())
}

/// Receive a document upload from the app
async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::error!("No file part in request: {}", rejection.body_text());
        ApiError::NoFilePart
    })?;

    let (file_name, data) = read_file_field(&mut multipart).await.inspect_err(|e| {
        tracing::error!("Rejected upload: {}", e);
    })?;

    let saved = tokio::task::spawn_blocking(move || save_and_convert(&state, &file_name, &data))
        .await
        .map_err(|e| ApiError::Internal(format!("Upload task failed: {}", e)))??;

    let filename = saved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Json(UploadResponse {
        status: "success".to_string(),
        filename,
        path: saved.display().to_string(),
    }))
}

/// Find the `file` field and read its name and contents
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        // A part without a filename parameter is a plain form value
        let file_name = match (field.name(), field.file_name()) {
            (Some(FILE_FIELD), Some(file_name)) => file_name.to_string(),
            _ => continue,
        };
        if file_name.is_empty() {
            return Err(ApiError::NoSelectedFile);
        }

        let data = field.bytes().await?;
        return Ok((file_name, data));
    }

    Err(ApiError::NoFilePart)
}

/// Save the upload, then try to produce a PDF next to it
///
/// Conversion failures are logged and ignored; the original is kept.
fn save_and_convert(state: &AppState, file_name: &str, data: &[u8]) -> Result<PathBuf, StoreError> {
    let saved = state.store.save(file_name, data)?;

    if !is_pdf(&saved) {
        match state.converter.convert_to_pdf(&saved, None) {
            Ok(pdf) => tracing::info!("Converted to PDF: {}", pdf.display()),
            Err(e) => tracing::error!("Error converting to PDF: {}", e),
        }
    }

    Ok(saved)
}

/// Server status and recent uploads
async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let files = state.store.list(None).map_err(|e| {
        tracing::error!("Error in status endpoint: {}", e);
        ApiError::Status(e.to_string())
    })?;

    let file_count = files.len();
    let recent_files = files
        .into_iter()
        .take(RECENT_FILES_LIMIT)
        .map(|f| f.name)
        .collect();

    Ok(Json(StatusResponse {
        status: "running".to_string(),
        network: state.network_info(),
        upload_folder: state.store.dir().display().to_string(),
        recent_files,
        file_count,
    }))
}
