//! CORS (Cross-Origin Resource Sharing) configuration
//!
//! The phone app talks to the server directly, but the status page and
//! browser-based clients may be served from another origin, so every
//! origin is allowed unless a list is configured.

use axum::http::{HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// CORS configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins (None = allow all)
    pub allowed_origins: Option<Vec<String>>,
    /// Allowed HTTP methods
    pub allowed_methods: Vec<String>,
    /// Allowed request headers (`*` = any)
    pub allowed_headers: Vec<String>,
    /// Preflight cache duration in seconds
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: None,
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec!["*".to_string()],
            max_age_secs: 86400, // 24 hours
        }
    }
}

impl CorsConfig {
    /// Restrict to the given origins
    pub fn strict(origins: Vec<String>) -> Self {
        Self {
            allowed_origins: Some(origins),
            allowed_headers: vec!["Content-Type".to_string()],
            max_age_secs: 3600,
            ..Default::default()
        }
    }

    /// Create a disabled config
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Convert to tower-http CorsLayer
    pub fn into_layer(self) -> CorsLayer {
        if !self.enabled {
            return CorsLayer::new();
        }

        let mut layer = CorsLayer::new();

        match &self.allowed_origins {
            None => layer = layer.allow_origin(Any),
            Some(origins) if origins.iter().any(|o| o == "*") => layer = layer.allow_origin(Any),
            Some(origins) => {
                let origins: Vec<HeaderValue> =
                    origins.iter().filter_map(|o| o.parse().ok()).collect();
                if !origins.is_empty() {
                    layer = layer.allow_origin(origins);
                }
            }
        }

        let methods: Vec<Method> = self
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        if !methods.is_empty() {
            layer = layer.allow_methods(methods);
        }

        if self.allowed_headers.iter().any(|h| h == "*") {
            layer = layer.allow_headers(Any);
        } else {
            let headers: Vec<HeaderName> = self
                .allowed_headers
                .iter()
                .filter_map(|h| h.parse().ok())
                .collect();
            if !headers.is_empty() {
                layer = layer.allow_headers(headers);
            }
        }

        layer.max_age(Duration::from_secs(self.max_age_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn allow_origin_for(config: CorsConfig, origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(config.into_layer());
        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn test_cors_config_default() {
        let config = CorsConfig::default();
        assert!(config.enabled);
        assert!(config.allowed_origins.is_none());
        assert!(config.allowed_methods.contains(&"GET".to_string()));
        assert!(config.allowed_methods.contains(&"POST".to_string()));
        assert_eq!(config.allowed_headers, vec!["*".to_string()]);
        assert_eq!(config.max_age_secs, 86400);
    }

    #[test]
    fn test_cors_config_strict() {
        let config = CorsConfig::strict(vec!["http://192.168.1.5:8081".to_string()]);
        assert!(config.enabled);
        assert_eq!(
            config.allowed_origins,
            Some(vec!["http://192.168.1.5:8081".to_string()])
        );
        assert_eq!(config.max_age_secs, 3600);
    }

    #[tokio::test]
    async fn test_default_layer_allows_any_origin() {
        let allowed = allow_origin_for(CorsConfig::default(), "http://localhost:19006").await;
        assert_eq!(allowed.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn test_strict_layer_echoes_listed_origin_only() {
        let config = CorsConfig::strict(vec!["http://192.168.1.5:8081".to_string()]);

        let allowed = allow_origin_for(config.clone(), "http://192.168.1.5:8081").await;
        assert_eq!(allowed.as_deref(), Some("http://192.168.1.5:8081"));

        let allowed = allow_origin_for(config, "http://evil.example").await;
        assert!(allowed.is_none());
    }

    #[tokio::test]
    async fn test_wildcard_in_list_allows_any_origin() {
        let config = CorsConfig::strict(vec!["*".to_string()]);
        let allowed = allow_origin_for(config, "http://anything").await;
        assert_eq!(allowed.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn test_disabled_layer_adds_no_headers() {
        let allowed = allow_origin_for(CorsConfig::disabled(), "http://localhost:19006").await;
        assert!(allowed.is_none());
    }

    #[tokio::test]
    async fn test_preflight_lists_methods() {
        let app = Router::new()
            .route("/upload", axum::routing::post(|| async { "ok" }))
            .layer(CorsConfig::default().into_layer());
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/upload")
            .header(header::ORIGIN, "http://localhost:19006")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("POST"));
        assert_eq!(response.headers()[header::ACCESS_CONTROL_MAX_AGE], "86400");
    }
}
