use crate::handlers::{health, process};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{any, get},
    Router,
};
use pdf_search::{Config, GeminiService, SearchService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<SearchService>,
    pub max_pdf_bytes: usize,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let gemini_service = Arc::new(GeminiService::new(config)?);
        Ok(Self {
            search_service: Arc::new(SearchService::new(gemini_service)),
            max_pdf_bytes: config.max_pdf_bytes,
            expose_error_details: config.expose_error_details,
        })
    }
}

/// Twice the base64 length of a PDF at the limit, so slightly oversized
/// uploads still reach the validator and get a proper 400.
pub fn body_limit(max_pdf_bytes: usize) -> usize {
    max_pdf_bytes.div_ceil(3) * 4 * 2 + 64 * 1024
}

pub fn router(state: AppState, public_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/process", any(process))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit(state.max_pdf_bytes)))
        .layer(cors)
        .with_state(state)
        .fallback_service(ServeDir::new(public_dir))
}
