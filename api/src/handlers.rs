use crate::api_error::ApiError;
use crate::app::AppState;
use crate::process_request::ProcessRequest;
use crate::process_response::HealthResponse;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    Json,
};
use axum_extra::TypedHeader;
use headers::ContentType;
use pdf_search::validation::{format_limit, format_megabytes};
use pdf_search::{validate_query, SearchResult};
use uuid::Uuid;

fn is_json(content_type: &Option<TypedHeader<ContentType>>) -> bool {
    match content_type {
        Some(TypedHeader(content_type)) => {
            let mime: mime::Mime = content_type.clone().into();
            mime.type_() == mime::APPLICATION
                && (mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON))
        }
        None => false,
    }
}

/// `POST /api/process`: validate, search, respond.
pub async fn process(
    State(state): State<AppState>,
    method: Method,
    content_type: Option<TypedHeader<ContentType>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SearchResult>, ApiError> {
    let request_id = Uuid::new_v4();
    log::info!("[{}] {} /api/process", request_id, method);

    if method != Method::POST {
        log::warn!("[{}] Rejected: method {} not allowed", request_id, method);
        return Err(ApiError::method_not_allowed(&method));
    }

    if !is_json(&content_type) {
        log::warn!("[{}] Rejected: invalid Content-Type", request_id);
        let received = content_type
            .map(|TypedHeader(ct)| mime::Mime::from(ct).to_string())
            .unwrap_or_else(|| "none".to_string());
        return Err(ApiError::bad_request(
            "Content-Type must be application/json",
            Some(format!("received content type: {}", received)),
        ));
    }

    let body = body.map_err(|rejection| {
        log::warn!("[{}] Rejected: unreadable body ({})", request_id, rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::bad_request(
                format!("PDF exceeds {} size limit", format_limit(state.max_pdf_bytes)),
                Some(rejection.body_text()),
            )
        } else {
            ApiError::bad_request("Request body could not be read", Some(rejection.body_text()))
        }
    })?;

    let payload: ProcessRequest = serde_json::from_slice(&body).map_err(|e| {
        log::warn!("[{}] Rejected: malformed JSON body", request_id);
        ApiError::bad_request("Request body must be valid JSON", Some(e.to_string()))
    })?;

    let query = validate_query(
        payload.pdf_data.as_deref(),
        payload.keywords.as_deref().unwrap_or_default(),
        payload.topics.as_deref().unwrap_or_default(),
        state.max_pdf_bytes,
    )
    .map_err(|e| {
        log::warn!("[{}] Rejected: {}", request_id, e);
        ApiError::from_search_error(&e, state.expose_error_details)
    })?;

    log::info!(
        "[{}] Request validated. Keywords: {:?}, topics: {:?}, PDF size: {}",
        request_id,
        query.keywords,
        query.topics,
        format_megabytes(query.pdf_size_bytes)
    );

    match state.search_service.search(&query).await {
        Ok(result) => {
            log::info!(
                "[{}] Successfully processed request, response length {}",
                request_id,
                result.text.len()
            );
            Ok(Json(result))
        }
        Err(e) => {
            log::error!("[{}] Search failed: {} ({:?})", request_id, e, e.details());
            Err(ApiError::from_search_error(&e, state.expose_error_details))
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        configured: state.search_service.is_configured(),
    })
}
