use crate::process_response::ErrorResponse;
use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pdf_search::SearchError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<String>,
    allow: Option<&'static str>,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            details,
            allow: None,
        }
    }

    pub fn method_not_allowed(method: &Method) -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            error: "Only POST requests are allowed".to_string(),
            details: Some(format!("received method: {}", method)),
            allow: Some("POST"),
        }
    }

    /// Upstream diagnostics are only passed through when `expose_details` is set.
    pub fn from_search_error(err: &SearchError, expose_details: bool) -> Self {
        let details = if err.details_are_public() || expose_details {
            err.details().map(str::to_string)
        } else {
            None
        };

        Self {
            status: err.status_code(),
            error: err.to_string(),
            details,
            allow: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            Json(ErrorResponse {
                error: self.error,
                details: self.details,
            }),
        )
            .into_response();

        if let Some(allow) = self.allow {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_upstream_details_outside_development() {
        let err = SearchError::RateLimited("429 (RESOURCE_EXHAUSTED): quota".to_string());

        let hidden = ApiError::from_search_error(&err, false);
        assert_eq!(hidden.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(hidden.error, "API rate limit exceeded");
        assert!(hidden.details.is_none());

        let shown = ApiError::from_search_error(&err, true);
        assert_eq!(shown.details.as_deref(), Some("429 (RESOURCE_EXHAUSTED): quota"));
    }

    #[test]
    fn validation_details_are_always_returned() {
        let err = SearchError::InvalidInput {
            message: "PDF exceeds 2MB size limit".to_string(),
            details: Some("actual size: 3.10MB".to_string()),
        };
        let api_error = ApiError::from_search_error(&err, false);
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.details.as_deref(), Some("actual size: 3.10MB"));
    }

    #[test]
    fn method_not_allowed_sets_allow_header() {
        let response = ApiError::method_not_allowed(&Method::GET).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    }
}
