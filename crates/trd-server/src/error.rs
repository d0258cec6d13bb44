use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use trd_core::TrdError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Wraps `anyhow::Error` so handlers
/// can use `?` on anything; domain errors map to proper status codes.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(TrdError::InvalidRequest(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<TrdError>() {
            match e {
                TrdError::NotInitialized => StatusCode::BAD_REQUEST,
                TrdError::ProjectNotFound(_)
                | TrdError::DocumentNotFound(_)
                | TrdError::TextInputNotFound(_)
                | TrdError::AnalysisNotFound(_)
                | TrdError::ApprovalNotFound(_) => StatusCode::NOT_FOUND,
                TrdError::ProjectExists(_)
                | TrdError::DocumentExists(_)
                | TrdError::ApprovalDecided(_) => StatusCode::CONFLICT,
                TrdError::UnknownSection(_)
                | TrdError::EmptySectionSelection
                | TrdError::InvalidId(_)
                | TrdError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                TrdError::Provider(_) => StatusCode::BAD_GATEWAY,
                TrdError::DimensionMismatch { .. }
                | TrdError::Io(_)
                | TrdError::Yaml(_)
                | TrdError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_not_found_maps_to_404() {
        let err = AppError(TrdError::ProjectNotFound("proj-1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn document_not_found_maps_to_404() {
        let err = AppError(TrdError::DocumentNotFound("doc-1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn document_exists_maps_to_409() {
        let err = AppError(TrdError::DocumentExists("doc-1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn approval_decided_maps_to_409() {
        let err = AppError(TrdError::ApprovalDecided("ap-1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn empty_selection_maps_to_400() {
        let err = AppError(TrdError::EmptySectionSelection.into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_section_maps_to_400() {
        let err = AppError(TrdError::UnknownSection("bogus".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_initialized_maps_to_400() {
        let err = AppError(TrdError::NotInitialized.into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn provider_failure_maps_to_502() {
        let err = AppError(TrdError::Provider("timeout".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn io_error_maps_to_500() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError(TrdError::Io(io_err).into());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_domain_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_request_constructor_maps_to_400() {
        let err = AppError::bad_request("document_ids is not a JSON array");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn response_body_contains_error_field() {
        let err = AppError(TrdError::ProjectNotFound("proj-1".into()).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(
            ct.to_str().unwrap().contains("application/json"),
            "expected JSON content type, got {:?}",
            ct
        );
    }
}
