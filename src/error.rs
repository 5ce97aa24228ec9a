use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Shown to the caller whenever the chat backend could not be reached or failed.
pub const CHAT_ERROR_MESSAGE: &str = "Erreur de communication avec le serveur";
pub const CHAT_FALLBACK_RESPONSE: &str = "Désolé, une erreur s'est produite. Veuillez réessayer.";

/// Failures of a proxied request.
///
/// Only `InvalidRequest` carries text meant for the caller. The other variants
/// keep their detail for the logs and render as the normalized chat error body.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("backend failed: {status} - {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("backend returned a body that is not JSON: {0}")]
    InvalidUpstreamBody(String),

    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ProxyError::InvalidRequest(message.into())
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ProxyError::InvalidRequest(message) => json!({ "error": message }),
            _ => json!({
                "error": CHAT_ERROR_MESSAGE,
                "response": CHAT_FALLBACK_RESPONSE,
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: ProxyError) -> (StatusCode, Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_invalid_request_renders_400_with_message() {
        let (status, body) = body_of(ProxyError::invalid("Le message est requis")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Le message est requis" }));
    }

    #[actix_web::test]
    async fn test_upstream_failure_hides_backend_body() {
        let err = ProxyError::Upstream {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "Traceback (most recent call last)".to_string(),
        };
        assert!(err.to_string().contains("503"));

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], CHAT_ERROR_MESSAGE);
        assert_eq!(body["response"], CHAT_FALLBACK_RESPONSE);
        assert!(!body.to_string().contains("Traceback"));
    }
}
