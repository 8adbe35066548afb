use actix_web::{
    HttpResponse, ResponseError,
    http::{StatusCode, header},
};
use serde_json::json;

use super::super::helpers::error_chain_fmt;
use crate::email_client::ResendError;

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Email is required")]
    MissingEmail { received: Vec<String> },
    #[error("Invalid email address")]
    InvalidEmail(String),
    #[error("Server configuration error")]
    Configuration,
    #[error("Failed to add subscriber")]
    Registration(#[source] ResendError),
    #[error("Internal server error")]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SubscribeError::MissingEmail { .. } | SubscribeError::InvalidEmail(_) => {
                StatusCode::BAD_REQUEST
            }
            SubscribeError::Configuration
            | SubscribeError::Registration(_)
            | SubscribeError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = self.to_string();
        let body = match self {
            SubscribeError::MissingEmail { received } => {
                json!({ "error": error, "received": received })
            }
            SubscribeError::Registration(e) => json!({ "error": error, "details": e.detail() }),
            SubscribeError::Unexpected(e) => json!({ "error": error, "details": e.to_string() }),
            SubscribeError::MethodNotAllowed
            | SubscribeError::InvalidEmail(_)
            | SubscribeError::Configuration => json!({ "error": error }),
        };

        let mut response = HttpResponse::build(self.status_code());
        if let SubscribeError::MethodNotAllowed = self {
            response.insert_header((header::ALLOW, "POST, OPTIONS"));
        }
        response.json(body)
    }
}
