use actix_web::HttpResponse;

use super::errors::SubscribeError;

/// Answers CORS pre-flight requests. CORS headers are added by the app-wide middleware.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn method_not_allowed() -> Result<HttpResponse, SubscribeError> {
    Err(SubscribeError::MethodNotAllowed)
}
