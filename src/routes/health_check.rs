use actix_web::{HttpResponse, Responder};
use uuid::Uuid;

/// Liveness probe. Does not touch the email provider.
pub async fn health_check() -> impl Responder {
    let request_id = Uuid::new_v4();
    let _request_span_guard = tracing::info_span!("Health check", %request_id).entered();

    HttpResponse::Ok().finish()
}
