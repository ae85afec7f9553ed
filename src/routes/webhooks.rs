use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};

use crate::error::AppError;
use crate::services::webhooks::{PaymentEventPayload, PaymentWebhookService};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/payment", post(handle_payment_webhook))
}

/// Accept a payment-provider delivery. The signature is verified and the
/// event acknowledged; premium entitlements are handled entirely on the
/// provider's side, so no state changes here.
async fn handle_payment_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let secret = state
        .config
        .payment
        .webhook_secret
        .as_deref()
        .ok_or_else(|| {
            tracing::warn!("Payment webhook delivery rejected: no webhook secret configured");
            AppError::Unauthorized
        })?;

    let (event_id, timestamp, signature) = PaymentWebhookService::extract_headers(&headers)?;

    PaymentWebhookService::verify_signature(secret, &event_id, &timestamp, &body, &signature)?;

    let payload: PaymentEventPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid payload: {}", e)))?;

    tracing::info!(
        "Received payment webhook: event_id={}, event_type={}",
        payload.id,
        payload.event_type
    );
    if let Some(data) = &payload.data {
        tracing::debug!("Payment event data: {}", data);
    }

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "received": true })),
    ))
}
