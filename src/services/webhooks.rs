use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

const PAYMENT_EVENT_ID_HEADER: &str = "payment-webhook-id";
const PAYMENT_EVENT_TIMESTAMP_HEADER: &str = "payment-webhook-timestamp";
const PAYMENT_EVENT_SIGNATURE_HEADER: &str = "payment-webhook-signature";

/// Envelope delivered by the payment provider. Only the fields needed for
/// acknowledgement and logging are modelled; the event carries no state
/// change in this service.
#[derive(Debug, Deserialize)]
pub struct PaymentEventPayload {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Option<serde_json::Value>,
}

pub struct PaymentWebhookService;

impl PaymentWebhookService {
    /// Extract required headers from a webhook delivery
    pub fn extract_headers(headers: &HeaderMap) -> AppResult<(String, String, String)> {
        let event_id = Self::get_header(headers, PAYMENT_EVENT_ID_HEADER)?;
        let timestamp = Self::get_header(headers, PAYMENT_EVENT_TIMESTAMP_HEADER)?;
        let signature = Self::get_header(headers, PAYMENT_EVENT_SIGNATURE_HEADER)?;
        Ok((event_id, timestamp, signature))
    }

    /// Verify the delivery signature: HMAC-SHA256 over id + timestamp + body,
    /// hex-encoded with a `sha256=` prefix.
    pub fn verify_signature(
        secret: &str,
        event_id: &str,
        timestamp: &str,
        body: &[u8],
        signature: &str,
    ) -> AppResult<()> {
        let mut message = Vec::new();
        message.extend_from_slice(event_id.as_bytes());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to create HMAC")))?;

        mac.update(&message);

        let expected_sig = if let Some(hex_sig) = signature.strip_prefix("sha256=") {
            hex::decode(hex_sig)
                .map_err(|_| AppError::BadRequest("Invalid signature format".to_string()))?
        } else {
            return Err(AppError::BadRequest("Invalid signature format".to_string()));
        };

        mac.verify_slice(&expected_sig)
            .map_err(|_| AppError::Unauthorized)?;

        // Check timestamp is not too old (within 10 minutes)
        if let Ok(msg_time) = chrono::DateTime::parse_from_rfc3339(timestamp) {
            let now = chrono::Utc::now();
            let diff = now.signed_duration_since(msg_time);
            if diff.num_minutes().abs() > 10 {
                return Err(AppError::BadRequest("Message too old".to_string()));
            }
        }

        Ok(())
    }

    fn get_header(headers: &HeaderMap, name: &str) -> AppResult<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .ok_or_else(|| AppError::BadRequest(format!("Missing header: {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, event_id: &str, timestamp: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(event_id.as_bytes());
        mac.update(timestamp.as_bytes());
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn accepts_a_correctly_signed_delivery() {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let body = br#"{"id":"evt_1","type":"checkout.completed"}"#;
        let signature = sign("secret", "evt_1", &timestamp, body);

        assert!(PaymentWebhookService::verify_signature(
            "secret", "evt_1", &timestamp, body, &signature
        )
        .is_ok());
    }

    #[test]
    fn rejects_a_tampered_body() {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let signature = sign("secret", "evt_1", &timestamp, b"original");

        let err =
            PaymentWebhookService::verify_signature("secret", "evt_1", &timestamp, b"tampered", &signature)
                .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn rejects_a_signature_without_prefix() {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let err = PaymentWebhookService::verify_signature(
            "secret",
            "evt_1",
            &timestamp,
            b"body",
            "deadbeef",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn rejects_a_stale_timestamp() {
        let old = (chrono::Utc::now() - chrono::Duration::minutes(30)).to_rfc3339();
        let body = b"body";
        let signature = sign("secret", "evt_1", &old, body);

        let err = PaymentWebhookService::verify_signature("secret", "evt_1", &old, body, &signature)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
