use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::bookings::BookingPayload;

/// What the external payment component is opened with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub is_open: bool,
    pub amount: f64,
    pub booking_id: Uuid,
    pub booking_details: BookingPayload,
}

/// `onPay(method, data)` from the payment component.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSuccess {
    pub method: String,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl PaymentSuccess {
    /// Provider-supplied id, looked up on the callback itself first and then
    /// inside the provider data.
    pub fn provider_payment_id(&self) -> Option<String> {
        self.payment_id.clone().filter(|id| !id.is_empty()).or_else(|| {
            ["paymentId", "payment_id", "transactionId", "id"]
                .iter()
                .find_map(|key| self.data.get(*key))
                .and_then(|value| match value {
                    serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
        })
    }
}

/// `onFail(error)` from the payment component.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentFailure {
    #[serde(default)]
    pub reason: String,
}

pub fn generate_payment_id() -> String {
    format!("PAY-{}", Uuid::new_v4().simple())
}
