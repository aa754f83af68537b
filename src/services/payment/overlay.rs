use serde::Serialize;

use crate::{error::ApiError, services::payment::interface::PaymentRequest};

/// `Closed -> Open -> Closed`. Each opening accepts exactly one terminal
/// callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PaymentOverlay {
    #[default]
    Closed,
    Open { request: PaymentRequest },
}

impl PaymentOverlay {
    pub fn is_open(&self) -> bool {
        matches!(self, PaymentOverlay::Open { .. })
    }

    pub fn open(&mut self, request: PaymentRequest) {
        *self = PaymentOverlay::Open { request };
    }

    /// Close the overlay and hand back what it was opened with.
    pub fn settle(&mut self) -> Result<PaymentRequest, ApiError> {
        match std::mem::take(self) {
            PaymentOverlay::Open { request } => Ok(request),
            PaymentOverlay::Closed => Err(ApiError::PaymentNotOpen),
        }
    }
}
