//! REST client for the booking backend and the hospital dropdown.

use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::StatusCode;
use serde_json::Value;

use crate::{
    config::AppConfig,
    error::UpstreamError,
    models::{
        ambulance::{BookingReference, Hospital},
        bookings::BookingPayload,
        notice::Notice,
    },
};

#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn fetch_reference(&self) -> Result<BookingReference, UpstreamError>;
    async fn fetch_hospitals(&self) -> Result<Vec<Hospital>, UpstreamError>;
    async fn create_booking(&self, payload: &BookingPayload) -> Result<Value, UpstreamError>;
}

pub struct RestBookingBackend {
    http_client: reqwest::Client,
    booking_api_url: String,
    hospital_api_url: String,
}

impl RestBookingBackend {
    pub fn new(config: &AppConfig) -> Result<Self, UpstreamError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http_client,
            booking_api_url: config.booking_api_url.clone(),
            hospital_api_url: config.hospital_api_url.clone(),
        })
    }

    async fn get_json(&self, url: &str, service: &'static str) -> Result<Value, UpstreamError> {
        let response = self.http_client.get(url).send().await?;
        check_status(response.status(), service)?;
        Ok(response.json().await?)
    }
}

fn check_status(status: StatusCode, service: &'static str) -> Result<(), UpstreamError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
        })
    }
}

/// mockapi serves the dataset either as the object itself or wrapped in a
/// one-element array.
fn unwrap_reference(body: Value) -> Result<BookingReference, UpstreamError> {
    let body = match body {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        other => other,
    };
    serde_json::from_value(body).map_err(|e| UpstreamError::Decode {
        service: "booking api",
        detail: e.to_string(),
    })
}

#[async_trait]
impl BookingBackend for RestBookingBackend {
    async fn fetch_reference(&self) -> Result<BookingReference, UpstreamError> {
        let body = self.get_json(&self.booking_api_url, "booking api").await?;
        unwrap_reference(body)
    }

    async fn fetch_hospitals(&self) -> Result<Vec<Hospital>, UpstreamError> {
        let body = self.get_json(&self.hospital_api_url, "hospital api").await?;
        serde_json::from_value(body).map_err(|e| UpstreamError::Decode {
            service: "hospital api",
            detail: e.to_string(),
        })
    }

    async fn create_booking(&self, payload: &BookingPayload) -> Result<Value, UpstreamError> {
        let response = self
            .http_client
            .post(&self.booking_api_url)
            .json(payload)
            .send()
            .await?;
        check_status(response.status(), "booking api")?;

        // Some mock backends answer with an empty body.
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| UpstreamError::Decode {
            service: "booking api",
            detail: e.to_string(),
        })
    }
}

/// Everything the workflow needs on mount.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// `None` when the dataset could not be loaded.
    pub reference: Option<BookingReference>,
    pub hospitals: Vec<Hospital>,
    pub notices: Vec<Notice>,
}

/// Fetch the booking dataset and the hospital list concurrently. A failure
/// of either leaves that part empty and adds an error notice.
pub async fn load_reference_data(backend: &dyn BookingBackend) -> ReferenceData {
    let (reference, hospitals) =
        futures::join!(backend.fetch_reference(), backend.fetch_hospitals());

    let mut data = ReferenceData::default();

    match reference {
        Ok(reference) => {
            info!(
                "Loaded booking dataset: {} ambulances, {} equipment items",
                reference.ambulance_services.len(),
                reference.equipment.len()
            );
            data.reference = Some(reference);
        }
        Err(e) => {
            error!("Failed to fetch booking data: {}", e);
            data.notices.push(Notice::error("Failed to load booking data"));
        }
    }

    match hospitals {
        Ok(mut hospitals) => {
            hospitals.sort_by_key(|h| h.hospital_name.to_lowercase());
            data.hospitals = hospitals;
        }
        Err(e) => {
            warn!("Failed to fetch hospitals: {}", e);
            data.notices.push(Notice::error("Failed to load hospitals"));
        }
    }

    data
}
