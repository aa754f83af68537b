use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::ambulance::RefId;

/// Failure of an outbound call to one of the REST collaborators.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{service} responded with status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("unexpected response from {service}: {detail}")]
    Decode { service: &'static str, detail: String },
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("session {0} not found")]
    SessionNotFound(Uuid),
    #[error("unknown {kind} id {id}")]
    UnknownReference { kind: &'static str, id: RefId },
    #[error("unknown filter facet '{0}'")]
    UnknownFacet(String),
    #[error("{0} already in progress")]
    InFlight(&'static str),
    #[error("payment window is not open")]
    PaymentNotOpen,
    #[error("booking is not ready for payment")]
    NotConfirmable,
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnknownReference { .. } | ApiError::UnknownFacet(_) => StatusCode::BAD_REQUEST,
            ApiError::InFlight(_) | ApiError::PaymentNotOpen | ApiError::NotConfirmable => {
                StatusCode::CONFLICT
            }
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
