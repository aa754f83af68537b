use actix_web::{web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::notice::Envelope,
    services::{
        emergency_service::EmergencyService,
        payment::interface::{PaymentFailure, PaymentSuccess},
    },
};

/// Opens the payment window for the confirmed draft and returns what the
/// payment component should be rendered with.
pub async fn pay_now(
    service: web::Data<Arc<EmergencyService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let request = service.pay_now(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Envelope::quiet(request)))
}

pub async fn payment_success(
    service: web::Data<Arc<EmergencyService>>,
    path: web::Path<Uuid>,
    input: web::Json<PaymentSuccess>,
) -> Result<HttpResponse, ApiError> {
    let envelope = service
        .payment_succeeded(path.into_inner(), input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(envelope))
}

pub async fn payment_failure(
    service: web::Data<Arc<EmergencyService>>,
    path: web::Path<Uuid>,
    input: web::Json<PaymentFailure>,
) -> Result<HttpResponse, ApiError> {
    let envelope = service
        .payment_failed(path.into_inner(), input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(envelope))
}
