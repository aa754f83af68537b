use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{filters::FilterToggle, notice::Envelope},
    services::{emergency_service::EmergencyService, wizard::WizardCommand},
};

type Service = web::Data<Arc<EmergencyService>>;

pub async fn open_session(service: Service) -> impl Responder {
    let envelope = service.open_session().await;
    HttpResponse::Created().json(envelope)
}

pub async fn get_session(
    service: Service,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let view = service.view(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Envelope::quiet(view)))
}

pub async fn close_session(
    service: Service,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    service.close_session(path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

/// Apply one wizard command, e.g. `{"type": "SELECT_TYPE", "id": 1}` or
/// `{"type": "ADVANCE"}`.
pub async fn dispatch(
    service: Service,
    path: web::Path<Uuid>,
    command: web::Json<WizardCommand>,
) -> Result<HttpResponse, ApiError> {
    let view = service
        .dispatch(path.into_inner(), command.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::quiet(view)))
}

pub async fn submit_booking(
    service: Service,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let envelope = service.submit_booking(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(envelope))
}

pub async fn toggle_filter(
    service: Service,
    path: web::Path<Uuid>,
    toggle: web::Json<FilterToggle>,
) -> Result<HttpResponse, ApiError> {
    let view = service
        .toggle_filter(path.into_inner(), toggle.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::quiet(view)))
}

pub async fn clear_filter(
    service: Service,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, ApiError> {
    let (id, facet) = path.into_inner();
    let view = service.clear_filter(id, &facet).await?;
    Ok(HttpResponse::Ok().json(Envelope::quiet(view)))
}
