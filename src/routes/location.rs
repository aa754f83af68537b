use actix_web::{web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        address::{AddressForm, DeviceFix, GeoPoint, PlaceSuggestion},
        notice::Envelope,
        search::SearchParams,
    },
    services::emergency_service::EmergencyService,
};

type Service = web::Data<Arc<EmergencyService>>;

pub async fn map_click(
    service: Service,
    path: web::Path<Uuid>,
    point: web::Json<GeoPoint>,
) -> Result<HttpResponse, ApiError> {
    let picker = service.map_click(path.into_inner(), point.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Envelope::quiet(picker)))
}

pub async fn place_suggestions(
    service: Service,
    path: web::Path<Uuid>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let envelope = service
        .place_suggestions(path.into_inner(), &params.q)
        .await?;
    Ok(HttpResponse::Ok().json(envelope))
}

pub async fn select_place(
    service: Service,
    path: web::Path<Uuid>,
    place: web::Json<PlaceSuggestion>,
) -> Result<HttpResponse, ApiError> {
    let picker = service
        .select_place(path.into_inner(), place.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::quiet(picker)))
}

pub async fn current_location(
    service: Service,
    path: web::Path<Uuid>,
    fix: web::Json<DeviceFix>,
) -> Result<HttpResponse, ApiError> {
    let envelope = service
        .current_location(path.into_inner(), fix.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(envelope))
}

pub async fn update_address(
    service: Service,
    path: web::Path<Uuid>,
    form: web::Json<AddressForm>,
) -> Result<HttpResponse, ApiError> {
    let picker = service
        .update_address(path.into_inner(), form.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::quiet(picker)))
}

pub async fn save_address(service: Service, path: web::Path<Uuid>) -> Result<HttpResponse, ApiError> {
    let envelope = service.save_address(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(envelope))
}
