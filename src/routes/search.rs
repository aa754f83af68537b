use actix_web::{web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{notice::Envelope, search::SearchParams},
    services::emergency_service::EmergencyService,
};

pub async fn search_ambulances(
    service: web::Data<Arc<EmergencyService>>,
    path: web::Path<Uuid>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let envelope = service.search(path.into_inner(), &params.q).await?;
    Ok(HttpResponse::Ok().json(envelope))
}

pub async fn suggestions(
    service: web::Data<Arc<EmergencyService>>,
    path: web::Path<Uuid>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let response = service.suggestions(path.into_inner(), &params.q).await?;
    Ok(HttpResponse::Ok().json(Envelope::quiet(response)))
}
