use actix_web::{web, HttpResponse, Responder};
use log::warn;
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use crate::{config::AppConfig, services::emergency_service::EmergencyService};

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    active_sessions: usize,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(
    config: web::Data<AppConfig>,
    service: web::Data<Arc<EmergencyService>>,
) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        active_sessions: service.active_sessions(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let checks = [
        ("booking_api", check_url("BOOKING_API_URL", &config.booking_api_url)),
        ("hospital_api", check_url("HOSPITAL_API_URL", &config.hospital_api_url)),
        ("nominatim", check_url("NOMINATIM_URL", &config.nominatim_url)),
    ];

    for (name, result) in checks {
        if result.status != "ok" {
            health.status = "degraded".to_string();
        }
        health.services.insert(name.to_string(), result);
    }

    HttpResponse::Ok().json(health)
}

fn check_url(variable: &str, value: &str) -> ServiceStatus {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} configured ({})", variable, url.host_str().unwrap_or(""))),
        },
        Ok(url) => ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("{} has unsupported scheme '{}'", variable, url.scheme())),
        },
        Err(e) => {
            warn!("Health check: {} is invalid: {}", variable, e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("{} is not a valid URL: {}", variable, e)),
            }
        }
    }
}
