use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use emergency_booking_api::{
    config::AppConfig,
    routes,
    services::{
        emergency_service::EmergencyService, geocoding_service::NominatimClient,
        reference_service::RestBookingBackend,
    },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    info!("Booking API: {}", config.booking_api_url);
    info!("Hospital API: {}", config.hospital_api_url);
    info!("Geocoder: {}", config.nominatim_url);

    let backend = RestBookingBackend::new(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let geocoder = NominatimClient::new(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let service = Arc::new(EmergencyService::new(
        &config,
        Arc::new(backend),
        Arc::new(geocoder),
    ));
    service.clone().start_idle_sweep(config.session_sweep_interval);
    info!(
        "Sessions expire after {}s idle",
        config.session_ttl.as_secs()
    );

    let bind = (config.host.clone(), config.port);
    info!("Attempting to bind to {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(service.clone()))
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
