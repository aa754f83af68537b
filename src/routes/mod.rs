pub mod emergency;
pub mod health;
pub mod location;
pub mod payment;
pub mod search;

use actix_web::web;

/// Mount every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/emergency")
                .route("/sessions", web::post().to(emergency::open_session))
                .service(
                    web::scope("/sessions/{id}")
                        .route("", web::get().to(emergency::get_session))
                        .route("", web::delete().to(emergency::close_session))
                        .route("/actions", web::post().to(emergency::dispatch))
                        .route("/submit", web::post().to(emergency::submit_booking))
                        .route("/filters", web::post().to(emergency::toggle_filter))
                        .route("/filters/{facet}", web::delete().to(emergency::clear_filter))
                        .route("/search", web::get().to(search::search_ambulances))
                        .route("/suggestions", web::get().to(search::suggestions))
                        .route("/pay", web::post().to(payment::pay_now))
                        .route("/payment/success", web::post().to(payment::payment_success))
                        .route("/payment/failure", web::post().to(payment::payment_failure))
                        .service(
                            web::scope("/address")
                                .route("", web::put().to(location::update_address))
                                .route("/map-click", web::post().to(location::map_click))
                                .route("/suggestions", web::get().to(location::place_suggestions))
                                .route("/select", web::post().to(location::select_place))
                                .route(
                                    "/current-location",
                                    web::post().to(location::current_location),
                                )
                                .route("/save", web::post().to(location::save_address)),
                        ),
                ),
        );
}
