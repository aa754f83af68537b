#![allow(dead_code)]

use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use emergency_booking_api::{
    config::AppConfig,
    error::UpstreamError,
    models::{
        address::{GeoPoint, PlaceSuggestion},
        ambulance::{BookingReference, Hospital},
        bookings::BookingPayload,
    },
    routes,
    services::{
        emergency_service::EmergencyService, geocoding_service::Geocoder,
        reference_service::BookingBackend, wizard::WizardCommand,
    },
};

pub fn reference_fixture() -> BookingReference {
    serde_json::from_value(json!({
        "ambulanceTypes": [
            { "id": 1, "name": "ICU" },
            { "id": 5, "name": "BLS" }
        ],
        "categories": [
            { "id": 2, "name": "Government" },
            { "id": 6, "name": "Private" }
        ],
        "locations": [
            { "id": 3, "name": "Hubli Station" },
            { "id": 7, "name": "Dharwad Bus Stand" }
        ],
        "equipment": [
            { "id": 10, "name": "Oxygen Cylinder", "icon": "o2", "price": 500 },
            { "id": 11, "name": "Stretcher", "icon": "bed", "price": 300 },
            { "id": 12, "name": "Defibrillator", "icon": "heart", "price": 1200 }
        ],
        "ambulanceServices": [
            { "id": 101, "serviceName": "Lifeline BLS", "location": "Hubli", "type": "BLS",
              "category": "Private", "available": true, "distance": "4.5", "rating": 4.1, "phone": "9845000101" },
            { "id": 102, "serviceName": "Cardiac Care ICU", "location": "Dharwad", "type": "ICU",
              "category": "Government", "available": true, "distance": 2.0, "rating": 4.7, "phone": "9845000102" },
            { "id": 103, "serviceName": "Rapid Response", "location": "Hubli", "type": "BLS",
              "category": "Government", "available": false, "distance": "1.2 km", "rating": 3.9, "phone": "9845000103" },
            { "id": 104, "serviceName": "Metro Advanced", "location": "Bengaluru", "type": "ALS",
              "category": "Private", "available": true, "distance": 12.0, "rating": 4.4, "phone": "9845000104" }
        ]
    }))
    .expect("valid reference fixture")
}

pub fn hospitals_fixture() -> Vec<Hospital> {
    serde_json::from_value(json!([
        { "id": 21, "hospitalName": "SDM Hospital" },
        { "id": 20, "hospitalName": "KIMS Hubli" }
    ]))
    .expect("valid hospital fixture")
}

#[derive(Default)]
pub struct MockBackend {
    pub fail_reference: AtomicBool,
    pub fail_bookings: AtomicBool,
    pub booking_delay_ms: AtomicU64,
    pub posted: Mutex<Vec<BookingPayload>>,
}

#[async_trait]
impl BookingBackend for MockBackend {
    async fn fetch_reference(&self) -> Result<BookingReference, UpstreamError> {
        if self.fail_reference.load(Ordering::SeqCst) {
            return Err(UpstreamError::Status {
                service: "booking api",
                status: 500,
            });
        }
        Ok(reference_fixture())
    }

    async fn fetch_hospitals(&self) -> Result<Vec<Hospital>, UpstreamError> {
        Ok(hospitals_fixture())
    }

    async fn create_booking(&self, payload: &BookingPayload) -> Result<Value, UpstreamError> {
        let delay = self.booking_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_bookings.load(Ordering::SeqCst) {
            return Err(UpstreamError::Status {
                service: "booking api",
                status: 503,
            });
        }
        self.posted.lock().unwrap().push(payload.clone());
        Ok(json!({ "id": "bk_1" }))
    }
}

#[derive(Default)]
pub struct MockGeocoder {
    pub fail_reverse: AtomicBool,
    pub reverse_delay_ms: AtomicU64,
    pub search_calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn reverse(&self, point: GeoPoint) -> Result<String, UpstreamError> {
        let delay = self.reverse_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_reverse.load(Ordering::SeqCst) {
            return Err(UpstreamError::Status {
                service: "nominatim",
                status: 502,
            });
        }
        Ok(format!("Near {:.2}, {:.2}, Hubballi", point.lat, point.lng))
    }

    async fn search(&self, query: &str) -> Result<Vec<PlaceSuggestion>, UpstreamError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..10)
            .map(|i| PlaceSuggestion {
                display_name: format!("{} {}", query, i),
                point: GeoPoint {
                    lat: 15.0 + i as f64 / 100.0,
                    lng: 75.0,
                },
            })
            .take(8)
            .collect())
    }
}

pub struct TestApp {
    pub config: AppConfig,
    pub backend: Arc<MockBackend>,
    pub geocoder: Arc<MockGeocoder>,
    pub service: Arc<EmergencyService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig {
            search_latency: Duration::ZERO,
            ..AppConfig::default()
        })
    }

    pub fn with_config(config: AppConfig) -> Self {
        let backend = Arc::new(MockBackend::default());
        let geocoder = Arc::new(MockGeocoder::default());
        let service = Arc::new(EmergencyService::new(
            &config,
            backend.clone(),
            geocoder.clone(),
        ));

        Self {
            config,
            backend,
            geocoder,
            service,
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.config.clone()))
            .app_data(web::Data::new(self.service.clone()))
            .configure(routes::configure)
    }

    pub fn posted(&self) -> Vec<BookingPayload> {
        self.backend.posted.lock().unwrap().clone()
    }
}

/// POST a new session and return its id plus the full response body.
pub async fn open_session<S>(app: &S) -> (String, Value)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post()
        .uri("/api/emergency/sessions")
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["id"].as_str().expect("session id").to_string();
    (id, body)
}

pub async fn send_action<S>(app: &S, id: &str, action: Value) -> Value
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/emergency/sessions/{}/actions", id))
        .set_json(&action)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success());
    test::read_body_json(resp).await
}

pub fn command(value: Value) -> WizardCommand {
    serde_json::from_value(value).expect("valid wizard command")
}

/// Same walk as [`confirm_scenario_booking`], straight against the service.
pub async fn confirm_scenario_on_service(service: &EmergencyService, id: uuid::Uuid) {
    let steps = [
        json!({ "type": "SELECT_TYPE", "id": 1 }),
        json!({ "type": "SELECT_CATEGORY", "id": 2 }),
        json!({ "type": "SELECT_PICKUP", "id": 3 }),
        json!({ "type": "TOGGLE_EQUIPMENT", "id": 10 }),
        json!({ "type": "TOGGLE_EQUIPMENT", "id": 11 }),
        json!({ "type": "SELECT_HOSPITAL", "id": 20 }),
        json!({ "type": "ADVANCE" }),
    ];
    for step in steps {
        service.dispatch(id, command(step)).await.expect("scenario step");
    }
}

/// Walk the scenario booking to the confirmation step: ICU, Government,
/// Hubli Station, oxygen and stretcher.
pub async fn confirm_scenario_booking<S>(app: &S, id: &str) -> Value
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    send_action(app, id, json!({ "type": "SELECT_TYPE", "id": 1 })).await;
    send_action(app, id, json!({ "type": "SELECT_CATEGORY", "id": 2 })).await;
    send_action(app, id, json!({ "type": "SELECT_PICKUP", "id": 3 })).await;
    send_action(app, id, json!({ "type": "TOGGLE_EQUIPMENT", "id": 10 })).await;
    send_action(app, id, json!({ "type": "TOGGLE_EQUIPMENT", "id": 11 })).await;
    send_action(app, id, json!({ "type": "SELECT_HOSPITAL", "id": 20 })).await;
    send_action(app, id, json!({ "type": "ADVANCE" })).await
}
