mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{open_session, TestApp};

async fn get_json<S>(app: &S, uri: &str) -> Value
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success());
    test::read_body_json(resp).await
}

fn result_ids(body: &Value) -> Vec<String> {
    body["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[actix_rt::test]
async fn test_bls_search_sorted_by_distance() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;

    let body = get_json(&app, &format!("/api/emergency/sessions/{}/search?q=BLS", id)).await;
    assert_eq!(result_ids(&body), vec!["103", "101"]);
    assert!(body["notices"].as_array().unwrap().is_empty());

    let session = get_json(&app, &format!("/api/emergency/sessions/{}", id)).await;
    assert_eq!(session["data"]["searchResults"].as_array().unwrap().len(), 2);
    assert_eq!(session["data"]["ui"]["searchLoading"], false);
}

#[actix_rt::test]
async fn test_alias_spelling_finds_hubli() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;

    let body = get_json(&app, &format!("/api/emergency/sessions/{}/search?q=huballi", id)).await;
    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r["location"] == "Hubli"));
}

#[actix_rt::test]
async fn test_filters_apply_to_search() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/emergency/sessions/{}/filters", id))
        .set_json(&json!({ "facet": "availability", "value": "available" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["filters"]["availability"], json!(["available"]));

    let body = get_json(&app, &format!("/api/emergency/sessions/{}/search?q=hubli", id)).await;
    assert_eq!(result_ids(&body), vec!["101"]);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/emergency/sessions/{}/filters/availability", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = get_json(&app, &format!("/api/emergency/sessions/{}/search?q=hubli", id)).await;
    assert_eq!(result_ids(&body), vec!["103", "101"]);
}

#[actix_rt::test]
async fn test_unknown_facet_is_rejected() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/emergency/sessions/{}/filters/colour", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_empty_result_is_informational() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;

    let body = get_json(&app, &format!("/api/emergency/sessions/{}/search?q=mysuru", id)).await;
    assert!(body["data"]["results"].as_array().unwrap().is_empty());
    assert_eq!(body["notices"][0]["level"], "info");
}

#[actix_rt::test]
async fn test_suggestions_group_by_kind() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;

    let body = get_json(&app, &format!("/api/emergency/sessions/{}/suggestions?q=icu", id)).await;
    let suggestions = body["data"]["suggestions"].as_array().unwrap();

    assert!(suggestions
        .iter()
        .any(|s| s["type"] == "ambulance" && s["value"] == "Cardiac Care ICU"));
    assert!(suggestions
        .iter()
        .any(|s| s["type"] == "service-type" && s["value"] == "ICU" && s["count"] == 1));
    assert!(suggestions.len() <= 8);
}
