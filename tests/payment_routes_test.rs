mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{confirm_scenario_booking, open_session, TestApp};

async fn post_json<S>(app: &S, uri: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post().uri(uri).set_json(&body).to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_rt::test]
async fn test_pay_now_requires_confirmation() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/emergency/sessions/{}/pay", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
}

#[actix_rt::test]
async fn test_pay_now_opens_overlay_with_total() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;
    confirm_scenario_booking(&app, &id).await;

    let (status, body) =
        post_json(&app, &format!("/api/emergency/sessions/{}/pay", id), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["isOpen"], true);
    assert_eq!(body["data"]["amount"], 800.0);
    assert_eq!(body["data"]["bookingDetails"]["ambulanceType"], "ICU");
    assert!(body["data"]["bookingId"].is_string());

    let (status, _) =
        post_json(&app, &format!("/api/emergency/sessions/{}/pay", id), json!({})).await;
    assert_eq!(status, 409);

    let req = test::TestRequest::get()
        .uri(&format!("/api/emergency/sessions/{}", id))
        .to_request();
    let session: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(session["data"]["paymentOpen"], true);
}

#[actix_rt::test]
async fn test_payment_success_books_with_payment_reference() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;
    confirm_scenario_booking(&app, &id).await;
    post_json(&app, &format!("/api/emergency/sessions/{}/pay", id), json!({})).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/emergency/sessions/{}/payment/success", id),
        json!({ "method": "card", "data": { "transactionId": "txn_42" } }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["notices"][0]["level"], "success");
    assert_eq!(body["notices"][0]["message"], "Payment successful! Ambulance booked.");
    assert_eq!(body["data"]["step"], 0);
    assert_eq!(body["data"]["paymentOpen"], false);

    let posted = test_app.posted();
    assert_eq!(posted.len(), 1);
    let wire = serde_json::to_value(&posted[0]).unwrap();
    assert_eq!(wire["paymentId"], "txn_42");
    assert_eq!(wire["paymentMethod"], "card");
    assert_eq!(wire["totalAmount"], 800.0);

    let (status, _) = post_json(
        &app,
        &format!("/api/emergency/sessions/{}/payment/success", id),
        json!({ "method": "card" }),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(test_app.posted().len(), 1);
}

#[actix_rt::test]
async fn test_payment_success_generates_reference_when_missing() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;
    confirm_scenario_booking(&app, &id).await;
    post_json(&app, &format!("/api/emergency/sessions/{}/pay", id), json!({})).await;

    post_json(
        &app,
        &format!("/api/emergency/sessions/{}/payment/success", id),
        json!({ "method": "upi" }),
    )
    .await;

    let posted = test_app.posted();
    let payment_id = posted[0].payment_id.clone().unwrap();
    assert!(payment_id.starts_with("PAY-"));
}

#[actix_rt::test]
async fn test_payment_failure_keeps_draft() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;
    confirm_scenario_booking(&app, &id).await;
    post_json(&app, &format!("/api/emergency/sessions/{}/pay", id), json!({})).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/emergency/sessions/{}/payment/failure", id),
        json!({ "reason": "card declined" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["notices"][0]["message"], "Payment failed: card declined");
    assert_eq!(body["data"]["step"], 1);
    assert_eq!(body["data"]["paymentOpen"], false);
    assert_eq!(body["data"]["draft"]["category"]["name"], "Government");
    assert!(test_app.posted().is_empty());

    let (status, _) = post_json(
        &app,
        &format!("/api/emergency/sessions/{}/payment/failure", id),
        json!({}),
    )
    .await;
    assert_eq!(status, 409);
}

#[actix_rt::test]
async fn test_submit_while_payment_open_is_rejected() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;
    confirm_scenario_booking(&app, &id).await;
    post_json(&app, &format!("/api/emergency/sessions/{}/pay", id), json!({})).await;

    let (status, body) =
        post_json(&app, &format!("/api/emergency/sessions/{}/submit", id), json!({})).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "payment already in progress");
    assert!(test_app.posted().is_empty());

    let (status, body) = post_json(
        &app,
        &format!("/api/emergency/sessions/{}/payment/success", id),
        json!({ "method": "card", "paymentId": "pi_9" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["paymentOpen"], false);
    assert_eq!(test_app.posted().len(), 1);

    let (status, _) =
        post_json(&app, &format!("/api/emergency/sessions/{}/submit", id), json!({})).await;
    assert_eq!(status, 409);
    assert_eq!(test_app.posted().len(), 1);
}

#[actix_rt::test]
async fn test_draft_is_frozen_while_payment_open() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;
    confirm_scenario_booking(&app, &id).await;
    post_json(&app, &format!("/api/emergency/sessions/{}/pay", id), json!({})).await;

    let actions_uri = format!("/api/emergency/sessions/{}/actions", id);
    let (status, _) = post_json(&app, &actions_uri, json!({ "type": "RETREAT" })).await;
    assert_eq!(status, 409);
    let (status, _) = post_json(&app, &actions_uri, json!({ "type": "SELECT_TYPE", "id": 5 })).await;
    assert_eq!(status, 409);

    post_json(
        &app,
        &format!("/api/emergency/sessions/{}/payment/success", id),
        json!({ "method": "card" }),
    )
    .await;
    let posted = test_app.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].ambulance_type.as_deref(), Some("ICU"));
}

#[actix_rt::test]
async fn test_draft_editable_again_after_payment_failure() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let (id, _) = open_session(&app).await;
    confirm_scenario_booking(&app, &id).await;
    post_json(&app, &format!("/api/emergency/sessions/{}/pay", id), json!({})).await;
    post_json(
        &app,
        &format!("/api/emergency/sessions/{}/payment/failure", id),
        json!({ "reason": "timeout" }),
    )
    .await;

    let (status, body) = post_json(
        &app,
        &format!("/api/emergency/sessions/{}/actions", id),
        json!({ "type": "RETREAT" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["step"], 0);
}
