mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_event(app: &TestApp, auth: &AuthHeaders, price: f64, capacity: i32, published: bool, deadline_days: i64) -> String {
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "title": "Conf",
                "description": "desc",
                "start_date": (Utc::now() + Duration::days(14)).to_rfc3339(),
                "end_date": (Utc::now() + Duration::days(14) + Duration::hours(8)).to_rfc3339(),
                "is_virtual": true,
                "virtual_link": "https://meet.example.com",
                "capacity": capacity,
                "price": price,
                "currency": "USD",
                "category_id": "tech",
                "category_name": "Technology",
                "category_color": "#3366ff",
                "is_published": published,
                "registration_deadline": (Utc::now() + Duration::days(deadline_days)).to_rfc3339()
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn register(app: &TestApp, auth: &AuthHeaders, event_id: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/events/{}/register", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_register_free_event_paid_immediately() {
    let app = TestApp::new().await;
    let org = app.signup("org@example.com", "Org", "organizer").await;
    let user = app.signup("user@example.com", "User", "participant").await;

    let event_id = create_event(&app, &org, 0.0, 10, true, 7).await;

    let res = register(&app, &user, &event_id).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["payment_status"], "paid");
    assert_eq!(body["user_email"], "user@example.com");
    assert!(body["ticket_id"].as_str().unwrap().starts_with("TKT-"));
    assert!(body["check_in_time"].is_null());
    assert!(body["feedback"].is_null());
}

#[tokio::test]
async fn test_register_priced_event_unpaid() {
    let app = TestApp::new().await;
    let org = app.signup("org@example.com", "Org", "organizer").await;
    let user = app.signup("user@example.com", "User", "participant").await;

    let event_id = create_event(&app, &org, 49.99, 10, true, 7).await;

    let res = register(&app, &user, &event_id).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["payment_status"], "unpaid");
}

#[tokio::test]
async fn test_duplicate_registration_conflict() {
    let app = TestApp::new().await;
    let org = app.signup("org@example.com", "Org", "organizer").await;
    let user = app.signup("user@example.com", "User", "participant").await;

    let event_id = create_event(&app, &org, 0.0, 10, true, 7).await;

    let res = register(&app, &user, &event_id).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = register(&app, &user, &event_id).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert_eq!(body["error"], "Already registered for this event");
}

#[tokio::test]
async fn test_cancel_then_register_again() {
    let app = TestApp::new().await;
    let org = app.signup("org@example.com", "Org", "organizer").await;
    let user = app.signup("user@example.com", "User", "participant").await;

    let event_id = create_event(&app, &org, 0.0, 10, true, 7).await;

    let res = register(&app, &user, &event_id).await;
    let registration_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/registrations/{}/cancel", registration_id))
            .header(header::COOKIE, format!("access_token={}", user.access_token))
            .header("X-CSRF-Token", &user.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["status"], "cancelled");

    // A cancelled registration no longer blocks a fresh one.
    let res = register(&app, &user, &event_id).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cannot_cancel_foreign_registration() {
    let app = TestApp::new().await;
    let org = app.signup("org@example.com", "Org", "organizer").await;
    let user = app.signup("user@example.com", "User", "participant").await;
    let intruder = app.signup("intruder@example.com", "Intruder", "participant").await;

    let event_id = create_event(&app, &org, 0.0, 10, true, 7).await;
    let res = register(&app, &user, &event_id).await;
    let registration_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/registrations/{}/cancel", registration_id))
            .header(header::COOKIE, format!("access_token={}", intruder.access_token))
            .header("X-CSRF-Token", &intruder.csrf_token)
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_after_deadline_rejected() {
    let app = TestApp::new().await;
    let org = app.signup("org@example.com", "Org", "organizer").await;
    let user = app.signup("user@example.com", "User", "participant").await;

    let event_id = create_event(&app, &org, 0.0, 10, true, -1).await;

    let res = register(&app, &user, &event_id).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert_eq!(body["error"], "Registration deadline has passed");
}

#[tokio::test]
async fn test_register_unpublished_event_forbidden() {
    let app = TestApp::new().await;
    let org = app.signup("org@example.com", "Org", "organizer").await;
    let user = app.signup("user@example.com", "User", "participant").await;

    let event_id = create_event(&app, &org, 0.0, 10, false, 7).await;

    let res = register(&app, &user, &event_id).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_unknown_event_not_found() {
    let app = TestApp::new().await;
    let user = app.signup("user@example.com", "User", "participant").await;

    let res = register(&app, &user, "no-such-event").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_my_registrations_listing() {
    let app = TestApp::new().await;
    let org = app.signup("org@example.com", "Org", "organizer").await;
    let user = app.signup("user@example.com", "User", "participant").await;

    let first = create_event(&app, &org, 0.0, 10, true, 7).await;
    let second = create_event(&app, &org, 25.0, 10, true, 7).await;

    register(&app, &user, &first).await;
    register(&app, &user, &second).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/registrations")
            .header(header::COOKIE, format!("access_token={}", user.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    let regs = body.as_array().unwrap();
    assert_eq!(regs.len(), 2);
    let event_ids: Vec<&str> = regs.iter().map(|r| r["event_id"].as_str().unwrap()).collect();
    assert!(event_ids.contains(&first.as_str()));
    assert!(event_ids.contains(&second.as_str()));
}

#[tokio::test]
async fn test_event_registrations_visible_to_organizer_only() {
    let app = TestApp::new().await;
    let org = app.signup("org@example.com", "Org", "organizer").await;
    let user = app.signup("user@example.com", "User", "participant").await;

    let event_id = create_event(&app, &org, 0.0, 10, true, 7).await;
    register(&app, &user, &event_id).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/events/{}/registrations", event_id))
            .header(header::COOKIE, format!("access_token={}", org.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/events/{}/registrations", event_id))
            .header(header::COOKIE, format!("access_token={}", user.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_ticket_lookup() {
    let app = TestApp::new().await;
    let org = app.signup("org@example.com", "Org", "organizer").await;
    let user = app.signup("user@example.com", "User", "participant").await;
    let other = app.signup("other@example.com", "Other", "participant").await;

    let event_id = create_event(&app, &org, 0.0, 10, true, 7).await;
    let res = register(&app, &user, &event_id).await;
    let ticket_id = parse_body(res).await["ticket_id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/tickets/{}", ticket_id))
            .header(header::COOKIE, format!("access_token={}", user.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["ticket_id"], ticket_id);
    assert_eq!(body["event_id"], event_id);

    // Someone else's ticket id is not readable.
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/tickets/{}", ticket_id))
            .header(header::COOKIE, format!("access_token={}", other.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/tickets/TKT-0-000")
            .header(header::COOKIE, format!("access_token={}", user.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
