use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use super::common::{campus_service, read_json_body, UnavailableStore};
use crate::matching::{match_router, MatchService};

fn post_match(payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/venues/match")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn match_endpoint_returns_ranked_venues_with_explanation() {
    let router = match_router(Arc::new(campus_service()));

    let response = router
        .oneshot(post_match(json!({
            "requirements": ["wi-fi", "projector"],
            "attendees": 50,
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;

    let ranked = body["ranked"].as_array().expect("ranked array");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0]["venue"], "Lecture Theatre A");
    assert_eq!(ranked[0]["score"], 0.6);

    let explanation = &body["explanation"];
    assert!(explanation["nodes"].as_array().is_some());
    assert!(explanation["links"].as_array().is_some());
    assert!(explanation["textInformation"]
        .as_str()
        .expect("text summary")
        .starts_with("Reasoning: start"));
}

#[tokio::test]
async fn omitted_tuning_fields_fall_back_to_defaults() {
    let router = match_router(Arc::new(campus_service()));

    // No min_coverage / shortlist in the payload: defaults 0.6 and 1 apply.
    let response = router
        .oneshot(post_match(json!({
            "requirements": [],
            "attendees": 10,
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let ranked = body["ranked"].as_array().expect("ranked array");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0]["venue"], "Meeting Room 1");
}

#[tokio::test]
async fn zero_attendees_map_to_unprocessable_entity() {
    let router = match_router(Arc::new(campus_service()));

    let response = router
        .oneshot(post_match(json!({
            "requirements": ["wi-fi"],
            "attendees": 0,
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("attendee count"));
}

#[tokio::test]
async fn store_outage_maps_to_service_unavailable() {
    let router = match_router(Arc::new(MatchService::new(Arc::new(UnavailableStore))));

    let response = router
        .oneshot(post_match(json!({
            "requirements": ["wi-fi"],
            "attendees": 10,
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "venue store unavailable: graph backend offline");
}
