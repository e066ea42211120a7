//! Route tests for the critical point registry.

use super::helpers::{app, in_memory_state, send};
use axum::{
    Router,
    http::{Method, StatusCode},
};
use hostwatch::server::{config::CriticalPointPaging, router};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_returns_the_point(app: Router) -> Result<(), eyre::Report> {
    let response = send(
        &app,
        Method::POST,
        "/critical-points/",
        Some(json!({"param": "cpu_temp", "min_value": 10.0, "max_value": 90.0})),
    )
    .await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["param"], "cpu_temp");
    assert_eq!(response.body["min_value"], 10.0);
    assert!(response.body["exact_value"].is_null());
    assert!(response.body["created_at"].is_string());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_create_is_a_conflict(app: Router) -> Result<(), eyre::Report> {
    let body = json!({"param": "cpu_temp"});
    send(&app, Method::POST, "/critical-points/", Some(body.clone())).await?;

    let response = send(&app, Method::POST, "/critical-points/", Some(body)).await?;

    assert_eq!(response.status, StatusCode::CONFLICT);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inverted_range_is_a_bad_request(app: Router) -> Result<(), eyre::Report> {
    let response = send(
        &app,
        Method::POST,
        "/critical-points/",
        Some(json!({"param": "cpu_temp", "min_value": 90.0, "max_value": 10.0})),
    )
    .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn partial_update_keeps_unsupplied_fields(app: Router) -> Result<(), eyre::Report> {
    send(
        &app,
        Method::POST,
        "/critical-points/",
        Some(json!({"param": "cpu_temp", "min_value": 10.0, "max_value": 90.0, "exact_value": 50.0})),
    )
    .await?;

    let response = send(
        &app,
        Method::PUT,
        "/critical-points/cpu_temp",
        Some(json!({"min_value": 20.0, "exact_value": null})),
    )
    .await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["min_value"], 20.0);
    assert_eq!(response.body["max_value"], 90.0);
    assert!(response.body["exact_value"].is_null());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_cannot_rename(app: Router) -> Result<(), eyre::Report> {
    send(
        &app,
        Method::POST,
        "/critical-points/",
        Some(json!({"param": "cpu_temp"})),
    )
    .await?;

    let response = send(
        &app,
        Method::PUT,
        "/critical-points/cpu_temp",
        Some(json!({"param": "gpu_temp"})),
    )
    .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_and_delete_of_unknown_point_are_not_found(
    app: Router,
) -> Result<(), eyre::Report> {
    let update = send(
        &app,
        Method::PUT,
        "/critical-points/missing",
        Some(json!({"max_value": 1.0})),
    )
    .await?;
    let removal = send(&app, Method::DELETE, "/critical-points/missing", None).await?;

    assert_eq!(update.status, StatusCode::NOT_FOUND);
    assert_eq!(removal.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_the_point(app: Router) -> Result<(), eyre::Report> {
    send(
        &app,
        Method::POST,
        "/critical-points/",
        Some(json!({"param": "cpu_temp"})),
    )
    .await?;

    let response = send(&app, Method::DELETE, "/critical-points/cpu_temp", None).await?;

    assert_eq!(response.status, StatusCode::OK);
    let listed = send(&app, Method::GET, "/critical-points/", None).await?;
    assert_eq!(listed.body, json!([]));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_uses_skip_and_clamped_limit() -> Result<(), eyre::Report> {
    let app = router(in_memory_state(CriticalPointPaging::new(2, 3)));
    for name in ["a", "b", "c", "d", "e"] {
        send(
            &app,
            Method::POST,
            "/critical-points/",
            Some(json!({ "param": name })),
        )
        .await?;
    }

    let default_page = send(&app, Method::GET, "/critical-points/", None).await?;
    let skipped = send(&app, Method::GET, "/critical-points/?skip=1&limit=100", None).await?;

    let names = |body: &serde_json::Value| -> Vec<String> {
        body.as_array()
            .map(|points| {
                points
                    .iter()
                    .filter_map(|point| point["param"].as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    };
    assert_eq!(names(&default_page.body), vec!["a", "b"]);
    assert_eq!(names(&skipped.body), vec!["b", "c", "d"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_rejects_skip_beyond_bigint(app: Router) -> Result<(), eyre::Report> {
    let response = send(
        &app,
        Method::GET,
        "/critical-points/?skip=9223372036854775808",
        None,
    )
    .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    Ok(())
}
