//! Route tests for telemetry ingestion, queries, and deletion.

use super::helpers::{app, send};
use axum::{
    Router,
    http::{Method, StatusCode},
};
use rstest::rstest;
use serde_json::{Value, json};

async fn post_sample(app: &Router, hosts: &[&str]) -> Result<(), eyre::Report> {
    let data: Vec<Value> = hosts
        .iter()
        .map(|host| json!({"host": host, "cpu": "i7", "mem": [8, 16]}))
        .collect();
    let response = send(app, Method::POST, "/post-data/", Some(json!({ "data": data }))).await?;
    eyre::ensure!(
        response.status == StatusCode::OK,
        "post-data failed: {}",
        response.body
    );
    Ok(())
}

fn rows(body: &Value) -> Result<&Vec<Value>, eyre::Report> {
    body.as_array()
        .ok_or_else(|| eyre::eyre!("expected an array body, got {body}"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok(app: Router) -> Result<(), eyre::Report> {
    let response = send(&app, Method::GET, "/healthz", None).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"status": "ok"}));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn post_then_get_returns_serialized_rows(app: Router) -> Result<(), eyre::Report> {
    post_sample(&app, &["h1"]).await?;

    let response = send(&app, Method::GET, "/get-data/h1", None).await?;

    assert_eq!(response.status, StatusCode::OK);
    let listed = rows(&response.body)?;
    assert_eq!(listed.len(), 3);
    assert!(
        listed
            .iter()
            .any(|row| row["param"] == "mem" && row["value"] == "[8, 16]")
    );
    assert!(listed.iter().all(|row| row["host"] == "h1"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn post_rejects_non_object_payloads(app: Router) -> Result<(), eyre::Report> {
    let response = send(
        &app,
        Method::POST,
        "/post-data/",
        Some(json!({"data": [{"host": "h1"}, 5]})),
    )
    .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let listed = send(&app, Method::GET, "/get-data/h1", None).await?;
    assert!(rows(&listed.body)?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn nested_payload_is_a_bad_request(app: Router) -> Result<(), eyre::Report> {
    let response = send(
        &app,
        Method::POST,
        "/post-data/",
        Some(json!({"data": [{"host": "h1", "disk": {"size": 1}}]})),
    )
    .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overlong_host_is_a_bad_request(app: Router) -> Result<(), eyre::Report> {
    let host = "h".repeat(256);
    let response = send(
        &app,
        Method::POST,
        "/post-data/",
        Some(json!({"data": [{"host": host, "cpu": "i7"}]})),
    )
    .await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let remaining = send(&app, Method::GET, "/get-filtered-system-info/", None).await?;
    assert!(rows(&remaining.body)?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_data_for_unknown_host_is_empty(app: Router) -> Result<(), eyre::Report> {
    let response = send(&app, Method::GET, "/get-data/ghost", None).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert!(rows(&response.body)?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_host_rows(app: Router) -> Result<(), eyre::Report> {
    post_sample(&app, &["h1"]).await?;

    let response = send(
        &app,
        Method::PUT,
        "/update-data/h1",
        Some(json!({"host": "h1", "cpu": "m3"})),
    )
    .await?;

    assert_eq!(response.status, StatusCode::OK);
    let listed = send(&app, Method::GET, "/get-data/h1", None).await?;
    let updated = rows(&listed.body)?;
    assert_eq!(updated.len(), 2);
    assert!(updated.iter().any(|row| row["param"] == "cpu" && row["value"] == "m3"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_host_is_not_found(app: Router) -> Result<(), eyre::Report> {
    let response = send(
        &app,
        Method::PUT,
        "/update-data/ghost",
        Some(json!({"host": "ghost"})),
    )
    .await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filtered_query_combines_repeated_keys(app: Router) -> Result<(), eyre::Report> {
    post_sample(&app, &["h1", "h2", "h3"]).await?;

    let response = send(
        &app,
        Method::GET,
        "/get-filtered-system-info/?hosts=h1&hosts=h3&params=cpu",
        None,
    )
    .await?;

    assert_eq!(response.status, StatusCode::OK);
    let listed = rows(&response.body)?;
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|row| row["param"] == "cpu"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filtered_query_matches_values(app: Router) -> Result<(), eyre::Report> {
    post_sample(&app, &["h1"]).await?;

    let response = send(
        &app,
        Method::GET,
        "/get-filtered-system-info/?values=i7",
        None,
    )
    .await?;

    let listed = rows(&response.body)?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed.first().map(|row| &row["param"]), Some(&json!("cpu")));
    Ok(())
}

#[rstest]
#[case("start_date=soon")]
#[case("offset=9223372036854775808")]
#[tokio::test(flavor = "multi_thread")]
async fn filtered_query_rejects_malformed_parameters(
    app: Router,
    #[case] query: &str,
) -> Result<(), eyre::Report> {
    let uri = format!("/get-filtered-system-info/?{query}");
    let response = send(&app, Method::GET, &uri, None).await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_host_removes_only_that_host(app: Router) -> Result<(), eyre::Report> {
    post_sample(&app, &["h1", "h2"]).await?;

    let response = send(&app, Method::DELETE, "/delete-data/h1", None).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["attributes_deleted"], 3);
    assert_eq!(response.body["raw_records_deleted"], 1);
    let remaining = send(&app, Method::GET, "/get-filtered-system-info/", None).await?;
    assert!(rows(&remaining.body)?.iter().all(|row| row["host"] == "h2"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_unknown_host_is_not_found(app: Router) -> Result<(), eyre::Report> {
    let response = send(&app, Method::DELETE, "/delete-data/ghost", None).await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body["error"].is_string());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_all_empties_every_store(app: Router) -> Result<(), eyre::Report> {
    post_sample(&app, &["h1", "h2"]).await?;

    let response = send(&app, Method::DELETE, "/delete-all-data/", None).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["raw_records_deleted"], 2);
    let remaining = send(&app, Method::GET, "/get-filtered-system-info/", None).await?;
    assert!(rows(&remaining.body)?.is_empty());
    Ok(())
}
