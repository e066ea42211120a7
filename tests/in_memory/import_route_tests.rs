//! Route tests for spreadsheet upload validation.

use super::helpers::{app, multipart_upload, send_request};
use axum::{Router, http::StatusCode};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upload_without_file_field_is_a_bad_request(app: Router) -> Result<(), eyre::Report> {
    let request = multipart_upload("attachment", "data.xlsx", b"irrelevant")?;

    let response = send_request(&app, request).await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreadable_workbook_is_a_bad_request(app: Router) -> Result<(), eyre::Report> {
    let request = multipart_upload("file", "data.xlsx", b"this is not a workbook")?;

    let response = send_request(&app, request).await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.body["error"]
            .as_str()
            .is_some_and(|message| message.contains("unreadable"))
    );
    Ok(())
}
