//! Health check endpoint tests.

use anyhow::Result;
use axum::http::StatusCode;
use youbou_testing::{SubmissionForm, TestEnv};

/// A fresh service is healthy with an empty store.
#[tokio::test]
async fn health_check_returns_success_when_healthy() -> Result<()> {
    let env = TestEnv::new().await?;

    let response = env.health().await?;
    assert_eq!(response.status, StatusCode::OK);

    let health = response.json()?;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["checks"]["submission_store"]["status"], "up");
    assert_eq!(health["checks"]["submission_store"]["recorded"], 0);
    assert!(health["version"].is_string());
    assert!(health["timestamp"].is_string());

    Ok(())
}

/// The record count follows relayed submissions.
#[tokio::test]
async fn health_check_counts_records() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message("1700000000.000100").await;

    env.post_request(&SubmissionForm::new("U111", "hi").encode()).await?;

    let health = env.health().await?.json()?;
    assert_eq!(health["checks"]["submission_store"]["recorded"], 1);
    assert!(!health.to_string().contains("U111"));

    Ok(())
}

/// Unknown routes are not found.
#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let env = TestEnv::new().await?;

    let request = axum::http::Request::builder()
        .uri("/ready")
        .body(axum::body::Body::empty())?;
    let response = env.send(request).await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    Ok(())
}
