//! CLI integration tests for carbonctl
//!
//! Run the real binary against an in-process carbond, or against a port
//! nothing listens on to check the offline failure paths.

use carbon_common::{EXIT_API_UNAVAILABLE, EXIT_INVALID_INPUT, EXIT_REQUEST_REJECTED};
use carbond::emissions::EmissionService;
use carbond::mailer::LogMailer;
use carbond::server::{router, AppState};
use std::sync::Arc;
use tokio::process::Command;

const UNREACHABLE: &str = "http://127.0.0.1:9";

async fn spawn_api() -> String {
    let state = AppState::new(
        EmissionService::embedded().unwrap(),
        Arc::new(LogMailer::new("noreply@test")),
        50,
    );
    let app = router(state, &[]);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn carbonctl(api_url: &str, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_carbonctl"))
        .arg("--api-url")
        .arg(api_url)
        .args(args)
        .env("CARBONCTL_CONFIG", "/nonexistent/carbonctl-test.toml")
        .env_remove("CARBON_API_URL")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("failed to run carbonctl");

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_email_rejected_offline() {
    let (code, _, stderr) = carbonctl(UNREACHABLE, &["subscribe", "not-an-email"]).await;
    assert_eq!(code, EXIT_INVALID_INPUT);
    assert!(stderr.contains("Please enter a valid email address"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_api_exit_code() {
    let (code, _, stderr) = carbonctl(UNREACHABLE, &["calculate", "10"]).await;
    assert_eq!(code, EXIT_API_UNAVAILABLE);
    assert!(stderr.contains("Failed to reach the Carbon Tracker API"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_calculate_default_activity() {
    let api = spawn_api().await;
    let (code, stdout, _) = carbonctl(&api, &["calculate", "10"]).await;
    assert_eq!(code, 0);
    assert!(stdout.contains("Car (Gasoline)"));
    assert!(stdout.contains("10 km"));
    assert!(stdout.contains("2.1"));
    assert!(stdout.contains("moderate-impact"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_calculate_activity_lookup_across_categories() {
    let api = spawn_api().await;
    let (code, stdout, _) =
        carbonctl(&api, &["calculate", "1", "--activity", "beef", "--json"]).await;
    assert_eq!(code, 0);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["result"]["co2_emissions"], 27.0);
    assert_eq!(value["band"], "high-impact");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_quantity_exit_code() {
    let api = spawn_api().await;
    let (code, _, stderr) = carbonctl(&api, &["calculate", "-3"]).await;
    assert_eq!(code, EXIT_INVALID_INPUT);
    assert!(stderr.contains("Please enter a valid positive number"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_activity_outside_explicit_category() {
    let api = spawn_api().await;
    let (code, _, stderr) = carbonctl(
        &api,
        &["calculate", "1", "--category", "energy", "--activity", "beef"],
    )
    .await;
    assert_eq!(code, EXIT_INVALID_INPUT);
    assert!(stderr.contains("Unknown activity: beef"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_duplicate_subscription_message() {
    let api = spawn_api().await;
    let (code, stdout, _) = carbonctl(&api, &["subscribe", "cli@example.com"]).await;
    assert_eq!(code, 0);
    assert!(stdout.contains("Successfully subscribed!"));

    let (code, _, stderr) = carbonctl(&api, &["subscribe", "cli@example.com"]).await;
    assert_eq!(code, EXIT_REQUEST_REJECTED);
    assert!(stderr.contains("This email is already subscribed!"));
}
