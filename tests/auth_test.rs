use competia_cli::api::{ApiClient, ApiError};
use competia_cli::config::Config;
use anyhow::Result;
use mockito::{Matcher, Server};
use serde_json::json;
use uuid::Uuid;

fn user_json() -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "email": "maria@example.com",
        "role": "evaluator",
        "status": "active",
        "must_change_password": false,
    })
}

#[tokio::test]
async fn test_api_client_creation() -> Result<()> {
    let config = Config::default();
    let _client = ApiClient::new(config)?;
    Ok(())
}

#[tokio::test]
async fn test_me_requires_authentication() -> Result<()> {
    let config = Config::default();
    let client = ApiClient::new(config)?;

    let result = client.me().await;

    assert!(result.is_err());
    assert_eq!(result.unwrap_err().to_string(), "Not logged in");
    Ok(())
}

#[tokio::test]
async fn test_login_rejection_surfaces_server_detail() -> Result<()> {
    let mut server = Server::new_async().await;

    let _login = server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"detail": "Incorrect email or password"}"#)
        .create_async()
        .await;

    let mut config = Config::default();
    config.api.base_url = server.url();

    let client = ApiClient::new(config)?;
    let result = client.login("maria@example.com", "wrong").await;

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Incorrect email or password"));
    Ok(())
}

#[tokio::test]
async fn test_fetch_logo_joins_relative_paths_with_a_slash() -> Result<()> {
    let mut server = Server::new_async().await;

    let logo = server
        .mock("GET", "/uploads/logo.png")
        .with_status(200)
        .with_body(vec![0x89, 0x50, 0x4e, 0x47])
        .expect(2)
        .create_async()
        .await;

    let mut config = Config::default();
    config.api.base_url = server.url();

    let client = ApiClient::new(config)?;

    // With and without a leading slash, the URL must resolve the same way
    let bytes = client.fetch_logo("uploads/logo.png").await?;
    assert_eq!(bytes, vec![0x89, 0x50, 0x4e, 0x47]);
    let bytes = client.fetch_logo("/uploads/logo.png").await?;
    assert_eq!(bytes, vec![0x89, 0x50, 0x4e, 0x47]);

    logo.assert_async().await;
    Ok(())
}

#[test]
fn test_api_error_from_status() {
    use reqwest::StatusCode;

    let error = ApiError::from_status(StatusCode::UNAUTHORIZED, "Unauthorized".to_string());
    assert!(matches!(error, ApiError::Unauthorized(_)));

    let error = ApiError::from_status(StatusCode::NOT_FOUND, "Not Found".to_string());
    assert!(matches!(error, ApiError::NotFound(_)));

    let error = ApiError::from_status(StatusCode::BAD_REQUEST, "Bad Request".to_string());
    assert!(matches!(error, ApiError::BadRequest(_)));

    let error = ApiError::from_status(
        StatusCode::UNPROCESSABLE_ENTITY,
        "hours must be positive".to_string(),
    );
    assert!(matches!(error, ApiError::Validation(_)));

    let error = ApiError::from_status(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Server Error".to_string(),
    );
    assert!(matches!(error, ApiError::ServerError(_)));
}

// Both refresh scenarios share one test because they redirect the config
// directory through COMPETIA_CONFIG_DIR, which is process-global.
#[tokio::test]
async fn test_expired_token_refresh_and_failure_paths() -> Result<()> {
    let mut server = Server::new_async().await;

    // Scenario 1: 401 triggers a refresh, the original request is retried
    // with the new token and succeeds.
    let happy_dir = tempfile::tempdir()?;
    std::env::set_var("COMPETIA_CONFIG_DIR", happy_dir.path());

    let rejected = server
        .mock("GET", "/auth/me")
        .match_header("authorization", "Bearer stale")
        .with_status(401)
        .with_body(r#"{"detail": "Token expired"}"#)
        .create_async()
        .await;

    let refresh = server
        .mock("POST", "/auth/refresh")
        .match_body(Matcher::PartialJson(json!({"refresh_token": "refresh-1"})))
        .with_status(200)
        .with_body(
            json!({
                "access_token": "fresh",
                "refresh_token": "refresh-2",
            })
            .to_string(),
        )
        .create_async()
        .await;

    let retried = server
        .mock("GET", "/auth/me")
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_body(user_json().to_string())
        .create_async()
        .await;

    let mut config = Config::default();
    config.api.base_url = server.url();
    config.set_tokens("stale".to_string(), "refresh-1".to_string());

    let client = ApiClient::new(config)?;
    let user = client.me().await?;

    rejected.assert_async().await;
    refresh.assert_async().await;
    retried.assert_async().await;
    assert_eq!(user.email, "maria@example.com");

    // The rotated tokens are persisted
    let saved = Config::load()?;
    assert_eq!(saved.auth.token, "fresh");
    assert_eq!(saved.auth.refresh_token, "refresh-2");

    // Scenario 2: refresh itself is rejected, so the stored session is
    // cleared and the caller is told to log in again.
    let broken_dir = tempfile::tempdir()?;
    std::env::set_var("COMPETIA_CONFIG_DIR", broken_dir.path());

    let _still_rejected = server
        .mock("GET", "/auth/me")
        .match_header("authorization", "Bearer revoked")
        .with_status(401)
        .with_body(r#"{"detail": "Token expired"}"#)
        .create_async()
        .await;

    let _refresh_rejected = server
        .mock("POST", "/auth/refresh")
        .match_body(Matcher::PartialJson(json!({"refresh_token": "revoked-refresh"})))
        .with_status(401)
        .with_body(r#"{"detail": "Invalid refresh token"}"#)
        .create_async()
        .await;

    let mut config = Config::default();
    config.api.base_url = server.url();
    config.set_tokens("revoked".to_string(), "revoked-refresh".to_string());

    let client = ApiClient::new(config)?;
    let result = client.me().await;

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Session expired, please log in again"));

    let saved = Config::load()?;
    assert!(!saved.is_authenticated());
    assert!(saved.auth.refresh_token.is_empty());

    std::env::remove_var("COMPETIA_CONFIG_DIR");
    Ok(())
}
