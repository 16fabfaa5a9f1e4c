use anyhow::{Context, Result};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Config;
use crate::models::User;

mod error;
mod pagination;
mod resources;

pub use error::ApiError;
pub use pagination::Page;
pub use resources::{CreateTrainingRequest, TrainingQuery};

/// Login request payload
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response from API
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Token refresh request
#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Debug, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// API client for communicating with the Competia backend
pub struct ApiClient {
    client: Client,
    base_url: String,
    config: Arc<Mutex<Config>>,
    page_size: u64,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_seconds);
        let base_url = config.api.base_url.trim_end_matches('/').to_string();
        let page_size = config.reports.page_size;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            config: Arc::new(Mutex::new(config)),
            page_size,
        })
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Login with email and password, storing the returned tokens
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{}/auth/login", self.base_url);

        tracing::debug!("Logging in as {}", email);

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send login request")?;

        let status = response.status();

        if status.is_success() {
            let login_response: LoginResponse = response
                .json()
                .await
                .context("Failed to parse login response")?;

            {
                let mut config = self.config.lock().unwrap();
                config.set_tokens(
                    login_response.access_token.clone(),
                    login_response.refresh_token.clone(),
                );
                config.save()?;
            }

            tracing::info!("Successfully logged in as {}", email);
            Ok(login_response)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, error_text).into())
        }
    }

    /// Refresh access token
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshTokenResponse> {
        let url = format!("{}/auth/refresh", self.base_url);

        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };

        tracing::debug!("Refreshing access token");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send refresh token request")?;

        let status = response.status();

        if status.is_success() {
            let refresh_response: RefreshTokenResponse = response
                .json()
                .await
                .context("Failed to parse refresh response")?;

            Ok(refresh_response)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, error_text).into())
        }
    }

    /// Get current user information
    pub async fn me(&self) -> Result<User> {
        self.request_json(Method::GET, "/auth/me", &[], None).await
    }

    /// Refresh the access token and save it; a failed refresh clears the
    /// stored session so the user is sent back to login.
    async fn try_refresh_token(&self) -> Result<String> {
        let refresh_token = {
            let config = self.config.lock().unwrap();
            if config.auth.refresh_token.is_empty() {
                return Err(anyhow::anyhow!("No refresh token available"));
            }
            config.auth.refresh_token.clone()
        };

        match self.refresh_token(&refresh_token).await {
            Ok(refresh_response) => {
                let mut config = self.config.lock().unwrap();
                config.set_tokens(
                    refresh_response.access_token.clone(),
                    refresh_response.refresh_token.clone(),
                );
                config.save()?;

                tracing::info!("Successfully refreshed access token");
                Ok(refresh_response.access_token)
            }
            Err(e) => {
                tracing::warn!("Token refresh failed, clearing session: {}", e);

                let mut config = self.config.lock().unwrap();
                config.clear_tokens();
                config.save()?;

                Err(e).context("Session expired, please log in again")
            }
        }
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
        token: &str,
    ) -> Result<Response> {
        let mut request = self.client.request(method, url).bearer_auth(token);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.context("Failed to send request")
    }

    /// Send an authenticated request. A 401 triggers exactly one transparent
    /// refresh-and-retry; there are no further retries or backoff.
    async fn send_authed(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);

        let token = {
            let config = self.config.lock().unwrap();
            if !config.is_authenticated() {
                return Err(anyhow::anyhow!("Not logged in"));
            }
            config.auth.token.clone()
        };

        let response = self
            .execute(method.clone(), &url, query, body, &token)
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("Received 401, attempting token refresh");

            let new_token = self.try_refresh_token().await?;

            return self.execute(method, &url, query, body, &new_token).await;
        }

        Ok(response)
    }

    /// Authenticated request returning a parsed JSON body
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        let response = self.send_authed(method, path, query, body).await?;
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .context("Failed to parse API response")
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, error_text).into())
        }
    }

    /// Download the platform logo. Callers treat any failure here as
    /// "render without a logo", never as a fatal error.
    pub async fn fetch_logo(&self, logo_url: &str) -> Result<Vec<u8>> {
        let url = if logo_url.starts_with("http://") || logo_url.starts_with("https://") {
            logo_url.to_string()
        } else {
            format!("{}/{}", self.base_url, logo_url.trim_start_matches('/'))
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to download logo")?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status, String::new()).into());
        }

        let bytes = response.bytes().await.context("Failed to read logo bytes")?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_creation() {
        let config = Config::default();
        let client = ApiClient::new(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let mut config = Config::default();
        config.api.base_url = "http://localhost:8000/".to_string();

        let client = ApiClient::new(config).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
