//! Disaster-alert backend HTTP client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info};

use crate::api::AlertApi;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{AlertRequest, LoginRequest, Recipient, UsersResponse};

/// Client for communicating with the disaster-alert backend.
#[derive(Clone)]
pub struct AlertClient {
    http: Client,
    config: ApiConfig,
}

impl AlertClient {
    /// Build a client. No request is made until an operation is called.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.is_empty() {
            return Err(ApiError::Config("base URL is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Get the underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.http
    }

    /// Map a non-success status into [`ApiError::Status`].
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }
}

#[async_trait]
impl AlertApi for AlertClient {
    async fn list_users(&self) -> Result<Vec<Recipient>, ApiError> {
        let url = self.config.users_url();
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        let text = response.text().await?;
        let body: UsersResponse = serde_json::from_str(&text)?;

        debug!(count = body.users.len(), "Fetched users");
        Ok(body.users)
    }

    async fn send_alert(&self, request: &AlertRequest) -> Result<(), ApiError> {
        let url = self.config.send_alert_url();
        debug!(
            "POST {} (recipients={})",
            url,
            request.users.len()
        );

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;
        Self::check_status(response).await?;

        info!(recipient_count = request.users.len(), "Alert accepted by backend");
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<(), ApiError> {
        let url = self.config.login_url();
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        // The backend signals success with exactly 200.
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(())
    }
}

impl std::fmt::Debug for AlertClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertClient")
            .field("config", &self.config)
            .finish()
    }
}
