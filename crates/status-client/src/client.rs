//! HTTP client for the status API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;


/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:8080").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Market Status API.
#[derive(Debug, Clone)]
pub struct StatusClient {
    client: Client,
    base_url: String,
}

impl StatusClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Lists every container, keyed by name.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_status(&self) -> Result<BTreeMap<String, Value>, Error> {
        self.get_status(&StatusQuery::default()).await
    }

    /// Gets one container as a nested tree.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the container does not exist.
    pub async fn get_container(&self, container: &str) -> Result<Value, Error> {
        self.get_status(&StatusQuery::container(container)).await
    }

    /// Gets selected paths of one container.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the container does not exist.
    pub async fn get_container_values(
        &self,
        container: &str,
        paths: &[&str],
    ) -> Result<Value, Error> {
        self.get_status(&StatusQuery::paths(container, paths)).await
    }

    /// Pushes a status update.
    ///
    /// # Errors
    /// Returns error if the request fails or the update carries no data.
    pub async fn post_status(&self, update: &StatusUpdate) -> Result<StatusUpdateResponse, Error> {
        let url = format!("{}/status", self.base_url);
        let resp = self.client.post(&url).json(update).send().await?;
        self.handle_response(resp).await
    }

    /// Drops every container.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn clear_status(&self) -> Result<ClearStatusResponse, Error> {
        let url = format!("{}/status", self.base_url);
        let resp = self.client.delete(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Warnings
    // ========================================================================

    /// Lists warnings with optional filters.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_warnings(&self, query: &WarningQuery) -> Result<Vec<Warning>, Error> {
        let url = self.url_with_query("/warning", query)?;
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Gets a warning by id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no warning has this id.
    pub async fn get_warning(&self, id: u64) -> Result<Warning, Error> {
        let url = format!("{}/warning/{}", self.base_url, id);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Records a warning.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn create_warning(&self, warning: &NewWarning) -> Result<Warning, Error> {
        let url = format!("{}/warning", self.base_url);
        let resp = self.client.post(&url).json(warning).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // WebSocket
    // ========================================================================

    /// Returns the status stream WebSocket URL.
    #[must_use]
    pub fn status_ws_url(&self) -> String {
        format!("{}/ws/status", self.ws_base())
    }

    /// Returns the warning stream WebSocket URL.
    #[must_use]
    pub fn warning_ws_url(&self) -> String {
        format!("{}/ws/warning", self.ws_base())
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn ws_base(&self) -> String {
        self.base_url
            .replace("http://", "ws://")
            .replace("https://", "wss://")
    }

    fn url_with_query<Q: Serialize>(&self, path: &str, query: &Q) -> Result<String, Error> {
        let mut url = format!("{}{}", self.base_url, path);
        let params = serde_urlencoded::to_string(query)?;
        if !params.is_empty() {
            url.push_str(&format!("?{}", params));
        }
        Ok(url)
    }

    async fn get_status<T: serde::de::DeserializeOwned>(
        &self,
        query: &StatusQuery,
    ) -> Result<T, Error> {
        let url = self.url_with_query("/status", query)?;
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else if status.as_u16() == 404 {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::NotFound(text))
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}
