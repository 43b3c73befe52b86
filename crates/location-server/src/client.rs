//! HTTP client for the location directory API.
//!
//! `GET {base}/id/{code}` and `GET {base}/search?name=..|state=..`, each with
//! `Accept: application/json` and bearer auth when a token is configured.

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::ServerConfig;

#[derive(Error, Debug)]
pub enum LocationClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct LocationClient {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl LocationClient {
    pub fn new(config: &ServerConfig) -> Result<Self, LocationClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base.clone(),
            bearer_token: config.bearer_token.clone(),
        })
    }

    pub fn by_id_url(&self, location_id: &str) -> String {
        format!("{}/id/{}", self.base_url, urlencoding::encode(location_id))
    }

    pub fn by_name_url(&self, name: &str) -> String {
        format!("{}/search?name={}", self.base_url, urlencoding::encode(name))
    }

    pub fn by_state_url(&self, state: &str) -> String {
        format!("{}/search?state={}", self.base_url, urlencoding::encode(state))
    }

    /// GET `url` and decode the JSON body. Non-2xx statuses are errors.
    pub async fn get(&self, url: &str) -> Result<Value, LocationClientError> {
        debug!(%url, "location request");
        let mut req = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }
        let body = req.send().await?.error_for_status()?.json().await?;
        Ok(body)
    }
}
