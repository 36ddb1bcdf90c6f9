//! HTTP client for the Carbon Tracker API

use crate::catalog::ActivityCatalog;
use crate::config::ClientConfig;
use crate::error::CarbonError;
use crate::wire::{
    ActivityRecord, CalculationRequest, CategoriesResponse, EmissionResult, ErrorBody,
    HealthResponse, MessageResponse, SubscribeRequest, Subscriber, TipRequest,
};
use reqwest::{Response, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Client for communicating with carbond
#[derive(Debug, Clone)]
pub struct CarbonClient {
    client: reqwest::Client,
    base_url: String,
}

impl CarbonClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a client with the configured base URL and request timeout
    pub fn from_config(config: &ClientConfig) -> Result<Self, CarbonError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CarbonError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL with each segment percent-encoded, for paths carrying user input
    fn url_with_segments(&self, segments: &[&str]) -> Result<Url, CarbonError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CarbonError::Config(format!("Invalid API URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| CarbonError::Config(format!("Invalid API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetch the activity catalog
    pub async fn fetch_catalog(&self) -> Result<ActivityCatalog, CarbonError> {
        let url = self.url("/api/emissions/activities");
        debug!("GET {}", url);

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let (status, detail) = failure_detail(resp).await;
            return Err(CarbonError::Network(format!(
                "Failed to load activities ({}): {}",
                status, detail
            )));
        }

        resp.json()
            .await
            .map_err(|e| CarbonError::Network(format!("Failed to parse activities: {}", e)))
    }

    /// Category keys in server order
    pub async fn categories(&self) -> Result<Vec<String>, CarbonError> {
        let url = self.url("/api/emissions/categories");
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let (status, detail) = failure_detail(resp).await;
            return Err(CarbonError::Network(format!("{}: {}", status, detail)));
        }

        let body: CategoriesResponse = resp.json().await?;
        Ok(body.categories)
    }

    /// Ask the server to compute emissions for `quantity` of `activity_type`.
    ///
    /// Every failure, including transport errors, is a calculation error.
    /// Results with negative or non-finite emissions are rejected here so
    /// the classifier only ever sees valid amounts.
    pub async fn calculate(
        &self,
        activity_type: &str,
        quantity: f64,
        user_email: Option<&str>,
    ) -> Result<EmissionResult, CarbonError> {
        let url = self.url("/api/emissions/calculate");
        let request = CalculationRequest {
            activity_type: activity_type.to_string(),
            quantity,
            user_email: user_email.map(String::from),
        };
        debug!("POST {} ({} x {})", url, activity_type, quantity);

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CarbonError::Calculation(format!("Request failed: {}", e)))?;

        if !resp.status().is_success() {
            let (status, detail) = failure_detail(resp).await;
            warn!("Calculation rejected ({}): {}", status, detail);
            return Err(CarbonError::Calculation(detail));
        }

        let result: EmissionResult = resp
            .json()
            .await
            .map_err(|e| CarbonError::Calculation(format!("Failed to parse result: {}", e)))?;

        if !result.co2_emissions.is_finite() || result.co2_emissions < 0.0 {
            return Err(CarbonError::Calculation(format!(
                "Server returned invalid emissions value {}",
                result.co2_emissions
            )));
        }

        Ok(result)
    }

    /// Subscribe an email for weekly tips. 400 means already subscribed.
    pub async fn subscribe(&self, email: &str) -> Result<Subscriber, CarbonError> {
        let url = self.url("/api/users/subscribe");
        let request = SubscribeRequest {
            email: email.to_string(),
            is_subscribed: true,
        };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CarbonError::Subscription(format!("Request failed: {}", e)))?;

        match resp.status() {
            s if s.is_success() => resp
                .json()
                .await
                .map_err(|e| CarbonError::Subscription(format!("Failed to parse response: {}", e))),
            StatusCode::BAD_REQUEST => Err(CarbonError::AlreadySubscribed),
            _ => {
                let (status, detail) = failure_detail(resp).await;
                Err(CarbonError::Subscription(format!("{}: {}", status, detail)))
            }
        }
    }

    pub async fn unsubscribe(&self, email: &str) -> Result<MessageResponse, CarbonError> {
        let url = self.url("/api/users/unsubscribe");
        let resp = self
            .client
            .post(&url)
            .query(&[("email", email)])
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(resp.json().await?),
            StatusCode::NOT_FOUND => Err(CarbonError::NotFound(format!("User {}", email))),
            _ => {
                let (status, detail) = failure_detail(resp).await;
                Err(CarbonError::Subscription(format!("{}: {}", status, detail)))
            }
        }
    }

    /// Trigger a weekly tip email for a subscribed user
    pub async fn send_tip(&self, email: &str) -> Result<MessageResponse, CarbonError> {
        let url = self.url("/api/users/send-tip");
        let resp = self
            .client
            .post(&url)
            .json(&TipRequest {
                email: email.to_string(),
            })
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(resp.json().await?),
            StatusCode::NOT_FOUND => Err(CarbonError::NotFound(format!("User {}", email))),
            StatusCode::BAD_REQUEST => Err(CarbonError::NotFound(format!(
                "Active subscription for {}",
                email
            ))),
            _ => {
                let (status, detail) = failure_detail(resp).await;
                Err(CarbonError::Network(format!("{}: {}", status, detail)))
            }
        }
    }

    /// Recorded calculations for an email, most recent first
    pub async fn history(&self, email: &str) -> Result<Vec<ActivityRecord>, CarbonError> {
        let url = self.url_with_segments(&["api", "emissions", "history", email])?;
        debug!("GET {}", url);
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            let (status, detail) = failure_detail(resp).await;
            return Err(CarbonError::Network(format!("{}: {}", status, detail)));
        }
        Ok(resp.json().await?)
    }

    pub async fn users(&self) -> Result<Vec<Subscriber>, CarbonError> {
        let url = self.url("/api/users/");
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let (status, detail) = failure_detail(resp).await;
            return Err(CarbonError::Network(format!("{}: {}", status, detail)));
        }
        Ok(resp.json().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse, CarbonError> {
        let url = self.url("/health");
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let (status, detail) = failure_detail(resp).await;
            return Err(CarbonError::Network(format!("{}: {}", status, detail)));
        }
        Ok(resp.json().await?)
    }
}

impl Default for CarbonClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Status plus the server's `detail` message, or the raw body if it isn't JSON
async fn failure_detail(resp: Response) -> (StatusCode, String) {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.detail)
        .unwrap_or(text);
    (status, detail)
}
