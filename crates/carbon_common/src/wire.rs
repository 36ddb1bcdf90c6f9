//! Request and response bodies shared by carbond and carbonctl.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/emissions/calculate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub activity_type: String,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

/// Result of a calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    pub activity_type: String,
    pub quantity: f64,
    /// Kilograms of CO₂
    pub co2_emissions: f64,
    pub unit: String,
}

/// Body of `POST /api/users/subscribe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default = "default_true")]
    pub is_subscribed: bool,
}

fn default_true() -> bool {
    true
}

/// Body of `POST /api/users/send-tip`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: u64,
    pub email: String,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
}

/// One recorded calculation in a user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: u64,
    pub user_email: String,
    pub activity_type: String,
    pub quantity: f64,
    pub co2_emissions: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub message: String,
    pub version: String,
    pub health: String,
}

/// Plain acknowledgement, e.g. after unsubscribing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Every error body carbond returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
