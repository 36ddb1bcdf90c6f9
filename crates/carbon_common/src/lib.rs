//! Carbon Common - Shared types and client logic for Carbon Tracker
//!
//! Catalog lookup, quantity validation, impact classification and the
//! HTTP client used by carbonctl. Wire types are shared with carbond.

pub mod calculator;
pub mod catalog;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod quantity;
pub mod subscription;
pub mod wire;

pub use calculator::{CalculatorState, Event};
pub use catalog::{display_category, unit_suffix, Activity, ActivityCatalog, ActivitySet};
pub use classifier::ImpactBand;
pub use client::CarbonClient;
pub use config::{ClientConfig, ServerConfig};
pub use error::{
    CarbonError, ValidationError, EXIT_API_UNAVAILABLE, EXIT_GENERAL_ERROR, EXIT_INVALID_INPUT,
    EXIT_REQUEST_REJECTED,
};
pub use quantity::validate_quantity;
pub use subscription::{validate_email_format, SubscriptionForm};
pub use wire::*;
