//! Error types for Carbon Tracker.

use thiserror::Error;

/// Exit code when input is rejected before any request is made
pub const EXIT_INVALID_INPUT: i32 = 64;

/// Exit code when the API answers but refuses the request
pub const EXIT_REQUEST_REJECTED: i32 = 65;

/// Exit code when the API is unavailable/unreachable
pub const EXIT_API_UNAVAILABLE: i32 = 70;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Local, pre-flight failures. Never sent to the network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please select an activity and enter a quantity")]
    MissingSelection,

    #[error("Please enter a quantity")]
    MissingQuantity,

    #[error("Please enter a valid positive number")]
    InvalidQuantity,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("A request is already in flight")]
    Busy,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown activity: {0}")]
    UnknownActivity(String),
}

#[derive(Error, Debug)]
pub enum CarbonError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("This email is already subscribed!")]
    AlreadySubscribed,

    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CarbonError {
    /// Notice shown to the user. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            CarbonError::Validation(v) => v.to_string(),
            CarbonError::Network(_) => "Failed to reach the Carbon Tracker API".to_string(),
            CarbonError::Calculation(_) => {
                "Failed to calculate emissions. Please try again.".to_string()
            }
            CarbonError::AlreadySubscribed => "This email is already subscribed!".to_string(),
            CarbonError::Subscription(_) => "Failed to subscribe. Please try again.".to_string(),
            CarbonError::NotFound(what) => format!("{} not found", what),
            CarbonError::Config(msg) => format!("Configuration problem: {}", msg),
            CarbonError::Io(e) => format!("I/O error: {}", e),
        }
    }

    /// Process exit code for carbonctl
    pub fn exit_code(&self) -> i32 {
        match self {
            CarbonError::Validation(_) => EXIT_INVALID_INPUT,
            CarbonError::Calculation(_)
            | CarbonError::AlreadySubscribed
            | CarbonError::Subscription(_)
            | CarbonError::NotFound(_) => EXIT_REQUEST_REJECTED,
            CarbonError::Network(_) => EXIT_API_UNAVAILABLE,
            CarbonError::Config(_) | CarbonError::Io(_) => EXIT_GENERAL_ERROR,
        }
    }
}

impl From<reqwest::Error> for CarbonError {
    fn from(err: reqwest::Error) -> Self {
        CarbonError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_match_form_copy() {
        assert_eq!(
            ValidationError::MissingSelection.to_string(),
            "Please select an activity and enter a quantity"
        );
        assert_eq!(
            ValidationError::InvalidQuantity.to_string(),
            "Please enter a valid positive number"
        );
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "Please enter a valid email address"
        );
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            CarbonError::AlreadySubscribed.user_message(),
            "This email is already subscribed!"
        );
        assert_eq!(
            CarbonError::Subscription("500".into()).user_message(),
            "Failed to subscribe. Please try again."
        );
        assert_eq!(
            CarbonError::Calculation("boom".into()).user_message(),
            "Failed to calculate emissions. Please try again."
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CarbonError::from(ValidationError::InvalidEmail).exit_code(),
            EXIT_INVALID_INPUT
        );
        assert_eq!(
            CarbonError::Network("down".into()).exit_code(),
            EXIT_API_UNAVAILABLE
        );
        assert_eq!(
            CarbonError::AlreadySubscribed.exit_code(),
            EXIT_REQUEST_REJECTED
        );
        assert_eq!(
            CarbonError::Config("bad".into()).exit_code(),
            EXIT_GENERAL_ERROR
        );
    }
}
