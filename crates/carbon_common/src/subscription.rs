//! Email subscription form

use crate::client::CarbonClient;
use crate::error::{CarbonError, ValidationError};
use crate::wire::Subscriber;
use tracing::info;

pub const SUBSCRIBED_MESSAGE: &str =
    "Successfully subscribed! You'll receive weekly carbon tips.";

/// Local format check run before any network call: non-empty and contains `@`
pub fn validate_email_format(email: &str) -> Result<&str, ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(trimmed)
}

#[derive(Debug, Clone, Default)]
pub struct SubscriptionForm {
    email: String,
    loading: bool,
}

impl SubscriptionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Submit the current email. The field is cleared only on success.
    pub async fn submit(&mut self, client: &CarbonClient) -> Result<Subscriber, CarbonError> {
        if self.loading {
            return Err(ValidationError::Busy.into());
        }
        let email = validate_email_format(&self.email)?.to_string();

        self.loading = true;
        let outcome = client.subscribe(&email).await;
        self.loading = false;

        let subscriber = outcome?;
        info!("Subscribed {}", subscriber.email);
        self.email.clear();
        Ok(subscriber)
    }
}
