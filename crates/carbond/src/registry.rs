//! In-memory subscriber and activity records.
//!
//! Nothing here outlives the process. Both types are plain structs; the
//! server wraps them in `RwLock`s.

use carbon_common::{ActivityRecord, EmissionResult, Subscriber};
use chrono::Utc;
use indexmap::IndexMap;

/// Outcome of a subscribe call
#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeOutcome {
    Created(Subscriber),
    /// Previously unsubscribed user switched back on
    Resubscribed(Subscriber),
    AlreadySubscribed,
}

#[derive(Debug, Default)]
pub struct UserRegistry {
    users: IndexMap<String, Subscriber>,
    next_id: u64,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, email: &str, is_subscribed: bool) -> Subscriber {
        self.next_id += 1;
        let user = Subscriber {
            id: self.next_id,
            email: email.to_string(),
            is_subscribed,
            created_at: Utc::now(),
        };
        self.users.insert(email.to_string(), user.clone());
        user
    }

    pub fn subscribe(&mut self, email: &str, is_subscribed: bool) -> SubscribeOutcome {
        match self.users.get_mut(email) {
            Some(user) if user.is_subscribed => SubscribeOutcome::AlreadySubscribed,
            Some(user) => {
                user.is_subscribed = true;
                SubscribeOutcome::Resubscribed(user.clone())
            }
            None => SubscribeOutcome::Created(self.insert(email, is_subscribed)),
        }
    }

    /// Returns false when the email is unknown
    pub fn unsubscribe(&mut self, email: &str) -> bool {
        match self.users.get_mut(email) {
            Some(user) => {
                user.is_subscribed = false;
                true
            }
            None => false,
        }
    }

    /// Make sure a user record exists, without touching its subscription flag
    pub fn ensure(&mut self, email: &str) -> Subscriber {
        match self.users.get(email) {
            Some(user) => user.clone(),
            None => self.insert(email, true),
        }
    }

    pub fn get(&self, email: &str) -> Option<&Subscriber> {
        self.users.get(email)
    }

    pub fn all(&self) -> Vec<Subscriber> {
        self.users.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ActivityLog {
    records: Vec<ActivityRecord>,
    next_id: u64,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, email: &str, result: &EmissionResult) -> ActivityRecord {
        self.next_id += 1;
        let record = ActivityRecord {
            id: self.next_id,
            user_email: email.to_string(),
            activity_type: result.activity_type.clone(),
            quantity: result.quantity,
            co2_emissions: result.co2_emissions,
            created_at: Utc::now(),
        };
        self.records.push(record.clone());
        record
    }

    /// Most recent first, at most `limit` entries
    pub fn history(&self, email: &str, limit: usize) -> Vec<ActivityRecord> {
        self.records
            .iter()
            .rev()
            .filter(|r| r.user_email == email)
            .take(limit)
            .cloned()
            .collect()
    }
}
