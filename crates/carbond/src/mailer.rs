//! Welcome and weekly-tip emails.
//!
//! There is no delivery backend; `LogMailer` writes what would be sent to
//! the log.

use rand::seq::SliceRandom;
use tracing::info;

pub const WEEKLY_TIPS: [&str; 10] = [
    "🚗 Try carpooling or using public transport once this week to reduce your transport emissions by up to 45%.",
    "💡 Switch to LED bulbs - they use 75% less energy and last 25 times longer than incandescent bulbs.",
    "🥗 Try having one plant-based meal today. Beef production creates 27kg of CO₂ per kg, while vegetables create only 2kg.",
    "♻️ Recycle properly this week. Recycling aluminum cans saves 95% of the energy needed to make new ones.",
    "🚿 Take shorter showers. A 4-minute shower uses about 40 gallons less water than an 8-minute shower.",
    "🌡️ Lower your thermostat by 2°F in winter and raise it by 2°F in summer to save energy without sacrificing comfort.",
    "🔌 Unplug electronics when not in use. Many devices consume energy even when turned off.",
    "🚴 Walk or bike for short trips under 2 miles. It's good for you and produces zero emissions!",
    "📱 Buy only what you need. The production of new items has a significant carbon footprint.",
    "🌱 Start composting food scraps. It reduces methane emissions from landfills and creates nutrient-rich soil.",
];

const WELCOME_BODY: &str = "Welcome to Carbon Footprint Tracker! 🌍\n\n\
Thank you for taking the first step towards a more sustainable lifestyle.\n\n\
You'll receive weekly tips to help reduce your carbon footprint.\n\
Every small action counts towards a healthier planet!\n\n\
Best regards,\n\
The Carbon Tracker Team";

/// Outgoing email channel
pub trait TipMailer: Send + Sync {
    fn send_welcome(&self, email: &str) -> bool;
    fn send_weekly_tip(&self, email: &str) -> bool;
}

/// Picks one of the weekly tips at random
pub fn random_tip() -> &'static str {
    WEEKLY_TIPS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(WEEKLY_TIPS[0])
}

#[derive(Debug, Clone)]
pub struct LogMailer {
    from_email: String,
}

impl LogMailer {
    pub fn new(from_email: impl Into<String>) -> Self {
        Self {
            from_email: from_email.into(),
        }
    }
}

impl TipMailer for LogMailer {
    fn send_welcome(&self, email: &str) -> bool {
        info!(
            from = %self.from_email,
            to = %email,
            bytes = WELCOME_BODY.len(),
            "Sending welcome email"
        );
        true
    }

    fn send_weekly_tip(&self, email: &str) -> bool {
        let tip = random_tip();
        info!(from = %self.from_email, to = %email, "Sending weekly tip: {}", tip);
        true
    }
}
