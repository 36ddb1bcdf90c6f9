//! Qualitative impact bands for a computed CO₂ amount.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound (exclusive) of the low band, kg CO₂
pub const LOW_LIMIT_KG: f64 = 1.0;
/// Upper bound (exclusive) of the moderate band, kg CO₂
pub const MODERATE_LIMIT_KG: f64 = 5.0;
/// Upper bound (exclusive) of the significant band, kg CO₂
pub const SIGNIFICANT_LIMIT_KG: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImpactBand {
    Low,
    Moderate,
    Significant,
    High,
}

impl ImpactBand {
    /// Band for an emission amount in kilograms.
    ///
    /// Lower boundaries are inclusive: 1, 5 and 20 land in the higher band.
    /// Every input maps to a band; negative amounts are rejected earlier,
    /// at the calculation boundary.
    pub fn classify(co2_kg: f64) -> Self {
        if co2_kg < LOW_LIMIT_KG {
            ImpactBand::Low
        } else if co2_kg < MODERATE_LIMIT_KG {
            ImpactBand::Moderate
        } else if co2_kg < SIGNIFICANT_LIMIT_KG {
            ImpactBand::Significant
        } else {
            ImpactBand::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImpactBand::Low => "low-impact",
            ImpactBand::Moderate => "moderate-impact",
            ImpactBand::Significant => "significant-impact",
            ImpactBand::High => "high-impact",
        }
    }

    pub fn advisory(&self) -> &'static str {
        match self {
            ImpactBand::Low => "Great choice! This is a low-carbon activity.",
            ImpactBand::Moderate => {
                "This produces moderate emissions. Consider alternatives when possible."
            }
            ImpactBand::Significant => {
                "This activity has significant carbon impact. Look for greener alternatives."
            }
            ImpactBand::High => {
                "High carbon impact! Consider offsetting or finding sustainable alternatives."
            }
        }
    }
}

impl fmt::Display for ImpactBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
