//! Emission factor table and the calculation it backs.
//!
//! The table ships inside the binary. Factors are kg CO₂ per unit of
//! activity; the public catalog is the same table with factors stripped.

use carbon_common::{Activity, ActivityCatalog, ActivitySet, EmissionResult};
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Built-in factor table
pub const EMBEDDED_FACTORS: &str = include_str!("../factors/emission_factors.json");

#[derive(Error, Debug)]
pub enum FactorError {
    #[error("Failed to parse emission factors: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Activity '{0}' has an invalid factor {1}")]
    InvalidFactor(String, f64),

    #[error("Activity '{0}' has unit '{1}', expected exactly one '/' separator")]
    InvalidUnit(String, String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmissionFactor {
    pub name: String,
    /// kg CO₂ per unit
    pub factor: f64,
    pub unit: String,
    pub description: String,
}

type FactorTable = IndexMap<String, IndexMap<String, EmissionFactor>>;

#[derive(Debug, Clone)]
pub struct EmissionService {
    factors: FactorTable,
}

impl EmissionService {
    /// Service backed by the built-in table
    pub fn embedded() -> Result<Self, FactorError> {
        Self::from_json(EMBEDDED_FACTORS)
    }

    /// Parse and check a factor table.
    ///
    /// Factors must be finite and non-negative so a positive quantity can
    /// never produce negative emissions.
    pub fn from_json(json: &str) -> Result<Self, FactorError> {
        let factors: FactorTable = serde_json::from_str(json)?;

        for (key, entry) in factors.values().flat_map(|set| set.iter()) {
            if !entry.factor.is_finite() || entry.factor < 0.0 {
                return Err(FactorError::InvalidFactor(key.clone(), entry.factor));
            }
            if entry.unit.matches('/').count() != 1 {
                return Err(FactorError::InvalidUnit(key.clone(), entry.unit.clone()));
            }
        }

        debug!(
            "Loaded {} activities in {} categories",
            factors.values().map(|set| set.len()).sum::<usize>(),
            factors.len()
        );
        Ok(Self { factors })
    }

    /// Public catalog: everything except the factors
    pub fn catalog(&self) -> ActivityCatalog {
        self.factors
            .iter()
            .map(|(category, entries)| {
                let set: ActivitySet = entries
                    .iter()
                    .map(|(key, entry)| {
                        (
                            key.clone(),
                            Activity {
                                name: entry.name.clone(),
                                unit: entry.unit.clone(),
                                description: entry.description.clone(),
                            },
                        )
                    })
                    .collect();
                (category.clone(), set)
            })
            .collect()
    }

    pub fn categories(&self) -> Vec<String> {
        self.factors.keys().cloned().collect()
    }

    pub fn factor(&self, activity_type: &str) -> Option<&EmissionFactor> {
        self.factors
            .values()
            .find_map(|entries| entries.get(activity_type))
    }

    /// `factor * quantity`, rounded to grams. `None` for an unknown activity.
    pub fn calculate(&self, activity_type: &str, quantity: f64) -> Option<EmissionResult> {
        let entry = self.factor(activity_type)?;
        Some(EmissionResult {
            activity_type: activity_type.to_string(),
            quantity,
            co2_emissions: round_to_grams(entry.factor * quantity),
            unit: entry.unit.clone(),
        })
    }
}

fn round_to_grams(kg: f64) -> f64 {
    (kg * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_loads() {
        let service = EmissionService::embedded().unwrap();
        assert_eq!(
            service.categories(),
            vec!["transport", "energy", "food", "household"]
        );
    }

    #[test]
    fn test_car_gasoline() {
        let service = EmissionService::embedded().unwrap();
        let result = service.calculate("car_gasoline", 10.0).unwrap();
        assert_eq!(result.co2_emissions, 2.1);
        assert!(result.unit.contains("kg CO₂/km"));
        assert_eq!(result.quantity, 10.0);
    }

    #[test]
    fn test_unknown_activity() {
        let service = EmissionService::embedded().unwrap();
        assert!(service.calculate("invalid_activity", 10.0).is_none());
    }

    #[test]
    fn test_rounds_to_three_decimals() {
        let service = EmissionService::embedded().unwrap();
        let result = service.calculate("water", 7.0).unwrap();
        assert_eq!(result.co2_emissions, 0.002);
    }

    #[test]
    fn test_catalog_strips_factors_and_keeps_order() {
        let service = EmissionService::embedded().unwrap();
        let catalog = service.catalog();
        assert_eq!(catalog.first_category(), Some("transport"));
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json["transport"]["car_gasoline"].get("factor").is_none());
        assert_eq!(json["transport"]["car_gasoline"]["name"], "Car (Gasoline)");
    }

    #[test]
    fn test_rejects_negative_factor() {
        let json = r#"{"x": {"bad": {"name": "Bad", "factor": -1.0, "unit": "kg/km", "description": ""}}}"#;
        assert!(matches!(
            EmissionService::from_json(json),
            Err(FactorError::InvalidFactor(_, _))
        ));
    }

    #[test]
    fn test_rejects_unit_without_separator() {
        let json = r#"{"x": {"bad": {"name": "Bad", "factor": 1.0, "unit": "kg", "description": ""}}}"#;
        assert!(matches!(
            EmissionService::from_json(json),
            Err(FactorError::InvalidUnit(_, _))
        ));
    }

    #[test]
    fn test_rejects_unit_with_extra_separators() {
        let json = r#"{"x": {"bad": {"name": "Bad", "factor": 1.0, "unit": "kg/km/h", "description": ""}}}"#;
        assert!(matches!(
            EmissionService::from_json(json),
            Err(FactorError::InvalidUnit(_, _))
        ));
    }
}
