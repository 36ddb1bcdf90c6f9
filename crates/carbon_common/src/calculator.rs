//! Calculator form state.
//!
//! All selection state lives in `CalculatorState` and changes only through
//! `handle(Event)` and the begin/finish pair around a calculation request.

use crate::catalog::{unit_suffix, ActivityCatalog, ActivitySet};
use crate::classifier::ImpactBand;
use crate::client::CarbonClient;
use crate::error::{CarbonError, ValidationError};
use crate::quantity::validate_quantity;
use crate::wire::EmissionResult;
use tracing::{debug, warn};

/// Inputs to the calculator state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CatalogLoaded(ActivityCatalog),
    CatalogFailed(String),
    SelectCategory(String),
    SelectActivity(String),
    SetQuantity(String),
    CalculationSucceeded(EmissionResult),
    CalculationFailed(String),
    /// Drop the current result and error, keep selections
    Clear,
}

/// A validated calculation, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCalculation {
    pub activity_type: String,
    pub quantity: f64,
}

/// What a front end shows for a finished calculation
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub activity_name: String,
    pub quantity: f64,
    pub unit_suffix: String,
    pub co2_emissions: f64,
    pub band: ImpactBand,
}

#[derive(Debug, Clone, Default)]
pub struct CalculatorState {
    catalog: ActivityCatalog,
    selected_category: Option<String>,
    selected_activity: Option<String>,
    quantity: String,
    result: Option<EmissionResult>,
    error: Option<String>,
    loading: bool,
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn selected_activity(&self) -> Option<&str> {
        self.selected_activity.as_deref()
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn result(&self) -> Option<&EmissionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Activities of the selected category; empty when nothing is selected
    pub fn category_activities(&self) -> ActivitySet {
        self.selected_category
            .as_deref()
            .and_then(|c| self.catalog.activities(c))
            .cloned()
            .unwrap_or_default()
    }

    /// Mirrors the submit button: enabled only with a selection and some input
    pub fn can_submit(&self) -> bool {
        !self.loading && self.selected_activity.is_some() && !self.quantity.trim().is_empty()
    }

    pub fn handle(&mut self, event: Event) -> Result<(), ValidationError> {
        match event {
            Event::CatalogLoaded(catalog) => {
                self.load_catalog(catalog);
                Ok(())
            }
            Event::CatalogFailed(reason) => {
                warn!("Error fetching activities: {}", reason);
                self.error = Some("Failed to load activities".to_string());
                Ok(())
            }
            Event::SelectCategory(category) => self.select_category(&category),
            Event::SelectActivity(key) => self.select_activity(&key),
            Event::SetQuantity(raw) => {
                self.quantity = raw;
                Ok(())
            }
            Event::CalculationSucceeded(result) => {
                self.loading = false;
                self.error = None;
                self.result = Some(result);
                Ok(())
            }
            Event::CalculationFailed(reason) => {
                warn!("Error calculating emissions: {}", reason);
                self.loading = false;
                self.result = None;
                self.error = Some("Failed to calculate emissions. Please try again.".to_string());
                Ok(())
            }
            Event::Clear => {
                self.result = None;
                self.error = None;
                Ok(())
            }
        }
    }

    /// Install a catalog and select its first category and first activity
    fn load_catalog(&mut self, catalog: ActivityCatalog) {
        self.selected_category = catalog.first_category().map(String::from);
        self.selected_activity = self
            .selected_category
            .as_deref()
            .and_then(|c| catalog.activities(c))
            .and_then(|set| set.first_activity())
            .map(String::from);
        debug!(
            "Catalog loaded: {} categories, default {:?}/{:?}",
            catalog.len(),
            self.selected_category,
            self.selected_activity
        );
        self.catalog = catalog;
        self.error = None;
    }

    /// Switching category resets the activity to the new set's first key,
    /// or to no selection when the set is empty.
    fn select_category(&mut self, category: &str) -> Result<(), ValidationError> {
        let set = self
            .catalog
            .activities(category)
            .ok_or_else(|| ValidationError::UnknownCategory(category.to_string()))?;

        self.selected_activity = set.first_activity().map(String::from);
        self.selected_category = Some(category.to_string());
        Ok(())
    }

    fn select_activity(&mut self, key: &str) -> Result<(), ValidationError> {
        let known = self
            .selected_category
            .as_deref()
            .and_then(|c| self.catalog.activities(c))
            .map(|set| set.contains(key))
            .unwrap_or(false);

        if !known {
            return Err(ValidationError::UnknownActivity(key.to_string()));
        }
        self.selected_activity = Some(key.to_string());
        Ok(())
    }

    /// Validate the form and mark a request in flight.
    ///
    /// On a validation failure the message is recorded and nothing is sent.
    pub fn begin_calculation(&mut self) -> Result<PendingCalculation, ValidationError> {
        if self.loading {
            return Err(ValidationError::Busy);
        }

        let outcome = self.validate_form();
        match &outcome {
            Ok(_) => {
                self.loading = true;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        outcome
    }

    fn validate_form(&self) -> Result<PendingCalculation, ValidationError> {
        let activity = match (&self.selected_activity, self.quantity.trim().is_empty()) {
            (Some(activity), false) => activity.clone(),
            _ => return Err(ValidationError::MissingSelection),
        };
        let quantity = validate_quantity(&self.quantity)?;
        Ok(PendingCalculation {
            activity_type: activity,
            quantity,
        })
    }

    /// Run a full calculation against the API and fold the outcome into state
    pub async fn calculate(
        &mut self,
        client: &CarbonClient,
        user_email: Option<&str>,
    ) -> Result<ResultView, CarbonError> {
        let pending = self.begin_calculation()?;

        match client
            .calculate(&pending.activity_type, pending.quantity, user_email)
            .await
        {
            Ok(result) => {
                let _ = self.handle(Event::CalculationSucceeded(result));
                self.result_view()
                    .ok_or_else(|| CarbonError::Calculation("Result missing".to_string()))
            }
            Err(e) => {
                let _ = self.handle(Event::CalculationFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Current result with labels resolved against the catalog
    pub fn result_view(&self) -> Option<ResultView> {
        let result = self.result.as_ref()?;
        let activity_name = self
            .catalog
            .find(&result.activity_type)
            .map(|(_, activity)| activity.name.clone())
            .unwrap_or_else(|| result.activity_type.clone());

        Some(ResultView {
            activity_name,
            quantity: result.quantity,
            unit_suffix: unit_suffix(&result.unit).to_string(),
            co2_emissions: result.co2_emissions,
            band: ImpactBand::classify(result.co2_emissions),
        })
    }
}
