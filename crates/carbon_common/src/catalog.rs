//! Activity catalog: category -> activity -> display metadata.
//!
//! Both levels are ordered maps. The first category and the first activity
//! within a category are the defaults a front end selects, so iteration
//! order is the order the server sent them in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Suffix used when a unit has no basis part after the `/`
pub const DEFAULT_UNIT_SUFFIX: &str = "units";

/// A unit-tagged kind of emitting behaviour, e.g. driving a car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    /// "<quantity unit>/<basis unit>", e.g. "kg CO₂/km"
    pub unit: String,
    pub description: String,
}

impl Activity {
    pub fn unit_suffix(&self) -> &str {
        unit_suffix(&self.unit)
    }
}

/// Basis part of a unit string: `"kg CO₂/km"` -> `"km"`.
pub fn unit_suffix(unit: &str) -> &str {
    match unit.split('/').nth(1) {
        Some(basis) if !basis.trim().is_empty() => basis.trim(),
        _ => DEFAULT_UNIT_SUFFIX,
    }
}

/// Display label for a category key: first character upper-cased.
pub fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Activities of a single category, keyed by activity identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivitySet(IndexMap<String, Activity>);

impl ActivitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, activity: Activity) {
        self.0.insert(key.into(), activity);
    }

    pub fn get(&self, key: &str) -> Option<&Activity> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Default selection: first key in iteration order
    pub fn first_activity(&self) -> Option<&str> {
        self.0.keys().next().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Activity)> for ActivitySet {
    fn from_iter<I: IntoIterator<Item = (String, Activity)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Read-only reference data, fetched once per session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityCatalog(IndexMap<String, ActivitySet>);

impl ActivityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, set: ActivitySet) {
        self.0.insert(category.into(), set);
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn first_category(&self) -> Option<&str> {
        self.0.keys().next().map(String::as_str)
    }

    pub fn activities(&self, category: &str) -> Option<&ActivitySet> {
        self.0.get(category)
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    /// Locate an activity key across all categories, first match wins.
    pub fn find(&self, activity_key: &str) -> Option<(&str, &Activity)> {
        self.0.iter().find_map(|(category, set)| {
            set.get(activity_key)
                .map(|activity| (category.as_str(), activity))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActivitySet)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ActivitySet)> for ActivityCatalog {
    fn from_iter<I: IntoIterator<Item = (String, ActivitySet)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ActivityCatalog {
        serde_json::from_str(
            r#"{
                "transport": {
                    "car": {"name": "Car", "unit": "kg/km", "description": "Average car"},
                    "bus": {"name": "Bus", "unit": "kg/km", "description": "City bus"}
                },
                "energy": {
                    "electricity": {"name": "Electricity", "unit": "kg CO₂/kWh", "description": "Grid"}
                },
                "empty": {}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_iteration_order_follows_document() {
        let catalog = sample();
        let cats: Vec<&str> = catalog.categories().collect();
        assert_eq!(cats, vec!["transport", "energy", "empty"]);
        assert_eq!(catalog.first_category(), Some("transport"));
        assert_eq!(
            catalog.activities("transport").unwrap().first_activity(),
            Some("car")
        );
    }

    #[test]
    fn test_empty_category_has_no_first_activity() {
        let catalog = sample();
        let set = catalog.activities("empty").unwrap();
        assert!(set.is_empty());
        assert_eq!(set.first_activity(), None);
    }

    #[test]
    fn test_find_across_categories() {
        let catalog = sample();
        let (category, activity) = catalog.find("electricity").unwrap();
        assert_eq!(category, "energy");
        assert_eq!(activity.name, "Electricity");
        assert!(catalog.find("rocket").is_none());
    }

    #[test]
    fn test_unit_suffix() {
        assert_eq!(unit_suffix("kg/km"), "km");
        assert_eq!(unit_suffix("kg CO₂/kWh"), "kWh");
        assert_eq!(unit_suffix("kg"), DEFAULT_UNIT_SUFFIX);
        assert_eq!(unit_suffix("kg/"), DEFAULT_UNIT_SUFFIX);
        assert_eq!(unit_suffix("kg/km/h"), "km");
    }

    #[test]
    fn test_display_category() {
        assert_eq!(display_category("transport"), "Transport");
        assert_eq!(display_category(""), "");
    }

    #[test]
    fn test_serializes_back_in_order() {
        let catalog = sample();
        let json = serde_json::to_string(&catalog).unwrap();
        let t = json.find("transport").unwrap();
        let e = json.find("energy").unwrap();
        assert!(t < e);
    }
}
