//! Override registry and alert type resolution.
//!
//! The registry holds the concrete alert type bound to each standard category
//! plus the list of custom alert types known to the application. It is
//! mutated during the configuration phase only and shared read-only behind an
//! `Arc` afterwards; mutating it after the first raise is the caller's
//! responsibility and is not guarded against.

use crate::alert_type::{AlertEvent, AlertType};
use crate::core::AlertCategory;
use crate::error::AlertError;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct OverrideRegistry {
    bindings: BTreeMap<AlertCategory, AlertType>,
    custom: Vec<AlertType>,
}

impl Default for OverrideRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OverrideRegistry {
    /// Creates a registry with every standard category bound to its default.
    pub fn new() -> Self {
        let bindings = AlertCategory::STANDARD
            .into_iter()
            .filter_map(|c| AlertType::default_for(c).map(|t| (c, t)))
            .collect();
        Self {
            bindings,
            custom: Vec::new(),
        }
    }

    /// Replaces the binding of a standard category.
    ///
    /// # Returns
    /// * `Err(AlertError::Configuration)` if `category` is not overridable or
    ///   `alert_type` is not a kind of `category`
    pub fn bind(&mut self, category: AlertCategory, alert_type: AlertType) -> Result<(), AlertError> {
        if !category.is_standard() {
            return Err(AlertError::config(format!(
                "'{}' alerts cannot be overridden",
                category
            )));
        }
        if !alert_type.is_kind_of(category) {
            return Err(AlertError::config(format!(
                "'{}' is not a kind of '{}' alert",
                alert_type, category
            )));
        }
        debug!(category = %category, alert_type = %alert_type, "Binding alert type");
        self.bindings.insert(category, alert_type);
        Ok(())
    }

    /// Binds `T` to the standard category it is a kind of.
    pub fn bind_type<T: AlertEvent>(&mut self) -> Result<(), AlertError> {
        let alert_type = AlertType::of::<T>();
        let category = alert_type.kind_of().ok_or_else(|| {
            AlertError::config(format!(
                "'{}' is not a kind of any standard alert",
                alert_type
            ))
        })?;
        self.bind(category, alert_type)
    }

    /// Appends a custom alert type. Adding the same type twice is a no-op.
    pub fn add_custom(&mut self, alert_type: AlertType) {
        if self.custom.contains(&alert_type) {
            return;
        }
        debug!(alert_type = %alert_type, "Registering custom alert type");
        self.custom.push(alert_type);
    }

    pub fn add_custom_type<T: AlertEvent>(&mut self) {
        self.add_custom(AlertType::of::<T>());
    }

    /// Applies name-based overrides, looking each name up with [`Self::find`].
    pub fn apply_overrides(
        &mut self,
        overrides: &BTreeMap<AlertCategory, String>,
    ) -> Result<(), AlertError> {
        for (category, name) in overrides {
            let alert_type = self.find(name).ok_or_else(|| {
                AlertError::config(format!(
                    "alert type '{}' configured for '{}' is not registered",
                    name, category
                ))
            })?;
            self.bind(*category, alert_type)?;
        }
        Ok(())
    }

    /// The current binding of a standard category.
    pub fn binding(&self, category: AlertCategory) -> Option<AlertType> {
        self.bindings.get(&category).copied()
    }

    /// Returns `true` if `category` is bound to something other than its default.
    pub fn is_overridden(&self, category: AlertCategory) -> bool {
        match (self.binding(category), AlertType::default_for(category)) {
            (Some(bound), Some(default)) => bound != default,
            _ => false,
        }
    }

    /// Returns `true` iff any standard binding differs from its default.
    pub fn has_overrides(&self) -> bool {
        AlertCategory::STANDARD
            .into_iter()
            .any(|c| self.is_overridden(c))
    }

    pub fn custom_alerts(&self) -> &[AlertType] {
        &self.custom
    }

    /// Looks up a known alert type by name: custom types first, then the
    /// current bindings and the compiled-in defaults.
    pub fn find(&self, name: &str) -> Option<AlertType> {
        self.custom
            .iter()
            .chain(self.bindings.values())
            .copied()
            .chain(AlertCategory::STANDARD.into_iter().filter_map(AlertType::default_for))
            .find(|t| t.name() == name)
    }

    /// The effective type of each standard category, in resolution order.
    pub fn effective_standard_types(&self) -> impl Iterator<Item = (AlertCategory, AlertType)> + '_ {
        AlertCategory::STANDARD
            .into_iter()
            .filter_map(|c| self.binding(c).map(|t| (c, t)))
    }

    /// Determines the alert type that actually fires for `requested`.
    ///
    /// Without overrides this is the identity. Otherwise the first standard
    /// category (Audit, Information, Warning, Error, Critical) that
    /// `requested` is a kind of decides, and its current binding is returned.
    /// Types that are a kind of no standard category pass through unchanged.
    pub fn resolve(&self, requested: &AlertType) -> AlertType {
        if !self.has_overrides() {
            return *requested;
        }
        AlertCategory::STANDARD
            .into_iter()
            .find(|c| requested.is_kind_of(*c))
            .and_then(|c| self.binding(c))
            .unwrap_or(*requested)
    }

    pub fn resolve_type<T: AlertEvent>(&self) -> AlertType {
        self.resolve(&AlertType::of::<T>())
    }
}
