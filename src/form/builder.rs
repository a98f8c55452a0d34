//! Builder for constructing form controllers.

use crate::cell::{SharedCell, StateCell};
use crate::config::ConfigError;
use crate::core::{FieldKey, RuleSet};
use crate::field::FieldMap;
use crate::form::controller::{CellFactory, FormController};
use log::warn;
use std::collections::BTreeSet;

/// Builder for constructing form controllers with a fluent API.
pub struct FormBuilder<K: FieldKey> {
    rules: Vec<(K, RuleSet)>,
    cell: Option<CellFactory<K>>,
}

impl<K: FieldKey> FormBuilder<K> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            cell: None,
        }
    }

    /// Declare a field and its rules (at least one field is required).
    pub fn field(mut self, key: K, rules: impl Into<RuleSet>) -> Self {
        self.rules.push((key, rules.into()));
        self
    }

    /// Keep the field map in a host-provided state cell instead of a [`SharedCell`].
    pub fn cell<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(FieldMap<K>) -> Box<dyn StateCell<FieldMap<K>>> + 'static,
    {
        self.cell = Some(Box::new(factory));
        self
    }

    /// Build the controller.
    /// Returns an error if no field is declared or a key is declared twice.
    pub fn build(self) -> Result<FormController<K>, ConfigError> {
        if self.rules.is_empty() {
            return Err(ConfigError::NoFields);
        }

        let mut seen = BTreeSet::new();
        for (key, rules) in &self.rules {
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateField(key.name().to_string()));
            }
            for rule in rules.rules() {
                if !rule.tests().is_empty() && !rule.has_message() {
                    warn!(
                        "a rule on field '{}' has no message; its failures will not be shown",
                        key.name()
                    );
                }
            }
        }

        let cell: CellFactory<K> = match self.cell {
            Some(cell) => cell,
            None => Box::new(|initial: FieldMap<K>| -> Box<dyn StateCell<FieldMap<K>>> {
                Box::new(SharedCell::new(initial))
            }),
        };
        Ok(FormController::from_parts(self.rules, cell))
    }
}

impl<K: FieldKey> Default for FormBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
