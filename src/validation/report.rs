//! Whole-form validation results.

use crate::core::{FieldKey, RuleSet};
use crate::field::Values;
use crate::validation::validator::is_invalid;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A field whose value failed its rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Field '{}' failed validation: {message}", .key.name())]
pub struct FieldError<K: FieldKey> {
    pub key: K,
    pub message: String,
}

/// Outcome of validating every field: all values, or every failing field.
pub type ValidationReport<K> = Validation<Values<K>, NonEmptyVec<FieldError<K>>>;

/// Per-field check feeding a [`ValidationReport`].
pub(crate) type FieldCheck<K> = Validation<(), NonEmptyVec<FieldError<K>>>;

pub(crate) fn field_check<K: FieldKey>(key: &K, message: Option<&str>) -> FieldCheck<K> {
    match message {
        Some(message) => Validation::fail(FieldError {
            key: key.clone(),
            message: message.to_string(),
        }),
        None => Validation::success(()),
    }
}

/// Accumulate ALL field failures; succeed with the values if there are none.
pub(crate) fn assemble<K: FieldKey>(checks: Vec<FieldCheck<K>>, values: Values<K>) -> ValidationReport<K> {
    match Validation::all_vec(checks) {
        Validation::Success(_) => Validation::Success(values),
        Validation::Failure(errors) => Validation::Failure(errors),
    }
}

/// Validate a set of values against per-field rules without touching any state.
///
/// Fields missing from `values` are checked as empty text. Failures are
/// reported in the order the rules are declared.
///
/// # Example
///
/// ```rust
/// use formstate::core::{Rule, RuleSet};
/// use formstate::validation::check_all;
/// use std::collections::BTreeMap;
///
/// let rules = vec![
///     ("name".to_string(), RuleSet::from(Rule::required("name is required"))),
///     ("email".to_string(), RuleSet::from(Rule::email("email is not valid"))),
/// ];
/// let mut values = BTreeMap::new();
/// values.insert("email".to_string(), "a@b.com".to_string());
///
/// let report = check_all(&rules, &values);
/// assert!(report.is_failure());
/// ```
pub fn check_all<K: FieldKey>(rules: &[(K, RuleSet)], values: &Values<K>) -> ValidationReport<K> {
    let mut checked = Values::new();
    let mut checks = Vec::with_capacity(rules.len());

    for (key, rule_set) in rules {
        let value = values.get(key).map(String::as_str).unwrap_or_default();
        checks.push(field_check(key, is_invalid(Some(rule_set), value)));
        checked.insert(key.clone(), value.to_string());
    }

    assemble(checks, checked)
}
