//! Rule evaluation against field values.

use crate::core::{FieldKey, RuleSet};
use crate::field::Field;

/// Check a value against a field's rules, returning the first message.
///
/// Rules are evaluated in declaration order and evaluation stops at the
/// first rule that reports a message. Absent rules never fail.
///
/// # Example
///
/// ```rust
/// use formstate::core::{Rule, RuleSet};
/// use formstate::validation::is_invalid;
///
/// let rules = RuleSet::from(vec![
///     Rule::required("email is required"),
///     Rule::email("email is not valid"),
/// ]);
///
/// assert_eq!(is_invalid(Some(&rules), ""), Some("email is required"));
/// assert_eq!(is_invalid(Some(&rules), "nope"), Some("email is not valid"));
/// assert_eq!(is_invalid(Some(&rules), "a@b.com"), None);
/// assert_eq!(is_invalid(None, ""), None);
/// ```
pub fn is_invalid<'r>(rules: Option<&'r RuleSet>, value: &str) -> Option<&'r str> {
    rules?.rules().iter().find_map(|rule| rule.violation(value))
}

/// Validate a new value for a field, returning the updated field record.
///
/// On failure the field carries `error = true` and the rule's message; on
/// success both are cleared. The change handler is preserved either way.
pub fn validate_field<K: FieldKey>(field: &Field<K>, rules: &RuleSet, value: String) -> Field<K> {
    let message = is_invalid(Some(rules), &value).map(str::to_string);
    field.clone().with_value(value).with_error(message)
}
