//! Rules configuration.
//!
//! Forms are usually declared in code through
//! [`FormBuilder`](crate::form::FormBuilder). A [`RulesConfig`] is the data
//! form of the same declaration, parsed from JSON:
//!
//! ```json
//! {
//!     "name":  { "test": "required", "message": "name is required" },
//!     "phone": { "test": { "regex": "^[0-9]{5,10}$" }, "message": "phone is not valid" },
//!     "email": { "test": ["required", "email"], "message": "email is not valid" }
//! }
//! ```
//!
//! Unknown pattern tokens, malformed expressions and repeated field names are
//! rejected while parsing, before any form exists.

mod error;

pub use error::ConfigError;

use crate::core::{FieldKey, RuleSet};
use crate::form::FormBuilder;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-field rules keyed by field name, in declaration order.
///
/// # Example
///
/// ```rust
/// use formstate::config::RulesConfig;
/// use formstate::form::FormController;
///
/// let config = RulesConfig::from_json(r#"{
///     "name": { "test": "required", "message": "name is required" },
///     "email": { "test": ["required", "email"], "message": "email is not valid" }
/// }"#).unwrap();
///
/// let form: FormController<String> = config.into_builder().unwrap().build().unwrap();
/// assert_eq!(form.fields().len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RulesConfig {
    fields: Vec<(String, RuleSet)>,
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON rules configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Add a field. Fails if the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, rules: impl Into<RuleSet>) -> Result<(), ConfigError> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(ConfigError::DuplicateField(name));
        }
        self.fields.push((name, rules.into()));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RuleSet> {
        self.fields
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, rules)| rules)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve every field name into a key and declare it on a builder.
    pub fn into_builder<K: FieldKey>(self) -> Result<FormBuilder<K>, ConfigError> {
        self.fields
            .into_iter()
            .try_fold(FormBuilder::new(), |builder, (name, rules)| {
                let key = K::from_name(&name).ok_or(ConfigError::UnknownField(name))?;
                Ok(builder.field(key, rules))
            })
    }
}

impl Serialize for RulesConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, rules) in &self.fields {
            map.serialize_entry(name, rules)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RulesConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RulesConfigVisitor)
    }
}

struct RulesConfigVisitor;

impl<'de> Visitor<'de> for RulesConfigVisitor {
    type Value = RulesConfig;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from field name to rules")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut config = RulesConfig::new();
        while let Some((name, rules)) = map.next_entry::<String, RuleSet>()? {
            config
                .insert(name, rules)
                .map_err(<A::Error as de::Error>::custom)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Pattern, Rule};
    use crate::field_keys;

    field_keys! {
        enum TestKey {
            Name = "name",
            Phone = "phone",
            Email = "email",
        }
    }

    const SIGNUP: &str = r#"{
        "name": { "test": "required", "message": "name is required" },
        "phone": { "test": { "regex": "^[0-9]{5,10}$" }, "message": "phone is not valid" },
        "email": { "test": ["required", "email"], "message": "email is not valid" }
    }"#;

    #[test]
    fn parses_fields_in_declaration_order() {
        let config = RulesConfig::from_json(SIGNUP).unwrap();

        assert_eq!(config.names().collect::<Vec<_>>(), vec!["name", "phone", "email"]);
        assert_eq!(config.get("name"), Some(&RuleSet::from(Rule::required("name is required"))));
        assert_eq!(
            config.get("email").unwrap().rules()[0].tests(),
            &[Pattern::Required, Pattern::Email]
        );
    }

    #[test]
    fn builds_a_form_with_typed_keys() {
        let form = RulesConfig::from_json(SIGNUP)
            .unwrap()
            .into_builder::<TestKey>()
            .unwrap()
            .build()
            .unwrap();

        form.set_values([(TestKey::Name, "Ann"), (TestKey::Phone, "12"), (TestKey::Email, "a@b")]);

        assert!(form.validate().is_none());
        assert_eq!(
            form.errors().get(&TestKey::Phone).map(String::as_str),
            Some("phone is not valid")
        );
    }

    #[test]
    fn unknown_field_name_is_rejected() {
        let config = RulesConfig::from_json(r#"{"zip": {"test": "required"}}"#).unwrap();
        let result = config.into_builder::<TestKey>();
        assert!(matches!(result, Err(ConfigError::UnknownField(ref name)) if name == "zip"));
    }

    #[test]
    fn unknown_pattern_token_is_rejected() {
        let result = RulesConfig::from_json(r#"{"name": {"test": "phone", "message": "x"}}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn duplicate_field_name_is_rejected() {
        let result = RulesConfig::from_json(
            r#"{"name": {"test": "required"}, "name": {"test": "email"}}"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(ref msg)) if msg.contains("name")));
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut config = RulesConfig::new();
        config.insert("name", Rule::required("a")).unwrap();

        let result = config.insert("name", Rule::required("b"));

        assert_eq!(result, Err(ConfigError::DuplicateField("name".to_string())));
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn json_round_trip_preserves_rules() {
        let config = RulesConfig::from_json(SIGNUP).unwrap();
        let json = config.to_json().unwrap();
        assert_eq!(RulesConfig::from_json(&json).unwrap(), config);
    }
}
