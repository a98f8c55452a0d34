//! Rules and rule sets.
//!
//! A [`Rule`] pairs zero or more [`Pattern`]s with one shared message. A
//! [`RuleSet`] is what a field is configured with: a single rule, a list of
//! rules, or a `{ "rules": [...] }` group. Lists and groups are evaluated in
//! declaration order.

use super::pattern::Pattern;
use serde::de::{self, Deserializer, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One condition a field value must satisfy.
///
/// Every pattern is checked in order; the first failing pattern fails the
/// whole rule and the rule's `message` is reported, whichever pattern failed.
/// A rule without patterns never fails.
///
/// # Example
///
/// ```rust
/// use formstate::core::{Pattern, Rule};
///
/// let rule = Rule::new("email is not valid")
///     .pattern(Pattern::Required)
///     .pattern(Pattern::Email);
///
/// assert_eq!(rule.violation(""), Some("email is not valid"));
/// assert_eq!(rule.violation("nope"), Some("email is not valid"));
/// assert_eq!(rule.violation("a@b"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    test: Vec<Pattern>,
}

impl Rule {
    /// Create a rule with a message and no patterns yet.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            test: Vec::new(),
        }
    }

    /// Rule requiring a non-empty value.
    pub fn required(message: impl Into<String>) -> Self {
        Self::new(message).pattern(Pattern::Required)
    }

    /// Rule requiring an empty value or an email-shaped value.
    pub fn email(message: impl Into<String>) -> Self {
        Self::new(message).pattern(Pattern::Email)
    }

    /// Add a pattern to the rule.
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.test.push(pattern);
        self
    }

    /// Add several patterns to the rule.
    pub fn patterns(mut self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        self.test.extend(patterns);
        self
    }

    /// The message reported when this rule fails.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The patterns of this rule, in evaluation order.
    pub fn tests(&self) -> &[Pattern] {
        &self.test
    }

    /// Whether a failure of this rule can be surfaced to the user.
    pub fn has_message(&self) -> bool {
        self.message.as_deref().is_some_and(|m| !m.is_empty())
    }

    /// Check a value, returning the message if any pattern fails (pure).
    ///
    /// A failing rule without a message yields `None`: there is nothing to
    /// display, so the value is treated as passing this rule.
    pub fn violation(&self, value: &str) -> Option<&str> {
        if self.test.iter().all(|pattern| pattern.test(value)) {
            return None;
        }
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// The rules a single field is configured with.
///
/// Deserializes from a rule object, an array of rule objects, or an object
/// with a single `rules` array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSet {
    /// `[rule, rule, ...]`
    List(Vec<Rule>),
    /// `{ "rules": [rule, rule, ...] }`
    Group(RuleGroup),
    /// A single rule object.
    Single(Rule),
}

impl RuleSet {
    /// Wrap rules into a `{ rules }` group.
    pub fn group(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self::Group(RuleGroup {
            rules: rules.into_iter().collect(),
        })
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        match self {
            Self::Single(rule) => std::slice::from_ref(rule),
            Self::List(rules) | Self::Group(RuleGroup { rules }) => rules,
        }
    }
}

/// Named group of rules, evaluated like a list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleGroup {
    pub rules: Vec<Rule>,
}

impl From<Rule> for RuleSet {
    fn from(rule: Rule) -> Self {
        Self::Single(rule)
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self::List(rules)
    }
}

impl From<RuleGroup> for RuleSet {
    fn from(group: RuleGroup) -> Self {
        Self::Group(group)
    }
}

impl<const N: usize> From<[Rule; N]> for RuleSet {
    fn from(rules: [Rule; N]) -> Self {
        Self::List(rules.into())
    }
}

/// `test` accepts one pattern or a list of patterns.
mod one_or_many {
    use super::*;

    pub fn serialize<S: Serializer>(tests: &[Pattern], serializer: S) -> Result<S::Ok, S::Error> {
        match tests {
            [single] => single.serialize(serializer),
            many => many.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Pattern>, D::Error> {
        deserializer.deserialize_any(TestsVisitor)
    }

    struct TestsVisitor;

    impl<'de> Visitor<'de> for TestsVisitor {
        type Value = Vec<Pattern>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a pattern or a list of patterns")
        }

        fn visit_str<E: de::Error>(self, token: &str) -> Result<Self::Value, E> {
            let deserializer: de::value::StrDeserializer<'_, E> = token.into_deserializer();
            let pattern = Pattern::deserialize(deserializer)?;
            Ok(vec![pattern])
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
            let pattern = Pattern::deserialize(de::value::MapAccessDeserializer::new(map))?;
            Ok(vec![pattern])
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut patterns = Vec::new();
            while let Some(pattern) = seq.next_element::<Pattern>()? {
                patterns.push(pattern);
            }
            Ok(patterns)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }
}
