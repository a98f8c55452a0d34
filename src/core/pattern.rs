//! Atomic value tests.
//!
//! A [`Pattern`] is the smallest unit of validation: one built-in check or
//! one regular expression evaluated against a field's text value. The set of
//! built-in checks is closed, so an unsupported check cannot be expressed in
//! code and is rejected when a rules configuration is parsed.

use crate::config::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Accepts `local@domain` with a permissive character class on both sides.
///
/// No dot is required after `@`. Kept deliberately lax for compatibility
/// with existing rule sets.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9+_.-]+@[a-zA-Z0-9.-]+$";

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email regex must compile"))
}

/// A single test applied to a field value.
///
/// # Example
///
/// ```rust
/// use formstate::core::Pattern;
///
/// assert!(!Pattern::Required.test(""));
/// assert!(Pattern::Required.test("x"));
///
/// // Empty values bypass the email check; combine with `Required` to forbid them.
/// assert!(Pattern::Email.test(""));
/// assert!(Pattern::Email.test("a@b"));
/// assert!(!Pattern::Email.test("not-an-email"));
///
/// let digits = Pattern::regex(r"^[0-9]{5,10}$").unwrap();
/// assert!(digits.test("12345"));
/// assert!(!digits.test("1234"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "PatternRepr", into = "PatternRepr")]
pub enum Pattern {
    /// Passes iff the value is non-empty.
    Required,
    /// Passes iff the value is empty or has a `local@domain` shape.
    Email,
    /// Passes iff the expression matches the value.
    Regex(Regex),
}

impl Pattern {
    /// Compile a regular-expression pattern.
    pub fn regex(expr: &str) -> Result<Self, ConfigError> {
        Regex::new(expr)
            .map(Pattern::Regex)
            .map_err(|err| ConfigError::InvalidRegex {
                pattern: expr.to_string(),
                reason: err.to_string(),
            })
    }

    /// Evaluate this pattern against a value (pure).
    pub fn test(&self, value: &str) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::Email => value.is_empty() || email_re().is_match(value),
            Self::Regex(re) => re.is_match(value),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Required, Self::Required) | (Self::Email, Self::Email) => true,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

/// Wire shape of a pattern: `"required"`, `"email"` or `{"regex": "<expr>"}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PatternRepr {
    Required,
    Email,
    Regex(String),
}

impl TryFrom<PatternRepr> for Pattern {
    type Error = ConfigError;

    fn try_from(repr: PatternRepr) -> Result<Self, Self::Error> {
        match repr {
            PatternRepr::Required => Ok(Self::Required),
            PatternRepr::Email => Ok(Self::Email),
            PatternRepr::Regex(expr) => Self::regex(&expr),
        }
    }
}

impl From<Pattern> for PatternRepr {
    fn from(pattern: Pattern) -> Self {
        match pattern {
            Pattern::Required => Self::Required,
            Pattern::Email => Self::Email,
            Pattern::Regex(re) => Self::Regex(re.as_str().to_string()),
        }
    }
}
