//! Core rule model.
//!
//! This module contains the pure, declarative part of the crate:
//! - Field keys via the `FieldKey` trait
//! - Patterns, the atomic tests a value is matched against
//! - Rules and rule sets, the per-field configuration
//!
//! Nothing here holds state; every check is a pure function of its inputs.

mod key;
mod macros;
mod pattern;
mod rule;

pub use key::FieldKey;
pub use pattern::Pattern;
pub use rule::{Rule, RuleGroup, RuleSet};
