//! Formstate: declarative form-field validation and state binding
//!
//! Formstate keeps the state of an input form (values, error flags and
//! helper text) and validates it against per-field rules. Validation is a
//! pure function of a value and its rules; the only state that changes is
//! the field map held by a [`FormController`](form::FormController).
//!
//! # Core Concepts
//!
//! - **Rules**: Declarative per-field checks built from `required`, `email` and regex patterns
//! - **Fields**: Bindable value, error flag, helper text and change handler
//! - **Dirty gate**: Errors appear only after the first `validate()`, then follow every change
//!
//! # Example
//!
//! ```rust
//! use formstate::core::{Pattern, Rule};
//! use formstate::field_keys;
//! use formstate::form::FormController;
//!
//! field_keys! {
//!     enum Signup {
//!         Name = "name",
//!         Phone = "phone",
//!         Email = "email",
//!     }
//! }
//!
//! let form = FormController::new([
//!     (Signup::Name, vec![Rule::required("name is required")]),
//!     (Signup::Phone, vec![Rule::new("phone is not valid").pattern(Pattern::regex("^[0-9]{5,10}$").unwrap())]),
//!     (Signup::Email, vec![Rule::new("email is not valid").patterns([Pattern::Required, Pattern::Email])]),
//! ])
//! .unwrap();
//!
//! form.set_values([(Signup::Name, "Ann"), (Signup::Phone, "12345"), (Signup::Email, "ann@example.com")]);
//! let values = form.validate().unwrap();
//! assert_eq!(values[&Signup::Phone], "12345");
//! ```

pub mod cell;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod field;
pub mod form;
pub mod validation;

// Re-export commonly used types
pub use crate::cell::{SharedCell, StateCell, SubscriptionId};
pub use crate::checkpoint::{CheckpointError, FormSnapshot};
pub use crate::config::{ConfigError, RulesConfig};
pub use crate::core::{FieldKey, Pattern, Rule, RuleSet};
pub use crate::field::{Field, FieldPhase, InputEvent};
pub use crate::form::{FormBuilder, FormController};
pub use crate::validation::{is_invalid, FieldError, ValidationReport};
