//! Rule evaluation.
//!
//! Validation failure is data, never a fault: a single field yields an
//! optional message, and a whole form yields Stillwater's `Validation`,
//! which accumulates ALL failing fields instead of stopping at the first.
//!
//! Within one field the opposite holds: rules short-circuit, and the first
//! rule that fails is the one whose message is shown.

mod report;
mod validator;

pub use report::{check_all, FieldError, ValidationReport};
pub(crate) use report::{assemble, field_check};
pub use validator::{is_invalid, validate_field};
