//! Form controller.
//!
//! The controller owns the field map of one form. It builds one pristine
//! field per declared key, routes change events through the dirty gate, and
//! exposes the three operations that may change field state from outside:
//! `validate`, `set_values` and `set_errors`.
//!
//! # Example
//!
//! ```rust
//! use formstate::core::Rule;
//! use formstate::form::FormBuilder;
//!
//! let form = FormBuilder::new()
//!     .field("name".to_string(), Rule::required("name is required"))
//!     .field("email".to_string(), vec![Rule::required("email is required"), Rule::email("email is not valid")])
//!     .build()
//!     .unwrap();
//!
//! form.set_values([("name".to_string(), "Ann"), ("email".to_string(), "a@b.com")]);
//! let values = form.validate().unwrap();
//! assert_eq!(values["name"], "Ann");
//! ```

mod builder;
mod controller;

pub use builder::FormBuilder;
pub use controller::FormController;
