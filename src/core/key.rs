//! Field keys.
//!
//! Every field a form tracks is addressed by a key. Keys are ordinary Rust
//! values, usually a small enum declared with [`field_keys!`](crate::field_keys),
//! so an operation naming a field that does not exist cannot be written.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for values that identify a form field.
///
/// # Example
///
/// ```rust
/// use formstate::core::FieldKey;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
/// enum Signup {
///     Name,
///     Email,
/// }
///
/// impl FieldKey for Signup {
///     fn name(&self) -> &str {
///         match self {
///             Self::Name => "name",
///             Self::Email => "email",
///         }
///     }
///
///     fn from_name(name: &str) -> Option<Self> {
///         match name {
///             "name" => Some(Self::Name),
///             "email" => Some(Self::Email),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(Signup::from_name("email"), Some(Signup::Email));
/// assert_eq!(Signup::Name.name(), "name");
/// ```
pub trait FieldKey: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {
    /// Name used for this field in rules configurations and snapshots.
    fn name(&self) -> &str;

    /// Resolve a configured field name back into a key.
    fn from_name(name: &str) -> Option<Self>;
}

/// Dynamic forms whose fields are only known at runtime.
impl FieldKey for String {
    fn name(&self) -> &str {
        self
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(name.to_string())
    }
}
