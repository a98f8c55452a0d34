//! Per-field state and change routing.
//!
//! A [`Field`] is the bindable bundle a UI layer consumes for one input:
//! current text, error flag, helper text and a change handler bound to the
//! field's key. Fields are plain values; only the owning form controller
//! can replace the field map they live in.
//!
//! Each field is in one of two phases, shared by the whole form:
//! - **Pristine**: changes update the value only, `error` stays `false`
//! - **Dirty**: every change re-runs the field's rules immediately

mod input;

pub use input::{InputEvent, RawInput};

use crate::core::FieldKey;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Weak;

/// Every field of a form, by key.
pub type FieldMap<K> = BTreeMap<K, Field<K>>;

/// Field values by key.
pub type Values<K> = BTreeMap<K, String>;

/// Field error messages by key.
pub type Errors<K> = BTreeMap<K, String>;

/// Validation phase of a form's fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldPhase {
    /// No validation attempt yet.
    Pristine,
    /// Validated at least once; changes re-validate.
    Dirty,
}

impl FieldPhase {
    pub(crate) fn from_dirty(dirty: bool) -> Self {
        if dirty {
            Self::Dirty
        } else {
            Self::Pristine
        }
    }

    pub fn is_dirty(self) -> bool {
        matches!(self, Self::Dirty)
    }
}

/// Receives change events routed by field handlers.
///
/// Implemented by the form controller's shared state; handlers only hold a
/// weak reference, so a dropped form turns its handlers into no-ops.
pub(crate) trait ChangeRouter<K: FieldKey>: Send + Sync {
    fn route(&self, key: &K, value: String);
}

/// Change handler bound to one field key.
#[derive(Clone)]
pub struct ChangeHandler<K: FieldKey> {
    key: K,
    router: Option<Weak<dyn ChangeRouter<K>>>,
}

impl<K: FieldKey> ChangeHandler<K> {
    pub(crate) fn bound(key: K, router: Weak<dyn ChangeRouter<K>>) -> Self {
        Self {
            key,
            router: Some(router),
        }
    }

    /// A handler not attached to any form. Calling it does nothing.
    pub fn detached(key: K) -> Self {
        Self { key, router: None }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// Whether the owning form is still alive.
    pub fn is_bound(&self) -> bool {
        self.router
            .as_ref()
            .is_some_and(|router| router.strong_count() > 0)
    }

    /// Deliver a change for this handler's field.
    pub fn handle(&self, input: impl Into<RawInput>) {
        let value = input.into().into_value();
        match self.router.as_ref().and_then(Weak::upgrade) {
            Some(router) => router.route(&self.key, value),
            None => trace!("dropping change for unbound field '{}'", self.key.name()),
        }
    }
}

impl<K: FieldKey> PartialEq for ChangeHandler<K> {
    fn eq(&self, other: &Self) -> bool {
        let same_router = match (&self.router, &other.router) {
            (Some(a), Some(b)) => Weak::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.key == other.key && same_router
    }
}

impl<K: FieldKey> fmt::Debug for ChangeHandler<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeHandler")
            .field("key", &self.key)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Bindable state of one input.
///
/// `error` is `true` exactly when `helper_text` holds the failure message of
/// the most recent validation (or an error set explicitly by the host).
#[derive(Clone, Debug, PartialEq)]
pub struct Field<K: FieldKey> {
    value: String,
    error: bool,
    helper_text: Option<String>,
    on_change: ChangeHandler<K>,
}

impl<K: FieldKey> Field<K> {
    pub(crate) fn bound(key: K, router: Weak<dyn ChangeRouter<K>>) -> Self {
        Self::with_handler(ChangeHandler::bound(key, router))
    }

    /// A pristine field whose handler is not attached to any form.
    pub fn detached(key: K) -> Self {
        Self::with_handler(ChangeHandler::detached(key))
    }

    fn with_handler(on_change: ChangeHandler<K>) -> Self {
        Self {
            value: String::new(),
            error: false,
            helper_text: None,
            on_change,
        }
    }

    pub fn key(&self) -> &K {
        self.on_change.key()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn error(&self) -> bool {
        self.error
    }

    pub fn helper_text(&self) -> Option<&str> {
        self.helper_text.as_deref()
    }

    /// Handler to bind to the widget's change event.
    pub fn change_handler(&self) -> &ChangeHandler<K> {
        &self.on_change
    }

    /// Deliver a change through this field's handler.
    pub fn on_change(&self, input: impl Into<RawInput>) {
        self.on_change.handle(input);
    }

    /// Replace the value, keeping error state.
    pub(crate) fn with_value(mut self, value: String) -> Self {
        self.value = value;
        self
    }

    /// Replace error state, keeping the value. An empty message clears it.
    pub(crate) fn with_error(mut self, message: Option<String>) -> Self {
        let message = message.filter(|m| !m.is_empty());
        self.error = message.is_some();
        self.helper_text = message;
        self
    }
}
