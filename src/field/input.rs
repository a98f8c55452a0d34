//! Raw change payloads delivered by UI bindings.

/// An event-like payload exposing the widget's current text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputEvent {
    pub value: String,
}

impl InputEvent {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// What a change handler accepts: either an input event or the text itself.
///
/// # Example
///
/// ```rust
/// use formstate::field::{InputEvent, RawInput};
///
/// let from_event = RawInput::from(InputEvent::new("Ann"));
/// let from_text = RawInput::from("Ann");
///
/// assert_eq!(from_event.into_value(), from_text.into_value());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawInput {
    Event(InputEvent),
    Value(String),
}

impl RawInput {
    /// Resolve the payload to the text it carries.
    pub fn into_value(self) -> String {
        match self {
            Self::Event(event) => event.value,
            Self::Value(value) => value,
        }
    }
}

impl From<InputEvent> for RawInput {
    fn from(event: InputEvent) -> Self {
        Self::Event(event)
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}
