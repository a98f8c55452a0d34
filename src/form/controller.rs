//! The form controller.

use crate::cell::{StateCell, SubscriptionId};
use crate::checkpoint::{CheckpointError, FieldSnapshot, FormSnapshot};
use crate::config::ConfigError;
use crate::core::{FieldKey, RuleSet};
use crate::field::{ChangeRouter, Errors, Field, FieldMap, FieldPhase, Values};
use crate::form::builder::FormBuilder;
use crate::validation::{assemble, field_check, validate_field, ValidationReport};
use log::{debug, info, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use stillwater::validation::Validation;

/// Creates the state cell holding a form's fields.
pub(crate) type CellFactory<K> = Box<dyn FnOnce(FieldMap<K>) -> Box<dyn StateCell<FieldMap<K>>>>;

/// State shared between the controller and its fields' change handlers.
struct FormInner<K: FieldKey> {
    rules: Vec<(K, RuleSet)>,
    fields: Box<dyn StateCell<FieldMap<K>>>,
    dirty: AtomicBool,
}

impl<K: FieldKey> FormInner<K> {
    fn rule_set(&self, key: &K) -> Option<&RuleSet> {
        self.rules
            .iter()
            .find(|(declared, _)| declared == key)
            .map(|(_, rules)| rules)
    }

    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn mark_dirty(&self) {
        if !self.dirty.swap(true, Ordering::SeqCst) {
            debug!("form is now dirty; changes will be validated as they happen");
        }
    }
}

impl<K: FieldKey> ChangeRouter<K> for FormInner<K> {
    fn route(&self, key: &K, value: String) {
        let Some(rules) = self.rule_set(key) else {
            trace!("ignoring change for undeclared field '{}'", key.name());
            return;
        };
        let key = key.clone();
        self.fields.update(Box::new(move |fields: &FieldMap<K>| {
            // Read under the cell update: validate_all marks dirty before its own update.
            let phase = FieldPhase::from_dirty(self.is_dirty());
            trace!("change for '{}' ({:?})", key.name(), phase);
            let mut next = fields.clone();
            if let Some(field) = fields.get(&key) {
                let updated = match phase {
                    FieldPhase::Pristine => field.clone().with_value(value),
                    FieldPhase::Dirty => validate_field(field, rules, value),
                };
                next.insert(key, updated);
            }
            next
        }));
    }
}

/// Tracks every field of one form and validates them against its rules.
///
/// The field map lives in a state cell private to the controller. It changes
/// only through field change handlers and the controller's own operations:
/// [`validate`](Self::validate), [`set_values`](Self::set_values) and
/// [`set_errors`](Self::set_errors).
///
/// # Example
///
/// ```rust
/// use formstate::core::{Pattern, Rule};
/// use formstate::field_keys;
/// use formstate::form::FormController;
///
/// field_keys! {
///     enum Signup {
///         Name = "name",
///         Email = "email",
///     }
/// }
///
/// let form = FormController::new([
///     (Signup::Name, vec![Rule::required("name is required")]),
///     (Signup::Email, vec![Rule::new("email is not valid").patterns([Pattern::Required, Pattern::Email])]),
/// ])
/// .unwrap();
///
/// // Before the first validate() call, typing never shows errors.
/// let fields = form.fields();
/// fields[&Signup::Email].on_change("nope");
/// assert!(!form.field(&Signup::Email).unwrap().error());
///
/// // validate() fails and marks the form dirty...
/// assert!(form.validate().is_none());
/// assert!(form.field(&Signup::Name).unwrap().error());
///
/// // ...after which every change is validated immediately.
/// fields[&Signup::Email].on_change("a@b.com");
/// assert!(!form.field(&Signup::Email).unwrap().error());
/// ```
pub struct FormController<K: FieldKey> {
    inner: Arc<FormInner<K>>,
}

impl<K: FieldKey> FormController<K> {
    /// Build a controller from `(key, rules)` pairs using the default state cell.
    pub fn new<I, R>(rules: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, R)>,
        R: Into<RuleSet>,
    {
        rules
            .into_iter()
            .fold(FormBuilder::new(), |builder, (key, rules)| builder.field(key, rules))
            .build()
    }

    pub fn builder() -> FormBuilder<K> {
        FormBuilder::new()
    }

    pub(crate) fn from_parts(rules: Vec<(K, RuleSet)>, cell: CellFactory<K>) -> Self {
        let inner = Arc::new_cyclic(|this: &Weak<FormInner<K>>| {
            let router: Weak<dyn ChangeRouter<K>> = this.clone();
            let initial: FieldMap<K> = rules
                .iter()
                .map(|(key, _)| (key.clone(), Field::bound(key.clone(), router.clone())))
                .collect();
            FormInner {
                rules,
                fields: cell(initial),
                dirty: AtomicBool::new(false),
            }
        });
        debug!("form created with {} field(s)", inner.rules.len());
        Self { inner }
    }

    /// Declared rules, in declaration order.
    pub fn rules(&self) -> &[(K, RuleSet)] {
        &self.inner.rules
    }

    /// Snapshot of every field, ready to bind onto widgets.
    pub fn fields(&self) -> FieldMap<K> {
        self.inner.fields.get()
    }

    pub fn field(&self, key: &K) -> Option<Field<K>> {
        self.inner.fields.get().remove(key)
    }

    /// Current values, without validating them.
    pub fn values(&self) -> Values<K> {
        self.inner
            .fields
            .get()
            .into_iter()
            .map(|(key, field)| (key, field.value().to_string()))
            .collect()
    }

    /// Messages of the fields currently showing an error.
    pub fn errors(&self) -> Errors<K> {
        self.inner
            .fields
            .get()
            .into_iter()
            .filter_map(|(key, field)| {
                let message = field.helper_text().filter(|_| field.error())?.to_string();
                Some((key, message))
            })
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }

    pub fn phase(&self) -> FieldPhase {
        FieldPhase::from_dirty(self.is_dirty())
    }

    /// Validate every field and return the values if all of them pass.
    ///
    /// Marks the form dirty and writes every field's new state in a single
    /// update. Returns `None` when any field failed; the failing fields carry
    /// their messages.
    pub fn validate(&self) -> Option<Values<K>> {
        match self.validate_all() {
            Validation::Success(values) => Some(values),
            Validation::Failure(_) => None,
        }
    }

    /// Like [`validate`](Self::validate), but reports every failing field.
    pub fn validate_all(&self) -> ValidationReport<K> {
        self.inner.mark_dirty();

        let rules = &self.inner.rules;
        let mut values = Values::new();
        let mut checks = Vec::with_capacity(rules.len());

        self.inner.fields.update(Box::new(|fields: &FieldMap<K>| {
            let mut next = fields.clone();
            for (key, rule_set) in rules {
                let Some(field) = fields.get(key) else {
                    continue;
                };
                let validated = validate_field(field, rule_set, field.value().to_string());
                checks.push(field_check(key, validated.helper_text()));
                values.insert(key.clone(), validated.value().to_string());
                next.insert(key.clone(), validated);
            }
            next
        }));

        let report = assemble(checks, values);
        match &report {
            Validation::Success(_) => debug!("validation passed"),
            Validation::Failure(errors) => debug!("validation failed for {} field(s)", errors.len()),
        }
        report
    }

    /// Overwrite values without validating them; error state is left as is.
    ///
    /// Keys without declared rules are ignored.
    pub fn set_values<I, V>(&self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        V: Into<String>,
    {
        let updates: Vec<(K, String)> = values
            .into_iter()
            .map(|(key, value)| (key, value.into()))
            .collect();
        debug!("setting {} value(s)", updates.len());

        self.inner.fields.update(Box::new(move |fields: &FieldMap<K>| {
            let mut next = fields.clone();
            for (key, value) in updates {
                match fields.get(&key) {
                    Some(field) => {
                        next.insert(key, field.clone().with_value(value));
                    }
                    None => debug!("ignoring value for undeclared field '{}'", key.name()),
                }
            }
            next
        }));
    }

    /// Show errors on fields without touching their values.
    ///
    /// An empty message clears the field's error. Keys without declared rules
    /// are ignored.
    pub fn set_errors<I, V>(&self, errors: I)
    where
        I: IntoIterator<Item = (K, V)>,
        V: Into<String>,
    {
        let updates: Vec<(K, String)> = errors
            .into_iter()
            .map(|(key, message)| (key, message.into()))
            .collect();
        debug!("setting {} error(s)", updates.len());

        self.inner.fields.update(Box::new(move |fields: &FieldMap<K>| {
            let mut next = fields.clone();
            for (key, message) in updates {
                match fields.get(&key) {
                    Some(field) => {
                        next.insert(key, field.clone().with_error(Some(message)));
                    }
                    None => debug!("ignoring error for undeclared field '{}'", key.name()),
                }
            }
            next
        }));
    }

    /// Register a listener called with the field map after every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&FieldMap<K>) + Send + Sync + 'static,
    {
        self.inner.fields.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.fields.unsubscribe(id)
    }

    /// Capture the current field state and phase.
    pub fn snapshot(&self) -> FormSnapshot {
        let fields = self
            .fields()
            .into_iter()
            .map(|(key, field)| (key.name().to_string(), FieldSnapshot::from(&field)))
            .collect();
        FormSnapshot::new(fields, self.phase())
    }

    /// Write a snapshot back in a single update.
    ///
    /// Fields absent from the snapshot keep their state. A dirty snapshot
    /// marks the form dirty; a pristine one never clears the flag.
    pub fn restore(&self, snapshot: &FormSnapshot) -> Result<(), CheckpointError> {
        snapshot.check_version()?;

        let mut restored = Vec::with_capacity(snapshot.fields.len());
        for (name, state) in &snapshot.fields {
            let key = K::from_name(name)
                .filter(|key| self.inner.rule_set(key).is_some())
                .ok_or_else(|| {
                    CheckpointError::ValidationFailed(format!(
                        "field '{name}' is not declared by this form"
                    ))
                })?;
            restored.push((key, state.clone()));
        }

        if snapshot.phase.is_dirty() {
            self.inner.mark_dirty();
        }

        self.inner.fields.update(Box::new(move |fields: &FieldMap<K>| {
            let mut next = fields.clone();
            for (key, state) in restored {
                if let Some(field) = fields.get(&key) {
                    let message = state.helper_text.filter(|_| state.error);
                    next.insert(key, field.clone().with_value(state.value).with_error(message));
                }
            }
            next
        }));
        info!("restored snapshot {} ({} field(s))", snapshot.id, snapshot.fields.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Listener, SharedCell, Update};
    use crate::core::{Pattern, Rule};
    use crate::field::InputEvent;
    use crate::field_keys;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    field_keys! {
        enum TestKey {
            Name = "name",
            Email = "email",
            Phone = "phone",
        }
    }

    fn signup_form() -> FormController<TestKey> {
        FormController::new([
            (TestKey::Name, RuleSet::from(Rule::required("name is required"))),
            (
                TestKey::Email,
                RuleSet::from(
                    Rule::new("email is not valid").patterns([Pattern::Required, Pattern::Email]),
                ),
            ),
        ])
        .unwrap()
    }

    fn type_into(form: &FormController<TestKey>, key: TestKey, text: &str) {
        form.field(&key).unwrap().on_change(text);
    }

    #[test]
    fn construction_creates_one_pristine_field_per_rule() {
        let form = signup_form();
        let fields = form.fields();

        assert_eq!(fields.len(), 2);
        assert!(!fields.contains_key(&TestKey::Phone));
        for field in fields.values() {
            assert_eq!(field.value(), "");
            assert!(!field.error());
            assert_eq!(field.helper_text(), None);
        }
        assert_eq!(form.phase(), FieldPhase::Pristine);
    }

    #[test]
    fn changes_before_validate_only_store_values() {
        let form = signup_form();

        type_into(&form, TestKey::Email, "not-an-email");

        let email = form.field(&TestKey::Email).unwrap();
        assert_eq!(email.value(), "not-an-email");
        assert!(!email.error());
        assert!(!form.is_dirty());
    }

    #[test]
    fn changes_after_validate_are_validated_live() {
        let form = signup_form();
        form.validate();

        type_into(&form, TestKey::Email, "not-an-email");
        let email = form.field(&TestKey::Email).unwrap();
        assert!(email.error());
        assert_eq!(email.helper_text(), Some("email is not valid"));

        type_into(&form, TestKey::Email, "a@b");
        let email = form.field(&TestKey::Email).unwrap();
        assert!(!email.error());
        assert_eq!(email.helper_text(), None);
    }

    #[test]
    fn handlers_accept_events_and_plain_text() {
        let form = signup_form();
        let fields = form.fields();

        fields[&TestKey::Name].change_handler().handle(InputEvent::new("Ann"));
        assert_eq!(form.field(&TestKey::Name).unwrap().value(), "Ann");

        fields[&TestKey::Name].on_change("Bob");
        assert_eq!(form.field(&TestKey::Name).unwrap().value(), "Bob");
    }

    #[test]
    fn validate_returns_none_and_marks_failing_fields() {
        let form = signup_form();
        form.set_values([(TestKey::Email, "a@b.com")]);

        assert_eq!(form.validate(), None);

        let name = form.field(&TestKey::Name).unwrap();
        let email = form.field(&TestKey::Email).unwrap();
        assert!(name.error());
        assert_eq!(name.helper_text(), Some("name is required"));
        assert!(!email.error());
    }

    #[test]
    fn validate_returns_values_on_success() {
        let form = signup_form();
        form.set_values([(TestKey::Name, "Ann"), (TestKey::Email, "a@b.com")]);

        let values = form.validate().unwrap();

        assert_eq!(values.get(&TestKey::Name).map(String::as_str), Some("Ann"));
        assert_eq!(values.get(&TestKey::Email).map(String::as_str), Some("a@b.com"));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn validate_is_idempotent() {
        let form = signup_form();
        form.set_values([(TestKey::Email, "bad")]);

        let first = form.validate();
        let first_fields = form.fields();
        let second = form.validate();

        assert_eq!(first, second);
        assert_eq!(first_fields, form.fields());
    }

    #[test]
    fn validate_all_reports_every_failing_field() {
        let form = signup_form();

        match form.validate_all() {
            Validation::Failure(errors) => {
                let keys: Vec<_> = errors.iter().map(|e| e.key).collect();
                assert_eq!(keys, vec![TestKey::Name, TestKey::Email]);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn validate_commits_all_fields_in_one_update() {
        let form = signup_form();
        let updates = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&updates);
        form.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        form.validate();

        assert_eq!(updates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_values_keeps_error_state() {
        let form = signup_form();
        form.validate();

        form.set_values([(TestKey::Name, "X")]);

        let name = form.field(&TestKey::Name).unwrap();
        assert_eq!(name.value(), "X");
        assert!(name.error());
        assert_eq!(name.helper_text(), Some("name is required"));
    }

    #[test]
    fn set_values_ignores_undeclared_keys() {
        let form = signup_form();
        form.set_values([(TestKey::Phone, "12345")]);
        assert!(form.field(&TestKey::Phone).is_none());
        assert!(!form.values().contains_key(&TestKey::Phone));
    }

    #[test]
    fn set_errors_keeps_value() {
        let form = signup_form();
        form.set_values([(TestKey::Name, "Some invalid name")]);

        form.set_errors([(TestKey::Name, "bad")]);

        let name = form.field(&TestKey::Name).unwrap();
        assert!(name.error());
        assert_eq!(name.helper_text(), Some("bad"));
        assert_eq!(name.value(), "Some invalid name");
        assert!(!form.is_dirty());
    }

    #[test]
    fn set_errors_with_empty_message_clears() {
        let form = signup_form();
        form.set_errors([(TestKey::Name, "bad")]);

        form.set_errors([(TestKey::Name, "")]);

        let name = form.field(&TestKey::Name).unwrap();
        assert!(!name.error());
        assert_eq!(name.helper_text(), None);
    }

    #[test]
    fn dirty_flag_never_reverts() {
        let form = signup_form();
        form.validate();
        form.set_values([(TestKey::Name, "Ann")]);
        form.set_errors([(TestKey::Name, "")]);
        form.restore(&FormSnapshot::new(Default::default(), FieldPhase::Pristine)).unwrap();

        assert!(form.is_dirty());
        assert_eq!(form.phase(), FieldPhase::Dirty);
    }

    #[test]
    fn handlers_outliving_the_form_are_noops() {
        let form = signup_form();
        let field = form.field(&TestKey::Name).unwrap();
        drop(form);

        assert!(!field.change_handler().is_bound());
        field.on_change("ignored");
        assert_eq!(field.value(), "");
    }

    #[test]
    fn unsubscribed_listener_stops_receiving_updates() {
        let form = signup_form();
        let updates = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&updates);
        let id = form.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        type_into(&form, TestKey::Name, "A");
        assert!(form.unsubscribe(id));
        type_into(&form, TestKey::Name, "B");

        assert_eq!(updates.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn custom_cell_receives_initial_fields() {
        let form = FormController::builder()
            .field(TestKey::Phone, Rule::required("phone is required"))
            .cell(|initial| Box::new(SharedCell::new(initial)))
            .build()
            .unwrap();

        assert_eq!(form.fields().len(), 1);
        assert!(form.validate().is_none());
    }

    type Hook = Box<dyn FnOnce() + Send>;

    /// Runs a one-shot hook before applying the next update.
    struct HookedCell {
        cell: SharedCell<FieldMap<TestKey>>,
        before_update: Arc<Mutex<Option<Hook>>>,
    }

    impl StateCell<FieldMap<TestKey>> for HookedCell {
        fn get(&self) -> FieldMap<TestKey> {
            self.cell.get()
        }

        fn update(&self, update: Update<'_, FieldMap<TestKey>>) {
            let hook = self.before_update.lock().unwrap().take();
            if let Some(hook) = hook {
                hook();
            }
            self.cell.update(update);
        }

        fn subscribe(&self, listener: Listener<FieldMap<TestKey>>) -> SubscriptionId {
            self.cell.subscribe(listener)
        }

        fn unsubscribe(&self, id: SubscriptionId) -> bool {
            self.cell.unsubscribe(id)
        }
    }

    #[test]
    fn change_racing_first_validate_is_validated() {
        let before_update: Arc<Mutex<Option<Hook>>> = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&before_update);
        let form = Arc::new(
            FormController::builder()
                .field(TestKey::Name, Rule::required("name is required"))
                .cell(move |initial| {
                    Box::new(HookedCell {
                        cell: SharedCell::new(initial),
                        before_update: slot,
                    })
                })
                .build()
                .unwrap(),
        );
        let validating = Arc::clone(&form);
        *before_update.lock().unwrap() = Some(Box::new(move || {
            validating.validate();
        }));

        // The change is routed while the form is pristine; validate() commits first.
        type_into(&form, TestKey::Name, "Ann");

        let name = form.field(&TestKey::Name).unwrap();
        assert!(form.is_dirty());
        assert_eq!(name.value(), "Ann");
        assert!(!name.error());
        assert_eq!(name.helper_text(), None);
    }

    #[test]
    fn concurrent_changes_and_validate_stay_consistent() {
        for _ in 0..50 {
            let form = Arc::new(signup_form());
            let typing = Arc::clone(&form);
            let writer = std::thread::spawn(move || {
                for text in ["", "A", "", "Ann"] {
                    type_into(&typing, TestKey::Name, text);
                }
            });
            form.validate();
            writer.join().unwrap();

            let name = form.field(&TestKey::Name).unwrap();
            assert_eq!(name.value(), "Ann");
            assert!(!name.error());
        }
    }

    #[test]
    fn snapshot_and_restore_round_trip() {
        let form = signup_form();
        form.set_values([(TestKey::Name, "Ann")]);
        form.validate();
        let snapshot = form.snapshot();

        let other = signup_form();
        other.restore(&snapshot).unwrap();

        assert!(other.is_dirty());
        assert_eq!(other.values(), form.values());
        assert_eq!(other.errors(), form.errors());
    }

    #[test]
    fn restore_rejects_undeclared_fields() {
        let form = signup_form();
        let mut fields = std::collections::BTreeMap::new();
        fields.insert(
            "phone".to_string(),
            FieldSnapshot {
                value: "1".to_string(),
                error: false,
                helper_text: None,
            },
        );

        let result = form.restore(&FormSnapshot::new(fields, FieldPhase::Dirty));

        assert!(matches!(result, Err(CheckpointError::ValidationFailed(_))));
        assert!(!form.is_dirty());
    }
}
