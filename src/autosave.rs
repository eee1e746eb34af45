//! Form autosave and restore
//!
//! `FormPersistence` mirrors a form's named fields into a key-value store:
//! - Change events arm a single debounce slot; `poll` writes once it expires
//! - A valid submit writes immediately, bypassing the debounce
//! - `restore` rehydrates the form on page load
//!
//! Every store or encoding failure is logged and swallowed here. Callers
//! that want the error can use `persist` directly.

use crate::config::AutosaveConfig;
use crate::error::PersistError;
use crate::form::FormHandle;
use crate::schedule::Debounce;
use crate::snapshot::FormSnapshot;
use crate::store::KeyValueStore;
use crate::validation::{FieldError, validate_form};

/// Result of applying the stored record to a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing stored yet (first visit)
    NoRecord,
    /// Record unreadable or malformed; form left untouched
    Skipped,
    Restored {
        /// Keys written into a matching field
        applied: usize,
        /// Keys with no matching field in the current form
        ignored: usize,
    },
}

/// Whether a submit may go ahead
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Proceed,
    /// Failing fields by index; the submission must be cancelled
    Blocked(Vec<(usize, FieldError)>),
}

impl SubmitOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, SubmitOutcome::Blocked(_))
    }
}

/// Read every named field of the form
pub fn snapshot<F: FormHandle + ?Sized>(form: &F) -> FormSnapshot {
    FormSnapshot::from_fields(&form.fields())
}

/// Autosave state for one form
#[derive(Debug)]
pub struct FormPersistence<S> {
    store: S,
    key: String,
    debounce: Debounce,
}

impl<S: KeyValueStore> FormPersistence<S> {
    pub fn new(store: S, config: &AutosaveConfig) -> Self {
        Self {
            store,
            key: config.storage_key.clone(),
            debounce: Debounce::new(config.delay_ms),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn debounce(&self) -> &Debounce {
        &self.debounce
    }

    /// Write a snapshot under the form's key, replacing any prior record
    pub fn persist(&mut self, snapshot: &FormSnapshot) -> Result<(), PersistError> {
        let record = snapshot.to_record()?;
        self.store.set(&self.key, &record)?;
        log::debug!("Form saved ({} fields)", snapshot.len());
        Ok(())
    }

    /// Load the stored record without applying it
    pub fn load(&self) -> Result<Option<FormSnapshot>, PersistError> {
        match self.store.get(&self.key)? {
            Some(record) => FormSnapshot::from_record(&record).map(Some),
            None => Ok(None),
        }
    }

    /// Fill the form from the stored record. Never fails: a missing record
    /// is a no-op and a bad one is logged and skipped.
    pub fn restore<F: FormHandle + ?Sized>(&self, form: &mut F) -> RestoreOutcome {
        let snapshot = match self.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return RestoreOutcome::NoRecord,
            Err(err) => {
                log::error!("Error restoring form data: {err}");
                return RestoreOutcome::Skipped;
            }
        };

        let mut applied = 0;
        let mut ignored = 0;
        for (name, value) in snapshot.iter() {
            if form.set_value(name, value) {
                applied += 1;
            } else {
                ignored += 1;
            }
        }

        log::info!("Restored form data ({applied} fields, {ignored} unmatched)");
        RestoreOutcome::Restored { applied, ignored }
    }

    /// A field changed: (re)arm the debounce. Returns the new deadline.
    pub fn on_change(&mut self, now: f64) -> f64 {
        self.debounce.trigger(now)
    }

    /// Write the form if the debounce window has elapsed.
    /// Returns true if a write was attempted.
    pub fn poll<F: FormHandle + ?Sized>(&mut self, form: &F, now: f64) -> bool {
        if !self.debounce.take_due(now) {
            return false;
        }
        self.save_now(form);
        true
    }

    /// Write the form immediately and drop any pending debounce.
    /// Returns true if the write succeeded.
    pub fn flush<F: FormHandle + ?Sized>(&mut self, form: &F) -> bool {
        self.debounce.cancel();
        self.save_now(form)
    }

    /// Submit handler: validate, and on success flush before the browser
    /// navigates away. A blocked submit leaves the debounce armed.
    pub fn on_submit<F: FormHandle + ?Sized>(&mut self, form: &mut F) -> SubmitOutcome {
        let errors = validate_form(form);
        if !errors.is_empty() {
            log::info!("Form submission blocked ({} invalid fields)", errors.len());
            return SubmitOutcome::Blocked(errors);
        }
        self.flush(form);
        SubmitOutcome::Proceed
    }

    fn save_now<F: FormHandle + ?Sized>(&mut self, form: &F) -> bool {
        match self.persist(&snapshot(form)) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Form autosave failed: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::form::{Field, FieldKind, MemoryForm};
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    const KEY: &str = "competitorAnalysisFormData";

    fn analysis_form() -> MemoryForm {
        MemoryForm::new()
            .with_field(Field::new("competitor_url", "").with_kind(FieldKind::Url).required())
            .with_field(Field::new("company_name", ""))
            .with_field(Field::new("notes", "").with_kind(FieldKind::TextArea))
            .with_field(Field::new("depth", "basic").with_kind(FieldKind::Select))
    }

    fn persistence() -> FormPersistence<MemoryStore> {
        FormPersistence::new(MemoryStore::new(), &AutosaveConfig::default())
    }

    /// Store whose every call fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Read("SecurityError".into()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_roundtrip_into_fresh_form() {
        let mut p = persistence();
        let mut form = analysis_form();
        form.set_value("competitor_url", "example.com");
        form.set_value("notes", "line one\nline \"two\"");
        p.persist(&snapshot(&form)).unwrap();

        let mut fresh = analysis_form().blank();
        let outcome = p.restore(&mut fresh);
        assert_eq!(outcome, RestoreOutcome::Restored { applied: 4, ignored: 0 });
        for name in ["competitor_url", "company_name", "notes", "depth"] {
            assert_eq!(fresh.value(name), form.value(name), "field {name}");
        }
    }

    #[test]
    fn test_restore_without_record_is_noop() {
        let p = persistence();
        let mut form = analysis_form();
        assert_eq!(p.restore(&mut form), RestoreOutcome::NoRecord);
        assert_eq!(form.value("depth"), Some("basic"));
    }

    #[test]
    fn test_schema_drift_ignored() {
        let mut store = MemoryStore::new();
        store.seed(KEY, r#"{"company_name":"Acme","removed_field":"x","depth":"full"}"#);
        let p = FormPersistence::new(store, &AutosaveConfig::default());

        let mut form = analysis_form();
        let outcome = p.restore(&mut form);
        assert_eq!(outcome, RestoreOutcome::Restored { applied: 2, ignored: 1 });
        assert_eq!(form.value("company_name"), Some("Acme"));
        assert_eq!(form.value("depth"), Some("full"));
        assert_eq!(form.value("competitor_url"), Some(""));
    }

    #[test]
    fn test_corrupted_record_leaves_form_untouched() {
        for bad in ["{not json", "null", r#"["a","b"]"#, r#"{"company_name":"#] {
            let mut store = MemoryStore::new();
            store.seed(KEY, bad);
            let p = FormPersistence::new(store, &AutosaveConfig::default());

            let mut form = analysis_form();
            form.set_value("company_name", "typed");
            assert_eq!(p.restore(&mut form), RestoreOutcome::Skipped, "record {bad:?}");
            assert_eq!(form.value("company_name"), Some("typed"));
        }
    }

    #[test]
    fn test_non_string_values_still_restore() {
        let mut store = MemoryStore::new();
        store.seed(KEY, r#"{"company_name":"Acme","depth":3,"notes":["x"]}"#);
        let p = FormPersistence::new(store, &AutosaveConfig::default());

        let mut form = analysis_form().blank();
        let outcome = p.restore(&mut form);
        assert_eq!(outcome, RestoreOutcome::Restored { applied: 2, ignored: 0 });
        assert_eq!(form.value("company_name"), Some("Acme"));
        assert_eq!(form.value("depth"), Some("3"));
        assert_eq!(form.value("notes"), Some(""));
    }

    #[test]
    fn test_empty_key_never_targets_unnamed_field() {
        let mut store = MemoryStore::new();
        store.seed(KEY, r#"{"":"stray","company_name":"Acme"}"#);
        let p = FormPersistence::new(store, &AutosaveConfig::default());

        let mut form = analysis_form().with_field(Field::unnamed(FieldKind::Text, "search"));
        let outcome = p.restore(&mut form);
        assert_eq!(outcome, RestoreOutcome::Restored { applied: 1, ignored: 1 });
        assert_eq!(form.value_at(4), Some("search"));
        assert_eq!(form.value("company_name"), Some("Acme"));
    }

    #[test]
    fn test_store_failures_swallowed() {
        let mut p = FormPersistence::new(BrokenStore, &AutosaveConfig::default());
        let mut form = analysis_form();
        assert_eq!(p.restore(&mut form), RestoreOutcome::Skipped);
        assert!(matches!(
            p.persist(&snapshot(&form)),
            Err(PersistError::Store(StoreError::Unavailable))
        ));

        p.on_change(0.0);
        assert!(p.poll(&form, 1000.0));
        assert!(!p.flush(&form));
        form.set_value("competitor_url", "example.com");
        assert_eq!(p.on_submit(&mut form), SubmitOutcome::Proceed);
    }

    #[test]
    fn test_quota_exceeded_keeps_previous_record() {
        let store = MemoryStore::with_quota(KEY.len() + 100);
        let mut p = FormPersistence::new(store, &AutosaveConfig::default());
        let mut form = analysis_form();
        form.set_value("notes", "short");
        assert!(p.flush(&form));
        let saved = p.store().raw(KEY).map(str::to_string);

        form.set_value("notes", &"x".repeat(500));
        assert!(!p.flush(&form));
        assert_eq!(p.store().raw(KEY).map(str::to_string), saved);
    }

    #[test]
    fn test_debounce_coalesces_burst() {
        let mut p = persistence();
        let mut form = analysis_form();

        for (i, now) in [0.0, 300.0, 900.0, 1500.0, 2400.0].into_iter().enumerate() {
            form.set_value("company_name", &format!("Acme{i}"));
            p.on_change(now);
            assert!(!p.poll(&form, now + 999.0));
        }
        assert_eq!(p.store().writes(), 0);

        assert!(p.poll(&form, 3400.0));
        assert!(!p.poll(&form, 10_000.0));
        assert_eq!(p.store().writes(), 1);
        assert_eq!(p.load().unwrap().unwrap().get("company_name"), Some("Acme4"));
    }

    #[test]
    fn test_separate_bursts_write_separately() {
        let mut p = persistence();
        let mut form = analysis_form();
        form.set_value("notes", "a");
        p.on_change(0.0);
        assert!(p.poll(&form, 1000.0));
        form.set_value("notes", "b");
        p.on_change(5000.0);
        assert!(p.poll(&form, 6000.0));
        assert_eq!(p.store().writes(), 2);
        assert_eq!(p.load().unwrap().unwrap().get("notes"), Some("b"));
    }

    #[test]
    fn test_submit_flushes_before_window() {
        let mut p = persistence();
        let mut form = analysis_form();
        form.set_value("competitor_url", "example.com");
        p.on_change(0.0);
        form.set_value("company_name", "Acme");
        p.on_change(10.0);

        assert_eq!(p.on_submit(&mut form), SubmitOutcome::Proceed);
        assert_eq!(p.store().writes(), 1);
        let saved = p.load().unwrap().unwrap();
        assert_eq!(saved.get("company_name"), Some("Acme"));
        assert_eq!(saved.get("competitor_url"), Some("example.com"));

        // Flush consumed the pending write
        assert!(!p.debounce().is_pending());
        assert!(!p.poll(&form, 5000.0));
    }

    #[test]
    fn test_invalid_submit_blocked_but_autosave_continues() {
        let mut p = persistence();
        let mut form = analysis_form();
        form.set_value("company_name", "Acme");
        p.on_change(0.0);

        let outcome = p.on_submit(&mut form);
        assert_eq!(outcome, SubmitOutcome::Blocked(vec![(0, FieldError::Required)]));
        assert!(outcome.is_blocked());
        assert_eq!(form.error(0), Some(&FieldError::Required));
        assert_eq!(p.store().writes(), 0);

        // In-progress input is still saved by the debounce
        assert!(p.poll(&form, 1000.0));
        assert_eq!(p.load().unwrap().unwrap().get("company_name"), Some("Acme"));
    }

    #[test]
    fn test_url_without_scheme_submits() {
        let mut p = persistence();
        let mut form = analysis_form();
        form.set_value("competitor_url", "example.com");
        assert_eq!(p.on_submit(&mut form), SubmitOutcome::Proceed);
        assert_eq!(form.error(0), None);
    }

    #[test]
    fn test_custom_key() {
        let config = AutosaveConfig::default().with_overrides(Some("other_form"), None);
        let mut p = FormPersistence::new(MemoryStore::new(), &config);
        assert!(p.flush(&analysis_form()));
        assert!(p.store().raw("other_form").is_some());
        assert!(p.store().raw(KEY).is_none());
    }

    proptest! {
        #[test]
        fn prop_restore_reproduces_snapshot(
            values in prop::collection::btree_map("[a-z_]{1,12}", ".*", 0..12)
        ) {
            let mut form = MemoryForm::new();
            for (name, value) in &values {
                form.push(Field::new(name.clone(), value.clone()));
            }
            let mut p = persistence();
            prop_assert!(p.flush(&form));

            let mut fresh = form.blank();
            p.restore(&mut fresh);
            for (name, value) in &values {
                prop_assert_eq!(fresh.value(name), Some(value.as_str()));
            }
        }

        #[test]
        fn prop_burst_writes_once(gaps in prop::collection::vec(0.0f64..999.0, 1..20)) {
            let mut p = persistence();
            let mut form = analysis_form();
            let mut now = 0.0;
            for (i, gap) in gaps.iter().enumerate() {
                now += gap;
                form.set_value("notes", &i.to_string());
                p.on_change(now);
                p.poll(&form, now);
            }
            p.poll(&form, now + 1000.0);
            prop_assert_eq!(p.store().writes(), 1);
            let last = (gaps.len() - 1).to_string();
            let saved = p.load().unwrap().unwrap();
            prop_assert_eq!(saved.get("notes"), Some(last.as_str()));
        }
    }
}
