//! Form Autosave - keeps a durable mirror of a web form's input
//!
//! Core modules:
//! - `autosave`: Debounced snapshot/persist and restore of a form
//! - `validation`: Required and URL checks that gate submission
//! - `form`: Form handle abstraction (DOM on web, in-memory elsewhere)
//! - `store`: Key-value store abstraction (LocalStorage on web)
//! - `platform`: Browser adapters for the two abstractions above

pub mod autosave;
pub mod config;
pub mod error;
pub mod form;
pub mod platform;
pub mod schedule;
pub mod snapshot;
pub mod store;
pub mod validation;

pub use autosave::{FormPersistence, RestoreOutcome, SubmitOutcome};
pub use config::AutosaveConfig;
pub use error::{PersistError, StoreError};
pub use form::{Field, FieldKind, FormHandle, MemoryForm};
pub use snapshot::FormSnapshot;
pub use store::{KeyValueStore, MemoryStore};
pub use validation::FieldError;

/// Default configuration constants
pub mod consts {
    /// LocalStorage key the form snapshot is written under
    pub const STORAGE_KEY: &str = "competitorAnalysisFormData";
    /// Quiescence window before a burst of edits is written (ms)
    pub const AUTOSAVE_DELAY_MS: f64 = 1000.0;
    /// Longest delay `setTimeout` honours; larger values fire immediately
    pub const MAX_TIMER_DELAY_MS: f64 = 2_147_483_647.0;
    /// Element id of the form wired on page load
    pub const FORM_ID: &str = "analysisForm";

    /// Inline error messages
    pub const MSG_REQUIRED: &str = "This field is required";
    pub const MSG_INVALID_URL: &str = "Please enter a valid URL";
}
