//! Autosave configuration
//!
//! Defaults come from `consts`. On the web a form may override the store key
//! and delay through `data-autosave-key` / `data-autosave-delay` attributes.

use serde::{Deserialize, Serialize};

use crate::consts::{AUTOSAVE_DELAY_MS, FORM_ID, MAX_TIMER_DELAY_MS, STORAGE_KEY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Key the snapshot is stored under
    pub storage_key: String,
    /// Quiescence window in milliseconds
    pub delay_ms: f64,
    /// Element id of the form to wire
    pub form_id: String,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            delay_ms: AUTOSAVE_DELAY_MS,
            form_id: FORM_ID.to_string(),
        }
    }
}

impl AutosaveConfig {
    /// Apply attribute overrides. Blank keys and unparsable, negative or
    /// out-of-range delays are logged and ignored.
    pub fn with_overrides(mut self, storage_key: Option<&str>, delay: Option<&str>) -> Self {
        if let Some(key) = storage_key.map(str::trim) {
            if key.is_empty() {
                log::warn!("Ignoring blank autosave key, using {}", self.storage_key);
            } else {
                self.storage_key = key.to_string();
            }
        }

        if let Some(raw) = delay {
            match raw.trim().parse::<f64>() {
                Ok(ms) if (0.0..=MAX_TIMER_DELAY_MS).contains(&ms) => self.delay_ms = ms,
                _ => log::warn!(
                    "Ignoring invalid autosave delay {:?}, using {} ms",
                    raw,
                    self.delay_ms
                ),
            }
        }

        self
    }
}
