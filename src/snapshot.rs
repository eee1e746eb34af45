//! Form snapshots and their stored encoding
//!
//! A snapshot is a flat name -> value map. The stored record is that map as
//! a JSON object of strings. Records written by other code may hold numbers,
//! booleans or null; those decode to the string a DOM `value` assignment
//! would produce.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::PersistError;
use crate::form::Field;

/// Field values of a form, keyed by field name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FormSnapshot {
    values: BTreeMap<String, String>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture named fields; nameless fields are not addressable and are skipped.
    /// Later fields overwrite earlier ones with the same name.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a Field>) -> Self {
        let values = fields
            .into_iter()
            .filter_map(|f| f.name().map(|name| (name.to_string(), f.value.clone())))
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as a stored record
    pub fn to_record(&self) -> Result<String, PersistError> {
        serde_json::to_string(self).map_err(PersistError::Serialization)
    }

    /// Decode a stored record. The record must be a JSON object; nested
    /// arrays and objects inside it are skipped.
    pub fn from_record(record: &str) -> Result<Self, PersistError> {
        let object: Map<String, Value> =
            serde_json::from_str(record).map_err(PersistError::MalformedRecord)?;
        let values = object
            .into_iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => String::new(),
                    Value::Array(_) | Value::Object(_) => {
                        log::debug!("Skipping non-scalar stored value for {name}");
                        return None;
                    }
                };
                Some((name, value))
            })
            .collect();
        Ok(Self { values })
    }
}
