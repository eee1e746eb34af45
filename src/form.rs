//! Form handle abstraction
//!
//! The autosave and validation logic only sees a form through `FormHandle`.
//! On the web this is backed by an `HtmlFormElement`; tests and the native
//! build use `MemoryForm`.

use crate::validation::FieldError;

/// Kind of editable control, as far as validation cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Text,
    Url,
    Email,
    TextArea,
    Select,
    Other,
}

impl FieldKind {
    /// Map an `<input type=...>` attribute value
    pub fn from_input_type(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "" | "text" | "search" => FieldKind::Text,
            "url" => FieldKind::Url,
            "email" => FieldKind::Email,
            _ => FieldKind::Other,
        }
    }
}

/// One editable control of a form, read at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Option<String>,
    pub value: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    /// Named text field
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
            kind: FieldKind::Text,
            required: false,
        }
    }

    /// Field without a name attribute
    pub fn unnamed(kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            name: None,
            value: value.into(),
            kind,
            required: false,
        }
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Name usable as a snapshot key (empty names count as missing)
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// A form whose fields can be read, written and annotated with errors.
///
/// Field indices refer to positions in the vector returned by `fields`,
/// which is in document order.
pub trait FormHandle {
    fn fields(&self) -> Vec<Field>;

    /// Set the value of the first field named `name`. Returns false if no
    /// such field exists.
    fn set_value(&mut self, name: &str, value: &str) -> bool;

    fn show_error(&mut self, index: usize, error: &FieldError);

    fn clear_error(&mut self, index: usize);

    fn has_error(&self, index: usize) -> bool;
}

#[derive(Debug, Clone)]
struct MemoryField {
    field: Field,
    error: Option<FieldError>,
}

/// In-memory form used by tests and the native build
#[derive(Debug, Clone, Default)]
pub struct MemoryForm {
    fields: Vec<MemoryField>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.push(field);
        self
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(MemoryField { field, error: None });
    }

    /// Same fields with every value emptied, as on a fresh page load
    pub fn blank(&self) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|f| MemoryField {
                field: Field {
                    value: String::new(),
                    ..f.field.clone()
                },
                error: None,
            })
            .collect();
        Self { fields }
    }

    /// Value of the first field named `name`
    pub fn value(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.fields[i].field.value.as_str())
    }

    /// Value by index, including nameless fields
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|f| f.field.value.as_str())
    }

    pub fn set_value_at(&mut self, index: usize, value: &str) {
        if let Some(f) = self.fields.get_mut(index) {
            f.field.value = value.to_string();
        }
    }

    pub fn error(&self, index: usize) -> Option<&FieldError> {
        self.fields.get(index).and_then(|f| f.error.as_ref())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.field.name() == Some(name))
    }
}

impl FormHandle for MemoryForm {
    fn fields(&self) -> Vec<Field> {
        self.fields.iter().map(|f| f.field.clone()).collect()
    }

    fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.fields[i].field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn show_error(&mut self, index: usize, error: &FieldError) {
        if let Some(f) = self.fields.get_mut(index) {
            f.error = Some(*error);
        }
    }

    fn clear_error(&mut self, index: usize) {
        if let Some(f) = self.fields.get_mut(index) {
            f.error = None;
        }
    }

    fn has_error(&self, index: usize) -> bool {
        self.error(index).is_some()
    }
}
