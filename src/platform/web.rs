//! Browser adapters (WASM only)

use wasm_bindgen::JsCast;
use web_sys::{
    Element, EventTarget, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, Node, Storage,
};

use crate::config::AutosaveConfig;
use crate::error::StoreError;
use crate::form::{Field, FieldKind, FormHandle};
use crate::store::KeyValueStore;
use crate::validation::FieldError;

/// `window.localStorage`, if the page is allowed to use it
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - form autosave disabled");
        }
        Self { storage }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|e| StoreError::Read(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StoreError::Write(format!("{e:?}")))
    }
}

/// Read `data-autosave-key` / `data-autosave-delay` overrides off the form
pub fn config_for(form: &HtmlFormElement, base: AutosaveConfig) -> AutosaveConfig {
    let key = form.get_attribute("data-autosave-key");
    let delay = form.get_attribute("data-autosave-delay");
    base.with_overrides(key.as_deref(), delay.as_deref())
}

/// Editable control inside a form
enum Control {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
    Select(HtmlSelectElement),
}

impl Control {
    fn from_element(el: Element) -> Option<Self> {
        let el = match el.dyn_into::<HtmlInputElement>() {
            Ok(input) => {
                // Buttons and file pickers carry no text value
                return match input.type_().to_ascii_lowercase().as_str() {
                    "submit" | "button" | "reset" | "image" | "file" => None,
                    _ => Some(Control::Input(input)),
                };
            }
            Err(el) => el,
        };
        let el = match el.dyn_into::<HtmlTextAreaElement>() {
            Ok(area) => return Some(Control::TextArea(area)),
            Err(el) => el,
        };
        el.dyn_into::<HtmlSelectElement>().ok().map(Control::Select)
    }

    fn element(&self) -> &HtmlElement {
        match self {
            Control::Input(e) => e,
            Control::TextArea(e) => e,
            Control::Select(e) => e,
        }
    }

    fn name(&self) -> String {
        match self {
            Control::Input(e) => e.name(),
            Control::TextArea(e) => e.name(),
            Control::Select(e) => e.name(),
        }
    }

    fn value(&self) -> String {
        match self {
            Control::Input(e) => e.value(),
            Control::TextArea(e) => e.value(),
            Control::Select(e) => e.value(),
        }
    }

    fn set_value(&self, value: &str) {
        match self {
            Control::Input(e) => e.set_value(value),
            Control::TextArea(e) => e.set_value(value),
            Control::Select(e) => e.set_value(value),
        }
    }

    fn required(&self) -> bool {
        match self {
            Control::Input(e) => e.required(),
            Control::TextArea(e) => e.required(),
            Control::Select(e) => e.required(),
        }
    }

    fn disabled(&self) -> bool {
        match self {
            Control::Input(e) => e.disabled(),
            Control::TextArea(e) => e.disabled(),
            Control::Select(e) => e.disabled(),
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Control::Input(e) => FieldKind::from_input_type(&e.type_()),
            Control::TextArea(_) => FieldKind::TextArea,
            Control::Select(_) => FieldKind::Select,
        }
    }

    /// Whether the control contributes to a form submission
    fn submittable(&self) -> bool {
        if self.disabled() {
            return false;
        }
        match self {
            Control::Input(e) => match e.type_().to_ascii_lowercase().as_str() {
                "checkbox" | "radio" => e.checked(),
                _ => true,
            },
            _ => true,
        }
    }

    fn to_field(&self) -> Field {
        // Non-submittable controls keep their slot (for error display) but
        // lose their name so snapshots skip them.
        let name = Some(self.name()).filter(|_| self.submittable());
        Field {
            name,
            value: self.value(),
            kind: self.kind(),
            required: self.required(),
        }
    }
}

/// A live `<form>` element
pub struct DomForm {
    form: HtmlFormElement,
}

impl DomForm {
    pub fn new(form: HtmlFormElement) -> Self {
        Self { form }
    }

    fn controls(&self) -> Vec<Control> {
        let Ok(list) = self.form.query_selector_all("input, textarea, select") else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(Control::from_element)
            .collect()
    }

    /// Index of the control an event was dispatched on
    pub fn index_of(&self, target: &EventTarget) -> Option<usize> {
        let node = target.dyn_ref::<Node>()?;
        self.controls()
            .iter()
            .position(|c| c.element().is_same_node(Some(node)))
    }

    /// Disable the submit button and swap its label for the spinner
    pub fn show_loading(&self) {
        let Some(button) = self
            .form
            .query_selector("[type=submit]")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        else {
            return;
        };

        let text = button.query_selector(".btn-text").ok().flatten();
        let spinner = button.query_selector(".loading-spinner").ok().flatten();
        if let (Some(text), Some(spinner)) = (text, spinner) {
            button.set_disabled(true);
            set_display(&text, "none");
            set_display(&spinner, "inline-block");
        }
    }
}

fn set_display(el: &Element, value: &str) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        let _ = el.style().set_property("display", value);
    }
}

impl FormHandle for DomForm {
    fn fields(&self) -> Vec<Field> {
        self.controls().iter().map(Control::to_field).collect()
    }

    fn set_value(&mut self, name: &str, value: &str) -> bool {
        // Empty names are never snapshot keys, so never restore targets
        if name.is_empty() {
            return false;
        }
        match self.controls().into_iter().find(|c| c.name() == name) {
            Some(control) => {
                control.set_value(value);
                true
            }
            None => false,
        }
    }

    fn show_error(&mut self, index: usize, error: &FieldError) {
        self.clear_error(index);
        let Some(control) = self.controls().into_iter().nth(index) else {
            return;
        };
        let el = control.element();
        let _ = el.class_list().add_1("error");

        let Some(parent) = el.parent_element() else {
            return;
        };
        let Some(document) = el.owner_document() else {
            return;
        };
        if let Ok(div) = document.create_element("div") {
            div.set_class_name("field-error");
            div.set_inner_html(&format!(
                "<i class=\"fas fa-exclamation-circle\"></i> {error}"
            ));
            let _ = parent.append_child(&div);
        }
    }

    fn clear_error(&mut self, index: usize) {
        let Some(control) = self.controls().into_iter().nth(index) else {
            return;
        };
        let el = control.element();
        let _ = el.class_list().remove_1("error");
        if let Some(existing) = el
            .parent_element()
            .and_then(|p| p.query_selector(".field-error").ok().flatten())
        {
            existing.remove();
        }
    }

    fn has_error(&self, index: usize) -> bool {
        self.controls()
            .get(index)
            .is_some_and(|c| c.element().class_list().contains("error"))
    }
}
