//! Platform abstraction layer
//!
//! Browser implementations of the crate's seams:
//! - `LocalStorage`: `KeyValueStore` over `window.localStorage`
//! - `DomForm`: `FormHandle` over an `HtmlFormElement`
//!
//! Native builds use `MemoryStore` and `MemoryForm` instead.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{DomForm, LocalStorage, config_for};
