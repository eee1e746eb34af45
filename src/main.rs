//! Form Autosave entry point
//!
//! On the web: restores the analysis form and wires autosave, validation and
//! submit handling onto it. Natively: runs a short in-memory walkthrough.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo_timers::callback::Timeout;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlFormElement;

    use form_autosave::consts::MAX_TIMER_DELAY_MS;
    use form_autosave::platform::{DomForm, LocalStorage, config_for};
    use form_autosave::{AutosaveConfig, FormPersistence, SubmitOutcome, validation};

    /// Everything attached to one wired form
    struct App {
        form: DomForm,
        persistence: FormPersistence<LocalStorage>,
        /// Pending autosave timer; replacing it cancels the old one
        timer: Option<Timeout>,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let defaults = AutosaveConfig::default();
        let Some(element) = document.get_element_by_id(&defaults.form_id) else {
            log::info!("No #{} on this page, autosave idle", defaults.form_id);
            return;
        };
        let form_el: HtmlFormElement = match element.dyn_into() {
            Ok(form) => form,
            Err(_) => {
                log::warn!("#{} is not a <form>", defaults.form_id);
                return;
            }
        };

        let config = config_for(&form_el, defaults);
        log::info!(
            "Form autosave on #{} (key {}, {} ms)",
            config.form_id,
            config.storage_key,
            config.delay_ms
        );

        let mut form = DomForm::new(form_el.clone());
        let persistence = FormPersistence::new(LocalStorage::open(), &config);
        persistence.restore(&mut form);

        let app = Rc::new(RefCell::new(App {
            form,
            persistence,
            timer: None,
        }));

        setup_autosave(&form_el, app.clone());
        setup_validation(&form_el, app.clone());
        setup_submit(&form_el, app);
    }

    fn setup_autosave(form_el: &HtmlFormElement, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let now = js_sys::Date::now();
            let mut a = app.borrow_mut();
            let App {
                form,
                persistence,
                timer,
            } = &mut *a;

            if let Some(index) = event.target().and_then(|t| form.index_of(&t)) {
                validation::clear_on_input(form, index);
            }

            let deadline = persistence.on_change(now);
            let app = app.clone();
            let delay = (deadline - now).clamp(0.0, MAX_TIMER_DELAY_MS) as u32;
            *timer = Some(Timeout::new(delay, move || {
                let mut a = app.borrow_mut();
                let App {
                    form, persistence, ..
                } = &mut *a;
                // Timers may fire a hair early by the wall clock
                persistence.poll(form, js_sys::Date::now().max(deadline));
            }));
        });
        let _ = form_el.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_validation(form_el: &HtmlFormElement, app: Rc<RefCell<App>>) {
        // blur does not bubble; focusout does
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::FocusEvent| {
            let mut a = app.borrow_mut();
            let Some(index) = event.target().and_then(|t| a.form.index_of(&t)) else {
                return;
            };
            validation::validate_on_blur(&mut a.form, index);
        });
        let _ =
            form_el.add_event_listener_with_callback("focusout", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_submit(form_el: &HtmlFormElement, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let mut a = app.borrow_mut();
            let App {
                form,
                persistence,
                timer,
            } = &mut *a;

            match persistence.on_submit(form) {
                SubmitOutcome::Blocked(_) => event.prevent_default(),
                SubmitOutcome::Proceed => {
                    *timer = None;
                    form.show_loading();
                }
            }
        });
        let _ = form_el.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Form Autosave (native) starting...");
    log::info!("Native mode uses in-memory stand-ins - run with `trunk serve` for the web version");

    demo_reload();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Type into a form, "reload", and restore into a fresh copy
#[cfg(not(target_arch = "wasm32"))]
fn demo_reload() {
    use form_autosave::{
        AutosaveConfig, Field, FieldKind, FormHandle, FormPersistence, MemoryForm, MemoryStore,
        SubmitOutcome,
    };

    let config = AutosaveConfig::default();
    let mut form = MemoryForm::new()
        .with_field(Field::new("competitor_url", "").with_kind(FieldKind::Url).required())
        .with_field(Field::new("company_name", ""));
    let mut persistence = FormPersistence::new(MemoryStore::new(), &config);

    let mut now = 0.0;
    for partial in ["e", "ex", "example", "example.com"] {
        form.set_value("competitor_url", partial);
        persistence.on_change(now);
        now += 150.0;
    }
    persistence.poll(&form, now + config.delay_ms);
    println!("Writes after typing burst: {}", persistence.store().writes());

    let mut reloaded = form.blank();
    let outcome = persistence.restore(&mut reloaded);
    println!(
        "Restore: {:?}, competitor_url = {:?}",
        outcome,
        reloaded.value("competitor_url")
    );

    match persistence.on_submit(&mut reloaded) {
        SubmitOutcome::Proceed => println!("✓ Submit accepted"),
        SubmitOutcome::Blocked(errors) => {
            for (index, err) in errors {
                let name = reloaded.fields()[index].name.clone().unwrap_or_default();
                println!("✗ {name}: {err}");
            }
        }
    }
}
