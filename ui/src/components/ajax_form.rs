//! Submission of marked forms.
//!
//! A form built from a [`FormDescriptor`] carrying the `ajax-form` class is
//! sent through the typed client instead of the browser. The submit button
//! stays disabled while the request is in flight.

use dioxus::prelude::*;

use agrimarket_common::form::{FormDescriptor, FormFields, SubmitOutcome};

use super::browser;
use super::http::{use_market, Market};
use super::shell::{use_shell, Shell};

#[derive(Clone)]
pub struct Dispatcher {
    busy: Signal<bool>,
    shell: Shell,
    market: Market,
}

impl Dispatcher {
    pub fn busy(&self) -> bool {
        *self.busy.read()
    }

    /// Send `fields` as `form` declares. `on_completed` runs after a success
    /// without redirect, before dashboards are told to refresh; it is where
    /// the caller resets the form and closes its modal.
    pub fn submit(
        &self,
        form: &FormDescriptor,
        fields: FormFields,
        on_completed: impl FnOnce() + 'static,
    ) {
        let Some(request) = form.submission(fields) else {
            tracing::debug!("Form {} is not marked; leaving it to the browser", form.action);
            return;
        };
        if self.busy() {
            return;
        }
        let mut busy = self.busy;
        let shell = self.shell;
        let market = self.market.clone();
        busy.set(true);
        spawn(async move {
            let outcome = SubmitOutcome::from_result(market.submit(request).await);
            busy.set(false);
            match outcome {
                SubmitOutcome::Redirect { message, url } => {
                    shell.success(message);
                    browser::navigate_to(&url);
                }
                SubmitOutcome::Completed { message } => {
                    shell.success(message);
                    on_completed();
                    shell.request_refresh();
                }
                SubmitOutcome::Failed { message } => shell.error(message),
            }
        });
    }
}

/// One dispatcher per form; each tracks its own in-flight state.
pub fn use_dispatcher() -> Dispatcher {
    let busy = use_signal(|| false);
    Dispatcher {
        busy,
        shell: use_shell(),
        market: use_market(),
    }
}

/// Submit button that shows `busy_label` and disables itself while busy.
#[component]
pub fn SubmitButton(
    busy: bool,
    label: String,
    #[props(default = "Processing...".to_string())] busy_label: String,
    #[props(default = "btn btn-primary".to_string())] class: String,
) -> Element {
    rsx! {
        button {
            r#type: "submit",
            class: "{class}",
            disabled: busy,
            if busy {
                span { class: "spinner-border spinner-border-sm me-2", role: "status" }
                "{busy_label}"
            } else {
                "{label}"
            }
        }
    }
}
