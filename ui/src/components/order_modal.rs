use dioxus::prelude::*;

use agrimarket_common::crop::{CropDetails, CropId};
use agrimarket_common::currency::{format_currency, format_unit_price};
use agrimarket_common::endpoints::place_order_form;
use agrimarket_common::form::FieldErrors;
use agrimarket_common::order::OrderForm;

use super::ajax_form::{use_dispatcher, SubmitButton};
use super::browser::today_iso;
use super::http::use_market;
use super::shell::use_shell;

#[derive(Debug, PartialEq)]
enum DetailsLoad {
    Pending,
    Failed,
    Ready(CropDetails),
}

impl DetailsLoad {
    /// Reads the details resource: unresolved, resolved to an error, or loaded.
    fn of(resource: Option<Option<CropDetails>>) -> Self {
        match resource {
            None => DetailsLoad::Pending,
            Some(None) => DetailsLoad::Failed,
            Some(Some(crop)) => DetailsLoad::Ready(crop),
        }
    }
}

/// Place-order dialog for one crop. Closes itself after a successful order.
#[component]
pub fn OrderModal(crop_id: CropId, on_close: EventHandler<()>) -> Element {
    let market = use_market();
    let shell = use_shell();
    let dispatcher = use_dispatcher();
    let mut form = use_signal(OrderForm::default);
    let mut errors = use_signal(FieldErrors::new);

    let details = use_resource(move || {
        let market = market.clone();
        async move {
            let result = market.crop_details(crop_id).await;
            match &result {
                Ok(crop) => form.set(OrderForm::for_crop(crop)),
                Err(e) => shell.error(e.toast_text("Failed to load crop details")),
            }
            result.ok()
        }
    });

    let crop = DetailsLoad::of(details.read().clone());
    let today = today_iso();

    let body = match crop {
        DetailsLoad::Pending => rsx! {
            div { class: "modal-body text-center py-4",
                div { class: "spinner-border text-success", role: "status" }
            }
        },
        DetailsLoad::Failed => rsx! {
            div { class: "modal-body text-center py-4",
                p { class: "text-danger mb-3", "Failed to load crop details" }
                button {
                    r#type: "button",
                    class: "btn btn-secondary",
                    onclick: move |_| on_close.call(()),
                    "Close"
                }
            }
        },
        DetailsLoad::Ready(crop) => {
            let total = format_currency(form.read().total(crop.price_per_unit));
            let unit_price = format_unit_price(crop.price_per_unit, &crop.unit);
            let available = crop.quantity;
            let submit = {
                let dispatcher = dispatcher.clone();
                let today = today.clone();
                move |evt: FormEvent| {
                    evt.prevent_default();
                    let current = form.read().clone();
                    if let Err(e) = current.validate(available, &today) {
                        errors.set(e);
                        return;
                    }
                    errors.set(FieldErrors::new());
                    dispatcher.submit(&place_order_form(), current.to_fields(), move || {
                        form.set(OrderForm::default());
                        on_close.call(());
                    });
                }
            };
            let err = move |field: &str| errors.read().get(field).map(str::to_string);
            rsx! {
                form { class: "ajax-form", onsubmit: submit,
                    div { class: "modal-body",
                        p { class: "mb-1", strong { "{crop.name}" } " from {crop.farmer_name}" }
                        p { class: "mb-1", "Available: {crop.quantity} {crop.unit}" }
                        p { class: "mb-3", "Price: {unit_price}" }
                        div { class: "mb-3",
                            label { class: "form-label", "Quantity ({crop.unit})" }
                            input {
                                r#type: "number",
                                class: "form-control",
                                name: "quantity",
                                min: "{OrderForm::MIN_QUANTITY}",
                                max: "{available}",
                                step: "{OrderForm::QUANTITY_STEP}",
                                required: true,
                                value: "{form.read().quantity}",
                                oninput: move |evt| form.write().quantity = evt.value(),
                            }
                            if let Some(msg) = err("quantity") {
                                div { class: "invalid-feedback d-block", "{msg}" }
                            }
                        }
                        div { class: "mb-3",
                            label { class: "form-label", "Delivery address" }
                            textarea {
                                class: "form-control",
                                name: "delivery_address",
                                required: true,
                                value: "{form.read().delivery_address}",
                                oninput: move |evt| form.write().delivery_address = evt.value(),
                            }
                            if let Some(msg) = err("delivery_address") {
                                div { class: "invalid-feedback d-block", "{msg}" }
                            }
                        }
                        div { class: "mb-3",
                            label { class: "form-label", "Preferred delivery date" }
                            input {
                                r#type: "date",
                                class: "form-control",
                                name: "delivery_date",
                                min: "{today}",
                                value: "{form.read().delivery_date}",
                                oninput: move |evt| form.write().delivery_date = evt.value(),
                            }
                            if let Some(msg) = err("delivery_date") {
                                div { class: "invalid-feedback d-block", "{msg}" }
                            }
                        }
                        div { class: "mb-3",
                            label { class: "form-label", "Notes" }
                            textarea {
                                class: "form-control",
                                name: "notes",
                                value: "{form.read().notes}",
                                oninput: move |evt| form.write().notes = evt.value(),
                            }
                        }
                        p { class: "order-total fw-bold", "Total: {total}" }
                    }
                    div { class: "modal-footer",
                        button {
                            r#type: "button",
                            class: "btn btn-secondary",
                            onclick: move |_| on_close.call(()),
                            "Cancel"
                        }
                        SubmitButton {
                            busy: dispatcher.busy(),
                            label: "Place Order",
                            busy_label: "Placing order...",
                            class: "btn btn-success",
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "modal d-block", tabindex: "-1", role: "dialog",
            div { class: "modal-dialog", role: "document",
                div { class: "modal-content",
                    div { class: "modal-header",
                        h5 { class: "modal-title", "Place Order" }
                        button {
                            r#type: "button",
                            class: "btn-close",
                            aria_label: "Close",
                            onclick: move |_| on_close.call(()),
                        }
                    }
                    {body}
                }
            }
        }
        div { class: "modal-backdrop show" }
    }
}
