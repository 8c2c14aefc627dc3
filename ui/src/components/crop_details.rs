use dioxus::prelude::*;

use agrimarket_common::crop::{CropDetails, CropId};
use agrimarket_common::currency::format_unit_price;
use agrimarket_common::dates::format_date;

use super::app::Route;
use super::http::use_market;
use super::order_modal::OrderModal;
use super::shell::use_shell;

#[component]
pub fn CropDetailsView(id: CropId) -> Element {
    let market = use_market();
    let shell = use_shell();
    let nav = use_navigator();
    let mut ordering = use_signal(|| false);
    let mut contacting = use_signal(|| false);

    let details_market = market.clone();
    let details = use_resource(move || {
        let market = details_market.clone();
        async move {
            market
                .crop_details(id)
                .await
                .map_err(|e| shell.error(e.toast_text("Failed to load crop details")))
                .ok()
        }
    });

    let contact_market = use_hook(|| CopyValue::new(market.clone()));
    let contact = move |_: MouseEvent| {
        let market = contact_market.read().clone();
        contacting.set(true);
        spawn(async move {
            match market.contact_farmer(id).await {
                Ok(contact) => {
                    tracing::debug!("Contacting farmer {}", contact.farmer_name);
                    nav.push(Route::Conversation {
                        partner_id: contact.farmer_id.0,
                    });
                }
                Err(e) => shell.error(e.toast_text("Failed to get farmer contact")),
            }
            contacting.set(false);
        });
    };

    let crop: Option<CropDetails> = details.read().clone().flatten();
    let Some(crop) = crop else {
        return rsx! {
            div { class: "container py-5 text-center",
                div { class: "spinner-border text-success", role: "status" }
            }
        };
    };

    let price = format_unit_price(crop.price_per_unit, &crop.unit);
    let harvested = crop.harvest_date.as_deref().map(format_date);

    rsx! {
        div { class: "crop-details container py-4",
            div { class: "row",
                div { class: "col-md-5",
                    match crop.image_url() {
                        Some(url) => rsx! { img { class: "img-fluid rounded", src: "{url}", alt: "{crop.name}" } },
                        None => rsx! {
                            div { class: "crop-image-placeholder d-flex align-items-center justify-content-center",
                                i { class: "fas fa-seedling fa-5x text-muted" }
                            }
                        },
                    }
                }
                div { class: "col-md-7",
                    h2 { "{crop.name}" }
                    p { class: "text-muted", "{crop.category}" }
                    p { class: "price fs-4", "{price}" }
                    p { strong { "Available: " } "{crop.quantity} {crop.unit}" }
                    p {
                        i { class: "fas fa-map-marker-alt me-1" }
                        "{crop.place()}"
                    }
                    p { strong { "Farmer: " } "{crop.farmer_name}" }
                    if let Some(date) = harvested {
                        p { strong { "Harvested: " } "{date}" }
                    }
                    if let Some(description) = crop.description.as_ref() {
                        p { class: "description", "{description}" }
                    }
                    div { class: "d-flex gap-2",
                        button {
                            class: "btn btn-success",
                            onclick: move |_| ordering.set(true),
                            "Place Order"
                        }
                        button {
                            class: "btn btn-outline-primary",
                            disabled: contacting(),
                            onclick: contact,
                            "Contact Farmer"
                        }
                    }
                }
            }
            if ordering() {
                OrderModal { crop_id: id, on_close: move |_| ordering.set(false) }
            }
        }
    }
}
