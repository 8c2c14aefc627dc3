use dioxus::prelude::*;

use agrimarket_common::crop::{Crop, CropId, StarRating};
use agrimarket_common::currency::format_unit_price;
use agrimarket_common::dates::format_date;

use super::app::Route;

#[component]
pub fn Stars(rating: StarRating) -> Element {
    rsx! {
        span {
            class: "star-rating text-warning",
            title: "{rating}",
            aria_label: "{rating}",
            for _ in 0..rating.full {
                i { class: "fas fa-star" }
            }
            if rating.half {
                i { class: "fas fa-star-half-alt" }
            }
            for _ in 0..rating.empty {
                i { class: "far fa-star" }
            }
        }
    }
}

#[component]
fn CropImage(crop: Crop) -> Element {
    match crop.image_url() {
        Some(url) => rsx! {
            img { class: "card-img-top crop-image", src: "{url}", alt: "{crop.name}" }
        },
        None => rsx! {
            div { class: "card-img-top crop-image-placeholder d-flex align-items-center justify-content-center",
                i { class: "fas fa-seedling fa-3x text-muted" }
            }
        },
    }
}

/// Lines shared by buyer and farmer cards.
#[component]
fn CropSummary(crop: Crop) -> Element {
    let price = format_unit_price(crop.price_per_unit, &crop.unit);
    let harvested = crop.harvested().map(format_date);

    rsx! {
        h5 { class: "card-title", "{crop.name}" }
        p { class: "card-text text-muted mb-1", "{crop.category}" }
        p { class: "card-text mb-1",
            strong { "Available: " }
            "{crop.quantity} {crop.unit}"
        }
        p { class: "card-text price mb-1", "{price}" }
        p { class: "card-text mb-1",
            i { class: "fas fa-map-marker-alt me-1" }
            "{crop.place()}"
        }
        if let Some(grade) = crop.grade() {
            span { class: "badge bg-success mb-1", "Grade {grade}" }
        }
        if let Some(date) = harvested {
            p { class: "card-text small text-muted", "Harvested: {date}" }
        }
    }
}

#[component]
pub fn BuyerCropCard(crop: Crop, on_order: EventHandler<CropId>) -> Element {
    let id = crop.id;
    let farmer_id = crop.farmer_id;

    rsx! {
        div { class: "col-md-4 mb-4",
            div { class: "card crop-card h-100",
                CropImage { crop: crop.clone() }
                div { class: "card-body",
                    CropSummary { crop: crop.clone() }
                    p { class: "card-text mb-1",
                        Stars { rating: crop.stars() }
                        " {crop.farmer_name}"
                    }
                }
                div { class: "card-footer d-flex gap-1",
                    button {
                        class: "btn btn-success btn-sm",
                        onclick: move |_| on_order.call(id),
                        "Place Order"
                    }
                    Link {
                        class: "btn btn-outline-secondary btn-sm",
                        to: Route::CropDetails { id: id.0 },
                        "Details"
                    }
                    Link {
                        class: "btn btn-outline-primary btn-sm",
                        to: Route::Conversation { partner_id: farmer_id.0 },
                        "Contact"
                    }
                }
            }
        }
    }
}

#[component]
pub fn FarmerCropCard(
    crop: Crop,
    on_edit: EventHandler<CropId>,
    on_delete: EventHandler<CropId>,
) -> Element {
    let id = crop.id;

    rsx! {
        div { class: "col-md-4 mb-4",
            div { class: "card crop-card h-100",
                CropImage { crop: crop.clone() }
                div { class: "card-body",
                    CropSummary { crop: crop.clone() }
                }
                div { class: "card-footer d-flex gap-1",
                    button {
                        class: "btn btn-outline-primary btn-sm",
                        onclick: move |_| on_edit.call(id),
                        "Edit"
                    }
                    button {
                        class: "btn btn-outline-danger btn-sm",
                        onclick: move |_| on_delete.call(id),
                        "Delete"
                    }
                }
            }
        }
    }
}

#[component]
pub fn EmptyCrops(message: String) -> Element {
    rsx! {
        div { class: "col-12 text-center py-5 empty-state",
            i { class: "fas fa-seedling fa-3x text-muted mb-3" }
            p { class: "text-muted", "{message}" }
        }
    }
}
