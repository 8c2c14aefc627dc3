use dioxus::prelude::*;

use agrimarket_common::crop::{CropFilters, CropId, CROP_CATEGORIES};
use agrimarket_common::dashboard::DashboardData;
use agrimarket_common::timing::Debounce;
use agrimarket_common::user::UserRole;

use super::browser;
use super::config::SEARCH_DEBOUNCE;
use super::crop_card::{BuyerCropCard, EmptyCrops};
use super::http::use_market;
use super::order_list::OrderList;
use super::order_modal::OrderModal;
use super::shell::use_shell;

/// County choices for the filter bar, loaded once.
pub fn use_counties() -> Resource<Vec<String>> {
    let market = use_market();
    use_resource(move || {
        let market = market.clone();
        async move {
            market.locations().await.unwrap_or_else(|e| {
                tracing::warn!("Failed to load locations: {e}");
                Vec::new()
            })
        }
    })
}

#[component]
pub fn BuyerDashboard() -> Element {
    let market = use_market();
    let shell = use_shell();
    let mut filters = use_signal(CropFilters::default);
    let mut search_draft = use_signal(String::new);
    let mut search_debounce = use_signal(Debounce::default);
    let mut ordering = use_signal(|| None::<CropId>);
    let counties = use_counties();

    let dashboard = use_resource(move || {
        let market = market.clone();
        let filters = filters();
        let _generation = shell.refresh_generation();
        async move {
            match market.load_dashboard(&filters).await {
                Ok(data) => Some(data),
                Err(e) => {
                    shell.error(e.toast_text("Failed to load dashboard data"));
                    None
                }
            }
        }
    });

    let on_search = move |evt: FormEvent| {
        let value = evt.value();
        search_draft.set(value.clone());
        let ticket = search_debounce.write().arm();
        spawn(async move {
            browser::sleep(SEARCH_DEBOUNCE).await;
            if search_debounce.peek().is_latest(ticket) {
                filters.write().search = value;
            }
        });
    };

    let data: Option<DashboardData> = dashboard.read().clone().flatten();
    let county_options = counties.read().clone().unwrap_or_default();

    rsx! {
        div { class: "buyer-dashboard container py-4",
            h2 { class: "mb-4", "Buyer Dashboard" }

            div { class: "card mb-4 filters",
                div { class: "card-body row g-2",
                    div { class: "col-md-3",
                        select {
                            class: "form-select",
                            value: "{filters.read().category}",
                            onchange: move |evt| filters.write().category = evt.value(),
                            option { value: "", "All Categories" }
                            for category in CROP_CATEGORIES {
                                option { value: "{category}", "{category}" }
                            }
                        }
                    }
                    div { class: "col-md-3",
                        select {
                            class: "form-select",
                            value: "{filters.read().county}",
                            onchange: move |evt| filters.write().county = evt.value(),
                            option { value: "", "All Counties" }
                            for county in county_options {
                                option { value: "{county}", "{county}" }
                            }
                        }
                    }
                    div { class: "col-md-2",
                        input {
                            r#type: "number",
                            class: "form-control",
                            placeholder: "Max price",
                            min: "0",
                            value: "{filters.read().max_price}",
                            onchange: move |evt| filters.write().max_price = evt.value(),
                        }
                    }
                    div { class: "col-md-4",
                        input {
                            r#type: "search",
                            class: "form-control",
                            placeholder: "Search crops...",
                            value: "{search_draft}",
                            oninput: on_search,
                        }
                    }
                }
            }

            div { class: "row",
                div { class: "col-lg-8",
                    h4 { "Available Crops" }
                    div { class: "row crop-grid",
                        match &data {
                            None => rsx! {
                                div { class: "col-12 text-center py-5",
                                    div { class: "spinner-border text-success", role: "status" }
                                }
                            },
                            Some(d) if d.crops.is_empty() => rsx! {
                                EmptyCrops { message: "No crops match your filters." }
                            },
                            Some(d) => rsx! {
                                for crop in d.crops.iter().cloned() {
                                    BuyerCropCard {
                                        key: "{crop.id}",
                                        crop,
                                        on_order: move |id| ordering.set(Some(id)),
                                    }
                                }
                            },
                        }
                    }
                }
                div { class: "col-lg-4",
                    h4 { "My Orders" }
                    if let Some(d) = &data {
                        OrderList { orders: d.orders.clone(), role: UserRole::Buyer }
                    }
                }
            }

            if let Some(crop_id) = ordering() {
                OrderModal {
                    crop_id,
                    on_close: move |_| ordering.set(None),
                }
            }
        }
    }
}
