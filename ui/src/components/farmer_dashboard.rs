use dioxus::prelude::*;

use agrimarket_common::crop::{CropForm, CropId, CROP_CATEGORIES, CROP_UNITS, QUALITY_GRADES};
use agrimarket_common::dashboard::DashboardData;
use agrimarket_common::endpoints::add_crop_form;
use agrimarket_common::form::FieldErrors;
use agrimarket_common::user::UserRole;

use super::ajax_form::{use_dispatcher, SubmitButton};
use super::browser;
use super::crop_card::{EmptyCrops, FarmerCropCard};
use super::http::use_market;
use super::image_input::ImageInput;
use super::market_prices::MarketPrices;
use super::order_list::OrderList;
use super::session::use_session;
use super::shell::use_shell;

#[component]
pub fn FarmerDashboard() -> Element {
    let market = use_market();
    let shell = use_shell();
    let session = use_session();
    let farmer = session.read().profile.user_id;
    let delete_market = market.clone();

    let dashboard = use_resource(move || {
        let market = market.clone();
        let _generation = shell.refresh_generation();
        async move {
            match market.load_farmer_dashboard(farmer).await {
                Ok(data) => Some(data),
                Err(e) => {
                    shell.error(e.toast_text("Failed to load dashboard data"));
                    None
                }
            }
        }
    });

    let on_delete = move |id: CropId| {
        if !browser::confirm("Are you sure you want to delete this crop?") {
            return;
        }
        let market = delete_market.clone();
        spawn(async move {
            match market.delete_crop(id).await {
                Ok(resp) => {
                    shell.success(resp.message_or("Crop deleted successfully"));
                    shell.request_refresh();
                }
                Err(e) => shell.error(e.toast_text("Failed to delete crop")),
            }
        });
    };

    let data: Option<DashboardData> = dashboard.read().clone().flatten();
    let stats = data.as_ref().map(DashboardData::stats).unwrap_or_default();
    let mut crop_names: Vec<String> = data
        .as_ref()
        .map(|d| d.crops.iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default();
    crop_names.sort();
    crop_names.dedup();

    rsx! {
        div { class: "farmer-dashboard container py-4",
            h2 { class: "mb-4", "Farmer Dashboard" }

            div { class: "row mb-4 stats",
                StatCard { label: "Active Crops", value: stats.active_crops, icon: "fa-seedling" }
                StatCard { label: "Total Orders", value: stats.total_orders, icon: "fa-shopping-cart" }
                StatCard { label: "Pending Orders", value: stats.pending_orders, icon: "fa-clock" }
            }

            div { class: "row",
                div { class: "col-lg-8",
                    AddCropForm {}
                    h4 { "My Crops" }
                    div { class: "row crop-grid",
                        match &data {
                            None => rsx! {
                                div { class: "col-12 text-center py-5",
                                    div { class: "spinner-border text-success", role: "status" }
                                }
                            },
                            Some(d) if d.crops.is_empty() => rsx! {
                                EmptyCrops { message: "You haven't listed any crops yet." }
                            },
                            Some(d) => rsx! {
                                for crop in d.crops.iter().cloned() {
                                    FarmerCropCard {
                                        key: "{crop.id}",
                                        crop,
                                        on_edit: move |_| shell.info("Crop editing coming soon!"),
                                        on_delete: on_delete.clone(),
                                    }
                                }
                            },
                        }
                    }
                }
                div { class: "col-lg-4",
                    h4 { "Incoming Orders" }
                    if let Some(d) = &data {
                        OrderList { orders: d.orders.clone(), role: UserRole::Farmer }
                    }
                    MarketPrices { crop_names }
                }
            }
        }
    }
}

#[component]
fn StatCard(label: &'static str, value: usize, icon: &'static str) -> Element {
    rsx! {
        div { class: "col-md-4 mb-2",
            div { class: "card stat-card text-center",
                div { class: "card-body",
                    i { class: "fas {icon} fa-2x text-success mb-2" }
                    h3 { class: "mb-0", "{value}" }
                    p { class: "text-muted mb-0", "{label}" }
                }
            }
        }
    }
}

/// Add-crop form. Checked locally first, then posted as multipart.
#[component]
fn AddCropForm() -> Element {
    let session = use_session();
    let dispatcher = use_dispatcher();
    let mut form = use_signal(|| CropForm::for_profile(&session.read().profile));
    let mut errors = use_signal(FieldErrors::new);
    // Bumped after a successful submit so the image input remounts empty.
    let mut form_gen = use_signal(|| 0u32);

    let submit = {
        let dispatcher = dispatcher.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let mut current = form.read().clone();
            current.prefill_location(&session.read().profile);
            if let Err(e) = current.validate() {
                errors.set(e);
                return;
            }
            errors.set(FieldErrors::new());
            dispatcher.submit(&add_crop_form(), current.to_fields(), move || {
                form.set(CropForm::for_profile(&session.read().profile));
                form_gen += 1;
            });
        }
    };

    let err = move |field: &str| errors.read().get(field).map(str::to_string);

    rsx! {
        div { class: "card mb-4 add-crop",
            div { class: "card-header", h5 { class: "mb-0", "Add New Crop" } }
            div { class: "card-body",
                form {
                    class: "ajax-form",
                    enctype: "multipart/form-data",
                    onsubmit: submit,
                    div { class: "row g-2",
                        div { class: "col-md-6",
                            label { class: "form-label", "Crop name" }
                            input {
                                class: "form-control",
                                name: "name",
                                value: "{form.read().name}",
                                oninput: move |evt| form.write().name = evt.value(),
                            }
                            if let Some(msg) = err("name") {
                                div { class: "invalid-feedback d-block", "{msg}" }
                            }
                        }
                        div { class: "col-md-6",
                            label { class: "form-label", "Category" }
                            select {
                                class: "form-select",
                                name: "category",
                                value: "{form.read().category}",
                                onchange: move |evt| form.write().category = evt.value(),
                                option { value: "", "Select category" }
                                for category in CROP_CATEGORIES {
                                    option { value: "{category}", "{category}" }
                                }
                            }
                            if let Some(msg) = err("category") {
                                div { class: "invalid-feedback d-block", "{msg}" }
                            }
                        }
                        div { class: "col-md-4",
                            label { class: "form-label", "Quantity" }
                            input {
                                r#type: "number",
                                class: "form-control",
                                name: "quantity",
                                min: "0",
                                step: "0.1",
                                value: "{form.read().quantity}",
                                oninput: move |evt| form.write().quantity = evt.value(),
                            }
                            if let Some(msg) = err("quantity") {
                                div { class: "invalid-feedback d-block", "{msg}" }
                            }
                        }
                        div { class: "col-md-4",
                            label { class: "form-label", "Unit" }
                            select {
                                class: "form-select",
                                name: "unit",
                                value: "{form.read().unit}",
                                onchange: move |evt| form.write().unit = evt.value(),
                                option { value: "", "Select unit" }
                                for unit in CROP_UNITS {
                                    option { value: "{unit}", "{unit}" }
                                }
                            }
                            if let Some(msg) = err("unit") {
                                div { class: "invalid-feedback d-block", "{msg}" }
                            }
                        }
                        div { class: "col-md-4",
                            label { class: "form-label", "Price per unit" }
                            input {
                                r#type: "number",
                                class: "form-control",
                                name: "price_per_unit",
                                min: "0",
                                step: "0.01",
                                value: "{form.read().price_per_unit}",
                                oninput: move |evt| form.write().price_per_unit = evt.value(),
                            }
                            if let Some(msg) = err("price_per_unit") {
                                div { class: "invalid-feedback d-block", "{msg}" }
                            }
                        }
                        div { class: "col-12",
                            label { class: "form-label", "Description" }
                            textarea {
                                class: "form-control",
                                name: "description",
                                value: "{form.read().description}",
                                oninput: move |evt| form.write().description = evt.value(),
                            }
                        }
                        div { class: "col-md-6",
                            label { class: "form-label", "Harvest date" }
                            input {
                                r#type: "date",
                                class: "form-control",
                                name: "harvest_date",
                                value: "{form.read().harvest_date}",
                                oninput: move |evt| form.write().harvest_date = evt.value(),
                            }
                        }
                        div { class: "col-md-6",
                            label { class: "form-label", "Best before" }
                            input {
                                r#type: "date",
                                class: "form-control",
                                name: "expiry_date",
                                value: "{form.read().expiry_date}",
                                oninput: move |evt| form.write().expiry_date = evt.value(),
                            }
                        }
                        div { class: "col-md-5",
                            label { class: "form-label", "Location" }
                            input {
                                class: "form-control",
                                name: "location",
                                value: "{form.read().location}",
                                oninput: move |evt| form.write().location = evt.value(),
                            }
                        }
                        div { class: "col-md-5",
                            label { class: "form-label", "County" }
                            input {
                                class: "form-control",
                                name: "county",
                                value: "{form.read().county}",
                                oninput: move |evt| form.write().county = evt.value(),
                            }
                        }
                        div { class: "col-md-2",
                            label { class: "form-label", "Grade" }
                            select {
                                class: "form-select",
                                name: "quality_grade",
                                value: "{form.read().quality_grade}",
                                onchange: move |evt| form.write().quality_grade = evt.value(),
                                for grade in QUALITY_GRADES {
                                    option { value: "{grade}", "{grade}" }
                                }
                            }
                        }
                        div { class: "col-12",
                            label { class: "form-label", "Photo" }
                            for generation in std::iter::once(form_gen()) {
                                ImageInput {
                                    key: "{generation}",
                                    on_change: move |file| form.write().image = file,
                                }
                            }
                        }
                    }
                    SubmitButton {
                        busy: dispatcher.busy(),
                        label: "Add Crop",
                        busy_label: "Adding...",
                        class: "btn btn-success mt-2",
                    }
                }
            }
        }
    }
}
