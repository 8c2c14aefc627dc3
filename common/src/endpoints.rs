//! Request builders for every marketplace endpoint.

use serde::Serialize;

use crate::api::{ApiRequest, HttpMethod};
use crate::crop::{CropFilters, CropForm, CropId};
use crate::form::{FormDescriptor, FormFields};
use crate::market::PriceQuery;
use crate::message::OutgoingMessage;
use crate::order::{OrderForm, OrderId, OrderStatus, StatusUpdate};
use crate::payment::PaymentRequest;
use crate::user::UserId;

pub const CROPS: &str = "/api/crops";
pub const ORDERS: &str = "/api/orders";
pub const LOCATIONS: &str = "/api/locations";
pub const MARKET_PRICES: &str = "/api/market-prices";
pub const MESSAGES: &str = "/api/messages";
pub const PAYMENT_INITIATE: &str = "/api/payment/initiate";
pub const LOGIN: &str = "/login";

fn json_body<T: Serialize>(request: ApiRequest, body: &T) -> ApiRequest {
    // Only plain structs of strings, numbers and options are passed here.
    match serde_json::to_value(body) {
        Ok(value) => request.with_json(value),
        Err(e) => {
            tracing::warn!("Could not encode body for {}: {e}", request.path);
            request
        }
    }
}

pub fn list_crops(filters: &CropFilters) -> ApiRequest {
    filters
        .query_pairs()
        .into_iter()
        .fold(ApiRequest::get(CROPS), |req, (k, v)| req.with_query(k, v))
}

/// The add-crop form is a multipart POST.
pub fn add_crop_form() -> FormDescriptor {
    FormDescriptor::ajax(CROPS, HttpMethod::Post).multipart()
}

pub fn add_crop(form: &CropForm) -> ApiRequest {
    ApiRequest::new(HttpMethod::Post, CROPS).with_multipart(form.to_fields())
}

pub fn crop_details(id: CropId) -> ApiRequest {
    ApiRequest::get(format!("{CROPS}/{id}"))
}

pub fn delete_crop(id: CropId) -> ApiRequest {
    ApiRequest::delete(format!("{CROPS}/{id}"))
}

pub fn contact_farmer(id: CropId) -> ApiRequest {
    ApiRequest::get(format!("{CROPS}/{id}/contact-farmer"))
}

pub fn list_orders() -> ApiRequest {
    ApiRequest::get(ORDERS)
}

pub fn place_order_form() -> FormDescriptor {
    FormDescriptor::ajax(ORDERS, HttpMethod::Post)
}

pub fn place_order(form: &OrderForm) -> ApiRequest {
    ApiRequest::new(HttpMethod::Post, ORDERS).with_json(form.to_fields().to_json())
}

pub fn update_order_status(id: OrderId, status: OrderStatus) -> ApiRequest {
    json_body(
        ApiRequest::new(HttpMethod::Put, format!("{ORDERS}/{id}/status")),
        &StatusUpdate { status },
    )
}

pub fn locations() -> ApiRequest {
    ApiRequest::get(LOCATIONS)
}

pub fn market_prices(query: &PriceQuery) -> ApiRequest {
    query
        .query_pairs()
        .into_iter()
        .fold(ApiRequest::get(MARKET_PRICES), |req, (k, v)| req.with_query(k, v))
}

pub fn conversations() -> ApiRequest {
    ApiRequest::get(MESSAGES)
}

pub fn thread(partner: UserId) -> ApiRequest {
    ApiRequest::get(MESSAGES).with_query("user_id", partner.to_string())
}

pub fn send_message(message: &OutgoingMessage) -> ApiRequest {
    json_body(ApiRequest::new(HttpMethod::Post, MESSAGES), message)
}

pub fn initiate_payment(payment: &PaymentRequest) -> ApiRequest {
    json_body(ApiRequest::new(HttpMethod::Post, PAYMENT_INITIATE), payment)
}

pub fn login(username: &str, password: &str) -> ApiRequest {
    let fields = FormFields::new()
        .text("username", username)
        .text("password", password);
    ApiRequest::new(HttpMethod::Post, LOGIN).with_json(fields.to_json())
}

/// A server-rendered page, fetched for in-place navigation.
pub fn page(path: &str) -> ApiRequest {
    ApiRequest::get(path)
}
