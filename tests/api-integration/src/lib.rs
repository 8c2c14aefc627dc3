use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use agrimarket_common::api::{ApiError, ApiRequest, HttpMethod, RawResponse, RequestBody, Transport};
use agrimarket_common::client::MarketClient;
use agrimarket_common::crop::{CropForm, CropId};
use agrimarket_common::form::{FilePart, FormFields, FormValue};
use agrimarket_common::order::OrderForm;
use agrimarket_common::user::UserRole;

pub mod harness;

/// Server under test; override with `AGRIMARKET_TEST_URL`.
pub fn api_url() -> String {
    std::env::var("AGRIMARKET_TEST_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// `reqwest` transport with its own cookie jar, so each participant keeps
/// a separate server session.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| panic!("Failed to build HTTP client: {e}"));
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

fn method_of(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn multipart_of(fields: &FormFields) -> Result<reqwest::multipart::Form, ApiError> {
    let mut form = reqwest::multipart::Form::new();
    for (name, value) in fields.iter() {
        form = match value {
            FormValue::Text(text) => form.text(name.to_string(), text.clone()),
            FormValue::File(file) => {
                let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.content_type)
                    .map_err(|e| ApiError::Network(format!("bad content type: {e}")))?;
                form.part(name.to_string(), part)
            }
        };
    }
    Ok(form)
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let url = request.url(&self.base_url);
        let mut builder = self.client.request(method_of(request.method), &url);
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(fields) => builder.multipart(multipart_of(fields)?),
        };
        let resp = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("{} {url}: {e}", request.method)))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("reading body of {url}: {e}")))?;
        Ok(RawResponse::new(status, body))
    }
}

pub type TestClient = MarketClient<ReqwestTransport>;

pub fn connect(base_url: &str) -> TestClient {
    MarketClient::new(ReqwestTransport::new(base_url))
}

/// `POST /register` as JSON. The server logs the new user in on success.
pub fn register_request(username: &str, role: UserRole, county: &str) -> ApiRequest {
    ApiRequest::new(HttpMethod::Post, "/register").with_json(serde_json::json!({
        "username": username,
        "email": format!("{username}@example.test"),
        "password": username,
        "user_type": role.as_str(),
        "phone_number": "0700000000",
        "location": format!("{county} Town"),
        "county": county,
    }))
}

/// A username nobody has registered yet.
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}_{}", chrono::Utc::now().timestamp_millis())
}

/// A 1x1 PNG, enough for the upload path.
pub fn tiny_png() -> FilePart {
    const PNG: [u8; 67] = [
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
        0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ];
    FilePart {
        file_name: "crop.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: PNG.to_vec(),
    }
}

/// Add-crop form with sensible defaults for the named crop.
pub fn make_crop_form(name: &str, quantity: f64, price: f64) -> CropForm {
    CropForm {
        name: name.to_string(),
        category: "Vegetables".to_string(),
        quantity: quantity.to_string(),
        unit: "kg".to_string(),
        price_per_unit: price.to_string(),
        description: format!("Fresh {name}"),
        quality_grade: "A".to_string(),
        ..CropForm::default()
    }
}

pub fn make_order_form(crop: CropId, quantity: f64, delivery_date: &str) -> OrderForm {
    OrderForm {
        crop_id: Some(crop),
        quantity: quantity.to_string(),
        delivery_address: "Stall 12, Wakulima Market".to_string(),
        delivery_date: delivery_date.to_string(),
        notes: "Morning delivery please".to_string(),
    }
}

/// Re-run `check` once a second until it yields `Some`, or give up at
/// `timeout`.
pub async fn wait_for<T, F, Fut>(mut check: F, timeout: Duration) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(found) = check().await {
            return Some(found);
        }
        if Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
