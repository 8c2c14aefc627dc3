//! Browser `fetch` transport for the marketplace API.
//!
//! Every request is sent with credentials so the server's session cookie
//! travels along. Status and body interpretation is left to
//! [`MarketClient`]; only failures to complete the exchange are reported
//! here.

use dioxus::prelude::*;

use agrimarket_common::api::{ApiError, ApiRequest, RawResponse, Transport};
use agrimarket_common::client::MarketClient;

use super::config::api_base;

#[derive(Clone, Debug, PartialEq)]
pub struct FetchTransport {
    base_url: String,
}

impl FetchTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Transport pointed at the configured API origin.
    pub fn from_env() -> Self {
        Self::new(api_base())
    }
}

impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let url = request.url(&self.base_url);
        fetch(&url, request).await
    }
}

pub type Market = MarketClient<FetchTransport>;

/// The client provided at the top of the app.
pub fn use_market() -> Market {
    use_context::<Market>()
}

#[cfg(target_family = "wasm")]
async fn fetch(url: &str, request: ApiRequest) -> Result<RawResponse, ApiError> {
    use agrimarket_common::api::RequestBody;
    use agrimarket_common::form::FormValue;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let net = |what: &str, e: wasm_bindgen::JsValue| ApiError::Network(format!("{what}: {e:?}"));

    let opts = web_sys::RequestInit::new();
    opts.set_method(request.method.as_str());
    opts.set_mode(web_sys::RequestMode::Cors);
    opts.set_credentials(web_sys::RequestCredentials::Include);

    let mut json = false;
    match &request.body {
        RequestBody::Empty => {}
        RequestBody::Json(value) => {
            let body = serde_json::to_string(value)
                .map_err(|e| ApiError::Network(format!("Failed to encode body: {e}")))?;
            opts.set_body(&wasm_bindgen::JsValue::from_str(&body));
            json = true;
        }
        RequestBody::Multipart(fields) => {
            let form = web_sys::FormData::new().map_err(|e| net("Failed to create form", e))?;
            for (name, value) in fields.iter() {
                let appended = match value {
                    FormValue::Text(text) => form.append_with_str(name, text),
                    FormValue::File(file) => {
                        let array = js_sys::Uint8Array::from(file.bytes.as_slice());
                        let parts = js_sys::Array::of1(&array);
                        let props = web_sys::BlobPropertyBag::new();
                        props.set_type(&file.content_type);
                        let blob =
                            web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &props)
                                .map_err(|e| net("Failed to wrap file", e))?;
                        form.append_with_blob_and_filename(name, &blob, &file.file_name)
                    }
                };
                appended.map_err(|e| net("Failed to append form field", e))?;
            }
            opts.set_body(&form);
        }
    }

    let req = web_sys::Request::new_with_str_and_init(url, &opts)
        .map_err(|e| net("Failed to create request", e))?;

    if json {
        req.headers()
            .set("Content-Type", "application/json")
            .map_err(|e| net("Failed to set header", e))?;
    }

    let window = web_sys::window().ok_or_else(|| ApiError::Network("No window".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(|e| net("Fetch failed", e))?;

    let resp: web_sys::Response = resp_value
        .dyn_into()
        .map_err(|_| ApiError::Network("Response is not a Response object".into()))?;

    let text = JsFuture::from(resp.text().map_err(|e| net("Failed to get text", e))?)
        .await
        .map_err(|e| net("Failed to read body", e))?;

    let body = text
        .as_string()
        .ok_or_else(|| ApiError::Network("Response body is not a string".into()))?;

    Ok(RawResponse::new(resp.status(), body))
}

// Non-WASM stub for type checking
#[cfg(not(target_family = "wasm"))]
async fn fetch(_url: &str, _request: ApiRequest) -> Result<RawResponse, ApiError> {
    Err(ApiError::Network("fetch only available in WASM".into()))
}
