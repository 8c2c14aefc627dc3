//! Wire-level request and response types shared by every transport.
//!
//! A view describes what it wants as an [`ApiRequest`]; a [`Transport`]
//! turns that into an HTTP exchange (browser `fetch` in the UI, `reqwest`
//! in the live tests) and hands back a [`RawResponse`].

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::form::FormFields;

/// HTTP verbs used by the marketplace API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(FormFields),
}

/// One HTTP request against the marketplace API, independent of transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_multipart(mut self, fields: FormFields) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    /// Path plus the urlencoded query string, if any.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }

    /// Absolute (or same-origin when `base` is empty) request URL.
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path_and_query())
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body text of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with [`ApiError::Http`] unless the status is 2xx.
    pub fn ensure_ok(self) -> Result<Self, ApiError> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(ApiError::Http {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Envelope of every mutating endpoint: `success`, optional `message` and
/// `redirect`, plus endpoint-specific payload fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionResponse<T = serde_json::Map<String, serde_json::Value>> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> ActionResponse<T> {
    /// Server message, or `fallback` when the server sent none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Everything that can go wrong between issuing a request and having a
/// usable payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never completed (offline, DNS, CORS, aborted).
    Network(String),
    /// The server answered with a non-2xx status.
    Http { status: u16, body: String },
    /// The body was not the JSON we expected.
    Decode(String),
    /// The server answered `success: false`.
    Rejected { message: Option<String> },
}

impl ApiError {
    /// True for "server reported failure"; false for "request failed".
    pub fn is_rejected(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    /// Text for a toast: the server's own message when it rejected the
    /// request, `fallback` otherwise.
    pub fn toast_text(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
            } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http { status, body } => {
                let snippet: String = body.chars().take(120).collect();
                write!(f, "HTTP {status}: {snippet}")
            }
            Self::Decode(msg) => write!(f, "malformed response: {msg}"),
            Self::Rejected { message: Some(m) } => write!(f, "rejected by server: {m}"),
            Self::Rejected { message: None } => write!(f, "rejected by server"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Something that can execute an [`ApiRequest`].
///
/// Implementations only report [`ApiError::Network`]; status and body
/// interpretation happens in [`crate::client::MarketClient`].
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_query_like_url_search_params() {
        let req = ApiRequest::get("/api/crops")
            .with_query("category", "Herbs & Spices")
            .with_query("search", "sweet potato");
        assert_eq!(
            req.path_and_query(),
            "/api/crops?category=Herbs+%26+Spices&search=sweet+potato"
        );
        assert_eq!(
            req.url("https://market.example/"),
            "https://market.example/api/crops?category=Herbs+%26+Spices&search=sweet+potato"
        );
    }

    #[test]
    fn url_without_query_or_base() {
        let req = ApiRequest::get("/api/orders");
        assert_eq!(req.url(""), "/api/orders");
    }

    #[test]
    fn action_response_keeps_payload_fields() {
        let resp: ActionResponse = serde_json::from_str(
            r#"{"success": true, "order_id": 7, "message": "Order placed successfully"}"#,
        )
        .unwrap();
        assert!(resp.success);
        assert_eq!(resp.payload.get("order_id"), Some(&serde_json::json!(7)));
        assert_eq!(resp.message_or("x"), "Order placed successfully");
        assert_eq!(resp.redirect, None);
    }

    #[test]
    fn action_response_defaults_to_failure() {
        let resp: ActionResponse = serde_json::from_str(r#"{"error": "Crop not found"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message_or("An error occurred"), "An error occurred");
    }

    #[test]
    fn toast_text_prefers_server_message_only_for_rejections() {
        let rejected = ApiError::Rejected {
            message: Some("Access denied".into()),
        };
        assert!(rejected.is_rejected());
        assert_eq!(rejected.toast_text("Failed"), "Access denied");

        let silent = ApiError::Rejected { message: None };
        assert_eq!(silent.toast_text("Failed"), "Failed");

        let net = ApiError::Network("offline".into());
        assert!(!net.is_rejected());
        assert_eq!(net.toast_text("Failed"), "Failed");
    }

    #[test]
    fn ensure_ok_maps_status() {
        assert!(RawResponse::new(204, "").ensure_ok().is_ok());
        let err = RawResponse::new(404, "nope").ensure_ok().unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 404,
                body: "nope".into()
            }
        );
    }
}
