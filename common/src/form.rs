//! Submission handling for marked forms.
//!
//! Only forms whose class list contains [`AJAX_FORM_CLASS`] are taken over
//! by the client; anything else is left to the browser. A taken-over form
//! becomes exactly one [`ApiRequest`]: multipart for POST forms declared
//! `multipart/form-data`, JSON otherwise.

use std::fmt;

use serde_json::{Map, Value};

use crate::api::{ActionResponse, ApiError, ApiRequest, HttpMethod};

/// Marker class of forms the client submits itself.
pub const AJAX_FORM_CLASS: &str = "ajax-form";

pub const MULTIPART_ENCTYPE: &str = "multipart/form-data";

pub const DEFAULT_SUCCESS_TEXT: &str = "Success!";
pub const DEFAULT_FAILURE_TEXT: &str = "An error occurred";
pub const NETWORK_FAILURE_TEXT: &str = "Network error. Please try again.";

/// A file chosen in a file input, ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(FilePart),
}

/// Ordered form entries, as `FormData` would enumerate them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, FormValue)>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), FormValue::Text(value.into())));
    }

    pub fn push_file(&mut self, name: impl Into<String>, file: FilePart) {
        self.0.push((name.into(), FormValue::File(file)));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Text value of the last entry named `name`.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.0.iter().rev().find_map(|(k, v)| match v {
            FormValue::Text(t) if k == name => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object of the text entries. Later duplicates overwrite earlier
    /// ones; file entries are not representable and are skipped.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.0 {
            if let FormValue::Text(text) = value {
                map.insert(name.clone(), Value::String(text.clone()));
            }
        }
        Value::Object(map)
    }
}

/// Per-field validation messages, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field`, replacing an earlier message for it.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.0.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = message,
            None => self.0.push((field, message)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// How a taken-over form serializes its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEncoding {
    Json,
    Multipart,
}

/// The attributes of a `<form>` that decide how it is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDescriptor {
    pub class: String,
    pub action: String,
    pub method: HttpMethod,
    pub enctype: String,
}

impl FormDescriptor {
    /// A plain form; the client leaves it alone.
    pub fn new(action: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            class: String::new(),
            action: action.into(),
            method,
            enctype: String::new(),
        }
    }

    /// A form carrying the marker class.
    pub fn ajax(action: impl Into<String>, method: HttpMethod) -> Self {
        Self::new(action, method).with_class(AJAX_FORM_CLASS)
    }

    pub fn with_class(mut self, class: &str) -> Self {
        if !self.class.is_empty() {
            self.class.push(' ');
        }
        self.class.push_str(class);
        self
    }

    pub fn multipart(mut self) -> Self {
        self.enctype = MULTIPART_ENCTYPE.to_string();
        self
    }

    pub fn is_intercepted(&self) -> bool {
        self.class.split_whitespace().any(|c| c == AJAX_FORM_CLASS)
    }

    pub fn encoding(&self) -> FormEncoding {
        if self.method == HttpMethod::Post
            && self.enctype.trim().eq_ignore_ascii_case(MULTIPART_ENCTYPE)
        {
            FormEncoding::Multipart
        } else {
            FormEncoding::Json
        }
    }

    /// The single request a submit of this form issues, or `None` when the
    /// form is not marked and the browser should submit it natively.
    ///
    /// GET forms carry their text entries as query parameters.
    pub fn submission(&self, fields: FormFields) -> Option<ApiRequest> {
        if !self.is_intercepted() {
            return None;
        }
        let request = ApiRequest::new(self.method, self.action.clone());
        let request = match (self.method, self.encoding()) {
            (HttpMethod::Get, _) => fields.iter().fold(request, |req, (name, value)| match value {
                FormValue::Text(text) => req.with_query(name, text.as_str()),
                FormValue::File(_) => req,
            }),
            (_, FormEncoding::Multipart) => request.with_multipart(fields),
            (_, FormEncoding::Json) => request.with_json(fields.to_json()),
        };
        Some(request)
    }
}

/// What the UI does once a taken-over submit has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Toast `message`, then navigate away.
    Redirect { message: String, url: String },
    /// Toast `message`, reset the form, close its modal, refresh data.
    Completed { message: String },
    /// Toast `message` as an error; the form keeps its contents.
    Failed { message: String },
}

impl SubmitOutcome {
    pub fn from_result(result: Result<ActionResponse, ApiError>) -> Self {
        match result {
            Ok(resp) if resp.success => {
                let message = resp.message_or(DEFAULT_SUCCESS_TEXT);
                match resp.redirect.filter(|u| !u.is_empty()) {
                    Some(url) => SubmitOutcome::Redirect { message, url },
                    None => SubmitOutcome::Completed { message },
                }
            }
            Ok(resp) => SubmitOutcome::Failed {
                message: resp.message_or(DEFAULT_FAILURE_TEXT),
            },
            Err(err) if err.is_rejected() => SubmitOutcome::Failed {
                message: err.toast_text(DEFAULT_FAILURE_TEXT),
            },
            Err(_) => SubmitOutcome::Failed {
                message: NETWORK_FAILURE_TEXT.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, SubmitOutcome::Failed { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            SubmitOutcome::Redirect { message, .. }
            | SubmitOutcome::Completed { message }
            | SubmitOutcome::Failed { message } => message,
        }
    }
}

/// Parse a positive, finite number from a form input.
pub fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestBody;

    fn login_fields() -> FormFields {
        FormFields::new()
            .text("username", "wanjiku")
            .text("password", "secret")
    }

    #[test]
    fn unmarked_forms_are_left_alone() {
        let form = FormDescriptor::new("/login", HttpMethod::Post).with_class("needs-validation");
        assert!(!form.is_intercepted());
        assert_eq!(form.submission(login_fields()), None);
    }

    #[test]
    fn marker_must_be_a_whole_class() {
        let lookalike =
            FormDescriptor::new("/login", HttpMethod::Post).with_class("ajax-form-legacy");
        assert!(!lookalike.is_intercepted());

        let marked = FormDescriptor::new("/login", HttpMethod::Post)
            .with_class("card")
            .with_class(AJAX_FORM_CLASS);
        assert!(marked.is_intercepted());
    }

    #[test]
    fn marked_form_submits_json() {
        let req = FormDescriptor::ajax("/login", HttpMethod::Post)
            .submission(login_fields())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/login");
        assert_eq!(
            req.body,
            RequestBody::Json(serde_json::json!({"username": "wanjiku", "password": "secret"}))
        );
    }

    #[test]
    fn multipart_only_for_post() {
        let post = FormDescriptor::ajax("/api/crops", HttpMethod::Post).multipart();
        assert_eq!(post.encoding(), FormEncoding::Multipart);
        let req = post.submission(login_fields()).unwrap();
        assert!(matches!(req.body, RequestBody::Multipart(ref f) if f.len() == 2));

        let put = FormDescriptor::ajax("/api/crops", HttpMethod::Put).multipart();
        assert_eq!(put.encoding(), FormEncoding::Json);
    }

    #[test]
    fn get_form_uses_query() {
        let req = FormDescriptor::ajax("/search", HttpMethod::Get)
            .submission(FormFields::new().text("q", "maize"))
            .unwrap();
        assert_eq!(req.path_and_query(), "/search?q=maize");
        assert_eq!(req.body, RequestBody::Empty);
    }

    #[test]
    fn json_skips_files_and_keeps_last_duplicate() {
        let mut fields = FormFields::new().text("a", "1").text("a", "2");
        fields.push_file(
            "image",
            FilePart {
                file_name: "x.png".into(),
                content_type: "image/png".into(),
                bytes: vec![1, 2, 3],
            },
        );
        assert_eq!(fields.to_json(), serde_json::json!({"a": "2"}));
        assert_eq!(fields.get_text("a"), Some("2"));
        assert_eq!(fields.get_text("image"), None);
    }

    #[test]
    fn outcome_redirects_when_told() {
        let resp: ActionResponse =
            serde_json::from_str(r#"{"success": true, "redirect": "/buyer/dashboard"}"#).unwrap();
        assert_eq!(
            SubmitOutcome::from_result(Ok(resp)),
            SubmitOutcome::Redirect {
                message: DEFAULT_SUCCESS_TEXT.into(),
                url: "/buyer/dashboard".into()
            }
        );
    }

    #[test]
    fn outcome_completes_with_server_message() {
        let resp: ActionResponse =
            serde_json::from_str(r#"{"success": true, "message": "Crop added successfully"}"#)
                .unwrap();
        let outcome = SubmitOutcome::from_result(Ok(resp));
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "Crop added successfully");
    }

    #[test]
    fn outcome_failures() {
        let rejected = SubmitOutcome::from_result(Err(ApiError::Rejected {
            message: Some("Invalid username or password".into()),
        }));
        assert_eq!(rejected.message(), "Invalid username or password");
        assert!(!rejected.is_success());

        let silent = SubmitOutcome::from_result(Err(ApiError::Rejected { message: None }));
        assert_eq!(silent.message(), DEFAULT_FAILURE_TEXT);

        let network = SubmitOutcome::from_result(Err(ApiError::Network("offline".into())));
        assert_eq!(network.message(), NETWORK_FAILURE_TEXT);

        let decode = SubmitOutcome::from_result(Err(ApiError::Decode("eof".into())));
        assert_eq!(decode.message(), NETWORK_FAILURE_TEXT);
    }

    #[test]
    fn field_errors_replace_per_field() {
        let mut errors = FieldErrors::new();
        errors.insert("quantity", "Quantity is required");
        errors.insert("unit", "Unit is required");
        errors.insert("quantity", "Quantity must be a positive number");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("quantity"), Some("Quantity must be a positive number"));
        assert_eq!(
            errors.to_string(),
            "Quantity must be a positive number; Unit is required"
        );
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn positive_numbers() {
        assert_eq!(parse_positive(" 2.5 "), Some(2.5));
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("-1"), None);
        assert_eq!(parse_positive("abc"), None);
        assert_eq!(parse_positive("inf"), None);
        assert_eq!(parse_positive(""), None);
    }
}
