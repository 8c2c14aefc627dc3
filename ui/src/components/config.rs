use std::time::Duration;

use agrimarket_common::timing::poll_interval_from;
pub use agrimarket_common::timing::{SEARCH_DEBOUNCE, TOAST_DURATION, TOAST_SWEEP};

use super::browser::query_param;

/// API origin. Same-origin by default; overridable at compile time via
/// `AGRIMARKET_API_URL`, or at runtime via `?api=<url>`.
pub fn api_base() -> String {
    if let Some(url) = query_param("api").filter(|u| !u.is_empty()) {
        return url;
    }
    option_env!("AGRIMARKET_API_URL")
        .unwrap_or_default()
        .to_string()
}

/// Message poll period, overridable via `AGRIMARKET_POLL_SECS`.
pub fn poll_interval() -> Duration {
    poll_interval_from(option_env!("AGRIMARKET_POLL_SECS"))
}
