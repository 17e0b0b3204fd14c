//! HTMX response helpers
//!
//! Builds on `axum-htmx` for request detection and adds the alert channel
//! the UI uses for blocking messages: an `HX-Trigger` header carrying a
//! `showAlert` event that the layout script turns into `window.alert`.

use axum::{
    http::{HeaderName, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};
use std::convert::Infallible;

// Re-export axum-htmx request extractors
pub use axum_htmx::{HxRefresh, HxRequest};

/// Header used to fire client-side events
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

/// Event name the layout script listens for
pub const SHOW_ALERT_EVENT: &str = "showAlert";

/// Response part that raises a browser alert
///
/// # Example
///
/// ```rust
/// use axum::response::{Html, IntoResponse};
/// use promptdeck::htmx::AlertTrigger;
///
/// let response = (AlertTrigger::new("Save failed, please retry"), Html("")).into_response();
/// assert!(response.headers().contains_key("hx-trigger"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertTrigger {
    message: String,
}

impl AlertTrigger {
    /// Alert carrying `message`
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    /// The alert text
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Header value: `{"showAlert":{"message":"..."}}`
    ///
    /// Non-ASCII characters are written as `\u` escapes, header values being
    /// restricted to visible ASCII.
    #[must_use]
    pub fn header_value(&self) -> HeaderValue {
        let payload = serde_json::json!({ SHOW_ALERT_EVENT: { "message": self.message } });
        let encoded = ascii_json(&payload.to_string());
        HeaderValue::from_str(&encoded)
            .unwrap_or_else(|_| HeaderValue::from_static(r#"{"showAlert":{"message":"Error"}}"#))
    }
}

impl IntoResponseParts for AlertTrigger {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.headers_mut().insert(HX_TRIGGER, self.header_value());
        Ok(res)
    }
}

/// Escape every non-ASCII character of serialized JSON as `\uXXXX`
///
/// Non-ASCII characters only ever occur inside JSON strings, where the
/// escaped form is equivalent.
fn ascii_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for ch in json.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
        } else {
            let mut units = [0_u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    escaped
}
