//! HTMX-specific assertion helpers for handler tests

use axum_test::TestResponse;
use serde_json::Value;

use crate::htmx::{HX_TRIGGER, SHOW_ALERT_EVENT};

/// Message of the alert raised through `HX-Trigger`, if any
///
/// # Panics
///
/// Panics if the header is present but not a JSON event map
pub fn alert_message(response: &TestResponse) -> Option<String> {
    let header = response.headers().get(HX_TRIGGER)?;
    let raw = header.to_str().expect("Invalid HX-Trigger header value");
    let events: Value = serde_json::from_str(raw).expect("HX-Trigger is not JSON");
    events[SHOW_ALERT_EVENT]["message"]
        .as_str()
        .map(ToString::to_string)
}

/// Assert that the response raises an alert containing `expected`
///
/// # Panics
///
/// Panics if no alert is raised or its message differs
pub fn assert_alert(response: &TestResponse, expected: &str) {
    let message = alert_message(response).expect("showAlert trigger not found");
    assert!(
        message.contains(expected),
        "Expected alert containing '{expected}', got '{message}'"
    );
}

/// Assert that the response raises no alert
///
/// # Panics
///
/// Panics if an alert is raised
pub fn assert_no_alert(response: &TestResponse) {
    if let Some(message) = alert_message(response) {
        panic!("Unexpected alert '{message}'");
    }
}

/// Assert that the response asks the browser to reload the page
///
/// # Panics
///
/// Panics if the header is missing or not `true`
pub fn assert_hx_refresh(response: &TestResponse) {
    let header = response
        .headers()
        .get("HX-Refresh")
        .expect("HX-Refresh header not found");
    let actual = header.to_str().expect("Invalid HX-Refresh header value");
    assert_eq!(actual, "true", "Expected HX-Refresh to be true, got {actual}");
}
