//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );

    // Check Content-Type header
    assert_eq!(
        response.header("content-type"),
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
}

/// Assert a JSON error body with the given status and error kind
pub fn assert_json_error(response: &TestResponse, expected: StatusCode, kind: Option<&str>) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();

    assert_eq!(
        json["status"].as_u64(),
        Some(expected.as_u16() as u64),
        "Full response: {}",
        serde_json::to_string_pretty(&json).unwrap()
    );
    assert!(json["error"].is_string(), "Expected error message");
    assert_eq!(json["kind"].as_str(), kind);
}

/// Assert a pixel matches exactly
pub fn assert_pixel(image: &image::RgbaImage, x: u32, y: u32, expected: [u8; 4]) {
    assert_eq!(
        image.get_pixel(x, y).0,
        expected,
        "Pixel ({x}, {y}) mismatch"
    );
}
