use reqwest::StatusCode;
use serde_json::json;
use unitrack::api::response::{ensure_success, extract_error_message, parse_json};
use unitrack::api::ApiResponse;
use unitrack::UnitrackError;

fn response(status: u16, body: &str) -> ApiResponse {
    ApiResponse::new(StatusCode::from_u16(status).unwrap(), body.to_string())
}

#[test]
fn test_extract_detail() {
    let r = response(401, r#"{"detail": "Given token not valid for any token type"}"#);
    assert_eq!(
        extract_error_message(&r),
        "Given token not valid for any token type"
    );
}

#[test]
fn test_extract_error_field() {
    let r = response(404, r#"{"error": "Usuario no encontrado."}"#);
    assert_eq!(extract_error_message(&r), "Usuario no encontrado.");
}

#[test]
fn test_extract_non_field_errors() {
    let r = response(
        400,
        &json!({"non_field_errors": ["Contraseña incorrecta.", "Intente de nuevo."]}).to_string(),
    );
    assert_eq!(
        extract_error_message(&r),
        "Contraseña incorrecta. Intente de nuevo."
    );
}

#[test]
fn test_extract_bare_string_and_raw_text() {
    assert_eq!(extract_error_message(&response(400, r#""Bad input""#)), "Bad input");
    assert_eq!(
        extract_error_message(&response(502, "<html>Bad Gateway</html>")),
        "<html>Bad Gateway</html>"
    );
}

#[test]
fn test_extract_empty_body_uses_reason_phrase() {
    assert_eq!(extract_error_message(&response(403, "")), "Forbidden");
}

#[test]
fn test_ensure_success_maps_status() {
    assert!(ensure_success(response(204, "")).is_ok());

    match ensure_success(response(500, r#"{"detail": "boom"}"#)) {
        Err(UnitrackError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_parse_json_rejects_malformed_body() {
    let result: Result<Vec<serde_json::Value>, _> = parse_json(response(200, "not json"));
    assert!(matches!(result, Err(UnitrackError::JsonError(_))));
}
