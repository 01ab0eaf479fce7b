use crate::error::Result;
use bytes::Bytes;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// One outgoing HTTP request, built per call and never persisted
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedRequest {
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Bytes>,
}

impl AuthenticatedRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    /// Set a header, replacing any existing header with the same name
    /// regardless of case
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_string(), value.into());
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `payload` as the JSON body and set the content type
    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self> {
        let body = serde_json::to_vec(payload)?;
        Ok(self
            .header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
            .body(body))
    }

    /// Overwrite the `Authorization` header with a bearer credential.
    /// A missing token produces an empty bearer value.
    pub fn set_bearer(&mut self, token: Option<&str>) {
        self.set_header(
            AUTHORIZATION_HEADER,
            format!("Bearer {}", token.unwrap_or_default()),
        );
    }
}

/// A completed HTTP exchange as seen by callers
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let request = AuthenticatedRequest::get("http://localhost/api/materias/")
            .header("authorization", "Token abc")
            .header("Authorization", "Bearer xyz");

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header_value("AUTHORIZATION"), Some("Bearer xyz"));
    }

    #[test]
    fn test_set_bearer_without_token_is_empty() {
        let mut request = AuthenticatedRequest::get("http://localhost/api/grupos/");
        request.set_bearer(None);
        assert_eq!(request.header_value("Authorization"), Some("Bearer "));
    }

    #[test]
    fn test_json_sets_content_type() {
        let request = AuthenticatedRequest::post("http://localhost/api/materias/")
            .json(&serde_json::json!({"nombre": "Cálculo I"}))
            .unwrap();

        assert_eq!(request.header_value("content-type"), Some(JSON_CONTENT_TYPE));
        let body: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body["nombre"], "Cálculo I");
    }
}
