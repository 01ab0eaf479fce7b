use super::request::{ApiResponse, AuthenticatedRequest};
use crate::error::{Result, UnitrackError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Sends a fully prepared request and returns whatever the server answered.
///
/// A transport never interprets status codes; only network-level failures are
/// reported as errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &AuthenticatedRequest) -> Result<ApiResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn build_headers(request: &AuthenticatedRequest) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &request.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| UnitrackError::InvalidInput(format!("Invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| UnitrackError::InvalidInput(format!("Invalid header value for {}: {}", name, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &AuthenticatedRequest) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(build_headers(request)?);

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_headers_rejects_invalid_value() {
        let request = AuthenticatedRequest::get("http://localhost:8000/api/materias/")
            .header("X-Note", "line\nbreak");
        assert!(build_headers(&request).is_err());
    }

    #[test]
    fn test_build_headers_keeps_empty_bearer() {
        let mut request = AuthenticatedRequest::get("http://localhost:8000/api/materias/");
        request.set_bearer(None);
        let headers = build_headers(&request).unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "Bearer ");
    }
}
