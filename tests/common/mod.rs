#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use unitrack::api::{ApiResponse, AuthenticatedClient, AuthenticatedRequest, Transport};
use unitrack::session::{MemorySessionStore, SessionStore};
use unitrack::{Result, UnitrackError};

pub const BASE_URL: &str = "http://api.test";

/// What the scripted transport does with the next request
pub enum Reply {
    Respond(ApiResponse),
    Fail(String),
}

/// Transport that records every request and replays queued replies in order
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    sent: Mutex<Vec<AuthenticatedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn respond(&self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap();
        self.push(Reply::Respond(ApiResponse::new(status, body.to_string())));
    }

    pub fn respond_empty(&self, status: u16) {
        let status = StatusCode::from_u16(status).unwrap();
        self.push(Reply::Respond(ApiResponse::new(status, Vec::new())));
    }

    pub fn fail(&self, message: &str) {
        self.push(Reply::Fail(message.to_string()));
    }

    pub fn sent(&self) -> Vec<AuthenticatedRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, path: &str) -> Vec<AuthenticatedRequest> {
        let url = format!("{}{}", BASE_URL, path);
        self.sent().into_iter().filter(|r| r.url == url).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &AuthenticatedRequest) -> Result<ApiResponse> {
        self.sent.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply for {} {}", request.method, request.url));
        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(message) => Err(UnitrackError::Other(message)),
        }
    }
}

pub fn store_with(access: Option<&str>, refresh: Option<&str>) -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_tokens(access, refresh))
}

pub fn client_with(
    transport: &Arc<ScriptedTransport>,
    store: &Arc<MemorySessionStore>,
) -> AuthenticatedClient {
    let store: Arc<dyn SessionStore> = store.clone();
    AuthenticatedClient::new(BASE_URL, transport.clone(), store)
}

pub fn bearer(request: &AuthenticatedRequest) -> Option<&str> {
    request.header_value("Authorization")
}

pub fn body_json(request: &AuthenticatedRequest) -> Value {
    serde_json::from_slice(request.body.as_ref().expect("request has a body")).unwrap()
}
