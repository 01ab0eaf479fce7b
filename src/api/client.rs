use super::request::{ApiResponse, AuthenticatedRequest, JSON_CONTENT_TYPE, CONTENT_TYPE_HEADER};
use super::transport::Transport;
use crate::error::Result;
use crate::models::{RefreshRequest, RefreshResponse};
use crate::session::{SessionStore, ACCESS_TOKEN_KEY};
use reqwest::StatusCode;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_REFRESH_PATH: &str = "/api/token/refresh/";

/// Decides whether a response means the access token has expired
pub type AuthExpiredFn = dyn Fn(&ApiResponse) -> bool + Send + Sync;

/// Why a token refresh produced no new access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    /// No refresh token in the session store; nothing was sent
    Unavailable,
    /// The refresh endpoint answered with a non-success status
    Rejected { status: u16 },
    /// The refresh endpoint succeeded but carried no usable access token
    Malformed,
    /// The refresh call never completed
    Transport(String),
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshFailure::Unavailable => write!(f, "no refresh token available"),
            RefreshFailure::Rejected { status } => {
                write!(f, "refresh rejected (status {})", status)
            }
            RefreshFailure::Malformed => write!(f, "refresh response carried no access token"),
            RefreshFailure::Transport(msg) => write!(f, "refresh request failed: {}", msg),
        }
    }
}

/// What a refresh attempt made of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new access token was obtained and stored
    Refreshed,
    /// A new access token was obtained but the store rejected it; it is still
    /// used for the resend
    RefreshedUnsaved { reason: String },
    Failed(RefreshFailure),
}

/// Notified after every refresh attempt
pub type RefreshObserver = dyn Fn(&RefreshOutcome) + Send + Sync;

/// Dispatches requests with a bearer token, refreshing an expired token once
/// and resending the original request once.
///
/// The client keeps no per-request state, so a single instance can serve any
/// number of concurrent dispatches. Session state lives entirely in the
/// injected store.
#[derive(Clone)]
pub struct AuthenticatedClient {
    base_url: String,
    refresh_path: String,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    auth_expired: Arc<AuthExpiredFn>,
    observer: Option<Arc<RefreshObserver>>,
}

impl AuthenticatedClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            transport,
            store,
            auth_expired: Arc::new(|response: &ApiResponse| {
                response.status == StatusCode::UNAUTHORIZED
            }),
            observer: None,
        }
    }

    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Replace the predicate that triggers the refresh path (default: status 401)
    pub fn with_auth_expired<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ApiResponse) -> bool + Send + Sync + 'static,
    {
        self.auth_expired = Arc::new(predicate);
        self
    }

    /// Observe refresh attempts without changing what `dispatch` returns
    pub fn with_refresh_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&RefreshOutcome) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Absolute URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one logical request.
    ///
    /// Any caller-supplied `Authorization` header is overwritten. When the
    /// first response is auth-expired and a refresh succeeds, the request is
    /// resent exactly once with the new token and that response is returned
    /// whatever its status. When the refresh fails the first response is
    /// returned unchanged. Transport errors are never retried.
    pub async fn dispatch(&self, mut request: AuthenticatedRequest) -> Result<ApiResponse> {
        request.set_bearer(self.store.access_token().as_deref());
        let response = self.transport.send(&request).await?;

        if !(self.auth_expired)(&response) {
            return Ok(response);
        }

        match self.refresh().await {
            Some(token) => {
                request.set_bearer(Some(&token));
                self.transport.send(&request).await
            }
            None => Ok(response),
        }
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Returns `None` on any failure, in which case the store is left untouched.
    pub async fn refresh(&self) -> Option<String> {
        self.try_refresh().await.ok()
    }

    /// Same as [`refresh`](Self::refresh) with the failure classified
    pub async fn try_refresh(&self) -> std::result::Result<String, RefreshFailure> {
        let (access, outcome) = match self.exchange_refresh_token().await {
            Ok(refreshed) => refreshed,
            Err(failure) => {
                self.notify(&RefreshOutcome::Failed(failure.clone()));
                return Err(failure);
            }
        };
        self.notify(&outcome);
        Ok(access)
    }

    async fn exchange_refresh_token(
        &self,
    ) -> std::result::Result<(String, RefreshOutcome), RefreshFailure> {
        let refresh_token = self
            .store
            .refresh_token()
            .ok_or(RefreshFailure::Unavailable)?;

        let request = AuthenticatedRequest::post(self.endpoint(&self.refresh_path))
            .header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
            .body(
                serde_json::to_vec(&RefreshRequest {
                    refresh: refresh_token,
                })
                .map_err(|_| RefreshFailure::Malformed)?,
            );

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| RefreshFailure::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(RefreshFailure::Rejected {
                status: response.status.as_u16(),
            });
        }

        let access = response
            .json::<RefreshResponse>()
            .ok()
            .map(|payload| payload.access)
            .filter(|access| !access.is_empty())
            .ok_or(RefreshFailure::Malformed)?;

        // The token is valid for the resend even if it could not be persisted
        let outcome = match self.store.set(ACCESS_TOKEN_KEY, &access) {
            Ok(()) => RefreshOutcome::Refreshed,
            Err(e) => RefreshOutcome::RefreshedUnsaved {
                reason: e.to_string(),
            },
        };
        Ok((access, outcome))
    }

    fn notify(&self, outcome: &RefreshOutcome) {
        if let Some(observer) = &self.observer {
            observer(outcome);
        }
    }
}
