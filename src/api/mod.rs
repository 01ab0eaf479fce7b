pub mod client;
pub mod request;
pub mod resources;
pub mod response;
pub mod transport;

pub use client::{
    AuthenticatedClient, RefreshFailure, RefreshObserver, RefreshOutcome, DEFAULT_REFRESH_PATH,
};
pub use request::{ApiResponse, AuthenticatedRequest};
pub use resources::{Snapshot, UnitrackApi};
pub use transport::{ReqwestTransport, Transport};
