//! Client library and CLI plumbing for the UniTrack attendance API.
//!
//! The heart of the crate is [`api::AuthenticatedClient`], which sends every
//! request with the stored bearer token and, when the server reports the token
//! as expired, refreshes it once and resends the request once.

pub mod api;
pub mod attendance;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod summary;
pub mod ui;

pub use error::{Result, UnitrackError};
