//! StayNest HTTP client
//!
//! A typed wrapper over the booking REST API. Every call goes through one
//! interceptor that attaches the stored bearer token and, when the backend
//! answers 401, refreshes the token once and replays the request.

pub mod client;
pub mod types;

pub use client::{
    ClientConfig, LoginRedirect, NoRedirect, StayNestClient, StayNestClientBuilder,
    error::ClientError,
};
