//! HTTP client for the Meu Alelo web API.
//!
//! Only the login call is implemented. Requests carry a gateway token in the
//! `X-api-key` header (see `auth::GatewayTokenGenerator`); the session token
//! returned by login is stored on the profile.

pub mod client;

pub use client::{ApiClient, LoginReply, LoginRequest, LoginTransport};
