//! Core library for the Alelo CLI.
//!
//! Profiles are stored one JSON document per file under the home directory
//! (`ALELO_HOME`, default `~/.alelo`). Authenticating a profile runs one login
//! round-trip against Meu Alelo and stores the returned session on it.
//!
//! - `config`: environment-driven startup settings
//! - `store`: `ProfileStore`, CRUD over profile files
//! - `auth`: gateway token and the `AuthenticationFlow`
//! - `api`: reqwest login client

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use error::{Error, Result};
