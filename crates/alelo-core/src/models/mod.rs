//! Data models for stored profiles.
//!
//! - `Profile`: a named local record, one per file in the home directory
//! - `Session`: identity and token returned by the Meu Alelo login endpoint

pub mod profile;

pub use profile::{Profile, Session};
