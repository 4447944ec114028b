//! File-backed profile storage.
//!
//! Each profile lives in `<home>/<name>.json`. The directory listing is the
//! index: there is no separate catalogue file.

pub mod profiles;

pub use profiles::ProfileStore;
