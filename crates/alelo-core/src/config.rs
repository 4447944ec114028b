//! Startup configuration.
//!
//! Three settings, each overridable through the environment:
//!
//! - `ALELO_HOME`: profile directory, default `~/.alelo`
//! - `ALELO_DEFAULT_PROFILE`: active profile, default the first stored one
//! - `ALELO_DEFAULT_CARD`: active card, no default
//!
//! Resolved once by the driver and passed by reference from there on.

use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};
use crate::store::ProfileStore;

pub const HOME_VAR: &str = "ALELO_HOME";
pub const DEFAULT_PROFILE_VAR: &str = "ALELO_DEFAULT_PROFILE";
pub const DEFAULT_CARD_VAR: &str = "ALELO_DEFAULT_CARD";

/// Directory under the user's home used when `ALELO_HOME` is unset
const HOME_DIR_NAME: &str = ".alelo";

/// Where a setting's effective value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Environment,
    Default,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub home_dir: PathBuf,
    pub default_profile: Option<String>,
    pub default_card: Option<String>,
    pub home_source: Source,
    pub profile_source: Source,
    pub card_source: Source,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` in place of the process environment. Empty
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let (home_dir, home_source) = match var(HOME_VAR) {
            Some(home) => (PathBuf::from(home), Source::Environment),
            None => {
                let user_home = dirs::home_dir().ok_or(Error::HomeDirUnavailable)?;
                (user_home.join(HOME_DIR_NAME), Source::Default)
            }
        };

        std::fs::create_dir_all(&home_dir).map_err(|e| Error::io(&home_dir, e))?;
        debug!(?home_dir, ?home_source, "Home directory configured");

        let (default_profile, profile_source) = match var(DEFAULT_PROFILE_VAR) {
            Some(profile) => (Some(profile.trim().to_string()), Source::Environment),
            None => {
                let first = ProfileStore::new(&home_dir).list_names()?.into_iter().next();
                (first, Source::Default)
            }
        };

        let (default_card, card_source) = match var(DEFAULT_CARD_VAR) {
            Some(card) => (Some(card), Source::Environment),
            None => (None, Source::Default),
        };

        debug!(?default_profile, ?default_card, "Defaults resolved");
        Ok(Self {
            home_dir,
            default_profile,
            default_card,
            home_source,
            profile_source,
            card_source,
        })
    }

    pub fn store(&self) -> ProfileStore {
        ProfileStore::new(&self.home_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn resolve(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_home_override_is_created() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("nested").join("alelo");

        let config = resolve(&[(HOME_VAR, home.to_str().unwrap())]);
        assert_eq!(config.home_dir, home);
        assert_eq!(config.home_source, Source::Environment);
        assert!(home.is_dir());

        // Second resolution against an existing directory is fine
        resolve(&[(HOME_VAR, home.to_str().unwrap())]);
    }

    #[test]
    fn test_default_profile_falls_back_to_first_stored() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        store.create("zeta").unwrap();
        store.create("alpha").unwrap();

        let config = resolve(&[(HOME_VAR, dir.path().to_str().unwrap())]);
        assert_eq!(config.default_profile.as_deref(), Some("alpha"));
        assert_eq!(config.profile_source, Source::Default);
    }

    #[test]
    fn test_default_profile_empty_store() {
        let dir = TempDir::new().unwrap();
        let config = resolve(&[(HOME_VAR, dir.path().to_str().unwrap())]);
        assert_eq!(config.default_profile, None);
        assert_eq!(config.default_card, None);
        assert_eq!(config.card_source, Source::Default);
    }

    #[test]
    fn test_overrides_win() {
        let dir = TempDir::new().unwrap();
        ProfileStore::new(dir.path()).create("alpha").unwrap();

        let config = resolve(&[
            (HOME_VAR, dir.path().to_str().unwrap()),
            (DEFAULT_PROFILE_VAR, "work"),
            (DEFAULT_CARD_VAR, "card-1"),
        ]);
        assert_eq!(config.default_profile.as_deref(), Some("work"));
        assert_eq!(config.profile_source, Source::Environment);
        assert_eq!(config.default_card.as_deref(), Some("card-1"));
        assert_eq!(config.card_source, Source::Environment);
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let dir = TempDir::new().unwrap();
        ProfileStore::new(dir.path()).create("alpha").unwrap();

        let config = resolve(&[
            (HOME_VAR, dir.path().to_str().unwrap()),
            (DEFAULT_PROFILE_VAR, ""),
            (DEFAULT_CARD_VAR, "  "),
        ]);
        assert_eq!(config.default_profile.as_deref(), Some("alpha"));
        assert_eq!(config.default_card, None);
    }
}
