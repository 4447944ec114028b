use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::Profile;

/// Extension that marks a file in the home directory as a profile
const PROFILE_EXTENSION: &str = "json";

/// Suffix for the scratch file written before the atomic rename in `save`.
/// Not matched by enumeration since the extension is no longer `json`.
const TEMP_SUFFIX: &str = "json.tmp";

pub struct ProfileStore {
    home_dir: PathBuf,
}

impl ProfileStore {
    /// The home directory must already exist; `Config::from_env` creates it.
    pub fn new(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
        }
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.home_dir.join(format!("{}.{}", name, PROFILE_EXTENSION))
    }

    /// Trim a user-supplied name and reject anything that is not a plain
    /// filename stem.
    fn normalize_name(name: &str) -> Result<&str> {
        let name = name.trim();
        if name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\'])
        {
            return Err(Error::InvalidName(name.to_string()));
        }
        Ok(name)
    }

    /// Names of all stored profiles, sorted.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.home_dir).map_err(|e| Error::io(&self.home_dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&self.home_dir, e))?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(PROFILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            // Only list names the other operations can address
            if Self::normalize_name(stem).ok() != Some(stem) {
                debug!(file = ?path, "Skipping file with unusable profile name");
                continue;
            }
            names.push(stem.to_string());
        }

        names.sort();
        debug!(count = names.len(), home = ?self.home_dir, "Enumerated profiles");
        Ok(names)
    }

    pub fn contains(&self, name: &str) -> bool {
        match Self::normalize_name(name) {
            Ok(name) => self.profile_path(name).is_file(),
            Err(_) => false,
        }
    }

    /// Create a profile with an empty session.
    pub fn create(&self, name: &str) -> Result<Profile> {
        let name = Self::normalize_name(name)?;
        let path = self.profile_path(name);
        let profile = Profile::new(name);
        let contents = serde_json::to_string_pretty(&profile)
            .map_err(|e| Error::io(&path, e.into()))?;

        // create_new closes the gap between the existence check and the write
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(Error::NameConflict(name.to_string()));
            }
            Err(e) => return Err(Error::io(&path, e)),
        };
        if let Err(e) = file.write_all(contents.as_bytes()).and_then(|_| file.sync_all()) {
            let _ = fs::remove_file(&path);
            return Err(Error::io(&path, e));
        }

        info!(profile = name, "Profile created");
        Ok(profile)
    }

    /// Load one profile by name.
    pub fn load(&self, name: &str) -> Result<Profile> {
        let name = Self::normalize_name(name)?;
        let path = self.profile_path(name);
        if !path.is_file() {
            return Err(Error::NotFound(name.to_string()));
        }
        Self::read_profile(&path, name)
    }

    /// Parse `path`. The file stem `name` is authoritative: a document whose
    /// stored name differs (e.g. a renamed file) is loaded under `name`.
    fn read_profile(path: &Path, name: &str) -> Result<Profile> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut profile: Profile = serde_json::from_str(&contents).map_err(|e| Error::CorruptProfile {
            path: path.to_path_buf(),
            source: e,
        })?;

        if profile.name.trim().is_empty() {
            return Err(Error::CorruptProfile {
                path: path.to_path_buf(),
                source: serde::de::Error::missing_field("Name"),
            });
        }
        if profile.name != name {
            debug!(file = ?path, stored = %profile.name, "Stored name differs from file name");
            profile.name = name.to_string();
        }
        Ok(profile)
    }

    /// Load every stored profile. A single unreadable file fails the whole
    /// call so corruption is never hidden from the user.
    pub fn load_all(&self) -> Result<Vec<Profile>> {
        self.list_names()?
            .iter()
            .map(|name| Self::read_profile(&self.profile_path(name), name))
            .collect()
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let name = Self::normalize_name(name)?;
        let path = self.profile_path(name);
        if !path.is_file() {
            return Err(Error::NotFound(name.to_string()));
        }
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        info!(profile = name, "Profile deleted");
        Ok(())
    }

    /// Replace the stored document for `profile.name`.
    ///
    /// The new contents go to a sibling temp file which is then renamed over
    /// the old one, so readers see either the previous or the new document.
    pub fn save(&self, profile: &Profile) -> Result<()> {
        let name = Self::normalize_name(&profile.name)?;
        let path = self.profile_path(name);
        if !path.is_file() {
            return Err(Error::NotFound(name.to_string()));
        }

        let contents = serde_json::to_string_pretty(profile)
            .map_err(|e| Error::io(&path, e.into()))?;
        let temp_path = self.home_dir.join(format!("{}.{}", name, TEMP_SUFFIX));

        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&temp_path, &path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::io(&path, e));
        }

        debug!(profile = name, authenticated = profile.is_authenticated(), "Profile saved");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
