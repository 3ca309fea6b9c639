//! Durable key/value preferences (`user_prefs` namespace) and the session
//! context built on top of them.
//!
//! Values are plain strings, the file is a flat YAML map. Every write goes
//! to a sibling temp file that is then renamed into place. Reads always hit
//! the file: a value written by one handle is visible to every other handle
//! on its next read.

use crate::errors::AppResult;
use crate::models::session::{DEFAULT_USER_ID, UserSession};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const USER_ID_KEY: &str = "user_id";
pub const IS_LOGGED_IN_KEY: &str = "is_logged_in";
pub const LOCATION_PERMISSION_KEY: &str = "location_permission";

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> AppResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yaml::to_string(values)?;
        let tmp = self.path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn get_or(&self, key: &str, default: &str) -> AppResult<String> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }

    pub fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.set_many(&[(key, value)])
    }

    /// Write several keys with a single file replacement.
    pub fn set_many(&self, entries: &[(&str, &str)]) -> AppResult<()> {
        let mut values = self.read_all()?;
        for (key, value) in entries {
            values.insert((*key).to_string(), (*value).to_string());
        }
        self.write_all(&values)
    }
}

/// Identity and login status, passed explicitly to the commands that need it.
#[derive(Debug, Clone)]
pub struct SessionContext {
    prefs: PreferenceStore,
}

impl SessionContext {
    pub fn new(prefs: PreferenceStore) -> Self {
        Self { prefs }
    }

    pub fn prefs(&self) -> &PreferenceStore {
        &self.prefs
    }

    pub fn load(&self) -> AppResult<UserSession> {
        Ok(UserSession {
            user_id: self.prefs.get_or(USER_ID_KEY, DEFAULT_USER_ID)?,
            is_logged_in: self.prefs.get(IS_LOGGED_IN_KEY)?.as_deref() == Some("true"),
        })
    }

    pub fn save_login(&self, user_id: &str) -> AppResult<UserSession> {
        self.prefs
            .set_many(&[(USER_ID_KEY, user_id), (IS_LOGGED_IN_KEY, "true")])?;
        self.load()
    }

    /// Clears the login flag only. `user_id` is kept.
    pub fn save_logout(&self) -> AppResult<UserSession> {
        self.prefs.set(IS_LOGGED_IN_KEY, "false")?;
        self.load()
    }
}
