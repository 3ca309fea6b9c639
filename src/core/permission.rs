//! Location permission boundary.

use crate::errors::AppResult;
use crate::prefs::{LOCATION_PERMISSION_KEY, PreferenceStore};
use crate::ui::prompt::ask_confirmation;

pub const GRANTED: &str = "granted";
pub const DENIED: &str = "denied";

pub trait PermissionGate {
    /// Are fine and coarse location both granted?
    fn is_granted(&self) -> AppResult<bool>;

    /// Ask for the permissions. Returns the decision.
    fn request(&mut self) -> AppResult<bool>;
}

/// Decision persisted in the `location_permission` preference; a request
/// asks on stdin.
#[derive(Debug, Clone)]
pub struct StoredPermission {
    prefs: PreferenceStore,
}

impl StoredPermission {
    pub fn new(prefs: PreferenceStore) -> Self {
        Self { prefs }
    }

    pub fn set(&self, granted: bool) -> AppResult<()> {
        self.prefs
            .set(LOCATION_PERMISSION_KEY, if granted { GRANTED } else { DENIED })
    }
}

impl PermissionGate for StoredPermission {
    fn is_granted(&self) -> AppResult<bool> {
        Ok(self.prefs.get(LOCATION_PERMISSION_KEY)?.as_deref() == Some(GRANTED))
    }

    fn request(&mut self) -> AppResult<bool> {
        let granted = ask_confirmation("Allow punchtracker to read your location?");
        self.set(granted)?;
        Ok(granted)
    }
}

/// Fixed answer, no prompt.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission {
    pub granted: bool,
    pub requests: u32,
}

impl StaticPermission {
    pub fn granted() -> Self {
        Self {
            granted: true,
            requests: 0,
        }
    }

    pub fn denied() -> Self {
        Self {
            granted: false,
            requests: 0,
        }
    }
}

impl PermissionGate for StaticPermission {
    fn is_granted(&self) -> AppResult<bool> {
        Ok(self.granted)
    }

    fn request(&mut self) -> AppResult<bool> {
        self.requests += 1;
        Ok(self.granted)
    }
}
