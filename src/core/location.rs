//! Device location sources.

use crate::models::coordinates::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

/// Single-shot "last known location" query. `None` means no fix.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn last_known_location(&self) -> Option<Coordinates>;
}

/// Always reports the same position (`--lat/--lon`).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn last_known_location(&self) -> Option<Coordinates> {
        Some(self.0)
    }
}

/// Reads `{"latitude": .., "longitude": ..}` from a file kept up to date by
/// an external GPS daemon. The file is re-read on every query.
#[derive(Debug, Clone)]
pub struct FileLocation {
    path: PathBuf,
}

#[derive(Deserialize)]
struct FileFix {
    latitude: f64,
    longitude: f64,
}

impl FileLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LocationProvider for FileLocation {
    async fn last_known_location(&self) -> Option<Coordinates> {
        let path = self.path.clone();
        let content = tokio::task::spawn_blocking(move || std::fs::read_to_string(path))
            .await
            .ok()?;

        let content = match content {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "no location fix");
                return None;
            }
        };

        let fix: FileFix = match serde_json::from_str(&content) {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "unreadable location fix");
                return None;
            }
        };

        Coordinates::new(fix.latitude, fix.longitude).ok()
    }
}

/// Replays a fixed sequence of fixes (`None` = no fix). Used by tests.
#[derive(Debug, Default)]
pub struct ScriptedLocation {
    fixes: std::sync::Mutex<std::collections::VecDeque<Option<Coordinates>>>,
}

impl ScriptedLocation {
    pub fn new(fixes: impl IntoIterator<Item = Option<Coordinates>>) -> Self {
        Self {
            fixes: std::sync::Mutex::new(fixes.into_iter().collect()),
        }
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocation {
    /// Pops the next scripted fix; the last one repeats forever.
    async fn last_known_location(&self) -> Option<Coordinates> {
        let mut fixes = self.fixes.lock().ok()?;
        if fixes.len() > 1 {
            fixes.pop_front().flatten()
        } else {
            fixes.front().copied().flatten()
        }
    }
}
