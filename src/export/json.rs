use crate::core::route::Route;
use crate::errors::AppResult;
use std::path::Path;

/// Pretty-printed route, summary included.
pub fn write_json(path: &Path, route: &Route) -> AppResult<()> {
    let json = serde_json::to_string_pretty(route)?;
    std::fs::write(path, json)?;
    Ok(())
}
