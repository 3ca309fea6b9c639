// src/export/mod.rs

mod csv_export;
mod fs_utils;
mod geojson;
mod json;
mod table;

pub use geojson::route_to_geojson;
pub use table::TableSurface;

use crate::core::route::{MapSurface, Route};
use crate::errors::AppResult;
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// Shared completion message for exports.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Geojson,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Geojson => "geojson",
        }
    }
}

/// A route written to a file in one of the [`ExportFormat`]s.
pub struct FileSurface {
    pub format: ExportFormat,
    pub path: PathBuf,
    pub force: bool,
}

impl FileSurface {
    pub fn new(format: ExportFormat, path: impl Into<PathBuf>, force: bool) -> Self {
        Self {
            format,
            path: path.into(),
            force,
        }
    }
}

impl MapSurface for FileSurface {
    fn render(&mut self, route: &Route) -> AppResult<()> {
        fs_utils::ensure_writable(&self.path, self.force)?;

        match self.format {
            ExportFormat::Csv => csv_export::write_csv(&self.path, route)?,
            ExportFormat::Json => json::write_json(&self.path, route)?,
            ExportFormat::Geojson => geojson::write_geojson(&self.path, route)?,
        }

        notify_export_success(&self.format.as_str().to_uppercase(), &self.path);
        Ok(())
    }
}
