use crate::core::route::Route;
use crate::errors::AppResult;
use crate::utils::time::format_rfc3339;
use csv::Writer;
use std::path::Path;

/// One row per route point, in route order.
pub fn write_csv(path: &Path, route: &Route) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record(["index", "latitude", "longitude", "timestamp", "time"])?;

    for p in &route.points {
        wtr.write_record(&[
            p.index.to_string(),
            format!("{:.6}", p.latitude),
            format!("{:.6}", p.longitude),
            p.timestamp.to_string(),
            format_rfc3339(p.timestamp),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
