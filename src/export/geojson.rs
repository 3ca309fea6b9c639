use crate::core::route::Route;
use crate::errors::AppResult;
use serde_json::{Value, json};
use std::path::Path;

/// A `FeatureCollection` with one `Point` marker per punch-in and, when
/// there are at least two points, a `LineString` joining them.
///
/// GeoJSON positions are `[longitude, latitude]`.
pub fn route_to_geojson(route: &Route) -> Value {
    let mut features: Vec<Value> = route
        .points
        .iter()
        .map(|p| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [p.longitude, p.latitude],
                },
                "properties": {
                    "index": p.index,
                    "title": p.label,
                    "snippet": p.time_label,
                    "timestamp": p.timestamp,
                },
            })
        })
        .collect();

    if route.has_path() {
        let line: Vec<[f64; 2]> = route
            .points
            .iter()
            .map(|p| [p.longitude, p.latitude])
            .collect();

        features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": line,
            },
            "properties": {
                "user": route.user_id,
                "count": route.summary.count,
            },
        }));
    }

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

pub fn write_geojson(path: &Path, route: &Route) -> AppResult<()> {
    let json = serde_json::to_string_pretty(&route_to_geojson(route))?;
    std::fs::write(path, json)?;
    Ok(())
}
