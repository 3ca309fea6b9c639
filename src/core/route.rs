//! Route viewer: turns a user's punch-ins into an ordered path for a map
//! surface and guards the destructive "clear history" action.

use crate::errors::AppResult;
use crate::models::punch_in::PunchIn;
use crate::store::{PunchInStore, RecordFeed};
use crate::utils::time::format_label;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePoint {
    /// 1-based position in the route.
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: i64,
    /// Marker title, e.g. `Punch-in 3`.
    pub label: String,
    /// Marker snippet, e.g. `Nov 30, 14:05`.
    pub time_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub count: usize,
    /// Timestamp of the most recent punch-in.
    pub last_updated: Option<i64>,
}

/// Points in the same order as the store returns them: newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub user_id: String,
    pub points: Vec<RoutePoint>,
    pub summary: RouteSummary,
}

impl Route {
    pub fn from_records(user_id: &str, records: &[PunchIn]) -> Self {
        let points: Vec<RoutePoint> = records
            .iter()
            .enumerate()
            .map(|(i, r)| RoutePoint {
                index: i + 1,
                latitude: r.latitude,
                longitude: r.longitude,
                timestamp: r.timestamp,
                label: format!("Punch-in {}", i + 1),
                time_label: format_label(r.timestamp),
            })
            .collect();

        let summary = RouteSummary {
            count: points.len(),
            last_updated: records.iter().map(|r| r.timestamp).max(),
        };

        Self {
            user_id: user_id.to_string(),
            points,
            summary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `[lat, lon]` pairs for the connecting polyline.
    pub fn path(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|p| [p.latitude, p.longitude])
            .collect()
    }

    /// A line needs at least two points.
    pub fn has_path(&self) -> bool {
        self.points.len() > 1
    }
}

/// Something that can draw a route: a terminal table, an export file...
pub trait MapSurface {
    fn render(&mut self, route: &Route) -> AppResult<()>;
}

pub struct RouteViewer {
    store: PunchInStore,
    user_id: String,
}

impl RouteViewer {
    pub fn new(store: PunchInStore, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn load(&self) -> AppResult<Route> {
        let records = self.store.list_by_user(&self.user_id)?;
        Ok(Route::from_records(&self.user_id, &records))
    }

    /// Routes rebuilt on every change of the user's records.
    pub fn follow(&self) -> RouteFeed {
        RouteFeed {
            feed: self.store.subscribe(&self.user_id),
        }
    }

    /// First step of clearing: opens the dialog. Nothing is deleted until
    /// [`ClearDialog::confirm`] is called.
    pub fn request_clear(&self) -> ClearDialog<'_> {
        ClearDialog { viewer: self }
    }
}

pub struct RouteFeed {
    feed: RecordFeed,
}

impl RouteFeed {
    pub async fn next(&mut self) -> Option<AppResult<Route>> {
        let user_id = self.feed.user_id().to_string();
        let records = self.feed.next().await?;
        Some(records.map(|r| Route::from_records(&user_id, &r)))
    }
}

#[must_use = "a clear request does nothing until confirmed"]
pub struct ClearDialog<'a> {
    viewer: &'a RouteViewer,
}

impl ClearDialog<'_> {
    pub fn prompt(&self) -> String {
        format!(
            "Delete all punch-in records of '{}'? This action is irreversible.",
            self.viewer.user_id
        )
    }

    /// Second step: delete every record of the viewed user.
    pub fn confirm(self) -> AppResult<usize> {
        self.viewer.store.delete_all_by_user(&self.viewer.user_id)
    }

    pub fn dismiss(self) {}
}
