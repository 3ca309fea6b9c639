use crate::core::route::{MapSurface, Route};
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RESET, color_for_optional_field};
use crate::utils::table::{Column, Table};
use crate::utils::time::format_label;

/// Renders a route as a terminal table followed by the route summary.
#[derive(Debug, Default)]
pub struct TableSurface;

impl MapSurface for TableSurface {
    fn render(&mut self, route: &Route) -> AppResult<()> {
        if route.is_empty() {
            println!("No punch-ins recorded yet");
            println!("Start tracking to see your route");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("#"),
            Column::new("Marker"),
            Column::new("Latitude"),
            Column::new("Longitude"),
            Column::new("Time"),
        ]);

        for p in &route.points {
            table.add_row(vec![
                p.index.to_string(),
                p.label.clone(),
                format!("{:.6}", p.latitude),
                format!("{:.6}", p.longitude),
                p.time_label.clone(),
            ]);
        }

        println!("{}", table.render());

        let last = route.summary.last_updated.map(format_label);
        let last_color = color_for_optional_field(last.as_deref());

        println!("{}Route Summary{}", CYAN, RESET);
        println!("  Total Points: {}{}{}", GREEN, route.summary.count, RESET);
        println!(
            "  Last Updated: {}{}{}",
            last_color,
            last.as_deref().unwrap_or("--"),
            RESET
        );
        if route.has_path() {
            println!("  Path: {} segment(s)", route.points.len() - 1);
        }

        Ok(())
    }
}
