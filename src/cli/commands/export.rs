use crate::cli::AppContext;
use crate::cli::commands::{enter, open_store};
use crate::cli::parser::Commands;
use crate::core::navigation::Screen;
use crate::core::route::{MapSurface, RouteViewer};
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::export::FileSurface;
use crate::ui::messages::warning;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
    } = cmd
    {
        let (session, _nav) = enter(ctx, Screen::Route)?;
        let store = open_store(ctx)?;
        let viewer = RouteViewer::new(store.clone(), session.user_id.clone());

        let route = viewer.load()?;
        if route.is_empty() {
            warning("No punch-ins recorded yet: exporting an empty route.");
        }

        FileSurface::new(*format, file, *force).render(&route)?;

        store.with_conn(|conn| {
            audit(
                conn,
                "export",
                file,
                &format!("{} point(s) as {}", route.summary.count, format.as_str()),
            );
            Ok(())
        })?;
    }

    Ok(())
}
