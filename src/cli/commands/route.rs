use crate::cli::AppContext;
use crate::cli::commands::{enter, open_store};
use crate::cli::parser::Commands;
use crate::core::navigation::Screen;
use crate::core::route::{MapSurface, RouteViewer};
use crate::errors::AppResult;
use crate::export::TableSurface;
use crate::ui::messages::{header, info, success};
use crate::ui::prompt::ask_confirmation;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Route { follow, clear, yes } = cmd {
        let (session, _nav) = enter(ctx, Screen::Route)?;
        let viewer = RouteViewer::new(open_store(ctx)?, session.user_id.clone());
        let mut surface = TableSurface;

        if *clear {
            let route = viewer.load()?;
            if route.is_empty() {
                info("No punch-ins to delete.");
                return Ok(());
            }

            let dialog = viewer.request_clear();
            if *yes || ask_confirmation(&dialog.prompt()) {
                let removed = dialog.confirm()?;
                success(format!("Deleted {} punch-in record(s).", removed));
            } else {
                dialog.dismiss();
                info("Operation cancelled.");
            }
            return Ok(());
        }

        if !*follow {
            header(format!("Route Map ({})", viewer.user_id()));
            return surface.render(&viewer.load()?);
        }

        let mut feed = viewer.follow();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => break,
                next = feed.next() => match next {
                    Some(route) => {
                        header(format!("Route Map ({})", viewer.user_id()));
                        surface.render(&route?)?;
                    }
                    None => break,
                },
            }
        }
    }

    Ok(())
}
