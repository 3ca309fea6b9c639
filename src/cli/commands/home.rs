use crate::cli::AppContext;
use crate::cli::commands::{enter, open_store};
use crate::core::navigation::Screen;
use crate::core::permission::{PermissionGate, StoredPermission};
use crate::errors::AppResult;
use crate::ui::messages::{header, warning};
use crate::utils::time::format_label;

pub fn handle(ctx: &AppContext) -> AppResult<()> {
    let (session, _nav) = enter(ctx, Screen::Home)?;
    let store = open_store(ctx)?;
    let records = store.list_by_user(&session.user_id)?;

    header("Punch-In Tracker");
    println!("Welcome, {}!\n", session.user_id);
    println!("Punch-ins recorded: {}", records.len());
    if let Some(last) = records.first() {
        println!("Last punch-in:      {}", format_label(last.timestamp));
    }
    println!();
    println!("  punchtracker track    Start Punch-In: begin location tracking");
    println!("  punchtracker route    View Route: see your tracked path");
    println!("  punchtracker logout   Logout");

    let permission = StoredPermission::new(ctx.session.prefs().clone());
    if !permission.is_granted()? {
        println!();
        warning("Location permission required (`punchtracker permission --grant`)");
    }

    Ok(())
}
