use crate::cli::AppContext;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::store::PunchInStore;
use crate::ui::messages::{info, success};

/// `init`: config directory and file (the file is left alone in test mode),
/// then the database with every migration applied.
pub fn handle(cli: &Cli, ctx: &AppContext) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), ctx.test_mode)?;

    info(format!("Config file : {}", Config::config_file().display()));
    info(format!(
        "Preferences : {}",
        ctx.session.prefs().path().display()
    ));

    let store = PunchInStore::open(&cfg.database)?;
    store.with_conn(|conn| {
        audit(conn, "init", &cfg.database, "Database initialized");
        Ok(())
    })?;

    success(format!("Database initialized at {}", cfg.database));
    println!(
        "Punch-ins are captured every {} s once you run `punchtracker track`.",
        cfg.capture_interval_secs
    );
    Ok(())
}
