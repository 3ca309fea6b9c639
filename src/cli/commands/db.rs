use crate::cli::AppContext;
use crate::cli::parser::Commands;
use crate::db::log::audit;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};

/// `db`: maintenance of the punch-in database. Flags combine and run in
/// the order migrate, info, check, vacuum.
pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    let db_path = &ctx.cfg.database;
    let pool = DbPool::new(db_path)?;

    if *migrate || *show_info {
        run_pending_migrations(&pool.conn)?;
        if *migrate {
            success("Schema is up to date.");
        }
    }

    if *show_info {
        stats::print_db_info(&pool, db_path)?;
    }

    if *check {
        info("Checking punch-in storage integrity…");
        match stats::integrity_problems(&pool)? {
            None => success("Integrity check passed."),
            Some(report) => error(format!("Integrity check failed: {report}")),
        }
    }

    if *vacuum {
        let (before, after) = stats::vacuum(&pool, db_path)?;
        audit(&pool.conn, "vacuum", db_path, "Database compacted");
        success(format!(
            "Vacuum completed: {} KB → {} KB",
            before / 1024,
            after / 1024
        ));
    }

    Ok(())
}
