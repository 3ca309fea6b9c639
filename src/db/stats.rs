use crate::db::pool::DbPool;
use crate::db::queries::count_punch_ins_per_user;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::time::format_label;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTAL PUNCH-INS
    //
    let count: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM punch_ins", [], |row| row.get(0))?;
    println!(
        "{}• Total punch-ins:{} {}{}{}",
        CYAN, RESET, GREEN, count, RESET
    );

    //
    // 3) TIME RANGE
    //
    let range: Option<(i64, i64)> = pool
        .conn
        .query_row(
            "SELECT MIN(timestamp), MAX(timestamp) FROM punch_ins HAVING COUNT(*) > 0",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let (fmt_first, fmt_last) = match range {
        Some((first, last)) => (format_label(first), format_label(last)),
        None => (format!("{GREY}--{RESET}"), format!("{GREY}--{RESET}")),
    };

    println!("{}• Time range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 4) PER USER
    //
    let per_user = count_punch_ins_per_user(&pool.conn)?;
    if !per_user.is_empty() {
        println!("{}• Per user:{}", CYAN, RESET);
        for (user, n) in per_user {
            println!("    {}: {}", user, n);
        }
    }

    println!();
    Ok(())
}

/// `PRAGMA integrity_check`, `None` when the database is healthy.
pub fn integrity_problems(pool: &DbPool) -> AppResult<Option<String>> {
    let report: String = pool
        .conn
        .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
    Ok((report != "ok").then_some(report))
}

/// Rebuild the file and return its size before and after, in bytes.
pub fn vacuum(pool: &DbPool, db_path: &str) -> AppResult<(u64, u64)> {
    let size = || fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let before = size();
    pool.conn.execute_batch("VACUUM;")?;
    Ok((before, size()))
}
