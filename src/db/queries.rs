use crate::errors::AppResult;
use crate::models::punch_in::{NewPunchIn, PunchIn};
use rusqlite::{Connection, Result, Row, params};

pub fn map_row(row: &Row) -> Result<PunchIn> {
    Ok(PunchIn {
        id: row.get("id")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        timestamp: row.get("timestamp")?,
        user_id: row.get("userId")?,
    })
}

pub fn insert_punch_in(conn: &Connection, p: &NewPunchIn) -> AppResult<PunchIn> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO punch_ins (latitude, longitude, timestamp, userId)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    stmt.execute(params![p.latitude, p.longitude, p.timestamp, p.user_id])?;

    Ok(PunchIn {
        id: conn.last_insert_rowid(),
        latitude: p.latitude,
        longitude: p.longitude,
        timestamp: p.timestamp,
        user_id: p.user_id.clone(),
    })
}

/// Newest first. Ties on timestamp fall back to insertion order.
pub fn load_punch_ins_by_user(conn: &Connection, user_id: &str) -> AppResult<Vec<PunchIn>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, latitude, longitude, timestamp, userId FROM punch_ins
         WHERE userId = ?1
         ORDER BY timestamp DESC, id DESC",
    )?;

    let rows = stmt.query_map([user_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_punch_ins_by_user(conn: &Connection, user_id: &str) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM punch_ins WHERE userId = ?1", [user_id])?;
    Ok(n)
}

/// `(userId, count)` pairs, busiest user first.
pub fn count_punch_ins_per_user(conn: &Connection) -> AppResult<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT userId, COUNT(*) FROM punch_ins
         GROUP BY userId
         ORDER BY COUNT(*) DESC, userId ASC",
    )?;

    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
