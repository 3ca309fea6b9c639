pub mod auth;
pub mod config;
pub mod db;
pub mod export;
pub mod home;
pub mod init;
pub mod log;
pub mod permission;
pub mod route;
pub mod track;

use crate::cli::AppContext;
use crate::core::navigation::{Navigator, Screen};
use crate::errors::AppResult;
use crate::models::session::UserSession;
use crate::store::PunchInStore;

/// Open (and migrate) the configured database.
pub(crate) fn open_store(ctx: &AppContext) -> AppResult<PunchInStore> {
    PunchInStore::open(&ctx.cfg.database)
}

/// Load the session and make sure `screen` may be opened.
pub(crate) fn enter(ctx: &AppContext, screen: Screen) -> AppResult<(UserSession, Navigator)> {
    let session = ctx.session.load()?;
    let mut nav = Navigator::new(&session);
    nav.open(screen)?;
    Ok((session, nav))
}
