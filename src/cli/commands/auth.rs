use crate::cli::AppContext;
use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::core::auth::{LoginForm, LoginLogic};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::ui::prompt::read_line;

/// Handle `login`. Missing fields are asked on stdin.
pub fn handle_login(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Login { user, password } = cmd {
        let username = match user {
            Some(u) => u.clone(),
            None => read_line("Username")?,
        };
        let password = match password {
            Some(p) => p.clone(),
            None => read_line("Password")?,
        };

        let form = LoginForm::new(username, password);
        // form errors must not touch the database either
        form.validate()?;

        let store = open_store(ctx).ok();
        let session = LoginLogic::login(&ctx.session, &form, store.as_ref())?;

        success(format!("Welcome, {}!", session.user_id));
        info("Start tracking with `punchtracker track`.");
    }

    Ok(())
}

pub fn handle_logout(ctx: &AppContext) -> AppResult<()> {
    let before = ctx.session.load()?;
    if !before.is_logged_in {
        info("Already logged out.");
        return Ok(());
    }

    let store = open_store(ctx).ok();
    let session = LoginLogic::logout(&ctx.session, store.as_ref())?;

    success(format!("Goodbye, {}.", session.user_id));
    Ok(())
}
