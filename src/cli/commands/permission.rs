use crate::cli::AppContext;
use crate::cli::parser::Commands;
use crate::core::permission::{PermissionGate, StoredPermission};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Permission { grant, revoke } = cmd {
        let permission = StoredPermission::new(ctx.session.prefs().clone());

        if *grant {
            permission.set(true)?;
            success("Location permission granted.");
        } else if *revoke {
            permission.set(false)?;
            warning("Location permission revoked.");
        } else if permission.is_granted()? {
            info("Location permission: granted");
        } else {
            info("Location permission: not granted");
        }
    }

    Ok(())
}
