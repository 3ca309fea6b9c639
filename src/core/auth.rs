//! Login form gating. This is not authentication: the password is only
//! checked for shape and is never stored.

use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::session::UserSession;
use crate::prefs::SessionContext;
use crate::store::PunchInStore;

pub const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.username.trim().is_empty() {
            return Err(AppError::Validation("Please enter username".into()));
        }
        if self.password.trim().is_empty() {
            return Err(AppError::Validation("Please enter password".into()));
        }
        // length in UTF-16 code units, so "😀😀" is four long
        if self.password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

pub struct LoginLogic;

impl LoginLogic {
    /// Validate the form, then persist the identity. Nothing is written when
    /// validation fails.
    pub fn login(
        ctx: &SessionContext,
        form: &LoginForm,
        store: Option<&PunchInStore>,
    ) -> AppResult<UserSession> {
        form.validate()?;

        let session = ctx.save_login(&form.username)?;

        if let Some(store) = store {
            audit_session(store, "login", &session.user_id, "User logged in");
        }

        Ok(session)
    }

    pub fn logout(ctx: &SessionContext, store: Option<&PunchInStore>) -> AppResult<UserSession> {
        let session = ctx.save_logout()?;

        if let Some(store) = store {
            audit_session(store, "logout", &session.user_id, "User logged out");
        }

        Ok(session)
    }
}

/// Login state is already saved: a store that cannot be reached only costs
/// the audit row.
fn audit_session(store: &PunchInStore, operation: &str, user_id: &str, message: &str) {
    let written = store.with_conn(|conn| {
        audit(conn, operation, user_id, message);
        Ok(())
    });
    if let Err(e) = written {
        tracing::warn!(operation, error = %e, "failed to write internal log");
    }
}
