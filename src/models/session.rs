/// Placeholder identity used when no user ever logged in.
pub const DEFAULT_USER_ID: &str = "User";

/// Identity and login status as stored in the preference namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user_id: String,
    pub is_logged_in: bool,
}

impl Default for UserSession {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
            is_logged_in: false,
        }
    }
}
