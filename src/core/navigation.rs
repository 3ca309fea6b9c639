use crate::errors::{AppError, AppResult};
use crate::models::session::UserSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Home,
    Capture,
    Route,
}

/// Launch screen, decided once from the login flag.
pub fn start_screen(session: &UserSession) -> Screen {
    if session.is_logged_in {
        Screen::Home
    } else {
        Screen::Login
    }
}

#[derive(Debug)]
pub struct Navigator {
    stack: Vec<Screen>,
    logged_in: bool,
}

impl Navigator {
    pub fn new(session: &UserSession) -> Self {
        Self {
            stack: vec![start_screen(session)],
            logged_in: session.is_logged_in,
        }
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Login)
    }

    /// Open `target`. Every screen but Login requires a login.
    pub fn open(&mut self, target: Screen) -> AppResult<Screen> {
        if target != Screen::Login && !self.logged_in {
            return Err(AppError::NotLoggedIn);
        }
        if self.current() != target {
            self.stack.push(target);
        }
        Ok(target)
    }

    /// Leave the current screen. Refused while tracking is active.
    pub fn back(&mut self, capture_active: bool) -> AppResult<Screen> {
        if self.current() == Screen::Capture && capture_active {
            return Err(AppError::TrackingActive);
        }
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        Ok(self.current())
    }

    /// Login succeeded: the history is replaced by Home.
    pub fn logged_in(&mut self) -> Screen {
        self.logged_in = true;
        self.stack = vec![Screen::Home];
        Screen::Home
    }

    /// Logout: the history is replaced by Login.
    pub fn logged_out(&mut self) -> Screen {
        self.logged_in = false;
        self.stack = vec![Screen::Login];
        Screen::Login
    }
}
