pub mod commands;
pub mod parser;

use crate::config::Config;
use crate::prefs::{PreferenceStore, SessionContext};

/// Everything a command handler needs, built once in `run()`.
pub struct AppContext {
    pub cfg: Config,
    pub session: SessionContext,
    pub test_mode: bool,
}

impl AppContext {
    pub fn new(cfg: Config, test_mode: bool) -> Self {
        let prefs = PreferenceStore::open(&cfg.preferences);
        Self {
            session: SessionContext::new(prefs),
            cfg,
            test_mode,
        }
    }
}
