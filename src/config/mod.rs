use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_CAPTURE_INTERVAL_SECS: u32 = 600;
pub const DEFAULT_WARNING_LEAD_SECS: u32 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_preferences")]
    pub preferences: String,
    #[serde(default = "default_capture_interval")]
    pub capture_interval_secs: u32,
    #[serde(default = "default_warning_lead")]
    pub warning_lead_secs: u32,
    #[serde(default)]
    pub location_file: Option<String>,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_preferences() -> String {
    Config::preferences_file().to_string_lossy().to_string()
}
fn default_capture_interval() -> u32 {
    DEFAULT_CAPTURE_INTERVAL_SECS
}
fn default_warning_lead() -> u32 {
    DEFAULT_WARNING_LEAD_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            preferences: default_preferences(),
            capture_interval_secs: default_capture_interval(),
            warning_lead_secs: default_warning_lead(),
            location_file: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("punchtracker")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".punchtracker")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("punchtracker.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("punchtracker.sqlite")
    }

    /// Return the full path of the `user_prefs` namespace
    pub fn preferences_file() -> PathBuf {
        Self::config_dir().join("user_prefs.yaml")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(cfg)
    }

    /// Reject timings the capture loop cannot honour.
    pub fn validate(&self) -> AppResult<()> {
        if self.capture_interval_secs == 0 {
            return Err(AppError::Config(
                "capture_interval_secs must be greater than zero".into(),
            ));
        }
        if self.warning_lead_secs >= self.capture_interval_secs {
            return Err(AppError::Config(format!(
                "warning_lead_secs ({}) must be lower than capture_interval_secs ({})",
                self.warning_lead_secs, self.capture_interval_secs
            )));
        }
        Ok(())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}
