use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for punchtracker
/// CLI application that records your GPS position on a fixed interval
#[derive(Parser)]
#[command(
    name = "punchtracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Punch in your location every 10 minutes and review the route you covered",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the preferences file (login state, permission)
    #[arg(global = true, long = "prefs")]
    pub prefs: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show or check the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Validate the capture timings")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Log in (the password is only checked for length)
    Login {
        #[arg(long = "user", short = 'u', help = "Username")]
        user: Option<String>,

        #[arg(long = "password", short = 'p', help = "Password (prompted when omitted)")]
        password: Option<String>,
    },

    /// Log out (the user id is kept)
    Logout,

    /// Show who is logged in and how many punch-ins are stored
    Home,

    /// Manage the location permission
    Permission {
        #[arg(long = "grant", conflicts_with = "revoke", help = "Grant location access")]
        grant: bool,

        #[arg(long = "revoke", help = "Revoke location access")]
        revoke: bool,
    },

    /// Start tracking: punch in now and then on every interval until Ctrl+C
    Track {
        /// Latitude of a fixed position (use with --lon)
        #[arg(long = "lat", requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of a fixed position (use with --lat)
        #[arg(long = "lon", requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// JSON file with the last known location (overrides config)
        #[arg(long = "location-file", conflicts_with = "lat")]
        location_file: Option<String>,

        /// Stop after this many completed intervals
        #[arg(long = "cycles")]
        cycles: Option<u32>,
    },

    /// Show the recorded route
    Route {
        #[arg(long = "follow", help = "Keep running and redraw on every new punch-in")]
        follow: bool,

        #[arg(long = "clear", conflicts_with = "follow", help = "Delete all your punch-ins")]
        clear: bool,

        #[arg(long = "yes", requires = "clear", help = "Skip the confirmation prompt")]
        yes: bool,
    },

    /// Export the route for a map viewer
    Export {
        #[arg(long, value_enum, default_value = "geojson")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Overwrite an existing file without asking")]
        force: bool,
    },
}
