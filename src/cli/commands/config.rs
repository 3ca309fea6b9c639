use crate::cli::AppContext;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        if *print_config {
            info(format!("Config file: {}", Config::config_file().display()));
            println!("📄 Current configuration:\n");
            println!("{}", serde_yaml::to_string(&ctx.cfg)?);
        }

        if *check {
            ctx.cfg.validate()?;
            success(format!(
                "Configuration OK: punch-in every {}s, warning {}s before",
                ctx.cfg.capture_interval_secs, ctx.cfg.warning_lead_secs
            ));
        }
    }

    Ok(())
}
