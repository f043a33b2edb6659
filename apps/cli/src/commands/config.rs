//! `billsplit config show|init`

use std::io::Write;
use std::path::PathBuf;

use crate::cli::ConfigCommand;
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

pub fn run(
    command: &ConfigCommand,
    config: &AppConfig,
    config_path: Option<PathBuf>,
    out: &mut impl Write,
) -> CliResult<()> {
    match command {
        ConfigCommand::Show => {
            writeln!(out, "# history file: {}", config.history_path().display())?;
            write!(out, "{}", toml::to_string_pretty(config)?)?;
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = config_path
                .or_else(AppConfig::default_config_path)
                .ok_or_else(|| CliError::Config("No config path available".into()))?;
            if path.exists() && !force {
                return Err(CliError::Config(format!(
                    "{} already exists (pass --force to overwrite)",
                    path.display()
                )));
            }

            let written = config.save(Some(path))?;
            writeln!(out, "Wrote {}", written.display())?;
            Ok(())
        }
    }
}
