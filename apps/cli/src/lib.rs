//! # billsplit CLI Library
//!
//! Argument parsing, configuration and command handlers for the `billsplit`
//! binary. `main.rs` only calls [`run`].
//!
//! ## Module Organization
//! ```text
//! billsplit_cli/
//! ├── lib.rs          ◄─── You are here (logging, config, dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── TOML + environment configuration
//! ├── error.rs        ◄─── CliError and exit codes
//! └── commands/
//!     ├── mod.rs      ◄─── Shared readers and the split table
//!     ├── split.rs    ◄─── billsplit split
//!     ├── pix.rs      ◄─── billsplit pix
//!     ├── history.rs  ◄─── billsplit history ...
//!     └── config.rs   ◄─── billsplit config ...
//! ```
//!
//! ## Output Streams
//! Command results go to stdout. Logs and errors go to stderr, so
//! `billsplit pix ... | qrencode` stays clean.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use std::io::Write;

use billsplit_store::{BillHistory, JsonFileStore};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ConfigCommand};
use config::AppConfig;
use error::CliResult;

/// Parses the command line, runs the command and returns the exit code.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Parse arguments (clap exits on --help / usage errors)               │
/// │  2. Initialize logging (RUST_LOG, default warn,billsplit=info)          │
/// │  3. Load config: defaults → config.toml → BILLSPLIT_* env               │
/// │  4. Apply --history                                                     │
/// │  5. Dispatch to the command handler                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> i32 {
    let cli = Cli::parse();
    init_tracing();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match execute(cli, &mut out) {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("error: {}", err);
            err.code().exit_code()
        }
    }
}

/// Runs a parsed command against `out`.
pub fn execute(cli: Cli, out: &mut impl Write) -> CliResult<()> {
    // `config init` may be pointed at the file it is about to create.
    let mut config = if matches!(cli.command, Command::Config(ConfigCommand::Init { .. })) {
        AppConfig::load_or_default(cli.config.clone())?
    } else {
        AppConfig::load(cli.config.clone())?
    };
    if let Some(path) = cli.history {
        config.history.path = Some(path);
    }
    debug!(?config, "Configuration loaded");

    match cli.command {
        Command::Split(args) => commands::split::run(&args, out),
        Command::Pix(args) => commands::pix::run(&args, &config.pix, out),
        Command::History(command) => {
            let history = BillHistory::new(JsonFileStore::new(config.history_path()));
            commands::history::run(&command, &history, config.history.page_size, out)
        }
        Command::Config(command) => commands::config::run(&command, &config, cli.config, out),
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - Default: `warn`, and `info` for the billsplit crates
/// - Override with `RUST_LOG`, e.g. `RUST_LOG=billsplit=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,billsplit=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::sample_bill;
    use crate::error::CliError;

    fn cli(dir: &tempfile::TempDir, args: &[&str]) -> Cli {
        let config = dir.path().join("config.toml");
        let history = dir.path().join("history.json");
        let mut argv = vec![
            "billsplit".to_string(),
            "--config".to_string(),
            config.display().to_string(),
            "--history".to_string(),
            history.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_import_then_list_through_execute() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "[pix]\ncity = \"Recife\"\n").unwrap();

        let bill_file = dir.path().join("bill.json");
        let json = serde_json::to_string(&sample_bill("b1")).unwrap();
        std::fs::write(&bill_file, json).unwrap();

        let import = bill_file.display().to_string();
        let mut out = Vec::new();
        execute(cli(&dir, &["history", "import", &import]), &mut out).unwrap();

        let mut out = Vec::new();
        execute(cli(&dir, &["history", "list"]), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Pizzaria Napoli"));
        assert!(dir.path().join("history.json").exists());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(cli(&dir, &["history", "list"]), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::ConfigNotFound(_)));
        assert_eq!(err.code().exit_code(), 3);
    }

    #[test]
    fn test_config_init_creates_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut out = Vec::new();
        execute(cli(&dir, &["config", "init"]), &mut out).unwrap();
        assert!(path.exists());
        assert!(String::from_utf8(out).unwrap().starts_with("Wrote "));

        let written: AppConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.history.path, Some(dir.path().join("history.json")));

        // Now that it exists, every other command loads it.
        execute(cli(&dir, &["history", "list"]), &mut Vec::new()).unwrap();
    }
}
