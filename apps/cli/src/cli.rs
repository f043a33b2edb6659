//! Command-line arguments.

use std::path::PathBuf;

use billsplit_core::BillStatus;
use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "billsplit", version)]
#[command(about = "Split restaurant bills and charge your friends over Pix")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short, global = true, env = "BILLSPLIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// History file to use instead of the configured one
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show what each person owes on a bill file
    Split(SplitArgs),

    /// Print a Pix "copia e cola" payload
    Pix(PixArgs),

    /// Browse and edit saved bills
    #[command(subcommand)]
    History(HistoryCommand),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Bill JSON file
    pub bill: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["amount", "bill"])))]
pub struct PixArgs {
    /// Pix key of the payee (defaults to pix.key)
    #[arg(long)]
    pub key: Option<String>,

    /// Payee name (defaults to the bill's local user, then pix.payee_name)
    #[arg(long)]
    pub name: Option<String>,

    /// Payee city (defaults to pix.city)
    #[arg(long)]
    pub city: Option<String>,

    /// Amount to charge, e.g. 28.75 or "R$ 28,75"
    #[arg(long)]
    pub amount: Option<String>,

    /// Charge the total of this bill JSON file
    #[arg(long)]
    pub bill: Option<PathBuf>,

    /// Reference label (defaults to pix.reference_label)
    #[arg(long)]
    pub label: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List saved bills, newest first
    List(ListArgs),

    /// Show one bill with its split
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Add bills from a JSON file (one bill or an array)
    Import { file: PathBuf },

    /// Mark a bill as paid, pending or overdue
    Status { id: String, status: BillStatus },

    /// Remove a bill
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only establishments whose name contains this text
    #[arg(long, short)]
    pub search: Option<String>,

    /// Only bills with this status
    #[arg(long)]
    pub status: Option<BillStatus>,

    /// Oldest first
    #[arg(long)]
    pub asc: bool,

    /// Page number, starting at 1
    #[arg(long, short, default_value_t = 1)]
    pub page: usize,

    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with the current values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
