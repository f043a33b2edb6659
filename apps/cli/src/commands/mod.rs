//! # Command Handlers
//!
//! Each handler takes parsed arguments plus what it needs (config section,
//! history repository) and writes to `out`. Nothing here prints directly,
//! so handlers run the same way under tests.
//!
//! ## Available Commands
//!
//! - [`split`] - Per-person shares of a bill file
//! - [`pix`] - Pix payloads
//! - [`history`] - Saved bills
//! - [`config`] - Configuration file

pub mod config;
pub mod history;
pub mod pix;
pub mod split;

use std::io::Write;
use std::path::Path;

use billsplit_core::{Bill, DiscrepancyKind, Money, SplitOutcome};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Reads one bill from a JSON file.
pub(crate) fn read_bill(path: &Path) -> CliResult<Bill> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    let bill = serde_json::from_str(&text).map_err(|source| CliError::BillFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Read bill file");
    Ok(bill)
}

/// Reads a JSON file holding either one bill or an array of bills.
pub(crate) fn read_bills(path: &Path) -> CliResult<Vec<Bill>> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    let bill_file = |source| CliError::BillFile {
        path: path.to_path_buf(),
        source,
    };

    let value: serde_json::Value = serde_json::from_str(&text).map_err(bill_file)?;
    if value.is_array() {
        serde_json::from_value(value).map_err(bill_file)
    } else {
        serde_json::from_value(value)
            .map(|bill| vec![bill])
            .map_err(bill_file)
    }
}

/// `part` as a percentage of `whole` with one decimal (`"55.6%"`).
pub(crate) fn percent_of(part: Money, whole: Money) -> String {
    let mut pct = part
        .ratio_of(whole)
        .map(|ratio| {
            (ratio * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        })
        .unwrap_or(Decimal::ZERO);
    pct.rescale(1);
    format!("{}%", pct)
}

/// The per-person table shared by `split` and `history show`.
pub(crate) fn write_outcome(outcome: &SplitOutcome, out: &mut impl Write) -> CliResult<()> {
    writeln!(out, "  Subtotal  {:>12}", outcome.subtotal.to_string())?;
    writeln!(out, "  Total     {:>12}", outcome.total.to_string())?;
    writeln!(out)?;

    for (rank, person) in outcome.totals.iter().enumerate() {
        let name = if person.is_current_user {
            format!("{} (you)", person.name)
        } else {
            person.name.clone()
        };
        writeln!(
            out,
            "  {:>2}. {:<24} {:>12} {:>7}",
            rank + 1,
            name,
            person.amount.to_string(),
            percent_of(person.amount, outcome.total)
        )?;
    }

    let remainder = outcome.discrepancy.remainder;
    match outcome.discrepancy.kind() {
        DiscrepancyKind::Balanced => {}
        DiscrepancyKind::UnderAssigned => {
            writeln!(out)?;
            writeln!(
                out,
                "  ! {} of the total is not assigned to anyone",
                remainder
            )?;
        }
        DiscrepancyKind::OverAssigned => {
            writeln!(out)?;
            writeln!(out, "  ! Shares exceed the total by {}", remainder.abs())?;
        }
    }
    Ok(())
}
