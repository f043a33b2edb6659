//! `billsplit history ...`
//!
//! ```text
//! billsplit history list --search pizza --status pending --page 2
//! billsplit history show 1700000000000
//! billsplit history import bills.json
//! billsplit history status 1700000000000 paid
//! billsplit history delete 1700000000000
//! ```

use std::io::Write;

use billsplit_core::{split_bill, Bill};
use billsplit_store::{BillHistory, BillStore, HistoryPage, HistoryQuery, PageLink, SortOrder};
use tracing::info;

use super::{read_bills, write_outcome};
use crate::cli::{HistoryCommand, ListArgs};
use crate::error::CliResult;

pub fn run<S: BillStore>(
    command: &HistoryCommand,
    history: &BillHistory<S>,
    page_size: usize,
    out: &mut impl Write,
) -> CliResult<()> {
    match command {
        HistoryCommand::List(args) => list(args, history, page_size, out),
        HistoryCommand::Show { id, json } => show(id, *json, history, out),
        HistoryCommand::Import { file } => {
            let bills = read_bills(file)?;
            let count = bills.len();
            // Upserting moves a bill to the front, so go backwards to keep file order.
            for bill in bills.into_iter().rev() {
                history.upsert(bill)?;
            }
            info!(count, file = %file.display(), "Imported bills");
            writeln!(out, "Imported {} bill(s)", count)?;
            Ok(())
        }
        HistoryCommand::Status { id, status } => {
            let bill = history.update_status(id, *status)?;
            writeln!(out, "{} is now {}", bill.establishment_name, bill.status)?;
            Ok(())
        }
        HistoryCommand::Delete { id } => {
            let bill = history.delete(id)?;
            writeln!(out, "Deleted {} ({})", bill.establishment_name, bill.id)?;
            Ok(())
        }
    }
}

fn list<S: BillStore>(
    args: &ListArgs,
    history: &BillHistory<S>,
    page_size: usize,
    out: &mut impl Write,
) -> CliResult<()> {
    let query = HistoryQuery {
        search: args.search.clone(),
        status: args.status,
        order: if args.asc {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        },
        page: args.page,
        page_size,
    };
    let page = history.query(&query)?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &page)?;
        writeln!(out)?;
        return Ok(());
    }

    if page.bills.is_empty() {
        writeln!(out, "No bills found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<16} {:<12} {:<28} {:>12} {:>12}  {}",
        "ID", "DATE", "ESTABLISHMENT", "TOTAL", "MY SHARE", "STATUS"
    )?;
    for bill in &page.bills {
        write_row(bill, out)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", pager_line(&page))?;
    Ok(())
}

fn write_row(bill: &Bill, out: &mut impl Write) -> CliResult<()> {
    writeln!(
        out,
        "{:<16} {:<12} {:<28} {:>12} {:>12}  {}",
        bill.id,
        bill.date,
        truncate(&bill.establishment_name, 28),
        bill.total_amount.to_string(),
        bill.current_user_share.to_string(),
        bill.status
    )?;
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max - 1).collect();
        cut.push('…');
        cut
    }
}

/// `Page 4 of 7 (33 bills)  1 … [4] … 7`
fn pager_line(page: &HistoryPage) -> String {
    let links: Vec<String> = page
        .page_links()
        .into_iter()
        .map(|link| match link {
            PageLink::Page(n) if n == page.page => format!("[{}]", n),
            PageLink::Page(n) => n.to_string(),
            PageLink::Gap => "…".to_string(),
        })
        .collect();

    format!(
        "Page {} of {} ({} bills)  {}",
        page.page,
        page.total_pages,
        page.total_matches,
        links.join(" ")
    )
}

fn show<S: BillStore>(
    id: &str,
    json: bool,
    history: &BillHistory<S>,
    out: &mut impl Write,
) -> CliResult<()> {
    let bill = history.get(id)?;
    let outcome = split_bill(&bill);

    if json {
        let value = serde_json::json!({ "bill": bill, "split": outcome });
        serde_json::to_writer_pretty(&mut *out, &value)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{} ({})", bill.establishment_name, bill.date)?;
    writeln!(out, "Status: {}", bill.status)?;
    writeln!(out)?;

    for item in &bill.items {
        let consumers: Vec<String> = bill
            .participants
            .iter()
            .filter_map(|p| match item.units_for(&p.id) {
                0 => None,
                _ if item.is_shared() => Some(p.first_name().to_string()),
                units => Some(format!("{} x{}", p.first_name(), units)),
            })
            .collect();
        let consumers = if consumers.is_empty() {
            "nobody".to_string()
        } else {
            consumers.join(", ")
        };

        writeln!(
            out,
            "  {:>3}x {:<28} {:>12}  {}",
            item.effective_quantity(),
            truncate(&item.name, 28),
            item.price.to_string(),
            consumers
        )?;
    }
    if !bill.tax_amount.is_zero() {
        writeln!(
            out,
            "       {:<28} {:>12}",
            "Tax",
            bill.tax_amount.to_string()
        )?;
    }
    if !bill.tip_amount.is_zero() {
        writeln!(
            out,
            "       {:<28} {:>12}",
            "Tip",
            bill.tip_amount.to_string()
        )?;
    }
    writeln!(out)?;

    write_outcome(&outcome, out)
}
