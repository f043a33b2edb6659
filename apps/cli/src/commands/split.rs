//! `billsplit split <bill.json>`

use std::io::Write;

use billsplit_core::split_bill;

use super::{read_bill, write_outcome};
use crate::cli::SplitArgs;
use crate::error::CliResult;

pub fn run(args: &SplitArgs, out: &mut impl Write) -> CliResult<()> {
    let bill = read_bill(&args.bill)?;
    let outcome = split_bill(&bill);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &outcome)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{} ({})", bill.establishment_name, bill.date)?;
    writeln!(out)?;
    write_outcome(&outcome, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::sample_bill;
    use std::path::PathBuf;

    fn write_bill(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("bill.json");
        std::fs::write(&path, serde_json::to_string(&sample_bill("b1")).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_split_table() {
        let dir = tempfile::tempdir().unwrap();
        let args = SplitArgs {
            bill: write_bill(&dir),
            json: false,
        };

        let mut out = Vec::new();
        run(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Pizzaria Napoli (28/10/2023)"));
        // Ranked: the local user owes the most, so comes first.
        let me = text.find("Eu (you)").unwrap();
        let ana = text.find("Ana").unwrap();
        assert!(me < ana);
        assert!(text.contains("30.1%"));
    }

    #[test]
    fn test_split_json() {
        let dir = tempfile::tempdir().unwrap();
        let args = SplitArgs {
            bill: write_bill(&dir),
            json: true,
        };

        let mut out = Vec::new();
        run(&args, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["totals"].as_array().unwrap().len(), 3);
        assert_eq!(value["discrepancy"]["hasDiscrepancy"], true);
    }

    #[test]
    fn test_missing_bill_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = SplitArgs {
            bill: dir.path().join("nope.json"),
            json: false,
        };
        assert!(run(&args, &mut Vec::new()).is_err());
    }
}
