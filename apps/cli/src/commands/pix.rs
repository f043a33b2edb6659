//! `billsplit pix`
//!
//! Prints a Pix "copia e cola" payload and nothing else, so the output can
//! be piped straight into a QR encoder:
//!
//! ```text
//! billsplit pix --amount 28,75 | qrencode -t ansiutf8
//! ```

use std::io::Write;

use billsplit_core::validation::parse_amount_input;
use billsplit_core::{BillDraft, PixRequest};
use tracing::info;

use super::read_bill;
use crate::cli::PixArgs;
use crate::config::PixSettings;
use crate::error::{CliError, CliResult};

pub fn run(args: &PixArgs, settings: &PixSettings, out: &mut impl Write) -> CliResult<()> {
    let key = args
        .key
        .as_deref()
        .or(settings.key.as_deref())
        .ok_or(CliError::MissingPixKey)?;
    let city = args.city.as_deref().unwrap_or(&settings.city);
    let label = args.label.as_deref().unwrap_or(&settings.reference_label);

    let request = if let Some(text) = &args.amount {
        let amount =
            parse_amount_input(text).ok_or_else(|| CliError::InvalidAmount(text.clone()))?;
        let name = args.name.as_deref().unwrap_or(&settings.payee_name);
        PixRequest::new(key, name, city, amount)
    } else if let Some(path) = &args.bill {
        let bill = read_bill(path)?;
        BillDraft::from_bill(&bill).pix_request(
            key,
            args.name.as_deref(),
            city,
            &settings.payee_name,
        )
    } else {
        return Err(CliError::InvalidAmount(String::new()));
    };

    let request = request.with_reference_label(label);
    let payload = request.build()?;
    info!(amount = %request.amount, city = %request.city, "Pix payload generated");

    writeln!(out, "{}", payload)?;
    Ok(())
}
