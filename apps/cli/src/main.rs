//! # billsplit
//!
//! ```text
//! billsplit split dinner.json
//! billsplit pix --amount 28,75
//! billsplit history list --status pending
//! ```
//!
//! Setup and dispatch live in `lib.rs` so they can be tested.

fn main() {
    std::process::exit(billsplit_cli::run());
}
