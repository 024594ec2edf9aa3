// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::warn;

use crate::finance::currency::{Currency, convert, format, format_native, sar_per_usd};
use crate::utils::{arg, parse_decimal};

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("convert", sub)) => convert_amount(sub)?,
        Some(("format", sub)) => {
            let amount = parse_decimal(arg(sub, "amount")?)?;
            let ccy = arg(sub, "currency")?;
            println!("{}", format(amount, ccy).combined);
        }
        _ => {}
    }
    Ok(())
}

fn convert_amount(sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let from = arg(sub, "from")?.trim().to_uppercase();
    let to = arg(sub, "to")?.trim().to_uppercase();
    for code in [&from, &to] {
        if Currency::from_code(code).is_none() {
            warn!(currency = %code, "unsupported currency, amount passes through unchanged");
        }
    }
    let res = convert(amount, &from, &to);
    println!(
        "{} -> {} (1 USD = {} SAR)",
        format_native(amount, &from),
        format_native(res, &to),
        sar_per_usd()
    );
    Ok(())
}
