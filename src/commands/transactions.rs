// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Argument decoding shared by the `income` and `expense` commands.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::finance::split::{default_split, validate_split};
use crate::models::{Frequency, Split, TransactionKind};
use crate::store::RecordStore;
use crate::utils::{arg, opt_arg, parse_date, parse_decimal, parse_frequency, parse_split, today};

pub struct TransactionInput {
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub date: NaiveDate,
    pub frequency: Option<Frequency>,
    pub investors: Vec<Split>,
}

#[derive(Default)]
pub struct TransactionChanges {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
    pub investors: Option<Vec<Split>>,
}

pub fn currency_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Explicit `--split` values, checked against the 100% rule.
pub fn explicit_splits(m: &clap::ArgMatches) -> Result<Option<Vec<Split>>> {
    let Some(values) = m.get_many::<String>("split") else {
        return Ok(None);
    };
    let splits = values
        .map(|v| parse_split(v))
        .collect::<Result<Vec<_>>>()?;
    validate_split(&splits)?;
    Ok(Some(splits))
}

/// `--split` values if given, otherwise the user's investor presets for `kind`.
pub fn resolve_splits(
    store: &dyn RecordStore,
    user: &str,
    m: &clap::ArgMatches,
    kind: TransactionKind,
) -> Result<Vec<Split>> {
    if let Some(splits) = explicit_splits(m)? {
        return Ok(splits);
    }
    let mut investors = store.list_investors(user)?;
    if investors.is_empty() {
        bail!("No investors for user '{user}'; run `sharebook investor seed` or pass --split");
    }
    investors.sort_by_key(|i| i.id);
    let splits = default_split(&investors, kind);
    validate_split(&splits).context("Investor default percentages do not add up; pass --split")?;
    Ok(splits)
}

pub fn read_new(
    store: &dyn RecordStore,
    user: &str,
    m: &clap::ArgMatches,
    kind: TransactionKind,
) -> Result<TransactionInput> {
    let frequency = opt_arg(m, "frequency").map(parse_frequency).transpose()?;
    Ok(TransactionInput {
        description: arg(m, "description")?.trim().to_string(),
        amount: parse_decimal(arg(m, "amount")?)?,
        currency: currency_code(opt_arg(m, "currency").unwrap_or("USD")),
        category: arg(m, "category")?.trim().to_string(),
        date: opt_arg(m, "date").map(parse_date).transpose()?.unwrap_or_else(today),
        frequency,
        investors: resolve_splits(store, user, m, kind)?,
    })
}

pub fn read_changes(m: &clap::ArgMatches) -> Result<TransactionChanges> {
    Ok(TransactionChanges {
        description: opt_arg(m, "description").map(|s| s.trim().to_string()),
        amount: opt_arg(m, "amount").map(parse_decimal).transpose()?,
        currency: opt_arg(m, "currency").map(currency_code),
        category: opt_arg(m, "category").map(|s| s.trim().to_string()),
        date: opt_arg(m, "date").map(parse_date).transpose()?,
        frequency: opt_arg(m, "frequency").map(parse_frequency).transpose()?,
        investors: explicit_splits(m)?,
    })
}
