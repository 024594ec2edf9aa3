// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use serde_json::json;
use tracing::info;

use crate::finance::history::{HistoryFilter, currency_totals, monthly_history};
use crate::store::RecordStore;
use crate::utils::{arg, fmt_splits};

pub fn handle(store: &dyn RecordStore, user: &str, m: &clap::ArgMatches) -> Result<()> {
    let what = arg(m, "what")?;
    let fmt = arg(m, "format")?.to_lowercase();
    let out = arg(m, "out")?;
    match (what, fmt.as_str()) {
        ("income", "csv") => income_csv(store, user, out)?,
        ("expenses", "csv") => expenses_csv(store, user, out)?,
        ("history", "csv") => history_csv(store, user, out)?,
        ("income", "json") => write_json(out, &store.list_income(user)?)?,
        ("expenses", "json") => write_json(out, &store.list_expenses(user)?)?,
        ("history", "json") => {
            let months = history_of(store, user)?;
            let totals = currency_totals(&months);
            write_json(out, &json!({ "months": months, "totals": totals }))?
        }
        _ => bail!("Unknown export '{}' as '{}' (use income|expenses|history, csv|json)", what, fmt),
    }
    info!(what, format = %fmt, out, "export written");
    println!("Exported {} to {}", what, out);
    Ok(())
}

fn history_of(
    store: &dyn RecordStore,
    user: &str,
) -> Result<Vec<crate::finance::history::MonthHistory>> {
    Ok(monthly_history(
        &store.list_income(user)?,
        &store.list_expenses(user)?,
        &HistoryFilter::default(),
    ))
}

fn write_json<T: serde::Serialize>(out: &str, v: &T) -> Result<()> {
    std::fs::write(out, serde_json::to_string_pretty(v)?)
        .with_context(|| format!("Failed to write {}", out))
}

fn income_csv(store: &dyn RecordStore, user: &str, out: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record([
        "id",
        "date",
        "description",
        "amount",
        "currency",
        "category",
        "frequency",
        "investors",
    ])?;
    for i in store.list_income(user)? {
        wtr.write_record([
            i.id.to_string(),
            i.date.to_string(),
            i.description.clone(),
            i.amount.to_string(),
            i.currency.clone(),
            i.category.clone(),
            i.effective_frequency().to_string(),
            fmt_splits(&i.investors),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn expenses_csv(store: &dyn RecordStore, user: &str, out: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record([
        "id",
        "date",
        "description",
        "amount",
        "currency",
        "category",
        "frequency",
        "paid",
        "investors",
    ])?;
    for e in store.list_expenses(user)? {
        wtr.write_record([
            e.id.to_string(),
            e.date.to_string(),
            e.description.clone(),
            e.amount.to_string(),
            e.currency.clone(),
            e.category.clone(),
            e.frequency.to_string(),
            e.paid.to_string(),
            fmt_splits(&e.investors),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per month and currency.
fn history_csv(store: &dyn RecordStore, user: &str, out: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record(["month", "currency", "income", "expenses", "balance"])?;
    for month in history_of(store, user)? {
        for ccy in month.currencies() {
            let income = month.income.get(ccy).copied().unwrap_or_default();
            let expenses = month.expenses.get(ccy).copied().unwrap_or_default();
            wtr.write_record([
                month.label(),
                ccy.to_string(),
                income.to_string(),
                expenses.to_string(),
                (income - expenses).to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}
