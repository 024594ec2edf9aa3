// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::transactions::{read_changes, read_new};
use crate::finance::cadence::to_monthly;
use crate::finance::currency::{format, format_native, to_usd};
use crate::models::{ExpensePatch, NewExpense, TransactionKind};
use crate::store::RecordStore;
use crate::utils::{arg, fmt_splits, maybe_print_json, parse_id, pretty_table};

pub fn handle(store: &mut dyn RecordStore, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, user, sub)?,
        Some(("list", sub)) => list(store, user, sub)?,
        Some(("update", sub)) => update(store, user, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            store.delete_expense(user, id)?;
            println!("Deleted expense {}", id);
        }
        Some(("pay", sub)) => mark(store, user, sub, true)?,
        Some(("unpay", sub)) => mark(store, user, sub, false)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &mut dyn RecordStore, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let input = read_new(store, user, sub, TransactionKind::Expense)?;
    let id = store.create_expense(
        user,
        NewExpense {
            description: input.description,
            amount: input.amount,
            currency: input.currency,
            category: input.category,
            date: input.date,
            frequency: input.frequency,
            investors: input.investors,
        },
    )?;
    println!("Added expense {}", id);
    Ok(())
}

fn list(store: &dyn RecordStore, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let mut expenses = store.list_expenses(user)?;
    if sub.get_flag("unpaid") {
        expenses.retain(|e| !e.paid);
    }
    if maybe_print_json(sub.get_flag("json"), &expenses)? {
        return Ok(());
    }
    let rows = expenses
        .iter()
        .map(|e| {
            let monthly = to_monthly(to_usd(e.amount, &e.currency), e.frequency);
            vec![
                e.id.to_string(),
                e.date.to_string(),
                e.description.clone(),
                e.category.clone(),
                format(e.amount, &e.currency).combined,
                e.frequency.to_string(),
                format_native(monthly, "USD"),
                if e.paid { "yes" } else { "no" }.to_string(),
                fmt_splits(&e.investors),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID",
                "Date",
                "Description",
                "Category",
                "Amount",
                "Frequency",
                "Monthly (USD)",
                "Paid",
                "Split",
            ],
            rows
        )
    );
    Ok(())
}

fn update(store: &mut dyn RecordStore, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    let c = read_changes(sub)?;
    store.update_expense(
        user,
        id,
        ExpensePatch {
            description: c.description,
            amount: c.amount,
            currency: c.currency,
            category: c.category,
            date: c.date,
            frequency: c.frequency,
            paid: None,
            investors: c.investors,
        },
    )?;
    println!("Updated expense {}", id);
    Ok(())
}

fn mark(store: &mut dyn RecordStore, user: &str, sub: &clap::ArgMatches, paid: bool) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    store.set_paid(user, id, paid)?;
    println!(
        "Expense {} marked {}",
        id,
        if paid { "paid" } else { "unpaid" }
    );
    Ok(())
}
