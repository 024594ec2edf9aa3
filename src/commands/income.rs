// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::transactions::{read_changes, read_new};
use crate::finance::currency::format;
use crate::models::{IncomePatch, NewIncome, TransactionKind};
use crate::store::RecordStore;
use crate::utils::{arg, fmt_splits, maybe_print_json, parse_id, pretty_table};

pub fn handle(store: &mut dyn RecordStore, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, user, sub)?,
        Some(("list", sub)) => list(store, user, sub)?,
        Some(("update", sub)) => update(store, user, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            store.delete_income(user, id)?;
            println!("Deleted income {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &mut dyn RecordStore, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let input = read_new(store, user, sub, TransactionKind::Income)?;
    let id = store.create_income(
        user,
        NewIncome {
            description: input.description,
            amount: input.amount,
            currency: input.currency,
            category: input.category,
            date: input.date,
            frequency: input.frequency,
            investors: input.investors,
        },
    )?;
    println!("Added income {}", id);
    Ok(())
}

fn list(store: &dyn RecordStore, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let incomes = store.list_income(user)?;
    if maybe_print_json(sub.get_flag("json"), &incomes)? {
        return Ok(());
    }
    let rows = incomes
        .iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.date.to_string(),
                i.description.clone(),
                i.category.clone(),
                format(i.amount, &i.currency).combined,
                i.effective_frequency().to_string(),
                fmt_splits(&i.investors),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Description", "Category", "Amount", "Frequency", "Split"],
            rows
        )
    );
    Ok(())
}

fn update(store: &mut dyn RecordStore, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    let c = read_changes(sub)?;
    store.update_income(
        user,
        id,
        IncomePatch {
            description: c.description,
            amount: c.amount,
            currency: c.currency,
            category: c.category,
            date: c.date,
            frequency: c.frequency,
            investors: c.investors,
        },
    )?;
    println!("Updated income {}", id);
    Ok(())
}
