// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::models::{InvestorPatch, NewInvestor};
use crate::store::RecordStore;
use crate::utils::{arg, fmt_pct, maybe_print_json, opt_arg, parse_decimal, parse_id, pretty_table};

pub fn handle(store: &mut dyn RecordStore, user: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let id = store.create_investor(
                user,
                NewInvestor {
                    name: arg(sub, "name")?.trim().to_string(),
                    expense_percentage: parse_decimal(arg(sub, "expense_pct")?)?,
                    income_percentage: parse_decimal(arg(sub, "income_pct")?)?,
                },
            )?;
            println!("Added investor {}", id);
        }
        Some(("list", sub)) => list(store, user, sub)?,
        Some(("update", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let patch = InvestorPatch {
                name: opt_arg(sub, "name").map(|s| s.trim().to_string()),
                expense_percentage: opt_arg(sub, "expense_pct").map(parse_decimal).transpose()?,
                income_percentage: opt_arg(sub, "income_pct").map(parse_decimal).transpose()?,
            };
            store.update_investor(user, id, patch)?;
            println!("Updated investor {}", id);
        }
        Some(("rm", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            store.delete_investor(user, id)?;
            println!("Deleted investor {}", id);
        }
        Some(("seed", _)) => seed(store, user)?,
        _ => {}
    }
    Ok(())
}

pub fn seed(store: &mut dyn RecordStore, user: &str) -> Result<()> {
    let created = store.seed_default_investors(user)?;
    if created == 0 {
        println!("Investors already present for '{}'; nothing seeded.", user);
    } else {
        println!("Seeded {} default investors for '{}'.", created, user);
    }
    Ok(())
}

fn list(store: &dyn RecordStore, user: &str, sub: &clap::ArgMatches) -> Result<()> {
    let mut investors = store.list_investors(user)?;
    investors.sort_by_key(|i| i.id);
    if maybe_print_json(sub.get_flag("json"), &investors)? {
        return Ok(());
    }
    let rows = investors
        .iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.name.clone(),
                fmt_pct(&i.expense_percentage),
                fmt_pct(&i.income_percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Name", "Expense share", "Income share"], rows)
    );
    Ok(())
}
