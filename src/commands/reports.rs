// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use anyhow::Result;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::warn;

use crate::finance::aggregate::InvestorShare;
use crate::finance::currency::format_native;
use crate::finance::history::{HistoryFilter, currency_totals, monthly_history, recent_transactions};
use crate::finance::summarize;
use crate::store::RecordStore;
use crate::utils::{maybe_print_json, pretty_table};

const RECENT_LIMIT: usize = 5;

fn usd(d: Decimal) -> String {
    format_native(d, "USD")
}

pub fn summary(store: &dyn RecordStore, user: &str, m: &clap::ArgMatches) -> Result<()> {
    let incomes = store.list_income(user)?;
    let expenses = store.list_expenses(user)?;
    let investors = store.list_investors(user)?;
    let s = summarize(&incomes, &expenses, &investors);
    let recent = recent_transactions(&incomes, &expenses, RECENT_LIMIT);

    let payload = json!({
        "totals": s.totals,
        "counts": s.counts,
        "recent": recent,
    });
    if maybe_print_json(m.get_flag("json"), &payload)? {
        return Ok(());
    }

    let t = &s.totals;
    let rows = vec![
        vec!["Income".into(), usd(t.monthly_income), usd(t.yearly_income)],
        vec!["Expenses".into(), usd(t.monthly_expense), usd(t.yearly_expense)],
        vec![
            "  paid".into(),
            usd(t.paid_monthly_expense),
            usd(t.paid_yearly_expense),
        ],
        vec![
            "  unpaid".into(),
            usd(t.unpaid_monthly_expense),
            usd(t.unpaid_yearly_expense),
        ],
        vec!["Net balance".into(), usd(t.net_balance), String::new()],
    ];
    println!("{}", pretty_table(&["", "Monthly (USD)", "Yearly (USD)"], rows));

    let c = &s.counts;
    println!(
        "{} incomes (avg {}), {} expenses ({} paid), {} investors",
        c.incomes,
        usd(c.average_income),
        c.expenses,
        c.paid_expenses,
        c.investors
    );

    if !recent.is_empty() {
        let rows = recent
            .iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    format!("{:?}", r.kind).to_lowercase(),
                    r.description.clone(),
                    format_native(r.amount, &r.currency),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Kind", "Description", "Amount"], rows));
    }
    Ok(())
}

fn share_rows(shares: &BTreeMap<String, InvestorShare>) -> Vec<Vec<String>> {
    shares
        .iter()
        .map(|(name, s)| {
            vec![
                name.clone(),
                usd(s.monthly),
                usd(s.yearly),
                usd(s.unpaid_monthly),
            ]
        })
        .collect()
}

pub fn breakdown(store: &dyn RecordStore, user: &str, m: &clap::ArgMatches) -> Result<()> {
    let investors = store.list_investors(user)?;
    let s = summarize(
        &store.list_income(user)?,
        &store.list_expenses(user)?,
        &investors,
    );
    let kind = m
        .get_one::<String>("kind")
        .map(String::as_str)
        .unwrap_or("all");
    let (show_income, show_expense) = match kind {
        "income" => (true, false),
        "expense" => (false, true),
        _ => (true, true),
    };

    if m.get_flag("json") {
        let mut payload = serde_json::Map::new();
        if show_income {
            payload.insert("income".into(), serde_json::to_value(&s.breakdown.income)?);
        }
        if show_expense {
            payload.insert("expenses".into(), serde_json::to_value(&s.breakdown.expenses)?);
        }
        maybe_print_json(true, &payload)?;
        return Ok(());
    }

    let headers = ["Investor", "Monthly (USD)", "Yearly (USD)", "Unpaid monthly"];
    if show_income {
        println!("Income shares");
        println!("{}", pretty_table(&headers, share_rows(&s.breakdown.income)));
    }
    if show_expense {
        println!("Expense shares");
        println!("{}", pretty_table(&headers, share_rows(&s.breakdown.expenses)));
    }
    let unmatched = s.breakdown.unmatched(&investors);
    if !unmatched.is_empty() {
        warn!(names = ?unmatched, "split names without a matching investor");
        println!("Not a current investor: {}", unmatched.join(", "));
    }
    Ok(())
}

pub fn history(store: &dyn RecordStore, user: &str, m: &clap::ArgMatches) -> Result<()> {
    let filter = HistoryFilter {
        year: m.get_one::<i32>("year").copied(),
        currency: m.get_one::<String>("currency").cloned(),
    };
    let months = monthly_history(
        &store.list_income(user)?,
        &store.list_expenses(user)?,
        &filter,
    );
    let totals = currency_totals(&months);
    if maybe_print_json(
        m.get_flag("json"),
        &json!({ "months": months, "totals": totals }),
    )? {
        return Ok(());
    }

    let mut rows = Vec::new();
    for month in &months {
        for ccy in month.currencies() {
            let income = month.income.get(ccy).copied().unwrap_or_default();
            let expense = month.expenses.get(ccy).copied().unwrap_or_default();
            rows.push(vec![
                month.label(),
                format_native(income, ccy),
                format_native(expense, ccy),
                format_native(income - expense, ccy),
            ]);
        }
    }
    println!("{}", pretty_table(&["Month", "Income", "Expenses", "Balance"], rows));

    let rows = totals
        .iter()
        .map(|(ccy, t)| {
            vec![
                ccy.clone(),
                format_native(t.income, ccy),
                format_native(t.expenses, ccy),
                format_native(t.balance, ccy),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Currency", "Income", "Expenses", "Balance"], rows));
    Ok(())
}
