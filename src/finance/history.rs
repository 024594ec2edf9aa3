// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Expense, Frequency, Income, RecordId, TransactionKind};

/// Per-currency sums for one calendar month; nothing is converted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthHistory {
    pub year: i32,
    pub month: u32,
    pub income: BTreeMap<String, Decimal>,
    pub expenses: BTreeMap<String, Decimal>,
    pub income_ids: Vec<RecordId>,
    pub expense_ids: Vec<RecordId>,
}

impl MonthHistory {
    /// `YYYY-MM`
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Currencies present this month, sorted.
    pub fn currencies(&self) -> Vec<&str> {
        let mut all: Vec<&str> = self
            .income
            .keys()
            .chain(self.expenses.keys())
            .map(String::as_str)
            .collect();
        all.sort();
        all.dedup();
        all
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub year: Option<i32>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrencyTotals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

fn month_slot(
    grouped: &mut BTreeMap<(i32, u32), MonthHistory>,
    date: NaiveDate,
) -> &mut MonthHistory {
    let (year, month) = (date.year(), date.month());
    grouped.entry((year, month)).or_insert_with(|| MonthHistory {
        year,
        month,
        ..Default::default()
    })
}

/// What an expense adds to the month it is dated in: yearly and quarterly
/// bills are spread to one month, every other cadence counts at face value.
pub fn expense_month_amount(expense: &Expense) -> Decimal {
    match expense.frequency {
        Frequency::Yearly => expense.amount / Decimal::from(12),
        Frequency::Quarterly => expense.amount / Decimal::from(3),
        _ => expense.amount,
    }
}

/// Incomes count at face value; expenses through [`expense_month_amount`].
/// A currency filter drops records in other currencies before grouping, so
/// each month only carries that currency.
pub fn monthly_history(
    incomes: &[Income],
    expenses: &[Expense],
    filter: &HistoryFilter,
) -> Vec<MonthHistory> {
    let currency = filter.currency.as_ref().map(|c| c.trim().to_uppercase());
    let wanted = |ccy: &str| {
        currency
            .as_deref()
            .is_none_or(|c| ccy.trim().eq_ignore_ascii_case(c))
    };

    let mut grouped: BTreeMap<(i32, u32), MonthHistory> = BTreeMap::new();
    for income in incomes.iter().filter(|i| wanted(&i.currency)) {
        let month = month_slot(&mut grouped, income.date);
        *month.income.entry(income.currency.clone()).or_default() += income.amount;
        month.income_ids.push(income.id);
    }
    for expense in expenses.iter().filter(|e| wanted(&e.currency)) {
        let month = month_slot(&mut grouped, expense.date);
        *month.expenses.entry(expense.currency.clone()).or_default() +=
            expense_month_amount(expense);
        month.expense_ids.push(expense.id);
    }

    grouped
        .into_values()
        .rev()
        .filter(|m| filter.year.is_none_or(|y| m.year == y))
        .collect()
}

pub fn currency_totals(months: &[MonthHistory]) -> BTreeMap<String, CurrencyTotals> {
    let mut totals: BTreeMap<String, CurrencyTotals> = BTreeMap::new();
    for month in months {
        for (ccy, amt) in &month.income {
            totals.entry(ccy.clone()).or_default().income += *amt;
        }
        for (ccy, amt) in &month.expenses {
            totals.entry(ccy.clone()).or_default().expenses += *amt;
        }
    }
    for t in totals.values_mut() {
        t.balance = t.income - t.expenses;
    }
    totals
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentEntry {
    pub id: RecordId,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
}

/// Incomes and expenses merged, newest date first.
pub fn recent_transactions(
    incomes: &[Income],
    expenses: &[Expense],
    limit: usize,
) -> Vec<RecentEntry> {
    let mut entries: Vec<RecentEntry> = incomes
        .iter()
        .map(|i| RecentEntry {
            id: i.id,
            kind: TransactionKind::Income,
            date: i.date,
            description: i.description.clone(),
            amount: i.amount,
            currency: i.currency.clone(),
        })
        .chain(expenses.iter().map(|e| RecentEntry {
            id: e.id,
            kind: TransactionKind::Expense,
            date: e.date,
            description: e.description.clone(),
            amount: e.amount,
            currency: e.currency.clone(),
        }))
        .collect();
    entries.sort_by_key(|e| Reverse(e.date));
    entries.truncate(limit);
    entries
}
