// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Folds income and expense snapshots into USD totals and per-investor shares.
//!
//! Every amount is normalized to USD first, then to the monthly or yearly
//! cadence, then distributed over the record's own split list. Shares are
//! keyed by the investor name written in the split, so a name that matches
//! no known investor still gets its own bucket (see [`Breakdown::unmatched`]).

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::finance::cadence::{to_monthly, to_yearly};
use crate::finance::currency::to_usd;
use crate::models::{Expense, Frequency, Income, Investor, Split};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub monthly_income: Decimal,
    pub yearly_income: Decimal,
    pub monthly_expense: Decimal,
    pub yearly_expense: Decimal,
    pub paid_monthly_expense: Decimal,
    pub unpaid_monthly_expense: Decimal,
    pub paid_yearly_expense: Decimal,
    pub unpaid_yearly_expense: Decimal,
    /// Monthly income minus what is still unpaid this month.
    pub net_balance: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InvestorShare {
    pub monthly: Decimal,
    pub yearly: Decimal,
    pub unpaid_monthly: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdown {
    pub income: BTreeMap<String, InvestorShare>,
    pub expenses: BTreeMap<String, InvestorShare>,
}

impl Breakdown {
    /// Split names with a bucket that no investor in `investors` carries.
    pub fn unmatched(&self, investors: &[Investor]) -> Vec<String> {
        let known: HashSet<&str> = investors.iter().map(|i| i.name.as_str()).collect();
        let mut names: Vec<String> = self
            .income
            .keys()
            .chain(self.expenses.keys())
            .filter(|n| !known.contains(n.as_str()))
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Counts {
    pub incomes: usize,
    pub expenses: usize,
    pub paid_expenses: usize,
    pub investors: usize,
    /// Mean face amount of all incomes in USD, ignoring cadence.
    pub average_income: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub totals: Totals,
    pub breakdown: Breakdown,
    pub counts: Counts,
}

struct Normalized {
    monthly: Decimal,
    yearly: Decimal,
}

fn normalize(amount: Decimal, currency: &str, frequency: Frequency) -> Normalized {
    let usd = to_usd(amount, currency);
    Normalized {
        monthly: to_monthly(usd, frequency),
        yearly: to_yearly(usd, frequency),
    }
}

fn seeded(investors: &[Investor]) -> BTreeMap<String, InvestorShare> {
    investors
        .iter()
        .map(|i| (i.name.clone(), InvestorShare::default()))
        .collect()
}

fn distribute(
    buckets: &mut BTreeMap<String, InvestorShare>,
    splits: &[Split],
    amount: &Normalized,
    unpaid: bool,
) {
    let hundred = Decimal::ONE_HUNDRED;
    for split in splits {
        let monthly = amount.monthly * split.percentage / hundred;
        let yearly = amount.yearly * split.percentage / hundred;
        let share = buckets.entry(split.name.clone()).or_default();
        share.monthly += monthly;
        share.yearly += yearly;
        if unpaid {
            share.unpaid_monthly += monthly;
        }
    }
}

pub fn summarize(incomes: &[Income], expenses: &[Expense], investors: &[Investor]) -> Summary {
    let mut totals = Totals::default();
    let mut breakdown = Breakdown {
        income: seeded(investors),
        expenses: seeded(investors),
    };

    let mut face_income = Decimal::ZERO;
    for income in incomes {
        let n = normalize(income.amount, &income.currency, income.effective_frequency());
        totals.monthly_income += n.monthly;
        totals.yearly_income += n.yearly;
        face_income += to_usd(income.amount, &income.currency);
        distribute(&mut breakdown.income, &income.investors, &n, false);
    }

    let mut paid_expenses = 0;
    for expense in expenses {
        let n = normalize(expense.amount, &expense.currency, expense.frequency);
        totals.monthly_expense += n.monthly;
        totals.yearly_expense += n.yearly;
        if expense.paid {
            paid_expenses += 1;
            totals.paid_monthly_expense += n.monthly;
            totals.paid_yearly_expense += n.yearly;
        } else {
            totals.unpaid_monthly_expense += n.monthly;
            totals.unpaid_yearly_expense += n.yearly;
        }
        distribute(&mut breakdown.expenses, &expense.investors, &n, !expense.paid);
    }
    totals.net_balance = totals.monthly_income - totals.unpaid_monthly_expense;

    for name in breakdown.unmatched(investors) {
        warn!(investor = %name, "split names an investor that is not on the roster");
    }

    let average_income = if incomes.is_empty() {
        Decimal::ZERO
    } else {
        face_income / Decimal::from(incomes.len())
    };

    Summary {
        totals,
        breakdown,
        counts: Counts {
            incomes: incomes.len(),
            expenses: expenses.len(),
            paid_expenses,
            investors: investors.len(),
            average_income,
        },
    }
}
