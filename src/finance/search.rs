// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;

use crate::finance::currency::format_native;
use crate::models::{Expense, Income, Investor, RecordId};

pub const MAX_RESULTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Page {
    Income,
    Expenses,
    Investors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Income,
    Expense,
    Investor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: RecordId,
    pub title: String,
    pub subtitle: String,
    pub source_page: Page,
    pub kind: ResultKind,
}

/// Substring lookup across incomes, expenses and investors, in that order.
/// Results are not ranked; the first [`MAX_RESULTS`] matches win.
pub fn search(
    query: &str,
    incomes: &[Income],
    expenses: &[Expense],
    investors: &[Investor],
) -> Vec<SearchResult> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let hit = |field: &str| field.to_lowercase().contains(&needle);

    let income_hits = incomes
        .iter()
        .filter(|i| hit(&i.description) || hit(&i.category) || hit(&i.currency))
        .map(|i| SearchResult {
            id: i.id,
            title: i.description.clone(),
            subtitle: format!("{} • {}", format_native(i.amount, &i.currency), i.category),
            source_page: Page::Income,
            kind: ResultKind::Income,
        });

    let expense_hits = expenses
        .iter()
        .filter(|e| {
            hit(&e.description) || hit(&e.category) || hit(&e.currency) || hit(e.frequency.label())
        })
        .map(|e| SearchResult {
            id: e.id,
            title: e.description.clone(),
            subtitle: format!(
                "{} • {} • {}",
                format_native(e.amount, &e.currency),
                e.category,
                e.frequency
            ),
            source_page: Page::Expenses,
            kind: ResultKind::Expense,
        });

    let investor_hits = investors
        .iter()
        .filter(|inv| hit(&inv.name))
        .map(|inv| SearchResult {
            id: inv.id,
            title: inv.name.clone(),
            subtitle: format!(
                "Expense: {}% • Income: {}%",
                inv.expense_percentage.normalize(),
                inv.income_percentage.normalize()
            ),
            source_page: Page::Investors,
            kind: ResultKind::Investor,
        });

    income_hits
        .chain(expense_hits)
        .chain(investor_hits)
        .take(MAX_RESULTS)
        .collect()
}
