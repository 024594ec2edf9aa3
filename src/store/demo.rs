// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Demo-mode store: everything lives in memory and, when a path is given, is
//! written back to one JSON file after each mutation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Collection, Listeners, RecordStore, StoreError, ensure_owner};
use crate::models::{
    Expense, ExpensePatch, Income, IncomePatch, Investor, InvestorPatch, NewExpense, NewIncome,
    NewInvestor, RecordId,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DemoData {
    next_id: RecordId,
    #[serde(default)]
    income: Vec<Income>,
    #[serde(default)]
    expenses: Vec<Expense>,
    #[serde(default)]
    investors: Vec<Investor>,
}

impl DemoData {
    /// Hand-edited files go through the same checks as new records.
    fn validate(&self) -> Result<(), StoreError> {
        for r in &self.income {
            r.validate()?;
        }
        for r in &self.expenses {
            r.validate()?;
        }
        for r in &self.investors {
            r.validate()?;
        }
        Ok(())
    }

    fn next_id(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }
}

fn position<T>(
    items: &[T],
    id: RecordId,
    user: &str,
    collection: Collection,
    key: impl Fn(&T) -> (RecordId, &str),
) -> Result<usize, StoreError> {
    let idx = items
        .iter()
        .position(|r| key(r).0 == id)
        .ok_or(StoreError::NotFound { collection, id })?;
    ensure_owner(key(&items[idx]).1, user, collection, id)?;
    Ok(idx)
}

#[derive(Default)]
pub struct DemoStore {
    path: Option<PathBuf>,
    data: DemoData,
    listeners: Listeners,
}

impl DemoStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let data: DemoData = if path.exists() {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        } else {
            DemoData::default()
        };
        data.validate()?;
        info!(path = %path.display(), "opened demo store");
        Ok(Self {
            path: Some(path.to_path_buf()),
            data,
            listeners: Listeners::default(),
        })
    }

    /// Nothing is written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    fn save(&self, data: &DemoData) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(data)?)?;
        debug!(path = %path.display(), "demo store saved");
        Ok(())
    }

    /// Writes `next` and only then makes it the live state, so a failed write
    /// leaves the store as it was.
    fn commit(
        &mut self,
        next: DemoData,
        user: &str,
        collection: Collection,
    ) -> Result<(), StoreError> {
        self.save(&next)?;
        self.data = next;
        self.publish(user, collection)
    }
}

fn owned_newest_first<T: Clone>(items: &[T], user: &str, owner: impl Fn(&T) -> &str) -> Vec<T> {
    items
        .iter()
        .rev()
        .filter(|r| owner(r) == user)
        .cloned()
        .collect()
}

fn missing(collection: Collection, id: RecordId) -> StoreError {
    StoreError::NotFound { collection, id }
}

impl RecordStore for DemoStore {
    fn backend(&self) -> &'static str {
        "demo"
    }

    fn list_income(&self, user: &str) -> Result<Vec<Income>, StoreError> {
        Ok(owned_newest_first(&self.data.income, user, |r| r.user_id.as_str()))
    }

    fn list_expenses(&self, user: &str) -> Result<Vec<Expense>, StoreError> {
        Ok(owned_newest_first(&self.data.expenses, user, |r| r.user_id.as_str()))
    }

    fn list_investors(&self, user: &str) -> Result<Vec<Investor>, StoreError> {
        Ok(owned_newest_first(&self.data.investors, user, |r| r.user_id.as_str()))
    }

    fn get_income(&self, id: RecordId) -> Result<Income, StoreError> {
        self.data
            .income
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| missing(Collection::Income, id))
    }

    fn get_expense(&self, id: RecordId) -> Result<Expense, StoreError> {
        self.data
            .expenses
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| missing(Collection::Expenses, id))
    }

    fn get_investor(&self, id: RecordId) -> Result<Investor, StoreError> {
        self.data
            .investors
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| missing(Collection::Investors, id))
    }

    fn create_income(&mut self, user: &str, income: NewIncome) -> Result<RecordId, StoreError> {
        income.validate()?;
        let mut next = self.data.clone();
        let id = next.next_id();
        next.income.push(income.into_income(id, user));
        self.commit(next, user, Collection::Income)?;
        info!(id, user, "created income");
        Ok(id)
    }

    fn create_expense(
        &mut self,
        user: &str,
        expense: NewExpense,
    ) -> Result<RecordId, StoreError> {
        expense.validate()?;
        let mut next = self.data.clone();
        let id = next.next_id();
        next.expenses.push(expense.into_expense(id, user)?);
        self.commit(next, user, Collection::Expenses)?;
        info!(id, user, "created expense");
        Ok(id)
    }

    fn create_investor(
        &mut self,
        user: &str,
        investor: NewInvestor,
    ) -> Result<RecordId, StoreError> {
        investor.validate()?;
        let mut next = self.data.clone();
        let id = next.next_id();
        next.investors.push(investor.into_investor(id, user));
        self.commit(next, user, Collection::Investors)?;
        info!(id, user, "created investor");
        Ok(id)
    }

    fn update_income(
        &mut self,
        user: &str,
        id: RecordId,
        patch: IncomePatch,
    ) -> Result<(), StoreError> {
        let idx = position(&self.data.income, id, user, Collection::Income, |r| {
            (r.id, r.user_id.as_str())
        })?;
        let mut next = self.data.clone();
        patch.apply(&mut next.income[idx]);
        next.income[idx].validate()?;
        self.commit(next, user, Collection::Income)?;
        info!(id, "updated income");
        Ok(())
    }

    fn update_expense(
        &mut self,
        user: &str,
        id: RecordId,
        patch: ExpensePatch,
    ) -> Result<(), StoreError> {
        let idx = position(&self.data.expenses, id, user, Collection::Expenses, |r| {
            (r.id, r.user_id.as_str())
        })?;
        let mut next = self.data.clone();
        patch.apply(&mut next.expenses[idx]);
        next.expenses[idx].validate()?;
        let paid = next.expenses[idx].paid;
        self.commit(next, user, Collection::Expenses)?;
        info!(id, paid, "updated expense");
        Ok(())
    }

    fn update_investor(
        &mut self,
        user: &str,
        id: RecordId,
        patch: InvestorPatch,
    ) -> Result<(), StoreError> {
        let idx = position(&self.data.investors, id, user, Collection::Investors, |r| {
            (r.id, r.user_id.as_str())
        })?;
        let mut next = self.data.clone();
        patch.apply(&mut next.investors[idx]);
        next.investors[idx].validate()?;
        self.commit(next, user, Collection::Investors)?;
        info!(id, "updated investor");
        Ok(())
    }

    fn delete_income(&mut self, user: &str, id: RecordId) -> Result<(), StoreError> {
        let idx = position(&self.data.income, id, user, Collection::Income, |r| {
            (r.id, r.user_id.as_str())
        })?;
        let mut next = self.data.clone();
        next.income.remove(idx);
        self.commit(next, user, Collection::Income)?;
        info!(id, "deleted income");
        Ok(())
    }

    fn delete_expense(&mut self, user: &str, id: RecordId) -> Result<(), StoreError> {
        let idx = position(&self.data.expenses, id, user, Collection::Expenses, |r| {
            (r.id, r.user_id.as_str())
        })?;
        let mut next = self.data.clone();
        next.expenses.remove(idx);
        self.commit(next, user, Collection::Expenses)?;
        info!(id, "deleted expense");
        Ok(())
    }

    fn delete_investor(&mut self, user: &str, id: RecordId) -> Result<(), StoreError> {
        let idx = position(&self.data.investors, id, user, Collection::Investors, |r| {
            (r.id, r.user_id.as_str())
        })?;
        let mut next = self.data.clone();
        next.investors.remove(idx);
        self.commit(next, user, Collection::Investors)?;
        info!(id, "deleted investor");
        Ok(())
    }

    fn listeners(&mut self) -> &mut Listeners {
        &mut self.listeners
    }
}
