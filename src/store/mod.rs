// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record persistence behind one trait, with a SQLite backend and a JSON-file
//! demo backend selected once at startup.

pub mod demo;
pub mod sqlite;

use std::fmt;

use anyhow::Result;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, StoreMode};
use crate::models::{
    Expense, ExpensePatch, Income, IncomePatch, Investor, InvestorPatch, NewExpense, NewIncome,
    NewInvestor, RecordError, RecordId,
};

pub use demo::DemoStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Income,
    Expenses,
    Investors,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Income => f.write_str("income"),
            Collection::Expenses => f.write_str("expense"),
            Collection::Investors => f.write_str("investor"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: RecordId },
    #[error(transparent)]
    Invalid(#[from] RecordError),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed stored data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt {field} value '{value}' in stored record")]
    Corrupt { field: &'static str, value: String },
}

/// Fresh snapshot of one collection for one user, handed to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Income(Vec<Income>),
    Expenses(Vec<Expense>),
    Investors(Vec<Investor>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Callback = Box<dyn FnMut(&Change)>;

struct Listener {
    id: SubscriptionId,
    user: String,
    collection: Collection,
    callback: Callback,
}

#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<Listener>,
}

impl Listeners {
    fn add(&mut self, user: &str, collection: Collection, callback: Callback) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push(Listener {
            id,
            user: user.to_string(),
            collection,
            callback,
        });
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|l| l.id != id);
        self.entries.len() != before
    }

    fn wants(&self, user: &str, collection: Collection) -> bool {
        self.entries
            .iter()
            .any(|l| l.user == user && l.collection == collection)
    }

    fn notify(&mut self, user: &str, collection: Collection, change: &Change) {
        for l in self
            .entries
            .iter_mut()
            .filter(|l| l.user == user && l.collection == collection)
        {
            (l.callback)(change);
        }
    }
}

pub trait RecordStore {
    fn backend(&self) -> &'static str;

    fn list_income(&self, user: &str) -> Result<Vec<Income>, StoreError>;
    fn list_expenses(&self, user: &str) -> Result<Vec<Expense>, StoreError>;
    fn list_investors(&self, user: &str) -> Result<Vec<Investor>, StoreError>;

    fn get_income(&self, id: RecordId) -> Result<Income, StoreError>;
    fn get_expense(&self, id: RecordId) -> Result<Expense, StoreError>;
    fn get_investor(&self, id: RecordId) -> Result<Investor, StoreError>;

    fn create_income(&mut self, user: &str, income: NewIncome) -> Result<RecordId, StoreError>;
    fn create_expense(&mut self, user: &str, expense: NewExpense)
    -> Result<RecordId, StoreError>;
    fn create_investor(
        &mut self,
        user: &str,
        investor: NewInvestor,
    ) -> Result<RecordId, StoreError>;

    /// Updates and deletes only touch records owned by `user`; anyone else's
    /// id is reported as [`StoreError::NotFound`].
    fn update_income(
        &mut self,
        user: &str,
        id: RecordId,
        patch: IncomePatch,
    ) -> Result<(), StoreError>;
    fn update_expense(
        &mut self,
        user: &str,
        id: RecordId,
        patch: ExpensePatch,
    ) -> Result<(), StoreError>;
    fn update_investor(
        &mut self,
        user: &str,
        id: RecordId,
        patch: InvestorPatch,
    ) -> Result<(), StoreError>;

    fn delete_income(&mut self, user: &str, id: RecordId) -> Result<(), StoreError>;
    fn delete_expense(&mut self, user: &str, id: RecordId) -> Result<(), StoreError>;
    fn delete_investor(&mut self, user: &str, id: RecordId) -> Result<(), StoreError>;

    fn listeners(&mut self) -> &mut Listeners;

    fn set_paid(&mut self, user: &str, id: RecordId, paid: bool) -> Result<(), StoreError> {
        self.update_expense(
            user,
            id,
            ExpensePatch {
                paid: Some(paid),
                ..Default::default()
            },
        )
    }

    fn snapshot(&self, user: &str, collection: Collection) -> Result<Change, StoreError> {
        Ok(match collection {
            Collection::Income => Change::Income(self.list_income(user)?),
            Collection::Expenses => Change::Expenses(self.list_expenses(user)?),
            Collection::Investors => Change::Investors(self.list_investors(user)?),
        })
    }

    /// Registers `callback` and calls it right away with the current snapshot.
    fn subscribe(
        &mut self,
        user: &str,
        collection: Collection,
        mut callback: Callback,
    ) -> Result<SubscriptionId, StoreError> {
        let current = self.snapshot(user, collection)?;
        callback(&current);
        let id = self.listeners().add(user, collection, callback);
        debug!(?id, user, %collection, "subscribed");
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners().remove(id)
    }

    /// Pushes a fresh snapshot to the user's subscribers of `collection`.
    fn publish(&mut self, user: &str, collection: Collection) -> Result<(), StoreError> {
        if !self.listeners().wants(user, collection) {
            return Ok(());
        }
        let change = self.snapshot(user, collection)?;
        self.listeners().notify(user, collection, &change);
        Ok(())
    }

    /// Creates the default roster for a user that has no investors yet.
    /// Returns how many investors were created.
    fn seed_default_investors(&mut self, user: &str) -> Result<usize, StoreError> {
        if !self.list_investors(user)?.is_empty() {
            return Ok(0);
        }
        let roster = default_roster();
        let created = roster.len();
        for investor in roster {
            self.create_investor(user, investor)?;
        }
        info!(user, created, "seeded default investors");
        Ok(created)
    }
}

/// Hides records of other users behind the same error a missing id gives.
pub(crate) fn ensure_owner(
    owner: &str,
    user: &str,
    collection: Collection,
    id: RecordId,
) -> Result<(), StoreError> {
    if owner == user {
        Ok(())
    } else {
        Err(StoreError::NotFound { collection, id })
    }
}

pub fn default_roster() -> Vec<NewInvestor> {
    [
        ("Abdulrahman Mahamood", 42, 34),
        ("Mohammed Alshalabi", 42, 33),
        ("Mohammad Hani", 16, 33),
    ]
    .into_iter()
    .map(|(name, expense, income)| NewInvestor {
        name: name.to_string(),
        expense_percentage: Decimal::from(expense),
        income_percentage: Decimal::from(income),
    })
    .collect()
}

pub fn open(config: &AppConfig) -> Result<Box<dyn RecordStore>> {
    match config.mode {
        StoreMode::Database => match SqliteStore::open(&config.db_path()) {
            Ok(store) => Ok(Box::new(store)),
            Err(err) => {
                warn!(error = %err, "database unavailable, falling back to demo mode");
                Ok(Box::new(DemoStore::open(&config.demo_path())?))
            }
        },
        StoreMode::Demo => Ok(Box::new(DemoStore::open(&config.demo_path())?)),
    }
}
