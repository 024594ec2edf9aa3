// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::info;

use super::{Collection, Listeners, RecordStore, StoreError, ensure_owner};
use crate::db;
use crate::models::{
    Expense, ExpensePatch, Frequency, Income, IncomePatch, Investor, InvestorPatch, NewExpense,
    NewIncome, NewInvestor, RecordId, Split,
};

const INCOME_COLUMNS: &str =
    "id, user_id, description, amount, currency, category, date, frequency, investors";
const EXPENSE_COLUMNS: &str =
    "id, user_id, description, amount, currency, category, date, frequency, investors, paid";
const INVESTOR_COLUMNS: &str = "id, user_id, name, expense_percentage, income_percentage";

pub struct SqliteStore {
    conn: Connection,
    listeners: Listeners,
}

impl SqliteStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = db::open_or_init(path)?;
        info!(path = %path.display(), "opened database store");
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Ok(Self::from_connection(db::open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            listeners: Listeners::default(),
        }
    }
}

/// Transaction columns as they sit in SQLite, before decoding.
struct RawTransaction {
    id: RecordId,
    user_id: String,
    description: String,
    amount: String,
    currency: String,
    category: String,
    date: NaiveDate,
    frequency: Option<String>,
    investors: String,
    paid: bool,
}

impl RawTransaction {
    fn from_row(r: &Row<'_>, with_paid: bool) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            user_id: r.get(1)?,
            description: r.get(2)?,
            amount: r.get(3)?,
            currency: r.get(4)?,
            category: r.get(5)?,
            date: r.get(6)?,
            frequency: r.get(7)?,
            investors: r.get(8)?,
            paid: if with_paid { r.get(9)? } else { false },
        })
    }

    fn frequency(&self) -> Result<Option<Frequency>, StoreError> {
        self.frequency
            .as_deref()
            .map(|f| {
                f.parse::<Frequency>().map_err(|_| StoreError::Corrupt {
                    field: "frequency",
                    value: f.to_string(),
                })
            })
            .transpose()
    }

    fn income_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Self::from_row(r, false)
    }

    fn expense_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Self::from_row(r, true)
    }

    fn into_income(self) -> Result<Income, StoreError> {
        let frequency = self.frequency()?;
        Ok(Income {
            id: self.id,
            user_id: self.user_id,
            description: self.description,
            amount: decimal("amount", &self.amount)?,
            currency: self.currency,
            category: self.category,
            date: self.date,
            frequency,
            investors: splits(&self.investors)?,
        })
    }

    fn into_expense(self) -> Result<Expense, StoreError> {
        let frequency = self.frequency()?.ok_or(StoreError::Corrupt {
            field: "frequency",
            value: String::new(),
        })?;
        Ok(Expense {
            id: self.id,
            user_id: self.user_id,
            description: self.description,
            amount: decimal("amount", &self.amount)?,
            currency: self.currency,
            category: self.category,
            date: self.date,
            frequency,
            paid: self.paid,
            investors: splits(&self.investors)?,
        })
    }
}

fn decimal(field: &'static str, raw: &str) -> Result<Decimal, StoreError> {
    raw.parse::<Decimal>().map_err(|_| StoreError::Corrupt {
        field,
        value: raw.to_string(),
    })
}

fn splits(raw: &str) -> Result<Vec<Split>, StoreError> {
    Ok(serde_json::from_str(raw)?)
}

fn investor_from_row(r: &Row<'_>) -> rusqlite::Result<(RecordId, String, String, String, String)> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
}

fn decode_investor(
    (id, user_id, name, expense, income): (RecordId, String, String, String, String),
) -> Result<Investor, StoreError> {
    Ok(Investor {
        id,
        user_id,
        name,
        expense_percentage: decimal("expense_percentage", &expense)?,
        income_percentage: decimal("income_percentage", &income)?,
    })
}

impl RecordStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "database"
    }

    fn list_income(&self, user: &str) -> Result<Vec<Income>, StoreError> {
        let sql = format!("SELECT {INCOME_COLUMNS} FROM income WHERE user_id=?1 ORDER BY id DESC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user], RawTransaction::income_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_income()?);
        }
        Ok(out)
    }

    fn list_expenses(&self, user: &str) -> Result<Vec<Expense>, StoreError> {
        let sql =
            format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE user_id=?1 ORDER BY id DESC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user], RawTransaction::expense_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_expense()?);
        }
        Ok(out)
    }

    fn list_investors(&self, user: &str) -> Result<Vec<Investor>, StoreError> {
        let sql =
            format!("SELECT {INVESTOR_COLUMNS} FROM investors WHERE user_id=?1 ORDER BY id DESC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user], investor_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(decode_investor(row?)?);
        }
        Ok(out)
    }

    fn get_income(&self, id: RecordId) -> Result<Income, StoreError> {
        let sql = format!("SELECT {INCOME_COLUMNS} FROM income WHERE id=?1");
        self.conn
            .query_row(&sql, params![id], RawTransaction::income_row)
            .optional()?
            .ok_or(StoreError::NotFound {
                collection: Collection::Income,
                id,
            })?
            .into_income()
    }

    fn get_expense(&self, id: RecordId) -> Result<Expense, StoreError> {
        let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id=?1");
        self.conn
            .query_row(&sql, params![id], RawTransaction::expense_row)
            .optional()?
            .ok_or(StoreError::NotFound {
                collection: Collection::Expenses,
                id,
            })?
            .into_expense()
    }

    fn get_investor(&self, id: RecordId) -> Result<Investor, StoreError> {
        let sql = format!("SELECT {INVESTOR_COLUMNS} FROM investors WHERE id=?1");
        let raw = self
            .conn
            .query_row(&sql, params![id], investor_from_row)
            .optional()?
            .ok_or(StoreError::NotFound {
                collection: Collection::Investors,
                id,
            })?;
        decode_investor(raw)
    }

    fn create_income(&mut self, user: &str, income: NewIncome) -> Result<RecordId, StoreError> {
        income.validate()?;
        self.conn.execute(
            "INSERT INTO income(user_id, description, amount, currency, category, date, frequency, investors)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user,
                income.description,
                income.amount.to_string(),
                income.currency,
                income.category,
                income.date,
                income.frequency.map(Frequency::label),
                serde_json::to_string(&income.investors)?,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, user, "created income");
        self.publish(user, Collection::Income)?;
        Ok(id)
    }

    fn create_expense(
        &mut self,
        user: &str,
        expense: NewExpense,
    ) -> Result<RecordId, StoreError> {
        let frequency = expense.validate()?;
        self.conn.execute(
            "INSERT INTO expenses(user_id, description, amount, currency, category, date, frequency, investors, paid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)",
            params![
                user,
                expense.description,
                expense.amount.to_string(),
                expense.currency,
                expense.category,
                expense.date,
                frequency.label(),
                serde_json::to_string(&expense.investors)?,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, user, "created expense");
        self.publish(user, Collection::Expenses)?;
        Ok(id)
    }

    fn create_investor(
        &mut self,
        user: &str,
        investor: NewInvestor,
    ) -> Result<RecordId, StoreError> {
        investor.validate()?;
        self.conn.execute(
            "INSERT INTO investors(user_id, name, expense_percentage, income_percentage)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user,
                investor.name,
                investor.expense_percentage.to_string(),
                investor.income_percentage.to_string(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, user, "created investor");
        self.publish(user, Collection::Investors)?;
        Ok(id)
    }

    fn update_income(
        &mut self,
        user: &str,
        id: RecordId,
        patch: IncomePatch,
    ) -> Result<(), StoreError> {
        let mut income = self.get_income(id)?;
        ensure_owner(&income.user_id, user, Collection::Income, id)?;
        patch.apply(&mut income);
        income.validate()?;
        self.conn.execute(
            "UPDATE income SET description=?1, amount=?2, currency=?3, category=?4, date=?5,
             frequency=?6, investors=?7, updated_at=datetime('now') WHERE id=?8",
            params![
                income.description,
                income.amount.to_string(),
                income.currency,
                income.category,
                income.date,
                income.frequency.map(Frequency::label),
                serde_json::to_string(&income.investors)?,
                id,
            ],
        )?;
        info!(id, "updated income");
        self.publish(user, Collection::Income)
    }

    fn update_expense(
        &mut self,
        user: &str,
        id: RecordId,
        patch: ExpensePatch,
    ) -> Result<(), StoreError> {
        let mut expense = self.get_expense(id)?;
        ensure_owner(&expense.user_id, user, Collection::Expenses, id)?;
        patch.apply(&mut expense);
        expense.validate()?;
        self.conn.execute(
            "UPDATE expenses SET description=?1, amount=?2, currency=?3, category=?4, date=?5,
             frequency=?6, investors=?7, paid=?8, updated_at=datetime('now') WHERE id=?9",
            params![
                expense.description,
                expense.amount.to_string(),
                expense.currency,
                expense.category,
                expense.date,
                expense.frequency.label(),
                serde_json::to_string(&expense.investors)?,
                expense.paid,
                id,
            ],
        )?;
        info!(id, paid = expense.paid, "updated expense");
        self.publish(user, Collection::Expenses)
    }

    fn update_investor(
        &mut self,
        user: &str,
        id: RecordId,
        patch: InvestorPatch,
    ) -> Result<(), StoreError> {
        let mut investor = self.get_investor(id)?;
        ensure_owner(&investor.user_id, user, Collection::Investors, id)?;
        patch.apply(&mut investor);
        investor.validate()?;
        self.conn.execute(
            "UPDATE investors SET name=?1, expense_percentage=?2, income_percentage=?3,
             updated_at=datetime('now') WHERE id=?4",
            params![
                investor.name,
                investor.expense_percentage.to_string(),
                investor.income_percentage.to_string(),
                id,
            ],
        )?;
        info!(id, "updated investor");
        self.publish(user, Collection::Investors)
    }

    fn delete_income(&mut self, user: &str, id: RecordId) -> Result<(), StoreError> {
        let income = self.get_income(id)?;
        ensure_owner(&income.user_id, user, Collection::Income, id)?;
        self.conn
            .execute("DELETE FROM income WHERE id=?1", params![id])?;
        info!(id, "deleted income");
        self.publish(user, Collection::Income)
    }

    fn delete_expense(&mut self, user: &str, id: RecordId) -> Result<(), StoreError> {
        let expense = self.get_expense(id)?;
        ensure_owner(&expense.user_id, user, Collection::Expenses, id)?;
        self.conn
            .execute("DELETE FROM expenses WHERE id=?1", params![id])?;
        info!(id, "deleted expense");
        self.publish(user, Collection::Expenses)
    }

    fn delete_investor(&mut self, user: &str, id: RecordId) -> Result<(), StoreError> {
        let investor = self.get_investor(id)?;
        ensure_owner(&investor.user_id, user, Collection::Investors, id)?;
        self.conn
            .execute("DELETE FROM investors WHERE id=?1", params![id])?;
        info!(id, "deleted investor");
        self.publish(user, Collection::Investors)
    }

    fn listeners(&mut self) -> &mut Listeners {
        &mut self.listeners
    }
}
