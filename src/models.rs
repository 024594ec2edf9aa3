// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::finance::split::validate_split;

pub type RecordId = i64;

/// Largest amount a transaction may carry; keeps yearly scaling and
/// percentage shares inside `Decimal` range.
pub fn max_amount() -> Decimal {
    Decimal::from(1_000_000_000_000_000_i64)
}

/// Validation failures raised before a record reaches (or while it sits in) a store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("investor percentages must add up to 100% (got {total}%)")]
    InvalidSplit { total: Decimal },
    #[error("expense frequency is required")]
    MissingFrequency,
    #[error("unknown frequency '{0}' (use daily|weekly|monthly|quarterly|yearly|one-time)")]
    UnknownFrequency(String),
    #[error("amount must be positive (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("amount {0} exceeds the maximum of 1,000,000,000,000,000")]
    AmountTooLarge(Decimal),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("percentage must be between 0 and 100 (got {0})")]
    PercentageOutOfRange(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    OneTime,
}

impl Frequency {
    pub const ALL: [Frequency; 6] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
        Frequency::OneTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
            Frequency::OneTime => "one-time",
        }
    }

    pub fn is_recurring(self) -> bool {
        self != Frequency::OneTime
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|f| f.label() == needle)
            .ok_or_else(|| RecordError::UnknownFrequency(s.trim().to_string()))
    }
}

/// One `{investorName, percentage}` entry of a transaction's split list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub name: String,
    pub percentage: Decimal,
}

impl Split {
    pub fn new(name: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            name: name.into(),
            percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: RecordId,
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    pub investors: Vec<Split>,
}

impl Income {
    /// Incomes without a cadence count once.
    pub fn effective_frequency(&self) -> Frequency {
        self.frequency.unwrap_or(Frequency::OneTime)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        validate_transaction(&self.description, self.amount, &self.investors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: RecordId,
    pub user_id: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub date: NaiveDate,
    pub frequency: Frequency,
    #[serde(default)]
    pub paid: bool,
    pub investors: Vec<Split>,
}

impl Expense {
    pub fn validate(&self) -> Result<(), RecordError> {
        validate_transaction(&self.description, self.amount, &self.investors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investor {
    pub id: RecordId,
    pub user_id: String,
    pub name: String,
    pub expense_percentage: Decimal,
    pub income_percentage: Decimal,
}

impl Investor {
    pub fn validate(&self) -> Result<(), RecordError> {
        validate_investor(&self.name, self.expense_percentage, self.income_percentage)
    }

    pub fn default_percentage(&self, kind: TransactionKind) -> Decimal {
        match kind {
            TransactionKind::Income => self.income_percentage,
            TransactionKind::Expense => self.expense_percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub date: NaiveDate,
    pub frequency: Option<Frequency>,
    pub investors: Vec<Split>,
}

impl NewIncome {
    pub fn validate(&self) -> Result<(), RecordError> {
        validate_transaction(&self.description, self.amount, &self.investors)
    }

    pub fn into_income(self, id: RecordId, user_id: &str) -> Income {
        Income {
            id,
            user_id: user_id.to_string(),
            description: self.description,
            amount: self.amount,
            currency: self.currency,
            category: self.category,
            date: self.date,
            frequency: self.frequency,
            investors: self.investors,
        }
    }
}

/// Expense as submitted; `frequency` stays optional here so a missing cadence
/// surfaces as [`RecordError::MissingFrequency`] instead of a parse failure.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub date: NaiveDate,
    pub frequency: Option<Frequency>,
    pub investors: Vec<Split>,
}

impl NewExpense {
    pub fn validate(&self) -> Result<Frequency, RecordError> {
        let frequency = self.frequency.ok_or(RecordError::MissingFrequency)?;
        validate_transaction(&self.description, self.amount, &self.investors)?;
        Ok(frequency)
    }

    pub fn into_expense(self, id: RecordId, user_id: &str) -> Result<Expense, RecordError> {
        let frequency = self.validate()?;
        Ok(Expense {
            id,
            user_id: user_id.to_string(),
            description: self.description,
            amount: self.amount,
            currency: self.currency,
            category: self.category,
            date: self.date,
            frequency,
            paid: false,
            investors: self.investors,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInvestor {
    pub name: String,
    pub expense_percentage: Decimal,
    pub income_percentage: Decimal,
}

impl NewInvestor {
    pub fn validate(&self) -> Result<(), RecordError> {
        validate_investor(&self.name, self.expense_percentage, self.income_percentage)
    }

    pub fn into_investor(self, id: RecordId, user_id: &str) -> Investor {
        Investor {
            id,
            user_id: user_id.to_string(),
            name: self.name,
            expense_percentage: self.expense_percentage,
            income_percentage: self.income_percentage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomePatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
    pub investors: Option<Vec<Split>>,
}

impl IncomePatch {
    pub fn apply(self, income: &mut Income) {
        if let Some(v) = self.description {
            income.description = v;
        }
        if let Some(v) = self.amount {
            income.amount = v;
        }
        if let Some(v) = self.currency {
            income.currency = v;
        }
        if let Some(v) = self.category {
            income.category = v;
        }
        if let Some(v) = self.date {
            income.date = v;
        }
        if self.frequency.is_some() {
            income.frequency = self.frequency;
        }
        if let Some(v) = self.investors {
            income.investors = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
    pub paid: Option<bool>,
    pub investors: Option<Vec<Split>>,
}

impl ExpensePatch {
    pub fn apply(self, expense: &mut Expense) {
        if let Some(v) = self.description {
            expense.description = v;
        }
        if let Some(v) = self.amount {
            expense.amount = v;
        }
        if let Some(v) = self.currency {
            expense.currency = v;
        }
        if let Some(v) = self.category {
            expense.category = v;
        }
        if let Some(v) = self.date {
            expense.date = v;
        }
        if let Some(v) = self.frequency {
            expense.frequency = v;
        }
        if let Some(v) = self.paid {
            expense.paid = v;
        }
        if let Some(v) = self.investors {
            expense.investors = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestorPatch {
    pub name: Option<String>,
    pub expense_percentage: Option<Decimal>,
    pub income_percentage: Option<Decimal>,
}

impl InvestorPatch {
    pub fn apply(self, investor: &mut Investor) {
        if let Some(v) = self.name {
            investor.name = v;
        }
        if let Some(v) = self.expense_percentage {
            investor.expense_percentage = v;
        }
        if let Some(v) = self.income_percentage {
            investor.income_percentage = v;
        }
    }
}

fn validate_transaction(
    description: &str,
    amount: Decimal,
    splits: &[Split],
) -> Result<(), RecordError> {
    if description.trim().is_empty() {
        return Err(RecordError::EmptyField("description"));
    }
    if amount <= Decimal::ZERO {
        return Err(RecordError::NonPositiveAmount(amount));
    }
    if amount > max_amount() {
        return Err(RecordError::AmountTooLarge(amount));
    }
    validate_split(splits)
}

fn validate_investor(
    name: &str,
    expense_percentage: Decimal,
    income_percentage: Decimal,
) -> Result<(), RecordError> {
    if name.trim().is_empty() {
        return Err(RecordError::EmptyField("investor name"));
    }
    let hundred = Decimal::ONE_HUNDRED;
    for pct in [expense_percentage, income_percentage] {
        if pct < Decimal::ZERO || pct > hundred {
            return Err(RecordError::PercentageOutOfRange(pct));
        }
    }
    Ok(())
}
