// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Investor, RecordError, Split, TransactionKind};
use rust_decimal::Decimal;

/// Allowed drift of a split total away from 100.
pub fn split_tolerance() -> Decimal {
    Decimal::new(1, 1)
}

pub fn split_total(splits: &[Split]) -> Decimal {
    splits.iter().map(|s| s.percentage).sum()
}

pub fn validate_split(splits: &[Split]) -> Result<(), RecordError> {
    if let Some(bad) = splits
        .iter()
        .find(|s| s.percentage < Decimal::ZERO || s.percentage > Decimal::ONE_HUNDRED)
    {
        return Err(RecordError::PercentageOutOfRange(bad.percentage));
    }
    let total = split_total(splits);
    if (total - Decimal::ONE_HUNDRED).abs() > split_tolerance() {
        return Err(RecordError::InvalidSplit { total });
    }
    Ok(())
}

/// Split list pre-populated from each investor's default share for `kind`.
pub fn default_split(investors: &[Investor], kind: TransactionKind) -> Vec<Split> {
    investors
        .iter()
        .map(|inv| Split::new(inv.name.clone(), inv.default_percentage(kind)))
        .collect()
}
