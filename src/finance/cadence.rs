// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Frequency;
use rust_decimal::Decimal;

/// Average weeks in a month used for weekly amounts.
pub fn weeks_per_month() -> Decimal {
    Decimal::new(433, 2)
}

/// Monthly equivalent of a recurring amount. One-time amounts contribute nothing.
pub fn to_monthly(amount: Decimal, frequency: Frequency) -> Decimal {
    match frequency {
        Frequency::Daily => amount * Decimal::from(30),
        Frequency::Weekly => amount * weeks_per_month(),
        Frequency::Monthly => amount,
        Frequency::Quarterly => amount / Decimal::from(3),
        Frequency::Yearly => amount / Decimal::from(12),
        Frequency::OneTime => Decimal::ZERO,
    }
}

/// Yearly equivalent. One-time amounts are counted once.
pub fn to_yearly(amount: Decimal, frequency: Frequency) -> Decimal {
    match frequency {
        Frequency::Daily => amount * Decimal::from(365),
        Frequency::Weekly => amount * Decimal::from(52),
        Frequency::Monthly => amount * Decimal::from(12),
        Frequency::Quarterly => amount * Decimal::from(4),
        Frequency::Yearly | Frequency::OneTime => amount,
    }
}
