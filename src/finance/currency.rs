// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed-rate USD/SAR conversion and dual-currency display strings.
//!
//! Amounts are never rounded here; only the display helpers round, and only
//! for presentation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Usd,
    Sar,
}

impl Currency {
    /// Recognised codes only; anything else is rendered as-is by callers.
    pub fn from_code(code: &str) -> Option<Currency> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "SAR" => Some(Currency::Sar),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Sar => "SAR",
        }
    }

    /// The currency shown as the secondary rendering.
    pub fn counterpart(self) -> Currency {
        match self {
            Currency::Usd => Currency::Sar,
            Currency::Sar => Currency::Usd,
        }
    }
}

/// SAR per one USD.
pub fn sar_per_usd() -> Decimal {
    Decimal::new(375, 2)
}

pub fn to_usd(amount: Decimal, currency: &str) -> Decimal {
    match Currency::from_code(currency) {
        Some(Currency::Sar) => amount / sar_per_usd(),
        _ => amount,
    }
}

pub fn convert(amount: Decimal, from: &str, to: &str) -> Decimal {
    let (from, to) = match (Currency::from_code(from), Currency::from_code(to)) {
        (Some(f), Some(t)) => (f, t),
        _ => return amount,
    };
    match (from, to) {
        (Currency::Usd, Currency::Sar) => amount * sar_per_usd(),
        (Currency::Sar, Currency::Usd) => amount / sar_per_usd(),
        _ => amount,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedAmount {
    pub primary: String,
    pub secondary: String,
    pub combined: String,
}

pub fn format(amount: Decimal, currency: &str) -> FormattedAmount {
    match Currency::from_code(currency) {
        Some(native) => {
            let other = native.counterpart();
            let primary = render(amount, native);
            let secondary = render(convert(amount, native.code(), other.code()), other);
            let combined = format!("{} ({})", primary, secondary);
            FormattedAmount {
                primary,
                secondary,
                combined,
            }
        }
        None => {
            let primary = format_native(amount, currency);
            FormattedAmount {
                combined: primary.clone(),
                primary,
                secondary: String::new(),
            }
        }
    }
}

pub fn format_native(amount: Decimal, currency: &str) -> String {
    match Currency::from_code(currency) {
        Some(c) => render(amount, c),
        None => format!("{} {}", display_amount(amount), currency.trim()),
    }
}

fn render(amount: Decimal, currency: Currency) -> String {
    match currency {
        Currency::Usd => {
            if round_for_display(amount) < Decimal::ZERO {
                format!("-${}", display_amount(amount.abs()))
            } else {
                format!("${}", display_amount(amount))
            }
        }
        Currency::Sar => format!("{} SAR", display_amount(amount)),
    }
}

fn round_for_display(amount: Decimal) -> Decimal {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Two fraction digits at most, trailing zeros dropped, comma-grouped thousands.
pub fn display_amount(amount: Decimal) -> String {
    let rounded = round_for_display(amount);
    let negative = rounded < Decimal::ZERO;
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + 4);
    if negative {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}
