// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use sharebook::finance::cadence::{to_monthly, to_yearly, weeks_per_month};
use sharebook::models::Frequency;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn monthly_multipliers() {
    let a = dec("120");
    assert_eq!(to_monthly(a, Frequency::Daily), dec("3600"));
    assert_eq!(to_monthly(a, Frequency::Weekly), dec("519.6"));
    assert_eq!(to_monthly(a, Frequency::Monthly), a);
    assert_eq!(to_monthly(a, Frequency::Quarterly), dec("40"));
    assert_eq!(to_monthly(a, Frequency::Yearly), dec("10"));
    assert_eq!(to_monthly(a, Frequency::OneTime), Decimal::ZERO);
    assert_eq!(weeks_per_month(), dec("4.33"));
}

#[test]
fn yearly_multipliers() {
    let a = dec("10");
    assert_eq!(to_yearly(a, Frequency::Daily), dec("3650"));
    assert_eq!(to_yearly(a, Frequency::Weekly), dec("520"));
    assert_eq!(to_yearly(a, Frequency::Monthly), dec("120"));
    assert_eq!(to_yearly(a, Frequency::Quarterly), dec("40"));
    assert_eq!(to_yearly(a, Frequency::Yearly), a);
    assert_eq!(to_yearly(a, Frequency::OneTime), a);
}

#[test]
fn yearly_matches_twelve_months_for_calendar_cadences() {
    let a = dec("73.10");
    for f in [Frequency::Monthly, Frequency::Quarterly, Frequency::Yearly] {
        let diff = (to_yearly(a, f) - to_monthly(a, f) * Decimal::from(12)).abs();
        assert!(diff < dec("0.0000000001"), "{f}: off by {diff}");
    }
}

#[test]
fn yearly_close_to_twelve_months_for_day_and_week_cadences() {
    let a = dec("73.10");
    for f in [Frequency::Daily, Frequency::Weekly] {
        let yearly = to_yearly(a, f);
        let from_monthly = to_monthly(a, f) * Decimal::from(12);
        let rel = ((yearly - from_monthly) / yearly).abs();
        assert!(rel <= dec("0.015"), "{f}: relative gap {rel}");
    }
}

#[test]
fn frequency_parses_labels() {
    assert_eq!("One-Time".parse::<Frequency>().unwrap(), Frequency::OneTime);
    assert_eq!(" weekly ".parse::<Frequency>().unwrap(), Frequency::Weekly);
    assert!("fortnightly".parse::<Frequency>().is_err());
    assert!(!Frequency::OneTime.is_recurring());
}
