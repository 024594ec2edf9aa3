// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use clap::ArgMatches;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::models::{Frequency, Split};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_frequency(s: &str) -> Result<Frequency> {
    Ok(s.parse::<Frequency>()?)
}

/// `NAME=PCT`, e.g. `Mohammad Hani=16`. The name keeps inner spaces.
pub fn parse_split(s: &str) -> Result<Split> {
    let (name, pct) = s
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Invalid split '{}', expected NAME=PERCENT", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Invalid split '{}': investor name is empty", s));
    }
    let percentage = parse_decimal(pct.trim_end_matches('%'))
        .with_context(|| format!("Invalid split '{}'", s))?;
    Ok(Split::new(name, percentage))
}

/// Value of an argument clap already marked required or defaulted.
pub fn arg<'a>(m: &'a ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing --{}", name.replace('_', "-")))
}

pub fn opt_arg<'a>(m: &'a ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name).map(String::as_str)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", s))
}

pub fn fmt_pct(d: &Decimal) -> String {
    format!("{}%", d.normalize())
}

pub fn fmt_splits(splits: &[Split]) -> String {
    splits
        .iter()
        .map(|s| format!("{}: {}", s.name, fmt_pct(&s.percentage)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}
