// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use sharebook::cli;
use sharebook::commands::{expenses, exporter, income, investors, reports, search};
use sharebook::models::{Frequency, Split};
use sharebook::store::{DemoStore, RecordStore};
use tempfile::tempdir;

const USER: &str = "u1";

fn run(store: &mut dyn RecordStore, args: &[&str]) -> anyhow::Result<()> {
    run_as(store, USER, args)
}

fn run_as(store: &mut dyn RecordStore, user: &str, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["sharebook"];
    argv.extend(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("investor", sub)) => investors::handle(store, user, sub),
        Some(("income", sub)) => income::handle(store, user, sub),
        Some(("expense", sub)) => expenses::handle(store, user, sub),
        Some(("summary", sub)) => reports::summary(store, user, sub),
        Some(("breakdown", sub)) => reports::breakdown(store, user, sub),
        Some(("history", sub)) => reports::history(store, user, sub),
        Some(("search", sub)) => search::handle(store, user, sub),
        Some(("export", sub)) => exporter::handle(store, user, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

#[test]
fn global_flags_parse_before_the_subcommand() {
    let m = cli::build_cli().get_matches_from([
        "sharebook",
        "--demo",
        "--user",
        "bob",
        "--data-dir",
        "/tmp/books",
        "summary",
        "--json",
    ]);
    assert!(m.get_flag("demo"));
    assert_eq!(m.get_one::<String>("user").unwrap(), "bob");
    assert_eq!(m.get_one::<String>("data_dir").unwrap(), "/tmp/books");
    let Some(("summary", sub)) = m.subcommand() else {
        panic!("no summary subcommand");
    };
    assert!(sub.get_flag("json"));
}

#[test]
fn unknown_export_format_is_rejected_by_the_parser() {
    let res = cli::build_cli().try_get_matches_from([
        "sharebook", "export", "--what", "income", "--format", "xml", "--out", "x.xml",
    ]);
    assert!(res.is_err());
}

#[test]
fn income_add_takes_explicit_splits() {
    let mut store = DemoStore::in_memory();
    run(
        &mut store,
        &[
            "income",
            "add",
            "--description",
            "Retainer",
            "--amount",
            "1000",
            "--currency",
            "sar",
            "--category",
            "Consulting",
            "--date",
            "2025-03-01",
            "--frequency",
            "monthly",
            "--split",
            "Abdulrahman Mahamood=60",
            "--split",
            "Mohammad Hani=40%",
        ],
    )
    .unwrap();
    let incomes = store.list_income(USER).unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].currency, "SAR");
    assert_eq!(incomes[0].frequency, Some(Frequency::Monthly));
    assert_eq!(
        incomes[0].investors,
        vec![
            Split::new("Abdulrahman Mahamood", Decimal::from(60)),
            Split::new("Mohammad Hani", Decimal::from(40)),
        ]
    );
}

#[test]
fn expense_add_defaults_to_investor_presets() {
    let mut store = DemoStore::in_memory();
    run(&mut store, &["investor", "seed"]).unwrap();
    run(
        &mut store,
        &[
            "expense", "add", "-d", "AWS Infrastructure", "-a", "450", "--category",
            "Cloud Services", "-f", "monthly",
        ],
    )
    .unwrap();
    let expenses = store.list_expenses(USER).unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].currency, "USD");
    assert!(!expenses[0].paid);
    let shares: Vec<(String, Decimal)> = expenses[0]
        .investors
        .iter()
        .map(|s| (s.name.clone(), s.percentage))
        .collect();
    assert_eq!(
        shares,
        vec![
            ("Abdulrahman Mahamood".to_string(), Decimal::from(42)),
            ("Mohammed Alshalabi".to_string(), Decimal::from(42)),
            ("Mohammad Hani".to_string(), Decimal::from(16)),
        ]
    );

    let id = expenses[0].id.to_string();
    run(&mut store, &["expense", "pay", "--id", &id]).unwrap();
    assert!(store.list_expenses(USER).unwrap()[0].paid);
    run(&mut store, &["summary", "--json"]).unwrap();
    run(&mut store, &["breakdown", "--kind", "expense"]).unwrap();
    run(&mut store, &["search", "cloud"]).unwrap();
}

#[test]
fn bad_split_is_refused_before_saving() {
    let mut store = DemoStore::in_memory();
    let res = run(
        &mut store,
        &[
            "expense", "add", "-d", "Rent", "-a", "900", "--category", "Office", "-f",
            "monthly", "--split", "A=60", "--split", "B=30",
        ],
    );
    let err = res.unwrap_err();
    assert!(format!("{err:#}").contains("100"));
    assert!(store.list_expenses(USER).unwrap().is_empty());
}

#[test]
fn expense_needs_a_frequency() {
    let mut store = DemoStore::in_memory();
    let res = run(
        &mut store,
        &[
            "expense", "add", "-d", "Rent", "-a", "900", "--category", "Office", "--split",
            "A=100",
        ],
    );
    assert!(format!("{:#}", res.unwrap_err()).contains("frequency"));
}

#[test]
fn adding_without_investors_or_split_fails() {
    let mut store = DemoStore::in_memory();
    let res = run(
        &mut store,
        &["income", "add", "-d", "Sale", "-a", "10", "--category", "Shop"],
    );
    assert!(res.is_err());
    assert!(store.list_income(USER).unwrap().is_empty());
}

#[test]
fn investor_update_and_remove() {
    let mut store = DemoStore::in_memory();
    run(
        &mut store,
        &["investor", "add", "--name", "Partner", "--expense-pct", "10", "--income-pct", "20"],
    )
    .unwrap();
    let id = store.list_investors(USER).unwrap()[0].id.to_string();
    run(&mut store, &["investor", "update", "--id", &id, "--income-pct", "25"]).unwrap();
    assert_eq!(
        store.list_investors(USER).unwrap()[0].income_percentage,
        Decimal::from(25)
    );
    run(&mut store, &["investor", "rm", "--id", &id]).unwrap();
    assert!(store.list_investors(USER).unwrap().is_empty());
}

#[test]
fn export_expenses_as_csv() {
    let mut store = DemoStore::in_memory();
    run(&mut store, &["investor", "seed"]).unwrap();
    for (d, amt) in [("AWS", "450"), ("Office rent", "3750")] {
        run(
            &mut store,
            &["expense", "add", "-d", d, "-a", amt, "--category", "Ops", "-f", "monthly"],
        )
        .unwrap();
    }

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("expenses.csv");
    let out_str = out_path.to_string_lossy().to_string();
    run(
        &mut store,
        &["export", "--what", "expenses", "--format", "csv", "--out", &out_str],
    )
    .unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "id");
    assert_eq!(&headers[7], "paid");
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][2], "Office rent");
    assert_eq!(&rows[0][7], "false");
}

#[test]
fn export_history_as_json() {
    let mut store = DemoStore::in_memory();
    run(
        &mut store,
        &[
            "income", "add", "-d", "Sale", "-a", "375", "-c", "SAR", "--category", "Shop",
            "--date", "2025-01-09", "--split", "A=100",
        ],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("history.json");
    let out_str = out_path.to_string_lossy().to_string();
    run(
        &mut store,
        &["export", "--what", "history", "--format", "json", "--out", &out_str],
    )
    .unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(parsed["months"][0]["year"], 2025);
    assert_eq!(parsed["months"][0]["month"], 1);
    assert_eq!(parsed["totals"]["SAR"]["income"], "375");
}

#[test]
fn another_user_cannot_touch_records_by_id() {
    let mut store = DemoStore::in_memory();
    run_as(&mut store, "alice", &["investor", "seed"]).unwrap();
    run_as(
        &mut store,
        "alice",
        &[
            "income", "add", "-d", "Retainer", "-a", "500", "--category", "Consulting",
        ],
    )
    .unwrap();
    run_as(
        &mut store,
        "alice",
        &[
            "expense", "add", "-d", "AWS", "-a", "450", "--category", "Cloud Services", "-f",
            "monthly",
        ],
    )
    .unwrap();
    let income_id = store.list_income("alice").unwrap()[0].id.to_string();
    let expense_id = store.list_expenses("alice").unwrap()[0].id.to_string();
    let investor_id = store.list_investors("alice").unwrap()[0].id.to_string();

    assert!(run_as(&mut store, "bob", &["income", "rm", "--id", &income_id]).is_err());
    assert!(
        run_as(
            &mut store,
            "bob",
            &["income", "update", "--id", &income_id, "-a", "1"],
        )
        .is_err()
    );
    assert!(run_as(&mut store, "bob", &["expense", "pay", "--id", &expense_id]).is_err());
    assert!(run_as(&mut store, "bob", &["expense", "rm", "--id", &expense_id]).is_err());
    assert!(run_as(&mut store, "bob", &["investor", "rm", "--id", &investor_id]).is_err());

    let incomes = store.list_income("alice").unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].amount, Decimal::from(500));
    let expenses = store.list_expenses("alice").unwrap();
    assert_eq!(expenses.len(), 1);
    assert!(!expenses[0].paid);
    assert_eq!(store.list_investors("alice").unwrap().len(), 3);

    run_as(&mut store, "alice", &["expense", "pay", "--id", &expense_id]).unwrap();
    assert!(store.list_expenses("alice").unwrap()[0].paid);
}
