// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sharebook::config::{AppConfig, StoreMode};
use sharebook::models::{
    ExpensePatch, Frequency, IncomePatch, InvestorPatch, NewExpense, NewIncome, NewInvestor,
    RecordError, Split,
};
use sharebook::store::{self, Change, Collection, DemoStore, RecordStore, SqliteStore, StoreError};
use tempfile::tempdir;

fn backends() -> Vec<Box<dyn RecordStore>> {
    vec![
        Box::new(SqliteStore::open_in_memory().unwrap()),
        Box::new(DemoStore::in_memory()),
    ]
}

fn even_split() -> Vec<Split> {
    vec![
        Split::new("Abdulrahman Mahamood", Decimal::from(50)),
        Split::new("Mohammad Hani", Decimal::from(50)),
    ]
}

fn new_income(description: &str) -> NewIncome {
    NewIncome {
        description: description.into(),
        amount: Decimal::new(125050, 2),
        currency: "SAR".into(),
        category: "Consulting".into(),
        date: NaiveDate::from_ymd_opt(2025, 4, 3).unwrap(),
        frequency: Some(Frequency::Monthly),
        investors: even_split(),
    }
}

fn new_expense(description: &str) -> NewExpense {
    NewExpense {
        description: description.into(),
        amount: Decimal::from(450),
        currency: "USD".into(),
        category: "Cloud Services".into(),
        date: NaiveDate::from_ymd_opt(2025, 4, 5).unwrap(),
        frequency: Some(Frequency::Monthly),
        investors: even_split(),
    }
}

#[test]
fn income_crud_round_trips_on_both_backends() {
    for mut store in backends() {
        let first = store.create_income("u1", new_income("Retainer")).unwrap();
        let second = store.create_income("u1", new_income("Workshop")).unwrap();

        let listed = store.list_income("u1").unwrap();
        assert_eq!(listed.len(), 2, "{}", store.backend());
        assert_eq!(listed[0].id, second);
        assert_eq!(listed[1].id, first);

        let got = store.get_income(first).unwrap();
        assert_eq!(got.amount, Decimal::new(125050, 2));
        assert_eq!(got.user_id, "u1");
        assert_eq!(got.investors, even_split());

        store
            .update_income(
                "u1",
                first,
                IncomePatch {
                    amount: Some(Decimal::from(2000)),
                    frequency: Some(Frequency::Yearly),
                    ..Default::default()
                },
            )
            .unwrap();
        let got = store.get_income(first).unwrap();
        assert_eq!(got.amount, Decimal::from(2000));
        assert_eq!(got.frequency, Some(Frequency::Yearly));
        assert_eq!(got.description, "Retainer");

        store.delete_income("u1", first).unwrap();
        assert!(matches!(
            store.get_income(first),
            Err(StoreError::NotFound { .. })
        ));
        assert_eq!(store.list_income("u1").unwrap().len(), 1);
    }
}

#[test]
fn expenses_start_unpaid_and_toggle() {
    for mut store in backends() {
        let id = store.create_expense("u1", new_expense("AWS")).unwrap();
        assert!(!store.get_expense(id).unwrap().paid);
        store.set_paid("u1", id, true).unwrap();
        assert!(store.get_expense(id).unwrap().paid);
        store.set_paid("u1", id, false).unwrap();
        assert!(!store.get_expense(id).unwrap().paid);

        store
            .update_expense(
                "u1",
                id,
                ExpensePatch {
                    category: Some("Hosting".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(store.get_expense(id).unwrap().category, "Hosting");
        store.delete_expense("u1", id).unwrap();
        assert!(store.list_expenses("u1").unwrap().is_empty());
    }
}

#[test]
fn expense_without_frequency_is_rejected() {
    for mut store in backends() {
        let mut e = new_expense("Rent");
        e.frequency = None;
        let err = store.create_expense("u1", e).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invalid(RecordError::MissingFrequency)
        ));
        assert!(store.list_expenses("u1").unwrap().is_empty());
    }
}

#[test]
fn invalid_splits_never_reach_the_store() {
    for mut store in backends() {
        let mut bad = new_income("Short split");
        bad.investors = vec![
            Split::new("A", Decimal::from(60)),
            Split::new("B", Decimal::from(30)),
        ];
        assert!(matches!(
            store.create_income("u1", bad),
            Err(StoreError::Invalid(RecordError::InvalidSplit { .. }))
        ));

        let id = store.create_expense("u1", new_expense("AWS")).unwrap();
        let patch = ExpensePatch {
            investors: Some(vec![Split::new("A", Decimal::from(99))]),
            ..Default::default()
        };
        assert!(store.update_expense("u1", id, patch).is_err());
        assert_eq!(store.get_expense(id).unwrap().investors, even_split());
    }
}

#[test]
fn records_are_scoped_to_their_user() {
    for mut store in backends() {
        store.create_income("alice", new_income("Alice retainer")).unwrap();
        store.create_expense("alice", new_expense("Alice AWS")).unwrap();
        assert!(store.list_income("bob").unwrap().is_empty());
        assert!(store.list_expenses("bob").unwrap().is_empty());
        assert_eq!(store.list_income("alice").unwrap().len(), 1);
    }
}

#[test]
fn missing_ids_are_not_found() {
    for mut store in backends() {
        assert!(matches!(store.get_expense(404), Err(StoreError::NotFound { .. })));
        assert!(matches!(store.delete_investor("u1", 404), Err(StoreError::NotFound { .. })));
        let err = store
            .update_income("u1", 404, IncomePatch::default())
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}

#[test]
fn seeding_creates_the_default_roster_once() {
    for mut store in backends() {
        assert_eq!(store.seed_default_investors("u1").unwrap(), 3);
        assert_eq!(store.seed_default_investors("u1").unwrap(), 0);
        let mut investors = store.list_investors("u1").unwrap();
        investors.sort_by_key(|i| i.id);
        let names: Vec<&str> = investors.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            ["Abdulrahman Mahamood", "Mohammed Alshalabi", "Mohammad Hani"]
        );
        let expense_total: Decimal = investors.iter().map(|i| i.expense_percentage).sum();
        let income_total: Decimal = investors.iter().map(|i| i.income_percentage).sum();
        assert_eq!(expense_total, Decimal::ONE_HUNDRED);
        assert_eq!(income_total, Decimal::ONE_HUNDRED);
        assert_eq!(store.seed_default_investors("u2").unwrap(), 3);
    }
}

#[test]
fn investor_updates_are_validated() {
    for mut store in backends() {
        let id = store
            .create_investor(
                "u1",
                NewInvestor {
                    name: "Partner".into(),
                    expense_percentage: Decimal::from(10),
                    income_percentage: Decimal::from(20),
                },
            )
            .unwrap();
        let too_big = InvestorPatch {
            income_percentage: Some(Decimal::from(120)),
            ..Default::default()
        };
        assert!(store.update_investor("u1", id, too_big).is_err());
        store
            .update_investor(
                "u1",
                id,
                InvestorPatch {
                    name: Some("Silent Partner".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        let got = store.get_investor(id).unwrap();
        assert_eq!(got.name, "Silent Partner");
        assert_eq!(got.income_percentage, Decimal::from(20));
    }
}

#[test]
fn subscribers_see_every_change_for_their_user() {
    for mut store in backends() {
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let sub = store
            .subscribe(
                "u1",
                Collection::Income,
                Box::new(move |change: &Change| {
                    if let Change::Income(items) = change {
                        sink.borrow_mut().push(items.len());
                    }
                }),
            )
            .unwrap();
        assert_eq!(*seen.borrow(), vec![0]);

        let id = store.create_income("u1", new_income("One")).unwrap();
        store.create_income("u2", new_income("Other user")).unwrap();
        store.create_expense("u1", new_expense("Other collection")).unwrap();
        store.create_income("u1", new_income("Two")).unwrap();
        store.delete_income("u1", id).unwrap();
        assert_eq!(*seen.borrow(), vec![0, 1, 2, 1]);

        assert!(store.unsubscribe(sub));
        store.create_income("u1", new_income("Three")).unwrap();
        assert_eq!(seen.borrow().len(), 4);
        assert!(!store.unsubscribe(sub));
    }
}

#[test]
fn demo_store_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("demo.json");
    let id = {
        let mut store = DemoStore::open(&path).unwrap();
        store.seed_default_investors("u1").unwrap();
        let id = store.create_expense("u1", new_expense("AWS")).unwrap();
        store.set_paid("u1", id, true).unwrap();
        id
    };
    let reopened = DemoStore::open(&path).unwrap();
    assert_eq!(reopened.list_investors("u1").unwrap().len(), 3);
    let expense = reopened.get_expense(id).unwrap();
    assert!(expense.paid);
    assert_eq!(expense.investors, even_split());

    let mut reopened = reopened;
    let next = reopened.create_income("u1", new_income("After reopen")).unwrap();
    assert!(next > id);
}

#[test]
fn corrupt_demo_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("demo.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(DemoStore::open(&path), Err(StoreError::Json(_))));
}

#[test]
fn sqlite_store_persists_to_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sharebook.sqlite");
    {
        let mut store = SqliteStore::open(&path).unwrap();
        store.create_income("u1", new_income("Retainer")).unwrap();
    }
    let store = SqliteStore::open(&path).unwrap();
    let incomes = store.list_income("u1").unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].currency, "SAR");
}

#[test]
fn factory_picks_backend_from_mode() {
    let dir = tempdir().unwrap();
    let config = AppConfig {
        mode: StoreMode::Database,
        data_dir: dir.path().to_path_buf(),
        user: "u1".into(),
    };
    assert_eq!(store::open(&config).unwrap().backend(), "database");
    assert!(config.db_path().exists());

    let demo = AppConfig {
        mode: StoreMode::Demo,
        ..config
    };
    assert_eq!(store::open(&demo).unwrap().backend(), "demo");
}

#[test]
fn factory_falls_back_to_demo_when_database_cannot_open() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "occupied").unwrap();
    let config = AppConfig {
        mode: StoreMode::Database,
        data_dir: blocker,
        user: "u1".into(),
    };
    assert_eq!(store::open(&config).unwrap().backend(), "demo");
}

#[test]
fn mutations_by_another_user_are_not_found() {
    for mut store in backends() {
        let income = store.create_income("alice", new_income("Alice retainer")).unwrap();
        let expense = store.create_expense("alice", new_expense("Alice AWS")).unwrap();

        assert!(matches!(
            store.delete_income("bob", income),
            Err(StoreError::NotFound { .. })
        ));
        let patch = IncomePatch {
            amount: Some(Decimal::ONE),
            ..IncomePatch::default()
        };
        assert!(matches!(
            store.update_income("bob", income, patch),
            Err(StoreError::NotFound { .. })
        ));
        assert!(store.set_paid("bob", expense, true).is_err());
        assert!(store.delete_expense("bob", expense).is_err());

        assert_eq!(
            store.get_income(income).unwrap().amount,
            new_income("").amount
        );
        assert!(!store.get_expense(expense).unwrap().paid);
        store.set_paid("alice", expense, true).unwrap();
        assert!(store.get_expense(expense).unwrap().paid);
    }
}

#[test]
fn failed_demo_write_leaves_memory_unchanged() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "occupied").unwrap();
    let mut store = DemoStore::open(&blocker.join("demo.json")).unwrap();
    assert!(store.create_income("u1", new_income("Lost")).is_err());
    assert!(store.list_income("u1").unwrap().is_empty());
}

#[test]
fn failed_demo_update_keeps_the_old_record() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    let mut store = DemoStore::open(&data.join("demo.json")).unwrap();
    let id = store.create_income("u1", new_income("Retainer")).unwrap();

    std::fs::remove_dir_all(&data).unwrap();
    std::fs::write(&data, "occupied").unwrap();
    let patch = IncomePatch {
        amount: Some(Decimal::from(9)),
        ..IncomePatch::default()
    };
    assert!(store.update_income("u1", id, patch).is_err());
    assert!(store.delete_income("u1", id).is_err());
    assert_eq!(store.get_income(id).unwrap().amount, new_income("").amount);
}

#[test]
fn oversized_amounts_are_rejected() {
    for mut store in backends() {
        let mut huge = new_income("Huge");
        huge.amount = "1000000000000000000000000000".parse().unwrap();
        huge.frequency = Some(Frequency::Daily);
        assert!(matches!(
            store.create_income("u1", huge),
            Err(StoreError::Invalid(RecordError::AmountTooLarge(_)))
        ));
        assert!(store.list_income("u1").unwrap().is_empty());
    }
}

#[test]
fn demo_file_records_are_validated_on_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("demo.json");
    {
        let mut store = DemoStore::open(&path).unwrap();
        store.create_income("u1", new_income("Retainer")).unwrap();
    }
    let mut raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    raw["income"][0]["amount"] = serde_json::json!("1000000000000000000000000000");
    std::fs::write(&path, raw.to_string()).unwrap();
    assert!(matches!(
        DemoStore::open(&path),
        Err(StoreError::Invalid(RecordError::AmountTooLarge(_)))
    ));
}
