// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::finance::search;
use crate::store::RecordStore;
use crate::utils::{arg, maybe_print_json, pretty_table};

pub fn handle(store: &dyn RecordStore, user: &str, m: &clap::ArgMatches) -> Result<()> {
    let query = arg(m, "query")?;
    let results = search(
        query,
        &store.list_income(user)?,
        &store.list_expenses(user)?,
        &store.list_investors(user)?,
    );
    if maybe_print_json(m.get_flag("json"), &results)? {
        return Ok(());
    }
    if results.is_empty() {
        println!("No matches for '{}'", query.trim());
        return Ok(());
    }
    let rows = results
        .into_iter()
        .map(|r| {
            vec![
                format!("{:?}", r.source_page),
                r.id.to_string(),
                r.title,
                r.subtitle,
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Page", "ID", "Title", "Details"], rows));
    Ok(())
}
