// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true).help("Record id")
}

fn split_arg() -> Arg {
    Arg::new("split")
        .long("split")
        .action(ArgAction::Append)
        .value_name("NAME=PCT")
        .help("Investor share; repeat for each investor (defaults to investor presets)")
}

/// Fields shared by income and expense add/update. `required` marks the ones
/// an `add` cannot do without.
fn transaction_args(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("description").long("description").short('d').required(required),
        Arg::new("amount").long("amount").short('a').required(required),
        Arg::new("currency")
            .long("currency")
            .short('c')
            .help("Currency code, e.g. USD or SAR"),
        Arg::new("category").long("category").required(required),
        Arg::new("date")
            .long("date")
            .help("YYYY-MM-DD (defaults to today on add)"),
        Arg::new("frequency")
            .long("frequency")
            .short('f')
            .help("daily|weekly|monthly|quarterly|yearly|one-time"),
        split_arg(),
    ]
}

fn investor_cmd() -> Command {
    Command::new("investor")
        .about("Manage investors and their default shares")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("expense_pct").long("expense-pct").required(true))
                .arg(Arg::new("income_pct").long("income-pct").required(true)),
        )
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(
            Command::new("update")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("expense_pct").long("expense-pct"))
                .arg(Arg::new("income_pct").long("income-pct")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
        .subcommand(Command::new("seed").about("Create the default investor roster"))
}

fn income_cmd() -> Command {
    Command::new("income")
        .about("Record and manage income")
        .subcommand_required(true)
        .subcommand(Command::new("add").args(transaction_args(true)))
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(
            Command::new("update")
                .arg(id_arg())
                .args(transaction_args(false)),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Record and manage expenses")
        .subcommand_required(true)
        .subcommand(Command::new("add").args(transaction_args(true)))
        .subcommand(
            Command::new("list").arg(json_flag()).arg(
                Arg::new("unpaid")
                    .long("unpaid")
                    .action(ArgAction::SetTrue)
                    .help("Only show expenses not yet paid"),
            ),
        )
        .subcommand(
            Command::new("update")
                .arg(id_arg())
                .args(transaction_args(false)),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
        .subcommand(Command::new("pay").arg(id_arg()))
        .subcommand(Command::new("unpay").arg(id_arg()))
}

pub fn build_cli() -> Command {
    Command::new("sharebook")
        .version(crate_version!())
        .about("Small-business budget tracker with investor profit and cost shares")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Use the local demo store instead of the database"),
        )
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .global(true)
                .help("Directory holding the database and demo files"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .global(true)
                .help("Owner of the records (defaults to 'local')"),
        )
        .subcommand(Command::new("init").about("Create the store and seed default investors"))
        .subcommand(investor_cmd())
        .subcommand(income_cmd())
        .subcommand(expense_cmd())
        .subcommand(
            Command::new("summary")
                .about("Monthly and yearly totals in USD")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("breakdown")
                .about("Per-investor shares")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_parser(["income", "expense", "all"])
                        .default_value("all"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("history")
                .about("Monthly history grouped by currency")
                .arg(
                    Arg::new("year")
                        .long("year")
                        .value_parser(value_parser!(i32)),
                )
                .arg(Arg::new("currency").long("currency"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("search")
                .about("Find incomes, expenses and investors")
                .arg(Arg::new("query").required(true))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("fx")
                .about("Fixed-rate USD/SAR conversion")
                .subcommand_required(true)
                .subcommand(
                    Command::new("convert")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                )
                .subcommand(
                    Command::new("format")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("currency").long("currency").default_value("USD")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write records or history to CSV or JSON")
                .arg(
                    Arg::new("what")
                        .long("what")
                        .value_parser(["income", "expenses", "history"])
                        .default_value("expenses"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
}
