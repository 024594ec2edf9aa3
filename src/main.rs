// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, error};

use sharebook::config::{AppConfig, Overrides};
use sharebook::{cli, commands, log, store};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    log::init_logging(matches.get_flag("verbose"));
    if let Err(err) = run(&matches) {
        error!("{err:#}");
        return Err(err);
    }
    Ok(())
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    // fx needs no store.
    if let Some(("fx", sub)) = matches.subcommand() {
        return commands::fx::handle(sub);
    }

    let overrides = Overrides {
        demo: matches.get_flag("demo"),
        data_dir: matches.get_one::<String>("data_dir").map(PathBuf::from),
        user: matches.get_one::<String>("user").cloned(),
    };
    let config = AppConfig::resolve(&overrides)?;
    debug!(mode = %config.mode, data_dir = %config.data_dir.display(), user = %config.user, "resolved config");

    let mut store = store::open(&config)?;
    let user = config.user.as_str();

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "{} store ready in {}",
                store.backend(),
                config.data_dir.display()
            );
            commands::investors::seed(&mut *store, user)?;
        }
        Some(("investor", sub)) => commands::investors::handle(&mut *store, user, sub)?,
        Some(("income", sub)) => commands::income::handle(&mut *store, user, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&mut *store, user, sub)?,
        Some(("summary", sub)) => commands::reports::summary(&*store, user, sub)?,
        Some(("breakdown", sub)) => commands::reports::breakdown(&*store, user, sub)?,
        Some(("history", sub)) => commands::reports::history(&*store, user, sub)?,
        Some(("search", sub)) => commands::search::handle(&*store, user, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&*store, user, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
