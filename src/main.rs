// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pocketbook::{Session, Store, cli, commands, config::Config};

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::resolve(matches.get_one::<PathBuf>("db").cloned(), |k| {
        std::env::var(k).ok()
    })?;
    init_logging(&config.log_filter);

    let store = Store::open(&config.db_path)
        .with_context(|| format!("Open DB at {}", config.db_path.display()))?;
    let mut session = Session::load(&store)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path.display());
        }
        Some(("signin", sub)) => commands::users::sign_in(&store, &mut session, sub)?,
        Some(("signout", _)) => commands::users::sign_out(&store, &mut session)?,
        Some(("whoami", _)) => commands::users::whoami(&session)?,
        Some(("purge", sub)) => commands::users::purge(&store, &mut session, sub)?,
        Some(("hide", sub)) => commands::users::hide(&store, &mut session, sub)?,
        Some(("wallet", sub)) => commands::wallets::handle(&store, &mut session, sub)?,
        Some(("category", sub)) => commands::categories::handle(&store, &session, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&store, &session, sub)?,
        Some(("debt", sub)) => commands::debts::handle(&store, &session, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&store, &session, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, &session, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, &session, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
