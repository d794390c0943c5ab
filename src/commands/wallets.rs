// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::ledger;
use crate::queries;
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_money, pretty_table};
use anyhow::Result;

pub fn handle(store: &Store, session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user_id = session.require_user()?.id.clone();
            let name = sub.get_one::<String>("name").unwrap();
            let opening = parse_money(sub.get_one::<String>("balance").unwrap())?;
            let wallet = ledger::create_wallet(store, &user_id, name, opening)?;
            if session.active_wallet_id().is_none() {
                session.select_wallet(store, &wallet.id)?;
            }
            println!("Added wallet '{}' ({})", wallet.name, wallet.id);
        }
        Some(("list", sub)) => {
            let user_id = session.require_user()?.id.clone();
            let wallets = queries::wallets_for_user(store, &user_id, sub.get_flag("all"))?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &wallets)? {
                let hide = session.hide_values();
                let active = session.active_wallet_id();
                let rows = wallets
                    .iter()
                    .map(|w| {
                        vec![
                            if active == Some(w.id.as_str()) { "*".into() } else { String::new() },
                            w.id.clone(),
                            w.name.clone(),
                            fmt_money(w.balance, hide),
                            if w.archived { "yes".into() } else { String::new() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["", "ID", "Name", "Balance", "Archived"], rows)
                );
            }
        }
        Some(("use", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            session.select_wallet(store, id)?;
            println!("Active wallet is now {}", id);
        }
        Some(("rename", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let wallet = ledger::rename_wallet(store, id, sub.get_one::<String>("name").unwrap())?;
            println!("Renamed wallet to '{}'", wallet.name);
        }
        Some(("archive", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let undo = sub.get_flag("undo");
            let wallet = ledger::set_wallet_archived(store, id, !undo)?;
            println!(
                "{} wallet '{}'",
                if undo { "Restored" } else { "Archived" },
                wallet.name
            );
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            ledger::delete_wallet(store, id)?;
            session.refresh(store)?;
            println!("Removed wallet {} and its records", id);
        }
        _ => {}
    }
    Ok(())
}
