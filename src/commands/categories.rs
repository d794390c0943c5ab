// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::ledger::{self, NewCategory};
use crate::models::CategoryKind;
use crate::queries;
use crate::session::Session;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user_id = session.require_user()?.id.clone();
            let kind: CategoryKind = sub
                .get_one::<String>("kind")
                .unwrap()
                .parse()
                .map_err(|e: String| anyhow!(e))?;
            let cat = ledger::create_category(
                store,
                NewCategory {
                    user_id,
                    name: sub.get_one::<String>("name").unwrap().clone(),
                    icon: sub.get_one::<String>("icon").unwrap().clone(),
                    kind,
                    color: sub.get_one::<String>("color").unwrap().clone(),
                },
            )?;
            println!("Added category '{}' ({})", cat.name, cat.id);
        }
        Some(("list", sub)) => {
            let kind = sub
                .get_one::<String>("kind")
                .map(|k| k.parse::<CategoryKind>().map_err(|e| anyhow!(e)))
                .transpose()?;
            let user_id = session.user().map(|u| u.id.as_str());
            let cats = queries::categories(store, user_id, kind, sub.get_flag("all"))?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let rows = cats
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.clone(),
                            c.name.clone(),
                            c.kind.to_string(),
                            c.icon.clone(),
                            if c.is_global() { "built-in".into() } else { "custom".into() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Kind", "Icon", "Source"], rows)
                );
            }
        }
        Some(("archive", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let undo = sub.get_flag("undo");
            let cat = ledger::set_category_archived(store, id, !undo)?;
            println!(
                "{} category '{}'",
                if undo { "Restored" } else { "Archived" },
                cat.name
            );
        }
        _ => {}
    }
    Ok(())
}
