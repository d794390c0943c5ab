// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{optional_date, wallet_for};
use crate::db::Store;
use crate::queries::{self, TransactionFilter};
use crate::session::Session;
use anyhow::{Context, Result, bail};
use serde_json::json;

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, session, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let filter = TransactionFilter {
        wallet_id: Some(wallet_for(session, sub)?),
        from: optional_date(sub, "from")?,
        to: optional_date(sub, "to")?,
        ..TransactionFilter::default()
    };
    let mut rows = queries::transactions(store, &filter)?;
    // oldest first in files
    rows.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "date",
                "kind",
                "amount",
                "category",
                "description",
                "debt_id",
                "goal_id",
                "id",
            ])?;
            for t in rows {
                wtr.write_record([
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    t.category_name,
                    t.description,
                    t.debt_id.unwrap_or_default(),
                    t.goal_id.unwrap_or_default(),
                    t.id,
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date, "kind": t.kind, "amount": t.amount,
                        "category": t.category_name, "description": t.description,
                        "debt_id": t.debt_id, "goal_id": t.goal_id, "id": t.id
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
