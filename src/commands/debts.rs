// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{date_or_today, optional_date, wallet_for};
use crate::db::Store;
use crate::ledger::{self, NewDebt};
use crate::models::DebtKind;
use crate::queries;
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_money, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let hide = session.hide_values();
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind: DebtKind = sub
                .get_one::<String>("kind")
                .unwrap()
                .parse()
                .map_err(|e: String| anyhow!(e))?;
            let debt = ledger::create_debt(
                store,
                NewDebt {
                    wallet_id: wallet_for(session, sub)?,
                    kind,
                    title: sub.get_one::<String>("title").unwrap().clone(),
                    counterparty: sub.get_one::<String>("counterparty").unwrap().clone(),
                    amount: parse_money(sub.get_one::<String>("amount").unwrap())?,
                    due_date: optional_date(sub, "due")?,
                },
            )?;
            println!(
                "Added {} debt '{}' of {} ({})",
                debt.kind,
                debt.title,
                fmt_money(debt.amount, hide),
                debt.id
            );
        }
        Some(("list", sub)) => {
            let debts = queries::debts_for_wallet(store, &wallet_for(session, sub)?)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &debts)? {
                let rows = debts
                    .iter()
                    .map(|d| {
                        vec![
                            d.id.clone(),
                            d.kind.to_string(),
                            d.title.clone(),
                            d.counterparty.clone(),
                            fmt_money(d.amount, hide),
                            fmt_money(d.total_paid, hide),
                            d.due_date.map(|x| x.to_string()).unwrap_or_default(),
                            format!("{:?}", d.status()),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Kind", "Title", "Counterparty", "Amount", "Paid", "Due", "Status"],
                        rows,
                    )
                );
            }
        }
        Some(("pay", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let amount = parse_money(sub.get_one::<String>("amount").unwrap())?;
            let t = ledger::pay_debt(store, id, amount, date_or_today(sub, "date")?)?;
            let debt = queries::debt(store, id)?;
            println!(
                "Recorded payment of {} ({}); remaining {}",
                fmt_money(t.amount, hide),
                t.kind,
                fmt_money(debt.remaining(), hide)
            );
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            ledger::delete_debt(store, id)?;
            println!("Removed debt {} and its payments", id);
        }
        _ => {}
    }
    Ok(())
}
