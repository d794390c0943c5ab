// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{date_or_today, optional_date, resolve_category, wallet_for};
use crate::db::Store;
use crate::ledger::{self, NewTransaction, TransactionEdit};
use crate::models::{CategoryKind, Transaction, TransactionKind};
use crate::queries::{self, TransactionFilter};
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_money, pretty_table};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, session, sub)?,
        Some(("edit", sub)) => edit(store, session, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let t = ledger::delete_transaction(store, id)?;
            println!("{}", removed_message(&t, session.hide_values()));
        }
        Some(("list", sub)) => list(store, session, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn removed_message(t: &Transaction, hide: bool) -> String {
    format!("Removed {} {} on {}", t.kind, fmt_money(t.amount, hide), t.date)
}

fn parse_kind(s: &str) -> Result<TransactionKind> {
    s.parse().map_err(|e: String| anyhow!(e))
}

fn add(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = wallet_for(session, sub)?;
    let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let amount = parse_money(sub.get_one::<String>("amount").unwrap())?;
    let category_kind = match kind {
        TransactionKind::Income => CategoryKind::Income,
        TransactionKind::Expense => CategoryKind::Expense,
    };
    let category_id = sub
        .get_one::<String>("category")
        .map(|c| resolve_category(store, session, c, Some(category_kind)))
        .transpose()?;
    let t = ledger::create_transaction(
        store,
        NewTransaction {
            wallet_id,
            kind,
            amount,
            category_id,
            debt_id: sub.get_one::<String>("debt").map(|s| s.trim().to_string()),
            goal_id: sub.get_one::<String>("goal").map(|s| s.trim().to_string()),
            description: sub.get_one::<String>("description").unwrap().clone(),
            date: date_or_today(sub, "date")?,
        },
    )?;
    println!(
        "Recorded {} of {} on {} ({})",
        t.kind,
        fmt_money(t.amount, session.hide_values()),
        t.date,
        t.id
    );
    Ok(())
}

fn edit(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let existing = queries::transaction(store, id)?;
    let category_kind = match existing.kind {
        TransactionKind::Income => CategoryKind::Income,
        TransactionKind::Expense => CategoryKind::Expense,
    };
    let edit = TransactionEdit {
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_money(s))
            .transpose()?,
        description: sub.get_one::<String>("description").cloned(),
        category_id: sub
            .get_one::<String>("category")
            .map(|c| resolve_category(store, session, c, Some(category_kind)))
            .transpose()?,
        date: optional_date(sub, "date")?,
    };
    let t = ledger::edit_transaction(store, id, edit)?;
    if t.is_linked() && (sub.contains_id("description") || sub.contains_id("category")) {
        println!("Note: description and category of linked transactions are kept");
    }
    println!(
        "Updated {} to {} on {}",
        t.id,
        fmt_money(t.amount, session.hide_values()),
        t.date
    );
    Ok(())
}

fn list(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store, session, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let hide = session.hide_values();
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    fmt_money(r.amount, hide),
                    r.category.clone(),
                    r.description.clone(),
                    r.linked.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Kind", "Amount", "Category", "Description", "Linked", "ID"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub amount: crate::money::Money,
    pub category: String,
    pub description: String,
    pub linked: String,
}

impl From<Transaction> for TransactionRow {
    fn from(t: Transaction) -> Self {
        let linked = match (&t.debt_id, &t.goal_id) {
            (Some(_), _) => "debt".to_string(),
            (_, Some(_)) => "goal".to_string(),
            _ => String::new(),
        };
        TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            kind: t.kind.to_string(),
            amount: t.amount,
            category: t.category_name,
            description: t.description,
            linked,
        }
    }
}

pub fn query_rows(
    store: &Store,
    session: &Session,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let filter = TransactionFilter {
        wallet_id: Some(wallet_for(session, sub)?),
        kind: sub
            .get_one::<String>("kind")
            .map(|k| parse_kind(k))
            .transpose()?,
        from: optional_date(sub, "from")?,
        to: optional_date(sub, "to")?,
        search: sub.get_one::<String>("search").cloned(),
        limit: sub.get_one::<usize>("limit").copied(),
    };
    Ok(queries::transactions(store, &filter)?
        .into_iter()
        .map(TransactionRow::from)
        .collect())
}
