// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::wallet_for;
use crate::db::Store;
use crate::queries;
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_month, pretty_table};
use anyhow::Result;
use chrono::Datelike;

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(store, session, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(store, session, sub)?,
        Some(("debts", sub)) => debts(store, session, sub)?,
        Some(("goals", sub)) => goals(store, session, sub)?,
        _ => {}
    }
    Ok(())
}

fn month(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = wallet_for(session, sub)?;
    let (year, month) = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => {
            let today = chrono::Local::now().date_naive();
            (today.year(), today.month())
        }
    };
    let summary = queries::month_summary(store, &wallet_id, year, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        let hide = session.hide_values();
        let balance = queries::wallet(store, &wallet_id)?.balance;
        let rows = vec![
            vec!["Income".into(), fmt_money(summary.income, hide)],
            vec!["Expense".into(), fmt_money(summary.expense, hide)],
            vec!["Net".into(), fmt_money(summary.net, hide)],
            vec!["Transactions".into(), summary.count.to_string()],
            vec!["Wallet balance".into(), fmt_money(balance, hide)],
        ];
        println!("{}-{:02}", year, month);
        println!("{}", pretty_table(&["", "Amount"], rows));
    }
    Ok(())
}

fn spend_by_category(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = wallet_for(session, sub)?;
    let from = parse_date(sub.get_one::<String>("from").unwrap())?;
    let to = parse_date(sub.get_one::<String>("to").unwrap())?;
    let data = queries::spend_by_category(store, &wallet_id, from, to)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let hide = session.hide_values();
        let rows = data
            .iter()
            .map(|s| {
                let name = if s.category.is_empty() {
                    "(uncategorized)".to_string()
                } else {
                    s.category.clone()
                };
                vec![name, fmt_money(s.total, hide), s.count.to_string()]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Count"], rows));
    }
    Ok(())
}

fn debts(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let totals = queries::debt_totals(store, &wallet_for(session, sub)?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        let hide = session.hide_values();
        let rows = vec![
            vec![
                "Payable".into(),
                fmt_money(totals.payable_pending, hide),
                fmt_money(totals.payable_paid, hide),
            ],
            vec![
                "Receivable".into(),
                fmt_money(totals.receivable_pending, hide),
                fmt_money(totals.receivable_paid, hide),
            ],
        ];
        println!("{}", pretty_table(&["Kind", "Pending", "Paid"], rows));
    }
    Ok(())
}

fn goals(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let totals = queries::goal_totals(store, &wallet_for(session, sub)?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        let hide = session.hide_values();
        let rows = vec![vec![
            fmt_money(totals.saved, hide),
            fmt_money(totals.target, hide),
            format!("{}%", totals.progress_percent()),
            format!("{}/{}", totals.completed, totals.count),
        ]];
        println!(
            "{}",
            pretty_table(&["Saved", "Target", "Progress", "Completed"], rows)
        );
    }
    Ok(())
}
