// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{date_or_today, optional_date, wallet_for};
use crate::db::Store;
use crate::ledger::{self, NewGoal};
use crate::models::GoalDirection;
use crate::queries;
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_money, pretty_table};
use anyhow::Result;

pub fn handle(store: &Store, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let hide = session.hide_values();
    match m.subcommand() {
        Some(("add", sub)) => {
            let goal = ledger::create_goal(
                store,
                NewGoal {
                    wallet_id: wallet_for(session, sub)?,
                    name: sub.get_one::<String>("name").unwrap().clone(),
                    target_amount: parse_money(sub.get_one::<String>("target").unwrap())?,
                    deadline: optional_date(sub, "deadline")?,
                    color: sub.get_one::<String>("color").unwrap().clone(),
                },
            )?;
            println!(
                "Added goal '{}' with target {} ({})",
                goal.name,
                fmt_money(goal.target_amount, hide),
                goal.id
            );
        }
        Some(("list", sub)) => {
            let goals = queries::goals_for_wallet(store, &wallet_for(session, sub)?)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &goals)? {
                let rows = goals
                    .iter()
                    .map(|g| {
                        vec![
                            g.id.clone(),
                            g.name.clone(),
                            fmt_money(g.current_amount, hide),
                            fmt_money(g.target_amount, hide),
                            format!("{}%", g.progress_percent()),
                            g.deadline.map(|d| d.to_string()).unwrap_or_default(),
                            format!("{:?}", g.status()),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Name", "Saved", "Target", "Progress", "Deadline", "Status"],
                        rows,
                    )
                );
            }
        }
        Some(("deposit", sub)) => move_funds(store, hide, sub, GoalDirection::Deposit)?,
        Some(("withdraw", sub)) => move_funds(store, hide, sub, GoalDirection::Withdraw)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let goal = queries::goal(store, id)?;
            ledger::delete_goal(store, id)?;
            println!(
                "Removed goal '{}'; {} returned to the wallet",
                goal.name,
                fmt_money(goal.current_amount, hide)
            );
        }
        _ => {}
    }
    Ok(())
}

fn move_funds(
    store: &Store,
    hide: bool,
    sub: &clap::ArgMatches,
    direction: GoalDirection,
) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let amount = parse_money(sub.get_one::<String>("amount").unwrap())?;
    ledger::move_goal_funds(store, id, direction, amount, date_or_today(sub, "date")?)?;
    let goal = queries::goal(store, id)?;
    let verb = match direction {
        GoalDirection::Deposit => "Deposited",
        GoalDirection::Withdraw => "Withdrew",
    };
    println!(
        "{} {}; '{}' now holds {} of {} ({}%)",
        verb,
        fmt_money(amount, hide),
        goal.name,
        fmt_money(goal.current_amount, hide),
        fmt_money(goal.target_amount, hide),
        goal.progress_percent()
    );
    Ok(())
}
