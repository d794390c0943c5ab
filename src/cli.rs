// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn wallet_arg() -> Arg {
    Arg::new("wallet")
        .long("wallet")
        .help("Wallet id (defaults to the active wallet)")
}

fn id_arg(what: &'static str) -> Arg {
    Arg::new("id").required(true).help(what)
}

pub fn build_cli() -> Command {
    Command::new("pocketbook")
        .about("Local-first wallets, transactions, debts and savings goals")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Database file (overrides POCKETBOOK_DB)"),
        )
        .subcommand(Command::new("init").about("Create the database if needed"))
        .subcommand(
            Command::new("signin")
                .about("Sign in as a local user (created on first use)")
                .arg(
                    Arg::new("guest")
                        .long("guest")
                        .action(ArgAction::SetTrue)
                        .conflicts_with_all(["name", "email"]),
                )
                .arg(Arg::new("name").long("name").requires("email"))
                .arg(Arg::new("email").long("email").requires("name")),
        )
        .subcommand(Command::new("signout").about("Forget the signed-in user"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("purge")
                .about("Erase all local users, wallets and records")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the purge"),
                ),
        )
        .subcommand(
            Command::new("hide")
                .about("Mask amounts in output")
                .arg(
                    Arg::new("state")
                        .required(true)
                        .value_parser(["on", "off"]),
                ),
        )
        .subcommand(
            Command::new("wallet")
                .about("Manage wallets")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .allow_hyphen_values(true)
                                .help("Opening balance"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include archived wallets"),
                    ),
                ))
                .subcommand(Command::new("use").arg(id_arg("Wallet id")))
                .subcommand(
                    Command::new("rename")
                        .arg(id_arg("Wallet id"))
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("archive")
                        .arg(id_arg("Wallet id"))
                        .arg(Arg::new("undo").long("undo").action(ArgAction::SetTrue)),
                )
                .subcommand(Command::new("rm").arg(id_arg("Wallet id"))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("icon").long("icon").default_value("tag"))
                        .arg(Arg::new("color").long("color").default_value("#9E9E9E")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["income", "expense", "debts", "goals"]),
                        )
                        .arg(Arg::new("all").long("all").action(ArgAction::SetTrue)),
                ))
                .subcommand(
                    Command::new("archive")
                        .arg(id_arg("Category id"))
                        .arg(Arg::new("undo").long("undo").action(ArgAction::SetTrue)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .arg(wallet_arg())
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("debt").long("debt").conflicts_with("goal"))
                        .arg(Arg::new("goal").long("goal"))
                        .arg(Arg::new("description").long("description").default_value(""))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg("Transaction id"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(Command::new("rm").arg(id_arg("Transaction id")))
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(wallet_arg())
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(Arg::new("search").long("search"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("debt")
                .about("Track money owed and lent")
                .subcommand(
                    Command::new("add")
                        .arg(wallet_arg())
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .value_parser(["payable", "receivable"]),
                        )
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("counterparty").long("counterparty").default_value(""))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("due").long("due")),
                )
                .subcommand(json_flags(Command::new("list").arg(wallet_arg())))
                .subcommand(
                    Command::new("pay")
                        .arg(id_arg("Debt id"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(Command::new("rm").arg(id_arg("Debt id"))),
        )
        .subcommand(
            Command::new("goal")
                .about("Save towards goals")
                .subcommand(
                    Command::new("add")
                        .arg(wallet_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("deadline").long("deadline"))
                        .arg(Arg::new("color").long("color").default_value("#FDD835")),
                )
                .subcommand(json_flags(Command::new("list").arg(wallet_arg())))
                .subcommand(
                    Command::new("deposit")
                        .arg(id_arg("Goal id"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(
                    Command::new("withdraw")
                        .arg(id_arg("Goal id"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(Command::new("rm").arg(id_arg("Goal id"))),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries for the active wallet")
                .subcommand(json_flags(
                    Command::new("month")
                        .arg(wallet_arg())
                        .arg(Arg::new("month").long("month").help("YYYY-MM, default this month")),
                ))
                .subcommand(json_flags(
                    Command::new("spend-by-category")
                        .arg(wallet_arg())
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                ))
                .subcommand(json_flags(Command::new("debts").arg(wallet_arg())))
                .subcommand(json_flags(Command::new("goals").arg(wallet_arg()))),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(wallet_arg())
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("from").long("from"))
                    .arg(Arg::new("to").long("to")),
            ),
        )
}
