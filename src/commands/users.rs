// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Store;
use crate::session::Session;
use crate::utils::pretty_table;
use anyhow::{Result, bail};

pub fn sign_in(store: &Store, session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let user = if sub.get_flag("guest") {
        session.sign_in_guest(store)?
    } else {
        let (Some(name), Some(email)) = (
            sub.get_one::<String>("name"),
            sub.get_one::<String>("email"),
        ) else {
            bail!("Pass --guest or both --name and --email");
        };
        session.sign_in(store, name, email)?
    };
    println!("Signed in as {}", user.name);
    Ok(())
}

pub fn sign_out(store: &Store, session: &mut Session) -> Result<()> {
    session.sign_out(store)?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(session: &Session) -> Result<()> {
    match session.user() {
        Some(u) => {
            let rows = vec![
                vec!["Name".into(), u.name.clone()],
                vec!["Email".into(), u.email.clone().unwrap_or_default()],
                vec!["Guest".into(), u.is_guest.to_string()],
                vec![
                    "Active wallet".into(),
                    u.settings.last_opened_wallet.clone().unwrap_or_default(),
                ],
                vec!["Hide values".into(), u.settings.hide_values.to_string()],
            ];
            println!("{}", pretty_table(&["Field", "Value"], rows));
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

pub fn hide(store: &Store, session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    let on = sub.get_one::<String>("state").map(String::as_str) == Some("on");
    session.set_hide_values(store, on)?;
    println!("Hide values: {}", if on { "on" } else { "off" });
    Ok(())
}

pub fn purge(store: &Store, session: &mut Session, sub: &clap::ArgMatches) -> Result<()> {
    if !sub.get_flag("yes") {
        bail!("Refusing to erase local data without --yes");
    }
    session.purge(store)?;
    println!("All local data erased");
    Ok(())
}
