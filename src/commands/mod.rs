// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod debts;
pub mod exporter;
pub mod goals;
pub mod reports;
pub mod transactions;
pub mod users;
pub mod wallets;

use crate::db::Store;
use crate::models::CategoryKind;
use crate::queries;
use crate::session::Session;
use crate::utils::parse_date;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

/// The `--wallet` argument, or the session's active wallet.
pub fn wallet_for(session: &Session, sub: &clap::ArgMatches) -> Result<String> {
    if let Some(id) = sub.get_one::<String>("wallet") {
        return Ok(id.trim().to_string());
    }
    session
        .active_wallet_id()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No active wallet; sign in or pass --wallet"))
}

pub fn date_or_today(sub: &clap::ArgMatches, key: &str) -> Result<NaiveDate> {
    match sub.get_one::<String>(key) {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn optional_date(sub: &clap::ArgMatches, key: &str) -> Result<Option<NaiveDate>> {
    sub.get_one::<String>(key).map(|s| parse_date(s)).transpose()
}

/// Find a category visible to the session user by id or (case-insensitive) name.
pub fn resolve_category(
    store: &Store,
    session: &Session,
    needle: &str,
    kind: Option<CategoryKind>,
) -> Result<String> {
    let user_id = session.user().map(|u| u.id.as_str());
    let needle = needle.trim();
    let cats = queries::categories(store, user_id, kind, false)?;
    cats.iter()
        .find(|c| c.id == needle)
        .or_else(|| cats.iter().find(|c| c.name.eq_ignore_ascii_case(needle)))
        .map(|c| c.id.clone())
        .with_context(|| format!("Category '{}' not found", needle))
}
