// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

pub const DB_ENV: &str = "POCKETBOOK_DB";
pub const LOG_ENV: &str = "POCKETBOOK_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime settings resolved from flags, environment and platform dirs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolve with an explicit `--db` override and an environment lookup.
    ///
    /// Precedence for the database: flag, `POCKETBOOK_DB`, platform data dir.
    /// For logging: `POCKETBOOK_LOG`, `RUST_LOG`, then `warn`.
    pub fn resolve<F>(db_flag: Option<PathBuf>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = env(DB_ENV).filter(|s| !s.trim().is_empty()).map(PathBuf::from);
        let db_path = match db_flag.or(from_env) {
            Some(p) => p,
            None => crate::db::db_path()?,
        };
        let log_filter = env(LOG_ENV)
            .or_else(|| env("RUST_LOG"))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Ok(Config {
            db_path,
            log_filter,
        })
    }
}
