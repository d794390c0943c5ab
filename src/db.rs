// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerResult;
use crate::models::CategoryKind;
use crate::utils::new_id;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, Transaction, TransactionBehavior, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Pocketbook", "pocketbook"));

pub const SCHEMA_VERSION: i64 = 1;

/// Starter categories inserted when the table is empty: (name, icon, kind, color).
const STARTER_CATEGORIES: &[(&str, &str, CategoryKind, &str)] = &[
    ("Salary", "briefcase", CategoryKind::Income, "#2E7D32"),
    ("Gift", "gift", CategoryKind::Income, "#43A047"),
    ("Other Income", "plus-circle", CategoryKind::Income, "#66BB6A"),
    ("Food & Drinks", "coffee", CategoryKind::Expense, "#E53935"),
    ("Transport", "truck", CategoryKind::Expense, "#FB8C00"),
    ("Shopping", "shopping-bag", CategoryKind::Expense, "#8E24AA"),
    ("Bills", "file-text", CategoryKind::Expense, "#3949AB"),
    ("Health", "heart", CategoryKind::Expense, "#D81B60"),
    ("Entertainment", "film", CategoryKind::Expense, "#00ACC1"),
    ("Other Expense", "minus-circle", CategoryKind::Expense, "#757575"),
    ("Debts", "credit-card", CategoryKind::Debts, "#6D4C41"),
    ("Goals", "target", CategoryKind::Goals, "#FDD835"),
];

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("pocketbook.sqlite"))
}

/// The single handle to the local database.
///
/// Every write group goes through [`Store::run_exclusive`]; the mutex around
/// the connection is the only lock in the system and serializes writers.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> LedgerResult<Self> {
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened ledger database");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> LedgerResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> LedgerResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        init_schema(&mut conn)?;
        seed_categories(&mut conn)?;
        Ok(Store {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panicking writer leaves no open transaction behind: it is rolled
        // back when the `Transaction` guard drops during unwinding.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `body` as one atomic write group.
    ///
    /// Commits when `body` returns `Ok`, rolls back when it returns `Err`.
    /// Callers queue on the connection lock; bodies never interleave.
    pub fn run_exclusive<T, F>(&self, body: F) -> LedgerResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> LedgerResult<T>,
    {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        debug!("write group started");
        match body(&tx) {
            Ok(value) => {
                tx.commit()?;
                debug!("write group committed");
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "write group rolled back");
                if let Err(rb) = tx.rollback() {
                    warn!(error = %rb, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Run a read-only query against the current committed state.
    pub fn read<T, F>(&self, body: F) -> LedgerResult<T>
    where
        F: FnOnce(&Connection) -> LedgerResult<T>,
    {
        let conn = self.lock();
        body(&conn)
    }
}

fn init_schema(conn: &mut Connection) -> LedgerResult<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS meta(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE,
        avatar TEXT,
        settings TEXT NOT NULL DEFAULT '{}',
        is_guest INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS wallets(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        balance INTEGER NOT NULL DEFAULT 0 CHECK(typeof(balance) = 'integer'), -- cents
        archived INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS categories(
        id TEXT PRIMARY KEY,
        user_id TEXT, -- NULL for global categories
        name TEXT NOT NULL,
        icon TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense','debts','goals')),
        color TEXT NOT NULL,
        archived INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS debts(
        id TEXT PRIMARY KEY,
        wallet_id TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('payable','receivable')),
        title TEXT NOT NULL,
        counterparty TEXT NOT NULL,
        amount INTEGER NOT NULL CHECK(amount > 0),
        total_paid INTEGER NOT NULL DEFAULT 0,
        due_date TEXT,
        is_paid INTEGER NOT NULL DEFAULT 0,
        paid_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        CHECK(total_paid >= 0 AND total_paid <= amount),
        FOREIGN KEY(wallet_id) REFERENCES wallets(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS goals(
        id TEXT PRIMARY KEY,
        wallet_id TEXT NOT NULL,
        name TEXT NOT NULL,
        target_amount INTEGER NOT NULL CHECK(target_amount > 0),
        current_amount INTEGER NOT NULL DEFAULT 0 CHECK(current_amount >= 0),
        deadline TEXT,
        is_completed INTEGER NOT NULL DEFAULT 0,
        color TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY(wallet_id) REFERENCES wallets(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        wallet_id TEXT NOT NULL,
        category_id TEXT,
        debt_id TEXT,
        goal_id TEXT,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        amount INTEGER NOT NULL CHECK(amount > 0),
        description TEXT NOT NULL DEFAULT '',
        category_name TEXT NOT NULL DEFAULT '',
        category_icon TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        CHECK(debt_id IS NULL OR goal_id IS NULL),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(wallet_id) REFERENCES wallets(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL,
        FOREIGN KEY(debt_id) REFERENCES debts(id) ON DELETE CASCADE,
        FOREIGN KEY(goal_id) REFERENCES goals(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_wallet_date ON transactions(wallet_id, date);
    CREATE INDEX IF NOT EXISTS idx_transactions_debt ON transactions(debt_id);
    CREATE INDEX IF NOT EXISTS idx_transactions_goal ON transactions(goal_id);
    "#,
    )?;
    conn.execute(
        "INSERT INTO meta(key, value) VALUES('schema_version', ?1)
         ON CONFLICT(key) DO NOTHING",
        params![SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

fn seed_categories(conn: &mut Connection) -> LedgerResult<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
    if count > 0 {
        return Ok(());
    }
    let tx = conn.transaction()?;
    {
        let mut insert = tx.prepare_cached(
            "INSERT INTO categories(id, user_id, name, icon, kind, color) VALUES (?1, NULL, ?2, ?3, ?4, ?5)",
        )?;
        for (name, icon, kind, color) in STARTER_CATEGORIES {
            insert.execute(params![new_id(), name, icon, kind, color])?;
        }
    }
    tx.commit()?;
    info!(count = STARTER_CATEGORIES.len(), "seeded starter categories");
    Ok(())
}
