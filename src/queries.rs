// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only projections for list screens and reports.
//!
//! Aggregates only ever sum stored fields. Wallet balances are read, never
//! recomputed from transactions.

use crate::db::Store;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, CategoryKind, Debt, DebtKind, Goal, Transaction, TransactionKind, User, Wallet,
};
use crate::money::Money;
use crate::utils::month_bounds;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

fn fetch_one<T>(
    conn: &Connection,
    entity: &'static str,
    sql: &str,
    id: &str,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> LedgerResult<T> {
    conn.query_row(sql, params![id], map)
        .optional()?
        .ok_or_else(|| LedgerError::not_found(entity, id))
}

pub(crate) fn user_row(conn: &Connection, id: &str) -> LedgerResult<User> {
    let sql = format!("SELECT {} FROM users WHERE id=?1", User::COLUMNS);
    fetch_one(conn, "user", &sql, id, User::from_row)
}

pub(crate) fn wallet_row(conn: &Connection, id: &str) -> LedgerResult<Wallet> {
    let sql = format!("SELECT {} FROM wallets WHERE id=?1", Wallet::COLUMNS);
    fetch_one(conn, "wallet", &sql, id, Wallet::from_row)
}

pub(crate) fn category_row(conn: &Connection, id: &str) -> LedgerResult<Category> {
    let sql = format!("SELECT {} FROM categories WHERE id=?1", Category::COLUMNS);
    fetch_one(conn, "category", &sql, id, Category::from_row)
}

pub(crate) fn debt_row(conn: &Connection, id: &str) -> LedgerResult<Debt> {
    let sql = format!("SELECT {} FROM debts WHERE id=?1", Debt::COLUMNS);
    fetch_one(conn, "debt", &sql, id, Debt::from_row)
}

pub(crate) fn goal_row(conn: &Connection, id: &str) -> LedgerResult<Goal> {
    let sql = format!("SELECT {} FROM goals WHERE id=?1", Goal::COLUMNS);
    fetch_one(conn, "goal", &sql, id, Goal::from_row)
}

pub(crate) fn transaction_row(conn: &Connection, id: &str) -> LedgerResult<Transaction> {
    let sql = format!("SELECT {} FROM transactions WHERE id=?1", Transaction::COLUMNS);
    fetch_one(conn, "transaction", &sql, id, Transaction::from_row)
}

pub(crate) fn linked_transactions(
    conn: &Connection,
    column: &str,
    id: &str,
) -> LedgerResult<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE {}=?1 ORDER BY date, created_at",
        Transaction::COLUMNS,
        column
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![id], Transaction::from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn user(store: &Store, id: &str) -> LedgerResult<User> {
    store.read(|c| user_row(c, id))
}

pub fn wallet(store: &Store, id: &str) -> LedgerResult<Wallet> {
    store.read(|c| wallet_row(c, id))
}

pub fn category(store: &Store, id: &str) -> LedgerResult<Category> {
    store.read(|c| category_row(c, id))
}

pub fn debt(store: &Store, id: &str) -> LedgerResult<Debt> {
    store.read(|c| debt_row(c, id))
}

pub fn goal(store: &Store, id: &str) -> LedgerResult<Goal> {
    store.read(|c| goal_row(c, id))
}

pub fn transaction(store: &Store, id: &str) -> LedgerResult<Transaction> {
    store.read(|c| transaction_row(c, id))
}

pub fn debt_payments(store: &Store, debt_id: &str) -> LedgerResult<Vec<Transaction>> {
    store.read(|c| linked_transactions(c, "debt_id", debt_id))
}

pub fn goal_movements(store: &Store, goal_id: &str) -> LedgerResult<Vec<Transaction>> {
    store.read(|c| linked_transactions(c, "goal_id", goal_id))
}

pub fn wallets_for_user(
    store: &Store,
    user_id: &str,
    include_archived: bool,
) -> LedgerResult<Vec<Wallet>> {
    store.read(|c| {
        let sql = format!(
            "SELECT {} FROM wallets WHERE user_id=?1 AND (?2 OR archived=0) ORDER BY created_at, name",
            Wallet::COLUMNS
        );
        let mut stmt = c.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, include_archived], Wallet::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    })
}

/// Global categories plus the ones owned by `user_id`.
pub fn categories(
    store: &Store,
    user_id: Option<&str>,
    kind: Option<CategoryKind>,
    include_archived: bool,
) -> LedgerResult<Vec<Category>> {
    store.read(|c| {
        let sql = format!(
            "SELECT {} FROM categories
             WHERE (user_id IS NULL OR user_id=?1)
               AND (?2 IS NULL OR kind=?2)
               AND (?3 OR archived=0)
             ORDER BY kind, user_id IS NOT NULL, name",
            Category::COLUMNS
        );
        let mut stmt = c.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, kind, include_archived], Category::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    })
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub wallet_id: Option<String>,
    pub kind: Option<TransactionKind>,
    /// Inclusive lower bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub to: Option<NaiveDate>,
    /// Case-insensitive match on description or category name.
    pub search: Option<String>,
    pub limit: Option<usize>,
}

/// Both sides are folded in Rust; SQLite's `lower()` only folds ASCII.
fn matches_search(t: &Transaction, needle: &str) -> bool {
    t.description.to_lowercase().contains(needle) || t.category_name.to_lowercase().contains(needle)
}

/// Newest first: by date, then by creation instant.
pub fn transactions(store: &Store, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
    let mut sql = format!("SELECT {} FROM transactions WHERE 1=1", Transaction::COLUMNS);
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(wallet_id) = &filter.wallet_id {
        sql.push_str(" AND wallet_id=?");
        params_vec.push(wallet_id.clone());
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND kind=?");
        params_vec.push(kind.as_str().into());
    }
    if let Some(from) = filter.from {
        sql.push_str(" AND date>=?");
        params_vec.push(from.to_string());
    }
    if let Some(to) = filter.to {
        sql.push_str(" AND date<=?");
        params_vec.push(to.to_string());
    }
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    sql.push_str(" ORDER BY date DESC, created_at DESC, id DESC");
    if let (Some(limit), None) = (filter.limit, &needle) {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut rows = store.read(|c| {
        let mut stmt = c.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params_vec.iter()),
            Transaction::from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    })?;
    if let Some(needle) = &needle {
        rows.retain(|t| matches_search(t, needle));
        if let Some(limit) = filter.limit {
            rows.truncate(limit);
        }
    }
    Ok(rows)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub income: Money,
    pub expense: Money,
    pub net: Money,
    pub count: i64,
}

/// Income and expense totals for one calendar month of a wallet.
///
/// Goal deposits and withdrawals are counted with their recorded kind, so
/// `net` equals the wallet's balance movement over the month.
pub fn month_summary(
    store: &Store,
    wallet_id: &str,
    year: i32,
    month: u32,
) -> LedgerResult<MonthSummary> {
    let (start, end) = month_bounds(year, month)
        .ok_or_else(|| LedgerError::validation(format!("invalid month {}-{:02}", year, month)))?;
    store.read(|c| {
        wallet_row(c, wallet_id)?;
        let mut stmt = c.prepare(
            "SELECT kind, COALESCE(SUM(amount), 0), COUNT(*) FROM transactions
             WHERE wallet_id=?1 AND date>=?2 AND date<=?3
             GROUP BY kind",
        )?;
        let rows = stmt.query_map(params![wallet_id, start, end], |r| {
            Ok((
                r.get::<_, TransactionKind>(0)?,
                r.get::<_, Money>(1)?,
                r.get::<_, i64>(2)?,
            ))
        })?;
        let mut summary = MonthSummary {
            year,
            month,
            income: Money::ZERO,
            expense: Money::ZERO,
            net: Money::ZERO,
            count: 0,
        };
        for row in rows {
            let (kind, total, count) = row?;
            match kind {
                TransactionKind::Income => summary.income = total,
                TransactionKind::Expense => summary.expense = total,
            }
            summary.count += count;
        }
        summary.net = summary.income - summary.expense;
        Ok(summary)
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub total: Money,
    pub count: i64,
}

/// Expense totals grouped by the category snapshot on each transaction.
pub fn spend_by_category(
    store: &Store,
    wallet_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> LedgerResult<Vec<CategorySpend>> {
    store.read(|c| {
        let mut stmt = c.prepare(
            "SELECT category_name, SUM(amount) AS total, COUNT(*) FROM transactions
             WHERE wallet_id=?1 AND kind='expense' AND date>=?2 AND date<=?3
             GROUP BY category_name
             ORDER BY total DESC, category_name",
        )?;
        let rows = stmt.query_map(params![wallet_id, from, to], |r| {
            Ok(CategorySpend {
                category: r.get(0)?,
                total: r.get(1)?,
                count: r.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    })
}

/// Unpaid first, soonest due first.
pub fn debts_for_wallet(store: &Store, wallet_id: &str) -> LedgerResult<Vec<Debt>> {
    store.read(|c| {
        let sql = format!(
            "SELECT {} FROM debts WHERE wallet_id=?1
             ORDER BY is_paid, due_date IS NULL, due_date, created_at",
            Debt::COLUMNS
        );
        let mut stmt = c.prepare(&sql)?;
        let rows = stmt.query_map(params![wallet_id], Debt::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebtTotals {
    pub payable_pending: Money,
    pub payable_paid: Money,
    pub receivable_pending: Money,
    pub receivable_paid: Money,
}

pub fn debt_totals(store: &Store, wallet_id: &str) -> LedgerResult<DebtTotals> {
    store.read(|c| {
        let mut stmt = c.prepare(
            "SELECT kind,
                    COALESCE(SUM(CASE WHEN is_paid=0 THEN amount - total_paid ELSE 0 END), 0),
                    COALESCE(SUM(total_paid), 0)
             FROM debts WHERE wallet_id=?1 GROUP BY kind",
        )?;
        let rows = stmt.query_map(params![wallet_id], |r| {
            Ok((
                r.get::<_, DebtKind>(0)?,
                r.get::<_, Money>(1)?,
                r.get::<_, Money>(2)?,
            ))
        })?;
        let mut totals = DebtTotals::default();
        for row in rows {
            match row? {
                (DebtKind::Payable, pending, paid) => {
                    totals.payable_pending = pending;
                    totals.payable_paid = paid;
                }
                (DebtKind::Receivable, pending, paid) => {
                    totals.receivable_pending = pending;
                    totals.receivable_paid = paid;
                }
            }
        }
        Ok(totals)
    })
}

/// In-progress goals first, oldest first.
pub fn goals_for_wallet(store: &Store, wallet_id: &str) -> LedgerResult<Vec<Goal>> {
    store.read(|c| {
        let sql = format!(
            "SELECT {} FROM goals WHERE wallet_id=?1 ORDER BY is_completed, created_at",
            Goal::COLUMNS
        );
        let mut stmt = c.prepare(&sql)?;
        let rows = stmt.query_map(params![wallet_id], Goal::from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalTotals {
    pub saved: Money,
    pub target: Money,
    pub completed: i64,
    pub count: i64,
}

impl GoalTotals {
    pub fn progress_percent(&self) -> u8 {
        self.saved.percent_of(self.target)
    }
}

pub fn goal_totals(store: &Store, wallet_id: &str) -> LedgerResult<GoalTotals> {
    store.read(|c| {
        Ok(c.query_row(
            "SELECT COALESCE(SUM(current_amount), 0), COALESCE(SUM(target_amount), 0),
                    COALESCE(SUM(is_completed), 0), COUNT(*)
             FROM goals WHERE wallet_id=?1",
            params![wallet_id],
            |r| {
                Ok(GoalTotals {
                    saved: r.get(0)?,
                    target: r.get(1)?,
                    completed: r.get(2)?,
                    count: r.get(3)?,
                })
            },
        )?)
    })
}
