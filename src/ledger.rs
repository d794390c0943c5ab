// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Mutating operations and the balance rules they keep.
//!
//! Every public function here runs as exactly one [`Store::run_exclusive`]
//! write group. The rules:
//!
//! - a transaction moves its wallet's balance by its signed effect
//!   (`income` = +amount, `expense` = -amount), whatever it is linked to;
//! - a goal deposit is recorded as an `expense` and raises the goal's saved
//!   amount by the same sum, a withdrawal is an `income` and lowers it;
//! - a debt payment is an `expense` for payables and an `income` for
//!   receivables, and raises the debt's `total_paid`;
//! - deleting or editing a transaction undoes or adjusts all of the above.

use crate::db::Store;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, CategoryKind, Debt, DebtKind, Goal, GoalDirection, Transaction, TransactionKind,
    Wallet,
};
use crate::money::Money;
use crate::queries::{
    category_row, debt_row, goal_row, linked_transactions, transaction_row, user_row, wallet_row,
};
use crate::session::ensure_active_wallet;
use crate::utils::{new_id, now};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Wallets
// ---------------------------------------------------------------------------

pub(crate) fn insert_wallet(
    conn: &Connection,
    user_id: &str,
    name: &str,
    opening_balance: Money,
) -> LedgerResult<Wallet> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("wallet name cannot be empty"));
    }
    user_row(conn, user_id)?;
    let id = new_id();
    let ts = now();
    conn.execute(
        "INSERT INTO wallets(id, user_id, name, balance, archived, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
        params![&id, user_id, name, opening_balance, ts],
    )?;
    info!(wallet = %id, user = %user_id, "created wallet");
    wallet_row(conn, &id)
}

/// Create a wallet. `opening_balance` is where the balance starts; it is not
/// recorded as a transaction.
pub fn create_wallet(
    store: &Store,
    user_id: &str,
    name: &str,
    opening_balance: Money,
) -> LedgerResult<Wallet> {
    store.run_exclusive(|tx| insert_wallet(tx, user_id, name, opening_balance))
}

pub fn rename_wallet(store: &Store, wallet_id: &str, name: &str) -> LedgerResult<Wallet> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("wallet name cannot be empty"));
    }
    store.run_exclusive(|tx| {
        wallet_row(tx, wallet_id)?;
        tx.execute(
            "UPDATE wallets SET name=?1, updated_at=?2 WHERE id=?3",
            params![name, now(), wallet_id],
        )?;
        wallet_row(tx, wallet_id)
    })
}

pub fn set_wallet_archived(store: &Store, wallet_id: &str, archived: bool) -> LedgerResult<Wallet> {
    store.run_exclusive(|tx| {
        wallet_row(tx, wallet_id)?;
        tx.execute(
            "UPDATE wallets SET archived=?1, updated_at=?2 WHERE id=?3",
            params![archived, now(), wallet_id],
        )?;
        wallet_row(tx, wallet_id)
    })
}

/// Delete a wallet together with its debts, goals and transactions.
///
/// If it was the owner's active wallet, another wallet of theirs becomes
/// active (a fresh default one if none is left).
pub fn delete_wallet(store: &Store, wallet_id: &str) -> LedgerResult<()> {
    store.run_exclusive(|tx| {
        let wallet = wallet_row(tx, wallet_id)?;
        tx.execute("DELETE FROM wallets WHERE id=?1", params![wallet_id])?;
        let mut user = user_row(tx, &wallet.user_id)?;
        if user.settings.last_opened_wallet.as_deref() == Some(wallet_id) {
            user.settings.last_opened_wallet = None;
            ensure_active_wallet(tx, &mut user)?;
        }
        info!(wallet = %wallet_id, "deleted wallet and its records");
        Ok(())
    })
}

fn out_of_range(what: &str) -> LedgerError {
    LedgerError::validation(format!("{} would be out of range", what))
}

fn plus(a: Money, b: Money, what: &str) -> LedgerResult<Money> {
    a.checked_add(b).ok_or_else(|| out_of_range(what))
}

fn minus(a: Money, b: Money, what: &str) -> LedgerResult<Money> {
    a.checked_sub(b).ok_or_else(|| out_of_range(what))
}

/// Net wallet effect of `ts`, negated so it can be applied as a reversal.
fn reversal_of(ts: &[Transaction]) -> LedgerResult<Money> {
    ts.iter()
        .try_fold(Money::ZERO, |acc, t| plus(acc, t.signed_effect(), "reversal"))?
        .checked_neg()
        .ok_or_else(|| out_of_range("reversal"))
}

/// The new balance is computed here, not in SQL, so an overflow is refused
/// instead of being stored as a REAL.
fn adjust_wallet(conn: &Connection, wallet_id: &str, delta: Money) -> LedgerResult<()> {
    if delta.is_zero() {
        return Ok(());
    }
    let wallet = wallet_row(conn, wallet_id)?;
    let balance = plus(wallet.balance, delta, "wallet balance")?;
    conn.execute(
        "UPDATE wallets SET balance=?1, updated_at=?2 WHERE id=?3",
        params![balance, now(), wallet_id],
    )?;
    debug!(wallet = %wallet_id, delta = %delta, "wallet balance adjusted");
    Ok(())
}

fn writable_wallet(conn: &Connection, wallet_id: &str) -> LedgerResult<Wallet> {
    let wallet = wallet_row(conn, wallet_id)?;
    if wallet.archived {
        return Err(LedgerError::validation(format!(
            "wallet '{}' is archived",
            wallet.name
        )));
    }
    Ok(wallet)
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub user_id: String,
    pub name: String,
    pub icon: String,
    pub kind: CategoryKind,
    pub color: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryEdit {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

pub fn create_category(store: &Store, new: NewCategory) -> LedgerResult<Category> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("category name cannot be empty"));
    }
    store.run_exclusive(|tx| {
        user_row(tx, &new.user_id)?;
        let id = new_id();
        tx.execute(
            "INSERT INTO categories(id, user_id, name, icon, kind, color, archived)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
            params![&id, &new.user_id, name, &new.icon, new.kind, &new.color],
        )?;
        category_row(tx, &id)
    })
}

fn user_category(conn: &Connection, category_id: &str) -> LedgerResult<Category> {
    let cat = category_row(conn, category_id)?;
    if cat.is_global() {
        return Err(LedgerError::validation(format!(
            "category '{}' is built in and cannot be changed",
            cat.name
        )));
    }
    Ok(cat)
}

/// Edit a user category. Historical transactions keep their snapshot.
pub fn update_category(
    store: &Store,
    category_id: &str,
    edit: CategoryEdit,
) -> LedgerResult<Category> {
    if edit.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(LedgerError::validation("category name cannot be empty"));
    }
    store.run_exclusive(|tx| {
        user_category(tx, category_id)?;
        tx.execute(
            "UPDATE categories SET name=COALESCE(?1, name), icon=COALESCE(?2, icon),
                    color=COALESCE(?3, color)
             WHERE id=?4",
            params![
                edit.name.as_deref().map(str::trim),
                &edit.icon,
                &edit.color,
                category_id
            ],
        )?;
        category_row(tx, category_id)
    })
}

pub fn set_category_archived(
    store: &Store,
    category_id: &str,
    archived: bool,
) -> LedgerResult<Category> {
    store.run_exclusive(|tx| {
        user_category(tx, category_id)?;
        tx.execute(
            "UPDATE categories SET archived=?1 WHERE id=?2",
            params![archived, category_id],
        )?;
        category_row(tx, category_id)
    })
}

/// The built-in category used to label linked transactions.
fn system_category(conn: &Connection, kind: CategoryKind) -> LedgerResult<Option<Category>> {
    let sql = format!(
        "SELECT {} FROM categories WHERE user_id IS NULL AND kind=?1 ORDER BY archived, name LIMIT 1",
        Category::COLUMNS
    );
    Ok(conn
        .query_row(&sql, params![kind], Category::from_row)
        .optional()?)
}

/// (category_id, name, icon) to stamp on a linked transaction.
fn linked_snapshot(
    conn: &Connection,
    kind: CategoryKind,
) -> LedgerResult<(Option<String>, String, String)> {
    Ok(match system_category(conn, kind)? {
        Some(c) => (Some(c.id), c.name, c.icon),
        None => {
            let name = match kind {
                CategoryKind::Debts => "Debts",
                CategoryKind::Goals => "Goals",
                CategoryKind::Income => "Income",
                CategoryKind::Expense => "Expense",
            };
            (None, name.to_string(), String::new())
        }
    })
}

fn category_for_transaction(
    conn: &Connection,
    wallet: &Wallet,
    category_id: &str,
    kind: TransactionKind,
) -> LedgerResult<Category> {
    let cat = category_row(conn, category_id)?;
    if cat.user_id.as_deref().is_some_and(|u| u != wallet.user_id) {
        return Err(LedgerError::not_found("category", category_id));
    }
    let matches = matches!(
        (cat.kind, kind),
        (CategoryKind::Income, TransactionKind::Income)
            | (CategoryKind::Expense, TransactionKind::Expense)
    );
    if !matches {
        return Err(LedgerError::validation(format!(
            "category '{}' ({}) cannot be used for an {} transaction",
            cat.name, cat.kind, kind
        )));
    }
    Ok(cat)
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub wallet_id: String,
    pub kind: TransactionKind,
    pub amount: Money,
    pub category_id: Option<String>,
    pub debt_id: Option<String>,
    pub goal_id: Option<String>,
    pub description: String,
    pub date: NaiveDate,
}

/// Fields to change on an existing transaction; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TransactionEdit {
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub date: Option<NaiveDate>,
}

fn insert_transaction(conn: &Connection, t: &Transaction) -> LedgerResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO transactions({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            Transaction::COLUMNS
        ),
        params![
            &t.id,
            &t.user_id,
            &t.wallet_id,
            &t.category_id,
            &t.debt_id,
            &t.goal_id,
            t.kind,
            t.amount,
            &t.description,
            &t.category_name,
            &t.category_icon,
            t.date,
            t.created_at,
            t.updated_at
        ],
    )?;
    Ok(())
}

fn require_positive(amount: Money) -> LedgerResult<()> {
    if !amount.is_positive() {
        return Err(LedgerError::validation(format!(
            "amount must be greater than zero (got {})",
            amount
        )));
    }
    Ok(())
}

/// Record a transaction and apply its effect.
///
/// With a `debt_id` this is a debt payment and the kind is taken from the
/// debt; with a `goal_id` an `expense` deposits into the goal and an `income`
/// withdraws from it.
pub fn create_transaction(store: &Store, new: NewTransaction) -> LedgerResult<Transaction> {
    require_positive(new.amount)?;
    if new.debt_id.is_some() && new.goal_id.is_some() {
        return Err(LedgerError::validation(
            "a transaction cannot be linked to both a debt and a goal",
        ));
    }
    store.run_exclusive(|tx| {
        let wallet = writable_wallet(tx, &new.wallet_id)?;
        if let Some(debt_id) = &new.debt_id {
            let debt = debt_row(tx, debt_id)?;
            ensure_same_wallet("debt", &debt.id, &debt.wallet_id, &wallet)?;
            return apply_debt_payment(tx, &wallet, &debt, new.amount, new.date, &new.description);
        }
        if let Some(goal_id) = &new.goal_id {
            let goal = goal_row(tx, goal_id)?;
            ensure_same_wallet("goal", &goal.id, &goal.wallet_id, &wallet)?;
            let direction = GoalDirection::from_transaction_kind(new.kind);
            return apply_goal_movement(
                tx,
                &wallet,
                &goal,
                direction,
                new.amount,
                new.date,
                &new.description,
            );
        }

        let (category_id, category_name, category_icon) = match &new.category_id {
            Some(id) => {
                let cat = category_for_transaction(tx, &wallet, id, new.kind)?;
                (Some(cat.id), cat.name, cat.icon)
            }
            None => (None, String::new(), String::new()),
        };
        let ts = now();
        let t = Transaction {
            id: new_id(),
            user_id: wallet.user_id.clone(),
            wallet_id: wallet.id.clone(),
            category_id,
            debt_id: None,
            goal_id: None,
            kind: new.kind,
            amount: new.amount,
            description: new.description.trim().to_string(),
            category_name,
            category_icon,
            date: new.date,
            created_at: ts,
            updated_at: ts,
        };
        insert_transaction(tx, &t)?;
        adjust_wallet(tx, &wallet.id, t.signed_effect())?;
        info!(transaction = %t.id, wallet = %wallet.id, kind = %t.kind, amount = %t.amount, "recorded transaction");
        Ok(t)
    })
}

fn ensure_same_wallet(
    entity: &'static str,
    id: &str,
    owner_wallet: &str,
    wallet: &Wallet,
) -> LedgerResult<()> {
    if owner_wallet != wallet.id {
        return Err(LedgerError::validation(format!(
            "{} '{}' belongs to another wallet",
            entity, id
        )));
    }
    Ok(())
}

/// Change amount, description, category or date of a transaction.
///
/// The wallet moves by the signed difference only. On linked transactions the
/// description and category belong to the debt/goal and are left as they are;
/// the linked record follows the amount change.
pub fn edit_transaction(
    store: &Store,
    transaction_id: &str,
    edit: TransactionEdit,
) -> LedgerResult<Transaction> {
    if let Some(amount) = edit.amount {
        require_positive(amount)?;
    }
    store.run_exclusive(|tx| {
        let old = transaction_row(tx, transaction_id)?;
        let new_amount = edit.amount.unwrap_or(old.amount);
        let delta = minus(new_amount, old.amount, "amount change")?;

        if !delta.is_zero() {
            adjust_wallet(tx, &old.wallet_id, old.kind.signed(delta))?;
            if let Some(debt_id) = &old.debt_id {
                let debt = debt_row(tx, debt_id)?;
                write_debt_paid(tx, &debt, plus(debt.total_paid, delta, "debt paid amount")?)?;
            }
            if let Some(goal_id) = &old.goal_id {
                let goal = goal_row(tx, goal_id)?;
                let next = match GoalDirection::from_transaction_kind(old.kind) {
                    GoalDirection::Deposit => plus(goal.current_amount, delta, "goal amount")?,
                    GoalDirection::Withdraw => minus(goal.current_amount, delta, "goal amount")?,
                };
                write_goal_current(tx, &goal, next)?;
            }
        }

        let (category_id, category_name, category_icon, description) = if old.is_linked() {
            if edit.category_id.is_some() || edit.description.is_some() {
                debug!(transaction = %old.id, "ignoring category/description edit on linked transaction");
            }
            (
                old.category_id.clone(),
                old.category_name.clone(),
                old.category_icon.clone(),
                old.description.clone(),
            )
        } else {
            let (cid, cname, cicon) = match &edit.category_id {
                Some(id) if old.category_id.as_deref() != Some(id.as_str()) => {
                    let wallet = wallet_row(tx, &old.wallet_id)?;
                    let cat = category_for_transaction(tx, &wallet, id, old.kind)?;
                    (Some(cat.id), cat.name, cat.icon)
                }
                _ => (
                    old.category_id.clone(),
                    old.category_name.clone(),
                    old.category_icon.clone(),
                ),
            };
            let description = edit
                .description
                .as_deref()
                .map(|d| d.trim().to_string())
                .unwrap_or_else(|| old.description.clone());
            (cid, cname, cicon, description)
        };

        tx.execute(
            "UPDATE transactions SET amount=?1, description=?2, category_id=?3, category_name=?4,
                    category_icon=?5, date=?6, updated_at=?7
             WHERE id=?8",
            params![
                new_amount,
                description,
                category_id,
                category_name,
                category_icon,
                edit.date.unwrap_or(old.date),
                now(),
                transaction_id
            ],
        )?;
        info!(transaction = %transaction_id, delta = %delta, "edited transaction");
        transaction_row(tx, transaction_id)
    })
}

/// Undo the effect of `t` on its wallet and linked record, then delete it.
fn reverse_and_delete(conn: &Connection, t: &Transaction) -> LedgerResult<()> {
    adjust_wallet(conn, &t.wallet_id, -t.signed_effect())?;
    if let Some(debt_id) = &t.debt_id {
        let debt = debt_row(conn, debt_id)?;
        write_debt_paid(conn, &debt, minus(debt.total_paid, t.amount, "debt paid amount")?)?;
    }
    if let Some(goal_id) = &t.goal_id {
        let goal = goal_row(conn, goal_id)?;
        let next = match GoalDirection::from_transaction_kind(t.kind) {
            GoalDirection::Deposit => minus(goal.current_amount, t.amount, "goal amount")?,
            GoalDirection::Withdraw => plus(goal.current_amount, t.amount, "goal amount")?,
        };
        write_goal_current(conn, &goal, next)?;
    }
    conn.execute("DELETE FROM transactions WHERE id=?1", params![&t.id])?;
    Ok(())
}

/// Delete a transaction, reversing everything it did. Returns the deleted row.
pub fn delete_transaction(store: &Store, transaction_id: &str) -> LedgerResult<Transaction> {
    store.run_exclusive(|tx| {
        let t = transaction_row(tx, transaction_id)?;
        reverse_and_delete(tx, &t)?;
        info!(transaction = %t.id, wallet = %t.wallet_id, "deleted transaction");
        Ok(t)
    })
}

// ---------------------------------------------------------------------------
// Debts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewDebt {
    pub wallet_id: String,
    pub kind: DebtKind,
    pub title: String,
    pub counterparty: String,
    pub amount: Money,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct DebtEdit {
    pub title: Option<String>,
    pub counterparty: Option<String>,
    pub amount: Option<Money>,
    pub due_date: Option<NaiveDate>,
}

/// Register a debt. Creating it does not move money; payments do.
pub fn create_debt(store: &Store, new: NewDebt) -> LedgerResult<Debt> {
    require_positive(new.amount)?;
    let title = new.title.trim();
    if title.is_empty() {
        return Err(LedgerError::validation("debt title cannot be empty"));
    }
    store.run_exclusive(|tx| {
        wallet_row(tx, &new.wallet_id)?;
        let id = new_id();
        let ts = now();
        tx.execute(
            "INSERT INTO debts(id, wallet_id, kind, title, counterparty, amount, total_paid,
                               due_date, is_paid, paid_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, 0, NULL, ?8, ?8)",
            params![
                &id,
                &new.wallet_id,
                new.kind,
                title,
                new.counterparty.trim(),
                new.amount,
                new.due_date,
                ts
            ],
        )?;
        info!(debt = %id, wallet = %new.wallet_id, amount = %new.amount, "created debt");
        debt_row(tx, &id)
    })
}

pub fn update_debt(store: &Store, debt_id: &str, edit: DebtEdit) -> LedgerResult<Debt> {
    if let Some(amount) = edit.amount {
        require_positive(amount)?;
    }
    store.run_exclusive(|tx| {
        let debt = debt_row(tx, debt_id)?;
        let amount = edit.amount.unwrap_or(debt.amount);
        if amount < debt.total_paid {
            return Err(LedgerError::validation(format!(
                "amount {} is below the {} already paid",
                amount, debt.total_paid
            )));
        }
        let title = edit.title.as_deref().map(str::trim).unwrap_or(debt.title.as_str());
        if title.is_empty() {
            return Err(LedgerError::validation("debt title cannot be empty"));
        }
        tx.execute(
            "UPDATE debts SET title=?1, counterparty=COALESCE(?2, counterparty), amount=?3,
                    due_date=COALESCE(?4, due_date), updated_at=?5
             WHERE id=?6",
            params![
                title,
                edit.counterparty.as_deref().map(str::trim),
                amount,
                edit.due_date,
                now(),
                debt_id
            ],
        )?;
        let refreshed = debt_row(tx, debt_id)?;
        write_debt_paid(tx, &refreshed, refreshed.total_paid)?;
        debt_row(tx, debt_id)
    })
}

/// Delete a debt and its payments, reversing their wallet effect.
pub fn delete_debt(store: &Store, debt_id: &str) -> LedgerResult<()> {
    store.run_exclusive(|tx| {
        let debt = debt_row(tx, debt_id)?;
        let payments = linked_transactions(tx, "debt_id", debt_id)?;
        adjust_wallet(tx, &debt.wallet_id, reversal_of(&payments)?)?;
        tx.execute("DELETE FROM transactions WHERE debt_id=?1", params![debt_id])?;
        tx.execute("DELETE FROM debts WHERE id=?1", params![debt_id])?;
        info!(debt = %debt_id, payments = payments.len(), "deleted debt");
        Ok(())
    })
}

/// Persist a new `total_paid`, keeping `is_paid`/`paid_at` in step.
fn write_debt_paid(conn: &Connection, debt: &Debt, total_paid: Money) -> LedgerResult<()> {
    if total_paid.is_negative() {
        return Err(LedgerError::validation(format!(
            "debt '{}' cannot have a negative paid amount",
            debt.title
        )));
    }
    if total_paid > debt.amount {
        return Err(LedgerError::validation(format!(
            "payment exceeds remaining balance of {} on debt '{}'",
            debt.remaining(),
            debt.title
        )));
    }
    let is_paid = total_paid >= debt.amount;
    let paid_at = match (is_paid, debt.paid_at) {
        (true, Some(at)) => Some(at),
        (true, None) => Some(now()),
        (false, _) => None,
    };
    conn.execute(
        "UPDATE debts SET total_paid=?1, is_paid=?2, paid_at=?3, updated_at=?4 WHERE id=?5",
        params![total_paid, is_paid, paid_at, now(), &debt.id],
    )?;
    Ok(())
}

fn apply_debt_payment(
    conn: &Connection,
    wallet: &Wallet,
    debt: &Debt,
    amount: Money,
    date: NaiveDate,
    description: &str,
) -> LedgerResult<Transaction> {
    require_positive(amount)?;
    if amount > debt.remaining() {
        return Err(LedgerError::validation(format!(
            "payment of {} exceeds remaining balance of {}",
            amount,
            debt.remaining()
        )));
    }
    write_debt_paid(conn, debt, plus(debt.total_paid, amount, "debt paid amount")?)?;

    let (category_id, category_name, category_icon) = linked_snapshot(conn, CategoryKind::Debts)?;
    let description = match description.trim() {
        "" => format!("{}: {}", debt.title, debt.counterparty),
        d => d.to_string(),
    };
    let ts = now();
    let t = Transaction {
        id: new_id(),
        user_id: wallet.user_id.clone(),
        wallet_id: wallet.id.clone(),
        category_id,
        debt_id: Some(debt.id.clone()),
        goal_id: None,
        kind: debt.kind.payment_kind(),
        amount,
        description,
        category_name,
        category_icon,
        date,
        created_at: ts,
        updated_at: ts,
    };
    insert_transaction(conn, &t)?;
    adjust_wallet(conn, &wallet.id, t.signed_effect())?;
    info!(debt = %debt.id, amount = %amount, "recorded debt payment");
    Ok(t)
}

/// Pay down (or collect on) a debt from its wallet.
///
/// Fails with a validation error when `amount` is not positive or is more
/// than what is still outstanding.
pub fn pay_debt(
    store: &Store,
    debt_id: &str,
    amount: Money,
    date: NaiveDate,
) -> LedgerResult<Transaction> {
    require_positive(amount)?;
    store.run_exclusive(|tx| {
        let debt = debt_row(tx, debt_id)?;
        let wallet = writable_wallet(tx, &debt.wallet_id)?;
        apply_debt_payment(tx, &wallet, &debt, amount, date, "")
    })
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub wallet_id: String,
    pub name: String,
    pub target_amount: Money,
    pub deadline: Option<NaiveDate>,
    pub color: String,
}

#[derive(Debug, Clone, Default)]
pub struct GoalEdit {
    pub name: Option<String>,
    pub target_amount: Option<Money>,
    pub deadline: Option<NaiveDate>,
    pub color: Option<String>,
}

pub fn create_goal(store: &Store, new: NewGoal) -> LedgerResult<Goal> {
    require_positive(new.target_amount)?;
    let name = new.name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("goal name cannot be empty"));
    }
    store.run_exclusive(|tx| {
        wallet_row(tx, &new.wallet_id)?;
        let id = new_id();
        let ts = now();
        tx.execute(
            "INSERT INTO goals(id, wallet_id, name, target_amount, current_amount, deadline,
                               is_completed, color, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, 0, ?6, ?7, ?7)",
            params![&id, &new.wallet_id, name, new.target_amount, new.deadline, &new.color, ts],
        )?;
        info!(goal = %id, wallet = %new.wallet_id, target = %new.target_amount, "created goal");
        goal_row(tx, &id)
    })
}

pub fn update_goal(store: &Store, goal_id: &str, edit: GoalEdit) -> LedgerResult<Goal> {
    if let Some(target) = edit.target_amount {
        require_positive(target)?;
    }
    if edit.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(LedgerError::validation("goal name cannot be empty"));
    }
    store.run_exclusive(|tx| {
        goal_row(tx, goal_id)?;
        tx.execute(
            "UPDATE goals SET name=COALESCE(?1, name), target_amount=COALESCE(?2, target_amount),
                    deadline=COALESCE(?3, deadline), color=COALESCE(?4, color), updated_at=?5
             WHERE id=?6",
            params![
                edit.name.as_deref().map(str::trim),
                edit.target_amount,
                edit.deadline,
                &edit.color,
                now(),
                goal_id
            ],
        )?;
        let goal = goal_row(tx, goal_id)?;
        write_goal_current(tx, &goal, goal.current_amount)?;
        goal_row(tx, goal_id)
    })
}

/// Delete a goal. Its saved amount goes back to the wallet along with the
/// deposit/withdrawal history.
pub fn delete_goal(store: &Store, goal_id: &str) -> LedgerResult<()> {
    store.run_exclusive(|tx| {
        let goal = goal_row(tx, goal_id)?;
        let movements = linked_transactions(tx, "goal_id", goal_id)?;
        adjust_wallet(tx, &goal.wallet_id, reversal_of(&movements)?)?;
        tx.execute("DELETE FROM transactions WHERE goal_id=?1", params![goal_id])?;
        tx.execute("DELETE FROM goals WHERE id=?1", params![goal_id])?;
        info!(goal = %goal_id, released = %goal.current_amount, "deleted goal");
        Ok(())
    })
}

/// Persist a new saved amount, keeping `is_completed` in step.
fn write_goal_current(conn: &Connection, goal: &Goal, current: Money) -> LedgerResult<()> {
    if current.is_negative() {
        return Err(LedgerError::InsufficientFunds {
            available: goal.current_amount,
            requested: minus(goal.current_amount, current, "goal amount")?,
        });
    }
    let is_completed = current >= goal.target_amount;
    conn.execute(
        "UPDATE goals SET current_amount=?1, is_completed=?2, updated_at=?3 WHERE id=?4",
        params![current, is_completed, now(), &goal.id],
    )?;
    Ok(())
}

fn apply_goal_movement(
    conn: &Connection,
    wallet: &Wallet,
    goal: &Goal,
    direction: GoalDirection,
    amount: Money,
    date: NaiveDate,
    description: &str,
) -> LedgerResult<Transaction> {
    require_positive(amount)?;
    let next = match direction {
        GoalDirection::Deposit => plus(goal.current_amount, amount, "goal amount")?,
        GoalDirection::Withdraw => {
            if amount > goal.current_amount {
                return Err(LedgerError::InsufficientFunds {
                    available: goal.current_amount,
                    requested: amount,
                });
            }
            goal.current_amount - amount
        }
    };
    write_goal_current(conn, goal, next)?;

    let (category_id, category_name, category_icon) = linked_snapshot(conn, CategoryKind::Goals)?;
    let description = match description.trim() {
        "" => match direction {
            GoalDirection::Deposit => format!("Deposit to {}", goal.name),
            GoalDirection::Withdraw => format!("Withdrawal from {}", goal.name),
        },
        d => d.to_string(),
    };
    let ts = now();
    let t = Transaction {
        id: new_id(),
        user_id: wallet.user_id.clone(),
        wallet_id: wallet.id.clone(),
        category_id,
        debt_id: None,
        goal_id: Some(goal.id.clone()),
        kind: direction.transaction_kind(),
        amount,
        description,
        category_name,
        category_icon,
        date,
        created_at: ts,
        updated_at: ts,
    };
    insert_transaction(conn, &t)?;
    adjust_wallet(conn, &wallet.id, t.signed_effect())?;
    info!(goal = %goal.id, ?direction, amount = %amount, "moved goal funds");
    Ok(t)
}

/// Move money between a goal and its wallet.
///
/// A deposit takes `amount` out of the wallet into the goal; a withdrawal
/// returns it. Withdrawing more than the goal holds fails with
/// [`LedgerError::InsufficientFunds`].
pub fn move_goal_funds(
    store: &Store,
    goal_id: &str,
    direction: GoalDirection,
    amount: Money,
    date: NaiveDate,
) -> LedgerResult<Transaction> {
    require_positive(amount)?;
    store.run_exclusive(|tx| {
        let goal = goal_row(tx, goal_id)?;
        let wallet = writable_wallet(tx, &goal.wallet_id)?;
        apply_goal_movement(tx, &wallet, &goal, direction, amount, date, "")
    })
}
