// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The signed-in local user and their device settings.
//!
//! A [`Session`] is an explicit value owned by the caller. Which user is
//! signed in is remembered in the `meta` table so that a later process picks
//! the same user up again; signing out forgets it without touching any data.

use crate::db::Store;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::insert_wallet;
use crate::models::{User, UserSettings};
use crate::money::Money;
use crate::queries::{user_row, wallet_row};
use crate::utils::{new_id, now};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

const SESSION_KEY: &str = "session_user";
const DEFAULT_WALLET_NAME: &str = "Main Wallet";
const GUEST_NAME: &str = "Guest";

#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn signed_out() -> Self {
        Session { user: None }
    }

    /// Restore the session left by the last sign-in, if any.
    pub fn load(store: &Store) -> LedgerResult<Self> {
        let user = store.read(|c| {
            let id: Option<String> = c
                .query_row(
                    "SELECT value FROM meta WHERE key=?1",
                    params![SESSION_KEY],
                    |r| r.get(0),
                )
                .optional()?;
            match id {
                Some(id) => match user_row(c, &id) {
                    Ok(u) => Ok(Some(u)),
                    Err(LedgerError::NotFound { .. }) => Ok(None),
                    Err(e) => Err(e),
                },
                None => Ok(None),
            }
        })?;
        Ok(Session { user })
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> LedgerResult<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| LedgerError::validation("not signed in"))
    }

    pub fn active_wallet_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.settings.last_opened_wallet.as_deref())
    }

    pub fn hide_values(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.settings.hide_values)
    }

    /// Sign in as the local user with `email`, creating it on first use.
    pub fn sign_in(&mut self, store: &Store, name: &str, email: &str) -> LedgerResult<&User> {
        let name = name.trim();
        let email = email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() {
            return Err(LedgerError::validation("name and email are required"));
        }
        let user = store.run_exclusive(|tx| {
            let existing: Option<String> = tx
                .query_row(
                    "SELECT id FROM users WHERE email=?1",
                    params![&email],
                    |r| r.get(0),
                )
                .optional()?;
            let id = match existing {
                Some(id) => id,
                None => insert_user(tx, name, Some(email.as_str()), false)?,
            };
            activate(tx, &id)
        })?;
        info!(user = %user.id, "signed in");
        Ok(&*self.user.insert(user))
    }

    /// Sign in without an account, reusing the guest user if one exists.
    pub fn sign_in_guest(&mut self, store: &Store) -> LedgerResult<&User> {
        let user = store.run_exclusive(|tx| {
            let existing: Option<String> = tx
                .query_row(
                    "SELECT id FROM users WHERE is_guest=1 ORDER BY created_at LIMIT 1",
                    [],
                    |r| r.get(0),
                )
                .optional()?;
            let id = match existing {
                Some(id) => id,
                None => insert_user(tx, GUEST_NAME, None, true)?,
            };
            activate(tx, &id)
        })?;
        info!(user = %user.id, "signed in as guest");
        Ok(&*self.user.insert(user))
    }

    pub fn select_wallet(&mut self, store: &Store, wallet_id: &str) -> LedgerResult<()> {
        let user_id = self.require_user()?.id.clone();
        let user = store.run_exclusive(|tx| {
            let wallet = wallet_row(tx, wallet_id)?;
            if wallet.user_id != user_id {
                return Err(LedgerError::not_found("wallet", wallet_id));
            }
            let mut user = user_row(tx, &user_id)?;
            user.settings.last_opened_wallet = Some(wallet.id);
            write_settings(tx, &user_id, &user.settings)?;
            user_row(tx, &user_id)
        })?;
        self.user = Some(user);
        Ok(())
    }

    pub fn set_hide_values(&mut self, store: &Store, hide: bool) -> LedgerResult<()> {
        let user_id = self.require_user()?.id.clone();
        let user = store.run_exclusive(|tx| {
            let mut user = user_row(tx, &user_id)?;
            user.settings.hide_values = hide;
            write_settings(tx, &user_id, &user.settings)?;
            user_row(tx, &user_id)
        })?;
        self.user = Some(user);
        Ok(())
    }

    pub fn update_profile(
        &mut self,
        store: &Store,
        name: Option<&str>,
        avatar: Option<&str>,
    ) -> LedgerResult<()> {
        let user_id = self.require_user()?.id.clone();
        if name.is_some_and(|n| n.trim().is_empty()) {
            return Err(LedgerError::validation("name cannot be empty"));
        }
        let user = store.run_exclusive(|tx| {
            tx.execute(
                "UPDATE users SET name=COALESCE(?1, name), avatar=COALESCE(?2, avatar), updated_at=?3
                 WHERE id=?4",
                params![name.map(str::trim), avatar, now(), &user_id],
            )?;
            user_row(tx, &user_id)
        })?;
        self.user = Some(user);
        Ok(())
    }

    /// Re-read the user after operations that may have changed its settings.
    pub fn refresh(&mut self, store: &Store) -> LedgerResult<()> {
        if let Some(id) = self.user.as_ref().map(|u| u.id.clone()) {
            self.user = Some(store.read(|c| user_row(c, &id))?);
        }
        Ok(())
    }

    /// Forget the signed-in user. Local data is kept.
    pub fn sign_out(&mut self, store: &Store) -> LedgerResult<()> {
        store.run_exclusive(|tx| {
            tx.execute("DELETE FROM meta WHERE key=?1", params![SESSION_KEY])?;
            Ok(())
        })?;
        if let Some(user) = self.user.take() {
            info!(user = %user.id, "signed out");
        }
        Ok(())
    }

    /// Erase every user, wallet and user-owned record on this device.
    pub fn purge(&mut self, store: &Store) -> LedgerResult<()> {
        store.run_exclusive(|tx| {
            tx.execute_batch(
                "DELETE FROM transactions;
                 DELETE FROM debts;
                 DELETE FROM goals;
                 DELETE FROM wallets;
                 DELETE FROM categories WHERE user_id IS NOT NULL;
                 DELETE FROM users;",
            )?;
            tx.execute("DELETE FROM meta WHERE key=?1", params![SESSION_KEY])?;
            Ok(())
        })?;
        self.user = None;
        info!("purged local data");
        Ok(())
    }
}

fn insert_user(
    conn: &Connection,
    name: &str,
    email: Option<&str>,
    is_guest: bool,
) -> LedgerResult<String> {
    let id = new_id();
    let ts = now();
    let settings = serde_json::to_string(&UserSettings::default())?;
    conn.execute(
        "INSERT INTO users(id, name, email, avatar, settings, is_guest, created_at, updated_at)
         VALUES (?1, ?2, ?3, NULL, ?4, ?5, ?6, ?6)",
        params![&id, name, email, settings, is_guest, ts],
    )?;
    Ok(id)
}

/// Make `user_id` the session user and make sure it has a usable active wallet.
fn activate(conn: &Connection, user_id: &str) -> LedgerResult<User> {
    conn.execute(
        "INSERT INTO meta(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![SESSION_KEY, user_id],
    )?;
    let mut user = user_row(conn, user_id)?;
    ensure_active_wallet(conn, &mut user)?;
    user_row(conn, user_id)
}

/// Point `last_opened_wallet` at an existing wallet of `user`, creating the
/// default wallet if the user has none.
pub(crate) fn ensure_active_wallet(conn: &Connection, user: &mut User) -> LedgerResult<()> {
    if let Some(current) = user.settings.last_opened_wallet.as_deref() {
        match wallet_row(conn, current) {
            Ok(w) if w.user_id == user.id => return Ok(()),
            Ok(_) | Err(LedgerError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    let fallback: Option<String> = conn
        .query_row(
            "SELECT id FROM wallets WHERE user_id=?1 ORDER BY archived, created_at LIMIT 1",
            params![&user.id],
            |r| r.get(0),
        )
        .optional()?;
    let wallet_id = match fallback {
        Some(id) => id,
        None => insert_wallet(conn, &user.id, DEFAULT_WALLET_NAME, Money::ZERO)?.id,
    };
    user.settings.last_opened_wallet = Some(wallet_id);
    write_settings(conn, &user.id, &user.settings)
}

pub(crate) fn write_settings(
    conn: &Connection,
    user_id: &str,
    settings: &UserSettings,
) -> LedgerResult<()> {
    let raw = serde_json::to_string(settings)?;
    let n = conn.execute(
        "UPDATE users SET settings=?1, updated_at=?2 WHERE id=?3",
        params![raw, now(), user_id],
    )?;
    if n == 0 {
        return Err(LedgerError::not_found("user", user_id));
    }
    Ok(())
}
