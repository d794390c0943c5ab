// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::ledger::{self, NewGoal, NewTransaction};
use pocketbook::models::{GoalDirection, TransactionKind};
use pocketbook::{LedgerError, Money, Session, Store, queries};
use rusqlite::params;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

fn seeded(store: &Store, opening: &str) -> String {
    let mut session = Session::signed_out();
    let user_id = session
        .sign_in(store, "Ada", "ada@example.com")
        .unwrap()
        .id
        .clone();
    ledger::create_wallet(store, &user_id, "Checking", money(opening))
        .unwrap()
        .id
}

fn income(wallet_id: &str, amount: &str) -> NewTransaction {
    NewTransaction {
        wallet_id: wallet_id.to_string(),
        kind: TransactionKind::Income,
        amount: money(amount),
        category_id: None,
        debt_id: None,
        goal_id: None,
        description: "pay".into(),
        date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    }
}

fn transaction_count(store: &Store) -> i64 {
    store
        .read(|c| Ok(c.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))?))
        .unwrap()
}

#[test]
fn failed_body_rolls_back_every_write() {
    let store = Store::open_in_memory().unwrap();
    let wallet = seeded(&store, "10.00");

    let err = store
        .run_exclusive::<(), _>(|tx| {
            tx.execute(
                "UPDATE wallets SET balance = balance + 500 WHERE id=?1",
                params![&wallet],
            )?;
            Err(LedgerError::validation("stop here"))
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(queries::wallet(&store, &wallet).unwrap().balance, money("10.00"));
}

#[test]
fn wallet_balance_column_only_holds_integers() {
    let store = Store::open_in_memory().unwrap();
    let wallet = seeded(&store, "10.00");

    let err = store
        .run_exclusive(|tx| {
            tx.execute(
                "UPDATE wallets SET balance = 1.5 WHERE id=?1",
                params![&wallet],
            )?;
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::Storage(_)));
    assert_eq!(queries::wallet(&store, &wallet).unwrap().balance, money("10.00"));
}

#[test]
fn storage_failure_mid_write_leaves_no_trace() {
    let store = Store::open_in_memory().unwrap();
    let wallet = seeded(&store, "100.00");
    store
        .read(|c| {
            c.execute_batch(
                "CREATE TEMP TRIGGER fail_balance BEFORE UPDATE OF balance ON wallets
                 BEGIN SELECT RAISE(ABORT, 'simulated disk failure'); END;",
            )?;
            Ok(())
        })
        .unwrap();

    let err = ledger::create_transaction(&store, income(&wallet, "5.00")).unwrap_err();
    assert!(matches!(err, LedgerError::Storage(_)));
    assert_eq!(transaction_count(&store), 0);
    assert_eq!(queries::wallet(&store, &wallet).unwrap().balance, money("100.00"));
}

#[test]
fn storage_failure_keeps_goal_untouched() {
    let store = Store::open_in_memory().unwrap();
    let wallet = seeded(&store, "100.00");
    let goal = ledger::create_goal(
        &store,
        NewGoal {
            wallet_id: wallet.clone(),
            name: "Trip".into(),
            target_amount: money("50.00"),
            deadline: None,
            color: "#123456".into(),
        },
    )
    .unwrap();
    store
        .read(|c| {
            c.execute_batch(
                "CREATE TEMP TRIGGER fail_balance BEFORE UPDATE OF balance ON wallets
                 BEGIN SELECT RAISE(ABORT, 'simulated disk failure'); END;",
            )?;
            Ok(())
        })
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    let err = ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, money("20.00"), date)
        .unwrap_err();
    assert!(matches!(err, LedgerError::Storage(_)));
    assert_eq!(queries::goal(&store, &goal.id).unwrap().current_amount, Money::ZERO);
    assert_eq!(transaction_count(&store), 0);
}

#[test]
fn concurrent_writers_are_serialized() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let wallet = seeded(&store, "0");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let wallet = wallet.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    ledger::create_transaction(&store, income(&wallet, "1.00")).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(transaction_count(&store), 200);
    assert_eq!(queries::wallet(&store, &wallet).unwrap().balance, money("200.00"));
}

#[test]
fn write_groups_never_overlap() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let busy = Arc::new(AtomicBool::new(false));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let busy = Arc::clone(&busy);
            thread::spawn(move || {
                for _ in 0..10 {
                    store
                        .run_exclusive(|_tx| {
                            assert!(!busy.swap(true, Ordering::SeqCst));
                            thread::sleep(Duration::from_millis(1));
                            busy.store(false, Ordering::SeqCst);
                            Ok(())
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn file_backed_store_persists_commits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");
    let wallet = {
        let store = Store::open(&path).unwrap();
        let wallet = seeded(&store, "1.00");
        ledger::create_transaction(&store, income(&wallet, "2.50")).unwrap();
        wallet
    };

    let store = Store::open(&path).unwrap();
    assert_eq!(queries::wallet(&store, &wallet).unwrap().balance, money("3.50"));
    assert_eq!(transaction_count(&store), 1);
}
