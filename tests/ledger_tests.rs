// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::ledger::{
    self, CategoryEdit, DebtEdit, GoalEdit, NewCategory, NewDebt, NewGoal, NewTransaction,
    TransactionEdit,
};
use pocketbook::models::{CategoryKind, DebtKind, DebtStatus, GoalDirection, GoalStatus, TransactionKind};
use pocketbook::{LedgerError, Money, Session, Store, queries};

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn setup(opening: &str) -> (Store, String) {
    let store = Store::open_in_memory().unwrap();
    let mut session = Session::signed_out();
    let user_id = session
        .sign_in(&store, "Ada", "ada@example.com")
        .unwrap()
        .id
        .clone();
    let wallet = ledger::create_wallet(&store, &user_id, "Checking", money(opening)).unwrap();
    (store, wallet.id)
}

fn balance(store: &Store, wallet_id: &str) -> Money {
    queries::wallet(store, wallet_id).unwrap().balance
}

fn category_id(store: &Store, kind: CategoryKind) -> String {
    queries::categories(store, None, Some(kind), false).unwrap()[0]
        .id
        .clone()
}

fn plain(wallet_id: &str, kind: TransactionKind, amount: &str) -> NewTransaction {
    NewTransaction {
        wallet_id: wallet_id.to_string(),
        kind,
        amount: money(amount),
        category_id: None,
        debt_id: None,
        goal_id: None,
        description: String::new(),
        date: day(1),
    }
}

fn new_debt(wallet_id: &str, kind: DebtKind, amount: &str) -> NewDebt {
    NewDebt {
        wallet_id: wallet_id.to_string(),
        kind,
        title: "Car loan".into(),
        counterparty: "Bank".into(),
        amount: money(amount),
        due_date: Some(day(28)),
    }
}

fn new_goal(wallet_id: &str, target: &str) -> NewGoal {
    NewGoal {
        wallet_id: wallet_id.to_string(),
        name: "Bike".into(),
        target_amount: money(target),
        deadline: None,
        color: "#00FF00".into(),
    }
}

#[test]
fn income_and_expense_move_the_wallet() {
    let (store, wallet) = setup("100.00");
    let food = category_id(&store, CategoryKind::Expense);
    let mut t = plain(&wallet, TransactionKind::Expense, "12.34");
    t.category_id = Some(food.clone());
    t.description = " lunch ".into();
    let created = ledger::create_transaction(&store, t).unwrap();
    assert_eq!(created.description, "lunch");
    assert!(!created.category_name.is_empty());
    assert_eq!(balance(&store, &wallet), money("87.66"));

    ledger::create_transaction(&store, plain(&wallet, TransactionKind::Income, "0.34")).unwrap();
    assert_eq!(balance(&store, &wallet), money("88.00"));
}

#[test]
fn rejects_non_positive_amounts_and_unknown_wallets() {
    let (store, wallet) = setup("10.00");
    let err = ledger::create_transaction(&store, plain(&wallet, TransactionKind::Income, "0"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = ledger::create_transaction(&store, plain("nope", TransactionKind::Income, "1"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { entity: "wallet", .. }));
    assert_eq!(balance(&store, &wallet), money("10.00"));
}

#[test]
fn category_kind_must_match_transaction_kind() {
    let (store, wallet) = setup("0");
    let salary = category_id(&store, CategoryKind::Income);
    let mut t = plain(&wallet, TransactionKind::Expense, "5");
    t.category_id = Some(salary);
    let err = ledger::create_transaction(&store, t).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn edit_amount_adjusts_wallet_once() {
    let (store, wallet) = setup("1000.00");
    let t = ledger::create_transaction(&store, plain(&wallet, TransactionKind::Expense, "50.00"))
        .unwrap();
    assert_eq!(balance(&store, &wallet), money("950.00"));

    let edited = ledger::edit_transaction(
        &store,
        &t.id,
        TransactionEdit {
            amount: Some(money("70.00")),
            description: Some("groceries".into()),
            date: Some(day(2)),
            ..TransactionEdit::default()
        },
    )
    .unwrap();
    assert_eq!(balance(&store, &wallet), money("930.00"));
    assert_eq!(edited.amount, money("70.00"));
    assert_eq!(edited.description, "groceries");
    assert_eq!(edited.date, day(2));

    // an edit that keeps the amount leaves the wallet alone
    ledger::edit_transaction(
        &store,
        &t.id,
        TransactionEdit {
            description: Some("weekly groceries".into()),
            ..TransactionEdit::default()
        },
    )
    .unwrap();
    assert_eq!(balance(&store, &wallet), money("930.00"));
}

#[test]
fn edit_category_refreshes_snapshot() {
    let (store, wallet) = setup("0");
    let expenses = queries::categories(&store, None, Some(CategoryKind::Expense), false).unwrap();
    let mut t = plain(&wallet, TransactionKind::Expense, "5");
    t.category_id = Some(expenses[0].id.clone());
    let t = ledger::create_transaction(&store, t).unwrap();

    let edited = ledger::edit_transaction(
        &store,
        &t.id,
        TransactionEdit {
            category_id: Some(expenses[1].id.clone()),
            ..TransactionEdit::default()
        },
    )
    .unwrap();
    assert_eq!(edited.category_id.as_deref(), Some(expenses[1].id.as_str()));
    assert_eq!(edited.category_name, expenses[1].name);
}

#[test]
fn balance_is_conserved_across_create_edit_delete() {
    let (store, wallet) = setup("250.00");
    let a = ledger::create_transaction(&store, plain(&wallet, TransactionKind::Income, "100.10"))
        .unwrap();
    let b = ledger::create_transaction(&store, plain(&wallet, TransactionKind::Expense, "33.33"))
        .unwrap();
    let c = ledger::create_transaction(&store, plain(&wallet, TransactionKind::Expense, "0.01"))
        .unwrap();
    ledger::edit_transaction(
        &store,
        &b.id,
        TransactionEdit {
            amount: Some(money("40.00")),
            ..TransactionEdit::default()
        },
    )
    .unwrap();
    ledger::delete_transaction(&store, &a.id).unwrap();
    ledger::edit_transaction(
        &store,
        &c.id,
        TransactionEdit {
            amount: Some(money("0.02")),
            ..TransactionEdit::default()
        },
    )
    .unwrap();

    let remaining = queries::transactions(
        &store,
        &queries::TransactionFilter {
            wallet_id: Some(wallet.clone()),
            ..Default::default()
        },
    )
    .unwrap();
    let effects: Money = remaining.iter().map(|t| t.signed_effect()).sum();
    assert_eq!(balance(&store, &wallet), money("250.00") + effects);
    assert_eq!(balance(&store, &wallet), money("209.98"));
}

#[test]
fn debt_overpayment_is_rejected() {
    let (store, wallet) = setup("500.00");
    let debt = ledger::create_debt(&store, new_debt(&wallet, DebtKind::Payable, "100.00")).unwrap();
    ledger::pay_debt(&store, &debt.id, money("80.00"), day(3)).unwrap();

    let err = ledger::pay_debt(&store, &debt.id, money("25.00"), day(4)).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(err.to_string().contains("exceeds remaining balance"));

    let debt = queries::debt(&store, &debt.id).unwrap();
    assert_eq!(debt.total_paid, money("80.00"));
    assert_eq!(debt.status(), DebtStatus::PartiallyPaid);
    assert_eq!(balance(&store, &wallet), money("420.00"));
}

#[test]
fn paying_a_debt_in_full_marks_it_paid_and_deleting_reopens_it() {
    let (store, wallet) = setup("500.00");
    let debt = ledger::create_debt(&store, new_debt(&wallet, DebtKind::Payable, "100.00")).unwrap();
    ledger::pay_debt(&store, &debt.id, money("60.00"), day(3)).unwrap();
    let last = ledger::pay_debt(&store, &debt.id, money("40.00"), day(4)).unwrap();
    assert_eq!(last.kind, TransactionKind::Expense);
    assert_eq!(last.debt_id.as_deref(), Some(debt.id.as_str()));

    let paid = queries::debt(&store, &debt.id).unwrap();
    assert!(paid.is_paid);
    assert!(paid.paid_at.is_some());
    assert_eq!(paid.status(), DebtStatus::Paid);
    assert_eq!(balance(&store, &wallet), money("400.00"));

    ledger::delete_transaction(&store, &last.id).unwrap();
    let reopened = queries::debt(&store, &debt.id).unwrap();
    assert!(!reopened.is_paid);
    assert!(reopened.paid_at.is_none());
    assert_eq!(reopened.total_paid, money("60.00"));
    assert_eq!(balance(&store, &wallet), money("440.00"));
}

#[test]
fn receivable_collections_are_income() {
    let (store, wallet) = setup("0");
    let debt =
        ledger::create_debt(&store, new_debt(&wallet, DebtKind::Receivable, "30.00")).unwrap();
    let t = ledger::pay_debt(&store, &debt.id, money("30.00"), day(5)).unwrap();
    assert_eq!(t.kind, TransactionKind::Income);
    assert_eq!(balance(&store, &wallet), money("30.00"));
    assert!(queries::debt(&store, &debt.id).unwrap().is_paid);
}

#[test]
fn debt_bounds_hold_under_linked_edits() {
    let (store, wallet) = setup("500.00");
    let debt = ledger::create_debt(&store, new_debt(&wallet, DebtKind::Payable, "100.00")).unwrap();
    let t = ledger::pay_debt(&store, &debt.id, money("50.00"), day(3)).unwrap();

    let err = ledger::edit_transaction(
        &store,
        &t.id,
        TransactionEdit {
            amount: Some(money("120.00")),
            ..TransactionEdit::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(queries::debt(&store, &debt.id).unwrap().total_paid, money("50.00"));
    assert_eq!(balance(&store, &wallet), money("450.00"));

    let edited = ledger::edit_transaction(
        &store,
        &t.id,
        TransactionEdit {
            amount: Some(money("100.00")),
            description: Some("renamed".into()),
            ..TransactionEdit::default()
        },
    )
    .unwrap();
    assert_ne!(edited.description, "renamed");
    let debt = queries::debt(&store, &debt.id).unwrap();
    assert_eq!(debt.total_paid, money("100.00"));
    assert!(debt.is_paid);
    assert_eq!(balance(&store, &wallet), money("400.00"));
}

#[test]
fn debt_amount_cannot_drop_below_paid() {
    let (store, wallet) = setup("500.00");
    let debt = ledger::create_debt(&store, new_debt(&wallet, DebtKind::Payable, "100.00")).unwrap();
    ledger::pay_debt(&store, &debt.id, money("80.00"), day(3)).unwrap();

    let err = ledger::update_debt(
        &store,
        &debt.id,
        DebtEdit {
            amount: Some(money("50.00")),
            ..DebtEdit::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let updated = ledger::update_debt(
        &store,
        &debt.id,
        DebtEdit {
            amount: Some(money("80.00")),
            title: Some("Scooter loan".into()),
            ..DebtEdit::default()
        },
    )
    .unwrap();
    assert!(updated.is_paid);
    assert_eq!(updated.title, "Scooter loan");
}

#[test]
fn deleting_a_debt_reverses_its_payments() {
    let (store, wallet) = setup("500.00");
    let debt = ledger::create_debt(&store, new_debt(&wallet, DebtKind::Payable, "100.00")).unwrap();
    ledger::pay_debt(&store, &debt.id, money("30.00"), day(3)).unwrap();
    ledger::pay_debt(&store, &debt.id, money("20.00"), day(4)).unwrap();
    assert_eq!(balance(&store, &wallet), money("450.00"));

    ledger::delete_debt(&store, &debt.id).unwrap();
    assert_eq!(balance(&store, &wallet), money("500.00"));
    assert!(queries::debt_payments(&store, &debt.id).unwrap().is_empty());
    assert!(matches!(
        queries::debt(&store, &debt.id),
        Err(LedgerError::NotFound { .. })
    ));
}

#[test]
fn goal_deposit_withdraw_round_trip() {
    let (store, wallet) = setup("500.00");
    let goal = ledger::create_goal(&store, new_goal(&wallet, "200.00")).unwrap();

    let dep = ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, money("150.00"), day(1))
        .unwrap();
    assert_eq!(dep.kind, TransactionKind::Expense);
    assert_eq!(balance(&store, &wallet), money("350.00"));
    assert_eq!(queries::goal(&store, &goal.id).unwrap().current_amount, money("150.00"));

    let wd = ledger::move_goal_funds(&store, &goal.id, GoalDirection::Withdraw, money("150.00"), day(2))
        .unwrap();
    assert_eq!(wd.kind, TransactionKind::Income);
    assert_eq!(balance(&store, &wallet), money("500.00"));
    assert_eq!(queries::goal(&store, &goal.id).unwrap().current_amount, Money::ZERO);
}

#[test]
fn goal_moves_conserve_wallet_plus_goal() {
    let (store, wallet) = setup("300.00");
    let goal = ledger::create_goal(&store, new_goal(&wallet, "100.00")).unwrap();
    let total = |store: &Store| {
        balance(store, &wallet) + queries::goal(store, &goal.id).unwrap().current_amount
    };
    let before = total(&store);
    for (dir, amt) in [
        (GoalDirection::Deposit, "60.00"),
        (GoalDirection::Deposit, "45.55"),
        (GoalDirection::Withdraw, "5.55"),
        (GoalDirection::Deposit, "0.01"),
    ] {
        ledger::move_goal_funds(&store, &goal.id, dir, money(amt), day(1)).unwrap();
        assert_eq!(total(&store), before);
    }
}

#[test]
fn goal_completion_can_move_back() {
    let (store, wallet) = setup("300.00");
    let goal = ledger::create_goal(&store, new_goal(&wallet, "100.00")).unwrap();
    ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, money("100.00"), day(1))
        .unwrap();
    let g = queries::goal(&store, &goal.id).unwrap();
    assert!(g.is_completed);
    assert_eq!(g.status(), GoalStatus::Completed);
    assert_eq!(g.progress_percent(), 100);

    ledger::move_goal_funds(&store, &goal.id, GoalDirection::Withdraw, money("0.01"), day(2))
        .unwrap();
    let g = queries::goal(&store, &goal.id).unwrap();
    assert!(!g.is_completed);
    assert_eq!(g.status(), GoalStatus::InProgress);
}

#[test]
fn goal_withdrawal_beyond_saved_amount_fails() {
    let (store, wallet) = setup("300.00");
    let goal = ledger::create_goal(&store, new_goal(&wallet, "100.00")).unwrap();
    ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, money("40.00"), day(1))
        .unwrap();
    let err = ledger::move_goal_funds(&store, &goal.id, GoalDirection::Withdraw, money("40.01"), day(2))
        .unwrap_err();
    match err {
        LedgerError::InsufficientFunds {
            available,
            requested,
        } => {
            assert_eq!(available, money("40.00"));
            assert_eq!(requested, money("40.01"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(balance(&store, &wallet), money("260.00"));
    assert_eq!(goal_movements_len(&store, &goal.id), 1);
}

fn goal_movements_len(store: &Store, goal_id: &str) -> usize {
    queries::goal_movements(store, goal_id).unwrap().len()
}

#[test]
fn goal_linked_transactions_created_directly() {
    let (store, wallet) = setup("100.00");
    let goal = ledger::create_goal(&store, new_goal(&wallet, "50.00")).unwrap();
    let mut t = plain(&wallet, TransactionKind::Expense, "20.00");
    t.goal_id = Some(goal.id.clone());
    let t = ledger::create_transaction(&store, t).unwrap();
    assert!(t.is_linked());
    assert_eq!(t.category_name, "Goals");
    assert_eq!(queries::goal(&store, &goal.id).unwrap().current_amount, money("20.00"));
    assert_eq!(balance(&store, &wallet), money("80.00"));
}

#[test]
fn deleting_a_spent_deposit_is_refused() {
    let (store, wallet) = setup("100.00");
    let goal = ledger::create_goal(&store, new_goal(&wallet, "50.00")).unwrap();
    let dep = ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, money("30.00"), day(1))
        .unwrap();
    ledger::move_goal_funds(&store, &goal.id, GoalDirection::Withdraw, money("20.00"), day(2))
        .unwrap();

    let err = ledger::delete_transaction(&store, &dep.id).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(balance(&store, &wallet), money("90.00"));
    assert_eq!(queries::goal(&store, &goal.id).unwrap().current_amount, money("10.00"));
}

#[test]
fn linked_goal_edit_moves_goal_and_keeps_description() {
    let (store, wallet) = setup("100.00");
    let goal = ledger::create_goal(&store, new_goal(&wallet, "50.00")).unwrap();
    let dep = ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, money("30.00"), day(1))
        .unwrap();
    let edited = ledger::edit_transaction(
        &store,
        &dep.id,
        TransactionEdit {
            amount: Some(money("45.00")),
            description: Some("something else".into()),
            ..TransactionEdit::default()
        },
    )
    .unwrap();
    assert_eq!(edited.description, dep.description);
    assert_eq!(edited.category_name, dep.category_name);
    assert_eq!(queries::goal(&store, &goal.id).unwrap().current_amount, money("45.00"));
    assert_eq!(balance(&store, &wallet), money("55.00"));
}

#[test]
fn delete_then_recreate_restores_state() {
    let (store, wallet) = setup("500.00");
    let debt = ledger::create_debt(&store, new_debt(&wallet, DebtKind::Payable, "100.00")).unwrap();
    let goal = ledger::create_goal(&store, new_goal(&wallet, "200.00")).unwrap();
    let pay = ledger::pay_debt(&store, &debt.id, money("33.33"), day(3)).unwrap();
    let dep = ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, money("66.67"), day(3))
        .unwrap();
    let spend = ledger::create_transaction(&store, plain(&wallet, TransactionKind::Expense, "12.50"))
        .unwrap();

    let snapshot = |store: &Store| {
        (
            balance(store, &wallet),
            queries::debt(store, &debt.id).unwrap().total_paid,
            queries::goal(store, &goal.id).unwrap().current_amount,
        )
    };
    let before = snapshot(&store);

    for t in [&pay, &dep, &spend] {
        ledger::delete_transaction(&store, &t.id).unwrap();
        ledger::create_transaction(
            &store,
            NewTransaction {
                wallet_id: t.wallet_id.clone(),
                kind: t.kind,
                amount: t.amount,
                category_id: None,
                debt_id: t.debt_id.clone(),
                goal_id: t.goal_id.clone(),
                description: t.description.clone(),
                date: t.date,
            },
        )
        .unwrap();
        assert_eq!(snapshot(&store), before);
    }
}

#[test]
fn deleting_a_goal_returns_its_savings() {
    let (store, wallet) = setup("100.00");
    let goal = ledger::create_goal(&store, new_goal(&wallet, "80.00")).unwrap();
    ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, money("50.00"), day(1))
        .unwrap();
    ledger::move_goal_funds(&store, &goal.id, GoalDirection::Withdraw, money("10.00"), day(2))
        .unwrap();
    assert_eq!(balance(&store, &wallet), money("60.00"));

    ledger::delete_goal(&store, &goal.id).unwrap();
    assert_eq!(balance(&store, &wallet), money("100.00"));
    assert!(queries::goal_movements(&store, &goal.id).unwrap().is_empty());
}

#[test]
fn update_goal_recomputes_completion() {
    let (store, wallet) = setup("100.00");
    let goal = ledger::create_goal(&store, new_goal(&wallet, "80.00")).unwrap();
    ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, money("50.00"), day(1))
        .unwrap();
    let g = ledger::update_goal(
        &store,
        &goal.id,
        GoalEdit {
            target_amount: Some(money("50.00")),
            ..GoalEdit::default()
        },
    )
    .unwrap();
    assert!(g.is_completed);
}

#[test]
fn linking_to_both_debt_and_goal_is_invalid() {
    let (store, wallet) = setup("100.00");
    let mut t = plain(&wallet, TransactionKind::Expense, "1.00");
    t.debt_id = Some("d".into());
    t.goal_id = Some("g".into());
    assert!(matches!(
        ledger::create_transaction(&store, t),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn archived_wallets_refuse_new_transactions() {
    let (store, wallet) = setup("100.00");
    ledger::set_wallet_archived(&store, &wallet, true).unwrap();
    let err = ledger::create_transaction(&store, plain(&wallet, TransactionKind::Income, "1"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    ledger::set_wallet_archived(&store, &wallet, false).unwrap();
    ledger::create_transaction(&store, plain(&wallet, TransactionKind::Income, "1")).unwrap();
}

#[test]
fn deleting_a_wallet_cascades() {
    let (store, wallet) = setup("100.00");
    let debt = ledger::create_debt(&store, new_debt(&wallet, DebtKind::Payable, "10.00")).unwrap();
    let goal = ledger::create_goal(&store, new_goal(&wallet, "10.00")).unwrap();
    let t = ledger::create_transaction(&store, plain(&wallet, TransactionKind::Income, "1"))
        .unwrap();

    ledger::delete_wallet(&store, &wallet).unwrap();
    assert!(matches!(queries::wallet(&store, &wallet), Err(LedgerError::NotFound { .. })));
    assert!(matches!(queries::debt(&store, &debt.id), Err(LedgerError::NotFound { .. })));
    assert!(matches!(queries::goal(&store, &goal.id), Err(LedgerError::NotFound { .. })));
    assert!(matches!(
        queries::transaction(&store, &t.id),
        Err(LedgerError::NotFound { .. })
    ));
}

#[test]
fn built_in_categories_are_read_only() {
    let (store, _wallet) = setup("0");
    let global = category_id(&store, CategoryKind::Expense);
    let err = ledger::set_category_archived(&store, &global, true).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn renaming_a_category_keeps_old_snapshots() {
    let (store, wallet) = setup("0");
    let owner = queries::wallet(&store, &wallet).unwrap().user_id;
    let pets = ledger::create_category(
        &store,
        NewCategory {
            user_id: owner,
            name: "Pets".into(),
            icon: "paw".into(),
            kind: CategoryKind::Expense,
            color: "#795548".into(),
        },
    )
    .unwrap();
    let mut t = plain(&wallet, TransactionKind::Expense, "9.99");
    t.category_id = Some(pets.id.clone());
    let t = ledger::create_transaction(&store, t).unwrap();

    let renamed = ledger::update_category(
        &store,
        &pets.id,
        CategoryEdit {
            name: Some("Animals".into()),
            ..CategoryEdit::default()
        },
    )
    .unwrap();
    assert_eq!(renamed.name, "Animals");
    assert_eq!(renamed.icon, "paw");
    assert_eq!(queries::transaction(&store, &t.id).unwrap().category_name, "Pets");

    let err = ledger::update_category(
        &store,
        &pets.id,
        CategoryEdit {
            name: Some(" ".into()),
            ..CategoryEdit::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn rename_wallet_trims_and_rejects_blank() {
    let (store, wallet) = setup("0");
    let w = ledger::rename_wallet(&store, &wallet, "  Travel ").unwrap();
    assert_eq!(w.name, "Travel");
    assert!(matches!(
        ledger::rename_wallet(&store, &wallet, ""),
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        ledger::rename_wallet(&store, "missing", "X"),
        Err(LedgerError::NotFound { .. })
    ));
}

#[test]
fn wallet_overflow_is_refused_and_wallet_stays_readable() {
    let store = Store::open_in_memory().unwrap();
    let mut session = Session::signed_out();
    let user_id = session
        .sign_in(&store, "Ada", "ada@example.com")
        .unwrap()
        .id
        .clone();
    let near_max = Money::from_cents(i64::MAX - 50);
    let wallet = ledger::create_wallet(&store, &user_id, "Vault", near_max).unwrap();

    let err = ledger::create_transaction(&store, plain(&wallet.id, TransactionKind::Income, "1.00"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(balance(&store, &wallet.id), near_max);
    assert!(queries::transactions(
        &store,
        &queries::TransactionFilter {
            wallet_id: Some(wallet.id.clone()),
            ..Default::default()
        }
    )
    .unwrap()
    .is_empty());
}

#[test]
fn goal_overflow_is_refused() {
    let (store, wallet) = setup("0");
    let goal = ledger::create_goal(&store, new_goal(&wallet, "100.00")).unwrap();
    let huge = Money::from_cents(i64::MAX - 10);
    ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, huge, day(1)).unwrap();
    let wallet_before = balance(&store, &wallet);

    let err = ledger::move_goal_funds(&store, &goal.id, GoalDirection::Deposit, money("1.00"), day(2))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(queries::goal(&store, &goal.id).unwrap().current_amount, huge);
    assert_eq!(balance(&store, &wallet), wallet_before);
    assert_eq!(queries::goal_movements(&store, &goal.id).unwrap().len(), 1);
}
