// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::money::Money;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enums stored as their lowercase name in TEXT columns.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    )),
                }
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: String| FromSqlError::Other(e.into()))
            }
        }
    };
}

text_enum!(TransactionKind {
    Income => "income",
    Expense => "expense",
});

text_enum!(CategoryKind {
    Income => "income",
    Expense => "expense",
    Debts => "debts",
    Goals => "goals",
});

text_enum!(DebtKind {
    Payable => "payable",
    Receivable => "receivable",
});

impl TransactionKind {
    /// Signed wallet effect of `amount` moving in this direction.
    pub fn signed(self, amount: Money) -> Money {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }
}

impl DebtKind {
    /// Paying what the user owes spends money; collecting what is owed earns it.
    pub fn payment_kind(self) -> TransactionKind {
        match self {
            DebtKind::Payable => TransactionKind::Expense,
            DebtKind::Receivable => TransactionKind::Income,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalDirection {
    Deposit,
    Withdraw,
}

impl GoalDirection {
    /// Deposits leave the wallet (expense); withdrawals come back (income).
    pub fn transaction_kind(self) -> TransactionKind {
        match self {
            GoalDirection::Deposit => TransactionKind::Expense,
            GoalDirection::Withdraw => TransactionKind::Income,
        }
    }

    pub fn from_transaction_kind(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Expense => GoalDirection::Deposit,
            TransactionKind::Income => GoalDirection::Withdraw,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_wallet: Option<String>,
    #[serde(default)]
    pub hide_values: bool,
    /// Keys this build does not know about are carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub settings: UserSettings,
    pub is_guest: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub(crate) const COLUMNS: &'static str =
        "id, name, email, avatar, settings, is_guest, created_at, updated_at";

    pub(crate) fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        let raw: String = r.get(4)?;
        let settings = serde_json::from_str(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
        Ok(User {
            id: r.get(0)?,
            name: r.get(1)?,
            email: r.get(2)?,
            avatar: r.get(3)?,
            settings,
            is_guest: r.get(5)?,
            created_at: r.get(6)?,
            updated_at: r.get(7)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub balance: Money,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub(crate) const COLUMNS: &'static str =
        "id, user_id, name, balance, archived, created_at, updated_at";

    pub(crate) fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Wallet {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
            balance: r.get(3)?,
            archived: r.get(4)?,
            created_at: r.get(5)?,
            updated_at: r.get(6)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    /// `None` for the global starter categories.
    pub user_id: Option<String>,
    pub name: String,
    pub icon: String,
    pub kind: CategoryKind,
    pub color: String,
    pub archived: bool,
}

impl Category {
    pub(crate) const COLUMNS: &'static str = "id, user_id, name, icon, kind, color, archived";

    pub(crate) fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Category {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
            icon: r.get(3)?,
            kind: r.get(4)?,
            color: r.get(5)?,
            archived: r.get(6)?,
        })
    }

    pub fn is_global(&self) -> bool {
        self.user_id.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DebtStatus {
    Open,
    PartiallyPaid,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    pub wallet_id: String,
    pub kind: DebtKind,
    pub title: String,
    pub counterparty: String,
    pub amount: Money,
    pub total_paid: Money,
    pub due_date: Option<NaiveDate>,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debt {
    pub(crate) const COLUMNS: &'static str = "id, wallet_id, kind, title, counterparty, amount, \
         total_paid, due_date, is_paid, paid_at, created_at, updated_at";

    pub(crate) fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Debt {
            id: r.get(0)?,
            wallet_id: r.get(1)?,
            kind: r.get(2)?,
            title: r.get(3)?,
            counterparty: r.get(4)?,
            amount: r.get(5)?,
            total_paid: r.get(6)?,
            due_date: r.get(7)?,
            is_paid: r.get(8)?,
            paid_at: r.get(9)?,
            created_at: r.get(10)?,
            updated_at: r.get(11)?,
        })
    }

    pub fn remaining(&self) -> Money {
        self.amount - self.total_paid
    }

    pub fn status(&self) -> DebtStatus {
        if self.total_paid >= self.amount {
            DebtStatus::Paid
        } else if self.total_paid.is_positive() {
            DebtStatus::PartiallyPaid
        } else {
            DebtStatus::Open
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GoalStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub wallet_id: String,
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    pub deadline: Option<NaiveDate>,
    pub is_completed: bool,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub(crate) const COLUMNS: &'static str = "id, wallet_id, name, target_amount, current_amount, \
         deadline, is_completed, color, created_at, updated_at";

    pub(crate) fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Goal {
            id: r.get(0)?,
            wallet_id: r.get(1)?,
            name: r.get(2)?,
            target_amount: r.get(3)?,
            current_amount: r.get(4)?,
            deadline: r.get(5)?,
            is_completed: r.get(6)?,
            color: r.get(7)?,
            created_at: r.get(8)?,
            updated_at: r.get(9)?,
        })
    }

    pub fn remaining(&self) -> Money {
        (self.target_amount - self.current_amount).max(Money::ZERO)
    }

    pub fn progress_percent(&self) -> u8 {
        self.current_amount.percent_of(self.target_amount)
    }

    pub fn status(&self) -> GoalStatus {
        if self.current_amount >= self.target_amount {
            GoalStatus::Completed
        } else {
            GoalStatus::InProgress
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub wallet_id: String,
    pub category_id: Option<String>,
    pub debt_id: Option<String>,
    pub goal_id: Option<String>,
    pub kind: TransactionKind,
    pub amount: Money,
    pub description: String,
    /// Snapshot of the category at the time of writing.
    pub category_name: String,
    pub category_icon: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub(crate) const COLUMNS: &'static str = "id, user_id, wallet_id, category_id, debt_id, \
         goal_id, kind, amount, description, category_name, category_icon, date, created_at, \
         updated_at";

    pub(crate) fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Transaction {
            id: r.get(0)?,
            user_id: r.get(1)?,
            wallet_id: r.get(2)?,
            category_id: r.get(3)?,
            debt_id: r.get(4)?,
            goal_id: r.get(5)?,
            kind: r.get(6)?,
            amount: r.get(7)?,
            description: r.get(8)?,
            category_name: r.get(9)?,
            category_icon: r.get(10)?,
            date: r.get(11)?,
            created_at: r.get(12)?,
            updated_at: r.get(13)?,
        })
    }

    pub fn signed_effect(&self) -> Money {
        self.kind.signed(self.amount)
    }

    /// Linked transactions belong to a debt or a goal; their description and
    /// category are owned by that record.
    pub fn is_linked(&self) -> bool {
        self.debt_id.is_some() || self.goal_id.is_some()
    }
}
