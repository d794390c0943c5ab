// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::money::Money;
use thiserror::Error;

/// Failures surfaced by the ledger core.
///
/// Every mutating operation is all-or-nothing: when one of these is returned
/// from inside the write gateway, nothing the operation touched was persisted.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Invalid input, such as a non-positive amount or an overpayment.
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// A goal withdrawal (or reversal) asked for more than the goal holds.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { available: Money, requested: Money },

    /// The underlying database rejected a read or write.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A stored settings document could not be read or written.
    #[error("settings error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
