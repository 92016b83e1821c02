//! Result and error types for the core library

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AccountId, AccountRole};

/// Core library error type
///
/// Every transfer rejection is detected before any balance is written, so
/// receiving one of these never implies a partial mutation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transfer amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("Cannot transfer from account {0} to itself")]
    SameAccount(AccountId),

    #[error("{role} account not found with accountId : {account_id}")]
    AccountNotFound {
        role: AccountRole,
        account_id: AccountId,
    },

    #[error("Insufficient funds in account {account_id}")]
    InsufficientFunds { account_id: AccountId },

    #[error("Balance of account {account_id} would overflow")]
    BalanceOverflow { account_id: AccountId },

    #[error("Account id {0} already exists")]
    DuplicateAccount(AccountId),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl Error {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a lock poisoned error
    pub fn lock_poisoned(msg: impl Into<String>) -> Self {
        Self::LockPoisoned(msg.into())
    }

    /// Stable machine-readable code, used in JSON output
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidAmount(_) => "invalid_amount",
            Error::SameAccount(_) => "same_account",
            Error::AccountNotFound { .. } => "account_not_found",
            Error::InsufficientFunds { .. } => "insufficient_funds",
            Error::BalanceOverflow { .. } => "balance_overflow",
            Error::DuplicateAccount(_) => "duplicate_account",
            Error::NotFound(_) => "not_found",
            Error::Validation(_) => "validation",
            Error::LockPoisoned(_) => "lock_poisoned",
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result with context
    pub fn fail_with_context(
        error: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: Some(context),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                let mut context = HashMap::new();
                context.insert("code".to_string(), serde_json::Value::from(e.code()));
                Self::fail_with_context(e.to_string(), context)
            }
        }
    }
}
