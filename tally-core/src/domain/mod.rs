//! Core domain entities
//!
//! Accounts, transfer requests and the locking discipline that guards
//! balance mutation. No I/O happens here.

mod account;
mod lock;
mod transfer;
pub mod result;

pub use account::{Account, AccountId, AccountRecord};
pub(crate) use lock::lock_pair;
pub use transfer::{validate_amount, AccountRole, TransferReceipt, TransferRequest};
