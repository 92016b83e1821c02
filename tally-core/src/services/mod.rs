//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case.

mod accounts;
mod transfer;

pub use accounts::AccountsService;
pub use transfer::TransferService;
