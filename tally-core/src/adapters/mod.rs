//! Adapters - concrete implementations of ports

pub mod memory;
pub mod notify;

pub use memory::InMemoryAccountStore;
pub use notify::{LogNotifier, SilentNotifier};
