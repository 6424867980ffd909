//! # Repositories
//!
//! One repository per collection. Each holds a pool handle plus the
//! collection's change feed, and notifies the feed after every successful
//! write so live listeners re-fetch.

pub mod inventory;
pub mod ledger;

pub use inventory::InventoryRepository;
pub use ledger::LedgerRepository;
