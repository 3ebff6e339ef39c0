//! Loyalty Registry - in-memory partner hierarchy and contract storage
//!
//! - **PartnerRegistry**: partner identities and parent → child links
//! - **ContractStore**: validated contracts keyed by contract id
//! - **RewardBook**: one registry plus one store, owned together
//! - **SharedRewardBook**: a `RewardBook` behind a single-writer lock
//!
//! Nothing here is process-global. Callers own their books and lend them to
//! the reward engine.

#![deny(unsafe_code)]

pub mod book;
pub mod contracts;
pub mod partners;

pub use book::{RewardBook, SharedRewardBook};
pub use contracts::{ContractStore, UpsertOutcome};
pub use partners::{PartnerRegistry, RegistrationPolicy};
