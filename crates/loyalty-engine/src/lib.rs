//! # loyalty-engine
//!
//! Reward computation over a partner hierarchy:
//!
//! - **Active window**: a contract counts for `(year, quarter)` when it
//!   started strictly inside `(first day of the quarter's first month,
//!   expiry_years earlier; last day of the quarter)` and is not terminated by
//!   the end of that window
//! - **Level**: tier from the active-contract count of a partner's whole
//!   subtree
//! - **Reward**: direct contracts started in the quarter times the level
//!   rate, plus a one-time bonus for new `Rabbit` contracts, plus the level
//!   differential earned on each direct child's own contracts
//!
//! The engine holds no state of its own. It borrows a registry and a store
//! and recomputes everything on every call.

#![deny(unsafe_code)]

pub mod engine;
pub mod policy;
pub mod window;

pub use engine::{RewardBreakdown, RewardEngine};
pub use policy::RewardPolicy;
pub use window::ActiveWindow;
