//! # loyalty-types
//!
//! Shared domain model for the partner loyalty rewards workspace:
//!
//! - **Partner**: a node in the reward hierarchy, linked to its children by id
//! - **Contract**: a dated agreement owned by exactly one partner
//! - **RewardLevel**: tier derived from an active-contract count
//! - **ReportingPeriod**: a validated `(year, quarter)` pair
//!
//! Errors for every crate in the workspace are expressed as [`RewardError`],
//! which classifies itself into an [`ErrorKind`] (not found, validation,
//! configuration, I/O).

#![deny(unsafe_code)]

pub mod contract;
pub mod error;
pub mod level;
pub mod partner;
pub mod period;

pub use contract::{Contract, ContractAction, ContractId, ContractKind, ContractRecord};
pub use error::{ErrorKind, Result, RewardError};
pub use level::RewardLevel;
pub use partner::{Partner, PartnerId};
pub use period::{quarter_of, QuarterReward, ReportingPeriod, MAX_YEAR, MIN_YEAR};
