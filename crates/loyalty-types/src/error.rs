//! Error taxonomy shared by the registry, engine and ingestion crates.

use thiserror::Error;

use crate::contract::ContractId;
use crate::partner::PartnerId;

/// Errors raised by loyalty operations.
///
/// Every operation fails fast: when one of these is returned the registry and
/// the contract store are exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    // --- Not found ---
    #[error("partner not found: {0}")]
    PartnerNotFound(PartnerId),

    #[error("parent partner not found: {0}")]
    ParentNotFound(PartnerId),

    // --- Validation ---
    #[error("partner already registered: {0}")]
    PartnerAlreadyRegistered(PartnerId),

    #[error("new contract must have a start date: {0}")]
    MissingStartDate(ContractId),

    #[error("duplicate contract id with conflicting data: {0}")]
    ConflictingContract(ContractId),

    #[error("duplicate contract id: {0}")]
    DuplicateContract(ContractId),

    #[error("unknown contract type '{0}'")]
    UnknownContractKind(String),

    #[error("unknown contract action '{0}'")]
    UnknownContractAction(String),

    #[error("invalid record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    // --- Configuration ---
    #[error("invalid year {0}: must be within [{min}, {max}]", min = crate::MIN_YEAR, max = crate::MAX_YEAR)]
    InvalidYear(i32),

    #[error("invalid quarter {0}: must be within [1, 4]")]
    InvalidQuarter(u32),

    #[error("invalid reward policy: {0}")]
    InvalidPolicy(String),

    // --- I/O ---
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
}

/// Broad classification of a [`RewardError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown partner referenced as subject or as parent
    NotFound,
    /// Malformed or conflicting input
    Validation,
    /// Out-of-range period or policy settings
    Configuration,
    /// Underlying read failure
    Io,
}

impl RewardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PartnerNotFound(_) | Self::ParentNotFound(_) => ErrorKind::NotFound,
            Self::PartnerAlreadyRegistered(_)
            | Self::MissingStartDate(_)
            | Self::ConflictingContract(_)
            | Self::DuplicateContract(_)
            | Self::UnknownContractKind(_)
            | Self::UnknownContractAction(_)
            | Self::MalformedRecord { .. } => ErrorKind::Validation,
            Self::InvalidYear(_) | Self::InvalidQuarter(_) | Self::InvalidPolicy(_) => {
                ErrorKind::Configuration
            }
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for loyalty operations
pub type Result<T> = std::result::Result<T, RewardError>;
