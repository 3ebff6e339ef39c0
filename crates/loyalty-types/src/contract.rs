use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RewardError;
use crate::partner::PartnerId;

/// Contract identifier, the key of the contract store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(pub u64);

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ContractId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Contract type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    /// Earns the one-time new-contract bonus in its start year
    Rabbit,
    /// No bonus
    Tortoise,
}

impl ContractKind {
    pub fn earns_new_contract_bonus(self) -> bool {
        matches!(self, ContractKind::Rabbit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContractKind::Rabbit => "Rabbit",
            ContractKind::Tortoise => "Tortoise",
        }
    }
}

impl std::fmt::Display for ContractKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractKind {
    type Err = RewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Rabbit" => Ok(ContractKind::Rabbit),
            "Tortoise" => Ok(ContractKind::Tortoise),
            other => Err(RewardError::UnknownContractKind(other.to_string())),
        }
    }
}

/// What a contract event does to the contract's dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContractAction {
    /// Sets the start date
    Begin,
    /// Sets the termination date
    End,
}

impl FromStr for ContractAction {
    type Err = RewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BEGIN" => Ok(ContractAction::Begin),
            "END" => Ok(ContractAction::End),
            other => Err(RewardError::UnknownContractAction(other.to_string())),
        }
    }
}

/// An incoming contract, as handed to the contract store.
///
/// A record for a contract id the store has not seen yet must carry a start
/// date; a later record for the same id may only carry the end date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub id: ContractId,
    pub partner_id: PartnerId,
    pub kind: ContractKind,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ContractRecord {
    /// Build a record from a single dated event.
    pub fn from_event(
        id: ContractId,
        partner_id: PartnerId,
        kind: ContractKind,
        date: NaiveDate,
        action: ContractAction,
    ) -> Self {
        let (start_date, end_date) = match action {
            ContractAction::Begin => (Some(date), None),
            ContractAction::End => (None, Some(date)),
        };
        Self {
            id,
            partner_id,
            kind,
            start_date,
            end_date,
        }
    }

    pub fn begin(id: ContractId, partner_id: PartnerId, kind: ContractKind, date: NaiveDate) -> Self {
        Self::from_event(id, partner_id, kind, date, ContractAction::Begin)
    }

    pub fn end(id: ContractId, partner_id: PartnerId, kind: ContractKind, date: NaiveDate) -> Self {
        Self::from_event(id, partner_id, kind, date, ContractAction::End)
    }
}

/// A stored contract.
///
/// `(id, partner_id, kind)` never changes once stored; `end_date` is assigned
/// at most once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub partner_id: PartnerId,
    pub kind: ContractKind,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Contract {
    /// Whether `record` names the same contract (same partner and kind).
    pub fn matches(&self, record: &ContractRecord) -> bool {
        self.id == record.id && self.partner_id == record.partner_id && self.kind == record.kind
    }

    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }
}
