//! Contract store

use std::collections::BTreeMap;

use chrono::Datelike;
use loyalty_types::{Contract, ContractId, ContractRecord, Result, RewardError};
use tracing::{debug, warn};

/// Result of a successful [`ContractStore::upsert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new contract was stored
    Inserted,
    /// An open contract received its end date
    Terminated,
}

/// In-memory contract store keyed by contract id.
///
/// A contract id may be seen at most twice: once to create it (with a start
/// date) and once to terminate it (with an end date).
#[derive(Clone, Debug, Default)]
pub struct ContractStore {
    contracts: BTreeMap<ContractId, Contract>,
}

impl ContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new contract or terminate an existing open one.
    pub fn upsert(&mut self, record: ContractRecord) -> Result<UpsertOutcome> {
        if let Some(existing) = self.contracts.get_mut(&record.id) {
            if !existing.matches(&record) {
                return Err(RewardError::ConflictingContract(record.id));
            }
            return match (existing.end_date, record.end_date) {
                (None, Some(end_date)) => {
                    if end_date < existing.start_date {
                        warn!(
                            contract = %record.id,
                            %end_date,
                            start_date = %existing.start_date,
                            "Contract terminated before its start date"
                        );
                    }
                    existing.end_date = Some(end_date);
                    debug!(contract = %record.id, %end_date, "Contract terminated");
                    Ok(UpsertOutcome::Terminated)
                }
                _ => Err(RewardError::DuplicateContract(record.id)),
            };
        }

        let start_date = record
            .start_date
            .ok_or(RewardError::MissingStartDate(record.id))?;

        debug!(
            contract = %record.id,
            partner = %record.partner_id,
            kind = %record.kind,
            %start_date,
            "Contract stored"
        );
        self.contracts.insert(
            record.id,
            Contract {
                id: record.id,
                partner_id: record.partner_id,
                kind: record.kind,
                start_date,
                end_date: record.end_date,
            },
        );
        Ok(UpsertOutcome::Inserted)
    }

    pub fn get(&self, id: ContractId) -> Option<&Contract> {
        self.contracts.get(&id)
    }

    /// Every stored contract in ascending id order.
    pub fn all(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.values()
    }

    /// Earliest and latest start year across the whole store.
    pub fn start_year_range(&self) -> Option<(i32, i32)> {
        let mut years = self.contracts.values().map(|c| c.start_date.year());
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}
