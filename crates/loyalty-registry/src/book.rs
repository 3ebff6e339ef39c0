//! Owned and shared reward books

use std::sync::Arc;

use loyalty_types::{ContractRecord, PartnerId, Result, RewardError};
use parking_lot::RwLock;

use crate::contracts::{ContractStore, UpsertOutcome};
use crate::partners::{PartnerRegistry, RegistrationPolicy};

/// A partner registry and a contract store, owned together.
#[derive(Clone, Debug, Default)]
pub struct RewardBook {
    partners: PartnerRegistry,
    contracts: ContractStore,
}

impl RewardBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RegistrationPolicy) -> Self {
        Self {
            partners: PartnerRegistry::with_policy(policy),
            contracts: ContractStore::new(),
        }
    }

    pub fn register(&mut self, id: PartnerId, parent: Option<PartnerId>) -> Result<()> {
        self.partners.register(id, parent)
    }

    /// Store a contract record after checking that its partner is registered.
    pub fn upsert(&mut self, record: ContractRecord) -> Result<UpsertOutcome> {
        if !self.partners.exists(record.partner_id) {
            return Err(RewardError::PartnerNotFound(record.partner_id));
        }
        self.contracts.upsert(record)
    }

    pub fn partners(&self) -> &PartnerRegistry {
        &self.partners
    }

    pub fn contracts(&self) -> &ContractStore {
        &self.contracts
    }

    /// Swap in a fully validated store, returning the previous one.
    pub fn replace_contracts(&mut self, contracts: ContractStore) -> ContractStore {
        std::mem::replace(&mut self.contracts, contracts)
    }
}

/// A [`RewardBook`] that can be shared across threads.
///
/// Mutations take the write lock, so registrations and loads are serialized;
/// queries take the read lock and may run concurrently.
#[derive(Clone, Debug, Default)]
pub struct SharedRewardBook {
    inner: Arc<RwLock<RewardBook>>,
}

impl SharedRewardBook {
    pub fn new(book: RewardBook) -> Self {
        Self {
            inner: Arc::new(RwLock::new(book)),
        }
    }

    pub fn register(&self, id: PartnerId, parent: Option<PartnerId>) -> Result<()> {
        self.inner.write().register(id, parent)
    }

    pub fn upsert(&self, record: ContractRecord) -> Result<UpsertOutcome> {
        self.inner.write().upsert(record)
    }

    /// Run `f` with exclusive access, e.g. for a batch load.
    pub fn write<T>(&self, f: impl FnOnce(&mut RewardBook) -> T) -> T {
        f(&mut self.inner.write())
    }

    /// Run `f` with shared access, e.g. for reward queries.
    pub fn read<T>(&self, f: impl FnOnce(&RewardBook) -> T) -> T {
        f(&self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use loyalty_types::{ContractId, ContractKind};
    use std::thread;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn upsert_requires_registered_partner() {
        let mut book = RewardBook::new();
        let record = ContractRecord::begin(
            ContractId(1),
            PartnerId(9),
            ContractKind::Rabbit,
            date(2010, 1, 2),
        );

        assert_eq!(
            book.upsert(record.clone()).unwrap_err(),
            RewardError::PartnerNotFound(PartnerId(9))
        );
        assert!(book.contracts().is_empty());

        book.register(PartnerId(9), None).unwrap();
        assert_eq!(book.upsert(record).unwrap(), UpsertOutcome::Inserted);
    }

    #[test]
    fn replace_contracts_swaps_store() {
        let mut book = RewardBook::new();
        book.register(PartnerId(1), None).unwrap();
        let mut staged = book.contracts().clone();
        staged
            .upsert(ContractRecord::begin(
                ContractId(1),
                PartnerId(1),
                ContractKind::Tortoise,
                date(2010, 1, 2),
            ))
            .unwrap();

        let previous = book.replace_contracts(staged);
        assert!(previous.is_empty());
        assert_eq!(book.contracts().len(), 1);
    }

    #[test]
    fn shared_book_serializes_concurrent_writers() {
        let shared = SharedRewardBook::new(RewardBook::new());
        shared.register(PartnerId(1), None).unwrap();

        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25u64 {
                        let id = t * 100 + i + 2;
                        shared.register(PartnerId(id), Some(PartnerId(1))).unwrap();
                        shared
                            .upsert(ContractRecord::begin(
                                ContractId(id),
                                PartnerId(id),
                                ContractKind::Rabbit,
                                date(2010, 1, 2),
                            ))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.read(|book| {
            assert_eq!(book.partners().len(), 201);
            assert_eq!(book.partners().children(PartnerId(1)).unwrap().len(), 200);
            assert_eq!(book.contracts().len(), 200);
        });
    }
}
