use std::collections::HashSet;

use chrono::Datelike;
use loyalty_registry::{ContractStore, PartnerRegistry, RewardBook};
use loyalty_types::{
    quarter_of, Contract, PartnerId, QuarterReward, ReportingPeriod, Result, RewardError,
    RewardLevel,
};
use serde::Serialize;
use tracing::debug;

use crate::policy::RewardPolicy;
use crate::window::ActiveWindow;

/// Reward engine over a borrowed registry and contract store.
pub struct RewardEngine<'a> {
    partners: &'a PartnerRegistry,
    contracts: &'a ContractStore,
    policy: RewardPolicy,
}

/// How a partner's reward for one period was put together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RewardBreakdown {
    pub partner: PartnerId,
    pub year: i32,
    pub quarter: u32,
    pub level: RewardLevel,
    /// Active contracts across the partner's subtree
    pub active_contracts: usize,
    /// Active contracts owned by the partner and started in the quarter
    pub direct_contracts: usize,
    pub base: i64,
    pub bonus: i64,
    pub child_differential: i64,
    pub total: i64,
}

impl<'a> RewardEngine<'a> {
    pub fn new(
        partners: &'a PartnerRegistry,
        contracts: &'a ContractStore,
        policy: RewardPolicy,
    ) -> Self {
        Self {
            partners,
            contracts,
            policy,
        }
    }

    pub fn for_book(book: &'a RewardBook, policy: RewardPolicy) -> Self {
        Self::new(book.partners(), book.contracts(), policy)
    }

    pub fn policy(&self) -> &RewardPolicy {
        &self.policy
    }

    /// The partner itself followed by all of its descendants, depth first.
    ///
    /// Each id appears once even if it is linked from more than one parent.
    pub fn eligible_partner_ids(&self, partner: PartnerId) -> Result<Vec<PartnerId>> {
        self.ensure_registered(partner)?;

        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![partner];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(node) = self.partners.get(id) {
                stack.extend(
                    node.children()
                        .iter()
                        .rev()
                        .filter(|child| !visited.contains(*child)),
                );
            }
        }

        Ok(order)
    }

    pub fn active_window(&self, period: ReportingPeriod) -> Result<ActiveWindow> {
        ActiveWindow::for_period(period, self.policy.expiry_years)
    }

    /// Contracts owned by any of `partner_ids` that are active in `period`.
    pub fn active_contracts(
        &self,
        partner_ids: &HashSet<PartnerId>,
        period: ReportingPeriod,
    ) -> Result<Vec<&'a Contract>> {
        let window = self.active_window(period)?;
        Ok(self.active_in(partner_ids, &window))
    }

    /// Level from the active-contract count of the partner's whole subtree.
    pub fn partner_level(&self, partner: PartnerId, period: ReportingPeriod) -> Result<RewardLevel> {
        let window = self.active_window(period)?;
        let active = self.subtree_active(partner, &window)?;
        let level = RewardLevel::for_count(active.len());

        debug!(
            partner = %partner,
            %period,
            active = active.len(),
            %level,
            "Partner level computed"
        );
        Ok(level)
    }

    pub fn partner_reward(&self, partner: PartnerId, period: ReportingPeriod) -> Result<i64> {
        Ok(self.partner_reward_breakdown(partner, period)?.total)
    }

    pub fn partner_reward_breakdown(
        &self,
        partner: PartnerId,
        period: ReportingPeriod,
    ) -> Result<RewardBreakdown> {
        let window = self.active_window(period)?;
        let active = self.subtree_active(partner, &window)?;
        let level = RewardLevel::for_count(active.len());
        let rate = level.reward_per_contract();

        let direct = started_in_quarter(&active, partner, period.quarter());
        let base = count_as_amount(direct.len()) * rate;

        let new_bonus_contracts = direct
            .iter()
            .filter(|c| c.kind.earns_new_contract_bonus() && c.start_date.year() == period.year())
            .count();
        let bonus = count_as_amount(new_bonus_contracts) * self.policy.new_contract_bonus;

        let mut child_differential = 0;
        for &child in self.partners.children(partner)? {
            let child_active = self.subtree_active(child, &window)?;
            let child_level = RewardLevel::for_count(child_active.len());
            let child_direct = started_in_quarter(&child_active, child, period.quarter()).len();
            child_differential +=
                count_as_amount(child_direct) * (rate - child_level.reward_per_contract());
        }

        let total = base + bonus + child_differential;
        debug!(
            partner = %partner,
            %period,
            %level,
            base,
            bonus,
            child_differential,
            total,
            "Partner reward computed"
        );

        Ok(RewardBreakdown {
            partner,
            year: period.year(),
            quarter: period.quarter(),
            level,
            active_contracts: active.len(),
            direct_contracts: direct.len(),
            base,
            bonus,
            child_differential,
            total,
        })
    }

    /// Rewards for every quarter between the earliest and the latest contract
    /// start year in the store, oldest first.
    ///
    /// Empty when the store is empty, whatever the partner id. Otherwise an
    /// unknown partner fails with [`RewardError::PartnerNotFound`] from the
    /// first quarter's reward.
    pub fn partner_all_rewards(&self, partner: PartnerId) -> Result<Vec<QuarterReward>> {
        let Some((first_year, last_year)) = self.contracts.start_year_range() else {
            return Ok(Vec::new());
        };

        ReportingPeriod::span_years(first_year, last_year)
            .into_iter()
            .map(|period| {
                self.partner_reward(partner, period)
                    .map(|reward| QuarterReward::new(period, reward))
            })
            .collect()
    }

    fn ensure_registered(&self, partner: PartnerId) -> Result<()> {
        if self.partners.exists(partner) {
            Ok(())
        } else {
            Err(RewardError::PartnerNotFound(partner))
        }
    }

    fn subtree_active(&self, partner: PartnerId, window: &ActiveWindow) -> Result<Vec<&'a Contract>> {
        let eligible: HashSet<PartnerId> = self.eligible_partner_ids(partner)?.into_iter().collect();
        Ok(self.active_in(&eligible, window))
    }

    fn active_in(&self, partner_ids: &HashSet<PartnerId>, window: &ActiveWindow) -> Vec<&'a Contract> {
        self.contracts
            .all()
            .filter(|c| partner_ids.contains(&c.partner_id) && window.contains(c))
            .collect()
    }
}

fn started_in_quarter<'c>(
    contracts: &[&'c Contract],
    owner: PartnerId,
    quarter: u32,
) -> Vec<&'c Contract> {
    contracts
        .iter()
        .copied()
        .filter(|c| c.partner_id == owner && quarter_of(c.start_date) == quarter)
        .collect()
}

fn count_as_amount(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use loyalty_registry::RegistrationPolicy;
    use loyalty_types::{ContractId, ContractKind, ContractRecord, ErrorKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(year: i32, quarter: u32) -> ReportingPeriod {
        ReportingPeriod::new(year, quarter).unwrap()
    }

    fn open(book: &mut RewardBook, id: u64, partner: u64, kind: ContractKind, on: NaiveDate) {
        book.upsert(ContractRecord::begin(ContractId(id), PartnerId(partner), kind, on))
            .unwrap();
    }

    /// 1 ── 2 ── 3, plus 4 under 1.
    fn tree() -> RewardBook {
        let mut book = RewardBook::new();
        book.register(PartnerId(1), None).unwrap();
        book.register(PartnerId(2), Some(PartnerId(1))).unwrap();
        book.register(PartnerId(3), Some(PartnerId(2))).unwrap();
        book.register(PartnerId(4), Some(PartnerId(1))).unwrap();
        book
    }

    #[test]
    fn eligible_ids_are_preorder() {
        let book = tree();
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());

        assert_eq!(
            engine.eligible_partner_ids(PartnerId(1)).unwrap(),
            vec![PartnerId(1), PartnerId(2), PartnerId(3), PartnerId(4)]
        );
        assert_eq!(
            engine.eligible_partner_ids(PartnerId(2)).unwrap(),
            vec![PartnerId(2), PartnerId(3)]
        );
        assert_eq!(
            engine.eligible_partner_ids(PartnerId(4)).unwrap(),
            vec![PartnerId(4)]
        );
    }

    #[test]
    fn unknown_partner_is_not_found() {
        let book = tree();
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());
        let q = period(2011, 1);

        for err in [
            engine.partner_level(PartnerId(9), q).unwrap_err(),
            engine.partner_reward(PartnerId(9), q).unwrap_err(),
            engine.eligible_partner_ids(PartnerId(9)).unwrap_err(),
        ] {
            assert_eq!(err, RewardError::PartnerNotFound(PartnerId(9)));
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    #[test]
    fn level_counts_whole_subtree() {
        let mut book = tree();
        for id in 0..12 {
            open(&mut book, 100 + id, 3, ContractKind::Tortoise, date(2009, 2, 1));
        }
        open(&mut book, 200, 4, ContractKind::Tortoise, date(2009, 2, 1));
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());
        let q = period(2011, 1);

        assert_eq!(engine.partner_level(PartnerId(1), q).unwrap(), RewardLevel::Bee);
        assert_eq!(engine.partner_level(PartnerId(2), q).unwrap(), RewardLevel::Bee);
        assert_eq!(engine.partner_level(PartnerId(4), q).unwrap(), RewardLevel::Ant);

        let subtree: HashSet<PartnerId> = [PartnerId(2), PartnerId(3)].into_iter().collect();
        assert_eq!(engine.active_contracts(&subtree, q).unwrap().len(), 12);
    }

    #[test]
    fn terminated_and_expired_contracts_drop_out() {
        let mut book = tree();
        open(&mut book, 1, 4, ContractKind::Tortoise, date(2002, 12, 1));
        open(&mut book, 2, 4, ContractKind::Tortoise, date(2005, 6, 1));
        book.upsert(ContractRecord::end(
            ContractId(2),
            PartnerId(4),
            ContractKind::Tortoise,
            date(2010, 12, 31),
        ))
        .unwrap();
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());

        // Expired: started before 2003-01-01. Terminated before 2011-03-31.
        assert_eq!(
            engine.partner_level(PartnerId(4), period(2011, 1)).unwrap(),
            RewardLevel::None
        );
        // In 2010 Q3 both contracts are inside the window.
        assert_eq!(
            engine.partner_level(PartnerId(4), period(2010, 3)).unwrap(),
            RewardLevel::Ant
        );
    }

    #[test]
    fn leaf_reward_is_base_plus_bonus() {
        let mut book = tree();
        open(&mut book, 1, 4, ContractKind::Rabbit, date(2011, 2, 10));
        open(&mut book, 2, 4, ContractKind::Tortoise, date(2011, 1, 3));
        // Same quarter of an earlier year: counts towards base, not bonus.
        open(&mut book, 3, 4, ContractKind::Rabbit, date(2009, 3, 3));
        // Other quarter: only raises the level count.
        open(&mut book, 4, 4, ContractKind::Rabbit, date(2010, 8, 3));
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());

        let breakdown = engine
            .partner_reward_breakdown(PartnerId(4), period(2011, 1))
            .unwrap();

        assert_eq!(breakdown.level, RewardLevel::Ant);
        assert_eq!(breakdown.active_contracts, 4);
        assert_eq!(breakdown.direct_contracts, 3);
        assert_eq!(breakdown.base, 15);
        assert_eq!(breakdown.bonus, 50);
        assert_eq!(breakdown.child_differential, 0);
        assert_eq!(breakdown.total, 65);
        assert_eq!(engine.partner_reward(PartnerId(4), period(2011, 1)).unwrap(), 65);
    }

    #[test]
    fn child_differential_uses_direct_children_only() {
        let mut book = tree();
        // Ten contracts for 1 itself pushes 1 to Bee (subtree count 12).
        for id in 0..10 {
            open(&mut book, id, 1, ContractKind::Tortoise, date(2008, 5, 1));
        }
        // Partner 2 owns one Q1 contract, its child 3 owns one Q1 contract.
        open(&mut book, 50, 2, ContractKind::Tortoise, date(2010, 2, 1));
        open(&mut book, 51, 3, ContractKind::Tortoise, date(2010, 3, 1));
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());

        let breakdown = engine
            .partner_reward_breakdown(PartnerId(1), period(2011, 1))
            .unwrap();

        // Own contracts started in Q2, so no base.
        assert_eq!(breakdown.level, RewardLevel::Bee);
        assert_eq!(breakdown.base, 0);
        assert_eq!(breakdown.bonus, 0);
        // Child 2 is Ant (2 active): 1 direct Q1 contract x (7 - 5).
        // Grandchild 3 is not a direct child and contributes nothing here.
        // Child 4 has no contracts.
        assert_eq!(breakdown.child_differential, 2);
        assert_eq!(breakdown.total, 2);
    }

    #[test]
    fn equal_levels_cancel_differential() {
        let mut book = tree();
        open(&mut book, 1, 1, ContractKind::Tortoise, date(2010, 1, 5));
        for id in 0..10 {
            open(&mut book, 10 + id, 4, ContractKind::Tortoise, date(2010, 2, 1));
        }
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());

        // Subtree of 1 has 11 active, child 4 alone has 10: both Bee.
        let breakdown = engine
            .partner_reward_breakdown(PartnerId(1), period(2011, 1))
            .unwrap();
        assert_eq!(breakdown.level, RewardLevel::Bee);
        assert_eq!(
            engine.partner_level(PartnerId(4), period(2011, 1)).unwrap(),
            RewardLevel::Bee
        );
        assert_eq!(breakdown.child_differential, 0);
        assert_eq!(breakdown.base, 7);
        assert_eq!(breakdown.total, 7);
    }

    #[test]
    fn replaced_partner_is_counted_once() {
        let mut book = RewardBook::with_policy(RegistrationPolicy::Replace);
        book.register(PartnerId(1), None).unwrap();
        book.register(PartnerId(2), Some(PartnerId(1))).unwrap();
        book.register(PartnerId(2), Some(PartnerId(1))).unwrap();
        open(&mut book, 1, 2, ContractKind::Tortoise, date(2010, 2, 1));
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());

        assert_eq!(
            engine.eligible_partner_ids(PartnerId(1)).unwrap(),
            vec![PartnerId(1), PartnerId(2)]
        );
        assert_eq!(
            engine.partner_level(PartnerId(1), period(2011, 1)).unwrap(),
            RewardLevel::Ant
        );
    }

    #[test]
    fn replaced_child_no_longer_reaches_grandchildren() {
        let mut book = RewardBook::with_policy(RegistrationPolicy::Replace);
        book.register(PartnerId(1), None).unwrap();
        book.register(PartnerId(2), Some(PartnerId(1))).unwrap();
        book.register(PartnerId(3), Some(PartnerId(2))).unwrap();
        open(&mut book, 1, 3, ContractKind::Tortoise, date(2010, 2, 1));
        book.register(PartnerId(2), None).unwrap();
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());
        let q = period(2011, 1);

        // Links resolve by id, so 1 → 2 now lands on the fresh, childless 2.
        assert_eq!(
            engine.eligible_partner_ids(PartnerId(1)).unwrap(),
            vec![PartnerId(1), PartnerId(2)]
        );
        assert_eq!(engine.partner_level(PartnerId(1), q).unwrap(), RewardLevel::None);
        assert_eq!(engine.partner_level(PartnerId(2), q).unwrap(), RewardLevel::None);
        assert_eq!(engine.partner_level(PartnerId(3), q).unwrap(), RewardLevel::Ant);
    }

    #[test]
    fn all_rewards_on_empty_store() {
        let book = tree();
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());
        assert!(engine.partner_all_rewards(PartnerId(1)).unwrap().is_empty());
        assert!(engine.partner_all_rewards(PartnerId(42)).unwrap().is_empty());
    }

    #[test]
    fn all_rewards_for_unknown_partner_once_store_has_contracts() {
        let mut book = tree();
        open(&mut book, 1, 4, ContractKind::Rabbit, date(2009, 2, 10));
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());

        assert_eq!(
            engine.partner_all_rewards(PartnerId(42)).unwrap_err(),
            RewardError::PartnerNotFound(PartnerId(42))
        );
    }

    #[test]
    fn all_rewards_follow_contract_years_outside_query_bounds() {
        let mut book = tree();
        open(&mut book, 1, 4, ContractKind::Rabbit, date(999, 5, 1));
        open(&mut book, 2, 4, ContractKind::Tortoise, date(2010, 2, 10));
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());

        let rewards = engine.partner_all_rewards(PartnerId(4)).unwrap();
        assert_eq!(rewards.len(), 4 * (2010 - 999 + 1));
        assert_eq!(
            rewards[1],
            QuarterReward {
                year: 999,
                quarter: 2,
                reward: 55
            }
        );
        assert_eq!((rewards.last().unwrap().year, rewards.last().unwrap().quarter), (2010, 4));
    }

    #[test]
    fn all_rewards_cover_store_year_range() {
        let mut book = tree();
        open(&mut book, 1, 4, ContractKind::Rabbit, date(2009, 2, 10));
        open(&mut book, 2, 3, ContractKind::Tortoise, date(2011, 7, 1));
        let engine = RewardEngine::for_book(&book, RewardPolicy::default());

        let rewards = engine.partner_all_rewards(PartnerId(4)).unwrap();
        assert_eq!(rewards.len(), 12);
        assert_eq!((rewards[0].year, rewards[0].quarter), (2009, 1));
        assert_eq!((rewards[11].year, rewards[11].quarter), (2011, 4));
        // Bonus only in the start year; base repeats in every later Q1.
        assert_eq!(rewards[0].reward, 55);
        assert_eq!(rewards[4].reward, 5);
        assert_eq!(rewards[8].reward, 5);
        assert!(rewards
            .iter()
            .filter(|r| r.quarter != 1)
            .all(|r| r.reward == 0));
    }

    #[test]
    fn policy_changes_bonus_and_expiry() {
        let mut book = tree();
        open(&mut book, 1, 4, ContractKind::Rabbit, date(2011, 2, 10));
        open(&mut book, 2, 4, ContractKind::Tortoise, date(2008, 2, 10));
        let policy = RewardPolicy {
            expiry_years: 2,
            new_contract_bonus: 100,
        };
        let engine = RewardEngine::for_book(&book, policy);

        let breakdown = engine
            .partner_reward_breakdown(PartnerId(4), period(2011, 1))
            .unwrap();
        assert_eq!(breakdown.active_contracts, 1);
        assert_eq!(breakdown.bonus, 100);
        assert_eq!(breakdown.total, 105);
    }
}
