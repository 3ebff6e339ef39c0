use serde::{Deserialize, Serialize};

/// Reward level of a partner.
///
/// Assigned purely from the number of active contracts under the partner's
/// subtree. Each level pays a fixed amount per direct contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RewardLevel {
    None,
    Ant,
    Bee,
    Cat,
    Dog,
    Elephant,
}

impl RewardLevel {
    /// All levels, lowest first.
    pub const ALL: [RewardLevel; 6] = [
        RewardLevel::None,
        RewardLevel::Ant,
        RewardLevel::Bee,
        RewardLevel::Cat,
        RewardLevel::Dog,
        RewardLevel::Elephant,
    ];

    /// Level for an active-contract count. Lower bounds are inclusive.
    pub fn for_count(count: usize) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|level| count >= level.threshold())
            .unwrap_or(RewardLevel::None)
    }

    /// Smallest active-contract count that reaches this level.
    pub fn threshold(self) -> usize {
        match self {
            RewardLevel::None => 0,
            RewardLevel::Ant => 1,
            RewardLevel::Bee => 10,
            RewardLevel::Cat => 50,
            RewardLevel::Dog => 200,
            RewardLevel::Elephant => 1000,
        }
    }

    /// Reward per qualifying contract, in whole currency units.
    pub fn reward_per_contract(self) -> i64 {
        match self {
            RewardLevel::None => 0,
            RewardLevel::Ant => 5,
            RewardLevel::Bee => 7,
            RewardLevel::Cat => 9,
            RewardLevel::Dog => 12,
            RewardLevel::Elephant => 15,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RewardLevel::None => "None",
            RewardLevel::Ant => "Ant",
            RewardLevel::Bee => "Bee",
            RewardLevel::Cat => "Cat",
            RewardLevel::Dog => "Dog",
            RewardLevel::Elephant => "Elephant",
        }
    }
}

impl std::fmt::Display for RewardLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thresholds_are_exact() {
        assert_eq!(RewardLevel::for_count(0), RewardLevel::None);
        assert_eq!(RewardLevel::for_count(1), RewardLevel::Ant);
        assert_eq!(RewardLevel::for_count(9), RewardLevel::Ant);
        assert_eq!(RewardLevel::for_count(10), RewardLevel::Bee);
        assert_eq!(RewardLevel::for_count(49), RewardLevel::Bee);
        assert_eq!(RewardLevel::for_count(50), RewardLevel::Cat);
        assert_eq!(RewardLevel::for_count(199), RewardLevel::Cat);
        assert_eq!(RewardLevel::for_count(200), RewardLevel::Dog);
        assert_eq!(RewardLevel::for_count(999), RewardLevel::Dog);
        assert_eq!(RewardLevel::for_count(1000), RewardLevel::Elephant);
    }

    #[test]
    fn threshold_round_trips_through_for_count() {
        for level in RewardLevel::ALL {
            assert_eq!(RewardLevel::for_count(level.threshold()), level);
        }
    }

    #[test]
    fn amounts_ascend() {
        let amounts: Vec<i64> = RewardLevel::ALL
            .iter()
            .map(|l| l.reward_per_contract())
            .collect();
        assert_eq!(amounts, vec![0, 5, 7, 9, 12, 15]);
    }

    proptest! {
        #[test]
        fn level_is_monotonic(a in 0usize..5000, b in 0usize..5000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(RewardLevel::for_count(lo) <= RewardLevel::for_count(hi));
            prop_assert!(
                RewardLevel::for_count(lo).reward_per_contract()
                    <= RewardLevel::for_count(hi).reward_per_contract()
            );
        }
    }
}
