use loyalty_types::{Result, RewardError};
use serde::{Deserialize, Serialize};

/// Tunable constants of the reward computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPolicy {
    /// Years a contract keeps counting after it starts
    #[serde(default = "default_expiry_years")]
    pub expiry_years: u32,

    /// One-time bonus per new bonus-type contract
    #[serde(default = "default_new_contract_bonus")]
    pub new_contract_bonus: i64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            expiry_years: default_expiry_years(),
            new_contract_bonus: default_new_contract_bonus(),
        }
    }
}

impl RewardPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.expiry_years > 1000 {
            return Err(RewardError::InvalidPolicy(format!(
                "expiry_years {} exceeds 1000",
                self.expiry_years
            )));
        }
        if self.new_contract_bonus < 0 {
            return Err(RewardError::InvalidPolicy(format!(
                "new_contract_bonus {} is negative",
                self.new_contract_bonus
            )));
        }
        Ok(())
    }
}

fn default_expiry_years() -> u32 {
    8
}

fn default_new_contract_bonus() -> i64 {
    50
}
