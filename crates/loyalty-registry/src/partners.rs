//! Partner registry

use std::collections::HashMap;

use loyalty_types::{Partner, PartnerId, Result, RewardError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What to do when a partner id is registered a second time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationPolicy {
    /// Refuse the registration and leave the registry untouched.
    #[default]
    Reject,
    /// Replace the partner with a fresh node that has no children.
    ///
    /// The previous parent keeps its link to the id and the new parent gains
    /// one, so the id may be reachable from two places afterwards. Former
    /// children stay registered but are no longer reachable from the id.
    Replace,
}

/// In-memory partner registry.
///
/// The hierarchy is a forest: a partner's parent is fixed when it is
/// registered and must already exist.
#[derive(Clone, Debug, Default)]
pub struct PartnerRegistry {
    partners: HashMap<PartnerId, Partner>,
    policy: RegistrationPolicy,
}

impl PartnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RegistrationPolicy) -> Self {
        Self {
            partners: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    /// Register a partner, optionally under an existing parent.
    ///
    /// A parent id of `0` means "no parent". An unknown parent fails with
    /// [`RewardError::ParentNotFound`] and nothing is created.
    pub fn register(&mut self, id: PartnerId, parent: Option<PartnerId>) -> Result<()> {
        let parent = parent.filter(|p| p.0 > 0);

        if self.partners.contains_key(&id) {
            match self.policy {
                RegistrationPolicy::Reject => {
                    return Err(RewardError::PartnerAlreadyRegistered(id));
                }
                RegistrationPolicy::Replace => {
                    warn!(partner = %id, "Replacing already registered partner");
                }
            }
        }

        if let Some(parent_id) = parent {
            let parent_node = self
                .partners
                .get_mut(&parent_id)
                .ok_or(RewardError::ParentNotFound(parent_id))?;
            parent_node.add_child(id);
        }

        self.partners.insert(id, Partner::new(id, parent));

        info!(
            partner = %id,
            parent = ?parent.map(|p| p.0),
            "Partner registered"
        );
        Ok(())
    }

    pub fn get(&self, id: PartnerId) -> Option<&Partner> {
        self.partners.get(&id)
    }

    pub fn exists(&self, id: PartnerId) -> bool {
        self.partners.contains_key(&id)
    }

    /// Direct children of a partner in registration order.
    pub fn children(&self, id: PartnerId) -> Result<&[PartnerId]> {
        self.partners
            .get(&id)
            .map(Partner::children)
            .ok_or(RewardError::PartnerNotFound(id))
    }

    /// Registered partner ids in ascending order.
    pub fn ids(&self) -> Vec<PartnerId> {
        let mut ids: Vec<PartnerId> = self.partners.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}
