use serde::{Deserialize, Serialize};

/// Partner identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartnerId(pub u64);

impl std::fmt::Display for PartnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PartnerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A node in the reward hierarchy.
///
/// Children are held as id links in insertion order; the registry owns every
/// partner. The parent is fixed at registration time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub parent: Option<PartnerId>,
    children: Vec<PartnerId>,
}

impl Partner {
    pub fn new(id: PartnerId, parent: Option<PartnerId>) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[PartnerId] {
        &self.children
    }

    pub fn add_child(&mut self, child: PartnerId) {
        self.children.push(child);
    }
}
