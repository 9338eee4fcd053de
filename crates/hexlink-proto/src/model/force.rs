use serde::{Deserialize, Serialize};

use super::{EntityId, ForceId, PlayerId};

/// Named node of the force tree.
///
/// `entities` and `sub_forces` keep the order the owner arranged them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Force {
    /// Force id.
    pub id: ForceId,
    /// Name, e.g. "Alpha Lance".
    pub name: String,
    /// Owning player.
    pub owner_id: PlayerId,
    /// Parent force, `None` for a top-level force.
    pub parent: Option<ForceId>,
    /// Direct member entities.
    pub entities: Vec<EntityId>,
    /// Direct child forces.
    pub sub_forces: Vec<ForceId>,
}

impl Force {
    /// An empty top-level force.
    #[must_use]
    pub fn new(id: ForceId, name: impl Into<String>, owner_id: PlayerId) -> Self {
        Self {
            id,
            name: name.into(),
            owner_id,
            parent: None,
            entities: Vec::new(),
            sub_forces: Vec::new(),
        }
    }

    /// Whether this force has no parent.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}
