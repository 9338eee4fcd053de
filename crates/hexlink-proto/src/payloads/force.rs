//! Force tree payloads.

use serde::{Deserialize, Serialize};

use crate::model::{Entity, EntityId, Force, ForceId, PlayerId};

/// Forces and the entities whose membership changed with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForceUpdate {
    /// Changed forces.
    pub forces: Vec<Force>,
    /// Changed entities.
    pub entities: Vec<Entity>,
}

/// Plain list of force ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForceIds {
    /// Ids.
    pub force_ids: Vec<ForceId>,
}

/// Create a force holding the given entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewForce {
    /// Force; the id is assigned by the server.
    pub force: Force,
    /// Initial members.
    pub entity_ids: Vec<EntityId>,
}

/// Move forces under a new parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForceReparent {
    /// Forces to move.
    pub force_ids: Vec<ForceId>,
    /// New parent; `None` promotes them to top level.
    pub parent_id: Option<ForceId>,
}

/// Give forces and everything in them to another player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForceOwnerChange {
    /// Forces.
    pub force_ids: Vec<ForceId>,
    /// New owner.
    pub owner_id: PlayerId,
}

/// Move entities into a force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForceMembership {
    /// Entities to move.
    pub entity_ids: Vec<EntityId>,
    /// Target force.
    pub force_id: ForceId,
}
