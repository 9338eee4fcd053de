//! Entity lifecycle, settings and action payloads.

use serde::{Deserialize, Serialize};

use crate::model::{
    Coords, Entity, EntityAction, EntityId, Force, GamePhase, MovePath, OutOfGameEntity, PlayerId,
    RemovalReason, UnitLocation,
};

/// Full entity resync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityResync {
    /// Live entities.
    pub entities: Vec<Entity>,
    /// Entities that already left the game.
    pub out_of_game: Vec<OutOfGameEntity>,
    /// Complete force tree, if the server sends one.
    pub forces: Option<Vec<Force>>,
}

/// Entities added by the server.
///
/// `entity_ids` lists the server-generated ids in the same order as
/// `entities`; `forces` carries any force created or changed by the add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitiesAdded {
    /// Generated ids.
    pub entity_ids: Vec<EntityId>,
    /// New entities.
    pub entities: Vec<Entity>,
    /// Affected forces.
    pub forces: Vec<Force>,
}

/// Entities the client asks to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewEntities {
    /// Entities; ids are assigned by the server.
    pub entities: Vec<Entity>,
}

/// Server replaced one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityUpdate {
    /// Target id.
    pub entity_id: EntityId,
    /// New record.
    pub entity: Entity,
    /// Path the entity took, for movement display.
    pub movement_path: Vec<UnitLocation>,
}

/// Client replaced one entity it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityChange {
    /// New record.
    pub entity: Entity,
}

/// Several entities replaced at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityBatch {
    /// New records.
    pub entities: Vec<Entity>,
}

/// Server removed entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitiesRemoved {
    /// Removed ids.
    pub entity_ids: Vec<EntityId>,
    /// Why they left.
    pub reason: RemovalReason,
    /// Forces changed by the removal.
    pub forces: Vec<Force>,
}

/// Plain list of entity ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityIds {
    /// Ids.
    pub entity_ids: Vec<EntityId>,
}

/// Who can see or detect an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisibilityIndicator {
    /// Entity, possibly unknown to this client.
    pub entity_id: EntityId,
    /// Seen at least once.
    pub ever_seen_by_enemy: bool,
    /// Currently visible.
    pub visible_to_enemy: bool,
    /// Currently detected.
    pub detected_by_enemy: bool,
    /// Players that can see it.
    pub seen_by: Vec<PlayerId>,
    /// Players that can detect it.
    pub detected_by: Vec<PlayerId>,
}

/// Nova C3 network assignment for the next round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NovaNetwork {
    /// Entity.
    pub entity_id: EntityId,
    /// Network id.
    pub network: String,
}

/// Actions broadcast by the server.
///
/// `queue` selects the pending queue for non-immediate actions: 0 for the
/// normal attack queue, 1 for the charge queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttackBatch {
    /// Actions in declaration order.
    pub actions: Vec<EntityAction>,
    /// Queue discriminator.
    pub queue: u8,
}

/// Actions declared by the client for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttackDeclaration {
    /// Acting entity.
    pub entity_id: EntityId,
    /// Declared actions.
    pub actions: Vec<EntityAction>,
}

/// Movement order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveOrder {
    /// Moving entity.
    pub entity_id: EntityId,
    /// Path.
    pub path: MovePath,
}

/// Deployment placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployOrder {
    /// Deploying entity.
    pub entity_id: EntityId,
    /// Target hex.
    pub coords: Coords,
    /// Facing.
    pub facing: u8,
    /// Elevation.
    pub elevation: i32,
    /// Units carried in.
    pub loaded: Vec<EntityId>,
    /// Deploy by assault drop.
    pub assault_drop: bool,
}

/// Equipment setting with a value (mode, ammo bin, system mode, facing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EquipmentSetting {
    /// Entity.
    pub entity_id: EntityId,
    /// Equipment or system number.
    pub equipment: u32,
    /// New value.
    pub value: i32,
}

/// Toggle on one piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EquipmentToggle {
    /// Entity.
    pub entity_id: EntityId,
    /// Equipment number.
    pub equipment: u32,
}

/// Whole-entity setting (active sensor, active sinks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntitySetting {
    /// Entity.
    pub entity_id: EntityId,
    /// New value.
    pub value: u32,
}

/// Reveal a hidden unit at the start of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivateHidden {
    /// Hidden entity.
    pub entity_id: EntityId,
    /// Phase to reveal in.
    pub phase: GamePhase,
}

/// Give entities to another player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnerChange {
    /// Entities.
    pub entity_ids: Vec<EntityId>,
    /// New owner.
    pub owner_id: PlayerId,
}

/// Load an entity into a transport bay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadOrder {
    /// Loaded entity.
    pub entity_id: EntityId,
    /// Transport.
    pub loader_id: EntityId,
    /// Bay number.
    pub bay: u32,
}

/// Unload an entity during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployUnload {
    /// Transport.
    pub loader_id: EntityId,
    /// Unloaded entity.
    pub loaded_id: EntityId,
}
