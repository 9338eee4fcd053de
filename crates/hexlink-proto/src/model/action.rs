use serde::{Deserialize, Serialize};

use super::{BuildingId, Coords, EntityId};

/// Weapon fired at a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaponAttack {
    /// Attacker.
    pub entity_id: EntityId,
    /// Target entity.
    pub target_id: EntityId,
    /// Weapon equipment number on the attacker.
    pub weapon_id: u32,
    /// Ammo bin used, for ammo-fed weapons.
    pub ammo_id: Option<u32>,
}

/// Declared action of an entity, as sent in attack batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityAction {
    /// Rotate torso or turret.
    TorsoTwist {
        /// Acting entity.
        entity_id: EntityId,
        /// New secondary facing.
        facing: u8,
    },
    /// Flip arms to fire rearward.
    FlipArms {
        /// Acting entity.
        entity_id: EntityId,
        /// Flipped or not.
        flipped: bool,
    },
    /// Dodge instead of attacking.
    Dodge {
        /// Acting entity.
        entity_id: EntityId,
    },
    /// Weapon attack.
    Weapon(WeaponAttack),
    /// Punch, kick or push.
    Physical {
        /// Attacker.
        entity_id: EntityId,
        /// Target.
        target_id: EntityId,
        /// Attack kind, e.g. "punch".
        kind: String,
    },
    /// Club attack with a carried object.
    Club {
        /// Attacker.
        entity_id: EntityId,
        /// Target.
        target_id: EntityId,
        /// Club equipment name.
        club: String,
    },
    /// Charge, resolved after movement.
    Charge {
        /// Attacker.
        entity_id: EntityId,
        /// Target.
        target_id: EntityId,
    },
    /// Death from above, resolved after movement.
    DeathFromAbove {
        /// Attacker.
        entity_id: EntityId,
        /// Target.
        target_id: EntityId,
    },
    /// Place explosives in a building.
    LayExplosives {
        /// Acting entity.
        entity_id: EntityId,
        /// Target building.
        building_id: BuildingId,
    },
    /// Illuminate a hex with a searchlight.
    Searchlight {
        /// Acting entity.
        entity_id: EntityId,
        /// Lit hex.
        target: Coords,
    },
}

impl EntityAction {
    /// Entity performing the action.
    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        match self {
            Self::TorsoTwist { entity_id, .. }
            | Self::FlipArms { entity_id, .. }
            | Self::Dodge { entity_id }
            | Self::Physical { entity_id, .. }
            | Self::Club { entity_id, .. }
            | Self::Charge { entity_id, .. }
            | Self::DeathFromAbove { entity_id, .. }
            | Self::LayExplosives { entity_id, .. }
            | Self::Searchlight { entity_id, .. } => *entity_id,
            Self::Weapon(attack) => attack.entity_id,
        }
    }

    /// Facing and posture changes take effect on receipt and never wait in
    /// a resolution queue.
    #[must_use]
    pub fn is_immediate(&self) -> bool {
        matches!(self, Self::TorsoTwist { .. } | Self::FlipArms { .. } | Self::Dodge { .. })
    }
}
