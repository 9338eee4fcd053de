//! Entity and force mutations.

use std::collections::{BTreeMap, BTreeSet};

use hexlink_proto::model::{
    Entity, EntityAction, EntityId, Force, ForceId, OutOfGameEntity, RemovalReason, Visibility,
};

use super::GameState;

impl GameState {
    /// Replace every entity, the out-of-game list and, if given, the whole
    /// force tree.
    pub fn replace_all_entities(
        &mut self,
        entities: Vec<Entity>,
        out_of_game: Vec<OutOfGameEntity>,
        forces: Option<Vec<Force>>,
    ) {
        self.entities = entities.into_iter().map(|e| (e.id, e)).collect();
        self.out_of_game = out_of_game;

        if let Some(forces) = forces {
            self.forces.clear();
            for mut force in forces {
                force.entities.retain(|id| self.entities.contains_key(id));
                self.forces.replace(force);
            }
        }

        let links: Vec<(EntityId, ForceId)> =
            self.entities.values().filter_map(|e| Some((e.id, e.force_id?))).collect();
        for (entity_id, force_id) in links {
            self.forces.add_entity(force_id, entity_id);
        }
    }

    /// Insert entities with server-assigned ids.
    ///
    /// An entity may name a force that has not arrived yet; the membership
    /// is completed when the force record comes in.
    pub fn add_entities(&mut self, entities: Vec<Entity>) -> Vec<EntityId> {
        let mut added = Vec::with_capacity(entities.len());
        for entity in entities {
            if self.entities.contains_key(&entity.id) {
                tracing::debug!(entity_id = entity.id, "entity added twice, replacing");
            }
            added.push(entity.id);
            self.upsert_entity(entity);
        }
        added
    }

    /// Insert or replace an entity; returns the previous record.
    ///
    /// An entity with no force, or with one not yet known, leaves whatever
    /// force listed it before.
    pub fn upsert_entity(&mut self, entity: Entity) -> Option<Entity> {
        let joined = entity.force_id.is_some_and(|f| self.forces.add_entity(f, entity.id));
        if !joined {
            self.forces.remove_entity(entity.id);
        }
        self.entities.insert(entity.id, entity)
    }

    /// Move entities out of the game.
    ///
    /// Entities that never joined are dropped outright; all others are kept
    /// in the out-of-game list. Force membership is cleared and turns that
    /// only the removed entities could take are dropped. Returns the ids that
    /// were live.
    pub fn remove_entities(&mut self, ids: &[EntityId], reason: RemovalReason) -> Vec<EntityId> {
        let mut removed = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(entity) = self.entities.remove(&id) else {
                tracing::debug!(entity_id = id, "remove of unknown entity ignored");
                continue;
            };
            self.forces.remove_entity(id);
            if reason != RemovalReason::NeverJoined {
                self.out_of_game.push(OutOfGameEntity { entity, reason });
            }
            removed.push(id);
        }

        let dropped = self.turns.remove_orphaned(&removed);
        if dropped > 0 {
            tracing::debug!(dropped, "turns of removed entities dropped");
        }
        removed
    }

    /// Overwrite an entity's double-blind visibility. Returns whether the
    /// entity is known.
    pub fn set_visibility(&mut self, id: EntityId, visibility: Visibility) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.visibility = visibility;
                true
            },
            None => false,
        }
    }

    /// Set the Nova network an entity joins next round. Returns whether the
    /// entity is known.
    pub fn set_pending_nova_network(&mut self, id: EntityId, network: Option<String>) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.pending_nova_network = network;
                true
            },
            None => false,
        }
    }

    /// Write a display-name marker chosen by the name tracker.
    pub fn set_duplicate_marker(&mut self, id: EntityId, marker: u32) -> Option<&Entity> {
        let entity = self.entities.get_mut(&id)?;
        entity.duplicate_marker = marker;
        Some(entity)
    }

    /// Apply a facing or posture change to its entity.
    ///
    /// Returns `false` for unknown entities and for actions that are not
    /// immediate.
    pub fn apply_immediate_action(&mut self, action: &EntityAction) -> bool {
        let Some(entity) = self.entities.get_mut(&action.entity_id()) else {
            return false;
        };
        match action {
            EntityAction::TorsoTwist { facing, .. } => entity.secondary_facing = *facing,
            EntityAction::FlipArms { flipped, .. } => entity.arms_flipped = *flipped,
            EntityAction::Dodge { .. } => entity.dodging = true,
            _ => return false,
        }
        true
    }

    /// Insert or replace a force record and align its members' `force_id`.
    ///
    /// Entities listed by the force now point at it; entities that pointed
    /// at it but are no longer listed are detached. Listed ids that are not
    /// live entities, and repeats, are dropped from the record; an entity
    /// arriving later joins through its own `force_id`.
    pub fn replace_force(&mut self, mut force: Force) {
        let force_id = force.id;
        let mut listed = BTreeSet::new();
        force.entities.retain(|&id| self.entities.contains_key(&id) && listed.insert(id));
        let members = force.entities.clone();
        self.forces.replace(force);

        for entity in self.entities.values_mut() {
            if members.contains(&entity.id) {
                entity.force_id = Some(force_id);
            } else if entity.force_id == Some(force_id) {
                entity.force_id = None;
            }
        }
    }

    /// Delete forces with their sub-forces and remove every entity they
    /// held, attributed to [`RemovalReason::NeverJoined`].
    ///
    /// Returns the deleted force ids and the removed entity ids.
    pub fn delete_forces(&mut self, force_ids: &[ForceId]) -> (Vec<ForceId>, Vec<EntityId>) {
        let (deleted, members) = self.forces.delete(force_ids);
        let members: Vec<EntityId> = members.into_iter().collect();
        let removed = self.remove_entities(&members, RemovalReason::NeverJoined);

        for entity in self.entities.values_mut() {
            if entity.force_id.is_some_and(|f| deleted.contains(&f)) {
                entity.force_id = None;
            }
        }
        (deleted, removed)
    }

    /// Entities naming a force that is not known yet, grouped by force.
    #[must_use]
    pub fn pending_force_refs(&self) -> BTreeMap<ForceId, Vec<EntityId>> {
        let mut pending: BTreeMap<ForceId, Vec<EntityId>> = BTreeMap::new();
        for entity in self.entities.values() {
            if let Some(force_id) = entity.force_id
                && !self.forces.contains(force_id)
            {
                pending.entry(force_id).or_default().push(entity.id);
            }
        }
        pending
    }
}

#[cfg(test)]
mod tests {
    use hexlink_proto::model::{TurnDescriptor, TurnKind, WeaponAttack};

    use super::*;

    fn unit(id: EntityId, force_id: Option<ForceId>) -> Entity {
        let mut entity = Entity::new(id, 1, "Atlas", "AS7-D");
        entity.force_id = force_id;
        entity
    }

    fn force(id: ForceId, parent: Option<ForceId>, entities: &[EntityId]) -> Force {
        let mut f = Force::new(id, format!("Force {id}"), 1);
        f.parent = parent;
        f.entities = entities.to_vec();
        f
    }

    #[test]
    fn pending_force_completes_when_force_arrives() {
        let mut state = GameState::new();
        state.add_entities(vec![unit(5, Some(3)), unit(6, Some(3))]);

        assert_eq!(state.entity_count(), 2);
        assert_eq!(state.pending_force_refs().get(&3), Some(&vec![5, 6]));

        state.replace_force(force(3, None, &[5, 6]));

        assert!(state.pending_force_refs().is_empty());
        assert_eq!(state.forces().force_of(5), Some(3));
        assert_eq!(state.forces().force_of(6), Some(3));
    }

    #[test]
    fn replace_force_detaches_dropped_members() {
        let mut state = GameState::new();
        state.replace_force(force(1, None, &[]));
        state.add_entities(vec![unit(5, Some(1)), unit(6, Some(1))]);

        state.replace_force(force(1, None, &[6]));

        assert_eq!(state.entity(5).and_then(|e| e.force_id), None);
        assert_eq!(state.entity(6).and_then(|e| e.force_id), Some(1));
    }

    #[test]
    fn remove_keeps_history_except_never_joined() {
        let mut state = GameState::new();
        state.add_entities(vec![unit(1, None), unit(2, None)]);

        state.remove_entities(&[1], RemovalReason::Devastated);
        state.remove_entities(&[2], RemovalReason::NeverJoined);

        assert_eq!(state.entity_count(), 0);
        assert_eq!(state.out_of_game().len(), 1);
        assert_eq!(state.out_of_game()[0].reason, RemovalReason::Devastated);
    }

    #[test]
    fn remove_unknown_entity_is_noop() {
        let mut state = GameState::new();
        state.add_entities(vec![unit(1, None)]);

        assert!(state.remove_entities(&[9], RemovalReason::Salvageable).is_empty());
        assert_eq!(state.entity_count(), 1);
        assert!(state.out_of_game().is_empty());
    }

    #[test]
    fn remove_drops_orphaned_turns() {
        let mut state = GameState::new();
        state.add_entities(vec![unit(1, None)]);
        state.replace_turns(vec![
            TurnDescriptor { player_id: Some(1), kind: TurnKind::Specific { entity_id: 1 } },
            TurnDescriptor::normal(2),
        ]);

        state.remove_entities(&[1], RemovalReason::Ejected);

        assert_eq!(state.turns().turns(), [TurnDescriptor::normal(2)]);
    }

    #[test]
    fn delete_forces_removes_transitive_members_only() {
        let mut state = GameState::new();
        state.replace_force(force(1, None, &[]));
        state.replace_force(force(2, Some(1), &[]));
        state.replace_force(force(3, None, &[]));
        state.add_entities(vec![unit(10, Some(1)), unit(20, Some(2)), unit(30, Some(3))]);

        let (deleted, removed) = state.delete_forces(&[1]);

        assert_eq!(deleted, [1, 2]);
        assert_eq!(removed, [10, 20]);
        assert!(state.entity(30).is_some());
        assert!(state.out_of_game().is_empty());
        assert!(state.entities().all(|e| e.force_id.is_none_or(|f| state.forces().contains(f))));
    }

    #[test]
    fn entity_leaving_its_force_survives_force_deletion() {
        let mut state = GameState::new();
        state.replace_force(force(1, None, &[]));
        state.add_entities(vec![unit(5, Some(1))]);
        assert_eq!(state.forces().force_of(5), Some(1));

        state.upsert_entity(unit(5, None));
        assert_eq!(state.forces().force_of(5), None);

        let (deleted, removed) = state.delete_forces(&[1]);
        assert_eq!(deleted, [1]);
        assert!(removed.is_empty());
        assert!(state.entity(5).is_some());
    }

    #[test]
    fn entity_moving_to_unknown_force_leaves_old_one() {
        let mut state = GameState::new();
        state.replace_force(force(1, None, &[]));
        state.add_entities(vec![unit(5, Some(1))]);

        state.upsert_entity(unit(5, Some(9)));

        assert_eq!(state.forces().force_of(5), None);
        assert_eq!(state.pending_force_refs().get(&9), Some(&vec![5]));
    }

    #[test]
    fn force_listing_removed_entity_does_not_resurrect_it() {
        let mut state = GameState::new();
        state.replace_force(force(1, None, &[]));
        state.add_entities(vec![unit(5, Some(1)), unit(6, Some(1))]);

        state.remove_entities(&[5], RemovalReason::Devastated);
        state.replace_force(force(1, None, &[5, 6]));

        assert_eq!(state.forces().force_of(5), None);
        assert_eq!(state.forces().force_of(6), Some(1));

        let (_, removed) = state.delete_forces(&[1]);
        assert_eq!(removed, [6]);
        assert_eq!(state.out_of_game().len(), 1);
    }

    #[test]
    fn resync_forces_list_only_resynced_entities() {
        let mut state = GameState::new();
        state.replace_all_entities(vec![unit(6, Some(1))], Vec::new(), Some(vec![force(1, None, &[5, 6])]));

        assert_eq!(state.forces().get(1).map(|f| f.entities.clone()), Some(vec![6]));
    }

    #[test]
    fn visibility_for_unknown_entity_is_noop() {
        let mut state = GameState::new();
        let visibility = Visibility { visible_to_enemy: true, ..Visibility::default() };
        assert!(!state.set_visibility(4, visibility.clone()));

        state.add_entities(vec![unit(4, None)]);
        assert!(state.set_visibility(4, visibility.clone()));
        assert_eq!(state.entity(4).map(|e| &e.visibility), Some(&visibility));
    }

    #[test]
    fn immediate_actions_update_entity() {
        let mut state = GameState::new();
        state.add_entities(vec![unit(1, None)]);

        assert!(state.apply_immediate_action(&EntityAction::TorsoTwist { entity_id: 1, facing: 3 }));
        assert!(state.apply_immediate_action(&EntityAction::FlipArms { entity_id: 1, flipped: true }));
        assert!(state.apply_immediate_action(&EntityAction::Dodge { entity_id: 1 }));

        let entity = state.entity(1).expect("entity 1 is live");
        assert_eq!(entity.secondary_facing, 3);
        assert!(entity.arms_flipped);
        assert!(entity.dodging);

        let attack = EntityAction::Weapon(WeaponAttack {
            entity_id: 1,
            target_id: 2,
            weapon_id: 0,
            ammo_id: None,
        });
        assert!(!state.apply_immediate_action(&attack));
        assert!(!state.apply_immediate_action(&EntityAction::Dodge { entity_id: 9 }));
    }
}
