//! Entity lifecycle, visibility and declared actions.
//!
//! Locally owned entities are registered with the name tracker as they
//! arrive and leave. Whenever that changes a display name, the new record is
//! written to the store and sent back to the server so every client shows
//! the same name.

use std::collections::BTreeSet;

use hexlink_core::GameEvent;
use hexlink_proto::{
    ClientPayload,
    model::{Entity, EntityId, Visibility},
    payloads::entity::{
        AttackBatch, EntitiesAdded, EntitiesRemoved, EntityBatch, EntityChange, EntityResync,
        EntityUpdate, NovaNetwork, VisibilityIndicator,
    },
};

use super::{Actions, Client};
use crate::event::ClientAction;

/// Queue discriminator for the normal attack queue.
const NORMAL_QUEUE: u8 = 0;

/// Queue discriminator for charges.
const CHARGE_QUEUE: u8 = 1;

impl Client {
    fn is_local(&self, entity: &Entity) -> bool {
        self.local_player == Some(entity.owner_id)
    }

    pub(super) fn on_entity_resync(&mut self, payload: EntityResync, out: &mut Actions) {
        let EntityResync { entities, out_of_game, forces } = payload;
        let force_ids: Option<Vec<_>> = forces.as_ref().map(|f| f.iter().map(|f| f.id).collect());

        self.game.replace_all_entities(entities, out_of_game, forces);

        self.names.clear();
        let local = self.local_player;
        for entity in self.game.entities().filter(|e| Some(e.owner_id) == local) {
            self.names.adopt(entity);
        }

        tracing::debug!(entities = self.game.entity_count(), tracked = self.names.len(), "entities resynced");
        out.push(ClientAction::Notify(GameEvent::EntitiesReplaced));
        if let Some(force_ids) = force_ids {
            out.push(ClientAction::Notify(GameEvent::ForcesChanged { force_ids }));
        }
    }

    pub(super) fn on_entities_added(&mut self, payload: EntitiesAdded, out: &mut Actions) {
        let EntitiesAdded { entity_ids, mut entities, forces } = payload;
        let ids_match = entity_ids.len() == entities.len()
            && entity_ids.iter().zip(&entities).all(|(id, e)| *id == e.id);
        if !ids_match {
            tracing::warn!(
                ids = entity_ids.len(),
                records = entities.len(),
                "entity add ids do not match records, skipped"
            );
            return;
        }

        let mut renamed = BTreeSet::new();
        for entity in &mut entities {
            if self.is_local(entity) {
                let received = entity.duplicate_marker;
                renamed.extend(self.names.add(entity));
                if entity.duplicate_marker != received {
                    renamed.insert(entity.id);
                }
            }
        }

        let added = self.game.add_entities(entities);
        let force_ids: Vec<_> = forces.iter().map(|f| f.id).collect();
        for force in forces {
            self.game.replace_force(force);
        }

        for entity_id in added.into_iter().filter(|id| !renamed.contains(id)) {
            out.push(ClientAction::Notify(GameEvent::EntityChanged { entity_id }));
        }
        if !force_ids.is_empty() {
            out.push(ClientAction::Notify(GameEvent::ForcesChanged { force_ids }));
        }
        self.correct_names(renamed, out);
    }

    pub(super) fn on_entity_update(&mut self, payload: EntityUpdate, out: &mut Actions) {
        let EntityUpdate { entity_id, entity, movement_path } = payload;
        if entity.id != entity_id {
            tracing::warn!(entity_id, record_id = entity.id, "entity update id mismatch, skipped");
            return;
        }
        if !movement_path.is_empty() {
            tracing::trace!(entity_id, steps = movement_path.len(), "entity moved");
        }
        if self.merge_entity(entity) {
            out.push(ClientAction::Notify(GameEvent::EntityChanged { entity_id }));
        }
    }

    pub(super) fn on_entity_batch(&mut self, payload: EntityBatch, out: &mut Actions) {
        for entity in payload.entities {
            let entity_id = entity.id;
            if self.merge_entity(entity) {
                out.push(ClientAction::Notify(GameEvent::EntityChanged { entity_id }));
            }
        }
    }

    pub(super) fn on_entities_removed(&mut self, payload: EntitiesRemoved, out: &mut Actions) {
        let EntitiesRemoved { entity_ids, reason, forces } = payload;

        let mut renamed = BTreeSet::new();
        for &entity_id in &entity_ids {
            renamed.extend(self.names.remove(entity_id));
        }

        let removed = self.game.remove_entities(&entity_ids, reason);
        let force_ids: Vec<_> = forces.iter().map(|f| f.id).collect();
        for force in forces {
            self.game.replace_force(force);
        }

        if !removed.is_empty() {
            out.push(ClientAction::Notify(GameEvent::EntitiesRemoved { entity_ids: removed, reason }));
        }
        if !force_ids.is_empty() {
            out.push(ClientAction::Notify(GameEvent::ForcesChanged { force_ids }));
        }
        self.correct_names(renamed, out);
    }

    pub(super) fn on_visibility(&mut self, payload: VisibilityIndicator, out: &mut Actions) {
        let entity_id = payload.entity_id;
        let visibility = Visibility {
            ever_seen_by_enemy: payload.ever_seen_by_enemy,
            visible_to_enemy: payload.visible_to_enemy,
            detected_by_enemy: payload.detected_by_enemy,
            seen_by: payload.seen_by,
            detected_by: payload.detected_by,
        };
        if self.game.set_visibility(entity_id, visibility) {
            out.push(ClientAction::Notify(GameEvent::EntityChanged { entity_id }));
        } else {
            tracing::debug!(entity_id, "visibility for unknown entity ignored");
        }
    }

    pub(super) fn on_nova_network(&mut self, payload: NovaNetwork, out: &mut Actions) {
        let NovaNetwork { entity_id, network } = payload;
        if self.game.set_pending_nova_network(entity_id, Some(network)) {
            out.push(ClientAction::Notify(GameEvent::EntityChanged { entity_id }));
        } else {
            tracing::debug!(entity_id, "nova network for unknown entity ignored");
        }
    }

    pub(super) fn on_attacks(&mut self, payload: AttackBatch, out: &mut Actions) {
        let AttackBatch { actions, queue } = payload;
        for action in actions {
            let entity_id = action.entity_id();
            if action.is_immediate() && self.game.apply_immediate_action(&action) {
                out.push(ClientAction::Notify(GameEvent::EntityChanged { entity_id }));
                continue;
            }

            match queue {
                NORMAL_QUEUE => self.game.queue_action(action),
                CHARGE_QUEUE => self.game.queue_charge(action),
                other => tracing::warn!(entity_id, queue = other, "unknown action queue, dropped"),
            }
        }
    }

    /// Replace a known entity, keeping the marker the tracker assigned.
    ///
    /// Returns `false` for entities this client does not know.
    pub(super) fn merge_entity(&mut self, mut entity: Entity) -> bool {
        if self.game.entity(entity.id).is_none() {
            tracing::debug!(entity_id = entity.id, "update for unknown entity ignored");
            return false;
        }
        if let Some(marker) = self.names.marker(entity.id) {
            entity.duplicate_marker = marker;
        }
        self.game.upsert_entity(entity);
        true
    }

    /// Write markers chosen by the tracker and tell the server about them.
    pub(super) fn correct_names(&mut self, renamed: BTreeSet<EntityId>, out: &mut Actions) {
        for entity_id in renamed {
            let Some(marker) = self.names.marker(entity_id) else {
                continue;
            };
            let Some(entity) = self.game.set_duplicate_marker(entity_id, marker) else {
                continue;
            };
            tracing::debug!(entity_id, name = %entity.display_name(), "display name corrected");

            let entity = entity.clone();
            out.push(ClientAction::Notify(GameEvent::EntityChanged { entity_id }));
            out.push(ClientAction::Send(ClientPayload::EntityUpdate(EntityChange { entity })));
        }
    }
}
