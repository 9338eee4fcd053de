//! Force tree updates and cascading deletes.

use std::collections::BTreeSet;

use hexlink_core::GameEvent;
use hexlink_proto::{
    model::{ForceId, RemovalReason},
    payloads::force::ForceUpdate,
};

use super::{Actions, Client};
use crate::event::ClientAction;

impl Client {
    pub(super) fn on_force_update(&mut self, payload: ForceUpdate, out: &mut Actions) {
        let ForceUpdate { forces, entities } = payload;

        let force_ids: Vec<_> = forces.iter().map(|f| f.id).collect();
        for force in forces {
            self.game.replace_force(force);
        }
        for entity in entities {
            let entity_id = entity.id;
            if self.merge_entity(entity) {
                out.push(ClientAction::Notify(GameEvent::EntityChanged { entity_id }));
            }
        }

        if !force_ids.is_empty() {
            out.push(ClientAction::Notify(GameEvent::ForcesChanged { force_ids }));
        }
    }

    pub(super) fn on_force_delete(&mut self, force_ids: &[ForceId], out: &mut Actions) {
        let (deleted, removed) = self.game.delete_forces(force_ids);
        if deleted.is_empty() {
            tracing::debug!(?force_ids, "delete of unknown forces ignored");
            return;
        }

        let mut renamed = BTreeSet::new();
        for &entity_id in &removed {
            renamed.extend(self.names.remove(entity_id));
        }

        tracing::debug!(forces = deleted.len(), entities = removed.len(), "forces deleted");
        out.push(ClientAction::Notify(GameEvent::ForcesChanged { force_ids: deleted }));
        if !removed.is_empty() {
            out.push(ClientAction::Notify(GameEvent::EntitiesRemoved {
                entity_ids: removed,
                reason: RemovalReason::NeverJoined,
            }));
        }
        self.correct_names(renamed, out);
    }
}

#[cfg(test)]
mod tests {
    use hexlink_proto::{
        ServerPayload,
        model::{Entity, Force},
        payloads::{entity::EntitiesAdded, force::ForceIds},
    };

    use super::*;
    use crate::client::tests::{connected_client, inbound, notifications};

    fn force(id: ForceId, parent: Option<ForceId>, entities: Vec<u32>) -> Force {
        Force { parent, entities, ..Force::new(id, format!("Force {id}"), 1) }
    }

    fn member(id: u32, force_id: ForceId) -> Entity {
        Entity { force_id: Some(force_id), ..Entity::new(id, 2, "Commando", "") }
    }

    #[test]
    fn delete_removes_transitive_members_only() {
        let mut client = connected_client();
        client.handle(inbound(ServerPayload::ForceUpdate(ForceUpdate {
            forces: vec![force(1, None, vec![10]), force(2, Some(1), vec![11]), force(3, None, vec![12])],
            entities: Vec::new(),
        })));
        let entities = vec![member(10, 1), member(11, 2), member(12, 3)];
        client.handle(inbound(ServerPayload::EntityAdd(EntitiesAdded {
            entity_ids: vec![10, 11, 12],
            entities,
            forces: Vec::new(),
        })));

        let actions = client.handle(inbound(ServerPayload::ForceDelete(ForceIds { force_ids: vec![1] })));

        let remaining: Vec<_> = client.game().entities().map(|e| e.id).collect();
        assert_eq!(remaining, [12]);
        assert!(!client.game().forces().contains(1));
        assert!(!client.game().forces().contains(2));
        assert!(client.game().forces().contains(3));
        assert!(notifications(&actions).contains(&&GameEvent::EntitiesRemoved {
            entity_ids: vec![10, 11],
            reason: RemovalReason::NeverJoined,
        }));
    }

    #[test]
    fn delete_of_unknown_force_is_noop() {
        let mut client = connected_client();
        let actions = client.handle(inbound(ServerPayload::ForceDelete(ForceIds { force_ids: vec![9] })));
        assert!(actions.is_empty());
    }

    #[test]
    fn update_skips_unknown_entities() {
        let mut client = connected_client();
        let actions = client.handle(inbound(ServerPayload::ForceUpdate(ForceUpdate {
            forces: vec![force(4, None, Vec::new())],
            entities: vec![member(40, 4)],
        })));

        assert_eq!(notifications(&actions), [&GameEvent::ForcesChanged { force_ids: vec![4] }]);
        assert!(client.game().entity(40).is_none());
    }
}
