//! Force tree.
//!
//! Forces form a forest: each force has at most one parent, and a parent
//! lists its children in `sub_forces`. Both directions are kept in sync on
//! every mutation. An entity id appears in at most one force's `entities`.

use std::collections::{BTreeMap, BTreeSet};

use hexlink_proto::model::{EntityId, Force, ForceId};

/// All known forces, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forces {
    forces: BTreeMap<ForceId, Force>,
}

impl Forces {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force by id.
    #[must_use]
    pub fn get(&self, id: ForceId) -> Option<&Force> {
        self.forces.get(&id)
    }

    /// Whether the force is known.
    #[must_use]
    pub fn contains(&self, id: ForceId) -> bool {
        self.forces.contains_key(&id)
    }

    /// Forces in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Force> {
        self.forces.values()
    }

    /// Number of forces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forces.len()
    }

    /// Whether no force is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Drop every force.
    pub fn clear(&mut self) {
        self.forces.clear();
    }

    /// Force whose member list contains the entity.
    #[must_use]
    pub fn force_of(&self, entity_id: EntityId) -> Option<ForceId> {
        self.forces.values().find(|f| f.entities.contains(&entity_id)).map(|f| f.id)
    }

    /// Insert or replace a force record.
    ///
    /// Members listed by the record are taken out of any other force. A
    /// parent that would create a cycle is dropped and the force becomes top
    /// level. Returns `false` if the parent had to be dropped.
    pub fn replace(&mut self, mut force: Force) -> bool {
        let mut parent_kept = true;
        if let Some(parent) = force.parent
            && (parent == force.id || self.is_descendant(parent, force.id))
        {
            tracing::warn!(force_id = force.id, parent, "force parent would form a cycle");
            force.parent = None;
            parent_kept = false;
        }

        for other in self.forces.values_mut().filter(|f| f.id != force.id) {
            other.entities.retain(|e| !force.entities.contains(e));
        }

        let old_parent = self.forces.get(&force.id).and_then(|f| f.parent);
        if old_parent != force.parent
            && let Some(old) = old_parent.and_then(|p| self.forces.get_mut(&p))
        {
            old.sub_forces.retain(|&c| c != force.id);
        }
        if let Some(parent) = force.parent.and_then(|p| self.forces.get_mut(&p))
            && !parent.sub_forces.contains(&force.id)
        {
            parent.sub_forces.push(force.id);
        }

        // Children that arrived before their parent.
        for child in self.forces.values().filter(|f| f.parent == Some(force.id)) {
            if !force.sub_forces.contains(&child.id) {
                force.sub_forces.push(child.id);
            }
        }

        self.forces.insert(force.id, force);
        parent_kept
    }

    /// Put an entity into a force, taking it out of any other.
    ///
    /// Returns `false` if the force is unknown; the entity is then left
    /// where it was.
    pub fn add_entity(&mut self, force_id: ForceId, entity_id: EntityId) -> bool {
        if !self.forces.contains_key(&force_id) {
            return false;
        }
        for force in self.forces.values_mut() {
            if force.id == force_id {
                if !force.entities.contains(&entity_id) {
                    force.entities.push(entity_id);
                }
            } else {
                force.entities.retain(|&e| e != entity_id);
            }
        }
        true
    }

    /// Take an entity out of whatever force holds it.
    pub fn remove_entity(&mut self, entity_id: EntityId) {
        for force in self.forces.values_mut() {
            force.entities.retain(|&e| e != entity_id);
        }
    }

    /// The force and all its sub-forces, parents before children.
    #[must_use]
    pub fn subtree(&self, root: ForceId) -> Vec<ForceId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        let mut seen = BTreeSet::new();
        while let Some(id) = stack.pop() {
            let Some(force) = self.forces.get(&id) else {
                continue;
            };
            if !seen.insert(id) {
                continue;
            }
            out.push(id);
            stack.extend(force.sub_forces.iter().rev());
        }
        out
    }

    /// Every entity held by the given forces or any of their sub-forces.
    #[must_use]
    pub fn transitive_entities(&self, roots: &[ForceId]) -> BTreeSet<EntityId> {
        roots
            .iter()
            .flat_map(|&root| self.subtree(root))
            .filter_map(|id| self.forces.get(&id))
            .flat_map(|f| f.entities.iter().copied())
            .collect()
    }

    /// Delete forces with all their sub-forces.
    ///
    /// Returns the deleted force ids and the entities they held; the caller
    /// removes those entities from the game.
    pub fn delete(&mut self, roots: &[ForceId]) -> (Vec<ForceId>, BTreeSet<EntityId>) {
        let entities = self.transitive_entities(roots);

        let mut deleted = Vec::new();
        for &root in roots {
            for id in self.subtree(root) {
                if let Some(force) = self.forces.remove(&id) {
                    if let Some(parent) = force.parent.and_then(|p| self.forces.get_mut(&p)) {
                        parent.sub_forces.retain(|&c| c != id);
                    }
                    deleted.push(id);
                }
            }
        }
        (deleted, entities)
    }

    fn is_descendant(&self, candidate: ForceId, ancestor: ForceId) -> bool {
        let mut current = Some(candidate);
        let mut steps = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.forces.len() {
                return false;
            }
            current = self.forces.get(&id).and_then(|f| f.parent);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn force(id: ForceId, parent: Option<ForceId>, entities: &[EntityId]) -> Force {
        let mut f = Force::new(id, format!("Force {id}"), 1);
        f.parent = parent;
        f.entities = entities.to_vec();
        f
    }

    fn tree() -> Forces {
        // 1 ─┬─ 2 ── 4
        //    └─ 3
        // 5
        let mut forces = Forces::new();
        forces.replace(force(1, None, &[10]));
        forces.replace(force(2, Some(1), &[20, 21]));
        forces.replace(force(3, Some(1), &[30]));
        forces.replace(force(4, Some(2), &[40]));
        forces.replace(force(5, None, &[50]));
        forces
    }

    #[test]
    fn replace_links_parent_and_child() {
        let forces = tree();
        assert_eq!(forces.get(1).map(|f| f.sub_forces.clone()), Some(vec![2, 3]));
        assert_eq!(forces.get(2).map(|f| f.sub_forces.clone()), Some(vec![4]));
    }

    #[test]
    fn child_before_parent_is_linked_when_parent_arrives() {
        let mut forces = Forces::new();
        forces.replace(force(7, Some(6), &[]));
        forces.replace(force(6, None, &[]));

        assert_eq!(forces.get(6).map(|f| f.sub_forces.clone()), Some(vec![7]));
    }

    #[test]
    fn membership_is_exclusive() {
        let mut forces = tree();
        forces.replace(force(5, None, &[50, 20]));

        assert_eq!(forces.force_of(20), Some(5));
        assert_eq!(forces.get(2).map(|f| f.entities.clone()), Some(vec![21]));

        assert!(forces.add_entity(3, 50));
        assert_eq!(forces.force_of(50), Some(3));
        assert!(!forces.add_entity(99, 50));
    }

    #[test]
    fn reparent_moves_child_link() {
        let mut forces = tree();
        forces.replace(force(4, Some(3), &[40]));

        assert_eq!(forces.get(2).map(|f| f.sub_forces.clone()), Some(vec![]));
        assert_eq!(forces.get(3).map(|f| f.sub_forces.clone()), Some(vec![4]));
    }

    #[test]
    fn cyclic_parent_dropped() {
        let mut forces = tree();
        assert!(!forces.replace(force(1, Some(4), &[10])));
        assert_eq!(forces.get(1).and_then(|f| f.parent), None);
    }

    #[test]
    fn delete_cascades_to_subtree_only() {
        let mut forces = tree();
        let (deleted, entities) = forces.delete(&[2]);

        assert_eq!(deleted, [2, 4]);
        assert_eq!(entities.into_iter().collect::<Vec<_>>(), [20, 21, 40]);
        assert_eq!(forces.get(1).map(|f| f.sub_forces.clone()), Some(vec![3]));
        assert!(forces.contains(3));
        assert!(forces.contains(5));
    }

    #[test]
    fn delete_unknown_force_is_noop() {
        let mut forces = tree();
        let (deleted, entities) = forces.delete(&[99]);
        assert!(deleted.is_empty());
        assert!(entities.is_empty());
        assert_eq!(forces.len(), 5);
    }

    proptest! {
        #[test]
        fn delete_removes_exactly_the_subtree(
            parents in prop::collection::vec(prop::option::of(0usize..8), 1..8),
            victim in 0usize..8,
        ) {
            let mut forces = Forces::new();
            for (index, parent) in parents.iter().enumerate() {
                let id = index as ForceId + 1;
                let parent = parent.filter(|&p| p < index).map(|p| p as ForceId + 1);
                forces.replace(force(id, parent, &[id * 100]));
            }
            let victim = (victim % parents.len()) as ForceId + 1;

            let expected: BTreeSet<EntityId> =
                forces.subtree(victim).iter().map(|id| id * 100).collect();
            let survivors_before: BTreeSet<EntityId> = forces
                .iter()
                .flat_map(|f| f.entities.iter().copied())
                .filter(|e| !expected.contains(e))
                .collect();

            let (_, removed) = forces.delete(&[victim]);
            let survivors_after: BTreeSet<EntityId> =
                forces.iter().flat_map(|f| f.entities.iter().copied()).collect();

            prop_assert_eq!(removed, expected);
            prop_assert_eq!(survivors_after, survivors_before);
        }
    }
}
