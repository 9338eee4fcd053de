//! Display-name disambiguation.
//!
//! Entities sharing a base name (`"<chassis> <model>"`) get numeric
//! suffixes: the first holder of a name keeps it bare, and as soon as a
//! second one arrives the first becomes `#1` and the newcomer `#2`. When
//! holders leave, the survivors are renumbered `1..n` in their previous
//! order, and a lone survivor drops its suffix again.
//!
//! The tracker only decides markers. Writing them into the store and telling
//! the server about renamed entities is the caller's job, which is why every
//! mutation returns the ids whose marker changed.

use std::collections::BTreeMap;

use hexlink_proto::model::{Entity, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Holder {
    entity_id: EntityId,
    marker: u32,
}

/// Tracks which entities currently use each base name.
#[derive(Debug, Clone, Default)]
pub struct NameTracker {
    by_name: BTreeMap<String, Vec<Holder>>,
    names: BTreeMap<EntityId, String>,
}

impl NameTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity, writing its marker.
    ///
    /// Returns the other entities whose marker changed (at most the previous
    /// lone holder of the name). Registering an already tracked entity
    /// changes nothing.
    pub fn add(&mut self, entity: &mut Entity) -> Vec<EntityId> {
        if let Some(marker) = self.marker(entity.id) {
            entity.duplicate_marker = marker;
            return Vec::new();
        }

        let base = entity.base_name();
        let holders = self.by_name.entry(base.clone()).or_default();
        let mut renamed = Vec::new();

        let marker = match holders.as_mut_slice() {
            [] => 0,
            [only] if only.marker == 0 => {
                only.marker = 1;
                renamed.push(only.entity_id);
                2
            },
            existing => existing.iter().map(|h| h.marker).max().unwrap_or(0) + 1,
        };

        holders.push(Holder { entity_id: entity.id, marker });
        entity.duplicate_marker = marker;
        self.names.insert(entity.id, base);

        if marker > 0 {
            tracing::debug!(entity_id = entity.id, marker, "name collision resolved");
        }
        renamed
    }

    /// Record an entity with the marker it already carries.
    ///
    /// Used when the server resends the whole entity list: markers assigned
    /// earlier stay authoritative.
    pub fn adopt(&mut self, entity: &Entity) {
        self.forget(entity.id);

        let base = entity.base_name();
        self.by_name
            .entry(base.clone())
            .or_default()
            .push(Holder { entity_id: entity.id, marker: entity.duplicate_marker });
        self.names.insert(entity.id, base);
    }

    /// Stop tracking an entity.
    ///
    /// Returns the remaining holders of its name whose marker changed.
    pub fn remove(&mut self, entity_id: EntityId) -> Vec<EntityId> {
        let Some(base) = self.names.remove(&entity_id) else {
            return Vec::new();
        };
        let Some(holders) = self.by_name.get_mut(&base) else {
            return Vec::new();
        };

        holders.retain(|h| h.entity_id != entity_id);
        if holders.is_empty() {
            self.by_name.remove(&base);
            return Vec::new();
        }

        holders.sort_by_key(|h| h.marker);
        let single = holders.len() == 1;

        let mut renamed = Vec::new();
        for (position, holder) in holders.iter_mut().enumerate() {
            let marker = if single { 0 } else { position as u32 + 1 };
            if holder.marker != marker {
                holder.marker = marker;
                renamed.push(holder.entity_id);
            }
        }
        renamed
    }

    /// Marker currently assigned to a tracked entity.
    #[must_use]
    pub fn marker(&self, entity_id: EntityId) -> Option<u32> {
        let base = self.names.get(&entity_id)?;
        self.by_name.get(base)?.iter().find(|h| h.entity_id == entity_id).map(|h| h.marker)
    }

    /// Number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Forget everything. Called when the game returns to the lobby.
    pub fn clear(&mut self) {
        self.by_name.clear();
        self.names.clear();
    }

    fn forget(&mut self, entity_id: EntityId) {
        if let Some(base) = self.names.remove(&entity_id)
            && let Some(holders) = self.by_name.get_mut(&base)
        {
            holders.retain(|h| h.entity_id != entity_id);
            if holders.is_empty() {
                self.by_name.remove(&base);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    fn atlas(id: EntityId) -> Entity {
        Entity::new(id, 1, "Atlas", "")
    }

    #[test]
    fn first_holder_keeps_bare_name() {
        let mut tracker = NameTracker::new();
        let mut a = atlas(1);

        assert!(tracker.add(&mut a).is_empty());
        assert_eq!(a.display_name(), "Atlas");
    }

    #[test]
    fn collision_numbers_both_holders() {
        let mut tracker = NameTracker::new();
        let mut first = atlas(6);
        let mut second = atlas(5);

        tracker.add(&mut first);
        let renamed = tracker.add(&mut second);

        assert_eq!(renamed, [6]);
        assert_eq!(tracker.marker(6), Some(1));
        assert_eq!(second.display_name(), "Atlas #2");
    }

    #[test]
    fn third_holder_gets_next_count() {
        let mut tracker = NameTracker::new();
        for id in 1..=2 {
            tracker.add(&mut atlas(id));
        }
        let mut third = atlas(3);

        assert!(tracker.add(&mut third).is_empty());
        assert_eq!(third.duplicate_marker, 3);
    }

    #[test]
    fn removing_collider_restores_bare_name() {
        let mut tracker = NameTracker::new();
        tracker.add(&mut atlas(6));
        tracker.add(&mut atlas(5));

        let renamed = tracker.remove(5);

        assert_eq!(renamed, [6]);
        assert_eq!(tracker.marker(6), Some(0));
    }

    #[test]
    fn removal_renumbers_in_marker_order() {
        let mut tracker = NameTracker::new();
        for id in [10, 11, 12] {
            tracker.add(&mut atlas(id));
        }

        let renamed = tracker.remove(10);

        assert_eq!(renamed, [11, 12]);
        assert_eq!(tracker.marker(11), Some(1));
        assert_eq!(tracker.marker(12), Some(2));
    }

    #[test]
    fn removing_last_holder_renames_nobody() {
        let mut tracker = NameTracker::new();
        tracker.add(&mut atlas(1));

        assert!(tracker.remove(1).is_empty());
        assert!(tracker.is_empty());
        assert!(tracker.remove(1).is_empty());
    }

    #[test]
    fn different_models_do_not_collide() {
        let mut tracker = NameTracker::new();
        let mut a = Entity::new(1, 1, "Atlas", "AS7-D");
        let mut b = Entity::new(2, 1, "Atlas", "AS7-K");

        tracker.add(&mut a);
        assert!(tracker.add(&mut b).is_empty());
        assert_eq!(b.duplicate_marker, 0);
    }

    #[test]
    fn adopt_keeps_existing_marker() {
        let mut tracker = NameTracker::new();
        let mut a = atlas(1);
        a.duplicate_marker = 1;
        let mut b = atlas(2);
        b.duplicate_marker = 2;

        tracker.adopt(&a);
        tracker.adopt(&b);

        assert_eq!(tracker.remove(2), [1]);
        assert_eq!(tracker.marker(1), Some(0));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut tracker = NameTracker::new();
        tracker.add(&mut atlas(1));
        tracker.add(&mut atlas(2));

        tracker.clear();
        let mut fresh = atlas(3);

        assert!(tracker.add(&mut fresh).is_empty());
        assert_eq!(fresh.duplicate_marker, 0);
    }

    proptest! {
        #[test]
        fn tracked_display_names_are_distinct(
            chassis in prop::collection::vec(0u32..4, 1..20),
            removals in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        ) {
            let mut tracker = NameTracker::new();
            let mut live: BTreeMap<EntityId, Entity> = BTreeMap::new();

            for (id, kind) in chassis.iter().enumerate() {
                let mut entity = Entity::new(id as u32, 1, format!("Mech{kind}"), "");
                for other in tracker.add(&mut entity) {
                    if let Some(e) = live.get_mut(&other) {
                        e.duplicate_marker = tracker.marker(other).unwrap_or(0);
                    }
                }
                live.insert(entity.id, entity);
            }

            for index in removals {
                if live.is_empty() {
                    break;
                }
                let id = *index.get(&live.keys().copied().collect::<Vec<_>>());
                live.remove(&id);
                for other in tracker.remove(id) {
                    if let Some(e) = live.get_mut(&other) {
                        e.duplicate_marker = tracker.marker(other).unwrap_or(0);
                    }
                }
            }

            let names: BTreeSet<String> = live.values().map(Entity::display_name).collect();
            prop_assert_eq!(names.len(), live.len());
        }
    }
}
