//! Declared actions waiting for resolution.

use hexlink_proto::model::EntityAction;

/// Normal attacks and charges, kept apart because they resolve at different
/// points of the round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionQueues {
    normal: Vec<EntityAction>,
    charges: Vec<EntityAction>,
}

impl ActionQueues {
    /// Append to the normal queue.
    pub fn push_normal(&mut self, action: EntityAction) {
        self.normal.push(action);
    }

    /// Append to the charge queue.
    pub fn push_charge(&mut self, action: EntityAction) {
        self.charges.push(action);
    }

    /// Actions resolved in the current phase.
    #[must_use]
    pub fn normal(&self) -> &[EntityAction] {
        &self.normal
    }

    /// Charges resolved after movement.
    #[must_use]
    pub fn charges(&self) -> &[EntityAction] {
        &self.charges
    }

    /// Empty both queues.
    pub fn clear(&mut self) {
        self.normal.clear();
        self.charges.clear();
    }
}
