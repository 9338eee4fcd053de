//! Turn queue and cursor.

use hexlink_proto::model::{EntityId, PlayerId, TurnDescriptor};

/// Ordered turn schedule of the current phase.
///
/// The cursor always satisfies `index < turns.len()`, or `index == 0` when
/// the queue is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnQueue {
    turns: Vec<TurnDescriptor>,
    index: usize,
    previous_player: Option<PlayerId>,
}

impl TurnQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the schedule, clamping the cursor.
    pub fn replace(&mut self, turns: Vec<TurnDescriptor>) {
        self.turns = turns;
        self.clamp();
    }

    /// Move the cursor. Out-of-range indexes are clamped to the last turn.
    ///
    /// Returns the index actually applied.
    pub fn advance(&mut self, index: usize, previous_player: Option<PlayerId>) -> usize {
        if index >= self.turns.len() && !self.turns.is_empty() {
            tracing::debug!(index, len = self.turns.len(), "turn index past end of queue");
        }
        self.index = index;
        self.previous_player = previous_player;
        self.clamp();
        self.index
    }

    /// Drop turns that can only be taken by entities in `removed`.
    ///
    /// Returns how many turns were dropped.
    pub fn remove_orphaned(&mut self, removed: &[EntityId]) -> usize {
        let before = self.turns.len();
        let cursor = self.index;
        let mut position = 0;
        let mut dropped_before_cursor = 0;
        self.turns.retain(|turn| {
            let keep = !turn.is_orphaned_by(removed);
            if !keep && position < cursor {
                dropped_before_cursor += 1;
            }
            position += 1;
            keep
        });
        self.index = cursor - dropped_before_cursor;
        self.clamp();
        before - self.turns.len()
    }

    /// Turn under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&TurnDescriptor> {
        self.turns.get(self.index)
    }

    /// Cursor position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Player who acted last.
    #[must_use]
    pub fn previous_player(&self) -> Option<PlayerId> {
        self.previous_player
    }

    /// Scheduled turns.
    #[must_use]
    pub fn turns(&self) -> &[TurnDescriptor] {
        &self.turns
    }

    /// Number of scheduled turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// First turn from the cursor on that the player may take.
    ///
    /// Used in simultaneous phases, where players do not wait for the cursor.
    #[must_use]
    pub fn next_for(&self, player_id: PlayerId) -> Option<&TurnDescriptor> {
        self.turns.iter().skip(self.index).find(|t| t.is_for(player_id))
    }

    fn clamp(&mut self) {
        self.index = self.index.min(self.turns.len().saturating_sub(1));
    }
}
