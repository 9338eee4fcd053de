//! Local mirror of the authoritative game state.
//!
//! [`GameState`] is owned by exactly one client and mutated only through the
//! methods below, each named by its effect. Every method leaves the store
//! consistent on return:
//!
//! - no entity references a deleted force,
//! - an entity is a member of at most one force,
//! - the turn cursor is inside the turn queue (or 0 when it is empty),
//! - hex patches never write outside the board.
//!
//! Operations on unknown ids are no-ops and say so in their return value;
//! double-blind play routinely references entities this client cannot see.

mod actions;
mod entities;
mod forces;
mod reports;
mod turns;
mod world;

use std::collections::BTreeMap;

pub use actions::ActionQueues;
use hexlink_proto::model::{
    Board, Entity, EntityAction, EntityId, GameOptions, GamePhase, MapSettings, OutOfGameEntity,
    PlanetaryConditions, Player, PlayerId, Report, TurnDescriptor, TurnKind,
};
pub use forces::Forces;
pub use reports::{EntityIconLookup, ReportLog, render, resolve_entity_placeholders};
pub use turns::TurnQueue;
pub use world::World;

use crate::phase;

/// Outcome recorded at the end of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    /// Winning player, if a single player won.
    pub victory_player: Option<PlayerId>,
    /// Winning team, if a team won.
    pub victory_team: Option<u32>,
}

/// The client's copy of the shared game state.
#[derive(Debug, Clone)]
pub struct GameState {
    entities: BTreeMap<EntityId, Entity>,
    out_of_game: Vec<OutOfGameEntity>,
    forces: Forces,
    players: BTreeMap<PlayerId, Player>,
    board: Board,
    world: World,
    turns: TurnQueue,
    phase: GamePhase,
    round: u32,
    reports: ReportLog,
    actions: ActionQueues,
    options: GameOptions,
    map_settings: Option<MapSettings>,
    planetary_conditions: Option<PlanetaryConditions>,
    result: Option<GameResult>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Empty state, phase [`GamePhase::Unknown`], round 0.
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            out_of_game: Vec::new(),
            forces: Forces::new(),
            players: BTreeMap::new(),
            board: Board::default(),
            world: World::default(),
            turns: TurnQueue::new(),
            phase: GamePhase::Unknown,
            round: 0,
            reports: ReportLog::new(),
            actions: ActionQueues::default(),
            options: GameOptions::default(),
            map_settings: None,
            planetary_conditions: None,
            result: None,
        }
    }

    /// Live entity by id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Live entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entities that left the game, oldest first.
    #[must_use]
    pub fn out_of_game(&self) -> &[OutOfGameEntity] {
        &self.out_of_game
    }

    /// Force tree.
    #[must_use]
    pub fn forces(&self) -> &Forces {
        &self.forces
    }

    /// Player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Players in id order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Hex grid.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Overlays on the hex grid.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Turn queue.
    #[must_use]
    pub fn turns(&self) -> &TurnQueue {
        &self.turns
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current round.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Report log.
    #[must_use]
    pub fn reports(&self) -> &ReportLog {
        &self.reports
    }

    /// Declared actions awaiting resolution.
    #[must_use]
    pub fn actions(&self) -> &ActionQueues {
        &self.actions
    }

    /// Game options.
    #[must_use]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    /// Map settings, once received.
    #[must_use]
    pub fn map_settings(&self) -> Option<&MapSettings> {
        self.map_settings.as_ref()
    }

    /// Weather and light, once received.
    #[must_use]
    pub fn planetary_conditions(&self) -> Option<&PlanetaryConditions> {
        self.planetary_conditions.as_ref()
    }

    /// Final result, once the game ended.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Enter a phase. Returns `false` if it was already current, in which
    /// case nothing changes.
    ///
    /// Pending action queues belong to one phase and are emptied on change.
    pub fn set_phase(&mut self, phase: GamePhase) -> bool {
        if self.phase == phase {
            return false;
        }
        self.phase = phase;
        self.actions.clear();
        true
    }

    /// Set the round counter.
    pub fn set_round(&mut self, round: u32) {
        self.round = round;
    }

    /// Move the turn cursor; returns the index applied after clamping.
    pub fn advance_turn(&mut self, index: usize, previous_player: Option<PlayerId>) -> usize {
        self.turns.advance(index, previous_player)
    }

    /// Replace the turn queue, clamping the cursor.
    pub fn replace_turns(&mut self, turns: Vec<TurnDescriptor>) {
        self.turns.replace(turns);
    }

    /// Whether players act at once in the current phase.
    #[must_use]
    pub fn is_simultaneous(&self) -> bool {
        phase::is_simultaneous(self.phase, &self.options)
    }

    /// Turn the player should take now, if any.
    ///
    /// Simultaneous phases look up the player's own next turn; otherwise it
    /// is the turn under the cursor, if it belongs to the player.
    #[must_use]
    pub fn my_turn(&self, player_id: PlayerId) -> Option<&TurnDescriptor> {
        if self.is_simultaneous() {
            self.turns.next_for(player_id)
        } else {
            self.turns.current().filter(|t| t.is_for(player_id))
        }
    }

    /// Whether the player may act now.
    #[must_use]
    pub fn is_my_turn(&self, player_id: PlayerId) -> bool {
        self.my_turn(player_id).is_some()
    }

    /// Whether the current turn lets the player unload stranded units.
    #[must_use]
    pub fn can_unload_stranded(&self, player_id: PlayerId) -> bool {
        self.turns.current().is_some_and(|t| {
            matches!(t.kind, TurnKind::UnloadStranded { .. }) && t.is_for(player_id)
        })
    }

    /// Insert or replace a player.
    pub fn upsert_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    /// Remove a player; returns the record if it was known.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Option<Player> {
        self.players.remove(&player_id)
    }

    /// Set a known player's done flag. Returns whether the player exists.
    pub fn set_player_done(&mut self, player_id: PlayerId, done: bool) -> bool {
        match self.players.get_mut(&player_id) {
            Some(player) => {
                player.done = done;
                true
            },
            None => false,
        }
    }

    /// Replace the game options.
    pub fn set_options(&mut self, options: GameOptions) {
        self.options = options;
    }

    /// Replace the map settings.
    pub fn set_map_settings(&mut self, settings: MapSettings) {
        self.map_settings = Some(settings);
    }

    /// Replace the planetary conditions.
    pub fn set_planetary_conditions(&mut self, conditions: PlanetaryConditions) {
        self.planetary_conditions = Some(conditions);
    }

    /// Append one phase of report fragments to the current round.
    pub fn add_reports(&mut self, reports: Vec<Report>) {
        self.reports.add(self.round, reports);
    }

    /// Replace the whole report log; the views show the current round.
    pub fn set_all_reports(&mut self, rounds: Vec<Vec<Report>>) {
        self.reports.set_all(self.round, rounds);
    }

    /// Queue an action for resolution this phase.
    pub fn queue_action(&mut self, action: EntityAction) {
        self.actions.push_normal(action);
    }

    /// Queue a charge, resolved after movement.
    pub fn queue_charge(&mut self, action: EntityAction) {
        self.actions.push_charge(action);
    }

    /// Record the final result and enter [`GamePhase::Victory`].
    pub fn end_game(&mut self, victory_player: Option<PlayerId>, victory_team: Option<u32>) {
        self.result = Some(GameResult { victory_player, victory_team });
        self.set_phase(GamePhase::Victory);
    }
}
