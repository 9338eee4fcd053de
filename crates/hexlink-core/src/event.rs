//! Change notifications for the presentation layer.
//!
//! Handlers describe what changed, not how to draw it. Consumers read the
//! store for details after receiving an event.

use hexlink_proto::model::{
    EntityId, FeedbackRequest, ForceId, GamePhase, PlayerId, RemovalReason,
};

/// Which settings block changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsKind {
    /// Game options.
    GameOptions,
    /// Map settings.
    Map,
    /// Weather and light.
    PlanetaryConditions,
}

/// Which report became available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Reports of the phase that just ended.
    Phase,
    /// Everything reported so far this round.
    Round,
    /// Out-of-band report, e.g. a tactical-genius reroll.
    Special,
}

/// Something in the local game state changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// One entity was added, replaced or modified in place.
    EntityChanged {
        /// Changed entity.
        entity_id: EntityId,
    },
    /// The entity collection was replaced wholesale.
    EntitiesReplaced,
    /// Entities left the game.
    EntitiesRemoved {
        /// Removed entities.
        entity_ids: Vec<EntityId>,
        /// Why they left.
        reason: RemovalReason,
    },
    /// Force records were replaced or deleted.
    ForcesChanged {
        /// Affected forces.
        force_ids: Vec<ForceId>,
    },
    /// Board, buildings, minefields or hex overlays changed.
    BoardChanged,
    /// A settings block was replaced.
    SettingsChanged(SettingsKind),
    /// A player was added or updated.
    PlayerChanged {
        /// Changed player.
        player_id: PlayerId,
    },
    /// A player left.
    PlayerRemoved {
        /// Departed player.
        player_id: PlayerId,
    },
    /// The phase changed.
    PhaseChanged {
        /// New phase.
        phase: GamePhase,
    },
    /// The turn cursor moved.
    TurnChanged {
        /// Player whose turn it now is, if the turn is bound to one.
        player_id: Option<PlayerId>,
    },
    /// The round counter changed.
    RoundChanged {
        /// New round.
        round: u32,
    },
    /// A report is ready to show.
    ReportReady {
        /// Report kind.
        kind: ReportKind,
        /// Rendered text; entity placeholders are left unresolved.
        text: String,
    },
    /// Chat line from the server.
    Chat {
        /// Message text.
        message: String,
    },
    /// The server needs a decision.
    FeedbackRequested(FeedbackRequest),
    /// The game ended.
    GameEnded {
        /// Winning player, if any.
        victory_player: Option<PlayerId>,
        /// Winning team, if any.
        victory_team: Option<u32>,
    },
    /// Victory was announced.
    Victory,
    /// The server changed the local player name.
    NameCorrected {
        /// Name to use from now on.
        name: String,
    },
    /// Handshake completed.
    Connected,
    /// Session ended.
    Disconnected,
    /// The server refused the client version.
    VersionRejected {
        /// Version the server runs.
        server_version: String,
        /// Version this client announced.
        client_version: String,
    },
}
