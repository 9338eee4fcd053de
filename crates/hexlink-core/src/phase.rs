//! Phase transition effects.
//!
//! Phases change only when the server says so. The store records the new
//! phase; this module lists what the runtime has to do on entry. Entering
//! the same phase twice yields the same effects again and nothing else.

use hexlink_proto::model::{GameOptions, GamePhase};

/// Work requested by entering a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEffect {
    /// Send `PlayerReady(done = true)`; the phase only synchronizes clients.
    AcknowledgeReady,
    /// Drop caches only the lobby needs.
    ReleaseLobbyCaches,
    /// Reset display-name disambiguation.
    ResetNameTracker,
    /// Load caches the lobby needs.
    LoadLobbyCaches,
    /// Log a resource checkpoint at debug level.
    Checkpoint(&'static str),
}

/// Effects of entering `phase`, in execution order.
#[must_use]
pub fn entry_effects(phase: GamePhase) -> Vec<PhaseEffect> {
    match phase {
        GamePhase::Exchange | GamePhase::StartingScenario => vec![PhaseEffect::AcknowledgeReady],
        GamePhase::Deployment => {
            vec![PhaseEffect::ReleaseLobbyCaches, PhaseEffect::Checkpoint(phase.label())]
        },
        GamePhase::Lounge => vec![PhaseEffect::ResetNameTracker, PhaseEffect::LoadLobbyCaches],
        GamePhase::Targeting
        | GamePhase::Movement
        | GamePhase::Offboard
        | GamePhase::Firing
        | GamePhase::Physical => vec![PhaseEffect::Checkpoint(phase.label())],
        _ => Vec::new(),
    }
}

/// Option that makes `phase` simultaneous, if one exists.
#[must_use]
pub const fn simultaneous_option(phase: GamePhase) -> Option<&'static str> {
    match phase {
        GamePhase::Deployment => Some("simultaneous_deployment"),
        GamePhase::Targeting | GamePhase::Offboard => Some("simultaneous_targeting"),
        GamePhase::Movement => Some("simultaneous_movement"),
        GamePhase::Firing => Some("simultaneous_firing"),
        GamePhase::Physical => Some("simultaneous_physical"),
        _ => None,
    }
}

/// Whether every player acts at once in `phase`.
///
/// In simultaneous phases each player works through their own turns, so the
/// shared turn cursor does not decide whose turn it is.
#[must_use]
pub fn is_simultaneous(phase: GamePhase, options: &GameOptions) -> bool {
    simultaneous_option(phase).is_some_and(|name| options.flag(name))
}

#[cfg(test)]
mod tests {
    use hexlink_proto::model::OptionValue;

    use super::*;

    #[test]
    fn sync_phases_acknowledge_ready() {
        assert_eq!(entry_effects(GamePhase::Exchange), [PhaseEffect::AcknowledgeReady]);
        assert_eq!(entry_effects(GamePhase::StartingScenario), [PhaseEffect::AcknowledgeReady]);
    }

    #[test]
    fn lounge_resets_names_and_loads_caches() {
        assert_eq!(
            entry_effects(GamePhase::Lounge),
            [PhaseEffect::ResetNameTracker, PhaseEffect::LoadLobbyCaches]
        );
    }

    #[test]
    fn deployment_releases_lobby_caches() {
        assert_eq!(
            entry_effects(GamePhase::Deployment),
            [PhaseEffect::ReleaseLobbyCaches, PhaseEffect::Checkpoint("deployment")]
        );
    }

    #[test]
    fn action_phases_checkpoint() {
        for phase in [
            GamePhase::Targeting,
            GamePhase::Movement,
            GamePhase::Offboard,
            GamePhase::Firing,
            GamePhase::Physical,
        ] {
            assert_eq!(entry_effects(phase), [PhaseEffect::Checkpoint(phase.label())]);
        }
    }

    #[test]
    fn report_phases_have_no_effects() {
        assert!(entry_effects(GamePhase::MovementReport).is_empty());
        assert!(entry_effects(GamePhase::Victory).is_empty());
    }

    #[test]
    fn effects_are_stable_across_repeats() {
        assert_eq!(entry_effects(GamePhase::Lounge), entry_effects(GamePhase::Lounge));
    }

    #[test]
    fn simultaneous_follows_options() {
        let mut options = GameOptions::default();
        assert!(!is_simultaneous(GamePhase::Movement, &options));

        options.set("simultaneous_movement", OptionValue::Bool(true));
        assert!(is_simultaneous(GamePhase::Movement, &options));
        assert!(!is_simultaneous(GamePhase::Firing, &options));
        assert!(!is_simultaneous(GamePhase::Lounge, &options));
    }
}
