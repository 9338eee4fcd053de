//! Command tags carried in the frame header.
//!
//! Tags are stable small integers grouped by concern in the high byte. A tag
//! never changes value once released; new tags take the next free slot in
//! their group.

/// Identifies the payload type of a frame.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandTag {
    // Session and handshake
    /// Either side is going away.
    CloseConnection = 0x0001,
    /// Server asks for the client's version.
    ServerVersionCheck = 0x0002,
    /// Client version and build identity.
    ClientVersions = 0x0003,
    /// Server accepted the client version.
    ServerGreeting = 0x0004,
    /// Client display name and automation flag.
    ClientName = 0x0005,
    /// Server rejected the client version.
    IllegalClientVersion = 0x0006,
    /// Server renamed the client to avoid a clash.
    ServerCorrectName = 0x0007,
    /// Server assigned the local player id.
    LocalPlayerNumber = 0x0008,

    // Player roster
    /// Player joined.
    PlayerAdd = 0x0101,
    /// Player record changed.
    PlayerUpdate = 0x0102,
    /// Player left.
    PlayerRemove = 0x0103,
    /// Ready/done flag.
    PlayerReady = 0x0104,
    /// Move players to another team.
    PlayerTeamChange = 0x0105,
    /// Chat line.
    Chat = 0x0106,
    /// Pass initiative to the next player on the team.
    ForwardInitiative = 0x0107,
    /// Ask for an initiative reroll.
    RerollInitiative = 0x0108,
    /// Custom initiative settings for a player.
    CustomInitiative = 0x0109,

    // Entity lifecycle and settings
    /// Full entity resync.
    SendingEntities = 0x0201,
    /// Entities added.
    EntityAdd = 0x0202,
    /// Single entity replaced.
    EntityUpdate = 0x0203,
    /// Several entities replaced.
    EntityMultiUpdate = 0x0204,
    /// Entities removed.
    EntityRemove = 0x0205,
    /// Who can see or detect an entity.
    EntityVisibilityIndicator = 0x0206,
    /// Nova C3 network assignment.
    EntityNovaNetworkChange = 0x0207,
    /// Attack and action batch.
    EntityAttack = 0x0208,
    /// Movement path.
    EntityMove = 0x0209,
    /// Deployment placement.
    EntityDeploy = 0x020a,
    /// Equipment mode change.
    EntityModeChange = 0x020b,
    /// Ammo selection change.
    EntityAmmoChange = 0x020c,
    /// Active sensor change.
    EntitySensorChange = 0x020d,
    /// Active heat sink count.
    EntitySinksChange = 0x020e,
    /// Called shot toggle.
    EntityCalledShotChange = 0x020f,
    /// System mode change.
    EntitySystemModeChange = 0x0210,
    /// Mounted equipment facing change.
    EntityMountedFacingChange = 0x0211,
    /// Reveal a hidden unit in a phase.
    EntityActivateHidden = 0x0212,
    /// Change entity owner.
    EntityAssign = 0x0213,
    /// Load an entity into a transport.
    EntityLoad = 0x0214,
    /// Unload during deployment.
    EntityDeployUnload = 0x0215,
    /// Unload units stranded in a transport.
    UnloadStranded = 0x0216,
    /// Undo this round's deployment.
    ResetRoundDeployment = 0x0217,

    // Forces
    /// Forces and affected entities changed.
    ForceUpdate = 0x0301,
    /// Forces deleted.
    ForceDelete = 0x0302,
    /// New force.
    ForceAdd = 0x0303,
    /// Reparent forces.
    ForceParent = 0x0304,
    /// Reassign forces and their content to a player.
    ForceAssignFull = 0x0305,
    /// Move entities into a force.
    ForceAddEntity = 0x0306,

    // World state
    /// Full board resync.
    SendingBoard = 0x0401,
    /// Single hex replaced.
    ChangeHex = 0x0402,
    /// Several hexes replaced.
    ChangeHexes = 0x0403,
    /// Buildings changed.
    BuildingUpdate = 0x0404,
    /// Buildings collapsed.
    BuildingCollapse = 0x0405,
    /// Detonate a demolition charge.
    BuildingExplode = 0x0406,
    /// Full minefield resync.
    SendingMinefields = 0x0407,
    /// Minefields deployed.
    DeployMinefields = 0x0408,
    /// Minefield became known.
    RevealMinefield = 0x0409,
    /// Minefield cleared.
    RemoveMinefield = 0x040a,
    /// Minefield density changes.
    UpdateMinefields = 0x040b,
    /// Illuminated hex set.
    SendingIlluminatedHexes = 0x040c,
    /// Illumination cleared.
    ClearIlluminatedHexes = 0x040d,
    /// Smoke cloud created.
    AddSmokeCloud = 0x040e,
    /// Map sizes the server can generate.
    SendingAvailableMapSizes = 0x040f,
    /// Special hex display table.
    SendingSpecialHexDisplay = 0x0410,
    /// Add a special hex display.
    SpecialHexDisplayAppend = 0x0411,
    /// Remove a special hex display.
    SpecialHexDisplayDelete = 0x0412,
    /// Hexes pre-designated for artillery auto-hit.
    SetArtilleryAutohitHexes = 0x0413,
    /// Artillery attacks in flight.
    SendingArtilleryAttacks = 0x0414,
    /// Flares in the air.
    SendingFlares = 0x0415,
    /// TAG designations.
    SendingTagInfo = 0x0416,
    /// Clear TAG designations.
    ResetTagInfo = 0x0417,

    // Settings
    /// Game options.
    SendingGameSettings = 0x0501,
    /// Map settings.
    SendingMapSettings = 0x0502,
    /// Planetary conditions.
    SendingPlanetaryConditions = 0x0503,

    // Turns, phases and rounds
    /// Phase changed.
    PhaseChange = 0x0601,
    /// Turn cursor moved.
    Turn = 0x0602,
    /// Round counter changed.
    RoundUpdate = 0x0603,
    /// Full turn queue.
    SendingTurns = 0x0604,

    // Reports
    /// One phase worth of report fragments.
    SendingReports = 0x0701,
    /// Phase report that also announces the round report.
    SendingReportsTacticalGenius = 0x0702,
    /// Out-of-band report.
    SendingReportsSpecial = 0x0703,
    /// Every report of every round.
    SendingReportsAll = 0x0704,

    // Feedback and end of game
    /// Server asks for a decision, or the client answers one.
    ClientFeedbackRequest = 0x0801,
    /// Final status and winners.
    EndOfGame = 0x0802,
    /// Victory announcement.
    GameVictoryEvent = 0x0803,
}

impl CommandTag {
    /// Every tag, in wire order.
    pub const ALL: [Self; 83] = [
        Self::CloseConnection,
        Self::ServerVersionCheck,
        Self::ClientVersions,
        Self::ServerGreeting,
        Self::ClientName,
        Self::IllegalClientVersion,
        Self::ServerCorrectName,
        Self::LocalPlayerNumber,
        Self::PlayerAdd,
        Self::PlayerUpdate,
        Self::PlayerRemove,
        Self::PlayerReady,
        Self::PlayerTeamChange,
        Self::Chat,
        Self::ForwardInitiative,
        Self::RerollInitiative,
        Self::CustomInitiative,
        Self::SendingEntities,
        Self::EntityAdd,
        Self::EntityUpdate,
        Self::EntityMultiUpdate,
        Self::EntityRemove,
        Self::EntityVisibilityIndicator,
        Self::EntityNovaNetworkChange,
        Self::EntityAttack,
        Self::EntityMove,
        Self::EntityDeploy,
        Self::EntityModeChange,
        Self::EntityAmmoChange,
        Self::EntitySensorChange,
        Self::EntitySinksChange,
        Self::EntityCalledShotChange,
        Self::EntitySystemModeChange,
        Self::EntityMountedFacingChange,
        Self::EntityActivateHidden,
        Self::EntityAssign,
        Self::EntityLoad,
        Self::EntityDeployUnload,
        Self::UnloadStranded,
        Self::ResetRoundDeployment,
        Self::ForceUpdate,
        Self::ForceDelete,
        Self::ForceAdd,
        Self::ForceParent,
        Self::ForceAssignFull,
        Self::ForceAddEntity,
        Self::SendingBoard,
        Self::ChangeHex,
        Self::ChangeHexes,
        Self::BuildingUpdate,
        Self::BuildingCollapse,
        Self::BuildingExplode,
        Self::SendingMinefields,
        Self::DeployMinefields,
        Self::RevealMinefield,
        Self::RemoveMinefield,
        Self::UpdateMinefields,
        Self::SendingIlluminatedHexes,
        Self::ClearIlluminatedHexes,
        Self::AddSmokeCloud,
        Self::SendingAvailableMapSizes,
        Self::SendingSpecialHexDisplay,
        Self::SpecialHexDisplayAppend,
        Self::SpecialHexDisplayDelete,
        Self::SetArtilleryAutohitHexes,
        Self::SendingArtilleryAttacks,
        Self::SendingFlares,
        Self::SendingTagInfo,
        Self::ResetTagInfo,
        Self::SendingGameSettings,
        Self::SendingMapSettings,
        Self::SendingPlanetaryConditions,
        Self::PhaseChange,
        Self::Turn,
        Self::RoundUpdate,
        Self::SendingTurns,
        Self::SendingReports,
        Self::SendingReportsTacticalGenius,
        Self::SendingReportsSpecial,
        Self::SendingReportsAll,
        Self::ClientFeedbackRequest,
        Self::EndOfGame,
        Self::GameVictoryEvent,
    ];

    /// Raw wire value.
    #[must_use]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Parse a raw wire value. `None` for tags this build does not know.
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| tag.to_u16() == value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_tag_round_trips() {
        for tag in CommandTag::ALL {
            assert_eq!(CommandTag::from_u16(tag.to_u16()), Some(tag));
        }
    }

    #[test]
    fn wire_values_are_unique() {
        let values: HashSet<u16> = CommandTag::ALL.iter().map(|t| t.to_u16()).collect();
        assert_eq!(values.len(), CommandTag::ALL.len());
    }

    #[test]
    fn unknown_value_is_none() {
        assert_eq!(CommandTag::from_u16(0x0000), None);
        assert_eq!(CommandTag::from_u16(0xfff0), None);
    }
}
