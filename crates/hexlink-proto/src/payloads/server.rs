use bytes::BufMut;

use super::{
    check_size, decode_cbor, encode_cbor,
    entity::{
        AttackBatch, EntitiesAdded, EntitiesRemoved, EntityBatch, EntityResync, EntityUpdate,
        NovaNetwork, VisibilityIndicator,
    },
    expect_empty,
    force::{ForceIds, ForceUpdate},
    roster::{Chat, PlayerInfo, PlayerReadyState, PlayerRemove},
    session::{CorrectName, IllegalClientVersion, LocalPlayerNumber},
    turn::{AllReports, EndOfGame, PhaseChange, Reports, RoundUpdate, TurnChange, TurnQueue},
    world::{
        ArtilleryAttacks, BoardResync, Buildings, CoordsList, Flares, GameSettings, HexChange,
        HexChanges, MapSettingsRecord, MapSizes, MinefieldRecord, Minefields,
        PlanetaryConditionsRecord, SmokeCloudAdded, SpecialHexDisplays, TagInfos,
    },
};
use crate::{
    CommandTag, Frame, FrameHeader,
    errors::{ProtocolError, Result},
    model::FeedbackRequest,
};

/// Every message the server can send.
///
/// Variant names match their [`CommandTag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerPayload {
    // Session
    /// Server is closing the session.
    CloseConnection,
    /// Server asks for the client version.
    ServerVersionCheck,
    /// Version accepted.
    ServerGreeting,
    /// Version rejected.
    IllegalClientVersion(IllegalClientVersion),
    /// Client renamed.
    ServerCorrectName(CorrectName),
    /// Local player id assigned.
    LocalPlayerNumber(LocalPlayerNumber),

    // Roster
    /// Player joined.
    PlayerAdd(PlayerInfo),
    /// Player changed.
    PlayerUpdate(PlayerInfo),
    /// Player left.
    PlayerRemove(PlayerRemove),
    /// Player done flag.
    PlayerReady(PlayerReadyState),
    /// Chat line.
    Chat(Chat),

    // Entities
    /// Full entity resync.
    SendingEntities(EntityResync),
    /// Entities added.
    EntityAdd(EntitiesAdded),
    /// One entity replaced.
    EntityUpdate(EntityUpdate),
    /// Several entities replaced.
    EntityMultiUpdate(EntityBatch),
    /// Entities removed.
    EntityRemove(EntitiesRemoved),
    /// Visibility of an entity.
    EntityVisibilityIndicator(VisibilityIndicator),
    /// Nova network for next round.
    EntityNovaNetworkChange(NovaNetwork),
    /// Declared actions.
    EntityAttack(AttackBatch),

    // Forces
    /// Forces changed.
    ForceUpdate(ForceUpdate),
    /// Forces deleted.
    ForceDelete(ForceIds),

    // World
    /// Full board resync.
    SendingBoard(BoardResync),
    /// One hex replaced.
    ChangeHex(HexChange),
    /// Several hexes replaced.
    ChangeHexes(HexChanges),
    /// Buildings changed.
    BuildingUpdate(Buildings),
    /// Buildings collapsed at these hexes.
    BuildingCollapse(CoordsList),
    /// Full minefield resync.
    SendingMinefields(Minefields),
    /// Minefields deployed.
    DeployMinefields(Minefields),
    /// Minefield discovered.
    RevealMinefield(MinefieldRecord),
    /// Minefield cleared.
    RemoveMinefield(MinefieldRecord),
    /// Minefield densities changed.
    UpdateMinefields(Minefields),
    /// Illuminated hexes.
    SendingIlluminatedHexes(CoordsList),
    /// Illumination cleared.
    ClearIlluminatedHexes,
    /// Smoke cloud created.
    AddSmokeCloud(SmokeCloudAdded),
    /// Available map sizes.
    SendingAvailableMapSizes(MapSizes),
    /// Special hex display table.
    SendingSpecialHexDisplay(SpecialHexDisplays),
    /// Artillery attacks in flight.
    SendingArtilleryAttacks(ArtilleryAttacks),
    /// Flares.
    SendingFlares(Flares),
    /// TAG designations to add.
    SendingTagInfo(TagInfos),
    /// TAG designations cleared.
    ResetTagInfo,

    // Settings
    /// Game options.
    SendingGameSettings(GameSettings),
    /// Map settings.
    SendingMapSettings(MapSettingsRecord),
    /// Planetary conditions.
    SendingPlanetaryConditions(PlanetaryConditionsRecord),

    // Turns
    /// Phase changed.
    PhaseChange(PhaseChange),
    /// Turn cursor moved.
    Turn(TurnChange),
    /// Round changed.
    RoundUpdate(RoundUpdate),
    /// Turn queue replaced.
    SendingTurns(TurnQueue),

    // Reports
    /// Phase report fragments.
    SendingReports(Reports),
    /// Phase report fragments that also announce the round report.
    SendingReportsTacticalGenius(Reports),
    /// Out-of-band report.
    SendingReportsSpecial(Reports),
    /// All reports.
    SendingReportsAll(AllReports),

    // Feedback and end of game
    /// Decision needed.
    ClientFeedbackRequest(FeedbackRequest),
    /// Game over.
    EndOfGame(EndOfGame),
    /// Victory announced.
    GameVictoryEvent,
}

impl ServerPayload {
    /// Command tag corresponding to this payload type.
    #[must_use]
    pub const fn command(&self) -> CommandTag {
        match self {
            Self::CloseConnection => CommandTag::CloseConnection,
            Self::ServerVersionCheck => CommandTag::ServerVersionCheck,
            Self::ServerGreeting => CommandTag::ServerGreeting,
            Self::IllegalClientVersion(_) => CommandTag::IllegalClientVersion,
            Self::ServerCorrectName(_) => CommandTag::ServerCorrectName,
            Self::LocalPlayerNumber(_) => CommandTag::LocalPlayerNumber,
            Self::PlayerAdd(_) => CommandTag::PlayerAdd,
            Self::PlayerUpdate(_) => CommandTag::PlayerUpdate,
            Self::PlayerRemove(_) => CommandTag::PlayerRemove,
            Self::PlayerReady(_) => CommandTag::PlayerReady,
            Self::Chat(_) => CommandTag::Chat,
            Self::SendingEntities(_) => CommandTag::SendingEntities,
            Self::EntityAdd(_) => CommandTag::EntityAdd,
            Self::EntityUpdate(_) => CommandTag::EntityUpdate,
            Self::EntityMultiUpdate(_) => CommandTag::EntityMultiUpdate,
            Self::EntityRemove(_) => CommandTag::EntityRemove,
            Self::EntityVisibilityIndicator(_) => CommandTag::EntityVisibilityIndicator,
            Self::EntityNovaNetworkChange(_) => CommandTag::EntityNovaNetworkChange,
            Self::EntityAttack(_) => CommandTag::EntityAttack,
            Self::ForceUpdate(_) => CommandTag::ForceUpdate,
            Self::ForceDelete(_) => CommandTag::ForceDelete,
            Self::SendingBoard(_) => CommandTag::SendingBoard,
            Self::ChangeHex(_) => CommandTag::ChangeHex,
            Self::ChangeHexes(_) => CommandTag::ChangeHexes,
            Self::BuildingUpdate(_) => CommandTag::BuildingUpdate,
            Self::BuildingCollapse(_) => CommandTag::BuildingCollapse,
            Self::SendingMinefields(_) => CommandTag::SendingMinefields,
            Self::DeployMinefields(_) => CommandTag::DeployMinefields,
            Self::RevealMinefield(_) => CommandTag::RevealMinefield,
            Self::RemoveMinefield(_) => CommandTag::RemoveMinefield,
            Self::UpdateMinefields(_) => CommandTag::UpdateMinefields,
            Self::SendingIlluminatedHexes(_) => CommandTag::SendingIlluminatedHexes,
            Self::ClearIlluminatedHexes => CommandTag::ClearIlluminatedHexes,
            Self::AddSmokeCloud(_) => CommandTag::AddSmokeCloud,
            Self::SendingAvailableMapSizes(_) => CommandTag::SendingAvailableMapSizes,
            Self::SendingSpecialHexDisplay(_) => CommandTag::SendingSpecialHexDisplay,
            Self::SendingArtilleryAttacks(_) => CommandTag::SendingArtilleryAttacks,
            Self::SendingFlares(_) => CommandTag::SendingFlares,
            Self::SendingTagInfo(_) => CommandTag::SendingTagInfo,
            Self::ResetTagInfo => CommandTag::ResetTagInfo,
            Self::SendingGameSettings(_) => CommandTag::SendingGameSettings,
            Self::SendingMapSettings(_) => CommandTag::SendingMapSettings,
            Self::SendingPlanetaryConditions(_) => CommandTag::SendingPlanetaryConditions,
            Self::PhaseChange(_) => CommandTag::PhaseChange,
            Self::Turn(_) => CommandTag::Turn,
            Self::RoundUpdate(_) => CommandTag::RoundUpdate,
            Self::SendingTurns(_) => CommandTag::SendingTurns,
            Self::SendingReports(_) => CommandTag::SendingReports,
            Self::SendingReportsTacticalGenius(_) => CommandTag::SendingReportsTacticalGenius,
            Self::SendingReportsSpecial(_) => CommandTag::SendingReportsSpecial,
            Self::SendingReportsAll(_) => CommandTag::SendingReportsAll,
            Self::ClientFeedbackRequest(_) => CommandTag::ClientFeedbackRequest,
            Self::EndOfGame(_) => CommandTag::EndOfGame,
            Self::GameVictoryEvent => CommandTag::GameVictoryEvent,
        }
    }

    /// Encode payload to buffer.
    ///
    /// Serializes only the inner record, NOT the variant tag. Tags without a
    /// record write nothing.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::CborEncode` if serialization fails
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        match self {
            Self::CloseConnection
            | Self::ServerVersionCheck
            | Self::ServerGreeting
            | Self::ClearIlluminatedHexes
            | Self::ResetTagInfo
            | Self::GameVictoryEvent => Ok(()),
            Self::IllegalClientVersion(inner) => encode_cbor(inner, dst),
            Self::ServerCorrectName(inner) => encode_cbor(inner, dst),
            Self::LocalPlayerNumber(inner) => encode_cbor(inner, dst),
            Self::PlayerAdd(inner) | Self::PlayerUpdate(inner) => encode_cbor(inner, dst),
            Self::PlayerRemove(inner) => encode_cbor(inner, dst),
            Self::PlayerReady(inner) => encode_cbor(inner, dst),
            Self::Chat(inner) => encode_cbor(inner, dst),
            Self::SendingEntities(inner) => encode_cbor(inner, dst),
            Self::EntityAdd(inner) => encode_cbor(inner, dst),
            Self::EntityUpdate(inner) => encode_cbor(inner, dst),
            Self::EntityMultiUpdate(inner) => encode_cbor(inner, dst),
            Self::EntityRemove(inner) => encode_cbor(inner, dst),
            Self::EntityVisibilityIndicator(inner) => encode_cbor(inner, dst),
            Self::EntityNovaNetworkChange(inner) => encode_cbor(inner, dst),
            Self::EntityAttack(inner) => encode_cbor(inner, dst),
            Self::ForceUpdate(inner) => encode_cbor(inner, dst),
            Self::ForceDelete(inner) => encode_cbor(inner, dst),
            Self::SendingBoard(inner) => encode_cbor(inner, dst),
            Self::ChangeHex(inner) => encode_cbor(inner, dst),
            Self::ChangeHexes(inner) => encode_cbor(inner, dst),
            Self::BuildingUpdate(inner) => encode_cbor(inner, dst),
            Self::BuildingCollapse(inner) | Self::SendingIlluminatedHexes(inner) => {
                encode_cbor(inner, dst)
            },
            Self::SendingMinefields(inner)
            | Self::DeployMinefields(inner)
            | Self::UpdateMinefields(inner) => encode_cbor(inner, dst),
            Self::RevealMinefield(inner) | Self::RemoveMinefield(inner) => encode_cbor(inner, dst),
            Self::AddSmokeCloud(inner) => encode_cbor(inner, dst),
            Self::SendingAvailableMapSizes(inner) => encode_cbor(inner, dst),
            Self::SendingSpecialHexDisplay(inner) => encode_cbor(inner, dst),
            Self::SendingArtilleryAttacks(inner) => encode_cbor(inner, dst),
            Self::SendingFlares(inner) => encode_cbor(inner, dst),
            Self::SendingTagInfo(inner) => encode_cbor(inner, dst),
            Self::SendingGameSettings(inner) => encode_cbor(inner, dst),
            Self::SendingMapSettings(inner) => encode_cbor(inner, dst),
            Self::SendingPlanetaryConditions(inner) => encode_cbor(inner, dst),
            Self::PhaseChange(inner) => encode_cbor(inner, dst),
            Self::Turn(inner) => encode_cbor(inner, dst),
            Self::RoundUpdate(inner) => encode_cbor(inner, dst),
            Self::SendingTurns(inner) => encode_cbor(inner, dst),
            Self::SendingReports(inner)
            | Self::SendingReportsTacticalGenius(inner)
            | Self::SendingReportsSpecial(inner) => encode_cbor(inner, dst),
            Self::SendingReportsAll(inner) => encode_cbor(inner, dst),
            Self::ClientFeedbackRequest(inner) => encode_cbor(inner, dst),
            Self::EndOfGame(inner) => encode_cbor(inner, dst),
        }
    }

    /// Decode payload from bytes based on command tag.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PayloadTooLarge` if bytes exceed `MAX_PAYLOAD_SIZE`
    /// - `ProtocolError::CborDecode` if the bytes do not match the record the
    ///   tag requires
    /// - `ProtocolError::WrongDirection` if the tag is client-to-server only
    pub fn decode(command: CommandTag, bytes: &[u8]) -> Result<Self> {
        check_size(bytes)?;

        let payload = match command {
            CommandTag::CloseConnection => {
                expect_empty(command, bytes)?;
                Self::CloseConnection
            },
            CommandTag::ServerVersionCheck => {
                expect_empty(command, bytes)?;
                Self::ServerVersionCheck
            },
            CommandTag::ServerGreeting => {
                expect_empty(command, bytes)?;
                Self::ServerGreeting
            },
            CommandTag::IllegalClientVersion => {
                Self::IllegalClientVersion(decode_cbor(command, bytes)?)
            },
            CommandTag::ServerCorrectName => Self::ServerCorrectName(decode_cbor(command, bytes)?),
            CommandTag::LocalPlayerNumber => Self::LocalPlayerNumber(decode_cbor(command, bytes)?),
            CommandTag::PlayerAdd => Self::PlayerAdd(decode_cbor(command, bytes)?),
            CommandTag::PlayerUpdate => Self::PlayerUpdate(decode_cbor(command, bytes)?),
            CommandTag::PlayerRemove => Self::PlayerRemove(decode_cbor(command, bytes)?),
            CommandTag::PlayerReady => Self::PlayerReady(decode_cbor(command, bytes)?),
            CommandTag::Chat => Self::Chat(decode_cbor(command, bytes)?),
            CommandTag::SendingEntities => Self::SendingEntities(decode_cbor(command, bytes)?),
            CommandTag::EntityAdd => Self::EntityAdd(decode_cbor(command, bytes)?),
            CommandTag::EntityUpdate => Self::EntityUpdate(decode_cbor(command, bytes)?),
            CommandTag::EntityMultiUpdate => Self::EntityMultiUpdate(decode_cbor(command, bytes)?),
            CommandTag::EntityRemove => Self::EntityRemove(decode_cbor(command, bytes)?),
            CommandTag::EntityVisibilityIndicator => {
                Self::EntityVisibilityIndicator(decode_cbor(command, bytes)?)
            },
            CommandTag::EntityNovaNetworkChange => {
                Self::EntityNovaNetworkChange(decode_cbor(command, bytes)?)
            },
            CommandTag::EntityAttack => Self::EntityAttack(decode_cbor(command, bytes)?),
            CommandTag::ForceUpdate => Self::ForceUpdate(decode_cbor(command, bytes)?),
            CommandTag::ForceDelete => Self::ForceDelete(decode_cbor(command, bytes)?),
            CommandTag::SendingBoard => Self::SendingBoard(decode_cbor(command, bytes)?),
            CommandTag::ChangeHex => Self::ChangeHex(decode_cbor(command, bytes)?),
            CommandTag::ChangeHexes => Self::ChangeHexes(decode_cbor(command, bytes)?),
            CommandTag::BuildingUpdate => Self::BuildingUpdate(decode_cbor(command, bytes)?),
            CommandTag::BuildingCollapse => Self::BuildingCollapse(decode_cbor(command, bytes)?),
            CommandTag::SendingMinefields => Self::SendingMinefields(decode_cbor(command, bytes)?),
            CommandTag::DeployMinefields => Self::DeployMinefields(decode_cbor(command, bytes)?),
            CommandTag::RevealMinefield => Self::RevealMinefield(decode_cbor(command, bytes)?),
            CommandTag::RemoveMinefield => Self::RemoveMinefield(decode_cbor(command, bytes)?),
            CommandTag::UpdateMinefields => Self::UpdateMinefields(decode_cbor(command, bytes)?),
            CommandTag::SendingIlluminatedHexes => {
                Self::SendingIlluminatedHexes(decode_cbor(command, bytes)?)
            },
            CommandTag::ClearIlluminatedHexes => {
                expect_empty(command, bytes)?;
                Self::ClearIlluminatedHexes
            },
            CommandTag::AddSmokeCloud => Self::AddSmokeCloud(decode_cbor(command, bytes)?),
            CommandTag::SendingAvailableMapSizes => {
                Self::SendingAvailableMapSizes(decode_cbor(command, bytes)?)
            },
            CommandTag::SendingSpecialHexDisplay => {
                Self::SendingSpecialHexDisplay(decode_cbor(command, bytes)?)
            },
            CommandTag::SendingArtilleryAttacks => {
                Self::SendingArtilleryAttacks(decode_cbor(command, bytes)?)
            },
            CommandTag::SendingFlares => Self::SendingFlares(decode_cbor(command, bytes)?),
            CommandTag::SendingTagInfo => Self::SendingTagInfo(decode_cbor(command, bytes)?),
            CommandTag::ResetTagInfo => {
                expect_empty(command, bytes)?;
                Self::ResetTagInfo
            },
            CommandTag::SendingGameSettings => {
                Self::SendingGameSettings(decode_cbor(command, bytes)?)
            },
            CommandTag::SendingMapSettings => Self::SendingMapSettings(decode_cbor(command, bytes)?),
            CommandTag::SendingPlanetaryConditions => {
                Self::SendingPlanetaryConditions(decode_cbor(command, bytes)?)
            },
            CommandTag::PhaseChange => Self::PhaseChange(decode_cbor(command, bytes)?),
            CommandTag::Turn => Self::Turn(decode_cbor(command, bytes)?),
            CommandTag::RoundUpdate => Self::RoundUpdate(decode_cbor(command, bytes)?),
            CommandTag::SendingTurns => Self::SendingTurns(decode_cbor(command, bytes)?),
            CommandTag::SendingReports => Self::SendingReports(decode_cbor(command, bytes)?),
            CommandTag::SendingReportsTacticalGenius => {
                Self::SendingReportsTacticalGenius(decode_cbor(command, bytes)?)
            },
            CommandTag::SendingReportsSpecial => {
                Self::SendingReportsSpecial(decode_cbor(command, bytes)?)
            },
            CommandTag::SendingReportsAll => Self::SendingReportsAll(decode_cbor(command, bytes)?),
            CommandTag::ClientFeedbackRequest => {
                Self::ClientFeedbackRequest(decode_cbor(command, bytes)?)
            },
            CommandTag::EndOfGame => Self::EndOfGame(decode_cbor(command, bytes)?),
            CommandTag::GameVictoryEvent => {
                expect_empty(command, bytes)?;
                Self::GameVictoryEvent
            },
            CommandTag::ClientVersions
            | CommandTag::ClientName
            | CommandTag::PlayerTeamChange
            | CommandTag::ForwardInitiative
            | CommandTag::RerollInitiative
            | CommandTag::CustomInitiative
            | CommandTag::EntityMove
            | CommandTag::EntityDeploy
            | CommandTag::EntityModeChange
            | CommandTag::EntityAmmoChange
            | CommandTag::EntitySensorChange
            | CommandTag::EntitySinksChange
            | CommandTag::EntityCalledShotChange
            | CommandTag::EntitySystemModeChange
            | CommandTag::EntityMountedFacingChange
            | CommandTag::EntityActivateHidden
            | CommandTag::EntityAssign
            | CommandTag::EntityLoad
            | CommandTag::EntityDeployUnload
            | CommandTag::UnloadStranded
            | CommandTag::ResetRoundDeployment
            | CommandTag::ForceAdd
            | CommandTag::ForceParent
            | CommandTag::ForceAssignFull
            | CommandTag::ForceAddEntity
            | CommandTag::BuildingExplode
            | CommandTag::SpecialHexDisplayAppend
            | CommandTag::SpecialHexDisplayDelete
            | CommandTag::SetArtilleryAutohitHexes => {
                return Err(ProtocolError::WrongDirection(command));
            },
        };

        Ok(payload)
    }

    /// Convert payload into a transport frame.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::CborEncode` if serialization fails
    pub fn into_frame(self, sequence: u32) -> Result<Frame> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        let mut header = FrameHeader::new(self.command());
        header.set_sequence(sequence);
        Ok(Frame::new(header, buf))
    }

    /// Parse payload from a raw transport frame.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnknownCommand` if the tag is not known to this build
    /// - any error from [`ServerPayload::decode`]
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let command = frame
            .header
            .command_tag()
            .ok_or(ProtocolError::UnknownCommand(frame.header.command()))?;
        Self::decode(command, &frame.payload)
    }
}
