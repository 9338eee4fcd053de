use bytes::BufMut;

use super::{
    check_size, decode_cbor, encode_cbor,
    entity::{
        ActivateHidden, AttackDeclaration, DeployOrder, DeployUnload, EntityBatch, EntityChange,
        EntityIds, EntitySetting, EquipmentSetting, EquipmentToggle, LoadOrder, MoveOrder,
        NewEntities, NovaNetwork, OwnerChange,
    },
    expect_empty,
    force::{ForceIds, ForceMembership, ForceOwnerChange, ForceReparent, ForceUpdate, NewForce},
    roster::{Chat, PlayerSettings, Ready, TeamChange},
    session::{ClientName, ClientVersions},
    world::{
        CoordsList, ExplodeBuilding, GameSettingsChange, MapSettingsRecord, Minefields,
        PlanetaryConditionsRecord, SpecialHexDisplayChange,
    },
};
use crate::{
    CommandTag, Frame, FrameHeader,
    errors::{ProtocolError, Result},
    model::FeedbackResponse,
};

/// Every message the client can send.
///
/// Variant names match their [`CommandTag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientPayload {
    // Session and roster
    /// Client is leaving.
    CloseConnection,
    /// Answer to the version check.
    ClientVersions(ClientVersions),
    /// Requested name and bot flag.
    ClientName(ClientName),
    /// Local player settings.
    PlayerUpdate(PlayerSettings),
    /// Done flag.
    PlayerReady(Ready),
    /// Team assignment.
    PlayerTeamChange(TeamChange),
    /// Chat line.
    Chat(Chat),
    /// Pass initiative.
    ForwardInitiative,
    /// Reroll initiative.
    RerollInitiative,
    /// Custom initiative settings.
    CustomInitiative(PlayerSettings),

    // Entities
    /// New entities.
    EntityAdd(NewEntities),
    /// One entity changed.
    EntityUpdate(EntityChange),
    /// Several entities changed.
    EntityMultiUpdate(EntityBatch),
    /// Entities deleted.
    EntityRemove(EntityIds),
    /// Nova network for next round.
    EntityNovaNetworkChange(NovaNetwork),
    /// Declared actions.
    EntityAttack(AttackDeclaration),
    /// Movement order.
    EntityMove(MoveOrder),
    /// Deployment order.
    EntityDeploy(DeployOrder),
    /// Weapon mode.
    EntityModeChange(EquipmentSetting),
    /// Ammo bin for a weapon.
    EntityAmmoChange(EquipmentSetting),
    /// Active sensor.
    EntitySensorChange(EntitySetting),
    /// Heat sinks switched on.
    EntitySinksChange(EntitySetting),
    /// Called shot cycled.
    EntityCalledShotChange(EquipmentToggle),
    /// System mode.
    EntitySystemModeChange(EquipmentSetting),
    /// Mounted facing.
    EntityMountedFacingChange(EquipmentSetting),
    /// Leave hidden mode.
    EntityActivateHidden(ActivateHidden),
    /// Owner change.
    EntityAssign(OwnerChange),
    /// Load into a transport.
    EntityLoad(LoadOrder),
    /// Unload during deployment.
    EntityDeployUnload(DeployUnload),
    /// Unload stranded units.
    UnloadStranded(EntityIds),
    /// Undo this round's deployment.
    ResetRoundDeployment,

    // Forces
    /// Forces changed.
    ForceUpdate(ForceUpdate),
    /// Forces deleted.
    ForceDelete(ForceIds),
    /// New force.
    ForceAdd(NewForce),
    /// Forces moved under a new parent.
    ForceParent(ForceReparent),
    /// Forces and their contents reassigned.
    ForceAssignFull(ForceOwnerChange),
    /// Entities moved into a force.
    ForceAddEntity(ForceMembership),

    // World
    /// Demolition charge set off.
    BuildingExplode(ExplodeBuilding),
    /// Minefields deployed.
    DeployMinefields(Minefields),
    /// Pre-designated artillery hexes.
    SetArtilleryAutohitHexes(CoordsList),
    /// Special hex display added.
    SpecialHexDisplayAppend(SpecialHexDisplayChange),
    /// Special hex display removed.
    SpecialHexDisplayDelete(SpecialHexDisplayChange),

    // Settings
    /// Game options change.
    SendingGameSettings(GameSettingsChange),
    /// Map settings change.
    SendingMapSettings(MapSettingsRecord),
    /// Planetary conditions change.
    SendingPlanetaryConditions(PlanetaryConditionsRecord),

    /// Answer to a feedback request.
    ClientFeedbackRequest(FeedbackResponse),
}

impl ClientPayload {
    /// Command tag corresponding to this payload type.
    #[must_use]
    pub const fn command(&self) -> CommandTag {
        match self {
            Self::CloseConnection => CommandTag::CloseConnection,
            Self::ClientVersions(_) => CommandTag::ClientVersions,
            Self::ClientName(_) => CommandTag::ClientName,
            Self::PlayerUpdate(_) => CommandTag::PlayerUpdate,
            Self::PlayerReady(_) => CommandTag::PlayerReady,
            Self::PlayerTeamChange(_) => CommandTag::PlayerTeamChange,
            Self::Chat(_) => CommandTag::Chat,
            Self::ForwardInitiative => CommandTag::ForwardInitiative,
            Self::RerollInitiative => CommandTag::RerollInitiative,
            Self::CustomInitiative(_) => CommandTag::CustomInitiative,
            Self::EntityAdd(_) => CommandTag::EntityAdd,
            Self::EntityUpdate(_) => CommandTag::EntityUpdate,
            Self::EntityMultiUpdate(_) => CommandTag::EntityMultiUpdate,
            Self::EntityRemove(_) => CommandTag::EntityRemove,
            Self::EntityNovaNetworkChange(_) => CommandTag::EntityNovaNetworkChange,
            Self::EntityAttack(_) => CommandTag::EntityAttack,
            Self::EntityMove(_) => CommandTag::EntityMove,
            Self::EntityDeploy(_) => CommandTag::EntityDeploy,
            Self::EntityModeChange(_) => CommandTag::EntityModeChange,
            Self::EntityAmmoChange(_) => CommandTag::EntityAmmoChange,
            Self::EntitySensorChange(_) => CommandTag::EntitySensorChange,
            Self::EntitySinksChange(_) => CommandTag::EntitySinksChange,
            Self::EntityCalledShotChange(_) => CommandTag::EntityCalledShotChange,
            Self::EntitySystemModeChange(_) => CommandTag::EntitySystemModeChange,
            Self::EntityMountedFacingChange(_) => CommandTag::EntityMountedFacingChange,
            Self::EntityActivateHidden(_) => CommandTag::EntityActivateHidden,
            Self::EntityAssign(_) => CommandTag::EntityAssign,
            Self::EntityLoad(_) => CommandTag::EntityLoad,
            Self::EntityDeployUnload(_) => CommandTag::EntityDeployUnload,
            Self::UnloadStranded(_) => CommandTag::UnloadStranded,
            Self::ResetRoundDeployment => CommandTag::ResetRoundDeployment,
            Self::ForceUpdate(_) => CommandTag::ForceUpdate,
            Self::ForceDelete(_) => CommandTag::ForceDelete,
            Self::ForceAdd(_) => CommandTag::ForceAdd,
            Self::ForceParent(_) => CommandTag::ForceParent,
            Self::ForceAssignFull(_) => CommandTag::ForceAssignFull,
            Self::ForceAddEntity(_) => CommandTag::ForceAddEntity,
            Self::BuildingExplode(_) => CommandTag::BuildingExplode,
            Self::DeployMinefields(_) => CommandTag::DeployMinefields,
            Self::SetArtilleryAutohitHexes(_) => CommandTag::SetArtilleryAutohitHexes,
            Self::SpecialHexDisplayAppend(_) => CommandTag::SpecialHexDisplayAppend,
            Self::SpecialHexDisplayDelete(_) => CommandTag::SpecialHexDisplayDelete,
            Self::SendingGameSettings(_) => CommandTag::SendingGameSettings,
            Self::SendingMapSettings(_) => CommandTag::SendingMapSettings,
            Self::SendingPlanetaryConditions(_) => CommandTag::SendingPlanetaryConditions,
            Self::ClientFeedbackRequest(_) => CommandTag::ClientFeedbackRequest,
        }
    }

    /// Encode payload to buffer.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::CborEncode` if serialization fails
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        match self {
            Self::CloseConnection
            | Self::ForwardInitiative
            | Self::RerollInitiative
            | Self::ResetRoundDeployment => Ok(()),
            Self::ClientVersions(inner) => encode_cbor(inner, dst),
            Self::ClientName(inner) => encode_cbor(inner, dst),
            Self::PlayerUpdate(inner) | Self::CustomInitiative(inner) => encode_cbor(inner, dst),
            Self::PlayerReady(inner) => encode_cbor(inner, dst),
            Self::PlayerTeamChange(inner) => encode_cbor(inner, dst),
            Self::Chat(inner) => encode_cbor(inner, dst),
            Self::EntityAdd(inner) => encode_cbor(inner, dst),
            Self::EntityUpdate(inner) => encode_cbor(inner, dst),
            Self::EntityMultiUpdate(inner) => encode_cbor(inner, dst),
            Self::EntityRemove(inner) | Self::UnloadStranded(inner) => encode_cbor(inner, dst),
            Self::EntityNovaNetworkChange(inner) => encode_cbor(inner, dst),
            Self::EntityAttack(inner) => encode_cbor(inner, dst),
            Self::EntityMove(inner) => encode_cbor(inner, dst),
            Self::EntityDeploy(inner) => encode_cbor(inner, dst),
            Self::EntityModeChange(inner)
            | Self::EntityAmmoChange(inner)
            | Self::EntitySystemModeChange(inner)
            | Self::EntityMountedFacingChange(inner) => encode_cbor(inner, dst),
            Self::EntitySensorChange(inner) | Self::EntitySinksChange(inner) => {
                encode_cbor(inner, dst)
            },
            Self::EntityCalledShotChange(inner) => encode_cbor(inner, dst),
            Self::EntityActivateHidden(inner) => encode_cbor(inner, dst),
            Self::EntityAssign(inner) => encode_cbor(inner, dst),
            Self::EntityLoad(inner) => encode_cbor(inner, dst),
            Self::EntityDeployUnload(inner) => encode_cbor(inner, dst),
            Self::ForceUpdate(inner) => encode_cbor(inner, dst),
            Self::ForceDelete(inner) => encode_cbor(inner, dst),
            Self::ForceAdd(inner) => encode_cbor(inner, dst),
            Self::ForceParent(inner) => encode_cbor(inner, dst),
            Self::ForceAssignFull(inner) => encode_cbor(inner, dst),
            Self::ForceAddEntity(inner) => encode_cbor(inner, dst),
            Self::BuildingExplode(inner) => encode_cbor(inner, dst),
            Self::DeployMinefields(inner) => encode_cbor(inner, dst),
            Self::SetArtilleryAutohitHexes(inner) => encode_cbor(inner, dst),
            Self::SpecialHexDisplayAppend(inner) | Self::SpecialHexDisplayDelete(inner) => {
                encode_cbor(inner, dst)
            },
            Self::SendingGameSettings(inner) => encode_cbor(inner, dst),
            Self::SendingMapSettings(inner) => encode_cbor(inner, dst),
            Self::SendingPlanetaryConditions(inner) => encode_cbor(inner, dst),
            Self::ClientFeedbackRequest(inner) => encode_cbor(inner, dst),
        }
    }

    /// Decode payload from bytes based on command tag.
    ///
    /// Used by test servers and tooling that read the client side of a
    /// stream.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PayloadTooLarge` if bytes exceed `MAX_PAYLOAD_SIZE`
    /// - `ProtocolError::CborDecode` if the bytes do not match the record the
    ///   tag requires
    /// - `ProtocolError::WrongDirection` if the tag is server-to-client only
    pub fn decode(command: CommandTag, bytes: &[u8]) -> Result<Self> {
        check_size(bytes)?;

        let payload = match command {
            CommandTag::CloseConnection => {
                expect_empty(command, bytes)?;
                Self::CloseConnection
            },
            CommandTag::ClientVersions => Self::ClientVersions(decode_cbor(command, bytes)?),
            CommandTag::ClientName => Self::ClientName(decode_cbor(command, bytes)?),
            CommandTag::PlayerUpdate => Self::PlayerUpdate(decode_cbor(command, bytes)?),
            CommandTag::PlayerReady => Self::PlayerReady(decode_cbor(command, bytes)?),
            CommandTag::PlayerTeamChange => Self::PlayerTeamChange(decode_cbor(command, bytes)?),
            CommandTag::Chat => Self::Chat(decode_cbor(command, bytes)?),
            CommandTag::ForwardInitiative => {
                expect_empty(command, bytes)?;
                Self::ForwardInitiative
            },
            CommandTag::RerollInitiative => {
                expect_empty(command, bytes)?;
                Self::RerollInitiative
            },
            CommandTag::CustomInitiative => Self::CustomInitiative(decode_cbor(command, bytes)?),
            CommandTag::EntityAdd => Self::EntityAdd(decode_cbor(command, bytes)?),
            CommandTag::EntityUpdate => Self::EntityUpdate(decode_cbor(command, bytes)?),
            CommandTag::EntityMultiUpdate => Self::EntityMultiUpdate(decode_cbor(command, bytes)?),
            CommandTag::EntityRemove => Self::EntityRemove(decode_cbor(command, bytes)?),
            CommandTag::EntityNovaNetworkChange => {
                Self::EntityNovaNetworkChange(decode_cbor(command, bytes)?)
            },
            CommandTag::EntityAttack => Self::EntityAttack(decode_cbor(command, bytes)?),
            CommandTag::EntityMove => Self::EntityMove(decode_cbor(command, bytes)?),
            CommandTag::EntityDeploy => Self::EntityDeploy(decode_cbor(command, bytes)?),
            CommandTag::EntityModeChange => Self::EntityModeChange(decode_cbor(command, bytes)?),
            CommandTag::EntityAmmoChange => Self::EntityAmmoChange(decode_cbor(command, bytes)?),
            CommandTag::EntitySensorChange => {
                Self::EntitySensorChange(decode_cbor(command, bytes)?)
            },
            CommandTag::EntitySinksChange => Self::EntitySinksChange(decode_cbor(command, bytes)?),
            CommandTag::EntityCalledShotChange => {
                Self::EntityCalledShotChange(decode_cbor(command, bytes)?)
            },
            CommandTag::EntitySystemModeChange => {
                Self::EntitySystemModeChange(decode_cbor(command, bytes)?)
            },
            CommandTag::EntityMountedFacingChange => {
                Self::EntityMountedFacingChange(decode_cbor(command, bytes)?)
            },
            CommandTag::EntityActivateHidden => {
                Self::EntityActivateHidden(decode_cbor(command, bytes)?)
            },
            CommandTag::EntityAssign => Self::EntityAssign(decode_cbor(command, bytes)?),
            CommandTag::EntityLoad => Self::EntityLoad(decode_cbor(command, bytes)?),
            CommandTag::EntityDeployUnload => {
                Self::EntityDeployUnload(decode_cbor(command, bytes)?)
            },
            CommandTag::UnloadStranded => Self::UnloadStranded(decode_cbor(command, bytes)?),
            CommandTag::ResetRoundDeployment => {
                expect_empty(command, bytes)?;
                Self::ResetRoundDeployment
            },
            CommandTag::ForceUpdate => Self::ForceUpdate(decode_cbor(command, bytes)?),
            CommandTag::ForceDelete => Self::ForceDelete(decode_cbor(command, bytes)?),
            CommandTag::ForceAdd => Self::ForceAdd(decode_cbor(command, bytes)?),
            CommandTag::ForceParent => Self::ForceParent(decode_cbor(command, bytes)?),
            CommandTag::ForceAssignFull => Self::ForceAssignFull(decode_cbor(command, bytes)?),
            CommandTag::ForceAddEntity => Self::ForceAddEntity(decode_cbor(command, bytes)?),
            CommandTag::BuildingExplode => Self::BuildingExplode(decode_cbor(command, bytes)?),
            CommandTag::DeployMinefields => Self::DeployMinefields(decode_cbor(command, bytes)?),
            CommandTag::SetArtilleryAutohitHexes => {
                Self::SetArtilleryAutohitHexes(decode_cbor(command, bytes)?)
            },
            CommandTag::SpecialHexDisplayAppend => {
                Self::SpecialHexDisplayAppend(decode_cbor(command, bytes)?)
            },
            CommandTag::SpecialHexDisplayDelete => {
                Self::SpecialHexDisplayDelete(decode_cbor(command, bytes)?)
            },
            CommandTag::SendingGameSettings => {
                Self::SendingGameSettings(decode_cbor(command, bytes)?)
            },
            CommandTag::SendingMapSettings => Self::SendingMapSettings(decode_cbor(command, bytes)?),
            CommandTag::SendingPlanetaryConditions => {
                Self::SendingPlanetaryConditions(decode_cbor(command, bytes)?)
            },
            CommandTag::ClientFeedbackRequest => {
                Self::ClientFeedbackRequest(decode_cbor(command, bytes)?)
            },
            CommandTag::ServerVersionCheck
            | CommandTag::ServerGreeting
            | CommandTag::IllegalClientVersion
            | CommandTag::ServerCorrectName
            | CommandTag::LocalPlayerNumber
            | CommandTag::PlayerAdd
            | CommandTag::PlayerRemove
            | CommandTag::SendingEntities
            | CommandTag::EntityVisibilityIndicator
            | CommandTag::SendingBoard
            | CommandTag::ChangeHex
            | CommandTag::ChangeHexes
            | CommandTag::BuildingUpdate
            | CommandTag::BuildingCollapse
            | CommandTag::SendingMinefields
            | CommandTag::RevealMinefield
            | CommandTag::RemoveMinefield
            | CommandTag::UpdateMinefields
            | CommandTag::SendingIlluminatedHexes
            | CommandTag::ClearIlluminatedHexes
            | CommandTag::AddSmokeCloud
            | CommandTag::SendingAvailableMapSizes
            | CommandTag::SendingSpecialHexDisplay
            | CommandTag::SendingArtilleryAttacks
            | CommandTag::SendingFlares
            | CommandTag::SendingTagInfo
            | CommandTag::ResetTagInfo
            | CommandTag::PhaseChange
            | CommandTag::Turn
            | CommandTag::RoundUpdate
            | CommandTag::SendingTurns
            | CommandTag::SendingReports
            | CommandTag::SendingReportsTacticalGenius
            | CommandTag::SendingReportsSpecial
            | CommandTag::SendingReportsAll
            | CommandTag::EndOfGame
            | CommandTag::GameVictoryEvent => {
                return Err(ProtocolError::WrongDirection(command));
            },
        };

        Ok(payload)
    }

    /// Convert payload into a transport frame stamped with `sequence`.
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
    /// - any error from [`ClientPayload::decode`]
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let command = frame
            .header
            .command_tag()
            .ok_or(ProtocolError::UnknownCommand(frame.header.command()))?;
        Self::decode(command, &frame.payload)
    }
}
