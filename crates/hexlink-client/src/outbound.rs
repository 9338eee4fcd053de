//! Outbound message builders.
//!
//! One function per player-initiated request. Each returns the payload only;
//! sending goes through the session [`Outbox`](crate::session::Outbox) so
//! all frames leave in order through the pump.

use hexlink_proto::{
    ClientPayload,
    model::{
        Coords, DemolitionCharge, Entity, EntityAction, EntityId, FeedbackResponse, Force, ForceId,
        GameOptions, GamePhase, MapSettings, Minefield, MovePath, PlanetaryConditions, Player,
        PlayerId, SpecialHexDisplay,
    },
    payloads::{
        entity::{
            ActivateHidden, AttackDeclaration, DeployOrder, DeployUnload, EntityBatch,
            EntityChange, EntityIds, EntitySetting, EquipmentSetting, EquipmentToggle, LoadOrder,
            MoveOrder, NewEntities, NovaNetwork, OwnerChange,
        },
        force::{ForceIds, ForceMembership, ForceOwnerChange, ForceReparent, ForceUpdate, NewForce},
        roster::{Chat, PlayerSettings, Ready, TeamChange},
        session::{ClientName, ClientVersions},
        world::{
            CoordsList, ExplodeBuilding, GameSettingsChange, MapSettingsRecord, Minefields,
            PlanetaryConditionsRecord, SpecialHexDisplayChange,
        },
    },
};

// Session

/// Answer to the server's version check.
#[must_use]
pub fn client_versions(version: impl Into<String>, build: impl Into<String>) -> ClientPayload {
    ClientPayload::ClientVersions(ClientVersions { version: version.into(), build: build.into() })
}

/// Requested player name, sent after the greeting.
#[must_use]
pub fn client_name(name: impl Into<String>, is_bot: bool) -> ClientPayload {
    ClientPayload::ClientName(ClientName { name: name.into(), is_bot })
}

/// Goodbye before the client drops the connection.
#[must_use]
pub fn close_connection() -> ClientPayload {
    ClientPayload::CloseConnection
}

// Entity settings

/// Submit a movement path.
#[must_use]
pub fn move_entity(entity_id: EntityId, path: MovePath) -> ClientPayload {
    ClientPayload::EntityMove(MoveOrder { entity_id, path })
}

/// Deploy an entity, optionally with loaded units.
#[must_use]
pub fn deploy(order: DeployOrder) -> ClientPayload {
    ClientPayload::EntityDeploy(order)
}

/// Declare the actions of one entity for this phase.
#[must_use]
pub fn attack(entity_id: EntityId, actions: Vec<EntityAction>) -> ClientPayload {
    ClientPayload::EntityAttack(AttackDeclaration { entity_id, actions })
}

/// Switch a weapon mode.
#[must_use]
pub fn mode_change(entity_id: EntityId, equipment: u32, mode: i32) -> ClientPayload {
    ClientPayload::EntityModeChange(EquipmentSetting { entity_id, equipment, value: mode })
}

/// Select the ammo bin a weapon feeds from.
#[must_use]
pub fn ammo_change(entity_id: EntityId, weapon: u32, ammo: i32) -> ClientPayload {
    ClientPayload::EntityAmmoChange(EquipmentSetting { entity_id, equipment: weapon, value: ammo })
}

/// Activate a sensor.
#[must_use]
pub fn sensor_change(entity_id: EntityId, sensor: u32) -> ClientPayload {
    ClientPayload::EntitySensorChange(EntitySetting { entity_id, value: sensor })
}

/// Set the number of active heat sinks.
#[must_use]
pub fn sinks_change(entity_id: EntityId, active: u32) -> ClientPayload {
    ClientPayload::EntitySinksChange(EntitySetting { entity_id, value: active })
}

/// Cycle the called shot of a weapon.
#[must_use]
pub fn called_shot_change(entity_id: EntityId, equipment: u32) -> ClientPayload {
    ClientPayload::EntityCalledShotChange(EquipmentToggle { entity_id, equipment })
}

/// Switch a system mode.
#[must_use]
pub fn system_mode_change(entity_id: EntityId, system: u32, mode: i32) -> ClientPayload {
    ClientPayload::EntitySystemModeChange(EquipmentSetting { entity_id, equipment: system, value: mode })
}

/// Turn a mounted weapon.
#[must_use]
pub fn mount_facing_change(entity_id: EntityId, equipment: u32, facing: i32) -> ClientPayload {
    ClientPayload::EntityMountedFacingChange(EquipmentSetting { entity_id, equipment, value: facing })
}

/// Leave hidden mode in `phase`.
#[must_use]
pub fn activate_hidden(entity_id: EntityId, phase: GamePhase) -> ClientPayload {
    ClientPayload::EntityActivateHidden(ActivateHidden { entity_id, phase })
}

// Player

/// Chat line.
#[must_use]
pub fn chat(message: impl Into<String>) -> ClientPayload {
    ClientPayload::Chat(Chat { message: message.into() })
}

/// Done flag for the current phase.
#[must_use]
pub fn done(done: bool) -> ClientPayload {
    ClientPayload::PlayerReady(Ready { done })
}

/// Local player settings.
#[must_use]
pub fn player_info(player: Player) -> ClientPayload {
    ClientPayload::PlayerUpdate(PlayerSettings { player })
}

/// Move players to a team.
#[must_use]
pub fn team_change(player_ids: Vec<PlayerId>, team: u32) -> ClientPayload {
    ClientPayload::PlayerTeamChange(TeamChange { player_ids, team })
}

/// Pass the turn on to the next player.
#[must_use]
pub fn next_player() -> ClientPayload {
    ClientPayload::ForwardInitiative
}

/// Spend a reroll on initiative.
#[must_use]
pub fn reroll_initiative() -> ClientPayload {
    ClientPayload::RerollInitiative
}

/// Undo deployment made this round.
#[must_use]
pub fn reset_round_deployment() -> ClientPayload {
    ClientPayload::ResetRoundDeployment
}

/// Custom initiative settings.
#[must_use]
pub fn custom_initiative(player: Player) -> ClientPayload {
    ClientPayload::CustomInitiative(PlayerSettings { player })
}

// Entities

/// Add entities in one batch.
#[must_use]
pub fn add_entities(entities: Vec<Entity>) -> ClientPayload {
    ClientPayload::EntityAdd(NewEntities { entities })
}

/// Replace one entity.
#[must_use]
pub fn update_entity(entity: Entity) -> ClientPayload {
    ClientPayload::EntityUpdate(EntityChange { entity })
}

/// Replace several entities; a single entity uses the single update.
#[must_use]
pub fn update_entities(mut entities: Vec<Entity>) -> ClientPayload {
    match entities.pop() {
        Some(entity) if entities.is_empty() => update_entity(entity),
        Some(entity) => {
            entities.push(entity);
            ClientPayload::EntityMultiUpdate(EntityBatch { entities })
        },
        None => ClientPayload::EntityMultiUpdate(EntityBatch { entities }),
    }
}

/// Delete entities in one batch.
#[must_use]
pub fn remove_entities(entity_ids: Vec<EntityId>) -> ClientPayload {
    ClientPayload::EntityRemove(EntityIds { entity_ids })
}

/// Hand entities to another player.
#[must_use]
pub fn change_owner(entity_ids: Vec<EntityId>, owner_id: PlayerId) -> ClientPayload {
    ClientPayload::EntityAssign(OwnerChange { entity_ids, owner_id })
}

/// Load an entity into a transport bay.
#[must_use]
pub fn load_entity(entity_id: EntityId, loader_id: EntityId, bay: u32) -> ClientPayload {
    ClientPayload::EntityLoad(LoadOrder { entity_id, loader_id, bay })
}

/// Unload a carried unit during deployment.
#[must_use]
pub fn deployment_unload(loader_id: EntityId, loaded_id: EntityId) -> ClientPayload {
    ClientPayload::EntityDeployUnload(DeployUnload { loader_id, loaded_id })
}

/// Unload units stranded in a transport that cannot move.
#[must_use]
pub fn unload_stranded(entity_ids: Vec<EntityId>) -> ClientPayload {
    ClientPayload::UnloadStranded(EntityIds { entity_ids })
}

// Forces

/// Create a force with initial members.
#[must_use]
pub fn add_force(force: Force, entity_ids: Vec<EntityId>) -> ClientPayload {
    ClientPayload::ForceAdd(NewForce { force, entity_ids })
}

/// Replace forces and any entities whose membership changed.
#[must_use]
pub fn update_forces(forces: Vec<Force>, entities: Vec<Entity>) -> ClientPayload {
    ClientPayload::ForceUpdate(ForceUpdate { forces, entities })
}

/// Delete forces; the server removes their contents.
#[must_use]
pub fn delete_forces(force_ids: Vec<ForceId>) -> ClientPayload {
    ClientPayload::ForceDelete(ForceIds { force_ids })
}

/// Move forces under `parent_id`, or to the top level with `None`.
#[must_use]
pub fn reparent_forces(force_ids: Vec<ForceId>, parent_id: Option<ForceId>) -> ClientPayload {
    ClientPayload::ForceParent(ForceReparent { force_ids, parent_id })
}

/// Hand forces and everything in them to another player.
#[must_use]
pub fn assign_forces_full(force_ids: Vec<ForceId>, owner_id: PlayerId) -> ClientPayload {
    ClientPayload::ForceAssignFull(ForceOwnerChange { force_ids, owner_id })
}

/// Move entities into a force.
#[must_use]
pub fn add_to_force(entity_ids: Vec<EntityId>, force_id: ForceId) -> ClientPayload {
    ClientPayload::ForceAddEntity(ForceMembership { entity_ids, force_id })
}

// Board and settings

/// Deploy minefields.
#[must_use]
pub fn deploy_minefields(minefields: Vec<Minefield>) -> ClientPayload {
    ClientPayload::DeployMinefields(Minefields { minefields })
}

/// Pre-designate artillery auto-hit hexes.
#[must_use]
pub fn artillery_autohit_hexes(coords: Vec<Coords>) -> ClientPayload {
    ClientPayload::SetArtilleryAutohitHexes(CoordsList { coords })
}

/// Set off a demolition charge.
#[must_use]
pub fn explode_building(charge: DemolitionCharge) -> ClientPayload {
    ClientPayload::BuildingExplode(ExplodeBuilding { charge })
}

/// Nova network for the next round.
#[must_use]
pub fn nova_network_change(entity_id: EntityId, network: impl Into<String>) -> ClientPayload {
    ClientPayload::EntityNovaNetworkChange(NovaNetwork { entity_id, network: network.into() })
}

/// Add a hex annotation.
#[must_use]
pub fn special_hex_display_append(display: SpecialHexDisplay) -> ClientPayload {
    ClientPayload::SpecialHexDisplayAppend(SpecialHexDisplayChange { display })
}

/// Remove a hex annotation.
#[must_use]
pub fn special_hex_display_delete(display: SpecialHexDisplay) -> ClientPayload {
    ClientPayload::SpecialHexDisplayDelete(SpecialHexDisplayChange { display })
}

/// Change game options; `password` guards a locked game.
#[must_use]
pub fn game_options(password: impl Into<String>, options: GameOptions) -> ClientPayload {
    ClientPayload::SendingGameSettings(GameSettingsChange { password: password.into(), options })
}

/// Change map settings.
#[must_use]
pub fn map_settings(settings: MapSettings) -> ClientPayload {
    ClientPayload::SendingMapSettings(MapSettingsRecord { settings })
}

/// Change weather and light.
#[must_use]
pub fn planetary_conditions(conditions: PlanetaryConditions) -> ClientPayload {
    ClientPayload::SendingPlanetaryConditions(PlanetaryConditionsRecord { conditions })
}

// Feedback replies

fn feedback(response: FeedbackResponse) -> ClientPayload {
    ClientPayload::ClientFeedbackRequest(response)
}

/// Step aside from a domino effect, or stay with `None`.
#[must_use]
pub fn domino_effect(path: Option<MovePath>) -> ClientPayload {
    feedback(FeedbackResponse::DominoEffect { path })
}

/// AMS target, or `None` to hold fire.
#[must_use]
pub fn ams_assign(attack_index: Option<u32>) -> ClientPayload {
    feedback(FeedbackResponse::AmsAssign { attack_index })
}

/// APDS target, or `None` to hold fire.
#[must_use]
pub fn apds_assign(attack_index: Option<u32>) -> ClientPayload {
    feedback(FeedbackResponse::ApdsAssign { attack_index })
}

/// Point-blank shots from hiding; empty to stay hidden.
#[must_use]
pub fn hidden_point_blank_shot(attacks: Vec<EntityAction>) -> ClientPayload {
    feedback(FeedbackResponse::HiddenPointBlankShot { attacks })
}

/// Target for a teleguided missile.
#[must_use]
pub fn teleguided_target(target_index: u32) -> ClientPayload {
    feedback(FeedbackResponse::TeleguidedTarget { target_index })
}

/// Target to TAG.
#[must_use]
pub fn tag_target(target_index: u32) -> ClientPayload {
    feedback(FeedbackResponse::TagTarget { target_index })
}
