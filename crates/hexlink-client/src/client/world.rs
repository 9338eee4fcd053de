//! Board, battlefield overlays and settings.

use hexlink_core::{GameEvent, SettingsKind};
use hexlink_proto::{
    model::{Coords, Minefield, TagInfo},
    payloads::world::{
        ArtilleryAttacks, BoardResync, Buildings, Flares, GameSettings, HexChange,
        MapSettingsRecord, MapSizes, Minefields, PlanetaryConditionsRecord, SmokeCloudAdded,
        SpecialHexDisplays,
    },
};

use super::{Actions, Client};
use crate::event::ClientAction;

fn board_changed(out: &mut Actions) {
    out.push(ClientAction::Notify(GameEvent::BoardChanged));
}

fn settings_changed(kind: SettingsKind, out: &mut Actions) {
    out.push(ClientAction::Notify(GameEvent::SettingsChanged(kind)));
}

impl Client {
    pub(super) fn on_board(&mut self, payload: BoardResync, out: &mut Actions) {
        tracing::debug!(width = payload.board.width, height = payload.board.height, "board received");
        if self.game.set_board(payload.board) {
            board_changed(out);
        }
    }

    pub(super) fn on_hex_changes(&mut self, changes: Vec<HexChange>, out: &mut Actions) {
        let changes = changes.into_iter().map(|c| (c.coords, c.hex)).collect();
        if self.game.patch_hexes(changes) > 0 {
            board_changed(out);
        }
    }

    pub(super) fn on_buildings(&mut self, payload: Buildings, out: &mut Actions) {
        self.game.update_buildings(payload.buildings);
        board_changed(out);
    }

    pub(super) fn on_building_collapse(&mut self, coords: &[Coords], out: &mut Actions) {
        if self.game.collapse_buildings(coords) > 0 {
            board_changed(out);
        }
    }

    pub(super) fn on_minefields_resync(&mut self, payload: Minefields, out: &mut Actions) {
        self.game.set_minefields(payload.minefields);
        board_changed(out);
    }

    pub(super) fn on_minefields_added(&mut self, minefields: Vec<Minefield>, out: &mut Actions) {
        self.game.add_minefields(minefields);
        board_changed(out);
    }

    pub(super) fn on_minefield_removed(&mut self, minefield: &Minefield, out: &mut Actions) {
        if self.game.remove_minefield(minefield) {
            board_changed(out);
        } else {
            tracing::debug!(coords = %minefield.coords, "remove of unknown minefield ignored");
        }
    }

    pub(super) fn on_minefield_density(&mut self, minefields: &[Minefield], out: &mut Actions) {
        if self.game.reset_minefield_density(minefields) > 0 {
            board_changed(out);
        }
    }

    pub(super) fn on_illuminated(&mut self, coords: Option<Vec<Coords>>, out: &mut Actions) {
        match coords {
            Some(coords) => self.game.set_illuminated(coords),
            None => self.game.clear_illuminated(),
        }
        board_changed(out);
    }

    pub(super) fn on_smoke_cloud(&mut self, payload: SmokeCloudAdded, out: &mut Actions) {
        self.game.add_smoke_cloud(payload.cloud);
        board_changed(out);
    }

    pub(super) fn on_map_sizes(&mut self, payload: MapSizes, out: &mut Actions) {
        self.game.set_map_sizes(payload.sizes);
        settings_changed(SettingsKind::Map, out);
    }

    pub(super) fn on_special_hex_displays(&mut self, payload: SpecialHexDisplays, out: &mut Actions) {
        self.game.set_special_hex_displays(payload.displays);
        board_changed(out);
    }

    pub(super) fn on_artillery(&mut self, payload: ArtilleryAttacks, out: &mut Actions) {
        self.game.set_artillery(payload.attacks);
        board_changed(out);
    }

    pub(super) fn on_flares(&mut self, payload: Flares, out: &mut Actions) {
        self.game.set_flares(payload.flares);
        board_changed(out);
    }

    pub(super) fn on_tag_info(&mut self, tags: Option<Vec<TagInfo>>, out: &mut Actions) {
        match tags {
            Some(tags) => self.game.add_tag_info(tags),
            None => self.game.reset_tag_info(),
        }
        board_changed(out);
    }

    pub(super) fn on_game_settings(&mut self, payload: GameSettings, out: &mut Actions) {
        self.game.set_options(payload.options);
        settings_changed(SettingsKind::GameOptions, out);
    }

    pub(super) fn on_map_settings(&mut self, payload: MapSettingsRecord, out: &mut Actions) {
        self.game.set_map_settings(payload.settings);
        settings_changed(SettingsKind::Map, out);
    }

    pub(super) fn on_planetary_conditions(
        &mut self,
        payload: PlanetaryConditionsRecord,
        out: &mut Actions,
    ) {
        self.game.set_planetary_conditions(payload.conditions);
        settings_changed(SettingsKind::PlanetaryConditions, out);
    }
}

#[cfg(test)]
mod tests {
    use hexlink_proto::{
        ServerPayload,
        model::{Board, Hex, MinefieldKind},
        payloads::world::{HexChanges, MinefieldRecord},
    };

    use super::*;
    use crate::client::tests::{connected_client, inbound, notifications};

    fn mine(x: i32, y: i32, density: u32) -> Minefield {
        Minefield { coords: Coords::new(x, y), player_id: 1, kind: MinefieldKind::Conventional, density }
    }

    #[test]
    fn hex_change_off_board_is_ignored() {
        let mut client = connected_client();
        client.handle(inbound(ServerPayload::SendingBoard(BoardResync { board: Board::new(4, 4) })));

        let level_two = Hex { level: 2, terrains: Vec::new() };
        let actions = client.handle(inbound(ServerPayload::ChangeHexes(HexChanges {
            changes: vec![HexChange { coords: Coords::new(9, 9), hex: level_two.clone() }],
        })));
        assert!(actions.is_empty());

        let actions = client.handle(inbound(ServerPayload::ChangeHex(HexChange {
            coords: Coords::new(1, 1),
            hex: level_two,
        })));
        assert_eq!(notifications(&actions), [&GameEvent::BoardChanged]);
    }

    #[test]
    fn oversized_board_then_hex_change_is_skipped() {
        let mut client = connected_client();
        let huge = Board { width: 100_000, height: 100_000, ..Board::default() };

        let actions = client.handle(inbound(ServerPayload::SendingBoard(BoardResync { board: huge })));
        assert!(actions.is_empty());

        let actions = client.handle(inbound(ServerPayload::ChangeHex(HexChange {
            coords: Coords::new(0, 99_999),
            hex: Hex::default(),
        })));
        assert!(actions.is_empty());
        assert_eq!(client.game().board().width, 0);
    }

    #[test]
    fn minefield_lifecycle() {
        let mut client = connected_client();
        client.handle(inbound(ServerPayload::DeployMinefields(Minefields {
            minefields: vec![mine(2, 2, 20)],
        })));
        client.handle(inbound(ServerPayload::RevealMinefield(MinefieldRecord { minefield: mine(3, 3, 10) })));
        assert_eq!(client.game().world().minefields.len(), 2);

        client.handle(inbound(ServerPayload::UpdateMinefields(Minefields {
            minefields: vec![mine(2, 2, 5), mine(8, 8, 5)],
        })));
        let densities: Vec<_> = client.game().world().minefields.iter().map(|m| m.density).collect();
        assert_eq!(densities, [5, 10]);

        client.handle(inbound(ServerPayload::RemoveMinefield(MinefieldRecord { minefield: mine(3, 3, 10) })));
        assert_eq!(client.game().world().minefields.len(), 1);
    }

    #[test]
    fn settings_notify_their_kind() {
        let mut client = connected_client();
        let actions = client.handle(inbound(ServerPayload::SendingGameSettings(GameSettings {
            options: hexlink_proto::model::GameOptions::default(),
        })));
        assert_eq!(notifications(&actions), [&GameEvent::SettingsChanged(SettingsKind::GameOptions)]);
    }

    #[test]
    fn tag_info_appends_until_reset() {
        let mut client = connected_client();
        let tag = TagInfo { attacker_id: 1, target_id: Some(2), target_coords: None, shots: 1, missed: false };
        let send = || inbound(ServerPayload::SendingTagInfo(hexlink_proto::payloads::world::TagInfos { tags: vec![tag.clone()] }));

        client.handle(send());
        client.handle(send());
        assert_eq!(client.game().world().tag_info.len(), 2);

        client.handle(inbound(ServerPayload::ResetTagInfo));
        assert!(client.game().world().tag_info.is_empty());
    }
}
