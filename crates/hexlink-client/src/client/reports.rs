//! Battle reports and the game log.

use hexlink_core::{GameEvent, ReportKind, game::render};
use hexlink_proto::payloads::turn::{AllReports, Reports};

use super::{Actions, Client};
use crate::event::{ClientAction, GameLogEntry};

fn report_ready(kind: ReportKind, text: String, out: &mut Actions) {
    out.push(ClientAction::Notify(GameEvent::ReportReady { kind, text }));
}

impl Client {
    /// Record one phase of reports.
    ///
    /// The game log opens with the first round's reports. A tactical-genius
    /// reroll also republishes the round report so far.
    pub(super) fn on_phase_reports(&mut self, payload: Reports, tactical_genius: bool, out: &mut Actions) {
        if self.game.round() == 1 {
            self.start_game_log(out);
        }

        self.game.add_reports(payload.reports);
        let phase_report = self.game.reports().phase_report().to_owned();
        self.append_game_log(phase_report.clone(), out);
        report_ready(ReportKind::Phase, phase_report, out);

        if tactical_genius {
            report_ready(ReportKind::Round, self.game.reports().round_report().to_owned(), out);
        }
    }

    pub(super) fn on_special_reports(&mut self, payload: &Reports, out: &mut Actions) {
        report_ready(ReportKind::Special, render(&payload.reports), out);
    }

    /// Replace the report history, rewriting the game log from scratch.
    pub(super) fn on_all_reports(&mut self, payload: AllReports, out: &mut Actions) {
        if self.config.keep_game_log {
            self.game_log_started = true;
            out.push(ClientAction::GameLog(GameLogEntry::Start));
            for round in &payload.rounds {
                out.push(ClientAction::GameLog(GameLogEntry::Append(render(round))));
            }
        }

        tracing::debug!(rounds = payload.rounds.len(), "report history replaced");
        self.game.set_all_reports(payload.rounds);
        report_ready(ReportKind::Round, self.game.reports().round_report().to_owned(), out);
    }
}
