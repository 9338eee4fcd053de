//! Battle report log.
//!
//! Reports arrive as fragments, one batch per phase. The log keeps them per
//! round and renders two views: the phase report (the latest batch) and the
//! round report (everything so far this round).

use std::collections::BTreeMap;

use hexlink_proto::model::{EntityId, Report};

const PLACEHOLDER_OPEN: &str = "<span id='";
const PLACEHOLDER_CLOSE: &str = "'></span>";

/// Report fragments keyed by round, with the rendered views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportLog {
    rounds: BTreeMap<u32, Vec<Report>>,
    phase_report: String,
    round_report: String,
}

impl ReportLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one phase worth of fragments to `round` and re-render.
    pub fn add(&mut self, round: u32, reports: Vec<Report>) {
        self.phase_report = render(&reports);
        let entries = self.rounds.entry(round).or_default();
        entries.extend(reports);
        self.round_report = render(entries);
    }

    /// Replace the whole log. The `n`th batch belongs to round `n`.
    ///
    /// Both views show the fragments of `current_round`, empty when the
    /// history has none for it.
    pub fn set_all(&mut self, current_round: u32, rounds: Vec<Vec<Report>>) {
        self.rounds = (0u32..).zip(rounds).collect();
        self.round_report = render(self.round(current_round));
        self.phase_report.clone_from(&self.round_report);
    }

    /// Fragments of one round.
    #[must_use]
    pub fn round(&self, round: u32) -> &[Report] {
        self.rounds.get(&round).map_or(&[], Vec::as_slice)
    }

    /// Rounds with their fragments, oldest first.
    pub fn rounds(&self) -> impl Iterator<Item = (u32, &[Report])> {
        self.rounds.iter().map(|(&round, reports)| (round, reports.as_slice()))
    }

    /// Latest phase report.
    #[must_use]
    pub fn phase_report(&self) -> &str {
        &self.phase_report
    }

    /// Report of the current round so far.
    #[must_use]
    pub fn round_report(&self) -> &str {
        &self.round_report
    }
}

/// Concatenate fragments into report text.
#[must_use]
pub fn render(reports: &[Report]) -> String {
    reports.iter().map(Report::render).collect()
}

/// Source of inline images for entities named in reports.
pub trait EntityIconLookup {
    /// Markup to show for the entity, or `None` to leave the placeholder.
    fn icon_for(&self, entity_id: EntityId) -> Option<String>;
}

impl<F> EntityIconLookup for F
where
    F: Fn(EntityId) -> Option<String>,
{
    fn icon_for(&self, entity_id: EntityId) -> Option<String> {
        self(entity_id)
    }
}

/// Replace `<span id='N'></span>` placeholders with entity icons.
///
/// Placeholders whose id does not parse or that the lookup does not know
/// are kept verbatim.
pub fn resolve_entity_placeholders(text: &str, lookup: &impl EntityIconLookup) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        let (before, tail) = rest.split_at(start);
        out.push_str(before);

        let after_open = &tail[PLACEHOLDER_OPEN.len()..];
        let resolved = after_open.find(PLACEHOLDER_CLOSE).and_then(|end| {
            let id = after_open[..end].parse::<EntityId>().ok()?;
            let icon = lookup.icon_for(id)?;
            Some((icon, PLACEHOLDER_OPEN.len() + end + PLACEHOLDER_CLOSE.len()))
        });

        match resolved {
            Some((icon, consumed)) => {
                out.push_str(&icon);
                rest = &tail[consumed..];
            },
            None => {
                out.push_str(PLACEHOLDER_OPEN);
                rest = after_open;
            },
        }
    }

    out.push_str(rest);
    out
}
