use serde::{Deserialize, Serialize};

use super::{EntityAction, EntityId, MovePath, WeaponAttack};

/// Discriminator shared by feedback requests and their answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeedbackKind {
    /// Unit was displaced and may step aside.
    DominoEffect,
    /// Assign anti-missile system to an incoming attack.
    AmsAssign,
    /// Assign point-defense system to an incoming attack.
    ApdsAssign,
    /// Hidden unit may take a point-blank shot.
    HiddenPointBlankShot,
    /// Choose a teleguided missile target.
    TeleguidedTarget,
    /// Choose a TAG target.
    TagTarget,
}

/// Decision the server needs before play can continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackRequest {
    /// Entity was pushed; it may move out of the way.
    DominoEffect {
        /// Displaced entity.
        entity_id: EntityId,
    },
    /// Pick which attack the AMS engages.
    AmsAssign {
        /// Defending entity.
        entity_id: EntityId,
        /// AMS equipment number.
        ams_equipment: u32,
        /// Candidate incoming attacks.
        attacks: Vec<WeaponAttack>,
    },
    /// Pick which attack the APDS engages.
    ApdsAssign {
        /// Defending entity.
        entity_id: EntityId,
        /// Distance to each candidate attack.
        distances: Vec<u32>,
        /// Candidate incoming attacks.
        attacks: Vec<WeaponAttack>,
    },
    /// Hidden unit may fire at an adjacent unit that just moved.
    HiddenPointBlankShot {
        /// Hidden entity.
        entity_id: EntityId,
        /// Unit that moved next to it.
        target_id: EntityId,
    },
    /// Pick a target for a teleguided missile.
    TeleguidedTarget {
        /// Candidate targets.
        targets: Vec<EntityId>,
        /// To-hit number for each candidate.
        to_hit_values: Vec<u32>,
    },
    /// Pick a TAG target.
    TagTarget {
        /// Candidate targets.
        targets: Vec<EntityId>,
        /// Target type code for each candidate.
        target_kinds: Vec<u32>,
    },
}

impl FeedbackRequest {
    /// Kind discriminator.
    #[must_use]
    pub const fn kind(&self) -> FeedbackKind {
        match self {
            Self::DominoEffect { .. } => FeedbackKind::DominoEffect,
            Self::AmsAssign { .. } => FeedbackKind::AmsAssign,
            Self::ApdsAssign { .. } => FeedbackKind::ApdsAssign,
            Self::HiddenPointBlankShot { .. } => FeedbackKind::HiddenPointBlankShot,
            Self::TeleguidedTarget { .. } => FeedbackKind::TeleguidedTarget,
            Self::TagTarget { .. } => FeedbackKind::TagTarget,
        }
    }

    /// Number of choices for index-based answers; `None` for other kinds.
    #[must_use]
    pub fn choice_count(&self) -> Option<usize> {
        match self {
            Self::AmsAssign { attacks, .. } | Self::ApdsAssign { attacks, .. } => Some(attacks.len()),
            Self::TeleguidedTarget { targets, .. } | Self::TagTarget { targets, .. } => {
                Some(targets.len())
            },
            Self::DominoEffect { .. } | Self::HiddenPointBlankShot { .. } => None,
        }
    }
}

/// Client's answer to a [`FeedbackRequest`], echoing its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackResponse {
    /// Step aside along `path`, or stay put with `None`.
    DominoEffect {
        /// Chosen path.
        path: Option<MovePath>,
    },
    /// Index into the request's attacks, or `None` to hold fire.
    AmsAssign {
        /// Chosen attack.
        attack_index: Option<u32>,
    },
    /// Index into the request's attacks, or `None` to hold fire.
    ApdsAssign {
        /// Chosen attack.
        attack_index: Option<u32>,
    },
    /// Point-blank attacks to make; empty to stay hidden.
    HiddenPointBlankShot {
        /// Declared attacks.
        attacks: Vec<EntityAction>,
    },
    /// Index into the request's targets.
    TeleguidedTarget {
        /// Chosen target.
        target_index: u32,
    },
    /// Index into the request's targets.
    TagTarget {
        /// Chosen target.
        target_index: u32,
    },
}

impl FeedbackResponse {
    /// Kind discriminator.
    #[must_use]
    pub const fn kind(&self) -> FeedbackKind {
        match self {
            Self::DominoEffect { .. } => FeedbackKind::DominoEffect,
            Self::AmsAssign { .. } => FeedbackKind::AmsAssign,
            Self::ApdsAssign { .. } => FeedbackKind::ApdsAssign,
            Self::HiddenPointBlankShot { .. } => FeedbackKind::HiddenPointBlankShot,
            Self::TeleguidedTarget { .. } => FeedbackKind::TeleguidedTarget,
            Self::TagTarget { .. } => FeedbackKind::TagTarget,
        }
    }

    /// Chosen index for index-based answers.
    #[must_use]
    pub fn chosen_index(&self) -> Option<u32> {
        match self {
            Self::AmsAssign { attack_index } | Self::ApdsAssign { attack_index } => *attack_index,
            Self::TeleguidedTarget { target_index } | Self::TagTarget { target_index } => {
                Some(*target_index)
            },
            Self::DominoEffect { .. } | Self::HiddenPointBlankShot { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_between_request_and_response() {
        let request = FeedbackRequest::TagTarget { targets: vec![1, 2], target_kinds: vec![0, 0] };
        let response = FeedbackResponse::TagTarget { target_index: 1 };
        assert_eq!(request.kind(), response.kind());
        assert_eq!(request.choice_count(), Some(2));
        assert_eq!(response.chosen_index(), Some(1));
    }

    #[test]
    fn domino_has_no_choices() {
        let request = FeedbackRequest::DominoEffect { entity_id: 3 };
        assert_eq!(request.choice_count(), None);
        assert_eq!(FeedbackResponse::DominoEffect { path: None }.chosen_index(), None);
    }
}
