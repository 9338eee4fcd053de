//! Outstanding feedback requests.
//!
//! The server asks for at most one decision of each kind at a time, so
//! requests are correlated with answers by kind alone. A second request of
//! the same kind supersedes the first.

use std::collections::BTreeMap;

use hexlink_proto::model::{FeedbackKind, FeedbackRequest, FeedbackResponse};

use crate::error::ClientError;

/// Requests waiting for a local answer, one per kind.
#[derive(Debug, Clone, Default)]
pub struct FeedbackTracker {
    outstanding: BTreeMap<FeedbackKind, FeedbackRequest>,
}

impl FeedbackTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request; returns the request of the same kind it replaced.
    pub fn record(&mut self, request: FeedbackRequest) -> Option<FeedbackRequest> {
        self.outstanding.insert(request.kind(), request)
    }

    /// Match an answer with its request and retire the request.
    ///
    /// # Errors
    ///
    /// - `ClientError::NoOutstandingRequest` if nothing of that kind is
    ///   waiting
    pub fn answer(&mut self, response: &FeedbackResponse) -> Result<FeedbackRequest, ClientError> {
        let kind = response.kind();
        let request =
            self.outstanding.remove(&kind).ok_or(ClientError::NoOutstandingRequest(kind))?;

        if let (Some(index), Some(choices)) = (response.chosen_index(), request.choice_count())
            && index as usize >= choices
        {
            tracing::warn!(?kind, index, choices, "feedback answer picks a missing choice");
        }
        Ok(request)
    }

    /// Outstanding request of one kind.
    #[must_use]
    pub fn outstanding(&self, kind: FeedbackKind) -> Option<&FeedbackRequest> {
        self.outstanding.get(&kind)
    }

    /// Number of outstanding requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outstanding.len()
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Drop every outstanding request.
    pub fn clear(&mut self) {
        self.outstanding.clear();
    }
}
