use serde::{Deserialize, Serialize};

use super::EntityId;

/// One fragment of a battle report.
///
/// Fragment text may contain `<span id='N'></span>` placeholders naming
/// entity `N`; they are resolved by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Report {
    /// Message catalogue id.
    pub message_id: u32,
    /// Fully formatted fragment text.
    pub text: String,
    /// Entity the fragment is about, if any.
    pub subject: Option<EntityId>,
    /// Indentation level.
    pub indentation: u8,
    /// Line breaks after the fragment.
    pub newlines: u8,
}

impl Report {
    /// A fragment with no subject, indentation or trailing newline.
    #[must_use]
    pub fn text(message_id: u32, text: impl Into<String>) -> Self {
        Self { message_id, text: text.into(), subject: None, indentation: 0, newlines: 0 }
    }

    /// Fragment as it appears in a concatenated report.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.text.len() + 8);
        for _ in 0..self.indentation {
            out.push_str("    ");
        }
        out.push_str(&self.text);
        for _ in 0..self.newlines {
            out.push('\n');
        }
        out
    }
}
