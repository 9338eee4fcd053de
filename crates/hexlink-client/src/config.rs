//! Per-session client configuration.

use std::path::PathBuf;

/// Settings for one client session.
///
/// Built explicitly by whoever starts the session; nothing reads global
/// preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Name requested in the handshake.
    pub player_name: String,
    /// Release version announced to the server.
    pub version: String,
    /// Build identity announced to the server.
    pub build: String,
    /// Keep an HTML log of chat and reports.
    pub keep_game_log: bool,
    /// Game log location.
    pub game_log_path: PathBuf,
    /// Directory for end-of-game files.
    pub log_dir: PathBuf,
    /// Add a date and time stamp to end-of-game file names.
    pub stamp_filenames: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            build: String::new(),
            keep_game_log: true,
            game_log_path: PathBuf::from("logs").join("gamelog.html"),
            log_dir: PathBuf::from("logs"),
            stamp_filenames: false,
        }
    }
}

impl ClientConfig {
    /// Default configuration with a player name.
    #[must_use]
    pub fn named(player_name: impl Into<String>) -> Self {
        Self { player_name: player_name.into(), ..Self::default() }
    }

    /// File the end-of-game entity status is written to.
    ///
    /// `stamp` is the date-time text inserted before the extension when
    /// filename stamping is on.
    #[must_use]
    pub fn entity_status_path(&self, stamp: &str) -> PathBuf {
        let name = if self.stamp_filenames {
            format!("entitystatus_{stamp}.txt")
        } else {
            "entitystatus.txt".to_owned()
        };
        self.log_dir.join(name)
    }
}
