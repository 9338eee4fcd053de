//! Headless hexlink client.
//!
//! Reads lines from stdin: lines starting with `#` run local commands,
//! anything else is sent as chat. Notifications are written to stdout as
//! plain text.
//!
//! # Components
//!
//! - [`commands`]: `done`, `chat`, `who` and `sitrep`
//! - [`console`]: line classification and notification text

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod console;
