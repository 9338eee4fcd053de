//! Local `#command` surface.
//!
//! Lines typed as `#name arg arg` are run locally instead of going to chat.
//! Commands read the game through [`CommandContext`] and queue outbound
//! payloads there; they never touch the connection directly.

use std::collections::BTreeMap;

use hexlink_core::GameState;
use hexlink_proto::{ClientPayload, model::PlayerId};

use crate::error::ClientError;

/// Reply for a line that names no registered command.
pub const UNKNOWN_COMMAND: &str = "Unknown Client Command.";

/// Prefix marking a chat line as a local command.
pub const COMMAND_PREFIX: char = '#';

/// A command runnable from the chat line.
pub trait ClientCommand: Send + Sync {
    /// Name typed after `#`.
    fn name(&self) -> &str;

    /// One-line usage help.
    fn help(&self) -> &str;

    /// Run with the arguments following the name; returns the reply text.
    fn run(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> String;
}

/// What a command may see and do while it runs.
pub struct CommandContext<'a> {
    game: &'a GameState,
    local_player: Option<PlayerId>,
    commands: &'a BTreeMap<String, Box<dyn ClientCommand>>,
    outbound: Vec<ClientPayload>,
}

impl<'a> CommandContext<'a> {
    /// Read-only game state.
    #[must_use]
    pub fn game(&self) -> &'a GameState {
        self.game
    }

    /// Local player id, once assigned.
    #[must_use]
    pub fn local_player(&self) -> Option<PlayerId> {
        self.local_player
    }

    /// Help text of a registered command.
    #[must_use]
    pub fn help_for(&self, name: &str) -> Option<&'a str> {
        self.commands.get(name).map(|c| c.help())
    }

    /// Registered command names in sorted order.
    pub fn command_names(&self) -> impl Iterator<Item = &'a str> {
        self.commands.keys().map(String::as_str)
    }

    /// Queue a payload to send once the command returns.
    pub fn send(&mut self, payload: ClientPayload) {
        self.outbound.push(payload);
    }
}

/// Result of running a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Text shown to the local user.
    pub reply: String,
    /// Payloads the command asked to send, in order.
    pub outbound: Vec<ClientPayload>,
}

/// Registered local commands by name.
pub struct CommandRegistry {
    commands: BTreeMap<String, Box<dyn ClientCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry").field("commands", &self.commands.keys()).finish()
    }
}

impl CommandRegistry {
    /// Registry holding only the built-in `help`.
    pub fn new() -> Self {
        let mut registry = Self { commands: BTreeMap::new() };
        registry.register(HelpCommand);
        registry
    }

    /// Add a command, replacing any command of the same name.
    ///
    /// Returns the replaced command.
    pub fn register(&mut self, command: impl ClientCommand + 'static) -> Option<Box<dyn ClientCommand>> {
        let name = command.name().to_owned();
        let replaced = self.commands.insert(name, Box::new(command));
        if let Some(old) = &replaced {
            tracing::debug!(command = old.name(), "command replaced");
        }
        replaced
    }

    /// Command registered under `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&dyn ClientCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Run a command line.
    ///
    /// The leading `#` is optional. The rest is split on whitespace; the
    /// first token names the command and the others are its arguments.
    ///
    /// # Errors
    ///
    /// - `ClientError::UnknownCommand` if no command has that name
    pub fn try_run(
        &self,
        line: &str,
        game: &GameState,
        local_player: Option<PlayerId>,
    ) -> Result<CommandOutput, ClientError> {
        let line = line.trim_start();
        let line = line.strip_prefix(COMMAND_PREFIX).unwrap_or(line);
        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.collect();

        let command = self
            .commands
            .get(name)
            .ok_or_else(|| ClientError::UnknownCommand { name: name.to_owned() })?;

        let mut ctx =
            CommandContext { game, local_player, commands: &self.commands, outbound: Vec::new() };
        tracing::debug!(command = name, args = args.len(), "running local command");
        let reply = command.run(&args, &mut ctx);
        Ok(CommandOutput { reply, outbound: ctx.outbound })
    }

    /// Run a command line, replying [`UNKNOWN_COMMAND`] for unknown names.
    pub fn run(&self, line: &str, game: &GameState, local_player: Option<PlayerId>) -> CommandOutput {
        self.try_run(line, game, local_player).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "local command rejected");
            CommandOutput { reply: UNKNOWN_COMMAND.to_owned(), outbound: Vec::new() }
        })
    }
}

/// Lists commands, or shows the help of one.
struct HelpCommand;

impl ClientCommand for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn help(&self) -> &str {
        "Lists all of the commands available, or gives help on a specific command. Usage: #help [command]"
    }

    fn run(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> String {
        let names = ctx.command_names().collect::<Vec<_>>().join(", ");
        match args.first() {
            None => format!(
                "Type #help [command] for help on a specific command. Commands available: {names}"
            ),
            Some(name) => match ctx.help_for(name) {
                Some(help) => format!("#{name}: {help}"),
                None => format!("Command \"{name}\" not recognized. Commands available: {names}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    struct Echo;

    impl ClientCommand for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn help(&self) -> &str {
            "Repeats its arguments."
        }

        fn run(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> String {
            let text = args.join(" ");
            ctx.send(ClientPayload::Chat(hexlink_proto::payloads::roster::Chat { message: text.clone() }));
            text
        }
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(Echo);
        registry
    }

    #[test]
    fn unknown_command_reply() {
        let game = GameState::new();
        let output = registry().run("#frobnicate now", &game, None);
        assert_eq!(output.reply, UNKNOWN_COMMAND);
        assert!(output.outbound.is_empty());

        assert_eq!(
            registry().try_run("#", &game, None),
            Err(ClientError::UnknownCommand { name: String::new() })
        );
    }

    #[test]
    fn command_queues_outbound() {
        let game = GameState::new();
        let output = registry().run("#echo  hello\tthere ", &game, Some(1));
        assert_eq!(output.reply, "hello there");
        assert_eq!(output.outbound.len(), 1);
    }

    #[test]
    fn help_lists_and_describes() {
        let game = GameState::new();
        let registry = registry();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["echo", "help"]);

        let all = registry.run("#help", &game, None).reply;
        assert!(all.ends_with("Commands available: echo, help"));

        let one = registry.run("#help echo", &game, None).reply;
        assert_eq!(one, "#echo: Repeats its arguments.");
    }

    #[test]
    fn register_replaces_by_name() {
        let mut registry = registry();
        assert!(registry.register(Echo).is_some());
        assert!(registry.lookup("echo").is_some());
        assert!(registry.lookup("who").is_none());
    }

    proptest! {
        #[test]
        fn tokens_split_on_any_whitespace(
            words in prop::collection::vec("[a-z]{1,6}", 0..6),
            gaps in prop::collection::vec(prop::sample::select(vec![" ", "  ", "\t", " \t "]), 6),
        ) {
            let mut line = String::from("#echo");
            for (word, gap) in words.iter().zip(gaps.iter().cycle()) {
                line.push_str(gap);
                line.push_str(word);
            }

            let game = GameState::new();
            let output = registry().run(&line, &game, None);
            prop_assert_eq!(output.reply, words.join(" "));
        }
    }
}
