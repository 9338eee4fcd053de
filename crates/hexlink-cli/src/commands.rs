//! Local commands available from the console.

use hexlink_client::{ClientCommand, CommandContext, CommandRegistry, outbound};
use hexlink_core::GameState;
use hexlink_proto::model::PlayerId;

/// Registry with the console commands and the built-in `help`.
pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Done);
    registry.register(Chat);
    registry.register(Who);
    registry.register(Sitrep);
    registry
}

/// Marks the local player done, or not done with `#done off`.
struct Done;

impl ClientCommand for Done {
    fn name(&self) -> &str {
        "done"
    }

    fn help(&self) -> &str {
        "Finish the current phase. Usage: #done [off]"
    }

    fn run(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> String {
        let done = match args {
            [] | ["on"] => true,
            ["off"] => false,
            _ => return format!("Usage: {}", self.help()),
        };
        if ctx.local_player().is_none() {
            return "Not seated yet.".to_owned();
        }
        ctx.send(outbound::done(done));
        if done { "Marked done.".to_owned() } else { "No longer done.".to_owned() }
    }
}

/// Sends the rest of the line as chat, `#` prefix and all.
struct Chat;

impl ClientCommand for Chat {
    fn name(&self) -> &str {
        "chat"
    }

    fn help(&self) -> &str {
        "Send a chat line verbatim. Usage: #chat <text>"
    }

    fn run(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> String {
        if args.is_empty() {
            return format!("Usage: {}", self.help());
        }
        ctx.send(outbound::chat(args.join(" ")));
        String::new()
    }
}

/// Lists the roster.
struct Who;

impl ClientCommand for Who {
    fn name(&self) -> &str {
        "who"
    }

    fn help(&self) -> &str {
        "List connected players."
    }

    fn run(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> String {
        let local = ctx.local_player();
        let lines: Vec<String> = ctx
            .game()
            .players()
            .map(|p| {
                let mut line = format!("{}: {}", p.id, p.name);
                if p.team != 0 {
                    line.push_str(&format!(" (team {})", p.team));
                }
                for (flag, label) in [(p.bot, "bot"), (p.observer, "observer"), (p.done, "done")] {
                    if flag {
                        line.push_str(&format!(" [{label}]"));
                    }
                }
                if Some(p.id) == local {
                    line.push_str(" <- you");
                }
                line
            })
            .collect();
        if lines.is_empty() { "No players.".to_owned() } else { lines.join("\n") }
    }
}

/// Summarizes round, phase, units and whose turn it is.
struct Sitrep;

impl ClientCommand for Sitrep {
    fn name(&self) -> &str {
        "sitrep"
    }

    fn help(&self) -> &str {
        "Summarize the current round, phase and turn."
    }

    fn run(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> String {
        sitrep(ctx.game(), ctx.local_player())
    }
}

fn sitrep(game: &GameState, local: Option<PlayerId>) -> String {
    let total = game.entities().filter(|e| !e.destroyed).count();
    let mine = game.entities().filter(|e| !e.destroyed && Some(e.owner_id) == local).count();

    let turn = match game.turns().current().map(|t| t.player_id) {
        None => "nobody".to_owned(),
        Some(None) => "any player".to_owned(),
        Some(Some(id)) if Some(id) == local => "yours".to_owned(),
        Some(Some(id)) => game.player(id).map_or_else(|| format!("player {id}"), |p| p.name.clone()),
    };

    format!(
        "Round {}, {} phase. {total} units in play, {mine} yours. Turn: {turn}.",
        game.round(),
        game.phase()
    )
}
