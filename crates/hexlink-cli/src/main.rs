//! Hexlink console client.
//!
//! # Usage
//!
//! ```bash
//! # Join a local server
//! hexlink --name Natasha
//!
//! # Join a remote server without keeping a game log
//! hexlink --server 10.0.0.5:2346 --name Natasha --no-game-log
//! ```

use std::path::PathBuf;

use clap::Parser;
use hexlink_cli::{
    commands,
    console::{self, Input},
};
use hexlink_client::{
    ClientConfig, GameEvent, HumanDecider, Session, SessionSender, TcpTransport, outbound,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Hexlink console client
#[derive(Parser, Debug)]
#[command(name = "hexlink")]
#[command(about = "Headless client for hex-grid tactical games")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:2346")]
    server: String,

    /// Player name requested from the server
    #[arg(short, long, default_value = "Player")]
    name: String,

    /// Do not keep an HTML game log
    #[arg(long)]
    no_game_log: bool,

    /// Game log location
    #[arg(long, default_value = "logs/gamelog.html")]
    game_log: PathBuf,

    /// Directory for end-of-game files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Stamp end-of-game file names with date and time
    #[arg(long)]
    stamp_filenames: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            keep_game_log: !self.no_game_log,
            game_log_path: self.game_log.clone(),
            log_dir: self.log_dir.clone(),
            stamp_filenames: self.stamp_filenames,
            ..ClientConfig::named(&self.name)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    tracing::info!(server = %args.server, name = %args.name, "connecting");

    let mut handle = Session::new(args.client_config(), TcpTransport::new(&args.server), HumanDecider)
        .with_commands(commands::registry())
        .start()
        .await?;
    let sender = handle.sender();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            event = handle.next_event() => {
                let Some(event) = event else { break };
                if let Some(text) = console::describe(&event) {
                    show(&mut stdout, &text).await?;
                }
                if matches!(event, GameEvent::Disconnected) {
                    break;
                }
            },
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    let reply = dispatch(&sender, &line).await;
                    if !reply.is_empty() {
                        show(&mut stdout, &reply).await?;
                    }
                },
                None => {
                    stdin_open = false;
                    if sender.close().is_err() {
                        break;
                    }
                },
            },
        }
    }

    handle.join().await;
    tracing::info!("session closed");
    Ok(())
}

/// Run one console line; returns text to show, possibly empty.
async fn dispatch(sender: &SessionSender, line: &str) -> String {
    let result = match console::parse_line(line) {
        Some(Input::Command(command)) => sender.run_command(command).await,
        Some(Input::Chat(message)) => sender.send(outbound::chat(message)).await.map(|()| String::new()),
        None => Ok(String::new()),
    };
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "console input not delivered");
        err.to_string()
    })
}

async fn show(stdout: &mut Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
