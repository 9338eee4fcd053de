//! Session actor over real transports.
//!
//! A scripted server on the other end of a loopback socket or an in-memory
//! channel plays the handshake; the tests observe only what a presentation
//! layer would see: notifications, command replies and the bytes written.

use bytes::BytesMut;
use hexlink_client::{
    ChannelTransport, ClientCommand, ClientConfig, CommandContext, CommandRegistry, GameEvent,
    HumanDecider, Session, TcpTransport,
};
use hexlink_proto::{
    ClientPayload, Frame, FrameDecoder, ServerPayload,
    payloads::session::{IllegalClientVersion, LocalPlayerNumber},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

fn config(version: &str) -> ClientConfig {
    ClientConfig { version: version.to_owned(), keep_game_log: false, ..ClientConfig::named("Tester") }
}

/// Server end of a loopback connection.
struct ScriptedServer {
    stream: TcpStream,
    decoder: FrameDecoder,
}

impl ScriptedServer {
    async fn write(&mut self, payload: ServerPayload) {
        let frame = payload.into_frame(0).expect("payload encodes");
        let mut buf = BytesMut::with_capacity(frame.wire_len());
        frame.encode(&mut buf).expect("frame encodes");
        self.stream.write_all(&buf).await.expect("client reading");
    }

    async fn read(&mut self) -> Option<ClientPayload> {
        let mut chunk = [0u8; 4096];
        loop {
            if let Some(frame) = self.decoder.next_frame().expect("clean stream") {
                return Some(ClientPayload::from_frame(&frame).expect("known payload"));
            }
            let n = self.stream.read(&mut chunk).await.expect("socket open");
            if n == 0 {
                return None;
            }
            self.decoder.push(&chunk[..n]);
        }
    }
}

async fn listen() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let address = listener.local_addr().expect("bound").to_string();
    (listener, address)
}

async fn accept(listener: &TcpListener) -> ScriptedServer {
    let (stream, _) = listener.accept().await.expect("client connects");
    ScriptedServer { stream, decoder: FrameDecoder::new() }
}

#[tokio::test]
async fn rejected_version_over_tcp_disconnects_once() {
    let (listener, address) = listen().await;
    let session = Session::new(config("7.0"), TcpTransport::new(address), HumanDecider);
    let (handle, mut server) = tokio::join!(session.start(), accept(&listener));
    let mut handle = handle.expect("connects");

    server.write(ServerPayload::ServerVersionCheck).await;
    let Some(ClientPayload::ClientVersions(versions)) = server.read().await else {
        unreachable!("client answers the version check");
    };
    assert_eq!(versions.version, "7.0");

    server
        .write(ServerPayload::IllegalClientVersion(IllegalClientVersion {
            server_version: "6.5".to_owned(),
        }))
        .await;

    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }
    assert_eq!(
        events,
        [
            GameEvent::VersionRejected {
                server_version: "6.5".to_owned(),
                client_version: "7.0".to_owned(),
            },
            GameEvent::Disconnected,
        ]
    );
    assert_eq!(server.read().await, None, "client hung up");
    handle.join().await;
}

#[tokio::test]
async fn server_hangup_reports_disconnect_once() {
    let (listener, address) = listen().await;
    let session = Session::new(config("7.0"), TcpTransport::new(address), HumanDecider);
    let (handle, mut server) = tokio::join!(session.start(), accept(&listener));
    let mut handle = handle.expect("connects");

    server.write(ServerPayload::ServerGreeting).await;
    assert_eq!(handle.next_event().await, Some(GameEvent::Connected));
    assert!(matches!(server.read().await, Some(ClientPayload::ClientName(_))));
    drop(server);

    assert_eq!(handle.next_event().await, Some(GameEvent::Disconnected));
    assert_eq!(handle.next_event().await, None);
    handle.join().await;
}

#[tokio::test]
async fn unreachable_server_fails_start() {
    let (listener, address) = listen().await;
    drop(listener);

    let result = Session::new(config("7.0"), TcpTransport::new(address), HumanDecider).start().await;
    assert!(result.is_err());
}

/// Reports the local player id and says hello in chat.
struct Whoami;

impl ClientCommand for Whoami {
    fn name(&self) -> &str {
        "whoami"
    }

    fn help(&self) -> &str {
        "Show the local player id."
    }

    fn run(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> String {
        ctx.send(ClientPayload::Chat(hexlink_proto::payloads::roster::Chat {
            message: "hello".to_owned(),
        }));
        match ctx.local_player() {
            Some(id) => format!("You are player {id}."),
            None => "No player assigned yet.".to_owned(),
        }
    }
}

#[tokio::test]
async fn commands_run_against_live_state() {
    let (transport, mut peer) = ChannelTransport::pair();
    let mut commands = CommandRegistry::new();
    commands.register(Whoami);
    let mut handle = Session::new(config("7.0"), transport, HumanDecider)
        .with_commands(commands)
        .start()
        .await
        .expect("opens");
    let sender = handle.sender();

    peer.send(ServerPayload::ServerGreeting).expect("client alive");
    assert_eq!(handle.next_event().await, Some(GameEvent::Connected));
    peer.next_frame().await.expect("name sent");
    peer.send(ServerPayload::LocalPlayerNumber(LocalPlayerNumber { player_id: 4 }))
        .expect("client alive");

    let mut reply = sender.run_command("#whoami").await.expect("session running");
    while reply != "You are player 4." {
        tokio::task::yield_now().await;
        reply = sender.run_command("#whoami").await.expect("session running");
    }
    let chat: Frame = peer.next_frame().await.expect("command output sent");
    assert!(matches!(ClientPayload::from_frame(&chat), Ok(ClientPayload::Chat(_))));

    let unknown = sender.run_command("#nosuch").await.expect("session running");
    assert_eq!(unknown, "Unknown Client Command.");

    let help = sender.run_command("#help whoami").await.expect("session running");
    assert_eq!(help, "#whoami: Show the local player id.");

    sender.close().expect("running");
    handle.join().await;
}
