//! Tests for the operator console

mod common;

use common::{TestServer, recv_until, wait_until};
use stellarlink::SessionId;
use stellarlink::console::{Console, ConsoleCommand, ConsoleFlow};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

fn drain_output(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    let mut text = String::new();
    while let Ok(chunk) = rx.try_recv() {
        text.push_str(&chunk);
    }
    text
}

#[test]
fn test_parse_menu_commands() {
    assert_eq!(ConsoleCommand::parse("").unwrap(), ConsoleCommand::Empty);
    assert_eq!(ConsoleCommand::parse("   ").unwrap(), ConsoleCommand::Empty);
    assert_eq!(ConsoleCommand::parse("list").unwrap(), ConsoleCommand::List);
    assert_eq!(ConsoleCommand::parse("exit").unwrap(), ConsoleCommand::Exit);
    assert_eq!(ConsoleCommand::parse("help").unwrap(), ConsoleCommand::Help);
    assert_eq!(
        ConsoleCommand::parse("select 3").unwrap(),
        ConsoleCommand::Select(SessionId::new(3))
    );
    assert_eq!(
        ConsoleCommand::parse("close  12").unwrap(),
        ConsoleCommand::Close(SessionId::new(12))
    );
}

#[test]
fn test_parse_rejects_bad_input() {
    let err = |line: &str| ConsoleCommand::parse(line).unwrap_err().to_string();

    assert_eq!(err("select"), "Usage: select <id>");
    assert_eq!(err("close 1 2"), "Usage: close <id>");
    assert_eq!(err("select one"), "Invalid ID");
    assert_eq!(err("close -1"), "Invalid ID");
    assert!(err("reboot").starts_with("Unknown command."));
}

#[tokio::test]
async fn test_operator_session_walkthrough() {
    let server = TestServer::start_quiet().await;
    let (out, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(server.manager.clone(), out);

    let peer = server.connect().await;
    let address = peer.local_addr().unwrap().to_string();
    let (reader, mut writer) = peer.into_split();
    let mut reader = BufReader::new(reader);

    console.handle_line("list").await;
    assert!(drain_output(&mut rx).contains(&format!("[1] {address}")));

    // Output while nobody is attached is buffered
    writer.write_all(b"hello\n").await.unwrap();
    let manager = server.manager.clone();
    wait_until(move || {
        manager
            .find(SessionId::new(1))
            .is_some_and(|s| s.pending_bytes() == 6)
    })
    .await;

    assert_eq!(console.handle_line("select 1").await, ConsoleFlow::Continue);
    assert_eq!(console.selected(), Some(SessionId::new(1)));
    let shown = drain_output(&mut rx);
    assert!(shown.contains("Buffered messages:\nhello\n"));
    assert!(shown.contains(&format!("Connected to {address} (ID: 1)")));

    // Attached: input goes to the peer, peer output comes back live
    console.handle_line("uname").await;
    let mut line = String::new();
    reader.read_line(&mut line).await.unwrap();
    assert_eq!(line, "uname\n");

    writer.write_all(b"Linux\n").await.unwrap();
    recv_until(&mut rx, "Linux\n").await;

    // `exit` while attached only returns to the menu
    assert_eq!(console.handle_line("exit").await, ConsoleFlow::Continue);
    assert_eq!(console.selected(), None);
    assert!(server.manager.find(SessionId::new(1)).is_some());

    // Peer hangs up: the session disappears from the listing
    drop(writer);
    drop(reader);
    let manager = server.manager.clone();
    wait_until(move || manager.find(SessionId::new(1)).is_none()).await;

    drain_output(&mut rx);
    console.handle_line("list").await;
    assert!(!drain_output(&mut rx).contains("[1]"));
}

#[tokio::test]
async fn test_close_command() {
    let server = TestServer::start_quiet().await;
    let (out, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(server.manager.clone(), out);
    let _peer = server.connect().await;

    console.handle_line("close 1").await;
    assert_eq!(drain_output(&mut rx), "Closed connection 1\n");

    console.handle_line("close 1").await;
    assert_eq!(drain_output(&mut rx), "No connection with ID 1\n");
}

#[tokio::test]
async fn test_help_lists_commands() {
    let server = TestServer::start_quiet().await;
    let (out, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(server.manager.clone(), out);

    console.handle_line("help").await;
    let shown = drain_output(&mut rx);
    for command in ["list", "select <id>", "close <id>", "exit"] {
        assert!(shown.contains(command), "menu lacks {command}");
    }
}

#[tokio::test]
async fn test_select_unknown_session_stays_in_menu() {
    let server = TestServer::start_quiet().await;
    let (out, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(server.manager.clone(), out);

    console.handle_line("select 5").await;
    assert_eq!(drain_output(&mut rx), "No connection with ID 5\n");
    assert_eq!(console.selected(), None);
}

#[tokio::test]
async fn test_exit_closes_every_session() {
    let server = TestServer::start_quiet().await;
    let (out, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(server.manager.clone(), out);
    let _a = server.connect().await;
    let _b = server.connect().await;

    assert_eq!(console.handle_line("exit").await, ConsoleFlow::Exit);
    assert!(drain_output(&mut rx).contains("Shutting down server..."));
    assert!(server.manager.is_empty());
}

#[tokio::test]
async fn test_run_stops_at_end_of_input() {
    let server = TestServer::start_quiet().await;
    let (out, mut rx) = mpsc::unbounded_channel();
    let mut console = Console::new(server.manager.clone(), out);
    let _peer = server.connect().await;

    let input: &[u8] = b"list\nbogus\n";
    console.run(input).await.unwrap();

    let shown = drain_output(&mut rx);
    assert!(shown.contains("Active connections:"));
    assert!(shown.contains("Unknown command."));
    assert!(shown.ends_with("Shutting down server...\n"));
    assert!(server.manager.is_empty());
}
