//! Integration tests for the server accept loop and the full
//! subscribe-then-receive connection flow.

use std::sync::Arc;
use std::time::Duration;

use barricade::prelude::*;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port; returns its address and hub handle.
async fn start_server() -> (String, Arc<GameHub>) {
    let server = BarricadeServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();
    let hub = server.hub();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    (addr, hub)
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn recv_json(ws: &mut ClientWs) -> serde_json::Value {
    let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("frame within deadline")
        .unwrap()
        .expect("recv");
    serde_json::from_str(msg.to_text().expect("text frame")).expect("json")
}

fn profile(name: &str) -> PlayerProfile {
    PlayerProfile {
        name: name.to_owned(),
        color: "#aabbcc".to_owned(),
    }
}

/// Sends the subscribe frame and returns (ack, baseline view).
async fn subscribe(
    ws: &mut ClientWs,
    game: GameId,
) -> (serde_json::Value, serde_json::Value) {
    ws.send(Message::Text(game.0.to_string().into()))
        .await
        .expect("send subscribe");
    let ack = recv_json(ws).await;
    let view = recv_json(ws).await;
    (ack, view)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_subscribe_receives_ack_and_baseline_view() {
    let (addr, hub) = start_server().await;
    let created = hub.create(UserId(1), &profile("ada")).await.unwrap();

    let mut ws = connect(&addr).await;
    let (ack, view) = subscribe(&mut ws, created.id).await;

    assert_eq!(ack["subscribed"], true);
    assert_eq!(ack["gameId"], created.id.0);
    assert_eq!(view["id"], created.id.0);
    assert_eq!(view["joinCode"], created.join_code.as_str());
    assert_eq!(view["phase"], "START");
}

#[tokio::test]
async fn test_subscribe_unknown_game_gets_error() {
    let (addr, _hub) = start_server().await;

    let mut ws = connect(&addr).await;
    ws.send(Message::Text("4040".to_string().into()))
        .await
        .expect("send");

    let reply = recv_json(&mut ws).await;
    assert!(reply["error"]
        .as_str()
        .expect("error field")
        .contains("not found"));
}

#[tokio::test]
async fn test_subscribe_garbage_gets_error() {
    let (addr, _hub) = start_server().await;

    let mut ws = connect(&addr).await;
    ws.send(Message::Text("not-a-game-id".to_string().into()))
        .await
        .expect("send");

    let reply = recv_json(&mut ws).await;
    assert_eq!(reply["error"], "expected a game id");
}

#[tokio::test]
async fn test_mutation_is_pushed_to_all_subscribers() {
    let (addr, hub) = start_server().await;
    let created = hub.create(UserId(1), &profile("ada")).await.unwrap();

    let mut ws1 = connect(&addr).await;
    let mut ws2 = connect(&addr).await;
    subscribe(&mut ws1, created.id).await;
    subscribe(&mut ws2, created.id).await;

    hub.add_vote(created.id).await.unwrap();

    let view1 = recv_json(&mut ws1).await;
    let view2 = recv_json(&mut ws2).await;
    assert_eq!(view1["nbVotes"], 1);
    assert_eq!(view1, view2);
}

#[tokio::test]
async fn test_subscribers_of_other_games_stay_quiet() {
    let (addr, hub) = start_server().await;
    let one = hub.create(UserId(1), &profile("ada")).await.unwrap();
    let two = hub.create(UserId(2), &profile("bob")).await.unwrap();

    let mut ws = connect(&addr).await;
    subscribe(&mut ws, two.id).await;

    hub.add_vote(one.id).await.unwrap();

    // Nothing should arrive for the other game's watcher.
    let result =
        tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(result.is_err(), "unexpected frame: {result:?}");
}

#[tokio::test]
async fn test_closed_client_is_pruned_and_broadcast_continues() {
    let (addr, hub) = start_server().await;
    let created = hub.create(UserId(1), &profile("ada")).await.unwrap();

    let mut gone = connect(&addr).await;
    let mut stays = connect(&addr).await;
    subscribe(&mut gone, created.id).await;
    subscribe(&mut stays, created.id).await;

    gone.close(None).await.expect("close");
    // Let the server notice the close.
    tokio::time::sleep(Duration::from_millis(50)).await;

    hub.add_vote(created.id).await.unwrap();

    let view = recv_json(&mut stays).await;
    assert_eq!(view["nbVotes"], 1);
}

#[tokio::test]
async fn test_role_assignment_reaches_the_room() {
    let (addr, hub) = start_server().await;
    let created = hub.create(UserId(1), &profile("ada")).await.unwrap();
    hub.join(&created.join_code, UserId(2), &profile("bob"))
        .await
        .unwrap();

    let mut ws = connect(&addr).await;
    subscribe(&mut ws, created.id).await;

    hub.assign_roles(created.id).await.unwrap();

    let view = recv_json(&mut ws).await;
    assert_eq!(view["phase"], "ON_GOING");
    for player in view["players"].as_array().unwrap() {
        assert!(player["role"].is_string());
    }
}

#[tokio::test]
async fn test_client_frames_after_subscribe_are_ignored() {
    let (addr, hub) = start_server().await;
    let created = hub.create(UserId(1), &profile("ada")).await.unwrap();

    let mut ws = connect(&addr).await;
    subscribe(&mut ws, created.id).await;

    ws.send(Message::Text("whatever".to_string().into()))
        .await
        .expect("send");

    // The connection stays subscribed and keeps receiving.
    hub.add_vote(created.id).await.unwrap();
    let view = recv_json(&mut ws).await;
    assert_eq!(view["nbVotes"], 1);
}
