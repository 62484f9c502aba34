//! Push-channel transport tests
//!
//! The mock server plays an Engine.IO v4 polling endpoint: one handshake,
//! one poll carrying the namespace ack and an event, then idle noops.

use crate::common::*;
use assert_matches::assert_matches;
use boardsync::client::{ConnectionStatus, ListenerExit, SocketHandle, SocketUpdate};
use boardsync::shared::event::BoardEvent;
use std::time::Duration;
use tokio::time::timeout;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

const SID: &str = "s1";

async fn mount_engine(mock: &MockBoardServer, first_poll: String) {
    let idle = ResponseTemplate::new(200)
        .set_body_string("6")
        .set_delay(Duration::from_millis(200));
    mount_engine_with(mock, 25000, first_poll, idle).await;
}

/// Mount an Engine.IO endpoint whose polls after the first answer `idle`
async fn mount_engine_with(
    mock: &MockBoardServer,
    ping_interval_ms: u64,
    first_poll: String,
    idle: ResponseTemplate,
) {
    Mock::given(method("GET"))
        .and(path("/socket.io/"))
        .and(query_param("EIO", "4"))
        .and(query_param("transport", "polling"))
        .and(query_param_is_missing("sid"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"0{{"sid":"{}","upgrades":[],"pingInterval":{},"pingTimeout":20000,"maxPayload":1000000}}"#,
            SID, ping_interval_ms
        )))
        .mount(&mock.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/socket.io/"))
        .and(query_param("sid", SID))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/socket.io/"))
        .and(query_param("sid", SID))
        .respond_with(ResponseTemplate::new(200).set_body_string(first_poll))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/socket.io/"))
        .and(query_param("sid", SID))
        .respond_with(idle)
        .mount(&mock.server)
        .await;
}

async fn posted_bodies(mock: &MockBoardServer) -> Vec<String> {
    mock.server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.method.as_str() == "POST")
        .map(|request| String::from_utf8_lossy(&request.body).into_owned())
        .collect()
}

/// Wait up to five seconds for a POST with exactly `body`
async fn wait_for_post(mock: &MockBoardServer, body: &str) -> bool {
    let found = timeout(Duration::from_secs(5), async {
        while !posted_bodies(mock).await.iter().any(|posted| posted == body) {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    found.is_ok()
}

fn frames(packets: &[&str]) -> String {
    packets.join("\u{1e}")
}

#[tokio::test]
async fn test_handshake_join_and_event() {
    let mock = MockBoardServer::start().await;
    let card = serde_json::to_string(&card_json(2, 1, 1)).unwrap();
    mount_engine(
        &mock,
        frames(&[r#"40/board,{"sid":"n1"}"#, &format!(r#"42/board,["card.new",{}]"#, card)]),
    )
    .await;

    let session = mock.session();
    let mut socket = SocketHandle::connect(session.api());
    assert!(socket.join_board(BOARD_ID));

    let mut statuses = Vec::new();
    let event = timeout(Duration::from_secs(5), async {
        loop {
            match socket.next().await {
                Some(SocketUpdate::Event(event)) => return Some(event),
                Some(SocketUpdate::Status(status)) => statuses.push(status),
                None => return None,
            }
        }
    })
    .await
    .expect("event within timeout");

    assert_matches!(event, Some(BoardEvent::CardNew(ref card)) if card.id == 2);
    assert_eq!(statuses, vec![ConnectionStatus::Connecting, ConnectionStatus::Connected]);

    let joined = wait_for_post(&mock, r#"42/board,["board.join",{"board_id":1}]"#).await;
    assert!(joined, "board.join was not posted");
    let posted = posted_bodies(&mock).await;
    assert_eq!(posted[0], "40/board,");

    socket.shutdown().await;
}

#[tokio::test]
async fn test_ping_is_answered_with_pong() {
    let mock = MockBoardServer::start().await;
    mount_engine(&mock, frames(&["40/board,", "2"])).await;

    let session = mock.session();
    let mut socket = SocketHandle::connect(session.api());

    timeout(Duration::from_secs(5), async {
        while let Some(update) = socket.next().await {
            if update == SocketUpdate::Status(ConnectionStatus::Connected) {
                break;
            }
        }
    })
    .await
    .expect("connected within timeout");

    let answered = wait_for_post(&mock, "3").await;
    assert!(answered, "pong was not posted");

    socket.shutdown().await;
}

#[tokio::test]
async fn test_listener_stops_when_board_is_deleted() {
    let mock = MockBoardServer::start().await;
    mount_engine(&mock, frames(&["40/board,", r#"42/board,["board.delete",1]"#])).await;

    let session = mock.session();
    session.store().write().await.board.set_board(board(&[(1, &[1])]));

    let mut socket = session.connect().await;
    let exit = timeout(Duration::from_secs(5), session.listen(&mut socket))
        .await
        .expect("listener exit within timeout");

    assert_eq!(exit, ListenerExit::BoardDeleted);
    assert!(!session.store().read().await.board.is_loaded());
    socket.shutdown().await;
}

#[tokio::test]
async fn test_held_polls_outlast_request_timeout() {
    let mock = MockBoardServer::start().await;
    let held_ping = ResponseTemplate::new(200)
        .set_body_string("2")
        .set_delay(Duration::from_millis(1500));
    mount_engine_with(&mock, 5000, "40/board,".to_string(), held_ping).await;

    let session = mock.session_with_timeout(Duration::from_secs(1));
    let mut socket = SocketHandle::connect(session.api());

    let mut statuses = Vec::new();
    let _ = timeout(Duration::from_secs(4), async {
        while let Some(update) = socket.next().await {
            if let SocketUpdate::Status(status) = update {
                statuses.push(status);
            }
        }
    })
    .await;

    assert_eq!(statuses, vec![ConnectionStatus::Connecting, ConnectionStatus::Connected]);
    assert!(wait_for_post(&mock, "3").await, "held ping was not answered");

    socket.shutdown().await;
}
