//! Store action integration tests
//!
//! Each action performs its request against the mock server, then the
//! matching broadcast is replayed to check the store absorbs it.

use crate::common::*;
use assert_matches::assert_matches;
use boardsync::client::realtime::apply_shared;
use boardsync::client::ClientError;
use boardsync::shared::event::BoardEvent;
use boardsync::shared::models::{BoardUpdate, CardUpdate, NewBoardList, NewCard};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_load_board_fills_board_and_claims() {
    let mock = MockBoardServer::start().await;
    mock.serve_board(board_json(&[(1, &[1, 2]), (2, &[])])).await;

    let session = mock.session();
    crate::assert_ok!(session.load_board(BOARD_ID).await);

    let store = session.store().read().await;
    assert!(store.board.is_loaded());
    assert!(store.board.is_admin());
    crate::assert_ids!(store.board.board_lists(), [1, 2]);
    assert_eq!(card_ids(&store, 1), vec![1, 2]);
}

#[tokio::test]
async fn test_create_card_then_broadcast_keeps_one_copy() {
    let mock = MockBoardServer::start().await;
    mock.serve_board(board_json(&[(1, &[1])])).await;
    mock.respond_json("POST", "/list/1/card", card_json(2, 1, 1)).await;

    let session = mock.session();
    session.load_board(BOARD_ID).await.unwrap();
    let created = session
        .create_card(&NewCard {
            list_id: 1,
            title: "Card 2".to_string(),
            position: None,
        })
        .await
        .unwrap();

    apply_shared(session.store(), BoardEvent::CardNew(created)).await.unwrap();

    assert_eq!(card_ids(&*session.store().read().await, 1), vec![1, 2]);
}

#[tokio::test]
async fn test_update_card_moves_between_lists_once() {
    let mock = MockBoardServer::start().await;
    mock.serve_board(board_json(&[(1, &[1, 2]), (2, &[3])])).await;
    mock.respond_json("PATCH", "/card/2", card_json(2, 2, 0)).await;

    let session = mock.session();
    session.load_board(BOARD_ID).await.unwrap();
    let moved = session
        .update_card(
            2,
            &CardUpdate {
                list_id: Some(2),
                position: Some(0),
                ..CardUpdate::default()
            },
        )
        .await
        .unwrap();

    let echo = decode_card_update(1, moved);
    apply_shared(session.store(), echo).await.unwrap();

    let store = session.store().read().await;
    assert_eq!(card_ids(&store, 1), vec![1]);
    assert_eq!(card_ids(&store, 2), vec![2, 3]);
}

fn decode_card_update(list_id: i64, card: boardsync::shared::models::Card) -> BoardEvent {
    BoardEvent::decode(
        "card.update",
        json!({"list_id": list_id, "card_id": card.id, "entity": card}),
    )
    .unwrap()
}

#[tokio::test]
async fn test_failed_action_leaves_store_untouched() {
    let mock = MockBoardServer::start().await;
    mock.serve_board(board_json(&[(1, &[1, 2])])).await;
    mock.respond_status("DELETE", "/card/2", 403).await;

    let session = mock.session();
    session.load_board(BOARD_ID).await.unwrap();
    let before = session.store().read().await.board.board().cloned();

    let result = session.delete_card(1, 2).await;

    assert_matches!(result, Err(ClientError::Http { status: 403, .. }));
    assert_eq!(session.store().read().await.board.board().cloned(), before);
}

#[tokio::test]
async fn test_new_list_pushes_list_order() {
    let mock = MockBoardServer::start().await;
    mock.serve_board(board_json(&[(1, &[]), (2, &[])])).await;
    mock.respond_json("POST", "/board/1/list", list_json(3, 2, &[])).await;
    Mock::given(method("POST"))
        .and(path("/api/board/1/list-order"))
        .and(body_json(json!([1, 2, 3])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock.server)
        .await;

    let session = mock.session();
    session.load_board(BOARD_ID).await.unwrap();
    session
        .new_board_list(
            BOARD_ID,
            &NewBoardList {
                title: "List 3".to_string(),
                position: None,
            },
        )
        .await
        .unwrap();

    crate::assert_ids!(session.store().read().await.board.board_lists(), [1, 2, 3]);
}

#[tokio::test]
async fn test_reorder_cards_applies_order() {
    let mock = MockBoardServer::start().await;
    mock.serve_board(board_json(&[(1, &[1, 2, 3])])).await;
    mock.respond_status("POST", "/list/1/card-order", 200).await;

    let session = mock.session();
    session.load_board(BOARD_ID).await.unwrap();
    session.reorder_cards(1, &[3, 1, 2]).await.unwrap();

    let store = session.store().read().await;
    let list = &store.board.board_lists()[0];
    crate::assert_ids!(list.cards, [3, 1, 2]);
    let positions: Vec<i64> = list.cards.iter().map(|card| card.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_archive_and_revert_card() {
    let mock = MockBoardServer::start().await;
    mock.serve_board(board_json(&[(1, &[1, 2])])).await;
    let mut archived = card_json(2, 1, 1);
    archived["archived"] = json!(true);
    archived["board_list"] = json!({"id": 1, "title": "List 1"});
    mock.respond_json("PATCH", "/card/2/archive", archived).await;
    mock.respond_json("PATCH", "/card/2/revert", card_json(2, 1, 1)).await;

    let session = mock.session();
    session.load_board(BOARD_ID).await.unwrap();

    session.archive_card(1, 2).await.unwrap();
    {
        let store = session.store().read().await;
        assert_eq!(card_ids(&store, 1), vec![1]);
        let archived: Vec<i64> = store.archive.cards().iter().map(|c| c.card.id).collect();
        assert_eq!(archived, vec![2]);
    }

    session.revert_card(2).await.unwrap();
    let store = session.store().read().await;
    assert_eq!(card_ids(&store, 1), vec![1, 2]);
    assert!(store.archive.cards().is_empty());
}

#[tokio::test]
async fn test_delete_comment_drops_its_activity() {
    let mock = MockBoardServer::start().await;
    mock.respond_json("GET", "/card/2", card_json(2, 1, 0)).await;
    mock.respond_json(
        "GET",
        "/card/2/activities",
        json!([{
            "id": 7,
            "card_id": 2,
            "user_id": 10,
            "activity_on": "2024-05-02T08:15:00Z",
            "event": 3,
            "comment": {"id": 70, "card_id": 2, "comment": "Looks good"},
        }]),
    )
    .await;
    mock.respond_status("DELETE", "/comment/70", 200).await;

    let session = mock.session();
    session.open_card(2).await.unwrap();
    session.load_card_activities(2).await.unwrap();
    session.delete_comment(70).await.unwrap();

    let store = session.store().read().await;
    assert_eq!(store.card.card().map(|card| card.activities.len()), Some(0));
}

#[tokio::test]
async fn test_deassign_member_by_board_user() {
    let mock = MockBoardServer::start().await;
    let mut board = board_json(&[(1, &[2])]);
    board["lists"][0]["cards"][0]["assigned_members"] =
        json!([{"id": 40, "card_id": 2, "board_user_id": 5}]);
    mock.serve_board(board).await;
    mock.respond_status("DELETE", "/card/2/assign-member/5", 200).await;

    let session = mock.session();
    session.load_board(BOARD_ID).await.unwrap();
    session.deassign_member(1, 2, 5).await.unwrap();

    let store = session.store().read().await;
    let card = store.board.find_card(1, 2).unwrap();
    assert!(card.assigned_members.is_empty());
}

#[tokio::test]
async fn test_update_board_keeps_the_saved_board() {
    let mock = MockBoardServer::start().await;
    mock.serve_board(board_json(&[(1, &[1])])).await;
    mock.respond_json(
        "PATCH",
        "/board/1",
        json!({"id": BOARD_ID, "owner_id": 10, "title": "Roadmap 2025", "background_color": "#0a0"}),
    )
    .await;

    let session = mock.session();
    session.load_board(BOARD_ID).await.unwrap();
    let saved = session
        .update_board(
            BOARD_ID,
            &BoardUpdate {
                title: Some("  roadmap 2025 ".to_string()),
                ..BoardUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(saved.title, "Roadmap 2025");
    let store = session.store().read().await;
    let board = store.board.board().unwrap();
    assert_eq!(board.title, "Roadmap 2025");
    assert_eq!(board.background_color.as_deref(), Some("#0a0"));
    assert_eq!(card_ids(&store, 1), vec![1]);
}
