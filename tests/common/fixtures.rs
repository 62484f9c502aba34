//! Board fixtures
//!
//! JSON bodies as the server sends them, plus typed models built from the
//! same JSON so both sides of a test agree.

use boardsync::client::store::Store;
use boardsync::shared::models::{Board, BoardList, Card};
use serde_json::{json, Value};

pub const BOARD_ID: i64 = 1;

pub fn card_json(id: i64, list_id: i64, position: i64) -> Value {
    json!({
        "id": id,
        "list_id": list_id,
        "title": format!("Card {}", id),
        "position": position,
    })
}

/// A list holding cards with the given ids, positioned in order
pub fn list_json(id: i64, position: i64, card_ids: &[i64]) -> Value {
    let cards: Vec<Value> = card_ids
        .iter()
        .enumerate()
        .map(|(index, card_id)| card_json(*card_id, id, index as i64))
        .collect();
    json!({
        "id": id,
        "board_id": BOARD_ID,
        "title": format!("List {}", id),
        "position": position,
        "cards": cards,
    })
}

/// A board whose lists hold cards with the given ids
pub fn board_json(lists: &[(i64, &[i64])]) -> Value {
    let lists: Vec<Value> = lists
        .iter()
        .enumerate()
        .map(|(index, (list_id, card_ids))| list_json(*list_id, index as i64, card_ids))
        .collect();
    json!({
        "id": BOARD_ID,
        "owner_id": 10,
        "title": "Roadmap",
        "lists": lists,
    })
}

pub fn user_json() -> Value {
    json!({
        "id": 10,
        "username": "alice",
        "name": "Alice",
        "email": "alice@example.com",
        "registered_date": "2024-03-01T09:30:00",
        "timezone": "Europe/London",
    })
}

pub fn card(id: i64, list_id: i64, position: i64) -> Card {
    serde_json::from_value(card_json(id, list_id, position)).expect("card fixture")
}

pub fn list(id: i64, position: i64, card_ids: &[i64]) -> BoardList {
    serde_json::from_value(list_json(id, position, card_ids)).expect("list fixture")
}

pub fn board(lists: &[(i64, &[i64])]) -> Board {
    serde_json::from_value(board_json(lists)).expect("board fixture")
}

/// A store with the given board loaded
pub fn store_with(lists: &[(i64, &[i64])]) -> Store {
    let mut store = Store::new();
    store.board.set_board(board(lists));
    store
}

/// Card ids of a list in the loaded board, in order
pub fn card_ids(store: &Store, list_id: i64) -> Vec<i64> {
    store
        .board
        .board_lists()
        .iter()
        .find(|list| list.id == list_id)
        .map(|list| list.cards.iter().map(|card| card.id).collect())
        .unwrap_or_default()
}
