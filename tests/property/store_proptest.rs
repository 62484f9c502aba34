//! Property-based tests for event reconciliation

use crate::common::*;
use boardsync::client::realtime::apply_event;
use boardsync::client::store::Store;
use boardsync::shared::event::{BoardEvent, CardEventEnvelope, CardOrderUpdate};
use boardsync::shared::models::Card;
use proptest::prelude::*;
use serde_json::{json, Value};

fn ids(len: usize) -> Vec<i64> {
    (1..=len as i64).collect()
}

/// Every card id on the board, across all lists
fn all_card_ids(store: &Store) -> Vec<i64> {
    store
        .board
        .board_lists()
        .iter()
        .flat_map(|list| list.cards.iter().map(|card| card.id))
        .collect()
}

/// Decode and apply a pushed event `repeats` times, as when the acting
/// client receives its own broadcast after applying the change locally
fn push(store: &mut Store, name: &str, payload: Value, repeats: usize) {
    let event = BoardEvent::decode(name, payload).unwrap();
    for _ in 0..repeats {
        apply_event(store, event.clone()).unwrap();
    }
}

/// The card held on the board, if any
fn board_card(store: &Store, list_id: i64, card_id: i64) -> Option<&Card> {
    store
        .board
        .board_lists()
        .iter()
        .find(|list| list.id == list_id)
        .and_then(|list| list.cards.iter().find(|card| card.id == card_id))
}

fn envelope(card_id: i64, entity: Value) -> Value {
    json!({"list_id": 1, "card_id": card_id, "entity": entity})
}

fn delete_envelope(card_id: i64, entity_id: i64) -> Value {
    json!({"list_id": 1, "card_id": card_id, "entity_id": entity_id})
}

proptest! {
    #[test]
    fn test_create_then_archive_restores_list(
        len in 0usize..8,
        position in 0i64..10,
        repeats in 1usize..3,
    ) {
        let existing = ids(len);
        let mut store = store_with(&[(1, existing.as_slice())]);

        push(&mut store, "card.new", card_json(100, 1, position), repeats);
        let mut archived = card_json(100, 1, position);
        archived["archived"] = json!(true);
        archived["board_list"] = json!({"id": 1});
        push(&mut store, "card.archive", envelope(100, archived), repeats);

        prop_assert_eq!(card_ids(&store, 1), existing);
        let in_archive = store.archive.cards().iter().filter(|card| card.card.id == 100).count();
        prop_assert_eq!(in_archive, 1);
    }

    #[test]
    fn test_card_entities_created_then_deleted_are_gone(
        card_id in 1i64..=4,
        entity_id in 1i64..50,
        repeats in 1usize..3,
    ) {
        let mut store = store_with(&[(1, &[1, 2, 3, 4])]);

        let member = json!({"id": entity_id, "card_id": card_id, "board_user_id": 7});
        push(&mut store, "card.member.assigned", envelope(card_id, member), repeats);
        let date = json!({"id": entity_id, "card_id": card_id, "dt_to": "2024-06-01T00:00:00Z"});
        push(&mut store, "card.date.new", envelope(card_id, date), repeats);
        let checklist = json!({"id": entity_id, "card_id": card_id, "title": "Launch"});
        push(&mut store, "card.checklist.new", envelope(card_id, checklist), repeats);

        let held = board_card(&store, 1, card_id).unwrap();
        prop_assert_eq!(held.assigned_members.len(), 1);
        prop_assert_eq!(held.dates.len(), 1);
        prop_assert_eq!(held.checklists.len(), 1);

        push(&mut store, "card.member.deassigned", delete_envelope(card_id, entity_id), repeats);
        push(&mut store, "card.data.delete", delete_envelope(card_id, entity_id), repeats);
        push(&mut store, "card.checklist.delete", delete_envelope(card_id, entity_id), repeats);

        let held = board_card(&store, 1, card_id).unwrap();
        prop_assert!(held.assigned_members.iter().all(|member| member.id != entity_id));
        prop_assert!(held.dates.iter().all(|date| date.id != entity_id));
        prop_assert!(held.checklists.iter().all(|checklist| checklist.id != entity_id));
        prop_assert_eq!(card_ids(&store, 1), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_duplicate_creation_keeps_one_copy(len in 0usize..6, repeats in 1usize..5) {
        let mut store = store_with(&[(1, ids(len).as_slice())]);

        for _ in 0..repeats {
            apply_event(&mut store, BoardEvent::CardNew(card(100, 1, len as i64))).unwrap();
        }

        let copies = card_ids(&store, 1).into_iter().filter(|id| *id == 100).count();
        prop_assert_eq!(copies, 1);
        prop_assert_eq!(card_ids(&store, 1).len(), len + 1);
    }

    #[test]
    fn test_card_order_follows_any_permutation(order in Just(ids(6)).prop_shuffle()) {
        let mut store = store_with(&[(1, ids(6).as_slice())]);

        let event = BoardEvent::CardOrderUpdate(CardOrderUpdate { list_id: 1, order: order.clone() });
        apply_event(&mut store, event).unwrap();

        prop_assert_eq!(card_ids(&store, 1), order);
        let positions: Vec<i64> = store.board.board_lists()[0].cards.iter().map(|card| card.position).collect();
        prop_assert_eq!(positions, (0..6).collect::<Vec<i64>>());
    }

    #[test]
    fn test_list_order_follows_any_permutation(order in Just(ids(5)).prop_shuffle()) {
        let lists: Vec<(i64, &[i64])> = ids(5).into_iter().map(|id| (id, &[][..])).collect();
        let mut store = store_with(lists.as_slice());

        apply_event(&mut store, BoardEvent::ListOrderUpdate(order.clone())).unwrap();

        let list_ids: Vec<i64> = store.board.board_lists().iter().map(|list| list.id).collect();
        prop_assert_eq!(list_ids, order);
    }

    #[test]
    fn test_cross_list_move_lands_exactly_once(
        moved in 1i64..=4,
        position in 0i64..6,
        echoes in 1usize..3,
    ) {
        let mut store = store_with(&[(1, &[1, 2, 3, 4]), (2, &[5, 6])]);

        for _ in 0..echoes {
            let envelope = CardEventEnvelope { list_id: 1, card_id: moved, entity: card(moved, 2, position) };
            apply_event(&mut store, BoardEvent::CardUpdate(envelope)).unwrap();
        }

        let everywhere = all_card_ids(&store);
        prop_assert_eq!(everywhere.iter().filter(|id| **id == moved).count(), 1);
        prop_assert_eq!(everywhere.len(), 6);
        prop_assert!(card_ids(&store, 2).contains(&moved));
        prop_assert!(!card_ids(&store, 1).contains(&moved));
    }
}

#[test]
fn test_order_update_scenario() {
    let mut store = store_with(&[(1, &[1, 2, 3])]);

    let event = BoardEvent::decode(
        "card.update.order",
        serde_json::json!({"list_id": 1, "order": [3, 1, 2]}),
    )
    .unwrap();
    apply_event(&mut store, event).unwrap();

    pretty_assertions::assert_eq!(card_ids(&store, 1), vec![3, 1, 2]);
}
