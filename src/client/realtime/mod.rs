//! # Real-time Reconciliation
//!
//! Applies push-channel events to the [`Store`]. Each [`BoardEvent`] maps to
//! one store mutation, applied under a single write-lock acquisition.
//!
//! Every handler is idempotent against the optimistic mutation the acting
//! client already applied when its REST call returned:
//!
//! - creations append only when the id is absent (cards and lists upsert)
//! - updates replace by id; a card update with a new `list_id` moves the
//!   card exactly once
//! - deletions of something already gone are no-ops
//! - order updates resort by id rank and renumber positions
//!
//! A reference to a list or card the tree does not hold fails with a
//! [`ReconcileError`], which is logged and returned; the listener moves on
//! to the next event.

pub mod packet;
pub mod socket;

pub use socket::{ConnectionStatus, SocketControl, SocketHandle, SocketUpdate};

use crate::client::store::{CardEntity, ReconcileError, SharedStore, Store};
use crate::shared::event::{BoardEvent, CardEventEnvelope, DeleteEnvelope};
use crate::shared::models::{CardChecklist, CardDate, CardMember};

/// What applying an event did beyond mutating the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    /// The loaded board was deleted on the server and has been unloaded
    BoardDeleted,
}

/// Apply one event under the shared store's write lock
pub async fn apply_shared(store: &SharedStore, event: BoardEvent) -> Result<EventOutcome, ReconcileError> {
    let mut store = store.write().await;
    apply_event(&mut store, event)
}

/// Apply one event to the store
pub fn apply_event(store: &mut Store, event: BoardEvent) -> Result<EventOutcome, ReconcileError> {
    let kind = event.kind();
    let span = tracing::info_span!("board_event", event = %kind);
    let _enter = span.enter();

    tracing::debug!("[Socket.IO] Applying {}", kind);
    let result = dispatch(store, event);
    if let Err(e) = &result {
        tracing::error!("[Socket.IO] Failed to apply {}: {}", kind, e);
    }
    result
}

fn dispatch(store: &mut Store, event: BoardEvent) -> Result<EventOutcome, ReconcileError> {
    match event {
        BoardEvent::BoardUpdate(update) => store.board.update_board(update)?,
        BoardEvent::BoardDelete(board_id) => {
            if store.board.unload_if(board_id) {
                store.card.close();
                store.archive.clear();
                tracing::warn!("[Socket.IO] Board {} has been deleted", board_id);
                return Ok(EventOutcome::BoardDeleted);
            }
        }

        BoardEvent::CardNew(card) => {
            store.board.save_card(card)?;
        }
        BoardEvent::CardUpdate(envelope) => {
            let refreshed = store
                .card
                .is_open(envelope.card_id)
                .then(|| envelope.entity.clone());
            store.board.apply_card_update(envelope.list_id, envelope.entity)?;
            if let Some(card) = refreshed {
                store.card.update_card(card);
            }
        }
        BoardEvent::CardRevert(card) => {
            store.archive.remove_card(card.id);
            store.board.restore_card(card)?;
        }
        BoardEvent::CardArchive(envelope) => {
            store.archive.add_card(envelope.entity);
            store.board.remove_card(envelope.list_id, envelope.card_id)?;
        }
        BoardEvent::CardDelete(card_id) => {
            store.archive.remove_card(card_id);
        }
        BoardEvent::CardOrderUpdate(update) => {
            store.board.update_card_order(update.list_id, &update.order)?
        }

        BoardEvent::CardMemberAssigned(envelope) => add_entity::<CardMember>(store, envelope)?,
        BoardEvent::CardMemberDeassigned(envelope) => remove_entity::<CardMember>(store, envelope)?,
        BoardEvent::CardDateNew(envelope) => add_entity::<CardDate>(store, envelope)?,
        BoardEvent::CardDateUpdate(envelope) => update_entity::<CardDate>(store, envelope)?,
        BoardEvent::CardDateDelete(envelope) => remove_entity::<CardDate>(store, envelope)?,
        BoardEvent::CardChecklistNew(envelope) => add_entity::<CardChecklist>(store, envelope)?,
        BoardEvent::CardChecklistUpdate(envelope) => {
            update_entity::<CardChecklist>(store, envelope)?
        }
        BoardEvent::CardChecklistDelete(envelope) => {
            remove_entity::<CardChecklist>(store, envelope)?
        }

        BoardEvent::ChecklistItemNew(envelope) => {
            store
                .card
                .add_checklist_item(envelope.card_id, envelope.entity.clone());
            store
                .board
                .add_checklist_item(envelope.list_id, envelope.card_id, envelope.entity)?;
        }
        BoardEvent::ChecklistItemUpdate(envelope) => {
            store
                .card
                .update_checklist_item(envelope.card_id, envelope.entity.clone());
            store
                .board
                .update_checklist_item(envelope.list_id, envelope.card_id, envelope.entity)?;
        }
        BoardEvent::ChecklistItemDelete(envelope) => {
            store.card.remove_checklist_item(
                envelope.card_id,
                envelope.checklist_id,
                envelope.entity_id,
            );
            store.board.remove_checklist_item(
                envelope.list_id,
                envelope.card_id,
                envelope.checklist_id,
                envelope.entity_id,
            )?;
        }
        BoardEvent::ChecklistItemOrderUpdate(update) => {
            store
                .card
                .reorder_checklist_items(update.card_id, update.checklist_id, &update.order);
            store
                .board
                .reorder_checklist_items(update.card_id, update.checklist_id, &update.order);
        }

        BoardEvent::CardActivity(activity) => {
            store.card.add_activity(activity);
        }
        BoardEvent::CardActivityUpdate(activity) => {
            store.card.update_activity(activity);
        }
        BoardEvent::CardActivityDelete(activity_id) => {
            store.card.remove_activity(activity_id);
        }

        BoardEvent::ListNew(list) | BoardEvent::ListUpdate(list) => {
            store.board.save_list(list)?;
        }
        BoardEvent::ListRevert(list) => {
            store.archive.release_list_cards(list.id);
            store.archive.remove_list(list.id);
            store.board.restore_list(list)?;
        }
        BoardEvent::ListOrderUpdate(order) => store.board.update_list_order(&order)?,
        BoardEvent::ListArchive(archived) => {
            let list_id = archived.list.id;
            store.archive.add_list(archived);
            store.board.remove_list(list_id)?;
        }
        BoardEvent::ListDelete(list_id) => {
            store.archive.remove_list(list_id);
            store.archive.purge_list_cards(list_id);
        }
    }
    Ok(EventOutcome::Applied)
}

// Card sub-entities live both in the board tree and on the open card. The
// open card is updated first so the detail view stays current even when
// the tree does not hold the card.

fn add_entity<E: CardEntity + Clone>(
    store: &mut Store,
    envelope: CardEventEnvelope<E>,
) -> Result<(), ReconcileError> {
    store.card.add_entity(envelope.card_id, envelope.entity.clone());
    store
        .board
        .add_card_entity(envelope.list_id, envelope.card_id, envelope.entity)?;
    Ok(())
}

fn update_entity<E: CardEntity + Clone>(
    store: &mut Store,
    envelope: CardEventEnvelope<E>,
) -> Result<(), ReconcileError> {
    store.card.update_entity(envelope.card_id, envelope.entity.clone());
    store
        .board
        .update_card_entity(envelope.list_id, envelope.card_id, envelope.entity)?;
    Ok(())
}

fn remove_entity<E: CardEntity>(store: &mut Store, envelope: DeleteEnvelope) -> Result<(), ReconcileError> {
    store.card.remove_entity::<E>(envelope.card_id, envelope.entity_id);
    store
        .board
        .remove_card_entity::<E>(envelope.list_id, envelope.card_id, envelope.entity_id)?;
    Ok(())
}
