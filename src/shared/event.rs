/**
 * Board Event Catalog
 *
 * This module defines the push-channel events broadcast on the `/board`
 * namespace. Each wire event is a `(name, payload)` pair; `BoardEvent::decode`
 * turns it into one tagged variant so the listener set can dispatch with a
 * single `match`.
 *
 * Card-scoped events wrap their entity in an envelope carrying `list_id` and
 * `card_id`, so the target card is found without searching the whole tree.
 */
use crate::shared::error::SharedError;
use crate::shared::models::{
    ArchivedCard, ArchivedList, BoardList, BoardUpdate, Card, CardActivity, CardChecklist,
    CardDate, CardMember, ChecklistItem,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Envelope for card-scoped create/update events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardEventEnvelope<T> {
    /// List the card lives on, as known by the server before the change
    pub list_id: i64,
    pub card_id: i64,
    pub entity: T,
}

/// Envelope for card-scoped delete events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteEnvelope {
    pub list_id: i64,
    pub card_id: i64,
    pub entity_id: i64,
}

/// Envelope for checklist item deletes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItemDeleteEnvelope {
    pub list_id: i64,
    pub card_id: i64,
    pub checklist_id: i64,
    pub entity_id: i64,
}

/// New card order of one list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardOrderUpdate {
    pub list_id: i64,
    pub order: Vec<i64>,
}

/// New item order of one checklist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItemOrderUpdate {
    pub card_id: i64,
    pub checklist_id: i64,
    pub order: Vec<i64>,
}

/// Names of every event in the board namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BoardUpdate,
    BoardDelete,
    CardNew,
    CardUpdate,
    CardRevert,
    CardArchive,
    CardDelete,
    CardOrderUpdate,
    CardMemberAssigned,
    CardMemberDeassigned,
    CardDateNew,
    CardDateUpdate,
    CardDateDelete,
    CardChecklistNew,
    CardChecklistUpdate,
    CardChecklistDelete,
    ChecklistItemNew,
    ChecklistItemUpdate,
    ChecklistItemDelete,
    ChecklistItemOrderUpdate,
    CardActivity,
    CardActivityUpdate,
    CardActivityDelete,
    ListNew,
    ListRevert,
    ListOrderUpdate,
    ListUpdate,
    ListArchive,
    ListDelete,
}

impl EventKind {
    pub const ALL: [EventKind; 29] = [
        EventKind::BoardUpdate,
        EventKind::BoardDelete,
        EventKind::CardNew,
        EventKind::CardUpdate,
        EventKind::CardRevert,
        EventKind::CardArchive,
        EventKind::CardDelete,
        EventKind::CardOrderUpdate,
        EventKind::CardMemberAssigned,
        EventKind::CardMemberDeassigned,
        EventKind::CardDateNew,
        EventKind::CardDateUpdate,
        EventKind::CardDateDelete,
        EventKind::CardChecklistNew,
        EventKind::CardChecklistUpdate,
        EventKind::CardChecklistDelete,
        EventKind::ChecklistItemNew,
        EventKind::ChecklistItemUpdate,
        EventKind::ChecklistItemDelete,
        EventKind::ChecklistItemOrderUpdate,
        EventKind::CardActivity,
        EventKind::CardActivityUpdate,
        EventKind::CardActivityDelete,
        EventKind::ListNew,
        EventKind::ListRevert,
        EventKind::ListOrderUpdate,
        EventKind::ListUpdate,
        EventKind::ListArchive,
        EventKind::ListDelete,
    ];

    /// Wire name of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::BoardUpdate => "board.update",
            EventKind::BoardDelete => "board.delete",
            EventKind::CardNew => "card.new",
            EventKind::CardUpdate => "card.update",
            EventKind::CardRevert => "card.revert",
            EventKind::CardArchive => "card.archive",
            EventKind::CardDelete => "card.delete",
            EventKind::CardOrderUpdate => "card.update.order",
            EventKind::CardMemberAssigned => "card.member.assigned",
            EventKind::CardMemberDeassigned => "card.member.deassigned",
            EventKind::CardDateNew => "card.date.new",
            EventKind::CardDateUpdate => "card.date.update",
            // The server emits this name with the typo.
            EventKind::CardDateDelete => "card.data.delete",
            EventKind::CardChecklistNew => "card.checklist.new",
            EventKind::CardChecklistUpdate => "card.checklist.update",
            EventKind::CardChecklistDelete => "card.checklist.delete",
            EventKind::ChecklistItemNew => "checklist.item.new",
            EventKind::ChecklistItemUpdate => "checklist.item.update",
            EventKind::ChecklistItemDelete => "checklist.item.delete",
            EventKind::ChecklistItemOrderUpdate => "checklist.item.update.order",
            EventKind::CardActivity => "card.activity",
            EventKind::CardActivityUpdate => "card.activity.update",
            EventKind::CardActivityDelete => "card.activity.delete",
            EventKind::ListNew => "list.new",
            EventKind::ListRevert => "list.revert",
            EventKind::ListOrderUpdate => "list.update.order",
            EventKind::ListUpdate => "list.update",
            EventKind::ListArchive => "list.archive",
            EventKind::ListDelete => "list.delete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = SharedError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| SharedError::unknown_event(name))
    }
}

/// A decoded push-channel event
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    BoardUpdate(BoardUpdate),
    BoardDelete(i64),
    CardNew(Card),
    CardUpdate(CardEventEnvelope<Card>),
    CardRevert(Card),
    CardArchive(CardEventEnvelope<ArchivedCard>),
    CardDelete(i64),
    CardOrderUpdate(CardOrderUpdate),
    CardMemberAssigned(CardEventEnvelope<CardMember>),
    CardMemberDeassigned(DeleteEnvelope),
    CardDateNew(CardEventEnvelope<CardDate>),
    CardDateUpdate(CardEventEnvelope<CardDate>),
    CardDateDelete(DeleteEnvelope),
    CardChecklistNew(CardEventEnvelope<CardChecklist>),
    CardChecklistUpdate(CardEventEnvelope<CardChecklist>),
    CardChecklistDelete(DeleteEnvelope),
    ChecklistItemNew(CardEventEnvelope<ChecklistItem>),
    ChecklistItemUpdate(CardEventEnvelope<ChecklistItem>),
    ChecklistItemDelete(ChecklistItemDeleteEnvelope),
    ChecklistItemOrderUpdate(ChecklistItemOrderUpdate),
    CardActivity(CardActivity),
    CardActivityUpdate(CardActivity),
    CardActivityDelete(i64),
    ListNew(BoardList),
    ListRevert(BoardList),
    ListOrderUpdate(Vec<i64>),
    ListUpdate(BoardList),
    ListArchive(ArchivedList),
    ListDelete(i64),
}

impl BoardEvent {
    /// Decode a wire event from its name and JSON payload
    pub fn decode(name: &str, payload: serde_json::Value) -> Result<Self, SharedError> {
        let kind: EventKind = name.parse()?;
        let event = match kind {
            EventKind::BoardUpdate => BoardEvent::BoardUpdate(from_payload(payload)?),
            EventKind::BoardDelete => BoardEvent::BoardDelete(decode_id(&payload)?),
            EventKind::CardNew => BoardEvent::CardNew(from_payload(payload)?),
            EventKind::CardUpdate => BoardEvent::CardUpdate(from_payload(payload)?),
            EventKind::CardRevert => BoardEvent::CardRevert(from_payload(payload)?),
            EventKind::CardArchive => BoardEvent::CardArchive(from_payload(payload)?),
            EventKind::CardDelete => BoardEvent::CardDelete(decode_id(&payload)?),
            EventKind::CardOrderUpdate => BoardEvent::CardOrderUpdate(from_payload(payload)?),
            EventKind::CardMemberAssigned => BoardEvent::CardMemberAssigned(from_payload(payload)?),
            EventKind::CardMemberDeassigned => {
                BoardEvent::CardMemberDeassigned(from_payload(payload)?)
            }
            EventKind::CardDateNew => BoardEvent::CardDateNew(from_payload(payload)?),
            EventKind::CardDateUpdate => BoardEvent::CardDateUpdate(from_payload(payload)?),
            EventKind::CardDateDelete => BoardEvent::CardDateDelete(from_payload(payload)?),
            EventKind::CardChecklistNew => BoardEvent::CardChecklistNew(from_payload(payload)?),
            EventKind::CardChecklistUpdate => {
                BoardEvent::CardChecklistUpdate(from_payload(payload)?)
            }
            EventKind::CardChecklistDelete => {
                BoardEvent::CardChecklistDelete(from_payload(payload)?)
            }
            EventKind::ChecklistItemNew => BoardEvent::ChecklistItemNew(from_payload(payload)?),
            EventKind::ChecklistItemUpdate => {
                BoardEvent::ChecklistItemUpdate(from_payload(payload)?)
            }
            EventKind::ChecklistItemDelete => {
                BoardEvent::ChecklistItemDelete(from_payload(payload)?)
            }
            EventKind::ChecklistItemOrderUpdate => {
                BoardEvent::ChecklistItemOrderUpdate(from_payload(payload)?)
            }
            EventKind::CardActivity => BoardEvent::CardActivity(from_payload(payload)?),
            EventKind::CardActivityUpdate => BoardEvent::CardActivityUpdate(from_payload(payload)?),
            EventKind::CardActivityDelete => BoardEvent::CardActivityDelete(decode_id(&payload)?),
            EventKind::ListNew => BoardEvent::ListNew(from_payload(payload)?),
            EventKind::ListRevert => BoardEvent::ListRevert(from_payload(payload)?),
            EventKind::ListOrderUpdate => BoardEvent::ListOrderUpdate(from_payload(payload)?),
            EventKind::ListUpdate => BoardEvent::ListUpdate(from_payload(payload)?),
            EventKind::ListArchive => BoardEvent::ListArchive(from_payload(payload)?),
            EventKind::ListDelete => BoardEvent::ListDelete(decode_id(&payload)?),
        };
        Ok(event)
    }

    /// The event's catalog entry
    pub fn kind(&self) -> EventKind {
        match self {
            BoardEvent::BoardUpdate(_) => EventKind::BoardUpdate,
            BoardEvent::BoardDelete(_) => EventKind::BoardDelete,
            BoardEvent::CardNew(_) => EventKind::CardNew,
            BoardEvent::CardUpdate(_) => EventKind::CardUpdate,
            BoardEvent::CardRevert(_) => EventKind::CardRevert,
            BoardEvent::CardArchive(_) => EventKind::CardArchive,
            BoardEvent::CardDelete(_) => EventKind::CardDelete,
            BoardEvent::CardOrderUpdate(_) => EventKind::CardOrderUpdate,
            BoardEvent::CardMemberAssigned(_) => EventKind::CardMemberAssigned,
            BoardEvent::CardMemberDeassigned(_) => EventKind::CardMemberDeassigned,
            BoardEvent::CardDateNew(_) => EventKind::CardDateNew,
            BoardEvent::CardDateUpdate(_) => EventKind::CardDateUpdate,
            BoardEvent::CardDateDelete(_) => EventKind::CardDateDelete,
            BoardEvent::CardChecklistNew(_) => EventKind::CardChecklistNew,
            BoardEvent::CardChecklistUpdate(_) => EventKind::CardChecklistUpdate,
            BoardEvent::CardChecklistDelete(_) => EventKind::CardChecklistDelete,
            BoardEvent::ChecklistItemNew(_) => EventKind::ChecklistItemNew,
            BoardEvent::ChecklistItemUpdate(_) => EventKind::ChecklistItemUpdate,
            BoardEvent::ChecklistItemDelete(_) => EventKind::ChecklistItemDelete,
            BoardEvent::ChecklistItemOrderUpdate(_) => EventKind::ChecklistItemOrderUpdate,
            BoardEvent::CardActivity(_) => EventKind::CardActivity,
            BoardEvent::CardActivityUpdate(_) => EventKind::CardActivityUpdate,
            BoardEvent::CardActivityDelete(_) => EventKind::CardActivityDelete,
            BoardEvent::ListNew(_) => EventKind::ListNew,
            BoardEvent::ListRevert(_) => EventKind::ListRevert,
            BoardEvent::ListOrderUpdate(_) => EventKind::ListOrderUpdate,
            BoardEvent::ListUpdate(_) => EventKind::ListUpdate,
            BoardEvent::ListArchive(_) => EventKind::ListArchive,
            BoardEvent::ListDelete(_) => EventKind::ListDelete,
        }
    }
}

fn from_payload<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T, SharedError> {
    Ok(serde_json::from_value(payload)?)
}

/// Bare-id payloads arrive either as a number or as a numeric string
fn decode_id(payload: &serde_json::Value) -> Result<i64, SharedError> {
    match payload {
        serde_json::Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| SharedError::validation("id", format!("not an integer: {}", n))),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| SharedError::validation("id", format!("not an integer: {}", s))),
        other => Err(SharedError::validation("id", format!("expected an id, got {}", other))),
    }
}
