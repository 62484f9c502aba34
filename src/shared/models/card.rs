//! Card Data Structures
//!
//! Cards and the sub-entities that only exist in the context of their owning
//! card: activities (comments, list changes), assigned members, dates and
//! checklists.

use crate::shared::models::board::ListSummary;
use crate::shared::models::datetime;
use crate::shared::models::ordered::{Identified, Positioned};
use crate::shared::models::user::UserBasicInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card on a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: i64,
    pub list_id: i64,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "datetime::optional")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub activities: Vec<CardActivity>,
    #[serde(default)]
    pub checklists: Vec<CardChecklist>,
    #[serde(default)]
    pub assigned_members: Vec<CardMember>,
    #[serde(default)]
    pub dates: Vec<CardDate>,
}

impl Identified for Card {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Positioned for Card {
    fn position(&self) -> i64 {
        self.position
    }
    fn set_position(&mut self, position: i64) {
        self.position = position;
    }
}

/// Request body for creating a card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
    pub list_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

/// Partial card sent by PATCH. Setting `list_id` moves the card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "datetime::optional"
    )]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

/// Activity event codes as sent by the server
pub const EVENT_ASSIGN_TO_LIST: i64 = 1;
pub const EVENT_MOVE_TO_LIST: i64 = 2;
pub const EVENT_COMMENT: i64 = 3;

/// Which kind of list change an activity records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ListChangeEvent {
    /// Card was created on a list
    AssignToList,
    /// Card was moved between lists
    MoveToList,
}

/// Payload of an activity, flattened from the polymorphic wire form
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityKind {
    Comment(CardComment),
    ListChange {
        event: ListChangeEvent,
        change: CardListChange,
    },
    /// Activity type this client does not render
    Other { event: Option<i64> },
}

/// One entry of a card's activity feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawCardActivity", into = "RawCardActivity")]
pub struct CardActivity {
    pub id: i64,
    pub card_id: i64,
    pub user_id: i64,
    pub activity_on: DateTime<Utc>,
    pub entity_id: Option<i64>,
    pub user: Option<UserBasicInfo>,
    pub kind: ActivityKind,
}

impl CardActivity {
    /// The comment carried by this activity, if it is a comment
    pub fn comment(&self) -> Option<&CardComment> {
        match &self.kind {
            ActivityKind::Comment(comment) => Some(comment),
            _ => None,
        }
    }
}

impl Identified for CardActivity {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Wire form of [`CardActivity`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCardActivity {
    id: i64,
    card_id: i64,
    user_id: i64,
    #[serde(with = "datetime::required")]
    activity_on: DateTime<Utc>,
    #[serde(default)]
    entity_id: Option<i64>,
    #[serde(default)]
    event: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<CardComment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    list_change: Option<CardListChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserBasicInfo>,
}

impl From<RawCardActivity> for CardActivity {
    fn from(raw: RawCardActivity) -> Self {
        let kind = match (raw.comment, raw.list_change) {
            (Some(comment), _) => ActivityKind::Comment(comment),
            (None, Some(change)) => ActivityKind::ListChange {
                event: if raw.event == Some(EVENT_ASSIGN_TO_LIST) {
                    ListChangeEvent::AssignToList
                } else {
                    ListChangeEvent::MoveToList
                },
                change,
            },
            (None, None) => ActivityKind::Other { event: raw.event },
        };

        Self {
            id: raw.id,
            card_id: raw.card_id,
            user_id: raw.user_id,
            activity_on: raw.activity_on,
            entity_id: raw.entity_id,
            user: raw.user,
            kind,
        }
    }
}

impl From<CardActivity> for RawCardActivity {
    fn from(activity: CardActivity) -> Self {
        let (event, comment, list_change) = match activity.kind {
            ActivityKind::Comment(comment) => (Some(EVENT_COMMENT), Some(comment), None),
            ActivityKind::ListChange { event, change } => {
                let code = match event {
                    ListChangeEvent::AssignToList => EVENT_ASSIGN_TO_LIST,
                    ListChangeEvent::MoveToList => EVENT_MOVE_TO_LIST,
                };
                (Some(code), None, Some(change))
            }
            ActivityKind::Other { event } => (event, None, None),
        };

        Self {
            id: activity.id,
            card_id: activity.card_id,
            user_id: activity.user_id,
            activity_on: activity.activity_on,
            entity_id: activity.entity_id,
            event,
            comment,
            list_change,
            user: activity.user,
        }
    }
}

/// A comment on a card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardComment {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub card_id: i64,
    #[serde(default)]
    pub comment: String,
    #[serde(default, with = "datetime::optional")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, with = "datetime::optional")]
    pub updated: Option<DateTime<Utc>>,
}

/// Request body for posting or editing a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub comment: String,
}

/// Record of a card moving between lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardListChange {
    pub id: i64,
    pub activity_id: i64,
    #[serde(default)]
    pub from_list_id: Option<i64>,
    pub to_list_id: i64,
    #[serde(default)]
    pub from_list: Option<ListSummary>,
    #[serde(default)]
    pub to_list: Option<ListSummary>,
}

/// A board member assigned to a card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardMember {
    pub id: i64,
    pub card_id: i64,
    pub board_user_id: i64,
    #[serde(default)]
    pub send_notification: bool,
}

impl Identified for CardMember {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Request body for assigning a member to a card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignMember {
    pub board_user_id: i64,
    #[serde(default)]
    pub send_notification: bool,
}

/// A dated entry (due date or date range) on a card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardDate {
    pub id: i64,
    pub card_id: i64,
    #[serde(default, with = "datetime::optional")]
    pub dt_from: Option<DateTime<Utc>>,
    #[serde(with = "datetime::required")]
    pub dt_to: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub complete: bool,
}

impl Identified for CardDate {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Request body for creating or editing a card date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCardDate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "datetime::optional"
    )]
    pub dt_from: Option<DateTime<Utc>>,
    #[serde(with = "datetime::required")]
    pub dt_to: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub complete: bool,
}

/// A checklist on a card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardChecklist {
    pub id: i64,
    pub card_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

impl Identified for CardChecklist {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Request body for creating or renaming a checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChecklist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One item of a checklist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: i64,
    pub checklist_id: i64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub assigned_board_user_id: Option<i64>,
    #[serde(default)]
    pub marked_complete_board_user_id: Option<i64>,
    #[serde(default, with = "datetime::optional")]
    pub marked_complete_on: Option<DateTime<Utc>>,
    #[serde(default, with = "datetime::optional")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Identified for ChecklistItem {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Positioned for ChecklistItem {
    fn position(&self) -> i64 {
        self.position
    }
    fn set_position(&mut self, position: i64) {
        self.position = position;
    }
}

/// Request body for creating or editing a checklist item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecklistItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_board_user_id: Option<i64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "datetime::optional"
    )]
    pub due_date: Option<DateTime<Utc>>,
}
