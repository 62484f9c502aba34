//! Archived cards and lists

use crate::shared::models::board::{BoardList, ListSummary};
use crate::shared::models::card::Card;
use crate::shared::models::datetime;
use crate::shared::models::ordered::Identified;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card in the board archive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchivedCard {
    #[serde(flatten)]
    pub card: Card,
    /// False when the card only sits in the archive because its list is archived
    #[serde(default)]
    pub archived: bool,
    #[serde(default, with = "datetime::optional")]
    pub archived_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub board_list: ListSummary,
}

impl ArchivedCard {
    /// Id of the list the card belonged to when archived
    pub fn board_list_id(&self) -> i64 {
        self.board_list.id.unwrap_or(self.card.list_id)
    }
}

impl Identified for ArchivedCard {
    fn id(&self) -> i64 {
        self.card.id
    }
}

/// A list in the board archive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchivedList {
    #[serde(flatten)]
    pub list: BoardList,
    #[serde(default, with = "datetime::optional")]
    pub archived_on: Option<DateTime<Utc>>,
}

impl Identified for ArchivedList {
    fn id(&self) -> i64 {
        self.list.id
    }
}
