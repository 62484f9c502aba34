//! Board Data Structures
//!
//! Boards, their lists, and the per-user role/permission claims.

use crate::shared::models::card::Card;
use crate::shared::models::ordered::{Identified, Positioned};
use crate::shared::models::user::UserBasicInfo;
use serde::{Deserialize, Serialize};

/// A board with its ordered lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Board {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    #[serde(default)]
    pub lists: Vec<BoardList>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
}

impl Board {
    /// Merge a partial board into this one. Lists are never touched.
    pub fn apply_update(&mut self, update: BoardUpdate) {
        if let Some(owner_id) = update.owner_id {
            self.owner_id = owner_id;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(background_image) = update.background_image {
            self.background_image = Some(background_image);
        }
        if let Some(background_color) = update.background_color {
            self.background_color = Some(background_color);
        }
    }

    /// Everything but the lists, as a partial board
    pub fn metadata(&self) -> BoardUpdate {
        BoardUpdate {
            id: Some(self.id),
            owner_id: Some(self.owner_id),
            title: Some(self.title.clone()),
            background_image: self.background_image.clone(),
            background_color: self.background_color.clone(),
        }
    }
}

impl Identified for Board {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Partial board carried by `board.update` and sent by PATCH
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// Request body for creating a board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBoard {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// A list (column) on a board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardList {
    pub id: i64,
    pub board_id: i64,
    pub title: String,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Identified for BoardList {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Positioned for BoardList {
    fn position(&self) -> i64 {
        self.position
    }
    fn set_position(&mut self, position: i64) {
        self.position = position;
    }
}

/// Request body for creating a list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBoardList {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

/// Id/title summary of a list, as embedded in activities and archived cards
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListSummary {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Named board permissions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BoardPermission {
    #[serde(rename = "card.edit")]
    CardEdit,
    #[serde(rename = "card.comment")]
    CardComment,
    #[serde(rename = "card.delete")]
    CardDelete,
    #[serde(rename = "list.create")]
    ListCreate,
    #[serde(rename = "list.edit")]
    ListEdit,
    #[serde(rename = "list.delete")]
    ListDelete,
    #[serde(rename = "board.update")]
    BoardUpdate,
    #[serde(rename = "board.delete")]
    BoardDelete,
}

impl BoardPermission {
    /// The permission's wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardPermission::CardEdit => "card.edit",
            BoardPermission::CardComment => "card.comment",
            BoardPermission::CardDelete => "card.delete",
            BoardPermission::ListCreate => "list.create",
            BoardPermission::ListEdit => "list.edit",
            BoardPermission::ListDelete => "list.delete",
            BoardPermission::BoardUpdate => "board.update",
            BoardPermission::BoardDelete => "board.delete",
        }
    }
}

/// A single named permission toggle of a role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardRolePermission {
    pub id: i64,
    pub name: String,
    pub allow: bool,
}

/// Board role with its permission set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardRole {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub permissions: Vec<BoardRolePermission>,
}

impl BoardRole {
    /// Whether the role allows `permission`; absent permissions deny
    pub fn allows(&self, permission: BoardPermission) -> bool {
        self.permissions
            .iter()
            .find(|p| p.name == permission.as_str())
            .map(|p| p.allow)
            .unwrap_or(false)
    }
}

/// Current user's role on the loaded board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardClaims {
    pub id: i64,
    pub board_id: i64,
    #[serde(default)]
    pub is_owner: bool,
    pub user_id: i64,
    pub role: BoardRole,
}

/// A user allowed on a board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardAllowedUser {
    pub id: i64,
    pub user_id: i64,
    pub board_id: i64,
    pub board_role_id: i64,
    #[serde(default)]
    pub is_owner: bool,
    pub role: BoardRole,
    pub user: UserBasicInfo,
}

impl Identified for BoardAllowedUser {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Request body for adding a board member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBoardMember {
    pub board_role_id: i64,
    pub user_id: i64,
}

/// Request body for removing a board member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveBoardMember {
    pub user_id: i64,
}
