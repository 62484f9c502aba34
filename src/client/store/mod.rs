//! # Client Store
//!
//! In-memory state mutated by both REST action results and push events:
//!
//! - [`BoardState`]: the loaded board tree (board → lists → cards →
//!   sub-entities) plus claims, roles and members
//! - [`CardState`]: the card opened in detail, with its activity feed
//! - [`ArchiveState`]: archived cards and lists of the loaded board
//! - [`AuthState`]: the logged-in user
//!
//! Everything lives in one [`Store`] behind a single `tokio::sync::RwLock`
//! ([`SharedStore`]). Every mutation is synchronous; callers take the write
//! lock once per event or action result and release it before the next
//! network await.

pub mod archive;
pub mod auth;
pub mod board;
pub mod card;
pub mod error;

pub use archive::ArchiveState;
pub use auth::AuthState;
pub use board::{BoardState, CardMove};
pub use card::CardState;
pub use error::ReconcileError;

use crate::shared::models::{
    renumber, Card, CardChecklist, CardDate, CardMember, ChecklistItem, Identified, OrderedById,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Store shared between the session's actions and the push listener
pub type SharedStore = Arc<RwLock<Store>>;

#[derive(Debug, Default)]
pub struct Store {
    pub auth: AuthState,
    pub board: BoardState,
    pub card: CardState,
    pub archive: ArchiveState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(RwLock::new(Self::new()))
    }
}

/// A sub-entity owned by a card: member assignment, date or checklist
pub trait CardEntity: Identified + Sized {
    /// Name used in log lines
    const NAME: &'static str;

    fn collection(card: &mut Card) -> &mut Vec<Self>;
}

impl CardEntity for CardMember {
    const NAME: &'static str = "member";

    fn collection(card: &mut Card) -> &mut Vec<Self> {
        &mut card.assigned_members
    }
}

impl CardEntity for CardDate {
    const NAME: &'static str = "date";

    fn collection(card: &mut Card) -> &mut Vec<Self> {
        &mut card.dates
    }
}

impl CardEntity for CardChecklist {
    const NAME: &'static str = "checklist";

    fn collection(card: &mut Card) -> &mut Vec<Self> {
        &mut card.checklists
    }
}

/// Checklist item mutations shared by the board tree and the active card.
/// Each returns `None` when the checklist is not on the card.
pub(crate) mod items {
    use super::*;

    pub fn add(card: &mut Card, item: ChecklistItem) -> Option<bool> {
        let checklist = card.checklists.find_by_id_mut(item.checklist_id)?;
        Some(checklist.items.insert_if_absent(item))
    }

    pub fn update(card: &mut Card, item: ChecklistItem) -> Option<bool> {
        let checklist = card.checklists.find_by_id_mut(item.checklist_id)?;
        Some(checklist.items.replace_existing(item))
    }

    pub fn remove(card: &mut Card, checklist_id: i64, item_id: i64) -> Option<bool> {
        let checklist = card.checklists.find_by_id_mut(checklist_id)?;
        Some(checklist.items.remove_by_id(item_id).is_some())
    }

    pub fn reorder(card: &mut Card, checklist_id: i64, order: &[i64]) -> Option<()> {
        let checklist = card.checklists.find_by_id_mut(checklist_id)?;
        checklist.items.reorder_by(order);
        renumber(&mut checklist.items);
        Some(())
    }
}
