//! Store lookup errors

use thiserror::Error;

/// A push event or action result referenced something the store does not hold
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("No board is loaded")]
    BoardNotLoaded,

    #[error("List {list_id} not found on board")]
    ListNotFound { list_id: i64 },

    #[error("Card {card_id} not found in list {list_id}")]
    CardNotFound { list_id: i64, card_id: i64 },

    #[error("Checklist {checklist_id} not found on card {card_id}")]
    ChecklistNotFound { card_id: i64, checklist_id: i64 },
}

impl ReconcileError {
    pub fn list_not_found(list_id: i64) -> Self {
        Self::ListNotFound { list_id }
    }

    pub fn card_not_found(list_id: i64, card_id: i64) -> Self {
        Self::CardNotFound { list_id, card_id }
    }

    pub fn checklist_not_found(card_id: i64, checklist_id: i64) -> Self {
        Self::ChecklistNotFound {
            card_id,
            checklist_id,
        }
    }
}
