//! # Board State
//!
//! The loaded board tree plus the current user's claims, the board's roles
//! and its members. Also holds the list of boards the user can access.
//!
//! Lookups that reference a list or card the tree does not hold fail with
//! [`ReconcileError`]. Removing something that is already gone is a no-op:
//! the acting client has usually applied its own mutation before the
//! broadcast for it arrives.

use crate::client::store::error::ReconcileError;
use crate::client::store::{items, CardEntity};
use crate::shared::models::{
    renumber, sort_by_position, Board, BoardAllowedUser, BoardClaims, BoardList, BoardPermission,
    BoardRole, BoardUpdate, Card, ChecklistItem, OrderedById, Upsert,
};

/// Where a card update landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMove {
    /// Replaced in the list that already held it
    InPlace,
    /// Removed from one list and inserted into another
    Moved { from_list_id: i64, to_list_id: i64 },
}

#[derive(Debug, Default)]
pub struct BoardState {
    boards: Vec<Board>,
    board: Option<Board>,
    claims: Option<BoardClaims>,
    roles: Vec<BoardRole>,
    users: Vec<BoardAllowedUser>,
}

impl BoardState {
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn set_boards(&mut self, boards: Vec<Board>) {
        self.boards = boards;
    }

    pub fn add_board(&mut self, board: Board) -> Upsert {
        self.boards.upsert(board)
    }

    pub fn remove_board(&mut self, board_id: i64) -> Option<Board> {
        self.boards.remove_by_id(board_id)
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.board.is_some()
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = Some(board);
    }

    /// Drop the board together with its claims, roles and members
    pub fn unload(&mut self) {
        self.board = None;
        self.claims = None;
        self.roles.clear();
        self.users.clear();
    }

    /// Unload only if `board_id` is the loaded board
    pub fn unload_if(&mut self, board_id: i64) -> bool {
        if self.board.as_ref().map(|board| board.id) == Some(board_id) {
            self.unload();
            return true;
        }
        false
    }

    pub fn claims(&self) -> Option<&BoardClaims> {
        self.claims.as_ref()
    }

    pub fn set_claims(&mut self, claims: BoardClaims) {
        self.claims = Some(claims);
    }

    pub fn roles(&self) -> &[BoardRole] {
        &self.roles
    }

    pub fn set_roles(&mut self, roles: Vec<BoardRole>) {
        self.roles = roles;
    }

    pub fn users(&self) -> &[BoardAllowedUser] {
        &self.users
    }

    pub fn set_users(&mut self, users: Vec<BoardAllowedUser>) {
        self.users = users;
    }

    pub fn save_user(&mut self, user: BoardAllowedUser) -> Upsert {
        self.users.upsert(user)
    }

    /// Remove a member by their user id (not the board-user id)
    pub fn remove_user(&mut self, user_id: i64) -> bool {
        let before = self.users.len();
        self.users.retain(|member| member.user_id != user_id);
        self.users.len() != before
    }

    /// Merge board metadata; lists are left alone
    pub fn update_board(&mut self, update: BoardUpdate) -> Result<(), ReconcileError> {
        self.loaded_mut()?.apply_update(update);
        Ok(())
    }

    // --- Getters ---

    /// Lists of the loaded board, empty when none is loaded
    pub fn board_lists(&self) -> &[BoardList] {
        self.board
            .as_ref()
            .map(|board| board.lists.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_permission(&self, permission: BoardPermission) -> bool {
        self.claims
            .as_ref()
            .map_or(false, |claims| claims.role.allows(permission))
    }

    pub fn is_admin(&self) -> bool {
        self.claims.as_ref().map_or(false, |claims| claims.role.is_admin)
    }

    /// The current user's membership on the loaded board
    pub fn board_user(&self) -> Option<&BoardClaims> {
        self.claims.as_ref()
    }

    /// Display name of a board member: name, else username, else empty
    pub fn board_username(&self, board_user_id: i64) -> &str {
        self.users
            .find_by_id(board_user_id)
            .map(|member| member.user.display_name())
            .unwrap_or("")
    }

    pub fn owner(&self) -> Option<&BoardAllowedUser> {
        self.users.iter().find(|member| member.is_owner)
    }

    pub fn find_card(&self, list_id: i64, card_id: i64) -> Result<&Card, ReconcileError> {
        let board = self.board.as_ref().ok_or(ReconcileError::BoardNotLoaded)?;
        board
            .lists
            .find_by_id(list_id)
            .ok_or_else(|| ReconcileError::list_not_found(list_id))?
            .cards
            .find_by_id(card_id)
            .ok_or_else(|| ReconcileError::card_not_found(list_id, card_id))
    }

    /// Search every list for a card
    pub fn locate_card(&self, card_id: i64) -> Option<&Card> {
        self.board_lists()
            .iter()
            .find_map(|list| list.cards.find_by_id(card_id))
    }

    // --- Lists ---

    /// Insert or replace a list. A payload without cards keeps the cards
    /// already held for that list.
    pub fn save_list(&mut self, mut list: BoardList) -> Result<Upsert, ReconcileError> {
        let board = self.loaded_mut()?;
        if list.cards.is_empty() {
            if let Some(existing) = board.lists.find_by_id_mut(list.id) {
                list.cards = std::mem::take(&mut existing.cards);
            }
        }
        Ok(board.lists.upsert(list))
    }

    /// Save a list brought back from the archive and resort lists by position
    pub fn restore_list(&mut self, list: BoardList) -> Result<Upsert, ReconcileError> {
        let result = self.save_list(list)?;
        sort_by_position(&mut self.loaded_mut()?.lists);
        Ok(result)
    }

    pub fn remove_list(&mut self, list_id: i64) -> Result<Option<BoardList>, ReconcileError> {
        Ok(self.loaded_mut()?.lists.remove_by_id(list_id))
    }

    pub fn update_list_order(&mut self, order: &[i64]) -> Result<(), ReconcileError> {
        let lists = &mut self.loaded_mut()?.lists;
        lists.reorder_by(order);
        renumber(lists);
        Ok(())
    }

    // --- Cards ---

    /// Insert or replace a card in the list named by its `list_id`
    pub fn save_card(&mut self, card: Card) -> Result<Upsert, ReconcileError> {
        let list = self.list_mut(card.list_id)?;
        Ok(list.cards.upsert(card))
    }

    /// Save a card brought back from the archive and resort its list by position
    pub fn restore_card(&mut self, card: Card) -> Result<Upsert, ReconcileError> {
        let list = self.list_mut(card.list_id)?;
        let result = list.cards.upsert(card);
        sort_by_position(&mut list.cards);
        Ok(result)
    }

    pub fn remove_card(&mut self, list_id: i64, card_id: i64) -> Result<Option<Card>, ReconcileError> {
        let list = self.list_mut(list_id)?;
        let removed = list.cards.remove_by_id(card_id);
        if removed.is_none() {
            tracing::debug!("[Store] Card {} already gone from list {}", card_id, list_id);
        }
        Ok(removed)
    }

    /// Apply a pushed card update.
    ///
    /// `list_id` is the list the server saw the card in before the change;
    /// `card.list_id` is where it is now. The card is looked up in its new
    /// list first, since the acting client may have moved it already.
    pub fn apply_card_update(&mut self, list_id: i64, card: Card) -> Result<CardMove, ReconcileError> {
        let board = self.loaded_mut()?;
        let card_id = card.id;
        let to_list_id = card.list_id;

        let from_list_id = if list_holds(&board.lists, to_list_id, card_id) {
            to_list_id
        } else if list_holds(&board.lists, list_id, card_id) {
            list_id
        } else {
            return Err(ReconcileError::card_not_found(list_id, card_id));
        };

        if from_list_id == to_list_id {
            if let Some(list) = board.lists.find_by_id_mut(to_list_id) {
                list.cards.replace_existing(card);
            }
            return Ok(CardMove::InPlace);
        }

        if !board.lists.contains_id(to_list_id) {
            return Err(ReconcileError::list_not_found(to_list_id));
        }
        if let Some(from) = board.lists.find_by_id_mut(from_list_id) {
            from.cards.remove_by_id(card_id);
            renumber(&mut from.cards);
        }
        let to = board
            .lists
            .find_by_id_mut(to_list_id)
            .ok_or_else(|| ReconcileError::list_not_found(to_list_id))?;
        let index = usize::try_from(card.position).unwrap_or(0).min(to.cards.len());
        to.cards.insert(index, card);
        renumber(&mut to.cards);

        tracing::debug!(
            "[Store] Moved card {} from list {} to list {}",
            card_id,
            from_list_id,
            to_list_id
        );
        Ok(CardMove::Moved {
            from_list_id,
            to_list_id,
        })
    }

    pub fn update_card_order(&mut self, list_id: i64, order: &[i64]) -> Result<(), ReconcileError> {
        let list = self.list_mut(list_id)?;
        list.cards.reorder_by(order);
        renumber(&mut list.cards);
        Ok(())
    }

    // --- Card sub-entities ---

    /// Add a member, date or checklist unless the card already has it
    pub fn add_card_entity<E: CardEntity>(
        &mut self,
        list_id: i64,
        card_id: i64,
        entity: E,
    ) -> Result<bool, ReconcileError> {
        let card = self.card_mut(list_id, card_id)?;
        let added = E::collection(card).insert_if_absent(entity);
        if !added {
            tracing::debug!("[Store] Card {} already has that {}", card_id, E::NAME);
        }
        Ok(added)
    }

    pub fn update_card_entity<E: CardEntity>(
        &mut self,
        list_id: i64,
        card_id: i64,
        entity: E,
    ) -> Result<bool, ReconcileError> {
        let card = self.card_mut(list_id, card_id)?;
        Ok(E::collection(card).replace_existing(entity))
    }

    pub fn remove_card_entity<E: CardEntity>(
        &mut self,
        list_id: i64,
        card_id: i64,
        entity_id: i64,
    ) -> Result<Option<E>, ReconcileError> {
        let card = self.card_mut(list_id, card_id)?;
        let removed = E::collection(card).remove_by_id(entity_id);
        if removed.is_none() {
            tracing::debug!("[Store] {} {} already gone from card {}", E::NAME, entity_id, card_id);
        }
        Ok(removed)
    }

    pub fn add_checklist_item(
        &mut self,
        list_id: i64,
        card_id: i64,
        item: ChecklistItem,
    ) -> Result<bool, ReconcileError> {
        let checklist_id = item.checklist_id;
        let card = self.card_mut(list_id, card_id)?;
        items::add(card, item).ok_or_else(|| ReconcileError::checklist_not_found(card_id, checklist_id))
    }

    pub fn update_checklist_item(
        &mut self,
        list_id: i64,
        card_id: i64,
        item: ChecklistItem,
    ) -> Result<bool, ReconcileError> {
        let checklist_id = item.checklist_id;
        let card = self.card_mut(list_id, card_id)?;
        items::update(card, item)
            .ok_or_else(|| ReconcileError::checklist_not_found(card_id, checklist_id))
    }

    pub fn remove_checklist_item(
        &mut self,
        list_id: i64,
        card_id: i64,
        checklist_id: i64,
        item_id: i64,
    ) -> Result<bool, ReconcileError> {
        let card = self.card_mut(list_id, card_id)?;
        items::remove(card, checklist_id, item_id)
            .ok_or_else(|| ReconcileError::checklist_not_found(card_id, checklist_id))
    }

    /// Reorder a checklist's items on whichever list holds the card.
    /// Returns false when the card or checklist is not in the tree.
    pub fn reorder_checklist_items(&mut self, card_id: i64, checklist_id: i64, order: &[i64]) -> bool {
        let Some(board) = self.board.as_mut() else {
            return false;
        };
        board
            .lists
            .iter_mut()
            .find_map(|list| list.cards.find_by_id_mut(card_id))
            .and_then(|card| items::reorder(card, checklist_id, order))
            .is_some()
    }

    fn loaded_mut(&mut self) -> Result<&mut Board, ReconcileError> {
        self.board.as_mut().ok_or(ReconcileError::BoardNotLoaded)
    }

    fn list_mut(&mut self, list_id: i64) -> Result<&mut BoardList, ReconcileError> {
        self.loaded_mut()?
            .lists
            .find_by_id_mut(list_id)
            .ok_or_else(|| ReconcileError::list_not_found(list_id))
    }

    fn card_mut(&mut self, list_id: i64, card_id: i64) -> Result<&mut Card, ReconcileError> {
        self.list_mut(list_id)?
            .cards
            .find_by_id_mut(card_id)
            .ok_or_else(|| ReconcileError::card_not_found(list_id, card_id))
    }
}

fn list_holds(lists: &[BoardList], list_id: i64, card_id: i64) -> bool {
    lists
        .iter()
        .any(|list| list.id == list_id && list.cards.contains_id(card_id))
}
