//! # Session
//!
//! Owns the [`ApiClient`] and the [`SharedStore`] and exposes the store
//! actions. An action performs one REST call and, on success, applies one
//! mutation to the store. Wherever a push event exists for the same change,
//! the action applies that event locally, so the broadcast that follows is
//! absorbed by the same idempotent handler.
//!
//! Failed actions are logged and returned to the caller; the store is left
//! as it was. The store lock is never held across a request.

use crate::client::api::ApiClient;
use crate::client::config::Config;
use crate::client::error::ClientError;
use crate::client::realtime::{self, ConnectionStatus, EventOutcome, SocketHandle, SocketUpdate};
use crate::client::store::{SharedStore, Store};
use crate::shared::event::{
    BoardEvent, CardEventEnvelope, CardOrderUpdate, ChecklistItemDeleteEnvelope,
    ChecklistItemOrderUpdate, DeleteEnvelope,
};
use crate::shared::models::{
    AddBoardMember, AssignMember, Board, BoardAllowedUser, BoardList, BoardUpdate, Card,
    CardActivity, CardChecklist, CardDate, CardMember, CardUpdate, ChecklistItem,
    ChecklistItemUpdate, NewBoard, NewBoardList, NewCard, NewCardDate, NewChecklist, NewComment,
    RegisterPayload, RemoveBoardMember, User, UserLogin,
};

/// Log a failed action and pass the error on
fn rejected(action: &'static str) -> impl Fn(ClientError) -> ClientError {
    move |e| {
        tracing::error!("[Store] {} failed: {}", action, e);
        e
    }
}

/// Why [`Session::listen`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerExit {
    /// The transport task stopped
    TransportStopped,
    /// The loaded board was deleted on the server
    BoardDeleted,
}

#[derive(Debug, Clone)]
pub struct Session {
    api: ApiClient,
    store: SharedStore,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        Ok(Self::with_store(ApiClient::new(config)?, Store::shared()))
    }

    pub fn with_store(api: ApiClient, store: SharedStore) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Apply a change locally through the push-event handler
    async fn apply(&self, event: BoardEvent) -> Result<EventOutcome, ClientError> {
        Ok(realtime::apply_shared(&self.store, event).await?)
    }

    // --- Push channel ---

    /// Open the push channel and join the loaded board, if any
    pub async fn connect(&self) -> SocketHandle {
        let socket = SocketHandle::connect(&self.api);
        if let Some(board_id) = self.store.read().await.board.board().map(|board| board.id) {
            socket.join_board(board_id);
        }
        socket
    }

    /// Apply socket updates in arrival order until the transport stops or
    /// the loaded board is deleted. Failed events are logged and skipped.
    pub async fn listen(&self, socket: &mut SocketHandle) -> ListenerExit {
        while let Some(update) = socket.next().await {
            match update {
                SocketUpdate::Event(event) => {
                    if let Ok(EventOutcome::BoardDeleted) = realtime::apply_shared(&self.store, event).await {
                        return ListenerExit::BoardDeleted;
                    }
                }
                SocketUpdate::Status(ConnectionStatus::Error(e)) => {
                    tracing::warn!("[Socket.IO] Error: {}", e);
                }
                SocketUpdate::Status(status) => {
                    tracing::debug!("[Socket.IO] Status: {:?}", status);
                }
            }
        }
        ListenerExit::TransportStopped
    }

    // --- Auth ---

    /// Log in and load the user's claims
    pub async fn login(&self, credentials: &UserLogin) -> Result<User, ClientError> {
        let fail = rejected("login");
        self.api.login(credentials).await.map_err(&fail)?;
        self.load_user().await.map_err(&fail)
    }

    pub async fn load_user(&self) -> Result<User, ClientError> {
        let user = self.api.get_claims().await.map_err(rejected("load_user"))?;
        self.store.write().await.auth.set_user(user.clone());
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.api.logout().await.map_err(rejected("logout"))?;
        self.store.write().await.auth.clear();
        Ok(())
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<User, ClientError> {
        self.api.register(payload).await.map_err(rejected("register"))
    }

    // --- Boards ---

    pub async fn load_boards(&self) -> Result<(), ClientError> {
        let boards = self.api.get_boards().await.map_err(rejected("load_boards"))?;
        self.store.write().await.board.set_boards(boards);
        Ok(())
    }

    pub async fn create_board(&self, board: &NewBoard) -> Result<Board, ClientError> {
        let board = self.api.post_board(board).await.map_err(rejected("create_board"))?;
        self.store.write().await.board.add_board(board.clone());
        Ok(board)
    }

    pub async fn remove_board(&self, board_id: i64) -> Result<(), ClientError> {
        self.api.delete_board(board_id).await.map_err(rejected("remove_board"))?;
        let mut store = self.store.write().await;
        store.board.remove_board(board_id);
        store.board.unload_if(board_id);
        Ok(())
    }

    /// Patch the board, then merge the metadata the server saved
    pub async fn update_board(&self, board_id: i64, update: &BoardUpdate) -> Result<Board, ClientError> {
        let fail = rejected("update_board");
        let board = self.api.patch_board(board_id, update).await.map_err(&fail)?;
        self.apply(BoardEvent::BoardUpdate(board.metadata()))
            .await
            .map_err(&fail)?;
        Ok(board)
    }

    /// Load a board with the user's claims, the roles and the members
    pub async fn load_board(&self, board_id: i64) -> Result<(), ClientError> {
        let fail = rejected("load_board");
        let board = self.api.get_board(board_id).await.map_err(&fail)?;
        let (claims, roles, users) = futures_util::try_join!(
            self.api.get_board_claims(board_id),
            self.api.get_board_roles(board_id),
            self.api.get_board_members(board_id),
        )
        .map_err(&fail)?;

        tracing::info!(
            "[Store] Loaded board {} '{}' with {} lists",
            board.id,
            board.title,
            board.lists.len()
        );
        let mut store = self.store.write().await;
        store.board.set_board(board);
        store.board.set_claims(claims);
        store.board.set_roles(roles);
        store.board.set_users(users);
        Ok(())
    }

    /// Forget the loaded board along with its archive and the open card
    pub async fn unload_board(&self) {
        let mut store = self.store.write().await;
        store.board.unload();
        store.archive.clear();
        store.card.close();
    }

    pub async fn add_board_member(
        &self,
        board_id: i64,
        member: &AddBoardMember,
    ) -> Result<BoardAllowedUser, ClientError> {
        let user = self
            .api
            .add_board_member(board_id, member)
            .await
            .map_err(rejected("add_board_member"))?;
        self.store.write().await.board.save_user(user.clone());
        Ok(user)
    }

    pub async fn remove_board_member(&self, board_id: i64, user_id: i64) -> Result<(), ClientError> {
        self.api
            .remove_board_member(board_id, &RemoveBoardMember { user_id })
            .await
            .map_err(rejected("remove_board_member"))?;
        self.store.write().await.board.remove_user(user_id);
        Ok(())
    }

    pub async fn load_archive(&self, board_id: i64) -> Result<(), ClientError> {
        let (cards, lists) = futures_util::try_join!(
            self.api.get_archived_cards(board_id),
            self.api.get_archived_lists(board_id),
        )
        .map_err(rejected("load_archive"))?;

        let mut store = self.store.write().await;
        store.archive.set_cards(cards);
        store.archive.set_lists(lists);
        Ok(())
    }

    // --- Lists ---

    /// Create a list, then push the resulting list order to the server
    pub async fn new_board_list(&self, board_id: i64, list: &NewBoardList) -> Result<BoardList, ClientError> {
        let fail = rejected("new_board_list");
        let list = self.api.post_board_list(board_id, list).await.map_err(&fail)?;
        let order: Vec<i64> = {
            let mut store = self.store.write().await;
            store.board.save_list(list.clone()).map_err(ClientError::from).map_err(&fail)?;
            store.board.board_lists().iter().map(|list| list.id).collect()
        };
        self.api
            .update_board_lists_order(board_id, &order)
            .await
            .map_err(&fail)?;
        Ok(list)
    }

    pub async fn update_board_list(&self, list_id: i64, list: &NewBoardList) -> Result<BoardList, ClientError> {
        let fail = rejected("update_board_list");
        let list = self.api.patch_board_list(list_id, list).await.map_err(&fail)?;
        self.apply(BoardEvent::ListUpdate(list.clone())).await.map_err(&fail)?;
        Ok(list)
    }

    pub async fn remove_board_list(&self, list_id: i64) -> Result<(), ClientError> {
        let fail = rejected("remove_board_list");
        self.api.delete_board_list(list_id).await.map_err(&fail)?;
        self.store
            .write()
            .await
            .board
            .remove_list(list_id)
            .map_err(ClientError::from)
            .map_err(&fail)?;
        Ok(())
    }

    pub async fn archive_board_list(&self, list_id: i64) -> Result<(), ClientError> {
        let fail = rejected("archive_board_list");
        let archived = self.api.archive_board_list(list_id).await.map_err(&fail)?;
        self.apply(BoardEvent::ListArchive(archived)).await.map_err(&fail)?;
        Ok(())
    }

    pub async fn revert_board_list(&self, list_id: i64) -> Result<(), ClientError> {
        let fail = rejected("revert_board_list");
        let list = self.api.revert_board_list(list_id).await.map_err(&fail)?;
        self.apply(BoardEvent::ListRevert(list)).await.map_err(&fail)?;
        Ok(())
    }

    pub async fn reorder_lists(&self, board_id: i64, order: &[i64]) -> Result<(), ClientError> {
        let fail = rejected("reorder_lists");
        self.api
            .update_board_lists_order(board_id, order)
            .await
            .map_err(&fail)?;
        self.apply(BoardEvent::ListOrderUpdate(order.to_vec()))
            .await
            .map_err(&fail)?;
        Ok(())
    }

    pub async fn reorder_cards(&self, list_id: i64, order: &[i64]) -> Result<(), ClientError> {
        let fail = rejected("reorder_cards");
        self.api.update_cards_order(list_id, order).await.map_err(&fail)?;
        self.apply(BoardEvent::CardOrderUpdate(CardOrderUpdate {
            list_id,
            order: order.to_vec(),
        }))
        .await
        .map_err(&fail)?;
        Ok(())
    }

    // --- Cards ---

    pub async fn create_card(&self, card: &NewCard) -> Result<Card, ClientError> {
        let fail = rejected("create_card");
        let card = self.api.post_card(card).await.map_err(&fail)?;
        self.apply(BoardEvent::CardNew(card.clone())).await.map_err(&fail)?;
        Ok(card)
    }

    /// Fetch a card and open it in detail
    pub async fn open_card(&self, card_id: i64) -> Result<Card, ClientError> {
        let card = self.api.get_card(card_id).await.map_err(rejected("open_card"))?;
        self.store.write().await.card.open(card.clone());
        Ok(card)
    }

    pub async fn close_card(&self) {
        self.store.write().await.card.close();
    }

    pub async fn load_card_activities(&self, card_id: i64) -> Result<Vec<CardActivity>, ClientError> {
        let activities = self
            .api
            .get_card_activities(card_id)
            .await
            .map_err(rejected("load_card_activities"))?;
        self.store
            .write()
            .await
            .card
            .set_activities(card_id, activities.clone());
        Ok(activities)
    }

    /// Patch a card; a changed `list_id` moves it between lists
    pub async fn update_card(&self, card_id: i64, update: &CardUpdate) -> Result<Card, ClientError> {
        let fail = rejected("update_card");
        let card = self.api.patch_card(card_id, update).await.map_err(&fail)?;

        let mut store = self.store.write().await;
        let list_id = store
            .board
            .locate_card(card_id)
            .map(|current| current.list_id)
            .unwrap_or(card.list_id);
        let envelope = CardEventEnvelope {
            list_id,
            card_id,
            entity: card.clone(),
        };
        realtime::apply_event(&mut store, BoardEvent::CardUpdate(envelope))
            .map_err(ClientError::from)
            .map_err(&fail)?;
        Ok(card)
    }

    /// Delete a card for good and close it if it is open
    pub async fn delete_card(&self, list_id: i64, card_id: i64) -> Result<(), ClientError> {
        let fail = rejected("delete_card");
        self.api.delete_card(card_id).await.map_err(&fail)?;

        let mut store = self.store.write().await;
        if store.card.is_open(card_id) {
            store.card.close();
        }
        store
            .board
            .remove_card(list_id, card_id)
            .map_err(ClientError::from)
            .map_err(&fail)?;
        Ok(())
    }

    pub async fn archive_card(&self, list_id: i64, card_id: i64) -> Result<(), ClientError> {
        let fail = rejected("archive_card");
        let archived = self.api.archive_card(card_id).await.map_err(&fail)?;
        self.apply(BoardEvent::CardArchive(CardEventEnvelope {
            list_id,
            card_id,
            entity: archived,
        }))
        .await
        .map_err(&fail)?;
        Ok(())
    }

    pub async fn revert_card(&self, card_id: i64) -> Result<Card, ClientError> {
        let fail = rejected("revert_card");
        let card = self.api.revert_card(card_id).await.map_err(&fail)?;
        self.apply(BoardEvent::CardRevert(card.clone())).await.map_err(&fail)?;
        Ok(card)
    }

    // --- Comments ---

    pub async fn add_comment(&self, card_id: i64, comment: &str) -> Result<CardActivity, ClientError> {
        let fail = rejected("add_comment");
        let activity = self
            .api
            .post_card_comment(
                card_id,
                &NewComment {
                    comment: comment.to_string(),
                },
            )
            .await
            .map_err(&fail)?;
        self.apply(BoardEvent::CardActivity(activity.clone()))
            .await
            .map_err(&fail)?;
        Ok(activity)
    }

    pub async fn update_comment(&self, comment_id: i64, comment: &str) -> Result<CardActivity, ClientError> {
        let fail = rejected("update_comment");
        let activity = self
            .api
            .patch_card_comment(
                comment_id,
                &NewComment {
                    comment: comment.to_string(),
                },
            )
            .await
            .map_err(&fail)?;
        self.apply(BoardEvent::CardActivityUpdate(activity.clone()))
            .await
            .map_err(&fail)?;
        Ok(activity)
    }

    /// Delete a comment and drop its activity from the open card
    pub async fn delete_comment(&self, comment_id: i64) -> Result<(), ClientError> {
        self.api
            .delete_card_comment(comment_id)
            .await
            .map_err(rejected("delete_comment"))?;

        let mut store = self.store.write().await;
        let activity_id = store.card.card().and_then(|card| {
            card.activities
                .iter()
                .find(|activity| activity.comment().map(|c| c.id) == Some(comment_id))
                .map(|activity| activity.id)
        });
        if let Some(activity_id) = activity_id {
            store.card.remove_activity(activity_id);
        }
        Ok(())
    }

    // --- Card members, dates and checklists ---

    pub async fn assign_member(
        &self,
        list_id: i64,
        card_id: i64,
        member: &AssignMember,
    ) -> Result<CardMember, ClientError> {
        let fail = rejected("assign_member");
        let member = self.api.assign_card_member(card_id, member).await.map_err(&fail)?;
        self.apply(BoardEvent::CardMemberAssigned(CardEventEnvelope {
            list_id,
            card_id,
            entity: member.clone(),
        }))
        .await
        .map_err(&fail)?;
        Ok(member)
    }

    /// Remove a board member's assignment from a card
    pub async fn deassign_member(&self, list_id: i64, card_id: i64, board_user_id: i64) -> Result<(), ClientError> {
        let fail = rejected("deassign_member");
        self.api
            .deassign_card_member(card_id, board_user_id)
            .await
            .map_err(&fail)?;

        let mut store = self.store.write().await;
        let assignment_id = store
            .board
            .find_card(list_id, card_id)
            .ok()
            .into_iter()
            .chain(store.card.card().filter(|card| card.id == card_id))
            .flat_map(|card| card.assigned_members.iter())
            .find(|assignment| assignment.board_user_id == board_user_id)
            .map(|assignment| assignment.id);

        if let Some(entity_id) = assignment_id {
            let envelope = DeleteEnvelope {
                list_id,
                card_id,
                entity_id,
            };
            realtime::apply_event(&mut store, BoardEvent::CardMemberDeassigned(envelope))
                .map_err(ClientError::from)
                .map_err(&fail)?;
        }
        Ok(())
    }

    pub async fn add_card_date(&self, list_id: i64, card_id: i64, date: &NewCardDate) -> Result<CardDate, ClientError> {
        let fail = rejected("add_card_date");
        let date = self.api.post_card_date(card_id, date).await.map_err(&fail)?;
        self.apply(BoardEvent::CardDateNew(CardEventEnvelope {
            list_id,
            card_id,
            entity: date.clone(),
        }))
        .await
        .map_err(&fail)?;
        Ok(date)
    }

    pub async fn update_card_date(
        &self,
        list_id: i64,
        card_id: i64,
        date_id: i64,
        date: &NewCardDate,
    ) -> Result<CardDate, ClientError> {
        let fail = rejected("update_card_date");
        let date = self.api.patch_card_date(date_id, date).await.map_err(&fail)?;
        self.apply(BoardEvent::CardDateUpdate(CardEventEnvelope {
            list_id,
            card_id,
            entity: date.clone(),
        }))
        .await
        .map_err(&fail)?;
        Ok(date)
    }

    pub async fn delete_card_date(&self, list_id: i64, card_id: i64, date_id: i64) -> Result<(), ClientError> {
        let fail = rejected("delete_card_date");
        self.api.delete_card_date(date_id).await.map_err(&fail)?;
        self.apply(BoardEvent::CardDateDelete(DeleteEnvelope {
            list_id,
            card_id,
            entity_id: date_id,
        }))
        .await
        .map_err(&fail)?;
        Ok(())
    }

    pub async fn add_checklist(
        &self,
        list_id: i64,
        card_id: i64,
        checklist: &NewChecklist,
    ) -> Result<CardChecklist, ClientError> {
        let fail = rejected("add_checklist");
        let checklist = self
            .api
            .post_card_checklist(card_id, checklist)
            .await
            .map_err(&fail)?;
        self.apply(BoardEvent::CardChecklistNew(CardEventEnvelope {
            list_id,
            card_id,
            entity: checklist.clone(),
        }))
        .await
        .map_err(&fail)?;
        Ok(checklist)
    }

    pub async fn update_checklist(
        &self,
        list_id: i64,
        card_id: i64,
        checklist_id: i64,
        checklist: &NewChecklist,
    ) -> Result<CardChecklist, ClientError> {
        let fail = rejected("update_checklist");
        let checklist = self
            .api
            .patch_card_checklist(checklist_id, checklist)
            .await
            .map_err(&fail)?;
        self.apply(BoardEvent::CardChecklistUpdate(CardEventEnvelope {
            list_id,
            card_id,
            entity: checklist.clone(),
        }))
        .await
        .map_err(&fail)?;
        Ok(checklist)
    }

    pub async fn delete_checklist(&self, list_id: i64, card_id: i64, checklist_id: i64) -> Result<(), ClientError> {
        let fail = rejected("delete_checklist");
        self.api
            .delete_card_checklist(checklist_id)
            .await
            .map_err(&fail)?;
        self.apply(BoardEvent::CardChecklistDelete(DeleteEnvelope {
            list_id,
            card_id,
            entity_id: checklist_id,
        }))
        .await
        .map_err(&fail)?;
        Ok(())
    }

    pub async fn add_checklist_item(
        &self,
        list_id: i64,
        card_id: i64,
        checklist_id: i64,
        item: &ChecklistItemUpdate,
    ) -> Result<ChecklistItem, ClientError> {
        let fail = rejected("add_checklist_item");
        let item = self
            .api
            .post_checklist_item(checklist_id, item)
            .await
            .map_err(&fail)?;
        self.apply(BoardEvent::ChecklistItemNew(CardEventEnvelope {
            list_id,
            card_id,
            entity: item.clone(),
        }))
        .await
        .map_err(&fail)?;
        Ok(item)
    }

    pub async fn update_checklist_item(
        &self,
        list_id: i64,
        card_id: i64,
        item_id: i64,
        item: &ChecklistItemUpdate,
    ) -> Result<ChecklistItem, ClientError> {
        let fail = rejected("update_checklist_item");
        let item = self.api.patch_checklist_item(item_id, item).await.map_err(&fail)?;
        self.apply(BoardEvent::ChecklistItemUpdate(CardEventEnvelope {
            list_id,
            card_id,
            entity: item.clone(),
        }))
        .await
        .map_err(&fail)?;
        Ok(item)
    }

    pub async fn delete_checklist_item(
        &self,
        list_id: i64,
        card_id: i64,
        checklist_id: i64,
        item_id: i64,
    ) -> Result<(), ClientError> {
        let fail = rejected("delete_checklist_item");
        self.api.delete_checklist_item(item_id).await.map_err(&fail)?;
        self.apply(BoardEvent::ChecklistItemDelete(ChecklistItemDeleteEnvelope {
            list_id,
            card_id,
            checklist_id,
            entity_id: item_id,
        }))
        .await
        .map_err(&fail)?;
        Ok(())
    }

    pub async fn reorder_checklist_items(
        &self,
        card_id: i64,
        checklist_id: i64,
        order: &[i64],
    ) -> Result<(), ClientError> {
        let fail = rejected("reorder_checklist_items");
        self.api
            .update_checklist_items_order(checklist_id, order)
            .await
            .map_err(&fail)?;
        self.apply(BoardEvent::ChecklistItemOrderUpdate(ChecklistItemOrderUpdate {
            card_id,
            checklist_id,
            order: order.to_vec(),
        }))
        .await
        .map_err(&fail)?;
        Ok(())
    }
}
