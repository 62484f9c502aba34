//! Board endpoints

use crate::client::api::ApiClient;
use crate::client::error::ClientError;
use crate::shared::models::{
    AddBoardMember, Board, BoardAllowedUser, BoardClaims, BoardRole, BoardUpdate, NewBoard,
    RemoveBoardMember,
};

impl ApiClient {
    /// Boards the user can access, without their lists
    pub async fn get_boards(&self) -> Result<Vec<Board>, ClientError> {
        self.get("/board").await
    }

    /// Full board snapshot: lists, cards and card sub-entities
    pub async fn get_board(&self, board_id: i64) -> Result<Board, ClientError> {
        self.get(&format!("/board/{}", board_id)).await
    }

    pub async fn post_board(&self, board: &NewBoard) -> Result<Board, ClientError> {
        self.post("/board", board).await
    }

    pub async fn patch_board(&self, board_id: i64, update: &BoardUpdate) -> Result<Board, ClientError> {
        self.patch(&format!("/board/{}", board_id), update).await
    }

    pub async fn delete_board(&self, board_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/board/{}", board_id)).await
    }

    pub async fn get_board_claims(&self, board_id: i64) -> Result<BoardClaims, ClientError> {
        self.get(&format!("/board/{}/claims", board_id)).await
    }

    pub async fn get_board_roles(&self, board_id: i64) -> Result<Vec<BoardRole>, ClientError> {
        self.get(&format!("/board/{}/roles", board_id)).await
    }

    pub async fn get_board_members(&self, board_id: i64) -> Result<Vec<BoardAllowedUser>, ClientError> {
        self.get(&format!("/board/{}/member", board_id)).await
    }

    pub async fn add_board_member(
        &self,
        board_id: i64,
        member: &AddBoardMember,
    ) -> Result<BoardAllowedUser, ClientError> {
        self.post(&format!("/board/{}/member", board_id), member).await
    }

    pub async fn remove_board_member(
        &self,
        board_id: i64,
        member: &RemoveBoardMember,
    ) -> Result<(), ClientError> {
        self.delete_with(&format!("/board/{}/member", board_id), member).await
    }

    /// Persist the order of the board's lists
    pub async fn update_board_lists_order(&self, board_id: i64, order: &[i64]) -> Result<(), ClientError> {
        self.post_unit(&format!("/board/{}/list-order", board_id), order).await
    }
}
