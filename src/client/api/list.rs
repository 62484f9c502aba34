//! Board list endpoints

use crate::client::api::ApiClient;
use crate::client::error::ClientError;
use crate::shared::models::{ArchivedList, BoardList, NewBoardList};

impl ApiClient {
    pub async fn post_board_list(
        &self,
        board_id: i64,
        list: &NewBoardList,
    ) -> Result<BoardList, ClientError> {
        self.post(&format!("/board/{}/list", board_id), list).await
    }

    pub async fn patch_board_list(
        &self,
        list_id: i64,
        list: &NewBoardList,
    ) -> Result<BoardList, ClientError> {
        self.patch(&format!("/list/{}", list_id), list).await
    }

    pub async fn delete_board_list(&self, list_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/list/{}", list_id)).await
    }

    pub async fn archive_board_list(&self, list_id: i64) -> Result<ArchivedList, ClientError> {
        self.patch_empty(&format!("/list/{}/archive", list_id)).await
    }

    pub async fn revert_board_list(&self, list_id: i64) -> Result<BoardList, ClientError> {
        self.patch_empty(&format!("/list/{}/revert", list_id)).await
    }

    /// Persist the order of a list's cards
    pub async fn update_cards_order(&self, list_id: i64, order: &[i64]) -> Result<(), ClientError> {
        self.post_unit(&format!("/list/{}/card-order", list_id), order).await
    }
}
