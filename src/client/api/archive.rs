//! Archive listing endpoints

use crate::client::api::ApiClient;
use crate::client::error::ClientError;
use crate::shared::models::{ArchivedCard, ArchivedList};

impl ApiClient {
    pub async fn get_archived_cards(&self, board_id: i64) -> Result<Vec<ArchivedCard>, ClientError> {
        self.get(&format!("/board/{}/archived-cards", board_id)).await
    }

    pub async fn get_archived_lists(&self, board_id: i64) -> Result<Vec<ArchivedList>, ClientError> {
        self.get(&format!("/board/{}/archived-lists", board_id)).await
    }
}
