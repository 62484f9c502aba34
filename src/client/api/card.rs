//! Card endpoints, including the card's comments, members and dates

use crate::client::api::ApiClient;
use crate::client::error::ClientError;
use crate::shared::models::{
    ArchivedCard, AssignMember, Card, CardActivity, CardDate, CardMember, CardUpdate, NewCard,
    NewCardDate, NewComment,
};

impl ApiClient {
    pub async fn get_card(&self, card_id: i64) -> Result<Card, ClientError> {
        self.get(&format!("/card/{}", card_id)).await
    }

    pub async fn post_card(&self, card: &NewCard) -> Result<Card, ClientError> {
        self.post(&format!("/list/{}/card", card.list_id), card).await
    }

    pub async fn patch_card(&self, card_id: i64, update: &CardUpdate) -> Result<Card, ClientError> {
        self.patch(&format!("/card/{}", card_id), update).await
    }

    pub async fn delete_card(&self, card_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/card/{}", card_id)).await
    }

    pub async fn archive_card(&self, card_id: i64) -> Result<ArchivedCard, ClientError> {
        self.patch_empty(&format!("/card/{}/archive", card_id)).await
    }

    pub async fn revert_card(&self, card_id: i64) -> Result<Card, ClientError> {
        self.patch_empty(&format!("/card/{}/revert", card_id)).await
    }

    /// Activity feed, newest first
    pub async fn get_card_activities(&self, card_id: i64) -> Result<Vec<CardActivity>, ClientError> {
        self.get(&format!("/card/{}/activities", card_id)).await
    }

    /// Post a comment; the server answers with the comment activity
    pub async fn post_card_comment(
        &self,
        card_id: i64,
        comment: &NewComment,
    ) -> Result<CardActivity, ClientError> {
        self.post(&format!("/card/{}/comment", card_id), comment).await
    }

    pub async fn patch_card_comment(
        &self,
        comment_id: i64,
        comment: &NewComment,
    ) -> Result<CardActivity, ClientError> {
        self.patch(&format!("/comment/{}", comment_id), comment).await
    }

    pub async fn delete_card_comment(&self, comment_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/comment/{}", comment_id)).await
    }

    pub async fn assign_card_member(
        &self,
        card_id: i64,
        member: &AssignMember,
    ) -> Result<CardMember, ClientError> {
        self.post(&format!("/card/{}/assign-member", card_id), member).await
    }

    pub async fn deassign_card_member(&self, card_id: i64, board_user_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/card/{}/assign-member/{}", card_id, board_user_id))
            .await
    }

    pub async fn post_card_date(&self, card_id: i64, date: &NewCardDate) -> Result<CardDate, ClientError> {
        self.post(&format!("/card/{}/date", card_id), date).await
    }

    pub async fn patch_card_date(&self, date_id: i64, date: &NewCardDate) -> Result<CardDate, ClientError> {
        self.patch(&format!("/date/{}", date_id), date).await
    }

    pub async fn delete_card_date(&self, date_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/date/{}", date_id)).await
    }
}
