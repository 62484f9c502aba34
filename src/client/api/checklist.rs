//! Checklist endpoints

use crate::client::api::ApiClient;
use crate::client::error::ClientError;
use crate::shared::models::{CardChecklist, ChecklistItem, ChecklistItemUpdate, NewChecklist};

impl ApiClient {
    pub async fn post_card_checklist(
        &self,
        card_id: i64,
        checklist: &NewChecklist,
    ) -> Result<CardChecklist, ClientError> {
        self.post(&format!("/card/{}/checklist", card_id), checklist).await
    }

    pub async fn patch_card_checklist(
        &self,
        checklist_id: i64,
        checklist: &NewChecklist,
    ) -> Result<CardChecklist, ClientError> {
        self.patch(&format!("/checklist/{}", checklist_id), checklist).await
    }

    pub async fn delete_card_checklist(&self, checklist_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/checklist/{}", checklist_id)).await
    }

    pub async fn post_checklist_item(
        &self,
        checklist_id: i64,
        item: &ChecklistItemUpdate,
    ) -> Result<ChecklistItem, ClientError> {
        self.post(&format!("/checklist/{}/item", checklist_id), item).await
    }

    pub async fn patch_checklist_item(
        &self,
        item_id: i64,
        item: &ChecklistItemUpdate,
    ) -> Result<ChecklistItem, ClientError> {
        self.patch(&format!("/checklist-item/{}", item_id), item).await
    }

    pub async fn delete_checklist_item(&self, item_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/checklist-item/{}", item_id)).await
    }

    pub async fn update_checklist_items_order(
        &self,
        checklist_id: i64,
        order: &[i64],
    ) -> Result<(), ClientError> {
        self.post_unit(&format!("/checklist/{}/items-order", checklist_id), order)
            .await
    }
}
