//! Active card state
//!
//! The card opened in detail. It is a separate copy from the one in the
//! board tree and also carries the card's activity feed, which the board
//! snapshot does not. Every mutation takes the id of the card it targets
//! and is ignored unless that card is the open one.

use crate::client::store::{items, CardEntity};
use crate::shared::models::{Card, CardActivity, ChecklistItem, OrderedById};

#[derive(Debug, Default)]
pub struct CardState {
    card: Option<Card>,
}

impl CardState {
    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn is_open(&self, card_id: i64) -> bool {
        self.card.as_ref().map(|card| card.id) == Some(card_id)
    }

    pub fn open(&mut self, card: Card) {
        self.card = Some(card);
    }

    pub fn close(&mut self) -> Option<Card> {
        self.card.take()
    }

    /// Replace the open card's fields, keeping the loaded activity feed
    pub fn update_card(&mut self, mut card: Card) -> bool {
        let Some(active) = self.active_mut(card.id) else {
            return false;
        };
        card.activities = std::mem::take(&mut active.activities);
        *active = card;
        true
    }

    pub fn set_activities(&mut self, card_id: i64, activities: Vec<CardActivity>) -> bool {
        match self.active_mut(card_id) {
            Some(card) => {
                card.activities = activities;
                true
            }
            None => false,
        }
    }

    /// Put a new activity at the top of the feed
    pub fn add_activity(&mut self, activity: CardActivity) -> bool {
        let Some(card) = self.active_mut(activity.card_id) else {
            return false;
        };
        if card.activities.contains_id(activity.id) {
            return false;
        }
        card.activities.insert(0, activity);
        true
    }

    pub fn update_activity(&mut self, activity: CardActivity) -> bool {
        match self.active_mut(activity.card_id) {
            Some(card) => card.activities.replace_existing(activity),
            None => false,
        }
    }

    /// Activity deletes carry only the id
    pub fn remove_activity(&mut self, activity_id: i64) -> bool {
        match self.card.as_mut() {
            Some(card) => card.activities.remove_by_id(activity_id).is_some(),
            None => false,
        }
    }

    pub fn add_entity<E: CardEntity>(&mut self, card_id: i64, entity: E) -> bool {
        self.active_mut(card_id)
            .map_or(false, |card| E::collection(card).insert_if_absent(entity))
    }

    pub fn update_entity<E: CardEntity>(&mut self, card_id: i64, entity: E) -> bool {
        self.active_mut(card_id)
            .map_or(false, |card| E::collection(card).replace_existing(entity))
    }

    pub fn remove_entity<E: CardEntity>(&mut self, card_id: i64, entity_id: i64) -> bool {
        self.active_mut(card_id)
            .and_then(|card| E::collection(card).remove_by_id(entity_id))
            .is_some()
    }

    pub fn add_checklist_item(&mut self, card_id: i64, item: ChecklistItem) -> bool {
        self.active_mut(card_id)
            .and_then(|card| items::add(card, item))
            .unwrap_or(false)
    }

    pub fn update_checklist_item(&mut self, card_id: i64, item: ChecklistItem) -> bool {
        self.active_mut(card_id)
            .and_then(|card| items::update(card, item))
            .unwrap_or(false)
    }

    pub fn remove_checklist_item(&mut self, card_id: i64, checklist_id: i64, item_id: i64) -> bool {
        self.active_mut(card_id)
            .and_then(|card| items::remove(card, checklist_id, item_id))
            .unwrap_or(false)
    }

    pub fn reorder_checklist_items(&mut self, card_id: i64, checklist_id: i64, order: &[i64]) -> bool {
        self.active_mut(card_id)
            .and_then(|card| items::reorder(card, checklist_id, order))
            .is_some()
    }

    fn active_mut(&mut self, card_id: i64) -> Option<&mut Card> {
        self.card.as_mut().filter(|card| card.id == card_id)
    }
}
