//! Archive state: archived cards and lists of the loaded board

use crate::shared::models::{ArchivedCard, ArchivedList, OrderedById, Upsert};

#[derive(Debug, Default)]
pub struct ArchiveState {
    cards: Vec<ArchivedCard>,
    lists: Vec<ArchivedList>,
}

impl ArchiveState {
    pub fn cards(&self) -> &[ArchivedCard] {
        &self.cards
    }

    pub fn lists(&self) -> &[ArchivedList] {
        &self.lists
    }

    pub fn set_cards(&mut self, cards: Vec<ArchivedCard>) {
        self.cards = cards;
    }

    pub fn set_lists(&mut self, lists: Vec<ArchivedList>) {
        self.lists = lists;
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.lists.clear();
    }

    pub fn add_card(&mut self, card: ArchivedCard) -> Upsert {
        self.cards.upsert(card)
    }

    pub fn remove_card(&mut self, card_id: i64) -> Option<ArchivedCard> {
        self.cards.remove_by_id(card_id)
    }

    pub fn add_list(&mut self, list: ArchivedList) -> Upsert {
        self.lists.upsert(list)
    }

    pub fn remove_list(&mut self, list_id: i64) -> Option<ArchivedList> {
        self.lists.remove_by_id(list_id)
    }

    /// Drop the cards that were archived together with a list, i.e. those of
    /// the list not archived on their own. Used when the list is restored.
    pub fn release_list_cards(&mut self, list_id: i64) -> usize {
        self.retain_cards(|card| !(card.board_list_id() == list_id && !card.archived))
    }

    /// Drop every archived card of a list. Used when the list is deleted.
    pub fn purge_list_cards(&mut self, list_id: i64) -> usize {
        self.retain_cards(|card| card.board_list_id() != list_id)
    }

    fn retain_cards(&mut self, keep: impl Fn(&ArchivedCard) -> bool) -> usize {
        let before = self.cards.len();
        self.cards.retain(|card| keep(card));
        before - self.cards.len()
    }
}
