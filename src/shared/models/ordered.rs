//! Ordered, id-keyed collections.
//!
//! Every collection in the board tree is a `Vec` whose order is meaningful and
//! whose items carry a unique id. `OrderedById` gives those vectors the
//! upsert / remove / reorder operations the store and the event listeners need.

use std::collections::HashMap;

/// An entity with a server-assigned id
pub trait Identified {
    fn id(&self) -> i64;
}

/// An entity whose `position` mirrors its index in the owning collection
pub trait Positioned: Identified {
    fn position(&self) -> i64;
    fn set_position(&mut self, position: i64);
}

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Id-keyed operations over an ordered collection
pub trait OrderedById<T: Identified> {
    fn index_of(&self, id: i64) -> Option<usize>;
    fn find_by_id(&self, id: i64) -> Option<&T>;
    fn find_by_id_mut(&mut self, id: i64) -> Option<&mut T>;

    fn contains_id(&self, id: i64) -> bool {
        self.index_of(id).is_some()
    }

    /// Append `item` unless an item with the same id is present.
    /// Returns whether the item was appended.
    fn insert_if_absent(&mut self, item: T) -> bool;

    /// Replace the item with the same id in place, or append it.
    fn upsert(&mut self, item: T) -> Upsert;

    /// Replace the item with the same id in place; no-op when absent.
    fn replace_existing(&mut self, item: T) -> bool;

    fn remove_by_id(&mut self, id: i64) -> Option<T>;

    /// Stable-sort by rank in `order`. Items whose id is missing from `order`
    /// keep their relative order after the ranked ones.
    fn reorder_by(&mut self, order: &[i64]);
}

impl<T: Identified> OrderedById<T> for Vec<T> {
    fn index_of(&self, id: i64) -> Option<usize> {
        self.iter().position(|item| item.id() == id)
    }

    fn find_by_id(&self, id: i64) -> Option<&T> {
        self.iter().find(|item| item.id() == id)
    }

    fn find_by_id_mut(&mut self, id: i64) -> Option<&mut T> {
        self.iter_mut().find(|item| item.id() == id)
    }

    fn insert_if_absent(&mut self, item: T) -> bool {
        if self.contains_id(item.id()) {
            return false;
        }
        self.push(item);
        true
    }

    fn upsert(&mut self, item: T) -> Upsert {
        match self.index_of(item.id()) {
            Some(index) => {
                self[index] = item;
                Upsert::Replaced
            }
            None => {
                self.push(item);
                Upsert::Inserted
            }
        }
    }

    fn replace_existing(&mut self, item: T) -> bool {
        match self.index_of(item.id()) {
            Some(index) => {
                self[index] = item;
                true
            }
            None => false,
        }
    }

    fn remove_by_id(&mut self, id: i64) -> Option<T> {
        self.index_of(id).map(|index| self.remove(index))
    }

    fn reorder_by(&mut self, order: &[i64]) {
        let mut rank: HashMap<i64, usize> = HashMap::with_capacity(order.len());
        for (index, id) in order.iter().enumerate() {
            rank.entry(*id).or_insert(index);
        }
        self.sort_by_key(|item| rank.get(&item.id()).copied().unwrap_or(usize::MAX));
    }
}

/// Set every item's position to its index
pub fn renumber<T: Positioned>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index as i64);
    }
}

/// Stable-sort by the items' current position fields
pub fn sort_by_position<T: Positioned>(items: &mut [T]) {
    items.sort_by_key(|item| item.position());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        position: i64,
        label: &'static str,
    }

    impl Identified for Item {
        fn id(&self) -> i64 {
            self.id
        }
    }

    impl Positioned for Item {
        fn position(&self) -> i64 {
            self.position
        }
        fn set_position(&mut self, position: i64) {
            self.position = position;
        }
    }

    fn item(id: i64, label: &'static str) -> Item {
        Item { id, position: id, label }
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_insert_if_absent_skips_duplicates() {
        let mut items = vec![item(1, "a")];
        assert!(!items.insert_if_absent(item(1, "b")));
        assert!(items.insert_if_absent(item(2, "c")));
        assert_eq!(ids(&items), vec![1, 2]);
        assert_eq!(items[0].label, "a");
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut items = vec![item(1, "a"), item(2, "b")];
        assert_eq!(items.upsert(item(1, "z")), Upsert::Replaced);
        assert_eq!(items.upsert(item(3, "c")), Upsert::Inserted);
        assert_eq!(ids(&items), vec![1, 2, 3]);
        assert_eq!(items[0].label, "z");
    }

    #[test]
    fn test_replace_existing_ignores_unknown() {
        let mut items = vec![item(1, "a")];
        assert!(!items.replace_existing(item(9, "x")));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_reorder_puts_unranked_last() {
        let mut items = vec![item(1, "a"), item(2, "b"), item(3, "c"), item(4, "d")];
        items.reorder_by(&[3, 1]);
        assert_eq!(ids(&items), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_reorder_and_renumber() {
        let mut items = vec![item(1, "a"), item(2, "b"), item(3, "c")];
        items.reorder_by(&[3, 1, 2]);
        renumber(&mut items);
        assert_eq!(ids(&items), vec![3, 1, 2]);
        assert_eq!(items.iter().map(|i| i.position).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_sort_by_position() {
        let mut items = vec![item(3, "c"), item(1, "a"), item(2, "b")];
        sort_by_position(&mut items);
        assert_eq!(ids(&items), vec![1, 2, 3]);
    }
}
