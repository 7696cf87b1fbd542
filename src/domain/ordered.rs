//! Ordered collections with a dense `order` field.
//!
//! Every element carries an explicit `order`. After any mutation the orders
//! of an [`OrderedList`] are exactly `0..len` and the backing vector is
//! sorted by them. The list exposes no index-level mutation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An element that lives in an [`OrderedList`].
pub trait Ordered {
    /// Stable identity type
    type Id: PartialEq;

    /// Stable identity, used by `upsert` and `remove`
    fn id(&self) -> &Self::Id;

    /// Current display position
    fn order(&self) -> usize;

    /// Assign a display position. Implementors recompute any state derived
    /// from the position here.
    fn set_order(&mut self, order: usize);
}

/// Direction for a single-step move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl std::str::FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => anyhow::bail!("Unknown direction: {}", s),
        }
    }
}

/// Sequence with dense, explicit ordering
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedList<T> {
    items: Vec<T>,
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Ordered> OrderedList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from elements in arbitrary order.
    ///
    /// Elements are sorted by their stored `order` (ties keep input order)
    /// and then renumbered densely.
    pub fn from_unordered(mut items: Vec<T>) -> Self {
        items.sort_by_key(|item| item.order());
        let mut list = Self { items };
        list.renormalize();
        list
    }

    /// Order value the next appended element will receive
    pub fn next_order(&self) -> usize {
        self.items.len()
    }

    /// Insert at the end with `order = len`
    pub fn append(&mut self, mut item: T) {
        item.set_order(self.items.len());
        self.items.push(item);
    }

    /// Swap the element at `index` with its neighbour.
    ///
    /// Returns `false` without touching anything when the move would leave
    /// the list bounds.
    pub fn move_adjacent(&mut self, index: usize, direction: Direction) -> bool {
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };

        match target {
            Some(target) if index < self.items.len() && target < self.items.len() => {
                self.items.swap(index, target);
                self.renormalize();
                true
            }
            _ => false,
        }
    }

    /// Remove the element at `from` and reinsert it at `to`.
    ///
    /// Returns `false` for out-of-range indices or `from == to`.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.items.len() || to >= self.items.len() {
            return false;
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.renormalize();
        true
    }

    /// Delete the element with `id`, renumbering the remainder.
    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let pos = self.position(id)?;
        let removed = self.items.remove(pos);
        self.renormalize();
        Some(removed)
    }

    /// Replace the element with the same id in place, or append.
    ///
    /// Returns `true` when an existing element was replaced.
    pub fn upsert(&mut self, mut item: T) -> bool {
        if let Some(pos) = self.position(item.id()) {
            item.set_order(pos);
            self.items[pos] = item;
            true
        } else {
            self.append(item);
            false
        }
    }

    /// Position of the element with `id`
    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Get an element by id
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Mutable access that cannot affect ordering.
    ///
    /// The closure's changes to `order` are discarded.
    pub fn update<R>(&mut self, id: &T::Id, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let pos = self.position(id)?;
        let item = &mut self.items[pos];
        let result = f(item);
        item.set_order(pos);
        Some(result)
    }

    /// Element at a display position
    pub fn at(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Iterate in ascending order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// All elements in ascending order
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn renormalize(&mut self) {
        for (pos, item) in self.items.iter_mut().enumerate() {
            item.set_order(pos);
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for OrderedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Ordered + Deserialize<'de>> Deserialize<'de> for OrderedList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(Self::from_unordered(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        order: usize,
    }

    impl Ordered for Item {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn order(&self) -> usize {
            self.order
        }

        fn set_order(&mut self, order: usize) {
            self.order = order;
        }
    }

    fn item(id: u32) -> Item {
        Item { id, order: 99 }
    }

    fn ids(list: &OrderedList<Item>) -> Vec<u32> {
        list.iter().map(|i| i.id).collect()
    }

    fn assert_dense(list: &OrderedList<Item>) {
        for (pos, item) in list.iter().enumerate() {
            assert_eq!(item.order, pos);
        }
    }

    #[test]
    fn test_append_assigns_next_order() {
        let mut list = OrderedList::new();
        list.append(item(1));
        list.append(item(2));
        assert_eq!(list.at(1).unwrap().order, 1);
        assert_eq!(list.next_order(), 2);
    }

    #[test]
    fn test_move_adjacent_bounds_are_noops() {
        let mut list = OrderedList::new();
        list.append(item(1));
        list.append(item(2));

        assert!(!list.move_adjacent(0, Direction::Up));
        assert!(!list.move_adjacent(1, Direction::Down));
        assert!(!list.move_adjacent(7, Direction::Up));
        assert_eq!(ids(&list), vec![1, 2]);

        assert!(list.move_adjacent(1, Direction::Up));
        assert_eq!(ids(&list), vec![2, 1]);
        assert_dense(&list);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut list = OrderedList::new();
        for id in 1..=4 {
            list.append(item(id));
        }
        assert!(list.remove(&2).is_some());
        assert!(list.remove(&42).is_none());
        assert_eq!(ids(&list), vec![1, 3, 4]);
        assert_dense(&list);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut list = OrderedList::new();
        list.append(item(1));
        list.append(item(2));
        list.append(item(3));

        assert!(list.upsert(Item { id: 2, order: 0 }));
        assert_eq!(ids(&list), vec![1, 2, 3]);
        assert_dense(&list);

        assert!(!list.upsert(item(9)));
        assert_eq!(ids(&list), vec![1, 2, 3, 9]);
    }

    #[test]
    fn test_move_to_splices() {
        let mut list = OrderedList::new();
        for id in 1..=5 {
            list.append(item(id));
        }
        assert!(list.move_to(0, 3));
        assert_eq!(ids(&list), vec![2, 3, 4, 1, 5]);
        assert!(list.move_to(4, 0));
        assert_eq!(ids(&list), vec![5, 2, 3, 4, 1]);
        assert!(!list.move_to(2, 2));
        assert!(!list.move_to(0, 5));
        assert_dense(&list);
    }

    #[test]
    fn test_from_unordered_sorts_and_densifies() {
        let list = OrderedList::from_unordered(vec![
            Item { id: 1, order: 10 },
            Item { id: 2, order: 3 },
            Item { id: 3, order: 3 },
        ]);
        assert_eq!(ids(&list), vec![2, 3, 1]);
        assert_dense(&list);
    }

    #[test]
    fn test_update_cannot_reorder() {
        let mut list = OrderedList::new();
        list.append(item(1));
        list.append(item(2));
        list.update(&1, |i| i.order = 40);
        assert_dense(&list);
    }
}
