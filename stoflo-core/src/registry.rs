use indexmap::map::{Values, ValuesMut};
use indexmap::IndexMap;

/// Items that are stored in a [`Registry`]
pub trait Named {
    fn name(&self) -> &str;
}

/// A collection of named items.
///
/// Items are looked up by name and iterated in the order they were first added.
/// Adding an item with a name that is already in use replaces the existing item
/// in place (its position in the iteration order is kept).
#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: IndexMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Named> Registry<T> {
    /// Add an item to the registry
    ///
    /// Returns the item that was replaced, if any.
    pub fn insert(&mut self, item: T) -> Option<T> {
        self.items.insert(item.name().to_string(), item)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.items.get_mut(name)
    }

    /// Position of an item within the iteration order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.get_index_of(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> Values<'_, String, T> {
        self.items.values()
    }

    pub fn iter_mut(&mut self) -> ValuesMut<'_, String, T> {
        self.items.values_mut()
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}
