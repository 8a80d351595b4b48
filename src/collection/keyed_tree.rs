use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::collection::NestedValue;

#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    KeyNotFound(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::KeyNotFound(key) => write!(f, "TreeError: no subtree at key '{}'", key),
        }
    }
}

/// Hierarchical keyed-tree container.
///
/// Every node owns an ordered forest of child subtrees and may carry a
/// scalar value of its own. Nodes built by `from_value` never hold both a
/// value and children at once, but that is a convention of the lifting
/// constructor, not a rule the container enforces.
#[derive(Debug, Clone)]
pub struct KeyedTree<K, V> {
    forest: IndexMap<K, KeyedTree<K, V>>,
    value: Option<V>,
}

impl<K, V> Default for KeyedTree<K, V> {
    fn default() -> Self {
        Self { forest: IndexMap::new(), value: None }
    }
}

impl<K, V> KeyedTree<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A terminal node: a value and no children.
    pub fn leaf(value: V) -> Self {
        Self { forest: IndexMap::new(), value: Some(value) }
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn forest(&self) -> &IndexMap<K, KeyedTree<K, V>> {
        &self.forest
    }

    pub fn len(&self) -> usize {
        self.forest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    /// Lazy depth-first pass over every valued descendant, in child order.
    /// Internal nodes are traversed but never yielded themselves.
    pub fn iter(&self) -> TreeIter<'_, K, V> {
        TreeIter { stack: vec![self.forest.iter()] }
    }
}

impl<K: Hash + Eq, V> KeyedTree<K, V> {
    /// Direct-index lookup; absent keys are an error.
    pub fn subtree_at<Q>(&self, key: &Q) -> Result<&Self, TreeError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Display + ?Sized,
    {
        self.forest.get(key).ok_or_else(|| TreeError::KeyNotFound(key.to_string()))
    }

    pub fn get_subtree<Q>(&self, key: &Q) -> Option<&Self>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forest.get(key)
    }

    pub fn get_subtree_mut<Q>(&mut self, key: &Q) -> Option<&mut Self>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forest.get_mut(key)
    }

    /// Insert or replace the child at `key`.
    pub fn set_subtree(&mut self, key: K, incoming: Self) {
        self.forest.insert(key, incoming);
    }

    /// Detach and return the child at `key`, keeping sibling order.
    pub fn take_subtree<Q>(&mut self, key: &Q) -> Option<Self>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forest.shift_remove(key)
    }

    /// Collapse the tree back to nested form. Only leaf nodes contribute
    /// their scalar; a value set directly on an internal node is dropped.
    pub fn to_flat_map(&self) -> IndexMap<K, NestedValue<K, V>>
    where
        K: Clone,
        V: Clone,
    {
        let mut ret = IndexMap::new();
        for (key, subtree) in &self.forest {
            if subtree.forest.is_empty() {
                ret.insert(key.clone(), NestedValue::Scalar(subtree.value.clone()));
            } else {
                ret.insert(key.clone(), NestedValue::Nested(subtree.to_flat_map()));
            }
        }
        ret
    }
}

impl<V> KeyedTree<String, V> {
    /// Append under the next free decimal index key, so array-lifted nodes
    /// keep behaving like lists.
    pub fn push_child(&mut self, incoming: Self) {
        let next = self
            .forest
            .keys()
            .filter_map(|key| key.parse::<usize>().ok())
            .map(|index| index + 1)
            .max()
            .unwrap_or(0);
        self.forest.insert(next.to_string(), incoming);
    }
}

impl KeyedTree<String, Value> {
    /// Lift an arbitrarily nested JSON document into tree form: objects and
    /// arrays become internal nodes (array indices as decimal keys), scalars
    /// become leaves, and `null` becomes a valueless node.
    pub fn from_value(incoming: &Value) -> Self {
        match incoming {
            Value::Object(entries) => {
                let mut node = Self::new();
                for (key, value) in entries {
                    node.forest.insert(key.clone(), Self::from_value(value));
                }
                node
            }
            Value::Array(items) => {
                let mut node = Self::new();
                for (index, value) in items.iter().enumerate() {
                    node.forest.insert(index.to_string(), Self::from_value(value));
                }
                node
            }
            Value::Null => Self::new(),
            scalar => Self::leaf(scalar.clone()),
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for KeyedTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.forest == other.forest
    }
}

impl<K, V> Serialize for KeyedTree<K, V>
where
    K: Serialize + Hash + Eq,
    V: Serialize,
{
    /// Serializes through the same projection as `to_flat_map`: leaves as
    /// their scalar (valueless ones as null), internal nodes as maps.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.forest.is_empty() {
            self.value.serialize(serializer)
        } else {
            serializer.collect_map(self.forest.iter())
        }
    }
}

pub struct TreeIter<'a, K, V> {
    stack: Vec<indexmap::map::Iter<'a, K, KeyedTree<K, V>>>,
}

impl<'a, K, V> Iterator for TreeIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some((key, subtree)) => {
                    let hit = subtree.value.as_ref().map(|value| (key, value));
                    self.stack.push(subtree.forest.iter());
                    if hit.is_some() {
                        return hit;
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

impl<'a, K, V> IntoIterator for &'a KeyedTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = TreeIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
