use indexmap::IndexMap;

/// Projection of a `KeyedTree` back into nested associative form.
///
/// Leaves carry their scalar (or nothing, for valueless nodes); internal
/// nodes become nested maps. See `KeyedTree::to_flat_map` for the lossy
/// corner of this projection.
#[derive(Debug, Clone)]
pub enum NestedValue<K, V> {
    Scalar(Option<V>),
    Nested(IndexMap<K, NestedValue<K, V>>),
}

impl<K, V> NestedValue<K, V> {
    pub fn as_scalar(&self) -> Option<&V> {
        match self {
            NestedValue::Scalar(value) => value.as_ref(),
            NestedValue::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&IndexMap<K, NestedValue<K, V>>> {
        match self {
            NestedValue::Scalar(_) => None,
            NestedValue::Nested(entries) => Some(entries),
        }
    }
}

impl<K: std::hash::Hash + Eq, V: PartialEq> PartialEq for NestedValue<K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NestedValue::Scalar(a), NestedValue::Scalar(b)) => a == b,
            (NestedValue::Nested(a), NestedValue::Nested(b)) => a == b,
            _ => false,
        }
    }
}
