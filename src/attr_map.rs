use crate::entity_value::{EntityValue, ObjectMap};
use crate::types::{AttrKey, FastMap};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

// ─── Key folding ────────────────────────────────────────────────────────────

/// Fold an attribute name to its canonical (lowercase) form.
///
/// Non-ASCII names always go through `to_lowercase`: titlecase letters such
/// as `ǅ` are not `is_uppercase` but still change when lowered.
#[inline]
pub fn fold_key(key: &str) -> AttrKey {
    if key.is_ascii() && !key.bytes().any(|b| b.is_ascii_uppercase()) {
        AttrKey::new(key)
    } else {
        AttrKey::from(key.to_lowercase())
    }
}

// ─── AttrMap ────────────────────────────────────────────────────────────────

/// Attribute store with case-insensitive keys.
///
/// Every key argument is folded with [`fold_key`] before it touches the
/// backing map, and the folded form is what gets stored. `"Name"`, `"NAME"`
/// and `"name"` all address the same slot. Iteration order is the hash
/// order of the backing map and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrMap {
    inner: FastMap<AttrKey, EntityValue>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: FastMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&EntityValue> {
        self.inner.get(&fold_key(key))
    }

    /// Insert a value, returning the one previously stored under the folded key.
    #[inline]
    pub fn insert(&mut self, key: &str, value: EntityValue) -> Option<EntityValue> {
        self.inner.insert(fold_key(key), value)
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<EntityValue> {
        self.inner.remove(&fold_key(key))
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(&fold_key(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &AttrKey> + '_ {
        self.inner.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &EntityValue> + '_ {
        self.inner.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &EntityValue)> + '_ {
        self.inner.iter()
    }

    pub fn retain(&mut self, f: impl FnMut(&AttrKey, &mut EntityValue) -> bool) {
        self.inner.retain(f);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

// ─── Iteration / collection ─────────────────────────────────────────────────

impl<'a> IntoIterator for &'a AttrMap {
    type Item = (&'a AttrKey, &'a EntityValue);
    type IntoIter = std::collections::hash_map::Iter<'a, AttrKey, EntityValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl IntoIterator for AttrMap {
    type Item = (AttrKey, EntityValue);
    type IntoIter = std::collections::hash_map::IntoIter<AttrKey, EntityValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<K: AsRef<str>, V: Into<EntityValue>> Extend<(K, V)> for AttrMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k.as_ref(), v.into());
        }
    }
}

impl<K: AsRef<str>, V: Into<EntityValue>> FromIterator<(K, V)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = AttrMap::new();
        map.extend(iter);
        map
    }
}

impl From<AttrMap> for EntityValue {
    fn from(map: AttrMap) -> Self {
        EntityValue::Object(map.into_iter().collect::<ObjectMap>())
    }
}

// ─── Serde ──────────────────────────────────────────────────────────────────

impl Serialize for AttrMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.inner.len()))?;
        for (k, v) in &self.inner {
            m.serialize_entry(k.as_str(), v)?;
        }
        m.end()
    }
}

struct AttrMapVisitor;

impl<'de> Visitor<'de> for AttrMapVisitor {
    type Value = AttrMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of attributes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<AttrMap, A::Error> {
        let mut map = AttrMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry::<AttrKey, EntityValue>()? {
            map.insert(&k, v);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for AttrMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttrMapVisitor)
    }
}

/// Build an [`AttrMap`] from `key => value` pairs.
///
/// ```
/// use entity_attrs::attrs;
/// let map = attrs! { "Id" => 1i64, "name" => "Alice" };
/// assert!(map.contains_key("id"));
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::attr_map::AttrMap::new()
    };
    ($($key:expr => $val:expr),+ $(,)?) => {{
        let mut map = $crate::attr_map::AttrMap::new();
        $(
            map.insert($key, $crate::entity_value::EntityValue::from($val));
        )+
        map
    }};
}
