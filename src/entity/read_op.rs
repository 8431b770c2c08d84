use super::state::AttrState;
use crate::attr_map::AttrMap;
use crate::entity_value::EntityValue;
use crate::schema::SchemaGate;
use crate::serialization::{self, CoerceResult};
use crate::types::AttrKey;
use serde::de::DeserializeOwned;
use std::any::Any;

/// Read side of an entity. Implementors only provide [`EntityReadable::state`];
/// every accessor is derived from it.
pub trait EntityReadable: SchemaGate {
    fn state(&self) -> &AttrState;

    // ════════════════════════════════════════════════════════════════════════
    // Maps
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    fn attrs(&self) -> &AttrMap {
        &self.state().attrs
    }

    /// Fields written through `set`/`put` on a known column since the last clear.
    #[inline]
    fn modify_attrs(&self) -> &AttrMap {
        &self.state().modify_attrs
    }

    // ════════════════════════════════════════════════════════════════════════
    // Raw access
    // ════════════════════════════════════════════════════════════════════════

    /// Raw lookup. A stored `Null` comes back as `Some(&EntityValue::Null)`.
    #[inline]
    fn get(&self, field: &str) -> Option<&EntityValue> {
        self.attrs().get(field)
    }

    /// Raw lookup, falling back to `default` when the field is absent or null.
    fn get_or(&self, field: &str, default: impl Into<EntityValue>) -> EntityValue {
        match self.get(field) {
            Some(v) if !v.is_null() => v.clone(),
            _ => default.into(),
        }
    }

    #[inline]
    fn has_attr(&self, field: &str) -> bool {
        self.attrs().contains_key(field)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Coerced access
    // ════════════════════════════════════════════════════════════════════════

    /// Lookup converted to `T`, see [`serialization::coerce`].
    ///
    /// Absent and null fields give `Ok(None)`, even when `T` could hold a
    /// null: `get_as::<EntityValue>` on a stored null is `Ok(None)`, not
    /// `Ok(Some(EntityValue::Null))`. Use [`EntityReadable::get`] to tell a
    /// stored null from a missing field. Conversion failures are the JSON
    /// codec's errors, passed through untouched.
    fn get_as<T>(&self, field: &str) -> CoerceResult<Option<T>>
    where
        T: DeserializeOwned + Any + Clone,
    {
        match self.get(field) {
            None | Some(EntityValue::Null) => Ok(None),
            Some(v) => serialization::coerce(v).map(Some),
        }
    }

    /// Coerced lookup, falling back to `default` when the result is empty.
    fn get_as_or<T>(&self, field: &str, default: T) -> CoerceResult<T>
    where
        T: DeserializeOwned + Any + Clone,
    {
        Ok(self.get_as(field)?.unwrap_or(default))
    }

    // ════════════════════════════════════════════════════════════════════════
    // Snapshots
    // ════════════════════════════════════════════════════════════════════════

    fn attr_names(&self) -> Vec<AttrKey> {
        self.attrs().keys().cloned().collect()
    }

    fn attr_values(&self) -> Vec<EntityValue> {
        self.attrs().values().cloned().collect()
    }

    fn modify_attr_names(&self) -> Vec<AttrKey> {
        self.modify_attrs().keys().cloned().collect()
    }

    fn modify_attr_values(&self) -> Vec<EntityValue> {
        self.modify_attrs().values().cloned().collect()
    }

    // ════════════════════════════════════════════════════════════════════════
    // JSON
    // ════════════════════════════════════════════════════════════════════════

    /// Current attributes as a JSON object. Dirty state is not included.
    fn to_json(&self) -> String {
        serialization::to_json(self.attrs())
    }

    fn to_json_pretty(&self) -> String {
        serialization::to_json_pretty(self.attrs())
    }
}
