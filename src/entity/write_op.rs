use super::read_op::EntityReadable;
use super::state::AttrState;
use crate::attr_map::{AttrMap, fold_key};
use crate::entity_value::EntityValue;
use crate::error::EntityError;
use tracing::{debug, trace};

/// Write side of an entity.
///
/// Three ways to store a value, differing only in validation and dirty tracking:
///
/// | method | schema check | `attrs` | `modify_attrs` |
/// |--------|--------------|---------|----------------|
/// | `set`  | enforced     | always  | always         |
/// | `init` | none         | always  | never          |
/// | `put`  | queried      | always  | known columns  |
///
/// Removal, keep, and clear only ever touch `attrs`; dirty entries survive them.
pub trait EntityWritable: EntityReadable {
    fn state_mut(&mut self) -> &mut AttrState;

    /// Live attribute map. Writes through it bypass dirty tracking, so a
    /// partial update will not see them; use [`EntityWritable::set`] instead.
    #[inline]
    fn attrs_mut(&mut self) -> &mut AttrMap {
        &mut self.state_mut().attrs
    }

    // ════════════════════════════════════════════════════════════════════════
    // Single-field writes
    // ════════════════════════════════════════════════════════════════════════

    /// Validated write. Fails with [`EntityError::UnknownField`] when the
    /// schema does not know `field`, leaving both maps untouched.
    fn set(&mut self, field: &str, value: impl Into<EntityValue>) -> Result<&mut Self, EntityError> {
        if !self.has_column(field) {
            debug!(field, "rejecting write to unknown attribute");
            return Err(EntityError::UnknownField {
                name: field.into(),
            });
        }
        let value = value.into();
        let state = self.state_mut();
        state.modify_attrs.insert(field, value.clone());
        state.attrs.insert(field, value);
        Ok(self)
    }

    /// Trusted write for hydration. No schema check, never marks dirty.
    fn init(&mut self, field: &str, value: impl Into<EntityValue>) -> &mut Self {
        self.state_mut().attrs.insert(field, value.into());
        self
    }

    /// Permissive write. Always stored; marked dirty only for known columns.
    fn put(&mut self, field: &str, value: impl Into<EntityValue>) -> &mut Self {
        let value = value.into();
        if self.has_column(field) {
            self.state_mut().modify_attrs.insert(field, value.clone());
        } else {
            trace!(field, "storing non-column attribute without dirty flag");
        }
        self.state_mut().attrs.insert(field, value);
        self
    }

    // ════════════════════════════════════════════════════════════════════════
    // Bulk writes
    // ════════════════════════════════════════════════════════════════════════

    /// `set` for every entry. Stops at the first unknown field; entries
    /// before it stay applied.
    fn set_attrs<K, V>(&mut self, attrs: impl IntoIterator<Item = (K, V)>) -> Result<&mut Self, EntityError>
    where
        K: AsRef<str>,
        V: Into<EntityValue>,
    {
        for (k, v) in attrs {
            self.set(k.as_ref(), v)?;
        }
        Ok(self)
    }

    fn set_attrs_from<E: EntityReadable>(&mut self, other: &E) -> Result<&mut Self, EntityError> {
        self.set_attrs(other.attrs())
    }

    fn init_attrs<K, V>(&mut self, attrs: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<EntityValue>,
    {
        for (k, v) in attrs {
            self.init(k.as_ref(), v);
        }
        self
    }

    fn init_attrs_from<E: EntityReadable>(&mut self, other: &E) -> &mut Self {
        self.init_attrs(other.attrs())
    }

    fn put_attrs<K, V>(&mut self, attrs: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<EntityValue>,
    {
        for (k, v) in attrs {
            self.put(k.as_ref(), v);
        }
        self
    }

    fn put_attrs_from<E: EntityReadable>(&mut self, other: &E) -> &mut Self {
        self.put_attrs(other.attrs())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Removal (attrs only)
    // ════════════════════════════════════════════════════════════════════════

    /// Drop `field` from `attrs`. A dirty entry for it stays in `modify_attrs`.
    fn remove(&mut self, field: &str) -> &mut Self {
        self.state_mut().attrs.remove(field);
        self
    }

    fn remove_all<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let attrs = &mut self.state_mut().attrs;
        for f in fields {
            attrs.remove(f.as_ref());
        }
        self
    }

    /// Drop every attribute whose value is null.
    fn remove_null(&mut self) -> &mut Self {
        self.state_mut().attrs.retain(|_, v| !v.is_null());
        self
    }

    /// Keep only the listed fields. Requested fields that are not present
    /// are skipped; an empty list clears `attrs`.
    fn keep<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let attrs = &mut self.state_mut().attrs;
        let mut kept = AttrMap::new();
        for f in fields {
            let key = fold_key(f.as_ref());
            if let Some(v) = attrs.remove(&key) {
                kept.insert(&key, v);
            }
        }
        *attrs = kept;
        self
    }

    /// Single-field [`EntityWritable::keep`].
    fn keep_one(&mut self, field: &str) -> &mut Self {
        let attrs = &mut self.state_mut().attrs;
        let kept = attrs.remove(field);
        attrs.clear();
        if let Some(v) = kept {
            attrs.insert(field, v);
        }
        self
    }

    // ════════════════════════════════════════════════════════════════════════
    // Clear / reset
    // ════════════════════════════════════════════════════════════════════════

    fn clear_attrs(&mut self) -> &mut Self {
        let attrs = &mut self.state_mut().attrs;
        trace!(dropped = attrs.len(), "clearing attrs");
        attrs.clear();
        self
    }

    fn clear_modify_attrs(&mut self) -> &mut Self {
        let modify_attrs = &mut self.state_mut().modify_attrs;
        trace!(dropped = modify_attrs.len(), "clearing modify attrs");
        modify_attrs.clear();
        self
    }

    /// Replace `attrs` wholesale. No merge, no dirty tracking.
    fn reset_attrs(&mut self, attrs: AttrMap) -> &mut Self {
        let state = self.state_mut();
        trace!(dropped = state.attrs.len(), installed = attrs.len(), "resetting attrs");
        state.attrs = attrs;
        self
    }

    /// Replace `modify_attrs` wholesale.
    fn reset_modify_attrs(&mut self, modify_attrs: AttrMap) -> &mut Self {
        let state = self.state_mut();
        trace!(
            dropped = state.modify_attrs.len(),
            installed = modify_attrs.len(),
            "resetting modify attrs"
        );
        state.modify_attrs = modify_attrs;
        self
    }
}
