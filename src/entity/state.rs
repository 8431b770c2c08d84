use crate::attr_map::AttrMap;

/// The two attribute maps behind every entity.
///
/// `attrs` is the present state. `modify_attrs` holds the values written
/// through tracked paths since the last clear or reset; it is the diff a
/// partial update is built from. The maps are independent: clearing or
/// replacing one never touches the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrState {
    pub(crate) attrs: AttrMap,
    pub(crate) modify_attrs: AttrMap,
}

impl AttrState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from already-hydrated attributes with nothing dirty.
    pub fn with_attrs(attrs: AttrMap) -> Self {
        Self {
            attrs,
            modify_attrs: AttrMap::new(),
        }
    }

    #[inline]
    pub fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    #[inline]
    pub fn modify_attrs(&self) -> &AttrMap {
        &self.modify_attrs
    }

    /// Take both maps apart, e.g. to snapshot them before further mutation.
    pub fn into_parts(self) -> (AttrMap, AttrMap) {
        (self.attrs, self.modify_attrs)
    }
}
