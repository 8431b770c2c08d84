use crate::attr_map::fold_key;
use crate::error::EntityError;
use crate::types::{AttrKey, FastMap};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

// ─── ColumnType ─────────────────────────────────────────────────────────────

/// Declared type of a column, as reported by a [`SchemaGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Bool,
    Integer,
    Unsigned,
    Float,
    Text,
    Timestamp,
    Array,
    Object,
    /// Untyped column (e.g. a JSON blob).
    Any,
}

// ─── SchemaGate ─────────────────────────────────────────────────────────────

/// Column metadata for one record type.
///
/// Implementations must answer case-insensitively: `has_column("NAME")` and
/// `has_column("name")` agree. Answers are never cached by the entity layer.
pub trait SchemaGate {
    /// True iff `name` is a column of the backing schema.
    fn has_column(&self, name: &str) -> bool;

    /// Declared type of a known column. `None` for unknown names; check
    /// [`SchemaGate::has_column`] first.
    fn column_type(&self, name: &str) -> Option<ColumnType>;

    /// Whether external serializers should also emit accessor-derived fields.
    #[inline]
    fn check_method(&self) -> bool {
        false
    }
}

impl<G: SchemaGate + ?Sized> SchemaGate for &G {
    #[inline]
    fn has_column(&self, name: &str) -> bool {
        (**self).has_column(name)
    }

    #[inline]
    fn column_type(&self, name: &str) -> Option<ColumnType> {
        (**self).column_type(name)
    }

    #[inline]
    fn check_method(&self) -> bool {
        (**self).check_method()
    }
}

impl<G: SchemaGate + ?Sized> SchemaGate for std::sync::Arc<G> {
    #[inline]
    fn has_column(&self, name: &str) -> bool {
        (**self).has_column(name)
    }

    #[inline]
    fn column_type(&self, name: &str) -> Option<ColumnType> {
        (**self).column_type(name)
    }

    #[inline]
    fn check_method(&self) -> bool {
        (**self).check_method()
    }
}

// ─── TableSchema ────────────────────────────────────────────────────────────

/// In-memory column table. Loadable from JSON:
///
/// ```json
/// { "name": "user", "columns": { "id": "integer", "name": "text" } }
/// ```
///
/// Column names are folded on insert, so lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: SmolStr,
    #[serde(deserialize_with = "deserialize_columns")]
    columns: FastMap<AttrKey, ColumnType>,
    /// Value returned by [`SchemaGate::check_method`].
    #[serde(default)]
    pub check_method: bool,
}

fn deserialize_columns<'de, D>(deserializer: D) -> Result<FastMap<AttrKey, ColumnType>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = FastMap::<SmolStr, ColumnType>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, t)| (fold_key(&k), t)).collect())
}

impl TableSchema {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style column registration.
    pub fn with_column(mut self, name: &str, column_type: ColumnType) -> Self {
        self.add_column(name, column_type);
        self
    }

    pub fn add_column(&mut self, name: &str, column_type: ColumnType) -> Option<ColumnType> {
        self.columns.insert(fold_key(name), column_type)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&AttrKey, ColumnType)> + '_ {
        self.columns.iter().map(|(k, t)| (k, *t))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, EntityError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl SchemaGate for TableSchema {
    #[inline]
    fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(&fold_key(name))
    }

    #[inline]
    fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(&fold_key(name)).copied()
    }

    #[inline]
    fn check_method(&self) -> bool {
        self.check_method
    }
}
