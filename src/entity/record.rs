use super::read_op::EntityReadable;
use super::state::AttrState;
use super::write_op::EntityWritable;
use crate::error::EntityError;
use crate::schema::{ColumnType, SchemaGate};
use crate::serialization;
use serde::ser::{Serialize, Serializer};
use std::fmt;

// ─── Record ─────────────────────────────────────────────────────────────────

/// Entity whose column metadata comes from a schema value.
///
/// `S` is any [`SchemaGate`]: a [`crate::TableSchema`], a reference or
/// `Arc` to one shared between many records, or a hand-written gate.
#[derive(Debug, Clone)]
pub struct Record<S> {
    schema: S,
    state: AttrState,
}

impl<S: SchemaGate> Record<S> {
    pub fn new(schema: S) -> Self {
        Self {
            schema,
            state: AttrState::new(),
        }
    }

    /// Hydrate from a JSON object through `init`, so nothing is marked dirty.
    pub fn from_json(schema: S, json: &str) -> Result<Self, EntityError> {
        let attrs = serialization::attrs_from_json(json)?;
        Ok(Self {
            schema,
            state: AttrState::with_attrs(attrs),
        })
    }

    #[inline]
    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn into_state(self) -> AttrState {
        self.state
    }
}

impl<S: SchemaGate> SchemaGate for Record<S> {
    #[inline]
    fn has_column(&self, name: &str) -> bool {
        self.schema.has_column(name)
    }

    #[inline]
    fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.schema.column_type(name)
    }

    #[inline]
    fn check_method(&self) -> bool {
        self.schema.check_method()
    }
}

impl<S: SchemaGate> EntityReadable for Record<S> {
    #[inline]
    fn state(&self) -> &AttrState {
        &self.state
    }
}

impl<S: SchemaGate> EntityWritable for Record<S> {
    #[inline]
    fn state_mut(&mut self) -> &mut AttrState {
        &mut self.state
    }
}

impl<S: SchemaGate> fmt::Display for Record<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

/// Serializes the current attributes only, same shape as `to_json`.
impl<S> Serialize for Record<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.state.attrs.serialize(serializer)
    }
}
