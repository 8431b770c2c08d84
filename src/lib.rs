//! Schema-gated, dynamically typed attribute container for record objects.
//!
//! An entity keeps two case-insensitive maps: the current attribute values
//! and the subset modified since the last checkpoint. Writes go through
//! [`EntityWritable`], whose `set`/`init`/`put` differ in how they consult the
//! entity's [`SchemaGate`] and whether they mark the field dirty. Reads go
//! through [`EntityReadable`], with a JSON round trip as the coercion
//! fallback for typed access.
//!
//! ```
//! use entity_attrs::{ColumnType, EntityReadable, EntityWritable, Record, TableSchema};
//!
//! let schema = TableSchema::new("user")
//!     .with_column("id", ColumnType::Integer)
//!     .with_column("name", ColumnType::Text);
//! let mut user = Record::new(&schema);
//!
//! user.set("Name", "Alice").unwrap();
//! user.put("age", 5i64);
//!
//! assert_eq!(user.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! assert_eq!(user.modify_attr_names(), vec!["name"]);
//! assert!(user.set("age", 6i64).is_err());
//! ```

pub mod attr_map;
pub mod entity;
pub mod entity_value;
pub mod error;
pub mod schema;
pub mod serialization;
pub mod types;

pub use attr_map::AttrMap;
pub use entity::{AttrState, EntityReadable, EntityWritable, Record};
pub use entity_value::{EntityNumber, EntityValue, ObjectMap};
pub use error::EntityError;
pub use schema::{ColumnType, SchemaGate, TableSchema};
pub use serialization::CoerceResult;
pub use types::{AttrKey, FastMap};
