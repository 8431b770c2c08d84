use crate::attr_map::AttrMap;
use crate::entity_value::{EntityNumber, EntityValue};
use serde::de::DeserializeOwned;
use std::any::{Any, type_name};
use tracing::trace;

/// Coercion errors are the JSON codec's own; nothing here wraps them.
pub type CoerceResult<T> = Result<T, serde_json::Error>;

// ─── Rendering ──────────────────────────────────────────────────────────────

fn to_json_value(attrs: &AttrMap) -> serde_json::Value {
    serde_json::Value::Object(
        attrs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(v.clone())))
            .collect(),
    )
}

/// Render an attribute map as a compact JSON object. Non-finite floats
/// become `null`, so rendering never fails.
pub fn to_json(attrs: &AttrMap) -> String {
    to_json_value(attrs).to_string()
}

pub fn to_json_pretty(attrs: &AttrMap) -> String {
    let value = to_json_value(attrs);
    // Pretty printing a `Value` only fails on writer errors, and a String writer has none.
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

/// Decode a JSON object into an attribute map. Keys are case folded.
pub fn attrs_from_json(json: &str) -> CoerceResult<AttrMap> {
    serde_json::from_str(json)
}

// ─── Coercion ───────────────────────────────────────────────────────────────

/// Direct step: hand the value out as-is when `T` is the stored runtime type.
///
/// Matches either the whole [`EntityValue`] or its payload (`SmolStr`,
/// `i64`, `u64`, `f64`, `bool`, `Vec<EntityValue>`,
/// `ObjectMap`). Anything else goes through the JSON round trip.
fn direct_cast<T: Any + Clone>(value: &EntityValue) -> Option<T> {
    let whole: &dyn Any = value;
    if let Some(v) = whole.downcast_ref::<T>() {
        return Some(v.clone());
    }
    let payload: &dyn Any = match value {
        EntityValue::Null => return None,
        EntityValue::Bool(b) => b,
        EntityValue::Number(EntityNumber::I64(i)) => i,
        EntityValue::Number(EntityNumber::U64(u)) => u,
        EntityValue::Number(EntityNumber::F64(f)) => f,
        EntityValue::Str(s) => s,
        EntityValue::Array(arr) => arr,
        EntityValue::Object(map) => map,
    };
    payload.downcast_ref::<T>().cloned()
}

/// Convert a stored value to `T`.
///
/// Two steps: a direct type check, then a round trip through the JSON
/// delegate (`EntityValue` → JSON → `T`). The converted value is not cached.
pub fn coerce<T>(value: &EntityValue) -> CoerceResult<T>
where
    T: DeserializeOwned + Any + Clone,
{
    if let Some(direct) = direct_cast::<T>(value) {
        return Ok(direct);
    }
    trace!(from = value.kind(), to = type_name::<T>(), "coercing through json");
    let json = serde_json::to_value(value)?;
    serde_json::from_value(json)
}
