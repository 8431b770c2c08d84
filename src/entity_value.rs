use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;

/// Nested objects keep their keys verbatim; only top-level attribute names are case folded.
pub type ObjectMap = BTreeMap<SmolStr, EntityValue>;

// ─── EntityNumber ───────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
pub enum EntityNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl fmt::Debug for EntityNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityNumber::I64(i) => write!(f, "I64({})", i),
            EntityNumber::U64(u) => write!(f, "U64({})", u),
            EntityNumber::F64(v) => write!(f, "F64({})", v),
        }
    }
}

/// Integers compare by value across the signed/unsigned split, so a `U64(5)`
/// that comes back from JSON as `I64(5)` is still the same number.
impl PartialEq for EntityNumber {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (EntityNumber::I64(a), EntityNumber::I64(b)) => a == b,
            (EntityNumber::U64(a), EntityNumber::U64(b)) => a == b,
            (EntityNumber::I64(a), EntityNumber::U64(b))
            | (EntityNumber::U64(b), EntityNumber::I64(a)) => u64::try_from(a) == Ok(b),
            (EntityNumber::F64(a), EntityNumber::F64(b)) => a == b,
            _ => false,
        }
    }
}

impl EntityNumber {
    /// Integral view of the number. Floats qualify only when they have no
    /// fractional part and fit the `i64` range.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            EntityNumber::I64(i) => Some(i),
            EntityNumber::U64(u) => i64::try_from(u).ok(),
            EntityNumber::F64(f) => {
                let in_range = (i64::MIN as f64..i64::MAX as f64).contains(&f);
                (in_range && f.fract() == 0.0).then_some(f as i64)
            }
        }
    }
}

// ─── EntityValue ────────────────────────────────────────────────────────────

/// A single attribute value. Mirrors the JSON value model so every value
/// survives a trip through the serialization delegate.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EntityValue {
    #[default]
    Null,
    Bool(bool),
    Number(EntityNumber),
    Str(SmolStr),
    Array(Vec<EntityValue>),
    Object(ObjectMap),
}

impl EntityValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EntityValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            EntityValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            EntityValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<EntityValue>> {
        match self {
            EntityValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Look up a key of a nested object value. Case sensitive.
    pub fn get(&self, key: &str) -> Option<&EntityValue> {
        self.as_object()?.get(key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, EntityValue::Null)
    }

    /// Short kind name, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            EntityValue::Null => "null",
            EntityValue::Bool(_) => "bool",
            EntityValue::Number(_) => "number",
            EntityValue::Str(_) => "string",
            EntityValue::Array(_) => "array",
            EntityValue::Object(_) => "object",
        }
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for EntityValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntityValue::Null => serializer.serialize_none(),
            EntityValue::Bool(b) => serializer.serialize_bool(*b),
            EntityValue::Number(n) => match n {
                EntityNumber::I64(i) => serializer.serialize_i64(*i),
                EntityNumber::U64(u) => serializer.serialize_u64(*u),
                EntityNumber::F64(f) => serializer.serialize_f64(*f),
            },
            EntityValue::Str(s) => serializer.serialize_str(s.as_str()),
            EntityValue::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            EntityValue::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
        }
    }
}

// ─── Deserialize ────────────────────────────────────────────────────────────

struct EntityValueVisitor;

impl<'de> Visitor<'de> for EntityValueVisitor {
    type Value = EntityValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON-compatible value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<EntityValue, E> {
        Ok(EntityValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<EntityValue, E> {
        Ok(EntityValue::Number(EntityNumber::I64(v)))
    }

    // Prefer I64 whenever the value fits, same as the serde_json conversion.
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<EntityValue, E> {
        Ok(match i64::try_from(v) {
            Ok(i) => EntityValue::Number(EntityNumber::I64(i)),
            Err(_) => EntityValue::Number(EntityNumber::U64(v)),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<EntityValue, E> {
        Ok(EntityValue::Number(EntityNumber::F64(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<EntityValue, E> {
        Ok(EntityValue::Str(SmolStr::from(v)))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<EntityValue, E> {
        Ok(EntityValue::Str(SmolStr::from(v)))
    }

    fn visit_none<E: de::Error>(self) -> Result<EntityValue, E> {
        Ok(EntityValue::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<EntityValue, E> {
        Ok(EntityValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<EntityValue, D::Error> {
        Deserialize::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<EntityValue, A::Error> {
        let mut arr = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(v) = seq.next_element()? {
            arr.push(v);
        }
        Ok(EntityValue::Array(arr))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<EntityValue, A::Error> {
        let mut map = ObjectMap::new();
        while let Some((k, v)) = access.next_entry::<SmolStr, EntityValue>()? {
            map.insert(k, v);
        }
        Ok(EntityValue::Object(map))
    }
}

impl<'de> Deserialize<'de> for EntityValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntityValueVisitor)
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for EntityValue {
    fn from(n: f64) -> Self {
        EntityValue::Number(EntityNumber::F64(n))
    }
}

impl From<f32> for EntityValue {
    fn from(n: f32) -> Self {
        EntityValue::Number(EntityNumber::F64(n as f64))
    }
}

impl From<i64> for EntityValue {
    fn from(n: i64) -> Self {
        EntityValue::Number(EntityNumber::I64(n))
    }
}

impl From<i32> for EntityValue {
    fn from(n: i32) -> Self {
        EntityValue::Number(EntityNumber::I64(n as i64))
    }
}

impl From<u64> for EntityValue {
    fn from(n: u64) -> Self {
        EntityValue::Number(EntityNumber::U64(n))
    }
}

impl From<u32> for EntityValue {
    fn from(n: u32) -> Self {
        EntityValue::Number(EntityNumber::U64(n as u64))
    }
}

impl From<bool> for EntityValue {
    fn from(b: bool) -> Self {
        EntityValue::Bool(b)
    }
}

impl From<&str> for EntityValue {
    fn from(s: &str) -> Self {
        EntityValue::Str(SmolStr::from(s))
    }
}

impl From<String> for EntityValue {
    fn from(s: String) -> Self {
        EntityValue::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for EntityValue {
    fn from(s: SmolStr) -> Self {
        EntityValue::Str(s)
    }
}

impl<T: Into<EntityValue>> From<Option<T>> for EntityValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(EntityValue::Null, Into::into)
    }
}

impl<T: Into<EntityValue>> From<Vec<T>> for EntityValue {
    fn from(v: Vec<T>) -> Self {
        EntityValue::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<&EntityValue> for EntityValue {
    fn from(v: &EntityValue) -> Self {
        v.clone()
    }
}

impl From<ObjectMap> for EntityValue {
    fn from(map: ObjectMap) -> Self {
        EntityValue::Object(map)
    }
}

// ─── From/Into serde_json::Value ────────────────────────────────────────────

impl From<serde_json::Value> for EntityValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => EntityValue::Null,
            serde_json::Value::Bool(b) => EntityValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    EntityValue::Number(EntityNumber::I64(i))
                } else if let Some(u) = n.as_u64() {
                    EntityValue::Number(EntityNumber::U64(u))
                } else {
                    EntityValue::Number(EntityNumber::F64(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => EntityValue::Str(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                EntityValue::Array(arr.into_iter().map(EntityValue::from).collect())
            }
            serde_json::Value::Object(obj) => EntityValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), EntityValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<EntityValue> for serde_json::Value {
    fn from(val: EntityValue) -> Self {
        match val {
            EntityValue::Null => serde_json::Value::Null,
            EntityValue::Bool(b) => serde_json::Value::Bool(b),
            EntityValue::Number(n) => match n {
                EntityNumber::I64(i) => serde_json::json!(i),
                EntityNumber::U64(u) => serde_json::json!(u),
                EntityNumber::F64(f) => serde_json::json!(f),
            },
            EntityValue::Str(s) => serde_json::Value::String(s.to_string()),
            EntityValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(|v| v.into()).collect())
            }
            EntityValue::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_compare_across_sign_split() {
        assert_eq!(EntityNumber::I64(5), EntityNumber::U64(5));
        assert_ne!(EntityNumber::I64(-1), EntityNumber::U64(u64::MAX));
        assert_ne!(EntityNumber::I64(1), EntityNumber::F64(1.0));
    }

    #[test]
    fn integral_view_of_stored_numbers() {
        assert_eq!(EntityValue::from(7i64).as_i64(), Some(7));
        assert_eq!(EntityValue::from(7u64).as_i64(), Some(7));
        assert_eq!(EntityValue::from(u64::MAX).as_i64(), None);
        assert_eq!(EntityValue::from(12.0f64).as_i64(), Some(12));
        assert_eq!(EntityValue::from(12.5f64).as_i64(), None);
        assert_eq!(EntityValue::from(f64::INFINITY).as_i64(), None);
        assert_eq!(EntityValue::from("12").as_i64(), None);
    }

    #[test]
    fn json_integers_prefer_i64() {
        let v: EntityValue = serde_json::from_str("42").unwrap();
        assert!(matches!(v, EntityValue::Number(EntityNumber::I64(42))));

        let big: EntityValue = serde_json::from_str("18446744073709551615").unwrap();
        assert!(matches!(big, EntityValue::Number(EntityNumber::U64(u64::MAX))));
    }

    #[test]
    fn nested_value_from_json() {
        let v: EntityValue =
            serde_json::from_str(r#"{"Profile":{"bio":"dev"},"tags":["a",1,null]}"#).unwrap();
        assert_eq!(v.get("Profile").and_then(|p| p.get("bio")), Some(&EntityValue::from("dev")));
        assert!(v.get("profile").is_none());
        let tags = v.get("tags").and_then(EntityValue::as_array).unwrap();
        assert_eq!(tags.len(), 3);
        assert!(tags[2].is_null());
    }

    #[test]
    fn option_and_vec_conversions() {
        assert_eq!(EntityValue::from(None::<i64>), EntityValue::Null);
        assert_eq!(EntityValue::from(Some("x")), EntityValue::from("x"));
        assert_eq!(
            EntityValue::from(vec![1i64, 2]),
            EntityValue::Array(vec![EntityValue::from(1i64), EntityValue::from(2i64)])
        );
    }

    #[test]
    fn serde_json_value_conversion_is_lossless() {
        let json = serde_json::json!({"a": [1, 2.5, "x", true, null], "b": {"c": -3}});
        let v = EntityValue::from(json.clone());
        assert_eq!(serde_json::Value::from(v), json);
    }
}
