use entity_attrs::{
    AttrMap, ColumnType, EntityReadable, EntityValue, EntityWritable, Record, TableSchema,
};
use proptest::prelude::*;

const COLUMNS: [&str; 3] = ["id", "name", "email"];
const FIELDS: [&str; 6] = ["id", "name", "email", "age", "note", "rank"];

fn schema() -> TableSchema {
    TableSchema::new("user")
        .with_column("id", ColumnType::Integer)
        .with_column("name", ColumnType::Text)
        .with_column("email", ColumnType::Text)
}

/// Randomly re-case an ASCII field name.
fn recase(field: &str, mask: u32) -> String {
    field
        .chars()
        .enumerate()
        .map(|(i, c)| if mask & (1 << (i % 32)) != 0 { c.to_ascii_uppercase() } else { c })
        .collect()
}

fn json_value() -> impl Strategy<Value = EntityValue> {
    let leaf = prop_oneof![
        Just(EntityValue::Null),
        any::<bool>().prop_map(EntityValue::from),
        any::<i64>().prop_map(EntityValue::from),
        // quarter steps print and parse back exactly
        (-1_000_000i32..1_000_000).prop_map(|n| EntityValue::from(n as f64 / 4.0)),
        "[a-z ]{0,12}".prop_map(EntityValue::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(EntityValue::Array),
            proptest::collection::btree_map("[a-z]{1,4}", inner, 0..4).prop_map(|m| {
                EntityValue::Object(m.into_iter().map(|(k, v)| (k.into(), v)).collect())
            }),
        ]
    })
}

// Model the three write paths against plain maps and check both maps after every step.
proptest! {
    #[test]
    fn prop_dirty_tracking_matches_model(
        ops in proptest::collection::vec((0u8..=5u8, 0usize..FIELDS.len(), any::<u32>(), any::<i64>()), 1..80)
    ) {
        let schema = schema();
        let mut r = Record::new(&schema);
        let mut attrs = AttrMap::new();
        let mut dirty = AttrMap::new();

        for (op, idx, mask, n) in ops {
            let field = recase(FIELDS[idx], mask);
            let known = COLUMNS.contains(&FIELDS[idx]);
            let value = EntityValue::from(n);
            match op {
                0 => {
                    let res = r.set(&field, value.clone());
                    prop_assert_eq!(res.is_ok(), known);
                    if known {
                        attrs.insert(&field, value.clone());
                        dirty.insert(&field, value);
                    }
                }
                1 => {
                    r.init(&field, value.clone());
                    attrs.insert(&field, value);
                }
                2 => {
                    r.put(&field, value.clone());
                    if known {
                        dirty.insert(&field, value.clone());
                    }
                    attrs.insert(&field, value);
                }
                3 => {
                    r.remove(&field);
                    attrs.remove(&field);
                }
                4 => {
                    r.keep([field.as_str()]);
                    let kept = attrs.remove(&field);
                    attrs.clear();
                    if let Some(v) = kept {
                        attrs.insert(&field, v);
                    }
                }
                5 => {
                    r.clear_modify_attrs();
                    dirty.clear();
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(r.attrs(), &attrs);
            prop_assert_eq!(r.modify_attrs(), &dirty);
            for name in r.modify_attr_names() {
                prop_assert!(COLUMNS.contains(&name.as_str()));
            }
        }
    }

    #[test]
    fn prop_case_insensitive_addressing(idx in 0usize..COLUMNS.len(), a in any::<u32>(), b in any::<u32>(), n in any::<i64>()) {
        let schema = schema();
        let mut r = Record::new(&schema);
        let written = recase(COLUMNS[idx], a);
        let read = recase(COLUMNS[idx], b);

        r.set(&written, n).unwrap();
        prop_assert_eq!(r.get(&read), Some(&EntityValue::from(n)));
        prop_assert_eq!(r.get_as::<i64>(&read).unwrap(), Some(n));
        prop_assert_eq!(r.attrs().len(), 1);
    }

    #[test]
    fn prop_json_round_trip(entries in proptest::collection::btree_map("[a-zA-Z_]{1,8}", json_value(), 0..8)) {
        let schema = schema();
        let mut r = Record::new(&schema);
        r.put_attrs(entries);

        let back = Record::from_json(&schema, &r.to_json()).unwrap();
        prop_assert_eq!(back.attrs(), r.attrs());
        prop_assert!(back.modify_attrs().is_empty());
    }
}
