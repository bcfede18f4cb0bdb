use blend_core::{BlendOptions, Record, Value, blend_defaults};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::vec(("[a-e]", inner), 0..5)
                .prop_map(|entries| Value::Record(entries.into_iter().collect())),
        ]
    })
}

fn record() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-f]", tree()), 0..6)
        .prop_map(|entries| Value::Record(entries.into_iter().collect::<Record>()))
}

fn keys(value: &Value) -> BTreeSet<String> {
    value
        .as_record()
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn test_default_strategies_keep_every_key(defaults in record(), overrides in record()) {
        let merged = blend_defaults(&defaults, &overrides, &BlendOptions::new()).unwrap();

        let expected: BTreeSet<String> = keys(&defaults).union(&keys(&overrides)).cloned().collect();
        prop_assert_eq!(keys(&merged), expected);
    }

    #[test]
    fn test_blending_a_tree_with_itself_is_identity(tree in record()) {
        let merged = blend_defaults(&tree, &tree, &BlendOptions::new()).unwrap();
        prop_assert_eq!(merged, tree);
    }

    #[test]
    fn test_empty_override_returns_defaults(defaults in record()) {
        let empty = Value::Record(Record::new());
        let merged = blend_defaults(&defaults, &empty, &BlendOptions::new()).unwrap();
        prop_assert_eq!(merged, defaults);
    }
}
