//! Property tests for result ordering: every result is an ascending,
//! duplicate-free subset of the registry, equal to a naive filter.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;
use resource_query::execution::execute;
use resource_query::query::compile;
use resource_query::{bind, params, Params, Registry, Resource};

const ASSET: &str = "org.acme.Asset";

fn registry_of(entries: &BTreeMap<String, i32>, insert_order: &[usize]) -> Registry {
    let registry = Registry::new(ASSET);
    let all: Vec<(&String, &i32)> = entries.iter().collect();
    registry
        .add_all(insert_order.iter().map(|&i| {
            let (id, bucket) = all[i];
            Resource::new(ASSET, "assetId", id.clone()).with_field("bucket", *bucket)
        }))
        .unwrap();
    registry
}

fn arb_registry() -> impl Strategy<Value = (BTreeMap<String, i32>, Vec<usize>)> {
    prop::collection::btree_map("[A-Za-z0-9_]{1,8}", 0i32..4, 0..40).prop_flat_map(|entries| {
        let order: Vec<usize> = (0..entries.len()).collect();
        (Just(entries), Just(order).prop_shuffle())
    })
}

proptest! {
    /// Results are strictly ascending by identifier and match a naive filter.
    #[test]
    fn results_are_ordered_filtered_subset(
        (entries, order) in arb_registry(),
        wanted in 0i64..5,
    ) {
        let registry = registry_of(&entries, &order);
        let query = Arc::new(compile(&format!("SELECT {ASSET} WHERE (bucket == _$b)")).unwrap());
        let bound = bind(query, &params([("b", wanted)])).unwrap();
        let result = execute(&bound, &registry.snapshot()).unwrap();

        let got = result.ids();
        prop_assert!(got.windows(2).all(|w| w[0] < w[1]));

        let expected: Vec<&str> = entries
            .iter()
            .filter(|(_, bucket)| i64::from(**bucket) == wanted)
            .map(|(id, _)| id.as_str())
            .collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(result.stats.scanned as usize, entries.len());
    }

    /// Running the same bound query twice yields the same resources.
    #[test]
    fn execution_is_idempotent((entries, order) in arb_registry()) {
        let registry = registry_of(&entries, &order);
        let query = Arc::new(compile(&format!("SELECT {ASSET} WHERE (bucket >= 2)")).unwrap());
        let bound = bind(query, &Params::new()).unwrap();
        let snapshot = registry.snapshot();
        let first = execute(&bound, &snapshot).unwrap();
        let second = execute(&bound, &snapshot).unwrap();
        prop_assert_eq!(first.resources, second.resources);
    }
}
