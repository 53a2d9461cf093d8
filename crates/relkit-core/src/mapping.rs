//! Value-wise transforms that keep every key.

use std::collections::BTreeMap;

/// Apply `f` to every value of `map`, keeping each key exactly once.
///
/// `f` should be a pure function of its argument; the output is only
/// deterministic when it is.
pub fn map_values<K, V, W>(map: &BTreeMap<K, V>, f: impl Fn(&V) -> W) -> BTreeMap<K, W>
where
    K: Ord + Clone,
{
    map.iter().map(|(key, value)| (key.clone(), f(value))).collect()
}

/// Apply `f` to every value of a pair stream and collect into any container.
///
/// Input order is kept when the target container keeps insertion order
/// (`Vec<(K, W)>`, `serde_json::Map` with `preserve_order`).
pub fn collect_mapped<I, K, V, W, C>(map: I, f: impl Fn(V) -> W) -> C
where
    I: IntoIterator<Item = (K, V)>,
    C: FromIterator<(K, W)>,
{
    map.into_iter().map(|(key, value)| (key, f(value))).collect()
}
