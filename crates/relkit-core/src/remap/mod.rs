//! Relation remapping over mappings, nested mappings and sets.
//!
//! Every input shape handled here is a view of the same relation: a stream
//! of `(outer, inner, value)` facts. The four remaps differ only in which
//! axis becomes the grouping key:
//!
//! | remap                  | input                 | grouped by        | items        |
//! |------------------------|-----------------------|-------------------|--------------|
//! | [`to_set`]             | sequence              | element           | `1`          |
//! | [`invert`]             | `key -> value`        | value             | key          |
//! | [`pivot_nested`]       | `a -> b -> c`         | `c`, then `b`     | `a`          |
//! | [`group_by_inner_key`] | `a -> b -> c`         | `b`               | `(a, c)`     |
//!
//! Inputs are borrowed and never modified. Grouped sequences keep the
//! relative order in which their facts were read from the input, so callers
//! that care about order can pass an ordered `Vec` of pairs instead of a
//! sorted [`Mapping`].

pub mod json;

use std::collections::BTreeMap;

use crate::error::ErrorCode;
use crate::mapping::map_values;

/// Key → value mapping with string keys.
pub type Mapping<V> = BTreeMap<String, V>;

/// Two-level mapping: outer key → inner key → value.
pub type NestedMapping<V> = Mapping<Mapping<V>>;

/// Derived key → ordered sequence of items, in input order.
pub type GroupedList<T> = Mapping<Vec<T>>;

/// Errors from remapping dynamically-shaped input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemapError {
    /// The input (or a value nested in it) is not the shape the remap reads.
    #[error("E1001: invalid shape at {path}: expected {expected}, found {found}")]
    InvalidShape {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl RemapError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidShape { .. } => ErrorCode::InvalidShape,
        }
    }
}

// ---------------------------------------------------------------------------
// Triple stream
// ---------------------------------------------------------------------------

/// One fact of a relation.
///
/// Flat mappings carry no middle key (`B = ()`); sets carry neither a middle
/// key nor a value (`B = C = ()`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple<A, B, C> {
    pub outer: A,
    pub inner: B,
    pub value: C,
}

/// Read a sequence of set elements as triples.
pub fn set_triples<I, S>(sequence: I) -> impl Iterator<Item = Triple<String, (), ()>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sequence.into_iter().map(|element| Triple {
        outer: element.as_ref().to_owned(),
        inner: (),
        value: (),
    })
}

/// Read `key -> value` pairs as triples.
pub fn flat_triples<I, K, V>(map: I) -> impl Iterator<Item = Triple<String, (), String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    map.into_iter().map(|(key, value)| Triple {
        outer: key.as_ref().to_owned(),
        inner: (),
        value: value.as_ref().to_owned(),
    })
}

/// Read `outer -> inner -> value` entries as triples, outer-major.
pub fn nested_triples<I, K, M, J, V>(map: I) -> impl Iterator<Item = Triple<String, String, String>>
where
    I: IntoIterator<Item = (K, M)>,
    K: AsRef<str>,
    M: IntoIterator<Item = (J, V)>,
    J: AsRef<str>,
    V: AsRef<str>,
{
    map.into_iter().flat_map(|(outer, inner_map)| {
        let outer = outer.as_ref().to_owned();
        inner_map.into_iter().map(move |(inner, value)| Triple {
            outer: outer.clone(),
            inner: inner.as_ref().to_owned(),
            value: value.as_ref().to_owned(),
        })
    })
}

/// Group a triple stream by the key `project` derives from each triple.
///
/// Items under one key appear in stream order.
pub fn accumulate<A, B, C, K, T>(
    triples: impl IntoIterator<Item = Triple<A, B, C>>,
    mut project: impl FnMut(Triple<A, B, C>) -> (K, T),
) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
{
    let mut grouped: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for triple in triples {
        let (key, item) = project(triple);
        grouped.entry(key).or_default().push(item);
    }
    grouped
}

// ---------------------------------------------------------------------------
// Remaps
// ---------------------------------------------------------------------------

/// Turn a sequence into a set-like mapping where every element maps to `1`.
///
/// Duplicates collapse onto the same key.
#[must_use]
pub fn to_set<I, S>(sequence: I) -> Mapping<u8>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let grouped = accumulate(set_triples(sequence), |t| (t.outer, ()));
    map_values(&grouped, |_| 1)
}

/// Invert `key -> value` into `value -> [keys...]`.
///
/// Keys sharing a value are collected in input order.
#[must_use]
pub fn invert<I, K, V>(map: I) -> GroupedList<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    accumulate(flat_triples(map), |t| (t.value, t.outer))
}

/// Pivot `a -> b -> c` into `c -> b -> [a...]`.
///
/// Inverts on the innermost value while keeping the middle key as the
/// second level.
#[must_use]
pub fn pivot_nested<I, K, M, J, V>(map: I) -> NestedMapping<Vec<String>>
where
    I: IntoIterator<Item = (K, M)>,
    K: AsRef<str>,
    M: IntoIterator<Item = (J, V)>,
    J: AsRef<str>,
    V: AsRef<str>,
{
    let grouped = accumulate(nested_triples(map), |t| ((t.value, t.inner), t.outer));

    let mut pivoted: NestedMapping<Vec<String>> = BTreeMap::new();
    for ((value, inner), outers) in grouped {
        pivoted.entry(value).or_default().insert(inner, outers);
    }
    pivoted
}

/// Group `a -> b -> c` by the middle key into `b -> [(a, c)...]`.
#[must_use]
pub fn group_by_inner_key<I, K, M, J, V>(map: I) -> GroupedList<(String, String)>
where
    I: IntoIterator<Item = (K, M)>,
    K: AsRef<str>,
    M: IntoIterator<Item = (J, V)>,
    J: AsRef<str>,
    V: AsRef<str>,
{
    accumulate(nested_triples(map), |t| (t.inner, (t.outer, t.value)))
}
