//! Sort specification and a key-based post-query sorter
//!
//! A `SortSpec` only names keys and directions. Comparing values is left to
//! the sorter a query variant supplies.

use std::cmp::Ordering;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::errors::QueryResult;
use super::phases::PostQuerySorter;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Applies this direction to an ascending ordering
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// One (key, direction) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub key: String,
    pub direction: SortDirection,
}

/// Ordered sort keys: primary first, then secondary, and so on.
///
/// Empty means no sort was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// No sort requested
    pub fn none() -> Self {
        Self::default()
    }

    /// Sort by a single key
    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self::none().then(key, direction)
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self::by(key, SortDirection::Asc)
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self::by(key, SortDirection::Desc)
    }

    /// Append a lower-priority key
    pub fn then(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.keys.push(SortKey {
            key: key.into(),
            direction,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortKey> {
        self.keys.iter()
    }
}

/// Post-query sorter driven by a key extractor.
///
/// Stable across equal keys. An item without a value for a key orders before
/// items that have one (before direction is applied).
pub struct KeyedSorter<R, V, F> {
    extract: F,
    _marker: PhantomData<fn(&R) -> V>,
}

impl<R, V, F> KeyedSorter<R, V, F>
where
    V: Ord,
    F: Fn(&R, &str) -> Option<V>,
{
    pub fn new(extract: F) -> Self {
        Self {
            extract,
            _marker: PhantomData,
        }
    }

    fn compare(&self, a: &R, b: &R, spec: &SortSpec) -> Ordering {
        for sort_key in spec.iter() {
            let a_val = (self.extract)(a, &sort_key.key);
            let b_val = (self.extract)(b, &sort_key.key);

            let ordering = sort_key.direction.apply(a_val.cmp(&b_val));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl<R, V, F> PostQuerySorter<R> for KeyedSorter<R, V, F>
where
    V: Ord,
    F: Fn(&R, &str) -> Option<V> + Send + Sync,
{
    fn sort(&self, mut results: Vec<R>, spec: &SortSpec) -> QueryResult<Vec<R>> {
        if !spec.is_empty() {
            results.sort_by(|a, b| self.compare(a, b, spec));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Post {
        id: &'static str,
        author: Option<&'static str>,
        published: u32,
    }

    fn post(id: &'static str, author: Option<&'static str>, published: u32) -> Post {
        Post {
            id,
            author,
            published,
        }
    }

    fn extract(post: &Post, key: &str) -> Option<String> {
        match key {
            "author" => post.author.map(str::to_string),
            "published" => Some(format!("{:010}", post.published)),
            _ => None,
        }
    }

    fn ids(posts: &[Post]) -> Vec<&'static str> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_sort_spec_order_is_significant() {
        let spec = SortSpec::asc("author").then("published", SortDirection::Desc);
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.keys()[0].key, "author");
        assert_eq!(spec.keys()[1].direction, SortDirection::Desc);
    }

    #[test]
    fn test_sort_descending() {
        let sorter = KeyedSorter::new(extract);
        let posts = vec![post("a", None, 1), post("b", None, 3), post("c", None, 2)];

        let sorted = sorter.sort(posts, &SortSpec::desc("published")).unwrap();
        assert_eq!(ids(&sorted), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let sorter = KeyedSorter::new(extract);
        let posts = vec![
            post("a", Some("zoe"), 1),
            post("b", Some("amy"), 1),
            post("c", Some("amy"), 5),
        ];

        let spec = SortSpec::asc("author").then("published", SortDirection::Desc);
        let sorted = sorter.sort(posts, &spec).unwrap();
        assert_eq!(ids(&sorted), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_missing_key_orders_first() {
        let sorter = KeyedSorter::new(extract);
        let posts = vec![post("a", Some("bob"), 1), post("b", None, 1)];

        let sorted = sorter.sort(posts, &SortSpec::asc("author")).unwrap();
        assert_eq!(ids(&sorted), vec!["b", "a"]);
    }

    #[test]
    fn test_empty_spec_keeps_order() {
        let sorter = KeyedSorter::new(extract);
        let posts = vec![post("c", None, 3), post("a", None, 1), post("b", None, 2)];

        let sorted = sorter.sort(posts, &SortSpec::none()).unwrap();
        assert_eq!(ids(&sorted), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let sorter = KeyedSorter::new(extract);
        let posts = vec![post("a", None, 7), post("b", None, 7), post("c", None, 7)];

        let sorted = sorter.sort(posts, &SortSpec::asc("published")).unwrap();
        assert_eq!(ids(&sorted), vec!["a", "b", "c"]);
    }
}
