//! In-memory store implementation for testing
//!
//! Stands in for Redis so the reporting passes can be exercised without a
//! running server. TTLs are fixed snapshots: they never count down.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use regex::Regex;

use super::StatsStore;
use crate::error::StatsResult;

/// Stored value kinds the reporting passes care about
#[derive(Debug, Clone)]
enum StoredValue {
    Plain(String),
    List(Vec<String>),
}

/// Entry in the in-memory store
#[derive(Debug, Clone)]
struct StoreEntry {
    value: StoredValue,
    ttl: Option<u64>,
}

/// In-memory store for testing
///
/// Implements `StatsStore` with Redis-compatible key matching and list range
/// semantics.
#[derive(Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<String, StoreEntry>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a plain string value with an optional TTL
    pub fn set(&self, key: &str, value: &str, ttl: Option<u64>) {
        self.insert(key, StoredValue::Plain(value.to_string()), ttl);
    }

    /// Replace a list value, head first (as `LPUSH` leaves it)
    pub fn set_list<I, S>(&self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.insert(key, StoredValue::List(values), None);
    }

    /// Prepend a value to a list, creating it if needed
    pub fn lpush(&self, key: &str, value: &str) {
        let mut data = self.data.write().unwrap();
        let entry = data.entry(key.to_string()).or_insert_with(|| StoreEntry {
            value: StoredValue::List(Vec::new()),
            ttl: None,
        });
        match &mut entry.value {
            StoredValue::List(list) => list.insert(0, value.to_string()),
            other => *other = StoredValue::List(vec![value.to_string()]),
        }
    }

    /// Remove a key
    pub fn delete(&self, key: &str) {
        self.data.write().unwrap().remove(key);
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, key: &str, value: StoredValue, ttl: Option<u64>) {
        self.data
            .write()
            .unwrap()
            .insert(key.to_string(), StoreEntry { value, ttl });
    }
}

/// Translate a Redis glob pattern into an anchored regex
///
/// Supports `*`, `?` and backslash escapes. Character classes are matched
/// literally.
fn glob_to_regex(pattern: &str) -> Regex {
    let mut expr = String::from("^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    expr.push_str(&regex::escape(&escaped.to_string()));
                }
            }
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    // every piece of the expression is escaped or a fixed metasequence
    Regex::new(&expr).unwrap()
}

/// Resolve Redis-style inclusive, possibly negative, list bounds
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl StatsStore for InMemoryStore {
    async fn keys(&self, pattern: &str) -> StatsResult<Vec<String>> {
        let matcher = glob_to_regex(pattern);
        let data = self.data.read().unwrap();
        Ok(data
            .keys()
            .filter(|key| matcher.is_match(key))
            .cloned()
            .collect())
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> StatsResult<Vec<String>> {
        let data = self.data.read().unwrap();
        match data.get(key).map(|entry| &entry.value) {
            None => Ok(Vec::new()),
            Some(StoredValue::List(list)) => Ok(resolve_range(list.len(), start, stop)
                .map(|(from, to)| list[from..=to].to_vec())
                .unwrap_or_default()),
            Some(StoredValue::Plain(_)) => Err(redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "WRONGTYPE Operation against a key holding the wrong kind of value",
            ))
            .into()),
        }
    }

    async fn ttl(&self, key: &str) -> StatsResult<Option<u64>> {
        let data = self.data.read().unwrap();
        Ok(data.get(key).and_then(|entry| entry.ttl))
    }
}
