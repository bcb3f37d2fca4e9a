//! Ordered parameter map remembered for a page.
//!
//! Values are either a single string or a list of strings. Lists use the
//! bracket convention on the wire (`tag[0]=a&tag[1]=b`, and `tag[]=a` when
//! parsing) so restored URLs round-trip through common form handling.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::form_urlencoded;

/// A single remembered parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Insertion-ordered map of query parameters.
///
/// Transitions return a new value instead of mutating in place, so the
/// marker swaps its working state wholesale on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    entries: Vec<(String, ParamValue)>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`).
    ///
    /// Repeated plain keys keep the last value. `key[]` and `key[n]` collect
    /// into a list under `key`.
    pub fn from_query(query: &str) -> Self {
        let mut state = PageState::new();
        for (raw_key, value) in form_urlencoded::parse(query.as_bytes()) {
            if raw_key.is_empty() {
                continue;
            }
            if let Some(base) = list_key(&raw_key) {
                state.push_list_item(base, value.into_owned());
                continue;
            }
            state.set(raw_key.into_owned(), ParamValue::Single(value.into_owned()));
        }
        state
    }

    /// Encode as an `application/x-www-form-urlencoded` query string.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            match value {
                ParamValue::Single(v) => {
                    serializer.append_pair(key, v);
                }
                ParamValue::List(items) => {
                    for (index, item) in items.iter().enumerate() {
                        serializer.append_pair(&format!("{key}[{index}]"), item);
                    }
                }
            }
        }
        serializer.finish()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Return a copy with `key` set to `value`. An existing key keeps its
    /// position.
    ///
    /// Entries that cannot appear in a query string are not stored: an empty
    /// key is ignored and an empty list removes `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key.into(), value.into());
        self
    }

    /// Return a copy merged with `other`. Keys already present win; new keys
    /// are appended in `other`'s order.
    pub fn merged(mut self, other: &PageState) -> Self {
        for (key, value) in &other.entries {
            if !self.contains_key(key) {
                self.entries.push((key.clone(), value.clone()));
            }
        }
        self
    }

    /// Return a copy without the given keys. Unknown keys are ignored.
    pub fn without<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            let key = key.as_ref();
            self.entries.retain(|(k, _)| k != key);
        }
        self
    }

    fn set(&mut self, key: String, value: ParamValue) {
        if key.is_empty() {
            return;
        }
        if matches!(&value, ParamValue::List(items) if items.is_empty()) {
            self.entries.retain(|(k, _)| *k != key);
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    fn push_list_item(&mut self, key: &str, item: String) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, ParamValue::List(items))) => items.push(item),
            Some(entry) => entry.1 = ParamValue::List(vec![item]),
            None => self.entries.push((key.to_string(), ParamValue::List(vec![item]))),
        }
    }
}

/// `tags[]` / `tags[3]` -> `tags`
fn list_key(raw: &str) -> Option<&str> {
    let open = raw.find('[')?;
    let inner = raw[open..].strip_prefix('[')?.strip_suffix(']')?;
    if open == 0 || !inner.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(&raw[..open])
}

impl<K, V> FromIterator<(K, V)> for PageState
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(PageState::new(), |state, (k, v)| state.with(k, v))
    }
}

impl Serialize for PageState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PageState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PageStateVisitor;

        impl<'de> Visitor<'de> for PageStateVisitor {
            type Value = PageState;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of string or string-list values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PageState, A::Error> {
                let mut state = PageState::new();
                while let Some((key, value)) = access.next_entry::<String, ParamValue>()? {
                    state.set(key, value);
                }
                Ok(state)
            }
        }

        deserializer.deserialize_map(PageStateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_order_and_last_duplicate() {
        let state = PageState::from_query("sort=asc&page=2&sort=desc");
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["sort", "page"]);
        assert_eq!(state.get("sort"), Some(&ParamValue::from("desc")));
    }

    #[test]
    fn parse_collects_bracket_lists() {
        let state = PageState::from_query("tag[]=a&tag%5B%5D=b&q=x");
        assert_eq!(state.get("tag"), Some(&ParamValue::from(vec!["a", "b"])));
        assert_eq!(state.get("q"), Some(&ParamValue::from("x")));
    }

    #[test]
    fn parse_ignores_empty_keys_and_keeps_flags() {
        let state = PageState::from_query("=x&flag&&a=");
        assert_eq!(state.len(), 2);
        assert_eq!(state.get("flag"), Some(&ParamValue::from("")));
        assert_eq!(state.get("a"), Some(&ParamValue::from("")));
    }

    #[test]
    fn encode_escapes_and_indexes_lists() {
        let state = PageState::new()
            .with("q", "a b&c")
            .with("tag", vec!["x", "y"]);
        assert_eq!(state.to_query(), "q=a+b%26c&tag%5B0%5D=x&tag%5B1%5D=y");
    }

    #[test]
    fn encoded_lists_parse_back() {
        let state = PageState::new().with("tag", vec!["x", "y"]).with("page", "3");
        assert_eq!(PageState::from_query(&state.to_query()), state);
    }

    #[test]
    fn with_overwrites_in_place() {
        let state = PageState::new().with("a", "1").with("b", "2").with("a", "3");
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(state.get("a"), Some(&ParamValue::from("3")));
    }

    #[test]
    fn unencodable_entries_are_not_stored() {
        let state = PageState::new()
            .with("", "v")
            .with("tag", vec!["a"])
            .with("tag", Vec::<String>::new())
            .with("q", "x");
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["q"]);
        assert_eq!(PageState::from_query(&state.to_query()), state);

        let json: PageState = serde_json::from_str(r#"{"":"v","tag":[],"q":"x"}"#).unwrap();
        assert_eq!(json, state);
    }

    #[test]
    fn merged_keeps_existing_values() {
        let base = PageState::new().with("page", "1").with("q", "x");
        let incoming = PageState::new().with("page", "9").with("sort", "asc");
        let merged = base.merged(&incoming);
        assert_eq!(merged.get("page"), Some(&ParamValue::from("1")));
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["page", "q", "sort"]);
    }

    #[test]
    fn without_removes_listed_keys() {
        let state = PageState::new().with("a", "1").with("b", "2").with("c", "3");
        let trimmed = state.without(["a", "missing", "c"]);
        assert_eq!(trimmed.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn json_preserves_key_order() {
        let state = PageState::new().with("z", "1").with("a", vec!["x"]);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"z":"1","a":["x"]}"#);
        let back: PageState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
