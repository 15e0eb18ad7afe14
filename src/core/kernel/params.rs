use crate::core::errors::ExchangeError;
use std::fmt::Display;

/// Insertion-ordered request parameters.
///
/// The query string produced here is both the string that gets signed and the
/// string sent on the wire, so the order must never depend on hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RequestParams::set`]
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Display) -> Self {
        self.set(key, value);
        self
    }

    /// Builder form of [`RequestParams::set_opt`]
    #[must_use]
    pub fn with_opt<V: Display>(mut self, key: &str, value: Option<V>) -> Self {
        self.set_opt(key, value);
        self
    }

    /// Set `key`, replacing an existing value in place or appending a new pair.
    pub fn set(&mut self, key: &str, value: impl Display) {
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Set `key` only when a value is present; absent values are never sent.
    pub fn set_opt<V: Display>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Form-encode the pairs in insertion order
    pub fn to_query_string(&self) -> Result<String, ExchangeError> {
        serde_urlencoded::to_string(&self.pairs).map_err(|e| {
            ExchangeError::InvalidParameters(format!("Failed to encode query string: {}", e))
        })
    }
}

impl<K: AsRef<str>, V: Display> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k.as_ref(), v);
        }
        params
    }
}
