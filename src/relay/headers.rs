//! Case-insensitive header map used on both sides of the hop.
//!
//! Names are stored in `Title-Case-With-Hyphens` form, so two spellings of the
//! same header always land on the same key. Entries iterate in name order,
//! which keeps the outbound header list stable between identical requests.

use std::collections::BTreeMap;

pub const HOST: &str = "Host";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONNECTION: &str = "Connection";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const X_FORWARDED_FOR: &str = "X-Forwarded-For";

/// Headers that never cross the hop.
pub const STRIPPED_HEADERS: &[&str] = &[HOST, CONTENT_LENGTH, CONNECTION];

/// Normalize a header name: `x_forwarded-FOR` becomes `X-Forwarded-For`.
pub fn canonical_name(name: &str) -> String {
    name.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = first.to_ascii_uppercase().to_string();
                    out.push_str(&chars.as_str().to_ascii_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Request headers keyed by canonical name. Values are kept as raw bytes so
/// obs-text crosses the hop unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayHeaders {
    entries: BTreeMap<String, Vec<u8>>,
}

impl RelayHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any previous value.
    pub fn set(&mut self, name: &str, value: impl Into<Vec<u8>>) {
        self.entries.insert(canonical_name(name), value.into());
    }

    /// Add a value, joining with `", "` if the header is already present.
    pub fn append(&mut self, name: &str, value: &[u8]) {
        self.entries
            .entry(canonical_name(name))
            .and_modify(|existing| {
                existing.extend_from_slice(b", ");
                existing.extend_from_slice(value);
            })
            .or_insert_with(|| value.to_vec());
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(&canonical_name(name)).map(Vec::as_slice)
    }

    /// Value as text, when it is valid UTF-8.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| std::str::from_utf8(v).ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&canonical_name(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(&canonical_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RelayHeaders {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut headers = RelayHeaders::new();
        for (name, value) in iter {
            headers.append(name, value.as_bytes());
        }
        headers
    }
}
