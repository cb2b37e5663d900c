//! Ordered name/value parameters (query string or decoded form fields).

/// Parameters in first-seen order. Setting an existing name replaces its value
/// in place, so `a=1&b=2&a=3` holds `a=3, b=2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    entries: Vec<(String, String)>,
}

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` string (`+` is a space).
    pub fn parse(input: &[u8]) -> Self {
        url::form_urlencoded::parse(input)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as `k=v&k=v` with RFC 3986 percent-encoding of keys and values.
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = FormParams::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_values_replace_in_place() {
        let params = FormParams::parse(b"a=1&b=2&a=3");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn parse_decodes_plus_and_percent() {
        let params = FormParams::parse(b"q=hello+world&path=%2Fdocs%3Fx");
        assert_eq!(params.get("q"), Some("hello world"));
        assert_eq!(params.get("path"), Some("/docs?x"));
    }

    #[test]
    fn query_string_uses_raw_percent_encoding() {
        let params: FormParams = [("q", "a b&c=d"), ("tilde", "~x")].into_iter().collect();
        assert_eq!(params.to_query_string(), "q=a%20b%26c%3Dd&tilde=~x");
    }

    #[test]
    fn remove_returns_value() {
        let mut params: FormParams = [("endpoint", "http://x"), ("a", "1")].into_iter().collect();
        assert_eq!(params.remove("endpoint").as_deref(), Some("http://x"));
        assert_eq!(params.remove("endpoint"), None);
        assert_eq!(params.len(), 1);
    }
}
