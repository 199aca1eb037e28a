use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_AUTHORIZATION, JSON_CONTENT_TYPE};

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
        }
    }

    /// Every method except GET may carry a body
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::GET)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared parameter of an endpoint.
///
/// `required` is shown to the user but never enforced before sending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_hint: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Declarative definition of a single API operation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub method: HttpMethod,
    /// Path template with `{name}` placeholders
    pub path: String,
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    /// Example JSON body offered as the initial body text
    #[serde(default)]
    pub body: Option<String>,
}

/// HTTP Header
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Header {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered header map with case-insensitive names
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderSet {
    headers: Vec<Header>,
}

impl HeaderSet {
    /// An empty set, without the seeded defaults
    pub fn new() -> Self {
        HeaderSet {
            headers: Vec::new(),
        }
    }

    /// Default headers seeded with the given Authorization value
    pub fn seeded(authorization: impl Into<String>) -> Self {
        let mut headers = HeaderSet::new();
        headers.set("Authorization", authorization);
        headers.set("Content-Type", JSON_CONTENT_TYPE);
        headers
    }

    /// Replaces an existing header (matched case-insensitively) or appends a new one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|h| h.key.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.value = value,
            None => self.headers.push(Header::new(key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.key.eq_ignore_ascii_case(key))
            .map(|h| h.value.as_str())
    }

    /// Mutable access to a header value, appending an empty header if missing
    pub fn value_mut(&mut self, key: &str) -> &mut String {
        let index = match self
            .headers
            .iter()
            .position(|h| h.key.eq_ignore_ascii_case(key))
        {
            Some(index) => index,
            None => {
                self.headers.push(Header::new(key, ""));
                self.headers.len() - 1
            }
        };
        &mut self.headers[index].value
    }

    pub fn remove(&mut self, key: &str) -> Option<Header> {
        let index = self
            .headers
            .iter()
            .position(|h| h.key.eq_ignore_ascii_case(key))?;
        Some(self.headers.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.headers.iter()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl Default for HeaderSet {
    fn default() -> Self {
        HeaderSet::seeded(DEFAULT_AUTHORIZATION)
    }
}

/// User-entered parameter values, iterated in insertion order
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Bindings {
    values: IndexMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Mutable access to a value, inserting an empty one if unbound
    pub fn entry_mut(&mut self, name: &str) -> &mut String {
        self.values.entry(name.to_string()).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Bindings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        for (name, value) in iter {
            bindings.set(name, value);
        }
        bindings
    }
}

/// A fully resolved request, ready for the transport
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpec {
    url: String,
    method: HttpMethod,
    headers: HeaderSet,
    body: Option<String>,
}

impl RequestSpec {
    pub(crate) fn new(
        url: String,
        method: HttpMethod,
        headers: HeaderSet,
        body: Option<String>,
    ) -> Self {
        RequestSpec {
            url,
            method,
            headers,
            body,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Normalized result of one execution attempt
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseRecord {
    pub status_code: Option<u16>,
    pub status_text: Option<String>,
    pub body_text: String,
    pub is_error: bool,
}

impl ResponseRecord {
    /// Record for a response that made it back from the server
    pub fn from_status(status_code: u16, status_text: impl Into<String>, body_text: String) -> Self {
        ResponseRecord {
            status_code: Some(status_code),
            status_text: Some(status_text.into()),
            body_text,
            is_error: !(200..=299).contains(&status_code),
        }
    }

    /// Record for a failure that produced no HTTP status
    pub fn failure(message: impl Into<String>) -> Self {
        ResponseRecord {
            status_code: None,
            status_text: None,
            body_text: message.into(),
            is_error: true,
        }
    }

    pub fn has_status(&self) -> bool {
        self.status_code.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_seed_authorization_and_content_type() {
        let headers = HeaderSet::default();
        assert_eq!(headers.get("authorization"), Some(DEFAULT_AUTHORIZATION));
        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_header_set_replaces_case_insensitively() {
        let mut headers = HeaderSet::new();
        headers.set("X-Token", "a");
        headers.set("x-token", "b");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-TOKEN"), Some("b"));
        assert!(headers.remove("X-Token").is_some());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_bindings_keep_insertion_order() {
        let mut bindings: Bindings = [("b", "2"), ("a", "1")].into_iter().collect();
        bindings.set("b", "3");
        let names: Vec<_> = bindings.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(bindings.get("b"), Some("3"));
    }

    #[test]
    fn test_record_error_flag_follows_status() {
        assert!(!ResponseRecord::from_status(204, "No Content", String::new()).is_error);
        assert!(ResponseRecord::from_status(404, "Not Found", String::new()).is_error);
        let failure = ResponseRecord::failure("boom");
        assert!(failure.is_error);
        assert!(!failure.has_status());
    }

    #[test]
    fn test_descriptor_deserializes_type_hint() {
        let yaml = r#"
method: GET
path: /api/Client/{id}
description: Obtiene un cliente por ID
parameters:
  - { name: id, type: string, required: true }
"#;
        let descriptor: EndpointDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(descriptor.method, HttpMethod::GET);
        assert_eq!(descriptor.parameters[0].type_hint, "string");
        assert!(descriptor.parameters[0].required);
        assert!(descriptor.body.is_none());
    }
}
