//! Parameter binding - places user values in the path or the query string

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::models::Bindings;

/// Characters left untouched in a query value, same set as `encodeURIComponent`
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}/]+)\}").expect("a valid regex"));

/// Where a bound value ends up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Path,
    Query,
}

/// Result of binding values against a path template
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BoundPath {
    pub path: String,
    /// Name and percent-encoded value, in binding order
    pub query: Vec<(String, String)>,
}

impl BoundPath {
    /// `name=value&...`, or `None` when no query pair survived
    pub fn query_string(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .query
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        Some(pairs.join("&"))
    }
}

fn placeholder(name: &str) -> String {
    ["{", name, "}"].concat()
}

/// A name is a path parameter when the template literally contains `{name}`
pub fn classify(template: &str, name: &str) -> Placement {
    if template.contains(&placeholder(name)) {
        Placement::Path
    } else {
        Placement::Query
    }
}

/// Substitutes path parameters and collects the remaining values as query pairs.
///
/// Unbound placeholders stay in the path as-is. Query values that are empty or
/// whitespace-only are dropped.
pub fn bind(template: &str, bindings: &Bindings) -> BoundPath {
    let mut path = template.to_string();
    let mut query = Vec::new();

    for (name, value) in bindings.iter() {
        match classify(template, name) {
            Placement::Path => {
                path = path.replacen(&placeholder(name), value, 1);
            }
            Placement::Query => {
                if value.trim().is_empty() {
                    continue;
                }
                query.push((
                    name.to_string(),
                    utf8_percent_encode(value, QUERY_VALUE).to_string(),
                ));
            }
        }
    }

    BoundPath { path, query }
}

/// Names of `{name}` placeholders still present in `text`
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
