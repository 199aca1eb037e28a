//! Endpoint catalog - the read-only table of operations the user can try
//!
//! The built-in Facturama catalog is embedded at compile time. A YAML file with
//! the same shape can replace it through the config.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::EndpointDescriptor;

const BUILTIN_CATALOG: &str = include_str!("../catalog/facturama.yaml");

/// One card in the catalog
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub description: String,
    pub endpoint: Arc<EndpointDescriptor>,
}

impl CatalogEntry {
    /// Case-insensitive match on title, description or path
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self.endpoint.path.to_lowercase().contains(&term)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub description: String,
    pub endpoints: Vec<CatalogEntry>,
}

/// Position of an entry: category index, then entry index within it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId {
    pub category: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// The catalog shipped with the binary
    pub fn builtin() -> Result<Self> {
        Catalog::from_yaml(BUILTIN_CATALOG).context("Built-in catalog is malformed")
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let catalog: Catalog = serde_yaml::from_str(text)?;
        tracing::debug!(
            categories = catalog.categories.len(),
            endpoints = catalog.len(),
            "Catalog parsed"
        );
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Catalog::from_yaml(&text)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))
    }

    /// Load from `path` when given, otherwise use the built-in catalog
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading catalog");
                Catalog::load(path)
            }
            None => Catalog::builtin(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn entry(&self, id: EntryId) -> Option<&CatalogEntry> {
        self.categories.get(id.category)?.endpoints.get(id.index)
    }

    /// Total number of entries across categories
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.endpoints.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries of one category matching `term`; an empty term matches all
    pub fn filter_category(&self, category: usize, term: &str) -> Vec<EntryId> {
        let Some(cat) = self.categories.get(category) else {
            return Vec::new();
        };
        let term = term.trim();
        cat.endpoints
            .iter()
            .enumerate()
            .filter(|(_, entry)| term.is_empty() || entry.matches(term))
            .map(|(index, _)| EntryId { category, index })
            .collect()
    }

    /// Matching entries grouped by category; categories with no match are dropped
    pub fn filter(&self, term: &str) -> Vec<(usize, Vec<EntryId>)> {
        (0..self.categories.len())
            .map(|category| (category, self.filter_category(category, term)))
            .filter(|(_, entries)| !entries.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        let names: Vec<_> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Facturas (CFDI)",
                "Clientes",
                "Productos",
                "Mi Cuenta",
                "Catálogos SAT",
                "Sucursales"
            ]
        );
        assert_eq!(catalog.len(), 39);
    }

    #[test]
    fn test_builtin_example_bodies_are_valid_json() {
        let catalog = Catalog::builtin().unwrap();
        for category in catalog.categories() {
            for entry in &category.endpoints {
                if let Some(body) = &entry.endpoint.body {
                    assert!(
                        serde_json::from_str::<serde_json::Value>(body).is_ok(),
                        "{} has an invalid example body",
                        entry.title
                    );
                    assert_ne!(entry.endpoint.method, HttpMethod::GET);
                }
            }
        }
    }

    #[test]
    fn test_entry_lookup() {
        let catalog = Catalog::builtin().unwrap();
        let entry = catalog.entry(EntryId { category: 0, index: 2 }).unwrap();
        assert_eq!(entry.endpoint.path, "/api/Cfdi/{id}/{type}");
        assert!(catalog.entry(EntryId { category: 99, index: 0 }).is_none());
    }

    #[test]
    fn test_filter_matches_title_description_and_path() {
        let catalog = Catalog::builtin().unwrap();

        let by_path = catalog.filter("BRANCHOFFICE");
        assert_eq!(by_path.len(), 1);
        assert_eq!(catalog.categories()[by_path[0].0].name, "Sucursales");
        assert_eq!(by_path[0].1.len(), 5);

        let by_title = catalog.filter_category(1, "rfc");
        assert_eq!(by_title.len(), 1);

        assert_eq!(catalog.filter("").len(), catalog.categories().len());
        assert!(catalog.filter("zzz-no-such-endpoint").is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
categories:
  - name: Demo
    description: Demo endpoints
    endpoints:
      - title: Ping
        description: Health check
        endpoint:
          method: GET
          path: /ping
          description: Returns pong
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, yaml).unwrap();

        let catalog = Catalog::load_or_builtin(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.entry(EntryId { category: 0, index: 0 }).unwrap().endpoint.parameters.is_empty());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Catalog::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
