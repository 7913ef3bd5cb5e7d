//! Per-list configuration.
//!
//! Each list view (jobs, applications, users, ...) differs only in data: the
//! fields its search box looks at, which fields hold dates, its page sizes
//! and its initial sort. [`ListConfig`] carries that data and a
//! [`ListCatalog`] maps list names to configs, loaded from YAML or JSON.
//!
//! ```yaml
//! jobs:
//!   search_fields: [title, company.name, location]
//!   date_fields: [posted_at]
//!   default_sort: { field: posted_at, dir: desc }
//! users:
//!   search_fields: [name, email]
//!   default_page_size: 25
//!   page_size_options: [25, 50, 100]
//! ```

use std::collections::BTreeMap;
use std::hash::Hash;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::{QueryDescriptor, DEFAULT_PAGE_SIZE};
use crate::engine::ListEngine;
use crate::error::{ListError, Result};
use crate::sort::Sort;
use crate::state::ListState;

fn default_page_size_options() -> Vec<usize> {
    vec![10, 25, 50]
}

/// Configuration of one list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Fields the search text is matched against (dotted paths allowed).
    pub search_fields: Vec<String>,
    /// Fields holding ISO-8601 date strings, sorted as instants.
    pub date_fields: Vec<String>,
    /// Page size of a fresh view.
    pub default_page_size: usize,
    /// Sizes offered by the page-size picker.
    pub page_size_options: Vec<usize>,
    /// Sort of a fresh view; collection order when absent.
    pub default_sort: Option<Sort>,
}

impl Default for ListConfig {
    fn default() -> Self {
        ListConfig {
            search_fields: Vec::new(),
            date_fields: Vec::new(),
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: default_page_size_options(),
            default_sort: None,
        }
    }
}

impl ListConfig {
    /// Creates a config searching the given fields, with default paging.
    pub fn new<I, S>(search_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ListConfig {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
            ..ListConfig::default()
        }
    }

    /// Parses a single config from YAML and validates it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ListConfig = serde_yaml::from_str(yaml)?;
        config.validate("<inline>")?;
        Ok(config)
    }

    /// Parses a single config from JSON and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ListConfig = serde_json::from_str(json)?;
        config.validate("<inline>")?;
        Ok(config)
    }

    /// Checks that the paging settings are usable. `list` names the config
    /// in the error.
    pub fn validate(&self, list: &str) -> Result<()> {
        let invalid = |reason: String| ListError::InvalidConfig {
            list: list.to_string(),
            reason,
        };

        if self.default_page_size == 0 {
            return Err(invalid("default_page_size must be at least 1".into()));
        }
        if self.page_size_options.contains(&0) {
            return Err(invalid("page_size_options must not contain 0".into()));
        }
        if !self.page_size_options.is_empty()
            && !self.page_size_options.contains(&self.default_page_size)
        {
            return Err(invalid(format!(
                "default_page_size {} is not one of {:?}",
                self.default_page_size, self.page_size_options
            )));
        }
        Ok(())
    }

    /// Builds the engine for this list.
    pub fn engine(&self) -> ListEngine {
        ListEngine::new(self.search_fields.iter().cloned())
            .with_date_fields(self.date_fields.iter().cloned())
    }

    /// The descriptor of a fresh view: page 1, default size and sort.
    pub fn descriptor(&self) -> QueryDescriptor {
        QueryDescriptor {
            sort: self.default_sort.clone(),
            page_size: self.default_page_size,
            ..QueryDescriptor::default()
        }
    }

    /// Fresh interactive state for this list.
    pub fn state<K: Eq + Hash + Clone>(&self) -> ListState<K> {
        ListState::new(self.descriptor())
    }
}

/// Named list configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListCatalog {
    lists: BTreeMap<String, ListConfig>,
}

impl ListCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        ListCatalog::default()
    }

    /// Adds or replaces a list.
    pub fn insert(&mut self, name: impl Into<String>, config: ListConfig) {
        self.lists.insert(name.into(), config);
    }

    /// Looks up a list by name.
    pub fn get(&self, name: &str) -> Result<&ListConfig> {
        self.lists
            .get(name)
            .ok_or_else(|| ListError::UnknownList(name.to_string()))
    }

    /// Names of all lists, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    /// Number of lists.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns `true` if the catalog has no lists.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Parses a catalog from YAML and validates every list.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let catalog: ListCatalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parses a catalog from JSON and validates every list.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: ListCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads a catalog file, choosing the format by extension
    /// (`.yaml`, `.yml` or `.json`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("yaml") | Some("yml") => ListCatalog::from_yaml_str,
            Some("json") => ListCatalog::from_json_str,
            _ => return Err(ListError::UnsupportedFormat(path.to_path_buf())),
        };

        let content = std::fs::read_to_string(path).map_err(|source| ListError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = parse(&content)?;
        debug!(
            path = %path.display(),
            lists = catalog.len(),
            "loaded list catalog"
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        for (name, config) in &self.lists {
            config.validate(name)?;
        }
        Ok(())
    }
}
