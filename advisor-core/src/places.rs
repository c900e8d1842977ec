//! Read-only reference set of known places used when the provider cannot
//! resolve a location.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::Arc};

use crate::resolver::{Resolver, ResolverStrategy};

/// One reference location entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub parent_region: String,
}

impl LocationCandidate {
    pub fn new(name: impl Into<String>, parent_region: impl Into<String>) -> Self {
        Self { name: name.into(), parent_region: parent_region.into() }
    }
}

/// Query side of the reference store.
pub trait PlaceStore: Send + Sync {
    /// Every candidate, in the store's natural order.
    fn all(&self) -> &[LocationCandidate];

    /// Candidates whose name contains `query`, ignoring case.
    fn find(&self, query: &str) -> Vec<LocationCandidate> {
        Resolver::new(ResolverStrategy::Substring)
            .resolve(query, self.all())
            .into_iter()
            .map(|m| m.candidate)
            .collect()
    }
}

/// In-memory candidate index. Cloning shares the underlying slice.
#[derive(Debug, Clone)]
pub struct PlaceIndex {
    entries: Arc<[LocationCandidate]>,
}

impl PlaceIndex {
    pub fn new(entries: Vec<LocationCandidate>) -> Self {
        Self { entries: entries.into() }
    }

    /// Load a JSON array of `{ "name": ..., "parent_region": ... }` objects.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read places file: {}", path.display()))?;

        let entries: Vec<LocationCandidate> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse places file: {}", path.display()))?;

        tracing::debug!(count = entries.len(), path = %path.display(), "Loaded place index");
        Ok(Self::new(entries))
    }

    /// Small built-in set of capitals, used when no places file is configured.
    pub fn builtin() -> Self {
        let entries = BUILTIN_PLACES
            .iter()
            .map(|(name, region)| LocationCandidate::new(*name, *region))
            .collect();
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PlaceStore for PlaceIndex {
    fn all(&self) -> &[LocationCandidate] {
        &self.entries
    }
}

const BUILTIN_PLACES: &[(&str, &str)] = &[
    ("London", "United Kingdom"),
    ("Paris", "France"),
    ("Berlin", "Germany"),
    ("Madrid", "Spain"),
    ("Rome", "Italy"),
    ("Moscow", "Russia"),
    ("Saint Petersburg", "Russia"),
    ("Kyiv", "Ukraine"),
    ("Warsaw", "Poland"),
    ("Prague", "Czech Republic"),
    ("Vienna", "Austria"),
    ("Budapest", "Hungary"),
    ("Stockholm", "Sweden"),
    ("Oslo", "Norway"),
    ("Helsinki", "Finland"),
    ("Copenhagen", "Denmark"),
    ("Amsterdam", "Netherlands"),
    ("Brussels", "Belgium"),
    ("Lisbon", "Portugal"),
    ("Athens", "Greece"),
    ("Istanbul", "Turkey"),
    ("Cairo", "Egypt"),
    ("Nairobi", "Kenya"),
    ("Tashkent", "Uzbekistan"),
    ("Almaty", "Kazakhstan"),
    ("Tbilisi", "Georgia"),
    ("Yerevan", "Armenia"),
    ("Baku", "Azerbaijan"),
    ("Tokyo", "Japan"),
    ("Beijing", "China"),
    ("Seoul", "South Korea"),
    ("New Delhi", "India"),
    ("Bangkok", "Thailand"),
    ("Sydney", "Australia"),
    ("New York", "United States"),
    ("San Francisco", "United States"),
    ("Boston", "United States"),
    ("Toronto", "Canada"),
    ("Mexico City", "Mexico"),
    ("Santiago", "Chile"),
    ("Buenos Aires", "Argentina"),
    ("Sao Paulo", "Brazil"),
];
