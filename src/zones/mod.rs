// Zone directory
//
// Read-only catalog of world zones. Built once at startup (from a JSON
// catalog file or the built-in catalog) and handed to the app; the world
// only ever holds shared references to its entries.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

/// Maximum number of names returned by a prefix search
pub const MAX_SUGGESTIONS: usize = 10;

/// Catalog bundled with the binary
const BUILTIN_CATALOG: &str = include_str!("../../data/zones.json");

/// Errors raised while loading a zone catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read zone catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed zone catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable zone metadata
///
/// Identity is the (case-sensitive) name. Tier and colour are only used
/// for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[allow(dead_code)]
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub albion_id: String,
    pub name: String,
    #[serde(default)]
    pub tier: String,
    /// Category: "blue", "yellow", "red", "black", "city", "road", "road-ho"
    #[serde(default)]
    pub color: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_deep: bool,
}

/// The zone catalog
#[derive(Debug, Clone, Default)]
pub struct ZoneDirectory {
    zones: Vec<Rc<Zone>>,
}

impl ZoneDirectory {
    /// Build a directory from already-parsed zones
    ///
    /// Rows whose category is a single blank (non-zone rows in the upstream
    /// dump) are dropped.
    pub fn new(zones: Vec<Zone>) -> Self {
        let zones = zones
            .into_iter()
            .filter(|z| z.color != " ")
            .map(Rc::new)
            .collect();
        Self { zones }
    }

    /// Parse a JSON array of zones
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let zones: Vec<Zone> = serde_json::from_str(json)?;
        Ok(Self::new(zones))
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let directory = Self::from_json_str(&content)?;
        debug!(path = %path.display(), zones = directory.len(), "Loaded zone catalog");
        Ok(directory)
    }

    /// The catalog shipped in `data/zones.json`
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Exact, case-sensitive lookup by name
    pub fn lookup(&self, name: &str) -> Option<Rc<Zone>> {
        self.zones.iter().find(|z| z.name == name).cloned()
    }

    /// Case-insensitive substring search for autocomplete
    ///
    /// Results are ranked by the position of the first match within the
    /// name; equal positions keep catalog order. At most
    /// [`MAX_SUGGESTIONS`] names are returned.
    pub fn find_by_prefix(&self, query: &str) -> Vec<&str> {
        let needle = query.to_lowercase();

        let mut matches: Vec<(usize, &str)> = self
            .zones
            .iter()
            .filter_map(|z| {
                z.name
                    .to_lowercase()
                    .find(&needle)
                    .map(|index| (index, z.name.as_str()))
            })
            .collect();

        // Stable sort keeps catalog order for ties
        matches.sort_by_key(|(index, _)| *index);

        matches
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, name)| name)
            .collect()
    }
}
