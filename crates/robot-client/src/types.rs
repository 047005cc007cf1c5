use serde::{Deserialize, Serialize};

/// One named entity a robot knows about (a position or a mission).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Opaque identifier assigned by the robot.
    pub guid: String,
    /// Position type classifier (0 = plain position, charger types otherwise).
    #[serde(default)]
    pub type_id: Option<u32>,
    /// Map the entry belongs to, if the robot reports one.
    #[serde(default)]
    pub map: Option<String>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: guid.into(),
            type_id: None,
            map: None,
        }
    }

    pub fn with_type_id(mut self, type_id: u32) -> Self {
        self.type_id = Some(type_id);
        self
    }

    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = Some(map.into());
        self
    }
}

/// An ordered, name-unique snapshot of entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog; later entries with an already-seen name are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut out: Vec<CatalogEntry> = Vec::new();
        for entry in entries {
            if out.iter().any(|e| e.name == entry.name) {
                tracing::debug!("duplicate catalog entry '{}' ignored", entry.name);
                continue;
            }
            out.push(entry);
        }
        Self { entries: out }
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn guid(&self, name: &str) -> Option<&str> {
        self.get(name).map(|e| e.guid.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Positions and missions as fetched by one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogs {
    pub positions: Catalog,
    pub missions: Catalog,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_drops_duplicate_names() {
        let catalog = Catalog::from_entries(vec![
            CatalogEntry::new("dock", "g1"),
            CatalogEntry::new("lab", "g2"),
            CatalogEntry::new("dock", "g3"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names(), vec!["dock".to_string(), "lab".to_string()]);
        assert_eq!(catalog.guid("dock"), Some("g1"));
    }

    #[test]
    fn test_catalog_lookup_missing() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(!catalog.contains("dock"));
        assert_eq!(catalog.guid("dock"), None);
    }

    #[test]
    fn test_entry_builders() {
        let entry = CatalogEntry::new("charger", "g9")
            .with_type_id(7)
            .with_map("/v2.0.0/maps/m1");
        assert_eq!(entry.type_id, Some(7));
        assert_eq!(entry.map.as_deref(), Some("/v2.0.0/maps/m1"));
    }
}
