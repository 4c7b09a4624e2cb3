use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::entities::item::ItemTypeId;

pub const DEFAULT_STACK_LIMIT: u16 = 100;
pub const DEFAULT_NAME_CACHE_SIZE: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemType {
    pub id: ItemTypeId,
    pub name: String,
    pub plural: Option<String>,
    pub stackable: bool,
    pub stack_limit: u16,
    pub container_capacity: Option<u16>,
}

/// On-disk shape of one catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemTypeDef {
    id: u16,
    name: String,
    #[serde(default)]
    plural: Option<String>,
    #[serde(default)]
    stackable: bool,
    #[serde(default = "default_stack_limit")]
    stack_limit: u16,
    #[serde(default)]
    container_capacity: Option<u16>,
}

fn default_stack_limit() -> u16 {
    DEFAULT_STACK_LIMIT
}

#[derive(Debug, Clone)]
pub enum CatalogError {
    Read(PathBuf, String),
    Parse(String),
    ReservedTypeId,
    DuplicateType(ItemTypeId),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Read(path, msg) => {
                write!(f, "failed to read catalog {}: {}", path.display(), msg)
            }
            CatalogError::Parse(msg) => write!(f, "catalog parse error: {}", msg),
            CatalogError::ReservedTypeId => write!(f, "item type id 0 is reserved"),
            CatalogError::DuplicateType(id) => write!(f, "item type {} already exists", id.0),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only item type catalog with a cached name lookup. Lookups by name
/// scan linearly on a cache miss; only successful lookups are cached, so
/// unknown-name spam cannot evict useful entries.
#[derive(Debug)]
pub struct ItemTypeIndex {
    types: HashMap<ItemTypeId, ItemType>,
    name_cache: LruCache<String, ItemTypeId>,
}

impl ItemTypeIndex {
    pub fn new(name_cache_size: usize) -> Self {
        let cache_size = NonZeroUsize::new(name_cache_size.max(1)).unwrap();
        Self {
            types: HashMap::new(),
            name_cache: LruCache::new(cache_size),
        }
    }

    pub fn load(path: &Path, name_cache_size: usize) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| CatalogError::Read(path.to_path_buf(), err.to_string()))?;
        Self::from_yaml(&content, name_cache_size)
    }

    pub fn from_yaml(content: &str, name_cache_size: usize) -> Result<Self, CatalogError> {
        let defs: Vec<ItemTypeDef> =
            serde_yaml::from_str(content).map_err(|err| CatalogError::Parse(err.to_string()))?;
        let mut index = Self::new(name_cache_size);
        for def in defs {
            index.insert(ItemType {
                id: ItemTypeId(def.id),
                name: def.name,
                plural: def.plural,
                stackable: def.stackable,
                stack_limit: def.stack_limit.max(1),
                container_capacity: def.container_capacity,
            })?;
        }
        Ok(index)
    }

    pub fn insert(&mut self, item: ItemType) -> Result<(), CatalogError> {
        if !item.id.is_assigned() {
            return Err(CatalogError::ReservedTypeId);
        }
        if self.types.contains_key(&item.id) {
            return Err(CatalogError::DuplicateType(item.id));
        }
        self.types.insert(item.id, item);
        Ok(())
    }

    pub fn get(&self, id: ItemTypeId) -> Option<&ItemType> {
        self.types.get(&id)
    }

    /// Case-insensitive name lookup; `ItemTypeId::UNASSIGNED` on miss.
    pub fn id_by_name(&mut self, name: &str) -> ItemTypeId {
        let key = name.trim().to_ascii_lowercase();
        if key.is_empty() {
            return ItemTypeId::UNASSIGNED;
        }
        if let Some(id) = self.name_cache.get(&key) {
            return *id;
        }
        let found = self
            .types
            .values()
            .find(|ty| ty.name.eq_ignore_ascii_case(&key))
            .map(|ty| ty.id);
        match found {
            Some(id) => {
                self.name_cache.put(key, id);
                id
            }
            None => ItemTypeId::UNASSIGNED,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
- id: 2853
  name: bag
  container_capacity: 8
- id: 3031
  name: gold coin
  plural: gold coins
  stackable: true
  stack_limit: 100
- id: 3264
  name: sword
"#;

    #[test]
    fn loads_catalog_from_yaml() {
        let index = ItemTypeIndex::from_yaml(FIXTURE, 16).expect("catalog");
        assert_eq!(index.len(), 3);

        let bag = index.get(ItemTypeId(2853)).expect("bag");
        assert_eq!(bag.container_capacity, Some(8));
        assert!(!bag.stackable);

        let coin = index.get(ItemTypeId(3031)).expect("coin");
        assert!(coin.stackable);
        assert_eq!(coin.stack_limit, 100);
        assert_eq!(coin.plural.as_deref(), Some("gold coins"));
    }

    #[test]
    fn duplicate_type_id_is_a_load_error() {
        let content = "- id: 5\n  name: apple\n- id: 5\n  name: pear\n";
        let err = ItemTypeIndex::from_yaml(content, 16).expect_err("duplicate");
        assert!(matches!(err, CatalogError::DuplicateType(ItemTypeId(5))));
    }

    #[test]
    fn type_id_zero_is_rejected() {
        let content = "- id: 0\n  name: void\n";
        let err = ItemTypeIndex::from_yaml(content, 16).expect_err("reserved");
        assert!(matches!(err, CatalogError::ReservedTypeId));
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let mut index = ItemTypeIndex::from_yaml(FIXTURE, 16).expect("catalog");
        assert_eq!(index.id_by_name("Gold Coin"), ItemTypeId(3031));
        assert_eq!(index.id_by_name("gold coin"), ItemTypeId(3031));
        // repeated lookup served from the cache
        assert_eq!(index.id_by_name("gold coin"), ItemTypeId(3031));
    }

    #[test]
    fn unknown_name_yields_unassigned_id() {
        let mut index = ItemTypeIndex::from_yaml(FIXTURE, 16).expect("catalog");
        assert_eq!(index.id_by_name("crystal wand"), ItemTypeId::UNASSIGNED);
        assert_eq!(index.id_by_name(""), ItemTypeId::UNASSIGNED);
        assert!(!index.id_by_name("crystal wand").is_assigned());
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "tibia-items-catalog-missing-{}.yaml",
            std::process::id()
        ));
        let err = ItemTypeIndex::load(&path, 16).expect_err("missing file");
        assert!(matches!(err, CatalogError::Read(_, _)));
    }

    #[test]
    fn load_reads_catalog_file() {
        let path = std::env::temp_dir().join(format!(
            "tibia-items-catalog-{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, FIXTURE).expect("write fixture");

        let index = ItemTypeIndex::load(&path, 16).expect("catalog");
        assert_eq!(index.len(), 3);
    }
}
