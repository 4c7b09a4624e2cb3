pub mod config;
pub mod entities;
pub mod scripting;
pub mod telemetry;
pub mod world;

use std::path::Path;

pub use config::{ConfigError, WorldConfig};
pub use entities::container::ContainerState;
pub use entities::item::{Item, ItemAttribute, ItemId, ItemRef, ItemTypeId, ItemWeak, Parent};
pub use scripting::container_api::{AddItemError, ItemIdent};
pub use scripting::env::{ScriptEnv, ScriptUid};
pub use world::catalog::{CatalogError, ItemType, ItemTypeIndex};
pub use world::factory::{create_item, ItemCreateError};
pub use world::insertion::{
    internal_add_thing, place, Placed, PlacementError, PlacementFlags, SlotIndex,
};
pub use world::position::Position;
pub use world::rewards::{register_reward, RewardError};

/// Everything the script operation layer needs, passed explicitly instead of
/// living in process globals.
pub struct WorldContext {
    pub config: WorldConfig,
    pub catalog: ItemTypeIndex,
}

impl WorldContext {
    pub fn new(config: WorldConfig, catalog: ItemTypeIndex) -> Self {
        Self { config, catalog }
    }

    pub fn reward_container_type(&self) -> ItemTypeId {
        ItemTypeId(self.config.reward_container_type)
    }
}

/// Loads a world root: logging, `world.yaml` (defaults when absent), and the
/// item catalog it points at.
pub fn bootstrap(root: &Path) -> Result<WorldContext, String> {
    let config = WorldConfig::load_or_default(&root.join("world.yaml"))
        .map_err(|err| err.to_string())?;
    telemetry::logging::init(root)?;
    let catalog = ItemTypeIndex::load(&root.join(&config.catalog_file), config.name_cache_size)
        .map_err(|err| err.to_string())?;
    telemetry::logging::log_game(&format!("item catalog: {} types", catalog.len()));
    Ok(WorldContext::new(config, catalog))
}
