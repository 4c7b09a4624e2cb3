//! The handle-resolution boundary: every container operation a script can
//! reach, addressed by registry UID. Queries answer `None` for a handle that
//! does not resolve to a container; mutations return structured errors and
//! report script misuse to the error log.

use crate::entities::item::{ItemRef, ItemTypeId};
use crate::scripting::env::{ScriptEnv, ScriptUid};
use crate::telemetry::logging;
use crate::world::catalog::ItemTypeIndex;
use crate::world::description::content_description;
use crate::world::factory::{create_item, ItemCreateError};
use crate::world::insertion::{place, Placed, PlacementError, PlacementFlags, SlotIndex};
use crate::world::rewards::register_reward;
use crate::WorldContext;

/// Scripts address item types by catalog id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemIdent {
    Id(ItemTypeId),
    Name(String),
}

impl ItemIdent {
    fn resolve(&self, catalog: &mut ItemTypeIndex) -> ItemTypeId {
        match self {
            ItemIdent::Id(id) => *id,
            ItemIdent::Name(name) => catalog.id_by_name(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddItemError {
    ContainerNotFound,
    UnknownItemName(String),
    UnknownType(ItemTypeId),
    AlreadyOwned,
    Rejected(PlacementError),
}

impl std::fmt::Display for AddItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddItemError::ContainerNotFound => write!(f, "container handle does not resolve"),
            AddItemError::UnknownItemName(name) => write!(f, "unknown item name '{}'", name),
            AddItemError::UnknownType(id) => write!(f, "unknown item type {}", id.0),
            AddItemError::AlreadyOwned => write!(f, "item already has a parent"),
            AddItemError::Rejected(reason) => write!(f, "placement rejected: {}", reason),
        }
    }
}

impl std::error::Error for AddItemError {}

pub fn container_size(env: &ScriptEnv, uid: ScriptUid) -> Option<usize> {
    let container = env.container_by_uid(uid)?;
    let item = container.borrow();
    item.as_container().map(|state| state.size())
}

pub fn container_capacity(env: &ScriptEnv, uid: ScriptUid) -> Option<u16> {
    let container = env.container_by_uid(uid)?;
    let item = container.borrow();
    item.as_container().map(|state| state.capacity())
}

pub fn container_empty_slots(env: &ScriptEnv, uid: ScriptUid, recursive: bool) -> Option<u32> {
    let container = env.container_by_uid(uid)?;
    let item = container.borrow();
    item.as_container().map(|state| state.empty_slots(recursive))
}

pub fn container_item_holding_count(env: &ScriptEnv, uid: ScriptUid) -> Option<u32> {
    let container = env.container_by_uid(uid)?;
    let item = container.borrow();
    item.as_container().map(|state| state.item_holding_count())
}

pub fn container_item_by_index(env: &ScriptEnv, uid: ScriptUid, index: usize) -> Option<ItemRef> {
    let container = env.container_by_uid(uid)?;
    let item = container.borrow();
    item.as_container().and_then(|state| state.item_by_index(index))
}

pub fn container_has_item(env: &ScriptEnv, uid: ScriptUid, item: &ItemRef) -> Option<bool> {
    let container = env.container_by_uid(uid)?;
    let holder = container.borrow();
    holder.as_container().map(|state| state.is_holding_item(item))
}

pub fn container_item_count_by_id(
    env: &ScriptEnv,
    ctx: &mut WorldContext,
    uid: ScriptUid,
    ident: ItemIdent,
    sub_type: i32,
) -> Option<u32> {
    let container = env.container_by_uid(uid)?;
    let type_id = ident.resolve(&mut ctx.catalog);
    if !type_id.is_assigned() {
        return None;
    }
    let item = container.borrow();
    item.as_container()
        .map(|state| state.item_type_count(type_id, sub_type))
}

pub fn container_content_description(
    env: &ScriptEnv,
    ctx: &WorldContext,
    uid: ScriptUid,
    compact: bool,
) -> Option<String> {
    let container = env.container_by_uid(uid)?;
    let item = container.borrow();
    item.as_container()
        .map(|state| content_description(state, &ctx.catalog, compact))
}

pub fn container_items(env: &ScriptEnv, uid: ScriptUid, recursive: bool) -> Option<Vec<ItemRef>> {
    let container = env.container_by_uid(uid)?;
    let item = container.borrow();
    item.as_container().map(|state| state.items(recursive))
}

pub fn container_corpse_owner(env: &ScriptEnv, uid: ScriptUid) -> Option<u32> {
    let container = env.container_by_uid(uid)?;
    let owner = container.borrow().owner();
    Some(owner)
}

/// The registry-owned creation pathway: builds a parentless item and hands
/// the script a handle to it. The registry becomes the sole strong owner.
pub fn game_create_item(
    env: &mut ScriptEnv,
    ctx: &mut WorldContext,
    ident: ItemIdent,
    count: u16,
) -> Result<(ScriptUid, ItemRef), AddItemError> {
    let type_id = resolve_ident(ctx, &ident)?;
    let item = create_item(&ctx.catalog, type_id, count).map_err(|err| match err {
        ItemCreateError::UnknownType(id) => AddItemError::UnknownType(id),
    })?;
    let uid = env.add_temp_item(&item);
    Ok((uid, item))
}

/// Creates an item and places it into the container in one step. A full
/// merge returns the absorbing stack; any other success returns the new
/// item. On rejection nothing was attached and the fresh item is dropped.
pub fn container_add_item(
    env: &ScriptEnv,
    ctx: &mut WorldContext,
    uid: ScriptUid,
    ident: ItemIdent,
    count: u16,
    index: SlotIndex,
    flags: PlacementFlags,
) -> Result<ItemRef, AddItemError> {
    let Some(container) = env.container_by_uid(uid) else {
        return Err(AddItemError::ContainerNotFound);
    };
    let type_id = resolve_ident(ctx, &ident)?;
    let item = create_item(&ctx.catalog, type_id, count).map_err(|err| match err {
        ItemCreateError::UnknownType(id) => AddItemError::UnknownType(id),
    })?;
    match place(&ctx.catalog, &container, &item, index, flags) {
        Ok(Placed::Merged { into }) => Ok(into),
        Ok(_) => Ok(item),
        Err(err) => {
            logging::log_error(&format!("cannot add item to container: {}", err));
            Err(AddItemError::Rejected(err))
        }
    }
}

/// Commits a registry-owned item into a container: placement through the
/// insertion authority, then release of the temporary entry. On failure the
/// entry and the item's parentlessness are both unchanged.
pub fn container_add_item_ex(
    env: &mut ScriptEnv,
    ctx: &WorldContext,
    uid: ScriptUid,
    item: &ItemRef,
    index: SlotIndex,
    flags: PlacementFlags,
) -> Result<(), AddItemError> {
    let Some(container) = env.container_by_uid(uid) else {
        return Err(AddItemError::ContainerNotFound);
    };
    if item.borrow().has_parent() {
        logging::log_error("cannot add item to container: item already has a parent");
        return Err(AddItemError::AlreadyOwned);
    }
    match place(&ctx.catalog, &container, item, index, flags) {
        Ok(_) => {
            env.remove_temp_item(item);
            Ok(())
        }
        Err(err) => {
            logging::log_error(&format!("cannot add item to container: {}", err));
            Err(AddItemError::Rejected(err))
        }
    }
}

pub fn container_register_reward(
    env: &ScriptEnv,
    ctx: &WorldContext,
    uid: ScriptUid,
) -> Option<ItemRef> {
    let container = env.container_by_uid(uid)?;
    match register_reward(&container, &ctx.catalog, ctx.reward_container_type()) {
        Ok(marker) => Some(marker),
        Err(err) => {
            logging::log_error(&format!("register reward failed: {}", err));
            None
        }
    }
}

fn resolve_ident(ctx: &mut WorldContext, ident: &ItemIdent) -> Result<ItemTypeId, AddItemError> {
    let type_id = ident.resolve(&mut ctx.catalog);
    if type_id.is_assigned() {
        return Ok(type_id);
    }
    match ident {
        ItemIdent::Name(name) => {
            logging::log_error(&format!("unknown item name '{}'", name));
            Err(AddItemError::UnknownItemName(name.clone()))
        }
        ItemIdent::Id(id) => Err(AddItemError::UnknownType(*id)),
    }
}
