use crate::entities::item::{ItemAttribute, ItemRef, ItemTypeId};
use crate::world::catalog::ItemTypeIndex;
use crate::world::factory::{create_item, ItemCreateError};
use crate::world::insertion::internal_add_thing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardError {
    NotAContainer,
    UnknownRewardType(ItemTypeId),
}

impl std::fmt::Display for RewardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewardError::NotAContainer => write!(f, "reward target is not a container"),
            RewardError::UnknownRewardType(id) => {
                write!(f, "reward container type {} is not in the catalog", id.0)
            }
        }
    }
}

impl std::error::Error for RewardError {}

/// Creates a reward marker inside `corpse`: both objects are stamped with a
/// shared timestamp-derived correlation id, the marker is attached
/// structurally (no capacity or placement checks), and the corpse is flagged
/// as a reward corpse. Returns the marker.
///
/// Not idempotent: a second call creates a second marker and restamps the
/// correlation id. Callers must invoke this at most once per corpse.
pub fn register_reward(
    corpse: &ItemRef,
    catalog: &ItemTypeIndex,
    reward_type: ItemTypeId,
) -> Result<ItemRef, RewardError> {
    if !corpse.borrow().is_container() {
        return Err(RewardError::NotAContainer);
    }
    let marker = create_item(catalog, reward_type, 1).map_err(|err| match err {
        ItemCreateError::UnknownType(id) => RewardError::UnknownRewardType(id),
    })?;

    let reward_id = unix_time_ms();
    marker
        .borrow_mut()
        .set_attribute(ItemAttribute::Date(reward_id));
    corpse
        .borrow_mut()
        .set_attribute(ItemAttribute::Date(reward_id));

    internal_add_thing(corpse, &marker).map_err(|_| RewardError::NotAContainer)?;
    if let Some(state) = corpse.borrow_mut().as_container_mut() {
        state.set_reward_corpse();
    }
    Ok(marker)
}

fn unix_time_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
