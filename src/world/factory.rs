use crate::entities::item::{Item, ItemRef, ItemTypeId};
use crate::world::catalog::ItemTypeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCreateError {
    UnknownType(ItemTypeId),
}

impl std::fmt::Display for ItemCreateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemCreateError::UnknownType(id) => write!(f, "unknown item type {}", id.0),
        }
    }
}

impl std::error::Error for ItemCreateError {}

/// Constructs a fresh, parentless item from catalog metadata. Stackable
/// counts are clamped to `[1, stack_limit]`; container capability is granted
/// when the type defines a capacity. Nothing is constructed on a catalog
/// miss.
pub fn create_item(
    catalog: &ItemTypeIndex,
    type_id: ItemTypeId,
    count: u16,
) -> Result<ItemRef, ItemCreateError> {
    let ty = catalog
        .get(type_id)
        .ok_or(ItemCreateError::UnknownType(type_id))?;

    let count = if ty.stackable {
        count.clamp(1, ty.stack_limit)
    } else {
        count.max(1)
    };

    let mut item = Item::new(type_id, count);
    item.stackable = ty.stackable;
    if let Some(capacity) = ty.container_capacity {
        item.promote_to_container(capacity);
    }
    Ok(item.into_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::catalog::ItemType;

    fn catalog() -> ItemTypeIndex {
        let mut index = ItemTypeIndex::new(16);
        index
            .insert(ItemType {
                id: ItemTypeId(2853),
                name: "bag".to_string(),
                plural: None,
                stackable: false,
                stack_limit: 1,
                container_capacity: Some(8),
            })
            .expect("bag type");
        index
            .insert(ItemType {
                id: ItemTypeId(3031),
                name: "gold coin".to_string(),
                plural: Some("gold coins".to_string()),
                stackable: true,
                stack_limit: 100,
                container_capacity: None,
            })
            .expect("coin type");
        index
    }

    #[test]
    fn unknown_type_constructs_nothing() {
        let catalog = catalog();
        let err = create_item(&catalog, ItemTypeId(9999), 1).expect_err("unknown type");
        assert_eq!(err, ItemCreateError::UnknownType(ItemTypeId(9999)));
    }

    #[test]
    fn stackable_count_is_clamped_to_stack_limit() {
        let catalog = catalog();
        let coins = create_item(&catalog, ItemTypeId(3031), 250).expect("coins");
        assert_eq!(coins.borrow().count, 100);
        assert!(coins.borrow().stackable);

        let minimum = create_item(&catalog, ItemTypeId(3031), 0).expect("coins");
        assert_eq!(minimum.borrow().count, 1);
    }

    #[test]
    fn container_types_gain_capability() {
        let catalog = catalog();
        let bag = create_item(&catalog, ItemTypeId(2853), 1).expect("bag");
        let item = bag.borrow();
        let state = item.as_container().expect("container capability");
        assert_eq!(state.capacity(), 8);
        assert!(!item.has_parent());
    }
}
