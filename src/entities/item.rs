use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::entities::container::ContainerState;
use crate::world::position::Position;

/// Shared handle to an item; the tree and the script registry both hold these.
pub type ItemRef = Rc<RefCell<Item>>;
/// Non-owning back-reference, used for parent links only.
pub type ItemWeak = Weak<RefCell<Item>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub u32);

static NEXT_ITEM_ID: AtomicU32 = AtomicU32::new(1);

impl ItemId {
    pub fn next() -> Self {
        let id = NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed);
        ItemId(id)
    }

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

/// Catalog key; 0 is the unassigned/lookup-miss sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemTypeId(pub u16);

impl ItemTypeId {
    pub const UNASSIGNED: ItemTypeId = ItemTypeId(0);

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAttribute {
    /// Timestamp tag, shared between a reward corpse and its marker.
    Date(i64),
    /// Corpse owner creature id.
    Owner(u32),
    Charges(u16),
    Text(String),
}

/// The slot currently holding an item. Never an owning edge; ownership flows
/// Container -> children only.
#[derive(Debug, Clone, Default)]
pub enum Parent {
    #[default]
    None,
    Container(ItemWeak),
    Tile(Position),
}

#[derive(Debug)]
pub struct Item {
    pub id: ItemId,
    pub type_id: ItemTypeId,
    pub count: u16,
    pub stackable: bool,
    pub attributes: Vec<ItemAttribute>,
    parent: Parent,
    container: Option<ContainerState>,
}

impl Item {
    pub fn new(type_id: ItemTypeId, count: u16) -> Self {
        Self {
            id: ItemId::next(),
            type_id,
            count,
            stackable: false,
            attributes: Vec::new(),
            parent: Parent::None,
            container: None,
        }
    }

    pub fn into_ref(self) -> ItemRef {
        Rc::new(RefCell::new(self))
    }

    /// Grants container capability. A no-op if the item already has it.
    pub fn promote_to_container(&mut self, capacity: u16) {
        if self.container.is_none() {
            self.container = Some(ContainerState::new(capacity));
        }
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    pub fn as_container(&self) -> Option<&ContainerState> {
        self.container.as_ref()
    }

    pub fn as_container_mut(&mut self) -> Option<&mut ContainerState> {
        self.container.as_mut()
    }

    pub fn parent(&self) -> &Parent {
        &self.parent
    }

    pub fn has_parent(&self) -> bool {
        !matches!(self.parent, Parent::None)
    }

    pub fn parent_container(&self) -> Option<ItemRef> {
        match &self.parent {
            Parent::Container(weak) => weak.upgrade(),
            _ => None,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Parent) {
        self.parent = parent;
    }

    /// Replaces any existing attribute of the same variant.
    pub fn set_attribute(&mut self, attribute: ItemAttribute) {
        let tag = std::mem::discriminant(&attribute);
        self.attributes
            .retain(|attr| std::mem::discriminant(attr) != tag);
        self.attributes.push(attribute);
    }

    pub fn date(&self) -> Option<i64> {
        self.attributes.iter().find_map(|attr| match attr {
            ItemAttribute::Date(value) => Some(*value),
            _ => None,
        })
    }

    /// Corpse owner creature id, 0 when unset.
    pub fn owner(&self) -> u32 {
        self.attributes
            .iter()
            .find_map(|attr| match attr {
                ItemAttribute::Owner(value) => Some(*value),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Stack quantity this item represents: `count` units for a stackable
    /// item, one unit otherwise.
    pub fn units(&self) -> u32 {
        if self.stackable {
            u32::from(self.count)
        } else {
            1
        }
    }
}
