use std::rc::Rc;

use crate::entities::item::{ItemRef, Parent};
use crate::world::catalog::{ItemTypeIndex, DEFAULT_STACK_LIMIT};

/// Target slot for a placement: a specific direct-child position, or any
/// available slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotIndex {
    Anywhere,
    At(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementFlags {
    /// Skip the free-slot check, allowing a container to exceed capacity.
    pub ignore_capacity: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    InvalidTarget,
    ItemAlreadyOwned,
    RecursiveInsertion,
    StackOverflow,
    CapacityExceeded,
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::InvalidTarget => write!(f, "target is not a container"),
            PlacementError::ItemAlreadyOwned => write!(f, "item already has a parent"),
            PlacementError::RecursiveInsertion => {
                write!(f, "container cannot be placed inside itself")
            }
            PlacementError::StackOverflow => write!(f, "stack size exceeds the type limit"),
            PlacementError::CapacityExceeded => write!(f, "container is full"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// How a successful placement landed.
#[derive(Debug, Clone)]
pub enum Placed {
    /// Attached as a new direct child.
    Attached,
    /// Fully absorbed into an existing stack; the placed item holds no units
    /// afterwards and was not attached.
    Merged { into: ItemRef },
    /// Partially absorbed into an existing stack, remainder attached as a
    /// new child.
    MergedSplit { into: ItemRef },
}

/// The world's single authoritative insertion routine. Checks legality
/// (target capability, ownership, recursion, stacking, capacity) before
/// touching anything, so a rejection leaves both the tree and the item
/// exactly as they were.
pub fn place(
    catalog: &ItemTypeIndex,
    container: &ItemRef,
    item: &ItemRef,
    index: SlotIndex,
    flags: PlacementFlags,
) -> Result<Placed, PlacementError> {
    if Rc::ptr_eq(container, item) {
        return Err(PlacementError::RecursiveInsertion);
    }

    enum Plan {
        MergeAll { target: ItemRef, amount: u16 },
        MergeSplit { target: ItemRef, space: u16 },
        Attach,
    }

    let plan = {
        let target = container.borrow();
        let state = target.as_container().ok_or(PlacementError::InvalidTarget)?;
        let incoming = item.borrow();
        if incoming.has_parent() {
            return Err(PlacementError::ItemAlreadyOwned);
        }
        if let Some(subtree) = incoming.as_container() {
            if subtree.is_holding_item(container) {
                return Err(PlacementError::RecursiveInsertion);
            }
        }

        let has_free_slot =
            flags.ignore_capacity || state.size() < usize::from(state.capacity());

        if incoming.stackable {
            let stack_limit = catalog
                .get(incoming.type_id)
                .map(|ty| ty.stack_limit)
                .unwrap_or(DEFAULT_STACK_LIMIT)
                .max(1);
            if incoming.count > stack_limit {
                return Err(PlacementError::StackOverflow);
            }
            let merge_target = state
                .children()
                .iter()
                .find(|child| {
                    let existing = child.borrow();
                    existing.stackable
                        && existing.type_id == incoming.type_id
                        && existing.attributes == incoming.attributes
                        && existing.count < stack_limit
                })
                .cloned();
            match merge_target {
                Some(stack) => {
                    let space = stack_limit - stack.borrow().count;
                    if incoming.count <= space {
                        Plan::MergeAll {
                            target: stack,
                            amount: incoming.count,
                        }
                    } else if has_free_slot {
                        Plan::MergeSplit {
                            target: stack,
                            space,
                        }
                    } else {
                        return Err(PlacementError::CapacityExceeded);
                    }
                }
                None => {
                    if !has_free_slot {
                        return Err(PlacementError::CapacityExceeded);
                    }
                    Plan::Attach
                }
            }
        } else {
            if !has_free_slot {
                return Err(PlacementError::CapacityExceeded);
            }
            Plan::Attach
        }
    };

    match plan {
        Plan::MergeAll { target, amount } => {
            {
                let mut stack = target.borrow_mut();
                stack.count = stack.count.saturating_add(amount);
            }
            item.borrow_mut().count = 0;
            Ok(Placed::Merged { into: target })
        }
        Plan::MergeSplit { target, space } => {
            {
                let mut stack = target.borrow_mut();
                stack.count = stack.count.saturating_add(space);
            }
            item.borrow_mut().count -= space;
            attach(container, item, index)?;
            Ok(Placed::MergedSplit { into: target })
        }
        Plan::Attach => {
            attach(container, item, index)?;
            Ok(Placed::Attached)
        }
    }
}

/// Raw structural insertion: sets the weak parent link and adds the child,
/// bypassing every placement rule. Reward registration is the only caller
/// outside `place` itself.
pub fn internal_add_thing(container: &ItemRef, item: &ItemRef) -> Result<(), PlacementError> {
    attach(container, item, SlotIndex::Anywhere)
}

fn attach(container: &ItemRef, item: &ItemRef, index: SlotIndex) -> Result<(), PlacementError> {
    let weak = Rc::downgrade(container);
    {
        let mut target = container.borrow_mut();
        let state = target
            .as_container_mut()
            .ok_or(PlacementError::InvalidTarget)?;
        match index {
            SlotIndex::Anywhere => state.push_child(Rc::clone(item)),
            SlotIndex::At(position) => state.insert_child(position, Rc::clone(item)),
        }
    }
    item.borrow_mut().set_parent(Parent::Container(weak));
    Ok(())
}
