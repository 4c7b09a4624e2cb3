use std::collections::HashMap;
use std::rc::Rc;

use crate::entities::item::ItemRef;
use crate::telemetry::logging;

/// Opaque handle given to the scripting host. Unique for the lifetime of one
/// invocation scope; never reused for a different live object within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptUid(pub u32);

/// Per-invocation registry of temporary objects: items a script created that
/// have no permanent parent yet. The registry is their sole strong owner, so
/// a script can hold a handle across calls and either commit the object into
/// the world (the caller releases the entry) or let the scope end (teardown
/// releases whatever is left).
#[derive(Debug, Default)]
pub struct ScriptEnv {
    temp_items: HashMap<u32, ItemRef>,
    last_uid: u32,
}

impl ScriptEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh handle for a newly constructed, parentless object. The
    /// registry's strong reference keeps it alive even if the caller drops
    /// its own.
    pub fn add_temp_item(&mut self, item: &ItemRef) -> ScriptUid {
        self.last_uid = self.last_uid.saturating_add(1);
        self.temp_items.insert(self.last_uid, Rc::clone(item));
        ScriptUid(self.last_uid)
    }

    pub fn item_by_uid(&self, uid: ScriptUid) -> Option<ItemRef> {
        self.temp_items.get(&uid.0).cloned()
    }

    /// Typed boundary: `None` for an unknown handle or one whose item lacks
    /// container capability.
    pub fn container_by_uid(&self, uid: ScriptUid) -> Option<ItemRef> {
        self.item_by_uid(uid)
            .filter(|item| item.borrow().is_container())
    }

    /// Drops every entry for this object, relinquishing the registry's
    /// strong reference. Called when the object gains a permanent owner.
    /// A no-op when the object has no entry.
    pub fn remove_temp_item(&mut self, item: &ItemRef) {
        self.temp_items.retain(|_, entry| !Rc::ptr_eq(entry, item));
    }

    /// End-of-invocation teardown: releases all remaining entries, letting
    /// unreferenced objects be destroyed. This is the registry's only
    /// implicit cleanup.
    pub fn reset(&mut self) {
        if !self.temp_items.is_empty() {
            logging::log_game(&format!(
                "script scope released {} unclaimed temporary items",
                self.temp_items.len()
            ));
        }
        self.temp_items.clear();
    }

    pub fn len(&self) -> usize {
        self.temp_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temp_items.is_empty()
    }
}
