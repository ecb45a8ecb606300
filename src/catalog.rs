//! Catalog builder: which host commands are safe to run with no arguments.
//!
//! A command qualifies if it has a key binding or sits in a top-level menu.
//! Commands reachable only from context menus are left out since they
//! usually depend on a selection or some other surrounding state.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::host::{AppMenu, Host};
use crate::state::{Catalog, CommandDescriptor};

/// Lazily built catalog, kept until explicitly invalidated.
#[derive(Debug, Default)]
pub struct CatalogCache {
    slot: RefCell<Option<Rc<Catalog>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached catalog, scanning the host only on first use.
    pub fn ensure<H: Host>(&self, host: &H) -> Rc<Catalog> {
        if let Some(catalog) = self.slot.borrow().as_ref() {
            return Rc::clone(catalog);
        }
        let catalog = Rc::new(build_catalog(host));
        *self.slot.borrow_mut() = Some(Rc::clone(&catalog));
        catalog
    }

    pub fn is_built(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Drop the cached catalog; the next `ensure` rescans the host.
    pub fn invalidate(&self) {
        self.slot.borrow_mut().take();
    }
}

/// Scan the host registry. Never fails: unclassifiable commands are skipped.
pub fn build_catalog<H: Host>(host: &H) -> Catalog {
    let ids = host.list_commands();
    let total = ids.len();
    let entries: Vec<CommandDescriptor> = ids
        .into_iter()
        .filter(|id| is_includable(host, id))
        .filter_map(|id| match host.command_name(&id) {
            Some(name) => Some(CommandDescriptor { id, name }),
            None => {
                trace!(%id, "skipping command without a display name");
                None
            }
        })
        .collect();
    debug!(total, included = entries.len(), "built command catalog");
    Catalog::new(entries)
}

fn is_includable<H: Host>(host: &H, id: &str) -> bool {
    !host.keybindings_for(id).is_empty()
        || AppMenu::ALL.iter().any(|&menu| host.menu_item_exists(menu, id))
}
