//! Selection executor: restore focus to the original editor, then run the command.
//!
//! Many commands read the "current editor" (cursor, selection). Focus moves
//! made by the search UI teardown and by `set_focus` only land after the
//! host's event loop has turned, so the command runs after two settles.

use std::cell::RefCell;

use tracing::{debug, warn};

use crate::error::HostError;
use crate::host::Host;

/// One-shot record of the editor to refocus before executing.
#[derive(Debug)]
pub struct PendingFocus<E> {
    slot: RefCell<Option<E>>,
}

impl<E> Default for PendingFocus<E> {
    fn default() -> Self {
        Self { slot: RefCell::new(None) }
    }
}

impl<E> PendingFocus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any stale target.
    pub fn capture(&self, editor: Option<E>) {
        *self.slot.borrow_mut() = editor;
    }

    pub fn take(&self) -> Option<E> {
        self.slot.borrow_mut().take()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

/// Settle, refocus the pending editor, settle again, then execute `id`.
///
/// The host's execution error is returned as is.
pub async fn execute_selection<H: Host>(
    host: &H,
    pending: &PendingFocus<H::Editor>,
    id: &str,
) -> Result<(), HostError> {
    host.settle().await;

    if let Some(editor) = pending.take() {
        if host.set_focus(&editor) {
            debug!(?editor, "restored focus");
        } else {
            debug!(?editor, "focus target is gone, running against current focus");
        }
    }

    host.settle().await;

    let result = host.execute(id);
    if let Err(err) = &result {
        warn!(%id, %err, "command execution failed");
    }
    result
}
