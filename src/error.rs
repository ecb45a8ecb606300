//! Errors surfaced by host capabilities.

use thiserror::Error;

use crate::host::AppMenu;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("menu not found: {0:?}")]
    MenuNotFound(AppMenu),

    #[error("command {id} failed: {reason}")]
    ExecutionFailed { id: String, reason: String },
}
