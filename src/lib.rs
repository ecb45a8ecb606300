//! Command palette search mode for a host text editor.
//!
//! Typing the trigger character (`?` by default) in the host's quick-open
//! box lists every command that is safe to run without arguments, ranked
//! against the rest of the query. Picking one refocuses the editor that
//! was active when the search opened and then runs the command.

pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod matcher;
pub mod search;
pub mod state;
pub mod ui;

pub use config::PaletteConfig;
pub use error::HostError;
pub use host::Host;
pub use search::{activate, CommandSearch, SearchMode};
pub use state::{Catalog, CommandDescriptor, MatchResult};
