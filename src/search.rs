//! The command search mode and its registration with the host.

use std::rc::{Rc, Weak};

use ratatui::text::Line;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::catalog::CatalogCache;
use crate::config::PaletteConfig;
use crate::error::HostError;
use crate::executor::{execute_selection, PendingFocus};
use crate::host::{Host, MenuPosition};
use crate::matcher::{rank, strip_trigger, StringMatcher};
use crate::state::{Catalog, MatchResult};
use crate::ui;

/// Handle to a running selection; resolves with the host's execution result.
pub type Selection = JoinHandle<Result<(), HostError>>;

/// A provider the host's quick-open dispatcher routes queries to.
pub trait SearchMode {
    fn name(&self) -> &str;

    /// Whether this mode wants to handle `query`.
    fn matches(&self, query: &str) -> bool;

    fn search(&self, query: &str) -> Vec<MatchResult>;

    fn item_focus(&self, _item: &MatchResult) {}

    /// Must be called inside a `tokio::task::LocalSet`.
    fn item_select(&self, item: &MatchResult) -> Selection;

    fn format_result(&self, item: &MatchResult, query: &str, width: u16) -> Line<'static>;

    /// Search UI closed. The catalog stays cached for the next search.
    fn done(&self) {}
}

/// Searches host commands behind a trigger character and runs the pick.
pub struct CommandSearch<H: Host> {
    host: Rc<H>,
    config: PaletteConfig,
    catalog: CatalogCache,
    pending: Rc<PendingFocus<H::Editor>>,
    matcher: Box<dyn StringMatcher>,
}

impl<H: Host + 'static> CommandSearch<H> {
    pub fn new(host: Rc<H>, config: PaletteConfig) -> Self {
        let matcher = config.matcher.build();
        Self {
            host,
            config,
            catalog: CatalogCache::new(),
            pending: Rc::new(PendingFocus::new()),
            matcher,
        }
    }

    pub fn with_matcher(mut self, matcher: Box<dyn StringMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    pub fn ensure_catalog(&self) -> Rc<Catalog> {
        self.catalog.ensure(self.host.as_ref())
    }

    pub fn invalidate_catalog(&self) {
        self.catalog.invalidate();
    }

    /// Remember the focused editor before the search UI takes focus.
    pub fn search_opened(&self) {
        let editor = self.host.focused_editor();
        debug!(?editor, "command search opened");
        self.pending.capture(editor);
    }

    /// Open the host search UI in this mode.
    pub fn begin(&self) {
        self.search_opened();
        self.host.begin_search(&self.config.trigger.to_string());
    }

    pub fn has_pending_focus(&self) -> bool {
        self.pending.is_pending()
    }

    /// Spawn the restore-focus-then-execute sequence for `id` on the local set.
    ///
    /// Panics when called outside a `tokio::task::LocalSet`.
    pub fn select(&self, id: &str) -> Selection {
        let host = Rc::clone(&self.host);
        let pending = Rc::clone(&self.pending);
        let id = id.to_string();
        tokio::task::spawn_local(async move { execute_selection(&*host, &*pending, &id).await })
    }
}

impl<H: Host + 'static> SearchMode for CommandSearch<H> {
    fn name(&self) -> &str {
        "Commands"
    }

    fn matches(&self, query: &str) -> bool {
        query.starts_with(self.config.trigger)
    }

    fn search(&self, query: &str) -> Vec<MatchResult> {
        let catalog = self.ensure_catalog();
        let filter = strip_trigger(query, self.config.trigger).unwrap_or(query);
        let results = rank(catalog.entries(), filter, self.matcher.as_ref());
        debug!(filter, results = results.len(), "command search");
        results
    }

    fn item_select(&self, item: &MatchResult) -> Selection {
        self.select(&item.id)
    }

    fn format_result(&self, item: &MatchResult, _query: &str, width: u16) -> Line<'static> {
        ui::format_result(self.host.as_ref(), item, width)
    }
}

/// Register the search mode, its "open" command and its menu item with `host`.
///
/// The returned handle owns the mode; dropping it deactivates the mode.
///
/// Selections run on `tokio::task::spawn_local`, so the host must call
/// `item_select` from within a `tokio::task::LocalSet`; outside one it panics.
pub fn activate<H: Host + 'static>(
    host: Rc<H>,
    config: PaletteConfig,
) -> Result<Rc<CommandSearch<H>>, HostError> {
    let search = Rc::new(CommandSearch::new(Rc::clone(&host), config));
    host.add_search_mode(Rc::downgrade(&search) as Weak<dyn SearchMode>);

    let weak = Rc::downgrade(&search);
    let config = search.config();
    host.register_command(
        &config.command_id,
        &config.command_name,
        Box::new(move || {
            if let Some(search) = weak.upgrade() {
                search.begin();
            }
        }),
    );

    host.add_menu_divider(config.menu, MenuPosition::First)?;
    host.add_menu_item(config.menu, &config.command_id, &config.bindings, MenuPosition::First)?;
    debug!(command = %config.command_id, trigger = %config.trigger, "command search activated");
    Ok(search)
}
