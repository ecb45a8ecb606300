//! Host editor capabilities: command registry, keybindings, menus, focus, search UI.

pub mod memory;

use std::fmt::Debug;
use std::future::Future;
use std::rc::Weak;

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::search::SearchMode;

/// Top-level menu bar menus. Context menus have no variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppMenu {
    File,
    Edit,
    Find,
    View,
    Navigate,
    Debug,
    Help,
}

impl AppMenu {
    pub const ALL: [AppMenu; 7] = [
        AppMenu::File,
        AppMenu::Edit,
        AppMenu::Find,
        AppMenu::View,
        AppMenu::Navigate,
        AppMenu::Debug,
        AppMenu::Help,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Win,
    Mac,
    Linux,
}

impl Default for Platform {
    fn default() -> Self {
        Platform::current()
    }
}

impl Platform {
    /// Platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else if cfg!(target_os = "windows") {
            Platform::Win
        } else {
            Platform::Linux
        }
    }
}

/// A keyboard shortcut as registered with the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

impl KeyBinding {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), display_key: None, platform: None }
    }

    pub fn with_display(mut self, display_key: impl Into<String>) -> Self {
        self.display_key = Some(display_key.into());
        self
    }

    pub fn on(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Bindings without a platform apply everywhere.
    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platform.map_or(true, |p| p == platform)
    }

    /// Descriptor to show the user: `display_key` if set, else `key`.
    pub fn display(&self) -> &str {
        self.display_key.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuPosition {
    First,
    Last,
}

/// Callback run when a registered command executes.
pub type CommandHandler = Box<dyn Fn()>;

/// Services the command search mode consumes from its host editor.
///
/// All methods are called from the host's UI thread. Implementations are
/// expected to use interior mutability.
pub trait Host {
    /// Handle to an editor that can receive input focus.
    type Editor: Clone + Debug + 'static;

    // Command registry

    fn list_commands(&self) -> Vec<String>;

    /// Display name, or `None` for internal-only registrations.
    fn command_name(&self, id: &str) -> Option<String>;

    fn execute(&self, id: &str) -> Result<(), HostError>;

    fn register_command(&self, id: &str, name: &str, handler: CommandHandler);

    // Keybindings

    fn keybindings_for(&self, id: &str) -> Vec<KeyBinding>;

    /// Human-readable form of a key descriptor, e.g. `Ctrl-Alt-?`.
    fn format_key_descriptor(&self, descriptor: &str) -> String;

    // Menus

    /// False when the menu cannot be resolved or holds no item for `id`.
    fn menu_item_exists(&self, menu: AppMenu, id: &str) -> bool;

    fn add_menu_divider(&self, menu: AppMenu, position: MenuPosition) -> Result<(), HostError>;

    fn add_menu_item(
        &self,
        menu: AppMenu,
        id: &str,
        bindings: &[KeyBinding],
        position: MenuPosition,
    ) -> Result<(), HostError>;

    // Focus

    fn focused_editor(&self) -> Option<Self::Editor>;

    /// Returns false if the editor no longer exists.
    fn set_focus(&self, editor: &Self::Editor) -> bool;

    // Search UI

    /// The host holds the mode weakly; whoever activated it owns it.
    fn add_search_mode(&self, mode: Weak<dyn SearchMode>);

    fn begin_search(&self, prefix: &str);

    /// Resolves once the event loop has run pending focus and render work.
    fn settle(&self) -> impl Future<Output = ()> {
        tokio::task::yield_now()
    }
}
