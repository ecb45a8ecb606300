//! In-process host: a complete `Host` kept in memory, loadable from a JSON snapshot.
//!
//! Records focus changes, settles, executions and search openings as
//! `HostEvent`s so callers can observe ordering.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::trace;

use crate::error::HostError;
use crate::host::{AppMenu, CommandHandler, Host, KeyBinding, MenuPosition, Platform};
use crate::search::SearchMode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    Settled,
    Focused(String),
    Executed(String),
    SearchBegun(String),
}

/// One registry entry as written in a snapshot.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommandSpec {
    pub id: String,
    pub name: Option<String>,
    pub keys: Vec<KeyBinding>,
    pub menus: Vec<AppMenu>,
    pub context_menus: Vec<String>,
    /// Execution fails with this reason.
    pub fails: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct HostSnapshot {
    /// Defaults to the platform this binary runs on.
    pub platform: Option<Platform>,
    pub commands: Vec<CommandSpec>,
    pub editors: Vec<String>,
    pub focused: Option<String>,
}

struct Registered {
    id: String,
    name: Option<String>,
    fails: Option<String>,
    handler: Option<Rc<dyn Fn()>>,
}

#[derive(Default)]
pub struct MemoryHost {
    commands: RefCell<Vec<Registered>>,
    bindings: RefCell<HashMap<String, Vec<KeyBinding>>>,
    menus: RefCell<HashMap<AppMenu, Vec<String>>>,
    context_menus: RefCell<HashMap<String, Vec<String>>>,
    editors: RefCell<Vec<String>>,
    focused: RefCell<Option<String>>,
    modes: RefCell<Vec<Weak<dyn SearchMode>>>,
    events: RefCell<Vec<HostEvent>>,
    list_calls: Cell<usize>,
    platform: Cell<Platform>,
}

impl MemoryHost {
    /// Empty registry with every top-level menu present.
    pub fn new() -> Self {
        let host = Self::default();
        host.menus.borrow_mut().extend(AppMenu::ALL.iter().map(|&m| (m, Vec::new())));
        host
    }

    pub fn from_snapshot(snapshot: HostSnapshot) -> Self {
        let host = Self::new();
        if let Some(platform) = snapshot.platform {
            host.set_platform(platform);
        }
        for spec in snapshot.commands {
            host.add_command(&spec.id, spec.name.as_deref());
            for key in spec.keys {
                host.bind_key(&spec.id, key);
            }
            for menu in spec.menus {
                host.add_to_menu(menu, &spec.id);
            }
            for menu in &spec.context_menus {
                host.add_to_context_menu(menu, &spec.id);
            }
            if let Some(reason) = spec.fails {
                host.fail_command(&spec.id, &reason);
            }
        }
        for editor in &snapshot.editors {
            host.add_editor(editor);
        }
        if let Some(editor) = &snapshot.focused {
            host.focus(editor);
        }
        host
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let snapshot: HostSnapshot = serde_json::from_str(text).context("invalid host snapshot")?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn add_command(&self, id: &str, name: Option<&str>) {
        self.commands.borrow_mut().push(Registered {
            id: id.to_string(),
            name: name.map(str::to_string),
            fails: None,
            handler: None,
        });
    }

    pub fn fail_command(&self, id: &str, reason: &str) {
        if let Some(cmd) = self.commands.borrow_mut().iter_mut().find(|c| c.id == id) {
            cmd.fails = Some(reason.to_string());
        }
    }

    /// Only affects bindings added afterwards.
    pub fn set_platform(&self, platform: Platform) {
        self.platform.set(platform);
    }

    pub fn platform(&self) -> Platform {
        self.platform.get()
    }

    /// Bindings meant for another platform are dropped.
    pub fn bind_key(&self, id: &str, binding: KeyBinding) {
        if !binding.applies_to(self.platform.get()) {
            trace!(%id, key = %binding.key, "skipping binding for another platform");
            return;
        }
        self.bindings.borrow_mut().entry(id.to_string()).or_default().push(binding);
    }

    /// No-op if the menu has been removed.
    pub fn add_to_menu(&self, menu: AppMenu, id: &str) {
        if let Some(items) = self.menus.borrow_mut().get_mut(&menu) {
            items.push(id.to_string());
        }
    }

    pub fn add_to_context_menu(&self, menu: &str, id: &str) {
        self.context_menus
            .borrow_mut()
            .entry(menu.to_string())
            .or_default()
            .push(id.to_string());
    }

    pub fn remove_menu(&self, menu: AppMenu) {
        self.menus.borrow_mut().remove(&menu);
    }

    pub fn menu_items(&self, menu: AppMenu) -> Vec<String> {
        self.menus.borrow().get(&menu).cloned().unwrap_or_default()
    }

    pub fn add_editor(&self, editor: &str) {
        self.editors.borrow_mut().push(editor.to_string());
    }

    pub fn close_editor(&self, editor: &str) {
        self.editors.borrow_mut().retain(|e| e != editor);
        let mut focused = self.focused.borrow_mut();
        if focused.as_deref() == Some(editor) {
            *focused = None;
        }
    }

    /// Move focus without recording an event, as a user click would.
    pub fn focus(&self, editor: &str) {
        if self.editors.borrow().iter().any(|e| e == editor) {
            *self.focused.borrow_mut() = Some(editor.to_string());
        }
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    pub fn take_events(&self) -> Vec<HostEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// How many times the registry has been enumerated.
    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    /// First live search mode that accepts `query`, as a quick-open dispatcher picks one.
    pub fn mode_for(&self, query: &str) -> Option<Rc<dyn SearchMode>> {
        self.modes
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .find(|mode| mode.matches(query))
    }

    fn record(&self, event: HostEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Host for MemoryHost {
    type Editor = String;

    fn list_commands(&self) -> Vec<String> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.commands.borrow().iter().map(|c| c.id.clone()).collect()
    }

    fn command_name(&self, id: &str) -> Option<String> {
        self.commands.borrow().iter().find(|c| c.id == id).and_then(|c| c.name.clone())
    }

    fn execute(&self, id: &str) -> Result<(), HostError> {
        let (handler, fails) = {
            let commands = self.commands.borrow();
            let cmd = commands
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| HostError::CommandNotFound(id.to_string()))?;
            (cmd.handler.clone(), cmd.fails.clone())
        };
        if let Some(reason) = fails {
            return Err(HostError::ExecutionFailed { id: id.to_string(), reason });
        }
        self.record(HostEvent::Executed(id.to_string()));
        if let Some(handler) = handler {
            handler();
        }
        Ok(())
    }

    fn register_command(&self, id: &str, name: &str, handler: CommandHandler) {
        let mut commands = self.commands.borrow_mut();
        commands.retain(|c| c.id != id);
        commands.push(Registered {
            id: id.to_string(),
            name: Some(name.to_string()),
            fails: None,
            handler: Some(Rc::from(handler)),
        });
    }

    fn keybindings_for(&self, id: &str) -> Vec<KeyBinding> {
        self.bindings.borrow().get(id).cloned().unwrap_or_default()
    }

    fn format_key_descriptor(&self, descriptor: &str) -> String {
        descriptor.to_string()
    }

    fn menu_item_exists(&self, menu: AppMenu, id: &str) -> bool {
        self.menus
            .borrow()
            .get(&menu)
            .is_some_and(|items| items.iter().any(|item| item == id))
    }

    fn add_menu_divider(&self, menu: AppMenu, _position: MenuPosition) -> Result<(), HostError> {
        if self.menus.borrow().contains_key(&menu) {
            Ok(())
        } else {
            Err(HostError::MenuNotFound(menu))
        }
    }

    fn add_menu_item(
        &self,
        menu: AppMenu,
        id: &str,
        bindings: &[KeyBinding],
        position: MenuPosition,
    ) -> Result<(), HostError> {
        {
            let mut menus = self.menus.borrow_mut();
            let items = menus.get_mut(&menu).ok_or(HostError::MenuNotFound(menu))?;
            match position {
                MenuPosition::First => items.insert(0, id.to_string()),
                MenuPosition::Last => items.push(id.to_string()),
            }
        }
        for binding in bindings {
            self.bind_key(id, binding.clone());
        }
        Ok(())
    }

    fn focused_editor(&self) -> Option<String> {
        self.focused.borrow().clone()
    }

    fn set_focus(&self, editor: &String) -> bool {
        if !self.editors.borrow().contains(editor) {
            return false;
        }
        *self.focused.borrow_mut() = Some(editor.clone());
        self.record(HostEvent::Focused(editor.clone()));
        true
    }

    fn add_search_mode(&self, mode: Weak<dyn SearchMode>) {
        self.modes.borrow_mut().push(mode);
    }

    fn begin_search(&self, prefix: &str) {
        self.record(HostEvent::SearchBegun(prefix.to_string()));
    }

    async fn settle(&self) {
        self.record(HostEvent::Settled);
        tokio::task::yield_now().await;
    }
}
