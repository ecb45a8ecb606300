//! Palette configuration (TOML).

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::host::{AppMenu, KeyBinding, Platform};
use crate::matcher::MatcherKind;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Leading query character that routes input to command search.
    pub trigger: char,
    pub command_id: String,
    pub command_name: String,
    /// Top-level menu that gets the "Search Commands" item.
    pub menu: AppMenu,
    pub bindings: Vec<KeyBinding>,
    pub matcher: MatcherKind,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            trigger: '?',
            command_id: "command_search.open".to_string(),
            command_name: "Search Commands".to_string(),
            menu: AppMenu::Help,
            bindings: vec![
                KeyBinding::new("Ctrl-Alt-/").with_display("Ctrl-Alt-?").on(Platform::Win),
                KeyBinding::new("Ctrl-Cmd-/").with_display("Ctrl-Cmd-?").on(Platform::Mac),
                KeyBinding::new("Ctrl-Alt-/").with_display("Ctrl-Alt-?").on(Platform::Linux),
            ],
            matcher: MatcherKind::Fuzzy,
        }
    }
}

impl PaletteConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: PaletteConfig = toml::from_str(text).context("invalid palette config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("loading {}", path.display()))
    }

    /// The trigger must not be a character other search modes would see as filter text.
    pub fn validate(&self) -> Result<()> {
        if self.trigger.is_alphanumeric() || self.trigger.is_whitespace() {
            bail!("trigger {:?} must be a non-alphanumeric, non-whitespace character", self.trigger);
        }
        if self.command_id.trim().is_empty() {
            bail!("command_id must not be empty");
        }
        Ok(())
    }
}
