//! Config - typed option store
//!
//! Options are registered with a default; values keep the type of their
//! default. Changes made through [`Gui`] publish `Event::Config` on the global
//! hub so windows can react (`status_on_top` moves bars, `menu_*` repaints
//! menus, ...).
//!
//! # Config file
//!
//! ```toml
//! status_on_top = true
//! menu_wrap = true
//! pager = "less"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::Gui;
use crate::error::{ConfigError, GuiResult};
use crate::notify::{ConfigEvent, Event, HubId};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(i64),
    String(String),
}

impl ConfigValue {
    fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
        }
    }

    fn same_type(&self, other: &ConfigValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

#[derive(Debug, Clone)]
struct ConfigOption {
    value: ConfigValue,
    default: ConfigValue,
}

/// Registered options and their current values.
#[derive(Debug, Clone)]
pub struct ConfigSet {
    options: BTreeMap<String, ConfigOption>,
}

impl Default for ConfigSet {
    fn default() -> Self {
        let mut cs = Self::empty();
        cs.register("status_on_top", false);
        cs.register("help", true);
        cs.register("menu_wrap", false);
        cs.register("arrow_cursor", false);
        cs.register("arrow_string", "->");
        cs.register("pager", "builtin");
        cs.register("attach_format", "%t%2n %-30d %m [%e, %s]");
        cs.register("pattern_format", "%2n %-15e %d");
        cs.register("compose_format", "-- Compose  [Approx. msg size: %l   Atts: %a]");
        cs
    }
}

impl ConfigSet {
    /// A store with no options registered.
    pub fn empty() -> Self {
        Self {
            options: BTreeMap::new(),
        }
    }

    /// Add an option. Re-registering replaces the default and the value.
    pub fn register(&mut self, name: &str, default: impl Into<ConfigValue>) {
        let default = default.into();
        self.options.insert(
            name.to_string(),
            ConfigOption {
                value: default.clone(),
                default,
            },
        );
    }

    pub fn get(&self, name: &str) -> Result<&ConfigValue, ConfigError> {
        self.options
            .get(name)
            .map(|o| &o.value)
            .ok_or_else(|| ConfigError::Unknown(name.to_string()))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, ConfigError> {
        match self.get(name)? {
            ConfigValue::Bool(b) => Ok(*b),
            _ => Err(mismatch(name, "boolean")),
        }
    }

    pub fn get_number(&self, name: &str) -> Result<i64, ConfigError> {
        match self.get(name)? {
            ConfigValue::Number(n) => Ok(*n),
            _ => Err(mismatch(name, "number")),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<&str, ConfigError> {
        match self.get(name)? {
            ConfigValue::String(s) => Ok(s),
            _ => Err(mismatch(name, "string")),
        }
    }

    /// Set an option. Returns whether the value changed.
    pub fn set(&mut self, name: &str, value: impl Into<ConfigValue>) -> Result<bool, ConfigError> {
        let value = value.into();
        let opt = self
            .options
            .get_mut(name)
            .ok_or_else(|| ConfigError::Unknown(name.to_string()))?;
        if !opt.default.same_type(&value) {
            return Err(mismatch(name, opt.default.type_name()));
        }
        if opt.value == value {
            return Ok(false);
        }
        opt.value = value;
        Ok(true)
    }

    /// Restore the default. Returns whether the value changed.
    pub fn reset(&mut self, name: &str) -> Result<bool, ConfigError> {
        let opt = self
            .options
            .get_mut(name)
            .ok_or_else(|| ConfigError::Unknown(name.to_string()))?;
        if opt.value == opt.default {
            return Ok(false);
        }
        opt.value = opt.default.clone();
        Ok(true)
    }

    /// Apply a TOML document. Returns the names that changed, in file order
    /// of the sorted table.
    pub fn apply_toml(&mut self, text: &str) -> Result<Vec<String>, ConfigError> {
        let table: BTreeMap<String, ConfigValue> = toml::from_str(text)?;
        // Validate everything before touching anything.
        for (name, value) in &table {
            let opt = self
                .options
                .get(name)
                .ok_or_else(|| ConfigError::Unknown(name.clone()))?;
            if !opt.default.same_type(value) {
                return Err(mismatch(name, opt.default.type_name()));
            }
        }
        let mut changed = Vec::new();
        for (name, value) in table {
            if self.set(&name, value)? {
                changed.push(name);
            }
        }
        Ok(changed)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }
}

fn mismatch(name: &str, expected: &'static str) -> ConfigError {
    ConfigError::TypeMismatch {
        key: name.to_string(),
        expected,
    }
}

// =============================================================================
// Gui integration
// =============================================================================

impl Gui {
    /// Change an option and notify observers on the global hub.
    pub fn config_set(&mut self, name: &str, value: impl Into<ConfigValue>) -> GuiResult<()> {
        if self.config.set(name, value)? {
            debug!(name, "config set");
            self.notify_send(HubId::Global, Event::config(ConfigEvent::Set, name));
        }
        Ok(())
    }

    pub fn config_reset(&mut self, name: &str) -> GuiResult<()> {
        if self.config.reset(name)? {
            debug!(name, "config reset");
            self.notify_send(HubId::Global, Event::config(ConfigEvent::Reset, name));
        }
        Ok(())
    }

    /// Apply a TOML document, publishing `InitialSet` for each change.
    pub fn config_load_str(&mut self, text: &str) -> GuiResult<()> {
        let changed = self.config.apply_toml(text)?;
        for name in changed {
            self.notify_send(HubId::Global, Event::config(ConfigEvent::InitialSet, name));
        }
        Ok(())
    }

    pub fn config_load_file(&mut self, path: &Path) -> GuiResult<()> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loading config");
        self.config_load_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GuiError, NotifyResult};
    use crate::notify::{EventType, NotifyCallback};
    use crate::types::{Orient, Sizing, WindowType};
    use std::cell::RefCell;

    thread_local! {
        static EVENTS: RefCell<Vec<Event>> = const { RefCell::new(Vec::new()) };
    }

    fn record(_: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
        EVENTS.with(|e| e.borrow_mut().push(nc.event.clone()));
        Ok(())
    }

    fn setup() -> Gui {
        EVENTS.with(|e| e.borrow_mut().clear());
        let mut gui = Gui::new();
        let win = gui.window_new(WindowType::Container, Orient::Vertical, Sizing::Maximise, Sizing::Maximise);
        gui.subscribe(HubId::Global, EventType::Config, record, win).unwrap();
        gui
    }

    #[test]
    fn test_defaults() {
        let cs = ConfigSet::default();
        assert!(!cs.get_bool("status_on_top").unwrap());
        assert_eq!(cs.get_str("pager").unwrap(), "builtin");
        assert!(matches!(cs.get("nope"), Err(ConfigError::Unknown(_))));
    }

    #[test]
    fn test_set_checks_type() {
        let mut cs = ConfigSet::default();
        let err = cs.set("menu_wrap", "yes").unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { expected: "boolean", .. }));
        assert!(cs.set("menu_wrap", true).unwrap());
        assert!(!cs.set("menu_wrap", true).unwrap());
    }

    #[test]
    fn test_config_set_publishes_only_on_change() {
        let mut gui = setup();
        gui.config_set("status_on_top", true).unwrap();
        gui.config_set("status_on_top", true).unwrap();
        gui.config_reset("status_on_top").unwrap();

        let events = EVENTS.with(|e| e.borrow().clone());
        assert_eq!(
            events,
            vec![
                Event::config(ConfigEvent::Set, "status_on_top"),
                Event::config(ConfigEvent::Reset, "status_on_top"),
            ]
        );
    }

    #[test]
    fn test_load_str_publishes_initial_set() {
        let mut gui = setup();
        gui.config_load_str("menu_wrap = true\npager = \"less\"\n").unwrap();

        assert_eq!(gui.config().get_str("pager").unwrap(), "less");
        let events = EVENTS.with(|e| e.borrow().clone());
        assert!(events.contains(&Event::config(ConfigEvent::InitialSet, "menu_wrap")));
        assert!(events.contains(&Event::config(ConfigEvent::InitialSet, "pager")));
    }

    #[test]
    fn test_load_rejects_unknown_without_partial_apply() {
        let mut gui = setup();
        let res = gui.config_load_str("menu_wrap = true\nbogus = 1\n");
        assert!(matches!(res, Err(GuiError::Config(ConfigError::Unknown(_)))));
        assert!(!gui.config().get_bool("menu_wrap").unwrap());
    }

    #[test]
    fn test_load_file() {
        let mut gui = setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panekit.toml");
        std::fs::write(&path, "status_on_top = true\n").unwrap();

        gui.config_load_file(&path).unwrap();
        assert!(gui.config().get_bool("status_on_top").unwrap());

        let missing = gui.config_load_file(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(GuiError::Config(ConfigError::Read { .. }))));
    }
}
