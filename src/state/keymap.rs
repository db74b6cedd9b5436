//! Keymap - key events to menu operations
//!
//! Bindings are per [`MenuType`] with a generic fallback. Later bindings
//! override earlier ones for the same key.
//!
//! # Example
//!
//! ```ignore
//! let mut keymap = Keymap::default();
//! keymap.bind(MenuType::Pager, KeyEvent::from(KeyCode::Char('b')), Op::PrevPage);
//! assert_eq!(keymap.lookup(MenuType::Pager, &KeyEvent::from(KeyCode::Char('b'))), Op::PrevPage);
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::menu::MenuType;

/// Operations a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Nop,
    NextEntry,
    PrevEntry,
    FirstEntry,
    LastEntry,
    NextPage,
    PrevPage,
    TagEntry,
    SelectEntry,
    Exit,
    Help,
    Redraw,
    DeleteAttachment,
    MoveUp,
    MoveDown,
    UpdateEncoding,
    ToggleDisposition,
    Send,
}

impl Op {
    pub fn name(self) -> &'static str {
        match self {
            Op::Nop => "noop",
            Op::NextEntry => "next-entry",
            Op::PrevEntry => "previous-entry",
            Op::FirstEntry => "first-entry",
            Op::LastEntry => "last-entry",
            Op::NextPage => "next-page",
            Op::PrevPage => "previous-page",
            Op::TagEntry => "tag-entry",
            Op::SelectEntry => "select-entry",
            Op::Exit => "exit",
            Op::Help => "help",
            Op::Redraw => "redraw-screen",
            Op::DeleteAttachment => "detach-file",
            Op::MoveUp => "move-up",
            Op::MoveDown => "move-down",
            Op::UpdateEncoding => "update-encoding",
            Op::ToggleDisposition => "toggle-disposition",
            Op::Send => "send-message",
        }
    }
}

/// One item of a dialog's help line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpEntry {
    pub op: Op,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    menu: MenuType,
    code: KeyCode,
    modifiers: KeyModifiers,
    op: Op,
}

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

/// Shift is implied by the character itself.
fn normalize(key: &KeyEvent) -> (KeyCode, KeyModifiers) {
    match key.code {
        KeyCode::Char(_) => (key.code, key.modifiers - KeyModifiers::SHIFT),
        _ => (key.code, key.modifiers),
    }
}

fn ch(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

impl Default for Keymap {
    fn default() -> Self {
        use MenuType::*;

        let mut km = Self::empty();
        let generic = [
            (key(KeyCode::Down), Op::NextEntry),
            (ch('j'), Op::NextEntry),
            (key(KeyCode::Up), Op::PrevEntry),
            (ch('k'), Op::PrevEntry),
            (key(KeyCode::Home), Op::FirstEntry),
            (ch('='), Op::FirstEntry),
            (key(KeyCode::End), Op::LastEntry),
            (ch('*'), Op::LastEntry),
            (key(KeyCode::PageDown), Op::NextPage),
            (ch('>'), Op::NextPage),
            (key(KeyCode::PageUp), Op::PrevPage),
            (ch('<'), Op::PrevPage),
            (ch('t'), Op::TagEntry),
            (key(KeyCode::Enter), Op::SelectEntry),
            (ch('q'), Op::Exit),
            (key(KeyCode::Esc), Op::Exit),
            (ch('?'), Op::Help),
            (KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL), Op::Redraw),
        ];
        for (k, op) in generic {
            km.bind(Generic, k, op);
        }

        km.bind(Compose, ch('D'), Op::DeleteAttachment);
        km.bind(Compose, ch('K'), Op::MoveUp);
        km.bind(Compose, ch('J'), Op::MoveDown);
        km.bind(Compose, ch('U'), Op::UpdateEncoding);
        km.bind(Compose, KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL), Op::ToggleDisposition);
        km.bind(Compose, ch('y'), Op::Send);

        km.bind(Pager, ch(' '), Op::NextPage);
        km.bind(Pager, ch('-'), Op::PrevPage);
        km.bind(Pager, key(KeyCode::Enter), Op::NextEntry);
        km
    }
}

impl Keymap {
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn bind(&mut self, menu: MenuType, key: KeyEvent, op: Op) {
        let (code, modifiers) = normalize(&key);
        self.bindings.push(Binding {
            menu,
            code,
            modifiers,
            op,
        });
    }

    fn find(&self, menu: MenuType, code: KeyCode, modifiers: KeyModifiers) -> Option<Op> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.menu == menu && b.code == code && b.modifiers == modifiers)
            .map(|b| b.op)
    }

    /// Operation for `key` in `menu`, falling back to generic bindings.
    pub fn lookup(&self, menu: MenuType, key: &KeyEvent) -> Op {
        let (code, modifiers) = normalize(key);
        self.find(menu, code, modifiers)
            .or_else(|| self.find(MenuType::Generic, code, modifiers))
            .unwrap_or(Op::Nop)
    }

    /// Display name of the first key that triggers `op` in `menu`.
    pub fn key_name(&self, menu: MenuType, op: Op) -> Option<String> {
        let live = |b: &&Binding| {
            b.op == op && self.lookup(b.menu_for(menu), &KeyEvent::new(b.code, b.modifiers)) == op
        };
        self.bindings
            .iter()
            .filter(|b| b.menu == menu)
            .find(live)
            .or_else(|| {
                self.bindings
                    .iter()
                    .filter(|b| b.menu == MenuType::Generic)
                    .find(live)
            })
            .map(|b| describe(b.code, b.modifiers))
    }
}

impl Keymap {
    /// Effective bindings in `menu` as `(key name, op)`, menu-specific
    /// bindings first. Overridden and unbound keys are left out.
    pub fn bindings_for(&self, menu: MenuType) -> Vec<(String, Op)> {
        let mut seen: Vec<(KeyCode, KeyModifiers)> = Vec::new();
        let mut out = Vec::new();
        let scopes: &[MenuType] = if menu == MenuType::Generic {
            &[MenuType::Generic]
        } else {
            &[menu, MenuType::Generic]
        };
        for &scope in scopes {
            for b in self.bindings.iter().filter(|b| b.menu == scope) {
                let key = (b.code, b.modifiers);
                if b.op == Op::Nop || seen.contains(&key) {
                    continue;
                }
                if self.lookup(menu, &KeyEvent::new(b.code, b.modifiers)) != b.op {
                    continue;
                }
                seen.push(key);
                out.push((describe(b.code, b.modifiers), b.op));
            }
        }
        out
    }
}

impl Binding {
    /// Menu context to check an override in.
    fn menu_for(&self, asked: MenuType) -> MenuType {
        if self.menu == MenuType::Generic { asked } else { self.menu }
    }
}

fn describe(code: KeyCode, modifiers: KeyModifiers) -> String {
    let base = match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        other => format!("{other:?}"),
    };
    if modifiers.contains(KeyModifiers::CONTROL) {
        format!("^{}", base.to_uppercase())
    } else {
        base
    }
}
