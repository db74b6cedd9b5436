//! Pattern helper - pick a search pattern from a list
//!
//! Lists every pattern flag with its argument type and a description, plus
//! the three thread patterns. Selecting an entry returns its tag (`~f`,
//! `~<()`, ...) for the caller to insert.

use std::any::Any;

use tracing::debug;

use crate::Gui;
use crate::error::{GuiError, GuiResult, NotifyResult};
use crate::layout::expand_format;
use crate::menu::{MenuBehavior, MenuRedraw, MenuType, RowContext};
use crate::notify::{EventType, HubId, NotifyCallback};
use crate::pipeline::{Terminal, menu_loop};
use crate::state::keymap::{HelpEntry, Op};
use crate::types::{WindowId, WindowType};
use crate::windows::{sbar_set_title, simple_dialog_free, simple_dialog_new};

static PATTERN_HELP: &[HelpEntry] = &[
    HelpEntry { op: Op::Exit, label: "Exit" },
    HelpEntry { op: Op::SelectEntry, label: "Select" },
    HelpEntry { op: Op::Help, label: "Help" },
];

/// Argument a pattern flag takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternArg {
    None,
    /// Regular expression.
    Expr,
    /// Numeric range.
    Range,
    DateRange,
    Query,
}

impl PatternArg {
    fn placeholder(self) -> Option<&'static str> {
        match self {
            PatternArg::None => None,
            PatternArg::Expr => Some("EXPR"),
            PatternArg::Range => Some("RANGE"),
            PatternArg::DateRange => Some("DATERANGE"),
            PatternArg::Query => Some("QUERY"),
        }
    }
}

struct PatternFlag {
    tag: char,
    arg: PatternArg,
    desc: &'static str,
}

const fn flag(tag: char, arg: PatternArg, desc: &'static str) -> PatternFlag {
    PatternFlag { tag, arg, desc }
}

static FLAGS: &[PatternFlag] = &[
    flag('A', PatternArg::None, "all messages"),
    flag('b', PatternArg::Expr, "messages whose body matches EXPR"),
    flag('B', PatternArg::Expr, "messages whose body or headers match EXPR"),
    flag('c', PatternArg::Expr, "messages whose CC header matches EXPR"),
    flag('C', PatternArg::Expr, "messages whose recipient matches EXPR"),
    flag('d', PatternArg::DateRange, "messages sent in DATERANGE"),
    flag('D', PatternArg::None, "deleted messages"),
    flag('e', PatternArg::Expr, "messages whose Sender header matches EXPR"),
    flag('E', PatternArg::None, "expired messages"),
    flag('f', PatternArg::Expr, "messages whose From header matches EXPR"),
    flag('F', PatternArg::None, "flagged messages"),
    flag('g', PatternArg::None, "cryptographically signed messages"),
    flag('G', PatternArg::None, "cryptographically encrypted messages"),
    flag('h', PatternArg::Expr, "messages whose header matches EXPR"),
    flag('H', PatternArg::Expr, "messages whose spam tag matches EXPR"),
    flag('i', PatternArg::Expr, "messages whose Message-ID matches EXPR"),
    flag('I', PatternArg::Query, "messages whose Message-ID is in QUERY"),
    flag('k', PatternArg::None, "messages which contain PGP key"),
    flag('l', PatternArg::None, "messages addressed to known mailing lists"),
    flag('L', PatternArg::Expr, "messages whose From/Sender/To/CC matches EXPR"),
    flag('m', PatternArg::Range, "messages whose number is in RANGE"),
    flag('M', PatternArg::Expr, "messages with a Content-Type matching EXPR"),
    flag('n', PatternArg::Range, "messages whose score is in RANGE"),
    flag('N', PatternArg::None, "new messages"),
    flag('O', PatternArg::None, "old messages"),
    flag('p', PatternArg::None, "messages addressed to you"),
    flag('P', PatternArg::None, "messages from you"),
    flag('Q', PatternArg::None, "messages which have been replied to"),
    flag('r', PatternArg::DateRange, "messages received in DATERANGE"),
    flag('R', PatternArg::None, "already read messages"),
    flag('s', PatternArg::Expr, "messages whose Subject header matches EXPR"),
    flag('S', PatternArg::None, "superseded messages"),
    flag('t', PatternArg::Expr, "messages whose To header matches EXPR"),
    flag('T', PatternArg::None, "tagged messages"),
    flag('u', PatternArg::None, "messages addressed to subscribed mailing lists"),
    flag('U', PatternArg::None, "unread messages"),
    flag('v', PatternArg::None, "messages in collapsed threads"),
    flag('V', PatternArg::None, "cryptographically verified messages"),
    flag('x', PatternArg::Expr, "messages whose References header matches EXPR"),
    flag('X', PatternArg::Range, "messages with RANGE attachments"),
    flag('y', PatternArg::Expr, "messages whose X-Label header matches EXPR"),
    flag('z', PatternArg::Range, "messages whose size is in RANGE"),
    flag('=', PatternArg::None, "duplicated messages"),
    flag('$', PatternArg::None, "unreferenced messages"),
    flag('#', PatternArg::None, "broken threads"),
];

/// One row of the helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    /// 1-based position.
    pub num: usize,
    /// Text inserted when the entry is selected.
    pub tag: String,
    /// Pattern with its argument placeholder.
    pub expr: String,
    pub desc: String,
}

/// Entries of the helper: the flag table followed by the thread patterns.
pub fn pattern_entries() -> Vec<PatternEntry> {
    let mut entries: Vec<PatternEntry> = FLAGS
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let tag = format!("~{}", f.tag);
            let expr = match f.arg.placeholder() {
                Some(arg) => format!("{tag} {arg}"),
                None => tag.clone(),
            };
            PatternEntry {
                num: i + 1,
                tag,
                expr,
                desc: f.desc.to_string(),
            }
        })
        .collect();

    let threads = [
        ("~()", "messages in threads containing messages matching PATTERN"),
        ("~<()", "messages whose immediate parent matches PATTERN"),
        ("~>()", "messages having an immediate child matching PATTERN"),
    ];
    for (tag, desc) in threads {
        let open = tag.trim_end_matches(')');
        entries.push(PatternEntry {
            num: entries.len() + 1,
            tag: tag.to_string(),
            expr: format!("{open}PATTERN)"),
            desc: desc.to_string(),
        });
    }
    entries
}

#[derive(Debug, Default)]
pub struct PatternList {
    entries: Vec<PatternEntry>,
}

impl PatternList {
    pub fn new(entries: Vec<PatternEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, item: usize) -> Option<&PatternEntry> {
        self.entries.get(item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MenuBehavior for PatternList {
    fn render_row(&self, item: usize, ctx: &RowContext<'_>, buf: &mut String) {
        let Some(entry) = self.entries.get(item) else {
            return;
        };
        let fmt = ctx.config.get_str("pattern_format").unwrap_or("%2n %-15e %d");
        buf.push_str(&expand_format(fmt, |c| match c {
            'n' => Some(entry.num.to_string()),
            'e' => Some(entry.expr.clone()),
            'd' => Some(entry.desc.clone()),
            _ => None,
        }));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Build and push the pattern dialog. Returns `(dialog, menu window)`.
pub fn pattern_dialog_new(gui: &mut Gui) -> GuiResult<(WindowId, WindowId)> {
    let list = PatternList::new(pattern_entries());
    let count = list.len();
    let (dlg, menu) = simple_dialog_new(gui, MenuType::Generic, WindowType::DlgPattern, PATTERN_HELP, list)?;
    gui.with_menu(menu, |m| m.set_items(count))?;

    let sbar = gui
        .window_find(dlg, WindowType::StatusBar)
        .ok_or(GuiError::MissingData(dlg, "status bar"))?;
    sbar_set_title(gui, sbar, "Patterns")?;
    gui.subscribe(HubId::Global, EventType::Config, pattern_config_observer, menu)?;
    Ok((dlg, menu))
}

fn pattern_config_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    if nc.event.config_key() != Some("pattern_format") {
        return Ok(());
    }
    gui.menu_queue_redraw(nc.context, MenuRedraw::INDEX)?;
    debug!("config done, request RECALC");
    Ok(())
}

/// Let the user pick a pattern. Returns the selected entry's tag, or `None`
/// if the dialog was left without a choice.
pub fn dlg_select_pattern(gui: &mut Gui, term: &mut dyn Terminal) -> GuiResult<Option<String>> {
    let (dlg, menu) = pattern_dialog_new(gui)?;

    let result = loop {
        match menu_loop(gui, term, menu) {
            Ok(Op::SelectEntry) => {
                let tag = gui.menu(menu).and_then(|m| {
                    let item = m.current_item()?;
                    Some(m.behavior_as::<PatternList>()?.get(item)?.tag.clone())
                });
                break Ok(tag);
            }
            Ok(Op::Exit) => break Ok(None),
            Ok(_) => {}
            Err(err) => break Err(err),
        }
    };

    simple_dialog_free(gui, dlg)?;
    debug!(?result, "pattern dialog done");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{InputEvent, ScriptedTerminal};
    use crate::windows::rootwin_new;
    use crossterm::event::KeyCode;

    fn setup() -> Gui {
        let mut gui = Gui::new();
        rootwin_new(&mut gui, 80, 10).unwrap();
        gui
    }

    #[test]
    fn test_entries() {
        let entries = pattern_entries();
        assert_eq!(entries.len(), FLAGS.len() + 3);
        assert_eq!(entries[0].expr, "~A");
        assert_eq!(entries[1].expr, "~b EXPR");
        assert_eq!(entries[5].expr, "~d DATERANGE");

        let last = &entries[entries.len() - 1];
        assert_eq!(last.tag, "~>()");
        assert_eq!(last.expr, "~>(PATTERN)");
        assert_eq!(last.num, entries.len());
        assert_eq!(entries[entries.len() - 3].expr, "~(PATTERN)");
    }

    #[test]
    fn test_select_returns_tag() {
        let mut gui = setup();
        let mut term = ScriptedTerminal::new([
            InputEvent::key(KeyCode::Down),
            InputEvent::key(KeyCode::Enter),
        ]);
        let picked = dlg_select_pattern(&mut gui, &mut term).unwrap();
        assert_eq!(picked.as_deref(), Some("~b"));
        assert!(gui.dialogs().is_empty());
    }

    #[test]
    fn test_select_thread_pattern() {
        let mut gui = setup();
        let mut term = ScriptedTerminal::new([
            InputEvent::key(KeyCode::End),
            InputEvent::key(KeyCode::Up),
            InputEvent::key(KeyCode::Enter),
        ]);
        let picked = dlg_select_pattern(&mut gui, &mut term).unwrap();
        assert_eq!(picked.as_deref(), Some("~<()"));
    }

    #[test]
    fn test_exit_returns_none() {
        let mut gui = setup();
        let mut term = ScriptedTerminal::new([InputEvent::char('q')]);
        assert_eq!(dlg_select_pattern(&mut gui, &mut term).unwrap(), None);
    }

    #[test]
    fn test_rows_and_title() {
        let mut gui = setup();
        let mut term = ScriptedTerminal::new([InputEvent::char('q')]);
        dlg_select_pattern(&mut gui, &mut term).unwrap();

        let frame = &term.frames()[0];
        assert_eq!(frame[0].trim_end(), "q:Exit  Enter:Select  ?:Help");
        assert_eq!(frame[1].trim_end(), format!(" 1 {:<15} all messages", "~A"));
        assert_eq!(frame[8].trim_end(), "Patterns");
    }

    #[test]
    fn test_pattern_format_change_redraws() {
        let mut gui = setup();
        let (_dlg, menu) = pattern_dialog_new(&mut gui).unwrap();
        gui.redraw().unwrap();
        gui.config_set("pattern_format", "%e").unwrap();
        assert!(gui.menu(menu).unwrap().redraw().contains(MenuRedraw::INDEX));
        gui.redraw().unwrap();
        assert_eq!(gui.screen().row_text(1).trim_end(), "~A");
    }
}
