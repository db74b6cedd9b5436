//! Event Loop - drives one modal menu
//!
//! Each iteration:
//!
//! ```text
//! redraw (flow → reflow → recalc → repaint) → flush → wait for input → dispatch
//! ```
//!
//! Navigation, tagging and screen redraw are handled here. Every other
//! operation is returned to the screen that owns the menu, which decides
//! whether to keep looping.

use tracing::{debug, trace};

use crate::Gui;
use crate::error::{GuiError, GuiResult};
use crate::menu::TagAction;
use crate::pipeline::terminal::{InputEvent, Terminal};
use crate::state::keymap::Op;
use crate::types::{WindowActions, WindowId};
use crate::windows::rootwin_set_size;

/// Run the input loop on `menu_win` until an operation the menu does not
/// handle itself arrives, and return that operation.
pub fn menu_loop(gui: &mut Gui, term: &mut dyn Terminal, menu_win: WindowId) -> GuiResult<Op> {
    loop {
        gui.redraw()?;
        term.flush(gui.screen())?;

        let key = match term.next_event()? {
            InputEvent::Resize(cols, rows) => {
                if gui.root().is_some() {
                    rootwin_set_size(gui, cols, rows)?;
                }
                term.invalidate();
                continue;
            }
            InputEvent::Key(key) => key,
        };

        let kind = gui.menu(menu_win).ok_or(GuiError::NotAMenu(menu_win))?.kind();
        let op = gui.keymap.lookup(kind, &key);
        trace!(?key, op = op.name(), "key");
        gui.clear_message();

        match op {
            Op::Nop => {}
            Op::NextEntry => step(gui, menu_win, 1, "You are on the last entry.")?,
            Op::PrevEntry => step(gui, menu_win, -1, "You are on the first entry.")?,
            Op::FirstEntry => {
                let moved = gui.with_menu(menu_win, |m| m.first())?;
                report(gui, menu_win, moved, "You are on the first entry.")?;
            }
            Op::LastEntry => {
                let moved = gui.with_menu(menu_win, |m| m.last())?;
                report(gui, menu_win, moved, "You are on the last entry.")?;
            }
            Op::NextPage => {
                let moved = gui.with_menu(menu_win, |m| m.next_page())?;
                report(gui, menu_win, moved, "You are on the last page.")?;
            }
            Op::PrevPage => {
                let moved = gui.with_menu(menu_win, |m| m.prev_page())?;
                report(gui, menu_win, moved, "You are on the first page.")?;
            }
            Op::TagEntry => tag_current(gui, menu_win)?,
            Op::Redraw => {
                redraw_full(gui);
                term.invalidate();
            }
            other => {
                debug!(op = other.name(), "menu loop returns");
                return Ok(other);
            }
        }
    }
}

fn step(gui: &mut Gui, win: WindowId, delta: isize, at_end: &str) -> GuiResult<()> {
    let moved = gui.menu_move(win, delta)?;
    report(gui, win, moved, at_end)
}

fn report(gui: &mut Gui, win: WindowId, moved: bool, at_end: &str) -> GuiResult<()> {
    if moved {
        return Ok(());
    }
    let empty = gui.menu(win).ok_or(GuiError::NotAMenu(win))?.is_empty();
    if empty {
        gui.show_error("There are no entries.");
    } else {
        gui.show_error(at_end);
    }
    Ok(())
}

/// Toggle the tag on the selected entry and move to the next one.
fn tag_current(gui: &mut Gui, win: WindowId) -> GuiResult<()> {
    let Some(current) = gui.menu(win).ok_or(GuiError::NotAMenu(win))?.current() else {
        gui.show_error("There are no entries.");
        return Ok(());
    };
    gui.with_menu(win, |m| m.tag_entry(current, TagAction::Toggle))??;
    gui.menu_move(win, 1)?;
    Ok(())
}

/// Lay out, recalculate and repaint everything on the next pass.
fn redraw_full(gui: &mut Gui) {
    let Some(top) = gui.root().or_else(|| gui.focused_dialog()) else {
        return;
    };
    gui.screen_mut().clear();
    for id in gui.descendants(top) {
        gui.add_actions(id, WindowActions::RECALC_REPAINT);
    }
    gui.add_actions(top, WindowActions::REFLOW);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{MenuBehavior, MenuType, RowContext};
    use crate::pipeline::terminal::ScriptedTerminal;
    use crate::state::keymap::HelpEntry;
    use crate::windows::{rootwin_new, simple_dialog_new};
    use crate::types::WindowType;
    use crossterm::event::KeyCode;
    use std::any::Any;
    use std::io;

    struct Words(Vec<&'static str>);

    impl MenuBehavior for Words {
        fn render_row(&self, item: usize, ctx: &RowContext<'_>, buf: &mut String) {
            let mark = if ctx.tagged { '*' } else { ' ' };
            buf.push(mark);
            buf.push_str(self.0[item]);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    static HELP: &[HelpEntry] = &[HelpEntry { op: Op::Exit, label: "Exit" }];

    fn setup(words: Vec<&'static str>) -> (Gui, WindowId) {
        let mut gui = Gui::new();
        rootwin_new(&mut gui, 20, 6).unwrap();
        let count = words.len();
        let (_, menu) =
            simple_dialog_new(&mut gui, MenuType::Generic, WindowType::DlgPattern, HELP, Words(words))
                .unwrap();
        gui.with_menu(menu, |m| m.set_items(count)).unwrap();
        (gui, menu)
    }

    #[test]
    fn test_navigation_then_select() {
        let (mut gui, menu) = setup(vec!["a", "b", "c"]);
        let mut term = ScriptedTerminal::new([
            InputEvent::char('j'),
            InputEvent::char('j'),
            InputEvent::char('k'),
            InputEvent::key(KeyCode::Enter),
        ]);
        let op = menu_loop(&mut gui, &mut term, menu).unwrap();
        assert_eq!(op, Op::SelectEntry);
        assert_eq!(gui.menu(menu).unwrap().current(), Some(1));
        assert_eq!(term.frames().len(), 4);
    }

    #[test]
    fn test_first_frame_shows_layout() {
        let (mut gui, menu) = setup(vec!["alpha", "beta"]);
        let mut term = ScriptedTerminal::new([InputEvent::char('q')]);
        assert_eq!(menu_loop(&mut gui, &mut term, menu).unwrap(), Op::Exit);

        let frame = term.last_frame().unwrap();
        assert_eq!(frame[0].trim_end(), "q:Exit");
        assert_eq!(frame[1].trim_end(), " alpha");
        assert_eq!(frame[2].trim_end(), " beta");
        assert_eq!(frame.len(), 6);
    }

    #[test]
    fn test_end_of_list_message() {
        let (mut gui, menu) = setup(vec!["a"]);
        let mut term = ScriptedTerminal::new([InputEvent::char('j'), InputEvent::char('q')]);
        menu_loop(&mut gui, &mut term, menu).unwrap();
        let frame = term.last_frame().unwrap();
        assert_eq!(frame[5].trim_end(), "You are on the last entry.");
    }

    #[test]
    fn test_message_cleared_by_next_key() {
        let (mut gui, menu) = setup(vec!["a", "b"]);
        let mut term = ScriptedTerminal::new([
            InputEvent::char('k'),
            InputEvent::char('j'),
            InputEvent::char('q'),
        ]);
        menu_loop(&mut gui, &mut term, menu).unwrap();
        assert_eq!(gui.message_text(), Some(""));
    }

    #[test]
    fn test_tag_moves_down() {
        let (mut gui, menu) = setup(vec!["a", "b", "c"]);
        let mut term = ScriptedTerminal::new([InputEvent::char('t'), InputEvent::char('q')]);
        menu_loop(&mut gui, &mut term, menu).unwrap();
        let m = gui.menu(menu).unwrap();
        assert!(m.is_tagged(0));
        assert_eq!(m.tag_count(), 1);
        assert_eq!(m.current(), Some(1));
        assert_eq!(term.last_frame().unwrap()[1].trim_end(), "*a");
    }

    #[test]
    fn test_resize_reflows() {
        let (mut gui, menu) = setup(vec!["a"]);
        let mut term = ScriptedTerminal::new([InputEvent::Resize(30, 8), InputEvent::char('q')]);
        menu_loop(&mut gui, &mut term, menu).unwrap();
        assert_eq!(gui.screen().width(), 30);
        assert_eq!(term.last_frame().unwrap().len(), 8);
        assert_eq!(gui.window(menu).unwrap().state().rows, 5);
    }

    #[test]
    fn test_out_of_input_is_error() {
        let (mut gui, menu) = setup(vec!["a"]);
        let mut term = ScriptedTerminal::default();
        match menu_loop(&mut gui, &mut term, menu) {
            Err(GuiError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected {other:?}"),
        }
    }
}
