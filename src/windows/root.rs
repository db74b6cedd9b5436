//! Root Window - the top of the window tree
//!
//! ```text
//! Root (vertical, terminal size)
//! ├─ HelpBar      1 row
//! ├─ AllDialogs   rest
//! └─ Message      1 row
//! ```
//!
//! With `status_on_top` the help bar moves below the dialogs, so that
//! dialogs' own status bars (moved to the top) do not sit next to it.

use tracing::debug;

use crate::Gui;
use crate::engine::WindowBuilder;
use crate::error::{GuiError, GuiResult, NotifyResult};
use crate::notify::{EventType, HubId, NotifyCallback};
use crate::types::{Orient, Sizing, WindowActions, WindowId, WindowType};
use crate::windows::helpbar::helpbar_new;
use crate::windows::msgwin::msgwin_new;

/// Build the root window and its fixed children for a `cols`×`rows` terminal.
pub fn rootwin_new(gui: &mut Gui, cols: u16, rows: u16) -> GuiResult<WindowId> {
    let root = WindowBuilder::new(WindowType::Root)
        .orient(Orient::Vertical)
        .width(Sizing::Fixed(cols))
        .height(Sizing::Fixed(rows))
        .build(gui);
    gui.set_hub_parent(HubId::Window(root), Some(HubId::Global));

    let helpbar = helpbar_new(gui)?;
    let all_dialogs = WindowBuilder::new(WindowType::AllDialogs)
        .orient(Orient::Vertical)
        .width(Sizing::Maximise)
        .height(Sizing::Maximise)
        .build(gui);
    let message = msgwin_new(gui);

    if gui.config.get_bool("status_on_top").unwrap_or(false) {
        gui.add_child(root, all_dialogs)?;
        gui.add_child(root, helpbar)?;
    } else {
        gui.add_child(root, helpbar)?;
        gui.add_child(root, all_dialogs)?;
    }
    gui.add_child(root, message)?;

    gui.root = Some(root);
    gui.all_dialogs = Some(all_dialogs);
    gui.message = Some(message);
    gui.screen_mut().resize(cols, rows);
    gui.add_actions(root, WindowActions::REFLOW);

    gui.subscribe(HubId::Global, EventType::Config, rootwin_config_observer, root)?;
    debug!(cols, rows, "root window created");
    Ok(root)
}

/// Resize the root window to the terminal and lay everything out again.
pub fn rootwin_set_size(gui: &mut Gui, cols: u16, rows: u16) -> GuiResult<()> {
    let root = gui.root.ok_or(GuiError::NoRoot)?;
    let w = gui.window_or_err(root)?;
    if w.state.cols == cols && w.state.rows == rows {
        return Ok(());
    }
    w.width = Sizing::Fixed(cols);
    w.height = Sizing::Fixed(rows);
    w.state.cols = cols;
    w.state.rows = rows;

    gui.screen_mut().resize(cols, rows);
    debug!(cols, rows, "terminal resized");
    gui.window_reflow(root)
}

fn rootwin_config_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    if nc.event.config_key() != Some("status_on_top") {
        return Ok(());
    }
    let root = nc.context;
    let Some(helpbar) = gui.window_find(root, WindowType::HelpBar) else {
        return Ok(());
    };
    let on_top = gui.config.get_bool("status_on_top").unwrap_or(false);
    let pos = if on_top { 1 } else { 0 };

    let current = gui
        .window(root)
        .and_then(|w| w.children().iter().position(|&c| c == helpbar));
    if current == Some(pos) {
        return Ok(());
    }
    gui.move_child(helpbar, pos)?;
    gui.add_actions(root, WindowActions::REFLOW);
    debug!(on_top, "config done, request REFLOW");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::windows::helpbar::HelpBarData;
    use crate::state::keymap::{HelpEntry, Op};

    static HELP: &[HelpEntry] = &[
        HelpEntry { op: Op::Exit, label: "Exit" },
        HelpEntry { op: Op::SelectEntry, label: "Select" },
    ];

    fn setup() -> (Gui, WindowId) {
        let mut gui = Gui::new();
        let root = rootwin_new(&mut gui, 40, 10).unwrap();
        gui.window_reflow(root).unwrap();
        (gui, root)
    }

    fn kinds(gui: &Gui, root: WindowId) -> Vec<WindowType> {
        gui.window(root)
            .unwrap()
            .children()
            .iter()
            .map(|&c| gui.window(c).unwrap().kind())
            .collect()
    }

    #[test]
    fn test_layout() {
        let (gui, root) = setup();
        assert_eq!(
            kinds(&gui, root),
            vec![WindowType::HelpBar, WindowType::AllDialogs, WindowType::Message]
        );
        let dialogs = gui.all_dialogs().unwrap();
        let state = gui.window(dialogs).unwrap().state();
        assert_eq!((state.row_offset, state.rows, state.cols), (1, 8, 40));
    }

    #[test]
    fn test_status_on_top_swaps_helpbar() {
        let (mut gui, root) = setup();
        gui.config_set("status_on_top", true).unwrap();
        assert_eq!(
            kinds(&gui, root),
            vec![WindowType::AllDialogs, WindowType::HelpBar, WindowType::Message]
        );
        assert!(gui.window(root).unwrap().actions().contains(WindowActions::REFLOW));

        gui.config_set("status_on_top", false).unwrap();
        assert_eq!(kinds(&gui, root)[0], WindowType::HelpBar);
    }

    #[test]
    fn test_set_size_reflows() {
        let (mut gui, _root) = setup();
        rootwin_set_size(&mut gui, 60, 20).unwrap();
        let dialogs = gui.all_dialogs().unwrap();
        let state = gui.window(dialogs).unwrap().state();
        assert_eq!((state.rows, state.cols), (18, 60));
        assert_eq!(gui.screen().width(), 60);
    }

    #[test]
    fn test_helpbar_follows_focus() {
        let (mut gui, root) = setup();
        let helpbar = gui.window_find(root, WindowType::HelpBar).unwrap();
        let dlg = WindowBuilder::new(WindowType::DlgPattern)
            .width(Sizing::Maximise)
            .height(Sizing::Maximise)
            .help(HELP)
            .build(&mut gui);

        gui.dialog_push(dlg).unwrap();
        assert!(gui.window(helpbar).unwrap().actions().contains(WindowActions::RECALC));

        let recalc = gui.window(helpbar).unwrap().recalc.unwrap();
        recalc(&mut gui, helpbar).unwrap();
        let text = gui.window(helpbar).unwrap().data::<HelpBarData>().unwrap().text().to_string();
        assert_eq!(text, "q:Exit  Enter:Select");
    }

    #[test]
    fn test_help_option_hides_helpbar() {
        let (mut gui, root) = setup();
        gui.config_set("help", false).unwrap();
        let helpbar = gui.window_find(root, WindowType::HelpBar).unwrap();
        assert!(!gui.window(helpbar).unwrap().state().visible);

        gui.window_reflow(root).unwrap();
        let dialogs = gui.all_dialogs().unwrap();
        assert_eq!(gui.window(dialogs).unwrap().state().row_offset, 0);
    }
}
