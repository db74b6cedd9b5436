//! Simple Dialog - a menu with a status bar, pushed as a modal dialog
//!
//! ```text
//! Dialog (maximise)         status_on_top = true
//! ├─ Menu (maximise)        ├─ StatusBar
//! └─ StatusBar (1 row)      └─ Menu
//! ```

use tracing::{debug, warn};

use crate::Gui;
use crate::engine::WindowBuilder;
use crate::error::{GuiError, GuiResult, NotifyResult};
use crate::menu::window::menu_window_new;
use crate::menu::{MenuBehavior, MenuType};
use crate::notify::{EventType, HubId, NotifyCallback};
use crate::state::keymap::HelpEntry;
use crate::types::{Orient, Sizing, WindowActions, WindowId, WindowType};
use crate::windows::sbar::sbar_new;

/// Put the first `bar_kind` child of `panel` first or last, as
/// `status_on_top` says. Returns whether anything moved.
pub fn window_status_on_top(gui: &mut Gui, panel: WindowId, bar_kind: WindowType) -> GuiResult<bool> {
    let on_top = gui.config.get_bool("status_on_top").unwrap_or(false);
    let w = gui.window(panel).ok_or(GuiError::StaleWindow(panel))?;
    let children = w.children();
    let Some(bar_pos) = children
        .iter()
        .position(|&c| gui.window(c).is_some_and(|cw| cw.kind() == bar_kind))
    else {
        return Ok(false);
    };
    let bar = children[bar_pos];
    let last = children.len() - 1;

    let target = if on_top { 0 } else { last };
    if bar_pos == target {
        return Ok(false);
    }
    gui.move_child(bar, target)?;
    gui.add_actions(panel, WindowActions::REFLOW);
    debug!(?panel, on_top, "status bar moved, request REFLOW");
    Ok(true)
}

/// Run `f` to fill in the freshly created `dlg`. If it fails, `dlg` and
/// every child already attached to it are freed before the error is
/// returned. Children must be attached as soon as they are created.
pub(crate) fn dialog_build<T>(
    gui: &mut Gui,
    dlg: WindowId,
    f: impl FnOnce(&mut Gui) -> GuiResult<T>,
) -> GuiResult<T> {
    match f(gui) {
        Ok(out) => Ok(out),
        Err(err) => {
            warn!(?dlg, %err, "dialog build failed");
            gui.window_free(dlg);
            Err(err)
        }
    }
}

/// Build a dialog holding a new menu and a status bar, and push it.
///
/// Returns `(dialog, menu window)`.
pub fn simple_dialog_new(
    gui: &mut Gui,
    menu_type: MenuType,
    dlg_type: WindowType,
    help: &'static [HelpEntry],
    behavior: impl MenuBehavior,
) -> GuiResult<(WindowId, WindowId)> {
    let dlg = WindowBuilder::new(dlg_type)
        .orient(Orient::Vertical)
        .width(Sizing::Maximise)
        .height(Sizing::Maximise)
        .help(help)
        .build(gui);

    let menu = dialog_build(gui, dlg, |gui| {
        let menu = menu_window_new(gui, menu_type, behavior)?;
        gui.add_child(dlg, menu)?;
        let sbar = sbar_new(gui)?;
        gui.add_child(dlg, sbar)?;
        window_status_on_top(gui, dlg, WindowType::StatusBar)?;

        gui.window_or_err(dlg)?.focus = Some(menu);
        gui.subscribe(HubId::Global, EventType::Config, simple_dialog_config_observer, dlg)?;
        gui.dialog_push(dlg)?;
        Ok(menu)
    })?;
    debug!(?dlg, kind = dlg_type.name(), "simple dialog created");
    Ok((dlg, menu))
}

/// Pop `dlg`, which must be the active dialog, and free it.
pub fn simple_dialog_free(gui: &mut Gui, dlg: WindowId) -> GuiResult<()> {
    if gui.focused_dialog() != Some(dlg) {
        return Err(GuiError::NotTopDialog(dlg));
    }
    let popped = gui.dialog_pop()?;
    gui.window_free(popped);
    Ok(())
}

fn simple_dialog_config_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    if nc.event.config_key() != Some("status_on_top") {
        return Ok(());
    }
    window_status_on_top(gui, nc.context, WindowType::StatusBar)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::RowContext;
    use crate::state::keymap::Op;
    use std::any::Any;

    struct Empty;

    impl MenuBehavior for Empty {
        fn render_row(&self, _item: usize, _ctx: &RowContext<'_>, _buf: &mut String) {}

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    static HELP: &[HelpEntry] = &[HelpEntry { op: Op::Exit, label: "Exit" }];

    fn setup() -> Gui {
        Gui::new()
    }

    fn kinds(gui: &Gui, win: WindowId) -> Vec<WindowType> {
        gui.window(win)
            .unwrap()
            .children()
            .iter()
            .map(|&c| gui.window(c).unwrap().kind())
            .collect()
    }

    #[test]
    fn test_new_pushes_dialog() {
        let mut gui = setup();
        let (dlg, menu) =
            simple_dialog_new(&mut gui, MenuType::Generic, WindowType::DlgPattern, HELP, Empty).unwrap();
        assert_eq!(gui.focused_dialog(), Some(dlg));
        assert_eq!(gui.window(dlg).unwrap().focus(), Some(menu));
        assert_eq!(kinds(&gui, dlg), vec![WindowType::Menu, WindowType::StatusBar]);
    }

    #[test]
    fn test_status_on_top_moves_bar() {
        let mut gui = setup();
        gui.config_set("status_on_top", true).unwrap();
        let (dlg, _) =
            simple_dialog_new(&mut gui, MenuType::Generic, WindowType::DlgPattern, HELP, Empty).unwrap();
        assert_eq!(kinds(&gui, dlg), vec![WindowType::StatusBar, WindowType::Menu]);

        gui.config_set("status_on_top", false).unwrap();
        assert_eq!(kinds(&gui, dlg), vec![WindowType::Menu, WindowType::StatusBar]);
        assert!(gui.window(dlg).unwrap().actions().contains(WindowActions::REFLOW));
    }

    #[test]
    fn test_free_pops_and_destroys() {
        let mut gui = setup();
        let (dlg, menu) =
            simple_dialog_new(&mut gui, MenuType::Generic, WindowType::DlgPattern, HELP, Empty).unwrap();
        simple_dialog_free(&mut gui, dlg).unwrap();
        assert!(gui.window(dlg).is_none());
        assert!(gui.window(menu).is_none());
        assert!(gui.dialogs().is_empty());
        assert_eq!(gui.window_count(), 0);
    }

    #[test]
    fn test_failed_build_frees_partial_dialog() {
        let mut gui = setup();
        let dlg = gui.window_new(WindowType::DlgPattern, Orient::Vertical, Sizing::Maximise, Sizing::Maximise);
        let before = gui.window_count();

        let result: GuiResult<()> = dialog_build(&mut gui, dlg, |gui| {
            let sbar = sbar_new(gui)?;
            gui.add_child(dlg, sbar)?;
            Err(GuiError::NoDialog)
        });
        assert!(matches!(result, Err(GuiError::NoDialog)));
        assert!(gui.window(dlg).is_none());
        assert_eq!(gui.window_count(), before - 1);
        assert!(gui.dialogs().is_empty());
    }

    #[test]
    fn test_free_requires_top() {
        let mut gui = setup();
        let (a, _) =
            simple_dialog_new(&mut gui, MenuType::Generic, WindowType::DlgPattern, HELP, Empty).unwrap();
        let (b, _) =
            simple_dialog_new(&mut gui, MenuType::Generic, WindowType::DlgPattern, HELP, Empty).unwrap();
        assert!(matches!(simple_dialog_free(&mut gui, a), Err(GuiError::NotTopDialog(_))));
        simple_dialog_free(&mut gui, b).unwrap();
        simple_dialog_free(&mut gui, a).unwrap();
    }
}
