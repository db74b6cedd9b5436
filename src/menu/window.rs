//! Menu window - binds a [`Menu`] to a window
//!
//! - recalc: sync the page length with the window, then request repaint
//! - repaint: draw rows according to the pending [`RepaintPlan`]
//! - observers: geometry changes and `menu_*`/`arrow_*` config options
//!   force a full repaint

use tracing::debug;

use crate::Gui;
use crate::engine::WindowBuilder;
use crate::error::{GuiError, GuiResult, NotifyError, NotifyResult};
use crate::layout::text_measure::{string_width, truncate_to_width};
use crate::menu::{Menu, MenuBehavior, MenuRedraw, MenuType, RepaintPlan, RowContext};
use crate::notify::{Event, EventType, HubId, NotifyCallback, WindowEvent};
use crate::renderer::FrameBuffer;
use crate::types::{Attr, Sizing, WindowActions, WindowId, WindowType};

impl Gui {
    pub fn menu(&self, win: WindowId) -> Option<&Menu> {
        self.windows.get(win)?.data::<Menu>()
    }

    pub fn menu_mut(&mut self, win: WindowId) -> Option<&mut Menu> {
        self.windows.get_mut(win)?.data_mut::<Menu>()
    }

    /// Run `f` on the menu of `win`; pending redraw intents schedule a recalc.
    pub fn with_menu<R>(&mut self, win: WindowId, f: impl FnOnce(&mut Menu) -> R) -> GuiResult<R> {
        let menu = self.menu_mut(win).ok_or(GuiError::NotAMenu(win))?;
        let out = f(menu);
        let pending = !menu.redraw.is_empty();
        if pending {
            self.add_actions(win, WindowActions::RECALC);
        }
        Ok(out)
    }

    /// Post redraw intents and schedule a recalc of the menu window.
    pub fn menu_queue_redraw(&mut self, win: WindowId, redraw: MenuRedraw) -> GuiResult<()> {
        self.with_menu(win, |m| m.queue_redraw(redraw))
    }

    /// Move the selection, honouring `menu_wrap`.
    pub fn menu_move(&mut self, win: WindowId, delta: isize) -> GuiResult<bool> {
        let wrap = self.config.get_bool("menu_wrap").unwrap_or(false);
        self.with_menu(win, |m| m.move_selection(delta, wrap))
    }
}

/// Create a maximised window showing a new menu.
pub fn menu_window_new(
    gui: &mut Gui,
    kind: MenuType,
    behavior: impl MenuBehavior,
) -> GuiResult<WindowId> {
    let win = WindowBuilder::new(WindowType::Menu)
        .width(Sizing::Maximise)
        .height(Sizing::Maximise)
        .data(Menu::new(kind, behavior))
        .recalc(menu_recalc)
        .repaint(menu_repaint)
        .build(gui);

    gui.subscribe(HubId::Global, EventType::Config, menu_config_observer, win)?;
    gui.subscribe(HubId::Window(win), EventType::Window, menu_window_observer, win)?;
    Ok(win)
}

fn menu_recalc(gui: &mut Gui, win: WindowId) -> GuiResult<()> {
    let rows = gui.window(win).ok_or(GuiError::StaleWindow(win))?.state().rows;
    gui.with_menu(win, |m| m.set_page_len(rows as usize))?;
    gui.add_actions(win, WindowActions::REPAINT);
    debug!(?win, "menu recalc done, request REPAINT");
    Ok(())
}

fn menu_repaint(gui: &mut Gui, win: WindowId) -> GuiResult<()> {
    let Gui {
        windows,
        screen,
        config,
        ..
    } = gui;
    let config = &*config;
    let w = windows.get_mut(win).ok_or(GuiError::StaleWindow(win))?;
    let state = w.state();
    let menu = w.data_mut::<Menu>().ok_or(GuiError::NotAMenu(win))?;

    let mut plan = RepaintPlan::from(menu.redraw);
    if plan == RepaintPlan::Motion && menu.painted_current.is_none() {
        plan = RepaintPlan::Full;
    }

    let arrow = config.get_bool("arrow_cursor").unwrap_or(false);
    let arrow_str = config.get_str("arrow_string").unwrap_or("->");
    let width = state.cols as usize;
    let page = (state.rows as usize).min(menu.page_len.max(1));

    let paint = |menu: &Menu, screen: &mut FrameBuffer, row: usize| {
        let y = state.row_offset + row as u16;
        let view_index = menu.top + row;
        let Some(item) = menu.real_index(view_index) else {
            screen.paint_row(state.col_offset, y, state.cols, "", Attr::NONE);
            return;
        };
        let selected = menu.current == Some(view_index);

        let mut text = String::new();
        let mut row_width = width;
        if arrow {
            let prefix = if selected { arrow_str } else { "" };
            let pad = string_width(arrow_str).saturating_sub(string_width(prefix));
            text.push_str(prefix);
            text.extend(std::iter::repeat_n(' ', pad + 1));
            row_width = row_width.saturating_sub(string_width(&text));
        }
        let ctx = RowContext {
            config,
            tagged: menu.is_tagged(item),
            width: row_width,
        };
        let mut body = String::new();
        menu.behavior().render_row(item, &ctx, &mut body);
        text.push_str(truncate_to_width(&body, row_width));

        let attrs = if selected && !arrow {
            Attr::REVERSE
        } else {
            Attr::NONE
        };
        screen.paint_row(state.col_offset, y, state.cols, &text, attrs);
    };

    let visible_row = |menu: &Menu, view_index: usize| {
        (view_index >= menu.top && view_index < menu.top + page).then(|| view_index - menu.top)
    };

    match plan {
        RepaintPlan::Full => {
            for row in 0..state.rows as usize {
                paint(menu, screen, row);
            }
        }
        RepaintPlan::Motion => {
            if let Some(row) = menu.painted_current.and_then(|p| visible_row(menu, p)) {
                paint(menu, screen, row);
            }
            if let Some(row) = menu.current.and_then(|c| visible_row(menu, c)) {
                paint(menu, screen, row);
            }
        }
        RepaintPlan::Current => {
            if let Some(row) = menu.current.and_then(|c| visible_row(menu, c)) {
                paint(menu, screen, row);
            }
        }
        RepaintPlan::Nothing => {}
    }

    menu.painted_current = menu.current;
    menu.redraw = MenuRedraw::empty();
    debug!(?win, ?plan, "menu repaint done");
    Ok(())
}

fn menu_config_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    let Some(key) = nc.event.config_key() else {
        return Ok(());
    };
    if !key.starts_with("arrow_") && !key.starts_with("menu_") {
        return Ok(());
    }
    gui.menu_queue_redraw(nc.context, MenuRedraw::INDEX)?;
    debug!(key, "config done, request RECALC");
    Ok(())
}

fn menu_window_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    let Event::Window { subtype, win } = nc.event else {
        return Ok(());
    };
    if *win != nc.context {
        return Ok(());
    }
    match subtype {
        WindowEvent::State => {
            let rows = gui
                .window(*win)
                .ok_or(NotifyError::MissingContext(*win))?
                .state()
                .rows;
            gui.with_menu(*win, |m| {
                m.set_page_len(rows as usize);
                m.queue_redraw(MenuRedraw::INDEX);
            })?;
            gui.add_actions(*win, WindowActions::REPAINT);
            debug!("window state done, request REPAINT");
        }
        WindowEvent::Delete => debug!("window delete done"),
        WindowEvent::Focus => {}
    }
    Ok(())
}
