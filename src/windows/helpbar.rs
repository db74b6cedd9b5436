//! Help Bar - key hints for the focused dialog
//!
//! Rebuilt when the focused dialog changes. Each dialog declares which
//! operations to advertise; the keys come from the live keymap, so rebinding
//! a key changes the hint.

use std::any::Any;

use tracing::debug;

use crate::Gui;
use crate::engine::{WindowBuilder, WindowData};
use crate::error::{GuiError, GuiResult, NotifyResult};
use crate::menu::MenuType;
use crate::notify::{Event, EventType, HubId, NotifyCallback, WindowEvent};
use crate::types::{Attr, Sizing, WindowActions, WindowId, WindowType};

#[derive(Debug, Default)]
pub struct HelpBarData {
    text: String,
}

impl HelpBarData {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl WindowData for HelpBarData {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub fn helpbar_new(gui: &mut Gui) -> GuiResult<WindowId> {
    let mut builder = WindowBuilder::new(WindowType::HelpBar)
        .width(Sizing::Unlimited)
        .height(Sizing::Fixed(1))
        .data(HelpBarData::default())
        .recalc(helpbar_recalc)
        .repaint(helpbar_repaint);
    if !gui.config.get_bool("help").unwrap_or(true) {
        builder = builder.hidden();
    }
    let win = builder.build(gui);
    gui.subscribe(HubId::Global, EventType::Window, helpbar_window_observer, win)?;
    gui.subscribe(HubId::Global, EventType::Config, helpbar_config_observer, win)?;
    Ok(win)
}

/// Help text for the focused dialog, e.g. `q:Exit  Enter:Select`.
fn help_text(gui: &Gui) -> String {
    let Some(dlg) = gui.focused_dialog() else {
        return String::new();
    };
    let Some(w) = gui.window(dlg) else {
        return String::new();
    };
    let menu_type = w
        .focus()
        .and_then(|f| gui.menu(f))
        .map_or(MenuType::Generic, |m| m.kind());

    let parts: Vec<String> = w
        .help()
        .iter()
        .filter_map(|entry| {
            let key = gui.keymap.key_name(menu_type, entry.op)?;
            Some(format!("{key}:{}", entry.label))
        })
        .collect();
    parts.join("  ")
}

fn helpbar_recalc(gui: &mut Gui, win: WindowId) -> GuiResult<()> {
    let text = help_text(gui);
    let w = gui.window_or_err(win)?;
    let data = w.data_mut::<HelpBarData>().ok_or(GuiError::MissingData(win, "help bar"))?;
    if data.text != text {
        data.text = text;
        w.actions |= WindowActions::REPAINT;
        debug!("helpbar recalc done, request REPAINT");
    }
    Ok(())
}

fn helpbar_repaint(gui: &mut Gui, win: WindowId) -> GuiResult<()> {
    let Gui { windows, screen, .. } = gui;
    let w = windows.get(win).ok_or(GuiError::StaleWindow(win))?;
    let state = w.state();
    let text = w.data::<HelpBarData>().map_or("", HelpBarData::text);
    if state.rows > 0 {
        screen.paint_row(state.col_offset, state.row_offset, state.cols, text, Attr::REVERSE);
    }
    Ok(())
}

fn helpbar_window_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    if let Event::Window {
        subtype: WindowEvent::Focus,
        ..
    } = nc.event
    {
        gui.add_actions(nc.context, WindowActions::RECALC);
        debug!("window focus done, request RECALC");
    }
    Ok(())
}

fn helpbar_config_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    if nc.event.config_key() != Some("help") {
        return Ok(());
    }
    let show = gui.config.get_bool("help").unwrap_or(true);
    gui.set_visible(nc.context, show)?;
    if let Some(parent) = gui.window(nc.context).and_then(|w| w.parent()) {
        gui.add_actions(parent, WindowActions::REFLOW);
    }
    debug!(show, "config done, request REFLOW");
    Ok(())
}
