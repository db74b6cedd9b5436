//! Compose Bar - status line of the compose dialog
//!
//! Shows `compose_format`:
//!
//! - `%a` number of attachments
//! - `%l` approximate message size after encoding
//! - `%v` version

use std::any::Any;

use tracing::debug;

use crate::Gui;
use crate::engine::{WindowBuilder, WindowData};
use crate::error::{GuiError, GuiResult, NotifyResult};
use crate::layout::expand_format;
use crate::notify::{Event, EventType, HubId, NotifyCallback, WindowEvent};
use crate::screens::compose::attach::AttachmentList;
use crate::screens::compose::size::{cum_attachs_size, pretty_size};
use crate::types::{Attr, Sizing, WindowActions, WindowId, WindowType};

#[derive(Debug)]
pub struct ComposeBarData {
    /// Attachment menu whose contents are summarised.
    menu: WindowId,
    text: String,
}

impl ComposeBarData {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl WindowData for ComposeBarData {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub fn cbar_new(gui: &mut Gui, dlg: WindowId, menu: WindowId) -> GuiResult<WindowId> {
    let win = WindowBuilder::new(WindowType::ComposeBar)
        .width(Sizing::Unlimited)
        .height(Sizing::Fixed(1))
        .data(ComposeBarData {
            menu,
            text: String::new(),
        })
        .recalc(cbar_recalc)
        .repaint(cbar_repaint)
        .build(gui);

    gui.subscribe(HubId::Window(dlg), EventType::Compose, cbar_compose_observer, win)?;
    gui.subscribe(HubId::Global, EventType::Config, cbar_config_observer, win)?;
    gui.subscribe(HubId::Window(win), EventType::Window, cbar_window_observer, win)?;
    Ok(win)
}

fn cbar_recalc(gui: &mut Gui, win: WindowId) -> GuiResult<()> {
    let menu = gui
        .window(win)
        .and_then(|w| w.data::<ComposeBarData>())
        .ok_or(GuiError::MissingData(win, "compose bar"))?
        .menu;
    let (count, size) = {
        let list = gui
            .menu_mut(menu)
            .and_then(|m| m.behavior_as_mut::<AttachmentList>())
            .ok_or(GuiError::NotAMenu(menu))?;
        (list.items.len(), cum_attachs_size(&mut list.items))
    };

    let fmt = gui.config.get_str("compose_format").unwrap_or("%l").to_string();
    let text = expand_format(&fmt, |c| match c {
        'a' => Some(count.to_string()),
        'l' => Some(pretty_size(size)),
        'v' => Some(env!("CARGO_PKG_VERSION").to_string()),
        _ => None,
    });

    let w = gui.window_or_err(win)?;
    let data = w
        .data_mut::<ComposeBarData>()
        .ok_or(GuiError::MissingData(win, "compose bar"))?;
    if data.text != text {
        data.text = text;
        w.actions |= WindowActions::REPAINT;
        debug!("cbar recalc done, request REPAINT");
    }
    Ok(())
}

fn cbar_repaint(gui: &mut Gui, win: WindowId) -> GuiResult<()> {
    let Gui { windows, screen, .. } = gui;
    let w = windows.get(win).ok_or(GuiError::StaleWindow(win))?;
    let state = w.state();
    let text = w.data::<ComposeBarData>().map_or("", ComposeBarData::text);
    if state.rows > 0 {
        screen.paint_row(state.col_offset, state.row_offset, state.cols, text, Attr::REVERSE);
    }
    Ok(())
}

fn cbar_compose_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    gui.add_actions(nc.context, WindowActions::RECALC);
    debug!("compose done, request RECALC");
    Ok(())
}

fn cbar_config_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    if nc.event.config_key() != Some("compose_format") {
        return Ok(());
    }
    gui.add_actions(nc.context, WindowActions::RECALC);
    debug!("config done, request RECALC");
    Ok(())
}

fn cbar_window_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    if let Event::Window { subtype: WindowEvent::State, win } = nc.event {
        if *win == nc.context {
            gui.add_actions(*win, WindowActions::RECALC_REPAINT);
            debug!("window state done, request RECALC");
        }
    }
    Ok(())
}
