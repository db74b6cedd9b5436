//! Compose - review the attachments of a message before sending
//!
//! ```text
//! DlgCompose                status_on_top = true
//! ├─ StatusBar "-- Attachments"   ├─ ComposeBar
//! ├─ Menu (attachments)           ├─ StatusBar
//! └─ ComposeBar                   └─ Menu
//! ```
//!
//! Every change to the attachment list is published as
//! `Compose{Attachments}` on the dialog's hub. The attachment menu and the
//! compose bar listen there and recalculate themselves.

pub mod attach;
pub mod cbar;
pub mod size;

pub use attach::{AttachmentList, attach_new};
pub use cbar::{ComposeBarData, cbar_new};
pub use size::{Attachment, AttachmentSource, ContentInfo, Disposition, Encoding, cum_attachs_size, pretty_size};

use std::io::Write;

use tracing::debug;

use crate::Gui;
use crate::engine::WindowBuilder;
use crate::error::{GuiError, GuiResult, NotifyResult};
use crate::menu::{MenuRedraw, MenuType};
use crate::notify::{ComposeEvent, Event, EventType, HubId, NotifyCallback};
use crate::pipeline::{Terminal, menu_loop};
use crate::screens::help::show_help;
use crate::screens::pager::{PagerMode, PagerView, do_pager};
use crate::state::keymap::{HelpEntry, Op};
use crate::types::{Orient, Sizing, WindowId, WindowType};
use crate::windows::dialog::dialog_build;
use crate::windows::{sbar_new, sbar_set_title, window_status_on_top};

static COMPOSE_HELP: &[HelpEntry] = &[
    HelpEntry { op: Op::Send, label: "Send" },
    HelpEntry { op: Op::Exit, label: "Abort" },
    HelpEntry { op: Op::DeleteAttachment, label: "Detach" },
    HelpEntry { op: Op::Help, label: "Help" },
];

/// How the compose dialog was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeResult {
    Send,
    Abort,
}

/// Windows of a compose dialog.
#[derive(Debug, Clone, Copy)]
pub struct ComposeDialog {
    pub dlg: WindowId,
    pub menu: WindowId,
    pub cbar: WindowId,
}

/// Build the compose dialog around `items` and push it.
pub fn compose_dialog_new(gui: &mut Gui, items: Vec<Attachment>) -> GuiResult<ComposeDialog> {
    let dlg = WindowBuilder::new(WindowType::DlgCompose)
        .orient(Orient::Vertical)
        .width(Sizing::Maximise)
        .height(Sizing::Maximise)
        .help(COMPOSE_HELP)
        .build(gui);

    dialog_build(gui, dlg, |gui| {
        let abar = sbar_new(gui)?;
        gui.add_child(dlg, abar)?;
        sbar_set_title(gui, abar, "-- Attachments")?;
        let menu = attach_new(gui, dlg, items)?;
        gui.add_child(dlg, menu)?;
        let cbar = cbar_new(gui, dlg, menu)?;
        gui.add_child(dlg, cbar)?;
        compose_status_on_top(gui, dlg)?;

        gui.window_or_err(dlg)?.focus = Some(menu);
        gui.subscribe(HubId::Global, EventType::Config, compose_config_observer, dlg)?;
        gui.dialog_push(dlg)?;
        Ok(ComposeDialog { dlg, menu, cbar })
    })
}

/// The compose bar goes first or last; the attachments bar stays on the menu.
fn compose_status_on_top(gui: &mut Gui, dlg: WindowId) -> GuiResult<bool> {
    window_status_on_top(gui, dlg, WindowType::ComposeBar)
}

fn compose_config_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    if nc.event.config_key() != Some("status_on_top") {
        return Ok(());
    }
    compose_status_on_top(gui, nc.context)?;
    debug!("config done, request REFLOW");
    Ok(())
}

/// Let the user review `items`. Returns the outcome and the (possibly
/// edited) attachment list.
pub fn dlg_compose(
    gui: &mut Gui,
    term: &mut dyn Terminal,
    items: Vec<Attachment>,
) -> GuiResult<(ComposeResult, Vec<Attachment>)> {
    let cd = compose_dialog_new(gui, items)?;
    let result = compose_loop(gui, term, &cd);

    let items = gui
        .menu_mut(cd.menu)
        .and_then(|m| m.behavior_as_mut::<AttachmentList>())
        .map(AttachmentList::take)
        .unwrap_or_default();
    let popped = gui.dialog_pop()?;
    gui.window_free(popped);
    debug!(?result, count = items.len(), "compose done");
    Ok((result?, items))
}

fn compose_loop(gui: &mut Gui, term: &mut dyn Terminal, cd: &ComposeDialog) -> GuiResult<ComposeResult> {
    loop {
        match menu_loop(gui, term, cd.menu)? {
            Op::Send => return Ok(ComposeResult::Send),
            Op::Exit => return Ok(ComposeResult::Abort),
            Op::DeleteAttachment => delete_attachment(gui, cd)?,
            Op::MoveUp => move_attachment(gui, cd, -1)?,
            Op::MoveDown => move_attachment(gui, cd, 1)?,
            Op::UpdateEncoding => update_current_encoding(gui, cd)?,
            Op::ToggleDisposition => toggle_disposition(gui, cd)?,
            Op::SelectEntry => view_attachment(gui, term, cd)?,
            Op::Help => show_help(gui, term, MenuType::Compose)?,
            _ => {}
        }
    }
}

fn attachments_changed(gui: &mut Gui, dlg: WindowId) {
    gui.notify_send(HubId::Window(dlg), Event::compose(ComposeEvent::Attachments));
}

/// Selected real index and the number of attachments.
fn selection(gui: &Gui, menu: WindowId) -> GuiResult<(Option<usize>, usize)> {
    let m = gui.menu(menu).ok_or(GuiError::NotAMenu(menu))?;
    let count = m.behavior_as::<AttachmentList>().map_or(0, AttachmentList::len);
    Ok((m.current_item(), count))
}

fn delete_attachment(gui: &mut Gui, cd: &ComposeDialog) -> GuiResult<()> {
    let (Some(idx), count) = selection(gui, cd.menu)? else {
        return Ok(());
    };
    if count <= 1 {
        gui.show_error("You may not delete the only attachment.");
        return Ok(());
    }
    gui.with_menu(cd.menu, |m| {
        if let Some(list) = m.behavior_as_mut::<AttachmentList>() {
            list.items.remove(idx);
        }
        m.remove_item(idx);
    })?;
    debug!(idx, "attachment deleted");
    attachments_changed(gui, cd.dlg);
    Ok(())
}

/// Swap the selected attachment with its neighbour. The first attachment
/// is the message body and stays in place.
fn move_attachment(gui: &mut Gui, cd: &ComposeDialog, delta: isize) -> GuiResult<()> {
    let (Some(idx), count) = selection(gui, cd.menu)? else {
        return Ok(());
    };
    let refusal = match delta {
        -1 if idx == 0 => Some("Attachment is already at top."),
        -1 if idx == 1 => Some("The fundamental part can't be moved."),
        1 if idx + 1 >= count => Some("Attachment is already at bottom."),
        1 if idx == 0 => Some("The fundamental part can't be moved."),
        _ => None,
    };
    if let Some(msg) = refusal {
        gui.show_error(msg);
        return Ok(());
    }

    let other = idx.saturating_add_signed(delta);
    gui.with_menu(cd.menu, |m| {
        if let Some(list) = m.behavior_as_mut::<AttachmentList>() {
            list.items.swap(idx, other);
        }
        m.swap_tags(idx, other);
        m.queue_redraw(MenuRedraw::INDEX);
        m.set_index(other)
    })??;
    debug!(from = idx, to = other, "attachment moved");
    attachments_changed(gui, cd.dlg);
    Ok(())
}

/// Run `f` on the selected attachment and repaint only its row. `f`
/// returns whether the attachment changed.
fn edit_current(gui: &mut Gui, cd: &ComposeDialog, f: impl FnOnce(&mut Attachment) -> bool) -> GuiResult<bool> {
    let (Some(idx), _) = selection(gui, cd.menu)? else {
        return Ok(false);
    };
    let changed = gui.with_menu(cd.menu, |m| {
        let changed = m
            .behavior_as_mut::<AttachmentList>()
            .and_then(|list| list.items.get_mut(idx))
            .is_some_and(f);
        if changed {
            m.queue_redraw(MenuRedraw::CURRENT);
        }
        changed
    })?;
    if changed {
        attachments_changed(gui, cd.dlg);
    }
    Ok(changed)
}

fn update_current_encoding(gui: &mut Gui, cd: &ComposeDialog) -> GuiResult<()> {
    let mut name = String::new();
    let updated = edit_current(gui, cd, |att| {
        name = att.display_name();
        att.update_encoding()
    })?;
    if !updated && !name.is_empty() {
        gui.show_error(&format!("Can't read {name}"));
    }
    Ok(())
}

fn toggle_disposition(gui: &mut Gui, cd: &ComposeDialog) -> GuiResult<()> {
    edit_current(gui, cd, |att| {
        att.disposition = att.disposition.toggled();
        true
    })?;
    Ok(())
}

fn view_attachment(gui: &mut Gui, term: &mut dyn Terminal, cd: &ComposeDialog) -> GuiResult<()> {
    let (Some(idx), _) = selection(gui, cd.menu)? else {
        return Ok(());
    };
    let (bytes, title) = {
        let m = gui.menu(cd.menu).ok_or(GuiError::NotAMenu(cd.menu))?;
        let Some(att) = m.behavior_as::<AttachmentList>().and_then(|l| l.items.get(idx)) else {
            return Ok(());
        };
        (att.read(), att.display_name())
    };
    let bytes = match bytes {
        Ok(b) => b,
        Err(err) => {
            gui.show_error(&format!("Can't read {title}: {err}"));
            return Ok(());
        }
    };

    let mut file = tempfile::Builder::new().prefix("panekit-view-").tempfile()?;
    file.write_all(&bytes)?;
    let (_, path) = file.keep().map_err(|err| err.error)?;
    do_pager(gui, term, PagerView::new(path, title, PagerMode::Attach))
}
