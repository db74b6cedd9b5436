//! Attachment list - the compose dialog's menu
//!
//! Rows come from the `attach_format` option:
//!
//! | letter | shows                                  |
//! |--------|----------------------------------------|
//! | `%t`   | `*` when tagged                        |
//! | `%n`   | attachment number                      |
//! | `%d`   | description, else the file name        |
//! | `%f`   | file name                              |
//! | `%m`   | major content type                     |
//! | `%M`   | minor content type                     |
//! | `%e`   | transfer encoding                      |
//! | `%I`   | `I` inline, `A` attachment             |
//! | `%s`   | estimated encoded size                 |

use std::any::Any;

use tracing::debug;

use crate::Gui;
use crate::error::{GuiResult, NotifyResult};
use crate::layout::expand_format;
use crate::menu::window::menu_window_new;
use crate::menu::{MenuBehavior, MenuRedraw, MenuType, RowContext};
use crate::notify::{ConfigEvent, Event, EventType, HubId, NotifyCallback};
use crate::screens::compose::size::{Attachment, Disposition, pretty_size};
use crate::types::{WindowActions, WindowId};

#[derive(Debug, Default)]
pub struct AttachmentList {
    pub(crate) items: Vec<Attachment>,
}

impl AttachmentList {
    pub fn new(items: Vec<Attachment>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Attachment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Hand the attachments back, leaving the list empty.
    pub fn take(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.items)
    }
}

fn attach_field(att: &Attachment, num: usize, tagged: bool, letter: char) -> Option<String> {
    let (major, minor) = att
        .content_type
        .split_once('/')
        .unwrap_or((att.content_type.as_str(), ""));
    let value = match letter {
        't' => (if tagged { "*" } else { " " }).to_string(),
        'n' => num.to_string(),
        'd' => att.display_name(),
        'f' => att.path().map(|p| p.display().to_string()).unwrap_or_default(),
        'm' => major.to_string(),
        'M' => minor.to_string(),
        'e' => att.encoding.name().to_string(),
        'I' => match att.disposition {
            Disposition::Inline => "I",
            Disposition::Attachment => "A",
        }
        .to_string(),
        's' => pretty_size(att.content.map_or(0, |info| info.encoded_size(att.encoding))),
        _ => return None,
    };
    Some(value)
}

impl MenuBehavior for AttachmentList {
    fn render_row(&self, item: usize, ctx: &RowContext<'_>, buf: &mut String) {
        let Some(att) = self.items.get(item) else {
            return;
        };
        let fmt = ctx.config.get_str("attach_format").unwrap_or("%t%2n %d");
        buf.push_str(&expand_format(fmt, |c| attach_field(att, item + 1, ctx.tagged, c)));
    }

    fn free(self: Box<Self>) {
        debug!(count = self.items.len(), "attachment list freed");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Create the attachment menu; it listens for changes on `dlg`'s hub.
pub fn attach_new(gui: &mut Gui, dlg: WindowId, items: Vec<Attachment>) -> GuiResult<WindowId> {
    let count = items.len();
    let win = menu_window_new(gui, MenuType::Compose, AttachmentList::new(items))?;
    gui.with_menu(win, |m| m.set_items(count))?;

    gui.subscribe(HubId::Window(dlg), EventType::Compose, attach_compose_observer, win)?;
    gui.subscribe(HubId::Global, EventType::Config, attach_config_observer, win)?;
    Ok(win)
}

/// The operation that changed the list has already posted how much of the
/// menu to repaint; only the page needs recalculating here.
fn attach_compose_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    gui.add_actions(nc.context, WindowActions::RECALC);
    debug!("compose done, request RECALC");
    Ok(())
}

fn attach_config_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    let Event::Config { subtype, key } = nc.event else {
        return Ok(());
    };
    if *subtype == ConfigEvent::InitialSet || key != "attach_format" {
        return Ok(());
    }
    gui.menu_queue_redraw(nc.context, MenuRedraw::INDEX)?;
    debug!("config done, request RECALC");
    Ok(())
}
