//! Help - list the key bindings of a menu in the pager

use std::io::Write;

use tracing::debug;

use crate::Gui;
use crate::error::GuiResult;
use crate::layout::text_measure::{fit_to_width, string_width};
use crate::menu::MenuType;
use crate::pipeline::Terminal;
use crate::screens::pager::{PagerMode, PagerView, do_pager};

/// Help text for `menu`: one `key  function` line per binding.
pub fn help_text(gui: &Gui, menu: MenuType) -> String {
    let bindings = gui.keymap().bindings_for(menu);
    let width = bindings.iter().map(|(k, _)| string_width(k)).max().unwrap_or(0) + 2;
    let mut out = String::new();
    for (key, op) in bindings {
        out.push_str(&fit_to_width(&key, width));
        out.push_str(op.name());
        out.push('\n');
    }
    out
}

/// Show the bindings of `menu`.
pub fn show_help(gui: &mut Gui, term: &mut dyn Terminal, menu: MenuType) -> GuiResult<()> {
    let mut file = tempfile::Builder::new().prefix("panekit-help-").tempfile()?;
    file.write_all(help_text(gui, menu).as_bytes())?;
    let (_, path) = file.keep().map_err(|err| err.error)?;
    debug!(?menu, path = %path.display(), "help");

    let title = match menu {
        MenuType::Generic => "Help for generic menus",
        MenuType::Compose => "Help for compose",
        MenuType::Pager => "Help for pager",
    };
    do_pager(gui, term, PagerView::new(path, title, PagerMode::Help))
}
