//! Pager - show a text file
//!
//! With `pager = "builtin"` (or empty) the file is shown in a menu, one line
//! per row. Any other value is a shell command: the terminal is handed
//! over, `%s` in the command is replaced by the quoted file name (or the
//! name is appended), and the terminal is taken back afterwards.
//!
//! Either way the file is deleted when the pager returns.

use std::any::Any;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::Gui;
use crate::engine::WindowBuilder;
use crate::error::{GuiResult, NotifyResult, PagerError};
use crate::layout::expand_tabs;
use crate::menu::window::menu_window_new;
use crate::menu::{MenuBehavior, MenuType, RowContext, TagAction};
use crate::notify::{EventType, HubId, NotifyCallback};
use crate::pipeline::{Terminal, menu_loop};
use crate::screens::help::show_help;
use crate::state::keymap::{HelpEntry, Op};
use crate::types::{Orient, Sizing, WindowId, WindowType};
use crate::windows::dialog::dialog_build;
use crate::windows::{sbar_new, sbar_set_title, window_status_on_top};

const TAB_WIDTH: usize = 8;

static PAGER_HELP: &[HelpEntry] = &[
    HelpEntry { op: Op::Exit, label: "Exit" },
    HelpEntry { op: Op::PrevPage, label: "PrevPg" },
    HelpEntry { op: Op::NextPage, label: "NextPg" },
    HelpEntry { op: Op::Help, label: "Help" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerMode {
    /// Help text; asking for help again is refused.
    Help,
    /// An attachment being viewed.
    Attach,
    Other,
}

/// What to show and how.
#[derive(Debug, Clone)]
pub struct PagerView {
    /// Temporary file; removed when the pager returns.
    pub path: PathBuf,
    pub title: String,
    pub mode: PagerMode,
}

impl PagerView {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>, mode: PagerMode) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            mode,
        }
    }
}

/// Lines of the file being paged.
#[derive(Debug, Default)]
pub struct PagerLines {
    lines: Vec<String>,
}

impl PagerLines {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(|l| expand_tabs(l, TAB_WIDTH)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl MenuBehavior for PagerLines {
    fn render_row(&self, item: usize, _ctx: &RowContext<'_>, buf: &mut String) {
        if let Some(line) = self.lines.get(item) {
            buf.push_str(line);
        }
    }

    /// Lines cannot be tagged.
    fn tag(&mut self, _item: usize, _action: TagAction, _tagged: bool) -> i32 {
        0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Show `view` and remove its file.
pub fn do_pager(gui: &mut Gui, term: &mut dyn Terminal, view: PagerView) -> GuiResult<()> {
    let command = gui.config.get_str("pager").unwrap_or("builtin").to_string();
    let result = if command.is_empty() || command == "builtin" {
        builtin_pager(gui, term, &view)
    } else {
        external_pager(gui, term, &command, &view.path)
    };

    if let Err(err) = fs::remove_file(&view.path) {
        warn!(path = %view.path.display(), %err, "cannot remove pager file");
    }
    result
}

// =============================================================================
// Built-in
// =============================================================================

fn builtin_pager(gui: &mut Gui, term: &mut dyn Terminal, view: &PagerView) -> GuiResult<()> {
    let text = fs::read(&view.path).map_err(|source| PagerError::Read {
        path: view.path.clone(),
        source,
    })?;
    let lines = PagerLines::new(&String::from_utf8_lossy(&text));
    let count = lines.len();

    let (dlg, menu) = pager_dialog_new(gui, &view.title, lines)?;
    gui.with_menu(menu, |m| m.set_items(count))?;
    debug!(path = %view.path.display(), lines = count, "builtin pager");

    let result = pager_loop(gui, term, menu, view.mode);

    let popped = gui.dialog_pop()?;
    if popped != dlg {
        warn!(?popped, ?dlg, "pager popped an unexpected dialog");
    }
    gui.window_free(popped);
    result
}

fn pager_loop(gui: &mut Gui, term: &mut dyn Terminal, menu: WindowId, mode: PagerMode) -> GuiResult<()> {
    loop {
        match menu_loop(gui, term, menu)? {
            Op::Exit => return Ok(()),
            Op::Help if mode == PagerMode::Help => gui.show_error("Help is currently being shown."),
            Op::Help => show_help(gui, term, MenuType::Pager)?,
            _ => {}
        }
    }
}

/// ```text
/// DlgDoPager
/// └─ Container (panel)
///    ├─ Menu
///    └─ StatusBar
/// ```
fn pager_dialog_new(gui: &mut Gui, title: &str, lines: PagerLines) -> GuiResult<(WindowId, WindowId)> {
    let dlg = WindowBuilder::new(WindowType::DlgDoPager)
        .orient(Orient::Vertical)
        .width(Sizing::Maximise)
        .height(Sizing::Maximise)
        .help(PAGER_HELP)
        .build(gui);
    let menu = dialog_build(gui, dlg, |gui| {
        let panel = WindowBuilder::new(WindowType::Container)
            .orient(Orient::Vertical)
            .width(Sizing::Maximise)
            .height(Sizing::Maximise)
            .build(gui);
        gui.add_child(dlg, panel)?;

        let menu = menu_window_new(gui, MenuType::Pager, lines)?;
        gui.add_child(panel, menu)?;
        let pbar = sbar_new(gui)?;
        gui.add_child(panel, pbar)?;
        sbar_set_title(gui, pbar, title)?;
        window_status_on_top(gui, panel, WindowType::StatusBar)?;

        gui.window_or_err(dlg)?.focus = Some(menu);
        gui.subscribe(HubId::Global, EventType::Config, pager_config_observer, panel)?;
        gui.dialog_push(dlg)?;
        Ok(menu)
    })?;
    Ok((dlg, menu))
}

fn pager_config_observer(gui: &mut Gui, nc: &NotifyCallback<'_>) -> NotifyResult {
    if nc.event.config_key() != Some("status_on_top") {
        return Ok(());
    }
    window_status_on_top(gui, nc.context, WindowType::StatusBar)?;
    Ok(())
}

// =============================================================================
// External
// =============================================================================

/// Quote `path` for `sh`.
fn shell_quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("'{}'", raw.replace('\'', r"'\''"))
}

/// `command` with `%s` replaced by the quoted path, or the path appended.
pub fn expand_pager_command(command: &str, path: &Path) -> String {
    let quoted = shell_quote(path);
    if command.contains("%s") {
        command.replace("%s", &quoted)
    } else {
        format!("{command} {quoted}")
    }
}

fn external_pager(gui: &mut Gui, term: &mut dyn Terminal, command: &str, path: &Path) -> GuiResult<()> {
    let cmd = expand_pager_command(command, path);
    term.suspend()?;
    info!(cmd, "running external pager");
    let status = Command::new("sh").arg("-c").arg(&cmd).status();
    term.resume()?;
    term.invalidate();

    let err = match status {
        Ok(status) if status.success() => return Ok(()),
        Ok(status) => PagerError::Failed {
            command: cmd,
            status: status.code(),
        },
        Err(source) => PagerError::Spawn { command: cmd, source },
    };
    gui.show_error(&err.to_string());
    Err(err.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuiError;
    use crate::pipeline::{InputEvent, ScriptedTerminal};
    use crate::windows::rootwin_new;
    use crossterm::event::KeyCode;
    use std::io::Write;

    fn setup(pager: &str) -> Gui {
        let mut gui = Gui::new();
        gui.config_set("pager", pager).unwrap();
        rootwin_new(&mut gui, 30, 6).unwrap();
        gui
    }

    fn temp_file(text: &str) -> PathBuf {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        let (_, path) = file.keep().unwrap();
        path
    }

    #[test]
    fn test_builtin_shows_lines_and_removes_file() {
        let mut gui = setup("builtin");
        let path = temp_file("one\ntwo\tx\nthree\n");
        let mut term = ScriptedTerminal::new([InputEvent::char('q')]);

        do_pager(&mut gui, &mut term, PagerView::new(&path, "Notes", PagerMode::Other)).unwrap();

        let frame = term.last_frame().unwrap();
        assert_eq!(frame[1].trim_end(), "one");
        assert_eq!(frame[2].trim_end(), "two     x");
        assert_eq!(frame[4].trim_end(), "Notes");
        assert!(!path.exists());
        assert!(gui.dialogs().is_empty());
    }

    #[test]
    fn test_builtin_pages_with_space() {
        let mut gui = setup("");
        let text: String = (0..10).map(|i| format!("line {i}\n")).collect();
        let path = temp_file(&text);
        let mut term = ScriptedTerminal::new([InputEvent::char(' '), InputEvent::char('q')]);

        do_pager(&mut gui, &mut term, PagerView::new(&path, "t", PagerMode::Other)).unwrap();
        let frame = term.last_frame().unwrap();
        assert_eq!(frame[1].trim_end(), "line 3");
    }

    #[test]
    fn test_help_inside_help_refused() {
        let mut gui = setup("builtin");
        let path = temp_file("help text\n");
        let mut term = ScriptedTerminal::new([InputEvent::char('?'), InputEvent::key(KeyCode::Esc)]);

        do_pager(&mut gui, &mut term, PagerView::new(&path, "Help", PagerMode::Help)).unwrap();
        let frame = term.last_frame().unwrap();
        assert_eq!(frame[5].trim_end(), "Help is currently being shown.");
    }

    #[test]
    fn test_status_on_top_puts_bar_first() {
        let mut gui = setup("builtin");
        gui.config_set("status_on_top", true).unwrap();
        let path = temp_file("body\n");
        let mut term = ScriptedTerminal::new([InputEvent::char('q')]);

        do_pager(&mut gui, &mut term, PagerView::new(&path, "Top", PagerMode::Other)).unwrap();
        let frame = term.last_frame().unwrap();
        assert_eq!(frame[0].trim_end(), "Top");
        assert_eq!(frame[1].trim_end(), "body");
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut gui = setup("builtin");
        let mut term = ScriptedTerminal::default();
        let view = PagerView::new("/nonexistent/panekit/pager", "x", PagerMode::Other);
        assert!(matches!(
            do_pager(&mut gui, &mut term, view),
            Err(GuiError::Pager(PagerError::Read { .. }))
        ));
    }

    #[test]
    fn test_expand_command() {
        let path = Path::new("/tmp/it's here");
        assert_eq!(expand_pager_command("less %s", path), r"less '/tmp/it'\''s here'");
        assert_eq!(expand_pager_command("cat", Path::new("/tmp/a")), "cat '/tmp/a'");
    }

    #[cfg(unix)]
    #[test]
    fn test_external_success_suspends_and_removes() {
        let mut gui = setup("true");
        let path = temp_file("data");
        let mut term = ScriptedTerminal::default();

        do_pager(&mut gui, &mut term, PagerView::new(&path, "x", PagerMode::Attach)).unwrap();
        assert_eq!(term.suspensions(), (1, 1));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_external_failure_reports_and_removes() {
        let mut gui = setup("false");
        let path = temp_file("data");
        let mut term = ScriptedTerminal::default();

        let err = do_pager(&mut gui, &mut term, PagerView::new(&path, "x", PagerMode::Attach)).unwrap_err();
        assert!(matches!(err, GuiError::Pager(PagerError::Failed { .. })));
        let msg = gui.message_text().unwrap();
        assert!(msg.starts_with("Error running \"false '"), "{msg}");
        assert!(!path.exists());
    }
}
