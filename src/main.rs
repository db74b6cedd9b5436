//! panekit demo - run one of the screens in the terminal

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use panekit::screens::compose::{Attachment, ComposeResult, dlg_compose};
use panekit::screens::{PagerMode, PagerView, dlg_select_pattern, do_pager};
use panekit::windows::rootwin_new;
use panekit::{CrosstermTerminal, Gui, GuiResult, logging};

#[derive(Parser)]
#[command(name = "panekit")]
#[command(about = "Try the compose, pattern and pager screens")]
#[command(version)]
struct Cli {
    /// TOML file with option overrides
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pick a search pattern and print it
    Pattern,

    /// Show a text file
    Pager {
        file: PathBuf,
    },

    /// Review a list of attachments
    Compose {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// What a screen produced, printed once the terminal is restored.
enum Outcome {
    Pattern(Option<String>),
    Paged,
    Compose(ComposeResult, Vec<Attachment>),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.log.as_deref(), &cli.log_level) {
        eprintln!("panekit: cannot open log file: {err}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(outcome) => {
            report(outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "panekit failed");
            eprintln!("panekit: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> GuiResult<Outcome> {
    let mut gui = Gui::new();
    if let Some(path) = &cli.config {
        gui.config_load_file(path)?;
    }

    let mut term = CrosstermTerminal::new()?;
    let (cols, rows) = term.size()?;
    rootwin_new(&mut gui, cols, rows)?;
    info!(cols, rows, "terminal ready");

    let outcome = match &cli.command {
        Command::Pattern => Outcome::Pattern(dlg_select_pattern(&mut gui, &mut term)?),
        Command::Pager { file } => {
            let copy = scratch_copy(file)?;
            let title = file.display().to_string();
            do_pager(&mut gui, &mut term, PagerView::new(copy, title, PagerMode::Other))?;
            Outcome::Paged
        }
        Command::Compose { files } => {
            let items = files
                .iter()
                .map(|path| {
                    // unreadable files keep 7bit; the failure is logged
                    let mut att = Attachment::from_file(path);
                    att.update_encoding();
                    att
                })
                .collect();
            let (result, items) = dlg_compose(&mut gui, &mut term, items)?;
            Outcome::Compose(result, items)
        }
    };

    gui.shutdown();
    Ok(outcome)
}

/// The pager deletes what it shows, so give it a copy.
fn scratch_copy(file: &Path) -> GuiResult<PathBuf> {
    let copy = tempfile::Builder::new().prefix("panekit-pager-").tempfile()?;
    let (_, path) = copy.keep().map_err(|err| err.error)?;
    std::fs::copy(file, &path)?;
    Ok(path)
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Pattern(Some(tag)) => println!("{tag}"),
        Outcome::Pattern(None) | Outcome::Paged => {}
        Outcome::Compose(result, items) => {
            println!("{result:?}");
            for att in &items {
                println!("  {} ({})", att.display_name(), att.content_type);
            }
        }
    }
}
