#![forbid(unsafe_code)]

//! # tinct
//!
//! Command-line front end for the `tinct` theme library: derive palettes,
//! edit base colors, switch themes and check contrast.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tinct-cli -- palette --format css
//! ```

mod cli;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use thiserror::Error;
use tinct::{
    ColorEdit, ColorRole, FileStorage, MemoryStorage, OverrideStore, Storage, ThemeConfig,
    ThemeSession,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use render::{ConsoleRenderer, contrast_report};

/// Errors reported to the user as-is.
#[derive(Error, Debug)]
enum CliError {
    #[error("'{0}' is derived and cannot be set; choose primary, secondary or accent")]
    NotEditable(ColorRole),
    #[error("nothing was rendered")]
    NothingRendered,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    let config = load_config(&cli)?;
    let store = OverrideStore::new(open_storage(cli.store.clone()));
    let mut session = ThemeSession::restore(store, cli.system_dark);
    let mut renderer = ConsoleRenderer::new(config);

    match cli.command {
        Command::Palette(args) => {
            if let Some(theme) = args.theme.theme {
                session.theme_changed(theme);
            }
            session.apply(&mut renderer);
            let frame = renderer.frame().ok_or(CliError::NothingRendered)?;
            print!("{}", frame.format(args.format)?);
        }
        Command::Set(args) => {
            let edit = ColorEdit::for_role(args.role, args.color)
                .ok_or(CliError::NotEditable(args.role))?;
            if let Some(theme) = args.theme.theme {
                session.theme_changed(theme);
            }
            let palette = session.edit(&edit, &mut renderer);
            let scope = if args.role == ColorRole::Accent {
                "shared".to_string()
            } else {
                session.theme().to_string()
            };
            println!("{} = {} ({scope})", args.role, palette.get(args.role));
        }
        Command::Toggle => {
            println!("{}", session.toggle());
        }
        Command::Theme => {
            println!("{}", session.theme());
        }
        Command::Reset(args) => {
            if let Some(theme) = args.theme {
                session.theme_changed(theme);
            }
            session.reset(&mut renderer);
            println!("reset {} and shared overrides", session.theme());
        }
        Command::Overrides(args) => {
            let theme = args.theme.unwrap_or_else(|| session.theme());
            let merged = session.store().merge(theme);
            println!("{}", serde_json::to_string_pretty(&merged)?);
        }
        Command::Contrast(args) => {
            print!("{}", contrast_report(args.fg, args.bg));
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ThemeConfig> {
    let Some(path) = &cli.config else {
        return Ok(ThemeConfig::default());
    };
    let config = ThemeConfig::from_file(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    debug!(config.path = %path.display(), "Loaded theme config");
    Ok(config)
}

/// File storage at `dir` (or the platform default), else in-memory.
fn open_storage(dir: Option<PathBuf>) -> Box<dyn Storage> {
    let Some(dir) = dir.or_else(FileStorage::default_location) else {
        warn!("No data directory available, changes will not be saved");
        return Box::new(MemoryStorage::new());
    };
    if dir.exists() && !dir.is_dir() {
        warn!(storage.dir = %dir.display(), "Store path is not a directory, changes will not be saved");
        return Box::new(MemoryStorage::new());
    }
    debug!(storage.dir = %dir.display(), "Using file storage");
    Box::new(FileStorage::new(dir))
}
