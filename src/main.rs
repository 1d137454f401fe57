// portalmap - live map of time-limited portal connections between zones
//
// Loads the zone catalog and the connection store, then runs the
// tick -> draw -> poll loop until the user quits.

mod app;
mod sync;
mod theme;
mod ui;
mod world;
mod zones;

use anyhow::{bail, Context, Result};
use app::{
    event::{handle_key_event, handle_mouse_event},
    AppState,
};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use sync::ConnectionStore;
use world::{LayoutConfig, World};
use zones::ZoneDirectory;

/// Live map of portal connections between zones
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Zone catalog (JSON array); the built-in catalog when omitted
    #[arg(long, value_name = "FILE")]
    zones: Option<PathBuf>,

    /// Connection store (JSON array of records), created on first change
    #[arg(long, value_name = "FILE")]
    connections: Option<PathBuf>,

    /// Seed for the layout and id random source
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let directory = match &args.zones {
        Some(path) => ZoneDirectory::load(path)
            .with_context(|| format!("loading zone catalog {}", path.display()))?,
        None => ZoneDirectory::builtin().context("loading built-in zone catalog")?,
    };
    if directory.is_empty() {
        bail!("zone catalog has no zones");
    }
    let world = match args.seed {
        Some(seed) => World::with_seed(LayoutConfig::default(), seed),
        None => World::new(LayoutConfig::default()),
    };
    let store = args.connections.map(ConnectionStore::new);
    let app = AppState::new(directory, world, store);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: AppState) -> Result<()> {
    loop {
        app.on_tick();
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if !app.running {
            return Ok(());
        }

        if event::poll(app.refresh_config.ui_interval())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(&mut app, key.code);
                }
                Event::Mouse(mouse) => handle_mouse_event(&mut app, mouse),
                _ => {}
            }
        }
    }
}
