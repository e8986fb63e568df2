use anyhow::{anyhow, Context, Result};
use catalog_client::Client;
use log::{info, warn};
use ratatui::prelude::*;
use simplelog::{LevelFilter, WriteLogger};
use std::{env, fs::File, io};
use xdg::BaseDirectories;

use app::App;
use config::{Config, APP_NAME};
use event::EventBus;
use route::Route;
use session_cache::SessionCache;
use store::Store;

mod app;
mod config;
mod event;
mod route;
mod session_cache;
mod store;
mod styles;
mod tui;
mod views;
mod widgets;

fn main() -> Result<()> {
    let log_path = BaseDirectories::with_prefix(APP_NAME)?
        .place_state_file(format!("{}.log", APP_NAME))
        .context("error creating state directory")?;
    WriteLogger::init(
        LevelFilter::Debug,
        simplelog::Config::default(),
        File::create(log_path).context("error creating log file")?,
    )?;

    let start = match env::args().nth(1) {
        Some(path) => Route::parse(&path).ok_or_else(|| anyhow!("no page at {}", path))?,
        None => Route::Home,
    };

    let config = Config::load()?;
    let client = Client::new(&config.api_base);
    let session = match SessionCache::load() {
        Ok(c) => Some(c.into_session()),
        Err(e) => {
            info!("not using cached session: {:#}", e);
            None
        }
    };

    let bus = EventBus::new();
    bus.spawn_terminal_listener()?;

    let store = Store::new(&bus, client, config.download_dir()?)?;
    let mut app = App::new(store, session, start);

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stderr()))?;
    tui::init(&mut terminal)?;

    let res = run(&mut terminal, &mut app, &bus);

    tui::exit(&mut terminal)?;
    if let Err(e) = &res {
        warn!("exiting with error: {:#}", e);
    }

    // the store's channels need to close before the bus joins its threads
    drop(app);
    drop(bus);

    res
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, bus: &EventBus) -> Result<()> {
    while app.running {
        tui::draw(terminal, app)?;
        app.handle_event(bus.next()?);
    }

    Ok(())
}
