mod api;
mod app_service;
mod app_state;
mod commands;
mod config;
mod console;
mod normalize;
mod theme;
mod ui;

use anyhow::Context;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::{ApiClient, Endpoints, ReqwestTransport};
use crate::app_service::{run_actor, ApiJob};
use crate::app_state::{now_ms, App, AppEvent};
use crate::config::Config;
use crate::console::NotificationQueue;
use crate::theme::ThemeStore;
use crate::ui::draw;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let mut startup_info = Vec::new();
    match dotenv::dotenv() {
        Ok(path) => startup_info.push(format!("✓ loaded {}", path.display())),
        Err(_) => startup_info.push("⚠ no .env file, using process environment".to_string()),
    }

    let config = Config::from_env().context("reading configuration")?;

    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let log_dir = std::path::PathBuf::from("logs");
    std::fs::create_dir_all(&log_dir).context("creating logs directory")?;
    let log_file = std::fs::File::create(log_dir.join(format!("app-{}.log", ts)))
        .context("creating log file")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file))) // keep the terminal clean
        .filter_level(log::LevelFilter::Warn)
        .filter_module("iqscore_admin", log::LevelFilter::Info)
        .init();

    log::info!("API base {}", config.api_base_url);
    startup_info.push(format!("API: {}", config.api_base_url));
    let theme_store = ThemeStore::new(config.prefs_path.clone());
    startup_info.push(format!("Preferences: {}", theme_store.path().display()));

    let endpoints = Endpoints::new(&config.api_base_url);
    let transport = ReqwestTransport::new().context("building HTTP client")?;
    let api = ApiClient::new(Arc::new(transport), endpoints.clone(), config.list_timeout);

    let (job_tx, job_rx) = mpsc::unbounded_channel::<ApiJob>();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel::<AppEvent>();
    tokio::spawn(run_actor(api, job_rx, evt_tx));

    let mut app = App::new(
        startup_info,
        endpoints,
        NotificationQueue::new(config.notice_ttl_ms, config.notice_capacity),
        theme_store,
        job_tx,
        evt_rx,
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = match app.evt_rx.take() {
        Some(rx) => run_app_loop(&mut terminal, &mut app, rx).await,
        None => Ok(()),
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("running the console")
}

async fn run_app_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut evt_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    loop {
        let now = now_ms();
        app.tick(now);
        terminal.draw(|f| draw(f, app))?;

        while let Ok(event) = evt_rx.try_recv() {
            app.handle_event(event, now_ms());
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key_event(key.code) {
                    return Ok(());
                }
            }
        }
    }
}
