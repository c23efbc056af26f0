use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use newsdesk_core::{update, AppState, Category, Command, Msg};
use newsdesk_engine::{EngineHandle, FileStorage, GNewsFetcher, SavedArticleStore};
use newsdesk_logging::{desk_info, desk_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::share::TerminalSharer;
use super::ui;
use crate::Cli;

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config =
        AppConfig::load(&cli.config)?.with_overrides(&cli, |name| std::env::var(name).ok());
    logging::initialize(config.log_destination);
    desk_info!("Starting newsdesk; data dir {:?}", config.data_dir);
    if config.api_key.is_empty() {
        desk_warn!("No API key configured; requests will be rejected");
    }

    let (store, load_error) = SavedArticleStore::open(FileStorage::new(config.data_dir.clone()));
    let fetcher = Arc::new(GNewsFetcher::new(config.fetch_settings()));
    let engine = EngineHandle::new(fetcher).context("failed to start the fetch engine")?;
    let mut runner = EffectRunner::new(
        engine,
        store,
        config.export_dir.clone(),
        Box::new(TerminalSharer::new(io::stdout())),
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    spawn_input_reader(msg_tx.clone());
    spawn_ticker(msg_tx, config.tick_interval());

    let mut inbox: VecDeque<Msg> = runner.startup_messages(load_error).into();
    inbox.push_back(Msg::Started {
        category: cli.category.unwrap_or(Category::General),
        query: cli.query.clone(),
    });

    let screen = Screen::new();
    let mut state = AppState::new();
    loop {
        let msg = match inbox.pop_front() {
            Some(msg) => msg,
            None => match msg_rx.recv() {
                Ok(msg) => msg,
                Err(_) => break,
            },
        };
        if matches!(msg, Msg::Tick) {
            inbox.extend(runner.poll());
        }

        let (next, effects) = update(std::mem::take(&mut state), msg, Instant::now());
        state = next;
        for effect in effects {
            inbox.extend(runner.run(effect));
        }

        if state.quit_requested() {
            break;
        }
        if state.consume_dirty() {
            screen.draw(&ui::render::render(&state.view()))?;
        }
    }

    desk_info!("Exiting newsdesk");
    Ok(())
}

fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if msg_tx.send(Msg::CommandEntered(line)).is_err() {
                return;
            }
        }
        // End of input closes the app.
        let _ = msg_tx.send(Msg::Command(Command::Quit));
    });
}

fn spawn_ticker(msg_tx: mpsc::Sender<Msg>, interval: Duration) {
    thread::spawn(move || {
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });
}

struct Screen {
    clear: bool,
}

impl Screen {
    fn new() -> Self {
        Self {
            clear: io::stdout().is_terminal(),
        }
    }

    fn draw(&self, frame: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        if self.clear {
            out.write_all(b"\x1b[2J\x1b[H")?;
        }
        out.write_all(frame.as_bytes())?;
        out.flush()
    }
}
