use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use thatsit_core::storage::log_path;
use thatsit_core::{Config, Schedule};
use tracing::{info, warn};

use crate::logging;
use crate::tui::app::App;
use crate::tui::{view, Tui};

pub fn run(at: Option<String>, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = open_logged(verbose, &log_path()?, &Config::path()?)?;

    // Fail before taking over the terminal.
    if let Some(cutoff) = &at {
        cutoff.parse::<Schedule>()?;
    }

    let tick = config.countdown.tick_interval();
    let tray_enabled = config.tray_enabled;
    let mut app = App::new(config, at);

    info!("starting interactive session");
    let mut tui = Tui::enter()?;
    let result = event_loop(&mut tui, &mut app, tick, tray_enabled);
    let restored = tui.exit();
    info!("interactive session ended");
    first_error(result, restored)
}

/// Start file logging, then load the config so first-run setup is logged too.
fn open_logged(
    verbose: bool,
    log: &Path,
    config: &Path,
) -> Result<Config, Box<dyn std::error::Error>> {
    logging::init_file(verbose, log)?;
    Ok(Config::load_from(config)?)
}

/// A failure inside the loop wins over a failure to restore the terminal.
fn first_error(
    result: Result<(), Box<dyn std::error::Error>>,
    restored: io::Result<()>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = &restored {
        warn!(error = %e, "failed to restore terminal");
    }
    result?;
    restored?;
    Ok(())
}

fn event_loop(
    tui: &mut Tui,
    app: &mut App,
    tick: Duration,
    tray_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_title = String::new();

    while !app.should_quit() {
        let now = Utc::now();
        app.on_tick(now);

        if tray_enabled {
            let title = app.title(now);
            if title != last_title {
                tui.set_title(&title)?;
                last_title = title;
            }
        }
        tui.draw(|frame| view::render(frame, app, now))?;

        // Redraw at least as often as the phase's watchdog wants.
        let timeout = app
            .phase()
            .window_policy()
            .reassert_interval
            .map_or(tick, |interval| interval.min(tick));

        if event::poll(timeout)? {
            let now = Utc::now();
            match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    app.on_key(key, now);
                }
                TermEvent::Paste(text) => app.on_paste(&text, now),
                _ => {}
            }
        }
    }
    Ok(())
}
