//! Terminal frontend runner.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use synctray_config::ConfigResolver;
use synctray_core::logging::DEFAULT_CAPACITY;
use synctray_core::{ActivityLog, EventLoop, SystemOpener, action_channel, frontend_channel};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::App;

const TICK: Duration = Duration::from_millis(100);

/// Run the terminal UI until the dispatch loop confirms Quit.
///
/// Logs go to the in-app activity pane instead of stderr, which the
/// alternate screen would hide.
pub async fn run(filter: EnvFilter, resolver: ConfigResolver) -> Result<()> {
    let activity = ActivityLog::new(DEFAULT_CAPACITY);
    let reader = activity.reader();
    tracing_subscriber::registry()
        .with(filter)
        .with(activity)
        .init();

    let (actions, actions_rx) = action_channel();
    let (frontend, updates) = frontend_channel();
    let mut event_loop = EventLoop::new(resolver, frontend, SystemOpener, actions_rx);
    let dispatcher = tokio::spawn(async move { event_loop.run().await });

    info!("starting synctray terminal UI");
    let mut app = App::new(actions, updates, reader);
    let result = run_terminal(&mut app);

    // Dropping the app closes the action queue, which also stops the loop
    // if the terminal failed before Quit was sent.
    drop(app);
    if let Err(e) = dispatcher.await {
        warn!(error = %e, "dispatch loop task failed");
    }
    result
}

fn run_terminal(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = draw_loop(&mut terminal, app);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

fn draw_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.tick();
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = app.keymap.resolve(key);
                    app.handle_action(action);
                }
            }
        }
    }
    Ok(())
}
