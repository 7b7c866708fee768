//! Log into AI Enhanced CollabTalk from the terminal

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

/// Cycle focus through form fields
mod form_fields;

/// Where the session lives once we have one
mod session;

use app::{App, EffectContext};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use session::CurrentUser;
use std::{io, process::ExitCode, sync::Arc};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    // The terminal belongs to the UI, so logs go to a file instead. Hold on to
    // the guard so buffered lines get flushed on the way out.
    let _guard = init_logging(&config)?;
    tracing::info!(server = %config.server, "starting");

    let conn = Arc::new(EffectContext::new(&config));

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let res = run(terminal, conn).await;
    ratatui::restore();

    if let Err(err) = &res {
        tracing::error!(?err, "exiting with error");
    }

    res
}

/// Send traces to `collabtalk.log` in the data directory, filtered by
/// `RUST_LOG` (default `info`).
fn init_logging(config: &config::Config) -> io::Result<WorkerGuard> {
    let dir = config.data_dir();
    std::fs::create_dir_all(&dir)?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "collabtalk.log"));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

/// Manage the lifecycle of the app
async fn run(mut terminal: DefaultTerminal, conn: Arc<EffectContext>) -> io::Result<ExitCode> {
    let mut app = App::new(CurrentUser::new());

    // We expect side-effectful behaviors (that is, things like FS or network
    // access) to take place via async tasks. Once those tasks are done, we read
    // their results off of a channel. We keep track of outstanding effects so
    // we can exit cleanly.
    let (effect_tx, mut effect_rx) = unbounded_channel();
    let mut outstanding_effects: Vec<(bool, JoinHandle<()>)> = Vec::with_capacity(1);

    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    // Start our event loop!
    loop {
        // First thing we do is wait for an event. This can be either external
        // input or the async result of a effect. This is an `Option<_>` because
        // we don't necessarily need to pay attention to every single piece of
        // external input.
        let next_action_opt = tokio::select! {
            event_opt = event_stream.next() => {
                match event_opt {
                    Some(Ok(Event::Key(key_event))) => {
                        Some(app::Action::Key(key_event))
                    }
                    Some(Err(err)) => {
                        tracing::error!(?err, "problem reading terminal events");
                        Some(app::Action::Problem(err.to_string()))
                    }
                    _ => None,
                }
            },

            effect_opt = effect_rx.recv() => {
                effect_opt
            }
        };

        // Once we have an action, we send it to `app.handle` to get any next
        // effects.
        if let Some(action) = next_action_opt {
            for effect in app.handle(action) {
                let interruptible = effect.is_interruptible();

                outstanding_effects.push((
                    interruptible,
                    spawn_effect_task(effect_tx.clone(), Arc::clone(&conn), effect),
                ));
            }
        }

        // Now that we handle the event, we re-render to display any changes the
        // app cares about.
        terminal.draw(|frame| app.render(frame))?;

        // Drop completed tasks. This list should never be too long (since we
        // do this on every pass through the event loop) so a full scan is fine.
        outstanding_effects.retain(|(_, handle)| !handle.is_finished());

        // Finally, if the app indicates that it should exit, we abandon any
        // login requests still in flight (nobody is around to see the answer)
        // and wait for everything else, so a token we've decided to keep is
        // fully written before we go.
        if let Some(code) = app.should_exit() {
            for (interruptible, effect) in outstanding_effects.drain(..) {
                if interruptible {
                    effect.abort();
                }

                if let Err(err) = effect.await {
                    if !err.is_cancelled() {
                        tracing::error!(?err, "effect task failed during shutdown");
                    }
                }
            }

            tracing::info!("exiting");
            return Ok(code);
        }
    }
}

/// Spawn a task to run an effect and send the next action to the app.
fn spawn_effect_task(
    effect_tx: UnboundedSender<app::Action>,
    conn: Arc<EffectContext>,
    effect: app::Effect,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(next_action) = effect.run(&conn).await {
            // The receiver only goes away once we're exiting, at which point
            // nobody needs the result.
            let _ = effect_tx.send(next_action);
        }
    })
}
