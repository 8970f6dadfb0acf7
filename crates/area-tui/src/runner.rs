//! Main TUI runner - entry point and event loop

use area_api::AreaApi;
use area_app::Engine;
use area_core::prelude::*;
use ratatui::DefaultTerminal;

use super::{event, render, terminal};

/// Take over the terminal and run `engine` until the user quits.
pub async fn run<A>(mut engine: Engine<A>) -> Result<()>
where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    let mut term = terminal::init();
    engine.start();

    let result = run_loop(&mut term, &mut engine);

    // Stop the catalog poll, the log stream and any OAuth listener
    engine.shutdown();
    terminal::restore();

    if let Err(ref e) = result {
        error!("TUI loop ended with an error: {}", e);
    }
    result
}

/// Main event loop
fn run_loop<A>(terminal: &mut DefaultTerminal, engine: &mut Engine<A>) -> Result<()>
where
    A: AreaApi + Clone + Send + Sync + 'static,
{
    while !engine.should_quit() {
        // Results of background requests (non-blocking)
        engine.drain_pending();

        terminal.draw(|frame| render::view(frame, &engine.state))?;

        // Keys, or a tick after the poll timeout
        if let Some(message) = event::poll()? {
            engine.process(message);
        }
    }

    info!("Quitting");
    Ok(())
}
