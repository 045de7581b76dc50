// src/ui/mod.rs

//! Terminal front ends for the engine manager: the interactive dashboard and
//! the headless runner.

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use log::{error, info};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::engine::{EngineCommand, EngineEvent};

pub mod dashboard;
pub mod state;
pub mod utils;

pub use state::{UiAction, UiState, UnitSelector};

/// How often the dashboard asks for a fresh snapshot so the work time moves.
const REFRESH_EVERY: Duration = Duration::from_secs(1);
const FRAME_DELAY: Duration = Duration::from_millis(50);

fn send_command(tx: &mpsc::UnboundedSender<EngineCommand>, cmd: EngineCommand) {
    if let Err(e) = tx.send(cmd) {
        error!("UI: failed to send command to engine: {}", e);
    }
}

/// Run the dashboard until the user quits. Returns the final UI state so
/// the caller can persist the unit selectors.
pub async fn run_dashboard(
    mut ui_state: UiState,
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    mut events_rx: mpsc::UnboundedReceiver<EngineEvent>,
) -> Result<UiState> {
    let mut terminal = ratatui::try_init().context("Failed to initialise terminal")?;
    let result = dashboard_loop(&mut terminal, &mut ui_state, &cmd_tx, &mut events_rx).await;
    ratatui::restore();
    result.map(|_| ui_state)
}

async fn dashboard_loop(
    terminal: &mut ratatui::DefaultTerminal,
    ui_state: &mut UiState,
    cmd_tx: &mpsc::UnboundedSender<EngineCommand>,
    events_rx: &mut mpsc::UnboundedReceiver<EngineEvent>,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while !ui_state.should_quit {
        while let Ok(ev) = events_rx.try_recv() {
            if let Some(cmd) = ui_state.apply_event(ev) {
                send_command(cmd_tx, cmd);
            }
        }

        terminal
            .draw(|frame| dashboard::draw(frame, ui_state))
            .context("Failed to draw dashboard")?;

        if event::poll(Duration::ZERO).context("Failed to poll terminal events")? {
            if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
                if let Some(cmd) = ui_state.apply_action(UiAction::from_key(key)) {
                    send_command(cmd_tx, cmd);
                }
            }
        }

        if last_refresh.elapsed() >= REFRESH_EVERY {
            last_refresh = Instant::now();
            send_command(cmd_tx, EngineCommand::RequestSnapshot);
        }

        tokio::time::sleep(FRAME_DELAY).await;
    }
    Ok(())
}

/// Run without a terminal UI: start the engine, log every finished tick and
/// stop after `max_ticks` ticks (if given) or on Ctrl-C.
pub async fn run_headless(
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    mut events_rx: mpsc::UnboundedReceiver<EngineEvent>,
    max_ticks: Option<u64>,
) -> Result<()> {
    send_command(&cmd_tx, EngineCommand::Start);
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            ev = events_rx.recv() => {
                let Some(ev) = ev else { break };
                match ev {
                    EngineEvent::TickCompleted(snapshot) => {
                        ticks += 1;
                        let line = serde_json::to_string(&snapshot)
                            .context("Failed to serialize statistics snapshot")?;
                        info!("tick {}: {}", ticks, line);
                        if max_ticks.is_some_and(|max| ticks >= max) {
                            info!("Headless: reached {} tick(s), stopping", ticks);
                            break;
                        }
                    }
                    EngineEvent::Error(err) => {
                        send_command(&cmd_tx, EngineCommand::Shutdown);
                        anyhow::bail!("{} (code {})", err, err.code());
                    }
                    EngineEvent::Progress(_) | EngineEvent::StateChanged(_) => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Headless: interrupted");
                break;
            }
        }
    }

    send_command(&cmd_tx, EngineCommand::Shutdown);
    Ok(())
}
