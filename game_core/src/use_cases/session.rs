// Async driver: ticks one `World` on a fixed cadence and fans its events out to the sinks.

use super::types::{Command, WorldEvent, WorldStatus};
use super::world::World;
use crate::domain::ports::{AudioSink, Clock, InputSource, RenderSink, UiSink};
use crate::domain::tuning::FRAME_MS;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tracing::{debug, info, warn};

const FRAME_STEP_MS: u64 = FRAME_MS as u64;
// Backlog beyond this many frames is dropped after a stall.
const MAX_CATCH_UP_FRAMES: u64 = 30;

/// Collaborators the session talks to.
pub struct SessionPorts {
    pub input: Box<dyn InputSource>,
    pub render: Box<dyn RenderSink>,
    pub ui: Box<dyn UiSink>,
    pub audio: Box<dyn AudioSink>,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub tick_interval: Duration,
    /// Return as soon as the world reports game over.
    pub stop_on_game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    GameOver,
}

pub struct SessionSummary {
    pub ticks: u64,
    pub reason: StopReason,
    /// The world as it was when the session stopped.
    pub world: World,
}

pub async fn run_session(
    mut world: World,
    mut commands: mpsc::Receiver<Command>,
    mut ports: SessionPorts,
    clock: Arc<dyn Clock>,
    options: SessionOptions,
    shutdown: Arc<Notify>,
) -> SessionSummary {
    let mut interval = tokio::time::interval(options.tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut ticks: u64 = 0;
    let mut last_ms = clock.now_ms();
    // Wall time not yet simulated; always less than one frame after a pass.
    let mut owed_ms: u64 = 0;

    info!(tick_ms = options.tick_interval.as_millis() as u64, "session started");

    let reason = loop {
        tokio::select! {
            _ = shutdown.notified() => {
                break StopReason::Shutdown;
            }
            _ = interval.tick() => {}
        }

        // Commands land between ticks, in arrival order.
        while let Ok(command) = commands.try_recv() {
            let accepted = world.apply_command(command);
            debug!(?command, accepted, "command applied");
        }

        world.set_input(ports.input.poll());

        let now_ms = clock.now_ms();
        let delta_ms = now_ms.saturating_sub(last_ms);
        last_ms = now_ms;
        if world.status() == WorldStatus::Running {
            owed_ms += delta_ms;
            let cap_ms = MAX_CATCH_UP_FRAMES * FRAME_STEP_MS;
            if owed_ms > cap_ms {
                warn!(behind_ms = owed_ms - cap_ms, "session fell behind; dropping backlog");
                owed_ms = cap_ms;
            }
            // Whole frames only, so every step moves entities by one frame's distance.
            while owed_ms >= FRAME_STEP_MS && world.status() == WorldStatus::Running {
                world.tick(FRAME_STEP_MS);
                owed_ms -= FRAME_STEP_MS;
                ticks += 1;
            }
        } else {
            owed_ms = 0;
        }

        let game_over = dispatch(world.drain_events(), &mut ports);

        let frame_time_ms = world.now_ms();
        for view in world.views() {
            ports.render.draw(&view, frame_time_ms);
        }

        if game_over && options.stop_on_game_over {
            break StopReason::GameOver;
        }
    };

    info!(
        ticks,
        ?reason,
        score = world.progression().score,
        level = world.progression().level,
        "session stopped"
    );
    SessionSummary {
        ticks,
        reason,
        world,
    }
}

/// Forwards queued events to the sinks. Returns true if the game ended.
fn dispatch(events: Vec<WorldEvent>, ports: &mut SessionPorts) -> bool {
    let mut game_over = false;
    for event in events {
        match event {
            WorldEvent::Audio(cue) => ports.audio.play(cue),
            WorldEvent::HudChanged(hud) => ports.ui.notify(&hud),
            WorldEvent::GameOver { .. } => game_over = true,
            other => debug!(event = ?other, "world event"),
        }
    }
    game_over
}
