// Framework bootstrap for the headless runner.

use crate::domain::abilities::Ability;
use crate::domain::entities::{CompanionKind, WeaponKind};
use crate::frameworks::config;
use crate::interface_adapters::{
    Autopilot, FrameCounter, MonotonicClock, TracingAudio, TracingUi, hud_json,
};
use crate::use_cases::{Command, SessionOptions, SessionPorts, SessionSummary, World, run_session};

use std::{io::Result, sync::Arc, time::Duration};
use tokio::sync::{Notify, mpsc};

/// Commands the director sends, each after the given delay from the previous one.
const SCRIPT: [(Duration, Command); 7] = [
    (Duration::ZERO, Command::CycleElement),
    (Duration::ZERO, Command::AddCompanion(CompanionKind::CombatDrone)),
    (Duration::from_secs(2), Command::Activate(Ability::Shield)),
    (Duration::from_secs(3), Command::SelectWeapon(WeaponKind::Missile)),
    (Duration::from_secs(3), Command::Activate(Ability::TimeStop)),
    (Duration::from_secs(4), Command::ActivateUltimate),
    (Duration::from_secs(3), Command::Activate(Ability::BlackHole)),
];

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

#[derive(Debug, Clone, Copy)]
pub struct HeadlessSettings {
    pub seed: u64,
    pub tick_interval: Duration,
    pub run_duration: Duration,
}

impl HeadlessSettings {
    pub fn from_env() -> Self {
        Self {
            seed: config::game_seed(),
            tick_interval: config::tick_interval(),
            run_duration: config::run_duration(),
        }
    }
}

/// Plays one autopiloted session until game over or `run_duration` elapses.
pub async fn run_headless(settings: HeadlessSettings) -> Result<SessionSummary> {
    let world = World::new(settings.seed);
    let pointer = {
        let field = world.tuning().playfield;
        (field.width / 2.0, field.height / 3.0)
    };

    let (command_tx, command_rx) = mpsc::channel::<Command>(config::COMMAND_CHANNEL_CAPACITY);
    let shutdown = Arc::new(Notify::new());
    let frames = FrameCounter::default();

    let ports = SessionPorts {
        input: Box::new(Autopilot::new(config::AUTOPILOT_SWEEP, pointer)),
        render: Box::new(frames.clone()),
        ui: Box::new(TracingUi),
        audio: Box::new(TracingAudio),
    };
    let options = SessionOptions {
        tick_interval: settings.tick_interval,
        stop_on_game_over: true,
    };

    tracing::info!(
        seed = settings.seed,
        run_secs = settings.run_duration.as_secs(),
        "headless session starting"
    );

    let mut session = tokio::spawn(run_session(
        world,
        command_rx,
        ports,
        Arc::new(MonotonicClock::new()),
        options,
        shutdown.clone(),
    ));
    let director = tokio::spawn(direct(command_tx));

    let joined = tokio::select! {
        joined = &mut session => joined,
        _ = tokio::time::sleep(settings.run_duration) => {
            shutdown.notify_one();
            session.await
        }
    };
    director.abort();

    let summary =
        joined.map_err(|e| std::io::Error::other(format!("session task failed: {e}")))?;
    tracing::info!(
        ticks = summary.ticks,
        draws = frames.draws(),
        reason = ?summary.reason,
        score = summary.world.progression().score,
        max_combo = summary.world.progression().max_combo,
        hud = %hud_json(&summary.world.hud()),
        "headless session finished"
    );
    Ok(summary)
}

/// Feeds the scripted commands into the session until the script or the session ends.
async fn direct(commands: mpsc::Sender<Command>) {
    for (delay, command) in SCRIPT {
        tokio::time::sleep(delay).await;
        if commands.send(command).await.is_err() {
            tracing::debug!("session gone, director stopping");
            return;
        }
    }
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();
    run_headless(HeadlessSettings::from_env()).await.map(|_| ())
}
