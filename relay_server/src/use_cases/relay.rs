// Relay orchestration: keeps the player registry and fans player events out to peers.

use super::types::{Broadcast, RelayEvent};
use crate::domain::players::with_id;
use crate::domain::{Clock, PlayerRegistry, PlayerState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock, broadcast};
use tracing::{debug, info};

/// Shared configuration for the relay hub.
#[derive(Debug, Clone, Copy)]
pub struct RelaySettings {
    /// Capacity for the fan-out channel.
    pub broadcast_capacity: usize,
    /// Players silent for longer than this are evicted by the sweep.
    pub stale_after: Duration,
}

pub struct RelayHub {
    registry: RwLock<PlayerRegistry>,
    events_tx: broadcast::Sender<Broadcast>,
    clock: Arc<dyn Clock>,
    stale_after_ms: u64,
}

impl RelayHub {
    pub fn new(settings: RelaySettings, clock: Arc<dyn Clock>) -> Self {
        let (events_tx, _events_rx) = broadcast::channel(settings.broadcast_capacity.max(1));
        Self {
            registry: RwLock::new(PlayerRegistry::new()),
            events_tx,
            clock,
            stale_after_ms: settings.stale_after.as_millis() as u64,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Broadcast> {
        self.events_tx.subscribe()
    }

    fn publish(&self, skip: Option<u64>, event: RelayEvent) {
        // No subscribers just means nobody is listening right now.
        let _ = self.events_tx.send(Broadcast { skip, event });
    }

    /// Registers the player and announces it to everyone else.
    ///
    /// Returns every known player, the joiner included.
    pub async fn join(&self, player_id: u64, state: PlayerState) -> Vec<PlayerState> {
        let now_ms = self.clock.now_ms();
        let mut registry = self.registry.write().await;
        let snapshot = registry.join(player_id, state, now_ms).snapshot();
        let existing = registry.snapshots();
        let players = registry.len();
        drop(registry);

        info!(player_id, players, "player joined");
        self.publish(Some(player_id), RelayEvent::Joined(snapshot));
        existing
    }

    /// Merges a partial update and forwards it. Ignored for players that never joined or
    /// were evicted.
    pub async fn update(&self, player_id: u64, patch: PlayerState) -> bool {
        let now_ms = self.clock.now_ms();
        let known = self.registry.write().await.update(player_id, &patch, now_ms);
        if !known {
            debug!(player_id, "update from unregistered player ignored");
            return false;
        }
        self.publish(Some(player_id), RelayEvent::Updated(with_id(player_id, &patch)));
        true
    }

    /// Forwards a shot to everyone else. Shots are not stored.
    pub fn shoot(&self, player_id: u64, data: PlayerState) {
        self.publish(Some(player_id), RelayEvent::Shot(with_id(player_id, &data)));
    }

    /// Removes the player and tells everyone, if it was registered.
    pub async fn leave(&self, player_id: u64) -> bool {
        let removed = self.registry.write().await.remove(player_id).is_some();
        if removed {
            info!(player_id, "player left");
            self.publish(None, RelayEvent::Left { player_id });
        }
        removed
    }

    /// Evicts every stale player and announces each departure.
    pub async fn sweep(&self) -> Vec<u64> {
        let now_ms = self.clock.now_ms();
        let evicted = self
            .registry
            .write()
            .await
            .evict_stale(now_ms, self.stale_after_ms);
        for &player_id in &evicted {
            info!(player_id, "stale player evicted");
            self.publish(None, RelayEvent::Left { player_id });
        }
        evicted
    }

    pub async fn player_count(&self) -> usize {
        self.registry.read().await.len()
    }

    pub async fn is_registered(&self, player_id: u64) -> bool {
        self.registry.read().await.contains(player_id)
    }
}

/// Runs `sweep` every `every` until `shutdown` fires.
pub async fn sweep_task(hub: Arc<RelayHub>, every: Duration, shutdown: Arc<Notify>) {
    let mut interval = tokio::time::interval(every);
    // The first tick completes immediately; nobody can be stale yet.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            _ = interval.tick() => {
                let evicted = hub.sweep().await;
                if !evicted.is_empty() {
                    debug!(count = evicted.len(), "sweep finished");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct FixedClock(AtomicU64);

    impl FixedClock {
        fn set(&self, now_ms: u64) {
            self.0.store(now_ms, Ordering::SeqCst);
        }
    }

    impl Clock for FixedClock {
        fn now_ms(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn hub() -> (Arc<RelayHub>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock(AtomicU64::new(0)));
        let hub = RelayHub::new(
            RelaySettings {
                broadcast_capacity: 16,
                stale_after: Duration::from_secs(10),
            },
            clock.clone(),
        );
        (Arc::new(hub), clock)
    }

    fn state(value: Value) -> PlayerState {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[tokio::test]
    async fn when_second_player_joins_then_it_sees_both_and_first_is_told() {
        let (hub, _clock) = hub();
        let mut events = hub.subscribe();
        hub.join(1, state(json!({"x": 1, "y": 1, "health": 100}))).await;

        let existing = hub.join(2, state(json!({"x": 2, "y": 2, "health": 100}))).await;

        assert_eq!(existing.len(), 2);
        events.recv().await.expect("first join");
        let second = events.recv().await.expect("second join");
        assert_eq!(second.skip, Some(2));
        assert_eq!(
            second.event,
            RelayEvent::Joined(state(json!({"id": "2", "x": 2, "y": 2, "health": 100})))
        );
    }

    #[tokio::test]
    async fn when_unjoined_player_updates_then_nothing_is_broadcast() {
        let (hub, _clock) = hub();
        let mut events = hub.subscribe();

        assert!(!hub.update(5, state(json!({"x": 3}))).await);

        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn when_joined_player_updates_then_peers_get_the_patch_with_its_id() {
        let (hub, _clock) = hub();
        hub.join(5, state(json!({"x": 0}))).await;
        let mut events = hub.subscribe();

        assert!(hub.update(5, state(json!({"x": 3}))).await);

        let update = events.recv().await.expect("update");
        assert_eq!(update.skip, Some(5));
        assert_eq!(
            update.event,
            RelayEvent::Updated(state(json!({"id": "5", "x": 3})))
        );
    }

    #[tokio::test]
    async fn when_player_leaves_then_everyone_is_told_once() {
        let (hub, _clock) = hub();
        hub.join(4, PlayerState::new()).await;
        let mut events = hub.subscribe();

        assert!(hub.leave(4).await);
        assert!(!hub.leave(4).await);

        let left = events.recv().await.expect("leave");
        assert_eq!(left.skip, None);
        assert_eq!(left.event, RelayEvent::Left { player_id: 4 });
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn when_sweep_runs_then_silent_players_are_evicted_and_announced() {
        let (hub, clock) = hub();
        hub.join(1, PlayerState::new()).await;
        clock.set(8_000);
        hub.join(2, PlayerState::new()).await;
        let mut events = hub.subscribe();

        clock.set(10_001);
        assert_eq!(hub.sweep().await, vec![1]);

        assert_eq!(hub.player_count().await, 1);
        assert!(!hub.is_registered(1).await);
        assert_eq!(
            events.recv().await.expect("eviction").event,
            RelayEvent::Left { player_id: 1 }
        );
        // Evicted players have to join again before updates count.
        assert!(!hub.update(1, PlayerState::new()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn when_sweep_task_ticks_then_stale_players_go_away() {
        let (hub, clock) = hub();
        hub.join(1, PlayerState::new()).await;
        clock.set(20_000);
        let shutdown = Arc::new(Notify::new());

        let task = tokio::spawn(sweep_task(
            hub.clone(),
            Duration::from_secs(60),
            shutdown.clone(),
        ));
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(hub.player_count().await, 0);
        shutdown.notify_one();
        task.await.expect("sweep task");
    }
}
