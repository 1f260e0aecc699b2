// Cooldown registry for the special abilities.
//
// An activation opens two independent windows: the effect runs for `duration`, the
// ability stays unavailable for `cooldown`. Duration always ends first, so an ability
// is ACTIVE and COOLING at the same time right after activation.

use crate::domain::tuning::ability::AbilityTuning;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Ability {
    TimeStop,
    BlackHole,
    Shield,
}

impl Ability {
    pub const ALL: [Ability; 3] = [Ability::TimeStop, Ability::BlackHole, Ability::Shield];

    fn index(self) -> usize {
        match self {
            Ability::TimeStop => 0,
            Ability::BlackHole => 1,
            Ability::Shield => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbilityState {
    pub ready: bool,
    pub last_used_at: Option<u64>,
    /// True between activation and the end of the duration window.
    pub active: bool,
}

impl Default for AbilityState {
    fn default() -> Self {
        Self {
            ready: true,
            last_used_at: None,
            active: false,
        }
    }
}

/// Deadlines produced by a successful activation; the caller schedules both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub ends_at: u64,
    pub ready_at: u64,
}

#[derive(Debug)]
pub struct AbilityRegistry {
    tuning: AbilityTuning,
    states: [AbilityState; 3],
}

impl AbilityRegistry {
    pub fn new(tuning: AbilityTuning) -> Self {
        Self {
            tuning,
            states: [AbilityState::default(); 3],
        }
    }

    pub fn state(&self, ability: Ability) -> AbilityState {
        self.states[ability.index()]
    }

    pub fn is_ready(&self, ability: Ability) -> bool {
        self.states[ability.index()].ready
    }

    pub fn is_active(&self, ability: Ability) -> bool {
        self.states[ability.index()].active
    }

    /// Starts the ability unless it is still cooling down.
    ///
    /// `duration_scale` stretches the effect window (skill upgrades); the cooldown is fixed.
    pub fn activate(
        &mut self,
        ability: Ability,
        now_ms: u64,
        duration_scale: f32,
    ) -> Option<Activation> {
        let timing = self.tuning.timing(ability);
        let state = &mut self.states[ability.index()];
        if !state.ready {
            return None;
        }

        state.ready = false;
        state.active = true;
        state.last_used_at = Some(now_ms);

        let duration = (timing.duration_ms as f32 * duration_scale).round() as u64;
        Some(Activation {
            ends_at: now_ms + duration,
            ready_at: now_ms + timing.cooldown_ms,
        })
    }

    /// Closes the duration window. Returns false if it was already closed.
    pub fn end(&mut self, ability: Ability) -> bool {
        std::mem::replace(&mut self.states[ability.index()].active, false)
    }

    /// Flips every ability whose cooldown has elapsed back to ready.
    ///
    /// Returns the abilities that became ready on this call.
    pub fn age(&mut self, now_ms: u64) -> Vec<Ability> {
        let mut flipped = Vec::new();
        for ability in Ability::ALL {
            let cooldown = self.tuning.timing(ability).cooldown_ms;
            let state = &mut self.states[ability.index()];
            if state.ready {
                continue;
            }
            let elapsed = state
                .last_used_at
                .map_or(u64::MAX, |used| now_ms.saturating_sub(used));
            if elapsed >= cooldown {
                state.ready = true;
                flipped.push(ability);
            }
        }
        flipped
    }

    /// Cooldown progress in `0.0..=1.0`; 1.0 when ready.
    pub fn cooldown_progress(&self, ability: Ability, now_ms: u64) -> f32 {
        let state = self.states[ability.index()];
        match (state.ready, state.last_used_at) {
            (true, _) | (false, None) => 1.0,
            (false, Some(used)) => {
                let cooldown = self.tuning.timing(ability).cooldown_ms.max(1) as f32;
                (now_ms.saturating_sub(used) as f32 / cooldown).min(1.0)
            }
        }
    }
}
