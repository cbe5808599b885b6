//! Boss aggro state machine.
//!
//! ```text
//! Dormant --(target within aggro radius, or hit)--> Aggro
//! Aggro --(target within attack radius, cooldown over)--> Attacking
//! Attacking --(wind-up elapsed)--> Aggro
//! Aggro | Attacking --(target beyond aggro radius)--> Dormant
//! ```
//!
//! The strike lands at the end of the wind-up only if the target is still in
//! attack range. Leaving aggro range during a wind-up cancels it.

use crate::core::config::BossTuning;
use crate::core::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    #[default]
    Dormant,
    Aggro,
    Attacking {
        strike_at_ms: u64,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossState {
    pub phase: BossPhase,
    /// When the last wind-up began; the cooldown counts from here.
    pub last_attack_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossEvent {
    Aggroed,
    WindupStarted { strike_at_ms: u64 },
    Strike { damage: u32 },
    /// Wind-up finished with the target out of reach.
    Missed,
    WindupCancelled,
    LostTarget,
}

/// Damage wakes a dormant boss. Other phases are unaffected.
pub fn provoke(state: &mut BossState) {
    if state.phase == BossPhase::Dormant {
        state.phase = BossPhase::Aggro;
    }
}

fn cooldown_over(state: &BossState, now_ms: u64, tuning: &BossTuning) -> bool {
    state
        .last_attack_ms
        .map_or(true, |last| now_ms.saturating_sub(last) >= tuning.attack_cooldown_ms)
}

/// Advances the state machine one step toward `target`.
pub fn update_boss(
    state: &BossState,
    boss_position: Vec2,
    target: Vec2,
    now_ms: u64,
    tuning: &BossTuning,
) -> (BossState, Option<BossEvent>) {
    let distance = boss_position.distance(target);
    let in_aggro = distance <= tuning.aggro_radius;
    let in_reach = distance <= tuning.attack_radius;
    let mut next = *state;

    let event = match state.phase {
        BossPhase::Dormant => in_aggro.then(|| {
            next.phase = BossPhase::Aggro;
            BossEvent::Aggroed
        }),
        BossPhase::Aggro if !in_aggro => {
            next.phase = BossPhase::Dormant;
            Some(BossEvent::LostTarget)
        }
        BossPhase::Aggro => (in_reach && cooldown_over(state, now_ms, tuning)).then(|| {
            let strike_at_ms = now_ms + tuning.windup_ms;
            next.phase = BossPhase::Attacking { strike_at_ms };
            next.last_attack_ms = Some(now_ms);
            BossEvent::WindupStarted { strike_at_ms }
        }),
        BossPhase::Attacking { .. } if !in_aggro => {
            next.phase = BossPhase::Dormant;
            Some(BossEvent::WindupCancelled)
        }
        BossPhase::Attacking { strike_at_ms } => (now_ms >= strike_at_ms).then(|| {
            next.phase = BossPhase::Aggro;
            if in_reach {
                BossEvent::Strike {
                    damage: tuning.strike_damage,
                }
            } else {
                BossEvent::Missed
            }
        }),
    };

    if let Some(event) = event {
        tracing::trace!(?event, distance, "boss transition");
    }
    (next, event)
}
