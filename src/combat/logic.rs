use super::types::{AttackHitbox, Enemy, Knockback};
use crate::character::actor::{Actor, SwordAura};
use crate::combat::types::Archetype;
use crate::core::constants::*;
use crate::loot::boss::provoke;
use crate::spatial::EntityId;
use rand::Rng;

/// Everything about the attacker that feeds the damage formula.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttackerProfile {
    /// Base attack plus gear attack.
    pub attack: i64,
    pub strength: i64,
    /// Percent, 0-100.
    pub crit_chance: u32,
    /// Percent bonus against metin-class targets.
    pub monster_damage: u32,
    pub aura: Option<SwordAura>,
}

impl AttackerProfile {
    pub fn aura_multiplier(&self, now_ms: u64) -> f64 {
        self.aura
            .filter(|aura| aura.is_active(now_ms))
            .map_or(1.0, |aura| aura.multiplier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    pub enemy_id: EntityId,
    pub damage: u32,
    pub was_crit: bool,
    pub killed: bool,
    pub knocked_back: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HitReport {
    /// Every input enemy, in input order, hit or not.
    pub enemies: Vec<Enemy>,
    pub hits: Vec<HitRecord>,
}

impl HitReport {
    pub fn killed(&self) -> impl Iterator<Item = &HitRecord> {
        self.hits.iter().filter(|h| h.killed)
    }
}

pub fn roll_crit(crit_chance: u32, rng: &mut impl Rng) -> bool {
    crit_chance > 0 && rng.gen_range(0.0..PERCENT_DIVISOR) <= crit_chance as f64
}

/// Damage of one hit. Never below 1.
pub fn compute_damage(
    attacker: &AttackerProfile,
    sequence: u8,
    archetype: Archetype,
    was_crit: bool,
    now_ms: u64,
) -> u32 {
    let index = (sequence.clamp(1, MAX_COMBO_SEQUENCE) - 1) as usize;
    let total_base = (attacker.attack + STRENGTH_DAMAGE_FACTOR * attacker.strength).max(1);

    // the combo step is floored on its own before the other multipliers
    let mut damage = (total_base as f64 * SEQUENCE_DAMAGE_MULTIPLIERS[index]).floor();
    damage *= attacker.aura_multiplier(now_ms);
    if archetype.is_metin_class() {
        damage *= 1.0 + attacker.monster_damage as f64 / PERCENT_DIVISOR;
    }
    if was_crit {
        damage *= CRIT_DAMAGE_MULTIPLIER;
    }
    (damage.floor() as u32).max(1)
}

/// Applies `hitbox` to every enemy inside it.
pub fn resolve_hits(
    hitbox: &AttackHitbox,
    enemies: &[Enemy],
    attacker: &AttackerProfile,
    now_ms: u64,
    rng: &mut impl Rng,
) -> HitReport {
    let mut report = HitReport {
        enemies: Vec::with_capacity(enemies.len()),
        hits: Vec::new(),
    };

    for enemy in enemies {
        if enemy.is_malformed() {
            tracing::warn!(enemy = enemy.id, "skipping enemy with zero max health");
            report.enemies.push(enemy.clone());
            continue;
        }
        if !enemy.is_alive() || !hitbox.contains(enemy.position) {
            report.enemies.push(enemy.clone());
            continue;
        }

        let was_crit = roll_crit(attacker.crit_chance, rng);
        let damage = compute_damage(attacker, hitbox.sequence, enemy.archetype, was_crit, now_ms);

        let mut hit = enemy.clone();
        hit.health = hit.health.saturating_sub(damage);
        hit.hit_at = Some(now_ms);
        let killed = hit.health == 0;
        if killed {
            hit.death_time = Some(now_ms);
            hit.boss = None;
        } else if let Some(state) = hit.boss.as_mut() {
            provoke(state);
        }

        let knocked_back = hitbox.sequence == MAX_COMBO_SEQUENCE && !killed;
        if knocked_back {
            let v = hit.position - hitbox.position;
            let away = if v.magnitude_squared() > 0.0 {
                v.normalized()
            } else {
                hitbox.direction
            };
            let offset = away * KNOCKBACK_DISTANCE;
            hit.position += offset;
            hit.knockback = Some(Knockback {
                offset,
                until_ms: now_ms + KNOCKBACK_DURATION_MS,
            });
        }

        report.hits.push(HitRecord {
            enemy_id: hit.id,
            damage,
            was_crit,
            killed,
            knocked_back,
        });
        report.enemies.push(hit);
    }

    report
}

/// Drops hit flags and knockback windows that have run out.
pub fn clear_stale_hit_flags(enemies: &mut [Enemy], now_ms: u64) {
    for enemy in enemies.iter_mut() {
        if enemy.hit_at.is_some() && !enemy.is_hit(now_ms) {
            enemy.hit_at = None;
        }
        if enemy.knockback.is_some() && !enemy.is_knocked_back(now_ms) {
            enemy.knockback = None;
        }
    }
}

pub fn combo_expired(last_attack_ms: Option<u64>, now_ms: u64) -> bool {
    last_attack_ms.map_or(true, |last| now_ms.saturating_sub(last) > COMBO_RESET_MS)
}

/// Moves the actor to its next combo step and returns it (1-4).
pub fn advance_combo(actor: &mut Actor, now_ms: u64) -> u8 {
    if combo_expired(actor.last_attack_time, now_ms) {
        actor.attack_sequence = 0;
    }
    actor.attack_sequence = actor.attack_sequence % MAX_COMBO_SEQUENCE + 1;
    actor.last_attack_time = Some(now_ms);
    actor.attack_sequence
}
