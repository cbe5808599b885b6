use super::types::AttackHitbox;
use crate::core::constants::*;
use crate::core::Vec2;

/// Clamps `sequence` into 1..=4, warning when it had to.
pub fn clamp_sequence(sequence: u8) -> u8 {
    let clamped = sequence.clamp(1, MAX_COMBO_SEQUENCE);
    if clamped != sequence {
        tracing::warn!(sequence, clamped, "combo sequence out of range");
    }
    clamped
}

/// Arc for combo step `sequence`. Later steps reach further and last longer.
pub fn compute_hitbox(position: Vec2, direction: Vec2, sequence: u8) -> AttackHitbox {
    let sequence = clamp_sequence(sequence);
    let index = (sequence - 1) as usize;
    let direction = if direction.magnitude_squared() > 0.0 {
        direction.normalized()
    } else {
        tracing::warn!("zero attack direction, facing +x");
        Vec2::unit_x()
    };
    AttackHitbox {
        position,
        direction,
        angle_degrees: HITBOX_ANGLE_DEGREES,
        radius: HITBOX_BASE_RADIUS * HITBOX_RADIUS_MULTIPLIERS[index],
        sequence,
        duration_ms: HITBOX_DURATIONS_MS[index],
    }
}

impl AttackHitbox {
    /// Inside the radius and within half the arc angle of the facing.
    /// A point on the origin counts as inside.
    pub fn contains(&self, point: Vec2) -> bool {
        let v = point - self.position;
        let d = v.magnitude();
        if d > self.radius {
            return false;
        }
        if d == 0.0 {
            return true;
        }
        let cos = (self.direction.dot(v) / d).clamp(-1.0, 1.0);
        cos.acos().to_degrees() <= self.angle_degrees / 2.0
    }
}
