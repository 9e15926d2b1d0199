//! Light Beam: a sweep angle that turns every frame and an instantaneous
//! beam cast along it on each shot

use std::collections::BTreeSet;
use std::f32::consts::PI;

use glam::Vec2;

use super::{Effects, FrameContext, WeaponStats};
use crate::sim::collision::{Hit, point_segment_distance};
use crate::sim::effect::VisualKind;
use crate::sim::entity::EnemyId;
use crate::wrap_angle;

pub const BEAM_LENGTH: f32 = 20.0;
pub const BEAM_WIDTH: f32 = 0.5;
/// Sweep speed (rad/s)
pub const BEAM_ROTATION_SPEED: f32 = 0.8 * PI;
pub const BEAM_VISUAL_TIME: f32 = 0.4;

#[derive(Debug, Clone)]
pub struct BeamState {
    /// Current sweep angle in [0, 2π)
    pub angle: f32,
    pub rotation_speed: f32,
    pub length: f32,
    pub width: f32,
}

impl Default for BeamState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            rotation_speed: BEAM_ROTATION_SPEED,
            length: BEAM_LENGTH,
            width: BEAM_WIDTH,
        }
    }
}

impl BeamState {
    /// The sweep keeps turning whether or not the weapon fires
    pub fn advance(&mut self, dt: f32) {
        self.angle = wrap_angle(self.angle + self.rotation_speed * dt);
    }

    /// Distance from the beam axis at which an enemy centre is hit
    ///
    /// Wider than a plain half-width test: 1.5 widths plus the enemy radius.
    pub fn reach(&self, enemy_radius: f32) -> f32 {
        self.width * 1.5 + enemy_radius
    }

    pub fn fire(&mut self, ctx: &FrameContext, stats: &WeaponStats, fx: &mut Effects) {
        let start = ctx.player_pos;
        let end = start + Vec2::from_angle(self.angle) * self.length;

        let mut struck: BTreeSet<EnemyId> = BTreeSet::new();
        for enemy in ctx.enemies.iter().filter(|e| e.alive) {
            let (dist, _) = point_segment_distance(enemy.pos, start, end);
            if dist <= self.reach(enemy.radius) && struck.insert(enemy.id) {
                fx.hit(Hit::new(enemy.id, stats.damage, enemy.pos));
            }
        }

        fx.spawn(
            VisualKind::Beam {
                length: self.length,
                width: self.width,
            },
            start,
            self.angle,
            Some(BEAM_VISUAL_TIME),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{WeaponKind, WeaponOutput};
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_sweep_wraps() {
        let mut beam = BeamState::default();
        for _ in 0..600 {
            beam.advance(1.0 / 60.0);
        }
        assert!((0.0..TAU).contains(&beam.angle));
    }

    #[test]
    fn test_hits_every_enemy_in_line_once() {
        let enemies = vec![
            enemy(1, 2.0, 0.0),
            enemy(2, 6.0, 0.5),
            enemy(3, 12.0, -0.9),
            enemy(4, 5.0, 3.0),
            enemy(5, -4.0, 0.0),
        ];
        let ctx = ctx(&enemies);
        let mut beam = BeamState::default();
        let mut out = WeaponOutput::default();
        let mut next = 1;
        let mut fx = Effects::new(1, &mut next, &mut out);
        beam.fire(&ctx, &WeaponKind::LightBeam.stats(), &mut fx);

        let ids: Vec<_> = out.hits.iter().map(|h| h.enemy.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(out.hits.iter().all(|h| h.damage == 15.0));
    }

    #[test]
    fn test_reach_exceeds_half_width() {
        let beam = BeamState::default();
        assert!((beam.reach(0.4) - 1.15).abs() < 1e-6);

        // 1.0 off the axis: outside half-width plus radius (0.65), inside reach
        let enemies = vec![enemy(1, 8.0, 1.0), enemy(2, 8.0, -1.3)];
        let ctx = ctx(&enemies);
        let mut beam = beam;
        let mut out = WeaponOutput::default();
        let mut next = 1;
        let mut fx = Effects::new(1, &mut next, &mut out);
        beam.fire(&ctx, &WeaponKind::LightBeam.stats(), &mut fx);
        let ids: Vec<_> = out.hits.iter().map(|h| h.enemy.0).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_beam_follows_sweep_angle() {
        let enemies = vec![enemy(1, 0.0, 6.0)];
        let ctx = ctx(&enemies);
        let mut beam = BeamState::default();
        beam.angle = PI / 2.0;
        let mut out = WeaponOutput::default();
        let mut next = 1;
        let mut fx = Effects::new(1, &mut next, &mut out);
        beam.fire(&ctx, &WeaponKind::LightBeam.stats(), &mut fx);
        assert_eq!(out.hits.len(), 1);
    }
}
