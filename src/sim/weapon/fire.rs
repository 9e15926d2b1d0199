//! Fire Storm: a slow fireball that leaves burning patches behind it

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::projectile::{Projectile, Trail, advance_projectiles};
use super::{Effects, FrameContext, WeaponStats};
use crate::sim::collision::{Hit, nearest_enemy};
use crate::sim::effect::VisualKind;
use crate::sim::status::BurnZone;

/// Distance the fireball travels between burn patches
pub const PATCH_SPACING: f32 = 0.8;
pub const PATCH_DURATION: f32 = 3.0;
pub const PATCH_TICK: f32 = 0.5;
pub const PATCH_DAMAGE: f32 = 5.0;
pub const PATCH_RADIUS: f32 = 1.0;
/// Fireball lifetime (range 20 at speed 8)
pub const FIREBALL_TTL: f32 = 2.5;

#[derive(Debug, Clone)]
pub struct Patch {
    pub local: u32,
    pub zone: BurnZone,
}

#[derive(Debug, Clone, Default)]
pub struct FireState {
    pub fireballs: Vec<Projectile>,
    pub patches: Vec<Patch>,
}

impl FireState {
    pub fn advance(&mut self, dt: f32, ctx: &FrameContext, fx: &mut Effects) {
        // Each patch burns on its own schedule
        self.patches.retain_mut(|patch| {
            if patch.zone.advance(dt) {
                for enemy in ctx.enemies.iter().filter(|e| e.alive) {
                    if patch.zone.contains(enemy.pos) {
                        fx.hit(Hit::new(enemy.id, patch.zone.tick_damage, enemy.pos));
                    }
                }
            }
            if patch.zone.burned_out() {
                fx.despawn(patch.local);
                return false;
            }
            true
        });

        let report = advance_projectiles(&mut self.fireballs, dt, ctx, fx);
        for pos in report.trail_marks.into_iter().chain(report.impacts) {
            self.ignite(pos, fx);
        }
    }

    fn ignite(&mut self, pos: Vec2, fx: &mut Effects) {
        let local = fx.spawn(
            VisualKind::BurnPatch {
                radius: PATCH_RADIUS,
            },
            pos,
            0.0,
            None,
        );
        self.patches.push(Patch {
            local,
            zone: BurnZone::new(pos, PATCH_RADIUS, PATCH_DAMAGE, PATCH_DURATION, PATCH_TICK),
        });
    }

    pub fn fire(&mut self, ctx: &FrameContext, stats: &WeaponStats, rng: &mut Pcg32, fx: &mut Effects) {
        let dir = nearest_enemy(ctx.enemies, ctx.player_pos)
            .and_then(|target| (target.pos - ctx.player_pos).try_normalize())
            .unwrap_or_else(|| Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU)));

        let local = fx.spawn(VisualKind::Fireball, ctx.player_pos, dir.y.atan2(dir.x), None);
        self.fireballs.push(Projectile {
            local,
            pos: ctx.player_pos,
            dir,
            speed: stats.speed,
            damage: stats.damage,
            payload: None,
            ttl: Some(FIREBALL_TTL),
            trail: Some(Trail::new(PATCH_SPACING)),
        });
    }

    pub fn dispose(&mut self, fx: &mut Effects) {
        for p in self.fireballs.drain(..) {
            fx.despawn(p.local);
        }
        for patch in self.patches.drain(..) {
            fx.despawn(patch.local);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{WeaponKind, WeaponOutput};
    use super::*;
    use crate::sim::entity::EnemyId;

    #[test]
    fn test_fires_in_random_direction_without_enemies() {
        let ctx = ctx(&[]);
        let mut state = FireState::default();
        let mut out = WeaponOutput::default();
        let mut next = 1;
        let mut fx = Effects::new(1, &mut next, &mut out);
        state.fire(&ctx, &WeaponKind::FireStorm.stats(), &mut rng(), &mut fx);
        assert_eq!(state.fireballs.len(), 1);
        assert!((state.fireballs[0].dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fireball_leaves_patches() {
        let ctx = ctx(&[]);
        let mut state = FireState::default();
        let mut out = WeaponOutput::default();
        let mut next = 1;
        let mut fx = Effects::new(1, &mut next, &mut out);
        state.fire(&ctx, &WeaponKind::FireStorm.stats(), &mut rng(), &mut fx);
        // 1 s at 8 u/s: ten patches dropped
        for _ in 0..60 {
            state.advance(1.0 / 60.0, &ctx, &mut fx);
        }
        assert!((9..=10).contains(&state.patches.len()));
    }

    #[test]
    fn test_patch_damages_every_tick_not_once() {
        let enemies = vec![enemy(1, 0.3, 0.0), enemy(2, 5.0, 0.0)];
        let ctx = ctx(&enemies);
        let mut state = FireState::default();
        let mut out = WeaponOutput::default();
        let mut next = 1;
        let mut fx = Effects::new(1, &mut next, &mut out);
        state.ignite(Vec2::ZERO, &mut fx);
        // 1.2 s: ticks at 0.5 and 1.0
        for _ in 0..12 {
            state.advance(0.1, &ctx, &mut fx);
        }
        assert_eq!(out.hits.len(), 2);
        assert!(out.hits.iter().all(|h| h.enemy == EnemyId(1) && h.damage == PATCH_DAMAGE));
    }

    #[test]
    fn test_patch_burns_out() {
        let ctx = ctx(&[]);
        let mut state = FireState::default();
        let mut out = WeaponOutput::default();
        let mut next = 1;
        let mut fx = Effects::new(1, &mut next, &mut out);
        state.ignite(Vec2::ZERO, &mut fx);
        for _ in 0..31 {
            state.advance(0.1, &ctx, &mut fx);
        }
        assert!(state.patches.is_empty());
    }
}
