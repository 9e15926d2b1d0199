//! Earth Wall: a short-lived barrier raised ahead of the player
//!
//! Walls block movement for enemies and the player alike. An enemy touching a
//! wall takes damage and is knocked back along the wall-to-enemy vector, at
//! most once per contact cooldown.

use std::f32::consts::FRAC_PI_2;

use super::{Effects, FrameContext, WeaponStats};
use crate::sim::collision::{Hit, HitPayload};
use crate::sim::effect::VisualKind;
use crate::sim::obstacle::{ContactDamage, Obstacle};

pub const WALL_LENGTH: f32 = 3.0;
pub const WALL_THICKNESS: f32 = 0.5;
/// Distance ahead of the player the wall is raised
pub const WALL_OFFSET: f32 = 5.0;
pub const WALL_DURATION: f32 = 5.0;
pub const WALL_KNOCKBACK: f32 = 3.0;
pub const WALL_CONTACT_COOLDOWN: f32 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct WallState {
    walls: Vec<Obstacle>,
    /// Visual id for each wall, parallel to `walls`
    locals: Vec<u32>,
}

impl WallState {
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.walls
    }

    pub fn advance(&mut self, dt: f32, ctx: &FrameContext, stats: &WeaponStats, fx: &mut Effects) {
        let mut i = 0;
        while i < self.walls.len() {
            let wall = &mut self.walls[i];
            wall.advance(dt, ctx.now);
            if wall.expired() {
                fx.despawn(self.locals[i]);
                self.walls.remove(i);
                self.locals.remove(i);
                continue;
            }

            for enemy in ctx.enemies.iter().filter(|e| e.alive) {
                if wall.touches(enemy.pos, enemy.radius) && wall.try_contact(enemy.id, ctx.now) {
                    let knockback = wall.contact.map_or(0.0, |c| c.knockback);
                    let payload = HitPayload::Knockback {
                        origin: wall.pos,
                        distance: knockback,
                    };
                    fx.hit(Hit::new(enemy.id, stats.damage, enemy.pos).with_payload(Some(payload)));
                }
            }
            i += 1;
        }
    }

    pub fn fire(&mut self, ctx: &FrameContext, stats: &WeaponStats, fx: &mut Effects) {
        let pos = ctx.player_pos + ctx.facing * WALL_OFFSET;
        // Long side runs across the facing direction
        let rotation = ctx.facing.y.atan2(ctx.facing.x) + FRAC_PI_2;

        let wall = Obstacle::wall(pos, rotation, WALL_LENGTH, WALL_THICKNESS, WALL_DURATION)
            .with_contact(ContactDamage {
                damage: stats.damage,
                knockback: WALL_KNOCKBACK,
                cooldown: WALL_CONTACT_COOLDOWN,
            });
        let local = fx.spawn(
            VisualKind::Wall {
                length: WALL_LENGTH,
                thickness: WALL_THICKNESS,
            },
            pos,
            rotation,
            None,
        );
        self.walls.push(wall);
        self.locals.push(local);
    }

    pub fn dispose(&mut self, fx: &mut Effects) {
        for local in self.locals.drain(..) {
            fx.despawn(local);
        }
        self.walls.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{WeaponKind, WeaponOutput};
    use super::*;
    use glam::Vec2;

    fn raised(ctx: &FrameContext) -> (WallState, WeaponOutput) {
        let mut state = WallState::default();
        let mut out = WeaponOutput::default();
        let mut next = 1;
        let mut fx = Effects::new(1, &mut next, &mut out);
        state.fire(ctx, &WeaponKind::EarthWall.stats(), &mut fx);
        (state, out)
    }

    #[test]
    fn test_wall_placed_ahead_across_facing() {
        let (state, _) = raised(&ctx(&[]));
        let wall = &state.obstacles()[0];
        assert!((wall.pos - Vec2::new(5.0, 0.0)).length() < 1e-5);
        // Spans the z axis, thin along x
        assert!(wall.contains_point(Vec2::new(5.0, 1.4)));
        assert!(!wall.contains_point(Vec2::new(5.4, 0.0)));
        assert!(wall.blocks_movement);
    }

    #[test]
    fn test_contact_damage_and_knockback_with_cooldown() {
        let enemies = vec![enemy(1, 5.6, 0.0)];
        let ctx = ctx(&enemies);
        let (mut state, _) = raised(&ctx);
        let stats = WeaponKind::EarthWall.stats();
        let mut out = WeaponOutput::default();
        let mut next = 10;
        let mut fx = Effects::new(1, &mut next, &mut out);

        // Ten frames of 1/60 s stay inside one cooldown window
        for _ in 0..10 {
            state.advance(1.0 / 60.0, &ctx, &stats, &mut fx);
        }
        assert_eq!(out.hits.len(), 1);
        let hit = &out.hits[0];
        assert_eq!(hit.damage, 20.0);
        assert!(matches!(
            hit.payload,
            Some(HitPayload::Knockback { distance, .. }) if distance == WALL_KNOCKBACK
        ));
    }

    #[test]
    fn test_cooldown_elapses_for_repeat_contact() {
        let enemies = vec![enemy(1, 5.6, 0.0)];
        let (mut state, _) = raised(&ctx(&enemies));
        let stats = WeaponKind::EarthWall.stats();
        let mut out = WeaponOutput::default();
        let mut next = 10;
        let mut fx = Effects::new(1, &mut next, &mut out);

        let mut now = 0.0;
        for _ in 0..8 {
            now += 0.1;
            let mut frame = ctx(&enemies);
            frame.now = now;
            state.advance(0.1, &frame, &stats, &mut fx);
        }
        // First contact at 0.1, the second once the 0.5 s cooldown has passed
        assert_eq!(out.hits.len(), 2);
    }

    #[test]
    fn test_wall_crumbles() {
        let ctx = ctx(&[]);
        let (mut state, _) = raised(&ctx);
        let stats = WeaponKind::EarthWall.stats();
        let mut out = WeaponOutput::default();
        let mut next = 10;
        let mut fx = Effects::new(1, &mut next, &mut out);
        for _ in 0..51 {
            state.advance(0.1, &ctx, &stats, &mut fx);
        }
        assert!(state.obstacles().is_empty());
        assert_eq!(out.visuals.len(), 1);
    }
}
