//! Homing shots: the single-target Magic Bolt and the twin Icicle Shard

use glam::Vec2;

use super::projectile::{Projectile, advance_projectiles};
use super::{Effects, FrameContext, WeaponStats};
use crate::rotate;
use crate::sim::collision::{HitPayload, nearest_enemy};
use crate::sim::effect::VisualKind;
use crate::sim::status::SlowSpec;

#[derive(Debug, Clone)]
pub struct BoltState {
    pub projectiles: Vec<Projectile>,
    /// Angular offsets of each shot from the aim direction (radians)
    pub spread: Vec<f32>,
    /// Aim used with no enemy in sight; `None` holds fire instead
    pub fallback_dir: Option<Vec2>,
    pub slow: Option<SlowSpec>,
    pub visual: VisualKind,
}

impl BoltState {
    pub fn magic_bolt() -> Self {
        Self {
            projectiles: Vec::new(),
            spread: vec![0.0],
            fallback_dir: None,
            slow: None,
            visual: VisualKind::Bolt,
        }
    }

    pub fn icicle_shard() -> Self {
        Self {
            projectiles: Vec::new(),
            spread: vec![-0.2, 0.2],
            fallback_dir: Some(Vec2::X),
            slow: Some(SlowSpec {
                amount: 0.6,
                duration: 3.0,
            }),
            visual: VisualKind::Icicle,
        }
    }

    pub fn advance(&mut self, dt: f32, ctx: &FrameContext, fx: &mut Effects) {
        advance_projectiles(&mut self.projectiles, dt, ctx, fx);
    }

    pub fn fire(&mut self, ctx: &FrameContext, stats: &WeaponStats, fx: &mut Effects) {
        let aim = match nearest_enemy(ctx.enemies, ctx.player_pos) {
            Some(target) => (target.pos - ctx.player_pos)
                .try_normalize()
                .or(self.fallback_dir)
                .unwrap_or(ctx.facing),
            None => match self.fallback_dir {
                Some(dir) => dir,
                None => return,
            },
        };

        for &offset in &self.spread {
            let dir = rotate(aim, offset);
            let local = fx.spawn(self.visual, ctx.player_pos, dir.y.atan2(dir.x), None);
            self.projectiles.push(Projectile {
                local,
                pos: ctx.player_pos,
                dir,
                speed: stats.speed,
                damage: stats.damage,
                payload: self.slow.map(HitPayload::Slow),
                ttl: None,
                trail: None,
            });
        }
    }

    pub fn dispose(&mut self, fx: &mut Effects) {
        for p in self.projectiles.drain(..) {
            fx.despawn(p.local);
        }
    }
}
