//! Thunderbolts: staggered strikes on the closest enemies
//!
//! A volley snapshots the nearest living enemies and queues one strike per
//! target. Missing targets are padded with decoy positions so every volley
//! has the same rhythm. When a strike lands it re-checks its target: a decoy,
//! or an enemy that died in the meantime, only produces the impact visual.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Effects, FrameContext, WeaponStats};
use crate::ring_point;
use crate::sim::collision::{Hit, enemies_by_distance};
use crate::sim::effect::VisualKind;
use crate::sim::entity::EnemyId;

pub const STRIKE_COUNT: usize = 3;
/// Delay between consecutive strikes of a volley
pub const STRIKE_STAGGER: f32 = 0.15;
pub const DECOY_MIN_DISTANCE: f32 = 5.0;
pub const DECOY_MAX_DISTANCE: f32 = 15.0;
/// How long the renderer shows an impact
pub const STRIKE_VISUAL_TIME: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct Strike {
    /// `None` for a decoy
    pub target: Option<EnemyId>,
    /// Where the strike lands if the target is gone
    pub pos: Vec2,
    /// Seconds until the strike lands
    pub delay: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ThunderState {
    pub pending: Vec<Strike>,
}

impl ThunderState {
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn advance(&mut self, dt: f32, ctx: &FrameContext, stats: &WeaponStats, fx: &mut Effects) {
        self.pending.retain_mut(|strike| {
            strike.delay -= dt;
            if strike.delay > 0.0 {
                return true;
            }

            let live_target = strike
                .target
                .and_then(|id| ctx.enemies.iter().find(|e| e.id == id && e.alive));
            let pos = match live_target {
                Some(enemy) => {
                    fx.hit(Hit::new(enemy.id, stats.damage, enemy.pos));
                    enemy.pos
                }
                None => strike.pos,
            };
            fx.spawn(VisualKind::Strike, pos, 0.0, Some(STRIKE_VISUAL_TIME));
            false
        });
    }

    pub fn fire(&mut self, ctx: &FrameContext, rng: &mut Pcg32) {
        let targets = enemies_by_distance(ctx.enemies, ctx.player_pos);
        for i in 0..STRIKE_COUNT {
            let (target, pos) = match targets.get(i) {
                Some(enemy) => (Some(enemy.id), enemy.pos),
                None => {
                    let theta = rng.random_range(0.0..std::f32::consts::TAU);
                    let distance = rng.random_range(DECOY_MIN_DISTANCE..DECOY_MAX_DISTANCE);
                    (None, ring_point(ctx.player_pos, theta, distance))
                }
            };
            self.pending.push(Strike {
                target,
                pos,
                delay: STRIKE_STAGGER * i as f32,
            });
        }
        log::debug!(
            "Thunderbolts volley queued ({} real targets)",
            targets.len().min(STRIKE_COUNT)
        );
    }

    pub fn dispose(&mut self) {
        self.pending.clear();
    }
}
