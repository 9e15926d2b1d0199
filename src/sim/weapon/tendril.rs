//! Dark and Leeching Tendrils
//!
//! A volley sends several curved tendrils out at even angles. Each tendril
//! strikes the first enemy it touches along its path once, then stays linked
//! to it until the tendril withers. The leeching variant heals the player on
//! a fixed interval while any linked enemy is still alive.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Effects, FrameContext, WeaponStats};
use crate::rotate;
use crate::sim::collision::{Hit, HitPayload, polyline_contact};
use crate::sim::effect::VisualKind;
use crate::sim::entity::EnemyId;
use crate::sim::status::{Pulse, SlowSpec};

/// Segments used to sample a tendril's curve
pub const TENDRIL_SEGMENTS: usize = 20;
/// Largest sideways bend of the curve, as a fraction of its length
pub const MAX_CURL: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeechSpec {
    pub amount: f32,
    pub interval: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TendrilSpec {
    pub count: usize,
    pub length: f32,
    pub width: f32,
    pub duration: f32,
    pub slow: Option<SlowSpec>,
    pub leech: Option<LeechSpec>,
}

#[derive(Debug, Clone)]
pub struct Tendril {
    pub local: u32,
    /// Sampled curve from the root to the tip
    pub points: Vec<Vec2>,
    pub remaining: f32,
    /// Enemy this tendril struck, if any
    pub linked: Option<EnemyId>,
}

#[derive(Debug, Clone)]
pub struct TendrilState {
    pub spec: TendrilSpec,
    pub tendrils: Vec<Tendril>,
    heal_pulse: Option<Pulse>,
}

/// Sample a quadratic Bézier curve
pub fn bezier_points(p0: Vec2, p1: Vec2, p2: Vec2, segments: usize) -> Vec<Vec2> {
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
        })
        .collect()
}

impl TendrilState {
    pub fn new(spec: TendrilSpec) -> Self {
        Self {
            spec,
            tendrils: Vec::new(),
            heal_pulse: spec.leech.map(|l| Pulse::new(l.interval)),
        }
    }

    pub fn dark() -> Self {
        Self::new(TendrilSpec {
            count: 5,
            length: 8.0,
            width: 0.3,
            duration: 1.5,
            slow: Some(SlowSpec {
                amount: 0.5,
                duration: 2.0,
            }),
            leech: None,
        })
    }

    pub fn leeching() -> Self {
        Self::new(TendrilSpec {
            count: 4,
            length: 10.0,
            width: 0.25,
            duration: 2.0,
            slow: None,
            leech: Some(LeechSpec {
                amount: 5.0,
                interval: 0.5,
            }),
        })
    }

    pub fn advance(&mut self, dt: f32, ctx: &FrameContext, stats: &WeaponStats, fx: &mut Effects) {
        let spec = self.spec;

        self.tendrils.retain_mut(|tendril| {
            tendril.remaining -= dt;
            if tendril.remaining <= 0.0 {
                fx.despawn(tendril.local);
                return false;
            }
            if tendril.linked.is_some() {
                return true;
            }

            // First enemy along the path wins
            let first = ctx
                .enemies
                .iter()
                .filter(|e| e.alive)
                .filter_map(|e| {
                    polyline_contact(e.pos, &tendril.points, spec.width + e.radius).map(|along| (along, e))
                })
                .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            if let Some((_, enemy)) = first {
                let payload = spec.slow.map(HitPayload::Slow);
                fx.hit(Hit::new(enemy.id, stats.damage, enemy.pos).with_payload(payload));
                tendril.linked = Some(enemy.id);
            }
            true
        });

        let (Some(leech), Some(pulse)) = (spec.leech, self.heal_pulse.as_mut()) else {
            return;
        };
        let draining = self.tendrils.iter().any(|t| {
            t.linked
                .is_some_and(|id| ctx.enemies.iter().any(|e| e.id == id && e.alive))
        });
        if !draining {
            // The heal clock starts over with the next link
            *pulse = Pulse::new(leech.interval);
        } else if pulse.advance(dt) {
            fx.heal(leech.amount);
        }
    }

    pub fn fire(&mut self, ctx: &FrameContext, rng: &mut Pcg32, fx: &mut Effects) {
        let spec = self.spec;
        let base = rng.random_range(0.0..TAU);
        let origin = ctx.player_pos;

        for i in 0..spec.count {
            let angle = base + TAU * i as f32 / spec.count as f32;
            let dir = Vec2::from_angle(angle);
            let tip = origin + dir * spec.length;
            let curl = rng.random_range(-MAX_CURL..=MAX_CURL) * spec.length;
            let control = origin + dir * (spec.length * 0.5) + rotate(dir, TAU / 4.0) * curl;

            let local = fx.spawn(
                VisualKind::Tendril {
                    length: spec.length,
                    width: spec.width,
                },
                origin,
                angle,
                None,
            );
            self.tendrils.push(Tendril {
                local,
                points: bezier_points(origin, control, tip, TENDRIL_SEGMENTS),
                remaining: spec.duration,
                linked: None,
            });
        }
    }

    pub fn dispose(&mut self, fx: &mut Effects) {
        for tendril in self.tendrils.drain(..) {
            fx.despawn(tendril.local);
        }
    }
}
