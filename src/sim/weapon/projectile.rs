//! Shared projectile lifecycle
//!
//! Projectiles fly straight, hit the first overlapping enemy in list order and
//! are consumed by that hit. They are also dropped once they stray farther than
//! `PROJECTILE_MAX_RANGE` from the player, or when their optional lifetime ends.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Effects, FrameContext};
use crate::consts::{PROJECTILE_MAX_RANGE, PROJECTILE_RADIUS};
use crate::sim::collision::{Hit, HitPayload, first_overlap};

/// Periodic marker dropped along a projectile's path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    /// Distance travelled between markers
    pub every: f32,
    pub until_next: f32,
}

impl Trail {
    pub fn new(every: f32) -> Self {
        Self {
            every,
            until_next: every,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Visual id within the owning weapon
    pub local: u32,
    pub pos: Vec2,
    /// Unit direction of travel
    pub dir: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub payload: Option<HitPayload>,
    /// Seconds left to live, if lifetime bound
    pub ttl: Option<f32>,
    pub trail: Option<Trail>,
}

/// What happened to a weapon's projectiles this frame
#[derive(Debug, Default)]
pub struct FlightReport {
    /// Positions where projectiles struck an enemy
    pub impacts: Vec<Vec2>,
    /// Positions where trail markers are due
    pub trail_marks: Vec<Vec2>,
}

/// Move, expire and hit-test a weapon's projectiles
pub fn advance_projectiles(
    projectiles: &mut Vec<Projectile>,
    dt: f32,
    ctx: &FrameContext,
    fx: &mut Effects,
) -> FlightReport {
    let mut report = FlightReport::default();

    projectiles.retain_mut(|p| {
        let step = p.dir * p.speed * dt;
        p.pos += step;

        if let Some(trail) = p.trail.as_mut() {
            trail.until_next -= step.length();
            if trail.until_next <= 0.0 {
                report.trail_marks.push(p.pos);
                trail.until_next += trail.every;
                if trail.until_next <= 0.0 {
                    trail.until_next = trail.every;
                }
            }
        }

        let expired = match p.ttl.as_mut() {
            Some(ttl) => {
                *ttl -= dt;
                *ttl <= 0.0
            }
            None => false,
        };
        if expired || p.pos.distance(ctx.player_pos) > PROJECTILE_MAX_RANGE {
            fx.despawn(p.local);
            return false;
        }

        if let Some(enemy) = first_overlap(ctx.enemies, p.pos, PROJECTILE_RADIUS) {
            fx.hit(Hit::new(enemy.id, p.damage, p.pos).with_payload(p.payload));
            report.impacts.push(p.pos);
            fx.despawn(p.local);
            return false;
        }

        fx.move_to(p.local, p.pos);
        true
    });

    report
}
