//! Timed status effects and timers
//!
//! Effects carry explicit expiry timestamps on the simulation clock and are
//! checked once per frame, so nothing can fire against a removed entity.
//!
//! - Slow: multiplier on base speed, refreshed (never stacked) by reapplication
//! - Burn: periodic fixed damage inside a zone, each zone ticking on its own
//! - Leech: periodic heal credited to the player, clamped to [0, 100]

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Enemy;
use crate::consts::{PLAYER_MAX_HEALTH, TIMER_EPSILON};

/// Slow applied to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowState {
    /// Fraction of base speed kept while slowed, in (0, 1]
    pub multiplier: f32,
    /// Simulation time at which the slow ends
    pub expires_at: f32,
}

/// Slow parameters carried by a weapon or projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowSpec {
    pub amount: f32,
    pub duration: f32,
}

/// Smallest multiplier a slow may impose
const MIN_SLOW_MULTIPLIER: f32 = 0.05;

/// Slow an enemy to `amount` of its base speed for `duration` seconds.
///
/// Reapplying while slowed replaces both the multiplier and the timer.
pub fn apply_slow(enemy: &mut Enemy, amount: f32, duration: f32, now: f32) {
    if !enemy.alive {
        return;
    }
    let multiplier = if amount.is_finite() {
        amount.clamp(MIN_SLOW_MULTIPLIER, 1.0)
    } else {
        1.0
    };
    enemy.slow = Some(SlowState {
        multiplier,
        expires_at: now + duration.max(0.0),
    });
    enemy.speed = enemy.base_speed * multiplier;
}

/// Drop an expired slow and restore base speed. Returns true if it expired
pub fn expire_slow(enemy: &mut Enemy, now: f32) -> bool {
    match enemy.slow {
        Some(slow) if now >= slow.expires_at => {
            enemy.slow = None;
            enemy.speed = enemy.base_speed;
            true
        }
        _ => false,
    }
}

/// Clamp a health value to [0, 100]
#[inline]
pub fn clamp_health(health: f32) -> f32 {
    health.clamp(0.0, PLAYER_MAX_HEALTH)
}

/// One-shot countdown (weapon cooldowns, spawn timer)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub remaining: f32,
}

impl Countdown {
    pub fn new(remaining: f32) -> Self {
        Self { remaining }
    }

    /// Advance by `dt`; returns true once the countdown has run out
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.is_ready()
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= TIMER_EPSILON
    }

    pub fn reset(&mut self, duration: f32) {
        self.remaining = duration;
    }
}

/// Repeating timer that fires at most once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub interval: f32,
    pub until_next: f32,
}

impl Pulse {
    /// First firing happens one full interval from now
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            until_next: interval,
        }
    }

    /// Advance by `dt`; returns true on frames where the pulse fires
    pub fn advance(&mut self, dt: f32) -> bool {
        self.until_next -= dt;
        if self.until_next <= TIMER_EPSILON {
            self.until_next += self.interval;
            // A long frame restarts the period instead of queueing catch-up pulses
            if self.until_next <= TIMER_EPSILON {
                self.until_next = self.interval;
            }
            return true;
        }
        false
    }
}

/// A patch of burning ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnZone {
    pub pos: Vec2,
    pub radius: f32,
    /// Damage dealt to every enemy inside on each tick
    pub tick_damage: f32,
    /// Seconds until the zone burns out
    pub remaining: f32,
    pub pulse: Pulse,
}

impl BurnZone {
    pub fn new(pos: Vec2, radius: f32, tick_damage: f32, duration: f32, interval: f32) -> Self {
        Self {
            pos,
            radius,
            tick_damage,
            remaining: duration,
            pulse: Pulse::new(interval),
        }
    }

    /// Advance the zone; returns true when it should damage this frame
    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        let fire = self.pulse.advance(dt);
        fire && !self.burned_out()
    }

    pub fn burned_out(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EnemyId;
    use proptest::prelude::*;

    fn enemy() -> Enemy {
        Enemy::new(EnemyId(1), Vec2::ZERO, 2.0, 100.0)
    }

    #[test]
    fn test_slow_and_expire() {
        let mut e = enemy();
        apply_slow(&mut e, 0.6, 3.0, 0.0);
        assert!(e.is_slowed());
        assert!((e.speed - 1.2).abs() < 1e-6);

        assert!(!expire_slow(&mut e, 2.9));
        assert!(expire_slow(&mut e, 3.0));
        assert!(!e.is_slowed());
        assert_eq!(e.speed.to_bits(), e.base_speed.to_bits());
    }

    #[test]
    fn test_reapply_refreshes_timer() {
        let mut e = enemy();
        apply_slow(&mut e, 0.6, 3.0, 0.0);
        apply_slow(&mut e, 0.6, 3.0, 2.0);
        assert!(!expire_slow(&mut e, 3.5));
        assert!(expire_slow(&mut e, 5.0));
    }

    #[test]
    fn test_reapply_replaces_multiplier() {
        let mut e = enemy();
        apply_slow(&mut e, 0.5, 2.0, 0.0);
        apply_slow(&mut e, 0.8, 2.0, 0.5);
        assert!((e.speed - e.base_speed * 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_slow_ignored_on_dead_enemy() {
        let mut e = enemy();
        e.alive = false;
        apply_slow(&mut e, 0.5, 2.0, 0.0);
        assert!(!e.is_slowed());
    }

    #[test]
    fn test_countdown() {
        let mut c = Countdown::new(3.0);
        let dt = 1.0 / 60.0;
        let mut ticks = 0;
        while !c.tick(dt) {
            ticks += 1;
        }
        // 180th tick is the one that reports ready
        assert_eq!(ticks + 1, 180);
    }

    #[test]
    fn test_pulse_fires_every_interval() {
        let mut p = Pulse::new(0.5);
        let fired = (0..60).filter(|_| p.advance(1.0 / 60.0)).count();
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_pulse_no_burst_after_long_frame() {
        let mut p = Pulse::new(0.5);
        assert!(p.advance(5.0));
        assert!(!p.advance(0.01));
    }

    #[test]
    fn test_burn_zone_ticks_then_burns_out() {
        let mut zone = BurnZone::new(Vec2::ZERO, 1.0, 5.0, 2.8, 0.5);
        let dt = 0.1;
        let ticks = (0..40).filter(|_| zone.advance(dt)).count();
        assert!(zone.burned_out());
        assert_eq!(ticks, 5);
        assert!(zone.contains(Vec2::new(0.5, 0.5)));
        assert!(!zone.contains(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_clamp_health() {
        assert_eq!(clamp_health(130.0), 100.0);
        assert_eq!(clamp_health(-4.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_repeated_slow_never_compounds(
            amounts in proptest::collection::vec(0.1f32..=1.0, 1..8),
            gap in 0.0f32..1.0,
        ) {
            let mut e = enemy();
            let mut now = 0.0;
            for amount in &amounts {
                apply_slow(&mut e, *amount, 3.0, now);
                prop_assert!(e.speed >= e.base_speed * amount - 1e-6);
                now += gap;
            }
            expire_slow(&mut e, now + 3.0);
            prop_assert_eq!(e.speed.to_bits(), e.base_speed.to_bits());
        }
    }
}
