//! Enemy controller: spawning, seeking, obstacle blocking, player contact

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Enemy, EnemyId, Player};
use super::obstacle::{Obstacle, resolve_move};
use super::status::{Countdown, expire_slow};
use crate::consts::*;
use crate::settings::Difficulty;
use crate::{direction_or, ring_point};

/// Seconds between spawns at a given score
///
/// Shrinks by one second per 200 points, by at most 2.5 seconds, and never
/// drops below the minimum interval whatever the difficulty scale.
pub fn spawn_interval(score: u64, difficulty_scale: f32) -> f32 {
    let reduction = (score as f32 / SPAWN_SCORE_SCALE).min(MAX_SPAWN_REDUCTION);
    ((BASE_SPAWN_INTERVAL - reduction) * difficulty_scale).max(MIN_SPAWN_INTERVAL)
}

/// Result of one controller update
#[derive(Debug, Default)]
pub struct EnemyUpdate {
    /// At least one enemy touched the player this frame
    pub player_collision: bool,
    /// Enemies spawned this frame
    pub spawned: Vec<EnemyId>,
    /// Enemies removed this frame (each reported once)
    pub just_died: Vec<Enemy>,
}

/// Owns the living enemies and the spawn timer
#[derive(Debug, Clone)]
pub struct EnemyController {
    /// Living enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub spawn_timer: Countdown,
    difficulty: Difficulty,
    next_id: u32,
}

impl EnemyController {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            enemies: Vec::new(),
            spawn_timer: Countdown::new(BASE_SPAWN_INTERVAL),
            difficulty,
            next_id: 1,
        }
    }

    /// Spawn one enemy on the ring around the player
    pub fn spawn(&mut self, player_pos: Vec2, rng: &mut Pcg32) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;

        let theta = rng.random_range(0.0..std::f32::consts::TAU);
        let pos = ring_point(player_pos, theta, SPAWN_DISTANCE);
        let enemy = Enemy::new(
            id,
            pos,
            ENEMY_SPEED * self.difficulty.enemy_speed(),
            ENEMY_HEALTH * self.difficulty.enemy_health(),
        );
        log::debug!("Spawned enemy {} at ({:.2}, {:.2})", id.0, pos.x, pos.y);
        self.enemies.push(enemy);
        id
    }

    /// Advance every enemy by one frame
    ///
    /// Existing enemies move first; a spawn due this frame lands afterwards,
    /// so a fresh enemy always starts exactly on the spawn ring.
    pub fn update_all(
        &mut self,
        dt: f32,
        player: &Player,
        score: u64,
        obstacles: &[Obstacle],
        now: f32,
        rng: &mut Pcg32,
    ) -> EnemyUpdate {
        let mut update = EnemyUpdate::default();

        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            expire_slow(enemy, now);

            // Standing on the player: hold still rather than pick a direction
            let dir = direction_or(enemy.pos, player.pos, Vec2::ZERO);
            let target = enemy.pos + dir * enemy.speed * dt;
            enemy.pos = resolve_move(enemy.pos, target, enemy.radius, obstacles);

            if enemy.pos.distance(player.pos) < enemy.radius + player.radius {
                update.player_collision = true;
            }
        }

        if self.spawn_timer.tick(dt) {
            update.spawned.push(self.spawn(player.pos, rng));
            self.spawn_timer
                .reset(spawn_interval(score, self.difficulty.spawn_interval()));
        }

        update.just_died = self.reap_dead();
        update
    }

    /// Remove dead enemies, returning them so their score can be credited
    pub fn reap_dead(&mut self) -> Vec<Enemy> {
        let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
            self.enemies.drain(..).partition(|e| !e.alive);
        self.enemies = alive;
        dead
    }

    /// Shove every living enemy `distance` units directly away from the player
    pub fn pushback_all(&mut self, player_pos: Vec2, distance: f32) {
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            let dir = direction_or(player_pos, enemy.pos, Vec2::X);
            enemy.pos += dir * distance;
        }
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn living(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    /// Drop every enemy (restart)
    pub fn clear(&mut self) -> Vec<Enemy> {
        std::mem::take(&mut self.enemies)
    }
}
