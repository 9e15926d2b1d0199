//! Per-frame simulation step and phase transitions
//!
//! Frame order while running:
//! 1. Player movement (blocked by obstacles)
//! 2. Enemy controller (slows expire, seek, spawn)
//! 3. Weapons against a snapshot of enemies and obstacles; hits applied in order
//! 4. Dead enemies reaped and scored
//! 5. Enemy contact: player damage, pushback
//! 6. Obstacle list rebuilt for next frame
//! 7. Game over, otherwise milestone check (selection opens after all damage)

use glam::Vec2;
use rand::Rng;

use super::collision::HitPayload;
use super::effect::{VisualCommand, VisualKey, VisualKind, VisualUpdate};
use super::obstacle::resolve_move;
use super::selection::{milestone_offer, starter_offer};
use super::state::{GameEvent, GamePhase, GameState, milestone_of};
use super::status::apply_slow;
use super::weapon::{FrameContext, WeaponOutput};
use crate::consts::*;
use crate::direction_or;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Movement intent on the ground plane, each axis in [-1, 1]
    pub movement: Vec2,
}

/// Leave the menu and present the starter offer
pub fn start(state: &mut GameState) {
    if state.phase != GamePhase::Menu {
        return;
    }
    log::info!(
        "Session started (seed {}, difficulty {})",
        state.seed,
        state.settings.difficulty.as_str()
    );
    state.visuals.push(VisualCommand::Spawn {
        key: VisualKey::Player,
        kind: VisualKind::Player {
            color: state.player.color,
        },
        pos: state.player.pos,
        orientation: 0.0,
        lifetime: None,
    });
    state.offers = starter_offer(&mut state.rng);
    state.phase = GamePhase::WeaponSelect;
}

/// Take the offered weapon at `index` and resume play
///
/// Returns false (and changes nothing) when no selection is pending or the
/// index is out of range.
pub fn select_weapon(state: &mut GameState, index: usize) -> bool {
    if state.phase != GamePhase::WeaponSelect {
        log::warn!("Weapon selected outside of weapon selection; ignored");
        return false;
    }
    let Some(&kind) = state.offers.get(index) else {
        log::warn!("Weapon offer {} out of range ({} offered)", index, state.offers.len());
        return false;
    };

    state.arsenal.add(kind);
    state.offers.clear();
    state.events.push(GameEvent::WeaponAdded { kind });
    log::info!("Weapon added: {} ({} total)", kind.name(), state.arsenal.len());

    // Give the player room after the pause
    state.enemies.pushback_all(state.player.pos, PUSHBACK_DISTANCE);
    state.phase = GamePhase::Running;
    true
}

/// Tear the session down and return to the starter offer
///
/// Every weapon is disposed first, so no effect outlives the run.
pub fn restart(state: &mut GameState) {
    let mut out = WeaponOutput::default();
    state.arsenal.dispose_all(&mut out);

    let mut visuals = state.drain_visuals();
    visuals.extend(out.visuals);
    for enemy in state.enemies.clear() {
        visuals.push(VisualCommand::Despawn {
            key: VisualKey::Enemy(enemy.id),
        });
    }
    if state.phase != GamePhase::Menu {
        visuals.push(VisualCommand::Despawn {
            key: VisualKey::Player,
        });
    }

    let rng = state.rng.clone();
    let final_score = state.score;
    *state = GameState::new(state.seed, state.settings.clone());
    state.rng = rng;
    state.visuals = visuals;
    log::info!("Session restarted (previous score {})", final_score);
    start(state);
}

/// Advance the simulation by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Running {
        return;
    }
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    state.elapsed += dt;
    let now = state.elapsed;
    let score_before = state.score;

    // Player movement
    let step = state.player.step_for(input.movement, dt);
    state.player.face(input.movement);
    let target = state.player.pos + step;
    state.player.pos = resolve_move(state.player.pos, target, state.player.radius, &state.obstacles);
    state.visuals.push(VisualCommand::Update {
        key: VisualKey::Player,
        update: VisualUpdate::moved_to(state.player.pos),
    });

    // Enemies
    let update = state.enemies.update_all(
        dt,
        &state.player,
        state.score,
        &state.obstacles,
        now,
        &mut state.rng,
    );
    for id in &update.spawned {
        if let Some(enemy) = state.enemies.enemies.iter().find(|e| e.id == *id) {
            state.visuals.push(VisualCommand::Spawn {
                key: VisualKey::Enemy(enemy.id),
                kind: VisualKind::Enemy,
                pos: enemy.pos,
                orientation: 0.0,
                lifetime: None,
            });
        }
    }

    // Weapons read this frame's snapshot; hits are applied afterwards in order
    let ctx = FrameContext {
        player_pos: state.player.pos,
        facing: state.player.facing,
        enemies: &state.enemies.enemies,
        obstacles: &state.obstacles,
        now,
    };
    let out = state.arsenal.update_all(dt, &ctx, &mut state.rng);
    state.visuals.extend(out.visuals);

    for hit in &out.hits {
        let Some(enemy) = state.enemies.get_mut(hit.enemy) else {
            continue;
        };
        enemy.take_damage(hit.damage);
        match hit.payload {
            Some(HitPayload::Slow(slow)) => apply_slow(enemy, slow.amount, slow.duration, now),
            Some(HitPayload::Knockback { origin, distance }) if enemy.alive => {
                enemy.pos += direction_or(origin, enemy.pos, Vec2::X) * distance;
            }
            _ => {}
        }
    }
    if out.heal > 0.0 && !state.player.is_dead() {
        state.player.heal(out.heal);
    }

    // Score the dead
    let dead = update
        .just_died
        .into_iter()
        .chain(state.enemies.reap_dead());
    for enemy in dead {
        state.score += enemy.value;
        state.events.push(GameEvent::EnemyKilled {
            id: enemy.id,
            value: enemy.value,
        });
        state.visuals.push(VisualCommand::Despawn {
            key: VisualKey::Enemy(enemy.id),
        });
    }
    if state.settings.score_trickle && state.rng.random_bool(SCORE_TRICKLE_CHANCE) {
        state.score += 1;
    }

    // Enemy contact
    if update.player_collision {
        state.player.take_damage(ENEMY_CONTACT_DAMAGE);
        state.enemies.pushback_all(state.player.pos, PUSHBACK_DISTANCE);
        state.events.push(GameEvent::PlayerHit {
            health: state.player.health,
        });
        log::info!("Player hit, health {:.0}", state.player.health);
    }

    for enemy in state.enemies.living() {
        state.visuals.push(VisualCommand::Update {
            key: VisualKey::Enemy(enemy.id),
            update: VisualUpdate::moved_to(enemy.pos),
        });
    }

    // Walls raised this frame become solid from the next frame on
    state.obstacles = state.arsenal.obstacles();

    if state.player.is_dead() {
        // Nothing a weapon owns may outlive the run
        let mut released = WeaponOutput::default();
        state.arsenal.dispose_all(&mut released);
        state.visuals.extend(released.visuals);
        state.obstacles.clear();

        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!(
            "Game over: score {}, survived {:.1}s",
            state.score,
            state.elapsed
        );
        return;
    }

    // Skipped thresholds are never made up: one selection per update at most
    if milestone_of(score_before) < milestone_of(state.score) {
        let milestone = state.milestone();
        state.events.push(GameEvent::MilestoneReached { milestone });
        state.offers = milestone_offer(&state.arsenal.kinds(), &mut state.rng);
        state.phase = GamePhase::WeaponSelect;
        log::info!("Milestone {} reached at score {}", milestone, state.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::{Enemy, EnemyId};
    use crate::sim::obstacle::Obstacle;
    use crate::sim::weapon::WeaponKind;

    const DT: f32 = 1.0 / 60.0;

    /// Running session with no weapons
    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Settings::default());
        start(&mut state);
        state.offers.clear();
        state.phase = GamePhase::Running;
        state
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_start_presents_starter_offer() {
        let mut state = GameState::new(1, Settings::default());
        start(&mut state);
        assert_eq!(state.phase, GamePhase::WeaponSelect);
        assert_eq!(state.offers.len(), OFFER_COUNT);
        assert!(state.is_paused());
    }

    #[test]
    fn test_paused_frames_are_skipped() {
        let mut state = GameState::new(1, Settings::default());
        start(&mut state);
        for _ in 0..100 {
            tick(&mut state, &idle(), DT);
        }
        assert_eq!(state.elapsed, 0.0);
        assert!(state.enemies.enemies.is_empty());
    }

    #[test]
    fn test_first_enemy_spawns_after_three_seconds() {
        let mut state = running(2024);
        let mut first_spawn = None;
        for frame in 1..=1000 {
            tick(&mut state, &idle(), DT);
            if first_spawn.is_none() && !state.enemies.enemies.is_empty() {
                first_spawn = Some(frame);
                let enemy = &state.enemies.enemies[0];
                let d = enemy.pos.distance(state.player.pos);
                assert!((d - SPAWN_DISTANCE).abs() < 1e-3, "spawned at distance {d}");
            }
            if state.phase != GamePhase::Running {
                break;
            }
        }
        assert_eq!(first_spawn, Some(180));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_enemy_contact_costs_health_and_pushes_back() {
        let mut state = running(3);
        state
            .enemies
            .enemies
            .push(Enemy::new(EnemyId(100), Vec2::new(0.5, 0.0), 0.0, 100.0));
        state
            .enemies
            .enemies
            .push(Enemy::new(EnemyId(101), Vec2::new(6.0, 8.0), 0.0, 100.0));
        let before: Vec<Vec2> = state.enemies.enemies.iter().map(|e| e.pos).collect();

        tick(&mut state, &idle(), DT);

        assert_eq!(state.player.health, 90.0);
        for (enemy, old) in state.enemies.enemies.iter().zip(before) {
            let moved = enemy.pos - old;
            assert!((moved.length() - PUSHBACK_DISTANCE).abs() < 1e-4);
            // Directly away from the player
            assert!(moved.normalize().dot(old.normalize()) > 0.9999);
        }
        assert!(state.events.contains(&GameEvent::PlayerHit { health: 90.0 }));
    }

    #[test]
    fn test_death_freezes_session() {
        let mut state = running(4);
        state.score = 35;
        state.player.health = 10.0;
        state
            .enemies
            .enemies
            .push(Enemy::new(EnemyId(100), Vec2::new(0.3, 0.0), 0.0, 100.0));

        tick(&mut state, &idle(), DT);
        assert_eq!(state.player.health, 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { score: 35 }));

        let elapsed = state.elapsed;
        let positions: Vec<Vec2> = state.enemies.enemies.iter().map(|e| e.pos).collect();
        for _ in 0..120 {
            tick(&mut state, &idle(), DT);
        }
        assert_eq!(state.score, 35);
        assert_eq!(state.elapsed, elapsed);
        let after: Vec<Vec2> = state.enemies.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(positions, after);
    }

    #[test]
    fn test_game_over_disposes_weapons() {
        let mut state = running(15);
        state.arsenal.add(WeaponKind::EarthWall);
        state.arsenal.add(WeaponKind::DarkTendrils);
        tick(&mut state, &idle(), DT);
        assert_eq!(state.obstacles.len(), 1);
        state.drain_visuals();

        state.player.health = 10.0;
        state
            .enemies
            .enemies
            .push(Enemy::new(EnemyId(100), Vec2::new(0.3, 0.0), 0.0, 100.0));
        tick(&mut state, &idle(), DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.arsenal.is_empty());
        assert!(state.obstacles.is_empty());
        let released = state
            .visuals
            .iter()
            .filter(|v| {
                matches!(
                    v,
                    VisualCommand::Despawn {
                        key: VisualKey::Effect { .. }
                    }
                )
            })
            .count();
        // One wall plus five tendrils
        assert_eq!(released, 6);
    }

    fn doomed_enemy(id: u32, value: u64) -> Enemy {
        let mut enemy = Enemy::new(EnemyId(id), Vec2::new(10.0, 0.0), 0.0, 1.0);
        enemy.value = value;
        enemy.alive = false;
        enemy
    }

    #[test]
    fn test_milestone_fires_once_for_one_crossing() {
        let mut state = running(5);
        state.score = 150;
        state.enemies.enemies.push(doomed_enemy(100, 110));

        tick(&mut state, &idle(), DT);

        assert_eq!(state.score, 260);
        assert_eq!(state.phase, GamePhase::WeaponSelect);
        let milestones: Vec<_> = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::MilestoneReached { .. }))
            .collect();
        assert_eq!(milestones, vec![&GameEvent::MilestoneReached { milestone: 1 }]);
        assert_eq!(state.offers.len(), OFFER_COUNT);
    }

    #[test]
    fn test_skipped_milestones_are_not_made_up() {
        let mut state = running(6);
        state.score = 150;
        state.enemies.enemies.push(doomed_enemy(100, 500));
        tick(&mut state, &idle(), DT);
        assert_eq!(state.score, 650);

        assert!(select_weapon(&mut state, 0));
        for _ in 0..10 {
            tick(&mut state, &idle(), DT);
        }
        let count = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::MilestoneReached { .. }))
            .count();
        assert_eq!(count, 1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_select_weapon_resumes_and_pushes_back() {
        let mut state = GameState::new(7, Settings::default());
        start(&mut state);
        state
            .enemies
            .enemies
            .push(Enemy::new(EnemyId(100), Vec2::new(0.0, 2.0), 2.0, 100.0));
        let offered = state.offers[1];

        assert!(!select_weapon(&mut state, 3));
        assert_eq!(state.phase, GamePhase::WeaponSelect);

        assert!(select_weapon(&mut state, 1));
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.arsenal.kinds(), vec![offered]);
        assert!((state.enemies.enemies[0].pos - Vec2::new(0.0, 4.5)).length() < 1e-5);
        assert!(state.offers.is_empty());

        // Nothing pending any more
        assert!(!select_weapon(&mut state, 0));
    }

    #[test]
    fn test_weapon_kills_enemy_and_scores() {
        let mut state = running(8);
        state.arsenal.add(WeaponKind::MagicBolt);
        state
            .enemies
            .enemies
            .push(Enemy::new(EnemyId(100), Vec2::new(4.0, 0.0), 0.0, 20.0));

        for _ in 0..60 {
            tick(&mut state, &idle(), DT);
        }
        assert_eq!(state.score, ENEMY_SCORE_VALUE);
        assert!(state.enemies.enemies.iter().all(|e| e.id != EnemyId(100)));
        let kills = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
    }

    #[test]
    fn test_icicle_hit_slows_enemy() {
        let mut state = running(9);
        state.arsenal.add(WeaponKind::IcicleShard);
        state
            .enemies
            .enemies
            .push(Enemy::new(EnemyId(100), Vec2::new(2.5, 0.0), 2.0, 1000.0));

        for _ in 0..20 {
            tick(&mut state, &idle(), DT);
        }
        let enemy = &state.enemies.enemies[0];
        assert!(enemy.is_slowed());
        assert!((enemy.speed - 2.0 * 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_obstacle_blocks_player() {
        let mut state = running(10);
        state.obstacles = vec![Obstacle::circle(Vec2::new(1.5, 0.0), 1.0, 10.0)];
        let right = TickInput {
            movement: Vec2::X,
        };
        // 8 u/s for 0.0625 s lands at 0.5: inside 1.0 + 0.5 of the centre
        tick(&mut state, &right, 0.0625);
        assert_eq!(state.player.pos, Vec2::ZERO);
        assert_eq!(state.player.facing, Vec2::X);

        let left = TickInput {
            movement: Vec2::NEG_X,
        };
        tick(&mut state, &left, 0.0625);
        assert!((state.player.pos.x + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_wall_becomes_solid_next_frame() {
        let mut state = running(11);
        state.arsenal.add(WeaponKind::EarthWall);
        tick(&mut state, &idle(), DT);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_leech_heal_is_clamped() {
        let mut state = running(12);
        state.arsenal.add(WeaponKind::LeechingTendrils);
        state.player.health = 99.0;
        // A tight ring at distance 3, so every tendril latches onto someone
        for i in 0..16 {
            let angle = std::f32::consts::TAU * i as f32 / 16.0;
            state.enemies.enemies.push(Enemy::new(
                EnemyId(100 + i),
                Vec2::from_angle(angle) * 3.0,
                0.0,
                10_000.0,
            ));
        }

        for _ in 0..60 {
            tick(&mut state, &idle(), DT);
        }
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));
    }

    #[test]
    fn test_restart_disposes_and_resets() {
        let mut state = running(13);
        state.arsenal.add(WeaponKind::EarthWall);
        state.arsenal.add(WeaponKind::DarkTendrils);
        for _ in 0..200 {
            tick(&mut state, &idle(), DT);
        }
        state.drain_visuals();

        restart(&mut state);
        assert_eq!(state.phase, GamePhase::WeaponSelect);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert!(state.arsenal.is_empty());
        assert!(state.enemies.enemies.is_empty());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.offers.len(), OFFER_COUNT);
        let despawns = state
            .visuals
            .iter()
            .filter(|v| matches!(v, VisualCommand::Despawn { .. }))
            .count();
        assert!(despawns > 0);
    }

    #[test]
    fn test_score_trickle_only_when_enabled() {
        let mut plain = running(14);
        let mut trickling = running(14);
        trickling.settings.score_trickle = true;
        for _ in 0..120 {
            tick(&mut plain, &idle(), DT);
            tick(&mut trickling, &idle(), DT);
        }
        assert_eq!(plain.score, 0);
        assert!(trickling.score > 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = running(99);
        let mut b = running(99);
        a.arsenal.add(WeaponKind::FireStorm);
        b.arsenal.add(WeaponKind::FireStorm);
        let input = TickInput {
            movement: Vec2::new(0.3, -1.0),
        };
        for _ in 0..600 {
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.pos, b.player.pos);
        let pa: Vec<Vec2> = a.enemies.enemies.iter().map(|e| e.pos).collect();
        let pb: Vec<Vec2> = b.enemies.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(pa, pb);
    }
}
