//! Game state and session-level types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arsenal::Arsenal;
use super::effect::VisualCommand;
use super::enemy::EnemyController;
use super::entity::{EnemyId, Player};
use super::obstacle::Obstacle;
use super::weapon::WeaponKind;
use crate::consts::SCORE_MILESTONE;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Paused while the player picks a weapon
    WeaponSelect,
    /// Active gameplay
    Running,
    /// Player died; waiting for restart
    GameOver,
}

/// Events emitted by the simulation for the driver (HUD, audio, analytics)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyKilled { id: EnemyId, value: u64 },
    PlayerHit { health: f32 },
    /// Score crossed a multiple of the milestone size
    MilestoneReached { milestone: u64 },
    WeaponAdded { kind: WeaponKind },
    GameOver { score: u64 },
}

/// Milestone index for a score
#[inline]
pub fn milestone_of(score: u64) -> u64 {
    score / SCORE_MILESTONE
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    pub enemies: EnemyController,
    pub arsenal: Arsenal,
    /// Obstacles visible to movement this frame (rebuilt at the end of each tick)
    pub obstacles: Vec<Obstacle>,
    /// Weapons on offer while in `WeaponSelect`
    pub offers: Vec<WeaponKind>,
    pub score: u64,
    /// Seconds of running time (paused time excluded)
    pub elapsed: f32,
    /// Settings resolved at session start
    pub settings: Settings,
    /// Pending events for the driver
    pub events: Vec<GameEvent>,
    /// Pending rendering commands
    pub visuals: Vec<VisualCommand>,
}

impl GameState {
    /// Create a new session in the menu
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            player: Player::new(settings.player_color),
            enemies: EnemyController::new(settings.difficulty),
            arsenal: Arsenal::default(),
            obstacles: Vec::new(),
            offers: Vec::new(),
            score: 0,
            elapsed: 0.0,
            settings,
            events: Vec::new(),
            visuals: Vec::new(),
        }
    }

    pub fn milestone(&self) -> u64 {
        milestone_of(self.score)
    }

    pub fn is_paused(&self) -> bool {
        self.phase != GamePhase::Running
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_visuals(&mut self) -> Vec<VisualCommand> {
        std::mem::take(&mut self.visuals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(5, Settings::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.health, 100.0);
        assert!(state.arsenal.is_empty());
        assert!(state.is_paused());
    }

    #[test]
    fn test_milestone_of() {
        assert_eq!(milestone_of(0), 0);
        assert_eq!(milestone_of(199), 0);
        assert_eq!(milestone_of(200), 1);
        assert_eq!(milestone_of(650), 3);
    }

    #[test]
    fn test_player_colour_from_settings() {
        let settings = Settings {
            player_color: 0xff00ff,
            ..Settings::default()
        };
        let state = GameState::new(1, settings);
        assert_eq!(state.player.color, 0xff00ff);
    }
}
