//! Top-level driver surface
//!
//! A `Session` wires the simulation to its collaborators: it polls input,
//! advances the simulation, forwards visual commands to the renderer and
//! pushes readouts to the HUD.

use crate::consts::MAX_FRAME_DELTA;
use crate::platform::{FpsCounter, FrameClock, HudSink, InputSource, VisualBridge, VisualSink};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GamePhase, GameState, TickInput, WeaponKind};

type GameOverListener = Box<dyn FnMut(u64)>;

pub struct Session {
    state: GameState,
    input: Box<dyn InputSource>,
    visuals: VisualBridge,
    hud: Box<dyn HudSink>,
    clock: FrameClock,
    fps: FpsCounter,
    on_game_over: Option<GameOverListener>,
    game_over_reported: bool,
}

impl Session {
    /// Create an idle session sitting in the menu
    pub fn new(
        seed: u64,
        input: Box<dyn InputSource>,
        renderer: Box<dyn VisualSink>,
        hud: Box<dyn HudSink>,
    ) -> Self {
        Self {
            state: GameState::new(seed, Settings::default()),
            input,
            visuals: VisualBridge::new(renderer),
            hud,
            clock: FrameClock::default(),
            fps: FpsCounter::default(),
            on_game_over: None,
            game_over_reported: false,
        }
    }

    /// Register the listener told about the final score
    pub fn set_on_game_over(&mut self, listener: impl FnMut(u64) + 'static) {
        self.on_game_over = Some(Box::new(listener));
    }

    /// Begin a fresh run with `settings` and present the starter offer
    pub fn start_session(&mut self, settings: Settings) {
        self.visuals.clear();
        self.state = GameState::new(self.state.seed, settings);
        sim::start(&mut self.state);
        self.game_over_reported = false;
        self.clock.reset();
        self.flush();
    }

    /// Advance by `dt` seconds (no-op unless running)
    pub fn step_frame(&mut self, dt: f32) {
        if self.state.phase == GamePhase::Running {
            let dt = if dt.is_finite() {
                dt.clamp(0.0, MAX_FRAME_DELTA)
            } else {
                0.0
            };
            let input = TickInput {
                movement: self.input.movement_intent(),
            };
            sim::tick(&mut self.state, &input, dt);
            if dt > 0.0 {
                self.fps.record(dt);
            }
        }
        self.flush();

        if self.state.phase == GamePhase::GameOver && !self.game_over_reported {
            self.game_over_reported = true;
            if let Some(listener) = self.on_game_over.as_mut() {
                listener(self.state.score);
            }
        }
    }

    /// Advance using a monotonic timestamp in seconds
    pub fn frame(&mut self, now: f64) {
        let dt = self.clock.delta(now);
        self.step_frame(dt);
    }

    /// Take offer `index`; the clock restarts so the pause is not replayed
    pub fn on_weapon_selected(&mut self, index: usize) -> bool {
        let selected = sim::select_weapon(&mut self.state, index);
        if selected {
            self.clock.reset();
            self.flush();
        }
        selected
    }

    /// Dispose the run and return to the starter offer
    pub fn restart(&mut self) {
        sim::restart(&mut self.state);
        self.game_over_reported = false;
        self.clock.reset();
        self.flush();
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn current_score(&self) -> u64 {
        self.state.score
    }

    pub fn current_health(&self) -> f32 {
        self.state.player.health
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn offers(&self) -> &[WeaponKind] {
        &self.state.offers
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Renderer visuals currently owned by the session
    pub fn tracked_visuals(&self) -> usize {
        self.visuals.tracked()
    }

    fn flush(&mut self) {
        self.visuals.apply_all(self.state.drain_visuals());
        self.hud.set_score(self.state.score);
        self.hud.set_health(self.state.player.health);
        self.hud.set_elapsed_time(self.state.elapsed);
        if self.state.settings.show_fps {
            self.hud.set_fps(self.fps.fps());
        }
    }
}
