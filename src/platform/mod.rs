//! Platform abstraction layer
//!
//! Contracts with the collaborators around the simulation:
//! - Input: movement intent polled once per frame
//! - Rendering: spawn/update/despawn of opaque visuals
//! - HUD: fire-and-forget score/health/time readouts
//! - Time: frame deltas from a monotonic clock

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use glam::Vec2;

use crate::settings::Keybinds;
use crate::sim::{VisualCommand, VisualKey, VisualKind, VisualUpdate};

/// Source of the player's movement intent
pub trait InputSource {
    /// Intent for this frame, each axis in [-1, 1] (x = world x, y = world z)
    fn movement_intent(&mut self) -> Vec2;
}

/// A fixed intent, handy for headless runs
impl InputSource for Vec2 {
    fn movement_intent(&mut self) -> Vec2 {
        *self
    }
}

/// Shared input, so the driver can keep feeding key events after handing the
/// source to a session
impl<T: InputSource> InputSource for Rc<RefCell<T>> {
    fn movement_intent(&mut self) -> Vec2 {
        self.borrow_mut().movement_intent()
    }
}

/// Keyboard state mapped through the configured keybinds
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    keybinds: Keybinds,
    pressed: HashSet<String>,
}

impl KeyboardInput {
    pub fn new(keybinds: Keybinds) -> Self {
        Self {
            keybinds,
            pressed: HashSet::new(),
        }
    }

    /// Record a key press (`KeyboardEvent.code` string)
    pub fn key_down(&mut self, code: &str) {
        self.pressed.insert(code.to_string());
    }

    pub fn key_up(&mut self, code: &str) {
        self.pressed.remove(code);
    }

    /// Forget every held key (focus loss)
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    fn held(&self, code: &str) -> f32 {
        if self.pressed.contains(code) { 1.0 } else { 0.0 }
    }
}

impl InputSource for KeyboardInput {
    fn movement_intent(&mut self) -> Vec2 {
        // Up moves toward -z
        Vec2::new(
            self.held(&self.keybinds.right) - self.held(&self.keybinds.left),
            self.held(&self.keybinds.down) - self.held(&self.keybinds.up),
        )
    }
}

/// Opaque handle issued by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// Rendering collaborator
pub trait VisualSink {
    fn spawn_visual(
        &mut self,
        kind: VisualKind,
        pos: Vec2,
        orientation: f32,
        lifetime: Option<f32>,
    ) -> VisualHandle;
    fn update_visual(&mut self, handle: VisualHandle, update: VisualUpdate);
    fn despawn_visual(&mut self, handle: VisualHandle);
}

/// HUD collaborator
pub trait HudSink {
    fn set_score(&mut self, score: u64);
    fn set_health(&mut self, health: f32);
    fn set_elapsed_time(&mut self, seconds: f32);
    fn set_fps(&mut self, _fps: f32) {}
}

/// Sink that discards everything (headless runs)
#[derive(Debug, Default)]
pub struct NullSink {
    next_handle: u64,
}

impl VisualSink for NullSink {
    fn spawn_visual(&mut self, _: VisualKind, _: Vec2, _: f32, _: Option<f32>) -> VisualHandle {
        self.next_handle += 1;
        VisualHandle(self.next_handle)
    }

    fn update_visual(&mut self, _: VisualHandle, _: VisualUpdate) {}

    fn despawn_visual(&mut self, _: VisualHandle) {}
}

impl HudSink for NullSink {
    fn set_score(&mut self, _: u64) {}
    fn set_health(&mut self, _: f32) {}
    fn set_elapsed_time(&mut self, _: f32) {}
}

/// Routes simulation visual commands to a renderer
///
/// Visuals spawned with a lifetime belong to the renderer from then on and are
/// not tracked; everything else is tracked until despawned.
pub struct VisualBridge {
    sink: Box<dyn VisualSink>,
    handles: HashMap<VisualKey, VisualHandle>,
}

impl VisualBridge {
    pub fn new(sink: Box<dyn VisualSink>) -> Self {
        Self {
            sink,
            handles: HashMap::new(),
        }
    }

    pub fn apply(&mut self, command: VisualCommand) {
        match command {
            VisualCommand::Spawn {
                key,
                kind,
                pos,
                orientation,
                lifetime,
            } => {
                let handle = self.sink.spawn_visual(kind, pos, orientation, lifetime);
                if lifetime.is_none() {
                    // A respawned key replaces the old visual
                    if let Some(old) = self.handles.insert(key, handle) {
                        self.sink.despawn_visual(old);
                    }
                }
            }
            VisualCommand::Update { key, update } => {
                if let Some(&handle) = self.handles.get(&key) {
                    self.sink.update_visual(handle, update);
                }
            }
            VisualCommand::Despawn { key } => {
                if let Some(handle) = self.handles.remove(&key) {
                    self.sink.despawn_visual(handle);
                }
            }
        }
    }

    pub fn apply_all(&mut self, commands: impl IntoIterator<Item = VisualCommand>) {
        for command in commands {
            self.apply(command);
        }
    }

    /// Despawn everything still tracked
    pub fn clear(&mut self) {
        for (_, handle) in self.handles.drain() {
            self.sink.despawn_visual(handle);
        }
    }

    pub fn tracked(&self) -> usize {
        self.handles.len()
    }
}

/// Turns monotonic timestamps into frame deltas
///
/// The first frame after a reset yields zero, so time spent paused is never
/// replayed into the simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    /// Seconds since the previous call (timestamps in seconds)
    pub fn delta(&mut self, now: f64) -> f32 {
        let delta = match self.last {
            Some(last) => (now - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        delta
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Frames used for the FPS average
pub const FPS_WINDOW: usize = 60;

/// Rolling FPS over the last `FPS_WINDOW` frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    deltas: [f32; FPS_WINDOW],
    index: usize,
    filled: usize,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            deltas: [0.0; FPS_WINDOW],
            index: 0,
            filled: 0,
        }
    }
}

impl FpsCounter {
    pub fn record(&mut self, delta: f32) {
        self.deltas[self.index] = delta;
        self.index = (self.index + 1) % FPS_WINDOW;
        self.filled = (self.filled + 1).min(FPS_WINDOW);
    }

    pub fn fps(&self) -> f32 {
        let total: f32 = self.deltas[..self.filled].iter().sum();
        if total > 0.0 {
            self.filled as f32 / total
        } else {
            0.0
        }
    }
}
