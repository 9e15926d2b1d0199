//! Weapons: catalogue, cooldown state machine, per-kind behaviours
//!
//! Each weapon is a `WeaponKind` tag plus a `Behavior` payload holding the
//! kind's transient effects. Every frame a weapon advances its effects, then
//! fires if its cooldown has run out. Weapons read a frame-start snapshot and
//! report hits, heals and visuals through `Effects`; they never mutate enemies.

pub mod beam;
pub mod bolt;
pub mod fire;
pub mod projectile;
pub mod tendril;
pub mod thunder;
pub mod wall;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Hit;
use super::effect::{VisualCommand, VisualKey, VisualKind, VisualUpdate};
use super::entity::Enemy;
use super::obstacle::Obstacle;
use super::status::Countdown;

/// Weapon families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Ice,
    Fire,
    Lightning,
    Light,
    Dark,
    Earth,
    Ranged,
    Melee,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Ice,
        Category::Fire,
        Category::Lightning,
        Category::Light,
        Category::Dark,
        Category::Earth,
        Category::Ranged,
        Category::Melee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ice => "Ice",
            Category::Fire => "Fire",
            Category::Lightning => "Lightning",
            Category::Light => "Light",
            Category::Dark => "Dark",
            Category::Earth => "Earth",
            Category::Ranged => "Ranged",
            Category::Melee => "Melee",
        }
    }

    /// Display colour (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            Category::Ice => 0x88ccff,
            Category::Fire => 0xff4400,
            Category::Lightning => 0xffff00,
            Category::Light => 0xffffcc,
            Category::Dark => 0x660099,
            Category::Earth => 0x8b4513,
            Category::Ranged => 0x4488ff,
            Category::Melee => 0xcccccc,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Ice => "Slows and freezes enemies",
            Category::Fire => "Burns enemies over time",
            Category::Lightning => "Strikes several targets at once",
            Category::Light => "Sweeping beams of light",
            Category::Dark => "Drains life from enemies",
            Category::Earth => "Raises barriers and knocks foes back",
            Category::Ranged => "Attacks from a distance",
            Category::Melee => "Close-quarters attacks",
        }
    }
}

/// Every weapon the player can own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    MagicBolt,
    IcicleShard,
    FireStorm,
    Thunderbolts,
    LightBeam,
    DarkTendrils,
    LeechingTendrils,
    EarthWall,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 8] = [
        WeaponKind::MagicBolt,
        WeaponKind::IcicleShard,
        WeaponKind::FireStorm,
        WeaponKind::Thunderbolts,
        WeaponKind::LightBeam,
        WeaponKind::DarkTendrils,
        WeaponKind::LeechingTendrils,
        WeaponKind::EarthWall,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::MagicBolt => "Magic Bolt",
            WeaponKind::IcicleShard => "Icicle Shard",
            WeaponKind::FireStorm => "Fire Storm",
            WeaponKind::Thunderbolts => "Thunderbolts",
            WeaponKind::LightBeam => "Light Beam",
            WeaponKind::DarkTendrils => "Dark Tendrils",
            WeaponKind::LeechingTendrils => "Leeching Tendrils",
            WeaponKind::EarthWall => "Earth Wall",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeaponKind::MagicBolt => "Fires a bolt at the nearest enemy",
            WeaponKind::IcicleShard => "Twin shards that slow what they hit",
            WeaponKind::FireStorm => "A fireball that leaves burning ground behind",
            WeaponKind::Thunderbolts => "Calls lightning down on the three closest enemies",
            WeaponKind::LightBeam => "A rotating beam that pierces every enemy in line",
            WeaponKind::DarkTendrils => "Tendrils that lash out and slow enemies",
            WeaponKind::LeechingTendrils => "Tendrils that latch on and heal you",
            WeaponKind::EarthWall => "Raises a wall that blocks and batters enemies",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            WeaponKind::MagicBolt => Category::Ranged,
            WeaponKind::IcicleShard => Category::Ice,
            WeaponKind::FireStorm => Category::Fire,
            WeaponKind::Thunderbolts => Category::Lightning,
            WeaponKind::LightBeam => Category::Light,
            WeaponKind::DarkTendrils | WeaponKind::LeechingTendrils => Category::Dark,
            WeaponKind::EarthWall => Category::Earth,
        }
    }

    /// Common stats: cooldown (s), damage per hit, projectile speed (u/s)
    pub fn stats(&self) -> WeaponStats {
        let (cooldown, damage, speed) = match self {
            WeaponKind::MagicBolt => (0.5, 20.0, 12.0),
            WeaponKind::IcicleShard => (0.8, 15.0, 14.0),
            WeaponKind::FireStorm => (1.2, 10.0, 8.0),
            WeaponKind::Thunderbolts => (5.0, 35.0, 0.0),
            WeaponKind::LightBeam => (0.8, 15.0, 0.0),
            WeaponKind::DarkTendrils => (1.2, 12.0, 0.0),
            WeaponKind::LeechingTendrils => (1.5, 10.0, 0.0),
            WeaponKind::EarthWall => (3.0, 20.0, 0.0),
        };
        WeaponStats {
            cooldown,
            damage,
            speed,
        }
    }

    fn behavior(&self) -> Behavior {
        match self {
            WeaponKind::MagicBolt => Behavior::Bolt(bolt::BoltState::magic_bolt()),
            WeaponKind::IcicleShard => Behavior::Bolt(bolt::BoltState::icicle_shard()),
            WeaponKind::FireStorm => Behavior::Fire(fire::FireState::default()),
            WeaponKind::Thunderbolts => Behavior::Thunder(thunder::ThunderState::default()),
            WeaponKind::LightBeam => Behavior::Beam(beam::BeamState::default()),
            WeaponKind::DarkTendrils => Behavior::Tendril(tendril::TendrilState::dark()),
            WeaponKind::LeechingTendrils => Behavior::Tendril(tendril::TendrilState::leeching()),
            WeaponKind::EarthWall => Behavior::Wall(wall::WallState::default()),
        }
    }
}

/// Tunables shared by every kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub cooldown: f32,
    pub damage: f32,
    pub speed: f32,
}

/// Read-only view of the world at the start of the weapon pass
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub player_pos: Vec2,
    /// Player's last movement direction
    pub facing: Vec2,
    pub enemies: &'a [Enemy],
    pub obstacles: &'a [Obstacle],
    /// Simulation clock (seconds since the run started)
    pub now: f32,
}

/// Everything the weapon pass produced this frame
#[derive(Debug, Default)]
pub struct WeaponOutput {
    /// Hits in the order they were detected
    pub hits: Vec<Hit>,
    /// Health to credit to the player
    pub heal: f32,
    pub visuals: Vec<VisualCommand>,
}

/// Outbox a single weapon writes into
///
/// Allocates effect keys scoped to the owning weapon.
pub struct Effects<'a> {
    weapon: u32,
    next_local: &'a mut u32,
    out: &'a mut WeaponOutput,
}

impl<'a> Effects<'a> {
    pub fn new(weapon: u32, next_local: &'a mut u32, out: &'a mut WeaponOutput) -> Self {
        Self {
            weapon,
            next_local,
            out,
        }
    }

    pub fn key(&self, local: u32) -> VisualKey {
        VisualKey::Effect {
            weapon: self.weapon,
            local,
        }
    }

    /// Spawn a visual and return its local id
    pub fn spawn(&mut self, kind: VisualKind, pos: Vec2, orientation: f32, lifetime: Option<f32>) -> u32 {
        let local = *self.next_local;
        *self.next_local += 1;
        self.out.visuals.push(VisualCommand::Spawn {
            key: self.key(local),
            kind,
            pos,
            orientation,
            lifetime,
        });
        local
    }

    pub fn move_to(&mut self, local: u32, pos: Vec2) {
        let key = self.key(local);
        self.out.visuals.push(VisualCommand::Update {
            key,
            update: VisualUpdate::moved_to(pos),
        });
    }

    pub fn update(&mut self, local: u32, update: VisualUpdate) {
        let key = self.key(local);
        self.out.visuals.push(VisualCommand::Update { key, update });
    }

    pub fn despawn(&mut self, local: u32) {
        let key = self.key(local);
        self.out.visuals.push(VisualCommand::Despawn { key });
    }

    pub fn hit(&mut self, hit: Hit) {
        self.out.hits.push(hit);
    }

    pub fn heal(&mut self, amount: f32) {
        self.out.heal += amount;
    }
}

/// Per-kind transient state
#[derive(Debug, Clone)]
pub enum Behavior {
    Bolt(bolt::BoltState),
    Fire(fire::FireState),
    Thunder(thunder::ThunderState),
    Beam(beam::BeamState),
    Tendril(tendril::TendrilState),
    Wall(wall::WallState),
}

/// A weapon in the player's arsenal
#[derive(Debug, Clone)]
pub struct Weapon {
    pub id: u32,
    pub kind: WeaponKind,
    pub stats: WeaponStats,
    /// Time until the weapon may fire; starts ready
    pub cooldown: Countdown,
    pub active: bool,
    pub behavior: Behavior,
    next_local: u32,
}

impl Weapon {
    pub fn new(id: u32, kind: WeaponKind) -> Self {
        Self {
            id,
            kind,
            stats: kind.stats(),
            cooldown: Countdown::new(0.0),
            active: true,
            behavior: kind.behavior(),
            next_local: 1,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Advance owned effects, then fire if ready
    pub fn update(&mut self, dt: f32, ctx: &FrameContext, rng: &mut Pcg32, out: &mut WeaponOutput) {
        let mut fx = Effects::new(self.id, &mut self.next_local, out);
        let stats = &self.stats;

        match &mut self.behavior {
            Behavior::Bolt(s) => s.advance(dt, ctx, &mut fx),
            Behavior::Fire(s) => s.advance(dt, ctx, &mut fx),
            Behavior::Thunder(s) => s.advance(dt, ctx, stats, &mut fx),
            Behavior::Beam(s) => s.advance(dt),
            Behavior::Tendril(s) => s.advance(dt, ctx, stats, &mut fx),
            Behavior::Wall(s) => s.advance(dt, ctx, stats, &mut fx),
        }

        self.cooldown.tick(dt);
        if !self.active || !self.cooldown.is_ready() || self.is_busy() {
            return;
        }

        let mut fx = Effects::new(self.id, &mut self.next_local, out);
        let stats = &self.stats;
        match &mut self.behavior {
            Behavior::Bolt(s) => s.fire(ctx, stats, &mut fx),
            Behavior::Fire(s) => s.fire(ctx, stats, rng, &mut fx),
            Behavior::Thunder(s) => s.fire(ctx, rng),
            Behavior::Beam(s) => s.fire(ctx, stats, &mut fx),
            Behavior::Tendril(s) => s.fire(ctx, rng, &mut fx),
            Behavior::Wall(s) => s.fire(ctx, stats, &mut fx),
        }
        self.cooldown.reset(self.stats.cooldown);
    }

    /// Lightning waits for its queued strikes before starting another volley
    pub fn is_busy(&self) -> bool {
        match &self.behavior {
            Behavior::Thunder(s) => s.has_pending(),
            _ => false,
        }
    }

    /// Release every owned effect and obstacle; the cooldown starts over
    pub fn dispose(&mut self, out: &mut WeaponOutput) {
        let mut fx = Effects::new(self.id, &mut self.next_local, out);
        match &mut self.behavior {
            Behavior::Bolt(s) => s.dispose(&mut fx),
            Behavior::Fire(s) => s.dispose(&mut fx),
            Behavior::Thunder(s) => s.dispose(),
            Behavior::Beam(_) => {}
            Behavior::Tendril(s) => s.dispose(&mut fx),
            Behavior::Wall(s) => s.dispose(&mut fx),
        }
        self.behavior = self.kind.behavior();
        self.cooldown = Countdown::new(0.0);
    }

    /// Obstacles this weapon currently holds in the arena
    pub fn obstacles(&self) -> &[Obstacle] {
        match &self.behavior {
            Behavior::Wall(s) => s.obstacles(),
            _ => &[],
        }
    }
}
