//! The player's weapon list

use rand_pcg::Pcg32;

use super::obstacle::Obstacle;
use super::weapon::{Category, FrameContext, Weapon, WeaponKind, WeaponOutput};

#[derive(Debug, Clone)]
pub struct Arsenal {
    /// Weapons in the order they were acquired
    pub weapons: Vec<Weapon>,
    next_id: u32,
}

impl Default for Arsenal {
    fn default() -> Self {
        Self {
            weapons: Vec::new(),
            next_id: 1,
        }
    }
}

impl Arsenal {
    /// Add a fresh weapon and return its id
    pub fn add(&mut self, kind: WeaponKind) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.weapons.push(Weapon::new(id, kind));
        id
    }

    /// Run every weapon against the same snapshot, in acquisition order
    pub fn update_all(&mut self, dt: f32, ctx: &FrameContext, rng: &mut Pcg32) -> WeaponOutput {
        let mut out = WeaponOutput::default();
        for weapon in &mut self.weapons {
            weapon.update(dt, ctx, rng, &mut out);
        }
        out
    }

    /// Dispose and drop every weapon
    pub fn dispose_all(&mut self, out: &mut WeaponOutput) {
        for weapon in &mut self.weapons {
            weapon.dispose(out);
        }
        self.weapons.clear();
    }

    pub fn kinds(&self) -> Vec<WeaponKind> {
        self.weapons.iter().map(|w| w.kind).collect()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.weapons.iter().map(|w| w.category()).collect()
    }

    /// Obstacles held by every weapon
    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.weapons
            .iter()
            .flat_map(|w| w.obstacles().iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}
