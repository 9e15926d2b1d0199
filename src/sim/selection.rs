//! Weapon offers: a random starter trio, then category-balanced offers at
//! each score milestone

use rand::seq::{IndexedRandom, SliceRandom};
use rand_pcg::Pcg32;

use super::weapon::{Category, WeaponKind};
use crate::consts::OFFER_COUNT;

/// Three distinct weapons picked uniformly
pub fn starter_offer(rng: &mut Pcg32) -> Vec<WeaponKind> {
    let mut pool = WeaponKind::ALL.to_vec();
    pool.shuffle(rng);
    pool.truncate(OFFER_COUNT);
    pool
}

/// Offer that favours categories the player does not have yet
///
/// Up to three categories are drawn (unowned ones first, all of them when
/// every category is owned), one weapon from each (preferring one the player
/// lacks), then the offer is topped up with random weapons not yet listed.
pub fn milestone_offer(owned: &[WeaponKind], rng: &mut Pcg32) -> Vec<WeaponKind> {
    let kinds_in = |cat: Category| -> Vec<WeaponKind> {
        WeaponKind::ALL
            .iter()
            .copied()
            .filter(|k| k.category() == cat)
            .collect()
    };

    let available: Vec<Category> = Category::ALL
        .iter()
        .copied()
        .filter(|&c| !kinds_in(c).is_empty())
        .collect();
    let mut categories: Vec<Category> = available
        .iter()
        .copied()
        .filter(|&c| !owned.iter().any(|k| k.category() == c))
        .collect();
    if categories.is_empty() {
        categories = available;
    }
    categories.shuffle(rng);

    let mut offer: Vec<WeaponKind> = Vec::with_capacity(OFFER_COUNT);
    for cat in categories.into_iter().take(OFFER_COUNT) {
        let kinds = kinds_in(cat);
        let fresh: Vec<WeaponKind> = kinds
            .iter()
            .copied()
            .filter(|k| !owned.contains(k) && !offer.contains(k))
            .collect();
        let pick = if fresh.is_empty() {
            kinds.choose(rng).copied()
        } else {
            fresh.choose(rng).copied()
        };
        if let Some(kind) = pick.filter(|k| !offer.contains(k)) {
            offer.push(kind);
        }
    }

    let mut rest: Vec<WeaponKind> = WeaponKind::ALL
        .iter()
        .copied()
        .filter(|k| !offer.contains(k))
        .collect();
    rest.shuffle(rng);
    for kind in rest {
        if offer.len() >= OFFER_COUNT {
            break;
        }
        offer.push(kind);
    }

    log::info!(
        "Weapon offer: {}",
        offer.iter().map(|k| k.name()).collect::<Vec<_>>().join(", ")
    );
    offer
}
