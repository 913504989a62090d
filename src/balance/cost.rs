//! Spell cost model
//!
//! Derives a recommended mana cost from a spell's power score, adjusted for
//! category efficiency, cooldown and cast time, and checks whether an
//! assigned cost sits inside the balance tolerance band. Also maps power onto
//! the five named rarity tiers.

use serde::{Deserialize, Serialize};

use crate::balance::config::StatWeights;
use crate::balance::power::calculate_spell_power;
use crate::spell::{Spell, SpellKind};

/// Target HP-equivalent power bought per resource point.
pub const TARGET_POWER_PER_MANA: f32 = 2.0;

/// Default tolerance for the balance band (fraction of the target ratio).
pub const DEFAULT_BALANCE_TOLERANCE: f32 = 0.2;

/// Cooldown discount: each round of cooldown knocks 5% off the cost, capped
/// at 50% total.
fn cooldown_factor(cooldown: u32) -> f32 {
    1.0 - (cooldown as f32 / 20.0).min(0.5)
}

/// Cast-time surcharge: 20% per second beyond the 0.5s baseline.
fn cast_time_penalty(cast_time: f32) -> f32 {
    if cast_time > 0.5 {
        1.0 + (cast_time - 0.5) * 0.2
    } else {
        1.0
    }
}

/// Resource efficiency per category. Utility categories pay a premium; heals
/// and shields come discounted.
fn type_efficiency(kind: SpellKind) -> f32 {
    match kind {
        SpellKind::Damage => 1.0,
        SpellKind::Heal => 0.8,
        SpellKind::Shield => 0.9,
        SpellKind::Buff => 1.1,
        SpellKind::Debuff => 1.2,
        SpellKind::Cc => 1.5,
    }
}

/// Power actually paid for at the resource counter: raw power scaled by the
/// category, cooldown and cast-time adjustments.
fn effective_power(spell: &Spell, weights: &StatWeights) -> f32 {
    let bd = calculate_spell_power(spell, weights);
    bd.total_power
        * type_efficiency(spell.kind)
        * cooldown_factor(spell.cooldown)
        * cast_time_penalty(spell.cast_time.unwrap_or(0.0))
}

/// Recommended mana cost for a spell, always at least 1.
pub fn calculate_mana_cost(spell: &Spell, weights: &StatWeights) -> u32 {
    let raw = effective_power(spell, weights) / TARGET_POWER_PER_MANA;
    raw.max(1.0).round() as u32
}

/// Whether the spell's assigned cost sits inside the tolerance band around
/// the 2.0 power-per-mana target.
///
/// An unset or zero cost is never balanced. The ratio uses the same
/// efficiency-adjusted power the cost recommendation uses, so a spell whose
/// cost was just produced by [`calculate_mana_cost`] checks out balanced at
/// the default tolerance (integer rounding aside for very cheap spells).
pub fn is_balanced(spell: &Spell, weights: &StatWeights, tolerance: f32) -> bool {
    let cost = match spell.mana_cost {
        Some(cost) if cost > 0 => cost,
        _ => return false,
    };

    let ratio = effective_power(spell, weights) / cost as f32;
    (ratio - TARGET_POWER_PER_MANA).abs() <= tolerance * TARGET_POWER_PER_MANA
}

/// The five named balance classes derived from rounded power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Common => "Common",
            Tier::Uncommon => "Uncommon",
            Tier::Rare => "Rare",
            Tier::Epic => "Epic",
            Tier::Legendary => "Legendary",
        }
    }
}

/// Map a power score onto its tier. Boundaries are inclusive on the upper
/// end of each named tier; Legendary is open-ended.
pub fn calculate_tier(total_power: f32) -> Tier {
    let rounded = total_power.round() as i64;
    match rounded {
        i64::MIN..=20 => Tier::Common,
        21..=40 => Tier::Uncommon,
        41..=60 => Tier::Rare,
        61..=80 => Tier::Epic,
        _ => Tier::Legendary,
    }
}

/// Tier of a concrete spell under the given weights.
pub fn spell_tier(spell: &Spell, weights: &StatWeights) -> Tier {
    calculate_tier(calculate_spell_power(spell, weights).total_power)
}
