//! Spell power model
//!
//! Maps a spell record to an HP-equivalent power breakdown. Deterministic and
//! total: malformed numeric fields are clamped to sane minimums instead of
//! erroring, so any well-formed-or-not record yields a breakdown.

use serde::Serialize;

use crate::balance::config::StatWeights;
use crate::spell::{Spell, SpellKind};

/// Reference duration (rounds) a buff is normalized against when the spell
/// does not specify one.
pub const DEFAULT_BUFF_DURATION: u32 = 3;

/// Computed power components, each expressed as HP-equivalent using the
/// shared stat-weight table. Never stored on the spell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellPowerBreakdown {
    pub direct_damage: f32,
    pub direct_heal: f32,
    pub dot: f32,
    pub hot: f32,
    pub shield: f32,
    pub buff: f32,
    pub debuff: f32,
    /// Diminishing-returns multiplier for multi-target spells
    pub aoe_multiplier: f32,
    /// Linear accuracy scalar (a 50%-accurate spell is worth half)
    pub hit_chance_adjustment: f32,
    /// `sum(buckets) * aoe_multiplier * hit_chance_adjustment`
    pub total_power: f32,
}

impl SpellPowerBreakdown {
    fn bucket_sum(&self) -> f32 {
        self.direct_damage
            + self.direct_heal
            + self.dot
            + self.hot
            + self.shield
            + self.buff
            + self.debuff
    }
}

/// Tiered AoE multiplier with diminishing returns per extra target.
///
/// Single target pays full price; packs of 2-3 get 0.8x value per target,
/// 4-5 get 0.6x and 6+ get 0.5x, each rounded to one decimal.
pub fn calculate_aoe_multiplier(aoe: u32) -> f32 {
    let targets = aoe.max(1);
    match targets {
        0 | 1 => 1.0,
        2..=3 => round_one_decimal(targets as f32 * 0.8),
        4..=5 => round_one_decimal(targets as f32 * 0.6),
        _ => round_one_decimal(targets as f32 * 0.5),
    }
}

fn round_one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Value of a buff/debuff parameterized by magnitude, mode and duration.
///
/// Multiplicative magnitudes are percentages of the baseline unit; flat
/// magnitudes are stat points normalized against a 20-point reference block.
/// The weight expresses the full value of a 100% buff held for the reference
/// 3-round duration, so shorter or longer buffs scale linearly around it.
pub fn buff_power(magnitude: f32, multiplicative: bool, duration: u32, weight: f32) -> f32 {
    let base = if multiplicative {
        magnitude / 100.0
    } else {
        magnitude / 20.0
    };
    let duration = duration.max(1) as f32;
    (base * weight * duration / DEFAULT_BUFF_DURATION as f32).max(0.0)
}

/// Compute the HP-equivalent power breakdown for a spell.
///
/// Routing is exhaustive over the spell kind. `eco > 1` sends damage/heal
/// value through the over-time bucket instead of the direct bucket, never
/// both; the per-tick value is `(effect/100)/eco` summed over `eco` ticks
/// with no decay, so instant and over-time spells of equal `effect` carry
/// equal raw totals and differ only in bucket.
pub fn calculate_spell_power(spell: &Spell, weights: &StatWeights) -> SpellPowerBreakdown {
    let mut bd = SpellPowerBreakdown::default();

    let effect = spell.effect.max(0.0) / 100.0;
    let eco = spell.eco_rounds();

    match spell.kind {
        SpellKind::Damage => {
            let total = over_time_total(effect, eco) * weights.damage;
            if eco > 1 {
                bd.dot = total;
            } else {
                bd.direct_damage = total;
            }
        }
        SpellKind::Heal => {
            let total = over_time_total(effect, eco) * weights.heal;
            if eco > 1 {
                bd.hot = total;
            } else {
                bd.direct_heal = total;
            }
        }
        SpellKind::Shield => {
            // Full percentage value at the HP weight, no time decay
            bd.shield = effect * weights.shield;
        }
        SpellKind::Buff => {
            bd.buff = buff_power(
                spell.effect.max(0.0),
                spell.multiplicative,
                spell.duration.unwrap_or(DEFAULT_BUFF_DURATION),
                weights.buff,
            );
        }
        SpellKind::Debuff => {
            bd.debuff = buff_power(
                spell.effect.max(0.0),
                spell.multiplicative,
                spell.duration.unwrap_or(DEFAULT_BUFF_DURATION),
                weights.debuff,
            );
        }
        SpellKind::Cc => {
            // Disabling a target is worth ~3x equivalent direct damage,
            // the single most powerful category.
            bd.direct_damage = effect * weights.damage * weights.cc_multiplier;
        }
    }

    bd.aoe_multiplier = calculate_aoe_multiplier(spell.target_count());
    bd.hit_chance_adjustment = spell.dangerous.clamp(0.0, 100.0) / 100.0;
    bd.total_power = bd.bucket_sum() * bd.aoe_multiplier * bd.hit_chance_adjustment;

    bd
}

/// Sum of per-tick contributions over `eco` ticks, with no decay:
/// `per_tick * eco`.
fn over_time_total(effect_fraction: f32, eco: u32) -> f32 {
    let per_tick = effect_fraction / eco as f32;
    per_tick * eco as f32
}
