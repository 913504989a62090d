//! Point-buy budget model
//!
//! The design-time alternative to the resource cost model: a simple linear
//! sum of weighted deltas from the baseline spell, used to enforce a
//! "net-zero" construction constraint while a designer drags sliders. The
//! two models are intentionally independent pure functions over the same
//! spell shape and are not required to agree.

use crate::balance::config::{BalanceConfig, BudgetWeights};
use crate::spell::Spell;

/// Tolerance when comparing a fractional budget against an integer target.
pub const BUDGET_EPSILON: f32 = 1e-3;

/// Weighted delta cost of a spell relative to the baseline.
///
/// May be fractional and may be negative (a spell strictly weaker than the
/// baseline). Crowd control adds a flat surcharge on top of the field
/// deltas.
pub fn calculate_spell_budget(spell: &Spell, weights: &BudgetWeights, baseline: &Spell) -> f32 {
    let mut budget = 0.0;

    budget += (spell.effect - baseline.effect) * weights.effect;
    budget += (spell.scale - baseline.scale) * weights.scale;
    budget += (spell.eco_rounds() as f32 - baseline.eco_rounds() as f32) * weights.eco;
    budget += (spell.target_count() as f32 - baseline.target_count() as f32) * weights.aoe;
    budget += (spell.dangerous - baseline.dangerous) * weights.dangerous;
    budget += (spell.pierce - baseline.pierce) * weights.pierce;
    budget += (spell.cooldown as f32 - baseline.cooldown as f32) * weights.cooldown;
    budget += (spell.range as f32 - baseline.range as f32) * weights.range;
    budget += (spell.priority as f32 - baseline.priority as f32) * weights.priority;

    if spell.cc_effect.is_some() {
        budget += weights.cc_flat;
    }

    budget
}

/// Whether a spell lands exactly on the required point-buy target.
pub fn meets_budget_target(spell: &Spell, target: f32, config: &BalanceConfig) -> bool {
    let budget = calculate_spell_budget(spell, &config.budget_weights, &config.baseline);
    (budget - target).abs() <= BUDGET_EPSILON
}
