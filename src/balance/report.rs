//! Balance reporting
//!
//! Produces the per-spell current-vs-recommended cost summary consumed by
//! external reporting scripts. Pure over the spell list and config.

use serde::Serialize;

use crate::balance::config::BalanceConfig;
use crate::balance::cost::{
    calculate_mana_cost, is_balanced, spell_tier, Tier, DEFAULT_BALANCE_TOLERANCE,
};
use crate::balance::power::{calculate_spell_power, SpellPowerBreakdown};
use crate::spell::Spell;

/// One row of the balance report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellBalanceEntry {
    pub id: String,
    pub name: String,
    /// Cost currently assigned by the designer, if any
    pub current_cost: Option<u32>,
    /// Cost the model recommends
    pub recommended_cost: u32,
    pub breakdown: SpellPowerBreakdown,
    /// Percent deviation of the current cost from the recommendation
    /// (None when no cost is assigned)
    pub deviation_pct: Option<f32>,
    pub balanced: bool,
    pub tier: Tier,
}

/// Build a balance report for a collection of spells.
pub fn balance_report(spells: &[Spell], config: &BalanceConfig) -> Vec<SpellBalanceEntry> {
    spells
        .iter()
        .map(|spell| {
            let breakdown = calculate_spell_power(spell, &config.stat_weights);
            let recommended = calculate_mana_cost(spell, &config.stat_weights);
            let deviation_pct = spell.mana_cost.map(|cost| {
                (cost as f32 - recommended as f32) / recommended as f32 * 100.0
            });

            SpellBalanceEntry {
                id: spell.id.clone(),
                name: spell.name.clone(),
                current_cost: spell.mana_cost,
                recommended_cost: recommended,
                breakdown,
                deviation_pct,
                balanced: is_balanced(spell, &config.stat_weights, DEFAULT_BALANCE_TOLERANCE),
                tier: spell_tier(spell, &config.stat_weights),
            }
        })
        .collect()
}
