//! Integration tests for the balance models
//!
//! These tests verify that:
//! - Power scores follow the published per-category curve
//! - Recommended costs track power through efficiency and cooldown
//! - Tiers partition the power range with no gaps
//! - The point-buy budget stays symmetric around the baseline

use spellbench::balance::budget::{calculate_spell_budget, meets_budget_target};
use spellbench::balance::config::baseline_spell;
use spellbench::balance::cost::{calculate_mana_cost, is_balanced, DEFAULT_BALANCE_TOLERANCE};
use spellbench::balance::{balance_report, calculate_spell_power, BalanceConfig, Tier};
use spellbench::spell::{Spell, SpellKind};

/// Helper: a well-formed spell with the given kind and effect, everything
/// else at the cheap defaults.
fn make_spell(id: &str, kind: SpellKind, effect: f32) -> Spell {
    let mut spell = baseline_spell();
    spell.id = id.to_string();
    spell.name = id.to_string();
    spell.kind = kind;
    spell.effect = effect;
    spell.dangerous = 100.0;
    spell.mana_cost = None;
    spell
}

// =============================================================================
// Power Curve Tests
// =============================================================================

#[test]
fn test_power_ordering_across_categories() {
    let config = BalanceConfig::default();
    let damage = calculate_spell_power(&make_spell("d", SpellKind::Damage, 100.0), &config.stat_weights);
    let heal = calculate_spell_power(&make_spell("h", SpellKind::Heal, 100.0), &config.stat_weights);
    let cc = calculate_spell_power(&make_spell("c", SpellKind::Cc, 100.0), &config.stat_weights);

    assert!(
        cc.total_power > damage.total_power,
        "CC ({}) should outrank equal-effect damage ({})",
        cc.total_power,
        damage.total_power
    );
    assert!(
        damage.total_power > heal.total_power,
        "damage ({}) should outrank equal-effect healing ({})",
        damage.total_power,
        heal.total_power
    );
}

#[test]
fn test_power_is_linear_in_effect() {
    let config = BalanceConfig::default();
    let small = calculate_spell_power(&make_spell("s", SpellKind::Damage, 100.0), &config.stat_weights);
    let large = calculate_spell_power(&make_spell("l", SpellKind::Damage, 300.0), &config.stat_weights);
    assert!((large.total_power - small.total_power * 3.0).abs() < 1e-4);
}

#[test]
fn test_exactly_one_bucket_populated_per_category() {
    let config = BalanceConfig::default();
    for kind in [
        SpellKind::Damage,
        SpellKind::Heal,
        SpellKind::Shield,
        SpellKind::Buff,
        SpellKind::Debuff,
        SpellKind::Cc,
    ] {
        let bd = calculate_spell_power(&make_spell("x", kind, 100.0), &config.stat_weights);
        let buckets = [
            bd.direct_damage,
            bd.direct_heal,
            bd.dot,
            bd.hot,
            bd.shield,
            bd.buff,
            bd.debuff,
        ];
        let populated = buckets.iter().filter(|&&b| b > 0.0).count();
        assert_eq!(populated, 1, "{:?} should populate exactly one bucket", kind);
    }
}

#[test]
fn test_over_time_conversion_preserves_total() {
    let config = BalanceConfig::default();
    let instant = make_spell("i", SpellKind::Damage, 200.0);
    let mut over_time = instant.clone();
    over_time.eco = 5;

    let instant_bd = calculate_spell_power(&instant, &config.stat_weights);
    let dot_bd = calculate_spell_power(&over_time, &config.stat_weights);
    assert_eq!(instant_bd.total_power, dot_bd.total_power);
    assert_eq!(instant_bd.dot, 0.0);
    assert_eq!(dot_bd.direct_damage, 0.0);
}

// =============================================================================
// Cost Model Tests
// =============================================================================

#[test]
fn test_recommended_costs_are_self_consistent() {
    // A spell costed by the model must pass its own balance check.
    let config = BalanceConfig::default();
    for kind in [
        SpellKind::Damage,
        SpellKind::Heal,
        SpellKind::Shield,
        SpellKind::Buff,
        SpellKind::Debuff,
        SpellKind::Cc,
    ] {
        let mut spell = make_spell("x", kind, 250.0);
        spell.aoe = 6;
        spell.mana_cost = Some(calculate_mana_cost(&spell, &config.stat_weights));
        assert!(
            is_balanced(&spell, &config.stat_weights, DEFAULT_BALANCE_TOLERANCE),
            "{:?} at its own recommended cost should be balanced",
            kind
        );
    }
}

#[test]
fn test_cost_never_below_one() {
    let config = BalanceConfig::default();
    let mut weak = make_spell("w", SpellKind::Heal, 10.0);
    weak.dangerous = 5.0;
    assert_eq!(calculate_mana_cost(&weak, &config.stat_weights), 1);
}

#[test]
fn test_tiers_cover_the_power_range() {
    let config = BalanceConfig::default();
    // Sweep effect values and confirm tiers never move downward as power grows
    let mut last = Tier::Common;
    for effect in (10..=300).step_by(10) {
        let mut spell = make_spell("s", SpellKind::Cc, effect as f32);
        spell.aoe = 4;
        let report = balance_report(std::slice::from_ref(&spell), &config);
        let tier = report[0].tier;
        assert!(tier >= last, "tier regressed at effect {}", effect);
        last = tier;
    }
    assert_eq!(last, Tier::Legendary);
}

// =============================================================================
// Budget Model Tests
// =============================================================================

#[test]
fn test_budget_deltas_are_antisymmetric() {
    let config = BalanceConfig::default();
    let mut up = baseline_spell();
    up.effect += 50.0;
    let mut down = baseline_spell();
    down.effect -= 50.0;

    let up_cost = calculate_spell_budget(&up, &config.budget_weights, &config.baseline);
    let down_cost = calculate_spell_budget(&down, &config.budget_weights, &config.baseline);
    assert!((up_cost + down_cost).abs() < 1e-5);
}

#[test]
fn test_budget_and_cost_models_stay_independent() {
    // The point-buy budget can be net-zero while the resource cost differs
    // from the baseline; the two models are separate dials.
    let config = BalanceConfig::default();
    let mut spell = baseline_spell();
    spell.effect = 150.0;
    spell.cooldown = 4;
    assert!(meets_budget_target(&spell, 0.0, &config));

    let baseline_cost = calculate_mana_cost(&config.baseline, &config.stat_weights);
    let spell_cost = calculate_mana_cost(&spell, &config.stat_weights);
    assert_ne!(baseline_cost, spell_cost);
}

// =============================================================================
// Report Tests
// =============================================================================

#[test]
fn test_report_covers_every_spell_in_order() {
    let config = BalanceConfig::default();
    let spells = vec![
        make_spell("ember", SpellKind::Damage, 120.0),
        make_spell("mend", SpellKind::Heal, 150.0),
        make_spell("bulwark", SpellKind::Shield, 200.0),
    ];
    let report = balance_report(&spells, &config);
    assert_eq!(report.len(), 3);
    for (entry, spell) in report.iter().zip(&spells) {
        assert_eq!(entry.id, spell.id);
        assert!(entry.recommended_cost >= 1);
    }
}

#[test]
fn test_report_serializes_to_json() {
    let config = BalanceConfig::default();
    let spells = vec![make_spell("ember", SpellKind::Damage, 120.0)];
    let report = balance_report(&spells, &config);
    let json = serde_json::to_string(&report).expect("report should serialize");
    assert!(json.contains("\"recommendedCost\""));
    assert!(json.contains("\"totalPower\""));
    assert!(!json.contains("\"recommended_cost\""));
    assert!(json.contains("ember"));
}
