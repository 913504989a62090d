//! Damage resolution
//!
//! The external damage-resolution function the action phase delegates to for
//! damage and crowd-control spells. Takes both combatants' stat blocks and
//! returns hit/miss, crit flag and the mitigated total.

use crate::combat::combatant::Combatant;
use crate::rng::GameRng;
use crate::spell::Spell;

/// Critical hits deal double damage.
pub const CRIT_DAMAGE_MULTIPLIER: f32 = 2.0;

/// Mitigation can never remove more than 75% of a hit.
pub const MAX_MITIGATION: f32 = 0.75;

/// Outcome of one damage roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub hit: bool,
    pub crit: bool,
    /// Total damage after crit and mitigation (0 on a miss)
    pub amount: f32,
}

impl DamageOutcome {
    pub fn miss() -> Self {
        Self {
            hit: false,
            crit: false,
            amount: 0.0,
        }
    }
}

/// Roll a critical strike check. Returns true if the roll is a crit.
pub fn roll_crit(crit_chance: f32, rng: &mut GameRng) -> bool {
    rng.random_f32() < crit_chance
}

/// Resolve one damage/cc cast from `attacker` against `target`.
///
/// - Hit roll against the spell's accuracy (`dangerous`).
/// - Raw damage = effective attack * effect%, doubled on a crit.
/// - Target defense reduces the hit by its percentage, with the spell's
///   `pierce` bypassing a matching share of it; mitigation caps at 75%.
pub fn resolve_damage(
    attacker: &Combatant,
    target: &Combatant,
    spell: &Spell,
    rng: &mut GameRng,
) -> DamageOutcome {
    let accuracy = spell.dangerous.clamp(0.0, 100.0) / 100.0;
    if rng.random_f32() >= accuracy {
        return DamageOutcome::miss();
    }

    let crit = roll_crit(attacker.stats.crit_chance, rng);
    let mut raw = attacker.effective_attack() * (spell.effect.max(0.0) / 100.0);
    if crit {
        raw *= CRIT_DAMAGE_MULTIPLIER;
    }

    let pierce = spell.pierce.clamp(0.0, 50.0) / 100.0;
    let mitigation = (target.effective_defense() / 100.0 * (1.0 - pierce)).min(MAX_MITIGATION);
    let amount = (raw * (1.0 - mitigation)).max(0.0);

    DamageOutcome {
        hit: true,
        crit,
        amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::{AiRole, BaseStats, Combatant, Team};
    use crate::spell::{Spell, SpellKind};

    fn fighter(attack: f32, defense: f32, crit: f32) -> Combatant {
        Combatant::new(
            "f",
            "Fighter",
            Team::A,
            BaseStats {
                max_health: 100.0,
                attack_power: attack,
                defense,
                speed: 10.0,
                crit_chance: crit,
            },
            vec![],
            AiRole::Dps,
        )
    }

    fn strike(effect: f32, dangerous: f32, pierce: f32) -> Spell {
        Spell {
            id: "strike".to_string(),
            name: "Strike".to_string(),
            kind: SpellKind::Damage,
            effect,
            scale: 0.0,
            eco: 1,
            aoe: 1,
            dangerous,
            pierce,
            cooldown: 0,
            range: 1,
            priority: 0,
            mana_cost: None,
            duration: None,
            cast_time: None,
            reflection: None,
            cc_effect: None,
            multiplicative: true,
            stat_deltas: vec![],
            situational_modifiers: vec![],
            scaling_stat: None,
        }
    }

    #[test]
    fn test_sure_hit_full_accuracy_no_crit() {
        let attacker = fighter(20.0, 0.0, 0.0);
        let target = fighter(10.0, 0.0, 0.0);
        let mut rng = GameRng::from_seed(1);
        let outcome = resolve_damage(&attacker, &target, &strike(150.0, 100.0, 0.0), &mut rng);
        assert!(outcome.hit);
        assert!(!outcome.crit);
        assert_eq!(outcome.amount, 30.0);
    }

    #[test]
    fn test_zero_accuracy_always_misses() {
        let attacker = fighter(20.0, 0.0, 0.0);
        let target = fighter(10.0, 0.0, 0.0);
        let mut rng = GameRng::from_seed(1);
        for _ in 0..20 {
            let outcome = resolve_damage(&attacker, &target, &strike(100.0, 0.0, 0.0), &mut rng);
            assert!(!outcome.hit);
            assert_eq!(outcome.amount, 0.0);
        }
    }

    #[test]
    fn test_defense_mitigates_and_pierce_bypasses() {
        let attacker = fighter(100.0, 0.0, 0.0);
        let target = fighter(10.0, 40.0, 0.0);
        let mut rng = GameRng::from_seed(3);

        let plain = resolve_damage(&attacker, &target, &strike(100.0, 100.0, 0.0), &mut rng);
        assert!((plain.amount - 60.0).abs() < 1e-3); // 40% mitigated

        let piercing = resolve_damage(&attacker, &target, &strike(100.0, 100.0, 50.0), &mut rng);
        assert!((piercing.amount - 80.0).abs() < 1e-3); // half the defense ignored
    }

    #[test]
    fn test_mitigation_cap() {
        let attacker = fighter(100.0, 0.0, 0.0);
        let target = fighter(10.0, 200.0, 0.0);
        let mut rng = GameRng::from_seed(4);
        let outcome = resolve_damage(&attacker, &target, &strike(100.0, 100.0, 0.0), &mut rng);
        assert_eq!(outcome.amount, 25.0); // capped at 75% reduction
    }

    #[test]
    fn test_guaranteed_crit_doubles_damage() {
        let attacker = fighter(10.0, 0.0, 1.0);
        let target = fighter(10.0, 0.0, 0.0);
        let mut rng = GameRng::from_seed(5);
        let outcome = resolve_damage(&attacker, &target, &strike(100.0, 100.0, 0.0), &mut rng);
        assert!(outcome.crit);
        assert_eq!(outcome.amount, 20.0);
    }
}
