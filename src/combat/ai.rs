//! AI decision engine
//!
//! Scores every (available spell, legal target) pair under a role-specific
//! utility and returns the best intent for the acting combatant. Greedy and
//! memoryless by design: a pure function of the current battle state, no
//! lookahead, so balance statistics stay reproducible.
//!
//! ## Role utilities
//! - **tank**: crowd control on high-attack enemies, shields on wounded
//!   allies, otherwise threat-weighted damage
//! - **dps**: kill-confirm bonus when estimated damage meets the target's
//!   remaining health, otherwise finish-the-wounded plus threat
//! - **support**: triage healing, never wasting a heal on a full-health ally
//! - **random**: pure noise, every legal pair equally likely over time

use tracing::debug;

use crate::combat::combatant::{AiRole, Combatant};
use crate::combat::engine::{CombatState, Intent, IntentAction};
use crate::rng::GameRng;
use crate::spell::{Spell, SpellKind};

/// Fixed bonus awarded when a damage spell is estimated to kill its target.
/// The estimate deliberately ignores mitigation.
pub const KILL_CONFIRM_BONUS: f32 = 1000.0;

/// Threshold (current/max health) below which the tank considers an ally
/// worth shielding.
const SHIELD_HP_THRESHOLD: f32 = 0.5;

/// Pick the best (spell, target) intent for the acting combatant.
///
/// When no spell is off cooldown, or no living opposing targets exist, the
/// result is a self-targeted skip intent with a descriptive message rather
/// than an error. Ties break by first-encountered order (stable) except
/// under the random role, where the score itself is noise.
pub fn evaluate_turn(state: &CombatState, actor_id: &str, rng: &mut GameRng) -> Intent {
    let Some(actor) = state.combatant(actor_id) else {
        return Intent::skip(actor_id, "is missing from the battle");
    };

    let available: Vec<&Spell> = actor
        .spells
        .iter()
        .filter(|spell| actor.cooldown_remaining(&spell.id) == 0)
        .collect();

    if available.is_empty() {
        return Intent::skip(actor_id, "has no spell off cooldown");
    }

    let has_living_enemy = state
        .combatants
        .iter()
        .any(|c| c.team == actor.team.opponent() && c.is_alive());
    if !has_living_enemy {
        return Intent::skip(actor_id, "has no living target");
    }

    let mut best: Option<(f32, &Spell, &Combatant)> = None;

    for spell in &available {
        for target in legal_targets(state, actor, spell.kind) {
            let score = score_pair(actor, spell, target, rng);
            let better = match best {
                Some((best_score, _, _)) => score > best_score,
                None => true,
            };
            if better {
                best = Some((score, spell, target));
            }
        }
    }

    match best {
        Some((score, spell, target)) => {
            debug!(
                actor = actor_id,
                spell = %spell.id,
                target = %target.id,
                score,
                "intent selected"
            );
            Intent {
                source: actor.id.clone(),
                target: target.id.clone(),
                action: IntentAction::Cast {
                    spell_id: spell.id.clone(),
                },
                description: format!("{} casts {} at {}", actor.name, spell.name, target.name),
            }
        }
        // Every available spell was ally-targeted with no ally alive, which
        // cannot happen while the actor itself lives; degrade to a skip.
        None => Intent::skip(actor_id, "found no legal target"),
    }
}

/// Living combatants this spell kind may target: allies for heal/buff/shield
/// spells, enemies otherwise.
fn legal_targets<'a>(
    state: &'a CombatState,
    actor: &Combatant,
    kind: SpellKind,
) -> impl Iterator<Item = &'a Combatant> {
    let wanted = if kind.targets_allies() {
        actor.team
    } else {
        actor.team.opponent()
    };
    state
        .combatants
        .iter()
        .filter(move |c| c.team == wanted && c.is_alive())
}

fn score_pair(actor: &Combatant, spell: &Spell, target: &Combatant, rng: &mut GameRng) -> f32 {
    match actor.role {
        AiRole::Random => rng.random_f32() * 100.0,
        AiRole::Tank => score_tank(spell, target),
        AiRole::Dps => score_dps(actor, spell, target),
        AiRole::Support => score_support(spell, target),
    }
}

fn score_tank(spell: &Spell, target: &Combatant) -> f32 {
    match spell.kind {
        SpellKind::Cc => target.effective_attack() * 2.0,
        SpellKind::Shield => {
            let missing = target.missing_health_pct();
            if target.current_health < target.stats.max_health * SHIELD_HP_THRESHOLD {
                missing * 3.0
            } else {
                missing
            }
        }
        SpellKind::Damage | SpellKind::Debuff => target.effective_attack(),
        SpellKind::Heal | SpellKind::Buff => target.missing_health_pct(),
    }
}

fn score_dps(actor: &Combatant, spell: &Spell, target: &Combatant) -> f32 {
    match spell.kind {
        SpellKind::Damage | SpellKind::Cc => {
            // Kill-confirm heuristic: raw attack * effect%, mitigation ignored
            let estimated = actor.effective_attack() * spell.effect.max(0.0) / 100.0;
            if estimated >= target.current_health {
                KILL_CONFIRM_BONUS
            } else {
                target.missing_health_pct() * 2.0 + target.effective_attack()
            }
        }
        _ => target.missing_health_pct(),
    }
}

fn score_support(spell: &Spell, target: &Combatant) -> f32 {
    match spell.kind {
        SpellKind::Heal => {
            if target.current_health >= target.stats.max_health {
                -100.0
            } else {
                target.missing_health_pct() * 5.0
            }
        }
        SpellKind::Buff | SpellKind::Shield => target.missing_health_pct(),
        SpellKind::Damage | SpellKind::Debuff | SpellKind::Cc => target.missing_health_pct(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::combatant::{AiRole, BaseStats, Combatant, Team};
    use crate::combat::engine::start_combat;
    use crate::spell::SpellKind;

    fn spell(id: &str, kind: SpellKind, effect: f32) -> Spell {
        Spell {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            effect,
            scale: 0.0,
            eco: 1,
            aoe: 1,
            dangerous: 100.0,
            pierce: 0.0,
            cooldown: 0,
            range: 5,
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

    fn fighter(id: &str, team: Team, role: AiRole, attack: f32, spells: Vec<Spell>) -> Combatant {
        Combatant::new(
            id,
            id,
            team,
            BaseStats {
                max_health: 100.0,
                attack_power: attack,
                defense: 0.0,
                speed: 10.0,
                crit_chance: 0.0,
            },
            spells,
            role,
        )
    }

    #[test]
    fn test_dps_kill_confirm_beats_everything() {
        let slayer = fighter(
            "slayer",
            Team::A,
            AiRole::Dps,
            20.0,
            vec![
                spell("poke", SpellKind::Damage, 50.0),
                spell("smash", SpellKind::Damage, 200.0),
            ],
        );
        let mut wounded = fighter("wounded", Team::B, AiRole::Dps, 50.0, vec![]);
        wounded.apply_damage(65.0); // 35 HP left, lethal for smash (40) only
        let healthy = fighter("healthy", Team::B, AiRole::Dps, 90.0, vec![]);

        let mut rng = GameRng::from_seed(1);
        let state = start_combat(vec![slayer, wounded, healthy], &mut rng);
        let intent = evaluate_turn(&state, "slayer", &mut rng);
        match intent.action {
            IntentAction::Cast { ref spell_id } => assert_eq!(spell_id, "smash"),
            _ => panic!("expected a cast intent"),
        }
        assert_eq!(intent.target, "wounded");
    }

    #[test]
    fn test_support_never_heals_full_health_target() {
        let medic = fighter(
            "medic",
            Team::A,
            AiRole::Support,
            10.0,
            vec![spell("mend", SpellKind::Heal, 100.0)],
        );
        let mut hurt = fighter("hurt", Team::A, AiRole::Dps, 10.0, vec![]);
        hurt.apply_damage(30.0);
        let enemy = fighter("enemy", Team::B, AiRole::Dps, 10.0, vec![]);

        let mut rng = GameRng::from_seed(2);
        let state = start_combat(vec![medic, hurt, enemy], &mut rng);
        let intent = evaluate_turn(&state, "medic", &mut rng);
        assert_eq!(intent.target, "hurt");
    }

    #[test]
    fn test_tank_prefers_cc_on_high_attack_enemy() {
        let tank = fighter(
            "tank",
            Team::A,
            AiRole::Tank,
            10.0,
            vec![
                spell("hit", SpellKind::Damage, 100.0),
                spell("stun", SpellKind::Cc, 100.0),
            ],
        );
        let soft = fighter("soft", Team::B, AiRole::Dps, 5.0, vec![]);
        let scary = fighter("scary", Team::B, AiRole::Dps, 60.0, vec![]);

        let mut rng = GameRng::from_seed(3);
        let state = start_combat(vec![tank, soft, scary], &mut rng);
        let intent = evaluate_turn(&state, "tank", &mut rng);
        match intent.action {
            IntentAction::Cast { ref spell_id } => assert_eq!(spell_id, "stun"),
            _ => panic!("expected a cast intent"),
        }
        assert_eq!(intent.target, "scary");
    }

    #[test]
    fn test_skip_when_all_spells_on_cooldown() {
        let mut caster = fighter(
            "caster",
            Team::A,
            AiRole::Dps,
            10.0,
            vec![spell("bolt", SpellKind::Damage, 100.0)],
        );
        caster.cooldowns.insert("bolt".to_string(), 2);
        let enemy = fighter("enemy", Team::B, AiRole::Dps, 10.0, vec![]);

        let mut rng = GameRng::from_seed(4);
        let state = start_combat(vec![caster, enemy], &mut rng);
        let intent = evaluate_turn(&state, "caster", &mut rng);
        assert_eq!(intent.action, IntentAction::Skip);
        assert_eq!(intent.target, "caster");
    }

    #[test]
    fn test_skip_when_no_living_enemy() {
        let caster = fighter(
            "caster",
            Team::A,
            AiRole::Dps,
            10.0,
            vec![spell("bolt", SpellKind::Damage, 100.0)],
        );
        let mut corpse = fighter("corpse", Team::B, AiRole::Dps, 10.0, vec![]);
        corpse.apply_damage(1000.0);

        let mut rng = GameRng::from_seed(5);
        let state = start_combat(vec![caster, corpse], &mut rng);
        let intent = evaluate_turn(&state, "caster", &mut rng);
        assert_eq!(intent.action, IntentAction::Skip);
    }

    #[test]
    fn test_tie_break_is_stable() {
        // Two identical targets: the first in combatant order wins the tie.
        let caster = fighter(
            "caster",
            Team::A,
            AiRole::Tank,
            10.0,
            vec![spell("hit", SpellKind::Damage, 100.0)],
        );
        let first = fighter("first", Team::B, AiRole::Dps, 20.0, vec![]);
        let second = fighter("second", Team::B, AiRole::Dps, 20.0, vec![]);

        let mut rng = GameRng::from_seed(6);
        let state = start_combat(vec![caster, first, second], &mut rng);
        let intent = evaluate_turn(&state, "caster", &mut rng);
        assert_eq!(intent.target, "first");
    }
}
