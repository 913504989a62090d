//! Combat state machine
//!
//! Orchestrates one encounter through the phase cycle
//! `NotStarted -> (Upkeep -> IntentDetermined -> ActionResolved)* -> Ended`.
//! Every phase is a pure function consuming the previous snapshot and
//! returning the next one; callers must treat each returned state as the new
//! source of truth. Lookup failures degrade to skips/fizzles and a log note;
//! the simulation never halts on a malformed intent.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::trace;

use crate::combat::ai;
use crate::combat::combatant::{ActiveEffect, Combatant, EffectKind, Team};
use crate::combat::damage::resolve_damage;
use crate::combat::log::{CombatLog, LogKind};
use crate::rng::GameRng;
use crate::spell::{Spell, SpellKind, StatDelta, StatName};

/// Phase marker for the encounter state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Upkeep,
    IntentDetermined,
    ActionResolved,
    Ended,
}

/// Final result of an encounter. A mutual wipe-out is an explicit draw, never
/// a first-checked-wins artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    SideA,
    SideB,
    Draw,
}

/// What the acting combatant intends to do this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentAction {
    Cast { spell_id: String },
    Skip,
}

/// An AI-selected action for the upcoming action phase. Produced by the
/// decision engine, consumed exactly once by action resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub source: String,
    pub target: String,
    pub action: IntentAction,
    pub description: String,
}

impl Intent {
    /// Self-targeted sentinel for an actor that cannot act this turn.
    pub fn skip(actor_id: &str, reason: &str) -> Self {
        Self {
            source: actor_id.to_string(),
            target: actor_id.to_string(),
            action: IntentAction::Skip,
            description: format!("{} {}", actor_id, reason),
        }
    }
}

/// The complete encounter snapshot, replaced wholesale on each phase
/// transition.
#[derive(Debug, Clone)]
pub struct CombatState {
    pub combatants: Vec<Combatant>,
    /// Combatant ids in initiative order, fixed at combat start
    pub turn_order: Vec<String>,
    /// Index into `turn_order` of the acting combatant
    pub turn_index: usize,
    /// 1-based round counter, incremented when the turn index wraps
    pub round: u32,
    pub log: CombatLog,
    /// Pending intent per combatant id, consumed by action resolution
    pub intents: HashMap<String, Intent>,
    pub winner: Option<Outcome>,
    pub phase: Phase,
    next_effect_id: u32,
}

impl CombatState {
    pub fn combatant(&self, id: &str) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: &str) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.combatants.iter().position(|c| c.id == id)
    }

    /// Id of the combatant whose turn it is.
    pub fn current_actor_id(&self) -> Option<&str> {
        self.turn_order.get(self.turn_index).map(String::as_str)
    }

    pub fn living_on(&self, team: Team) -> usize {
        self.combatants
            .iter()
            .filter(|c| c.team == team && c.is_alive())
            .count()
    }

    fn next_effect_id(&mut self) -> u32 {
        self.next_effect_id += 1;
        self.next_effect_id
    }
}

// ============================================================================
// Combat start
// ============================================================================

/// Roll initiative and produce the opening snapshot.
///
/// Initiative is `speed + random * 0.99`: a small random tiebreak on top of
/// the speed stat, so equal-speed combatants are ordered pseudo-randomly
/// rather than by id.
pub fn start_combat(combatants: Vec<Combatant>, rng: &mut GameRng) -> CombatState {
    let mut rolls: Vec<(String, f32)> = combatants
        .iter()
        .map(|c| (c.id.clone(), c.effective_speed() + rng.random_f32() * 0.99))
        .collect();
    rolls.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let turn_order: Vec<String> = rolls.into_iter().map(|(id, _)| id).collect();

    let mut log = CombatLog::default();
    log.log_event(1, format!("Combat started. Turn order: {}", turn_order.join(", ")));

    CombatState {
        combatants,
        turn_order,
        turn_index: 0,
        round: 1,
        log,
        intents: HashMap::new(),
        winner: None,
        phase: Phase::Upkeep,
        next_effect_id: 0,
    }
}

// ============================================================================
// Upkeep phase
// ============================================================================

/// Tick the acting combatant's timed effects and decay its cooldowns.
///
/// DoT/HoT effects apply one tick to their owner; an effect whose remaining
/// duration was 1 is removed with an "expired" entry instead of being
/// decremented to zero. Death from a tick is logged immediately and clears
/// all remaining effects on the victim.
pub fn upkeep(mut state: CombatState) -> CombatState {
    let round = state.round;
    let Some(actor_id) = state.current_actor_id().map(str::to_string) else {
        state.phase = Phase::Upkeep;
        return state;
    };
    let Some(idx) = state.index_of(&actor_id) else {
        state.phase = Phase::Upkeep;
        return state;
    };

    if state.combatants[idx].is_alive() {
        let effects: SmallVec<[ActiveEffect; 4]> =
            std::mem::take(&mut state.combatants[idx].effects);
        let mut kept: SmallVec<[ActiveEffect; 4]> = SmallVec::new();

        for mut effect in effects {
            let actor = &mut state.combatants[idx];
            if actor.is_dead {
                // Owner died mid-upkeep; remaining effects vanish with it.
                break;
            }

            match effect.kind {
                EffectKind::Dot => {
                    let actual = actor.apply_damage(effect.magnitude);
                    let name = actor.name.clone();
                    state.log.log(
                        round,
                        LogKind::Damage,
                        Some(effect.source_id.clone()),
                        Some(actor_id.clone()),
                        Some(actual),
                        format!("{} takes {:.0} damage from {}", name, actual, effect.spell_id),
                    );
                }
                EffectKind::Hot => {
                    let actual = actor.apply_healing(effect.magnitude);
                    let name = actor.name.clone();
                    state.log.log(
                        round,
                        LogKind::Healing,
                        Some(effect.source_id.clone()),
                        Some(actor_id.clone()),
                        Some(actual),
                        format!("{} recovers {:.0} health from {}", name, actual, effect.spell_id),
                    );
                }
                EffectKind::Buff | EffectKind::Debuff => {}
            }

            let actor = &mut state.combatants[idx];
            if actor.is_dead {
                let name = actor.name.clone();
                state.log.log(
                    round,
                    LogKind::Death,
                    Some(effect.source_id.clone()),
                    Some(actor_id.clone()),
                    None,
                    format!("{} has fallen", name),
                );
                break;
            }

            if effect.remaining <= 1 {
                state.log.log(
                    round,
                    LogKind::EffectExpired,
                    None,
                    Some(actor_id.clone()),
                    None,
                    format!("{} has worn off", effect.spell_id),
                );
            } else {
                effect.remaining -= 1;
                kept.push(effect);
            }
        }

        let actor = &mut state.combatants[idx];
        if actor.is_alive() {
            actor.effects = kept;
        } else {
            actor.clear_effects();
        }

        // Cooldown decay happens once per own turn
        for remaining in actor.cooldowns.values_mut() {
            if *remaining > 0 {
                *remaining -= 1;
            }
        }
        actor.refresh_death_flag();
    }

    trace!(actor = %actor_id, round, "upkeep complete");
    state.phase = Phase::Upkeep;
    state
}

// ============================================================================
// Intent phase
// ============================================================================

/// Ask the decision engine for the acting combatant's intent. Dead or absent
/// actors store nothing and the action phase skips them.
pub fn determine_intent(mut state: CombatState, rng: &mut GameRng) -> CombatState {
    let Some(actor_id) = state.current_actor_id().map(str::to_string) else {
        state.phase = Phase::IntentDetermined;
        return state;
    };

    let acting = state.combatant(&actor_id).is_some_and(|c| c.is_alive());
    if acting {
        let intent = ai::evaluate_turn(&state, &actor_id, rng);
        state.intents.insert(actor_id, intent);
    }

    state.phase = Phase::IntentDetermined;
    state
}

// ============================================================================
// Action phase
// ============================================================================

/// Resolve the stored intent for the acting combatant, then advance the turn
/// and evaluate the win condition.
///
/// Degradation rules: a dead actor or missing intent skips; an unknown spell
/// logs a note and skips; a dead or missing target fizzles. All of these
/// still advance the turn so the encounter always makes progress.
pub fn resolve_action(mut state: CombatState, rng: &mut GameRng) -> CombatState {
    let round = state.round;
    let Some(actor_id) = state.current_actor_id().map(str::to_string) else {
        return advance_turn(state);
    };

    let Some(intent) = state.intents.remove(&actor_id) else {
        return advance_turn(state);
    };

    let actor_alive = state.combatant(&actor_id).is_some_and(|c| c.is_alive());
    if !actor_alive {
        return advance_turn(state);
    }

    let spell_id = match intent.action {
        IntentAction::Skip => {
            state.log.log(
                round,
                LogKind::Skip,
                Some(actor_id.clone()),
                None,
                None,
                intent.description,
            );
            return advance_turn(state);
        }
        IntentAction::Cast { spell_id } => spell_id,
    };

    // Unknown spell: degrade to a skipped turn, never halt.
    let Some(spell) = state
        .combatant(&actor_id)
        .and_then(|c| c.spell(&spell_id))
        .cloned()
    else {
        state.log.log(
            round,
            LogKind::Skip,
            Some(actor_id.clone()),
            None,
            None,
            format!("{} fumbles an unknown spell '{}'", actor_id, spell_id),
        );
        return advance_turn(state);
    };

    // Dead or missing target: the action fizzles.
    let target_ok = state
        .combatant(&intent.target)
        .is_some_and(|c| c.is_alive());
    if !target_ok {
        state.log.log(
            round,
            LogKind::Fizzle,
            Some(actor_id.clone()),
            Some(intent.target.clone()),
            None,
            format!("{} fizzles: target {} is gone", spell.name, intent.target),
        );
        return advance_turn(state);
    }

    state.log.log(
        round,
        LogKind::SpellCast,
        Some(actor_id.clone()),
        Some(intent.target.clone()),
        None,
        intent.description.clone(),
    );

    let target_id = intent.target;
    match spell.kind {
        SpellKind::Damage | SpellKind::Cc => {
            apply_damage_cast(&mut state, &actor_id, &target_id, &spell, rng);
        }
        SpellKind::Heal => {
            apply_heal_cast(&mut state, &actor_id, &target_id, &spell);
        }
        SpellKind::Buff | SpellKind::Debuff | SpellKind::Shield => {
            apply_effect_cast(&mut state, &actor_id, &target_id, &spell);
        }
    }

    // Fresh cooldown assignment for the spell just used
    if let Some(actor) = state.combatant_mut(&actor_id) {
        actor.cooldowns.insert(spell.id.clone(), spell.cooldown);
    }

    advance_turn(state)
}

fn apply_damage_cast(
    state: &mut CombatState,
    actor_id: &str,
    target_id: &str,
    spell: &Spell,
    rng: &mut GameRng,
) {
    let round = state.round;
    let (Some(actor_idx), Some(target_idx)) = (state.index_of(actor_id), state.index_of(target_id))
    else {
        return;
    };

    let outcome = resolve_damage(
        &state.combatants[actor_idx],
        &state.combatants[target_idx],
        spell,
        rng,
    );

    if !outcome.hit {
        let target_name = state.combatants[target_idx].name.clone();
        state.log.log(
            round,
            LogKind::Damage,
            Some(actor_id.to_string()),
            Some(target_id.to_string()),
            Some(0.0),
            format!("{} misses {}", spell.name, target_name),
        );
        return;
    }

    let actual = state.combatants[target_idx].apply_damage(outcome.amount);
    state.combatants[actor_idx].damage_dealt += actual;

    let target_name = state.combatants[target_idx].name.clone();
    let verb = if outcome.crit { "crits" } else { "hits" };
    state.log.log(
        round,
        LogKind::Damage,
        Some(actor_id.to_string()),
        Some(target_id.to_string()),
        Some(actual),
        format!("{} {} {} for {:.0} damage", spell.name, verb, target_name, actual),
    );

    // Over-time spells leave a residual DoT behind the initial hit
    let eco = spell.eco_rounds();
    if eco > 1 && state.combatants[target_idx].is_alive() {
        let effect_id = state.next_effect_id();
        let magnitude = (outcome.amount / eco as f32).round();
        state.combatants[target_idx].effects.push(ActiveEffect {
            id: effect_id,
            source_id: actor_id.to_string(),
            spell_id: spell.id.clone(),
            kind: EffectKind::Dot,
            magnitude,
            remaining: eco,
            stat_deltas: SmallVec::new(),
        });
        state.log.log(
            round,
            LogKind::EffectApplied,
            Some(actor_id.to_string()),
            Some(target_id.to_string()),
            Some(magnitude),
            format!("{} afflicts {} for {} rounds", spell.name, target_name, eco),
        );
    }

    log_death_if_new(state, actor_id, target_id);
}

fn apply_heal_cast(state: &mut CombatState, actor_id: &str, target_id: &str, spell: &Spell) {
    let round = state.round;
    let (Some(actor_idx), Some(target_idx)) = (state.index_of(actor_id), state.index_of(target_id))
    else {
        return;
    };

    let amount = state.combatants[actor_idx].effective_attack() * (spell.effect.max(0.0) / 100.0);
    let actual = state.combatants[target_idx].apply_healing(amount);
    state.combatants[actor_idx].healing_done += actual;

    let target_name = state.combatants[target_idx].name.clone();
    state.log.log(
        round,
        LogKind::Healing,
        Some(actor_id.to_string()),
        Some(target_id.to_string()),
        Some(actual),
        format!("{} restores {:.0} health to {}", spell.name, actual, target_name),
    );
}

/// Buff/debuff/shield casts attach a timed effect carrying structured stat
/// deltas. Spells without authored deltas fall back to a conventional one:
/// attack power for buffs/debuffs, defense for shields, scaled from `effect`.
fn apply_effect_cast(state: &mut CombatState, actor_id: &str, target_id: &str, spell: &Spell) {
    let round = state.round;
    let Some(target_idx) = state.index_of(target_id) else {
        return;
    };

    let kind = match spell.kind {
        SpellKind::Debuff => EffectKind::Debuff,
        _ => EffectKind::Buff,
    };
    let deltas: SmallVec<[StatDelta; 2]> = if spell.stat_deltas.is_empty() {
        let scaled = spell.effect.max(0.0) / 10.0;
        match spell.kind {
            SpellKind::Shield => smallvec::smallvec![StatDelta {
                stat: StatName::Defense,
                amount: scaled,
            }],
            SpellKind::Debuff => smallvec::smallvec![StatDelta {
                stat: StatName::AttackPower,
                amount: -scaled,
            }],
            _ => smallvec::smallvec![StatDelta {
                stat: StatName::AttackPower,
                amount: scaled,
            }],
        }
    } else {
        spell.stat_deltas.iter().copied().collect()
    };

    let duration = spell.duration_rounds();
    let effect_id = state.next_effect_id();
    let target = &mut state.combatants[target_idx];
    target.effects.push(ActiveEffect {
        id: effect_id,
        source_id: actor_id.to_string(),
        spell_id: spell.id.clone(),
        kind,
        magnitude: spell.effect,
        remaining: duration,
        stat_deltas: deltas,
    });

    let target_name = target.name.clone();
    state.log.log(
        round,
        LogKind::EffectApplied,
        Some(actor_id.to_string()),
        Some(target_id.to_string()),
        Some(spell.effect),
        format!("{} affects {} for {} rounds", spell.name, target_name, duration),
    );
}

fn log_death_if_new(state: &mut CombatState, killer_id: &str, victim_id: &str) {
    let round = state.round;
    let Some(idx) = state.index_of(victim_id) else {
        return;
    };
    if state.combatants[idx].is_dead && !state.combatants[idx].effects.is_empty() {
        state.combatants[idx].clear_effects();
    }
    if state.combatants[idx].is_dead {
        let already_logged = state
            .log
            .entries
            .iter()
            .any(|e| e.kind == LogKind::Death && e.target.as_deref() == Some(victim_id));
        if !already_logged {
            let name = state.combatants[idx].name.clone();
            state.log.log(
                round,
                LogKind::Death,
                Some(killer_id.to_string()),
                Some(victim_id.to_string()),
                None,
                format!("{} has fallen", name),
            );
        }
    }
}

// ============================================================================
// Turn advance and win condition
// ============================================================================

/// Step to the next combatant in initiative order (wrapping increments the
/// round counter) and evaluate the win condition. At most one of side-A-wins,
/// side-B-wins or draw is ever produced.
fn advance_turn(mut state: CombatState) -> CombatState {
    state.turn_index += 1;
    if state.turn_index >= state.turn_order.len() {
        state.turn_index = 0;
        state.round += 1;
    }

    let a_alive = state.living_on(Team::A) > 0;
    let b_alive = state.living_on(Team::B) > 0;
    state.winner = match (a_alive, b_alive) {
        (false, false) => Some(Outcome::Draw),
        (false, true) => Some(Outcome::SideB),
        (true, false) => Some(Outcome::SideA),
        (true, true) => None,
    };

    if let Some(outcome) = state.winner {
        let round = state.round;
        let message = match outcome {
            Outcome::SideA => "Side A wins".to_string(),
            Outcome::SideB => "Side B wins".to_string(),
            Outcome::Draw => "Both sides have fallen: draw".to_string(),
        };
        state.log.log_event(round, message);
        state.phase = Phase::Ended;
    } else {
        state.phase = Phase::ActionResolved;
    }

    state
}

// ============================================================================
// Encounter driver
// ============================================================================

/// Drive an encounter to completion or the round cap.
///
/// A capped run ends with `winner == None` and `phase == Ended`; callers must
/// report it distinctly rather than crediting either side.
pub fn run_encounter(combatants: Vec<Combatant>, round_cap: u32, rng: &mut GameRng) -> CombatState {
    let mut state = start_combat(combatants, rng);

    while state.winner.is_none() && state.round <= round_cap {
        state = upkeep(state);
        state = determine_intent(state, rng);
        state = resolve_action(state, rng);
    }

    if state.winner.is_none() {
        let round = state.round;
        state
            .log
            .log_event(round, format!("Round cap {} reached with no winner", round_cap));
    }
    state.phase = Phase::Ended;
    state
}
