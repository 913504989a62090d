//! Combatant state
//!
//! A [`Combatant`] is a fighter snapshot: base stats, equipped spells (slot 0
//! is the non-removable basic attack), active timed effects and a cooldown
//! table. Health mutations always recompute `is_dead` in the same step, so a
//! stale flag never crosses a turn boundary.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::spell::{Spell, StatDelta, StatName};

/// Which side of the encounter a combatant fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn opponent(&self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Team::A => "Side A",
            Team::B => "Side B",
        }
    }
}

/// Utility profile driving intent selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiRole {
    Tank,
    Dps,
    Support,
    Random,
}

/// Base stat block read by the engine. External character models may carry
/// more fields; only these are consumed here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub max_health: f32,
    pub attack_power: f32,
    /// Percentage damage reduction before pierce (0-100)
    #[serde(default)]
    pub defense: f32,
    pub speed: f32,
    /// Critical strike chance (0.0-1.0)
    #[serde(default)]
    pub crit_chance: f32,
}

/// Kind of a timed effect instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Buff,
    Debuff,
    Dot,
    Hot,
}

/// A timed effect attached to a combatant. Created when an action applies it,
/// ticked once per upkeep of its owner, removed the moment its duration
/// reaches zero or the owner dies.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub id: u32,
    pub source_id: String,
    pub spell_id: String,
    pub kind: EffectKind,
    /// Damage/healing per tick for dot/hot, magnitude percentage for
    /// buff/debuff
    pub magnitude: f32,
    /// Rounds remaining
    pub remaining: u32,
    /// Structured stat adjustments (buff/debuff only)
    pub stat_deltas: SmallVec<[StatDelta; 2]>,
}

/// A fighter in an encounter.
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub team: Team,
    pub stats: BaseStats,
    pub current_health: f32,
    /// Equipped spells; slot 0 is conventionally the basic attack
    pub spells: Vec<Spell>,
    pub effects: SmallVec<[ActiveEffect; 4]>,
    /// spell id -> rounds remaining before it is castable again
    pub cooldowns: HashMap<String, u32>,
    pub role: AiRole,
    /// Derived from `current_health <= 0`; recomputed after every health
    /// mutation
    pub is_dead: bool,

    // === Per-encounter tallies ===
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub healing_done: f32,
    /// Damage beyond the point of death, for efficiency metrics
    pub overkill: f32,
}

impl Combatant {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        team: Team,
        stats: BaseStats,
        spells: Vec<Spell>,
        role: AiRole,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            team,
            stats,
            current_health: stats.max_health,
            spells,
            effects: SmallVec::new(),
            cooldowns: HashMap::new(),
            role,
            is_dead: stats.max_health <= 0.0,
            damage_dealt: 0.0,
            damage_taken: 0.0,
            healing_done: 0.0,
            overkill: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Attack power after buff/debuff stat deltas.
    pub fn effective_attack(&self) -> f32 {
        self.effective_stat(StatName::AttackPower, self.stats.attack_power)
    }

    /// Defense after buff/debuff stat deltas, floored at zero.
    pub fn effective_defense(&self) -> f32 {
        self.effective_stat(StatName::Defense, self.stats.defense).max(0.0)
    }

    pub fn effective_speed(&self) -> f32 {
        self.effective_stat(StatName::Speed, self.stats.speed)
    }

    fn effective_stat(&self, stat: StatName, base: f32) -> f32 {
        let delta: f32 = self
            .effects
            .iter()
            .flat_map(|effect| effect.stat_deltas.iter())
            .filter(|d| d.stat == stat)
            .map(|d| d.amount)
            .sum();
        base + delta
    }

    /// Apply damage to health, tallying overkill, and recompute `is_dead`.
    /// Returns the damage actually taken from remaining health.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        debug_assert!(amount >= 0.0, "apply_damage: damage cannot be negative");

        let actual = amount.min(self.current_health);
        self.overkill += amount - actual;
        self.current_health = (self.current_health - amount).max(0.0);
        self.damage_taken += actual;
        self.refresh_death_flag();
        actual
    }

    /// Apply healing clamped to max health and recompute `is_dead`.
    /// Returns the amount actually healed.
    pub fn apply_healing(&mut self, amount: f32) -> f32 {
        debug_assert!(amount >= 0.0, "apply_healing: healing cannot be negative");

        let headroom = self.stats.max_health - self.current_health;
        let actual = amount.min(headroom).max(0.0);
        self.current_health += actual;
        self.refresh_death_flag();
        actual
    }

    /// Recompute the derived death flag from current health.
    pub fn refresh_death_flag(&mut self) {
        self.is_dead = self.current_health <= 0.0;
    }

    /// Drop all timed effects, used when the combatant dies.
    pub fn clear_effects(&mut self) {
        self.effects.clear();
    }

    /// Rounds remaining before the given spell can be cast (0 = ready).
    pub fn cooldown_remaining(&self, spell_id: &str) -> u32 {
        self.cooldowns.get(spell_id).copied().unwrap_or(0)
    }

    /// Equipped spell lookup by id.
    pub fn spell(&self, spell_id: &str) -> Option<&Spell> {
        self.spells.iter().find(|s| s.id == spell_id)
    }

    /// Fraction of health missing, as a percentage (0 = full health).
    pub fn missing_health_pct(&self) -> f32 {
        if self.stats.max_health <= 0.0 {
            return 0.0;
        }
        (1.0 - self.current_health / self.stats.max_health) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(max_health: f32) -> BaseStats {
        BaseStats {
            max_health,
            attack_power: 10.0,
            defense: 0.0,
            speed: 10.0,
            crit_chance: 0.0,
        }
    }

    fn combatant(max_health: f32) -> Combatant {
        Combatant::new("c1", "Fighter", Team::A, stats(max_health), vec![], AiRole::Dps)
    }

    #[test]
    fn test_damage_updates_death_flag_same_step() {
        let mut c = combatant(50.0);
        c.apply_damage(50.0);
        assert!(c.is_dead);
        assert_eq!(c.current_health, 0.0);
    }

    #[test]
    fn test_overkill_tracked_separately() {
        let mut c = combatant(30.0);
        let actual = c.apply_damage(45.0);
        assert_eq!(actual, 30.0);
        assert_eq!(c.overkill, 15.0);
        assert_eq!(c.damage_taken, 30.0);
    }

    #[test]
    fn test_healing_clamped_to_max() {
        let mut c = combatant(100.0);
        c.apply_damage(40.0);
        let healed = c.apply_healing(100.0);
        assert_eq!(healed, 40.0);
        assert_eq!(c.current_health, 100.0);
    }

    #[test]
    fn test_effect_deltas_shift_stats() {
        let mut c = combatant(100.0);
        c.effects.push(ActiveEffect {
            id: 1,
            source_id: "c2".to_string(),
            spell_id: "war-cry".to_string(),
            kind: EffectKind::Buff,
            magnitude: 50.0,
            remaining: 3,
            stat_deltas: smallvec::smallvec![StatDelta {
                stat: StatName::AttackPower,
                amount: 5.0,
            }],
        });
        assert_eq!(c.effective_attack(), 15.0);
        assert_eq!(c.effective_defense(), 0.0);
    }

    #[test]
    fn test_missing_health_pct() {
        let mut c = combatant(200.0);
        c.apply_damage(50.0);
        assert_eq!(c.missing_health_pct(), 25.0);
    }
}
