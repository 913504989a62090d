//! Deterministic combat engine
//!
//! Turn-based encounter simulation:
//! - Combatant state (stats, equipped spells, timed effects, cooldowns)
//! - Damage resolution (hit/miss, crits, mitigation)
//! - The phase state machine (upkeep, intent, action, win condition)
//! - Role-conditioned AI intent selection
//! - Structured, append-only combat logging

pub mod ai;
pub mod combatant;
pub mod damage;
pub mod engine;
pub mod log;

pub use combatant::{ActiveEffect, AiRole, BaseStats, Combatant, EffectKind, Team};
pub use engine::{run_encounter, start_combat, CombatState, Intent, IntentAction, Outcome};
pub use log::{CombatLog, LogEntry, LogKind};
