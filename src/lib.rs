//! spellbench - spell balancing and combat simulation workbench
//!
//! A design-side toolkit for tuning ability kits: derive a normalized power
//! score and a recommended resource cost for every spell, then validate the
//! numbers by running deterministic turn-based encounters thousands of times
//! and checking the win rates.
//!
//! The crate splits along the data flow:
//! - [`spell`] — the authored spell record and template validation
//! - [`balance`] — design-time power, cost, tier and budget models
//! - [`combat`] — the run-time encounter state machine, AI and logging
//! - [`sim`] — the Monte Carlo batch driver and aggregate statistics

pub mod balance;
pub mod cli;
pub mod combat;
pub mod rng;
pub mod sim;
pub mod spell;

pub use balance::{balance_report, BalanceConfig};
pub use combat::{run_encounter, start_combat, Combatant, Outcome};
pub use rng::GameRng;
pub use sim::{run_batch, BatchConfig, MatchupResult};
pub use spell::{Spell, SpellKind};
