//! Batch simulation
//!
//! Runs encounters to completion with no UI attached, either once (a duel)
//! or thousands of times (a Monte Carlo batch), and aggregates the results
//! for balance validation.

pub mod config;
pub mod runner;

pub use config::{BatchConfig, CombatantSpec};
pub use runner::{run_batch, CounterExpectation, MatchupResult, Relation, SideAggregate, TurnStats};
