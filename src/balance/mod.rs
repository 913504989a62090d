//! Design-time balance models
//!
//! Everything in this module is a pure function over spell records plus an
//! explicit [`BalanceConfig`]:
//! - Power scoring (HP-equivalent breakdown)
//! - Resource cost recommendation and balance checking
//! - Point-buy budget deltas against a baseline spell
//! - Per-collection balance reporting

pub mod budget;
pub mod config;
pub mod cost;
pub mod power;
pub mod report;

pub use budget::calculate_spell_budget;
pub use config::{BalanceConfig, BudgetWeights, FieldRange, StatWeights};
pub use cost::{calculate_mana_cost, calculate_tier, is_balanced, Tier};
pub use power::{calculate_aoe_multiplier, calculate_spell_power, SpellPowerBreakdown};
pub use report::{balance_report, SpellBalanceEntry};
