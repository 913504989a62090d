//! Balance configuration
//!
//! [`BalanceConfig`] carries every tunable the power/cost/budget models read:
//! the stat-weight table, the point-buy delta weights, the baseline spell and
//! per-field authoring ranges. It is an explicit value passed by reference
//! into the models (no hidden global) with a load/save/reset lifecycle backed
//! by a RON file, the same way ability definitions are configured in a
//! data-driven arena build.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::spell::{Spell, SpellKind};

/// Default location of the persisted config.
pub const BALANCE_CONFIG_PATH: &str = "assets/config/balance.ron";

/// HP-equivalent weight per 100% `effect`, one entry per power bucket.
///
/// These constants define the balance curve; changing them shifts every
/// derived cost in the game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatWeights {
    /// Damage per 100% effect (the "5 HP per basic hit" anchor)
    pub damage: f32,
    /// Healing per 100% effect
    pub heal: f32,
    /// Shield points per 100% effect
    pub shield: f32,
    /// Buff value per 100% magnitude over the reference 3-round duration
    pub buff: f32,
    /// Debuff value per 100% magnitude over the reference 3-round duration
    pub debuff: f32,
    /// Crowd control is worth this many times equivalent direct damage
    pub cc_multiplier: f32,
}

impl Default for StatWeights {
    fn default() -> Self {
        Self {
            damage: 5.0,
            heal: 1.0,
            shield: 1.0,
            buff: 2.0,
            debuff: 2.0,
            cc_multiplier: 3.0,
        }
    }
}

/// Per-field weights for the point-buy budget model.
///
/// Each weight multiplies the delta between a spell's value and the baseline
/// spell's value for that field. Negative weights mean "more of this makes
/// the spell cheaper" (e.g. cooldown).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetWeights {
    pub effect: f32,
    pub scale: f32,
    pub eco: f32,
    pub aoe: f32,
    pub dangerous: f32,
    pub pierce: f32,
    pub cooldown: f32,
    pub range: f32,
    pub priority: f32,
    /// Flat surcharge for any spell carrying a crowd-control effect
    pub cc_flat: f32,
}

impl Default for BudgetWeights {
    fn default() -> Self {
        Self {
            effect: 0.04,
            scale: 0.5,
            eco: -0.5,
            aoe: 2.0,
            dangerous: 0.05,
            pierce: 0.1,
            cooldown: -0.5,
            range: 0.2,
            priority: 0.5,
            cc_flat: 2.0,
        }
    }
}

/// Authoring range and slider step for one numeric spell field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

/// Named authoring ranges for every balanceable dial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRanges {
    pub effect: FieldRange,
    pub scale: FieldRange,
    pub eco: FieldRange,
    pub aoe: FieldRange,
    pub dangerous: FieldRange,
    pub pierce: FieldRange,
    pub cooldown: FieldRange,
    pub range: FieldRange,
    pub priority: FieldRange,
}

impl Default for FieldRanges {
    fn default() -> Self {
        Self {
            effect: FieldRange { min: 10.0, max: 300.0, step: 5.0 },
            scale: FieldRange { min: -10.0, max: 10.0, step: 1.0 },
            eco: FieldRange { min: 1.0, max: 10.0, step: 1.0 },
            aoe: FieldRange { min: 1.0, max: 10.0, step: 1.0 },
            dangerous: FieldRange { min: 0.0, max: 100.0, step: 5.0 },
            pierce: FieldRange { min: 0.0, max: 50.0, step: 5.0 },
            cooldown: FieldRange { min: 0.0, max: 20.0, step: 1.0 },
            range: FieldRange { min: 1.0, max: 30.0, step: 1.0 },
            priority: FieldRange { min: -5.0, max: 5.0, step: 1.0 },
        }
    }
}

/// Process-wide balance configuration, versioned and externally persisted.
///
/// Load once per session; mutate only through an explicit save. Tests
/// construct a fresh instance per case via `BalanceConfig::default()` instead
/// of sharing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// Config schema version, bumped on incompatible changes
    pub version: u32,
    pub stat_weights: StatWeights,
    pub budget_weights: BudgetWeights,
    /// Reference point for net-zero point-buy costing
    pub baseline: Spell,
    pub ranges: FieldRanges,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            stat_weights: StatWeights::default(),
            budget_weights: BudgetWeights::default(),
            baseline: baseline_spell(),
            ranges: FieldRanges::default(),
        }
    }
}

/// The conventional slot-0 basic attack, doubling as the point-buy baseline.
pub fn baseline_spell() -> Spell {
    Spell {
        id: "basic-attack".to_string(),
        name: "Basic Attack".to_string(),
        kind: SpellKind::Damage,
        effect: 100.0,
        scale: 0.0,
        eco: 1,
        aoe: 1,
        dangerous: 95.0,
        pierce: 0.0,
        cooldown: 0,
        range: 1,
        priority: 0,
        mana_cost: Some(0),
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

impl BalanceConfig {
    /// Load configuration from a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let config: BalanceConfig = ron::from_str(&contents)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

        info!(path = %path.display(), version = config.version, "Loaded balance config");
        Ok(config)
    }

    /// Load the session config, falling back to built-in defaults when the
    /// file is absent.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e}; using built-in defaults");
                Self::default()
            }
        }
    }

    /// Persist this config as the new session default ("save as new default").
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let pretty = ron::ser::PrettyConfig::default();
        let contents = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| format!("Failed to serialize balance config: {}", e))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        std::fs::write(path, contents)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        info!(path = %path.display(), "Saved balance config");
        Ok(())
    }

    /// Restore built-in defaults, discarding any loaded overrides.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
