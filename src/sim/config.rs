//! JSON configuration parsing for batch simulation
//!
//! Parses JSON matchup configurations and converts them into engine
//! combatants.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::balance::config::StatWeights;
use crate::balance::cost::{spell_tier, Tier};
use crate::combat::{AiRole, BaseStats, Combatant, Team};
use crate::sim::runner::CounterExpectation;
use crate::spell::Spell;

/// One fighter in a matchup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantSpec {
    /// Unique id; defaults to `<side><slot>` (e.g. "a1") when omitted
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// AI role name: tank, dps, support or random
    pub role: String,
    pub stats: BaseStats,
    /// Equipped spells; slot 0 is conventionally the basic attack
    pub spells: Vec<Spell>,
}

/// Batch matchup configuration loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConfig {
    /// Side A composition (1-3 fighters)
    pub side_a: Vec<CombatantSpec>,
    /// Side B composition (1-3 fighters)
    pub side_b: Vec<CombatantSpec>,
    /// Number of runs (default: 1000)
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Maximum rounds per run before the encounter counts as unresolved
    /// (default: 100)
    #[serde(default = "default_round_cap")]
    pub round_cap: u32,
    /// Random seed for deterministic batch reproduction.
    /// If provided, every run derives its own seed from this one.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Number of runs to keep full combat logs for (default: 3)
    #[serde(default = "default_log_samples")]
    pub log_samples: u32,
    /// Highest spell tier either side may bring (None = unconstrained)
    #[serde(default)]
    pub tier_cap: Option<Tier>,
    /// Custom output path for the aggregate result JSON (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Declared counter relationship to validate against the win rate
    #[serde(default)]
    pub expectation: Option<CounterExpectation>,
}

fn default_iterations() -> u32 {
    1000
}

fn default_round_cap() -> u32 {
    100
}

fn default_log_samples() -> u32 {
    3
}

impl BatchConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: BatchConfig =
            serde_json::from_str(&contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.side_a.is_empty() || self.side_a.len() > 3 {
            return Err("sideA must have 1-3 fighters".to_string());
        }
        if self.side_b.is_empty() || self.side_b.len() > 3 {
            return Err("sideB must have 1-3 fighters".to_string());
        }
        if self.iterations == 0 {
            return Err("iterations must be positive".to_string());
        }
        if self.round_cap == 0 {
            return Err("roundCap must be positive".to_string());
        }

        let weights = StatWeights::default();
        for spec in self.side_a.iter().chain(self.side_b.iter()) {
            Self::parse_role(&spec.role)?;
            if spec.stats.max_health <= 0.0 {
                return Err(format!("{}: maxHealth must be positive", spec.name));
            }
            for spell in &spec.spells {
                if let Some(cap) = self.tier_cap {
                    let tier = spell_tier(spell, &weights);
                    if tier > cap {
                        return Err(format!(
                            "{}: spell '{}' is {} but the matchup caps at {}",
                            spec.name,
                            spell.id,
                            tier.name(),
                            cap.name()
                        ));
                    }
                }
                let issues = spell.validate();
                if !issues.is_empty() {
                    return Err(format!(
                        "{}: spell '{}' is invalid: {}",
                        spec.name,
                        spell.id,
                        issues
                            .iter()
                            .map(|i| i.message.clone())
                            .collect::<Vec<_>>()
                            .join("; ")
                    ));
                }
            }
        }

        // Ids must be unique across both sides once defaults are assigned
        let ids: Vec<String> = self
            .assigned_ids()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        for (i, id) in ids.iter().enumerate() {
            if ids[i + 1..].contains(id) {
                return Err(format!("Duplicate combatant id: '{}'", id));
            }
        }

        Ok(())
    }

    /// Parse an AI role name string
    pub fn parse_role(name: &str) -> Result<AiRole, String> {
        match name {
            "tank" => Ok(AiRole::Tank),
            "dps" => Ok(AiRole::Dps),
            "support" => Ok(AiRole::Support),
            "random" => Ok(AiRole::Random),
            _ => Err(format!(
                "Unknown role: '{}'. Valid roles: tank, dps, support, random",
                name
            )),
        }
    }

    /// Resolved (id, team) pair per fighter in declaration order.
    fn assigned_ids(&self) -> Vec<(String, Team)> {
        let mut out = Vec::with_capacity(self.side_a.len() + self.side_b.len());
        for (i, spec) in self.side_a.iter().enumerate() {
            let id = spec.id.clone().unwrap_or_else(|| format!("a{}", i + 1));
            out.push((id, Team::A));
        }
        for (i, spec) in self.side_b.iter().enumerate() {
            let id = spec.id.clone().unwrap_or_else(|| format!("b{}", i + 1));
            out.push((id, Team::B));
        }
        out
    }

    /// Build the engine combatants for one run.
    pub fn to_combatants(&self) -> Result<Vec<Combatant>, String> {
        let ids = self.assigned_ids();
        let specs = self.side_a.iter().chain(self.side_b.iter());

        let mut combatants = Vec::with_capacity(ids.len());
        for ((id, team), spec) in ids.into_iter().zip(specs) {
            let role = Self::parse_role(&spec.role)?;
            combatants.push(Combatant::new(
                id,
                spec.name.clone(),
                team,
                spec.stats,
                spec.spells.clone(),
                role,
            ));
        }
        Ok(combatants)
    }

    /// Names per side, for saved-log metadata.
    pub fn side_names(&self, team: Team) -> Vec<String> {
        let side = match team {
            Team::A => &self.side_a,
            Team::B => &self.side_b,
        };
        side.iter().map(|s| s.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_json(role: &str) -> String {
        format!(
            r#"{{
                "name": "Fighter",
                "role": "{}",
                "stats": {{ "maxHealth": 100.0, "attackPower": 10.0, "speed": 10.0 }},
                "spells": [{{
                    "id": "strike", "name": "Strike", "type": "damage",
                    "effect": 100.0, "scale": 0.0, "pierce": 0.0,
                    "cooldown": 0, "range": 1, "priority": 0
                }}]
            }}"#,
            role
        )
    }

    fn config_json(role_a: &str, role_b: &str) -> String {
        format!(
            r#"{{ "sideA": [{}], "sideB": [{}] }}"#,
            spec_json(role_a),
            spec_json(role_b)
        )
    }

    #[test]
    fn test_parse_applies_defaults() {
        let config: BatchConfig = serde_json::from_str(&config_json("dps", "tank")).unwrap();
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.round_cap, 100);
        assert_eq!(config.log_samples, 3);
        assert!(config.random_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let config: BatchConfig = serde_json::from_str(&config_json("healer", "dps")).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Unknown role"));
    }

    #[test]
    fn test_default_ids_are_unique_per_slot() {
        let json = format!(
            r#"{{ "sideA": [{}, {}], "sideB": [{}] }}"#,
            spec_json("dps"),
            spec_json("dps"),
            spec_json("dps")
        );
        let config: BatchConfig = serde_json::from_str(&json).unwrap();
        assert!(config.validate().is_ok());

        let combatants = config.to_combatants().unwrap();
        assert_eq!(combatants[0].id, "a1");
        assert_eq!(combatants[1].id, "a2");
        assert_eq!(combatants[2].id, "b1");
        assert_eq!(combatants[2].team, Team::B);
    }

    #[test]
    fn test_duplicate_explicit_ids_rejected() {
        let mut config: BatchConfig = serde_json::from_str(&config_json("dps", "dps")).unwrap();
        config.side_a[0].id = Some("x".to_string());
        config.side_b[0].id = Some("x".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.contains("Duplicate"));
    }

    #[test]
    fn test_tier_cap_rejects_overpowered_spell() {
        let mut config: BatchConfig = serde_json::from_str(&config_json("dps", "dps")).unwrap();
        config.tier_cap = Some(Tier::Common);
        assert!(config.validate().is_ok()); // a bare strike is Common

        config.side_a[0].spells[0].kind = crate::spell::SpellKind::Cc;
        config.side_a[0].spells[0].effect = 300.0;
        config.side_a[0].spells[0].aoe = 6;
        let err = config.validate().unwrap_err();
        assert!(err.contains("caps at Common"), "got: {}", err);
    }

    #[test]
    fn test_empty_side_rejected() {
        let json = format!(r#"{{ "sideA": [], "sideB": [{}] }}"#, spec_json("dps"));
        let config: BatchConfig = serde_json::from_str(&json).unwrap();
        assert!(config.validate().is_err());
    }
}
