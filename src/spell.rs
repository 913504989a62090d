//! Spell definitions
//!
//! A [`Spell`] is the flat record authored in the design surface and consumed
//! read-only by both the balance models and the combat engine. The `kind`
//! field is a tagged union over the six spell categories; power and cost
//! routing match on it exhaustively, so adding a category is a
//! compiler-checked exercise.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The six spell categories. Determines which power-breakdown buckets are
/// non-zero and which targets are legal in combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellKind {
    Damage,
    Heal,
    Shield,
    Buff,
    Debuff,
    Cc,
}

impl SpellKind {
    /// Spells of these kinds target allies; everything else targets enemies.
    pub fn targets_allies(&self) -> bool {
        matches!(self, SpellKind::Heal | SpellKind::Buff | SpellKind::Shield)
    }
}

/// Which combatant stat a buff/debuff delta applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatName {
    AttackPower,
    Defense,
    Speed,
}

/// A structured stat adjustment carried by buff/debuff effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatDelta {
    pub stat: StatName,
    /// Flat adjustment, negative for debuffs
    pub amount: f32,
}

/// Named percentage adjustment applied in specific situations (authored
/// metadata, opaque to the engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SituationalModifier {
    pub name: String,
    pub percent: f32,
}

fn default_eco() -> u32 {
    1
}

fn default_aoe() -> u32 {
    1
}

fn default_dangerous() -> f32 {
    100.0
}

fn default_multiplicative() -> bool {
    true
}

/// A designer-authored spell record.
///
/// Numeric dials use percentages of a baseline unit (`effect`), rounds
/// (`eco`, `cooldown`, `duration`) and target counts (`aoe`). Optional fields
/// default to "absent" so flat JSON records stay terse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SpellKind,

    // === Numeric dials ===
    /// Percentage of a baseline unit (10-300)
    pub effect: f32,
    /// Linear modifier (-10..10)
    #[serde(default)]
    pub scale: f32,
    /// Repeat count / duration in rounds. 1 = instant, >1 = spread over time.
    #[serde(default = "default_eco")]
    pub eco: u32,
    /// Number of targets hit (>= 1)
    #[serde(default = "default_aoe")]
    pub aoe: u32,
    /// Accuracy / success percentage (0-100)
    #[serde(default = "default_dangerous")]
    pub dangerous: f32,
    /// Mitigation bypass percentage (0-50)
    #[serde(default)]
    pub pierce: f32,
    /// Cooldown in rounds after use
    #[serde(default)]
    pub cooldown: u32,
    /// Cast range in arena units
    #[serde(default)]
    pub range: u32,
    /// Initiative modifier
    #[serde(default)]
    pub priority: i32,

    // === Optional fields ===
    /// Assigned resource cost; the cost model recommends one when unset
    #[serde(default)]
    pub mana_cost: Option<u32>,
    /// Effect duration in rounds for buffs/debuffs
    #[serde(default)]
    pub duration: Option<u32>,
    /// Cast time in seconds (0 = instant)
    #[serde(default)]
    pub cast_time: Option<f32>,
    /// Fraction of incoming damage reflected (shields)
    #[serde(default)]
    pub reflection: Option<f32>,
    /// Crowd-control flavor (stun, root, ...). Presence marks the spell as
    /// carrying CC for the budget model.
    #[serde(default)]
    pub cc_effect: Option<String>,
    /// Whether buff/debuff magnitude is a percentage (true) or flat points
    #[serde(default = "default_multiplicative")]
    pub multiplicative: bool,
    /// Explicit stat deltas for buff/debuff effects
    #[serde(default)]
    pub stat_deltas: Vec<StatDelta>,
    #[serde(default)]
    pub situational_modifiers: Vec<SituationalModifier>,
    /// Stat the effect scales with (opaque authored metadata)
    #[serde(default)]
    pub scaling_stat: Option<String>,
}

impl Spell {
    /// Effect duration in rounds, clamped to at least 1.
    pub fn duration_rounds(&self) -> u32 {
        self.duration.unwrap_or(1).max(1)
    }

    /// Repeat count, clamped to at least 1 (malformed records degrade
    /// instead of erroring).
    pub fn eco_rounds(&self) -> u32 {
        self.eco.max(1)
    }

    /// Target count, clamped to at least 1.
    pub fn target_count(&self) -> u32 {
        self.aoe.max(1)
    }
}

// ============================================================================
// Template validation
// ============================================================================

/// Severity of a single validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// Value outside its allowed range
    Range,
    /// Required field missing or empty
    Required,
}

/// A field-level validation violation, reported back to the caller instead
/// of thrown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    fn range(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            kind: IssueKind::Range,
            message: message.into(),
        }
    }

    fn required(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            kind: IssueKind::Required,
            message: message.into(),
        }
    }
}

/// Hard failure constructing a spell from an invalid template. Distinct from
/// a spell that merely fails the balance tolerance check (a warning).
#[derive(Debug, Error)]
pub enum SpellError {
    #[error("spell template '{id}' failed validation ({} issue(s))", issues.len())]
    InvalidTemplate {
        id: String,
        issues: Vec<ValidationIssue>,
    },
}

impl Spell {
    /// Check all authored ranges, returning every violation found.
    ///
    /// An empty vec means the template is well-formed. Range limits mirror
    /// the authoring sliders: `effect` 10-300, `scale` -10..10, `dangerous`
    /// 0-100, `pierce` 0-50.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.id.trim().is_empty() {
            issues.push(ValidationIssue::required("id", "spell id must not be empty"));
        }
        if self.name.trim().is_empty() {
            issues.push(ValidationIssue::required(
                "name",
                "spell name must not be empty",
            ));
        }
        if !(10.0..=300.0).contains(&self.effect) {
            issues.push(ValidationIssue::range(
                "effect",
                format!("effect must be within 10-300, got {}", self.effect),
            ));
        }
        if !(-10.0..=10.0).contains(&self.scale) {
            issues.push(ValidationIssue::range(
                "scale",
                format!("scale must be within -10..10, got {}", self.scale),
            ));
        }
        if self.eco < 1 {
            issues.push(ValidationIssue::range(
                "eco",
                format!("eco must be at least 1, got {}", self.eco),
            ));
        }
        if self.aoe < 1 {
            issues.push(ValidationIssue::range(
                "aoe",
                format!("aoe must be at least 1, got {}", self.aoe),
            ));
        }
        if !(0.0..=100.0).contains(&self.dangerous) {
            issues.push(ValidationIssue::range(
                "dangerous",
                format!("dangerous must be within 0-100, got {}", self.dangerous),
            ));
        }
        if !(0.0..=50.0).contains(&self.pierce) {
            issues.push(ValidationIssue::range(
                "pierce",
                format!("pierce must be within 0-50, got {}", self.pierce),
            ));
        }

        issues
    }

    /// Validate and promote a template into a combat-ready spell.
    ///
    /// Returns `SpellError::InvalidTemplate` carrying the full issue list on
    /// any violation; never panics.
    pub fn validated(self) -> Result<Spell, SpellError> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(self)
        } else {
            Err(SpellError::InvalidTemplate {
                id: self.id.clone(),
                issues,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_spell() -> Spell {
        Spell {
            id: "bolt".to_string(),
            name: "Bolt".to_string(),
            kind: SpellKind::Damage,
            effect: 100.0,
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

    #[test]
    fn test_well_formed_spell_has_no_issues() {
        assert!(basic_spell().validate().is_empty());
    }

    #[test]
    fn test_out_of_range_effect_reported() {
        let mut spell = basic_spell();
        spell.effect = 500.0;
        let issues = spell.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "effect");
        assert_eq!(issues[0].kind, IssueKind::Range);
    }

    #[test]
    fn test_multiple_issues_collected() {
        let mut spell = basic_spell();
        spell.id = String::new();
        spell.dangerous = 150.0;
        spell.pierce = 80.0;
        let issues = spell.validate();
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn test_validated_rejects_bad_template() {
        let mut spell = basic_spell();
        spell.effect = 0.0;
        assert!(spell.validated().is_err());
    }

    #[test]
    fn test_eco_clamp_for_runtime() {
        let mut spell = basic_spell();
        spell.eco = 0;
        assert_eq!(spell.eco_rounds(), 1);
    }

    #[test]
    fn test_camel_case_round_trip() {
        let json = r#"{
            "id": "frost",
            "name": "Frost Lance",
            "type": "damage",
            "effect": 120.0,
            "manaCost": 8,
            "ccEffect": "slow"
        }"#;
        let spell: Spell = serde_json::from_str(json).unwrap();
        assert_eq!(spell.kind, SpellKind::Damage);
        assert_eq!(spell.mana_cost, Some(8));
        assert_eq!(spell.cc_effect.as_deref(), Some("slow"));
        assert_eq!(spell.eco, 1);
        assert_eq!(spell.dangerous, 100.0);
    }
}
