//! Monte Carlo batch runner
//!
//! Drives the combat state machine to completion N times with independent
//! per-run RNG streams and aggregates win rates, turn-count statistics and
//! damage/efficiency metrics. Memory stays bounded regardless of iteration
//! count: full logs are retained only for the first `log_samples` runs.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::combat::{run_encounter, CombatLog, Outcome, Team};
use crate::rng::GameRng;
use crate::sim::config::BatchConfig;

/// Turn-count distribution over the completed runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnStats {
    pub mean: f32,
    pub median: f32,
    pub min: u32,
    pub max: u32,
}

impl TurnStats {
    fn from_counts(counts: &mut [u32]) -> Self {
        if counts.is_empty() {
            return Self::default();
        }
        counts.sort_unstable();
        let sum: u64 = counts.iter().map(|&c| c as u64).sum();
        let mid = counts.len() / 2;
        let median = if counts.len() % 2 == 0 {
            (counts[mid - 1] + counts[mid]) as f32 / 2.0
        } else {
            counts[mid] as f32
        };
        Self {
            mean: sum as f32 / counts.len() as f32,
            median,
            min: counts[0],
            max: counts[counts.len() - 1],
        }
    }
}

/// Per-side damage and efficiency aggregates, averaged over runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideAggregate {
    /// Average damage dealt per round, per run
    pub damage_per_turn: f32,
    /// Average healing done per run
    pub healing_done: f32,
    /// Average damage wasted past the point of death, per run
    pub overkill: f32,
}

/// Aggregate result of a batch. `iterations_run` always reflects how many
/// runs actually completed, so callers can detect early termination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupResult {
    pub iterations_requested: u32,
    pub iterations_run: u32,
    pub wins_a: u32,
    pub wins_b: u32,
    pub draws: u32,
    /// Runs that hit the round cap with no winner; never credited to a side
    pub unresolved: u32,
    pub turn_stats: TurnStats,
    pub side_a: SideAggregate,
    pub side_b: SideAggregate,
    /// Full logs for the first few runs only
    pub sample_logs: Vec<CombatLog>,
    pub random_seed: Option<u64>,
}

impl MatchupResult {
    /// Side A win rate over completed runs (0.0 when none ran).
    pub fn win_rate_a(&self) -> f32 {
        if self.iterations_run == 0 {
            return 0.0;
        }
        self.wins_a as f32 / self.iterations_run as f32
    }

    /// Side B win rate over completed runs.
    pub fn win_rate_b(&self) -> f32 {
        if self.iterations_run == 0 {
            return 0.0;
        }
        self.wins_b as f32 / self.iterations_run as f32
    }

    /// Save the aggregate as pretty JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize batch result: {}", e))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        std::fs::write(path, contents)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}

// ============================================================================
// Counter expectations
// ============================================================================

/// Declared relationship between the two compositions, from side A's point
/// of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// Side A should counter side B
    Strong,
    /// Side A should be countered by side B
    Weak,
    /// Neither side should dominate
    Even,
}

fn default_band() -> f32 {
    0.05
}

/// An expected win-rate band for a declared counter relationship, checked
/// against the simulated result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterExpectation {
    pub relation: Relation,
    /// Margin around 50% (0.05 = five percentage points)
    #[serde(default = "default_band")]
    pub band: f32,
}

impl CounterExpectation {
    /// Whether the simulated win rate lands inside the declared band.
    pub fn is_satisfied(&self, result: &MatchupResult) -> bool {
        let rate = result.win_rate_a();
        match self.relation {
            Relation::Strong => rate >= 0.5 + self.band,
            Relation::Weak => rate <= 0.5 - self.band,
            Relation::Even => (rate - 0.5).abs() <= self.band,
        }
    }
}

// ============================================================================
// Batch execution
// ============================================================================

/// Run the configured matchup `iterations` times and aggregate the results.
///
/// Each run gets its own RNG stream derived from the base seed, so a fixed
/// `random_seed` reproduces the entire batch while runs stay independent and
/// order-insensitive in aggregate.
pub fn run_batch(config: &BatchConfig) -> Result<MatchupResult, String> {
    config.validate()?;
    let template = config.to_combatants()?;

    let base_seed = match config.random_seed {
        Some(seed) => seed,
        None => GameRng::from_entropy().random_u64(),
    };

    info!(
        iterations = config.iterations,
        round_cap = config.round_cap,
        seed = base_seed,
        "batch starting"
    );

    let mut wins_a = 0u32;
    let mut wins_b = 0u32;
    let mut draws = 0u32;
    let mut unresolved = 0u32;
    let mut turn_counts: Vec<u32> = Vec::with_capacity(config.iterations as usize);
    let mut sample_logs: Vec<CombatLog> = Vec::new();

    let mut damage_a = 0.0f64;
    let mut damage_b = 0.0f64;
    let mut healing_a = 0.0f64;
    let mut healing_b = 0.0f64;
    let mut overkill_a = 0.0f64;
    let mut overkill_b = 0.0f64;
    let mut rounds_total = 0u64;

    let mut iterations_run = 0u32;
    for run in 0..config.iterations {
        let mut rng = GameRng::from_seed(base_seed.wrapping_add(run as u64));
        let state = run_encounter(template.clone(), config.round_cap, &mut rng);

        match state.winner {
            Some(Outcome::SideA) => wins_a += 1,
            Some(Outcome::SideB) => wins_b += 1,
            Some(Outcome::Draw) => draws += 1,
            None => unresolved += 1,
        }

        // A capped run's counter sits one past the cap after the final loop
        let rounds = state.round.clamp(1, config.round_cap);
        turn_counts.push(rounds);
        rounds_total += rounds as u64;

        for combatant in &state.combatants {
            match combatant.team {
                Team::A => {
                    damage_a += combatant.damage_dealt as f64;
                    healing_a += combatant.healing_done as f64;
                    overkill_a += combatant.overkill as f64;
                }
                Team::B => {
                    damage_b += combatant.damage_dealt as f64;
                    healing_b += combatant.healing_done as f64;
                    overkill_b += combatant.overkill as f64;
                }
            }
        }

        if (sample_logs.len() as u32) < config.log_samples {
            sample_logs.push(state.log);
        }
        iterations_run += 1;
    }

    let runs = iterations_run.max(1) as f64;
    let rounds_total = rounds_total.max(1) as f64;
    let result = MatchupResult {
        iterations_requested: config.iterations,
        iterations_run,
        wins_a,
        wins_b,
        draws,
        unresolved,
        turn_stats: TurnStats::from_counts(&mut turn_counts),
        side_a: SideAggregate {
            damage_per_turn: (damage_a / rounds_total) as f32,
            healing_done: (healing_a / runs) as f32,
            overkill: (overkill_a / runs) as f32,
        },
        side_b: SideAggregate {
            damage_per_turn: (damage_b / rounds_total) as f32,
            healing_done: (healing_b / runs) as f32,
            overkill: (overkill_b / runs) as f32,
        },
        sample_logs,
        random_seed: Some(base_seed),
    };

    info!(
        wins_a = result.wins_a,
        wins_b = result.wins_b,
        draws = result.draws,
        unresolved = result.unresolved,
        mean_turns = result.turn_stats.mean,
        "batch complete"
    );
    Ok(result)
}
