//! spellbench entry point
//!
//! Thin dispatch over the CLI subcommands; all real work lives in the
//! library modules.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use spellbench::balance::config::BALANCE_CONFIG_PATH;
use spellbench::balance::{balance_report, BalanceConfig};
use spellbench::cli::{self, Command};
use spellbench::combat::log::MatchMetadata;
use spellbench::combat::{run_encounter, Outcome, Team};
use spellbench::rng::GameRng;
use spellbench::sim::{run_batch, BatchConfig};
use spellbench::spell::Spell;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = cli::parse_args();
    let result = match args.command {
        Command::Report {
            spells,
            config,
            output,
        } => report_command(&spells, config.as_deref(), output.as_deref()),
        Command::Duel {
            config,
            seed,
            output,
        } => duel_command(&config, seed, output.as_deref()),
        Command::Batch {
            config,
            iterations,
            seed,
            output,
        } => batch_command(&config, iterations, seed, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_spells(path: &Path) -> Result<Vec<Spell>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read spell file: {}", e))?;
    let spells: Vec<Spell> =
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

    for spell in &spells {
        for issue in spell.validate() {
            warn!(spell = %spell.id, field = issue.field, "{}", issue.message);
        }
    }
    Ok(spells)
}

fn report_command(
    spells_path: &Path,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), String> {
    let spells = load_spells(spells_path)?;
    let config = match config_path {
        Some(path) => BalanceConfig::load_from_file(path)?,
        None => BalanceConfig::load_or_default(Path::new(BALANCE_CONFIG_PATH)),
    };

    let entries = balance_report(&spells, &config);

    if let Some(path) = output {
        let contents = serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        std::fs::write(path, contents)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        println!("Report written to {}", path.display());
        return Ok(());
    }

    println!(
        "{:<20} {:<10} {:>8} {:>8} {:>12} {:>9}",
        "spell", "tier", "power", "cost", "recommended", "balanced"
    );
    for entry in &entries {
        let current = entry
            .current_cost
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:<10} {:>8.1} {:>8} {:>12} {:>9}",
            entry.id,
            entry.tier.name(),
            entry.breakdown.total_power,
            current,
            entry.recommended_cost,
            if entry.balanced { "yes" } else { "no" }
        );
    }
    Ok(())
}

fn duel_command(config_path: &Path, seed: Option<u64>, output: Option<&Path>) -> Result<(), String> {
    let config = BatchConfig::load_from_file(config_path)?;
    let combatants = config.to_combatants()?;

    let seed = seed.or(config.random_seed);
    let mut rng = match seed {
        Some(seed) => GameRng::from_seed(seed),
        None => GameRng::from_entropy(),
    };

    let state = run_encounter(combatants, config.round_cap, &mut rng);

    for entry in &state.log.entries {
        println!("[round {:>3}] {}", entry.round, entry.message);
    }
    match state.winner {
        Some(Outcome::SideA) => println!("Winner: Side A"),
        Some(Outcome::SideB) => println!("Winner: Side B"),
        Some(Outcome::Draw) => println!("Result: draw"),
        None => println!("Result: unresolved (round cap reached)"),
    }

    if let Some(path) = output {
        let metadata = MatchMetadata {
            winner: state.winner,
            rounds: state.round,
            side_a: config.side_names(Team::A),
            side_b: config.side_names(Team::B),
            random_seed: seed,
        };
        state.log.save_to_file(&metadata, path)?;
        println!("Log saved to {}", path.display());
    }
    Ok(())
}

fn batch_command(
    config_path: &Path,
    iterations: Option<u32>,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<(), String> {
    let mut config = BatchConfig::load_from_file(config_path)?;
    if let Some(iterations) = iterations {
        config.iterations = iterations;
    }
    if let Some(seed) = seed {
        config.random_seed = Some(seed);
    }
    if let Some(output) = output {
        config.output_path = Some(output.display().to_string());
    }

    let result = run_batch(&config)?;

    println!(
        "Ran {}/{} iterations (seed: {})",
        result.iterations_run,
        result.iterations_requested,
        result
            .random_seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Side A: {} wins ({:.1}%)   Side B: {} wins ({:.1}%)   draws: {}   unresolved: {}",
        result.wins_a,
        result.win_rate_a() * 100.0,
        result.wins_b,
        result.win_rate_b() * 100.0,
        result.draws,
        result.unresolved
    );
    println!(
        "Rounds: mean {:.1}, median {:.1}, min {}, max {}",
        result.turn_stats.mean,
        result.turn_stats.median,
        result.turn_stats.min,
        result.turn_stats.max
    );
    println!(
        "Damage/turn: A {:.1}, B {:.1}   Overkill: A {:.1}, B {:.1}",
        result.side_a.damage_per_turn,
        result.side_b.damage_per_turn,
        result.side_a.overkill,
        result.side_b.overkill
    );

    if let Some(expectation) = config.expectation {
        let verdict = if expectation.is_satisfied(&result) {
            "holds"
        } else {
            "VIOLATED"
        };
        println!(
            "Expectation {:?} (band {:.0}%): {}",
            expectation.relation,
            expectation.band * 100.0,
            verdict
        );
    }

    if let Some(path) = &config.output_path {
        result.save_to_file(Path::new(path))?;
        println!("Result saved to {}", path);
    }
    Ok(())
}
