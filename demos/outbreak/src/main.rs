//! outbreak — smallest runnable scenario for the epi engine.
//!
//! Simulates a 2,000-agent SEIRD outbreak on a 50×50 world with random-walk
//! mixing, a masking intervention from tick 40, and pathogen variants.
//! Writes the compartment series, transition log, and variant frequencies to
//! `output/outbreak/` as CSV.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use epi_core::Tick;
use epi_disease::{DurationDistribution, ProgressionModel, TransmissionModel};
use epi_movement::RandomWalk;
use epi_output::{export, CsvWriter, OutputWriter};
use epi_policy::{Masking, PolicySchedule};
use epi_sim::{SimBuilder, SimConfig, SimObserver, SpaceConfig, StateFractions, TickSnapshot, VariantConfig};

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT: usize = 2_000;
const SEED: u64 = 42;
const MAX_TICKS: u64 = 365;
const MASKING_START: u64 = 40;
const PROGRESS_INTERVAL: u64 = 25;

// ── Progress observer ─────────────────────────────────────────────────────────

struct ProgressPrinter;

impl SimObserver for ProgressPrinter {
    fn on_tick_end(&mut self, tick: Tick, snap: &TickSnapshot) {
        if tick.0 % PROGRESS_INTERVAL == 0 {
            println!(
                "{tick}: {} active, {} recovered, {} dead",
                snap.counts.active_infections(),
                snap.counts.recovered,
                snap.counts.dead,
            );
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== outbreak — epi engine demo ===");
    println!("Agents: {AGENT_COUNT}  |  Max ticks: {MAX_TICKS}  |  Seed: {SEED}");
    println!();

    // 1. Configuration: 5 index cases on a 50×50 world, contact radius 1.
    let config = SimConfig {
        population: AGENT_COUNT,
        initial: StateFractions::seeded(5.0 / AGENT_COUNT as f64),
        space: SpaceConfig::Grid { width: 50.0, height: 50.0, contact_radius: 1.0 },
        transmission: TransmissionModel { base_infection_prob: 0.15 },
        progression: ProgressionModel {
            exposed_duration: DurationDistribution::LogNormal { median: 3.0, sigma: 0.5 },
            infectious_duration: DurationDistribution::Uniform { min: 4, max: 9 },
            fatality_prob: 0.02,
            gain_resistance_prob: 0.001,
        },
        variants: Some(VariantConfig { genome_bits: 8, mutation_prob: 0.02 }),
        max_ticks: MAX_TICKS,
        seed: SEED,
        record_transitions: true,
        remove_dead: true,
        halt_prevalence: None,
    };

    // 2. Masking at 60% effectiveness from tick 40 onward.
    let policies = PolicySchedule::new().with(
        Box::new(Masking { factor: 0.4 }),
        Tick(MASKING_START),
        None,
    );

    // 3. Build and run.
    let mut sim = SimBuilder::new(config, RandomWalk { step: 0.8 })
        .policies(policies)
        .build()?;

    let t0 = Instant::now();
    let report = sim.run(&mut ProgressPrinter)?;
    let elapsed = t0.elapsed();

    // 4. Project the recorded series to CSV.  Variant rows resolve their
    //    labels from the registry, which is only complete once the run ends.
    std::fs::create_dir_all("output/outbreak")?;
    let mut writer = CsvWriter::new(Path::new("output/outbreak"))?;
    export::write_metrics(&mut writer, sim.metrics())?;
    if let Some(registry) = sim.variants() {
        export::write_variant_series(&mut writer, sim.series(), registry)?;
        println!();
        println!("Variants observed: {}", registry.len());
    }
    writer.finish()?;

    // 5. Summary.
    println!(
        "Run ended: {:?} at {} in {:.3} s",
        report.outcome,
        report.final_tick,
        elapsed.as_secs_f64()
    );
    println!();
    println!("{:<14} {:>8}", "State", "Count");
    println!("{}", "-".repeat(24));
    let counts = sim.counts();
    for (label, count) in [
        ("susceptible", counts.susceptible),
        ("exposed", counts.exposed),
        ("infectious", counts.infectious),
        ("recovered", counts.recovered),
        ("dead", counts.dead),
    ] {
        println!("{label:<14} {count:>8}");
    }
    println!();
    let peak = sim
        .series()
        .iter()
        .map(|s| s.counts.active_infections())
        .max()
        .unwrap_or(0);
    println!("Peak active infections: {peak}");
    println!("Output written to output/outbreak/");

    Ok(())
}
