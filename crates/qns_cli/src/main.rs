//! CLI driver: sweeps circuit depth for a target function, running
//! independent `(mu, lambda)` search replicates in parallel at each depth
//! and carrying the best circuit forward as the next depth's seed.

mod render;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use qns_core::config::RunConfig;
use qns_core::target::{self, TargetFunction};
use qns_rewire::Optimizer;
use qns_simulator::Circuit;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Synthesizes a reversible circuit approximating a target Boolean function.
#[derive(Parser, Debug)]
#[command(name = "qns", version, about)]
struct Cli {
    /// Path the final circuit (one entry per swept depth) is written to.
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Target function name, e.g. `2of5`, `Xor5`, `NthPrime3`.
    #[arg(short = 'f', long = "function")]
    function: String,

    /// Wire count `l`.
    #[arg(short = 'l', long = "num_lines")]
    num_lines: usize,

    /// First depth in the sweep.
    #[arg(short = 'd', long = "min_num_gates")]
    min_num_gates: usize,

    /// Last depth in the sweep (inclusive).
    #[arg(short = 'D', long = "max_num_gates")]
    max_num_gates: usize,

    /// Depth increment between sweep steps.
    #[arg(short = 'i', long = "num_gates_increment")]
    num_gates_increment: usize,

    /// Survivor families per generation, `S`.
    #[arg(short = 'S', long = "num_survivors")]
    num_survivors: usize,

    /// Offspring per survivor family, `F`.
    #[arg(short = 'F', long = "num_offspring")]
    num_offspring: usize,

    /// Evaluation batch size per generation, `b`.
    #[arg(short = 'b', long = "batch_size")]
    batch_size: usize,

    /// Independent replicates run per depth, `N`.
    #[arg(short = 'n', long = "optimizations_per_circuit")]
    optimizations_per_circuit: usize,

    /// RNG seed; replicate `t` uses `seed + t`.
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = RunConfig {
        function: cli.function.clone(),
        num_lines: cli.num_lines,
        min_num_gates: cli.min_num_gates,
        max_num_gates: cli.max_num_gates,
        num_gates_increment: cli.num_gates_increment,
        num_survivors: cli.num_survivors,
        num_offspring: cli.num_offspring,
        batch_size: cli.batch_size,
        optimizations_per_circuit: cli.optimizations_per_circuit,
        seed: cli.seed,
    };
    config.validate().map_err(|msg| anyhow!(msg))?;

    let f = target::by_name(&cli.function)
        .ok_or_else(|| anyhow!("unknown target function '{}'", cli.function))?;

    if cli.num_lines < f.input_size().max(f.output_size()) {
        return Err(anyhow!(
            "--num_lines={} is too small for '{}' (needs at least {} wires)",
            cli.num_lines,
            cli.function,
            f.input_size().max(f.output_size())
        ));
    }

    let mut out_file =
        File::create(&cli.output).with_context(|| format!("creating {}", cli.output.display()))?;

    let mut carry: Option<Circuit> = None;
    let mut d = cli.min_num_gates;

    while d <= cli.max_num_gates {
        info!(depth = d, lines = cli.num_lines, function = %cli.function, "searching");

        let generations = 100 * d;
        let results: Vec<(Circuit, qns_simulator::ErrorMetrics)> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..cli.optimizations_per_circuit)
                .map(|t| {
                    let seed = cli.seed + t as u64;
                    let carry = carry.as_ref();
                    scope.spawn(move || {
                        let mut rng = StdRng::seed_from_u64(seed);
                        let mut optimizer = Optimizer::new(
                            f,
                            cli.num_lines,
                            d,
                            cli.num_survivors,
                            cli.num_offspring,
                            &mut rng,
                        );
                        if let Some(seed_circuit) = carry {
                            optimizer.seed_population(seed_circuit);
                        }
                        optimizer.optimize(&mut rng, generations, 0.5, cli.batch_size);
                        let best = optimizer.compute_best();
                        let metrics = best.errors(f);
                        (best, metrics)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("optimizer thread panicked")).collect()
        });

        let (best, metrics) = results
            .into_iter()
            .min_by(|a, b| a.1.e.partial_cmp(&b.1.e).expect("error rate is never NaN"))
            .expect("optimizations_per_circuit >= 1 guarantees at least one result");

        let simplified = best.simplify(f.output_size());

        println!("{}", render::diagram(&best));
        println!();
        println!("{}", render::diagram(&simplified));
        println!(
            "{} {} {} {} {}",
            cli.num_lines, d, metrics.e, metrics.false_negative, metrics.false_positive
        );

        best.serialize(&mut out_file)?;
        writeln!(
            out_file,
            "{} {} {} {} {} {}",
            cli.num_lines,
            d,
            metrics.e,
            metrics.false_negative,
            metrics.false_positive,
            simplified.quantum_cost()
        )?;

        let mut next = best;
        next.extend(cli.num_gates_increment);
        carry = Some(next);

        d += cli.num_gates_increment;
    }

    Ok(())
}
