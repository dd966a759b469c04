use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use neural_network::{ConvergenceCriteria, Network, NetworkConfig, TrainingSet};
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;
use training::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Inputs and outputs in {0, 1}
    Binary,
    /// Inputs and outputs in {-1, 1}
    Bipolar,
}

impl Mode {
    fn network_config(self) -> NetworkConfig {
        match self {
            Mode::Binary => NetworkConfig::binary_xor(),
            Mode::Bipolar => NetworkConfig::bipolar_xor(),
        }
    }

    fn samples(self) -> neural_network::Result<TrainingSet> {
        match self {
            Mode::Binary => datasets::binary_xor(),
            Mode::Bipolar => datasets::bipolar_xor(),
        }
    }

    fn bounds(self) -> (f64, f64) {
        match self {
            Mode::Binary => (0.0, 1.0),
            Mode::Bipolar => (-1.0, 1.0),
        }
    }
}

#[derive(clap::Parser)]
#[command(name = "xor", about = "Train a small network on the XOR problem", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Train networks on XOR and save the weights of the fastest one
    Train {
        #[arg(long, value_enum, default_value_t = Mode::Bipolar)]
        mode: Mode,
        /// Number of independent trials
        #[arg(long, default_value_t = 100)]
        trials: usize,
        /// Base seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Give up on a trial after this many epochs
        #[arg(long)]
        max_epochs: Option<usize>,
        /// Total error at or below which a trial counts as converged
        #[arg(
            long,
            default_value_t = neural_network::DEFAULT_ACCEPTABLE_ERROR,
            value_parser = parse_acceptable_error
        )]
        acceptable_error: f64,
        /// Run trials in parallel
        #[arg(long)]
        parallel: bool,
        /// Network configuration as JSON, instead of the preset for the mode
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "weights.txt")]
        output: PathBuf,
    },
    /// Load saved weights and print the network's answer for each XOR row
    Evaluate {
        #[arg(long, value_enum, default_value_t = Mode::Bipolar)]
        mode: Mode,
        #[arg(long)]
        weights: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    match args.command {
        Command::Train {
            mode,
            trials,
            seed,
            max_epochs,
            acceptable_error,
            parallel,
            config,
            output,
        } => {
            let criteria = ConvergenceCriteria {
                acceptable_error,
                max_epochs,
                ..ConvergenceCriteria::default()
            };
            let training_config = TrainingConfig {
                trials,
                seed,
                parallel,
                show_progress: true,
                criteria,
            };
            train(mode, config.as_deref(), training_config, &output)
                .context("Failed to train network")?
        }
        Command::Evaluate {
            mode,
            weights,
            config,
        } => evaluate(mode, config.as_deref(), &weights).context("Failed to evaluate network")?,
    }

    Ok(())
}

fn parse_acceptable_error(value: &str) -> std::result::Result<f64, String> {
    let threshold: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if !threshold.is_finite() {
        return Err(format!("{value} is not a finite number"));
    }
    Ok(threshold)
}

fn network_config(mode: Mode, path: Option<&Path>) -> Result<NetworkConfig> {
    let Some(path) = path else {
        return Ok(mode.network_config());
    };

    let config = NetworkConfig::load(path)
        .with_context(|| format!("Failed to read network configuration {}", path.display()))?;
    if config.activation.bounds() != mode.bounds() {
        warn!(
            bounds = ?config.activation.bounds(),
            ?mode,
            "activation range does not match the data encoding"
        );
    }
    Ok(config)
}

fn train(
    mode: Mode,
    config_path: Option<&Path>,
    training_config: TrainingConfig,
    output: &Path,
) -> Result<()> {
    let network_config = network_config(mode, config_path)?;
    let samples = mode.samples()?;

    info!(?mode, trials = training_config.trials, "training");
    let trainer = Trainer::new(network_config, training_config);
    let run = trainer.run(&samples)?;

    println!("\n{}", run.history);

    let Some(network) = run.network else {
        bail!("No trial converged, nothing to save");
    };
    network
        .save(output)
        .with_context(|| format!("Failed to save weights to {}", output.display()))?;
    println!("\nWeights of the fastest trial saved to {}", output.display());

    Ok(())
}

fn evaluate(mode: Mode, config_path: Option<&Path>, weights: &Path) -> Result<()> {
    let mut network = Network::new(network_config(mode, config_path)?)?;
    network
        .load(weights)
        .with_context(|| format!("Failed to load weights from {}", weights.display()))?;

    println!("Input to hidden weights:\n{}", network.weights().input_hidden());
    println!("Hidden to output weights:\n{}", network.weights().hidden_output());

    for (input, output) in evaluation_rows(&mut network, &mode.samples()?)? {
        println!("{input:?} -> {output:?}");
    }

    Ok(())
}

/// Network output for each training input.
fn evaluation_rows(
    network: &mut Network,
    samples: &TrainingSet,
) -> Result<Vec<(Vec<f64>, Vec<f64>)>> {
    samples
        .iter()
        .map(|(input, _)| {
            let output = network.feed_forward(input)?;
            Ok((input.to_vec(), output))
        })
        .collect()
}
