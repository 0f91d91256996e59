use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use perceptron_toys::datasets::ClassLabels;
use perceptron_toys::pipeline::{run_datageneration, DataGenerationConfig, DatasetKind};

fn parse_pair(s: &str) -> Result<[f64; 2], String> {
    match s.split(',').map(str::trim).collect::<Vec<_>>().as_slice() {
        [a, b] => {
            let a = a.parse::<f64>().map_err(|e| format!("{a}: {e}"))?;
            let b = b.parse::<f64>().map_err(|e| format!("{b}: {e}"))?;
            Ok([a, b])
        }
        _ => Err(format!("expected two comma separated numbers, got '{s}'")),
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dataset {
    LinSep,
    NonLinSep,
    Sparse,
    MackeyGlass,
}

impl From<Dataset> for DatasetKind {
    fn from(dataset: Dataset) -> Self {
        match dataset {
            Dataset::LinSep => DatasetKind::LinSep,
            Dataset::NonLinSep => DatasetKind::NonLinSep,
            Dataset::Sparse => DatasetKind::Sparse,
            Dataset::MackeyGlass => DatasetKind::MackeyGlass,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, value_enum, default_value = "lin-sep")]
    dataset: Dataset,

    /// Points per class.
    #[arg(long, default_value_t = 100)]
    size: usize,

    /// Class labels, the first drawn blue and the second red.
    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true, default_value = "1,-1")]
    labels: [f64; 2],

    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true, default_value = "0.5,0.5")]
    mean1: [f64; 2],

    #[arg(long, value_parser = parse_pair, allow_hyphen_values = true, default_value = "-0.5,-0.5")]
    mean2: [f64; 2],

    /// Seed of the Mackey-Glass series.
    #[arg(long, allow_hyphen_values = true, default_value_t = 1.2)]
    x0: f64,

    #[arg(long, default_value_t = 1000)]
    length: usize,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    perceptron_toys::init_logging();

    let args = Args::parse();

    let config = DataGenerationConfig {
        dataset: args.dataset.into(),
        size: args.size,
        class_labels: ClassLabels(args.labels),
        mean1: args.mean1,
        mean2: args.mean2,
        x0: args.x0,
        length: args.length,
        seed: args.seed,
        output: args.output,
    };

    let output = run_datageneration(&config)?;

    println!("plot written to {}", output.display());

    Ok(())
}
