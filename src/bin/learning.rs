use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use perceptron_toys::datasets::ClassLabels;
use perceptron_toys::perceptron::{PerceptronConfig, UpdateRule};
use perceptron_toys::pipeline::{run_learning, LearningConfig};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Rule {
    /// Add the summed error to every weight
    SummedError,
    /// weights += eta * data . errors
    Delta,
}

impl From<Rule> for UpdateRule {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::SummedError => UpdateRule::SummedError,
            Rule::Delta => UpdateRule::Delta,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Points per class.
    #[arg(long, default_value_t = 100)]
    size: usize,

    #[arg(long, default_value_t = 10)]
    epochs: usize,

    #[arg(long, default_value_t = 1.0)]
    learning_rate: f64,

    #[arg(long, value_enum, default_value = "summed-error")]
    update_rule: Rule,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "plots")]
    plots_dir: PathBuf,

    /// Only plot the final weights.
    #[arg(long)]
    final_only: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    perceptron_toys::init_logging();

    let args = Args::parse();

    let config = LearningConfig {
        size: args.size,
        class_labels: ClassLabels([1., 0.]),
        perceptron: PerceptronConfig {
            epochs: args.epochs,
            learning_rate: args.learning_rate,
            update_rule: args.update_rule.into(),
        },
        seed: args.seed,
        plots_dir: args.plots_dir,
        plot_epochs: !args.final_only,
    };

    let outcome = run_learning(&config)?;

    println!(
        "final weights: {}, misclassified: {}",
        outcome.weights, outcome.misclassified
    );
    for plot in &outcome.plots {
        println!("plot written to {}", plot.display());
    }

    Ok(())
}
