use std::fs;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};
use plotters::coord::Shift;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::datasets::{lin_sep, mackey_glass, non_lin_sep, sparse_data, ClassLabels, LabeledPoints};
use crate::error::Error;
use crate::perceptron::{classification_errors, perceptron_learning, EpochReport, PerceptronConfig};
use crate::plots::{
    boundary_slope, plot_boundary, plot_labeled_points, plot_sparse_pattern, plot_time_series,
};

const PLOT_SIZE: (u32, u32) = (800, 600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    LinSep,
    NonLinSep,
    Sparse,
    MackeyGlass,
}

impl DatasetKind {
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::LinSep => "lin_sep",
            DatasetKind::NonLinSep => "non_lin_sep",
            DatasetKind::Sparse => "sparse",
            DatasetKind::MackeyGlass => "mackey_glass",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataGenerationConfig {
    pub dataset: DatasetKind,
    pub size: usize,
    pub class_labels: ClassLabels,
    pub mean1: [f64; 2],
    pub mean2: [f64; 2],
    pub x0: f64,
    pub length: usize,
    pub seed: Option<u64>,
    /// Defaults to `plots/<dataset>.svg`.
    pub output: Option<PathBuf>,
}

impl Default for DataGenerationConfig {
    fn default() -> Self {
        DataGenerationConfig {
            dataset: DatasetKind::LinSep,
            size: 100,
            class_labels: ClassLabels([1., -1.]),
            mean1: [0.5, 0.5],
            mean2: [-0.5, -0.5],
            x0: 1.2,
            length: 1000,
            seed: None,
            output: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearningConfig {
    pub size: usize,
    pub class_labels: ClassLabels,
    pub perceptron: PerceptronConfig,
    pub seed: Option<u64>,
    pub plots_dir: PathBuf,
    /// Write one boundary plot per epoch in addition to the final one.
    pub plot_epochs: bool,
}

impl Default for LearningConfig {
    fn default() -> Self {
        LearningConfig {
            size: 100,
            class_labels: ClassLabels([1., 0.]),
            perceptron: PerceptronConfig::default(),
            seed: None,
            plots_dir: PathBuf::from("plots"),
            plot_epochs: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearningOutcome {
    pub weights: Array1<f64>,
    pub misclassified: usize,
    pub plots: Vec<PathBuf>,
}

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

enum Generated {
    Points(LabeledPoints, &'static str),
    Pattern(Array2<f64>),
    Series(Array1<f64>),
}

fn generate(config: &DataGenerationConfig, rng: &mut StdRng) -> crate::Result<Generated> {
    let generated = match config.dataset {
        DatasetKind::LinSep => {
            let data = lin_sep(rng, config.class_labels, config.size)?;
            info!(points = data.len(), "generated linearly separable data");
            Generated::Points(data, "Linearly separable classes")
        }
        DatasetKind::NonLinSep => {
            let data = non_lin_sep(rng, config.class_labels, config.size, config.mean1, config.mean2)?;
            info!(points = data.len(), mean1 = ?config.mean1, mean2 = ?config.mean2, "generated overlapping classes");
            Generated::Points(data, "Non-linearly separable classes")
        }
        DatasetKind::Sparse => {
            let data = sparse_data();
            info!(shape = ?data.dim(), "generated sparse pattern");
            Generated::Pattern(data)
        }
        DatasetKind::MackeyGlass => {
            let series = mackey_glass(config.x0, config.length)?;
            info!(length = series.len(), x0 = config.x0, "generated mackey-glass series");
            Generated::Series(series)
        }
    };

    Ok(generated)
}

/// Renders into an SVG file at `path`. A failed drawing leaves no file behind.
fn write_svg<F>(path: &Path, draw: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&DrawingArea<SVGBackend, Shift>) -> Result<(), Box<dyn std::error::Error>>,
{
    let drawing_area = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    let result = draw(&drawing_area).and_then(|()| Ok(drawing_area.present()?));
    // the backend writes whatever it holds when dropped
    drop(drawing_area);

    if result.is_err() {
        let _ = fs::remove_file(path);
    }

    result
}

/// Generates the configured dataset and writes its plot, returning the
/// path of the written file.
pub fn run_datageneration(config: &DataGenerationConfig) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let output = config
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("plots/{}.svg", config.dataset.name())));

    let mut rng = make_rng(config.seed);
    let generated = generate(config, &mut rng)?;

    ensure_parent(&output)?;
    write_svg(&output, |drawing_area| match &generated {
        Generated::Points(data, caption) => plot_labeled_points(data, caption, drawing_area),
        Generated::Pattern(data) => plot_sparse_pattern(data, "Sparse pattern", drawing_area),
        Generated::Series(series) => plot_time_series(series, "Mackey-Glass", drawing_area),
    })?;

    Ok(output)
}

/// Writes a boundary plot, skipping weights that have no boundary line.
/// Returns whether a file was written.
fn write_boundary_plot(
    path: &Path,
    data: &LabeledPoints,
    weights: &Array1<f64>,
    caption: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    if let Err(e @ Error::DegenerateBoundary { .. }) = boundary_slope(weights) {
        warn!(error = %e, "skipping plot {}", path.display());
        return Ok(false);
    }

    write_svg(path, |drawing_area| plot_boundary(data, weights, caption, drawing_area))?;

    Ok(true)
}

/// Trains a perceptron on linearly separable data, plotting the boundary
/// after every epoch and once more for the final weights.
pub fn run_learning(config: &LearningConfig) -> Result<LearningOutcome, Box<dyn std::error::Error>> {
    fs::create_dir_all(&config.plots_dir)?;

    let mut rng = make_rng(config.seed);
    let data = lin_sep(&mut rng, config.class_labels, config.size)?;

    info!(
        points = data.len(),
        epochs = config.perceptron.epochs,
        rule = ?config.perceptron.update_rule,
        "training perceptron"
    );

    let mut plots = Vec::new();

    let epoch_observer = |report: &EpochReport| -> Result<(), Box<dyn std::error::Error>> {
        let path = config
            .plots_dir
            .join(format!("perceptron_epoch_{}.svg", report.epoch));
        let caption = format!("Epoch {}, error: {}", report.epoch, report.error_sum);

        if write_boundary_plot(&path, &data, &report.weights, &caption)? {
            plots.push(path);
        }

        Ok(())
    };

    let weights = perceptron_learning(
        &mut rng,
        &data.points,
        &data.labels,
        &config.perceptron,
        config.plot_epochs.then_some(epoch_observer),
    )?;

    let misclassified = classification_errors(&weights, &data.points, &data.labels);

    let final_path = config.plots_dir.join("perceptron_final.svg");
    let caption = format!("Final weights, misclassified: {}", misclassified);
    if write_boundary_plot(&final_path, &data, &weights, &caption)? {
        plots.push(final_path);
    }

    Ok(LearningOutcome {
        weights,
        misclassified,
        plots,
    })
}
