//! Synthetic datasets: gaussian point clouds, a sparse identity pattern and
//! the Mackey-Glass time series.
//!
//! Point sets are laid out as `(2, n)` arrays, row 0 holding the x
//! coordinates and row 1 the y coordinates, so that the weighted sum of a
//! perceptron is `weights.dot(&points)`.

use ndarray::{s, Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::error::{Error, Result};

pub const SPARSE_DIM: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassLabels(pub [f64; 2]);

impl ClassLabels {
    pub fn first(&self) -> f64 {
        self.0[0]
    }

    pub fn second(&self) -> f64 {
        self.0[1]
    }

    pub fn contains(&self, label: f64) -> bool {
        self.0.contains(&label)
    }
}

impl From<[f64; 2]> for ClassLabels {
    fn from(labels: [f64; 2]) -> Self {
        ClassLabels(labels)
    }
}

/// A bivariate normal distribution with diagonal covariance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianClass {
    pub mean: [f64; 2],
    pub variance: [f64; 2],
}

impl GaussianClass {
    pub fn new(mean: [f64; 2], variance: [f64; 2]) -> Self {
        GaussianClass { mean, variance }
    }

    fn axes(&self) -> Result<[Normal<f64>; 2]> {
        let axis = |i: usize| {
            let (mean, variance) = (self.mean[i], self.variance[i]);
            if !mean.is_finite() {
                return Err(Error::invalid_parameter("mean", mean, "a finite number"));
            }
            if !(variance.is_finite() && variance >= 0.) {
                return Err(Error::invalid_parameter(
                    "variance",
                    variance,
                    "a finite, non-negative number",
                ));
            }
            Normal::new(mean, variance.sqrt())
                .map_err(|e| Error::invalid_parameter("variance", variance, e.to_string()))
        };

        Ok([axis(0)?, axis(1)?])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPoints {
    pub points: Array2<f64>,
    pub labels: Array1<f64>,
    pub class_labels: ClassLabels,
}

impl LabeledPoints {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((f64, f64), f64)> + '_ {
        self.points
            .row(0)
            .into_iter()
            .zip(self.points.row(1))
            .zip(self.labels.iter())
            .map(|((&x, &y), &label)| ((x, y), label))
    }
}

/// Two linearly separable gaussian clouds around (1, 1) and (-1, -1).
pub fn lin_sep<R>(rng: &mut R, class_labels: ClassLabels, size: usize) -> Result<LabeledPoints>
where
    R: Rng + ?Sized,
{
    two_gaussian_classes(
        rng,
        class_labels,
        size,
        [
            GaussianClass::new([1., 1.], [0.2, 0.1]),
            GaussianClass::new([-1., -1.], [0.1, 0.2]),
        ],
    )
}

/// Two unit-variance gaussian clouds around caller supplied means. Whether
/// they overlap depends on how far apart the means are.
pub fn non_lin_sep<R>(
    rng: &mut R,
    class_labels: ClassLabels,
    size: usize,
    mean1: [f64; 2],
    mean2: [f64; 2],
) -> Result<LabeledPoints>
where
    R: Rng + ?Sized,
{
    two_gaussian_classes(
        rng,
        class_labels,
        size,
        [
            GaussianClass::new(mean1, [1., 1.]),
            GaussianClass::new(mean2, [1., 1.]),
        ],
    )
}

pub fn two_gaussian_classes<R>(
    rng: &mut R,
    class_labels: ClassLabels,
    size: usize,
    classes: [GaussianClass; 2],
) -> Result<LabeledPoints>
where
    R: Rng + ?Sized,
{
    if size == 0 {
        return Err(Error::invalid_parameter("size", size, "size > 0"));
    }

    let total = 2 * size;
    let mut points = Array2::<f64>::zeros((2, total));
    let mut labels = Array1::<f64>::zeros(total);

    for (class_idx, class) in classes.iter().enumerate() {
        let [x_dist, y_dist] = class.axes()?;
        let label = class_labels.0[class_idx];
        let offset = class_idx * size;

        for i in offset..offset + size {
            points[[0, i]] = x_dist.sample(rng);
            points[[1, i]] = y_dist.sample(rng);
            labels[i] = label;
        }
    }

    let mut order: Vec<usize> = (0..total).collect();
    order.shuffle(rng);

    debug!(size, ?class_labels, "generated two gaussian classes");

    Ok(LabeledPoints {
        points: points.select(Axis(1), &order),
        labels: labels.select(Axis(0), &order),
        class_labels,
    })
}

pub fn sparse_data() -> Array2<f64> {
    let mut data = Array2::from_elem((SPARSE_DIM, SPARSE_DIM), -1.);
    data.diag_mut().fill(1.);
    data
}

/// Constants of the delayed Mackey-Glass recurrence
/// `x[i] = (1 - gamma) x[i-1] + beta x[i-tau] / (1 + x[i-tau]^n)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MackeyGlass {
    pub beta: f64,
    pub gamma: f64,
    pub n: i32,
    pub tau: usize,
}

impl Default for MackeyGlass {
    fn default() -> Self {
        MackeyGlass {
            beta: 0.2,
            gamma: 0.1,
            n: 10,
            tau: 25,
        }
    }
}

impl MackeyGlass {
    /// The first `tau + 1` entries decay exponentially from `x0`, the rest
    /// follow the delayed recurrence. A `length` shorter than the decay
    /// prefix yields the truncated prefix.
    pub fn series(&self, x0: f64, length: usize) -> Result<Array1<f64>> {
        if length == 0 {
            return Err(Error::invalid_parameter("length", length, "length > 0"));
        }
        if self.tau == 0 {
            return Err(Error::invalid_parameter("tau", self.tau, "tau > 0"));
        }

        let decay = 1. - self.gamma;
        let mut x = Array1::<f64>::zeros(length);
        x[0] = x0;

        let prefix_end = (self.tau + 1).min(length);
        for i in 1..prefix_end {
            x[i] = decay * x[i - 1];
        }

        for i in prefix_end..length {
            let delayed = x[i - self.tau];
            let denominator = 1. + delayed.powi(self.n);
            if denominator == 0. {
                return Err(Error::invalid_parameter(
                    "x0",
                    x0,
                    format!("1 + x^{} != 0 along the series (step {})", self.n, i),
                ));
            }
            x[i] = decay * x[i - 1] + self.beta * delayed / denominator;
        }

        debug!(x0, length, tail = ?x.slice(s![length.saturating_sub(3)..]), "mackey-glass series");

        Ok(x)
    }
}

pub fn mackey_glass(x0: f64, length: usize) -> Result<Array1<f64>> {
    MackeyGlass::default().series(x0, length)
}
