use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use tracing::{debug, info, warn};

use crate::error::Error;

pub type ObserverResult = Result<(), Box<dyn std::error::Error>>;

pub type EpochObserver = fn(&EpochReport) -> ObserverResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateRule {
    /// Adds `eta * sum(errors)` to every weight component alike.
    #[default]
    SummedError,
    /// The textbook batch rule `weights += eta * data . errors`.
    Delta,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptronConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub update_rule: UpdateRule,
}

impl Default for PerceptronConfig {
    fn default() -> Self {
        PerceptronConfig {
            epochs: 10,
            learning_rate: 1.,
            update_rule: UpdateRule::SummedError,
        }
    }
}

/// State of one epoch, taken before the weights are updated.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub weights: Array1<f64>,
    pub outputs: Array1<f64>,
    pub errors: Array1<f64>,
    pub error_sum: f64,
    pub misclassified: usize,
}

pub fn step(x: f64) -> f64 {
    if x >= 0. {
        1.
    } else {
        0.
    }
}

pub fn predict(weights: &Array1<f64>, data: &Array2<f64>) -> Array1<f64> {
    weights.dot(data).mapv(step)
}

pub fn classification_errors(
    weights: &Array1<f64>,
    data: &Array2<f64>,
    labels: &Array1<f64>,
) -> usize {
    predict(weights, data)
        .iter()
        .zip(labels.iter())
        .filter(|(output, label)| output != label)
        .count()
}

/// Trains from weights drawn uniformly from `[0, 1)`, one per row of `data`.
pub fn perceptron_learning<R, F>(
    rng: &mut R,
    data: &Array2<f64>,
    labels: &Array1<f64>,
    config: &PerceptronConfig,
    observer: Option<F>,
) -> Result<Array1<f64>, Box<dyn std::error::Error>>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochReport) -> ObserverResult,
{
    let uniform = Uniform::new(0f64, 1f64);
    let weights: Array1<f64> = (0..data.nrows()).map(|_| uniform.sample(rng)).collect();

    debug!(?weights, "initial weights");

    train(weights, data, labels, config, observer)
}

/// Runs `config.epochs` epochs starting from `weights` and returns the final
/// weights. The observer sees every epoch before its update is applied; an
/// error from it stops training.
pub fn train<F>(
    mut weights: Array1<f64>,
    data: &Array2<f64>,
    labels: &Array1<f64>,
    config: &PerceptronConfig,
    mut observer: Option<F>,
) -> Result<Array1<f64>, Box<dyn std::error::Error>>
where
    F: FnMut(&EpochReport) -> ObserverResult,
{
    if labels.len() != data.ncols() {
        return Err(Error::dimension_mismatch(data.ncols(), labels.len(), "labels").into());
    }
    if weights.len() != data.nrows() {
        return Err(Error::dimension_mismatch(data.nrows(), weights.len(), "weights").into());
    }
    if !config.learning_rate.is_finite() {
        return Err(Error::invalid_parameter(
            "learning_rate",
            config.learning_rate,
            "a finite number",
        )
        .into());
    }

    let eta = config.learning_rate;

    for epoch in 0..config.epochs {
        let outputs = predict(&weights, data);
        let errors = labels - &outputs;
        let error_sum = errors.sum();
        let misclassified = errors.iter().filter(|&&e| e != 0.).count();

        println!("Epoch {}, error: {}", epoch, error_sum);

        if let Some(ref mut callback) = observer {
            let report = EpochReport {
                epoch,
                weights: weights.clone(),
                outputs,
                errors: errors.clone(),
                error_sum,
                misclassified,
            };

            callback(&report)?;
        }

        match config.update_rule {
            UpdateRule::SummedError => weights += eta * error_sum,
            UpdateRule::Delta => weights.scaled_add(eta, &data.dot(&errors)),
        }

        debug!(epoch, misclassified, ?weights, "weights updated");
    }

    let remaining = classification_errors(&weights, data, labels);
    if remaining == 0 {
        info!(epochs = config.epochs, ?weights, "training finished, all points classified");
    } else {
        warn!(
            epochs = config.epochs,
            misclassified = remaining,
            ?weights,
            "training finished with misclassified points"
        );
    }

    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::{lin_sep, ClassLabels};
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn separable() -> (Array2<f64>, Array1<f64>) {
        let data = array![[1., 2., -1., -2.], [2., 1., -2., -1.]];
        let labels = array![1., 1., 0., 0.];
        (data, labels)
    }

    #[test]
    fn step_is_one_from_zero_up() {
        assert_eq!(step(0.), 1.);
        assert_eq!(step(3.5), 1.);
        assert_eq!(step(-1e-9), 0.);
    }

    #[test]
    fn predict_applies_step_per_column() {
        let (data, _) = separable();
        let outputs = predict(&array![1., 1.], &data);
        assert_eq!(outputs, array![1., 1., 0., 0.]);
    }

    #[test]
    fn delta_rule_reaches_zero_error() {
        let (data, labels) = separable();
        let config = PerceptronConfig {
            epochs: 5,
            update_rule: UpdateRule::Delta,
            ..PerceptronConfig::default()
        };

        let weights = train(array![-1., -1.], &data, &labels, &config, None::<EpochObserver>).unwrap();

        // errors (1, 1, -1, -1) push the weights by (6, 6) after the first epoch
        assert_abs_diff_eq!(weights[0], 5., epsilon = 1e-12);
        assert_abs_diff_eq!(weights[1], 5., epsilon = 1e-12);
        assert_eq!(classification_errors(&weights, &data, &labels), 0);
    }

    #[test]
    fn delta_rule_converges_on_generated_data() {
        let mut rng = StdRng::seed_from_u64(11);
        let points = lin_sep(&mut rng, ClassLabels([1., 0.]), 30).unwrap();
        let config = PerceptronConfig {
            epochs: 200,
            update_rule: UpdateRule::Delta,
            ..PerceptronConfig::default()
        };

        let mut epochs_seen = 0;
        let weights = perceptron_learning(
            &mut rng,
            &points.points,
            &points.labels,
            &config,
            Some(|_: &EpochReport| {
                epochs_seen += 1;
                Ok(())
            }),
        )
        .unwrap();

        let remaining = classification_errors(&weights, &points.points, &points.labels);
        assert_eq!(epochs_seen, 200);
        assert!(remaining <= 1, "still {} misclassified", remaining);
    }

    #[test]
    fn summed_error_moves_every_weight_by_the_error_sum() {
        let data = array![[1., 2.], [2., 1.]];
        let labels = array![1., 1.];
        let config = PerceptronConfig {
            epochs: 1,
            ..PerceptronConfig::default()
        };

        let weights = train(array![-1., -1.], &data, &labels, &config, None::<EpochObserver>).unwrap();

        assert_eq!(weights, array![1., 1.]);
    }

    #[test]
    fn summed_error_is_stuck_when_errors_cancel() {
        let (data, labels) = separable();
        let config = PerceptronConfig {
            epochs: 3,
            update_rule: UpdateRule::SummedError,
            ..PerceptronConfig::default()
        };

        let weights = train(array![-1., -1.], &data, &labels, &config, None::<EpochObserver>).unwrap();

        assert_eq!(weights, array![-1., -1.]);
        assert_eq!(classification_errors(&weights, &data, &labels), 4);
    }

    #[test]
    fn learning_rate_scales_the_update() {
        let data = array![[1.], [1.]];
        let labels = array![1.];
        let config = PerceptronConfig {
            epochs: 1,
            learning_rate: 0.25,
            update_rule: UpdateRule::SummedError,
        };

        let weights = train(array![-1., -1.], &data, &labels, &config, None::<EpochObserver>).unwrap();

        assert_eq!(weights, array![-0.75, -0.75]);
    }

    #[test]
    fn observer_sees_weights_before_each_update() {
        let data = array![[1., 2.], [2., 1.]];
        let labels = array![1., 1.];
        let config = PerceptronConfig {
            epochs: 3,
            ..PerceptronConfig::default()
        };

        let mut reports = Vec::new();
        train(
            array![-1., -1.],
            &data,
            &labels,
            &config,
            Some(|report: &EpochReport| {
                reports.push(report.clone());
                Ok(())
            }),
        )
        .unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].epoch, 0);
        assert_eq!(reports[0].weights, array![-1., -1.]);
        assert_eq!(reports[0].errors, array![1., 1.]);
        assert_eq!(reports[0].error_sum, 2.);
        assert_eq!(reports[0].misclassified, 2);
        assert_eq!(reports[1].weights, array![1., 1.]);
        assert_eq!(reports[1].error_sum, 0.);
        assert_eq!(reports[2].epoch, 2);
    }

    #[test]
    fn observer_error_stops_training() {
        let (data, labels) = separable();
        let mut calls = 0;

        let result = train(
            array![1., 1.],
            &data,
            &labels,
            &PerceptronConfig::default(),
            Some(|_: &EpochReport| {
                calls += 1;
                Err("plot failed".into())
            }),
        );

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_epochs_returns_initial_weights() {
        let (data, labels) = separable();
        let config = PerceptronConfig {
            epochs: 0,
            ..PerceptronConfig::default()
        };

        let weights = train(array![0.3, 0.7], &data, &labels, &config, None::<EpochObserver>).unwrap();

        assert_eq!(weights, array![0.3, 0.7]);
    }

    #[test]
    fn random_initial_weights_lie_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(12);
        let (data, labels) = separable();
        let config = PerceptronConfig {
            epochs: 1,
            ..PerceptronConfig::default()
        };

        let mut initial = None;
        perceptron_learning(
            &mut rng,
            &data,
            &labels,
            &config,
            Some(|report: &EpochReport| {
                initial = Some(report.weights.clone());
                Ok(())
            }),
        )
        .unwrap();

        let initial = initial.unwrap();
        assert_eq!(initial.len(), 2);
        assert!(initial.iter().all(|&w| (0. ..1.).contains(&w)));
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        let (data, _) = separable();
        let labels = array![1., 0.];

        let err = train(
            array![1., 1.],
            &data,
            &labels,
            &PerceptronConfig::default(),
            None::<EpochObserver>,
        )
        .unwrap_err();

        let err = err.downcast_ref::<Error>().unwrap();
        assert_eq!(err, &Error::dimension_mismatch(4, 2, "labels"));
    }

    #[test]
    fn mismatched_weights_are_rejected() {
        let (data, labels) = separable();

        let err = train(
            array![1., 1., 1.],
            &data,
            &labels,
            &PerceptronConfig::default(),
            None::<EpochObserver>,
        )
        .unwrap_err();

        assert!(err.downcast_ref::<Error>().is_some());
    }
}
