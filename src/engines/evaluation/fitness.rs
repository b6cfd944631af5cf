use crate::data::{Dataset, EvalType, Example};
use crate::engines::execution::Executor;
use crate::error::Result;
use crate::instructions::Algorithm;
use crate::memory::MemoryLayout;
use crate::types::{RandomSeedT, Scalar, MAX_FITNESS, MIN_FITNESS};
use std::f64::consts::FRAC_2_PI;

/// Predictions whose error exceeds this are treated as diverged.
pub const DEFAULT_MAX_ABS_ERROR: f64 = 100.0;

/// Full evaluation of a candidate on a task.
///
/// Implementations must be deterministic in `(algorithm, dataset, layout,
/// seed)` and should return a value in `[0, 1]`; the evaluator rejects
/// anything else.
pub trait FitnessFunction<const F: usize>: Send + Sync {
    fn fitness(
        &self,
        algorithm: &Algorithm,
        dataset: &Dataset<F>,
        layout: &MemoryLayout,
        seed: RandomSeedT,
    ) -> Result<f64>;
}

/// Runs setup, one learning pass over `train`, then predicts every example
/// of `valid`.
pub fn train_and_predict<const F: usize>(
    algorithm: &Algorithm,
    layout: &MemoryLayout,
    seed: RandomSeedT,
    train: &[Example<F>],
    valid: &[Example<F>],
) -> Result<Vec<Scalar>> {
    let mut executor = Executor::<F>::new(algorithm, layout, seed)?;
    executor.run_setup();
    for example in train {
        executor.predict(&example.features);
        executor.learn(example.label);
    }
    Ok(valid.iter().map(|example| executor.predict(&example.features)).collect())
}

/// The standard scorer: train on the training split, score the validation split.
#[derive(Debug, Clone, Copy)]
pub struct TrainAndValidate {
    pub max_abs_error: f64,
}

impl TrainAndValidate {
    pub fn new(max_abs_error: f64) -> Self {
        Self { max_abs_error }
    }

    pub fn score<const F: usize>(&self, eval_type: EvalType, predictions: &[Scalar], valid: &[Example<F>]) -> f64 {
        if predictions.is_empty() {
            return MIN_FITNESS;
        }
        let diverged = predictions
            .iter()
            .zip(valid)
            .any(|(p, e)| !p.is_finite() || (p - e.label).abs() > self.max_abs_error);
        if diverged {
            return MIN_FITNESS;
        }

        let count = predictions.len() as f64;
        let fitness = match eval_type {
            EvalType::RmsError => {
                let squared: f64 = predictions.iter().zip(valid).map(|(p, e)| (p - e.label).powi(2)).sum();
                let rmse = (squared / count).sqrt();
                MAX_FITNESS - FRAC_2_PI * rmse.atan()
            }
            EvalType::Accuracy => {
                let correct = predictions
                    .iter()
                    .zip(valid)
                    .filter(|(p, e)| (**p > 0.0) == (e.label > 0.5))
                    .count();
                correct as f64 / count
            }
        };
        fitness.clamp(MIN_FITNESS, MAX_FITNESS)
    }
}

impl Default for TrainAndValidate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ABS_ERROR)
    }
}

impl<const F: usize> FitnessFunction<F> for TrainAndValidate {
    fn fitness(
        &self,
        algorithm: &Algorithm,
        dataset: &Dataset<F>,
        layout: &MemoryLayout,
        seed: RandomSeedT,
    ) -> Result<f64> {
        let predictions = train_and_predict(algorithm, layout, seed, &dataset.train, &dataset.valid)?;
        Ok(self.score(dataset.eval_type, &predictions, &dataset.valid))
    }
}
