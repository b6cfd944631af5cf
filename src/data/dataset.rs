use crate::error::Result;
use crate::memory::Vector;
use crate::types::{RandomSeedT, Scalar};
use crate::utils::{custom_hash_mix, derive_seed, ensure_non_empty, ensure_positive, f64_key, safe_cast};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// How validation predictions turn into a fitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvalType {
    /// Fitness `1 - (2/pi) * atan(rmse)`.
    RmsError,
    /// Labels in {0, 1}; a prediction above zero means 1.
    Accuracy,
}

impl EvalType {
    fn code(self) -> u64 {
        match self {
            EvalType::RmsError => 1,
            EvalType::Accuracy => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Example<const F: usize> {
    pub features: Vector<F>,
    pub label: Scalar,
}

/// A fixed evaluation task: training and validation examples of dimension `F`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<const F: usize> {
    pub train: Vec<Example<F>>,
    pub valid: Vec<Example<F>>,
    pub eval_type: EvalType,
}

impl<const F: usize> Dataset<F> {
    pub fn new(train: Vec<Example<F>>, valid: Vec<Example<F>>, eval_type: EvalType) -> Result<Self> {
        ensure_non_empty(&train, "training examples")?;
        ensure_non_empty(&valid, "validation examples")?;
        Ok(Self {
            train,
            valid,
            eval_type,
        })
    }

    /// Content digest. Any change to an example, the split or `F` changes it.
    pub fn digest(&self) -> Result<RandomSeedT> {
        let mut numbers: Vec<u64> = vec![
            safe_cast(F)?,
            self.eval_type.code(),
            safe_cast(self.train.len())?,
            safe_cast(self.valid.len())?,
        ];
        for example in self.train.iter().chain(self.valid.iter()) {
            numbers.extend(example.features.as_slice().iter().map(|&x| f64_key(x)));
            numbers.push(f64_key(example.label));
        }
        custom_hash_mix(&numbers)
    }

    /// `label = w . x` with gaussian `w` and `x`, one `w` per task seed.
    pub fn scalar_linear_regression(seed: RandomSeedT, num_train: usize, num_valid: usize) -> Result<Self> {
        Self::generate(seed, num_train, num_valid, EvalType::RmsError, |dot| dot)
    }

    /// `label = 1` when `w . x > 0`, else `0`.
    pub fn linear_classification(seed: RandomSeedT, num_train: usize, num_valid: usize) -> Result<Self> {
        Self::generate(seed, num_train, num_valid, EvalType::Accuracy, |dot| {
            if dot > 0.0 {
                1.0
            } else {
                0.0
            }
        })
    }

    fn generate(
        seed: RandomSeedT,
        num_train: usize,
        num_valid: usize,
        eval_type: EvalType,
        label_of: impl Fn(Scalar) -> Scalar,
    ) -> Result<Self> {
        ensure_positive(num_train, "num_train")?;
        ensure_positive(num_valid, "num_valid")?;
        let mut weight_rng = StdRng::seed_from_u64(derive_seed(seed, 0));
        let weights = Vector::<F>(std::array::from_fn(|_| weight_rng.sample(StandardNormal)));

        let mut data_rng = StdRng::seed_from_u64(derive_seed(seed, 1));
        let mut sample = |count: usize| -> Vec<Example<F>> {
            (0..count)
                .map(|_| {
                    let features = Vector::<F>(std::array::from_fn(|_| data_rng.sample(StandardNormal)));
                    Example {
                        label: label_of(weights.dot(&features)),
                        features,
                    }
                })
                .collect()
        };
        let train = sample(num_train);
        let valid = sample(num_valid);
        Self::new(train, valid, eval_type)
    }
}
