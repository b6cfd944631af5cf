use super::fitness::train_and_predict;
use crate::data::Dataset;
use crate::error::Result;
use crate::instructions::Algorithm;
use crate::memory::MemoryLayout;
use crate::types::{Fingerprint, RandomSeedT, TaskSignature};
use crate::utils::{custom_hash_mix, ensure_non_empty, f64_key, safe_cast};
use serde::{Deserialize, Serialize};

/// Leading train and valid examples used to fingerprint a candidate's behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FecConfig {
    /// Leading training examples the candidate learns from before probing.
    pub num_train_examples: usize,
    /// Leading validation examples whose errors are hashed.
    pub num_valid_examples: usize,
    /// Errors are rounded to this many decimal digits before hashing.
    pub quantization_digits: u32,
}

impl Default for FecConfig {
    fn default() -> Self {
        Self {
            num_train_examples: 10,
            num_valid_examples: 10,
            quantization_digits: 6,
        }
    }
}

/// Hashes the quantized errors of `algorithm` on `dataset`.
pub fn fingerprint<const F: usize>(
    algorithm: &Algorithm,
    dataset: &Dataset<F>,
    layout: &MemoryLayout,
    fec: &FecConfig,
    seed: RandomSeedT,
) -> Result<Fingerprint> {
    let train = &dataset.train[..fec.num_train_examples.min(dataset.train.len())];
    let valid = &dataset.valid[..fec.num_valid_examples.min(dataset.valid.len())];
    ensure_non_empty(valid, "fingerprint validation examples")?;

    let predictions = train_and_predict(algorithm, layout, seed, train, valid)?;
    let scale = 10_f64.powi(safe_cast(fec.quantization_digits)?);

    let mut numbers: Vec<u64> = Vec::with_capacity(predictions.len() + 1);
    numbers.push(safe_cast(predictions.len())?);
    for (prediction, example) in predictions.iter().zip(valid) {
        let quantized = ((prediction - example.label) * scale).round();
        numbers.push(f64_key(if quantized.is_finite() { quantized } else { f64::NAN }));
    }
    Ok(Fingerprint(custom_hash_mix(&numbers)?))
}

/// Everything a fingerprint's meaning depends on besides the candidate.
pub fn task_signature<const F: usize>(
    dataset: &Dataset<F>,
    layout: &MemoryLayout,
    fec: &FecConfig,
    seed: RandomSeedT,
) -> Result<TaskSignature> {
    let numbers: [u64; 9] = [
        dataset.digest()?,
        safe_cast(F)?,
        u64::from(layout.scalar_addresses),
        u64::from(layout.vector_addresses),
        u64::from(layout.matrix_addresses),
        safe_cast(fec.num_train_examples)?,
        safe_cast(fec.num_valid_examples)?,
        u64::from(fec.quantization_digits),
        seed,
    ];
    Ok(TaskSignature(custom_hash_mix(&numbers)?))
}
