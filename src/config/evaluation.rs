use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::engines::evaluation::{FecConfig, DEFAULT_MAX_ABS_ERROR};
use crate::error::{AmlzError, Result};
use crate::types::RandomSeedT;
use serde::{Deserialize, Serialize};

/// Fingerprint sample sizes, divergence threshold and evaluator seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub fec_num_train_examples: usize,
    pub fec_num_valid_examples: usize,
    pub fec_quantization_digits: u32,
    pub max_abs_error: f64,
    pub seed: RandomSeedT,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        let fec = FecConfig::default();
        Self {
            fec_num_train_examples: fec.num_train_examples,
            fec_num_valid_examples: fec.num_valid_examples,
            fec_quantization_digits: fec.quantization_digits,
            max_abs_error: DEFAULT_MAX_ABS_ERROR,
            seed: 1,
        }
    }
}

impl EvaluationConfig {
    pub fn fec(&self) -> FecConfig {
        FecConfig {
            num_train_examples: self.fec_num_train_examples,
            num_valid_examples: self.fec_num_valid_examples,
            quantization_digits: self.fec_quantization_digits,
        }
    }
}

impl ConfigSection for EvaluationConfig {
    fn section_name() -> &'static str {
        "evaluation"
    }

    fn validate(&self) -> Result<()> {
        if self.fec_num_valid_examples == 0 {
            return Err(AmlzError::Configuration(
                "fec_num_valid_examples must be at least 1".to_string(),
            ));
        }
        // 10^digits must stay a finite, exactly representable scale.
        if self.fec_quantization_digits > 15 {
            return Err(AmlzError::Configuration(
                "fec_quantization_digits must be at most 15".to_string(),
            ));
        }
        if !(self.max_abs_error.is_finite() && self.max_abs_error > 0.0) {
            return Err(AmlzError::Configuration(
                "max_abs_error must be positive and finite".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let defaults = Self::default();
        ConfigManifest {
            section: "Evaluation".to_string(),
            fields: vec![
                FieldManifest::integer(
                    "fec_num_train_examples",
                    serde_json::json!(defaults.fec_num_train_examples),
                    0.0,
                    10_000.0,
                    "Training examples seen before probing a candidate",
                ),
                FieldManifest::integer(
                    "fec_num_valid_examples",
                    serde_json::json!(defaults.fec_num_valid_examples),
                    1.0,
                    10_000.0,
                    "Validation examples whose errors form the fingerprint",
                ),
                FieldManifest::integer(
                    "fec_quantization_digits",
                    serde_json::json!(defaults.fec_quantization_digits),
                    0.0,
                    15.0,
                    "Decimal digits kept when hashing fingerprint errors",
                ),
                FieldManifest::float(
                    "max_abs_error",
                    serde_json::json!(defaults.max_abs_error),
                    0.0,
                    None,
                    "Prediction error above which a candidate counts as diverged",
                ),
                FieldManifest::integer(
                    "seed",
                    serde_json::json!(defaults.seed),
                    0.0,
                    u64::MAX as f64,
                    "Root seed for fingerprinting and evaluation",
                ),
            ],
        }
    }
}
