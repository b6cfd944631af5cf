use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::data::{Dataset, EvalType};
use crate::error::{AmlzError, Result};
use crate::types::RandomSeedT;
use serde::{Deserialize, Serialize};

/// The synthetic task the binary searches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub eval_type: EvalType,
    pub data_seed: RandomSeedT,
    pub num_train_examples: usize,
    pub num_valid_examples: usize,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            eval_type: EvalType::RmsError,
            data_seed: 1000,
            num_train_examples: 100,
            num_valid_examples: 100,
        }
    }
}

impl TaskConfig {
    pub fn dataset<const F: usize>(&self) -> Result<Dataset<F>> {
        match self.eval_type {
            EvalType::RmsError => {
                Dataset::scalar_linear_regression(self.data_seed, self.num_train_examples, self.num_valid_examples)
            }
            EvalType::Accuracy => {
                Dataset::linear_classification(self.data_seed, self.num_train_examples, self.num_valid_examples)
            }
        }
    }
}

impl ConfigSection for TaskConfig {
    fn section_name() -> &'static str {
        "task"
    }

    fn validate(&self) -> Result<()> {
        if self.num_train_examples == 0 || self.num_valid_examples == 0 {
            return Err(AmlzError::Configuration(
                "Task needs at least one training and one validation example".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let defaults = Self::default();
        ConfigManifest {
            section: "Task".to_string(),
            fields: vec![
                FieldManifest::choice(
                    "eval_type",
                    serde_json::json!(defaults.eval_type),
                    "RmsError for regression, Accuracy for binary classification",
                ),
                FieldManifest::integer(
                    "data_seed",
                    serde_json::json!(defaults.data_seed),
                    0.0,
                    u64::MAX as f64,
                    "Seed of the generated task",
                ),
                FieldManifest::integer(
                    "num_train_examples",
                    serde_json::json!(defaults.num_train_examples),
                    1.0,
                    1_000_000.0,
                    "Training examples",
                ),
                FieldManifest::integer(
                    "num_valid_examples",
                    serde_json::json!(defaults.num_valid_examples),
                    1.0,
                    1_000_000.0,
                    "Validation examples",
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_matches_eval_type() {
        let config = TaskConfig {
            eval_type: EvalType::Accuracy,
            num_train_examples: 8,
            num_valid_examples: 4,
            ..Default::default()
        };
        let dataset = config.dataset::<3>().unwrap();
        assert_eq!(dataset.eval_type, EvalType::Accuracy);
        assert_eq!(dataset.train.len(), 8);
        assert_eq!(dataset.valid.len(), 4);
    }
}
