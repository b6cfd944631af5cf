use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::engines::evaluation::DEFAULT_MAX_INSTRUCTIONS;
use crate::error::{AmlzError, Result};
use crate::memory::{MemoryLayout, MAX_MATRIX_ADDRESSES, MAX_SCALAR_ADDRESSES, MAX_VECTOR_ADDRESSES};
use crate::types::AddressT;
use serde::{Deserialize, Serialize};

/// Register file sizes and program length limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    pub scalar_addresses: AddressT,
    pub vector_addresses: AddressT,
    pub matrix_addresses: AddressT,
    /// Every component function must be strictly shorter than this.
    pub max_instructions: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            scalar_addresses: MAX_SCALAR_ADDRESSES,
            vector_addresses: MAX_VECTOR_ADDRESSES,
            matrix_addresses: MAX_MATRIX_ADDRESSES,
            max_instructions: DEFAULT_MAX_INSTRUCTIONS,
        }
    }
}

impl VmConfig {
    pub fn layout(&self) -> Result<MemoryLayout> {
        MemoryLayout::new(self.scalar_addresses, self.vector_addresses, self.matrix_addresses)
    }
}

impl ConfigSection for VmConfig {
    fn section_name() -> &'static str {
        "vm"
    }

    fn validate(&self) -> Result<()> {
        self.layout()?;
        if self.max_instructions < 2 {
            return Err(AmlzError::Configuration(
                "max_instructions must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let defaults = Self::default();
        let address_max = f64::from(AddressT::MAX);
        ConfigManifest {
            section: "VM".to_string(),
            fields: vec![
                FieldManifest::integer(
                    "scalar_addresses",
                    serde_json::json!(defaults.scalar_addresses),
                    2.0,
                    address_max,
                    "Number of scalar registers, including label and prediction",
                ),
                FieldManifest::integer(
                    "vector_addresses",
                    serde_json::json!(defaults.vector_addresses),
                    3.0,
                    address_max,
                    "Number of vector registers, including features, label and prediction",
                ),
                FieldManifest::integer(
                    "matrix_addresses",
                    serde_json::json!(defaults.matrix_addresses),
                    1.0,
                    address_max,
                    "Number of matrix registers",
                ),
                FieldManifest::integer(
                    "max_instructions",
                    serde_json::json!(defaults.max_instructions),
                    2.0,
                    address_max + 1.0,
                    "Exclusive upper bound on setup, predict and learn lengths",
                ),
            ],
        }
    }
}
