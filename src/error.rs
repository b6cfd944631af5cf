use crate::memory::AddressSpace;
use crate::types::{AddressT, FeatureIndexT, IntegerT};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmlzError {
    #[error("Overflow: {value} is not representable as {target}")]
    Overflow { value: String, target: &'static str },

    #[error("Invalid opcode: {0}")]
    InvalidOpcode(IntegerT),

    #[error("{space} address {address} out of range (capacity {capacity})")]
    AddressOutOfRange {
        space: AddressSpace,
        address: AddressT,
        capacity: AddressT,
    },

    #[error("Feature index {index} out of range for feature size {feature_size}")]
    FeatureIndexOutOfRange {
        index: FeatureIndexT,
        feature_size: FeatureIndexT,
    },

    #[error("Cache inconsistency for fingerprint {fingerprint:#018x}: cached {cached}, attempted {attempted}")]
    CacheInconsistency {
        fingerprint: u64,
        cached: f64,
        attempted: f64,
    },

    #[error("Found empty: {0}")]
    Empty(&'static str),

    #[error("Found missing: {0}")]
    Missing(&'static str),

    #[error("Found non-positive: {0}")]
    NonPositive(String),

    #[error("Too large: {what} has size {size}, limit {limit}")]
    SizeLimit {
        what: &'static str,
        size: usize,
        limit: usize,
    },

    #[error("Fitness {0} outside [0, 1]")]
    FitnessOutOfRange(f64),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AmlzError {
    /// True when the error only condemns the candidate being evaluated.
    ///
    /// The search loop may drop the candidate and continue. Everything else
    /// means a core invariant broke and the run should stop.
    pub fn discards_candidate(&self) -> bool {
        matches!(
            self,
            AmlzError::Overflow { .. }
                | AmlzError::InvalidOpcode(_)
                | AmlzError::AddressOutOfRange { .. }
                | AmlzError::FeatureIndexOutOfRange { .. }
                | AmlzError::SizeLimit { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AmlzError>;
