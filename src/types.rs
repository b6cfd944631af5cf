use crate::error::{AmlzError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Preferred type for all integers unless an external interface or
/// speed/space demands another one.
pub type IntegerT = i64;

/// Type for seeding random generators. Same width as the mixing accumulator.
pub type RandomSeedT = u64;

/// Index for the coordinates of any rank > 0 value.
pub type FeatureIndexT = usize;

pub type Scalar = f64;

/// Specifies an address within one of the typed memories.
pub type AddressT = u16;

/// The index of an instruction within a component function.
pub type InstructionIndexT = u16;

pub const MIN_FITNESS: f64 = 0.0;
pub const MAX_FITNESS: f64 = 1.0;

/// A fitness value, always inside `[MIN_FITNESS, MAX_FITNESS]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Fitness(f64);

impl Fitness {
    pub const MIN: Fitness = Fitness(MIN_FITNESS);
    pub const MAX: Fitness = Fitness(MAX_FITNESS);

    /// Rejects NaN and anything outside the unit interval.
    pub fn new(value: f64) -> Result<Self> {
        if (MIN_FITNESS..=MAX_FITNESS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AmlzError::FitnessOutOfRange(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Fitness {
    type Error = AmlzError;

    fn try_from(value: f64) -> Result<Self> {
        Fitness::new(value)
    }
}

impl From<Fitness> for f64 {
    fn from(fitness: Fitness) -> f64 {
        fitness.0
    }
}

impl fmt::Display for Fitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Digest of a candidate's observed behavior. Cache key of the functional cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(pub RandomSeedT);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Identifies the evaluation task a fingerprint was computed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskSignature(pub RandomSeedT);

impl fmt::Display for TaskSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
