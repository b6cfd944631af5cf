//! Execution substrate for evolving small learning algorithms.
//!
//! Candidates are straight-line programs over typed scalar, vector and
//! matrix registers (`instructions`, `memory`). The `engines` run them on a
//! task, fingerprint their behavior and score them, with a functional cache
//! (`data::cache`) short-circuiting candidates that behave like one already
//! scored.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod instructions;
pub mod memory;
pub mod types;
pub mod utils;

pub use data::{CachePolicy, CacheStats, Dataset, EvalType, Example, FunctionalCache};
pub use engines::evaluation::{Evaluator, FecConfig, FitnessFunction, TrainAndValidate};
pub use engines::execution::Executor;
pub use engines::generation::RandomAlgorithmGenerator;
pub use error::{AmlzError, Result};
pub use instructions::{Algorithm, Instruction, Op, RawInstruction};
pub use memory::{AddressSpace, MemoryLayout};
pub use types::{Fingerprint, Fitness, RandomSeedT, TaskSignature};
