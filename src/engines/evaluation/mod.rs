pub mod evaluator;
pub mod fingerprint;
pub mod fitness;

pub use evaluator::{Evaluator, DEFAULT_MAX_INSTRUCTIONS};
pub use fingerprint::{fingerprint, task_signature, FecConfig};
pub use fitness::{train_and_predict, FitnessFunction, TrainAndValidate, DEFAULT_MAX_ABS_ERROR};
