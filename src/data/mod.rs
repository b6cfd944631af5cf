pub mod cache;
pub mod dataset;

pub use cache::{CachePolicy, CacheStats, FunctionalCache};
pub use dataset::{Dataset, EvalType, Example};
