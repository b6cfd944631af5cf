pub mod cache;
pub mod evaluation;
pub mod manager;
pub mod task;
pub mod traits;
pub mod vm;

pub use cache::CacheConfig;
pub use evaluation::EvaluationConfig;
pub use manager::{AppConfig, ConfigManager, ENV_PREFIX};
pub use task::TaskConfig;
pub use traits::{ConfigManifest, ConfigSection, FieldManifest};
pub use vm::VmConfig;
