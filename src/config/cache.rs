use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::data::CachePolicy;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Bound the cache to this many entries with LRU eviction. Unset means
    /// unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lru_capacity: Option<usize>,
}

impl CacheConfig {
    pub fn policy(&self) -> CachePolicy {
        match self.lru_capacity {
            Some(capacity) => CachePolicy::Lru { capacity },
            None => CachePolicy::Unbounded,
        }
    }
}

impl ConfigSection for CacheConfig {
    fn section_name() -> &'static str {
        "cache"
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Cache".to_string(),
            fields: vec![FieldManifest {
                name: "lru_capacity".to_string(),
                field_type: "integer".to_string(),
                default: serde_json::Value::Null,
                min: Some(0.0),
                max: None,
                description: "Maximum cached fingerprints; unset keeps every entry".to_string(),
            }],
        }
    }
}
