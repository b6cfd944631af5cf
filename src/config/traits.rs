use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<()>;
    fn to_manifest(&self) -> ConfigManifest;
}

/// Describes a section's fields for tooling and `--help`-style listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigManifest {
    pub section: String,
    pub fields: Vec<FieldManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldManifest {
    pub name: String,
    pub field_type: String,
    pub default: serde_json::Value,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub description: String,
}

impl FieldManifest {
    pub fn integer(name: &str, default: serde_json::Value, min: f64, max: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: "integer".to_string(),
            default,
            min: Some(min),
            max: Some(max),
            description: description.to_string(),
        }
    }

    pub fn float(name: &str, default: serde_json::Value, min: f64, max: Option<f64>, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: "float".to_string(),
            default,
            min: Some(min),
            max,
            description: description.to_string(),
        }
    }

    pub fn choice(name: &str, default: serde_json::Value, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: "choice".to_string(),
            default,
            min: None,
            max: None,
            description: description.to_string(),
        }
    }
}
