use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::EntityStatus;
use crate::error::Result;

/// A trained artifact built from one configuration against a [`Dataset`](super::Dataset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub status: EntityStatus,
    pub dataset_id: String,
    /// Configuration the model was trained with.
    #[serde(default)]
    pub configuration: Value,
    /// Evaluation metrics reported by the service.
    #[serde(default)]
    pub metrics: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Model {
    /// Listing factory for [`Page::decode`](super::Page::decode).
    pub fn from_value(raw: &Value) -> Result<Self> {
        Ok(Self::deserialize(raw)?)
    }

    /// Numeric metric by name.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).and_then(Value::as_f64)
    }
}
