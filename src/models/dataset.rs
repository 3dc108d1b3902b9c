use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::EntityStatus;
use crate::error::Result;

/// A preprocessed, labeled and fold-split derivative of a [`Source`](super::Source).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub status: EntityStatus,
    pub source_id: String,
    /// Target column.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub folds: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    /// Listing factory for [`Page::decode`](super::Page::decode).
    pub fn from_value(raw: &Value) -> Result<Self> {
        Ok(Self::deserialize(raw)?)
    }

    /// Configurations found by optimization, when the service attached them.
    pub fn configurations(&self) -> Option<&Vec<Value>> {
        self.extra.get("configurations").and_then(Value::as_array)
    }
}
