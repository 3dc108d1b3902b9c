use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::EntityStatus;
use crate::error::Result;

/// A raw dataset ingested (parsed) by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    pub status: EntityStatus,
    /// Names of the files the source was built from.
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Payload fields without a typed accessor.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Source {
    /// Listing factory for [`Page::decode`](super::Page::decode).
    pub fn from_value(raw: &Value) -> Result<Self> {
        Ok(Self::deserialize(raw)?)
    }
}
