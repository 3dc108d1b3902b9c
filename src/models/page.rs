//! Paginated listing responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Pagination metadata carried by every listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// 1-based page number.
    pub page: u32,
    pub total_pages: u32,
    /// Number of elements on this page.
    pub element_count: u32,
    pub total_elements: u64,
    /// Label of the listed entity type (`source`, `dataset`, ...).
    pub element_type: String,
}

/// One page of a listing, with its content decoded into `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub metadata: PageMetadata,
    pub content: Vec<T>,
}

impl<T> Page<T> {
    /// Decode a raw listing payload, running `factory` over every content
    /// element in the order the service sent them.
    ///
    /// # Examples
    ///
    /// ```
    /// use automl::models::{Page, Source};
    /// use serde_json::json;
    ///
    /// let raw = json!({
    ///     "metadata": {
    ///         "page": 1, "total_pages": 1, "element_count": 1,
    ///         "total_elements": 1, "element_type": "source"
    ///     },
    ///     "content": [{"id": "s1", "name": "iris", "status": "BUILT"}]
    /// });
    /// let page = Page::decode(&raw, Source::from_value).unwrap();
    /// assert_eq!(page.content[0].id, "s1");
    /// ```
    pub fn decode<F>(raw: &Value, factory: F) -> Result<Self>
    where
        F: Fn(&Value) -> Result<T>,
    {
        let metadata = raw
            .get("metadata")
            .ok_or_else(|| Error::decode("listing response has no metadata"))?;
        let metadata: PageMetadata = serde_json::from_value(metadata.clone())?;

        let content = raw
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::decode("listing response has no content array"))?
            .iter()
            .map(factory)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { metadata, content })
    }

    /// Returns `true` if there is a page after this one.
    pub fn has_next(&self) -> bool {
        self.metadata.page < self.metadata.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
