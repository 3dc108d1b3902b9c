//! Entity repository: get, list and delete for the four remote entity kinds.
//!
//! Every call is a fresh round trip; nothing is cached, filtered or re-sorted
//! client side.

use serde_json::Value;

use crate::error::Result;
use crate::models::{
    Dataset, Model, OptimizeTask, Page, ParseTask, PreprocessTask, RefreshTask, Source, Task,
    TrainTask,
};
use crate::transport::{ApiRequest, Transport};

/// A remote entity addressable under `/{COLLECTION}/{id}`.
pub trait Entity: Sized {
    /// URL collection segment.
    const COLLECTION: &'static str;
    /// Singular label used in messages and tables.
    const LABEL: &'static str;

    fn from_value(raw: &Value) -> Result<Self>;

    fn id(&self) -> &str;
}

impl Entity for Source {
    const COLLECTION: &'static str = "sources";
    const LABEL: &'static str = "source";

    fn from_value(raw: &Value) -> Result<Self> {
        Source::from_value(raw)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Dataset {
    const COLLECTION: &'static str = "datasets";
    const LABEL: &'static str = "dataset";

    fn from_value(raw: &Value) -> Result<Self> {
        Dataset::from_value(raw)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Model {
    const COLLECTION: &'static str = "models";
    const LABEL: &'static str = "model";

    fn from_value(raw: &Value) -> Result<Self> {
        Model::from_value(raw)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Task {
    const COLLECTION: &'static str = "tasks";
    const LABEL: &'static str = "task";

    fn from_value(raw: &Value) -> Result<Self> {
        Task::from_value(raw)
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Which page of a listing to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

pub(crate) fn entity_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", urlencoding::encode(id))
}

/// Read and delete access to remote entities.
#[derive(Debug, Clone, Copy)]
pub struct Repository<'a> {
    transport: &'a Transport,
}

impl<'a> Repository<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Fetch one entity by id.
    pub async fn get<E: Entity>(&self, id: &str) -> Result<E> {
        let raw = self.transport.get(&entity_path(E::COLLECTION, id)).await?;
        E::from_value(&raw)
    }

    /// Fetch one page of a listing.
    pub async fn list<E: Entity>(&self, page: PageRequest) -> Result<Page<E>> {
        let request = ApiRequest::get(E::COLLECTION)
            .query("page", page.page)
            .query("elements_per_page", page.per_page);
        let raw = self.transport.request(request).await?.body;
        Page::decode(&raw, E::from_value)
    }

    /// Delete one entity by id.
    pub async fn delete<E: Entity>(&self, id: &str) -> Result<()> {
        self.transport.delete(&entity_path(E::COLLECTION, id)).await?;
        tracing::info!(kind = E::LABEL, id, "Deleted");
        Ok(())
    }
}

impl ParseTask {
    /// Fetch the Source this finished task produced.
    pub async fn resolve(&self, repository: &Repository<'_>) -> Result<Source> {
        repository.get(self.produced_id()?).await
    }
}

impl PreprocessTask {
    /// Fetch the Dataset this finished task produced.
    pub async fn resolve(&self, repository: &Repository<'_>) -> Result<Dataset> {
        repository.get(self.produced_id()?).await
    }
}

impl OptimizeTask {
    /// Fetch the Dataset the found configurations were attached to.
    pub async fn resolve(&self, repository: &Repository<'_>) -> Result<Dataset> {
        repository.get(self.produced_id()?).await
    }
}

impl TrainTask {
    /// Fetch the Model this finished task produced.
    pub async fn resolve(&self, repository: &Repository<'_>) -> Result<Model> {
        repository.get(self.produced_id()?).await
    }
}

impl RefreshTask {
    /// Fetch the refreshed Dataset.
    pub async fn resolve(&self, repository: &Repository<'_>) -> Result<Dataset> {
        repository.get(self.produced_id()?).await
    }
}
