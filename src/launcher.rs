//! Job launcher: the "start X" requests.
//!
//! Each launch is one request whose response is a task snapshot. The
//! snapshot is narrowed to the variant the launch expects, so a service
//! answering with the wrong kind surfaces as [`Error::Consistency`]
//! immediately instead of at resolve time.
//!
//! [`Error::Consistency`]: crate::Error::Consistency

use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::error::Result;
use crate::models::{OptimizeTask, ParseTask, PreprocessTask, RefreshTask, Task, TrainTask};
use crate::repository::entity_path;
use crate::transport::{ApiRequest, Target, Transport, UploadFile};

/// Upload local files as a new Source.
#[derive(Debug, Clone)]
pub struct ParseRequest {
    pub name: String,
    pub files: Vec<PathBuf>,
}

/// Build a Dataset from a Source.
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessRequest {
    pub source_id: String,
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folds: Option<u32>,
}

/// Hyperparameter search budget; `None` lets the service decide.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OptimizeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u32>,
}

/// Train one Model from an explicit configuration.
#[derive(Debug, Clone, Serialize)]
pub struct TrainRequest {
    pub name: String,
    pub configuration: Value,
}

/// Search, then train the best configuration.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeTrainRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u32>,
}

/// Issues launch, interrupt and prediction requests.
#[derive(Debug, Clone, Copy)]
pub struct Launcher<'a> {
    transport: &'a Transport,
}

impl<'a> Launcher<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    async fn launch(&self, request: ApiRequest) -> Result<Task> {
        let path = request.path.clone();
        let raw = self.transport.request(request).await?.body;
        let task = Task::from_value(&raw)?;
        tracing::info!(id = %task.id, kind = %task.kind, path = %path, "Task launched");
        Ok(task)
    }

    /// Upload files and parse them into a Source.
    pub async fn start_parse(&self, request: &ParseRequest) -> Result<ParseTask> {
        let mut files = Vec::with_capacity(request.files.len());
        for path in &request.files {
            files.push(UploadFile::read(path).await?);
        }
        let metadata = json!({ "name": request.name });
        self.launch(ApiRequest::post("sources").multipart(metadata, files))
            .await?
            .try_into()
    }

    /// Preprocess a Source into a Dataset.
    pub async fn start_preprocess(&self, request: &PreprocessRequest) -> Result<PreprocessTask> {
        self.launch(ApiRequest::post("datasets").json(serde_json::to_value(request)?))
            .await?
            .try_into()
    }

    /// Search configurations for a Dataset.
    pub async fn start_optimize(
        &self,
        dataset_id: &str,
        request: &OptimizeRequest,
    ) -> Result<OptimizeTask> {
        let path = format!("{}/optimize", entity_path("datasets", dataset_id));
        self.launch(ApiRequest::post(path).json(serde_json::to_value(request)?))
            .await?
            .try_into()
    }

    /// Train a Model on a Dataset.
    pub async fn start_train(&self, dataset_id: &str, request: &TrainRequest) -> Result<TrainTask> {
        let path = format!("{}/train", entity_path("datasets", dataset_id));
        self.launch(ApiRequest::post(path).json(serde_json::to_value(request)?))
            .await?
            .try_into()
    }

    /// Search configurations, then train the best one.
    pub async fn start_optimize_train(
        &self,
        dataset_id: &str,
        request: &OptimizeTrainRequest,
    ) -> Result<OptimizeTask> {
        let path = format!("{}/optimize-train", entity_path("datasets", dataset_id));
        self.launch(ApiRequest::post(path).json(serde_json::to_value(request)?))
            .await?
            .try_into()
    }

    /// Retrain an existing Model on fresh data.
    pub async fn start_retrain(&self, model_id: &str) -> Result<TrainTask> {
        let path = format!("{}/retrain", entity_path("models", model_id));
        self.launch(ApiRequest::post(path)).await?.try_into()
    }

    /// Rebuild an outdated Dataset.
    pub async fn start_refresh(&self, dataset_id: &str) -> Result<RefreshTask> {
        let path = format!("{}/refresh", entity_path("datasets", dataset_id));
        self.launch(ApiRequest::post(path)).await?.try_into()
    }

    /// Evaluate a user-provided configuration against a Dataset.
    pub async fn evaluate_custom_config(
        &self,
        dataset_id: &str,
        configuration: Value,
    ) -> Result<TrainTask> {
        let path = format!("{}/evaluate", entity_path("datasets", dataset_id));
        self.launch(ApiRequest::post(path).json(json!({ "configuration": configuration })))
            .await?
            .try_into()
    }

    /// Ask the service to stop a task. Returns the updated snapshot.
    pub async fn interrupt(&self, task_id: &str) -> Result<Task> {
        let path = format!("{}/interrupt", entity_path("tasks", task_id));
        let raw = self.transport.request(ApiRequest::post(path)).await?.body;
        Task::from_value(&raw)
    }

    /// Score `input` with a served Model.
    pub async fn predict(&self, model_id: &str, input: Value) -> Result<Value> {
        let path = format!("{}/predict", entity_path("models", model_id));
        let request = ApiRequest::post(path).target(Target::Serving).json(input);
        Ok(self.transport.request(request).await?.body)
    }
}
