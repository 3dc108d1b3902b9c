//! Shared fixtures for integration tests.

#![allow(dead_code)]

use automl::transport::{Endpoints, Transport};
use automl::watcher::TaskChannel;
use automl::Result;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::time::Duration;

pub const TOKEN: &str = "test-token";

/// Transport whose three targets all point at `base`; admin lives under `/admin`.
pub fn transport(base: &str) -> Transport {
    Transport::new(
        Endpoints {
            api: base.to_string(),
            admin: format!("{base}/admin"),
            serving: format!("{base}/serving"),
        },
        TOKEN,
        Duration::from_secs(5),
    )
    .unwrap()
}

pub fn task_json(id: &str, kind: &str, status: &str, step: u32) -> Value {
    json!({
        "id": id,
        "kind": kind,
        "status": status,
        "current_step": step,
        "total_step": 3,
        "step_description": format!("step {step}"),
        "execution_info": {}
    })
}

/// Channel message announcing a task snapshot.
pub fn event(id: &str, kind: &str, status: &str, step: u32) -> String {
    json!({
        "event": "task_status_changed",
        "entity": task_json(id, kind, status, step)
    })
    .to_string()
}

/// Replays a fixed message script and counts what was read.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    messages: VecDeque<String>,
    pub reads: usize,
    pub closed: bool,
}

impl ScriptedChannel {
    pub fn new(messages: impl IntoIterator<Item = String>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.messages.len()
    }
}

#[async_trait::async_trait]
impl TaskChannel for ScriptedChannel {
    async fn recv(&mut self) -> Result<Option<String>> {
        let next = self.messages.pop_front();
        if next.is_some() {
            self.reads += 1;
        }
        Ok(next)
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Channel that never yields a message.
pub struct SilentChannel;

#[async_trait::async_trait]
impl TaskChannel for SilentChannel {
    async fn recv(&mut self) -> Result<Option<String>> {
        std::future::pending().await
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
