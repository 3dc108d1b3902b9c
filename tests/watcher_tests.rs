//! Watcher behaviour against scripted channels.

mod common;

use automl::models::{Task, TaskStatus};
use automl::watcher::{watch, RecordingProgress, WatchOptions};
use automl::Error;
use common::{event, task_json, ScriptedChannel, SilentChannel};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn initial(id: &str, kind: &str) -> Task {
    Task::from_value(&task_json(id, kind, "PENDING", 0)).unwrap()
}

#[tokio::test]
async fn test_success_path_reads_two_messages() {
    let mut channel = ScriptedChannel::new([
        event("t1", "parse", "RUNNING", 1),
        event("t1", "parse", "DONE", 3),
        event("t1", "parse", "RUNNING", 9),
    ]);
    let mut progress = RecordingProgress::default();

    let last = watch(
        initial("t1", "parse"),
        &mut channel,
        &mut progress,
        WatchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(last.status, TaskStatus::Done);
    assert_eq!(last.current_step, 3);
    assert_eq!(channel.reads, 2);
    assert_eq!(channel.remaining(), 1);
    assert_eq!(progress.steps, vec![1, 3]);
    assert_eq!(progress.finished.map(|t| t.status), Some(TaskStatus::Done));
}

#[tokio::test]
async fn test_multiplexed_noise_is_skipped() {
    let mut channel = ScriptedChannel::new([
        event("other", "parse", "DONE", 3),
        event("t1", "train", "DONE", 3),
        event("t1", "parse", "DONE", 3),
    ]);
    let mut progress = RecordingProgress::default();

    let last = watch(
        initial("t1", "parse"),
        &mut channel,
        &mut progress,
        WatchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(last.id, "t1");
    assert_eq!(channel.reads, 3);
    assert_eq!(progress.steps, vec![3]);
}

#[tokio::test]
async fn test_foreign_event_between_updates_is_skipped() {
    let mut channel = ScriptedChannel::new([
        event("t1", "parse", "RUNNING", 1),
        event("t2", "train", "DONE", 3),
        event("t1", "parse", "DONE", 3),
    ]);
    let mut progress = RecordingProgress::default();

    let last = watch(
        initial("t1", "parse"),
        &mut channel,
        &mut progress,
        WatchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(last.id, "t1");
    assert_eq!(last.status, TaskStatus::Done);
    assert_eq!(channel.reads, 3);
    assert_eq!(progress.steps, vec![1, 3]);
}

#[tokio::test]
async fn test_error_status_returns_immediately() {
    let mut channel = ScriptedChannel::new([
        event("t1", "preprocess", "ERROR", 2),
        event("t1", "preprocess", "DONE", 3),
    ]);
    let mut progress = RecordingProgress::default();

    let last = watch(
        initial("t1", "preprocess"),
        &mut channel,
        &mut progress,
        WatchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(last.status, TaskStatus::Error);
    assert_eq!(channel.reads, 1);
}

#[tokio::test]
async fn test_malformed_messages_are_skipped() {
    let mut channel = ScriptedChannel::new([
        "not json".to_string(),
        r#"{"event":"ping"}"#.to_string(),
        r#"{"entity":{"id":"d1","name":"iris","status":"BUILT"}}"#.to_string(),
        r#"{"entity":{"id":"t2","kind":"parse","status":"WEIRD"}}"#.to_string(),
        event("t1", "parse", "DONE", 3),
    ]);
    let mut progress = RecordingProgress::default();

    let last = watch(
        initial("t1", "parse"),
        &mut channel,
        &mut progress,
        WatchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(last.status, TaskStatus::Done);
    assert_eq!(channel.reads, 5);
    assert_eq!(progress.steps, vec![3]);
}

#[tokio::test]
async fn test_undecodable_snapshot_of_watched_task_fails() {
    let mut channel = ScriptedChannel::new([
        r#"{"entity":{"id":"t1","kind":"parse","status":"WEIRD"}}"#.to_string(),
        event("t1", "parse", "DONE", 3),
    ]);

    let err = watch(
        initial("t1", "parse"),
        &mut channel,
        &mut RecordingProgress::default(),
        WatchOptions::default(),
    )
    .await
    .unwrap_err();

    match err {
        Error::Decode { message } => assert!(message.contains("t1"), "{message}"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(channel.reads, 1);
}

#[tokio::test]
async fn test_null_fields_in_snapshot_use_defaults() {
    let mut channel = ScriptedChannel::new([serde_json::json!({
        "event": "task_status_changed",
        "entity": {
            "id": "t1",
            "kind": "preprocess",
            "status": "DONE",
            "current_step": null,
            "total_step": null,
            "execution_info": null
        }
    })
    .to_string()]);
    let mut progress = RecordingProgress::default();

    let last = watch(
        initial("t1", "preprocess"),
        &mut channel,
        &mut progress,
        WatchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(last.status, TaskStatus::Done);
    assert_eq!(last.current_step, 0);
    assert!(last.execution_info.is_empty());
    assert_eq!(channel.reads, 1);
}

#[tokio::test]
async fn test_interrupted_does_not_stop_by_default() {
    let mut channel = ScriptedChannel::new([
        event("t1", "optimize", "INTERRUPTED", 1),
        event("t1", "optimize", "DONE", 3),
    ]);
    let mut progress = RecordingProgress::default();

    let last = watch(
        initial("t1", "optimize"),
        &mut channel,
        &mut progress,
        WatchOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(last.status, TaskStatus::Done);
    assert_eq!(progress.steps, vec![1, 3]);
}

#[tokio::test]
async fn test_interrupted_stops_when_opted_in() {
    let mut channel = ScriptedChannel::new([
        event("t1", "optimize", "INTERRUPTED", 1),
        event("t1", "optimize", "DONE", 3),
    ]);
    let options = WatchOptions {
        stop_on_interrupted: true,
        ..WatchOptions::default()
    };

    let last = watch(
        initial("t1", "optimize"),
        &mut channel,
        &mut RecordingProgress::default(),
        options,
    )
    .await
    .unwrap();

    assert_eq!(last.status, TaskStatus::Interrupted);
    assert_eq!(channel.reads, 1);
}

#[tokio::test]
async fn test_finished_initial_snapshot_skips_channel() {
    let done = Task::from_value(&task_json("t1", "refresh", "DONE", 3)).unwrap();
    let mut channel = ScriptedChannel::new([event("t1", "refresh", "RUNNING", 1)]);
    let mut progress = RecordingProgress::default();

    let last = watch(done.clone(), &mut channel, &mut progress, WatchOptions::default())
        .await
        .unwrap();

    assert_eq!(last, done);
    assert_eq!(channel.reads, 0);
    assert!(progress.steps.is_empty());
}

#[tokio::test]
async fn test_closed_channel_fails_the_watch() {
    let mut channel = ScriptedChannel::new([event("t1", "train", "RUNNING", 1)]);

    let err = watch(
        initial("t1", "train"),
        &mut channel,
        &mut RecordingProgress::default(),
        WatchOptions::default(),
    )
    .await
    .unwrap_err();

    match err {
        Error::Channel { message } => assert!(message.contains("RUNNING"), "{message}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_max_wait_bounds_a_silent_channel() {
    let options = WatchOptions {
        max_wait: Some(Duration::from_secs(30)),
        ..WatchOptions::default()
    };

    let err = watch(
        initial("t1", "train"),
        &mut SilentChannel,
        &mut RecordingProgress::default(),
        options,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        Error::WatchTimeout { waited } if waited == Duration::from_secs(30)
    ));
}
