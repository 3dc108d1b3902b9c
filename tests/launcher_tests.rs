//! Job launches against a mock service.

mod common;

use automl::launcher::{
    Launcher, OptimizeRequest, OptimizeTrainRequest, ParseRequest, PreprocessRequest,
    TrainRequest,
};
use automl::models::{TaskKind, TaskStatus};
use automl::Error;
use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

#[tokio::test]
async fn test_start_parse_uploads_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iris.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "sepal_length,species").unwrap();
    writeln!(file, "5.1,setosa").unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/sources")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="metadata""#.into()),
            Matcher::Regex(r#""name":"flowers""#.into()),
            Matcher::Regex(r#"filename="iris.csv""#.into()),
            Matcher::Regex("5.1,setosa".into()),
        ]))
        .with_status(201)
        .with_body(common::task_json("t1", "parse", "PENDING", 0).to_string())
        .create_async()
        .await;

    let transport = common::transport(&server.url());
    let task = Launcher::new(&transport)
        .start_parse(&ParseRequest {
            name: "flowers".to_string(),
            files: vec![path],
        })
        .await
        .unwrap();

    assert_eq!(task.task().id, "t1");
    assert_eq!(task.task().kind, TaskKind::Parse);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_start_parse_missing_file() {
    let transport = common::transport("http://127.0.0.1:9");
    let err = Launcher::new(&transport)
        .start_parse(&ParseRequest {
            name: "x".to_string(),
            files: vec!["/definitely/not/here.csv".into()],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[tokio::test]
async fn test_start_preprocess_posts_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/datasets")
        .match_body(Matcher::Json(json!({
            "source_id": "s1",
            "name": "churn",
            "label": "churned",
            "folds": 5
        })))
        .with_status(201)
        .with_body(common::task_json("t2", "preprocess", "SCHEDULED", 0).to_string())
        .create_async()
        .await;

    let transport = common::transport(&server.url());
    let task = Launcher::new(&transport)
        .start_preprocess(&PreprocessRequest {
            source_id: "s1".to_string(),
            name: "churn".to_string(),
            label: "churned".to_string(),
            folds: Some(5),
        })
        .await
        .unwrap();

    assert_eq!(task.task().status, TaskStatus::Scheduled);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_launch_with_wrong_kind_is_inconsistent() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/datasets/d1/optimize")
        .with_status(201)
        .with_body(common::task_json("t3", "train", "PENDING", 0).to_string())
        .create_async()
        .await;

    let transport = common::transport(&server.url());
    let err = Launcher::new(&transport)
        .start_optimize("d1", &OptimizeRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Consistency { .. }));
}

#[tokio::test]
async fn test_training_launches() {
    let mut server = mockito::Server::new_async().await;
    let _train = server
        .mock("POST", "/datasets/d1/train")
        .match_body(Matcher::PartialJson(json!({"name": "gbm"})))
        .with_status(201)
        .with_body(common::task_json("t4", "train", "PENDING", 0).to_string())
        .create_async()
        .await;
    let _optimize_train = server
        .mock("POST", "/datasets/d1/optimize-train")
        .match_body(Matcher::Json(json!({"name": "auto", "budget": 20})))
        .with_status(201)
        .with_body(common::task_json("t5", "optimize_train", "PENDING", 0).to_string())
        .create_async()
        .await;
    let _retrain = server
        .mock("POST", "/models/m1/retrain")
        .with_status(201)
        .with_body(common::task_json("t6", "retrain", "PENDING", 0).to_string())
        .create_async()
        .await;
    let _evaluate = server
        .mock("POST", "/datasets/d1/evaluate")
        .match_body(Matcher::Json(json!({"configuration": {"depth": 4}})))
        .with_status(201)
        .with_body(common::task_json("t7", "custom_config", "PENDING", 0).to_string())
        .create_async()
        .await;
    let _refresh = server
        .mock("POST", "/datasets/d1/refresh")
        .with_status(201)
        .with_body(common::task_json("t8", "refresh", "PENDING", 0).to_string())
        .create_async()
        .await;

    let transport = common::transport(&server.url());
    let launcher = Launcher::new(&transport);

    let train = launcher
        .start_train(
            "d1",
            &TrainRequest {
                name: "gbm".to_string(),
                configuration: json!({"depth": 6}),
            },
        )
        .await
        .unwrap();
    assert_eq!(train.task().kind, TaskKind::Train);

    let optimize = launcher
        .start_optimize_train(
            "d1",
            &OptimizeTrainRequest {
                name: "auto".to_string(),
                budget: Some(20),
            },
        )
        .await
        .unwrap();
    assert_eq!(optimize.task().kind, TaskKind::OptimizeTrain);

    let retrain = launcher.start_retrain("m1").await.unwrap();
    assert_eq!(retrain.task().kind, TaskKind::Retrain);

    let custom = launcher
        .evaluate_custom_config("d1", json!({"depth": 4}))
        .await
        .unwrap();
    assert_eq!(custom.task().kind, TaskKind::CustomConfig);

    let refresh = launcher.start_refresh("d1").await.unwrap();
    assert_eq!(refresh.task().id, "t8");
}

#[tokio::test]
async fn test_interrupt_and_predict() {
    let mut server = mockito::Server::new_async().await;
    let _interrupt = server
        .mock("POST", "/tasks/t1/interrupt")
        .with_status(200)
        .with_body(common::task_json("t1", "optimize", "INTERRUPTED", 2).to_string())
        .create_async()
        .await;
    let _predict = server
        .mock("POST", "/serving/models/m1/predict")
        .match_body(Matcher::Json(json!({"rows": [[5.1, 3.5]]})))
        .with_status(200)
        .with_body(r#"{"predictions":["setosa"]}"#)
        .create_async()
        .await;

    let transport = common::transport(&server.url());
    let launcher = Launcher::new(&transport);

    let task = launcher.interrupt("t1").await.unwrap();
    assert_eq!(task.status, TaskStatus::Interrupted);

    let output = launcher
        .predict("m1", json!({"rows": [[5.1, 3.5]]}))
        .await
        .unwrap();
    assert_eq!(output["predictions"][0], "setosa");
}
