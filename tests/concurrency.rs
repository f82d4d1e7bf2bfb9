mod common;

use std::sync::Arc;

use common::json_request;
use http::{Method, StatusCode};
use logroute::{Config, LogFields, Request, Router};
use serde_json::Value;

async fn echo(req: Request, log: LogFields) -> Result<Value, logroute::Error> {
    let body: Value = req.json()?;
    log.set("echoed", body.clone());
    Ok(body)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_requests_write_whole_lines() {
    let dir = tempfile::tempdir().unwrap();
    let app = Arc::new(
        Router::with_config(Config::default().log_dir(dir.path())).post("/echo", echo),
    );

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..50 {
        let app = Arc::clone(&app);
        tasks.spawn(async move {
            let req = json_request(Method::POST, "/echo", r#"{"payload":"abcdefghijklmnopqrstuvwxyz"}"#);
            app.dispatch(req).await.status_code()
        });
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    let mut lines = 0;
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let text = std::fs::read_to_string(entry.unwrap().path()).unwrap();
        for line in text.lines() {
            let record: Value = serde_json::from_str(line).unwrap();
            assert_eq!(record["http/response"]["status"], 200);
            assert_eq!(record["echoed"]["payload"], "abcdefghijklmnopqrstuvwxyz");
            lines += 1;
        }
    }
    assert_eq!(lines, 50);
}
