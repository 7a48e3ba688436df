//! End-to-end JSON-RPC calls against a running server

use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::server::ServerHandle;
use serde_json::Value;
use std::sync::Arc;
use studentqueue_api_rpc::error::code;
use studentqueue_api_rpc::{RpcServer, RpcServerConfig, SubmissionLimiter};
use studentqueue_core::port::SystemTimeProvider;
use studentqueue_integration_tests::{memory_registry, ADMIN_PASSWORD};

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .unwrap()
}

async fn start(burst: u32) -> (HttpClient, ServerHandle) {
    let (registry, _pool) = memory_registry().await;
    let limiter = Arc::new(SubmissionLimiter::new(
        burst,
        1,
        Arc::new(SystemTimeProvider),
    ));
    let port = free_port();
    let config = RpcServerConfig {
        host: "127.0.0.1".to_string(),
        port,
    };
    let handle = RpcServer::new(config, registry, limiter)
        .start()
        .await
        .unwrap();
    let client = HttpClientBuilder::default()
        .build(format!("http://127.0.0.1:{}", port))
        .unwrap();
    (client, handle)
}

fn params(pairs: &[(&str, &str)]) -> ObjectParams {
    let mut params = ObjectParams::new();
    for (k, v) in pairs {
        params.insert(k, v).unwrap();
    }
    params
}

fn error_code(err: jsonrpsee::core::client::Error) -> i32 {
    match err {
        jsonrpsee::core::client::Error::Call(obj) => obj.code(),
        other => panic!("expected call error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_student_and_operator_flow() {
    let (client, handle) = start(10).await;

    let created: Value = client
        .request(
            "queue.create.v1",
            params(&[
                ("admin_password", ADMIN_PASSWORD),
                ("name", "Test"),
                ("password", "pw"),
                ("description", "Lab hours"),
            ]),
        )
        .await
        .unwrap();
    assert_eq!(created["table_name"], "Test");

    let queues: Value = client
        .request("queue.list.v1", ObjectParams::new())
        .await
        .unwrap();
    assert_eq!(queues[0]["name"], "Test");
    assert_eq!(queues[0]["description"], "Lab hours");

    let added: Value = client
        .request(
            "request.add.v1",
            params(&[("queue", "Test"), ("id", "111111"), ("name", "X"), ("problem", "Y")]),
        )
        .await
        .unwrap();
    assert_eq!(added["position"], 1);

    let dup = client
        .request::<Value, _>(
            "request.add.v1",
            params(&[("queue", "Test"), ("id", "111111"), ("name", "X"), ("problem", "Y")]),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(dup), code::CONFLICT);

    let listed: Value = client
        .request("request.list.v1", params(&[("queue", "Test"), ("password", "pw")]))
        .await
        .unwrap();
    assert_eq!(listed["requests"][0]["student_id"], "111111");

    let denied = client
        .request::<Value, _>(
            "request.list.v1",
            params(&[("queue", "Test"), ("password", "nope")]),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(denied), code::UNAUTHORIZED);

    let _: Value = client
        .request(
            "request.remove.v1",
            params(&[("queue", "Test"), ("password", "pw"), ("id", "111111")]),
        )
        .await
        .unwrap();

    let _: Value = client
        .request("queue.delete.v1", params(&[("queue", "Test"), ("password", ADMIN_PASSWORD)]))
        .await
        .unwrap();
    let queues: Value = client
        .request("queue.list.v1", ObjectParams::new())
        .await
        .unwrap();
    assert_eq!(queues, serde_json::json!([]));

    handle.stop().unwrap();
}

#[tokio::test]
async fn test_validation_and_throttling_codes() {
    let (client, handle) = start(1).await;

    let bad = client
        .request::<Value, _>(
            "queue.create.v1",
            params(&[
                ("admin_password", ADMIN_PASSWORD),
                ("name", "bad name"),
                ("password", "pw"),
            ]),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(bad), code::VALIDATION_ERROR);

    let _: Value = client
        .request(
            "queue.create.v1",
            params(&[
                ("admin_password", ADMIN_PASSWORD),
                ("name", "Busy"),
                ("password", "pw"),
            ]),
        )
        .await
        .unwrap();

    let add = || params(&[("queue", "Busy"), ("id", "1"), ("name", "X"), ("problem", "Y")]);
    let _: Value = client.request("request.add.v1", add()).await.unwrap();
    let throttled = client
        .request::<Value, _>("request.add.v1", add())
        .await
        .unwrap_err();
    assert_eq!(error_code(throttled), code::THROTTLED);

    let missing = client
        .request::<Value, _>(
            "queue.login.v1",
            params(&[("queue", "Nowhere"), ("password", "pw")]),
        )
        .await
        .unwrap_err();
    assert_eq!(error_code(missing), code::NOT_FOUND);

    handle.stop().unwrap();
}
