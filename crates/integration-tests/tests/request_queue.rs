//! Student requests flowing through a registry-managed queue

use std::sync::Arc;
use studentqueue_core::domain::{NewQueue, NewRequest};
use studentqueue_core::error::AppError;
use studentqueue_core::port::time_provider::SteppingTimeProvider;
use studentqueue_integration_tests::{memory_registry, registry_at};

#[tokio::test]
async fn test_duplicate_id_rejected_then_removed() {
    let (registry, _pool) = memory_registry().await;
    registry
        .add_new_queue(NewQueue::new("Test", "pw"))
        .await
        .unwrap();
    let queue = registry.queue("Test").await.unwrap();

    queue.add(&NewRequest::new("111111", "X", "Y")).await.unwrap();
    let err = queue
        .add(&NewRequest::new("111111", "X", "Again"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    queue.remove("111111").await.unwrap();
    let remaining = queue.get_all().await.unwrap();
    assert!(remaining.iter().all(|r| r.student_id != "111111"));

    assert!(matches!(
        queue.remove("111111").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_requests_come_back_in_arrival_order() {
    let clock = Arc::new(SteppingTimeProvider::new(1_700_000_000_000, 1_000));
    let (registry, _pool) = registry_at("sqlite::memory:", clock).await;
    registry
        .add_new_queue(NewQueue::new("Lab", "pw"))
        .await
        .unwrap();
    let queue = registry.queue("lab").await.unwrap();

    for id in ["300", "100", "200"] {
        queue
            .add(&NewRequest::new(id, format!("Student {}", id), "Stuck"))
            .await
            .unwrap();
    }

    let all = queue.get_all().await.unwrap();
    let ids: Vec<&str> = all.iter().map(|r| r.student_id.as_str()).collect();
    assert_eq!(ids, vec!["300", "100", "200"]);
    assert!(all.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert_eq!(queue.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_reset_empties_only_one_queue() {
    let (registry, _pool) = memory_registry().await;
    registry
        .add_new_queue(NewQueue::new("One", "pw"))
        .await
        .unwrap();
    registry
        .add_new_queue(NewQueue::new("Two", "pw"))
        .await
        .unwrap();

    let one = registry.queue("One").await.unwrap();
    let two = registry.queue("Two").await.unwrap();
    one.add(&NewRequest::new("1", "A", "P")).await.unwrap();
    one.add(&NewRequest::new("2", "B", "P")).await.unwrap();
    two.add(&NewRequest::new("1", "A", "P")).await.unwrap();

    assert_eq!(one.reset().await.unwrap(), 2);
    assert!(one.get_all().await.unwrap().is_empty());
    assert_eq!(two.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_invalid_request_fields() {
    let (registry, _pool) = memory_registry().await;
    registry
        .add_new_queue(NewQueue::new("Test", "pw"))
        .await
        .unwrap();
    let queue = registry.queue("Test").await.unwrap();

    let err = queue
        .add(&NewRequest::new("", "X", "Y"))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = queue
        .add(&NewRequest::new("1234567890123456", "X", "Y"))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(queue.count().await.unwrap(), 0);
}
