//! Integration tests for the dispatch engine

use mailer::{
    Dispatcher, MailerError, MessageTemplates, MockTransport, Record, RunSummary, SendOutcome,
};
use std::sync::Arc;

fn text_templates() -> MessageTemplates {
    MessageTemplates::new(Some("hello there".to_string()), None)
}

fn record(from: &str, to: &str, subject: &str, body: &str) -> Record {
    Record::new(from, to, subject, body)
}

#[tokio::test]
async fn test_empty_batch_yields_zero_summary() {
    let dispatcher = Dispatcher::new(MockTransport::new(), text_templates(), 2).unwrap();

    let summary = dispatcher.run(Vec::new()).await.unwrap();

    assert_eq!(summary, RunSummary::default());
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    // Duplicate pair plus one invalid recipient, pool width 2
    let transport = Arc::new(MockTransport::new());
    let dispatcher =
        Dispatcher::with_arc_transport(Arc::clone(&transport), text_templates(), 2).unwrap();

    let batch = vec![
        record("a@x.com", "b@x.com", "Hi", "body1"),
        record("a@x.com", "b@x.com", "Hi", "body2"),
        record("a@x.com", "bad-address", "Hi", "body3"),
    ];

    let summary = dispatcher.run(batch).await.unwrap();

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(
        summary.errors,
        vec!["\"bad-address\" is an invalid address".to_string()]
    );
    assert_eq!(transport.accepted_count().await, 1);
    assert!(transport.was_sent_to("b@x.com").await);
}

#[tokio::test]
async fn test_duplicate_records_send_once_regardless_of_body() {
    let transport = Arc::new(MockTransport::new());
    let dispatcher =
        Dispatcher::with_arc_transport(Arc::clone(&transport), text_templates(), 1).unwrap();

    let batch = vec![
        record("a@x.com", "b@x.com", "Hi", "first body"),
        record("A@x.com", "B@X.COM", "Hi", "second body"),
    ];

    let summary = dispatcher.run(batch).await.unwrap();

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.skipped, 1);
    assert!(summary.errors.is_empty());
}

#[tokio::test]
async fn test_sequential_and_concurrent_counts_match() {
    let batch: Vec<Record> = (0..20)
        .map(|i| {
            record(
                "sender@x.com",
                &format!("user{}@x.com", i % 5),
                "Hello",
                &format!("body {i}"),
            )
        })
        .chain(std::iter::once(record(
            "sender@x.com",
            "not-an-address",
            "Hello",
            "body",
        )))
        .collect();

    let sequential = Dispatcher::new(MockTransport::new(), text_templates(), 1)
        .unwrap()
        .run(batch.clone())
        .await
        .unwrap();

    let concurrent = Dispatcher::new(MockTransport::new(), text_templates(), 8)
        .unwrap()
        .run(batch)
        .await
        .unwrap();

    assert_eq!(sequential.sent, concurrent.sent);
    assert_eq!(sequential.skipped, concurrent.skipped);
    assert_eq!(sequential.errors.len(), concurrent.errors.len());
    assert_eq!(sequential.sent, 5);
    assert_eq!(sequential.skipped, 15);
    assert_eq!(sequential.errors.len(), 1);
}

#[tokio::test]
async fn test_racing_duplicates_send_exactly_once() {
    let transport = Arc::new(MockTransport::new());
    let dispatcher =
        Dispatcher::with_arc_transport(Arc::clone(&transport), text_templates(), 8).unwrap();

    let batch: Vec<Record> = (0..16)
        .map(|i| record("a@x.com", "b@x.com", "Hi", &format!("body {i}")))
        .collect();

    let summary = dispatcher.run(batch).await.unwrap();

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.skipped, 15);
    assert_eq!(transport.accepted_count().await, 1);
}

#[tokio::test]
async fn test_missing_templates_abort_before_any_send() {
    let transport = Arc::new(MockTransport::new());
    let dispatcher =
        Dispatcher::with_arc_transport(Arc::clone(&transport), MessageTemplates::default(), 2)
            .unwrap();

    let batch = vec![record("a@x.com", "b@x.com", "Hi", "body")];
    let err = dispatcher.run(batch).await.unwrap_err();

    assert!(matches!(err, MailerError::Config(_)));
    assert_eq!(transport.accepted_count().await, 0);
}

#[tokio::test]
async fn test_zero_concurrency_is_a_config_error() {
    let err = Dispatcher::new(MockTransport::new(), text_templates(), 0)
        .err()
        .unwrap();
    assert!(matches!(err, MailerError::Config(_)));
}

#[tokio::test]
async fn test_provider_rejection_is_an_error_not_a_skip() {
    let transport = Arc::new(MockTransport::rejecting_for(
        "blocked@x.com",
        "code=MessageRejected, message=address suppressed",
    ));
    let dispatcher =
        Dispatcher::with_arc_transport(Arc::clone(&transport), text_templates(), 2).unwrap();

    let batch = vec![
        record("a@x.com", "fine@x.com", "Hi", "body"),
        record("a@x.com", "blocked@x.com", "Hi", "body"),
    ];

    let summary = dispatcher.run(batch).await.unwrap();

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("blocked@x.com"));
    assert!(summary.errors[0].contains("address suppressed"));
}

#[tokio::test]
async fn test_transport_error_line_format() {
    let transport = MockTransport::failing("connection reset by peer");
    let dispatcher = Dispatcher::new(transport, text_templates(), 1).unwrap();

    let batch = vec![record("a@x.com", "b@x.com", "Hi", "body")];
    let summary = dispatcher.run(batch).await.unwrap();

    assert_eq!(summary.sent, 0);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.errors.len(), 1);
    // "<timestamp>, <to_address>, <detail>"
    assert!(summary.errors[0].contains(" UTC, b@x.com, connection reset by peer"));
}

#[tokio::test]
async fn test_fields_are_trimmed_before_processing() {
    let transport = Arc::new(MockTransport::new());
    let dispatcher =
        Dispatcher::with_arc_transport(Arc::clone(&transport), text_templates(), 1).unwrap();

    let batch = vec![
        record(" a@x.com ", " b@x.com\t", " Hi ", "body"),
        record("a@x.com", "b@x.com", "Hi", "body"),
    ];

    let summary = dispatcher.run(batch).await.unwrap();

    // Trimmed fields dedup against the clean duplicate
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.skipped, 1);
    assert!(transport.was_sent_to("b@x.com").await);
}

#[tokio::test]
async fn test_state_resets_between_runs() {
    let transport = Arc::new(MockTransport::new());
    let dispatcher =
        Dispatcher::with_arc_transport(Arc::clone(&transport), text_templates(), 2).unwrap();

    let batch = vec![record("a@x.com", "b@x.com", "Hi", "body")];

    let first = dispatcher.run(batch.clone()).await.unwrap();
    let second = dispatcher.run(batch).await.unwrap();

    // No cross-invocation dedup state: the second run sends again
    assert_eq!(first.sent, 1);
    assert_eq!(second.sent, 1);
    assert_eq!(second.skipped, 0);
    assert_eq!(transport.accepted_count().await, 2);
}

#[tokio::test]
async fn test_rejection_outcome_equality() {
    let outcome = SendOutcome::Rejected {
        detail: "x".to_string(),
    };
    assert_ne!(
        outcome,
        SendOutcome::TransportError {
            detail: "x".to_string()
        }
    );
}
