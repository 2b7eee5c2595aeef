use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use mockall::predicate::eq;
use trip_events::{
    publish_with, send_events, test_utils::mocks::MockStreamingClient, throw, EventBatch,
    EventData, EventHubsConfig, PayloadFormat, PublishOptions, RetryPolicy, TripEvent,
};

const MAX_BATCH_SIZE: usize = 1024;

fn expected_batch(records: &[TripEvent], format: PayloadFormat) -> EventBatch {
    let mut batch = EventBatch::new(MAX_BATCH_SIZE, None);
    for record in records {
        batch
            .try_add(EventData::from_json(record, format).unwrap())
            .unwrap();
    }
    batch
}

fn trips() -> Vec<TripEvent> {
    vec![
        TripEvent::sample(),
        TripEvent::new("CMT", 12u64, 1, "2"),
        TripEvent::new("VTS", 0u64, 4, "3"),
    ]
}

#[tokio::test]
async fn test_sample_is_sent_once_and_closed_once() {
    let records = vec![TripEvent::sample()];
    let batch = expected_batch(&records, PayloadFormat::Spaced);
    assert_eq!(batch.len(), 1);
    assert_eq!(
        batch.events()[0].body(),
        br#"{"ContentData": {"vendorID": "SAI", "tripDistance": 5, "passengerCount": 2, "paymentType": "1"}}"#
    );

    let client = MockStreamingClient::new()
        .create_batch(MAX_BATCH_SIZE, Ok(()))
        .send_batch(batch, Ok(()))
        .close(Ok(()));

    let result = publish_with(client, &records, &PublishOptions::default()).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_batch_keeps_every_record_in_order() {
    let records = trips();
    let batch = expected_batch(&records, PayloadFormat::Compact);

    let client = MockStreamingClient::new()
        .create_batch(MAX_BATCH_SIZE, Ok(()))
        .send_batch(batch, Ok(()))
        .close(Ok(()));
    let options = PublishOptions {
        format: PayloadFormat::Compact,
        ..Default::default()
    };

    publish_with(client, &records, &options).await.unwrap();
}

#[tokio::test]
async fn test_client_is_closed_when_send_fails() {
    let records = trips();
    let batch = expected_batch(&records, PayloadFormat::Spaced);

    let client = MockStreamingClient::new()
        .create_batch(MAX_BATCH_SIZE, Ok(()))
        .send_batch(batch, Err(throw!("unreachable")))
        .close(Ok(()));

    let error = publish_with(client, &records, &PublishOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Failed to send batch of 3 trip events");
}

#[tokio::test]
async fn test_client_is_closed_when_batch_creation_fails() {
    let client = MockStreamingClient::new()
        .create_batch(MAX_BATCH_SIZE, Err(throw!("no batch")))
        .close(Ok(()));

    let error = publish_with(client, &trips(), &PublishOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Failed to create event batch");
}

#[tokio::test]
async fn test_client_is_closed_when_batch_overflows() {
    let mut client = MockStreamingClient::new().close(Ok(()));
    client
        .expect_create_batch()
        .times(1)
        .returning(|| Ok(EventBatch::new(150, None)));
    client.expect_send_batch().never();

    let error = publish_with(client, &trips(), &PublishOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Trip event #2 does not fit in the batch");
}

#[tokio::test]
async fn test_send_error_wins_over_close_error() {
    let records = vec![TripEvent::sample()];
    let batch = expected_batch(&records, PayloadFormat::Spaced);

    let client = MockStreamingClient::new()
        .create_batch(MAX_BATCH_SIZE, Ok(()))
        .send_batch(batch, Err(throw!("unreachable")))
        .close(Err(throw!("close failed")));

    let error = publish_with(client, &records, &PublishOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Failed to send batch of 1 trip events");
}

#[tokio::test]
async fn test_close_error_is_returned_after_successful_send() {
    let records = vec![TripEvent::sample()];
    let batch = expected_batch(&records, PayloadFormat::Spaced);

    let client = MockStreamingClient::new()
        .create_batch(MAX_BATCH_SIZE, Ok(()))
        .send_batch(batch, Ok(()))
        .close(Err(throw!("close failed")));

    let error = publish_with(client, &records, &PublishOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Close error");
}

#[tokio::test]
async fn test_empty_input_sends_nothing_but_closes() {
    let mut client = MockStreamingClient::new().close(Ok(()));
    client.expect_create_batch().never();
    client.expect_send_batch().never();

    let records: Vec<TripEvent> = vec![];
    publish_with(client, &records, &PublishOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_input_opens_no_connection() {
    // unroutable endpoint: opening a client here would fail the test
    let config = EventHubsConfig::new("Endpoint=sb://127.0.0.1:1/;EntityPath=trips");
    let records: Vec<TripEvent> = vec![];

    send_events(&config, &records, &PublishOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_send_is_retried_until_it_succeeds() {
    let records = vec![TripEvent::sample()];
    let batch = expected_batch(&records, PayloadFormat::Spaced);
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();

    let mut client = MockStreamingClient::new()
        .create_batch(MAX_BATCH_SIZE, Ok(()))
        .close(Ok(()));
    client
        .expect_send_batch()
        .times(3)
        .with(eq(batch))
        .returning(move |_| match counter.fetch_add(1, Ordering::SeqCst) {
            0 | 1 => Err(throw!("throttled")),
            _ => Ok(()),
        });

    let options = PublishOptions {
        retry: RetryPolicy::new(3, Duration::ZERO),
        ..Default::default()
    };

    publish_with(client, &records, &options).await.unwrap();
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let records = vec![TripEvent::sample()];

    let mut client = MockStreamingClient::new()
        .create_batch(MAX_BATCH_SIZE, Ok(()))
        .close(Ok(()));
    client
        .expect_send_batch()
        .times(2)
        .returning(|_| Err(throw!("throttled")));

    let options = PublishOptions {
        retry: RetryPolicy::new(2, Duration::ZERO),
        ..Default::default()
    };

    let result = publish_with(client, &records, &options).await;

    assert!(result.is_err());
}
