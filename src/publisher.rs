//! Publishing trip records to an event hub.
//!
//! Every run follows the same bracket: open client, create batch, add records, send, close.
//! The client is closed exactly once on every path where it was opened.

use std::time::Duration;

use serde::Serialize;

use crate::{
    Args, EventData, EventHubsClient, EventHubsConfig, PayloadFormat, Result, StreamingClient,
    WrapErr,
};

/// Bounded retry with exponential backoff, applied to the send step only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

    /// A single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff: Self::DEFAULT_MAX_BACKOFF,
        }
    }

    /// Delay before retrying after the given failed attempt (1-based).
    pub fn backoff(&self, failed_attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(failed_attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOptions {
    pub format: PayloadFormat,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Args)]
pub struct PublishConfig {
    #[clap(
        value_enum,
        long = "payload-format",
        env = "TRIP_EVENTS_PAYLOAD_FORMAT",
        default_value = "spaced"
    )]
    pub payload_format: PayloadFormat,

    /// Send attempts before giving up, 1 disables retries.
    #[clap(
        long = "retry-attempts",
        env = "TRIP_EVENTS_RETRY_ATTEMPTS",
        default_value = "1"
    )]
    pub retry_attempts: u32,

    #[clap(
        long = "retry-backoff-ms",
        env = "TRIP_EVENTS_RETRY_BACKOFF_MS",
        default_value = "500"
    )]
    pub retry_backoff_ms: u64,
}

impl From<&PublishConfig> for PublishOptions {
    fn from(config: &PublishConfig) -> Self {
        Self {
            format: config.payload_format,
            retry: RetryPolicy::new(
                config.retry_attempts,
                Duration::from_millis(config.retry_backoff_ms),
            ),
        }
    }
}

/// Publishes `records` as one batch to the event hub described by `config`.
///
/// With no records nothing is sent and no connection is opened.
#[tracing::instrument(skip_all, fields(count = records.len()))]
pub async fn send_events<T>(
    config: &EventHubsConfig,
    records: &[T],
    options: &PublishOptions,
) -> Result<()>
where
    T: Serialize + Sync,
{
    if records.is_empty() {
        tracing::info!("no trip events to send");
        return Ok(());
    }

    let client = EventHubsClient::open(config).await?;
    publish_with(client, records, options).await
}

/// Runs the batch-and-send sequence on an opened client, then closes it.
///
/// Errors from the sequence win over an error from closing, which is only logged then.
pub async fn publish_with<C, T>(client: C, records: &[T], options: &PublishOptions) -> Result<()>
where
    C: StreamingClient,
    T: Serialize + Sync,
{
    let outcome = batch_and_send(&client, records, options).await;
    let closed = client.close().await;

    match (outcome, closed) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_error)) => Err(close_error),
        (Err(error), Ok(())) => Err(error),
        (Err(error), Err(close_error)) => {
            tracing::warn!(error = %close_error, "failed to close client after a failed send");
            Err(error)
        }
    }
}

async fn batch_and_send<C, T>(client: &C, records: &[T], options: &PublishOptions) -> Result<()>
where
    C: StreamingClient,
    T: Serialize + Sync,
{
    if records.is_empty() {
        tracing::info!("no trip events to send");
        return Ok(());
    }

    let mut batch = client
        .create_batch()
        .await
        .wrap_err("Failed to create event batch")?;

    for (index, record) in records.iter().enumerate() {
        let event = EventData::from_json(record, options.format)
            .wrap_err_with(|| format!("Failed to encode trip event #{}", index + 1))?;
        batch
            .try_add(event)
            .wrap_err_with(|| format!("Trip event #{} does not fit in the batch", index + 1))?;
    }

    let mut attempt = 1;
    loop {
        match client.send_batch(&batch).await {
            Ok(()) => break,
            Err(error) if attempt < options.retry.max_attempts => {
                let backoff = options.retry.backoff(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = options.retry.max_attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %error,
                    "failed to send batch, retrying"
                );
                crate::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(error) => {
                return Err(error).wrap_err_with(|| {
                    format!("Failed to send batch of {} trip events", batch.len())
                })
            }
        }
    }

    tracing::info!(
        count = batch.len(),
        bytes = batch.size_in_bytes(),
        attempts = attempt,
        "sent batch of trip events"
    );
    Ok(())
}
