use std::{
    fmt::{Debug, Formatter},
    time::Duration,
};

use eyre::WrapErr;
use futures_util::future::join_all;
use rdkafka::{
    error::KafkaError,
    message::{Header, OwnedHeaders},
    producer::{FutureProducer, FutureRecord, Producer},
    ClientConfig,
};

use super::{ConnectionString, EventBatch, EventData, EventHubsConfig, StreamingClient};

use crate::{throw, Result};

/// SASL user the Event Hubs Kafka endpoint expects when authenticating with a connection string.
const CONNECTION_STRING_USER: &str = "$ConnectionString";

#[derive(Clone)]
pub struct EventHubsClient {
    producer: FutureProducer,
    event_hub_name: String,
    partition_key: Option<String>,
    max_batch_size: usize,
    connect_timeout: Duration,
    close_timeout: Duration,
}

impl EventHubsClient {
    /// Creates a producer connected to the event hub through its Kafka endpoint.
    ///
    /// The connection is validated immediately after creation, and if the hub cannot be
    /// reached or the credentials are rejected, the client creation will fail with an error.
    pub async fn open(config: &EventHubsConfig) -> Result<Self> {
        let connection: ConnectionString = config
            .connection_string
            .parse()
            .wrap_err("Invalid Event Hubs connection string")?;
        let event_hub_name = connection.resolve_event_hub_name(config.event_hub_name.as_deref())?;
        let bootstrap_server = connection.kafka_bootstrap_server()?;

        tracing::info!(
            bootstrap_server = %bootstrap_server,
            event_hub = %event_hub_name,
            "opening event hubs client"
        );

        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", &bootstrap_server)
            .set("security.protocol", "sasl_ssl")
            .set("sasl.mechanism", "PLAIN")
            .set("sasl.username", CONNECTION_STRING_USER)
            .set("sasl.password", config.connection_string.as_str())
            .set("message.timeout.ms", config.message_timeout_ms.to_string())
            .set("linger.ms", config.linger_ms.to_string());

        let client = EventHubsClient {
            producer: client_config
                .create()
                .wrap_err("Failed to open connection with Event Hubs")?,
            event_hub_name,
            partition_key: config.partition_key.clone(),
            max_batch_size: config.max_batch_size,
            connect_timeout: config.connect_timeout(),
            close_timeout: config.close_timeout(),
        };

        client.health_check().await?;

        Ok(client)
    }

    pub fn event_hub_name(&self) -> &str {
        &self.event_hub_name
    }
}

#[crate::async_trait]
impl StreamingClient for EventHubsClient {
    async fn create_batch(&self) -> Result<EventBatch> {
        Ok(EventBatch::new(
            self.max_batch_size,
            self.partition_key.clone(),
        ))
    }

    /// Enqueues every event of the batch, then waits for all delivery reports.
    async fn send_batch(&self, batch: &EventBatch) -> Result<()> {
        let mut deliveries = Vec::with_capacity(batch.len());

        for event in batch {
            let record = build_record(&self.event_hub_name, event, batch.partition_key());

            let delivery = self
                .producer
                .send_result(record)
                .map_err(|(e, _)| e)
                .wrap_err("Failed to enqueue event for Event Hubs")?;
            deliveries.push(delivery);
        }

        // every report is awaited before the first failure is returned
        check_deliveries(join_all(deliveries).await)?;

        tracing::debug!(
            event_hub = %self.event_hub_name,
            count = batch.len(),
            bytes = batch.size_in_bytes(),
            "batch acknowledged"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        let producer = self.producer.clone();
        let topic = self.event_hub_name.clone();
        let timeout = self.connect_timeout;

        crate::task::spawn_blocking(move || {
            producer
                .client()
                .fetch_metadata(Some(topic.as_str()), timeout)
                .map(|_| ())
        })
        .await?
        .wrap_err("Failed to check Event Hubs health")?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let producer = self.producer.clone();
        let timeout = self.close_timeout;

        tracing::debug!(event_hub = %self.event_hub_name, "closing event hubs client");
        crate::task::spawn_blocking(move || producer.flush(timeout))
            .await?
            .wrap_err("Failed to flush Event Hubs producer")?;
        Ok(())
    }
}

/// Converts an event into a Kafka record: properties become headers, the partition key the key.
fn build_record<'a>(
    topic: &'a str,
    event: &'a EventData,
    partition_key: Option<&'a str>,
) -> FutureRecord<'a, str, [u8]> {
    let mut headers = OwnedHeaders::new_with_capacity(event.properties().len());
    for (key, value) in event.properties() {
        headers = headers.insert(Header {
            key,
            value: Some(value.as_str()),
        });
    }

    let record = FutureRecord::to(topic)
        .payload(event.body())
        .headers(headers);

    match partition_key {
        Some(key) => record.key(key),
        None => record,
    }
}

/// Fails on the first report, in batch order, that is not an acknowledgement.
fn check_deliveries<T, M, C>(reports: Vec<Result<Result<T, (KafkaError, M)>, C>>) -> Result<()> {
    for (index, report) in reports.into_iter().enumerate() {
        match report {
            Ok(Ok(_)) => {}
            Ok(Err((e, _))) => {
                return Err(e).wrap_err_with(|| {
                    format!("Failed to deliver event #{} to Event Hubs", index + 1)
                })
            }
            Err(_) => {
                return Err(throw!(
                    "Delivery of event #{} was canceled before an acknowledgement",
                    index + 1
                ))
            }
        }
    }

    Ok(())
}

impl Debug for EventHubsClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHubsClient")
            .field("producer", &"...")
            .field("event_hub_name", &self.event_hub_name)
            .field("partition_key", &self.partition_key)
            .finish_non_exhaustive()
    }
}
