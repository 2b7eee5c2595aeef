mod batch;
mod connection_string;
mod event_data;
mod event_hubs_client;
mod event_hubs_config;
mod streaming_client;

pub use batch::{BatchError, EventBatch, DEFAULT_MAX_BATCH_SIZE};
pub use connection_string::{ConnectionString, ConnectionStringError, KAFKA_PORT};
pub use event_data::{EventData, CONTENT_TYPE_PROPERTY, JSON_CONTENT_TYPE};
pub use event_hubs_client::EventHubsClient;
pub use event_hubs_config::EventHubsConfig;
pub use streaming_client::StreamingClient;
