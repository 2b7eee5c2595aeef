use std::time::Duration;

use super::batch::DEFAULT_MAX_BATCH_SIZE;
use crate::{Args, Sensitive};

#[derive(Debug, Clone, Args)]
pub struct EventHubsConfig {
    /// Event Hubs connection string (Endpoint, SharedAccessKeyName, SharedAccessKey, EntityPath).
    #[clap(long = "connection-string", env = "EVENTHUB_CONNECTION_STR", hide_env_values = true)]
    pub connection_string: Sensitive<String>,

    /// Event hub to publish to. Defaults to the EntityPath of the connection string.
    #[clap(long = "event-hub-name", env = "EVENTHUB_NAME")]
    pub event_hub_name: Option<String>,

    /// Key routing every event of the batch to the same partition.
    #[clap(long = "partition-key", env = "EVENTHUB_PARTITION_KEY")]
    pub partition_key: Option<String>,

    #[clap(
        long = "max-batch-size",
        env = "EVENTHUB_MAX_BATCH_SIZE",
        default_value_t = DEFAULT_MAX_BATCH_SIZE
    )]
    pub max_batch_size: usize,

    #[clap(
        long = "connect-timeout-ms",
        env = "EVENTHUB_CONNECT_TIMEOUT_MS",
        default_value = "10000"
    )]
    pub connect_timeout_ms: u64,

    #[clap(
        long = "message-timeout-ms",
        env = "EVENTHUB_MESSAGE_TIMEOUT_MS",
        default_value = "30000"
    )]
    pub message_timeout_ms: u64,

    #[clap(
        long = "close-timeout-ms",
        env = "EVENTHUB_CLOSE_TIMEOUT_MS",
        default_value = "10000"
    )]
    pub close_timeout_ms: u64,

    #[clap(long = "linger-ms", env = "EVENTHUB_LINGER_MS", default_value = "5")]
    pub linger_ms: u64,
}

impl EventHubsConfig {
    /// Config with default tuning for the given connection string.
    pub fn new(connection_string: impl Into<Sensitive<String>>) -> Self {
        Self {
            connection_string: connection_string.into(),
            event_hub_name: None,
            partition_key: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            connect_timeout_ms: 10_000,
            message_timeout_ms: 30_000,
            close_timeout_ms: 10_000,
            linger_ms: 5,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }
}
