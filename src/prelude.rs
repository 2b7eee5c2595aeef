pub use crate::{
    encoding::PayloadFormat,
    input::{InputConfig, InputSource},
    lang::sensitive::Sensitive,
    logging::{Tracing, TracingConfig, TracingFormat},
    publisher::{publish_with, send_events, PublishConfig, PublishOptions, RetryPolicy},
    streaming::{
        BatchError, ConnectionString, ConnectionStringError, EventBatch, EventData,
        EventHubsClient, EventHubsConfig, StreamingClient,
    },
    trip::{TripDetails, TripEvent},
    Config, Environment, EnvironmentConfig,
};

// Traits
pub use async_trait::async_trait;
pub use clap::{self, Args, Parser};
pub use thiserror::Error;

// Type Replacements
pub use eyre::{self, Result, WrapErr};
pub use tokio::{main as async_main, sync, task, time};

pub use tracing::{debug, error, info, instrument, instrument::Instrument, span, trace, warn};

// Feature enablement
pub trait Feature {
    fn init(service_name: &str, config: &EnvironmentConfig) -> Result<Self>
    where
        Self: Sized;
}
