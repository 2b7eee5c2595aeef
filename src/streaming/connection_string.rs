use std::str::FromStr;

use crate::{Error, Sensitive};

/// Port of the Kafka protocol listener on an Event Hubs namespace.
pub const KAFKA_PORT: u16 = 9093;

/// AMQP listener ports; an endpoint naming one of these still uses the Kafka port.
const AMQP_PORTS: [u16; 2] = [5671, 5672];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionStringError {
    #[error("connection string segment {0:?} is not a key=value pair")]
    MalformedSegment(String),

    #[error("connection string has no Endpoint")]
    MissingEndpoint,

    #[error("connection string Endpoint {0:?} has no host")]
    InvalidEndpoint(String),

    #[error("event hub name {configured:?} does not match EntityPath {entity_path:?}")]
    EventHubNameMismatch {
        configured: String,
        entity_path: String,
    },

    #[error("no event hub name configured and the connection string has no EntityPath")]
    MissingEventHubName,
}

/// The parts of an Event Hubs connection string needed to reach the namespace.
///
/// Credentials are kept only so they stay masked; checking them is left to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub endpoint: String,
    pub shared_access_key_name: Option<String>,
    pub shared_access_key: Option<Sensitive<String>>,
    pub shared_access_signature: Option<Sensitive<String>>,
    pub entity_path: Option<String>,
}

impl ConnectionString {
    /// Namespace host taken from the endpoint, e.g. `myns.servicebus.windows.net`.
    pub fn host(&self) -> Result<&str, ConnectionStringError> {
        let without_scheme = match self.endpoint.split_once("://") {
            Some((_, rest)) => rest,
            None => self.endpoint.as_str(),
        };
        let host = without_scheme
            .split(|c: char| c == '/' || c == '?')
            .next()
            .unwrap_or_default()
            .trim();

        if host.is_empty() {
            return Err(ConnectionStringError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(host)
    }

    /// `host:port` of the namespace Kafka listener.
    ///
    /// An explicit port in the endpoint is kept (emulators, tunnels) unless it is an AMQP
    /// port, which is replaced by [`KAFKA_PORT`].
    pub fn kafka_bootstrap_server(&self) -> Result<String, ConnectionStringError> {
        let host = self.host()?;

        match host.rsplit_once(':') {
            Some((name, port)) => match port.parse::<u16>() {
                Ok(port) if AMQP_PORTS.contains(&port) => Ok(format!("{}:{}", name, KAFKA_PORT)),
                Ok(_) => Ok(host.to_string()),
                Err(_) => Err(ConnectionStringError::InvalidEndpoint(self.endpoint.clone())),
            },
            None => Ok(format!("{}:{}", host, KAFKA_PORT)),
        }
    }

    /// Picks the event hub to publish to from configuration and the connection string.
    pub fn resolve_event_hub_name(
        &self,
        configured: Option<&str>,
    ) -> Result<String, ConnectionStringError> {
        let configured = configured.map(str::trim).filter(|name| !name.is_empty());

        match (configured, self.entity_path.as_deref()) {
            (Some(configured), Some(entity_path)) if configured != entity_path => {
                Err(ConnectionStringError::EventHubNameMismatch {
                    configured: configured.to_string(),
                    entity_path: entity_path.to_string(),
                })
            }
            (Some(name), _) | (None, Some(name)) => Ok(name.to_string()),
            (None, None) => Err(ConnectionStringError::MissingEventHubName),
        }
    }
}

impl FromStr for ConnectionString {
    type Err = ConnectionStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut endpoint = None;
        let mut shared_access_key_name = None;
        let mut shared_access_key = None;
        let mut shared_access_signature = None;
        let mut entity_path = None;

        for segment in s.split(';').map(str::trim).filter(|it| !it.is_empty()) {
            // values may contain '=' (base64 keys), so only the first one splits
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ConnectionStringError::MalformedSegment(segment.to_string()))?;
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value),
                "sharedaccesskeyname" => shared_access_key_name = Some(value),
                "sharedaccesskey" => shared_access_key = Some(Sensitive::new(value)),
                "sharedaccesssignature" => shared_access_signature = Some(Sensitive::new(value)),
                "entitypath" => entity_path = Some(value),
                other => tracing::debug!(key = other, "ignoring connection string key"),
            }
        }

        Ok(Self {
            endpoint: endpoint.ok_or(ConnectionStringError::MissingEndpoint)?,
            shared_access_key_name,
            shared_access_key,
            shared_access_signature,
            entity_path: entity_path.filter(|it| !it.is_empty()),
        })
    }
}
