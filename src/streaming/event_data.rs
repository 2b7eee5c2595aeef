use std::collections::BTreeMap;

use serde::Serialize;

use crate::{PayloadFormat, Result};

pub const CONTENT_TYPE_PROPERTY: &str = "content-type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// One serialized event: a body plus string application properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventData {
    body: Vec<u8>,
    properties: BTreeMap<String, String>,
}

impl EventData {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Serializes a record as a JSON event tagged with its content type.
    pub fn from_json<T: Serialize + ?Sized>(record: &T, format: PayloadFormat) -> Result<Self> {
        Ok(Self::new(format.encode(record)?).with_property(CONTENT_TYPE_PROPERTY, JSON_CONTENT_TYPE))
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Bytes counted against a batch limit: body plus every property key and value.
    pub fn size_in_bytes(&self) -> usize {
        self.body.len()
            + self
                .properties
                .iter()
                .map(|(key, value)| key.len() + value.len())
                .sum::<usize>()
    }
}
