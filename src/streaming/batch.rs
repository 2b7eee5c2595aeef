use super::EventData;
use crate::Error;

/// Standard-tier Event Hubs limit for one batch, in bytes.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1_046_528;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("event of {event_size} bytes does not fit in batch ({size} of {max_size} bytes used)")]
    TooLarge {
        event_size: usize,
        size: usize,
        max_size: usize,
    },
}

/// An ordered, size-bounded group of events sent in a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBatch {
    events: Vec<EventData>,
    size_in_bytes: usize,
    max_size_in_bytes: usize,
    partition_key: Option<String>,
}

impl EventBatch {
    pub fn new(max_size_in_bytes: usize, partition_key: Option<String>) -> Self {
        Self {
            events: Vec::new(),
            size_in_bytes: 0,
            max_size_in_bytes,
            partition_key,
        }
    }

    /// Appends an event, or leaves the batch untouched when it would overflow.
    pub fn try_add(&mut self, event: EventData) -> Result<(), BatchError> {
        let event_size = event.size_in_bytes();

        if self.size_in_bytes + event_size > self.max_size_in_bytes {
            return Err(BatchError::TooLarge {
                event_size,
                size: self.size_in_bytes,
                max_size: self.max_size_in_bytes,
            });
        }

        self.size_in_bytes += event_size;
        self.events.push(event);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    pub fn max_size_in_bytes(&self) -> usize {
        self.max_size_in_bytes
    }

    pub fn partition_key(&self) -> Option<&str> {
        self.partition_key.as_deref()
    }

    pub fn events(&self) -> &[EventData] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventData> {
        self.events.iter()
    }
}

impl Default for EventBatch {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BATCH_SIZE, None)
    }
}

impl<'a> IntoIterator for &'a EventBatch {
    type Item = &'a EventData;
    type IntoIter = std::slice::Iter<'a, EventData>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
