use super::EventBatch;

#[crate::async_trait]
pub trait StreamingClient: Sync + Send + 'static {
    /// Creates an empty batch sized to what the endpoint accepts.
    async fn create_batch(&self) -> crate::Result<EventBatch>;

    /// Sends every event of the batch; fails unless all of them are acknowledged.
    async fn send_batch(&self, batch: &EventBatch) -> crate::Result<()>;

    async fn health_check(&self) -> crate::Result<()>;

    /// Flushes outstanding deliveries and releases the connection.
    async fn close(&self) -> crate::Result<()>;
}
