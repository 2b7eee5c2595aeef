use crate::{
    async_trait, throw, EventBatch, Result, StreamingClient as StreamingClientInterface,
};
use mockall::{mock, predicate::eq};

mock! {
    pub StreamingClient {}

    #[async_trait]
    impl StreamingClientInterface for StreamingClient {
        async fn create_batch(&self) -> Result<EventBatch>;
        async fn send_batch(&self, batch: &EventBatch) -> Result<()>;
        async fn health_check(&self) -> Result<()>;
        async fn close(&self) -> Result<()>;
    }
}

impl MockStreamingClient {
    pub fn create_batch(mut self, max_size_in_bytes: usize, result: Result<()>) -> Self {
        self.expect_create_batch()
            .times(1)
            .returning(move || match &result {
                Ok(_) => Ok(EventBatch::new(max_size_in_bytes, None)),
                Err(_) => Err(throw!("Create batch error")),
            });

        self
    }

    pub fn send_batch(mut self, batch: EventBatch, result: Result<()>) -> Self {
        self.expect_send_batch()
            .times(1)
            .with(eq(batch))
            .returning(move |_| match &result {
                Ok(_) => Ok(()),
                Err(_) => Err(throw!("Send batch error")),
            });

        self
    }

    pub fn health_check(mut self, result: Result<()>) -> Self {
        self.expect_health_check()
            .times(1)
            .returning(move || match &result {
                Ok(_) => Ok(()),
                Err(_) => Err(throw!("Health check error")),
            });

        self
    }

    pub fn close(mut self, result: Result<()>) -> Self {
        self.expect_close()
            .times(1)
            .returning(move || match &result {
                Ok(_) => Ok(()),
                Err(_) => Err(throw!("Close error")),
            });

        self
    }
}
