mod streaming_client_mock;

pub use streaming_client_mock::MockStreamingClient;
