// crates.io
use httpmock::MockServer;
// self
use stackpath_cdn::{ClientConfig, client::ReqwestApiClient, http::ReqwestHttpClient};

pub const ALIAS: &str = "acme";
pub const CONSUMER_KEY: &str = "consumer-key";
pub const CONSUMER_SECRET: &str = "consumer-secret";

/// Builds a reqwest-backed client pointed at `{server}/v1`.
pub fn build_test_client(server: &MockServer) -> ReqwestApiClient {
	let config = ClientConfig::new(ALIAS, CONSUMER_KEY, CONSUMER_SECRET)
		.expect("Test credentials should be valid.")
		.with_base_url(server.url("/v1"))
		.expect("Mock server URL should be a valid base URL.");

	ReqwestApiClient::with_http_client(config, ReqwestHttpClient::default())
		.expect("Client should build against the mock server.")
}
