// std
use std::{
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
use serde_json::{Value, json};
// self
use stackpath_cdn::{
	ApiClient, ClientConfig,
	error::{ConfigError, Error, TransportError},
	http::{ApiHttpClient, ApiRequest, HttpFuture, HttpMethod, RawResponse},
};

#[derive(Debug)]
struct ConnectionReset;
impl Display for ConnectionReset {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Connection reset by peer.")
	}
}
impl std::error::Error for ConnectionReset {}

/// Answers every request with a scripted outcome and records what it saw.
#[derive(Default)]
struct ScriptedHttpClient {
	fail: bool,
	seen: Mutex<Vec<ApiRequest>>,
}
impl ScriptedHttpClient {
	fn failing() -> Self {
		Self { fail: true, ..Default::default() }
	}

	fn seen(&self) -> Vec<ApiRequest> {
		self.seen.lock().clone()
	}
}
impl ApiHttpClient for ScriptedHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, RawResponse> {
		let fail = self.fail;
		let path = request.url.path().to_owned();

		self.seen.lock().push(request);

		Box::pin(async move {
			if fail {
				return Err(TransportError::network(ConnectionReset));
			}

			Ok(RawResponse { status: 200, body: json!({ "path": path }).to_string() })
		})
	}
}

fn build_client(http: Arc<ScriptedHttpClient>) -> ApiClient<ScriptedHttpClient> {
	let config = ClientConfig::new("tenant-7", "key", "secret").expect("Config should be valid.");

	ApiClient::with_http_client(config, http).expect("Client should build.")
}

#[tokio::test]
async fn network_failures_are_forwarded_untouched() {
	let http = Arc::new(ScriptedHttpClient::failing());
	let client = build_client(http.clone());
	let err = client.get::<Value>("sites").await.expect_err("Network failures must surface.");

	match err {
		Error::Transport(TransportError::Network { source }) => {
			assert_eq!(source.to_string(), "Connection reset by peer.");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(http.seen().len(), 1, "Failed requests must not be retried.");
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
	let http = Arc::new(ScriptedHttpClient::default());
	let client = build_client(http.clone());
	let (first, second): (Result<Value, Error>, Result<Value, Error>) =
		tokio::join!(client.get("sites/a"), client.get("sites/b"));

	assert_eq!(first.expect("First call should succeed.")["path"], json!("/v1/tenant-7/sites/a"));
	assert_eq!(second.expect("Second call should succeed.")["path"], json!("/v1/tenant-7/sites/b"));

	let seen = http.seen();

	assert_eq!(seen.len(), 2);
	assert!(seen.iter().all(|request| request.method == HttpMethod::Get));

	let nonces = seen
		.iter()
		.filter_map(|request| request.header("authorization"))
		.collect::<Vec<_>>();

	assert_eq!(nonces.len(), 2);
	assert_ne!(nonces[0], nonces[1], "Each request must be signed independently.");
}

#[tokio::test]
async fn requests_target_the_production_endpoint_by_default() {
	let http = Arc::new(ScriptedHttpClient::default());
	let client = build_client(http.clone());
	let _: Value = client.get("/sites").await.expect("GET should succeed.");
	let request = http.seen().pop().expect("A request should have been recorded.");

	assert_eq!(request.url.as_str(), "https://api.stackpath.com/v1/tenant-7/sites");
	assert_eq!(request.header("connection"), Some("close"));
	assert_eq!(request.body, None);
	assert_eq!(
		client.consumer().request_token_url,
		"https://api.stackpath.com/v1/oauth/request_token"
	);
	assert_eq!(
		client.consumer().access_token_url,
		"https://api.stackpath.com/v1/oauth/access_token"
	);
}

#[test]
fn create_rejects_missing_credentials() {
	let err = stackpath_cdn::create("acme", "", "secret")
		.expect_err("An empty consumer key must be rejected.");

	assert!(matches!(
		err,
		Error::Config(ConfigError::MissingCredential { field: "consumer key" })
	));

	let client =
		stackpath_cdn::create("acme", "key", "secret").expect("Valid credentials should build.");

	assert_eq!(client.config.account_alias.as_ref(), "acme");
	assert_eq!(client.config.consumer_key.as_ref(), "key");
	assert_eq!(client.config.consumer_secret.expose(), "secret");
}
