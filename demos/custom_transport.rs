//! Plugs a custom [`ApiHttpClient`] into the client, here an offline transport that echoes
//! the signed request back as JSON instead of touching the network.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use serde_json::{Value, json};
// self
use stackpath_cdn::{
	ApiClient, ClientConfig,
	http::{ApiHttpClient, ApiRequest, HttpFuture, RawResponse},
};

struct EchoHttpClient;
impl ApiHttpClient for EchoHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, RawResponse> {
		Box::pin(async move {
			let body = json!({
				"method": request.method.as_str(),
				"url": request.url.as_str(),
				"authorization": request.header("authorization"),
				"body": request.body,
			});

			Ok(RawResponse { status: 200, body: body.to_string() })
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::new("demo", "demo-key", "demo-secret")?;
	let client: ApiClient<EchoHttpClient> =
		ApiClient::with_http_client(config, Arc::new(EchoHttpClient))?;
	let echoed: Value = client.post("sites", "name=edge&origin=origin.example.com").await?;

	println!("{}", serde_json::to_string_pretty(&echoed)?);

	Ok(())
}
