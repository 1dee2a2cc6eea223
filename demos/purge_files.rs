//! Purges cached files from a site against a local mock of the StackPath API, showing the
//! indexed querystring the DELETE endpoint expects.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::Value;
// self
use stackpath_cdn::{ApiClient, ClientConfig, FileList, http::ReqwestHttpClient};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let purge_mock = server
		.mock_async(|when, then| {
			when.method(DELETE)
				.path("/v1/demo/sites/1/cache")
				.query_param("files[0]", "/css/app.css")
				.query_param("files[1]", "/js/app.js");
			then.status(200).header("content-type", "application/json").body("{\"code\":200}");
		})
		.await;
	let config = ClientConfig::new("demo", "demo-key", "demo-secret")?
		.with_base_url(server.url("/v1"))?;
	let client =
		<ApiClient<ReqwestHttpClient>>::with_http_client(config, ReqwestHttpClient::default())?;
	let files = FileList { files: vec!["/css/app.css".into(), "/js/app.js".into()] };
	let purged: Value = client.delete("sites/1/cache", files).await?;

	println!("Purge response: {purged}.");

	purge_mock.assert_async().await;

	Ok(())
}
