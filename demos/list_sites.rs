//! Lists the CDN sites of an account using credentials from the environment.
//!
//! ```sh
//! STACKPATH_ALIAS=acme STACKPATH_KEY=... STACKPATH_SECRET=... cargo run --example list_sites
//! ```

// std
use std::env;
// crates.io
use color_eyre::Result;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client = stackpath_cdn::create(
		env::var("STACKPATH_ALIAS")?,
		env::var("STACKPATH_KEY")?,
		env::var("STACKPATH_SECRET")?,
	)?;
	let sites: Value = client.get("/sites").await?;

	println!("{}", serde_json::to_string_pretty(&sites)?);

	Ok(())
}
