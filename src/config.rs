//! Immutable client configuration: tenant alias, consumer credentials, and endpoints.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::ConfigError};

/// Production API root every request URL is built from.
pub const API_SERVER: &str = "https://api.stackpath.com/v1";
/// User agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Rust StackPathCDN API Client";

macro_rules! def_credential {
	($name:ident, $doc:literal, $field:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new credential after validation.
			pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
				let value = value.into();

				validate_view($field, &value)?;

				Ok(Self(value))
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = ConfigError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl FromStr for $name {
			type Err = ConfigError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

def_credential! { AccountAlias, "Tenant path segment inserted into every request URL.", "company alias" }
def_credential! { ConsumerKey, "OAuth 1.0a consumer key.", "consumer key" }
def_credential! { ConsumerSecret, "OAuth 1.0a consumer secret; redacted when formatted.", "consumer secret" }

impl Deref for AccountAlias {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for AccountAlias {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "AccountAlias({})", self.0)
	}
}
impl Display for AccountAlias {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

impl Debug for ConsumerKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ConsumerKey({})", self.0)
	}
}

impl ConsumerSecret {
	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for ConsumerSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ConsumerSecret").field(&"<redacted>").finish()
	}
}
impl Display for ConsumerSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Credentials and endpoint settings held for the lifetime of a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Tenant path segment.
	pub account_alias: AccountAlias,
	/// OAuth consumer key.
	pub consumer_key: ConsumerKey,
	/// OAuth consumer secret.
	pub consumer_secret: ConsumerSecret,
	/// API root; defaults to [`API_SERVER`].
	#[serde(default = "default_base_url")]
	pub base_url: String,
	/// User agent header value; defaults to [`DEFAULT_USER_AGENT`].
	#[serde(default = "default_user_agent")]
	pub user_agent: String,
}
impl ClientConfig {
	/// Validates the three credentials and pins the production endpoint.
	pub fn new(
		account_alias: impl Into<String>,
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			account_alias: AccountAlias::new(account_alias)?,
			consumer_key: ConsumerKey::new(consumer_key)?,
			consumer_secret: ConsumerSecret::new(consumer_secret)?,
			base_url: default_base_url(),
			user_agent: default_user_agent(),
		})
	}

	/// Points the client at another API root, e.g. a staging or mock server.
	///
	/// Any trailing slash is dropped so URL construction never doubles it.
	pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
		let raw = base_url.as_ref().trim_end_matches('/');
		let parsed = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if parsed.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: raw.to_owned() });
		}

		self.base_url = raw.to_owned();

		Ok(self)
	}

	/// Overrides the user agent header.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// OAuth request-token endpoint derived from the base URL.
	pub fn request_token_url(&self) -> String {
		format!("{}/oauth/request_token", self.base_url)
	}

	/// OAuth access-token endpoint derived from the base URL.
	pub fn access_token_url(&self) -> String {
		format!("{}/oauth/access_token", self.base_url)
	}
}

fn default_base_url() -> String {
	API_SERVER.to_owned()
}

fn default_user_agent() -> String {
	DEFAULT_USER_AGENT.to_owned()
}

fn validate_view(field: &'static str, view: &str) -> Result<(), ConfigError> {
	if view.is_empty() { Err(ConfigError::MissingCredential { field }) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_credentials_are_rejected() {
		let err = ClientConfig::new("", "key", "secret")
			.expect_err("An empty alias must be rejected.");

		assert!(matches!(err, ConfigError::MissingCredential { field: "company alias" }));

		let err =
			ClientConfig::new("acme", "", "secret").expect_err("An empty key must be rejected.");

		assert!(matches!(err, ConfigError::MissingCredential { field: "consumer key" }));

		let err =
			ClientConfig::new("acme", "key", "").expect_err("An empty secret must be rejected.");

		assert!(matches!(err, ConfigError::MissingCredential { field: "consumer secret" }));
	}

	#[test]
	fn valid_credentials_are_exposed_unchanged() {
		let config =
			ClientConfig::new("acme", "key-1", "secret-1").expect("Credentials should be valid.");

		assert_eq!(config.account_alias.as_ref(), "acme");
		assert_eq!(config.consumer_key.as_ref(), "key-1");
		assert_eq!(config.consumer_secret.expose(), "secret-1");
		assert_eq!(config.base_url, API_SERVER);
		assert_eq!(config.request_token_url(), "https://api.stackpath.com/v1/oauth/request_token");
		assert_eq!(config.access_token_url(), "https://api.stackpath.com/v1/oauth/access_token");
	}

	#[test]
	fn secret_formatters_redact() {
		let config = ClientConfig::new("acme", "key-1", "super-secret")
			.expect("Credentials should be valid.");

		assert_eq!(format!("{}", config.consumer_secret), "<redacted>");
		assert!(!format!("{config:?}").contains("super-secret"));
	}

	#[test]
	fn base_url_override_drops_trailing_slash() {
		let config = ClientConfig::new("acme", "key", "secret")
			.expect("Credentials should be valid.")
			.with_base_url("http://127.0.0.1:5000/v1/")
			.expect("Mock base URL should parse.");

		assert_eq!(config.base_url, "http://127.0.0.1:5000/v1");

		let err = ClientConfig::new("acme", "key", "secret")
			.expect("Credentials should be valid.")
			.with_base_url("not a url")
			.expect_err("Garbage base URLs must be rejected.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let payload = r#"{"account_alias":"acme","consumer_key":"k","consumer_secret":"s"}"#;
		let config: ClientConfig =
			serde_json::from_str(payload).expect("Config should deserialize successfully.");

		assert_eq!(config.base_url, API_SERVER);
		assert_eq!(config.user_agent, DEFAULT_USER_AGENT);

		let invalid = r#"{"account_alias":"","consumer_key":"k","consumer_secret":"s"}"#;

		assert!(serde_json::from_str::<ClientConfig>(invalid).is_err());
	}
}
