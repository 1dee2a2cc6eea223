//! OAuth 1.0a signing collaborator.
//!
//! Signatures come from [`oauth1_request`]'s HMAC-SHA1 signer; this module only feeds it the
//! consumer credentials and request parameters. [`OAuthConsumer`] pairs the signer with the
//! fixed request headers and an [`ApiHttpClient`], dispatches one signed exchange per call,
//! and reports non-2xx answers as [`TransportError::Status`].

// std
use std::num::NonZeroU64;
// crates.io
use oauth1_request::{Builder, Credentials, HmacSha1, Request, serializer::Serializer};
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::TransportError,
	http::{ApiHttpClient, ApiRequest, HttpMethod, RawResponse},
	obs,
	params::{self, ParamMap},
};

/// Signature method advertised in `oauth_signature_method`.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
// `oauth_*` keys in ascending order, as the signer expects them interleaved.
const OAUTH_KEYS: [&str; 8] = [
	"oauth_callback",
	"oauth_consumer_key",
	"oauth_nonce",
	"oauth_signature_method",
	"oauth_timestamp",
	"oauth_token",
	"oauth_verifier",
	"oauth_version",
];

/// Two-legged HMAC-SHA1 signer over the consumer credentials.
#[derive(Clone)]
pub struct OAuthSigner {
	consumer_key: String,
	consumer_secret: String,
}
impl OAuthSigner {
	/// Builds a signer for the given consumer credentials.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
		Self { consumer_key: consumer_key.into(), consumer_secret: consumer_secret.into() }
	}

	/// Returns an `Authorization` header value for the request, with a fresh nonce and the
	/// current time.
	///
	/// `form` holds the decoded body parameters; URL query parameters are read from `url`.
	pub fn authorization(
		&self,
		method: HttpMethod,
		url: &Url,
		form: &[(String, String)],
	) -> String {
		self.authorize(method, url, form, None, None)
	}

	/// Deterministic variant of [`authorization`](Self::authorization).
	pub fn authorization_with(
		&self,
		method: HttpMethod,
		url: &Url,
		form: &[(String, String)],
		nonce: &str,
		timestamp: NonZeroU64,
	) -> String {
		self.authorize(method, url, form, Some(nonce), Some(timestamp))
	}

	fn authorize(
		&self,
		method: HttpMethod,
		url: &Url,
		form: &[(String, String)],
		nonce: Option<&str>,
		timestamp: Option<NonZeroU64>,
	) -> String {
		let mut target = url.clone();

		target.set_query(None);
		target.set_fragment(None);

		let request = SignedParams::new(
			url.query_pairs()
				.map(|(k, v)| (k.into_owned(), v.into_owned()))
				.chain(form.iter().cloned()),
		);
		let credentials =
			Credentials::new(self.consumer_key.as_str(), self.consumer_secret.as_str());
		let mut builder = Builder::<_, _>::new(credentials, HmacSha1::new());

		builder.nonce(nonce).timestamp(timestamp).version(true);

		match method {
			HttpMethod::Get => builder.get(target.as_str(), &request),
			HttpMethod::Put => builder.put(target.as_str(), &request),
			HttpMethod::Post => builder.post(target.as_str(), &request),
			HttpMethod::Delete => builder.delete(target.as_str(), &request),
		}
	}
}
impl Debug for OAuthSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthSigner")
			.field("consumer_key", &self.consumer_key)
			.field("consumer_secret", &"<redacted>")
			.field("signature_method", &SIGNATURE_METHOD)
			.finish()
	}
}

/// Signing collaborator: endpoints, fixed headers, signer, and transport.
pub struct OAuthConsumer<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// OAuth request-token endpoint.
	pub request_token_url: String,
	/// OAuth access-token endpoint.
	pub access_token_url: String,
	/// Headers sent with every request, before `Authorization`.
	pub headers: Vec<(String, String)>,
	signer: OAuthSigner,
	http_client: Arc<C>,
}
impl<C> OAuthConsumer<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Configures a two-legged HMAC-SHA1 consumer from the client configuration.
	pub fn from_config(config: &ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		let signer =
			OAuthSigner::new(config.consumer_key.as_ref(), config.consumer_secret.expose());
		let headers = vec![
			("Accept".to_owned(), "*/*".to_owned()),
			("Connection".to_owned(), "close".to_owned()),
			("User-Agent".to_owned(), config.user_agent.clone()),
		];

		Self {
			request_token_url: config.request_token_url(),
			access_token_url: config.access_token_url(),
			headers,
			signer,
			http_client: http_client.into(),
		}
	}

	/// Returns the signer backing this consumer.
	pub fn signer(&self) -> &OAuthSigner {
		&self.signer
	}

	/// Signs `request` parts, dispatches them, and classifies the status code.
	///
	/// `form` is sent as an `application/x-www-form-urlencoded` body and signed; `None`
	/// sends no body at all.
	pub async fn dispatch(
		&self,
		method: HttpMethod,
		url: Url,
		form: Option<&ParamMap>,
	) -> Result<RawResponse, TransportError> {
		let pairs = form.map(params::form_pairs).unwrap_or_default();
		let authorization = self.signer.authorization(method, &url, &pairs);
		let mut headers = self.headers.clone();
		let body = form.map(params::stringify);

		if body.is_some() {
			headers.push(("Content-Type".to_owned(), FORM_CONTENT_TYPE.to_owned()));
		}

		headers.push(("Authorization".to_owned(), authorization));

		let response =
			self.http_client.execute(ApiRequest { method, url, headers, body }).await?;

		obs::trace_response(method, response.status);

		if response.is_success() {
			Ok(response)
		} else {
			Err(TransportError::Status { status_code: response.status, data: response.body })
		}
	}
}
impl<C> Debug for OAuthConsumer<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthConsumer")
			.field("request_token_url", &self.request_token_url)
			.field("access_token_url", &self.access_token_url)
			.field("headers", &self.headers)
			.field("signer", &self.signer)
			.finish()
	}
}

// Query and form parameters, sorted by key then value, handed to the signer.
struct SignedParams(Vec<(String, String)>);
impl SignedParams {
	fn new(pairs: impl Iterator<Item = (String, String)>) -> Self {
		let mut pairs = pairs.collect::<Vec<_>>();

		pairs.sort();

		Self(pairs)
	}
}
impl Request for SignedParams {
	fn serialize<S>(&self, mut serializer: S) -> S::Output
	where
		S: Serializer,
	{
		let mut oauth_keys = OAUTH_KEYS.iter().peekable();

		for (key, value) in &self.0 {
			while let Some(oauth_key) = oauth_keys.next_if(|oauth_key| **oauth_key < key.as_str()) {
				serialize_oauth(&mut serializer, oauth_key);
			}

			serializer.serialize_parameter(key, value);
		}
		for oauth_key in oauth_keys {
			serialize_oauth(&mut serializer, oauth_key);
		}

		serializer.end()
	}
}

fn serialize_oauth<S>(serializer: &mut S, key: &str)
where
	S: Serializer,
{
	match key {
		"oauth_callback" => serializer.serialize_oauth_callback(),
		"oauth_consumer_key" => serializer.serialize_oauth_consumer_key(),
		"oauth_nonce" => serializer.serialize_oauth_nonce(),
		"oauth_signature_method" => serializer.serialize_oauth_signature_method(),
		"oauth_timestamp" => serializer.serialize_oauth_timestamp(),
		"oauth_token" => serializer.serialize_oauth_token(),
		"oauth_verifier" => serializer.serialize_oauth_verifier(),
		_ => serializer.serialize_oauth_version(),
	}
}
