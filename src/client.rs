//! StackPath API client: URL construction, verb methods, and response normalization.
//!
//! Every verb method performs exactly one signed exchange through [`OAuthConsumer`] and
//! resolves once. Transport failures (including non-2xx answers) are returned untouched;
//! successful bodies are decoded as JSON, and an undecodable body becomes an
//! [`InvalidJsonError`] whose reported status is always 500.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::{InvalidJsonError, TransportError},
	http::{ApiHttpClient, HttpMethod, RawResponse},
	oauth::OAuthConsumer,
	obs::{self, RequestOutcome, RequestSpan},
	params::{ParamMap, Params},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// Client specialized for the crate's default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient>;

/// Creates a reqwest-backed client; equivalent to [`ApiClient::new`].
#[cfg(feature = "reqwest")]
pub fn create(
	account_alias: impl Into<String>,
	consumer_key: impl Into<String>,
	consumer_secret: impl Into<String>,
) -> Result<ReqwestApiClient> {
	ApiClient::new(account_alias, consumer_key, consumer_secret)
}

/// Object form of a DELETE file filter: `{ "files": [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileList {
	/// Paths to delete.
	pub files: Vec<String>,
}

/// File filter accepted by [`ApiClient::delete`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DeleteFiles {
	/// No filter; nothing is appended to the URL.
	#[default]
	None,
	/// A single value sent as `files=<value>`, verbatim.
	One(String),
	/// Values sent as `files[0]=a&files[1]=b`, each percent-escaped.
	Many(Vec<String>),
}
impl DeleteFiles {
	/// Renders the querystring for this filter, if there is one.
	pub fn to_query_string(&self) -> Option<String> {
		match self {
			Self::None => None,
			Self::One(file) => Some(format!("files={file}")),
			Self::Many(files) if files.is_empty() => None,
			Self::Many(files) => Some(
				files
					.iter()
					.enumerate()
					.map(|(i, file)| {
						format!("files[{i}]={}", utf8_percent_encode(file, URI_COMPONENT))
					})
					.collect::<Vec<_>>()
					.join("&"),
			),
		}
	}
}
impl From<&str> for DeleteFiles {
	fn from(value: &str) -> Self {
		Self::One(value.to_owned())
	}
}
impl From<String> for DeleteFiles {
	fn from(value: String) -> Self {
		Self::One(value)
	}
}
impl From<Vec<String>> for DeleteFiles {
	fn from(value: Vec<String>) -> Self {
		Self::Many(value)
	}
}
impl From<&[&str]> for DeleteFiles {
	fn from(value: &[&str]) -> Self {
		Self::Many(value.iter().map(|file| (*file).to_owned()).collect())
	}
}
impl<const N: usize> From<[&str; N]> for DeleteFiles {
	fn from(value: [&str; N]) -> Self {
		Self::Many(value.iter().map(|file| (*file).to_owned()).collect())
	}
}
impl From<FileList> for DeleteFiles {
	fn from(value: FileList) -> Self {
		Self::Many(value.files)
	}
}
impl<T> From<Option<T>> for DeleteFiles
where
	T: Into<DeleteFiles>,
{
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or_default()
	}
}

/// Signed client for one StackPath account.
///
/// The configuration is immutable after construction, so a single client can serve
/// concurrent calls without locking; calls are independent and unordered.
pub struct ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Credentials and endpoint settings.
	pub config: ClientConfig,
	consumer: OAuthConsumer<C>,
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient> {
	/// Validates the credentials and builds a client on the default reqwest transport.
	pub fn new(
		account_alias: impl Into<String>,
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
	) -> Result<Self> {
		let config = ClientConfig::new(account_alias, consumer_key, consumer_secret)?;

		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Builds a client that dispatches through the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Result<Self> {
		let consumer = OAuthConsumer::from_config(&config, http_client);

		Ok(Self { config, consumer })
	}

	/// Returns the signing collaborator.
	pub fn consumer(&self) -> &OAuthConsumer<C> {
		&self.consumer
	}

	/// Joins `path` onto `{base_url}/{account_alias}` with exactly one slash.
	///
	/// `path` is neither escaped nor validated. Dot segments are resolved when the request
	/// URL is parsed, so `../other/x` is sent to `{base_url}/other/x`, outside the account.
	pub fn make_url(&self, path: &str) -> String {
		let separator = if path.starts_with('/') { "" } else { "/" };

		format!("{}/{}{separator}{path}", self.config.base_url, self.config.account_alias)
	}

	/// Issues a signed `GET`.
	pub async fn get<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.send(HttpMethod::Get, path, None).await
	}

	/// Issues a signed `PUT` with `data` coerced to a form body.
	pub async fn put<T>(&self, path: &str, data: impl Into<Params>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let form = data.into().to_object()?;

		self.send(HttpMethod::Put, path, Some(form)).await
	}

	/// Issues a signed `POST` with `data` coerced to a form body.
	pub async fn post<T>(&self, path: &str, data: impl Into<Params>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let form = data.into().to_object()?;

		self.send(HttpMethod::Post, path, Some(form)).await
	}

	/// Issues a signed, bodiless `DELETE`, appending the file filter as an indexed querystring.
	pub async fn delete<T>(&self, path: &str, files: impl Into<DeleteFiles>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let path = match files.into().to_query_string() {
			Some(query) => format!("{path}?{query}"),
			None => path.to_owned(),
		};

		self.send(HttpMethod::Delete, &path, None).await
	}

	/// Alias for [`delete`](Self::delete).
	pub async fn del<T>(&self, path: &str, files: impl Into<DeleteFiles>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.delete(path, files).await
	}

	async fn send<T>(&self, method: HttpMethod, path: &str, form: Option<ParamMap>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let span = RequestSpan::new(method, path);

		obs::record_request_outcome(method, RequestOutcome::Attempt);

		let result: Result<T> = span
			.instrument(async move {
				let raw = self.make_url(path);
				let url =
					Url::parse(&raw).map_err(|source| Error::InvalidUrl { url: raw, source })?;
				let outcome = self.consumer.dispatch(method, url, form.as_ref()).await;

				parse(outcome)
			})
			.await;

		match &result {
			Ok(_) => obs::record_request_outcome(method, RequestOutcome::Success),
			Err(_) => obs::record_request_outcome(method, RequestOutcome::Failure),
		}

		result
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("config", &self.config)
			.field("consumer", &self.consumer)
			.finish()
	}
}

/// Normalizes a collaborator outcome into the caller's result.
///
/// Transport errors pass through untouched with whatever body they carry. A successful
/// body that does not decode reports status 500 and a fixed message, whatever the real
/// status was.
pub fn parse<T>(outcome: Result<RawResponse, TransportError>) -> Result<T>
where
	T: DeserializeOwned,
{
	let RawResponse { status, body } = outcome?;
	let decoded = {
		let mut de = serde_json::Deserializer::from_str(&body);

		serde_path_to_error::deserialize::<_, T>(&mut de)
			.map_err(|e| (e.path().to_string(), e.into_inner()))
			.and_then(|value| de.end().map(|_| value).map_err(|e| (String::new(), e)))
	};

	decoded.map_err(|(path, source)| InvalidJsonError::new(status, body, path, source).into())
}
