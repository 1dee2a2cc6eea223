//! Client-level error types shared across configuration, coercion, transport, and decoding.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fixed diagnostic attached to every response body that fails to decode.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON from StackPath's API.";
/// Status code reported for undecodable bodies, regardless of the real HTTP status.
pub const INVALID_JSON_STATUS: u16 = 500;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem raised while constructing a client.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Caller-supplied parameters could not be coerced into a mapping.
	#[error(transparent)]
	InvalidParams(#[from] InvalidParamsError),
	/// The request URL assembled from the base, alias, and path does not parse.
	#[error("Request URL `{url}` is invalid.")]
	InvalidUrl {
		/// URL string that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Transport or signing failure reported by the OAuth collaborator.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body is not valid JSON for the requested type.
	#[error(transparent)]
	InvalidJson(#[from] InvalidJsonError),
}

/// Configuration and validation failures raised at construction.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required credential was empty.
	#[error("{field} missing or not a string.")]
	MissingCredential {
		/// Credential label (`company alias`, `consumer key`, `consumer secret`).
		field: &'static str,
	},
	/// Base URL override cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL override cannot carry path segments.
	#[error("Base URL `{url}` cannot be a base.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// A string parameter that is neither a JSON object nor a querystring.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Invalid params string.")]
pub struct InvalidParamsError {
	/// The rejected input.
	pub input: String,
}

/// Transport-level failures surfaced untouched from the signing collaborator.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the StackPath API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the StackPath API.")]
	Io(#[from] std::io::Error),
	/// The API answered outside the 2xx range.
	#[error("StackPath API responded with HTTP {status_code}.")]
	Status {
		/// HTTP status code returned by the API.
		status_code: u16,
		/// Raw, unparsed response body.
		data: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// HTTP status attached to the failure, when the API answered at all.
	pub fn status_code(&self) -> Option<u16> {
		match self {
			Self::Status { status_code, .. } => Some(*status_code),
			_ => None,
		}
	}

	/// Raw response body attached to the failure, when the API answered at all.
	pub fn data(&self) -> Option<&str> {
		match self {
			Self::Status { data, .. } => Some(data),
			_ => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Successful response whose body could not be decoded.
///
/// [`status_code`](Self::status_code) is always [`INVALID_JSON_STATUS`], even when the
/// API answered with another 2xx code. The real status is kept in
/// [`upstream_status`](Self::upstream_status) for diagnostics only.
#[derive(Debug, ThisError)]
#[error("{data}")]
pub struct InvalidJsonError {
	/// Reported status code, fixed at 500.
	pub status_code: u16,
	/// Fixed diagnostic message.
	pub data: &'static str,
	/// Status the transport actually reported.
	pub upstream_status: u16,
	/// Raw body that failed to decode.
	pub body: String,
	/// Field path where decoding stopped; empty for syntax errors at the top level.
	pub path: String,
	/// Underlying decoding failure.
	#[source]
	pub source: serde_json::Error,
}
impl InvalidJsonError {
	pub(crate) fn new(
		upstream_status: u16,
		body: String,
		path: String,
		source: serde_json::Error,
	) -> Self {
		Self {
			status_code: INVALID_JSON_STATUS,
			data: INVALID_JSON_MESSAGE,
			upstream_status,
			body,
			path,
			source,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_credential_names_the_field() {
		let err = ConfigError::MissingCredential { field: "consumer key" };

		assert_eq!(err.to_string(), "consumer key missing or not a string.");
	}

	#[test]
	fn status_errors_expose_code_and_body() {
		let err = TransportError::Status { status_code: 404, data: "{\"error\":1}".into() };

		assert_eq!(err.status_code(), Some(404));
		assert_eq!(err.data(), Some("{\"error\":1}"));

		let io = TransportError::from(std::io::Error::other("reset"));

		assert_eq!(io.status_code(), None);
		assert_eq!(io.data(), None);
	}
}
