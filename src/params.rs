//! Request parameter coercion between raw strings and structured mappings.
//!
//! Callers hand bodies over as JSON text, querystrings, or already-structured maps.
//! [`Params::to_object`] and [`Params::to_query_string`] convert between those shapes,
//! always trying JSON before querystring parsing.

// crates.io
use serde_json::Map;
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::InvalidParamsError};

/// Structured key/value mapping used for request bodies.
pub type ParamMap = Map<String, Value>;

/// Request parameters as supplied by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum Params {
	/// Unparsed text; JSON or a querystring.
	Raw(String),
	/// Already-structured mapping.
	Structured(ParamMap),
}
impl Params {
	/// Builds structured parameters from any serializable value that serializes to an object.
	pub fn from_serializable<T>(value: &T) -> Result<Self, InvalidParamsError>
	where
		T: ?Sized + Serialize,
	{
		match serde_json::to_value(value) {
			Ok(Value::Object(map)) => Ok(Self::Structured(map)),
			Ok(other) => Err(InvalidParamsError { input: other.to_string() }),
			Err(e) => Err(InvalidParamsError { input: e.to_string() }),
		}
	}

	/// Coerces the parameters into a mapping.
	///
	/// Raw strings are parsed as a JSON object first, then as a querystring. A string that
	/// is neither is rejected.
	pub fn to_object(&self) -> Result<ParamMap, InvalidParamsError> {
		match self {
			Self::Structured(map) => Ok(map.clone()),
			Self::Raw(raw) => {
				if let Some(map) = parse_json_object(raw) {
					return Ok(map);
				}

				parse_query_string(raw).ok_or_else(|| InvalidParamsError { input: raw.clone() })
			},
		}
	}

	/// Coerces the parameters into an ordinary `key=value` querystring.
	///
	/// Raw strings that hold a JSON object are re-serialized; any other string passes
	/// through unchanged.
	pub fn to_query_string(&self) -> String {
		match self {
			Self::Structured(map) => stringify(map),
			Self::Raw(raw) => match parse_json_object(raw) {
				Some(map) => stringify(&map),
				None => raw.clone(),
			},
		}
	}
}
impl From<&str> for Params {
	fn from(value: &str) -> Self {
		Self::Raw(value.to_owned())
	}
}
impl From<String> for Params {
	fn from(value: String) -> Self {
		Self::Raw(value)
	}
}
impl From<ParamMap> for Params {
	fn from(value: ParamMap) -> Self {
		Self::Structured(value)
	}
}
impl<K, V> FromIterator<(K, V)> for Params
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self::Structured(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// Serializes a mapping as `application/x-www-form-urlencoded` text.
///
/// Scalars become their string form, arrays repeat the key once per scalar element, and
/// `null` or nested objects serialize as an empty value.
pub fn stringify(map: &ParamMap) -> String {
	form_pairs(map)
		.into_iter()
		.fold(form_urlencoded::Serializer::new(String::new()), |mut serializer, (k, v)| {
			serializer.append_pair(&k, &v);

			serializer
		})
		.finish()
}

/// Flattens a mapping into ordered `(key, value)` pairs, the form used for signing.
pub fn form_pairs(map: &ParamMap) -> Vec<(String, String)> {
	let mut pairs = Vec::with_capacity(map.len());

	for (key, value) in map {
		match value {
			Value::Array(items) =>
				for item in items {
					pairs.push((key.clone(), scalar(item)));
				},
			other => pairs.push((key.clone(), scalar(other))),
		}
	}

	pairs
}

fn scalar(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Number(n) => n.to_string(),
		Value::Bool(b) => b.to_string(),
		Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
	}
}

fn parse_json_object(raw: &str) -> Option<ParamMap> {
	match serde_json::from_str(raw) {
		Ok(Value::Object(map)) => Some(map),
		_ => None,
	}
}

// Bare keys map to empty strings and repeated keys collect into an array. Unescaped
// whitespace, control characters, braces, or quotes mean the input is not a querystring.
fn parse_query_string(raw: &str) -> Option<ParamMap> {
	if raw.chars().any(|c| c.is_whitespace() || c.is_control() || matches!(c, '{' | '}' | '"')) {
		return None;
	}

	let mut map = ParamMap::new();

	for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
		let value = Value::String(value.into_owned());

		match map.get_mut(&*key) {
			Some(Value::Array(items)) => items.push(value),
			Some(existing) => {
				let first = existing.take();

				*existing = Value::Array(vec![first, value]);
			},
			None => {
				map.insert(key.into_owned(), value);
			},
		}
	}

	Some(map)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn object(value: Value) -> ParamMap {
		match value {
			Value::Object(map) => map,
			other => panic!("Expected a JSON object fixture, got {other}."),
		}
	}

	#[test]
	fn to_object_prefers_json() {
		let map = Params::from("{\"a\":1}").to_object().expect("JSON input should coerce.");

		assert_eq!(map, object(json!({ "a": 1 })));
	}

	#[test]
	fn to_object_falls_back_to_query_string() {
		let map = Params::from("a=1&b=2").to_object().expect("Querystring input should coerce.");

		assert_eq!(map, object(json!({ "a": "1", "b": "2" })));

		let repeated =
			Params::from("f=x&f=y+z").to_object().expect("Repeated keys should coerce.");

		assert_eq!(repeated, object(json!({ "f": ["x", "y z"] })));
	}

	#[test]
	fn to_object_rejects_garbage() {
		let err = Params::from("not json {").to_object().expect_err("Garbage must be rejected.");

		assert_eq!(err.input, "not json {");
		assert!(Params::from("a=1&b=\"x\"").to_object().is_err());
		assert!(Params::from("a=1\tb=2").to_object().is_err());
	}

	#[test]
	fn to_object_accepts_bare_keys() {
		let map = Params::from("a=1&flag").to_object().expect("Bare keys should coerce.");

		assert_eq!(map, object(json!({ "a": "1", "flag": "" })));

		let escaped =
			Params::from("q=not%20json%20%7B").to_object().expect("Escapes should decode.");

		assert_eq!(escaped, object(json!({ "q": "not json {" })));
	}

	#[test]
	fn non_object_json_is_not_structured() {
		assert_eq!(Params::from("5").to_query_string(), "5");
		assert!(Params::from("[\"a\"]").to_object().is_err());
		assert_eq!(
			Params::from("5").to_object().expect("A bare token reads as a querystring key."),
			object(json!({ "5": "" }))
		);
	}

	#[test]
	fn to_object_passes_structured_through() {
		let map = object(json!({ "name": "cdn", "nested": { "x": 1 } }));

		assert_eq!(
			Params::from(map.clone()).to_object().expect("Structured input should pass."),
			map
		);
	}

	#[test]
	fn to_query_string_serializes_maps_and_json() {
		assert_eq!(Params::from(object(json!({ "a": 1 }))).to_query_string(), "a=1");
		assert_eq!(Params::from("{\"a\":1}").to_query_string(), "a=1");
		assert_eq!(Params::from("already=a+string").to_query_string(), "already=a+string");
		assert_eq!(Params::from("[1,2]").to_query_string(), "[1,2]");
	}

	#[test]
	fn stringify_flattens_arrays_and_blanks_nested_values() {
		let map = object(json!({ "f": ["a", 2, true], "n": null, "o": { "k": "v" } }));

		assert_eq!(stringify(&map), "f=a&f=2&f=true&n=&o=");
	}

	#[test]
	fn from_serializable_requires_an_object() {
		#[derive(Serialize)]
		struct Site<'a> {
			name: &'a str,
			ssl: bool,
		}

		let params = Params::from_serializable(&Site { name: "edge", ssl: true })
			.expect("Struct should serialize to an object.");

		assert_eq!(params.to_query_string(), "name=edge&ssl=true");
		assert!(Params::from_serializable(&[1, 2]).is_err());
	}

	#[test]
	fn params_collect_from_pairs() {
		let params: Params = [("ttl", "60"), ("zone", "eu")].into_iter().collect();

		assert_eq!(params.to_query_string(), "ttl=60&zone=eu");
	}
}
