//! HTTP request representation.

use crate::extensions::Extensions;
use bytes::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri, Version};
use sentier_core::exception::{Error, Result};
use std::collections::HashMap;

/// HTTP request as seen by routers and handlers.
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Parameters captured by the matched route pattern
	pub path_params: HashMap<String, String>,
	/// Decoded query string parameters
	pub query_params: HashMap<String, String>,
	/// Typed values attached by routers and middleware
	pub extensions: Extensions,
}

impl Request {
	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use sentier_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/posts?page=2")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.method, Method::POST);
	/// assert_eq!(request.path(), "/posts");
	/// assert_eq!(request.query_param("page"), Some("2"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Get the request path
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Raw query string, if any
	pub fn query_string(&self) -> Option<&str> {
		self.uri.query()
	}

	/// Look up a single decoded query parameter
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query_params.get(name).map(String::as_str)
	}

	/// Look up a parameter captured from the route pattern
	///
	/// # Examples
	///
	/// ```
	/// use sentier_http::Request;
	///
	/// let mut request = Request::builder().uri("/post/5").build().unwrap();
	/// request.set_path_param("id", "5");
	/// assert_eq!(request.path_param("id"), Some("5"));
	/// ```
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// Set a path parameter (used by routers when a pattern matches)
	pub fn set_path_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(name.into(), value.into());
	}

	/// Borrow the body as UTF-8 text, lossily
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.and_then(|query| serde_urlencoded::from_str::<Vec<(String, String)>>(query).ok())
			.map(|pairs| pairs.into_iter().collect())
			.unwrap_or_default()
	}
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: std::result::Result<Uri, String>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	header_error: Option<String>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: Ok(Uri::from_static("/")),
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			header_error: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl AsRef<str>) -> Self {
		self.uri = uri
			.as_ref()
			.parse::<Uri>()
			.map_err(|e| format!("invalid URI '{}': {}", uri.as_ref(), e));
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Append a single header; invalid names or values surface from `build()`
	pub fn header(mut self, name: &str, value: &str) -> Self {
		match (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			(Ok(name), Ok(value)) => {
				self.headers.append(name, value);
			}
			_ => self.header_error = Some(format!("invalid header '{}: {}'", name, value)),
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Finish the request
	///
	/// # Errors
	///
	/// Returns [`Error::Http`] when the URI or a header could not be parsed.
	pub fn build(self) -> Result<Request> {
		if let Some(message) = self.header_error {
			return Err(Error::Http(message));
		}
		let uri = self.uri.map_err(Error::Http)?;
		let query_params = Request::parse_query_params(&uri);

		Ok(Request {
			method: self.method,
			uri,
			version: self.version,
			headers: self.headers,
			body: self.body,
			path_params: HashMap::new(),
			query_params,
			extensions: Extensions::new(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/search?q=hello%20world", "q", Some("hello world"))]
	#[case("/search?q=a+b&page=3", "page", Some("3"))]
	#[case("/search", "q", None)]
	fn test_query_params_are_decoded(
		#[case] uri: &str,
		#[case] name: &str,
		#[case] expected: Option<&str>,
	) {
		let request = Request::builder().uri(uri).build().unwrap();
		assert_eq!(request.query_param(name), expected);
	}

	#[test]
	fn test_invalid_uri_is_reported_on_build() {
		let result = Request::builder().uri("http://[::1").build();
		assert!(matches!(result, Err(Error::Http(_))));
	}

	#[test]
	fn test_invalid_header_is_reported_on_build() {
		let result = Request::builder().header("bad header", "x").build();
		assert!(matches!(result, Err(Error::Http(_))));
	}

	#[test]
	fn test_defaults() {
		let request = Request::builder().build().unwrap();
		assert_eq!(request.method, Method::GET);
		assert_eq!(request.path(), "/");
		assert!(request.path_params.is_empty());
		assert!(request.extensions.is_empty());
	}
}
