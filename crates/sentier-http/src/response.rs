use bytes::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use sentier_core::exception::{Error, Result};
use serde::Serialize;

/// HTTP Response representation
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use sentier_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Create a 302 redirect to `location`
	///
	/// # Examples
	///
	/// ```
	/// use sentier_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::redirect("/post/10");
	/// assert_eq!(response.status, StatusCode::FOUND);
	/// assert_eq!(response.header("location"), Some("/post/10"));
	/// ```
	pub fn redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::FOUND).with_header("location", location.as_ref())
	}

	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set a header; names or values that are not valid HTTP are skipped
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	/// Serialize `data` as the JSON body
	///
	/// # Errors
	///
	/// Returns [`Error::Internal`] if serialization fails.
	pub fn with_json<T: Serialize>(self, data: &T) -> Result<Self> {
		let body = serde_json::to_vec(data).map_err(|e| Error::Internal(e.to_string()))?;
		Ok(self
			.with_header("content-type", "application/json")
			.with_body(body))
	}

	/// Header value as text
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Body as UTF-8 text, lossily
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

impl Default for Response {
	fn default() -> Self {
		Self::ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_with_json_sets_content_type() {
		let response = Response::ok()
			.with_json(&serde_json::json!({"id": 5}))
			.unwrap();

		assert_eq!(response.header("content-type"), Some("application/json"));
		assert_eq!(response.body_text(), r#"{"id":5}"#);
	}

	#[test]
	fn test_invalid_header_is_ignored() {
		let response = Response::ok().with_header("bad header", "x");
		assert!(response.headers.is_empty());
	}
}
