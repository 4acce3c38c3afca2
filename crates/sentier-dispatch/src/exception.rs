//! Conversion of dispatch errors into HTTP responses

use hyper::StatusCode;
use sentier_core::exception::Error;
use sentier_http::Response;

/// Turns an [`Error`] raised during dispatch into a response.
pub trait ExceptionHandler: Send + Sync {
	fn handle_exception(&self, error: &Error) -> Response;
}

/// JSON error bodies with the status from [`Error::status_code`].
///
/// Server faults are logged at `error`, client-side failures at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExceptionHandler;

impl ExceptionHandler for DefaultExceptionHandler {
	fn handle_exception(&self, error: &Error) -> Response {
		let status = error.status_code();
		if status.is_server_error() {
			tracing::error!(status = status.as_u16(), error = %error, "request failed");
		} else {
			tracing::debug!(status = status.as_u16(), error = %error, "request rejected");
		}
		convert_error_to_response(error)
	}
}

/// Render `error` as `{"error": ..., "status": ...}`.
///
/// Falls back to a plain-text body if the JSON cannot be produced.
///
/// # Examples
///
/// ```
/// use hyper::StatusCode;
/// use sentier_core::exception::Error;
/// use sentier_dispatch::convert_error_to_response;
///
/// let response = convert_error_to_response(&Error::NoRouteMatched { path: "/x".into() });
/// assert_eq!(response.status, StatusCode::NOT_FOUND);
/// assert_eq!(response.header("content-type"), Some("application/json"));
/// ```
pub fn convert_error_to_response(error: &Error) -> Response {
	let status = error.status_code();
	let body = serde_json::json!({
		"error": error.to_string(),
		"status": status.as_u16(),
	});
	match Response::new(status).with_json(&body) {
		Ok(response) => response,
		Err(_) => plain(status, error),
	}
}

fn plain(status: StatusCode, error: &Error) -> Response {
	Response::new(status)
		.with_header("content-type", "text/plain; charset=utf-8")
		.with_body(error.to_string())
}
