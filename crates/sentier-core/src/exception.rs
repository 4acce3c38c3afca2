//! Error types shared by the routing, dispatch and pagination crates.
//!
//! Every failure of a dispatch attempt is terminal: nothing in the core
//! retries. The dispatcher decides how an [`Error`] is rendered through
//! [`Error::status_code`].

use http::StatusCode;
use thiserror::Error;

/// Result alias used throughout Sentier.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while matching, performing or reversing routes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// No registered route (nor the primary route) matched the request path.
	#[error("no route matched path '{path}'")]
	NoRouteMatched {
		/// Request path, relative to the active base path.
		path: String,
	},

	/// URL generation found neither a route with this name nor a primary
	/// route able to serve a controller/action shorthand.
	#[error("unable to resolve route '{0}'")]
	UnresolvableRoute(String),

	/// The matched route's target could not be located.
	#[error("route '{route}' cannot resolve target '{target}': {reason}")]
	TargetResolution {
		/// Name of the route being performed.
		route: String,
		/// Target descriptor, e.g. `post::view`.
		target: String,
		/// Why resolution failed.
		reason: String,
	},

	/// A pattern placeholder had no value and no default.
	#[error("route '{route}' requires parameter '{param}'")]
	MissingParameter {
		/// Name of the route being reversed.
		route: String,
		/// Placeholder without a value.
		param: String,
	},

	/// A supplied value does not satisfy the placeholder's constraint.
	#[error("route '{route}' rejects value '{value}' for parameter '{param}'")]
	InvalidParameter {
		/// Name of the route being reversed.
		route: String,
		/// Placeholder name.
		param: String,
		/// Offending value.
		value: String,
	},

	/// A route references a middleware alias nobody registered.
	#[error("route '{route}' uses unregistered middleware alias '{alias}'")]
	MiddlewareResolution {
		/// Name of the route being performed.
		route: String,
		/// Unknown alias.
		alias: String,
	},

	/// A route pattern failed to compile.
	#[error("invalid route pattern '{pattern}': {reason}")]
	InvalidPattern {
		/// Pattern source.
		pattern: String,
		/// Compiler message.
		reason: String,
	},

	/// Settings could not be loaded or are inconsistent.
	#[error("configuration error: {0}")]
	Configuration(String),

	/// Malformed HTTP input (bad URI, header, ...).
	#[error("HTTP error: {0}")]
	Http(String),

	/// Anything else.
	#[error("internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status a host layer should answer with for this error.
	///
	/// # Examples
	///
	/// ```
	/// use sentier_core::exception::Error;
	/// use http::StatusCode;
	///
	/// let err = Error::NoRouteMatched { path: "/missing".to_string() };
	/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
	///
	/// let err = Error::UnresolvableRoute("post::view".to_string());
	/// assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
	/// ```
	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::NoRouteMatched { .. } | Error::TargetResolution { .. } => StatusCode::NOT_FOUND,
			Error::Http(_) => StatusCode::BAD_REQUEST,
			Error::UnresolvableRoute(_)
			| Error::MissingParameter { .. }
			| Error::InvalidParameter { .. }
			| Error::MiddlewareResolution { .. }
			| Error::InvalidPattern { .. }
			| Error::Configuration(_)
			| Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Whether the error means "nothing here" rather than a server fault.
	pub fn is_not_found(&self) -> bool {
		self.status_code() == StatusCode::NOT_FOUND
	}
}

impl From<http::Error> for Error {
	fn from(err: http::Error) -> Self {
		Error::Http(err.to_string())
	}
}

impl From<http::uri::InvalidUri> for Error {
	fn from(err: http::uri::InvalidUri) -> Self {
		Error::Http(err.to_string())
	}
}
