//! Values routers attach to a [`Request`].

use crate::context::RouterContext;
use crate::route::{Route, RouteParams};
use sentier_core::exception::{Error, Result};
use sentier_http::Request;
use std::sync::Arc;

/// Base path the routers of a request resolve patterns under.
///
/// Supplied by the dispatching layer; `/` when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePath(pub String);

impl Default for ActivePath {
	fn default() -> Self {
		Self("/".to_string())
	}
}

/// The route a router chose for a request, with its parameters.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
	pub route: Arc<Route>,
	/// Captured values merged over the route defaults
	pub params: RouteParams,
}

/// Accessors for the routing data stored on a request.
///
/// # Examples
///
/// ```
/// use sentier_http::Request;
/// use sentier_urls::{ActivePath, RequestRoutingExt};
///
/// let mut request = Request::builder().uri("/blog/post/3").build().unwrap();
/// assert_eq!(request.active_path(), "/");
///
/// request.extensions.insert(ActivePath("/blog".to_string()));
/// assert_eq!(request.active_path(), "/blog");
/// assert!(request.matched_route().is_none());
/// ```
pub trait RequestRoutingExt {
	/// The active base path, `/` when none was supplied
	fn active_path(&self) -> &str;

	fn matched_route(&self) -> Option<&MatchedRoute>;

	fn router_context(&self) -> Option<&RouterContext>;

	/// URL of route `name` built by the innermost router dispatching this
	/// request, under that router's base path for this request.
	///
	/// # Errors
	///
	/// Returns [`Error::UnresolvableRoute`] outside a dispatch, and the errors
	/// of [`Router::resolve_url`](crate::Router::resolve_url).
	fn url_for(&self, name: &str, params: &RouteParams) -> Result<String>;
}

impl RequestRoutingExt for Request {
	fn active_path(&self) -> &str {
		self.extensions
			.get::<ActivePath>()
			.map(|path| path.0.as_str())
			.unwrap_or("/")
	}

	fn matched_route(&self) -> Option<&MatchedRoute> {
		self.extensions.get::<MatchedRoute>()
	}

	fn router_context(&self) -> Option<&RouterContext> {
		self.extensions.get::<RouterContext>()
	}

	fn url_for(&self, name: &str, params: &RouteParams) -> Result<String> {
		let ctx = self
			.router_context()
			.ok_or_else(|| Error::UnresolvableRoute(name.to_string()))?;
		let router = ctx
			.current_router()
			.ok_or_else(|| Error::UnresolvableRoute(name.to_string()))?;
		router.resolve_url_in(ctx, name, params)
	}
}
