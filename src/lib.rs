//! # Sentier
//!
//! Named-route dispatch, reverse URL generation and pagination links for
//! async Rust web applications.
//!
//! A [`Router`] holds named [`Route`]s in registration order and dispatches a
//! request to the first one whose pattern matches. Routes point at a
//! controller action registered in a [`Container`], a closure, or any
//! [`Handler`]. The same route table builds URLs back from names, so links
//! never hard-code paths.
//!
//! ## Feature Flags
//!
//! Routing, configuration and the DI container are always available.
//!
//! - `pagination` - [`Pagination`] with router-generated page links
//! - `dispatch` - [`Dispatcher`] request lifecycle and error responses
//! - `full` (default) - everything above
//!
//! ## Quick Example
//!
//! ```rust
//! use sentier::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let container = Container::new();
//! container.register_controller(
//!     "post",
//!     ActionController::new().action(
//!         "view",
//!         handler_fn(|req: Request| async move {
//!             let id = req.path_param("id").unwrap_or_default().to_string();
//!             Ok(Response::ok().with_body(format!("post {}", id)))
//!         }),
//!     ),
//! );
//!
//! let router = Router::new(Arc::new(container));
//! router.register(Route::new("post::view", "/post/<id:\\d+>")?);
//!
//! let ctx = RouterContext::new(router.container().clone());
//! let request = Request::builder().uri("/post/7").build()?;
//! let response = router.dispatch(&ctx, request).await?;
//! assert_eq!(response.body_text(), "post 7");
//!
//! let params = RouteParams::from([("id".to_string(), "8".to_string())]);
//! assert_eq!(router.resolve_url("post::view", &params)?, "/post/8");
//! # Ok(())
//! # }
//! ```

pub mod conf;
pub mod core;
pub mod di;
#[cfg(feature = "dispatch")]
pub mod dispatch;
pub mod http;
#[cfg(feature = "pagination")]
pub mod pagination;
pub mod urls;

pub use sentier_conf::{DefaultRouteSettings, PaginationSettings, RouterSettings};
pub use sentier_core::{Error, Result};
pub use sentier_di::{ActionController, Container, Controller};
pub use sentier_http::{Handler, Middleware, MiddlewareChain, Request, Response, handler_fn};
pub use sentier_urls::{
	ActivePath, MatchedRoute, RequestRoutingExt, Route, RouteParams, RouteTarget, Router,
	RouterContext,
};

#[cfg(feature = "dispatch")]
pub use sentier_dispatch::{DefaultExceptionHandler, Dispatcher, ExceptionHandler};
#[cfg(feature = "pagination")]
pub use sentier_pagination::{PageLink, Pagination};

/// Everything needed to declare routes and handlers
pub mod prelude {
	pub use crate::{
		ActionController, ActivePath, Container, Controller, Error, Handler, MatchedRoute,
		Middleware, MiddlewareChain, Request, RequestRoutingExt, Response, Result, Route,
		RouteParams, RouteTarget, Router, RouterContext, RouterSettings, handler_fn,
	};

	#[cfg(feature = "dispatch")]
	pub use crate::{Dispatcher, ExceptionHandler};
	#[cfg(feature = "pagination")]
	pub use crate::{PageLink, Pagination};

	// External
	pub use async_trait::async_trait;
}
