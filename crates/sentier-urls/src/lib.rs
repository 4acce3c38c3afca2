//! # Sentier URLs
//!
//! Named routes, first-match dispatch and reverse URL generation.
//!
//! A [`Router`] holds [`Route`]s in registration order. Dispatching a request
//! tries them one by one and performs the first that matches; there is no
//! specificity ranking, so register specific patterns before general ones.
//! The primary route (named [`DEFAULT_ROUTE_NAME`]) is always tried last and
//! also serves `controller::action` shorthands in [`Router::resolve_url`].
//!
//! Everything a dispatch needs travels in an explicit [`RouterContext`]: the
//! [`Container`](sentier_di::Container) targets are resolved from and the
//! stack of routers currently dispatching, with the base path each one runs
//! under. Handlers build links through
//! [`RequestRoutingExt::url_for`], which stays correct while other requests
//! dispatch through the same routers.
//!
//! ```rust
//! use sentier_di::{ActionController, Container};
//! use sentier_http::{Request, Response, handler_fn};
//! use sentier_urls::{Route, Router, RouterContext};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let container = Arc::new(Container::new());
//! container.register_controller(
//!     "post",
//!     ActionController::new().action(
//!         "view",
//!         handler_fn(|req: Request| async move {
//!             Ok(Response::ok().with_body(format!("post {}", req.path_param("id").unwrap_or(""))))
//!         }),
//!     ),
//! );
//!
//! let router = Router::new(container.clone());
//! router.register(Route::new("post::view", "/post/<id:\\d+>").unwrap());
//!
//! let ctx = RouterContext::new(container);
//! let request = Request::builder().uri("/post/7").build().unwrap();
//! let response = router.dispatch(&ctx, request).await.unwrap();
//! assert_eq!(response.body_text(), "post 7");
//! assert_eq!(router.active_route().unwrap().name(), "post::view");
//! # }
//! ```

pub mod context;
pub mod extensions;
pub mod path;
pub mod pattern;
pub mod query;
pub mod route;
pub mod router;

pub use context::{RouterContext, RouterGuard};
pub use extensions::{ActivePath, MatchedRoute, RequestRoutingExt};
pub use pattern::RoutePattern;
pub use route::{
	DEFAULT_SEPARATOR, MiddlewareAliases, Route, RouteClosure, RouteParams, RouteTarget,
};
pub use router::{DEFAULT_ROUTE_NAME, Router};
