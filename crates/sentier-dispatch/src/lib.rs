//! # Sentier Dispatch
//!
//! Request lifecycle around a [`Router`](sentier_urls::Router).
//!
//! ```text
//! Request → Dispatcher → global middleware → Router → Route middleware → target
//!               ↓                                                          ↓
//!       RouterContext + ActivePath                        Error → ExceptionHandler → Response
//! ```
//!
//! The [`Dispatcher`] seeds each request with a fresh
//! [`RouterContext`](sentier_urls::RouterContext) and the configured active
//! path, runs the global middleware, and turns dispatch failures into HTTP
//! responses through an [`ExceptionHandler`].
//!
//! ```rust
//! use hyper::StatusCode;
//! use sentier_di::Container;
//! use sentier_dispatch::Dispatcher;
//! use sentier_http::{Request, Response, handler_fn};
//! use sentier_urls::{Route, Router};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let router = Router::new(Arc::new(Container::new()));
//! router.register(
//!     Route::new("home", "/")
//!         .unwrap()
//!         .with_handler(handler_fn(|_req| async { Ok(Response::ok().with_body("home")) })),
//! );
//!
//! let dispatcher = Dispatcher::new(router);
//!
//! let request = Request::builder().uri("/").build().unwrap();
//! let response = dispatcher.handle_request(request).await;
//! assert_eq!(response.status, StatusCode::OK);
//!
//! let request = Request::builder().uri("/missing").build().unwrap();
//! let response = dispatcher.handle_request(request).await;
//! assert_eq!(response.status, StatusCode::NOT_FOUND);
//! # }
//! ```

pub mod dispatcher;
pub mod exception;
pub mod logging;

pub use dispatcher::Dispatcher;
pub use exception::{DefaultExceptionHandler, ExceptionHandler, convert_error_to_response};
pub use logging::{DEFAULT_FILTER, init_tracing};
