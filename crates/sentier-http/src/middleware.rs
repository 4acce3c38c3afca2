//! Handler and middleware traits.
//!
//! ## Handler
//!
//! ```rust
//! use sentier_http::{Handler, Request, Response};
//! use async_trait::async_trait;
//!
//! struct MyHandler;
//!
//! #[async_trait]
//! impl Handler for MyHandler {
//!     async fn handle(&self, request: Request) -> sentier_core::Result<Response> {
//!         Ok(Response::ok().with_body(format!("you asked for {}", request.path())))
//!     }
//! }
//! ```
//!
//! ## Middleware
//!
//! ```rust
//! use sentier_http::{Handler, Middleware, Request, Response};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Tagging;
//!
//! #[async_trait]
//! impl Middleware for Tagging {
//!     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> sentier_core::Result<Response> {
//!         let response = next.handle(request).await?;
//!         Ok(response.with_header("x-tagged", "1"))
//!     }
//! }
//! ```

use async_trait::async_trait;
use futures::future::BoxFuture;
use sentier_core::exception::Result;
use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response};

/// Core abstraction: every request handler implements this trait.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles a request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Allows `Arc<dyn Handler>` to be used as a Handler.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Request/response processing wrapped around a [`Handler`].
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request, usually by calling `next` and adjusting the result.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or the next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Whether this middleware runs for `request`.
	///
	/// Skipped middleware is left out of the chain entirely. Defaults to `true`.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// Composes middleware around a handler.
///
/// Middleware runs in the order it was added: the first one added sees the
/// request first and the response last.
#[derive(Clone)]
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	/// Creates a new middleware chain ending in `handler`.
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Adds a middleware to the chain using builder pattern.
	///
	/// # Examples
	///
	/// ```rust
	/// use sentier_http::{MiddlewareChain, Middleware, Handler, Request, Response, handler_fn};
	/// use std::sync::Arc;
	///
	/// struct Noop;
	///
	/// #[async_trait::async_trait]
	/// impl Middleware for Noop {
	///     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> sentier_core::Result<Response> {
	///         next.handle(request).await
	///     }
	/// }
	///
	/// let handler = Arc::new(handler_fn(|_req| async { Ok(Response::ok()) }));
	/// let chain = MiddlewareChain::new(handler).with_middleware(Arc::new(Noop));
	/// assert_eq!(chain.len(), 1);
	/// ```
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Adds a middleware to the chain.
	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}

	/// Number of middleware in the chain
	pub fn len(&self) -> usize {
		self.middlewares.len()
	}

	pub fn is_empty(&self) -> bool {
		self.middlewares.is_empty()
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		if self.middlewares.is_empty() {
			return self.handler.handle(request).await;
		}

		// Wrap from the innermost outwards so the first middleware added runs first.
		let mut current: Arc<dyn Handler> = self.handler.clone();
		for middleware in self
			.middlewares
			.iter()
			.rev()
			.filter(|mw| mw.should_continue(&request))
		{
			current = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current,
			});
		}

		current.handle(request).await
	}
}

struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}

/// Handler backed by an async function or closure.
pub struct FunctionHandler {
	func: Box<dyn Fn(Request) -> BoxFuture<'static, Result<Response>> + Send + Sync>,
}

impl FunctionHandler {
	pub fn new<F, Fut>(func: F) -> Self
	where
		F: Fn(Request) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Response>> + Send + 'static,
	{
		Self {
			func: Box::new(move |request| Box::pin(func(request))),
		}
	}
}

#[async_trait]
impl Handler for FunctionHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		(self.func)(request).await
	}
}

/// Shorthand for [`FunctionHandler::new`].
pub fn handler_fn<F, Fut>(func: F) -> FunctionHandler
where
	F: Fn(Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	FunctionHandler::new(func)
}

#[cfg(test)]
mod tests {
	use super::*;

	struct MockHandler {
		response_body: String,
	}

	#[async_trait]
	impl Handler for MockHandler {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_body(self.response_body.clone()))
		}
	}

	struct PrefixMiddleware {
		prefix: String,
	}

	#[async_trait]
	impl Middleware for PrefixMiddleware {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			let response = next.handle(request).await?;
			let body = format!("{}{}", self.prefix, response.body_text());
			Ok(response.with_body(body))
		}
	}

	struct ApiOnlyMiddleware;

	#[async_trait]
	impl Middleware for ApiOnlyMiddleware {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			let response = next.handle(request).await?;
			let body = format!("API:{}", response.body_text());
			Ok(response.with_body(body))
		}

		fn should_continue(&self, request: &Request) -> bool {
			request.path().starts_with("/api/")
		}
	}

	fn request(uri: &str) -> Request {
		Request::builder().uri(uri).build().unwrap()
	}

	#[tokio::test]
	async fn test_middleware_chain_empty() {
		let chain = MiddlewareChain::new(Arc::new(MockHandler {
			response_body: "Test".to_string(),
		}));

		let response = chain.handle(request("/")).await.unwrap();
		assert_eq!(response.body_text(), "Test");
	}

	#[tokio::test]
	async fn test_middleware_chain_runs_in_insertion_order() {
		let chain = MiddlewareChain::new(Arc::new(MockHandler {
			response_body: "Data".to_string(),
		}))
		.with_middleware(Arc::new(PrefixMiddleware {
			prefix: "M1:".to_string(),
		}))
		.with_middleware(Arc::new(PrefixMiddleware {
			prefix: "M2:".to_string(),
		}));

		let response = chain.handle(request("/")).await.unwrap();
		assert_eq!(response.body_text(), "M1:M2:Data");
	}

	#[tokio::test]
	async fn test_conditional_middleware_is_skipped() {
		let chain = MiddlewareChain::new(Arc::new(MockHandler {
			response_body: "Base".to_string(),
		}))
		.with_middleware(Arc::new(ApiOnlyMiddleware));

		let response = chain.handle(request("/api/users")).await.unwrap();
		assert_eq!(response.body_text(), "API:Base");

		let response = chain.handle(request("/public")).await.unwrap();
		assert_eq!(response.body_text(), "Base");
	}

	#[tokio::test]
	async fn test_handler_fn() {
		let handler = handler_fn(|req: Request| async move {
			Ok(Response::ok().with_body(req.path().to_string()))
		});

		let response = handler.handle(request("/echo")).await.unwrap();
		assert_eq!(response.body_text(), "/echo");
	}
}
