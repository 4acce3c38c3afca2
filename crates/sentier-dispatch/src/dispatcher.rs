use crate::exception::{DefaultExceptionHandler, ExceptionHandler};
use async_trait::async_trait;
use sentier_core::exception::Result;
use sentier_di::Container;
use sentier_http::{Handler, Middleware, MiddlewareChain, Request, Response};
use sentier_urls::{ActivePath, Router, RouterContext};
use std::fmt;
use std::sync::Arc;

/// Entry point handing requests to a root [`Router`].
///
/// Every request gets its own [`RouterContext`], so nested routers bound
/// during one request never leak into another.
#[derive(Clone)]
pub struct Dispatcher {
	router: Router,
	middleware: Vec<Arc<dyn Middleware>>,
	active_path: Option<String>,
	exception_handler: Arc<dyn ExceptionHandler>,
}

impl Dispatcher {
	pub fn new(router: Router) -> Self {
		Self {
			router,
			middleware: Vec::new(),
			active_path: None,
			exception_handler: Arc::new(DefaultExceptionHandler),
		}
	}

	/// Add global middleware; the first added runs outermost
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middleware.push(middleware);
		self
	}

	/// Mount the root router below `path`.
	///
	/// Requests that already carry an [`ActivePath`] keep it.
	pub fn with_active_path(mut self, path: impl Into<String>) -> Self {
		self.active_path = Some(path.into());
		self
	}

	pub fn with_exception_handler(mut self, handler: Arc<dyn ExceptionHandler>) -> Self {
		self.exception_handler = handler;
		self
	}

	pub fn router(&self) -> &Router {
		&self.router
	}

	pub fn container(&self) -> &Arc<Container> {
		self.router.container()
	}

	/// Run `request` through the global middleware and the router.
	///
	/// # Errors
	///
	/// Returns whatever the middleware or [`Router::dispatch`] fails with.
	pub async fn try_handle(&self, mut request: Request) -> Result<Response> {
		if let Some(path) = &self.active_path
			&& !request.extensions.contains::<ActivePath>()
		{
			request.extensions.insert(ActivePath(path.clone()));
		}
		let ctx = RouterContext::new(self.router.container().clone());
		request.extensions.insert(ctx);

		let chain = self
			.middleware
			.iter()
			.cloned()
			.fold(MiddlewareChain::new(Arc::new(self.router.clone())), |chain, middleware| {
				chain.with_middleware(middleware)
			});
		chain.handle(request).await
	}

	/// Like [`try_handle`](Self::try_handle), with errors rendered by the
	/// exception handler.
	pub async fn handle_request(&self, request: Request) -> Response {
		match self.try_handle(request).await {
			Ok(response) => response,
			Err(error) => self.exception_handler.handle_exception(&error),
		}
	}
}

/// Never fails: errors come back as responses.
#[async_trait]
impl Handler for Dispatcher {
	async fn handle(&self, request: Request) -> Result<Response> {
		Ok(self.handle_request(request).await)
	}
}

impl fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dispatcher")
			.field("router", &self.router)
			.field("middleware", &self.middleware.len())
			.field("active_path", &self.active_path)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::StatusCode;
	use sentier_http::handler_fn;
	use sentier_urls::{RequestRoutingExt, Route};

	fn router() -> Router {
		let router = Router::new(Arc::new(Container::new()));
		router.register(Route::new("where", "/where").unwrap().with_handler(handler_fn(
			|req: Request| async move {
				let depth = req.router_context().map(RouterContext::depth).unwrap_or_default();
				Ok(Response::ok().with_body(format!("{}|{}", req.active_path(), depth)))
			},
		)));
		router
	}

	fn get(uri: &str) -> Request {
		Request::builder().uri(uri).build().unwrap()
	}

	#[tokio::test]
	async fn test_active_path_is_seeded() {
		let dispatcher = Dispatcher::new(router()).with_active_path("/app");

		let response = dispatcher.handle_request(get("/app/where")).await;
		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.body_text(), "/app|1");
	}

	#[tokio::test]
	async fn test_existing_active_path_is_kept() {
		let dispatcher = Dispatcher::new(router()).with_active_path("/app");
		let mut request = get("/other/where");
		request.extensions.insert(ActivePath("/other".to_string()));

		let response = dispatcher.handle_request(request).await;
		assert_eq!(response.body_text(), "/other|1");
	}

	#[tokio::test]
	async fn test_each_request_gets_a_fresh_context() {
		let dispatcher = Dispatcher::new(router());

		for _ in 0..2 {
			let response = dispatcher.try_handle(get("/where")).await.unwrap();
			assert_eq!(response.body_text(), "/|1");
		}
	}
}
