//! Controllers: named groups of actions addressed by `controller::action`.

use async_trait::async_trait;
use sentier_core::exception::{Error, Result};
use sentier_http::{Handler, Request, Response};
use std::collections::HashMap;
use std::sync::Arc;

/// A group of actions a route can target by name.
#[async_trait]
pub trait Controller: Send + Sync {
	/// Whether `action` exists on this controller.
	fn has_action(&self, action: &str) -> bool;

	/// Run `action` for `request`.
	///
	/// # Errors
	///
	/// Implementations return [`Error::TargetResolution`] for unknown actions
	/// and propagate whatever the action itself fails with.
	async fn run_action(&self, action: &str, request: Request) -> Result<Response>;

	/// Action used when a route supplies none.
	fn default_action(&self) -> &str {
		"index"
	}
}

/// [`Controller`] assembled from one [`Handler`] per action.
///
/// # Examples
///
/// ```
/// use sentier_di::{ActionController, Controller};
/// use sentier_http::{Response, handler_fn};
///
/// let controller = ActionController::new()
///     .action("index", handler_fn(|_req| async { Ok(Response::ok()) }))
///     .action("view", handler_fn(|_req| async { Ok(Response::ok()) }));
///
/// assert!(controller.has_action("view"));
/// assert!(!controller.has_action("delete"));
/// ```
#[derive(Clone, Default)]
pub struct ActionController {
	actions: HashMap<String, Arc<dyn Handler>>,
	default_action: Option<String>,
}

impl ActionController {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `handler` under `name`, replacing any earlier action of that name
	pub fn action<H: Handler + 'static>(mut self, name: impl Into<String>, handler: H) -> Self {
		self.actions.insert(name.into(), Arc::new(handler));
		self
	}

	pub fn action_arc(mut self, name: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
		self.actions.insert(name.into(), handler);
		self
	}

	/// Override the action used when a route supplies none (`index` otherwise)
	pub fn with_default_action(mut self, name: impl Into<String>) -> Self {
		self.default_action = Some(name.into());
		self
	}

	/// Registered action names, sorted
	pub fn action_names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}
}

#[async_trait]
impl Controller for ActionController {
	fn has_action(&self, action: &str) -> bool {
		self.actions.contains_key(action)
	}

	async fn run_action(&self, action: &str, request: Request) -> Result<Response> {
		let handler = self
			.actions
			.get(action)
			.ok_or_else(|| Error::TargetResolution {
				route: request.path().to_string(),
				target: action.to_string(),
				reason: "unknown action".to_string(),
			})?
			.clone();
		handler.handle(request).await
	}

	fn default_action(&self) -> &str {
		self.default_action.as_deref().unwrap_or("index")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use sentier_http::handler_fn;

	fn controller() -> ActionController {
		ActionController::new()
			.action(
				"view",
				handler_fn(|req: Request| async move {
					Ok(Response::ok().with_body(format!("view {}", req.path())))
				}),
			)
			.action("index", handler_fn(|_req| async { Ok(Response::ok()) }))
	}

	#[tokio::test]
	async fn test_run_known_action() {
		let request = Request::builder().uri("/post/view").build().unwrap();
		let response = controller().run_action("view", request).await.unwrap();
		assert_eq!(response.body_text(), "view /post/view");
	}

	#[tokio::test]
	async fn test_unknown_action_is_a_target_resolution_error() {
		let request = Request::builder().build().unwrap();
		let err = controller().run_action("delete", request).await.unwrap_err();
		assert!(matches!(err, Error::TargetResolution { .. }));
	}

	#[test]
	fn test_default_action() {
		assert_eq!(controller().default_action(), "index");
		assert_eq!(
			controller().with_default_action("list").default_action(),
			"list"
		);
		assert_eq!(controller().action_names(), vec!["index", "view"]);
	}
}
