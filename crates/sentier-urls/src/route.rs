use crate::context::RouterContext;
use crate::extensions::MatchedRoute;
use crate::path::{join_base, relative_path};
use crate::pattern::{ReverseError, RoutePattern};
use crate::query::{append_query, encode_query};
use async_trait::async_trait;
use futures::future::BoxFuture;
use http::Method;
use sentier_core::exception::{Error, Result};
use sentier_di::Controller;
use sentier_http::{Handler, Middleware, MiddlewareChain, Request, Response};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Parameter values keyed by placeholder or query name.
pub type RouteParams = HashMap<String, String>;

/// Middleware registered under short aliases.
pub type MiddlewareAliases = HashMap<String, Arc<dyn Middleware>>;

/// Async function target, called with the routing context and the request.
pub type RouteClosure =
	Arc<dyn Fn(RouterContext, Request) -> BoxFuture<'static, Result<Response>> + Send + Sync>;

/// Default separator of `controller::action` names.
pub const DEFAULT_SEPARATOR: &str = "::";

/// What a matched route runs.
#[derive(Clone)]
pub enum RouteTarget {
	/// An action of a controller registered in the container.
	///
	/// `None` fields are taken from the matched `controller`/`action`
	/// parameters, then from the route defaults.
	ControllerAction {
		controller: Option<String>,
		action: Option<String>,
	},
	Closure(RouteClosure),
	/// Any handler, typically a [`MiddlewareChain`].
	Handler(Arc<dyn Handler>),
}

impl RouteTarget {
	/// Target `action` of `controller`
	pub fn action(controller: impl Into<String>, action: impl Into<String>) -> Self {
		Self::ControllerAction {
			controller: Some(controller.into()),
			action: Some(action.into()),
		}
	}

	/// Controller and action both taken from the matched parameters
	pub fn from_params() -> Self {
		Self::ControllerAction {
			controller: None,
			action: None,
		}
	}

	pub fn closure<F, Fut>(func: F) -> Self
	where
		F: Fn(RouterContext, Request) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Response>> + Send + 'static,
	{
		Self::Closure(Arc::new(move |ctx, request| Box::pin(func(ctx, request))))
	}

	pub fn handler<H: Handler + 'static>(handler: H) -> Self {
		Self::Handler(Arc::new(handler))
	}
}

impl fmt::Debug for RouteTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ControllerAction { controller, action } => f
				.debug_struct("ControllerAction")
				.field("controller", controller)
				.field("action", action)
				.finish(),
			Self::Closure(_) => f.write_str("Closure"),
			Self::Handler(_) => f.write_str("Handler"),
		}
	}
}

/// A named pattern-to-target binding.
///
/// # Examples
///
/// ```
/// use sentier_urls::Route;
/// use std::collections::HashMap;
///
/// let route = Route::new("post::view", "/post/<id:\\d+>").unwrap();
///
/// let url = route
///     .create_url(&HashMap::from([("id".to_string(), "5".to_string())]), "/")
///     .unwrap();
/// assert_eq!(url, "/post/5");
/// ```
#[derive(Clone)]
pub struct Route {
	name: String,
	pattern: RoutePattern,
	target: Option<RouteTarget>,
	defaults: RouteParams,
	namespace: Option<String>,
	separator: String,
	middleware: Vec<String>,
	methods: Option<Vec<Method>>,
}

impl Route {
	/// Create a route named `name` for `pattern`.
	///
	/// Without an explicit target, a name such as `post::view` targets action
	/// `view` of controller `post`; other names take controller and action
	/// from the matched parameters.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidPattern`] if `pattern` does not compile.
	pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
		Ok(Self {
			name: name.into(),
			pattern: RoutePattern::new(pattern)?,
			target: None,
			defaults: RouteParams::new(),
			namespace: None,
			separator: DEFAULT_SEPARATOR.to_string(),
			middleware: Vec::new(),
			methods: None,
		})
	}

	pub fn with_target(mut self, target: RouteTarget) -> Self {
		self.target = Some(target);
		self
	}

	/// Target `action` of `controller`
	pub fn to(self, controller: impl Into<String>, action: impl Into<String>) -> Self {
		self.with_target(RouteTarget::action(controller, action))
	}

	/// Target an async closure
	///
	/// # Examples
	///
	/// ```
	/// use sentier_urls::Route;
	/// use sentier_http::Response;
	///
	/// let route = Route::new("health", "/health")
	///     .unwrap()
	///     .with_closure(|_ctx, _req| async { Ok(Response::ok().with_body("up")) });
	/// assert_eq!(route.name(), "health");
	/// ```
	pub fn with_closure<F, Fut>(self, func: F) -> Self
	where
		F: Fn(RouterContext, Request) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Response>> + Send + 'static,
	{
		self.with_target(RouteTarget::closure(func))
	}

	pub fn with_handler<H: Handler + 'static>(self, handler: H) -> Self {
		self.with_target(RouteTarget::handler(handler))
	}

	pub fn with_handler_arc(self, handler: Arc<dyn Handler>) -> Self {
		self.with_target(RouteTarget::Handler(handler))
	}

	/// Value used when a placeholder has no match or URL parameter
	pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.defaults.insert(name.into(), value.into());
		self
	}

	pub fn with_defaults<I, K, V>(mut self, defaults: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.defaults
			.extend(defaults.into_iter().map(|(k, v)| (k.into(), v.into())));
		self
	}

	/// Controller namespace, prefixed to controller ids as `namespace/controller`
	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
		self.separator = separator.into();
		self
	}

	/// Run the middleware registered under `alias` around this route's target
	pub fn with_middleware(mut self, alias: impl Into<String>) -> Self {
		self.middleware.push(alias.into());
		self
	}

	/// Only match requests using one of `methods`
	pub fn with_methods<I: IntoIterator<Item = Method>>(mut self, methods: I) -> Self {
		self.methods = Some(methods.into_iter().collect());
		self
	}

	/// Also match paths with or without a trailing `/`
	pub fn with_optional_trailing_slash(mut self) -> Self {
		self.pattern = self.pattern.with_optional_trailing_slash();
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	pub fn defaults(&self) -> &RouteParams {
		&self.defaults
	}

	pub fn namespace(&self) -> Option<&str> {
		self.namespace.as_deref()
	}

	pub fn separator(&self) -> &str {
		&self.separator
	}

	/// Middleware aliases in declaration order
	pub fn middleware(&self) -> &[String] {
		&self.middleware
	}

	pub fn methods(&self) -> Option<&[Method]> {
		self.methods.as_deref()
	}

	/// The target this route runs, deriving it from the name when none was set
	pub fn target(&self) -> RouteTarget {
		if let Some(target) = &self.target {
			return target.clone();
		}
		match self.name.rsplit_once(self.separator.as_str()) {
			Some((controller, action)) if !controller.is_empty() && !action.is_empty() => {
				RouteTarget::action(controller, action)
			}
			_ => RouteTarget::from_params(),
		}
	}

	/// Test `request` against this route, relative to `base_path`.
	///
	/// Returns the captured parameters merged over the route defaults.
	pub fn matches(&self, request: &Request, base_path: &str) -> Option<RouteParams> {
		if let Some(methods) = &self.methods
			&& !methods.contains(&request.method)
		{
			return None;
		}
		let relative = relative_path(request.path(), base_path)?;
		let captured = self
			.pattern
			.matches_with_defaults(relative, |name| self.defaults.contains_key(name))?;

		let mut params = self.defaults.clone();
		params.extend(captured);
		Some(params)
	}

	/// Run the target for a matched `request`.
	///
	/// # Errors
	///
	/// Returns [`Error::MiddlewareResolution`] for an alias missing from
	/// `aliases`, [`Error::TargetResolution`] when the controller or action
	/// cannot be found, and whatever the target itself fails with.
	pub async fn perform(
		&self,
		ctx: &RouterContext,
		request: Request,
		aliases: &MiddlewareAliases,
	) -> Result<Response> {
		let middleware = self
			.middleware
			.iter()
			.map(|alias| {
				aliases
					.get(alias)
					.cloned()
					.ok_or_else(|| Error::MiddlewareResolution {
						route: self.name.clone(),
						alias: alias.clone(),
					})
			})
			.collect::<Result<Vec<_>>>()?;

		let target = self.resolve_target(ctx, &request)?;
		if middleware.is_empty() {
			return target.handle(request).await;
		}

		let chain = middleware
			.into_iter()
			.fold(MiddlewareChain::new(target), |chain, mw| {
				chain.with_middleware(mw)
			});
		chain.handle(request).await
	}

	fn resolve_target(&self, ctx: &RouterContext, request: &Request) -> Result<Arc<dyn Handler>> {
		match self.target() {
			RouteTarget::Handler(handler) => Ok(handler),
			RouteTarget::Closure(func) => Ok(Arc::new(ClosureHandler {
				ctx: ctx.clone(),
				func,
			})),
			RouteTarget::ControllerAction { controller, action } => {
				let params = request
					.extensions
					.get::<MatchedRoute>()
					.map(|matched| &matched.params)
					.unwrap_or(&request.path_params);
				let lookup = |explicit: Option<String>, key: &str| {
					explicit
						.or_else(|| params.get(key).cloned())
						.or_else(|| self.defaults.get(key).cloned())
				};

				let controller = lookup(controller, "controller")
					.filter(|c| !c.is_empty())
					.ok_or_else(|| self.unresolved("<controller>", "no controller given"))?;
				let controller_id = match &self.namespace {
					Some(ns) => format!("{}/{}", ns.trim_end_matches('/'), controller),
					None => controller,
				};
				let instance = ctx
					.container()
					.controller(&controller_id)
					.ok_or_else(|| self.unresolved(&controller_id, "controller is not registered"))?;

				let action = lookup(action, "action")
					.filter(|a| !a.is_empty())
					.unwrap_or_else(|| instance.default_action().to_string());
				if !instance.has_action(&action) {
					return Err(self.unresolved(
						&format!("{}{}{}", controller_id, self.separator, action),
						"unknown action",
					));
				}

				tracing::trace!(
					route = %self.name,
					controller = %controller_id,
					action = %action,
					"resolved controller action"
				);
				Ok(Arc::new(ActionHandler {
					controller: instance,
					action,
				}))
			}
		}
	}

	fn unresolved(&self, target: &str, reason: &str) -> Error {
		Error::TargetResolution {
			route: self.name.clone(),
			target: target.to_string(),
			reason: reason.to_string(),
		}
	}

	/// Build the URL of this route under `base_path`.
	///
	/// Placeholders take their value from `params`, then from the route
	/// defaults. Trailing placeholders left at their default are omitted from
	/// the path. Parameters that are not placeholders are appended as a query
	/// string sorted by key.
	///
	/// # Errors
	///
	/// Returns [`Error::MissingParameter`] when a placeholder has neither a
	/// value nor a default and [`Error::InvalidParameter`] when a value does
	/// not satisfy the placeholder's constraint.
	pub fn create_url(&self, params: &RouteParams, base_path: &str) -> Result<String> {
		let path = self
			.pattern
			.reverse(
				|name| {
					params
						.get(name)
						.or_else(|| self.defaults.get(name))
						.map(String::as_str)
				},
				|name| self.defaults.get(name).map(String::as_str),
			)
			.map_err(|err| match err {
				ReverseError::Missing(param) => Error::MissingParameter {
					route: self.name.clone(),
					param,
				},
				ReverseError::Invalid { param, value } => Error::InvalidParameter {
					route: self.name.clone(),
					param,
					value,
				},
			})?;

		let query = encode_query(
			params
				.iter()
				.filter(|(key, _)| !self.pattern.has_param(key)),
		)?;
		Ok(append_query(&join_base(base_path, &path), &query))
	}
}

impl fmt::Debug for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("name", &self.name)
			.field("pattern", &self.pattern.as_str())
			.field("target", &self.target())
			.field("defaults", &self.defaults)
			.field("namespace", &self.namespace)
			.field("middleware", &self.middleware)
			.field("methods", &self.methods)
			.finish()
	}
}

struct ActionHandler {
	controller: Arc<dyn Controller>,
	action: String,
}

#[async_trait]
impl Handler for ActionHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.controller.run_action(&self.action, request).await
	}
}

struct ClosureHandler {
	ctx: RouterContext,
	func: RouteClosure,
}

#[async_trait]
impl Handler for ClosureHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		(self.func)(self.ctx.clone(), request).await
	}
}
