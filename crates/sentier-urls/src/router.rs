use crate::context::RouterContext;
use crate::extensions::{ActivePath, MatchedRoute, RequestRoutingExt};
use crate::route::{DEFAULT_SEPARATOR, MiddlewareAliases, Route, RouteParams, RouteTarget};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use sentier_conf::RouterSettings;
use sentier_core::exception::{Error, Result};
use sentier_di::Container;
use sentier_http::{Handler, Middleware, Request, Response};
use std::fmt;
use std::sync::Arc;

/// Reserved name of the primary route.
pub const DEFAULT_ROUTE_NAME: &str = "default";

/// First-match router over named routes.
///
/// Routes are tried in registration order; the primary route, if any, is
/// tried last. A `Router` is a cheap handle: clones share the same routes,
/// aliases and active-route slot. The base path a dispatch runs under lives
/// in its [`RouterContext`], never on the router.
///
/// # Examples
///
/// ```
/// use sentier_urls::{Route, Router};
/// use sentier_di::Container;
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// let router = Router::new(Arc::new(Container::new()));
/// router.register(Route::new("post::view", "/post/<id>").unwrap());
///
/// let params = HashMap::from([("id".to_string(), "10".to_string())]);
/// assert_eq!(router.resolve_url("post::view", &params).unwrap(), "/post/10");
/// ```
#[derive(Clone)]
pub struct Router {
	inner: Arc<RouterInner>,
}

struct RouterInner {
	container: Arc<Container>,
	base_path: String,
	separator: String,
	routes: RwLock<IndexMap<String, Arc<Route>>>,
	/// Synthesized from settings; an explicit `default` route shadows it
	primary: Option<Arc<Route>>,
	aliases: RwLock<MiddlewareAliases>,
	active_route: RwLock<Option<Arc<Route>>>,
}

impl Router {
	/// Router with default settings and no primary route
	pub fn new(container: Arc<Container>) -> Self {
		Self::build(container, &RouterSettings::default(), None)
	}

	/// Router configured from `settings`.
	///
	/// When `settings.default_route` is set, a primary route named
	/// [`DEFAULT_ROUTE_NAME`] is synthesized from it.
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] for inconsistent settings and
	/// [`Error::InvalidPattern`] if the primary route pattern does not compile.
	///
	/// # Examples
	///
	/// ```
	/// use sentier_conf::RouterSettings;
	/// use sentier_di::Container;
	/// use sentier_urls::Router;
	/// use std::collections::HashMap;
	/// use std::sync::Arc;
	///
	/// let router = Router::with_settings(
	///     Arc::new(Container::new()),
	///     &RouterSettings::with_default_route(),
	/// )
	/// .unwrap();
	///
	/// let params = HashMap::from([("id".to_string(), "10".to_string())]);
	/// assert_eq!(router.resolve_url("post/view", &params).unwrap(), "/post/view?id=10");
	/// ```
	pub fn with_settings(container: Arc<Container>, settings: &RouterSettings) -> Result<Self> {
		settings.validate()?;
		let primary = match &settings.default_route {
			Some(primary) => Some(Arc::new(
				Route::new(DEFAULT_ROUTE_NAME, &primary.pattern)?
					.with_defaults([
						("controller", primary.controller.as_str()),
						("action", primary.action.as_str()),
					])
					.with_separator(settings.separator.as_str())
					.with_target(RouteTarget::from_params()),
			)),
			None => None,
		};
		Ok(Self::build(container, settings, primary))
	}

	fn build(container: Arc<Container>, settings: &RouterSettings, primary: Option<Arc<Route>>) -> Self {
		Self {
			inner: Arc::new(RouterInner {
				container,
				base_path: settings.base_path.clone(),
				separator: settings.separator.clone(),
				routes: RwLock::new(IndexMap::new()),
				primary,
				aliases: RwLock::new(MiddlewareAliases::new()),
				active_route: RwLock::new(None),
			}),
		}
	}

	/// Register `route` after every route registered so far.
	///
	/// Registering a name again replaces the earlier route in its original
	/// position. A route named [`DEFAULT_ROUTE_NAME`] becomes the primary route.
	pub fn register(&self, route: Route) -> &Self {
		// Routes built with the stock separator adopt the router's.
		let route = if route.separator() == DEFAULT_SEPARATOR && self.inner.separator != DEFAULT_SEPARATOR {
			route.with_separator(self.inner.separator.as_str())
		} else {
			route
		};
		let name = route.name().to_string();
		let replaced = self
			.inner
			.routes
			.write()
			.insert(name.clone(), Arc::new(route))
			.is_some();
		if replaced {
			tracing::warn!(route = %name, "route registered twice; keeping the later definition");
		} else {
			tracing::debug!(route = %name, "route registered");
		}
		self
	}

	/// Register `middleware` under `alias`, replacing any earlier one.
	pub fn register_middleware_alias(&self, alias: impl Into<String>, middleware: Arc<dyn Middleware>) -> &Self {
		let alias = alias.into();
		tracing::debug!(alias = %alias, "middleware alias registered");
		self.inner.aliases.write().insert(alias, middleware);
		self
	}

	pub fn has_middleware_alias(&self, alias: &str) -> bool {
		self.inner.aliases.read().contains_key(alias)
	}

	/// Registered routes in matching order, without a synthesized primary route
	pub fn routes(&self) -> Vec<Arc<Route>> {
		self.inner.routes.read().values().cloned().collect()
	}

	pub fn route_names(&self) -> Vec<String> {
		self.inner.routes.read().keys().cloned().collect()
	}

	/// Look up a route by name; [`DEFAULT_ROUTE_NAME`] yields the primary route
	pub fn route(&self, name: &str) -> Option<Arc<Route>> {
		if name == DEFAULT_ROUTE_NAME {
			return self.primary_route();
		}
		self.inner.routes.read().get(name).cloned()
	}

	pub fn has_route(&self, name: &str) -> bool {
		self.route(name).is_some()
	}

	pub fn primary_route(&self) -> Option<Arc<Route>> {
		self.inner
			.routes
			.read()
			.get(DEFAULT_ROUTE_NAME)
			.cloned()
			.or_else(|| self.inner.primary.clone())
	}

	pub fn container(&self) -> &Arc<Container> {
		&self.inner.container
	}

	pub fn separator(&self) -> &str {
		&self.inner.separator
	}

	/// Base path `request` is routed under: its [`ActivePath`], else the configured base path
	pub fn base_path_of(&self, request: &Request) -> String {
		request
			.extensions
			.get::<ActivePath>()
			.map(|path| path.0.clone())
			.unwrap_or_else(|| self.inner.base_path.clone())
	}

	/// Configured base path, used when no dispatch supplies one
	pub fn base_path(&self) -> &str {
		&self.inner.base_path
	}

	/// The route chosen by the latest dispatch, if it matched.
	///
	/// Shared by every request going through this router; handlers read
	/// their own match from [`MatchedRoute`].
	pub fn active_route(&self) -> Option<Arc<Route>> {
		self.inner.active_route.read().clone()
	}

	/// The innermost router dispatching in `ctx`
	pub fn current(ctx: &RouterContext) -> Option<Router> {
		ctx.current_router()
	}

	/// Whether both handles refer to the same router
	pub fn ptr_eq(&self, other: &Router) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Dispatch `request` to the first matching route.
	///
	/// The router is bound as current in `ctx` for the duration of the call
	/// and unbound on every exit path.
	///
	/// # Errors
	///
	/// Returns [`Error::NoRouteMatched`] when no route matches, otherwise
	/// whatever [`Route::perform`] fails with.
	#[tracing::instrument(
		name = "router.dispatch",
		skip_all,
		fields(method = %request.method, path = %request.path())
	)]
	pub async fn dispatch(&self, ctx: &RouterContext, mut request: Request) -> Result<Response> {
		let base_path = self.base_path_of(&request);
		let _guard = ctx.enter(self.clone(), base_path.as_str());
		*self.inner.active_route.write() = None;

		let Some((route, params)) = self.find(&request, &base_path) else {
			tracing::debug!(base_path = %base_path, "no route matched");
			return Err(Error::NoRouteMatched {
				path: request.path().to_string(),
			});
		};
		tracing::debug!(route = %route.name(), "route matched");

		*self.inner.active_route.write() = Some(route.clone());
		request.path_params = params.clone();
		request.extensions.insert(MatchedRoute {
			route: route.clone(),
			params,
		});
		request.extensions.insert(ctx.clone());

		let aliases = self.inner.aliases.read().clone();
		route.perform(ctx, request, &aliases).await
	}

	fn find(&self, request: &Request, base_path: &str) -> Option<(Arc<Route>, RouteParams)> {
		let routes = self.inner.routes.read();
		let registered = routes
			.iter()
			.filter(|(name, _)| name.as_str() != DEFAULT_ROUTE_NAME)
			.map(|(_, route)| route);
		let primary = routes
			.get(DEFAULT_ROUTE_NAME)
			.or(self.inner.primary.as_ref());

		registered
			.chain(primary)
			.find_map(|route| route.matches(request, base_path).map(|params| (route.clone(), params)))
	}

	/// Build the URL for a route name or a `controller::action` shorthand,
	/// under the configured base path.
	///
	/// A registered name is reversed by its route. Otherwise a name holding
	/// the route separator or `/` is split into controller (all but the last
	/// segment) and action (the last segment), which are merged into `params`
	/// and reversed by the primary route.
	///
	/// # Errors
	///
	/// Returns [`Error::UnresolvableRoute`] when neither applies, and the
	/// errors of [`Route::create_url`].
	pub fn resolve_url(&self, name: &str, params: &RouteParams) -> Result<String> {
		self.resolve_url_under(&self.inner.base_path, name, params)
	}

	/// Like [`resolve_url`](Self::resolve_url), under the base path this
	/// router dispatches with in `ctx`.
	///
	/// Falls back to the configured base path when the router is not
	/// dispatching in `ctx`.
	///
	/// # Errors
	///
	/// See [`resolve_url`](Self::resolve_url).
	pub fn resolve_url_in(&self, ctx: &RouterContext, name: &str, params: &RouteParams) -> Result<String> {
		match ctx.base_path_of(self) {
			Some(base_path) => self.resolve_url_under(&base_path, name, params),
			None => self.resolve_url(name, params),
		}
	}

	/// Like [`resolve_url`](Self::resolve_url), under an explicit base path.
	///
	/// # Errors
	///
	/// See [`resolve_url`](Self::resolve_url).
	pub fn resolve_url_under(&self, base_path: &str, name: &str, params: &RouteParams) -> Result<String> {
		if let Some(route) = self.route(name) {
			return route.create_url(params, base_path);
		}

		let (controller, action) = self
			.split_shorthand(name)
			.ok_or_else(|| Error::UnresolvableRoute(name.to_string()))?;
		let primary = self
			.primary_route()
			.ok_or_else(|| Error::UnresolvableRoute(name.to_string()))?;

		let mut merged = params.clone();
		merged.insert("controller".to_string(), controller);
		merged.insert("action".to_string(), action);
		primary.create_url(&merged, base_path)
	}

	fn split_shorthand(&self, name: &str) -> Option<(String, String)> {
		let separator = self.inner.separator.as_str();
		if !name.contains(separator) && !name.contains('/') {
			return None;
		}
		let normalized = name.replace(separator, "/");
		let segments: Vec<&str> = normalized.trim_matches('/').split('/').collect();
		if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
			return None;
		}
		let (action, controller) = segments.split_last()?;
		Some((controller.join("/"), action.to_string()))
	}

	fn context_for(&self, request: &Request) -> RouterContext {
		request
			.router_context()
			.cloned()
			.unwrap_or_else(|| RouterContext::new(self.inner.container.clone()))
	}
}

/// The router terminates the chain: `next` is never called.
#[async_trait]
impl Middleware for Router {
	async fn process(&self, request: Request, _next: Arc<dyn Handler>) -> Result<Response> {
		let ctx = self.context_for(&request);
		self.dispatch(&ctx, request).await
	}
}

#[async_trait]
impl Handler for Router {
	async fn handle(&self, request: Request) -> Result<Response> {
		let ctx = self.context_for(&request);
		self.dispatch(&ctx, request).await
	}
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("base_path", &self.inner.base_path)
			.field("routes", &self.route_names())
			.field("primary", &self.primary_route().map(|r| r.pattern().to_string()))
			.finish_non_exhaustive()
	}
}
