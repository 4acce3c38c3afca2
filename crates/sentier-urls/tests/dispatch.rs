//! Dispatch behaviour of routers: matching order, nesting, middleware aliases.

use async_trait::async_trait;
use parking_lot::Mutex;
use rstest::{fixture, rstest};
use sentier_conf::RouterSettings;
use sentier_core::{Error, Result};
use sentier_di::{ActionController, Container};
use sentier_http::{Handler, Middleware, MiddlewareChain, Request, Response, handler_fn};
use sentier_urls::{ActivePath, RequestRoutingExt, Route, RouteParams, Router, RouterContext};
use std::sync::Arc;
use tokio::sync::Notify;

fn body(text: &'static str) -> impl Handler {
	handler_fn(move |_req| async move { Ok(Response::ok().with_body(text)) })
}

fn get(uri: &str) -> Request {
	Request::builder().uri(uri).build().unwrap()
}

#[fixture]
fn container() -> Arc<Container> {
	let container = Container::new();
	container.register_controller(
		"post",
		ActionController::new()
			.action(
				"view",
				handler_fn(|req: Request| async move {
					let id = req.path_param("id").unwrap_or("?").to_string();
					Ok(Response::ok().with_body(format!("post:view:{}", id)))
				}),
			)
			.action("index", body("post:index")),
	);
	container.register_controller("index", ActionController::new().action("index", body("home")));
	Arc::new(container)
}

#[rstest]
#[tokio::test]
async fn test_first_registered_match_wins(container: Arc<Container>) {
	let router = Router::new(container.clone());
	router
		.register(Route::new("catch", "/post/<anything>").unwrap().with_handler(body("catch")))
		.register(Route::new("post::view", "/post/<id:\\d+>").unwrap());

	let ctx = RouterContext::new(container);
	let response = router.dispatch(&ctx, get("/post/5")).await.unwrap();

	assert_eq!(response.body_text(), "catch");
	assert_eq!(router.active_route().unwrap().name(), "catch");
}

#[rstest]
#[tokio::test]
async fn test_specific_route_first_wins(container: Arc<Container>) {
	let router = Router::new(container.clone());
	router
		.register(Route::new("post::view", "/post/<id:\\d+>").unwrap())
		.register(Route::new("catch", "/post/<anything>").unwrap().with_handler(body("catch")));

	let ctx = RouterContext::new(container);
	let response = router.dispatch(&ctx, get("/post/5")).await.unwrap();
	assert_eq!(response.body_text(), "post:view:5");

	let response = router.dispatch(&ctx, get("/post/latest")).await.unwrap();
	assert_eq!(response.body_text(), "catch");
}

#[rstest]
#[tokio::test]
async fn test_no_routes_and_no_primary_route(container: Arc<Container>) {
	let router = Router::new(container.clone());
	let ctx = RouterContext::new(container);

	let err = router.dispatch(&ctx, get("/anything")).await.unwrap_err();

	assert!(matches!(err, Error::NoRouteMatched { ref path } if path == "/anything"));
	assert!(router.active_route().is_none());
	assert_eq!(ctx.depth(), 0);
}

#[rstest]
#[tokio::test]
async fn test_primary_route_is_tried_last(container: Arc<Container>) {
	let router = Router::with_settings(container.clone(), &RouterSettings::with_default_route()).unwrap();
	router.register(Route::new("post::view", "/post/<id:\\d+>").unwrap());
	let ctx = RouterContext::new(container);

	let response = router.dispatch(&ctx, get("/post/3")).await.unwrap();
	assert_eq!(response.body_text(), "post:view:3");

	let response = router.dispatch(&ctx, get("/post/index")).await.unwrap();
	assert_eq!(response.body_text(), "post:index");
	assert_eq!(router.active_route().unwrap().name(), "default");
}

#[rstest]
#[case("/", "home")]
#[case("/post", "post:index")]
#[case("/index", "home")]
#[case("/post/view/extra", "")]
#[tokio::test]
async fn test_primary_route_fills_missing_segments_from_defaults(
	container: Arc<Container>,
	#[case] uri: &str,
	#[case] expected: &str,
) {
	let settings = RouterSettings::with_default_route();
	let router = Router::with_settings(container.clone(), &settings).unwrap();
	let ctx = RouterContext::new(container);

	let result = router.dispatch(&ctx, get(uri)).await;

	if expected.is_empty() {
		assert!(matches!(result, Err(Error::NoRouteMatched { .. })));
	} else {
		assert_eq!(result.unwrap().body_text(), expected);
	}
}

#[rstest]
#[tokio::test]
async fn test_primary_route_urls_leave_out_default_segments(container: Arc<Container>) {
	let router = Router::with_settings(container.clone(), &RouterSettings::with_default_route()).unwrap();
	let ctx = RouterContext::new(container);

	let home = router.resolve_url("index/index", &RouteParams::new()).unwrap();
	let index = router.resolve_url("post::index", &RouteParams::new()).unwrap();
	assert_eq!(home, "/");
	assert_eq!(index, "/post");

	assert_eq!(router.dispatch(&ctx, get(&home)).await.unwrap().body_text(), "home");
	assert_eq!(router.dispatch(&ctx, get(&index)).await.unwrap().body_text(), "post:index");
}

#[rstest]
#[tokio::test]
async fn test_explicit_default_route_is_tried_after_later_routes(container: Arc<Container>) {
	let router = Router::new(container.clone());
	router
		.register(Route::new("default", "/<anything:.*>").unwrap().with_handler(body("fallback")))
		.register(Route::new("post::view", "/post/<id>").unwrap());
	let ctx = RouterContext::new(container);

	let response = router.dispatch(&ctx, get("/post/1")).await.unwrap();
	assert_eq!(response.body_text(), "post:view:1");

	let response = router.dispatch(&ctx, get("/elsewhere")).await.unwrap();
	assert_eq!(response.body_text(), "fallback");
	assert_eq!(router.active_route().unwrap().name(), "default");
}

#[rstest]
#[tokio::test]
async fn test_failed_dispatch_clears_active_route(container: Arc<Container>) {
	let router = Router::new(container.clone());
	router.register(Route::new("home", "/").unwrap().with_handler(body("home")));
	let ctx = RouterContext::new(container);

	router.dispatch(&ctx, get("/")).await.unwrap();
	assert!(router.active_route().is_some());

	router.dispatch(&ctx, get("/nowhere")).await.unwrap_err();
	assert!(router.active_route().is_none());
}

#[rstest]
#[tokio::test]
async fn test_created_url_dispatches_back_to_the_route(container: Arc<Container>) {
	let router = Router::new(container.clone());
	router.register(Route::new("post::view", "/post/<id>").unwrap());

	let url = router
		.resolve_url("post::view", &RouteParams::from([("id".to_string(), "5".to_string())]))
		.unwrap();
	assert_eq!(url, "/post/5");

	let ctx = RouterContext::new(container);
	let response = router.dispatch(&ctx, get(&url)).await.unwrap();
	assert_eq!(response.body_text(), "post:view:5");
}

#[rstest]
#[tokio::test]
async fn test_active_path_scopes_matching_and_urls(container: Arc<Container>) {
	let router = Router::new(container.clone());
	router
		.register(Route::new("post::view", "/post/<id>").unwrap())
		.register(Route::new("link", "/link/<id>").unwrap().with_handler(handler_fn(
			|req: Request| async move {
				let id = req.path_param("id").unwrap_or("?").to_string();
				let url = req
					.url_for("post::view", &RouteParams::from([("id".to_string(), id)]))
					.unwrap_or_else(|err| err.to_string());
				Ok(Response::ok().with_body(url))
			},
		)));
	let ctx = RouterContext::new(container);

	let mut request = get("/blog/post/8");
	request.extensions.insert(ActivePath("/blog".to_string()));
	let response = router.dispatch(&ctx, request).await.unwrap();
	assert_eq!(response.body_text(), "post:view:8");

	let mut request = get("/blog/link/9");
	request.extensions.insert(ActivePath("/blog".to_string()));
	let response = router.dispatch(&ctx, request).await.unwrap();
	assert_eq!(response.body_text(), "/blog/post/9");

	let response = router.dispatch(&ctx, get("/link/9")).await.unwrap();
	assert_eq!(response.body_text(), "/post/9");

	let url = router
		.resolve_url("post::view", &RouteParams::from([("id".to_string(), "9".to_string())]))
		.unwrap();
	assert_eq!(url, "/post/9", "outside a dispatch the configured base applies");
}

#[rstest]
#[tokio::test]
async fn test_interleaved_requests_keep_their_own_base_path(container: Arc<Container>) {
	let released = Arc::new(Notify::new());
	let router = Router::new(container.clone());
	let waiting = released.clone();
	let releasing = released.clone();
	router
		.register(Route::new("slow", "/slow").unwrap().with_closure(move |_ctx, req| {
			let waiting = waiting.clone();
			async move {
				waiting.notified().await;
				let url = req
					.url_for("fast", &RouteParams::new())
					.unwrap_or_else(|err| err.to_string());
				Ok(Response::ok().with_body(url))
			}
		}))
		.register(Route::new("fast", "/fast").unwrap().with_closure(move |_ctx, req| {
			let releasing = releasing.clone();
			async move {
				let url = req
					.url_for("slow", &RouteParams::new())
					.unwrap_or_else(|err| err.to_string());
				releasing.notify_one();
				Ok(Response::ok().with_body(url))
			}
		}));

	let mut slow = get("/tenant-a/slow");
	slow.extensions.insert(ActivePath("/tenant-a".to_string()));
	let mut fast = get("/tenant-b/fast");
	fast.extensions.insert(ActivePath("/tenant-b".to_string()));

	let slow_ctx = RouterContext::new(container.clone());
	let fast_ctx = RouterContext::new(container);
	let (slow, fast) = tokio::join!(router.dispatch(&slow_ctx, slow), router.dispatch(&fast_ctx, fast));

	assert_eq!(slow.unwrap().body_text(), "/tenant-a/fast");
	assert_eq!(fast.unwrap().body_text(), "/tenant-b/slow");
	assert_eq!(slow_ctx.depth(), 0);
	assert_eq!(fast_ctx.depth(), 0);
}

#[rstest]
#[tokio::test]
async fn test_handler_sees_matched_route_and_context(container: Arc<Container>) {
	let router = Router::new(container.clone());
	router.register(
		Route::new("inspect", "/inspect/<item>")
			.unwrap()
			.with_default("format", "html")
			.with_handler(handler_fn(|req: Request| async move {
				let matched = req.matched_route().unwrap();
				let ctx = req.router_context().unwrap();
				let current = ctx.current_router().unwrap();
				Ok(Response::ok().with_body(format!(
					"{}|{}|{}|{}",
					matched.route.name(),
					matched.params["item"],
					req.path_param("format").unwrap_or(""),
					current.route_names().join(",")
				)))
			})),
	);

	let ctx = RouterContext::new(container);
	let response = router.dispatch(&ctx, get("/inspect/lamp")).await.unwrap();
	assert_eq!(response.body_text(), "inspect|lamp|html|inspect");
}

/// Builds `/mod/...` routes on an outer router that hand off to `inner`
/// and record which router is current once the inner dispatch returns.
fn nesting_router(container: Arc<Container>, inner: Router, seen: Arc<Mutex<Vec<String>>>) -> Router {
	let outer = Router::new(container);
	outer.register(
		Route::new("modules", "/mod/<rest:.*>")
			.unwrap()
			.with_closure(move |ctx, mut request| {
				let inner = inner.clone();
				let seen = seen.clone();
				async move {
					request.extensions.insert(ActivePath("/mod".to_string()));
					let result = inner.dispatch(&ctx, request).await;
					let current = ctx
						.current_router()
						.map(|router| router.route_names().join(","))
						.unwrap_or_default();
					seen.lock().push(current);
					result
				}
			}),
	);
	outer
}

#[rstest]
#[case("/mod/ok", true)]
#[case("/mod/fail", false)]
#[case("/mod/missing", false)]
#[tokio::test]
async fn test_outer_router_is_restored_after_nested_dispatch(
	container: Arc<Container>,
	#[case] uri: &str,
	#[case] succeeds: bool,
) {
	let inner = Router::new(container.clone());
	inner
		.register(Route::new("ok", "/ok").unwrap().with_handler(body("inner ok")))
		.register(
			Route::new("fail", "/fail")
				.unwrap()
				.with_closure(|_ctx, _req| async { Err(Error::Internal("inner failure".to_string())) }),
		);
	let seen = Arc::new(Mutex::new(Vec::new()));
	let outer = nesting_router(container.clone(), inner, seen.clone());
	let ctx = RouterContext::new(container);

	let result = outer.dispatch(&ctx, get(uri)).await;

	assert_eq!(result.is_ok(), succeeds);
	assert_eq!(seen.lock().as_slice(), ["modules"]);
	assert_eq!(ctx.depth(), 0);
}

#[rstest]
#[tokio::test]
async fn test_nested_router_stack_is_unwound_on_panic(container: Arc<Container>) {
	let inner = Router::new(container.clone());
	inner.register(
		Route::new("boom", "/boom")
			.unwrap()
			.with_handler(handler_fn(|req: Request| async move {
				assert!(req.path().is_empty(), "inner handler panicked");
				Ok(Response::ok())
			})),
	);
	let seen = Arc::new(Mutex::new(Vec::new()));
	let outer = nesting_router(container.clone(), inner, seen.clone());
	let ctx = RouterContext::new(container);

	let task_ctx = ctx.clone();
	let joined = tokio::spawn(async move { outer.dispatch(&task_ctx, get("/mod/boom")).await }).await;

	assert!(joined.unwrap_err().is_panic());
	assert_eq!(ctx.depth(), 0);
	assert!(seen.lock().is_empty());
}

struct Tag(&'static str);

#[async_trait]
impl Middleware for Tag {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let response = next.handle(request).await?;
		let body = format!("{}({})", self.0, response.body_text());
		Ok(response.with_body(body))
	}
}

#[rstest]
#[tokio::test]
async fn test_route_middleware_runs_in_declaration_order(container: Arc<Container>) {
	let router = Router::new(container.clone());
	router
		.register_middleware_alias("outer", Arc::new(Tag("outer")))
		.register_middleware_alias("inner", Arc::new(Tag("stale")))
		.register_middleware_alias("inner", Arc::new(Tag("inner")))
		.register(
			Route::new("post::view", "/post/<id>")
				.unwrap()
				.with_middleware("outer")
				.with_middleware("inner"),
		);

	let ctx = RouterContext::new(container);
	let response = router.dispatch(&ctx, get("/post/1")).await.unwrap();
	assert_eq!(response.body_text(), "outer(inner(post:view:1))");
}

#[rstest]
#[tokio::test]
async fn test_unregistered_alias_fails_and_unbinds(container: Arc<Container>) {
	let router = Router::new(container.clone());
	router.register(Route::new("post::view", "/post/<id>").unwrap().with_middleware("auth"));

	let ctx = RouterContext::new(container);
	let err = router.dispatch(&ctx, get("/post/1")).await.unwrap_err();

	assert!(matches!(err, Error::MiddlewareResolution { ref alias, .. } if alias == "auth"));
	assert_eq!(ctx.depth(), 0);
}

#[rstest]
#[tokio::test]
async fn test_router_as_middleware(container: Arc<Container>) {
	let router = Router::new(container);
	router.register(Route::new("post::view", "/post/<id>").unwrap());

	let chain = MiddlewareChain::new(Arc::new(body("never reached")))
		.with_middleware(Arc::new(Tag("app")))
		.with_middleware(Arc::new(router));

	let response = chain.handle(get("/post/2")).await.unwrap();
	assert_eq!(response.body_text(), "app(post:view:2)");

	let err = chain.handle(get("/other")).await.unwrap_err();
	assert!(err.is_not_found());
}
