//! Full request lifecycle: global middleware, nested routers, error rendering.

use async_trait::async_trait;
use hyper::StatusCode;
use rstest::{fixture, rstest};
use sentier_conf::RouterSettings;
use sentier_core::{Error, Result};
use sentier_di::{ActionController, Container};
use sentier_dispatch::{Dispatcher, ExceptionHandler};
use sentier_http::{Handler, Middleware, Request, Response, handler_fn};
use sentier_urls::{ActivePath, RequestRoutingExt, Route, RouteParams, Router};
use std::sync::Arc;

fn get(uri: &str) -> Request {
	Request::builder().uri(uri).build().unwrap()
}

#[fixture]
fn container() -> Arc<Container> {
	let container = Container::new();
	container.register_controller(
		"post",
		ActionController::new().action(
			"view",
			handler_fn(|req: Request| async move {
				let link = req.url_for("post::index", &RouteParams::new()).unwrap_or_default();
				Ok(Response::ok().with_body(format!("{}|{}", req.path_param("id").unwrap_or("?"), link)))
			}),
		),
	);
	container.register_controller(
		"index",
		ActionController::new().action("index", handler_fn(|_req| async { Ok(Response::ok().with_body("home")) })),
	);
	Arc::new(container)
}

fn blog(container: Arc<Container>) -> Router {
	let blog = Router::new(container);
	blog.register(Route::new("post::view", "/post/<id:\\d+>").unwrap())
		.register(Route::new("post::index", "/posts").unwrap().with_handler(handler_fn(|_req| async {
			Ok(Response::ok().with_body("posts"))
		})));
	blog
}

fn site(container: Arc<Container>) -> Router {
	let blog = blog(container.clone());
	let site = Router::with_settings(container, &RouterSettings::with_default_route()).unwrap();
	site.register(Route::new("blog", "/blog/<rest:.*>").unwrap().with_closure(move |ctx, mut request| {
		let blog = blog.clone();
		async move {
			let mount = format!("{}/blog", request.active_path().trim_end_matches('/'));
			request.extensions.insert(ActivePath(mount));
			blog.dispatch(&ctx, request).await
		}
	}));
	site
}

#[rstest]
#[tokio::test]
async fn test_nested_router_links_stay_under_its_mount(container: Arc<Container>) {
	let dispatcher = Dispatcher::new(site(container));

	let response = dispatcher.handle_request(get("/blog/post/4")).await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body_text(), "4|/blog/posts");
}

#[rstest]
#[tokio::test]
async fn test_dispatcher_mount_point_prefixes_every_level(container: Arc<Container>) {
	let dispatcher = Dispatcher::new(site(container)).with_active_path("/app");

	let response = dispatcher.handle_request(get("/app/blog/post/4")).await;

	assert_eq!(response.body_text(), "4|/app/blog/posts");
}

#[rstest]
#[tokio::test]
async fn test_primary_route_serves_the_rest(container: Arc<Container>) {
	let dispatcher = Dispatcher::new(site(container));

	let response = dispatcher.handle_request(get("/index/index")).await;
	assert_eq!(response.body_text(), "home");
}

#[rstest]
#[case("/nowhere/at/all", StatusCode::NOT_FOUND)]
#[case("/blog/post/abc", StatusCode::NOT_FOUND)]
#[case("/post/missing", StatusCode::NOT_FOUND)]
#[tokio::test]
async fn test_failures_become_json_responses(
	container: Arc<Container>,
	#[case] uri: &str,
	#[case] status: StatusCode,
) {
	let dispatcher = Dispatcher::new(site(container));

	let response = dispatcher.handle_request(get(uri)).await;

	assert_eq!(response.status, status);
	assert_eq!(response.header("content-type"), Some("application/json"));
	let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
	assert_eq!(body["status"], status.as_u16());
}

#[rstest]
#[tokio::test]
async fn test_try_handle_returns_the_error(container: Arc<Container>) {
	let dispatcher = Dispatcher::new(site(container));

	let err = dispatcher.try_handle(get("/blog/post/abc")).await.unwrap_err();

	assert!(matches!(err, Error::NoRouteMatched { ref path } if path == "/blog/post/abc"));
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

struct ApiOnly;

#[async_trait]
impl Middleware for ApiOnly {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let response = next.handle(request).await?;
		let body = format!("api({})", response.body_text());
		Ok(response.with_body(body))
	}

	fn should_continue(&self, request: &Request) -> bool {
		request.path().starts_with("/api/")
	}
}

#[rstest]
#[tokio::test]
async fn test_global_middleware_wraps_the_router(container: Arc<Container>) {
	let dispatcher = Dispatcher::new(site(container))
		.with_middleware(Arc::new(Tag("first")))
		.with_middleware(Arc::new(ApiOnly))
		.with_middleware(Arc::new(Tag("second")));

	let response = dispatcher.handle_request(get("/blog/posts")).await;

	assert_eq!(response.body_text(), "first(second(posts))");
}

struct Teapot;

impl ExceptionHandler for Teapot {
	fn handle_exception(&self, error: &Error) -> Response {
		Response::new(StatusCode::IM_A_TEAPOT).with_body(format!("teapot: {}", error.is_not_found()))
	}
}

#[rstest]
#[tokio::test]
async fn test_custom_exception_handler(container: Arc<Container>) {
	let dispatcher = Dispatcher::new(site(container)).with_exception_handler(Arc::new(Teapot));

	let response = dispatcher.handle(get("/nowhere/at/all")).await.unwrap();

	assert_eq!(response.status, StatusCode::IM_A_TEAPOT);
	assert_eq!(response.body_text(), "teapot: true");
}

#[rstest]
#[tokio::test]
async fn test_concurrent_requests_do_not_share_router_stacks(container: Arc<Container>) {
	let dispatcher = Arc::new(Dispatcher::new(site(container)));

	let tasks: Vec<_> = (0..8)
		.map(|i| {
			let dispatcher = dispatcher.clone();
			tokio::spawn(async move {
				let uri = if i % 2 == 0 { "/blog/post/1".to_string() } else { "/index/index".to_string() };
				dispatcher.handle_request(get(&uri)).await
			})
		})
		.collect();

	for (i, task) in tasks.into_iter().enumerate() {
		let response = task.await.unwrap();
		assert_eq!(response.status, StatusCode::OK);
		let expected = if i % 2 == 0 { "1|/blog/posts" } else { "home" };
		assert_eq!(response.body_text(), expected);
	}
}
