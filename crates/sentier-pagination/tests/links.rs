//! Page links generated through routers

use sentier_conf::{PaginationSettings, RouterSettings};
use sentier_di::Container;
use sentier_http::Request;
use sentier_pagination::{PageLink, Pagination};
use sentier_urls::{Route, RouteParams, Router};
use std::sync::Arc;

fn params(pairs: &[(&str, &str)]) -> RouteParams {
	pairs
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
}

fn router() -> Router {
	let router =
		Router::with_settings(Arc::new(Container::new()), &RouterSettings::with_default_route()).unwrap();
	router.register(Route::new("post::index", "/posts/<category>").unwrap());
	router
}

#[test]
fn test_explicit_params_respect_the_merge_flag() {
	let stored = params(&[("category", "rust"), ("sort", "date")]);
	let explicit = params(&[("sort", "title"), ("tag", "async")]);
	let settings = PaginationSettings::default();

	let kept = Pagination::new(router(), "post::index", &settings).with_query(stored.clone());
	assert_eq!(
		kept.create_url_with(2, &explicit).unwrap(),
		"/posts/rust?page=2&sort=date&tag=async"
	);

	let merged = kept.with_merge(true);
	assert_eq!(
		merged.create_url_with(2, &explicit).unwrap(),
		"/posts/rust?page=2&sort=title&tag=async"
	);
}

#[test]
fn test_custom_page_param_from_request() {
	let settings = PaginationSettings {
		page_param: "p".to_string(),
		page_size: 5,
	};
	let request = Request::builder()
		.uri("/posts/rust?p=3&page=9")
		.build()
		.unwrap();

	let mut pagination = Pagination::from_request(router(), "post::index", &request, &settings)
		.with_query(params(&[("category", "rust")]));
	pagination.set_count(12);

	assert_eq!(pagination.page_param(), "p");
	assert_eq!(pagination.current_page(), 3);
	assert_eq!(pagination.offset(), 10);
	assert_eq!(pagination.create_url(1).unwrap(), "/posts/rust?p=1");
}

#[test]
fn test_unparseable_page_falls_back_to_first() {
	let request = Request::builder().uri("/posts/rust?page=last").build().unwrap();
	let mut pagination =
		Pagination::from_request(router(), "post::index", &request, &PaginationSettings::default());
	pagination.set_count(50);

	assert_eq!(pagination.current_page(), 1);
}

#[test]
fn test_links_through_primary_route_shorthand() {
	let mut pagination = Pagination::new(router(), "post/archive", &PaginationSettings::default())
		.with_page(2);
	pagination.set_count(25);

	let links = pagination.render_pages(1, true).unwrap();
	assert_eq!(
		links,
		vec![
			PageLink::Page {
				number: 1,
				url: "/post/archive?page=1".to_string(),
				current: false,
			},
			PageLink::Page {
				number: 2,
				url: "/post/archive?page=2".to_string(),
				current: true,
			},
			PageLink::Page {
				number: 3,
				url: "/post/archive?page=3".to_string(),
				current: false,
			},
		]
	);
}

#[test]
fn test_unknown_route_surfaces_resolution_error() {
	let mut pagination = Pagination::new(router(), "missing", &PaginationSettings::default());
	pagination.set_count(40);

	assert!(pagination.render_pages(2, true).is_err());
}

#[test]
fn test_links_serialize_for_templates() {
	let links = vec![
		PageLink::Page {
			number: 1,
			url: "/posts?page=1".to_string(),
			current: true,
		},
		PageLink::Gap,
	];
	let json = serde_json::to_value(&links).unwrap();

	assert_eq!(
		json,
		serde_json::json!([
			{"type": "page", "number": 1, "url": "/posts?page=1", "current": true},
			{"type": "gap"}
		])
	);
}
