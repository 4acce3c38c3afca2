use crate::links::PageLink;
use sentier_conf::PaginationSettings;
use sentier_core::exception::Result;
use sentier_http::Request;
use sentier_urls::query::merge_params;
use sentier_urls::{RouteParams, Router};

/// Page arithmetic for one listing, linked to a named route.
///
/// The requested page is clamped into `[1, page_count]`, where
/// `page_count` is `ceil(count / limit)`, or `1` for an empty listing.
#[derive(Debug, Clone)]
pub struct Pagination {
	router: Router,
	route: String,
	page_param: String,
	limit: u64,
	count: u64,
	requested_page: u64,
	/// Query data kept on every generated link
	query: RouteParams,
	/// Whether explicit link parameters replace stored query data
	merge: bool,
	/// Base path links are built under; the router's configured one when unset
	base_path: Option<String>,
}

impl Pagination {
	/// Paginate links of `route` with `settings`, starting at page 1.
	pub fn new(router: Router, route: impl Into<String>, settings: &PaginationSettings) -> Self {
		Self {
			router,
			route: route.into(),
			page_param: settings.page_param.clone(),
			limit: settings.page_size.max(1),
			count: 0,
			requested_page: 1,
			query: RouteParams::new(),
			merge: false,
			base_path: None,
		}
	}

	/// Paginate the listing `request` asked for.
	///
	/// The page comes from the page query parameter (page 1 when absent or not
	/// a number). The other query parameters are kept as stored query data.
	/// Links are built under the base path `router` uses for `request`.
	///
	/// # Examples
	///
	/// ```
	/// use sentier_conf::PaginationSettings;
	/// use sentier_di::Container;
	/// use sentier_http::Request;
	/// use sentier_pagination::Pagination;
	/// use sentier_urls::{Route, Router};
	/// use std::sync::Arc;
	///
	/// let router = Router::new(Arc::new(Container::new()));
	/// router.register(Route::new("search", "/search").unwrap());
	///
	/// let request = Request::builder().uri("/search?q=rust&page=2").build().unwrap();
	/// let mut pagination =
	///     Pagination::from_request(router, "search", &request, &PaginationSettings::default());
	/// pagination.set_count(100);
	///
	/// assert_eq!(pagination.current_page(), 2);
	/// assert_eq!(pagination.create_url(3).unwrap(), "/search?page=3&q=rust");
	/// ```
	pub fn from_request(
		router: Router,
		route: impl Into<String>,
		request: &Request,
		settings: &PaginationSettings,
	) -> Self {
		let base_path = router.base_path_of(request);
		let pagination = Self::new(router, route, settings).with_base_path(base_path);
		let requested_page = request
			.query_param(&pagination.page_param)
			.and_then(|page| page.trim().parse::<u64>().ok())
			.unwrap_or(1);
		let query = request
			.query_params
			.iter()
			.filter(|(key, _)| **key != pagination.page_param)
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect();
		pagination.with_page(requested_page).with_query(query)
	}

	/// Request page `page`; clamped once the count is known
	pub fn with_page(mut self, page: u64) -> Self {
		self.requested_page = page;
		self
	}

	/// Items per page; zero is treated as one
	pub fn with_limit(mut self, limit: u64) -> Self {
		self.limit = limit.max(1);
		self
	}

	pub fn with_page_param(mut self, name: impl Into<String>) -> Self {
		self.page_param = name.into();
		self
	}

	/// Query data kept on every generated link
	pub fn with_query(mut self, query: RouteParams) -> Self {
		self.query = query;
		self
	}

	/// Build links under `base_path`
	pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
		self.base_path = Some(base_path.into());
		self
	}

	/// Let explicit link parameters replace stored query data
	pub fn with_merge(mut self, merge: bool) -> Self {
		self.merge = merge;
		self
	}

	pub fn set_count(&mut self, count: u64) -> &mut Self {
		self.count = count;
		self
	}

	pub fn count(&self) -> u64 {
		self.count
	}

	pub fn page_count(&self) -> u64 {
		if self.count == 0 {
			1
		} else {
			self.count.div_ceil(self.limit)
		}
	}

	pub fn current_page(&self) -> u64 {
		self.requested_page.clamp(1, self.page_count())
	}

	/// Index of the first item of the current page
	pub fn offset(&self) -> u64 {
		(self.current_page() - 1) * self.limit
	}

	pub fn limit(&self) -> u64 {
		self.limit
	}

	/// Whether the listing spans more than one page
	pub fn is_required(&self) -> bool {
		self.page_count() > 1
	}

	pub fn page_param(&self) -> &str {
		&self.page_param
	}

	/// URL of `page`.
	///
	/// # Errors
	///
	/// Returns the errors of [`Router::resolve_url`] for the configured route.
	pub fn create_url(&self, page: u64) -> Result<String> {
		self.create_url_with(page, &RouteParams::new())
	}

	/// URL of `page` with extra `params`.
	///
	/// `params` only replace stored query data when merging is enabled; the
	/// page parameter is always set.
	///
	/// # Errors
	///
	/// Returns the errors of [`Router::resolve_url`] for the configured route.
	pub fn create_url_with(&self, page: u64, params: &RouteParams) -> Result<String> {
		let mut merged = merge_params(&self.query, params, self.merge);
		merged.insert(self.page_param.clone(), page.to_string());
		match &self.base_path {
			Some(base_path) => self.router.resolve_url_under(base_path, &self.route, &merged),
			None => self.router.resolve_url(&self.route, &merged),
		}
	}

	/// Links around the current page.
	///
	/// Lists `interval` pages on each side of the current page, always starts
	/// with page 1, and marks skipped ranges with [`PageLink::Gap`]. The last
	/// page is listed when `show_last` is set; otherwise a trailing gap stands
	/// for the pages past the window. A single page yields no links.
	///
	/// # Errors
	///
	/// Returns the errors of [`create_url`](Self::create_url).
	pub fn render_pages(&self, interval: u64, show_last: bool) -> Result<Vec<PageLink>> {
		let last = self.page_count();
		if last <= 1 {
			return Ok(Vec::new());
		}
		let current = self.current_page();
		let start = current.saturating_sub(interval).max(1);
		let end = current.saturating_add(interval).min(last);

		let mut links = Vec::new();
		if start > 1 {
			links.push(self.link(1, current)?);
			if start > 2 {
				links.push(PageLink::Gap);
			}
		}
		for number in start..=end {
			links.push(self.link(number, current)?);
		}
		if end < last {
			if end + 1 < last || !show_last {
				links.push(PageLink::Gap);
			}
			if show_last {
				links.push(self.link(last, current)?);
			}
		}
		Ok(links)
	}

	fn link(&self, number: u64, current: u64) -> Result<PageLink> {
		Ok(PageLink::Page {
			number,
			url: self.create_url(number)?,
			current: number == current,
		})
	}
}
