//! # Sentier Pagination
//!
//! Page arithmetic over a known item count, with page links generated
//! through a [`Router`](sentier_urls::Router).
//!
//! ```rust
//! use sentier_conf::PaginationSettings;
//! use sentier_di::Container;
//! use sentier_pagination::Pagination;
//! use sentier_urls::{Route, Router};
//! use std::sync::Arc;
//!
//! let router = Router::new(Arc::new(Container::new()));
//! router.register(Route::new("post::index", "/posts").unwrap());
//!
//! let mut pagination = Pagination::new(router, "post::index", &PaginationSettings::default())
//!     .with_page(3);
//! pagination.set_count(45);
//!
//! assert_eq!(pagination.page_count(), 5);
//! assert_eq!(pagination.current_page(), 3);
//! assert_eq!(pagination.offset(), 20);
//! assert_eq!(pagination.limit(), 10);
//! assert_eq!(pagination.create_url(4).unwrap(), "/posts?page=4");
//! ```

pub mod links;
pub mod paginator;

pub use links::PageLink;
pub use paginator::Pagination;
