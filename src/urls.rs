//! Routes, routers and the per-request router context.
//!
//! ```rust
//! use sentier::di::Container;
//! use sentier::urls::{Route, RouteParams, Router};
//! use std::sync::Arc;
//!
//! let router = Router::new(Arc::new(Container::new()));
//! router.register(Route::new("archive", "/archive/<year:\\d{4}>").unwrap());
//!
//! let params = RouteParams::from([
//!     ("year".to_string(), "2024".to_string()),
//!     ("tag".to_string(), "rust".to_string()),
//! ]);
//! assert_eq!(router.resolve_url("archive", &params).unwrap(), "/archive/2024?tag=rust");
//! ```

pub use sentier_urls::*;
