//! # Sentier Dependency Injection
//!
//! The [`Container`] is the explicit registry route targets are resolved
//! through. It holds:
//!
//! - **Controllers**: named [`Controller`]s addressed by
//!   `controller::action` style targets
//! - **Singletons**: application-wide services keyed by type
//!
//! ```rust
//! use sentier_di::{ActionController, Container};
//! use sentier_http::{Response, handler_fn};
//! use std::sync::Arc;
//!
//! let container = Container::new();
//! container.register_controller(
//!     "post",
//!     ActionController::new()
//!         .action("view", handler_fn(|_req| async { Ok(Response::ok()) })),
//! );
//!
//! assert!(container.controller("post").is_some());
//! assert!(container.controller("user").is_none());
//! ```

pub mod container;
pub mod controller;
pub mod scope;

pub use container::Container;
pub use controller::{ActionController, Controller};
pub use scope::SingletonScope;
