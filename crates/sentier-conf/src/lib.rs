//! # Sentier Configuration
//!
//! Settings consumed by routers and the pagination helper, layered in
//! priority order: environment variables > TOML file > defaults.
//!
//! ```rust
//! use sentier_conf::RouterSettings;
//!
//! let settings = RouterSettings::from_toml_str(r#"
//! base_path = "/blog"
//!
//! [default_route]
//! controller = "home"
//!
//! [pagination]
//! page_size = 25
//! "#).unwrap();
//!
//! assert_eq!(settings.base_path, "/blog");
//! assert_eq!(settings.separator, "::");
//! let primary = settings.default_route.as_ref().unwrap();
//! assert_eq!(primary.controller, "home");
//! assert_eq!(primary.action, "index");
//! assert_eq!(settings.pagination.page_param, "page");
//! assert_eq!(settings.pagination.page_size, 25);
//! ```

pub mod env;
pub mod settings;

pub use env::{ENV_PREFIX, EnvOverrides, parse_bool};
pub use settings::{DefaultRouteSettings, PaginationSettings, RouterSettings};
