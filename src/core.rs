//! Shared error type.
//!
//! ```rust
//! use sentier::core::exception::Error;
//!
//! let err = Error::UnresolvableRoute("post::view".to_string());
//! assert!(!err.is_not_found());
//! ```

pub use sentier_core::*;
