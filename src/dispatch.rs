//! Request lifecycle: active path seeding, global middleware, error responses.

pub use sentier_dispatch::*;
