//! Controller registry and scoped values.

pub use sentier_di::*;
