//! Page arithmetic and router-generated page links.

pub use sentier_pagination::*;
