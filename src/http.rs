pub use sentier_http::*;
