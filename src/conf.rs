//! Router and pagination settings, loaded from TOML with `SENTIER_*`
//! environment overrides.

pub use sentier_conf::*;
