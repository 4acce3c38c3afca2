//! Environment variable overrides
//!
//! | variable | field |
//! |---|---|
//! | `SENTIER_BASE_PATH` | `base_path` |
//! | `SENTIER_SEPARATOR` | `separator` |
//! | `SENTIER_DEFAULT_ROUTE` | enables (`true`) or disables (`false`) the primary route |
//! | `SENTIER_DEFAULT_PATTERN` | `default_route.pattern` |
//! | `SENTIER_DEFAULT_CONTROLLER` | `default_route.controller` |
//! | `SENTIER_DEFAULT_ACTION` | `default_route.action` |
//! | `SENTIER_PAGE_PARAM` | `pagination.page_param` |
//! | `SENTIER_PAGE_SIZE` | `pagination.page_size` |
//!
//! Overriding a primary route field enables the primary route.

use crate::settings::{DefaultRouteSettings, RouterSettings};
use sentier_core::exception::{Error, Result};
use std::collections::BTreeMap;

/// Prefix of every recognised variable
pub const ENV_PREFIX: &str = "SENTIER_";

/// Parse a boolean the way environment variables usually spell it
///
/// # Examples
///
/// ```
/// use sentier_conf::parse_bool;
///
/// assert_eq!(parse_bool("yes"), Ok(true));
/// assert_eq!(parse_bool("OFF"), Ok(false));
/// assert!(parse_bool("maybe").is_err());
/// ```
pub fn parse_bool(value: &str) -> std::result::Result<bool, String> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		other => Err(format!("'{}' is not a boolean", other)),
	}
}

/// `SENTIER_*` variables captured from a process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
	vars: BTreeMap<String, String>,
}

impl EnvOverrides {
	/// Capture the `SENTIER_*` variables of the current process
	pub fn from_env() -> Self {
		Self::from_vars(std::env::vars())
	}

	/// Capture from explicit pairs; keys without the prefix are ignored
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let vars = vars
			.into_iter()
			.filter_map(|(key, value)| {
				let key: String = key.into();
				key.strip_prefix(ENV_PREFIX)
					.map(|name| (name.to_lowercase(), value.into()))
			})
			.collect();
		Self { vars }
	}

	pub fn is_empty(&self) -> bool {
		self.vars.is_empty()
	}

	/// Apply the captured overrides to `settings`
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] when a value cannot be parsed.
	pub fn apply(&self, settings: &mut RouterSettings) -> Result<()> {
		for (name, value) in &self.vars {
			match name.as_str() {
				"base_path" => settings.base_path = value.clone(),
				"separator" => settings.separator = value.clone(),
				"default_route" => {
					let enabled = parse_bool(value).map_err(|e| invalid(name, &e))?;
					if !enabled {
						settings.default_route = None;
					} else if settings.default_route.is_none() {
						settings.default_route = Some(DefaultRouteSettings::default());
					}
				}
				"page_param" => settings.pagination.page_param = value.clone(),
				"page_size" => {
					settings.pagination.page_size =
						value.trim().parse().map_err(|_| invalid(name, value))?;
				}
				_ => {}
			}
		}

		// Field overrides run after the enable switch so they are not lost to it.
		for (name, value) in &self.vars {
			let field = match name.as_str() {
				"default_pattern" | "default_controller" | "default_action" => name.as_str(),
				_ => continue,
			};
			let primary = settings
				.default_route
				.get_or_insert_with(DefaultRouteSettings::default);
			match field {
				"default_pattern" => primary.pattern = value.clone(),
				"default_controller" => primary.controller = value.clone(),
				_ => primary.action = value.clone(),
			}
		}

		if !self.vars.is_empty() {
			tracing::debug!(count = self.vars.len(), "applied environment overrides");
		}
		Ok(())
	}
}

fn invalid(name: &str, detail: &str) -> Error {
	Error::Configuration(format!(
		"invalid value for {}{}: {}",
		ENV_PREFIX,
		name.to_uppercase(),
		detail
	))
}
