//! Settings structures

use crate::env::EnvOverrides;
use sentier_core::exception::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings a router is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Prefix every pattern of the router is relative to
	pub base_path: String,
	/// Separator of `controller::action` route names
	pub separator: String,
	/// Primary route synthesized at construction; `None` disables it
	pub default_route: Option<DefaultRouteSettings>,
	pub pagination: PaginationSettings,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			base_path: "/".to_string(),
			separator: "::".to_string(),
			default_route: None,
			pagination: PaginationSettings::default(),
		}
	}
}

/// Settings of the primary (`default`) route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultRouteSettings {
	pub pattern: String,
	pub controller: String,
	pub action: String,
}

impl Default for DefaultRouteSettings {
	fn default() -> Self {
		Self {
			pattern: "/<controller>/<action>".to_string(),
			controller: "index".to_string(),
			action: "index".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
	/// Query parameter carrying the page number
	pub page_param: String,
	/// Items per page
	pub page_size: u64,
}

impl Default for PaginationSettings {
	fn default() -> Self {
		Self {
			page_param: "page".to_string(),
			page_size: 10,
		}
	}
}

impl RouterSettings {
	/// Defaults plus a primary route with default settings
	pub fn with_default_route() -> Self {
		Self {
			default_route: Some(DefaultRouteSettings::default()),
			..Self::default()
		}
	}

	/// Parse settings from TOML text
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] if the text is not valid TOML, does
	/// not match the settings layout, or fails [`validate`](Self::validate).
	pub fn from_toml_str(source: &str) -> Result<Self> {
		let settings: Self = toml::from_str(source)
			.map_err(|e| Error::Configuration(format!("invalid router settings: {}", e)))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Load settings from a TOML file
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] if the file cannot be read or parsed.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let source = fs::read_to_string(path).map_err(|e| {
			Error::Configuration(format!("cannot read '{}': {}", path.display(), e))
		})?;
		tracing::debug!(path = %path.display(), "loading router settings");
		Self::from_toml_str(&source)
	}

	/// Load settings from a TOML file, then apply `SENTIER_*` variables
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] on read, parse or override failures.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let mut settings = Self::from_file(path)?;
		EnvOverrides::from_env().apply(&mut settings)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Check cross-field consistency
	///
	/// # Errors
	///
	/// Returns [`Error::Configuration`] naming the first offending field.
	pub fn validate(&self) -> Result<()> {
		if !self.base_path.starts_with('/') {
			return Err(Error::Configuration(format!(
				"base_path must start with '/', got '{}'",
				self.base_path
			)));
		}
		if self.separator.is_empty() {
			return Err(Error::Configuration("separator must not be empty".to_string()));
		}
		if self.separator == "/" {
			return Err(Error::Configuration(
				"separator '/' is reserved for path shorthands".to_string(),
			));
		}
		if let Some(primary) = &self.default_route {
			primary.validate()?;
		}
		self.pagination.validate()
	}
}

impl DefaultRouteSettings {
	fn validate(&self) -> Result<()> {
		if self.controller.is_empty() || self.action.is_empty() {
			return Err(Error::Configuration(
				"default_route controller and action must not be empty".to_string(),
			));
		}
		Ok(())
	}
}

impl PaginationSettings {
	fn validate(&self) -> Result<()> {
		if self.page_param.is_empty() {
			return Err(Error::Configuration("page_param must not be empty".to_string()));
		}
		if self.page_size == 0 {
			return Err(Error::Configuration("page_size must be positive".to_string()));
		}
		Ok(())
	}
}
