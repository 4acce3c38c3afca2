//! Rendered page links

use serde::Serialize;

/// One entry of a rendered page list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageLink {
	Page {
		number: u64,
		url: String,
		current: bool,
	},
	/// Pages left out between two links
	Gap,
}

impl PageLink {
	/// Page number, `None` for gaps
	pub fn number(&self) -> Option<u64> {
		match self {
			Self::Page { number, .. } => Some(*number),
			Self::Gap => None,
		}
	}

	pub fn url(&self) -> Option<&str> {
		match self {
			Self::Page { url, .. } => Some(url),
			Self::Gap => None,
		}
	}

	pub fn is_current(&self) -> bool {
		matches!(self, Self::Page { current: true, .. })
	}
}
