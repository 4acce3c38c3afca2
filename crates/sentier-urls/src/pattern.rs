//! Route pattern compilation and matching.
//!
//! Patterns are literal paths with named placeholders:
//!
//! - `<name>` captures one path segment (anything but `/`)
//! - `<name:regex>` captures whatever `regex` matches
//!
//! Trailing placeholders that fill a whole segment may be left out of a path
//! when the route supplies a default for them (see
//! [`RoutePattern::matches_with_defaults`]).
//!
//! ```
//! use sentier_urls::RoutePattern;
//!
//! let pattern = RoutePattern::new("/post/<id:\\d+>/<slug>").unwrap();
//! let params = pattern.matches("/post/10/hello-world").unwrap();
//! assert_eq!(params["id"], "10");
//! assert_eq!(params["slug"], "hello-world");
//! assert!(pattern.matches("/post/ten/hello-world").is_none());
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use regex::{Regex, RegexBuilder};
use sentier_core::exception::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

const DEFAULT_SEGMENT: &str = "[^/]+";

/// Characters escaped in substituted placeholder values.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'/')
	.add(b'<')
	.add(b'>')
	.add(b'?')
	.add(b'`')
	.add(b'{')
	.add(b'}');

#[derive(Debug, Clone)]
enum Segment {
	Literal(String),
	Param {
		name: String,
		expr: String,
		/// Anchored form of the constraint, used to validate reverse values
		constraint: Regex,
	},
}

/// The pattern with one or more trailing placeholders left out.
#[derive(Debug, Clone)]
struct Truncation {
	regex: Regex,
	segments: Vec<Segment>,
	/// Left-out placeholders, the one cut off last at the end
	omitted: Vec<String>,
}

/// A compiled route pattern.
#[derive(Clone)]
pub struct RoutePattern {
	source: String,
	regex: Regex,
	segments: Vec<Segment>,
	/// Shortest omission first
	truncations: Vec<Truncation>,
	param_names: Vec<String>,
	optional_trailing_slash: bool,
}

/// Why a pattern could not be reversed into a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReverseError {
	Missing(String),
	Invalid { param: String, value: String },
}

impl RoutePattern {
	/// Compile `pattern`.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidPattern`] if the pattern is too long, has too
	/// many segments, has an unterminated or unnamed placeholder, repeats a
	/// placeholder name, or carries a constraint that is not a valid regex.
	pub fn new(pattern: &str) -> Result<Self> {
		let invalid = |reason: String| Error::InvalidPattern {
			pattern: pattern.to_string(),
			reason,
		};

		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(invalid(format!(
				"length {} exceeds maximum of {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			)));
		}
		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(invalid(format!(
				"{} path segments exceed maximum of {}",
				segment_count, MAX_PATH_SEGMENTS
			)));
		}

		let segments = parse(pattern).map_err(invalid)?;

		let mut param_names: Vec<String> = Vec::new();
		let mut compiled = Vec::with_capacity(segments.len());
		for (segment, raw) in segments {
			match raw {
				None => compiled.push(Segment::Literal(segment)),
				Some(expr) => {
					if param_names.contains(&segment) {
						return Err(invalid(format!("placeholder '{}' is repeated", segment)));
					}
					let constraint = build_regex(&format!("^(?:{})$", expr))
						.map_err(|e| invalid(format!("placeholder '{}': {}", segment, e)))?;
					param_names.push(segment.clone());
					compiled.push(Segment::Param {
						name: segment,
						expr,
						constraint,
					});
				}
			}
		}

		let regex = build_regex(&regex_source(&compiled)).map_err(|e| invalid(e.to_string()))?;
		let truncations = truncation_points(&compiled)
			.into_iter()
			.map(|(keep, omitted)| -> Result<Truncation> {
				let segments = truncate(&compiled, keep);
				let regex = build_regex(&regex_source(&segments)).map_err(|e| invalid(e.to_string()))?;
				Ok(Truncation {
					regex,
					segments,
					omitted,
				})
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(Self {
			source: pattern.to_string(),
			regex,
			segments: compiled,
			truncations,
			param_names,
			optional_trailing_slash: false,
		})
	}

	/// Also accept paths that differ from the pattern only by a trailing `/`
	pub fn with_optional_trailing_slash(mut self) -> Self {
		self.optional_trailing_slash = true;
		self
	}

	/// Returns the original pattern string.
	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// Placeholder names in order of appearance.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	pub fn has_param(&self, name: &str) -> bool {
		self.param_names.iter().any(|n| n == name)
	}

	/// Match `path`, returning the percent-decoded placeholder values.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		self.match_regex(&self.regex, path)
	}

	/// Like [`matches`](Self::matches), but trailing placeholders for which
	/// `has_default` holds may be missing from `path`.
	///
	/// Left-out placeholders are absent from the result.
	///
	/// # Examples
	///
	/// ```
	/// use sentier_urls::RoutePattern;
	///
	/// let pattern = RoutePattern::new("/<controller>/<action>").unwrap();
	/// let defaults = |name: &str| name == "controller" || name == "action";
	///
	/// assert_eq!(pattern.matches_with_defaults("/post", defaults).unwrap()["controller"], "post");
	/// assert!(pattern.matches_with_defaults("/", defaults).unwrap().is_empty());
	/// assert!(pattern.matches_with_defaults("/", |name: &str| name == "action").is_none());
	/// ```
	pub fn matches_with_defaults<F>(&self, path: &str, has_default: F) -> Option<HashMap<String, String>>
	where
		F: Fn(&str) -> bool,
	{
		if let Some(params) = self.matches(path) {
			return Some(params);
		}
		self.truncations
			.iter()
			.take_while(|truncation| truncation.omitted.iter().all(|name| has_default(name)))
			.find_map(|truncation| self.match_regex(&truncation.regex, path))
	}

	fn match_regex(&self, regex: &Regex, path: &str) -> Option<HashMap<String, String>> {
		if let Some(params) = self.captures(regex, path) {
			return Some(params);
		}
		if !self.optional_trailing_slash {
			return None;
		}
		match path.strip_suffix('/') {
			Some(trimmed) if !trimmed.is_empty() => self.captures(regex, trimmed),
			Some(_) => None,
			None => self.captures(regex, &format!("{}/", path)),
		}
	}

	fn captures(&self, regex: &Regex, path: &str) -> Option<HashMap<String, String>> {
		let caps = regex.captures(path)?;
		Some(
			self.param_names
				.iter()
				.filter_map(|name| {
					caps.name(name).map(|m| {
						let value = percent_decode_str(m.as_str()).decode_utf8_lossy();
						(name.clone(), value.into_owned())
					})
				})
				.collect(),
		)
	}

	/// Substitute placeholder values looked up through `value_of`.
	///
	/// Trailing placeholders whose value equals `default_of` are left out.
	pub(crate) fn reverse<'a, F, D>(&self, value_of: F, default_of: D) -> std::result::Result<String, ReverseError>
	where
		F: Fn(&str) -> Option<&'a str>,
		D: Fn(&str) -> Option<&'a str>,
	{
		let at_default = |name: &str| match (value_of(name), default_of(name)) {
			(Some(value), Some(default)) => value == default,
			_ => false,
		};
		let segments = self
			.truncations
			.iter()
			.take_while(|truncation| truncation.omitted.last().is_some_and(|name| at_default(name.as_str())))
			.last()
			.map_or(self.segments.as_slice(), |truncation| truncation.segments.as_slice());

		let mut path = String::with_capacity(self.source.len());
		for segment in segments {
			match segment {
				Segment::Literal(text) => path.push_str(text),
				Segment::Param { name, constraint, .. } => {
					let value = value_of(name).ok_or_else(|| ReverseError::Missing(name.clone()))?;
					// The constraint applies to what ends up in the path.
					let encoded = utf8_percent_encode(value, SEGMENT_ENCODE_SET).to_string();
					if !constraint.is_match(&encoded) {
						return Err(ReverseError::Invalid {
							param: name.clone(),
							value: value.to_string(),
						});
					}
					path.push_str(&encoded);
				}
			}
		}
		Ok(path)
	}
}

impl fmt::Debug for RoutePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RoutePattern")
			.field("source", &self.source)
			.field("param_names", &self.param_names)
			.field("optional_trailing_slash", &self.optional_trailing_slash)
			.finish()
	}
}

impl fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

fn regex_source(segments: &[Segment]) -> String {
	let mut source = String::from("^");
	for segment in segments {
		match segment {
			Segment::Literal(text) => source.push_str(&regex::escape(text)),
			Segment::Param { name, expr, .. } => source.push_str(&format!("(?P<{}>{})", name, expr)),
		}
	}
	source.push('$');
	source
}

/// Points where trailing whole-segment placeholders can be cut off.
///
/// Yields `(kept segment count, omitted names)`, shortest omission first.
fn truncation_points(segments: &[Segment]) -> Vec<(usize, Vec<String>)> {
	let mut points = Vec::new();
	let mut omitted = Vec::new();
	let mut end = segments.len();
	while end >= 2 {
		let (Segment::Literal(text), Segment::Param { name, .. }) = (&segments[end - 2], &segments[end - 1]) else {
			break;
		};
		if !text.ends_with('/') {
			break;
		}
		omitted.push(name.clone());
		points.push((end - 1, omitted.clone()));
		if text != "/" {
			break;
		}
		end -= 2;
	}
	points
}

/// The first `keep` segments without the `/` that led into the cut-off part.
fn truncate(segments: &[Segment], keep: usize) -> Vec<Segment> {
	let mut kept = segments[..keep].to_vec();
	if let Some(Segment::Literal(text)) = kept.last_mut() {
		text.pop();
		if text.is_empty() {
			kept.pop();
		}
	}
	if kept.is_empty() {
		kept.push(Segment::Literal("/".to_string()));
	}
	kept
}

fn build_regex(source: &str) -> std::result::Result<Regex, regex::Error> {
	RegexBuilder::new(source).size_limit(MAX_REGEX_SIZE).build()
}

/// Split a pattern into `(text, None)` literals and `(name, Some(regex))` placeholders.
fn parse(pattern: &str) -> std::result::Result<Vec<(String, Option<String>)>, String> {
	let mut segments = Vec::new();
	let mut literal = String::new();
	let mut chars = pattern.chars();

	while let Some(c) = chars.next() {
		if c != '<' {
			literal.push(c);
			continue;
		}
		if !literal.is_empty() {
			segments.push((std::mem::take(&mut literal), None));
		}

		let mut name = String::new();
		let mut expr: Option<String> = None;
		let mut depth = 0usize;
		let mut escaped = false;
		let mut closed = false;
		for c in chars.by_ref() {
			match expr.as_mut() {
				None => match c {
					'>' => {
						closed = true;
						break;
					}
					':' => expr = Some(String::new()),
					_ => name.push(c),
				},
				Some(expr) => {
					if escaped {
						escaped = false;
					} else if c == '\\' {
						escaped = true;
					} else if c == '(' || c == '[' {
						depth += 1;
					} else if (c == ')' || c == ']') && depth > 0 {
						depth -= 1;
					} else if c == '>' && depth == 0 {
						closed = true;
						break;
					}
					expr.push(c);
				}
			}
		}

		if !closed {
			return Err(format!("unterminated placeholder '<{}'", name));
		}
		if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
			return Err(format!("invalid placeholder name '{}'", name));
		}
		if name.starts_with(|c: char| c.is_ascii_digit()) {
			return Err(format!("placeholder name '{}' starts with a digit", name));
		}
		let expr = match expr {
			Some(expr) if !expr.is_empty() => expr,
			_ => DEFAULT_SEGMENT.to_string(),
		};
		segments.push((name, Some(expr)));
	}

	if !literal.is_empty() {
		segments.push((literal, None));
	}
	Ok(segments)
}
