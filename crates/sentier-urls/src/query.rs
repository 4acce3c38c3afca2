//! Query string helpers for generated URLs.

use crate::route::RouteParams;
use sentier_core::exception::{Error, Result};

/// Form-encode `pairs` sorted by key.
///
/// # Examples
///
/// ```
/// use sentier_urls::query::encode_query;
///
/// let query = encode_query([("page", "2"), ("q", "rust lang")]).unwrap();
/// assert_eq!(query, "page=2&q=rust+lang");
/// ```
pub fn encode_query<I, K, V>(pairs: I) -> Result<String>
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: AsRef<str>,
{
	let mut pairs: Vec<(K, V)> = pairs.into_iter().collect();
	pairs.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));
	let pairs: Vec<(&str, &str)> = pairs
		.iter()
		.map(|(k, v)| (k.as_ref(), v.as_ref()))
		.collect();
	serde_urlencoded::to_string(pairs)
		.map_err(|e| Error::Internal(format!("cannot encode query string: {}", e)))
}

/// Append an already encoded `query` to `url`.
pub fn append_query(url: &str, query: &str) -> String {
	if query.is_empty() {
		return url.to_string();
	}
	let separator = if url.contains('?') { '&' } else { '?' };
	format!("{}{}{}", url, separator, query)
}

/// Merge `explicit` parameters into `stored` query data.
///
/// Keys only in `explicit` are always added; keys present in both keep the
/// stored value unless `override_stored` is set.
///
/// # Examples
///
/// ```
/// use sentier_urls::query::merge_params;
/// use std::collections::HashMap;
///
/// let stored = HashMap::from([("sort".to_string(), "date".to_string())]);
/// let explicit = HashMap::from([
///     ("sort".to_string(), "title".to_string()),
///     ("page".to_string(), "3".to_string()),
/// ]);
///
/// let kept = merge_params(&stored, &explicit, false);
/// assert_eq!(kept["sort"], "date");
/// assert_eq!(kept["page"], "3");
///
/// let replaced = merge_params(&stored, &explicit, true);
/// assert_eq!(replaced["sort"], "title");
/// ```
pub fn merge_params(stored: &RouteParams, explicit: &RouteParams, override_stored: bool) -> RouteParams {
	let mut merged = stored.clone();
	for (key, value) in explicit {
		if override_stored || !merged.contains_key(key) {
			merged.insert(key.clone(), value.clone());
		}
	}
	merged
}
