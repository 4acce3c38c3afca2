//! Base path handling

/// Normalize a base path: leading `/`, no trailing `/` (the root becomes `""`).
pub fn normalize_base(base_path: &str) -> &str {
	base_path.trim_end_matches('/')
}

/// The part of `path` below `base_path`, or `None` when `path` lies outside it.
///
/// Prefixes are compared segment-wise, so `/blogroll` is not below `/blog`.
///
/// # Examples
///
/// ```
/// use sentier_urls::path::relative_path;
///
/// assert_eq!(relative_path("/blog/post/5", "/blog"), Some("/post/5"));
/// assert_eq!(relative_path("/blog", "/blog/"), Some("/"));
/// assert_eq!(relative_path("/blogroll", "/blog"), None);
/// assert_eq!(relative_path("/post/5", "/"), Some("/post/5"));
/// ```
pub fn relative_path<'a>(path: &'a str, base_path: &str) -> Option<&'a str> {
	let base = normalize_base(base_path);
	if base.is_empty() {
		return Some(path);
	}
	let rest = path.strip_prefix(base)?;
	if rest.is_empty() {
		Some("/")
	} else if rest.starts_with('/') {
		Some(rest)
	} else {
		None
	}
}

/// Prefix a generated `path` with `base_path`.
///
/// # Examples
///
/// ```
/// use sentier_urls::path::join_base;
///
/// assert_eq!(join_base("/", "/post/5"), "/post/5");
/// assert_eq!(join_base("/blog/", "/post/5"), "/blog/post/5");
/// assert_eq!(join_base("/blog", "post/5"), "/blog/post/5");
/// ```
pub fn join_base(base_path: &str, path: &str) -> String {
	let base = normalize_base(base_path);
	if path.starts_with('/') {
		format!("{}{}", base, path)
	} else {
		format!("{}/{}", base, path)
	}
}
