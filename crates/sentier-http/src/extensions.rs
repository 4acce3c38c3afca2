//! Type-keyed storage attached to a [`Request`](crate::Request).
//!
//! Routers use it to hand the active base path, the matched route and the
//! routing context down to handlers without widening every signature.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Type-safe extension storage, one value per type.
#[derive(Default)]
pub struct Extensions {
	map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
	/// Create an empty extension map
	///
	/// # Examples
	///
	/// ```
	/// use sentier_http::Extensions;
	///
	/// let extensions = Extensions::new();
	/// assert!(!extensions.contains::<String>());
	/// ```
	pub fn new() -> Self {
		Self {
			map: HashMap::new(),
		}
	}

	/// Insert a value, returning the previous value of the same type
	///
	/// # Examples
	///
	/// ```
	/// use sentier_http::Extensions;
	///
	/// let mut extensions = Extensions::new();
	/// assert_eq!(extensions.insert(1u32), None);
	/// assert_eq!(extensions.insert(2u32), Some(1));
	/// ```
	pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
		self.map
			.insert(TypeId::of::<T>(), Box::new(value))
			.and_then(|previous| previous.downcast::<T>().ok().map(|boxed| *boxed))
	}

	/// Borrow a value by type
	///
	/// # Examples
	///
	/// ```
	/// use sentier_http::Extensions;
	///
	/// let mut extensions = Extensions::new();
	/// extensions.insert("hello".to_string());
	///
	/// assert_eq!(extensions.get::<String>().map(String::as_str), Some("hello"));
	/// assert!(extensions.get::<u32>().is_none());
	/// ```
	pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.map
			.get(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_ref::<T>())
	}

	/// Mutably borrow a value by type
	pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
		self.map
			.get_mut(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_mut::<T>())
	}

	/// Check if a value of the given type exists
	pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
		self.map.contains_key(&TypeId::of::<T>())
	}

	/// Remove a value and return it
	///
	/// # Examples
	///
	/// ```
	/// use sentier_http::Extensions;
	///
	/// let mut extensions = Extensions::new();
	/// extensions.insert(42u32);
	///
	/// assert_eq!(extensions.remove::<u32>(), Some(42));
	/// assert_eq!(extensions.remove::<u32>(), None);
	/// ```
	pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
		self.map
			.remove(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast::<T>().ok().map(|boxed| *boxed))
	}

	/// Number of stored values
	pub fn len(&self) -> usize {
		self.map.len()
	}

	/// Whether nothing is stored
	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	/// Drop every stored value
	pub fn clear(&mut self) {
		self.map.clear();
	}
}

impl fmt::Debug for Extensions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Extensions")
			.field("len", &self.map.len())
			.finish()
	}
}
