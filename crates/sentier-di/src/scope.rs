//! Type-keyed storage for application-wide values

use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

type TypeMap = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

fn lookup<T: Any + Send + Sync>(cache: &RwLock<TypeMap>) -> Option<Arc<T>> {
	cache
		.read()
		.get(&TypeId::of::<T>())
		.and_then(|arc| arc.clone().downcast::<T>().ok())
}

/// Values shared application-wide.
#[derive(Default)]
pub struct SingletonScope {
	cache: RwLock<TypeMap>,
}

impl SingletonScope {
	/// Creates a new SingletonScope with an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Retrieves a singleton value by type.
	///
	/// # Examples
	///
	/// ```
	/// use sentier_di::SingletonScope;
	///
	/// let scope = SingletonScope::new();
	/// scope.set(100u64);
	///
	/// let val1 = scope.get::<u64>().unwrap();
	/// let val2 = scope.get::<u64>().unwrap();
	/// assert_eq!(*val1, *val2);
	/// ```
	pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		lookup(&self.cache)
	}

	pub fn set<T: Any + Send + Sync>(&self, value: T) {
		self.set_arc(Arc::new(value));
	}

	pub fn set_arc<T: Any + Send + Sync>(&self, value: Arc<T>) {
		self.cache.write().insert(TypeId::of::<T>(), value);
	}

	pub fn contains<T: Any + Send + Sync>(&self) -> bool {
		self.cache.read().contains_key(&TypeId::of::<T>())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_singleton_contains() {
		let scope = SingletonScope::new();
		assert!(!scope.contains::<i64>());
		scope.set(5i64);
		assert!(scope.contains::<i64>());
	}
}
