//! Application container

use crate::controller::Controller;
use crate::scope::SingletonScope;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry that route targets are resolved through.
///
/// Controllers are registered under an id such as `post` or, for namespaced
/// controllers, `admin/post`. The container is shared (`Arc<Container>`)
/// between every router of an application.
#[derive(Default)]
pub struct Container {
	controllers: RwLock<HashMap<String, Arc<dyn Controller>>>,
	singletons: SingletonScope,
}

impl Container {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a controller under `id`; a later registration replaces it
	pub fn register_controller<C: Controller + 'static>(&self, id: impl Into<String>, controller: C) {
		self.register_controller_arc(id, Arc::new(controller));
	}

	pub fn register_controller_arc(&self, id: impl Into<String>, controller: Arc<dyn Controller>) {
		let id = id.into();
		let replaced = self.controllers.write().insert(id.clone(), controller).is_some();
		if replaced {
			tracing::debug!(controller = %id, "controller registration replaced");
		}
	}

	/// Look up a controller by id
	pub fn controller(&self, id: &str) -> Option<Arc<dyn Controller>> {
		self.controllers.read().get(id).cloned()
	}

	pub fn has_controller(&self, id: &str) -> bool {
		self.controllers.read().contains_key(id)
	}

	/// Registered controller ids, sorted
	pub fn controller_ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.controllers.read().keys().cloned().collect();
		ids.sort_unstable();
		ids
	}

	/// Store an application-wide service
	///
	/// # Examples
	///
	/// ```
	/// use sentier_di::Container;
	///
	/// struct SiteName(&'static str);
	///
	/// let container = Container::new();
	/// container.set_singleton(SiteName("blog"));
	/// assert_eq!(container.singleton::<SiteName>().unwrap().0, "blog");
	/// ```
	pub fn set_singleton<T: Any + Send + Sync>(&self, value: T) {
		self.singletons.set(value);
	}

	pub fn singleton<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.singletons.get::<T>()
	}

	pub fn singletons(&self) -> &SingletonScope {
		&self.singletons
	}
}

impl fmt::Debug for Container {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Container")
			.field("controllers", &self.controller_ids())
			.finish_non_exhaustive()
	}
}
