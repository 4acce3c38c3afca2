//! Per-request routing context.
//!
//! A [`RouterContext`] travels with one request through every router it
//! passes. It carries the [`Container`] targets are resolved from and the
//! stack of routers currently dispatching, each with the base path it
//! dispatches under. Routers push themselves with [`RouterContext::enter`];
//! the returned guard pops them again when dropped, whether the dispatch
//! returned, failed, panicked or was cancelled.

use crate::router::Router;
use parking_lot::Mutex;
use sentier_di::Container;
use std::fmt;
use std::sync::Arc;

/// Explicit routing context threaded through a dispatch.
#[derive(Clone)]
pub struct RouterContext {
	inner: Arc<ContextInner>,
}

struct ContextInner {
	container: Arc<Container>,
	frames: Mutex<Vec<Frame>>,
}

struct Frame {
	router: Router,
	base_path: String,
}

impl RouterContext {
	pub fn new(container: Arc<Container>) -> Self {
		Self {
			inner: Arc::new(ContextInner {
				container,
				frames: Mutex::new(Vec::new()),
			}),
		}
	}

	pub fn container(&self) -> &Arc<Container> {
		&self.inner.container
	}

	/// The innermost router currently dispatching, if any.
	pub fn current_router(&self) -> Option<Router> {
		self.inner.frames.lock().last().map(|frame| frame.router.clone())
	}

	/// Base path the innermost router dispatches under.
	pub fn base_path(&self) -> Option<String> {
		self.inner.frames.lock().last().map(|frame| frame.base_path.clone())
	}

	/// Base path of the innermost binding of `router`, if it is dispatching.
	pub fn base_path_of(&self, router: &Router) -> Option<String> {
		self.inner
			.frames
			.lock()
			.iter()
			.rev()
			.find(|frame| frame.router.ptr_eq(router))
			.map(|frame| frame.base_path.clone())
	}

	/// Number of routers currently dispatching.
	pub fn depth(&self) -> usize {
		self.inner.frames.lock().len()
	}

	/// Bind `router`, dispatching under `base_path`, until the guard is dropped.
	pub fn enter(&self, router: Router, base_path: impl Into<String>) -> RouterGuard {
		let mut frames = self.inner.frames.lock();
		let depth = frames.len();
		frames.push(Frame {
			router,
			base_path: base_path.into(),
		});
		RouterGuard {
			context: self.clone(),
			depth,
		}
	}

	/// Whether both handles refer to the same context
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for RouterContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterContext")
			.field("container", &self.inner.container)
			.field("depth", &self.depth())
			.finish()
	}
}

/// Restores the router stack of a [`RouterContext`] when dropped.
#[must_use = "the router is unbound as soon as the guard is dropped"]
pub struct RouterGuard {
	context: RouterContext,
	depth: usize,
}

impl Drop for RouterGuard {
	fn drop(&mut self) {
		// Truncating rather than popping also unwinds guards leaked by inner dispatches.
		self.context.inner.frames.lock().truncate(self.depth);
	}
}
