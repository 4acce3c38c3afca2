//! # Sentier HTTP
//!
//! Request and response types plus the two traits every Sentier component
//! is built from:
//!
//! - [`Handler`]: turns a [`Request`] into a [`Response`]
//! - [`Middleware`]: wraps the next handler in the chain
//!
//! ```rust
//! use sentier_http::{Handler, Request, Response};
//! use async_trait::async_trait;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request) -> sentier_core::Result<Response> {
//!         Ok(Response::ok().with_body("Hello!"))
//!     }
//! }
//! ```

pub mod extensions;
pub mod middleware;
pub mod request;
pub mod response;

pub use extensions::Extensions;
pub use middleware::{FunctionHandler, Handler, Middleware, MiddlewareChain, handler_fn};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use sentier_core::{Error, Result};
