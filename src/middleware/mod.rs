//! Middleware layer.
//!
//! Middleware wraps the rest of a route's chain and is the place for
//! cross-cutting concerns. The router always installs [`AccessLog`] first;
//! anything added with [`Router::middleware`](crate::Router::middleware)
//! runs inside it.
//!
//! # Ordering
//!
//! Registration order is nesting order. For `.middleware(a).middleware(b)`
//! a request passes through access log → `a` → `b` → handler, and the
//! response unwinds the other way. A route captures the middleware that was
//! registered *before* it; later registrations do not reach back.
//!
//! # Writing one
//!
//! ```rust
//! use logroute::middleware::{Middleware, Next};
//! use logroute::{BoxFuture, Request, ResponseWriter};
//!
//! struct ServerHeader;
//!
//! impl Middleware for ServerHeader {
//!     fn handle<'a>(
//!         &'a self,
//!         req: Request,
//!         w: &'a mut dyn ResponseWriter,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, ()> {
//!         Box::pin(async move {
//!             w.headers_mut().insert("server", "logroute".parse().unwrap());
//!             next.run(req, w).await;
//!         })
//!     }
//! }
//! ```

mod logging;

use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::request::Request;
use crate::writer::ResponseWriter;

pub use logging::AccessLog;

/// A request interceptor.
pub trait Middleware: Send + Sync + 'static {
    fn handle<'a>(
        &'a self,
        req: Request,
        w: &'a mut dyn ResponseWriter,
        next: Next<'a>,
    ) -> BoxFuture<'a, ()>;
}

/// The remainder of the chain after the current middleware.
pub struct Next<'a> {
    middlewares: &'a [Arc<dyn Middleware>],
    endpoint: &'a dyn ErasedHandler,
}

impl<'a> Next<'a> {
    /// Runs the next middleware, or the handler once none are left.
    ///
    /// `w` may be a shorter-lived wrapper around the writer this middleware
    /// received.
    pub fn run<'w>(self, req: Request, w: &'w mut dyn ResponseWriter) -> BoxFuture<'w, ()>
    where
        'a: 'w,
    {
        match self.middlewares.split_first() {
            Some((first, rest)) => {
                let next = Next { middlewares: rest, endpoint: self.endpoint };
                first.handle(req, w, next)
            }
            None => self.endpoint.call(req, w),
        }
    }
}

/// A handler with its middleware, composed at registration time.
pub(crate) struct Chain {
    middlewares: Arc<[Arc<dyn Middleware>]>,
    endpoint: BoxedHandler,
}

impl Chain {
    pub(crate) fn new(middlewares: &[Arc<dyn Middleware>], endpoint: BoxedHandler) -> Self {
        Self { middlewares: middlewares.into(), endpoint }
    }
}

impl ErasedHandler for Chain {
    fn call<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        let next = Next { middlewares: &self.middlewares, endpoint: &*self.endpoint };
        next.run(req, w)
    }
}
