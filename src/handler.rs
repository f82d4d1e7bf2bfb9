//! Handler trait and type erasure.
//!
//! # Two handler shapes
//!
//! ```text
//! async fn health(req: Request) -> impl IntoResponse            ← plain
//! async fn create(req: Request, log: LogFields) -> Result<T, E>  ← logged
//! ```
//!
//! A *plain* handler builds its own [`Response`](crate::Response). A
//! *logged* handler returns a serializable value or an error: the value is
//! written as JSON, the error is written as a problem body and its message
//! lands in the request's `error` log field. `log` is the same
//! [`LogFields`] the access log reads, so anything the handler adds shows up
//! in that request's record.
//!
//! # How handlers are stored
//!
//! The router keeps handlers of different types in one map, so each is
//! erased to `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! router.post("/items", create)
//!        ↓
//! create.into_boxed_handler()          ← Handler<(Request, LogFields)> impl
//!        ↓
//! Arc::new(LoggedHandler(create))      ← stored as BoxedHandler
//!        ↓
//! handler.call(req, writer)            ← one vtable dispatch per request
//! ```
//!
//! The `Args` parameter on [`Handler`] only tells the two blanket impls
//! apart; callers never name it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use crate::fields::LogFields;
use crate::problem;
use crate::request::Request;
use crate::response::IntoResponse;
use crate::writer::ResponseWriter;

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future borrowing for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The error type logged handlers may return anything convertible into.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Internal dispatch interface shared by handlers and composed chains.
///
/// `#[doc(hidden)] pub` because it appears in the return type of
/// [`Handler::into_boxed_handler`].
#[doc(hidden)]
pub trait ErasedHandler: Send + Sync {
    fn call<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()>;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Never implemented by hand: the blanket impls cover any `async fn` of
/// either shape described in the [module docs](self). Sealed so the set of
/// shapes stays under this crate's control.
pub trait Handler<Args>: private::Sealed<Args> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed<Args> {}
}

// ── Plain handlers ────────────────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed<(Request,)> for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler<(Request,)> for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        let fut = (self.0)(req);
        Box::pin(async move {
            if let Err(e) = fut.await.into_response().write_to(w) {
                error!("cannot write response: {e}");
            }
        })
    }
}

// ── Logged handlers ───────────────────────────────────────────────────────────

impl<F, Fut, T, E> private::Sealed<(Request, LogFields)> for F
where
    F: Fn(Request, LogFields) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
}

impl<F, Fut, T, E> Handler<(Request, LogFields)> for F
where
    F: Fn(Request, LogFields) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(LoggedHandler(self))
    }
}

struct LoggedHandler<F>(F);

impl<F, Fut, T, E> ErasedHandler for LoggedHandler<F>
where
    F: Fn(Request, LogFields) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn call<'a>(&'a self, req: Request, w: &'a mut dyn ResponseWriter) -> BoxFuture<'a, ()> {
        let fields = req.fields().clone();
        let instance = req.path().to_owned();
        let fut = (self.0)(req, fields.clone());
        Box::pin(async move {
            let result: Result<T, BoxError> = fut.await.map_err(Into::into);
            if let Err(e) = &result {
                fields.set("error", e.to_string());
            }
            problem::respond(w, &instance, result);
        })
    }
}
