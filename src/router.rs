//! Radix-tree request router.
//!
//! One tree per HTTP method. Each registered route stores its handler already
//! wrapped in the middleware that existed when it was registered, so a
//! dispatch is one lookup and one call.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::config::Config;
use crate::handler::{BoxedHandler, Handler};
use crate::log::Logger;
use crate::middleware::{AccessLog, Chain, Middleware};
use crate::request::Request;
use crate::response::Response;
use crate::writer::BufferedWriter;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Every router starts with the access-log middleware registered, so it is
/// always the outermost layer.
///
/// ```rust,no_run
/// # use logroute::{LogFields, Request, Response, Router};
/// # async fn get_item(_: Request, _: LogFields) -> Result<u32, logroute::StatusError> { Ok(1) }
/// # async fn create_item(_: Request, _: LogFields) -> Result<u32, logroute::StatusError> { Ok(1) }
/// # async fn health(_: Request) -> Response { Response::text("ok") }
/// Router::new()
///     .get("/health", health)
///     .get("/items/{id}", get_item)
///     .post("/items", create_item);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    logger: Arc<Logger>,
    config: Config,
}

impl Router {
    /// A router configured from the environment, logging to daily files.
    pub fn new() -> Self {
        Self::with_config(Config::from_env())
    }

    pub fn with_config(config: Config) -> Self {
        let logger = Arc::new(Logger::daily(config.log_dir.clone()));
        Self::with_logger(config, logger)
    }

    /// A router writing its access records to `logger`.
    pub fn with_logger(config: Config, logger: Arc<Logger>) -> Self {
        let access = AccessLog::new(Arc::clone(&logger)).capture_limit(config.capture_limit);
        Self {
            routes: HashMap::new(),
            middlewares: vec![Arc::new(access)],
            logger,
            config,
        }
    }

    /// Appends a middleware. It wraps routes registered after this call only.
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Registers a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`.
    pub fn on<A>(mut self, method: Method, path: &str, handler: impl Handler<A>) -> Self {
        let chain: BoxedHandler =
            Arc::new(Chain::new(&self.middlewares, handler.into_boxed_handler()));
        self.routes
            .entry(method)
            .or_default()
            .insert(path, chain)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get<A>(self, path: &str, handler: impl Handler<A>) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post<A>(self, path: &str, handler: impl Handler<A>) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put<A>(self, path: &str, handler: impl Handler<A>) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch<A>(self, path: &str, handler: impl Handler<A>) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete<A>(self, path: &str, handler: impl Handler<A>) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Moves log output to `dir` from the next record on. Safe to call while
    /// requests are in flight.
    ///
    /// [`config`](Router::config) keeps the directory the router was built
    /// with; [`log_dir`](Router::log_dir) reports the current one.
    pub fn set_log_dir(&self, dir: impl AsRef<Path>) {
        self.logger.set_log_dir(dir.as_ref());
    }

    /// Where access records are written now, if the logger writes files.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logger.log_dir()
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// The configuration the router was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Routes one request through its chain. Unmatched requests get a bare
    /// 404 and produce no log record.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let Some((handler, params)) = self.lookup(req.method(), req.path()) else {
            return Response::status(StatusCode::NOT_FOUND);
        };
        req.params = params;
        req.body_limit = self.config.max_body_size;

        let mut w = BufferedWriter::new();
        handler.call(req, &mut w).await;
        w.into_response()
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::ConsoleSink;
    use http::{HeaderMap, Uri};

    fn router() -> Router {
        Router::with_logger(Config::default(), Arc::new(Logger::new(ConsoleSink)))
    }

    fn req(method: Method, uri: &'static str) -> Request {
        Request::new(method, Uri::from_static(uri), HeaderMap::new(), "")
    }

    async fn echo_id(req: Request) -> String {
        req.param("id").unwrap_or_default().to_owned()
    }

    #[tokio::test]
    async fn matches_method_and_path_with_params() {
        let app = router().get("/items/{id}", echo_id);

        let res = app.dispatch(req(Method::GET, "/items/42")).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"42");
    }

    #[tokio::test]
    async fn unmatched_is_404() {
        let app = router().get("/items/{id}", echo_id);

        let wrong_method = app.dispatch(req(Method::POST, "/items/42")).await;
        let wrong_path = app.dispatch(req(Method::GET, "/nope")).await;
        assert_eq!(wrong_method.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(wrong_path.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dispatch_attaches_the_body_limit() {
        async fn limit(req: Request) -> String {
            req.body_limit.to_string()
        }
        let app = Router::with_logger(
            Config::default().max_body_size(5),
            Arc::new(Logger::new(ConsoleSink)),
        )
        .get("/", limit);

        assert_eq!(app.dispatch(req(Method::GET, "/")).await.body(), b"5");
    }

    #[test]
    fn log_dir_follows_set_log_dir() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let app = Router::with_config(Config::default().log_dir(first.path()));
        assert_eq!(app.log_dir().as_deref(), Some(first.path()));

        app.set_log_dir(second.path());
        assert_eq!(app.log_dir().as_deref(), Some(second.path()));
        assert_eq!(app.config().log_dir, first.path());
    }

    #[test]
    fn console_logger_has_no_log_dir() {
        assert!(router().log_dir().is_none());
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        router().get("/items/{id}", echo_id).get("/items/{id}", echo_id);
    }
}
