//! # logroute
//!
//! HTTP middleware for JSON services: one structured log record per request,
//! and RPC-style status codes turned into uniform JSON error bodies.
//!
//! ## What a request goes through
//!
//! - Routing: one radix tree per method via [`matchit`]
//! - Access log: outermost middleware, captures the response on the side and
//!   writes `http/request` + `http/response` + whatever the handler added
//! - Handlers: return `Result<T, E>`; `T` becomes `application/json`, an
//!   error carrying a [`Status`] becomes `application/problem+json` with the
//!   matching HTTP status
//! - Log files: `<log_dir>/DD-MM-YYYY.log`, one JSON object per line,
//!   mirrored to the console through `tracing`
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use logroute::{Code, Config, LogFields, Request, Router, Server, Status, StatusError};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize)]
//! struct NewItem { name: String }
//!
//! #[derive(Serialize)]
//! struct Item { id: u64, name: String }
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::with_config(Config::from_env())
//!         .post("/items", create_item);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn create_item(req: Request, log: LogFields) -> Result<Item, StatusError> {
//!     let new: NewItem = req
//!         .json()
//!         .map_err(|e| Status::error(Code::InvalidArgument, e.to_string()))?;
//!     if new.name.is_empty() {
//!         return Err(Status::error(Code::InvalidArgument, "name required"));
//!     }
//!     log.set("item_name", new.name.clone());
//!     Ok(Item { id: 1, name: new.name })
//! }
//! ```

mod capture;
mod code;
mod config;
mod error;
mod fields;
mod handler;
mod json;
mod problem;
mod request;
mod response;
mod router;
mod server;
mod sniff;
mod status;
mod writer;

pub mod log;
pub mod middleware;

pub use capture::{CaptureWriter, DEFAULT_CAPTURE_LIMIT};
pub use code::Code;
pub use config::Config;
pub use error::Error;
pub use fields::{Fields, LogFields};
pub use handler::{BoxError, BoxFuture, Handler};
pub use json::{DEFAULT_MAX_BODY_SIZE, is_json, parse_params, read_json, read_query};
pub use problem::{ProblemJson, respond, write_json};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use sniff::{is_loggable, sniff};
pub use status::{Status, StatusError};
pub use writer::{BufferedWriter, ResponseWriter};
