//! A small item service with an access log.
//!
//! Run with:
//!   RUST_LOG=info LOGROUTE_LOG_DIR=./logs cargo run --example basic
//!
//! Try:
//!   curl -X POST http://localhost:3000/items \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"lamp"}'
//!   curl http://localhost:3000/items/1
//!   curl 'http://localhost:3000/items?limit=5'
//!   curl http://localhost:3000/items/nope
//!   curl http://localhost:3000/healthz
//!
//! Each request prints one JSON line to the console and appends it to
//! `./logs/DD-MM-YYYY.log`.

use logroute::{Code, Config, LogFields, Request, Router, Server, Status, StatusError};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct NewItem {
    name: String,
}

#[derive(Deserialize)]
struct ItemPath {
    id: String,
}

#[derive(Deserialize)]
struct Page {
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    20
}

#[derive(Serialize)]
struct Item {
    id: u64,
    name: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Router::with_config(Config::from_env())
        .get("/healthz", |_req: Request| async { "ok" })
        .get("/items", list_items)
        .get("/items/{id}", get_item)
        .post("/items", create_item);

    if let Err(e) = Server::bind("0.0.0.0:3000").serve(app).await {
        tracing::error!("server error: {e}");
    }
}

// GET /items?limit=5
async fn list_items(req: Request, log: LogFields) -> Result<Vec<Item>, StatusError> {
    let page: Page = req
        .query()
        .map_err(|e| Status::error(Code::InvalidArgument, e.to_string()))?;
    log.set("limit", page.limit);
    Ok((1..=u64::from(page.limit.min(3)))
        .map(|id| Item { id, name: format!("item-{id}") })
        .collect())
}

// GET /items/{id} → 404 problem for anything but a number
async fn get_item(req: Request, log: LogFields) -> Result<Item, StatusError> {
    let path: ItemPath = req
        .params_as()
        .map_err(|e| Status::error(Code::Internal, e.to_string()))?;
    let id: u64 = path
        .id
        .parse()
        .map_err(|_| Status::errorf(Code::NotFound, format_args!("no item {}", path.id)))?;
    log.set("item_id", id);
    Ok(Item { id, name: "lamp".to_owned() })
}

// POST /items
async fn create_item(req: Request, log: LogFields) -> Result<Item, StatusError> {
    let new: NewItem = req
        .json()
        .map_err(|e| Status::error(Code::InvalidArgument, e.to_string()))?;
    if new.name.is_empty() {
        return Err(Status::error(Code::InvalidArgument, "name required"));
    }
    log.set("item_name", new.name.clone());
    Ok(Item { id: 1, name: new.name })
}
