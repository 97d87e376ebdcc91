//! # Server Module
//!
//! HTTP transport for a [`Dispatcher`](crate::dispatcher::Dispatcher), built
//! on `may_minihttp` coroutines.
//!
//! The transport only translates: it merges query-string and body
//! parameters into raw strings ([`parse_params`]), calls
//! `Dispatcher::handle`, and writes the status, content type and body back.
//! Routing, binding and validation all happen in the dispatcher.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use strictapi::dispatcher::Dispatcher;
//! use strictapi::schema::ApiSchemaBuilder;
//! use strictapi::server::{ApiService, HttpServer};
//!
//! # fn main() -> anyhow::Result<()> {
//! let dispatcher = Dispatcher::new(Arc::new(ApiSchemaBuilder::new().build()))?;
//! let handle = HttpServer(ApiService::new(Arc::new(dispatcher))).start("127.0.0.1:8080")?;
//! handle.wait_ready()?;
//! handle.stop();
//! # Ok(())
//! # }
//! ```

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_params, parse_query_params, parse_request};
pub use response::write_api_response;
pub use service::ApiService;
