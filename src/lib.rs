//! # strictapi
//!
//! **strictapi** is a schema-first engine for JSON APIs: every route declares
//! its typed parameters and the exact shape of the object it returns, and
//! nothing leaves a handler until it matches that declaration.
//!
//! ## Overview
//!
//! An API is described once at startup, either through builder calls or a
//! YAML/JSON document. Each route names its parameters (`string`, `integer`,
//! `float`, `boolean`, optionally required), a response object made of typed
//! fields and nested objects, and a handler that fills the object in. The
//! engine coerces incoming parameters, hands the handler a fresh response
//! object, checks that every required field was set, and serializes it.
//!
//! ## Architecture
//!
//! - **[`field`]** - the four field types and their coercion strategies
//! - **[`schema`]** - immutable route and object definitions, the builder and
//!   the document loader
//! - **[`object`]** - per-request response object graphs
//! - **[`route`]** - parameter binding and the per-route execution pipeline
//! - **[`dispatcher`]** - path lookup, documentation and not-found responses
//! - **[`docs`]** - JSON and Markdown documentation engines
//! - **[`server`]** - HTTP transport on `may_minihttp`
//! - **[`config`]**, **[`logging`]** - service configuration and tracing setup
//! - **[`cli`]** - the `strictapi` command-line tool
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as ApiService<br/>(may_minihttp)
//!     participant Dispatcher
//!     participant Pipeline as RoutePipeline
//!     participant Handler
//!
//!     Client->>Server: POST /create_widget<br/>name=w
//!     Server->>Server: Merge query + body<br/>into raw params
//!     Server->>Dispatcher: handle(ApiRequest)
//!
//!     alt Documentation path and enable_spec
//!         Dispatcher-->>Client: 200 generated docs
//!     end
//!     alt Unknown path
//!         Dispatcher-->>Client: 404 {"message": "Route not found!"}
//!     end
//!
//!     Dispatcher->>Pipeline: execute(request)
//!     Pipeline->>Pipeline: Coerce declared params
//!     alt Missing or mistyped parameter
//!         Pipeline-->>Client: 400 {"message": ...}
//!     end
//!
//!     Pipeline->>Handler: handle(params, &mut response)
//!     alt Handler sets a mistyped value
//!         Pipeline-->>Client: 400 {"message": ...}
//!     end
//!     alt Handler errors or panics
//!         Pipeline-->>Client: 500 {"message": ...}
//!     end
//!
//!     Pipeline->>Pipeline: Validate required fields
//!     alt Required field unset
//!         Pipeline-->>Client: 500 {"message": ...}
//!     end
//!     Pipeline-->>Client: 200 serialized object
//! ```
//!
//! ### Key Architectural Patterns
//!
//! 1. **Immutable shared schema**: the [`schema::ApiSchema`] is built once and
//!    shared behind an `Arc`; request handling never mutates it
//! 2. **Per-request runtime state**: response objects and bound parameters
//!    borrow the schema and are dropped with the request
//! 3. **Fail fast**: the dispatcher instantiates every route when it starts,
//!    so a missing handler or a broken object reference stops the service
//!    before it serves anything
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use http::{Method, StatusCode};
//! use strictapi::dispatcher::{ApiRequest, Dispatcher};
//! use strictapi::field::FieldType;
//! use strictapi::schema::{ApiSchemaBuilder, FieldOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut api = ApiSchemaBuilder::new();
//! api.define_object("widget", |obj| {
//!     obj.field("name", FieldOptions::new(FieldType::String).required())?
//!         .field("id", FieldOptions::new(FieldType::Integer).required())?;
//!     Ok(())
//! })?
//! .define_route("/create_widget", |route| {
//!     route
//!         .parameter("name", FieldOptions::new(FieldType::String).required())?
//!         .response_object(|r| {
//!             r.object("widget", "widget")?;
//!             Ok(())
//!         })?
//!         .respond(|params, response| {
//!             let widget = response.object_mut("widget")?;
//!             widget.set("name", params.string("name").unwrap_or_default())?;
//!             widget.set("id", 1)?;
//!             Ok(())
//!         });
//!     Ok(())
//! })?;
//!
//! let dispatcher = Dispatcher::new(Arc::new(api.build()))?;
//! let params = [("name".to_string(), "w".to_string())].into_iter().collect();
//! let response = dispatcher.handle(&ApiRequest::new(Method::POST, "/create_widget", params));
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(response.json_body()?["widget"]["name"], "w");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod docs;
pub mod error;
pub mod field;
pub mod ids;
pub mod logging;
pub mod object;
pub mod route;
pub mod schema;
pub mod server;

pub use dispatcher::{ApiRequest, ApiResponse, Dispatcher};
pub use error::{BindError, ConfigurationError, Error, FieldTypeError, ResponseError};
pub use field::{FieldType, FieldValue};
pub use object::ResponseObject;
pub use route::{Parameters, RouteHandler};
pub use schema::{load_schema, ApiSchema, ApiSchemaBuilder, FieldOptions, HandlerRegistry};
