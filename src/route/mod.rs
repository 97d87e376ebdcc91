//! # Route Module
//!
//! The per-request execution path of a single route.
//!
//! ## Request Flow
//!
//! 1. Raw string parameters are bound against the route's declarations
//!    ([`bind`]): each value is coerced to its declared type, undeclared keys
//!    are dropped, missing required parameters are reported
//! 2. A fresh [`ResponseObject`](crate::object::ResponseObject) is built for
//!    the route's response shape
//! 3. The [`RouteHandler`] fills it in
//! 4. The object is validated and serialized to JSON
//!
//! [`RoutePipeline`] runs these steps and maps every failure to a status code
//! and a `{"message": ...}` body. Handler panics are caught and answered with
//! a 500.

mod core;
mod handler;
mod params;

pub use core::{RoutePipeline, INTERNAL_ERROR_MESSAGE};
pub use handler::RouteHandler;
pub use params::{bind, Parameters, RawParams};
