//! # Object Module
//!
//! Per-request object graphs built from [`ObjectSchema`](crate::schema::ObjectSchema)
//! definitions.
//!
//! A [`ResponseObject`] mirrors its schema: a map of typed field slots and a
//! map of child objects, constructed recursively when a request begins.
//! Handlers fill it through named accessors ([`ResponseObject::set`],
//! [`ResponseObject::object_mut`]) or projections
//! ([`ResponseObject::set_from_mapping`], [`ResponseObject::set_from_source`]).
//! The pipeline then validates required fields and serializes the graph.
//!
//! ## Construction Errors
//!
//! Building an instance is where the schema is checked for:
//! - nested references to objects that were never defined
//! - names used for both a field and a nested object
//! - objects that (transitively) contain themselves

mod core;
mod source;

pub use core::ResponseObject;
pub use source::{Attribute, AttributeSource};

#[cfg(test)]
mod tests;
