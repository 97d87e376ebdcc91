//! # Schema Module
//!
//! Immutable API definitions, built once at startup.
//!
//! - [`FieldSchema`] - a named, typed scalar (`string`, `integer`, `float`,
//!   `boolean`), optionally required
//! - [`ObjectSchema`] - fields plus nested object references, resolved by
//!   name against the API's [`ObjectRegistry`] only when a runtime instance
//!   is built
//! - [`RouteSchema`] - declared parameters, a response shape and a handler
//! - [`ApiSchema`] - every route and every named object
//!
//! Schemas are assembled with [`ApiSchemaBuilder`] or loaded from a YAML/JSON
//! document ([`load_schema`]). Nothing here is touched during request
//! handling except through shared references.

mod build;
mod load;
mod types;

pub use build::{ApiSchemaBuilder, ObjectBuilder, RouteBuilder};
pub use load::{
    load_document, load_schema, parse_document, DocumentFormat, FieldDecl, HandlerRegistry,
    ObjectDecl, ObjectRefDecl, RouteDecl, SchemaDocument,
};
pub use types::{
    ApiSchema, FieldOptions, FieldSchema, ObjectName, ObjectRef, ObjectRegistry, ObjectSchema,
    RouteSchema,
};

use crate::error::ConfigurationError;
use crate::object::ResponseObject;

impl ApiSchema {
    /// Builds one runtime instance of every named object.
    ///
    /// Route response shapes are checked when the dispatcher starts; this
    /// also covers objects no route references yet.
    pub fn check_objects(&self) -> Result<(), ConfigurationError> {
        for (name, object) in self.objects_sorted() {
            ResponseObject::new(object, &self.objects).map_err(|err| {
                tracing::error!(object = %name, error = %err, "Object definition invalid");
                err
            })?;
        }
        Ok(())
    }
}
