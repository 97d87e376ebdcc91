//! Error types shared by the schema, runtime and pipeline layers.
//!
//! Three families mirror the three ways a request can go wrong:
//!
//! - [`ConfigurationError`] - the schema itself is broken. Raised while the
//!   schema is built or while the dispatcher instantiates its pipelines, never
//!   at request time. A service that hits one must refuse to start.
//! - [`FieldTypeError`] - a value does not fit its declared field type, either
//!   a request parameter that cannot be coerced or a response field assigned
//!   the wrong kind of value.
//! - [`ResponseError`] - a handler left a required response field unset, or
//!   addressed a member the response object does not declare.

use crate::field::FieldType;
use thiserror::Error;

/// The schema is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A field or parameter was declared with an empty name
    #[error("name and type are required for {context}!")]
    MissingName {
        /// What was being declared (`field`, `parameter`)
        context: &'static str,
    },
    /// A field or parameter was declared without a type
    #[error("name and type are required for parameters! ({name} has no type)")]
    MissingType {
        /// Name of the offending field
        name: String,
    },
    /// A type string outside the four supported kinds
    #[error("{found} is not a valid type! (Must be one of [string, integer, float, boolean])")]
    InvalidType {
        /// Name of the offending field
        name: String,
        /// The type string that was supplied
        found: String,
    },
    /// Named objects must be identifiers, not arbitrary strings
    #[error("object name {name:?} should be an identifier")]
    InvalidObjectName {
        /// The rejected name
        name: String,
    },
    /// A name used for both a field and a nested object in one object
    #[error("Field names may not be used more than once in an object definition! ({name})")]
    DuplicateMember {
        /// The clashing name
        name: String,
    },
    /// A nested object references an object that was never defined
    #[error("Object {name} is not defined!")]
    UndefinedObject {
        /// The unresolved object name
        name: String,
    },
    /// An object contains itself, directly or through other objects
    #[error("Object {name} references itself through {chain}")]
    RecursiveObject {
        /// The object that closes the cycle
        name: String,
        /// The reference chain, outermost first
        chain: String,
    },
    /// A route was declared without a response handler
    #[error("Response not specified for route {path}!")]
    MissingHandler {
        /// Path of the route
        path: String,
    },
    /// A pipeline was requested for a path the schema does not define
    #[error("Route {path} is not defined!")]
    UndefinedRoute {
        /// The unknown path
        path: String,
    },
    /// A route path was empty
    #[error("route path must not be empty")]
    EmptyPath,
}

/// A value did not match the declared type of its field.
///
/// The display form (`"<field> is not a <type>"`) is what clients see in the
/// body of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} is not a {expected}")]
pub struct FieldTypeError {
    /// Field or parameter name
    pub field: String,
    /// The declared type the value failed to match
    pub expected: FieldType,
}

impl FieldTypeError {
    pub fn new(field: impl Into<String>, expected: FieldType) -> Self {
        Self {
            field: field.into(),
            expected,
        }
    }
}

/// The response object graph is not in a state that can be returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// A required field was never set
    #[error("Field {field} should be set!")]
    FieldNotSet {
        /// Name of the unset field
        field: String,
    },
    /// An error reported by a nested object, wrapped with that object's name
    #[error("Object: {object}: {source}")]
    Nested {
        /// Name of the nested object
        object: String,
        /// The child's error
        source: Box<ResponseError>,
    },
    /// A handler addressed a member the object does not declare
    #[error("{name} is not a member of this object")]
    UnknownMember {
        /// The unknown name
        name: String,
    },
}

/// Incoming parameters could not be bound to the route's declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A parameter failed to coerce to its declared type
    #[error(transparent)]
    Type(#[from] FieldTypeError),
    /// A required parameter was absent from the request
    #[error("Parameter: {name} is required!")]
    MissingParameter {
        /// Name of the missing parameter
        name: String,
    },
}

/// Umbrella error for the crate's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    FieldType(#[from] FieldTypeError),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error(transparent)]
    Bind(#[from] BindError),
    /// A value could not be converted to JSON for projection
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;
