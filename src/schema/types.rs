use crate::error::ConfigurationError;
use crate::field::FieldType;
use crate::route::RouteHandler;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

static OBJECT_NAME: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap()
});

/// Options accepted when declaring a field or a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOptions {
    pub field_type: FieldType,
    pub required: bool,
    pub description: Option<String>,
}

impl FieldOptions {
    #[must_use]
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            description: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn set_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Declaration of a single typed scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub description: Option<String>,
}

impl FieldSchema {
    /// Builds a field declaration, rejecting an empty name.
    pub fn new(name: impl Into<String>, opts: FieldOptions) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::MissingName { context: "fields" });
        }
        Ok(Self {
            name,
            field_type: opts.field_type,
            required: opts.required,
            description: opts.description,
        })
    }
}

/// The name of a reusable object definition.
///
/// Must look like an identifier (`widget`, `order_line`), never an arbitrary
/// string such as a path or a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectName(String);

impl ObjectName {
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if OBJECT_NAME.is_match(&name) {
            Ok(Self(name))
        } else {
            Err(ConfigurationError::InvalidObjectName { name })
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ObjectName {
    type Error = ConfigurationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ObjectName::new(value)
    }
}

impl TryFrom<String> for ObjectName {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ObjectName::new(value)
    }
}

/// A nested object slot: the member name maps to a named object definition.
///
/// Resolution is deferred until a runtime instance is built, so definitions
/// may be declared in any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRef {
    pub object_type: ObjectName,
}

/// Shape of a JSON object: scalar fields plus nested object references.
///
/// Field and nested-object names share one namespace. A clash is reported
/// when the first runtime instance is built, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectSchema {
    pub description: Option<String>,
    pub fields: IndexMap<String, FieldSchema>,
    pub objects: IndexMap<String, ObjectRef>,
}

impl ObjectSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Registry of named object definitions, keyed by [`ObjectName`].
pub type ObjectRegistry = HashMap<ObjectName, ObjectSchema>;

/// A path-keyed contract: declared parameters in, a response object out.
#[derive(Clone)]
pub struct RouteSchema {
    pub path: String,
    pub description: Option<String>,
    pub parameters: IndexMap<String, FieldSchema>,
    pub response: ObjectSchema,
    pub handler: Option<Arc<dyn RouteHandler>>,
}

impl RouteSchema {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: None,
            parameters: IndexMap::new(),
            response: ObjectSchema::new(),
            handler: None,
        }
    }

    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }
}

impl fmt::Debug for RouteSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSchema")
            .field("path", &self.path)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("response", &self.response)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

/// The complete, immutable description of an API.
///
/// Built once at startup by [`ApiSchemaBuilder`](super::ApiSchemaBuilder) and
/// shared read-only by every request.
#[derive(Debug, Clone, Default)]
pub struct ApiSchema {
    pub routes: IndexMap<String, RouteSchema>,
    pub objects: ObjectRegistry,
    pub enable_spec: bool,
}

impl ApiSchema {
    #[must_use]
    pub fn route(&self, path: &str) -> Option<&RouteSchema> {
        self.routes.get(path)
    }

    #[must_use]
    pub fn object(&self, name: &str) -> Option<&ObjectSchema> {
        // Object names are validated on insert, so a lookup by plain str is
        // only a miss when the name is malformed.
        ObjectName::new(name).ok().and_then(|n| self.objects.get(&n))
    }

    /// Named objects sorted by name, for stable documentation output
    #[must_use]
    pub fn objects_sorted(&self) -> Vec<(&ObjectName, &ObjectSchema)> {
        let mut objects: Vec<_> = self.objects.iter().collect();
        objects.sort_by(|a, b| a.0.cmp(b.0));
        objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_must_be_identifier() {
        assert!(ObjectName::new("widget").is_ok());
        assert!(ObjectName::new("_order_line2").is_ok());
        for bad in ["", "2fast", "a widget", "/widgets", "widget-name"] {
            assert_eq!(
                ObjectName::new(bad),
                Err(ConfigurationError::InvalidObjectName {
                    name: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn test_field_schema_requires_name() {
        let err = FieldSchema::new("  ", FieldOptions::new(FieldType::String)).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingName { context: "fields" });
    }
}
