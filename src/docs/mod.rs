//! # Docs Module
//!
//! Generated documentation for an [`ApiSchema`].
//!
//! Both engines render the same [`ApiDoc`] model, built straight from the
//! schema: every named object (sorted by name) and every route (in
//! declaration order) with its parameters and response shape. Nested
//! objects are listed by reference, never expanded.
//!
//! The dispatcher serves the configured engine at the documentation path
//! when the schema has `enable_spec` set.

mod json;
mod markdown;

pub use json::JsonDocumentation;
pub use markdown::MarkdownDocumentation;

use crate::field::FieldType;
use crate::schema::{ApiSchema, FieldSchema, ObjectSchema};
use serde::Serialize;

/// Renders an [`ApiSchema`] for humans or machines.
pub trait DocumentationEngine: Send + Sync {
    /// Value of the `Content-Type` header for [`render`](Self::render)'s output
    fn content_type(&self) -> &'static str;

    fn render(&self, schema: &ApiSchema) -> anyhow::Result<String>;
}

/// Documentation model shared by all engines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiDoc {
    pub objects: Vec<NamedObjectDoc>,
    pub routes: Vec<RouteDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedObjectDoc {
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub shape: ObjectDoc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectDoc {
    pub fields: Vec<FieldDoc>,
    pub objects: Vec<ObjectRefDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDoc {
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectRefDoc {
    pub name: String,
    pub object_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDoc {
    pub path: String,
    pub description: Option<String>,
    pub response_object: ObjectDoc,
    pub parameters: Vec<ParameterDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
}

impl ApiDoc {
    #[must_use]
    pub fn from_schema(schema: &ApiSchema) -> Self {
        let objects = schema
            .objects_sorted()
            .into_iter()
            .map(|(name, object)| NamedObjectDoc {
                name: name.to_string(),
                description: object.description.clone(),
                shape: ObjectDoc::from_schema(object),
            })
            .collect();

        let routes = schema
            .routes
            .values()
            .map(|route| RouteDoc {
                path: route.path.clone(),
                description: route.description.clone(),
                response_object: ObjectDoc::from_schema(&route.response),
                parameters: route.parameters.values().map(ParameterDoc::from).collect(),
            })
            .collect();

        Self { objects, routes }
    }
}

impl ObjectDoc {
    fn from_schema(object: &ObjectSchema) -> Self {
        Self {
            fields: object.fields.values().map(FieldDoc::from).collect(),
            objects: object
                .objects
                .iter()
                .map(|(name, reference)| ObjectRefDoc {
                    name: name.clone(),
                    object_type: reference.object_type.to_string(),
                })
                .collect(),
        }
    }
}

impl From<&FieldSchema> for FieldDoc {
    fn from(field: &FieldSchema) -> Self {
        Self {
            name: field.name.clone(),
            description: field.description.clone(),
            required: field.required,
            field_type: field.field_type,
        }
    }
}

impl From<&FieldSchema> for ParameterDoc {
    fn from(field: &FieldSchema) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type,
            required: field.required,
        }
    }
}
