//! Declarative schema documents.
//!
//! An API can be described in YAML or JSON instead of builder calls. Routes
//! name their handler; the names are bound through a [`HandlerRegistry`]
//! populated by the service at startup.
//!
//! ```yaml
//! enable_spec: true
//! objects:
//!   widget:
//!     fields:
//!       name: { type: string, required: true }
//!       id: { type: integer, required: true }
//! routes:
//!   /create_widget:
//!     handler: create_widget
//!     parameters:
//!       name: { type: string, required: true }
//!     response:
//!       objects:
//!         widget: { object_type: widget }
//! ```

use super::build::{ApiSchemaBuilder, ObjectBuilder};
use super::types::{ApiSchema, FieldOptions, ObjectName, ObjectSchema, RouteSchema};
use crate::error::ConfigurationError;
use crate::field::FieldType;
use crate::object::ResponseObject;
use crate::route::{Parameters, RouteHandler};
use anyhow::Context;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Serialization format of a schema document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` are YAML, everything else is treated as JSON
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    #[serde(default)]
    pub enable_spec: bool,
    #[serde(default)]
    pub objects: IndexMap<String, ObjectDecl>,
    #[serde(default)]
    pub routes: IndexMap<String, RouteDecl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDecl {
    pub description: Option<String>,
    #[serde(default)]
    pub fields: IndexMap<String, FieldDecl>,
    #[serde(default)]
    pub objects: IndexMap<String, ObjectRefDecl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectRefDecl {
    pub object_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDecl {
    pub description: Option<String>,
    pub handler: Option<String>,
    #[serde(default)]
    pub parameters: IndexMap<String, FieldDecl>,
    #[serde(default)]
    pub response: ObjectDecl,
}

impl FieldDecl {
    fn options(&self, name: &str) -> Result<FieldOptions, ConfigurationError> {
        let raw = self
            .field_type
            .as_deref()
            .ok_or_else(|| ConfigurationError::MissingType {
                name: name.to_string(),
            })?;
        let field_type: FieldType =
            raw.parse()
                .map_err(|_| ConfigurationError::InvalidType {
                    name: name.to_string(),
                    found: raw.to_string(),
                })?;
        let mut opts = FieldOptions::new(field_type).set_required(self.required);
        opts.description = self.description.clone();
        Ok(opts)
    }
}

impl ObjectDecl {
    fn apply(&self, builder: &mut ObjectBuilder<'_>) -> Result<(), ConfigurationError> {
        if let Some(description) = &self.description {
            builder.description(description.clone());
        }
        for (name, decl) in &self.fields {
            builder.field(name.clone(), decl.options(name)?)?;
        }
        for (name, decl) in &self.objects {
            builder.object(name.clone(), &decl.object_type)?;
        }
        Ok(())
    }
}

/// Handlers addressable by name from a schema document.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn RouteHandler>>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a closure handler under `name`, replacing any earlier one.
    pub fn register<F>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(&Parameters, &mut ResponseObject<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register_handler(name, Arc::new(handler))
    }

    pub fn register_handler(&mut self, name: &str, handler: Arc<dyn RouteHandler>) -> &mut Self {
        if self.handlers.insert(name.to_string(), handler).is_some() {
            warn!(handler_name = %name, "Replaced existing handler");
        } else {
            debug!(handler_name = %name, "Handler registered");
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn RouteHandler>> {
        self.handlers.get(name).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl SchemaDocument {
    /// Converts the document into a builder, binding handlers by name.
    ///
    /// A route whose handler is absent from `registry` is kept without one;
    /// the dispatcher refuses to start with it.
    pub fn into_builder(
        self,
        registry: &HandlerRegistry,
    ) -> Result<ApiSchemaBuilder, ConfigurationError> {
        let mut builder = ApiSchemaBuilder::new();
        builder.enable_spec(self.enable_spec);

        for (name, decl) in &self.objects {
            let name = ObjectName::new(name.as_str())?;
            let mut object = ObjectSchema::new();
            decl.apply(&mut ObjectBuilder::new(&mut object))?;
            builder.insert_object(name, object);
        }

        for (path, decl) in self.routes {
            if path.is_empty() {
                return Err(ConfigurationError::EmptyPath);
            }
            let mut route = RouteSchema::new(path.clone());
            route.description = decl.description.clone();
            for (name, param) in &decl.parameters {
                if name.trim().is_empty() {
                    return Err(ConfigurationError::MissingName {
                        context: "parameters",
                    });
                }
                let field = super::FieldSchema::new(name.clone(), param.options(name)?)?;
                route.parameters.insert(name.clone(), field);
            }
            decl.response
                .apply(&mut ObjectBuilder::new(&mut route.response))?;

            route.handler = match decl.handler.as_deref() {
                Some(handler_name) => {
                    let handler = registry.get(handler_name);
                    if handler.is_none() {
                        warn!(
                            path = %path,
                            handler_name = %handler_name,
                            "Route names a handler that is not registered"
                        );
                    }
                    handler
                }
                None => None,
            };
            builder.insert_route(route);
        }

        Ok(builder)
    }
}

/// Parses a schema document from text.
pub fn parse_document(content: &str, format: DocumentFormat) -> anyhow::Result<SchemaDocument> {
    let doc = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content).context("invalid YAML schema")?,
        DocumentFormat::Json => serde_json::from_str(content).context("invalid JSON schema")?,
    };
    Ok(doc)
}

/// Reads a schema document from disk, picking the format by extension.
pub fn load_document(path: impl AsRef<Path>) -> anyhow::Result<SchemaDocument> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    let doc = parse_document(&content, DocumentFormat::from_path(path))
        .with_context(|| format!("failed to parse schema {}", path.display()))?;
    info!(
        path = %path.display(),
        routes = doc.routes.len(),
        objects = doc.objects.len(),
        "Schema document loaded"
    );
    Ok(doc)
}

/// Reads a schema document and builds the [`ApiSchema`] it describes.
pub fn load_schema(
    path: impl AsRef<Path>,
    registry: &HandlerRegistry,
) -> anyhow::Result<ApiSchema> {
    let doc = load_document(path)?;
    Ok(doc.into_builder(registry)?.build())
}
