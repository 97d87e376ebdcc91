//! Builder surface used once at startup to declare an API.
//!
//! ```rust
//! use strictapi::field::FieldType;
//! use strictapi::schema::{ApiSchemaBuilder, FieldOptions};
//!
//! # fn main() -> Result<(), strictapi::error::ConfigurationError> {
//! let mut api = ApiSchemaBuilder::new();
//! api.enable_spec(true)
//!     .define_object("widget", |obj| {
//!         obj.field("name", FieldOptions::new(FieldType::String).required())?
//!             .field("id", FieldOptions::new(FieldType::Integer).required())?;
//!         Ok(())
//!     })?
//!     .define_route("/create_widget", |route| {
//!         route
//!             .parameter("name", FieldOptions::new(FieldType::String).required())?
//!             .response_object(|r| {
//!                 r.object("widget", "widget")?;
//!                 Ok(())
//!             })?
//!             .respond(|params, response| {
//!                 let widget = response.object_mut("widget")?;
//!                 widget.set("name", params.string("name").unwrap_or_default())?;
//!                 widget.set("id", 1)?;
//!                 Ok(())
//!             });
//!         Ok(())
//!     })?;
//! let schema = api.build();
//! assert!(schema.route("/create_widget").is_some());
//! # Ok(())
//! # }
//! ```

use super::types::{
    ApiSchema, FieldOptions, FieldSchema, ObjectName, ObjectRef, ObjectRegistry, ObjectSchema,
    RouteSchema,
};
use crate::error::ConfigurationError;
use crate::object::ResponseObject;
use crate::route::{Parameters, RouteHandler};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Accumulates route and object definitions, then freezes them into an
/// [`ApiSchema`].
#[derive(Debug, Default)]
pub struct ApiSchemaBuilder {
    routes: IndexMap<String, RouteSchema>,
    objects: ObjectRegistry,
    enable_spec: bool,
}

impl ApiSchemaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve generated documentation at the documentation path
    pub fn enable_spec(&mut self, enabled: bool) -> &mut Self {
        self.enable_spec = enabled;
        self
    }

    /// Registers a route under `path`, replacing any earlier definition.
    pub fn define_route<F>(
        &mut self,
        path: impl Into<String>,
        configure: F,
    ) -> Result<&mut Self, ConfigurationError>
    where
        F: FnOnce(&mut RouteBuilder<'_>) -> Result<(), ConfigurationError>,
    {
        let path = path.into();
        if path.is_empty() {
            return Err(ConfigurationError::EmptyPath);
        }

        let mut route = RouteSchema::new(path.clone());
        configure(&mut RouteBuilder { route: &mut route })?;

        info!(
            path = %path,
            parameters = route.parameters.len(),
            has_handler = route.has_handler(),
            "Route defined"
        );
        if self.routes.insert(path.clone(), route).is_some() {
            warn!(path = %path, "Replaced existing route definition");
        }
        Ok(self)
    }

    /// Registers a reusable object definition under `name`.
    ///
    /// `name` must be an identifier; see [`ObjectName`].
    pub fn define_object<F>(
        &mut self,
        name: &str,
        configure: F,
    ) -> Result<&mut Self, ConfigurationError>
    where
        F: FnOnce(&mut ObjectBuilder<'_>) -> Result<(), ConfigurationError>,
    {
        let name = ObjectName::new(name)?;
        let mut object = ObjectSchema::new();
        configure(&mut ObjectBuilder {
            object: &mut object,
        })?;

        info!(
            object = %name,
            fields = object.fields.len(),
            objects = object.objects.len(),
            "Object defined"
        );
        if self.objects.insert(name.clone(), object).is_some() {
            warn!(object = %name, "Replaced existing object definition");
        }
        Ok(self)
    }

    /// Inserts an already assembled route; used by the document loader.
    pub(crate) fn insert_route(&mut self, route: RouteSchema) {
        self.routes.insert(route.path.clone(), route);
    }

    /// Inserts an already assembled object; used by the document loader.
    pub(crate) fn insert_object(&mut self, name: ObjectName, object: ObjectSchema) {
        self.objects.insert(name, object);
    }

    #[must_use]
    pub fn build(self) -> ApiSchema {
        debug!(
            routes = self.routes.len(),
            objects = self.objects.len(),
            enable_spec = self.enable_spec,
            "API schema built"
        );
        ApiSchema {
            routes: self.routes,
            objects: self.objects,
            enable_spec: self.enable_spec,
        }
    }
}

/// Configures one [`ObjectSchema`].
pub struct ObjectBuilder<'a> {
    object: &'a mut ObjectSchema,
}

impl<'a> ObjectBuilder<'a> {
    pub(crate) fn new(object: &'a mut ObjectSchema) -> Self {
        Self { object }
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.object.description = Some(description.into());
        self
    }

    /// Declares a scalar field.
    pub fn field(
        &mut self,
        name: impl Into<String>,
        opts: FieldOptions,
    ) -> Result<&mut Self, ConfigurationError> {
        let field = FieldSchema::new(name, opts)?;
        self.object.fields.insert(field.name.clone(), field);
        Ok(self)
    }

    /// Declares a nested object member backed by the named definition
    /// `object_type`. The name is resolved when a runtime instance is built.
    pub fn object(
        &mut self,
        name: impl Into<String>,
        object_type: &str,
    ) -> Result<&mut Self, ConfigurationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::MissingName { context: "objects" });
        }
        let object_type = ObjectName::new(object_type)?;
        self.object.objects.insert(name, ObjectRef { object_type });
        Ok(self)
    }
}

/// Configures one [`RouteSchema`].
pub struct RouteBuilder<'a> {
    route: &'a mut RouteSchema,
}

impl<'a> RouteBuilder<'a> {
    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.route.description = Some(description.into());
        self
    }

    /// Declares a request parameter. `name` is also the wire name.
    pub fn parameter(
        &mut self,
        name: impl Into<String>,
        opts: FieldOptions,
    ) -> Result<&mut Self, ConfigurationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::MissingName {
                context: "parameters",
            });
        }
        let param = FieldSchema::new(name, opts)?;
        self.route.parameters.insert(param.name.clone(), param);
        Ok(self)
    }

    /// Configures the shape of the object this route responds with.
    pub fn response_object<F>(&mut self, configure: F) -> Result<&mut Self, ConfigurationError>
    where
        F: FnOnce(&mut ObjectBuilder<'_>) -> Result<(), ConfigurationError>,
    {
        configure(&mut ObjectBuilder::new(&mut self.route.response))?;
        Ok(self)
    }

    /// Sets the handler invoked with the bound parameters and a fresh
    /// response object for every request.
    pub fn respond<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&Parameters, &mut ResponseObject<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.route.handler = Some(Arc::new(handler));
        self
    }

    /// Sets a handler implemented as a [`RouteHandler`] type.
    pub fn respond_with(&mut self, handler: Arc<dyn RouteHandler>) -> &mut Self {
        self.route.handler = Some(handler);
        self
    }
}
