use crate::docs::{DocumentationEngine, JsonDocumentation};
use crate::error::ConfigurationError;
use crate::ids::RequestId;
use crate::route::{RawParams, RoutePipeline, INTERNAL_ERROR_MESSAGE};
use crate::schema::ApiSchema;
use http::{Method, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Path the generated documentation is served at unless overridden
pub const DEFAULT_SPEC_PATH: &str = "/api_spec.json";

/// Content type of every JSON body the engine produces
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A transport-neutral request.
///
/// `params` holds query-string and body parameters already merged into one
/// map of raw strings; see [`crate::server::parse_params`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    pub params: RawParams,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, params: RawParams) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            params,
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }
}

/// A transport-neutral response: status, content type and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: StatusCode, content_type: &'static str, body: String) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// A JSON response with `body` serialized as-is
    #[must_use]
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self::new(status, JSON_CONTENT_TYPE, body.to_string())
    }

    /// A JSON response of the form `{"message": "..."}`
    #[must_use]
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::json(status, &json!({ "message": message.into() }))
    }

    /// Parses the body as JSON
    pub fn json_body(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// Routes requests to the pipeline registered for their path.
///
/// Every route's pipeline is built in [`Dispatcher::new`], so a schema with
/// a missing handler or a broken object reference never starts serving.
/// After construction the dispatcher is read-only and can be shared across
/// threads and coroutines behind an `Arc`.
#[derive(Clone)]
pub struct Dispatcher {
    schema: Arc<ApiSchema>,
    pipelines: HashMap<String, RoutePipeline>,
    docs: Arc<dyn DocumentationEngine>,
    spec_path: String,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.pipelines.keys().collect::<Vec<_>>())
            .field("spec_path", &self.spec_path)
            .field("enable_spec", &self.schema.enable_spec)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Instantiates one pipeline per route.
    ///
    /// # Errors
    ///
    /// The first [`ConfigurationError`] raised by any route, in declaration
    /// order.
    pub fn new(schema: Arc<ApiSchema>) -> Result<Self, ConfigurationError> {
        let mut pipelines = HashMap::with_capacity(schema.routes.len());
        for path in schema.routes.keys() {
            let pipeline = RoutePipeline::new(Arc::clone(&schema), path).map_err(|err| {
                error!(path = %path, error = %err, "Route configuration invalid");
                err
            })?;
            pipelines.insert(path.clone(), pipeline);
        }

        info!(
            routes = pipelines.len(),
            objects = schema.objects.len(),
            enable_spec = schema.enable_spec,
            "Dispatcher ready"
        );
        Ok(Self {
            schema,
            pipelines,
            docs: Arc::new(JsonDocumentation),
            spec_path: DEFAULT_SPEC_PATH.to_string(),
        })
    }

    /// Replaces the engine used to render the documentation path
    #[must_use]
    pub fn with_documentation(mut self, engine: Arc<dyn DocumentationEngine>) -> Self {
        self.docs = engine;
        self
    }

    /// Serves documentation at `path` instead of [`DEFAULT_SPEC_PATH`]
    #[must_use]
    pub fn with_spec_path(mut self, path: impl Into<String>) -> Self {
        self.spec_path = path.into();
        self
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<ApiSchema> {
        &self.schema
    }

    #[must_use]
    pub fn spec_path(&self) -> &str {
        &self.spec_path
    }

    /// Registered route paths, in no particular order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.pipelines.keys().map(String::as_str)
    }

    /// Handles one request to completion.
    ///
    /// The documentation path takes precedence over a route of the same
    /// name while documentation is enabled.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        debug!(
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
            params = request.params.len(),
            "Dispatch start"
        );

        if self.schema.enable_spec && request.path == self.spec_path {
            return self.documentation(request);
        }

        match self.pipelines.get(&request.path) {
            Some(pipeline) => pipeline.execute(request),
            None => {
                warn!(
                    request_id = %request.request_id,
                    method = %request.method,
                    path = %request.path,
                    "Route not found"
                );
                ApiResponse::message(StatusCode::NOT_FOUND, "Route not found!")
            }
        }
    }

    fn documentation(&self, request: &ApiRequest) -> ApiResponse {
        match self.docs.render(&self.schema) {
            Ok(body) => {
                info!(
                    request_id = %request.request_id,
                    content_type = self.docs.content_type(),
                    bytes = body.len(),
                    "Documentation served"
                );
                ApiResponse::new(StatusCode::OK, self.docs.content_type(), body)
            }
            Err(err) => {
                error!(
                    request_id = %request.request_id,
                    error = ?err,
                    "Documentation rendering failed"
                );
                ApiResponse::message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}
