use super::handler::RouteHandler;
use super::params::{bind, Parameters, RawParams};
use crate::dispatcher::{ApiRequest, ApiResponse};
use crate::error::{BindError, ConfigurationError, Error, FieldTypeError, ResponseError};
use crate::object::ResponseObject;
use crate::schema::{ApiSchema, RouteSchema};
use http::StatusCode;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Message returned when a handler fails in a way clients should not see
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// How a handler run ended, before it is turned into a response
enum HandlerOutcome {
    Completed,
    TypeError(FieldTypeError),
    ResponseError(ResponseError),
    Failed(anyhow::Error),
    Panicked(String),
}

/// Executes one route: bind parameters, run the handler, validate and
/// serialize the response object.
///
/// A pipeline is created once per route when the dispatcher starts. Creating
/// it builds a throwaway response object so broken object references surface
/// at startup instead of on the first request.
#[derive(Clone)]
pub struct RoutePipeline {
    schema: Arc<ApiSchema>,
    path: String,
    handler: Arc<dyn RouteHandler>,
}

impl std::fmt::Debug for RoutePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutePipeline")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RoutePipeline {
    /// # Errors
    ///
    /// - [`ConfigurationError::UndefinedRoute`] when `path` is not in the schema
    /// - [`ConfigurationError::MissingHandler`] when the route has no handler
    /// - any error raised while instantiating the route's response object
    pub fn new(schema: Arc<ApiSchema>, path: &str) -> Result<Self, ConfigurationError> {
        let route = schema
            .route(path)
            .ok_or_else(|| ConfigurationError::UndefinedRoute {
                path: path.to_string(),
            })?;
        let handler = route
            .handler
            .clone()
            .ok_or_else(|| ConfigurationError::MissingHandler {
                path: path.to_string(),
            })?;
        ResponseObject::new(&route.response, &schema.objects)?;

        debug!(path = %path, parameters = route.parameters.len(), "Route pipeline ready");
        Ok(Self {
            path: path.to_string(),
            handler,
            schema,
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn route(&self) -> Option<&RouteSchema> {
        self.schema.route(&self.path)
    }

    /// Binds raw request parameters to this route's declarations.
    pub fn bind(&self, raw: &RawParams) -> Result<Parameters, BindError> {
        match self.route() {
            Some(route) => bind(&route.parameters, raw),
            None => Ok(Parameters::new()),
        }
    }

    /// Runs the full request cycle and always produces a response.
    ///
    /// | Failure                               | Status |
    /// |---------------------------------------|--------|
    /// | parameter missing or not coercible    | 400    |
    /// | handler sets a field to the wrong type| 400    |
    /// | handler leaves a required field unset | 500    |
    /// | any other handler error or a panic    | 500    |
    pub fn execute(&self, request: &ApiRequest) -> ApiResponse {
        let start = Instant::now();
        let Some(route) = self.route() else {
            error!(request_id = %request.request_id, path = %self.path, "Route vanished from schema");
            return ApiResponse::message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE);
        };

        let params = match bind(&route.parameters, &request.params) {
            Ok(params) => params,
            Err(err) => {
                warn!(
                    request_id = %request.request_id,
                    path = %self.path,
                    error = %err,
                    "Parameter binding failed"
                );
                return ApiResponse::message(StatusCode::BAD_REQUEST, err.to_string());
            }
        };
        debug!(
            request_id = %request.request_id,
            path = %self.path,
            bound = params.len(),
            "Parameters bound"
        );

        let mut response = match ResponseObject::new(&route.response, &self.schema.objects) {
            Ok(response) => response,
            Err(err) => {
                error!(request_id = %request.request_id, path = %self.path, error = %err, "Response object could not be built");
                return ApiResponse::message(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE,
                );
            }
        };

        let outcome = self.run_handler(&params, &mut response);
        let reply = match outcome {
            HandlerOutcome::Completed => match response.validate() {
                Ok(()) => ApiResponse::json(StatusCode::OK, &response.to_value()),
                Err(err) => {
                    warn!(
                        request_id = %request.request_id,
                        path = %self.path,
                        error = %err,
                        "Response object failed validation"
                    );
                    ApiResponse::message(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
            },
            HandlerOutcome::TypeError(err) => {
                warn!(
                    request_id = %request.request_id,
                    path = %self.path,
                    error = %err,
                    "Handler assigned a mistyped value"
                );
                ApiResponse::message(StatusCode::BAD_REQUEST, err.to_string())
            }
            HandlerOutcome::ResponseError(err) => {
                warn!(
                    request_id = %request.request_id,
                    path = %self.path,
                    error = %err,
                    "Handler misused the response object"
                );
                ApiResponse::message(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            HandlerOutcome::Failed(err) => {
                error!(
                    request_id = %request.request_id,
                    path = %self.path,
                    error = ?err,
                    "Handler failed"
                );
                ApiResponse::message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
            HandlerOutcome::Panicked(message) => {
                error!(
                    request_id = %request.request_id,
                    path = %self.path,
                    panic_message = %message,
                    "Handler panicked"
                );
                ApiResponse::message(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        };

        info!(
            request_id = %request.request_id,
            path = %self.path,
            status = reply.status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Route executed"
        );
        reply
    }

    fn run_handler(&self, params: &Parameters, response: &mut ResponseObject<'_>) -> HandlerOutcome {
        let handler = &self.handler;
        match catch_unwind(AssertUnwindSafe(|| handler.handle(params, response))) {
            Ok(Ok(())) => HandlerOutcome::Completed,
            Ok(Err(err)) => classify(err),
            Err(panic) => HandlerOutcome::Panicked(panic_message(&*panic)),
        }
    }
}

fn classify(err: anyhow::Error) -> HandlerOutcome {
    if let Some(type_err) = err.downcast_ref::<FieldTypeError>() {
        return HandlerOutcome::TypeError(type_err.clone());
    }
    if let Some(response_err) = err.downcast_ref::<ResponseError>() {
        return HandlerOutcome::ResponseError(response_err.clone());
    }
    match err.downcast_ref::<Error>() {
        Some(Error::FieldType(type_err)) => HandlerOutcome::TypeError(type_err.clone()),
        Some(Error::Bind(BindError::Type(type_err))) => HandlerOutcome::TypeError(type_err.clone()),
        Some(Error::Response(response_err)) => {
            HandlerOutcome::ResponseError(response_err.clone())
        }
        _ => HandlerOutcome::Failed(err),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
