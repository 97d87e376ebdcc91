//! # Dispatcher Module
//!
//! Entry point for request handling: one [`Dispatcher`] per API.
//!
//! ## Overview
//!
//! The dispatcher holds the shared [`ApiSchema`](crate::schema::ApiSchema)
//! and one [`RoutePipeline`](crate::route::RoutePipeline) per route. It:
//! - builds every pipeline at startup, so schema errors stop the service
//!   before it accepts traffic
//! - serves generated documentation at the documentation path when enabled
//! - answers unknown paths with `404 {"message": "Route not found!"}`
//! - hands everything else to the matching pipeline
//!
//! ## Concurrency
//!
//! `handle` is synchronous and touches no shared mutable state. The schema
//! is read-only after startup and every runtime object is created per
//! request, so one dispatcher can serve any number of coroutines at once.
//!
//! ```rust
//! use std::sync::Arc;
//! use http::{Method, StatusCode};
//! use strictapi::dispatcher::{ApiRequest, Dispatcher};
//! use strictapi::schema::ApiSchemaBuilder;
//!
//! let dispatcher = Dispatcher::new(Arc::new(ApiSchemaBuilder::new().build())).unwrap();
//! let response = dispatcher.handle(&ApiRequest::new(Method::GET, "/nope", Default::default()));
//! assert_eq!(response.status, StatusCode::NOT_FOUND);
//! assert_eq!(response.body, r#"{"message":"Route not found!"}"#);
//! ```

mod core;

pub use core::{
    ApiRequest, ApiResponse, Dispatcher, DEFAULT_SPEC_PATH, JSON_CONTENT_TYPE,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::MarkdownDocumentation;
    use crate::field::FieldType;
    use crate::schema::{ApiSchemaBuilder, FieldOptions};
    use http::{Method, StatusCode};
    use serde_json::json;
    use std::sync::Arc;

    fn build(enable_spec: bool) -> Dispatcher {
        let mut api = ApiSchemaBuilder::new();
        api.enable_spec(enable_spec)
            .define_route("/ping", |route| {
                route
                    .response_object(|r| {
                        r.field("pong", FieldOptions::new(FieldType::Boolean).required())?;
                        Ok(())
                    })?
                    .respond(|_, response| {
                        response.set("pong", true)?;
                        Ok(())
                    });
                Ok(())
            })
            .unwrap();
        Dispatcher::new(Arc::new(api.build())).unwrap()
    }

    fn get(path: &str) -> ApiRequest {
        ApiRequest::new(Method::GET, path, Default::default())
    }

    #[test]
    fn test_routes_by_path() {
        let dispatcher = build(false);
        let response = dispatcher.handle(&get("/ping"));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json_body().unwrap(), json!({ "pong": true }));
    }

    #[test]
    fn test_unknown_path_is_404() {
        let response = build(true).handle(&get("/missing"));
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(
            response.json_body().unwrap(),
            json!({ "message": "Route not found!" })
        );
    }

    #[test]
    fn test_spec_path_only_when_enabled() {
        let disabled = build(false).handle(&get(DEFAULT_SPEC_PATH));
        assert_eq!(disabled.status, StatusCode::NOT_FOUND);

        let enabled = build(true).handle(&get(DEFAULT_SPEC_PATH));
        assert_eq!(enabled.status, StatusCode::OK);
        assert_eq!(enabled.content_type, JSON_CONTENT_TYPE);
        let doc = enabled.json_body().unwrap();
        assert_eq!(doc["routes"][0]["path"], "/ping");
    }

    #[test]
    fn test_custom_engine_and_path() {
        let dispatcher = build(true)
            .with_documentation(Arc::new(MarkdownDocumentation))
            .with_spec_path("/docs.md");
        assert_eq!(
            dispatcher.handle(&get(DEFAULT_SPEC_PATH)).status,
            StatusCode::NOT_FOUND
        );
        let response = dispatcher.handle(&get("/docs.md"));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type, "text/markdown; charset=utf-8");
        assert!(response.body.contains("### `/ping`"));
    }

    #[test]
    fn test_missing_handler_fails_fast() {
        let mut api = ApiSchemaBuilder::new();
        api.define_route("/a", |_| Ok(())).unwrap();
        let err = Dispatcher::new(Arc::new(api.build())).unwrap_err();
        assert_eq!(err.to_string(), "Response not specified for route /a!");
    }
}
