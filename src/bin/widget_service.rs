//! Minimal widget service.
//!
//! ```bash
//! STRICTAPI_LOG_FORMAT=pretty cargo run --bin widget-service -- service.yaml
//! curl -d name=w http://127.0.0.1:8080/create_widget
//! ```

use anyhow::Context;
use std::sync::Arc;
use strictapi::config::ServiceConfig;
use strictapi::dispatcher::Dispatcher;
use strictapi::field::FieldType;
use strictapi::logging::{init_logging_with_config, LogConfig};
use strictapi::schema::{ApiSchema, ApiSchemaBuilder, FieldOptions};
use strictapi::server::{ApiService, HttpServer};
use tracing::info;

fn widget_api() -> anyhow::Result<ApiSchema> {
    let mut api = ApiSchemaBuilder::new();
    api.enable_spec(true)
        .define_object("widget", |obj| {
            obj.description("A widget")
                .field("name", FieldOptions::new(FieldType::String).required())?
                .field(
                    "id",
                    FieldOptions::new(FieldType::Integer)
                        .required()
                        .description("Database id"),
                )?
                .field("note", FieldOptions::new(FieldType::String))?;
            Ok(())
        })?
        .define_route("/create_widget", |route| {
            route
                .description("Creates a widget")
                .parameter("name", FieldOptions::new(FieldType::String).required())?
                .parameter("make_public", FieldOptions::new(FieldType::Boolean))?
                .response_object(|response| {
                    response.object("widget", "widget")?;
                    Ok(())
                })?
                .respond(|params, response| {
                    let name = params.string("name").unwrap_or_default().to_string();
                    let widget = response.object_mut("widget")?;
                    widget.set("name", name)?;
                    widget.set("id", 1)?;
                    Ok(())
                });
            Ok(())
        })?;
    Ok(api.build())
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ServiceConfig::load(&path)?.with_env_overrides(),
        None => ServiceConfig::from_env(),
    };
    let _guard = init_logging_with_config(&LogConfig::from_env())?;

    may::config().set_stack_size(config.stack_size);

    let mut schema = widget_api()?;
    if let Some(enabled) = config.enable_spec {
        schema.enable_spec = enabled;
    }
    let dispatcher = Dispatcher::new(Arc::new(schema))
        .context("widget API failed to start")?
        .with_spec_path(config.spec_path.clone());

    info!(
        addr = %config.addr,
        stack_size = config.stack_size,
        routes = dispatcher.paths().count(),
        "Starting widget service"
    );
    let server = HttpServer(ApiService::new(Arc::new(dispatcher)))
        .start(config.addr.as_str())
        .context("failed to bind listen address")?;

    server
        .join()
        .map_err(|e| anyhow::anyhow!("server failed: {e:?}"))
}
