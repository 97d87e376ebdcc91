use super::{ApiDoc, DocumentationEngine};
use crate::schema::ApiSchema;

/// Machine-readable documentation, served as `application/json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentation;

impl DocumentationEngine for JsonDocumentation {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, schema: &ApiSchema) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&ApiDoc::from_schema(schema))?)
    }
}
