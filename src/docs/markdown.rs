use super::{ApiDoc, DocumentationEngine};
use crate::schema::ApiSchema;
use anyhow::Context;
use minijinja::Environment;

const TEMPLATE_NAME: &str = "api.md";

const TEMPLATE: &str = r#"# API Reference
{% if routes %}
## Routes
{% for route in routes %}
### `{{ route.path }}`
{% if route.description %}
{{ route.description }}
{% endif %}
{% if route.parameters %}
| Parameter | Type | Required |
|-----------|------|----------|
{% for p in route.parameters -%}
| `{{ p.name }}` | {{ p.type }} | {{ "yes" if p.required else "no" }} |
{% endfor %}
{% else %}
No parameters.
{% endif %}
Response:
{% for f in route.response_object.fields %}
- `{{ f.name }}`: {{ f.type }}{% if f.required %} (required){% endif %}
{%- endfor %}
{%- for o in route.response_object.objects %}
- `{{ o.name }}`: object `{{ o.object_type }}`
{%- endfor %}
{% endfor %}
{% endif %}
{% if objects %}
## Objects
{% for object in objects %}
### `{{ object.name }}`
{% if object.description %}
{{ object.description }}
{% endif %}
| Field | Type | Required | Description |
|-------|------|----------|-------------|
{% for f in object.fields -%}
| `{{ f.name }}` | {{ f.type }} | {{ "yes" if f.required else "no" }} | {{ f.description if f.description else "" }} |
{% endfor %}
{%- for o in object.objects -%}
| `{{ o.name }}` | object `{{ o.object_type }}` | | |
{% endfor %}
{% endfor %}
{% endif %}
"#;

/// Human-readable documentation rendered from a Markdown template.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownDocumentation;

impl DocumentationEngine for MarkdownDocumentation {
    fn content_type(&self) -> &'static str {
        "text/markdown; charset=utf-8"
    }

    fn render(&self, schema: &ApiSchema) -> anyhow::Result<String> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE)
            .context("invalid documentation template")?;
        let tmpl = env.get_template(TEMPLATE_NAME)?;
        let rendered = tmpl
            .render(ApiDoc::from_schema(schema))
            .context("failed to render documentation")?;
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::tests::sample_schema;

    #[test]
    fn test_markdown_mentions_every_route_and_object() {
        let out = MarkdownDocumentation.render(&sample_schema()).unwrap();
        assert!(out.starts_with("# API Reference"));
        assert!(out.contains("### `/create_widget`"));
        assert!(out.contains("Creates a widget"));
        assert!(out.contains("| `make_public` | boolean | no |"));
        assert!(out.contains("- `widget`: object `widget`"));
        assert!(out.contains("### `gadget`"));
        assert!(out.contains("| `id` | integer | yes | Database id |"));
    }

    #[test]
    fn test_markdown_handles_empty_schema() {
        let out = MarkdownDocumentation.render(&ApiSchema::default()).unwrap();
        assert!(out.starts_with("# API Reference"));
        assert!(!out.contains("## Routes"));
    }
}
