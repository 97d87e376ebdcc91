use crate::docs::{DocumentationEngine, JsonDocumentation, MarkdownDocumentation};
use crate::object::ResponseObject;
use crate::schema::{load_schema, ApiSchema, HandlerRegistry};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Command-line tools for schema documents
#[derive(Parser, Debug)]
#[command(name = "strictapi")]
#[command(about = "Check and document strictapi schema documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a schema and instantiate every object and route response
    Check {
        /// Schema document (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,
    },
    /// Print generated documentation for a schema
    Docs {
        /// Schema document (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        #[arg(short, long, value_enum, default_value_t = DocsFormat::Json)]
        format: DocsFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DocsFormat {
    Json,
    Markdown,
}

impl DocsFormat {
    #[must_use]
    pub fn engine(self) -> Box<dyn DocumentationEngine> {
        match self {
            DocsFormat::Json => Box::new(JsonDocumentation),
            DocsFormat::Markdown => Box::new(MarkdownDocumentation),
        }
    }
}

/// Runs `cli`, writing command output to `out`.
pub fn run_cli(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check { schema } => check(&schema, out),
        Commands::Docs { schema, format } => {
            let api = load(&schema)?;
            let rendered = format.engine().render(&api)?;
            writeln!(out, "{rendered}")?;
            Ok(())
        }
    }
}

fn load(path: &Path) -> anyhow::Result<ApiSchema> {
    // Handlers live in the service binary; documents are checked unbound.
    load_schema(path, &HandlerRegistry::new())
}

fn check(path: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let api = load(path)?;
    api.check_objects()
        .with_context(|| format!("object definitions in {} are invalid", path.display()))?;

    for (route_path, route) in &api.routes {
        ResponseObject::new(&route.response, &api.objects)
            .with_context(|| format!("response object of route {route_path} is invalid"))?;
    }

    writeln!(
        out,
        "{}: {} routes, {} objects OK",
        path.display(),
        api.routes.len(),
        api.objects.len()
    )?;
    Ok(())
}
