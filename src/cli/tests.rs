//! Unit tests for CLI commands

use crate::cli::{run_cli, Cli, Commands, DocsFormat};
use clap::Parser;
use std::io::Write;

const WIDGETS: &str = r#"
enable_spec: true
objects:
  widget:
    fields:
      name: { type: string, required: true }
      id: { type: integer, required: true }
routes:
  /create_widget:
    handler: create_widget
    parameters:
      name: { type: string, required: true }
    response:
      objects:
        widget: { object_type: widget }
"#;

fn schema_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    run_cli(cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_docs_format_defaults_to_json() {
    let cli = Cli::try_parse_from(["strictapi", "docs", "--schema", "api.yaml"]).unwrap();
    match cli.command {
        Commands::Docs { schema, format } => {
            assert_eq!(schema.to_string_lossy(), "api.yaml");
            assert_eq!(format, DocsFormat::Json);
        }
        _ => panic!("Expected Docs command"),
    }
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["strictapi", "check", "--schema", "api.yaml"],
        vec!["strictapi", "check", "-s", "api.json"],
        vec!["strictapi", "docs", "--schema", "api.yaml", "--format", "markdown"],
    ];
    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
    assert!(Cli::try_parse_from(["strictapi", "docs", "-s", "a", "--format", "html"]).is_err());
}

#[test]
fn test_check_reports_counts() {
    let file = schema_file(WIDGETS);
    let path = file.path().to_string_lossy().into_owned();
    let out = run(&["strictapi", "check", "--schema", &path]).unwrap();
    assert!(out.ends_with("1 routes, 1 objects OK\n"), "{out}");
}

#[test]
fn test_check_finds_undefined_objects() {
    let file = schema_file(
        r#"
routes:
  /broken:
    response:
      objects:
        thing: { object_type: missing }
"#,
    );
    let path = file.path().to_string_lossy().into_owned();
    let err = run(&["strictapi", "check", "--schema", &path]).unwrap_err();
    assert!(format!("{err:#}").contains("Object missing is not defined!"));
}

#[test]
fn test_docs_markdown() {
    let file = schema_file(WIDGETS);
    let path = file.path().to_string_lossy().into_owned();
    let out = run(&["strictapi", "docs", "--schema", &path, "--format", "markdown"]).unwrap();
    assert!(out.contains("### `/create_widget`"));
    assert!(out.contains("### `widget`"));
}
