//! # CLI Module
//!
//! Command-line tools for working with schema documents outside a running
//! service.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Loads a document, builds the schema and instantiates every named object
//! and route response, so unresolved references, duplicate member names and
//! recursive objects are caught before deployment:
//!
//! ```bash
//! strictapi check --schema api.yaml
//! ```
//!
//! Handler names are not resolved; binding happens in the service.
//!
//! ### `docs`
//!
//! Prints the documentation the service would serve at its documentation
//! path:
//!
//! ```bash
//! strictapi docs --schema api.yaml --format markdown
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands, DocsFormat};
