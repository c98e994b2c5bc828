#![deny(missing_docs)]

//! # Graph Command
//!
//! Reads a request description (JSON or YAML), builds its code graph and
//! prints it as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snippet_graph_core::{CodeGraph, PathSegment, SchemaView, SnippetRequest};
use tracing::{info, warn};
use utoipa::openapi::schema::Schema;
use utoipa::openapi::{Components, RefOr};

use crate::error::{CliError, CliResult};

/// Arguments for the graph command.
#[derive(clap::Args, Debug, Clone)]
pub struct GraphArgs {
    /// Path to the request description (`.json`, otherwise parsed as YAML).
    pub request_path: PathBuf,

    /// OpenAPI `components` object used to resolve `$ref`s in the schemas.
    #[clap(long)]
    pub components: Option<PathBuf>,

    /// Print single-line JSON.
    #[clap(long)]
    pub compact: bool,
}

/// On-disk request description.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestDocument {
    method: String,
    #[serde(default)]
    nodes: Vec<PathSegment>,
    #[serde(default)]
    headers: IndexMap<String, Vec<String>>,
    #[serde(default)]
    query: String,
    content_type: Option<String>,
    body: Option<String>,
    #[serde(default = "default_body_valid")]
    body_valid: bool,
    request_schema: Option<RefOr<Schema>>,
    response_schema: Option<RefOr<Schema>>,
}

fn default_body_valid() -> bool {
    true
}

/// Builds the code graph and renders it as JSON.
pub fn render(args: &GraphArgs) -> CliResult<String> {
    let document: RequestDocument = read_document(&args.request_path)?;
    let components: Option<Components> = args
        .components
        .as_deref()
        .map(read_document)
        .transpose()?;

    let request_schema = resolve_request_schema(
        document.request_schema.as_ref(),
        components.as_ref(),
    );

    let request = SnippetRequest {
        http_method: document.method,
        nodes: document.nodes,
        response_schema: document.response_schema,
        headers: document.headers,
        query: document.query,
        content_type: document.content_type,
        body: document.body,
        request_schema,
        body_valid: document.body_valid,
    };

    let graph = CodeGraph::build(&request)?;
    info!(
        method = %graph.http_method(),
        has_body = graph.has_body(),
        "built code graph"
    );

    let rendered = if args.compact {
        serde_json::to_string(&graph)
    } else {
        serde_json::to_string_pretty(&graph)
    };
    rendered.map_err(|e| CliError::General(format!("Failed to encode code graph: {}", e)))
}

/// Executes the graph command.
pub fn execute(args: &GraphArgs) -> CliResult<()> {
    println!("{}", render(args)?);
    Ok(())
}

/// Resolves the body schema, warning when a declared one cannot be used.
fn resolve_request_schema<'a>(
    schema: Option<&'a RefOr<Schema>>,
    components: Option<&'a Components>,
) -> Option<SchemaView<'a>> {
    let schema = schema?;
    let view = SchemaView::resolve(schema, components);
    if let (None, RefOr::Ref(r)) = (&view, schema) {
        if components.is_none() {
            warn!(
                reference = %r.ref_location,
                "requestSchema is a reference but no --components file was given; \
                 body members will be treated as additional data"
            );
        } else {
            warn!(
                reference = %r.ref_location,
                "requestSchema reference not found in components; \
                 body members will be treated as additional data"
            );
        }
    }
    view
}

fn read_document<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    if !path.exists() {
        return Err(CliError::General(format!("File not found: {:?}", path)));
    }
    let content = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content)
            .map_err(|e| CliError::General(format!("Failed to parse {:?}: {}", path, e)))
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| CliError::General(format!("Failed to parse {:?}: {}", path, e)))
    }
}
