#![deny(missing_docs)]

//! # Code Graph Assembly
//!
//! Composes headers, query parameters and body into one immutable [`CodeGraph`].

use crate::error::SnippetResult;
use crate::graph::headers::filter_headers;
use crate::graph::{CodeProperty, PathSegment, PropertyType};
use crate::parser::{normalize_query, parse_body};
use crate::schema::SchemaLookup;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;
use utoipa::openapi::schema::Schema;
use utoipa::openapi::RefOr;

/// The decoded request a snippet is generated for.
#[derive(Debug, Clone)]
pub struct SnippetRequest<S> {
    /// HTTP Method: "GET", "POST", etc.
    pub http_method: String,
    /// Addressed resource path segments.
    pub nodes: Vec<PathSegment>,
    /// Schema of the success response, passed through untouched.
    pub response_schema: Option<RefOr<Schema>>,
    /// Header name -> values.
    pub headers: IndexMap<String, Vec<String>>,
    /// Raw query string (without or with a leading `?`).
    pub query: String,
    /// Declared body media type.
    pub content_type: Option<String>,
    /// Raw body text.
    pub body: Option<String>,
    /// Schema of the expected body object.
    pub request_schema: Option<S>,
    /// Whether the body is parseable for its content type.
    pub body_valid: bool,
}

impl<S: SchemaLookup> SnippetRequest<S> {
    /// A request with no headers, query or body.
    pub fn new(http_method: impl Into<String>, nodes: Vec<PathSegment>) -> Self {
        Self {
            http_method: http_method.into(),
            nodes,
            response_schema: None,
            headers: IndexMap::new(),
            query: String::new(),
            content_type: None,
            body: None,
            request_schema: None,
            body_valid: true,
        }
    }

    /// Appends a header with its values.
    pub fn with_header(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.headers.insert(name.into(), values);
        self
    }

    /// Sets the raw query string.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Sets the body and its media type.
    pub fn with_body(mut self, content_type: Option<&str>, body: impl Into<String>) -> Self {
        self.content_type = content_type.map(str::to_string);
        self.body = Some(body.into());
        self
    }

    /// Marks whether the body is parseable for its content type.
    pub fn with_body_valid(mut self, valid: bool) -> Self {
        self.body_valid = valid;
        self
    }

    /// Sets the schema of the expected body.
    pub fn with_request_schema(mut self, schema: S) -> Self {
        self.request_schema = Some(schema);
        self
    }

    /// Sets the response schema.
    pub fn with_response_schema(mut self, schema: RefOr<Schema>) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Language-neutral description of one request, ready for snippet rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeGraph {
    http_method: String,
    nodes: Vec<PathSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<RefOr<Schema>>,
    headers: Vec<CodeProperty>,
    options: Vec<CodeProperty>,
    parameters: Vec<CodeProperty>,
    body: CodeProperty,
}

impl CodeGraph {
    /// Builds the graph for `request`.
    ///
    /// Fails only when the body cannot be parsed; see [`crate::SnippetError`].
    pub fn build<S: SchemaLookup>(request: &SnippetRequest<S>) -> SnippetResult<Self> {
        let body = parse_body(request)?;

        let graph = Self {
            http_method: request.http_method.clone(),
            nodes: request.nodes.clone(),
            response_schema: request.response_schema.clone(),
            headers: filter_headers(&request.headers),
            options: Vec::new(),
            parameters: normalize_query(&request.query),
            body,
        };
        debug!(
            method = %graph.http_method,
            headers = graph.headers.len(),
            parameters = graph.parameters.len(),
            has_body = graph.has_body(),
            "code graph built"
        );
        Ok(graph)
    }

    /// HTTP Method.
    pub fn http_method(&self) -> &str {
        &self.http_method
    }

    /// Addressed resource path segments.
    pub fn nodes(&self) -> &[PathSegment] {
        &self.nodes
    }

    /// Response schema.
    pub fn response_schema(&self) -> Option<&RefOr<Schema>> {
        self.response_schema.as_ref()
    }

    /// Request headers, `Host` excluded.
    pub fn headers(&self) -> &[CodeProperty] {
        &self.headers
    }

    /// Rendering options. Always empty for now.
    pub fn options(&self) -> &[CodeProperty] {
        &self.options
    }

    /// Normalized query parameters.
    pub fn parameters(&self) -> &[CodeProperty] {
        &self.parameters
    }

    /// Root body property; the `Default` sentinel when there is no body.
    pub fn body(&self) -> &CodeProperty {
        &self.body
    }

    /// Whether any header survived filtering.
    pub fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }

    /// Whether any rendering option is set.
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// Whether the query string produced parameters.
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Whether there is a body to render.
    pub fn has_body(&self) -> bool {
        self.body.property_type() != PropertyType::Default
    }
}
