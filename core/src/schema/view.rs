#![deny(missing_docs)]

//! # Schema View
//!
//! [`SchemaLookup`] over `utoipa` OpenAPI schemas.
//!
//! Local references (`#/components/schemas/<name>`) are resolved against an
//! optional `Components` block. Nothing is fetched; unresolvable references are
//! treated as absent schemas.

use crate::schema::{SchemaLookup, StringFormat};
use percent_encoding::percent_decode_str;
use tracing::{trace, warn};
use utoipa::openapi::schema::{ArrayItems, KnownFormat, Schema, SchemaFormat};
use utoipa::openapi::{Components, RefOr};

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Bound on `$ref` chains and composite nesting, so cyclic schemas terminate.
const MAX_DEPTH: usize = 16;

/// A borrowed schema plus the components it may reference.
#[derive(Debug, Clone, Copy)]
pub struct SchemaView<'a> {
    schema: &'a Schema,
    components: Option<&'a Components>,
    ref_name: Option<&'a str>,
}

impl<'a> SchemaView<'a> {
    /// Wraps an inline schema with no components to resolve against.
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            components: None,
            ref_name: None,
        }
    }

    /// Resolves `$ref`s reachable from this view against `components`.
    pub fn with_components(mut self, components: &'a Components) -> Self {
        self.components = Some(components);
        self
    }

    /// Looks up a component schema by name (e.g. `microsoft.graph.message`).
    pub fn component(name: &str, components: &'a Components) -> Option<Self> {
        let (key, schema) = components.schemas.get_key_value(name)?;
        let mut view = Self::resolve_at(schema, Some(components), 0)?;
        if view.ref_name.is_none() {
            view.ref_name = Some(key.as_str());
        }
        Some(view)
    }

    /// Resolves an inline schema or a local reference.
    pub fn resolve(schema: &'a RefOr<Schema>, components: Option<&'a Components>) -> Option<Self> {
        Self::resolve_at(schema, components, 0)
    }

    /// The underlying schema.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    fn resolve_at(
        schema: &'a RefOr<Schema>,
        components: Option<&'a Components>,
        depth: usize,
    ) -> Option<Self> {
        let mut current = schema;
        let mut ref_name = None;
        for _ in depth..MAX_DEPTH {
            match current {
                RefOr::T(schema) => {
                    return Some(Self {
                        schema,
                        components,
                        ref_name,
                    })
                }
                RefOr::Ref(r) => {
                    let Some(name) = component_name(&r.ref_location) else {
                        warn!(reference = %r.ref_location, "non-local schema reference ignored");
                        return None;
                    };
                    let Some((key, target)) =
                        components.and_then(|c| c.schemas.get_key_value(name.as_str()))
                    else {
                        trace!(reference = %r.ref_location, "schema reference not found");
                        return None;
                    };
                    ref_name = Some(key.as_str());
                    current = target;
                }
            }
        }
        warn!("schema reference chain too deep, treating as absent");
        None
    }

    fn follow(&self, target: &'a RefOr<Schema>, depth: usize) -> Option<Self> {
        Self::resolve_at(target, self.components, depth)
    }

    fn alternatives_at(&self, depth: usize) -> Vec<Self> {
        if depth >= MAX_DEPTH {
            return Vec::new();
        }
        let items: &'a [RefOr<Schema>] = match self.schema {
            Schema::AllOf(all_of) => all_of.items.as_slice(),
            Schema::AnyOf(any_of) => any_of.items.as_slice(),
            Schema::OneOf(one_of) => one_of.items.as_slice(),
            _ => &[],
        };
        let mut alternatives: Vec<Self> = Vec::with_capacity(items.len());
        for alt in items.iter().filter_map(|item| self.follow(item, depth + 1)) {
            if !alternatives.iter().any(|seen| std::ptr::eq(seen.schema, alt.schema)) {
                alternatives.push(alt);
            }
        }
        alternatives
    }

    /// Marks this schema visited for one lookup. Returns `false` when it already was.
    fn enter(&self, visited: &mut Vec<&'a Schema>) -> bool {
        if visited.iter().any(|seen| std::ptr::eq(*seen, self.schema)) {
            trace!(reference = ?self.ref_name, "schema already searched");
            return false;
        }
        visited.push(self.schema);
        true
    }

    fn property_at(
        &self,
        name: &str,
        depth: usize,
        visited: &mut Vec<&'a Schema>,
    ) -> Option<Self> {
        if !self.enter(visited) {
            return None;
        }
        match self.schema {
            Schema::Object(obj) => obj
                .properties
                .get(name)
                .and_then(|prop| self.follow(prop, depth + 1)),
            _ => self
                .alternatives_at(depth)
                .into_iter()
                .find_map(|alt| alt.property_at(name, depth + 1, visited)),
        }
    }

    fn title_at(&self, depth: usize, visited: &mut Vec<&'a Schema>) -> Option<String> {
        if !self.enter(visited) {
            return None;
        }
        let declared = match self.schema {
            Schema::Object(obj) => obj.title.clone(),
            Schema::Array(arr) => arr.title.clone(),
            Schema::AllOf(all_of) => all_of.title.clone(),
            // utoipa 5 `AnyOf` carries no `title` field.
            Schema::AnyOf(_) => None,
            Schema::OneOf(one_of) => one_of.title.clone(),
            _ => None,
        };
        declared
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.ref_title())
            .or_else(|| {
                // Inheritance chains put the most specific schema last.
                self.alternatives_at(depth)
                    .into_iter()
                    .rev()
                    .find_map(|alt| alt.title_at(depth + 1, visited))
            })
    }

    fn items_at(&self, depth: usize, visited: &mut Vec<&'a Schema>) -> Option<Self> {
        if !self.enter(visited) {
            return None;
        }
        match self.schema {
            Schema::Array(arr) => match &arr.items {
                ArrayItems::RefOrSchema(item) => self.follow(item, depth + 1),
                _ => None,
            },
            _ => self
                .alternatives_at(depth)
                .into_iter()
                .find_map(|alt| alt.items_at(depth + 1, visited)),
        }
    }

    /// `microsoft.graph.importance` -> `importance`
    fn ref_title(&self) -> Option<String> {
        let name = self.ref_name?;
        let decoded = decode_pointer_segment(name);
        let short = decoded.rsplit('.').next().unwrap_or(&decoded);
        if short.is_empty() {
            None
        } else {
            Some(short.to_string())
        }
    }
}

impl SchemaLookup for SchemaView<'_> {
    fn property_schema(&self, name: &str) -> Option<Self> {
        self.property_at(name, 0, &mut Vec::new())
    }

    fn title(&self) -> Option<String> {
        self.title_at(0, &mut Vec::new())
    }

    fn alternatives(&self) -> Vec<Self> {
        self.alternatives_at(0)
    }

    fn format(&self) -> Option<StringFormat> {
        let Schema::Object(obj) = self.schema else {
            return None;
        };
        if obj.content_encoding.eq_ignore_ascii_case("base64url") {
            return Some(StringFormat::Base64Url);
        }
        match &obj.format {
            Some(SchemaFormat::KnownFormat(KnownFormat::DateTime)) => Some(StringFormat::DateTime),
            Some(SchemaFormat::Custom(keyword)) => StringFormat::from_keyword(keyword),
            _ => None,
        }
    }

    fn is_enumeration(&self) -> bool {
        matches!(
            self.schema,
            Schema::Object(obj) if obj.enum_values.as_ref().is_some_and(|values| !values.is_empty())
        )
    }

    fn items(&self) -> Option<Self> {
        self.items_at(0, &mut Vec::new())
    }
}

/// Extracts the component name from `#/components/schemas/<name>`.
fn component_name(ref_location: &str) -> Option<String> {
    let raw = ref_location.strip_prefix(SCHEMA_REF_PREFIX)?;
    if raw.is_empty() || raw.contains('/') {
        return None;
    }
    Some(decode_pointer_segment(raw))
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-encoding).
fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}
