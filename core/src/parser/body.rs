#![deny(missing_docs)]

//! # Body Parsing
//!
//! Walks a JSON request body alongside its (optional) schema and produces the
//! typed property tree.
//!
//! Handles:
//! - `application/octet-stream` payloads (kept verbatim, never parsed).
//! - Root naming from the schema title or the addressed resource path.
//! - Schema-backed objects: unknown members are grouped under `additionalData`.
//! - Anonymous objects (no schema): members are kept as-is, no grouping.
//! - `date-time`, `base64url` and enumeration-typed strings.

use crate::error::{SnippetError, SnippetResult};
use crate::graph::{CodeProperty, PathSegment, PropertyType, SnippetRequest};
use crate::naming::{escape_string_literal, singularize, to_first_lower, to_first_upper};
use crate::parser::json::{parse_lenient, JsonValue};
use crate::schema::{SchemaLookup, StringFormat};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Name of the synthetic node holding members the schema does not declare.
pub const ADDITIONAL_DATA: &str = "additionalData";

const OCTET_STREAM: &str = "application/octet-stream";
const POST_BODY_SUFFIX: &str = "PostRequestBody";

/// Parses the body of `request` into a single root property.
pub fn parse_body<S: SchemaLookup>(request: &SnippetRequest<S>) -> SnippetResult<CodeProperty> {
    BodyParser::new(&request.nodes).parse(
        request.body.as_deref(),
        request.content_type.as_deref(),
        request.request_schema.as_ref(),
        request.body_valid,
    )
}

/// Body parser bound to the addressed resource path (used for root naming).
#[derive(Debug, Clone, Copy)]
pub struct BodyParser<'n> {
    nodes: &'n [PathSegment],
}

impl<'n> BodyParser<'n> {
    /// Creates a parser for a request addressed by `nodes`.
    pub fn new(nodes: &'n [PathSegment]) -> Self {
        Self { nodes }
    }

    /// Parses a raw body.
    ///
    /// # Arguments
    ///
    /// * `body` - Raw body text; empty or blank yields the `Default` sentinel.
    /// * `content_type` - Declared media type, possibly with parameters.
    /// * `schema` - Schema of the expected root object, if known.
    /// * `body_valid` - Whether the body is parseable for its content type.
    pub fn parse<S: SchemaLookup>(
        &self,
        body: Option<&str>,
        content_type: Option<&str>,
        schema: Option<&S>,
        body_valid: bool,
    ) -> SnippetResult<CodeProperty> {
        let Some(body) = body.filter(|b| !b.trim().is_empty()) else {
            debug!("no request body");
            return Ok(CodeProperty::sentinel());
        };

        if content_type.is_some_and(is_octet_stream) {
            debug!(bytes = body.len(), "binary request body");
            return Ok(CodeProperty::binary(body));
        }

        if !body_valid {
            return Err(SnippetError::UnsupportedContentType(
                content_type.unwrap_or("<none>").to_string(),
            ));
        }

        let root = parse_lenient(body)?;
        let JsonValue::Object(object) = &root else {
            return Err(SnippetError::UnexpectedJsonShape(format!(
                "request body root must be a JSON object, found {}",
                root.kind_name()
            )));
        };

        let name = self.root_name(schema);
        debug!(root = %name, members = object.len(), "parsing JSON request body");
        parse_object(Some(name), object, schema)
    }

    /// Type name of the root object.
    ///
    /// Prefers the schema title; otherwise derives it from the path, e.g.
    /// `/users/{id}` -> `User`, `/me/sendMail` -> `SendMailPostRequestBody`.
    pub fn root_name<S: SchemaLookup>(&self, schema: Option<&S>) -> String {
        if let Some(title) = schema
            .and_then(|s| s.title())
            .filter(|t| !t.trim().is_empty())
        {
            return to_first_upper(&title);
        }

        let resource = self
            .nodes
            .iter()
            .rev()
            .find(|segment| !segment.is_collection_index())
            .map(|segment| {
                if segment.is_function() {
                    segment.function_name()
                } else {
                    segment.as_str()
                }
            })
            .unwrap_or_default();
        let resource = to_first_upper(resource);

        match self.nodes.last() {
            Some(last) if last.is_collection_index() => singularize(&resource).to_string(),
            _ => format!("{resource}{POST_BODY_SUFFIX}"),
        }
    }
}

/// Schema-backed object: declared members first, then `additionalData`.
fn parse_object<S: SchemaLookup>(
    name: Option<String>,
    object: &IndexMap<String, JsonValue>,
    schema: Option<&S>,
) -> SnippetResult<CodeProperty> {
    let mut children = Vec::with_capacity(object.len());
    let mut additional = Vec::new();

    for (key, value) in object {
        let member = Some(to_first_lower(key));
        match schema.and_then(|s| s.property_schema(key)) {
            Some(member_schema) => {
                children.push(parse_value(member, value, Some(&member_schema))?);
            }
            None => {
                trace!(member = %key, "not declared by schema");
                additional.push(parse_value::<S>(member, value, None)?);
            }
        }
    }

    if !additional.is_empty() {
        children.push(CodeProperty::composite(
            Some(ADDITIONAL_DATA.to_string()),
            PropertyType::Map,
            additional,
        ));
    }

    Ok(CodeProperty::composite(name, PropertyType::Object, children))
}

/// Object without a schema. Members are not grouped into `additionalData`.
fn parse_anonymous_object<S: SchemaLookup>(
    name: Option<String>,
    object: &IndexMap<String, JsonValue>,
) -> SnippetResult<CodeProperty> {
    let children = object
        .iter()
        .map(|(key, value)| parse_value::<S>(Some(to_first_lower(key)), value, None))
        .collect::<SnippetResult<Vec<_>>>()?;
    Ok(CodeProperty::composite(name, PropertyType::Object, children))
}

fn parse_value<S: SchemaLookup>(
    name: Option<String>,
    value: &JsonValue,
    schema: Option<&S>,
) -> SnippetResult<CodeProperty> {
    match value {
        JsonValue::String(s) => Ok(parse_string(name, s, schema)),
        JsonValue::Number(text) => Ok(CodeProperty::leaf(
            name,
            PropertyType::Number,
            Some(text.clone()),
        )),
        JsonValue::Bool(b) => Ok(CodeProperty::leaf(
            name,
            PropertyType::Boolean,
            Some(b.to_string()),
        )),
        JsonValue::Null => Ok(CodeProperty::leaf(
            name,
            PropertyType::Null,
            Some("null".to_string()),
        )),
        JsonValue::Object(object) => match schema {
            Some(_) => parse_object(name, object, schema),
            None => parse_anonymous_object::<S>(name, object),
        },
        JsonValue::Array(items) => parse_array(name, items, schema),
    }
}

fn parse_string<S: SchemaLookup>(
    name: Option<String>,
    raw: &str,
    schema: Option<&S>,
) -> CodeProperty {
    let Some(schema) = schema else {
        return string_leaf(name, raw);
    };

    match schema.string_format() {
        Some(StringFormat::Base64Url) => {
            return CodeProperty::leaf(name, PropertyType::Base64Url, Some(raw.to_string()))
        }
        Some(StringFormat::DateTime) => {
            return CodeProperty::leaf(name, PropertyType::Date, Some(raw.to_string()))
        }
        None => {}
    }

    if let Some(enumeration) = schema.enumeration() {
        let enum_type = enumeration
            .title()
            .or_else(|| name.clone())
            .unwrap_or_default();
        let value = (!raw.trim().is_empty())
            .then(|| format!("{}.{}", to_first_upper(&enum_type), to_first_upper(raw)));
        return CodeProperty::leaf(name, PropertyType::Enum, value);
    }

    string_leaf(name, raw)
}

fn string_leaf(name: Option<String>, raw: &str) -> CodeProperty {
    CodeProperty::leaf(name, PropertyType::String, Some(escape_string_literal(raw)))
}

/// Every element shares one type name: the item schema's title, or the array's own.
fn parse_array<S: SchemaLookup>(
    name: Option<String>,
    items: &[JsonValue],
    schema: Option<&S>,
) -> SnippetResult<CodeProperty> {
    let item_schema = schema.and_then(|s| s.items());
    let element_name = item_schema
        .as_ref()
        .and_then(|s| s.title())
        .or_else(|| schema.and_then(|s| s.title()))
        .map(|title| to_first_upper(&title));

    let children = items
        .iter()
        .map(|item| parse_value(element_name.clone(), item, item_schema.as_ref()))
        .collect::<SnippetResult<Vec<_>>>()?;
    Ok(CodeProperty::composite(name, PropertyType::Array, children))
}

fn is_octet_stream(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(OCTET_STREAM))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaView;
    use pretty_assertions::assert_eq;
    use utoipa::openapi::schema::Schema;
    use utoipa::openapi::{Components, OpenApi, RefOr};

    const HEADER_BLOCK: &str = r#"
openapi: 3.1.0
info:
  title: Snippets
  version: 1.0.0
paths: {}
"#;

    const SCHEMAS: &str = r#"
    microsoft.graph.importance:
      title: importance
      type: string
      enum: [low, normal, high]
    microsoft.graph.emailAddress:
      title: emailAddress
      type: object
      properties:
        address: { type: string }
        name: { type: string }
    microsoft.graph.recipient:
      title: recipient
      type: object
      properties:
        emailAddress:
          $ref: '#/components/schemas/microsoft.graph.emailAddress'
    microsoft.graph.message:
      title: message
      type: object
      properties:
        subject: { type: string }
        importance:
          anyOf:
            - $ref: '#/components/schemas/microsoft.graph.importance'
        receivedDateTime: { type: string, format: date-time }
        contentBytes: { type: string, format: base64url }
        isRead: { type: boolean }
        toRecipients:
          type: array
          items:
            $ref: '#/components/schemas/microsoft.graph.recipient'
        categories:
          type: array
          items: { type: string }
        singleValueExtendedProperties:
          type: object
"#;

    fn components() -> Components {
        let yaml = format!("{}components:\n  schemas:\n{}", HEADER_BLOCK, SCHEMAS);
        let api: OpenApi = serde_yaml::from_str(&yaml).unwrap();
        api.components.unwrap()
    }

    fn nodes(segments: &[&str]) -> Vec<PathSegment> {
        segments.iter().map(|s| PathSegment::new(*s)).collect()
    }

    fn parse_message(body: &str) -> CodeProperty {
        let comps = components();
        let schema = SchemaView::component("microsoft.graph.message", &comps).unwrap();
        let path = nodes(&["me", "messages"]);
        BodyParser::new(&path)
            .parse(Some(body), Some("application/json"), Some(&schema), true)
            .unwrap()
    }

    fn parse_without_schema(body: &str, content_type: Option<&str>) -> SnippetResult<CodeProperty> {
        let path = nodes(&["me", "sendMail"]);
        BodyParser::new(&path).parse::<SchemaView>(Some(body), content_type, None, true)
    }

    #[test]
    fn test_blank_body_is_sentinel() {
        let path = nodes(&["users"]);
        let parser = BodyParser::new(&path);
        for body in [None, Some(""), Some("  \n")] {
            let root = parser
                .parse::<SchemaView>(body, Some("application/json"), None, false)
                .unwrap();
            assert_eq!(root, CodeProperty::sentinel());
        }
    }

    #[test]
    fn test_octet_stream_is_binary_even_if_not_json() {
        let path = nodes(&["drive", "items", "{id}", "content"]);
        let root = BodyParser::new(&path)
            .parse::<SchemaView>(
                Some("\u{0}not json {"),
                Some("Application/Octet-Stream; charset=binary"),
                None,
                false,
            )
            .unwrap();
        assert_eq!(root.property_type(), PropertyType::Binary);
        assert_eq!(root.value(), Some("\u{0}not json {"));
    }

    #[test]
    fn test_invalid_flag_rejects_body() {
        let path = nodes(&["users"]);
        let err = BodyParser::new(&path)
            .parse::<SchemaView>(Some("a=b"), Some("text/csv"), None, false)
            .unwrap_err();
        assert!(matches!(err, SnippetError::UnsupportedContentType(ref ct) if ct == "text/csv"));
    }

    #[test]
    fn test_malformed_and_shape_errors() {
        let err = parse_without_schema("{ \"a\": ", None).unwrap_err();
        assert!(matches!(err, SnippetError::MalformedJson(_)));

        let err = parse_without_schema("[1, 2]", Some("application/json")).unwrap_err();
        assert!(matches!(err, SnippetError::UnexpectedJsonShape(_)));
    }

    #[test]
    fn test_enum_member() {
        let root = parse_message(r#"{ "importance": "high" }"#);
        let importance = root.child("importance").unwrap();
        assert_eq!(importance.property_type(), PropertyType::Enum);
        assert_eq!(importance.value(), Some("Importance.High"));
    }

    #[test]
    fn test_blank_enum_has_no_value() {
        let root = parse_message(r#"{ "importance": " " }"#);
        let importance = root.child("importance").unwrap();
        assert_eq!(importance.property_type(), PropertyType::Enum);
        assert_eq!(importance.value(), None);
    }

    #[test]
    fn test_scalars_and_formats() {
        let root = parse_message(
            r#"{
                "subject": "Say \"hi\"\nnow",
                "receivedDateTime": "2024-01-01T10:00:00Z",
                "contentBytes": "aGk_",
                "isRead": false,
            }"#,
        );
        assert_eq!(root.name(), Some("Message"));
        assert_eq!(root.property_type(), PropertyType::Object);

        let subject = root.child("subject").unwrap();
        assert_eq!(subject.property_type(), PropertyType::String);
        assert_eq!(subject.value(), Some("Say \\\"hi\\\"\\nnow"));

        let received = root.child("receivedDateTime").unwrap();
        assert_eq!(received.property_type(), PropertyType::Date);
        assert_eq!(received.value(), Some("2024-01-01T10:00:00Z"));

        let bytes = root.child("contentBytes").unwrap();
        assert_eq!(bytes.property_type(), PropertyType::Base64Url);
        assert_eq!(bytes.value(), Some("aGk_"));

        let read = root.child("isRead").unwrap();
        assert_eq!(read.property_type(), PropertyType::Boolean);
        assert_eq!(read.value(), Some("false"));
    }

    #[test]
    fn test_unknown_members_grouped_after_known() {
        let root = parse_message(r#"{ "Extra": 3.0, "subject": "s", "other": null }"#);
        let names: Vec<_> = root.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec![Some("subject"), Some(ADDITIONAL_DATA)]);

        let additional = root.child(ADDITIONAL_DATA).unwrap();
        assert_eq!(additional.property_type(), PropertyType::Map);
        assert_eq!(
            additional.children(),
            &[
                CodeProperty::leaf(Some("extra".into()), PropertyType::Number, Some("3.0".into())),
                CodeProperty::leaf(Some("other".into()), PropertyType::Null, Some("null".into())),
            ]
        );
    }

    #[test]
    fn test_array_elements_share_item_title() {
        let root = parse_message(
            r#"{
                "toRecipients": [
                    { "emailAddress": { "address": "a@contoso.com", "nick": "A" } },
                    { "emailAddress": { "address": "b@contoso.com" } }
                ],
                "categories": ["red", "blue"]
            }"#,
        );

        let recipients = root.child("toRecipients").unwrap();
        assert_eq!(recipients.property_type(), PropertyType::Array);
        assert_eq!(recipients.children().len(), 2);
        for element in recipients.children() {
            assert_eq!(element.name(), Some("Recipient"));
            assert_eq!(element.property_type(), PropertyType::Object);
        }

        let first_address = recipients.children()[0].child("emailAddress").unwrap();
        assert_eq!(first_address.property_type(), PropertyType::Object);
        assert!(first_address.child("address").is_some());
        let extra = first_address.child(ADDITIONAL_DATA).unwrap();
        assert_eq!(extra.children()[0].name(), Some("nick"));

        let categories = root.child("categories").unwrap();
        assert_eq!(categories.children().len(), 2);
        assert!(categories.children().iter().all(|c| c.name().is_none()
            && c.property_type() == PropertyType::String));
    }

    #[test]
    fn test_anonymous_objects_are_not_grouped() {
        let root = parse_message(
            r#"{ "flag": { "status": "flagged", "dueDateTime": { "timeZone": "UTC" } } }"#,
        );
        let additional = root.child(ADDITIONAL_DATA).unwrap();
        let flag = additional.child("flag").unwrap();
        assert_eq!(flag.property_type(), PropertyType::Object);
        assert!(flag.child(ADDITIONAL_DATA).is_none());
        assert_eq!(flag.child("status").unwrap().value(), Some("flagged"));

        let due = flag.child("dueDateTime").unwrap();
        assert!(due.child(ADDITIONAL_DATA).is_none());
        assert_eq!(due.child("timeZone").unwrap().value(), Some("UTC"));
    }

    #[test]
    fn test_schema_backed_nested_object_without_properties_groups_members() {
        let root = parse_message(r#"{ "singleValueExtendedProperties": { "id": "x" } }"#);
        let nested = root.child("singleValueExtendedProperties").unwrap();
        assert_eq!(nested.children().len(), 1);
        assert_eq!(nested.children()[0].name(), Some(ADDITIONAL_DATA));
    }

    #[test]
    fn test_number_text_is_canonical() {
        let root = parse_without_schema(r#"{ "a": 42, "b": 3.0, "c": -1.5e3 }"#, None).unwrap();
        let additional = root.child(ADDITIONAL_DATA).unwrap();
        let values: Vec<_> = additional.children().iter().map(|c| c.value().unwrap()).collect();
        assert_eq!(values, vec!["42", "3.0", "-1500.0"]);

        // Re-parsing the emitted text yields the same text.
        for text in values {
            let body = format!(r#"{{ "n": {text} }}"#);
            let reparsed = parse_without_schema(&body, None).unwrap();
            let leaf = &reparsed.child(ADDITIONAL_DATA).unwrap().children()[0];
            assert_eq!(leaf.value(), Some(text));
        }
    }

    #[test]
    fn test_wide_integers_are_not_rounded() {
        let root = parse_without_schema(
            r#"{ "id": 12345678901234567890123, "max": 18446744073709551616 }"#,
            None,
        )
        .unwrap();
        let additional = root.child(ADDITIONAL_DATA).unwrap();
        assert_eq!(
            additional.children(),
            &[
                CodeProperty::leaf(
                    Some("id".into()),
                    PropertyType::Number,
                    Some("12345678901234567890123".into())
                ),
                CodeProperty::leaf(
                    Some("max".into()),
                    PropertyType::Number,
                    Some("18446744073709551616".into())
                ),
            ]
        );
    }

    #[test]
    fn test_root_name_from_path() {
        let parser_for = |segments: &[&str]| nodes(segments);

        let path = parser_for(&["me", "microsoft.graph.sendMail"]);
        assert_eq!(
            BodyParser::new(&path).root_name::<SchemaView>(None),
            "SendMailPostRequestBody"
        );

        let path = parser_for(&["users", "{user-id}"]);
        assert_eq!(BodyParser::new(&path).root_name::<SchemaView>(None), "User");

        let path = parser_for(&["groups"]);
        assert_eq!(
            BodyParser::new(&path).root_name::<SchemaView>(None),
            "GroupsPostRequestBody"
        );

        assert_eq!(
            BodyParser::new(&[]).root_name::<SchemaView>(None),
            "PostRequestBody"
        );
    }

    #[test]
    fn test_root_name_prefers_schema_title() {
        let comps = components();
        let schema = SchemaView::component("microsoft.graph.message", &comps).unwrap();
        let path = nodes(&["users", "{user-id}"]);
        assert_eq!(BodyParser::new(&path).root_name(Some(&schema)), "Message");
    }

    #[test]
    fn test_inline_composite_title_names_root() {
        let comps = components();
        let inline: RefOr<Schema> = serde_yaml::from_str(
            r#"
title: sendMailRequestBody
allOf:
  - $ref: '#/components/schemas/microsoft.graph.message'
"#,
        )
        .unwrap();
        let schema = SchemaView::resolve(&inline, Some(&comps)).unwrap();
        let path = nodes(&["me", "sendMail"]);

        let root = BodyParser::new(&path)
            .parse(Some(r#"{ "subject": "Hi" }"#), None, Some(&schema), true)
            .unwrap();
        assert_eq!(root.name(), Some("SendMailRequestBody"));
        assert_eq!(root.child("subject").unwrap().value(), Some("Hi"));
        assert!(root.child(ADDITIONAL_DATA).is_none());
    }
}
