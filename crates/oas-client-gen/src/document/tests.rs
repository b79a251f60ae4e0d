use http::Method;
use serde_json::json;

use super::*;

fn decode_schema(value: serde_json::Value) -> anyhow::Result<Schema> {
  Ok(serde_json::from_value(value)?)
}

#[test]
fn test_type_string_and_array_decode_identically() {
  let single = decode_schema(json!({ "type": "integer" })).unwrap();
  let list = decode_schema(json!({ "type": ["integer"] })).unwrap();

  assert_eq!(single.kinds, list.kinds);
  assert_eq!(single.primary_kind(), Some("integer"));
}

#[test]
fn test_multi_kind_list_keeps_order_and_first_wins() {
  let schema = decode_schema(json!({ "type": ["integer", "null"] })).unwrap();
  let kinds = schema.kinds.as_ref().unwrap();

  assert_eq!(kinds.as_slice(), ["integer".to_string(), "null".to_string()]);
  assert_eq!(schema.primary_kind(), Some("integer"));
}

#[test]
fn test_type_array_with_non_string_element_is_fatal() {
  assert!(decode_schema(json!({ "type": ["string", 42] })).is_err());
  assert!(decode_schema(json!({ "type": [] })).is_err());
  assert!(decode_schema(json!({ "type": 7 })).is_err());
}

#[test]
fn test_single_kind_encodes_without_array_wrapper() {
  let cases = [
    (json!({ "type": "string" }), json!("string")),
    (json!({ "type": ["string"] }), json!("string")),
    (json!({ "type": ["string", "null"] }), json!(["string", "null"])),
  ];

  for (input, expected) in cases {
    let schema = decode_schema(input.clone()).unwrap();
    let encoded = serde_json::to_value(&schema).unwrap();
    assert_eq!(encoded["type"], expected, "encoding of {input}");
  }
}

#[test]
fn test_integer_like_classification() {
  let cases = [
    (json!({ "type": "integer" }), true),
    (json!({ "type": "integer", "format": "int16" }), true),
    (json!({ "type": "integer", "format": "int32" }), true),
    (json!({ "type": "integer", "format": "int64" }), true),
    (json!({ "type": "integer", "format": "uint8" }), false),
    (json!({ "type": "number" }), false),
    (json!({ "type": "string" }), false),
    (json!({}), false),
  ];

  for (input, expected) in cases {
    let schema = decode_schema(input.clone()).unwrap();
    assert_eq!(schema.is_integer_like(), expected, "classification of {input}");
  }
}

#[test]
fn test_enum_names_accept_both_extension_spellings() {
  let varnames = decode_schema(json!({ "type": "integer", "enum": [1, 2], "x-enum-varnames": ["One", "Two"] })).unwrap();
  let enum_names = decode_schema(json!({ "type": "integer", "enum": [1, 2], "x-enumNames": ["One", "Two"] })).unwrap();

  assert_eq!(varnames.enum_var_names, enum_names.enum_var_names);
  assert_eq!(varnames.integer_enum_values(), Some(vec![1, 2]));
}

#[test]
fn test_string_enum_values_are_not_integer_values() {
  let schema = decode_schema(json!({ "type": "string", "enum": ["a", "b"] })).unwrap();
  assert_eq!(schema.integer_enum_values(), None);
}

#[test]
fn test_reference_helpers() {
  let schema = Schema::reference_to("Pet");
  assert_eq!(schema.reference(), Some("#/components/schemas/Pet"));
  assert_eq!(reference_name("#/components/schemas/Pet"), "Pet");
  assert!(is_form_file_reference("#/components/schemas/IFormFile"));
  assert!(is_form_file_collection_reference("#/components/schemas/IFormFileCollection"));
  assert!(!is_form_file_reference("#/components/schemas/IFormFileCollection"));

  let empty = Schema {
    reference: Some(String::new()),
    ..Default::default()
  };
  assert_eq!(empty.reference(), None);
}

#[test]
fn test_document_operations_follow_verb_order() {
  let document = Document::from_json(
    &json!({
      "openapi": "3.0.1",
      "info": { "title": "Pets", "version": "1.0" },
      "paths": {
        "/pets": {
          "delete": { "responses": {} },
          "get": { "responses": {} },
          "patch": { "responses": {} },
          "post": { "responses": {} }
        },
        "/owners": { "put": { "responses": {} } }
      }
    })
    .to_string(),
  )
  .unwrap();

  let operations: Vec<_> = document.operations().map(|(path, method, _)| (path, method)).collect();
  assert_eq!(
    operations,
    vec![
      ("/pets", Method::GET),
      ("/pets", Method::POST),
      ("/pets", Method::DELETE),
      ("/owners", Method::PUT),
    ]
  );
}

#[test]
fn test_components_preserve_document_order() {
  let document = Document::from_json(
    r#"{
      "info": { "title": "Ordered", "version": "1" },
      "components": { "schemas": { "Zebra": {}, "Apple": {}, "Mango": {} } }
    }"#,
  )
  .unwrap();

  let names: Vec<_> = document.components.schemas.keys().cloned().collect();
  assert_eq!(names, ["Zebra", "Apple", "Mango"]);
}

#[test]
fn test_yaml_document_decodes() {
  let document = Document::from_yaml(
    r"
info:
  title: Yaml API
  version: '2'
servers:
  - url: https://api.example.com/v2
paths:
  /items/{id}:
    get:
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: integer
            format: int64
      responses:
        '200':
          description: ok
",
  )
  .unwrap();

  assert_eq!(document.title(), "Yaml API");
  assert_eq!(document.base_url(), Some("https://api.example.com/v2"));
  let (_, _, operation) = document.operations().next().unwrap();
  let parameter = operation.parameters[0].resolve(&document).unwrap();
  assert_eq!(parameter.location, ParameterLocation::Path);
  assert!(parameter.required);
}

#[test]
fn test_component_references_resolve() {
  let document = Document::from_json(
    &json!({
      "info": { "title": "Refs", "version": "1" },
      "paths": {
        "/a": {
          "post": {
            "parameters": [ { "$ref": "#/components/parameters/Trace" } ],
            "requestBody": { "$ref": "#/components/requestBodies/Payload" },
            "responses": { "200": { "$ref": "#/components/responses/Ok" } }
          }
        }
      },
      "components": {
        "parameters": { "Trace": { "name": "X-Trace", "in": "header" } },
        "requestBodies": { "Payload": { "required": true, "content": { "application/json": { "schema": { "type": "string" } } } } },
        "responses": { "Ok": { "description": "fine" } }
      }
    })
    .to_string(),
  )
  .unwrap();

  let (_, _, operation) = document.operations().next().unwrap();
  let parameter = operation.parameters[0].resolve(&document).unwrap();
  assert_eq!(parameter.name, "X-Trace");
  let body = operation.request_body.as_ref().unwrap().resolve(&document).unwrap();
  assert!(body.required);
  assert!(body.media(media::JSON).is_some());
  let response = operation.responses["200"].resolve(&document).unwrap();
  assert_eq!(response.description.as_deref(), Some("fine"));

  let dangling: ObjectOrReference<Parameter> = ObjectOrReference::Ref {
    ref_path: "#/components/parameters/Missing".to_string(),
  };
  assert!(dangling.resolve(&document).is_err());
}

#[test]
fn test_media_lookup_ignores_parameters_and_case() {
  let body: RequestBody = serde_json::from_value(json!({
    "content": { "Application/JSON; charset=utf-8": { "schema": { "type": "string" } } }
  }))
  .unwrap();

  assert!(body.media(media::JSON).is_some());
  assert!(body.media(media::MULTIPART).is_none());
}

#[test]
fn test_api_key_scheme_detection() {
  let document = Document::from_json(
    &json!({
      "info": { "title": "Keys", "version": "1" },
      "components": {
        "securitySchemes": {
          "bearer": { "type": "http", "scheme": "bearer" },
          "key": { "type": "apiKey", "name": "X-Api-Key", "in": "header" }
        }
      }
    })
    .to_string(),
  )
  .unwrap();

  let scheme = document.api_key_scheme().unwrap();
  assert_eq!(scheme.api_key_header(), Some("X-Api-Key"));
}
