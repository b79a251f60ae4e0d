use quote::ToTokens;
use serde_json::{Value, json};

use super::{document, synthesize};
use http::Method;

use crate::generator::codegen::{
  Visibility,
  client::{ClientFragment, HttpInitFragment},
  format_tokens,
};

struct Rendered {
  squashed: String,
  formatted: String,
}

impl Rendered {
  fn contains(&self, pattern: &str) -> bool {
    self.squashed.contains(&squash(pattern))
  }
}

fn squash(text: &str) -> String {
  text.split_whitespace().collect()
}

fn render(value: Value, visibility: Visibility) -> Rendered {
  let doc = document(value);
  let (_, output) = synthesize(&doc);
  let tokens = ClientFragment::new(&output.client, visibility).into_token_stream();
  Rendered {
    squashed: squash(&tokens.to_string()),
    formatted: format_tokens(&tokens).expect("client formats"),
  }
}

fn petstore() -> Value {
  json!({
    "info": { "title": "Pet Store", "version": "1.0.0" },
    "servers": [{ "url": "https://petstore.example/v1" }],
    "components": {
      "securitySchemes": { "key": { "type": "apiKey", "in": "header", "name": "X-Api-Key" } },
      "schemas": {
        "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
        "IFormFile": { "type": "object", "properties": { "fileName": { "type": "string" } } },
      }
    },
    "paths": {
      "/pets/{petId}": {
        "get": {
          "operationId": "getPet",
          "parameters": [
            { "name": "petId", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } },
          ],
          "responses": {
            "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
          }
        },
        "delete": {
          "operationId": "deletePet",
          "parameters": [
            { "name": "petId", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } },
          ]
        }
      },
      "/pets": {
        "post": {
          "operationId": "addPet",
          "requestBody": {
            "required": true,
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } }
          },
          "responses": { "200": {} }
        },
        "get": {
          "operationId": "findPets",
          "parameters": [
            { "name": "tags", "in": "query", "schema": { "type": "array", "items": { "type": "string" } } },
            { "name": "limit", "in": "query", "required": true, "schema": { "type": "integer" } },
            { "name": "X-Trace", "in": "header", "schema": { "type": "string" } },
          ],
          "responses": {
            "200": {
              "content": {
                "application/json": {
                  "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }
                }
              }
            }
          }
        }
      },
      "/pets/{petId}/avatar": {
        "put": {
          "operationId": "uploadAvatar",
          "parameters": [
            { "name": "petId", "in": "path", "required": true, "schema": { "type": "string" } },
          ],
          "requestBody": {
            "content": {
              "multipart/form-data": {
                "schema": {
                  "type": "object",
                  "properties": { "avatar": { "$ref": "#/components/schemas/IFormFile" } }
                }
              }
            }
          },
          "responses": {
            "200": { "content": { "application/octet-stream": { "schema": { "type": "string", "format": "binary" } } } }
          }
        }
      }
    }
  })
}

#[test]
fn test_client_type_and_options() {
  let code = render(petstore(), Visibility::Public);

  assert!(code.contains("pub struct PetStoreClientOptions {"));
  assert!(code.contains("pub base_url: String,"));
  assert!(code.contains("pub api_key: Option<String>,"));
  assert!(code.contains("pub http_client: Option<reqwest::Client>,"));
  assert!(code.contains("pub struct PetStoreClient { http_client: reqwest::Client, base_url: String, api_key: Option<String>, }"));
  assert!(code.contains(r#"pub const DEFAULT_BASE_URL: &'static str = "https://petstore.example/v1";"#));
  assert!(code.contains("base_url: PetStoreClient::DEFAULT_BASE_URL.to_string(),"));
  assert!(code.contains("http_client: options.http_client.unwrap_or_default(),"));
  assert!(code.contains("impl Default for PetStoreClient"));
  assert!(code.formatted.contains("use super::models::*;"));
}

#[test]
fn test_path_parameters_are_percent_encoded() {
  let code = render(petstore(), Visibility::Public);

  assert!(code.contains(
    "pub async fn get_pet(&self, pet_id: i64) -> Result<Pet, oas_client_gen_support::ApiError>"
  ));
  assert!(code.contains(
    r#"format!("/pets/{}", oas_client_gen_support::percent_encode_path_segment(&pet_id.to_string()))"#
  ));
  assert!(code.contains(r#"format!("/pets/{}/avatar", oas_client_gen_support::percent_encode_path_segment(&pet_id.to_string()))"#));
}

#[test]
fn test_api_key_header_is_attached_when_configured() {
  let code = render(petstore(), Visibility::Public);

  assert!(code.contains(
    r#"if let Some(key) = &self.api_key { request = request.header("X-Api-Key", oas_client_gen_support::header_value("X-Api-Key", key)?); }"#
  ));
  assert!(code.contains("let mut request = self.http_client.delete(url);"));
}

#[test]
fn test_json_response_and_empty_response() {
  let code = render(petstore(), Visibility::Public);

  assert!(code.contains("oas_client_gen_support::decode_json::<Pet>(response).await"));
  assert!(code.contains("oas_client_gen_support::decode_json::<Vec<Pet>>(response).await"));
  assert!(code.contains(
    "pub async fn delete_pet(&self, pet_id: i64) -> Result<(), oas_client_gen_support::ApiError>"
  ));
  assert!(code.contains("drop(response); Ok(())"));
  assert!(code.contains("let response = oas_client_gen_support::error_for_status(response).await?;"));
}

#[test]
fn test_json_body_is_sent_as_json() {
  let code = render(petstore(), Visibility::Public);

  assert!(code.contains("pub async fn add_pet(&self, body: Pet)"));
  assert!(code.contains("request = request.json(&body);"));
}

#[test]
fn test_multipart_body_sends_file_part() {
  let code = render(petstore(), Visibility::Public);

  assert!(code.contains(
    "pub async fn upload_avatar(&self, pet_id: String, body: Option<FormFile>) -> Result<oas_client_gen_support::ByteStream, oas_client_gen_support::ApiError>"
  ));
  assert!(code.contains(
    r#"if let Some(body) = body { let mut form = reqwest::multipart::Form::new(); form = form.part("avatar", oas_client_gen_support::file_part(body.data, body.name)); request = request.multipart(form); }"#
  ));
  assert!(code.contains("Ok(oas_client_gen_support::ByteStream::from_response(response))"));
}

#[test]
fn test_query_and_optional_headers() {
  let code = render(petstore(), Visibility::Public);

  assert!(code.contains("pub async fn find_pets(&self, limit: i32, x_trace: Option<String>, tags: Option<Vec<String>>)"));
  assert!(code.contains("let mut query: Vec<(&str, String)> = Vec::new();"));
  assert!(code.contains(r#"if let Some(values) = &tags { for value in values { query.push(("tags", value.to_string())); } }"#));
  assert!(code.contains(r#"query.push(("limit", limit.to_string()));"#));
  assert!(code.contains("request = request.query(&query);"));
  assert!(code.contains(
    r#"if let Some(value) = &x_trace { request = request.header("X-Trace", oas_client_gen_support::header_value("X-Trace", value.to_string())?); }"#
  ));
}

#[test]
fn test_multipart_record_fields_and_put_verb() {
  let code = render(
    json!({
      "components": {
        "schemas": {
          "Profile": {
            "type": "object",
            "properties": {
              "nickname": { "type": "string" },
              "age": { "type": "integer" },
              "photo": { "type": "string", "format": "binary" },
              "bornAt": { "type": "string", "format": "date-time" },
            }
          }
        }
      },
      "paths": {
        "/profile": {
          "put": {
            "operationId": "updateProfile",
            "requestBody": {
              "required": true,
              "content": { "multipart/form-data": { "schema": { "$ref": "#/components/schemas/Profile" } } }
            }
          }
        }
      }
    }),
    Visibility::Crate,
  );

  assert!(code.contains("pub(crate) struct ApiClient"));
  assert!(code.contains(r#"pub(crate) const DEFAULT_BASE_URL: &'static str = "http://localhost";"#));
  assert!(code.contains("let mut request = self.http_client.put(url);"));
  assert!(code.contains(r#"form = form.text("nickname", body.nickname.to_string());"#));
  assert!(code.contains(r#"if let Some(value) = body.age { form = form.text("age", value.to_string()); }"#));
  assert!(code.contains(
    r#"if let Some(value) = body.photo { form = form.part("photo", reqwest::multipart::Part::stream(value.into_body())); }"#
  ));
  assert!(code.contains(r#"if let Some(value) = body.born_at { form = form.text("bornAt", value.to_rfc3339()); }"#));
  assert!(code.contains("request = request.multipart(form);"));
  assert!(!code.contains("request.json("));
  assert!(!code.contains("api_key"));
}

#[test]
fn test_query_api_key_and_untyped_multipart() {
  let code = render(
    json!({
      "components": {
        "securitySchemes": { "key": { "type": "apiKey", "in": "query", "name": "token" } }
      },
      "paths": {
        "/import": {
          "post": {
            "operationId": "import",
            "requestBody": {
              "required": true,
              "content": { "multipart/form-data": { "schema": {} } }
            }
          }
        }
      }
    }),
    Visibility::Public,
  );

  assert!(code.contains(r#"if let Some(key) = &self.api_key { query.push(("token", key.clone())); }"#));
  assert!(code.contains("if let serde_json::Value::Object(map) = body { for (key, value) in map {"));
  assert!(code.contains("oas_client_gen_support::json_value_text(value)?"));
  assert!(!code.contains("request.header("));
}

#[test]
fn test_route_without_parameters_needs_no_mut_request() {
  let code = render(
    json!({ "paths": { "/health": { "get": { "operationId": "health" } } } }),
    Visibility::Public,
  );

  assert!(code.contains(r#"format!("/health")"#));
  assert!(code.contains("let request = self.http_client.get(url);"));
  assert!(!code.contains("let mut request"));
}

#[test]
fn test_other_verbs_go_through_request() {
  let cases = [
    (Method::GET, "self.http_client.get(url)"),
    (Method::DELETE, "self.http_client.delete(url)"),
    (Method::PATCH, "self.http_client.request(reqwest::Method::PATCH, url)"),
  ];
  for (method, expected) in cases {
    let tokens = HttpInitFragment::new(method.clone()).into_token_stream();
    assert_eq!(squash(&tokens.to_string()), squash(expected), "{method}");
  }
}
