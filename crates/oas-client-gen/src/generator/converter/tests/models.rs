use serde_json::json;

use super::support::{document, model, models};
use crate::generator::{
  ast::{DeriveTrait, FORM_FILE_TYPE, ModelDef, UNDEFINED_MEMBER},
  converter::ModelSynthesizer,
};

#[test]
fn test_integer_schema_without_lists_becomes_placeholder_enum() {
  let doc = document(json!({
    "components": { "schemas": { "Status": { "type": "integer" } } }
  }));

  let output = models(&doc);
  let status = model(&output, "Status").as_enum().expect("enum");

  assert_eq!(status.members.len(), 1);
  assert_eq!(status.members[0].name, UNDEFINED_MEMBER);
  assert_eq!(status.members[0].value, 0);
}

#[test]
fn test_enum_members_pair_names_with_values_by_index() {
  let doc = document(json!({
    "components": { "schemas": {
      "Priority": {
        "type": "integer",
        "format": "int32",
        "enum": [10, 20, 30, -1],
        "x-enum-varnames": ["low", "MEDIUM_LEVEL", "high", "unknown"],
      }
    } }
  }));

  let output = models(&doc);
  let priority = model(&output, "Priority").as_enum().expect("enum");
  let members: Vec<_> = priority
    .members
    .iter()
    .map(|member| (member.name.as_str(), member.value))
    .collect();

  assert_eq!(
    members,
    [("Low", 10), ("MediumLevel", 20), ("High", 30), ("Unknown", -1)]
  );
}

#[test]
fn test_enum_values_without_names_get_value_names() {
  let doc = document(json!({
    "components": { "schemas": { "Code": { "type": "integer", "enum": [1, -2] } } }
  }));

  let output = models(&doc);
  let names: Vec<_> = model(&output, "Code")
    .as_enum()
    .expect("enum")
    .members
    .iter()
    .map(|member| member.name.clone())
    .collect();

  assert_eq!(names, ["Value1", "ValueMinus2"]);
}

#[test]
fn test_enum_list_length_mismatch_is_an_error() {
  let doc = document(json!({
    "components": { "schemas": {
      "Broken": { "type": "integer", "enum": [1, 2], "x-enum-varnames": ["One"] }
    } }
  }));

  let error = ModelSynthesizer::new(&doc).synthesize().unwrap_err();
  assert!(error.to_string().contains("Broken"), "{error}");
}

#[test]
fn test_duplicate_enum_values_keep_every_member_with_warning() {
  let doc = document(json!({
    "components": { "schemas": {
      "Level": { "type": "integer", "enum": [1, 1, 2], "x-enum-varnames": ["Low", "Minimum", "High"] }
    } }
  }));

  let output = models(&doc);
  let level = model(&output, "Level").as_enum().expect("enum");
  let members: Vec<_> = level
    .members
    .iter()
    .map(|member| (member.name.as_str(), member.value))
    .collect();

  assert_eq!(members, [("Low", 1), ("Minimum", 1), ("High", 2)]);
  assert!(level.has_aliased_values());
  assert_eq!(output.warnings.len(), 1);
}

#[test]
fn test_formatted_integer_schema_stays_a_record() {
  let doc = document(json!({
    "components": { "schemas": { "Counter": { "type": "integer", "format": "uint8" } } }
  }));

  let output = models(&doc);
  assert!(model(&output, "Counter").as_record().is_some());
}

#[test]
fn test_form_file_sentinel_becomes_two_field_record() {
  let doc = document(json!({
    "components": { "schemas": {
      "iformfile": {
        "type": "object",
        "properties": { "ContentType": { "type": "string" }, "Length": { "type": "integer" } },
      }
    } }
  }));

  let output = models(&doc);
  let record = model(&output, FORM_FILE_TYPE).as_record().expect("record");
  let fields: Vec<_> = record
    .fields
    .iter()
    .map(|field| (field.ident.as_str(), field.rust_type.to_rust_type()))
    .collect();

  assert_eq!(
    fields,
    [
      ("data", "oas_client_gen_support::ByteStream".to_string()),
      ("name", "String".to_string()),
    ]
  );
  assert!(!record.is_serializable());
}

#[test]
fn test_form_file_collection_emits_no_model() {
  let doc = document(json!({
    "components": { "schemas": { "IFormFileCollection": { "type": "array" } } }
  }));

  let output = models(&doc);
  assert!(output.models.is_empty());
  assert_eq!(output.warnings.len(), 1);
}

#[test]
fn test_record_fields_keep_wire_names_and_apply_nullability() {
  let doc = document(json!({
    "components": { "schemas": {
      "Pet": {
        "type": "object",
        "required": ["id"],
        "properties": {
          "id": { "type": "integer", "format": "int64" },
          "pet_name": { "type": "string" },
          "type": { "type": "string" },
          "Tags": { "type": "array", "items": { "type": "string" } },
          "bornAt": { "type": "string", "format": "date-time" },
        },
      }
    } }
  }));

  let output = models(&doc);
  let record = model(&output, "Pet").as_record().expect("record");
  let fields: Vec<_> = record
    .fields
    .iter()
    .map(|field| {
      (
        field.ident.as_str(),
        field.wire_name.as_str(),
        field.rust_type.to_rust_type(),
        field.needs_rename(),
      )
    })
    .collect();

  assert_eq!(
    fields,
    [
      ("id", "id", "Option<i64>".to_string(), false),
      ("pet_name", "pet_name", "String".to_string(), false),
      ("r#type", "type", "String".to_string(), false),
      ("tags", "Tags", "Vec<String>".to_string(), true),
      ("born_at", "bornAt", "Option<chrono::DateTime<chrono::Utc>>".to_string(), true),
    ]
  );
}

#[test]
fn test_self_and_mutual_references_resolve_to_registered_names() {
  let doc = document(json!({
    "components": { "schemas": {
      "node": {
        "type": "object",
        "properties": {
          "children": { "type": "array", "items": { "$ref": "#/components/schemas/node" } },
          "owner": { "$ref": "#/components/schemas/owner" },
        },
      },
      "owner": {
        "type": "object",
        "properties": { "root": { "$ref": "#/components/schemas/node" } },
      },
    } }
  }));

  let output = models(&doc);
  let node = model(&output, "Node").as_record().expect("record");
  let owner = model(&output, "Owner").as_record().expect("record");

  assert_eq!(node.fields[0].rust_type.to_rust_type(), "Vec<Node>");
  assert_eq!(node.fields[1].rust_type.to_rust_type(), "Option<Box<Owner>>");
  assert_eq!(owner.fields[0].rust_type.to_rust_type(), "Option<Box<Node>>");
}

#[test]
fn test_recursive_records_box_fields_inside_the_cycle() {
  let doc = document(json!({
    "components": { "schemas": {
      "Node": {
        "type": "object",
        "properties": {
          "next": { "$ref": "#/components/schemas/Node" },
          "tag": { "$ref": "#/components/schemas/Tag" },
        },
      },
      "Parent": {
        "type": "object",
        "properties": { "child": { "$ref": "#/components/schemas/Child" } },
      },
      "Child": {
        "type": "object",
        "properties": {
          "parent": { "$ref": "#/components/schemas/Parent" },
          "siblings": { "type": "array", "items": { "$ref": "#/components/schemas/Child" } },
          "tag": { "$ref": "#/components/schemas/Tag" },
        },
      },
      "Tag": {
        "type": "object",
        "properties": { "label": { "type": "string" } },
      },
    } }
  }));

  let output = models(&doc);
  let field_type = |name: &str, index: usize| {
    let record = model(&output, name).as_record().expect("record");
    record.fields[index].rust_type.to_rust_type()
  };

  assert_eq!(field_type("Node", 0), "Option<Box<Node>>");
  assert_eq!(field_type("Node", 1), "Option<Tag>");
  assert_eq!(field_type("Parent", 0), "Option<Box<Child>>");
  assert_eq!(field_type("Child", 0), "Option<Box<Parent>>");
  assert_eq!(field_type("Child", 1), "Vec<Child>");
  assert_eq!(field_type("Child", 2), "Option<Tag>");
}

#[test]
fn test_references_only_through_sequences_stay_unboxed() {
  let doc = document(json!({
    "components": { "schemas": {
      "Folder": {
        "type": "object",
        "properties": {
          "folders": { "type": "array", "items": { "$ref": "#/components/schemas/Folder" } },
        },
      },
    } }
  }));

  let output = models(&doc);
  let folder = model(&output, "Folder").as_record().expect("record");
  assert_eq!(folder.fields[0].rust_type.to_rust_type(), "Vec<Folder>");
}

#[test]
fn test_colliding_schema_names_are_suffixed_consistently() {
  let doc = document(json!({
    "components": { "schemas": {
      "pet_tag": {
        "type": "object",
        "properties": { "other": { "$ref": "#/components/schemas/PetTag" } },
      },
      "PetTag": { "type": "object" },
    } }
  }));

  let output = models(&doc);
  let names: Vec<_> = output.models.iter().map(ModelDef::name).collect();
  assert_eq!(names, ["PetTag", "PetTag2"]);

  let first = model(&output, "PetTag").as_record().expect("record");
  assert_eq!(first.fields[0].rust_type.to_rust_type(), "Option<PetTag2>");
}

#[test]
fn test_records_holding_uploads_lose_serde_derives() {
  let doc = document(json!({
    "components": { "schemas": {
      "IFormFile": { "type": "object" },
      "Upload": {
        "type": "object",
        "properties": {
          "file": { "$ref": "#/components/schemas/IFormFile" },
          "note": { "type": "string" },
        },
      },
      "Envelope": {
        "type": "object",
        "properties": { "upload": { "$ref": "#/components/schemas/Upload" } },
      },
      "Plain": {
        "type": "object",
        "properties": { "note": { "type": "string" } },
      },
    } }
  }));

  let output = models(&doc);

  for name in ["Upload", "Envelope"] {
    let record = model(&output, name).as_record().expect("record");
    assert!(!record.derives.contains(&DeriveTrait::Serialize), "{name}");
    assert!(!record.derives.contains(&DeriveTrait::Clone), "{name}");
    assert!(record.derives.contains(&DeriveTrait::Debug), "{name}");
  }

  let plain = model(&output, "Plain").as_record().expect("record");
  assert!(plain.is_serializable());
  assert!(plain.derives.contains(&DeriveTrait::Deserialize));
}

#[test]
fn test_models_follow_document_order() {
  let doc = document(json!({
    "components": { "schemas": {
      "Zebra": { "type": "object" },
      "Apple": { "type": "integer" },
      "Mango": { "type": "object" },
    } }
  }));

  let output = models(&doc);
  let names: Vec<_> = output.models.iter().map(ModelDef::name).collect();
  assert_eq!(names, ["Zebra", "Apple", "Mango"]);
}
