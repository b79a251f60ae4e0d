use std::collections::BTreeSet;

use crate::generator::naming::identifiers::{
  ensure_unique, sanitize, to_lower_identifier, to_module_file_stem, to_rust_field_name, to_rust_type_name,
  to_upper_identifier,
};

#[test]
fn test_upper_identifiers() {
  let cases = [
    ("", ""),
    ("pet", "Pet"),
    ("Pet", "Pet"),
    ("getUserById", "GetUserById"),
    ("pet_store", "PetStore"),
    ("pet-store", "PetStore"),
    ("PET_STORE", "PetStore"),
    ("X-RATE-limit", "XRateLimit"),
    ("a__b", "AB"),
    ("#/components/schemas/order_item", "OrderItem"),
    ("some/path/users", "Users"),
  ];
  for (input, expected) in cases {
    assert_eq!(to_upper_identifier(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_lower_identifiers() {
  let cases = [
    ("", ""),
    ("Pet", "pet"),
    ("pet_store", "petStore"),
    ("X-RATE-limit", "xRateLimit"),
    ("#/components/schemas/Owner", "owner"),
  ];
  for (input, expected) in cases {
    assert_eq!(to_lower_identifier(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_identifier_casing_is_idempotent() {
  let inputs = [
    "", "pet", "pet_store", "X-RATE-limit", "getUserById", "__", "a-b_c", "ß", "#/components/schemas/x_y",
  ];
  for input in inputs {
    let upper = to_upper_identifier(input);
    assert_eq!(to_upper_identifier(&upper), upper, "upper not idempotent for {input:?}");

    let lower = to_lower_identifier(input);
    assert_eq!(to_lower_identifier(&lower), lower, "lower not idempotent for {input:?}");
  }
}

#[test]
fn test_sanitize() {
  let cases = [
    ("", ""),
    ("pet store", "pet_store"),
    ("--weird!!name--", "weird_name"),
    ("Café", "Cafe"),
  ];
  for (input, expected) in cases {
    assert_eq!(sanitize(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_field_names() {
  let cases = [
    ("foo-bar", "foo_bar"),
    ("petStore", "pet_store"),
    ("GetPets", "get_pets"),
    ("match", "r#match"),
    ("type", "r#type"),
    ("self", "self_"),
    ("super", "super_"),
    ("123name", "_123name"),
    ("", "_"),
    ("  ", "_"),
    ("-created-date", "negative_created_date"),
    ("-", "_"),
  ];
  for (input, expected) in cases {
    assert_eq!(to_rust_field_name(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_type_names() {
  let cases = [
    ("oAuth", "OAuth"),
    ("Pet", "Pet"),
    ("-INF", "NegativeInf"),
    ("123Response", "T123Response"),
    ("", "Unnamed"),
    ("  ", "Unnamed"),
    ("XMLHttpRequest", "XMLHttpRequest"),
    ("beta_response_mcp", "BetaResponseMcp"),
    ("NOT_FORCED", "NotForced"),
    ("My.Api.Models.User", "MyApiModelsUser"),
    ("String", "StringModel"),
    ("FormFile", "FormFileModel"),
    ("Vec", "VecModel"),
  ];
  for (input, expected) in cases {
    assert_eq!(to_rust_type_name(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_module_file_stems() {
  let cases = [("PetOwner", "pet_owner"), ("Match", "match_"), ("Crate", "crate_"), ("Pet", "pet")];
  for (input, expected) in cases {
    assert_eq!(to_module_file_stem(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_ensure_unique() {
  let used: BTreeSet<String> = ["users".to_string(), "users2".to_string()].into_iter().collect();
  assert_eq!(ensure_unique("pets", &used), "pets");
  assert_eq!(ensure_unique("users", &used), "users3");
}
