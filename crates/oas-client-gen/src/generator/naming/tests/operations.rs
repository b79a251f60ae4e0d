use http::Method;

use crate::generator::naming::operations::{CLIENT_RESERVED_METHODS, MethodNameAllocator, operation_method_name};

#[test]
fn test_operation_method_names() {
  struct Case {
    method: Method,
    path: &'static str,
    operation_id: Option<&'static str>,
    expected: &'static str,
  }

  let cases = [
    Case {
      method: Method::GET,
      path: "/users/{id}",
      operation_id: None,
      expected: "Users",
    },
    Case {
      method: Method::GET,
      path: "/users/{id}/pet_photos/{photoId}",
      operation_id: None,
      expected: "PetPhotos",
    },
    Case {
      method: Method::POST,
      path: "/pets",
      operation_id: Some("add new pet"),
      expected: "AddNewPet",
    },
    Case {
      method: Method::GET,
      path: "/pets",
      operation_id: Some("listPets"),
      expected: "ListPets",
    },
    Case {
      method: Method::PUT,
      path: "/pets",
      operation_id: Some("   "),
      expected: "Pets",
    },
    Case {
      method: Method::DELETE,
      path: "/{id}",
      operation_id: None,
      expected: "DeleteApi",
    },
    Case {
      method: Method::GET,
      path: "/",
      operation_id: None,
      expected: "GetApi",
    },
    Case {
      method: Method::GET,
      path: "/reports/",
      operation_id: None,
      expected: "Reports",
    },
  ];

  for case in cases {
    assert_eq!(
      operation_method_name(&case.method, case.path, case.operation_id),
      case.expected,
      "failed for {} {}",
      case.method,
      case.path
    );
  }
}

#[test]
fn test_method_name_allocation_disambiguates() {
  let mut allocator = MethodNameAllocator::default();

  let first = allocator.allocate("Users", &Method::GET);
  assert_eq!(first.ident, "users");
  assert_eq!(first.renamed_from, None);

  let second = allocator.allocate("Users", &Method::POST);
  assert_eq!(second.ident, "users_post");
  assert_eq!(second.renamed_from.as_deref(), Some("users"));

  let third = allocator.allocate("Users", &Method::POST);
  assert_eq!(third.ident, "users_post2");
}

#[test]
fn test_method_name_allocation_escapes_keywords() {
  let mut allocator = MethodNameAllocator::default();
  assert_eq!(allocator.allocate("Type", &Method::GET).ident, "r#type");
}

#[test]
fn test_method_name_allocation_skips_client_methods() {
  let mut allocator = MethodNameAllocator::default();

  for reserved in CLIENT_RESERVED_METHODS {
    let allocated = allocator.allocate(reserved, &Method::GET);
    assert_eq!(allocated.ident, format!("{reserved}_get"));
    assert_eq!(allocated.renamed_from.as_deref(), Some(*reserved));
  }

  assert_eq!(allocator.allocate("BaseUrl", &Method::PUT).ident, "base_url_put");
}
