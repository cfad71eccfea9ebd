use std::collections::BTreeSet;

use crate::naming::identifiers::{
  derive_operation_name, ensure_unique, sanitize, split_pascal_case, to_rust_field_name, to_type_ident,
};

#[test]
fn test_field_names() {
  assert_eq!(to_rust_field_name("foo-bar"), "foo_bar");
  assert_eq!(to_rust_field_name("pet_id"), "pet_id");
  assert_eq!(to_rust_field_name("match"), "r#match");
  assert_eq!(to_rust_field_name("type"), "r#type");
  assert_eq!(to_rust_field_name("self"), "self_");
  assert_eq!(to_rust_field_name("Self"), "self_");
  assert_eq!(to_rust_field_name("crate"), "crate_");
  assert_eq!(to_rust_field_name("super"), "super_");
  assert_eq!(to_rust_field_name("superUser"), "super_user");
  assert_eq!(to_rust_field_name("123name"), "_123name");
  assert_eq!(to_rust_field_name(""), "_");
  assert_eq!(to_rust_field_name("  "), "_");
}

#[test]
fn test_type_ident_id_acronym() {
  struct Case {
    input: &'static str,
    expected: &'static str,
  }

  let cases = [
    Case {
      input: "pet_id",
      expected: "PetID",
    },
    Case {
      input: "petId",
      expected: "PetID",
    },
    Case {
      input: "petID",
      expected: "PetID",
    },
    Case {
      input: "id",
      expected: "ID",
    },
    Case {
      input: "paid",
      expected: "Paid",
    },
    Case {
      input: "identity",
      expected: "Identity",
    },
    Case {
      input: "id_card",
      expected: "IdCard",
    },
  ];

  for case in cases {
    assert_eq!(to_type_ident(case.input), case.expected, "input: {}", case.input);
  }
}

#[test]
fn test_type_ident_casing() {
  assert_eq!(to_type_ident("pet"), "Pet");
  assert_eq!(to_type_ident("owner_info"), "OwnerInfo");
  assert_eq!(to_type_ident("PetOwnerInfo"), "PetOwnerInfo");
  assert_eq!(to_type_ident("oAuth"), "OAuth");
  assert_eq!(to_type_ident("HTTPServer"), "HTTPServer");
  assert_eq!(to_type_ident("NOT_FORCED"), "NotForced");
  assert_eq!(to_type_ident("pet-store.v2"), "PetStoreV2");
}

#[test]
fn test_type_ident_edge_cases() {
  assert_eq!(to_type_ident(""), "Unnamed");
  assert_eq!(to_type_ident("  "), "Unnamed");
  assert_eq!(to_type_ident("123Response"), "T123Response");
  assert_eq!(to_type_ident("vec"), "VecType");
  assert_eq!(to_type_ident("Client"), "ClientType");
}

#[test]
fn test_split_pascal_case() {
  assert_eq!(split_pascal_case("XMLParser"), vec!["XML", "Parser"]);
  assert_eq!(split_pascal_case("petOwner"), vec!["pet", "Owner"]);
  assert_eq!(split_pascal_case("v2Api"), vec!["v2", "Api"]);
  assert!(split_pascal_case("").is_empty());
}

#[test]
fn test_sanitize() {
  assert_eq!(sanitize("pet store"), "pet_store");
  assert_eq!(sanitize("--pets--"), "pets");
  assert_eq!(sanitize("a..b"), "a_b");
  assert_eq!(sanitize(""), "");
}

#[test]
fn test_ensure_unique() {
  let used: BTreeSet<String> = ["list_pets".to_string(), "list_pets2".to_string()].into_iter().collect();
  assert_eq!(ensure_unique("get_pet", &used), "get_pet");
  assert_eq!(ensure_unique("list_pets", &used), "list_pets3");
}

#[test]
fn test_derive_operation_name() {
  assert_eq!(derive_operation_name("GET", "/pets"), "get_pets");
  assert_eq!(derive_operation_name("DELETE", "/pets/{pet_id}"), "delete_pets_by_pet_id");
  assert_eq!(derive_operation_name("GET", "/"), "get");
}
