use oas3::spec::{ObjectOrReference, Ref};

/// Parses an internal component `$ref` and returns the component name.
///
/// Only pointers into the same document (`#/components/...`) are recognised;
/// external references and malformed pointers yield `None`.
pub fn parse_component_ref(ref_path: &str) -> Option<String> {
  if !ref_path.starts_with("#/components") {
    return None;
  }

  ref_path.parse::<Ref>().ok().map(|component| component.name)
}

/// Returns the component name when `obj_ref` is an internal `$ref`.
pub fn component_ref_name<T>(obj_ref: &ObjectOrReference<T>) -> Option<String> {
  match obj_ref {
    ObjectOrReference::Ref { ref_path, .. } => parse_component_ref(ref_path),
    ObjectOrReference::Object(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_component_ref() {
    assert_eq!(parse_component_ref("#/components/schemas/Pet"), Some("Pet".to_string()));
    assert_eq!(
      parse_component_ref("#/components/responses/PetList"),
      Some("PetList".to_string())
    );
    assert_eq!(parse_component_ref("other.json#/components/schemas/Pet"), None);
    assert_eq!(parse_component_ref("#/definitions/Pet"), None);
  }
}
