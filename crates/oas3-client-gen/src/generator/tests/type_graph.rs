use crate::generator::{
  error::GenerateError,
  model::{FieldKind, FieldSpec, NamedType},
  type_graph::{CycleIndex, TypeGraph},
};

fn object(name: &str, refs: &[&str]) -> NamedType {
  let mut named = NamedType::new(name, format!("#/components/schemas/{name}"));
  for target in refs {
    let key = target.to_lowercase();
    named
      .fields
      .insert(key.clone(), FieldSpec::new(key, FieldKind::Reference((*target).to_string())));
  }
  named
}

fn graph_of(types: impl IntoIterator<Item = NamedType>) -> TypeGraph {
  let mut graph = TypeGraph::new();
  for named in types {
    graph.register(named).unwrap();
  }
  graph
}

#[test]
fn test_register_same_key_is_idempotent() {
  let mut graph = TypeGraph::new();
  graph.register(object("Pet", &[])).unwrap();
  graph.register(object("Pet", &["Owner"])).unwrap();

  assert_eq!(graph.len(), 1);
  assert!(graph.get("Pet").unwrap().fields.is_empty(), "first definition wins");
}

#[test]
fn test_register_collision() {
  let mut graph = TypeGraph::new();
  graph.register(object("Pet", &[])).unwrap();

  let err = graph
    .register(NamedType::new("Pet", "#/components/responses/Pet"))
    .unwrap_err();
  assert!(matches!(err, GenerateError::TypeNameCollision { ref name, .. } if name == "Pet"));
}

#[test]
fn test_reachable_from_prunes() {
  let mut dog = object("Dog", &["Collar"]);
  dog.children.insert("Pet".to_string());

  let graph = graph_of([
    dog,
    object("Pet", &["Owner"]),
    object("Owner", &[]),
    object("Collar", &[]),
    object("Inventory", &["Pet"]),
  ]);

  let pruned = graph.reachable_from(["Dog", "Missing"]);
  let names: Vec<&str> = pruned.iter().map(|named| named.name.as_str()).collect();

  assert_eq!(names, vec!["Collar", "Dog", "Owner", "Pet"]);
  assert_eq!(graph.len(), 5, "pruning returns a new graph");
}

#[test]
fn test_reachable_from_ignores_dangling_references() {
  let graph = graph_of([object("Pet", &["Ghost"])]);

  let pruned = graph.reachable_from(["Pet"]);
  assert_eq!(pruned.len(), 1);
}

#[test]
fn test_cycles() {
  struct Case {
    name: &'static str,
    types: Vec<NamedType>,
    expected: Vec<Vec<&'static str>>,
  }

  let cases = [
    Case {
      name: "acyclic",
      types: vec![object("Pet", &["Owner"]), object("Owner", &[])],
      expected: vec![],
    },
    Case {
      name: "self reference",
      types: vec![object("Node", &["Node"])],
      expected: vec![vec!["Node"]],
    },
    Case {
      name: "mutual",
      types: vec![
        object("Pet", &["Owner"]),
        object("Owner", &["Pet"]),
        object("Tree", &["Branch"]),
        object("Branch", &["Tree"]),
        object("Leaf", &["Tree"]),
      ],
      expected: vec![vec!["Branch", "Tree"], vec!["Owner", "Pet"]],
    },
  ];

  for case in cases {
    let graph = graph_of(case.types);
    assert_eq!(graph.cycles(), case.expected, "{}", case.name);
  }
}

#[test]
fn test_cycle_index() {
  let cycles = vec![
    vec!["Owner".to_string(), "Pet".to_string()],
    vec!["Node".to_string()],
  ];
  let index = CycleIndex::new(&cycles);

  assert!(index.is_recursive("Pet", "Owner"));
  assert!(index.is_recursive("Node", "Node"));
  assert!(!index.is_recursive("Pet", "Node"));
  assert!(!index.is_recursive("Leaf", "Pet"));
}
